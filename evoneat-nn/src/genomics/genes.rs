use crate::genomics::GeneticConfig;
use crate::Innovation;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Genes are the principal components of genomes.
/// They are created between two nodes, and become
/// network connections in the genome's phenotype
/// while enabled.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Gene {
    id: Innovation,
    input: Innovation,
    output: Innovation,
    weight: f32,
    enabled: bool,
}

impl Gene {
    /// Returns a new _enabled_ gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    /// assert!(gene.enabled());
    /// ```
    pub fn new(id: Innovation, input: Innovation, output: Innovation, weight: f32) -> Gene {
        Gene {
            id,
            input,
            output,
            weight,
            enabled: true,
        }
    }

    /// Returns a random weight, uniformly distributed
    /// over the range ±`bound`.
    pub(super) fn random_weight<R: Rng + ?Sized>(bound: f32, rng: &mut R) -> f32 {
        if bound > 0.0 {
            rng.gen_range(-bound..=bound)
        } else {
            0.0
        }
    }

    /// Randomizes the gene's weight. Uses a uniform
    /// distribution over the range ±[`weight_bound`].
    ///
    /// [`weight_bound`]: crate::genomics::GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{Gene, GeneticConfig};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 20.0);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    ///
    /// gene.randomize_weight(
    ///     &GeneticConfig {
    ///         weight_bound: 5.0,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut rng,
    /// );
    ///
    /// assert!(gene.weight().abs() <= 5.0);
    /// ```
    pub fn randomize_weight<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        self.weight = Self::random_weight(config.weight_bound, rng);
    }

    /// Perturbs the gene's weight by a normally distributed
    /// amount with standard deviation [`weight_perturb_sigma`].
    /// The result is clamped to ±[`weight_bound`].
    ///
    /// [`weight_perturb_sigma`]: crate::genomics::GeneticConfig::weight_perturb_sigma
    /// [`weight_bound`]: crate::genomics::GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{Gene, GeneticConfig};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 4.5);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let config = GeneticConfig {
    ///     weight_perturb_sigma: 2.5,
    ///     weight_bound: 5.0,
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// for _ in 0..100 {
    ///     gene.perturb_weight(&config, &mut rng);
    ///     assert!(gene.weight().abs() <= 5.0);
    /// }
    /// ```
    pub fn perturb_weight<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        if let Ok(normal) = Normal::new(0.0, config.weight_perturb_sigma) {
            self.weight += normal.sample(rng);
        }
        self.weight = self
            .weight
            .max(-config.weight_bound)
            .min(config.weight_bound);
    }

    /// Returns the gene's innovation number.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.innovation(), 42);
    /// ```
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the gene's input node's innovation number.
    pub fn input(&self) -> Innovation {
        self.input
    }

    /// Returns the gene's output node's innovation number.
    pub fn output(&self) -> Innovation {
        self.output
    }

    /// Returns the gene's weight.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Sets the gene's weight.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::Gene;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// gene.set_weight(-5.0);
    ///
    /// assert_eq!(gene.weight(), -5.0);
    /// ```
    pub fn set_weight(&mut self, w: f32) {
        self.weight = w;
    }

    /// Returns whether the gene is expressed in
    /// the genome's phenotype.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the gene's expression status.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::Gene;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// gene.set_enabled(false);
    ///
    /// assert!(!gene.enabled());
    /// ```
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns the gene's input and output's innovation numbers.
    pub fn endpoints(&self) -> (Innovation, Innovation) {
        (self.input, self.output)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}",
            if self.enabled { "" } else { "(" },
            self.id,
            self.input,
            self.output,
            self.weight,
            if self.enabled { "" } else { ")" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_bound_weights_are_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(Gene::random_weight(0.0, &mut rng), 0.0);
        let mut gene = Gene::new(1, 0, 1, 3.0);
        gene.randomize_weight(&GeneticConfig::zero(), &mut rng);
        assert_eq!(gene.weight(), 0.0);
    }

    #[test]
    fn zero_sigma_only_clamps() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = GeneticConfig {
            weight_bound: 2.0,
            ..GeneticConfig::zero()
        };
        let mut gene = Gene::new(1, 0, 1, 1.5);
        gene.perturb_weight(&config, &mut rng);
        assert_eq!(gene.weight(), 1.5);

        gene.set_weight(-7.0);
        gene.perturb_weight(&config, &mut rng);
        assert_eq!(gene.weight(), -2.0);
    }

    #[test]
    fn display_marks_disabled_genes() {
        let mut gene = Gene::new(3, 0, 2, 0.5);
        assert_eq!(gene.to_string(), "3[0->2, 0.500]");
        gene.set_enabled(false);
        assert_eq!(gene.to_string(), "(3[0->2, 0.500])");
    }
}
