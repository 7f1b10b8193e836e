use serde::{Deserialize, Serialize};

use crate::error::{NameGenError, Result};

/// Parameters of a `NameGenerator`.
///
/// # Fields
/// - `order`: context length of the underlying Markov model.
/// - `prior`: additive smoothing constant given to every symbol.
/// - `min_len` / `max_len`: accepted name length, in symbols, both inclusive.
/// - `max_attempts`: optional cap on rejected candidates per `generate` call.
///   `None` keeps retrying until a name is accepted, which may never happen
///   with a corpus too small to produce new names of the accepted length.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
	pub order: usize,
	pub prior: f64,
	pub min_len: usize,
	pub max_len: usize,
	pub max_attempts: Option<usize>,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			order: 3,
			prior: 0.001,
			min_len: 4,
			max_len: 8,
			max_attempts: None,
		}
	}
}

impl GeneratorConfig {
	/// Same configuration with another Markov order.
	pub fn with_order(mut self, order: usize) -> Self {
		self.order = order;
		self
	}

	/// Same configuration with another smoothing prior.
	pub fn with_prior(mut self, prior: f64) -> Self {
		self.prior = prior;
		self
	}

	/// Same configuration with another accepted length range.
	pub fn with_length(mut self, min_len: usize, max_len: usize) -> Self {
		self.min_len = min_len;
		self.max_len = max_len;
		self
	}

	/// Same configuration with a cap on rejected candidates.
	pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
		self.max_attempts = Some(max_attempts);
		self
	}

	/// Checks the configuration.
	///
	/// # Errors
	/// - `InvalidPrior` if `prior` is negative or not finite
	/// - `InvalidLengthRange` if `min_len > max_len`
	pub fn validate(&self) -> Result<()> {
		if !self.prior.is_finite() || self.prior < 0.0 {
			return Err(NameGenError::InvalidPrior(self.prior));
		}
		if self.min_len > self.max_len {
			return Err(NameGenError::InvalidLengthRange { min: self.min_len, max: self.max_len });
		}
		Ok(())
	}

	/// Returns true if a name of `len` symbols is within the accepted range.
	pub fn accepts_length(&self, len: usize) -> bool {
		(self.min_len..=self.max_len).contains(&len)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = GeneratorConfig::default();
		assert_eq!(config.order, 3);
		assert_eq!(config.prior, 0.001);
		assert_eq!(config.max_attempts, None);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_accepts_length_bounds() {
		let config = GeneratorConfig::default();
		assert!(!config.accepts_length(3));
		assert!(config.accepts_length(4));
		assert!(config.accepts_length(8));
		assert!(!config.accepts_length(9));
	}

	#[test]
	fn test_validate_rejects_inverted_range() {
		let config = GeneratorConfig::default().with_length(6, 5);
		assert!(matches!(
			config.validate(),
			Err(NameGenError::InvalidLengthRange { min: 6, max: 5 })
		));
	}

	#[test]
	fn test_validate_rejects_invalid_prior() {
		let config = GeneratorConfig::default().with_prior(-0.5);
		assert!(matches!(config.validate(), Err(NameGenError::InvalidPrior(_))));
	}

	#[test]
	fn test_builders() {
		let config = GeneratorConfig::default()
			.with_order(2)
			.with_prior(0.5)
			.with_length(3, 10)
			.with_max_attempts(100);
		assert_eq!(
			config,
			GeneratorConfig { order: 2, prior: 0.5, min_len: 3, max_len: 10, max_attempts: Some(100) }
		);
	}
}
