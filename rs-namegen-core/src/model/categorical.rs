use std::collections::BTreeMap;
use std::fmt::Debug;

use rand::Rng;

use crate::error::{NameGenError, Result};

/// Weighted categorical distribution over a fixed support.
///
/// Every symbol of the support starts with the same `prior` count (additive
/// smoothing), observations only ever increase counts.
///
/// ## Responsibilities:
/// - Accumulate observation counts per symbol
/// - Draw a symbol with probability `count / total`
/// - Report the relative frequency of a symbol
///
/// ## Invariants
/// - `total` is the sum of all counts
/// - The support never changes after construction
/// - Counts are monotonically non-decreasing
#[derive(Clone, Debug)]
pub struct Categorical<T> {
	/// Count per symbol. Ordered so that sampling walks the support in a
	/// stable order.
	counts: BTreeMap<T, f64>,
	/// Running sum of `counts`.
	total: f64,
}

impl<T: Copy + Ord + Debug> Categorical<T> {
	/// Creates a distribution where every symbol of `support` has a count of `prior`.
	///
	/// # Errors
	/// Returns `InvalidPrior` if `prior` is negative or not finite.
	pub fn new<I: IntoIterator<Item = T>>(support: I, prior: f64) -> Result<Self> {
		if !prior.is_finite() || prior < 0.0 {
			return Err(NameGenError::InvalidPrior(prior));
		}

		let counts: BTreeMap<T, f64> = support.into_iter().map(|symbol| (symbol, prior)).collect();
		let total = counts.len() as f64 * prior;
		Ok(Self { counts, total })
	}

	/// Records `count` occurrences of `event`.
	///
	/// # Errors
	/// - `UnknownSymbol` if `event` is not part of the support
	/// - `InvalidCount` if `count` is negative or not finite
	pub fn observe(&mut self, event: T, count: f64) -> Result<()> {
		if !count.is_finite() || count < 0.0 {
			return Err(NameGenError::InvalidCount(count));
		}
		let current = self
			.counts
			.get_mut(&event)
			.ok_or_else(|| NameGenError::UnknownSymbol(format!("{event:?}")))?;
		*current += count;
		self.total += count;
		Ok(())
	}

	/// Draws a symbol using weighted random sampling.
	///
	/// A uniform value is drawn in `[0, total)`, then each symbol's count is
	/// subtracted in turn until the value falls within the current count.
	/// Symbols with a zero count are never returned.
	///
	/// # Errors
	/// Returns `EmptyModel` if the distribution carries no probability mass.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<T> {
		if self.total <= 0.0 {
			return Err(NameGenError::EmptyModel);
		}

		let mut r = rng.random_range(0.0..self.total);

		let mut fallback = None;
		for (symbol, count) in &self.counts {
			if *count <= 0.0 {
				continue;
			}
			if r <= *count {
				return Ok(*symbol);
			}
			r -= count;
			fallback = Some(*symbol);
		}

		// Only reachable through floating point drift on the last bucket
		fallback.ok_or(NameGenError::EmptyModel)
	}

	/// Returns `count(event) / total`.
	///
	/// # Errors
	/// - `UnknownSymbol` if `event` is not part of the support
	/// - `EmptyModel` if the distribution carries no probability mass
	pub fn probability(&self, event: T) -> Result<f64> {
		let count = self.count(event)?;
		if self.total <= 0.0 {
			return Err(NameGenError::EmptyModel);
		}
		Ok(count / self.total)
	}

	/// Returns the current count of `event` (prior included).
	pub fn count(&self, event: T) -> Result<f64> {
		self.counts
			.get(&event)
			.copied()
			.ok_or_else(|| NameGenError::UnknownSymbol(format!("{event:?}")))
	}

	/// Sum of all counts.
	pub fn total(&self) -> f64 {
		self.total
	}

	/// Iterates over the support in sampling order.
	pub fn support(&self) -> impl Iterator<Item = T> + '_ {
		self.counts.keys().copied()
	}
}
