use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;

use super::categorical::Categorical;
use crate::error::{NameGenError, Result};

/// Smoothed variable-order Markov model over discrete symbols.
///
/// The model keeps one `Categorical` per observed context (the `order`
/// symbols preceding an event). Training also feeds every shorter suffix of
/// each context, down to the empty one, so that an unseen context can fall
/// back to the longest suffix that was seen.
///
/// # Responsibilities
/// - Learn next-symbol distributions from sequences
/// - Resolve a context to the longest known suffix (backoff)
/// - Sample symbols and generate boundary-terminated sequences
///
/// # Invariants
/// - `boundary` is never part of `support`
/// - Every key of `counts` has a length <= `order`
/// - Once something was observed, the empty context is a key of `counts`
#[derive(Clone, Debug)]
pub struct MarkovModel<T> {
	/// Corpus symbols plus the boundary symbol.
	support: BTreeSet<T>,
	order: usize,
	prior: f64,
	boundary: T,
	/// `order` copies of the boundary, start padding.
	prefix: Vec<T>,
	/// Single boundary, sequence terminator.
	postfix: Vec<T>,
	/// Mapping from a context to its distribution.
	counts: HashMap<Vec<T>, Categorical<T>>,
}

impl<T: Copy + Eq + Hash + Ord + Debug> MarkovModel<T> {
	/// Creates an untrained model.
	///
	/// # Errors
	/// - `InvalidPrior` if `prior` is negative or not finite
	/// - `BoundaryInSupport` if `boundary` belongs to `support`
	pub fn new<I: IntoIterator<Item = T>>(support: I, order: usize, prior: f64, boundary: T) -> Result<Self> {
		if !prior.is_finite() || prior < 0.0 {
			return Err(NameGenError::InvalidPrior(prior));
		}

		let mut support: BTreeSet<T> = support.into_iter().collect();
		if !support.insert(boundary) {
			return Err(NameGenError::BoundaryInSupport(format!("{boundary:?}")));
		}

		Ok(Self {
			support,
			order,
			prior,
			boundary,
			prefix: vec![boundary; order],
			postfix: vec![boundary],
			counts: HashMap::new(),
		})
	}

	/// Trains the model on one sequence, `count` times.
	///
	/// The sequence is padded as `prefix + sequence + postfix`. Each event is
	/// observed under its full context and under every suffix of it.
	///
	/// # Errors
	/// - `BoundaryInSequence` if the boundary symbol appears in `sequence`
	/// - `UnknownSymbol` if a symbol is outside the support
	/// - `InvalidCount` if `count` is negative or not finite
	///
	/// The sequence is checked before anything is recorded, so a failed call
	/// leaves the model untouched.
	pub fn observe(&mut self, sequence: &[T], count: f64) -> Result<()> {
		if !count.is_finite() || count < 0.0 {
			return Err(NameGenError::InvalidCount(count));
		}
		for symbol in sequence {
			if *symbol == self.boundary {
				return Err(NameGenError::BoundaryInSequence(format!("{symbol:?}")));
			}
			if !self.support.contains(symbol) {
				return Err(NameGenError::UnknownSymbol(format!("{symbol:?}")));
			}
		}

		let padded: Vec<T> = self
			.prefix
			.iter()
			.chain(sequence)
			.chain(&self.postfix)
			.copied()
			.collect();

		for i in self.order..padded.len() {
			let context = &padded[i - self.order..i];
			let event = padded[i];
			for j in 0..=context.len() {
				self.categorical(&context[j..])?.observe(event, count)?;
			}
		}
		Ok(())
	}

	/// Returns the distribution of `context`, creating it on first use.
	fn categorical(&mut self, context: &[T]) -> Result<&mut Categorical<T>> {
		Ok(match self.counts.entry(context.to_vec()) {
			Entry::Occupied(entry) => entry.into_mut(),
			Entry::Vacant(entry) => entry.insert(Categorical::new(self.support.iter().copied(), self.prior)?),
		})
	}

	/// Resolves `context` to the longest known suffix.
	///
	/// The context is first normalized to exactly `order` symbols (keeping
	/// the last ones, or left-padding with the boundary), then its leftmost
	/// symbol is dropped until the remainder is a known context. The empty
	/// context is the last resort.
	pub fn backoff(&self, context: &[T]) -> Vec<T> {
		let mut normalized: Vec<T> = if context.len() >= self.order {
			context[context.len() - self.order..].to_vec()
		} else {
			let mut padded = vec![self.boundary; self.order - context.len()];
			padded.extend_from_slice(context);
			padded
		};

		let start = (0..normalized.len())
			.find(|&start| self.counts.contains_key(&normalized[start..]))
			.unwrap_or(normalized.len());
		normalized.drain(..start);
		normalized
	}

	/// Draws the next symbol for `context`, after backoff.
	///
	/// # Errors
	/// Returns `EmptyModel` if the model was never trained.
	pub fn sample<R: Rng + ?Sized>(&self, context: &[T], rng: &mut R) -> Result<T> {
		let resolved = self.backoff(context);
		self.counts.get(&resolved).ok_or(NameGenError::EmptyModel)?.sample(rng)
	}

	/// Generates a sequence, stopping when the boundary symbol is drawn.
	///
	/// The boundary itself is not part of the result. No length bound is
	/// applied, see `generate_within` for a bounded variant.
	pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<T>> {
		// `None` only happens with a limit
		Ok(self.generate_within(usize::MAX, rng)?.unwrap_or_default())
	}

	/// Same as `generate`, but gives up as soon as more than `limit` symbols
	/// were produced and returns `None`.
	pub fn generate_within<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Result<Option<Vec<T>>> {
		let mut sequence = Vec::new();
		let mut context = self.prefix.clone();

		loop {
			let next = self.sample(&context, rng)?;
			if next == self.boundary {
				return Ok(Some(sequence));
			}
			if sequence.len() >= limit {
				return Ok(None);
			}
			sequence.push(next);

			// Slide the window
			context.push(next);
			if context.len() > self.order {
				context.remove(0);
			}
		}
	}

	/// Probability of `event` given `context`, after backoff.
	///
	/// # Errors
	/// - `EmptyModel` if the model was never trained
	/// - `UnknownSymbol` if `event` is outside the support
	pub fn probability(&self, event: T, context: &[T]) -> Result<f64> {
		let resolved = self.backoff(context);
		self.counts.get(&resolved).ok_or(NameGenError::EmptyModel)?.probability(event)
	}

	/// Distribution stored for exactly `context`, without backoff.
	pub fn distribution(&self, context: &[T]) -> Option<&Categorical<T>> {
		self.counts.get(context)
	}

	/// Number of contexts learned so far.
	pub fn context_count(&self) -> usize {
		self.counts.len()
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn prior(&self) -> f64 {
		self.prior
	}

	pub fn boundary(&self) -> T {
		self.boundary
	}

	/// Support, boundary included.
	pub fn support(&self) -> &BTreeSet<T> {
		&self.support
	}
}
