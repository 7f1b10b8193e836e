use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::generator_config::GeneratorConfig;
use super::markov_model::MarkovModel;
use crate::error::{NameGenError, Result};
use crate::io;

/// Boundary symbol used unless the corpus already contains it.
pub const DEFAULT_BOUNDARY: char = '\0';

/// Generates new names from a corpus of example names.
///
/// # Responsibilities
/// - Derive the symbol support from the corpus and train a `MarkovModel`
/// - Generate candidates until one is new and has an accepted length
/// - Remember every emitted name so it is never produced twice
///
/// # Invariants
/// - `names` contains every corpus name and every generated name
/// - A generated name is never already in `names` when emitted
#[derive(Debug)]
pub struct NameGenerator<R = StdRng> {
	model: MarkovModel<char>,
	names: HashSet<String>,
	config: GeneratorConfig,
	rng: R,
}

impl NameGenerator<StdRng> {
	/// Creates a generator using a random source seeded from the OS.
	///
	/// # Errors
	/// See `with_rng`.
	pub fn new<I, S>(names: I, config: GeneratorConfig) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self::with_rng(names, config, StdRng::from_os_rng())
	}

	/// Creates a generator with a seeded random source.
	///
	/// Same corpus, configuration and seed produce the same names in the same order.
	pub fn from_seed<I, S>(names: I, config: GeneratorConfig, seed: u64) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self::with_rng(names, config, StdRng::seed_from_u64(seed))
	}

	/// Creates a generator from a corpus file, one name per line.
	///
	/// # Errors
	/// - `Io` if the file cannot be read
	/// - See `with_rng` for the others
	pub fn from_file<P: AsRef<Path>>(filepath: P, config: GeneratorConfig) -> Result<Self> {
		let lines = io::read_file(&filepath)?;
		debug!("Read {} lines from {}", lines.len(), filepath.as_ref().display());
		Self::new(lines, config)
	}

	/// Reseeds the random source.
	pub fn reseed(&mut self, seed: u64) {
		self.rng = StdRng::seed_from_u64(seed);
	}
}

impl<R: Rng> NameGenerator<R> {
	/// Creates a generator with an injected random source.
	///
	/// # Behavior
	/// - Trims every name and ignores the empty ones.
	/// - Builds the support from all symbols of the remaining names.
	/// - Trains the model once per distinct name.
	///
	/// # Errors
	/// - `InvalidPrior` / `InvalidLengthRange` for an invalid configuration
	/// - `EmptyCorpus` if no name remains after trimming
	pub fn with_rng<I, S>(names: I, config: GeneratorConfig, rng: R) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		config.validate()?;

		let mut known = HashSet::new();
		let mut corpus: Vec<Vec<char>> = Vec::new();
		let mut support = BTreeSet::new();
		for name in names {
			let name = name.as_ref().trim();
			if name.is_empty() {
				continue;
			}
			if known.insert(name.to_owned()) {
				let symbols: Vec<char> = name.chars().collect();
				support.extend(symbols.iter().copied());
				corpus.push(symbols);
			}
		}

		if corpus.is_empty() {
			return Err(NameGenError::EmptyCorpus);
		}

		let boundary = Self::pick_boundary(&support);
		let mut model = MarkovModel::new(support, config.order, config.prior, boundary)?;
		for symbols in &corpus {
			model.observe(symbols, 1.0)?;
		}

		debug!(
			"Trained name generator: {} names, {} symbols, {} contexts (order {})",
			corpus.len(),
			model.support().len() - 1,
			model.context_count(),
			config.order
		);

		Ok(Self { model, names: known, config, rng })
	}

	/// Picks a boundary symbol absent from `support`.
	fn pick_boundary(support: &BTreeSet<char>) -> char {
		if !support.contains(&DEFAULT_BOUNDARY) {
			return DEFAULT_BOUNDARY;
		}
		// The support is finite, a free scalar value always exists
		(DEFAULT_BOUNDARY..=char::MAX)
			.find(|c| !support.contains(c))
			.unwrap_or(DEFAULT_BOUNDARY)
	}

	/// Generates a new name.
	///
	/// Candidates are drawn from the model until one is not already known
	/// and has an accepted length. The accepted name is then remembered.
	///
	/// # Errors
	/// - `EmptyModel` if the model cannot produce output
	/// - `AttemptsExhausted` if `max_attempts` is set and reached
	///
	/// # Notes
	/// Without `max_attempts`, this loops until a name is accepted. A corpus
	/// that cannot yield new names of the accepted length never returns.
	pub fn generate(&mut self) -> Result<String> {
		let mut attempts: usize = 0;

		loop {
			if let Some(max_attempts) = self.config.max_attempts {
				if attempts >= max_attempts {
					warn!("No acceptable name after {} attempts", attempts);
					return Err(NameGenError::AttemptsExhausted(max_attempts));
				}
			}
			attempts += 1;

			// Anything longer than max_len is rejected, no need to finish it
			let symbols = match self.model.generate_within(self.config.max_len, &mut self.rng)? {
				Some(symbols) => symbols,
				None => {
					trace!("Rejected candidate: longer than {}", self.config.max_len);
					continue;
				}
			};

			if !self.config.accepts_length(symbols.len()) {
				trace!("Rejected candidate: length {}", symbols.len());
				continue;
			}

			let name: String = symbols.into_iter().collect();
			if self.names.contains(&name) {
				trace!("Rejected candidate: {} already known", name);
				continue;
			}

			trace!("Accepted {} after {} attempts", name, attempts);
			self.names.insert(name.clone());
			return Ok(name);
		}
	}

	/// Generates `count` new names.
	///
	/// All or nothing: if one of the calls fails, the names accepted earlier
	/// in the batch are forgotten again, so they stay available to later calls.
	pub fn generate_batch(&mut self, count: usize) -> Result<Vec<String>> {
		let mut batch = Vec::with_capacity(count);
		for _ in 0..count {
			match self.generate() {
				Ok(name) => batch.push(name),
				Err(e) => {
					for name in &batch {
						self.names.remove(name);
					}
					debug!("Batch failed after {} names, released them", batch.len());
					return Err(e);
				}
			}
		}
		Ok(batch)
	}

	/// Returns true if `name` is part of the corpus or was already generated.
	pub fn is_known(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	/// Number of known names (corpus and generated).
	pub fn known_count(&self) -> usize {
		self.names.len()
	}

	pub fn config(&self) -> &GeneratorConfig {
		&self.config
	}

	/// Underlying trained model.
	pub fn model(&self) -> &MarkovModel<char> {
		&self.model
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const CORPUS: [&str; 24] = [
		"adrian", "beatrix", "cedric", "delphine", "edgar", "fabienne", "gaston", "helene",
		"isidore", "josette", "kilian", "leonie", "marius", "noemie", "octave", "pauline",
		"quentin", "rosalie", "sylvain", "thibaut", "ursule", "valentin", "wilfried", "yvonne",
	];

	#[test]
	fn test_corpus_is_trimmed_and_deduplicated() {
		let generator = NameGenerator::from_seed(
			["  anna ", "", "   ", "boris", "anna", "\tcarla\n"],
			GeneratorConfig::default(),
			1,
		)
		.unwrap();

		assert_eq!(generator.known_count(), 3);
		assert!(generator.is_known("anna"));
		assert!(generator.is_known("boris"));
		assert!(generator.is_known("carla"));
		assert!(!generator.is_known(" anna "));

		// a n b o r i s c l + boundary
		assert_eq!(generator.model().support().len(), 10);
		assert_eq!(generator.model().boundary(), DEFAULT_BOUNDARY);
	}

	#[test]
	fn test_empty_corpus() {
		let result = NameGenerator::from_seed(["", "  "], GeneratorConfig::default(), 1);
		assert!(matches!(result, Err(NameGenError::EmptyCorpus)));
	}

	#[test]
	fn test_invalid_config() {
		let config = GeneratorConfig::default().with_length(9, 4);
		let result = NameGenerator::from_seed(CORPUS, config, 1);
		assert!(matches!(result, Err(NameGenError::InvalidLengthRange { .. })));
	}

	#[test]
	fn test_boundary_avoids_corpus_symbols() {
		let generator = NameGenerator::from_seed(["ab\0cd"], GeneratorConfig::default(), 1).unwrap();
		assert_ne!(generator.model().boundary(), '\0');
		assert!(!"ab\0cd".contains(generator.model().boundary()));
	}

	#[test]
	fn test_generated_names_are_new_and_within_bounds() {
		let mut generator = NameGenerator::from_seed(CORPUS, GeneratorConfig::default(), 42).unwrap();
		let mut emitted = HashSet::new();

		for _ in 0..50 {
			let name = generator.generate().unwrap();
			let len = name.chars().count();
			assert!((4..=8).contains(&len), "{name} has length {len}");
			assert!(!CORPUS.contains(&name.as_str()));
			assert!(emitted.insert(name.clone()), "{name} generated twice");
			assert!(generator.is_known(&name));
		}
		assert_eq!(generator.known_count(), CORPUS.len() + 50);
	}

	#[test]
	fn test_same_seed_same_names() {
		let mut first = NameGenerator::from_seed(CORPUS, GeneratorConfig::default(), 7).unwrap();
		let mut second = NameGenerator::from_seed(CORPUS, GeneratorConfig::default(), 7).unwrap();
		assert_eq!(first.generate_batch(10).unwrap(), second.generate_batch(10).unwrap());
	}

	#[test]
	fn test_reseed_restarts_sequence() {
		let mut reference = NameGenerator::from_seed(CORPUS, GeneratorConfig::default(), 3).unwrap();
		let expected = reference.generate_batch(5).unwrap();

		let mut generator = NameGenerator::from_seed(CORPUS, GeneratorConfig::default(), 99).unwrap();
		generator.reseed(3);
		let names = generator.generate_batch(5).unwrap();

		// Both start from the corpus names only
		assert_eq!(names, expected);
	}

	#[test]
	fn test_attempts_exhausted() {
		// Only "abcd" can be produced and it is already known
		let config = GeneratorConfig::default().with_order(1).with_prior(0.0).with_max_attempts(20);
		let mut generator = NameGenerator::from_seed(["abcd"], config, 5).unwrap();
		assert!(matches!(generator.generate(), Err(NameGenError::AttemptsExhausted(20))));
	}

	#[test]
	fn test_failed_batch_releases_accepted_names() {
		// Order 1 without prior: only "abcd", "abcde" and "bcde" have an
		// accepted length, so "abcde" is the single new name
		let config = GeneratorConfig::default().with_order(1).with_prior(0.0).with_max_attempts(500);
		let mut generator = NameGenerator::from_seed(["abcd", "bcde"], config, 21).unwrap();

		assert!(matches!(generator.generate_batch(2), Err(NameGenError::AttemptsExhausted(500))));
		assert!(!generator.is_known("abcde"));
		assert_eq!(generator.known_count(), 2);

		assert_eq!(generator.generate().unwrap(), "abcde");
		assert!(generator.is_known("abcde"));
	}

	#[test]
	fn test_custom_length_range() {
		let config = GeneratorConfig::default().with_length(2, 3).with_prior(0.01);
		let mut generator = NameGenerator::from_seed(["abc", "bca", "cab", "acb"], config, 12).unwrap();
		for name in generator.generate_batch(5).unwrap() {
			assert!((2..=3).contains(&name.chars().count()));
		}
	}

	#[test]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		for name in CORPUS {
			writeln!(file, "{name}").unwrap();
		}
		writeln!(file).unwrap();

		let mut generator = NameGenerator::from_file(file.path(), GeneratorConfig::default()).unwrap();
		assert_eq!(generator.known_count(), CORPUS.len());
		let name = generator.generate().unwrap();
		assert!(!CORPUS.contains(&name.as_str()));
	}

	#[test]
	fn test_from_missing_file() {
		let result = NameGenerator::from_file("./does/not/exist.txt", GeneratorConfig::default());
		assert!(matches!(result, Err(NameGenError::Io(_))));
	}
}
