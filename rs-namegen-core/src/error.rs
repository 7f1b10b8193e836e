use thiserror::Error;

/// Errors raised by the distributions, the Markov model and the name generator.
///
/// None of them is recovered internally: they surface directly to the caller.
/// Symbols are stored in their `Debug` rendering so the error type does not
/// depend on the symbol type of the model that raised it.
#[derive(Error, Debug)]
pub enum NameGenError {
	#[error("Symbol {0} is not part of the support")]
	UnknownSymbol(String),

	#[error("Boundary symbol {0} must not be part of the support")]
	BoundaryInSupport(String),

	#[error("Boundary symbol {0} found inside an observed sequence")]
	BoundaryInSequence(String),

	#[error("No observation available, the model cannot produce output")]
	EmptyModel,

	#[error("Prior must be finite and >= 0, got {0}")]
	InvalidPrior(f64),

	#[error("Observation count must be finite and >= 0, got {0}")]
	InvalidCount(f64),

	#[error("Invalid length range: min {min} > max {max}")]
	InvalidLengthRange { min: usize, max: usize },

	#[error("Corpus contains no usable name")]
	EmptyCorpus,

	#[error("No acceptable name after {0} attempts")]
	AttemptsExhausted(usize),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type of the crate.
pub type Result<T> = std::result::Result<T, NameGenError>;
