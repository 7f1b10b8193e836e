//! Markov-chain name generation library.
//!
//! This crate learns a character-level model from a corpus of example names
//! and samples new, pronounceable-looking names from it:
//! - Weighted categorical distributions with additive smoothing
//! - Variable-order Markov model with backoff to shorter contexts
//! - Name generator rejecting known names and out-of-range lengths
//! - Corpus I/O helpers

/// Distributions, Markov model and name generator.
pub mod model;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (corpus loading, path helpers).
pub mod io;

pub use error::{NameGenError, Result};
pub use model::generator_config::GeneratorConfig;
pub use model::name_generator::NameGenerator;
