//! Top-level module for the name generation system.
//!
//! Layers, leaves first:
//! - Smoothed categorical distributions (`Categorical`)
//! - Variable-order Markov model with backoff (`MarkovModel`)
//! - Generator configuration (`GeneratorConfig`)
//! - Constrained name generator (`NameGenerator`)

/// Weighted categorical distribution over a fixed support.
///
/// Tracks observation counts on top of a uniform prior and supports
/// weighted random draws and relative-frequency queries.
pub mod categorical;

/// Smoothed variable-order Markov model.
///
/// One distribution per observed context, backoff to the longest known
/// suffix, generation terminated by a boundary symbol.
pub mod markov_model;

/// Name generator parameters (order, prior, length range, retry cap).
pub mod generator_config;

/// High-level name generator built on top of `MarkovModel`.
///
/// Derives the support from a corpus, trains the model and rejects
/// candidates that are already known or have an unaccepted length.
pub mod name_generator;
