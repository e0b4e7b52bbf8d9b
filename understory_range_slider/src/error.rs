// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types surfaced to the owner of a slider.

use alloc::string::String;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = SliderError> = core::result::Result<T, E>;

/// Errors produced by the engine.
///
/// All variants describe programming errors on the caller's side. None of them are
/// transient, and the engine never retries or swallows them.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum SliderError {
    /// The configured range has `max <= min` or a non-finite bound.
    #[error("invalid range: max ({max}) must be greater than min ({min}) and both must be finite")]
    InvalidRange {
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },

    /// A position override hook returned something other than a finite number in `[0, 100]`.
    #[error(
        "position override returned {position} for handle {index}; valid positions are finite numbers between 0 and 100"
    )]
    InvalidOverride {
        /// Handle the override was asked about.
        index: usize,
        /// The rejected position.
        position: f64,
    },

    /// An externally supplied value could not be turned into a finite number.
    #[error("invalid value {input:?} for handle {index}")]
    InvalidValue {
        /// Handle the value was supplied for.
        index: usize,
        /// The rejected input, rendered as text.
        input: String,
    },
}
