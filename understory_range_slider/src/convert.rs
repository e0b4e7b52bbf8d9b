// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between domain values and track positions.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::{Result, SliderError};

/// Position of the start of the track, in percent.
pub const PERCENT_EMPTY: f64 = 0.0;
/// Position of the end of the track, in percent.
pub const PERCENT_FULL: f64 = 100.0;

/// A validated value domain.
///
/// Both bounds are finite and `min < max`, so the mapping methods never divide by zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Creates a range, rejecting `max <= min` and non-finite bounds.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(SliderError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound of the domain.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the domain.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Length of the domain (`max - min`, always positive).
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` along the track, in percent.
    ///
    /// Values outside the domain map outside `[0, 100]`; the constraint resolver is
    /// responsible for pulling them back onto the track.
    #[must_use]
    pub fn position_of(&self, value: f64) -> f64 {
        (value - self.min) / self.span() * PERCENT_FULL
    }

    /// Value at `percent` along the track.
    ///
    /// The extremes are exact: anything at or below `0` is `min` and anything at or above
    /// `100` is `max`. Positions strictly in between round to the nearest whole value.
    #[must_use]
    pub fn value_at(&self, percent: f64) -> f64 {
        if percent <= PERCENT_EMPTY {
            return self.min;
        }
        if percent >= PERCENT_FULL {
            return self.max;
        }
        (self.span() * percent / PERCENT_FULL + self.min).round()
    }
}

/// Converts a domain value into a track position in percent.
///
/// Fails with [`SliderError::InvalidRange`] when `max <= min`.
///
/// ```
/// use understory_range_slider::position_from_value;
///
/// assert_eq!(position_from_value(250.0, 0.0, 1000.0).unwrap(), 25.0);
/// assert!(position_from_value(5.0, 10.0, 10.0).is_err());
/// ```
pub fn position_from_value(value: f64, min: f64, max: f64) -> Result<f64> {
    Ok(Range::new(min, max)?.position_of(value))
}

/// Converts a track position in percent into a domain value.
///
/// See [`Range::value_at`] for the rounding contract.
///
/// ```
/// use understory_range_slider::value_from_position;
///
/// assert_eq!(value_from_position(0.0, 3.0, 7.5).unwrap(), 3.0);
/// assert_eq!(value_from_position(100.0, 3.0, 7.5).unwrap(), 7.5);
/// assert_eq!(value_from_position(33.3, 0.0, 1000.0).unwrap(), 333.0);
/// ```
pub fn value_from_position(percent: f64, min: f64, max: f64) -> Result<f64> {
    Ok(Range::new(min, max)?.value_at(percent))
}
