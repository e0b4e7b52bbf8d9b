// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slider configuration supplied by the owner.

use smallvec::smallvec;

use crate::{DEFAULT_MIN_SEPARATION, Range, Result, Values};

/// When in-progress drags are reported to the owner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportCadence {
    /// Report once, when the drag ends.
    #[default]
    OnEnd,
    /// Report after every resolved move that changed a value, and once more at drag end.
    OnMove,
}

/// Owner-supplied configuration of a [`RangeSlider`](crate::RangeSlider).
///
/// ```
/// use understory_range_slider::{ReportCadence, SliderConfig};
///
/// let config = SliderConfig::default()
///     .with_range(0.0, 1000.0)
///     .with_values([0.0, 10.0])
///     .with_report(ReportCadence::OnMove);
/// assert_eq!(config.range().unwrap().max(), 1000.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SliderConfig {
    /// Lower bound of the value domain.
    pub min: f64,
    /// Upper bound of the value domain.
    pub max: f64,
    /// Initial handle values, one per handle, in handle order.
    pub values: Values,
    /// Ignore all input while set.
    pub disabled: bool,
    /// Minimum distance between adjacent handles, in percent, used whenever the
    /// handle width cannot be measured.
    pub min_separation: f64,
    /// When drags are reported to the owner.
    pub report: ReportCadence,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            values: smallvec![0.0, 100.0],
            disabled: false,
            min_separation: DEFAULT_MIN_SEPARATION,
            report: ReportCadence::OnEnd,
        }
    }
}

impl SliderConfig {
    /// Validated value domain.
    pub fn range(&self) -> Result<Range> {
        Range::new(self.min, self.max)
    }

    /// Sets the value domain.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets the initial handle values.
    #[must_use]
    pub fn with_values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    /// Sets the disabled flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the fallback minimum separation, in percent.
    ///
    /// Negative and non-finite values are treated as `0`.
    #[must_use]
    pub fn with_min_separation(mut self, min_separation: f64) -> Self {
        self.min_separation = min_separation;
        self
    }

    /// Sets the reporting cadence.
    #[must_use]
    pub fn with_report(mut self, report: ReportCadence) -> Self {
        self.report = report;
        self
    }

    /// Fallback separation with negative and non-finite values mapped to `0`.
    pub(crate) fn sanitized_separation(&self) -> f64 {
        if self.min_separation.is_finite() && self.min_separation > 0.0 {
            self.min_separation
        } else {
            0.0
        }
    }
}
