// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciliation of owner-supplied values with the internal mirror.
//!
//! The owner controls the values, but the engine keeps its own copy so that drags see
//! a consistent snapshot. [`reconcile`] decides what an external update means:
//!
//! - While a drag is active, nothing: the internal mirror is the authority until the
//!   drag ends, so external updates cannot fight the gesture.
//! - Otherwise, each external value is [coerced](coerce) and compared with the internal
//!   one. Every index that differs is resolved like a completed drag, in ascending index
//!   order, so a change at index `0` tightens the window seen by index `1`.
//! - A value that cannot be coerced leaves that index at its previous value and is
//!   reported in [`Reconciliation::errors`]; the other indices still reconcile.
//! - An external set with a different number of values rebuilds the handle set.
//! - Whenever the owner's values differ from the result, the result is returned even
//!   if the internal set did not move, so the owner can adopt the corrected values.

use alloc::format;
use alloc::string::{String, ToString};

use smallvec::SmallVec;

use crate::constraint::{clamp_between, normalize};
use crate::{Positions, Range, Resolution, SliderError};

/// A value as supplied by the owner, before coercion.
///
/// Owners often hold user-edited text; this keeps parsing inside the engine so that
/// invalid input surfaces as [`SliderError::InvalidValue`] instead of a silent default.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// A number.
    Number(f64),
    /// Text that should parse as a number.
    Text(String),
    /// No value supplied.
    Missing,
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for RawValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Coerces the external value for handle `index` of `len` into a number.
///
/// - A missing or blank value becomes `range.min()` for the first handle and
///   `range.max()` for the last one. For interior handles it yields `None`, meaning
///   "keep the current value".
/// - Numeric text is parsed after trimming whitespace.
/// - Anything that is not a finite number fails with [`SliderError::InvalidValue`].
///
/// ```
/// use understory_range_slider::{Range, RawValue, coerce};
///
/// let range = Range::new(0.0, 1000.0).unwrap();
/// assert_eq!(coerce(0, 2, &RawValue::Missing, &range), Ok(Some(0.0)));
/// assert_eq!(coerce(1, 2, &"".into(), &range), Ok(Some(1000.0)));
/// assert_eq!(coerce(1, 2, &" 250 ".into(), &range), Ok(Some(250.0)));
/// assert!(coerce(1, 2, &"abc".into(), &range).is_err());
/// ```
pub fn coerce(
    index: usize,
    len: usize,
    raw: &RawValue,
    range: &Range,
) -> Result<Option<f64>, SliderError> {
    let blank = || {
        if index == 0 {
            Some(range.min())
        } else if index + 1 == len {
            Some(range.max())
        } else {
            None
        }
    };
    match raw {
        RawValue::Missing => Ok(blank()),
        RawValue::Number(value) if value.is_finite() => Ok(Some(*value)),
        RawValue::Number(value) => Err(SliderError::InvalidValue {
            index,
            input: format!("{value}"),
        }),
        RawValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(blank());
            }
            match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Some(value)),
                _ => Err(SliderError::InvalidValue {
                    index,
                    input: text.clone(),
                }),
            }
        }
    }
}

/// Outcome of reconciling external values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
    /// The handle set to adopt and report, if anything changed or the owner's values
    /// need correcting.
    pub resolution: Option<Resolution>,
    /// Values that could not be coerced; their handles kept their previous values.
    pub errors: SmallVec<[SliderError; 1]>,
}

impl Reconciliation {
    /// Returns `true` if the owner should be told about the handle set.
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.resolution.is_some()
    }
}

/// Reconciles `external` values against the `internal` handle set.
///
/// See the [module documentation](self) for the rules. `internal` is never modified;
/// the caller applies [`Reconciliation::resolution`] if present.
pub fn reconcile(
    external: &[RawValue],
    internal: &Resolution,
    range: &Range,
    min_separation: f64,
    drag_active: bool,
) -> Reconciliation {
    let mut outcome = Reconciliation::default();
    if drag_active {
        return outcome;
    }

    let len = external.len();
    let mut targets: SmallVec<[Option<f64>; 2]> = SmallVec::with_capacity(len);
    for (index, raw) in external.iter().enumerate() {
        match coerce(index, len, raw, range) {
            Ok(value) => targets.push(value),
            Err(err) => {
                outcome.errors.push(err);
                targets.push(None);
            }
        }
    }

    let positions = if len == internal.positions.len() {
        let mut positions = internal.positions.clone();
        for (index, target) in targets.iter().enumerate() {
            let Some(value) = *target else { continue };
            if value == internal.values[index] {
                continue;
            }
            let proposed = range.position_of(value);
            positions[index] = clamp_between(index, proposed, &positions, min_separation);
        }
        positions
    } else {
        // Handles that have no usable value keep their old position when there is one.
        let mut positions: Positions = targets
            .iter()
            .enumerate()
            .map(|(index, target)| match target {
                Some(value) => range.position_of(*value),
                None => internal
                    .positions
                    .get(index)
                    .copied()
                    .unwrap_or_else(|| range.position_of(range.min())),
            })
            .collect();
        normalize(&mut positions, min_separation);
        positions
    };

    let next = Resolution::from_positions(range, positions);
    // An owner value the engine could not adopt as-is still needs the corrected set.
    let corrected = !outcome.errors.is_empty()
        || targets
            .iter()
            .zip(&next.values)
            .any(|(&target, &value)| target.is_some_and(|wanted| wanted != value));
    if corrected || next != *internal {
        outcome.resolution = Some(next);
    }
    outcome
}
