// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constraint resolution: where a handle may actually go.
//!
//! A proposed position for handle `i` is first offered to an optional
//! [`PositionOverride`], then clamped into the window left open by its neighbors:
//!
//! - lower bound: `positions[i - 1] + min_separation`, or `0` for the first handle;
//! - upper bound: `positions[i + 1] - min_separation`, or `100` for the last handle.
//!
//! The clamp is `max(min(proposed, upper), lower)`. When the neighbors are squeezed
//! closer than `min_separation` allows, `lower > upper` and the result collapses onto
//! the lower bound.

use crate::{PERCENT_EMPTY, PERCENT_FULL, Positions, Range, Result, SliderError, Values};

/// A hook that can veto or replace proposed handle positions.
///
/// The hook sees the handle index and the proposed position in percent, and returns
/// the position to use instead. Returning anything outside `[0, 100]` (including NaN)
/// is a programming error and fails with [`SliderError::InvalidOverride`].
///
/// Closures `FnMut(usize, f64) -> f64` implement this trait.
///
/// ```
/// use understory_range_slider::resolve_position;
///
/// // Snap every handle to multiples of 10%.
/// let mut snap = |_index: usize, proposed: f64| (proposed / 10.0).round() * 10.0;
/// let resolved = resolve_position(0, 23.0, &[0.0, 100.0], 12.0, Some(&mut snap));
/// assert_eq!(resolved.unwrap(), 20.0);
/// ```
pub trait PositionOverride {
    /// Returns the position to use for handle `index` instead of `proposed`.
    fn adjust(&mut self, index: usize, proposed: f64) -> f64;
}

impl<F> PositionOverride for F
where
    F: FnMut(usize, f64) -> f64,
{
    fn adjust(&mut self, index: usize, proposed: f64) -> f64 {
        self(index, proposed)
    }
}

/// Positions and values after a resolved move, always updated together.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// Handle positions in percent.
    pub positions: Positions,
    /// Handle values, derived from `positions`.
    pub values: Values,
}

impl Resolution {
    /// Builds a resolution whose values are derived from `positions` over `range`.
    #[must_use]
    pub fn from_positions(range: &Range, positions: Positions) -> Self {
        let values = positions.iter().map(|&p| range.value_at(p)).collect();
        Self { positions, values }
    }
}

/// Returns the `(lower, upper)` window handle `index` may occupy.
///
/// Missing neighbors fall back to the ends of the track.
#[must_use]
pub fn neighbor_bounds(index: usize, positions: &[f64], min_separation: f64) -> (f64, f64) {
    let lower = index
        .checked_sub(1)
        .and_then(|prev| positions.get(prev))
        .map_or(PERCENT_EMPTY, |&p| p + min_separation);
    let upper = index
        .checked_add(1)
        .and_then(|next| positions.get(next))
        .map_or(PERCENT_FULL, |&p| p - min_separation);
    (lower, upper)
}

/// Resolves the actual position of handle `index` given a proposed one.
///
/// ```
/// use understory_range_slider::resolve_position;
///
/// // The upper handle at 100% keeps the lower one at least 12% away.
/// assert_eq!(resolve_position(0, 95.0, &[0.0, 100.0], 12.0, None).unwrap(), 88.0);
/// ```
pub fn resolve_position(
    index: usize,
    proposed: f64,
    positions: &[f64],
    min_separation: f64,
    hook: Option<&mut dyn PositionOverride>,
) -> Result<f64> {
    let next = match hook {
        Some(hook) => {
            let adjusted = hook.adjust(index, proposed);
            if !(PERCENT_EMPTY..=PERCENT_FULL).contains(&adjusted) {
                return Err(SliderError::InvalidOverride {
                    index,
                    position: adjusted,
                });
            }
            adjusted
        }
        None => proposed,
    };

    Ok(clamp_between(index, next, positions, min_separation))
}

/// Clamps `proposed` into the neighbor window of handle `index`.
pub(crate) fn clamp_between(
    index: usize,
    proposed: f64,
    positions: &[f64],
    min_separation: f64,
) -> f64 {
    let (lower, upper) = neighbor_bounds(index, positions, min_separation);
    proposed.min(upper).max(lower)
}

/// Resolves every handle in ascending index order, in place.
///
/// Each handle sees its left neighbor's already-resolved position, so a set that
/// starts out crossed or squeezed ends up ordered and separated from left to right.
pub(crate) fn normalize(positions: &mut [f64], min_separation: f64) {
    for index in 0..positions.len() {
        positions[index] = clamp_between(index, positions[index], positions, min_separation);
    }
}

/// Resolves a move of handle `index` and returns the complete updated handle set.
///
/// The returned positions and values are consistent with each other; nothing is
/// written back to `positions`. An `index` past the end leaves the set unchanged.
pub fn resolve(
    range: &Range,
    index: usize,
    proposed: f64,
    positions: &[f64],
    min_separation: f64,
    hook: Option<&mut dyn PositionOverride>,
) -> Result<Resolution> {
    let actual = resolve_position(index, proposed, positions, min_separation, hook)?;
    let mut next = Positions::from_slice(positions);
    if let Some(slot) = next.get_mut(index) {
        *slot = actual;
    }
    Ok(Resolution::from_positions(range, next))
}
