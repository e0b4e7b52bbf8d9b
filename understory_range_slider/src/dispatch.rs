// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click dispatch: which handle answers a click on the bare track.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Rect;

use crate::PERCENT_FULL;

/// Position in percent of horizontal coordinate `x` along `track`.
///
/// Returns `None` for a track without usable width. The result is not clamped.
#[must_use]
pub fn track_percent(x: f64, track: Rect) -> Option<f64> {
    let width = track.width();
    if !width.is_finite() || width <= 0.0 || !x.is_finite() {
        return None;
    }
    Some((x - track.x0) / width * PERCENT_FULL)
}

/// Index of the handle whose position is closest to `percent`.
///
/// Candidates are folded left to right and the incumbent is only replaced by a strictly
/// smaller distance, so ties go to the lowest index. Returns `None` when there are no
/// handles.
///
/// ```
/// use understory_range_slider::nearest_handle;
///
/// assert_eq!(nearest_handle(30.0, &[10.0, 90.0]), Some(0));
/// assert_eq!(nearest_handle(50.0, &[10.0, 90.0]), Some(0));
/// assert_eq!(nearest_handle(51.0, &[10.0, 90.0]), Some(1));
/// ```
#[must_use]
pub fn nearest_handle(percent: f64, positions: &[f64]) -> Option<usize> {
    positions
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (index, &position)| {
            let distance = (position - percent).abs();
            match best {
                Some((_, incumbent)) if distance >= incumbent => best,
                _ => Some((index, distance)),
            }
        })
        .map(|(index, _)| index)
}

/// Handle that answers a click at horizontal coordinate `x` on `track`.
///
/// Returns the handle index together with the click position in percent, ready to be
/// resolved like a one-step drag.
///
/// ```
/// use kurbo::Rect;
/// use understory_range_slider::dispatch_click;
///
/// let track = Rect::new(0.0, 0.0, 200.0, 20.0);
/// assert_eq!(dispatch_click(60.0, track, &[10.0, 90.0]), Some((0, 30.0)));
/// ```
#[must_use]
pub fn dispatch_click(x: f64, track: Rect, positions: &[f64]) -> Option<(usize, f64)> {
    let percent = track_percent(x, track)?;
    nearest_handle(percent, positions).map(|index| (index, percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_picks_the_closest_handle() {
        assert_eq!(nearest_handle(30.0, &[10.0, 90.0]), Some(0));
        assert_eq!(nearest_handle(75.0, &[10.0, 90.0]), Some(1));
        assert_eq!(nearest_handle(48.0, &[0.0, 40.0, 60.0, 100.0]), Some(1));
        assert_eq!(nearest_handle(53.0, &[0.0, 40.0, 60.0, 100.0]), Some(2));
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        assert_eq!(nearest_handle(50.0, &[30.0, 70.0]), Some(0));
        // Stacked handles: both at the same spot.
        assert_eq!(nearest_handle(90.0, &[40.0, 40.0]), Some(0));
        assert_eq!(nearest_handle(10.0, &[40.0, 40.0]), Some(0));
    }

    #[test]
    fn no_handles_no_target() {
        assert_eq!(nearest_handle(50.0, &[]), None);
    }

    #[test]
    fn track_percent_is_relative_to_left_edge() {
        let track = Rect::new(100.0, 0.0, 300.0, 10.0);
        assert_eq!(track_percent(160.0, track), Some(30.0));
        assert_eq!(track_percent(100.0, track), Some(0.0));
        assert_eq!(track_percent(350.0, track), Some(125.0));
        assert_eq!(track_percent(160.0, Rect::new(5.0, 0.0, 5.0, 10.0)), None);
    }

    #[test]
    fn dispatch_needs_a_track_and_a_handle() {
        let track = Rect::new(100.0, 0.0, 300.0, 10.0);
        assert_eq!(dispatch_click(280.0, track, &[10.0, 90.0]), Some((1, 90.0)));
        assert_eq!(dispatch_click(280.0, track, &[]), None);
        assert_eq!(dispatch_click(280.0, Rect::ZERO, &[10.0, 90.0]), None);
    }
}
