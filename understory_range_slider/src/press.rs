// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click recognition for presses on the bare track.
//!
//! Some hosts only deliver raw down/up events and leave click synthesis to the widget.
//! [`TrackPress`] turns a down/up pair on the track into a click when the pointer
//! stayed within a spatial tolerance for the whole press:
//!
//! 1. **No active press**: a release produces [`PressResult::Suppressed`].
//! 2. **Moved too far**: if any [`TrackPress::on_move`] went beyond the threshold, the
//!    press is no longer a click, even if the pointer comes back.
//! 3. **Released too far**: the release itself must be within the threshold of the
//!    down position.
//! 4. **No threshold** (`None`): every down/up pair is a click.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_range_slider::{PressResult, TrackPress};
//!
//! let track = Rect::new(0.0, 0.0, 200.0, 20.0);
//! let mut press = TrackPress::new();
//!
//! press.on_down(Point::new(60.0, 10.0), track);
//! assert!(!press.on_move(Point::new(62.0, 11.0)));
//! assert_eq!(
//!     press.on_up(Point::new(63.0, 10.0)),
//!     PressResult::Click { position: Point::new(63.0, 10.0), track },
//! );
//! ```

use kurbo::{Point, Rect};

/// Default movement tolerance, in pointer units, before a press stops being a click.
const DEFAULT_MOVE_THRESHOLD: f64 = 5.0;

/// Outcome of releasing a track press.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PressResult {
    /// The press was a click at `position` on `track`.
    Click {
        /// Release position.
        position: Point,
        /// Track bounding box captured at press time.
        track: Rect,
    },
    /// No click: there was no press, or the pointer wandered too far.
    Suppressed,
}

#[derive(Copy, Clone, Debug)]
struct Press {
    track: Rect,
    down_position: Point,
    distance_exceeded: bool,
}

/// Click recognizer for a single pointer pressing the track.
#[derive(Clone, Debug)]
pub struct TrackPress {
    press: Option<Press>,
    /// Distance the pointer may travel from the down position and still click.
    pub move_threshold: Option<f64>,
}

impl TrackPress {
    /// Creates a recognizer with a 5 unit movement tolerance.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(Some(DEFAULT_MOVE_THRESHOLD))
    }

    /// Creates a recognizer with a custom movement tolerance, or none at all.
    #[must_use]
    pub const fn with_threshold(move_threshold: Option<f64>) -> Self {
        Self {
            press: None,
            move_threshold,
        }
    }

    /// Records a press on the track, replacing any earlier one.
    pub fn on_down(&mut self, position: Point, track: Rect) {
        self.press = Some(Press {
            track,
            down_position: position,
            distance_exceeded: false,
        });
    }

    /// Tracks pointer movement during a press.
    ///
    /// Returns `true` only on the move that first exceeds the threshold.
    pub fn on_move(&mut self, position: Point) -> bool {
        let (Some(press), Some(threshold)) = (self.press.as_mut(), self.move_threshold) else {
            return false;
        };
        if press.distance_exceeded {
            return false;
        }
        if press.down_position.distance(position) > threshold {
            press.distance_exceeded = true;
            return true;
        }
        false
    }

    /// Ends the press and decides whether it was a click.
    pub fn on_up(&mut self, position: Point) -> PressResult {
        let Some(press) = self.press.take() else {
            return PressResult::Suppressed;
        };
        if press.distance_exceeded {
            return PressResult::Suppressed;
        }
        let within = self
            .move_threshold
            .is_none_or(|threshold| press.down_position.distance(position) <= threshold);
        if within {
            PressResult::Click {
                position,
                track: press.track,
            }
        } else {
            PressResult::Suppressed
        }
    }

    /// Drops the active press, if any. Returns `true` if one was active.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// Whether a press is in progress.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.press.is_some()
    }
}

impl Default for TrackPress {
    fn default() -> Self {
        Self::new()
    }
}
