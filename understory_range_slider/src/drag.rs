// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag sessions: the transient state of one handle being moved.
//!
//! A session is created on pointer-down or touch-start over a handle and captures what
//! the rest of the gesture needs:
//!
//! - the sliding handle index,
//! - the track's left edge and width at drag start,
//! - the active handle's width, if the host could measure it,
//! - the listeners attached for move/end delivery.
//!
//! Move coordinates are converted into proposed positions relative to the captured
//! track, with half the handle width applied as a grip offset so the handle stays at
//! the same point under the pointer instead of jumping to it. The offset is negative
//! for the first handle and positive for all others.

use kurbo::Rect;

use crate::{InputKind, InputSurface, ListenerGuard, PERCENT_FULL};

/// Minimum separation in percent used when the handle width is unknown.
pub const DEFAULT_MIN_SEPARATION: f64 = 12.0;

/// Environment measurements taken when a handle is grabbed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measure {
    /// Bounding box of the track, in the same coordinate space as pointer positions.
    pub track: Rect,
    /// Visual width of the grabbed handle, if known.
    pub handle_width: Option<f64>,
}

impl Measure {
    /// Creates a measurement.
    #[must_use]
    pub const fn new(track: Rect, handle_width: Option<f64>) -> Self {
        Self {
            track,
            handle_width,
        }
    }
}

/// Minimum separation in percent for a handle `handle_width` wide on a `track_width` track.
///
/// Falls back to `fallback` when either width is missing, non-finite, or not positive.
#[must_use]
pub fn separation_for(handle_width: Option<f64>, track_width: f64, fallback: f64) -> f64 {
    measured_separation(handle_width, track_width).unwrap_or(fallback)
}

fn measured_separation(handle_width: Option<f64>, track_width: f64) -> Option<f64> {
    match handle_width {
        Some(w) if w.is_finite() && w > 0.0 && track_width.is_finite() && track_width > 0.0 => {
            Some(w / track_width * PERCENT_FULL)
        }
        _ => None,
    }
}

/// Whether a handle is currently being moved, and which one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// The handle at this index is being dragged.
    Dragging(usize),
}

impl DragState {
    /// Returns `true` while a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// The index of the handle being dragged, if any.
    #[must_use]
    pub const fn sliding_index(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Dragging(index) => Some(*index),
        }
    }
}

/// State captured for the lifetime of a single drag.
#[derive(Debug)]
pub struct DragSession {
    index: usize,
    kind: InputKind,
    track_left: f64,
    track_width: f64,
    handle_width: Option<f64>,
    listeners: ListenerGuard,
}

impl DragSession {
    /// Starts a drag of handle `index`, attaching `kind` listeners to `surface`.
    pub fn begin<S: InputSurface + ?Sized>(
        surface: &mut S,
        index: usize,
        kind: InputKind,
        measure: Measure,
    ) -> Self {
        let listeners = ListenerGuard::acquire(surface, kind);
        Self {
            index,
            kind,
            track_left: measure.track.x0,
            track_width: measure.track.width(),
            handle_width: measure.handle_width,
            listeners,
        }
    }

    /// Index of the handle being dragged.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Input family this session listens to.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        self.kind
    }

    /// Left edge of the track captured at drag start.
    #[must_use]
    pub const fn track_left(&self) -> f64 {
        self.track_left
    }

    /// Width of the track captured at drag start.
    #[must_use]
    pub const fn track_width(&self) -> f64 {
        self.track_width
    }

    /// Width of the grabbed handle captured at drag start.
    #[must_use]
    pub const fn handle_width(&self) -> Option<f64> {
        self.handle_width
    }

    /// Whether the move/end listeners are still attached.
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listeners.is_attached()
    }

    /// Horizontal offset applied to pointer coordinates, in track units.
    #[must_use]
    pub fn grip_offset(&self) -> f64 {
        let half = match self.handle_width {
            Some(w) if w.is_finite() && w > 0.0 => w / 2.0,
            _ => 0.0,
        };
        if self.index == 0 { -half } else { half }
    }

    /// Proposed position in percent for a pointer at horizontal coordinate `x`.
    ///
    /// Returns `None` when the captured track has no usable width.
    #[must_use]
    pub fn proposed_position(&self, x: f64) -> Option<f64> {
        if !self.track_width.is_finite() || self.track_width <= 0.0 || !x.is_finite() {
            return None;
        }
        Some((x - self.track_left + self.grip_offset()) / self.track_width * PERCENT_FULL)
    }

    /// Separation derived from this session's handle width, if it could be measured.
    #[must_use]
    pub fn measured_separation(&self) -> Option<f64> {
        measured_separation(self.handle_width, self.track_width)
    }

    /// Minimum separation for this session's handle, or `fallback` if it is unmeasured.
    #[must_use]
    pub fn min_separation(&self, fallback: f64) -> f64 {
        self.measured_separation().unwrap_or(fallback)
    }

    /// Detaches the session's listeners. Safe to call more than once.
    pub fn release<S: InputSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.listeners.release(surface)
    }
}
