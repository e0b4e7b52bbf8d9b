// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_range_slider --heading-base-level=0

//! Understory Range Slider: a headless interaction engine for multi-handle range sliders.
//!
//! This crate turns pointer and touch input into ordered, clamped handle values over a
//! linear range, and keeps those values in sync with values supplied by an owner that
//! controls them. It does not draw anything; host frameworks render the track, handles,
//! and progress bar from the numeric state exposed here.
//!
//! The core concepts are:
//!
//! - [`Range`]: a validated `{min, max}` domain with the value ↔ percent mapping
//!   ([`position_from_value`] / [`value_from_position`]). Positions are percentages of
//!   the track length in `[0, 100]`; values at the extremes map exactly onto `min`/`max`
//!   and are rounded to whole numbers in between.
//! - [`resolve_position`] / [`resolve`]: the constraint resolver. A proposed position
//!   for one handle is passed through an optional [`PositionOverride`] hook and then
//!   clamped between its neighbors, keeping at least a minimum separation.
//! - [`DragSession`]: the transient state of a single in-flight drag (which handle, the
//!   track box and handle width captured at drag start). At most one exists at a time.
//! - [`reconcile`]: the value synchronizer. Externally supplied values are coerced,
//!   diffed against the internal mirror, and resolved in ascending index order. While a
//!   drag is active the internal mirror is the authority and external values are ignored.
//! - [`dispatch_click`] / [`nearest_handle`]: the click dispatcher, mapping a click on
//!   the bare track to the closest handle. [`TrackPress`] recognizes clicks from raw
//!   down/up pairs.
//! - [`RangeSlider`]: the engine instance tying these together behind a single
//!   [`RangeSlider::handle_event`] entry point, with listener attach/detach routed through
//!   an [`InputSurface`] as a scoped acquisition.
//!
//! ## Minimal example
//!
//! Drag the lower handle of a `0..=100` slider towards the upper one:
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_range_slider::{
//!     InputEvent, Measure, RangeSlider, SliderConfig, UpdateCause,
//! };
//!
//! // A 200px wide track; `()` is an input surface that needs no listener wiring.
//! let mut slider = RangeSlider::new(SliderConfig::default(), ()).unwrap();
//! let measure = Measure::new(Rect::new(0.0, 0.0, 200.0, 20.0), None);
//!
//! slider
//!     .handle_event(InputEvent::PointerDown {
//!         handle: 0,
//!         position: Point::new(0.0, 10.0),
//!         measure,
//!     })
//!     .unwrap();
//! // 190px is 95% of the track; the upper handle keeps the lower one 12% away.
//! slider
//!     .handle_event(InputEvent::PointerMove { position: Point::new(190.0, 10.0) })
//!     .unwrap();
//! let update = slider.handle_event(InputEvent::PointerUp).unwrap().unwrap();
//!
//! assert_eq!(update.cause, UpdateCause::DragEnd);
//! assert_eq!(update.values.as_slice(), &[88.0, 100.0]);
//! ```
//!
//! ## Authority
//!
//! Values are logically owned by the host. The engine mirrors them so drag computations
//! see a consistent snapshot:
//!
//! - While idle, the external values are the authority: [`RangeSlider::set_external_values`]
//!   resolves any change and reports the corrected set once.
//! - From drag start until drag end, the internal mirror is the authority and
//!   [`RangeSlider::set_external_values`] is a no-op.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `tracing`: emits structured [`tracing`](https://docs.rs/tracing) events at drag,
//!   click, and reconciliation transitions.
//! - `serde`: derives `Serialize`/`Deserialize` for [`SliderConfig`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod constraint;
mod convert;
mod dispatch;
mod drag;
mod error;
mod listener;
mod press;
mod slider;
mod sync;

pub use config::{ReportCadence, SliderConfig};
pub use constraint::{PositionOverride, Resolution, neighbor_bounds, resolve, resolve_position};
pub use convert::{PERCENT_EMPTY, PERCENT_FULL, Range, position_from_value, value_from_position};
pub use dispatch::{dispatch_click, nearest_handle, track_percent};
pub use drag::{DEFAULT_MIN_SEPARATION, DragSession, DragState, Measure, separation_for};
pub use error::{Result, SliderError};
pub use listener::{InputKind, InputSurface, ListenerGuard};
pub use press::{PressResult, TrackPress};
pub use slider::{
    HandleBounds, InputEvent, ProgressSpan, RangeSlider, SyncOutcome, UpdateCause, ValuesUpdated,
};
pub use sync::{RawValue, Reconciliation, coerce, reconcile};

use smallvec::SmallVec;

/// Number of handles stored inline before spilling to the heap.
pub const INLINE_HANDLES: usize = 2;

/// Handle values, index-aligned with handle order.
pub type Values = SmallVec<[f64; INLINE_HANDLES]>;

/// Handle positions as percentages of the track length, index-aligned with handle order.
pub type Positions = SmallVec<[f64; INLINE_HANDLES]>;
