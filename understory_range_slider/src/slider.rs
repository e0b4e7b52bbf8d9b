// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine instance: input events in, resolved values out.
//!
//! [`RangeSlider`] owns the internal mirror of the handle set, the current
//! [`DragSession`] (if any), and the [`InputSurface`] used for listener wiring.
//! Hosts feed it one [`InputEvent`] at a time, in arrival order; each call runs the
//! whole transition synchronously and returns the update to report, if any.
//!
//! ## Transitions
//!
//! - `Idle → Dragging(i)`: [`InputEvent::PointerDown`] or a single-contact
//!   [`InputEvent::TouchStart`] on handle `i`. Listeners for the matching
//!   [`InputKind`] are attached.
//! - `Dragging(i) → Dragging(i)`: a move of the session's kind. The pointer is
//!   converted to a proposed position and resolved; the internal mirror is updated.
//!   With [`ReportCadence::OnMove`] each change is also reported.
//! - `Dragging(i) → Idle`: the end event of the session's kind, or any touch event
//!   with more than one contact. Listeners are detached and the final values are
//!   reported once.
//! - `Dragging(i) → Idle` on error: an override hook failure aborts the drag,
//!   detaches listeners, and returns the error without a report.
//! - [`RangeSlider::cancel`] (and dropping the slider) forces `Idle` and detaches
//!   listeners without a report.
//!
//! A range change from [`RangeSlider::reconfigure`] that arrives mid-drag is held
//! until the session closes, so the handle set never shifts under the gesture.
//!
//! Starting a drag while one is active, or with more than one touch contact, is
//! ignored.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::constraint::normalize;
use crate::{
    DragSession, DragState, InputKind, InputSurface, Measure, PositionOverride, Positions,
    PressResult, Range, RawValue, ReportCadence, Resolution, Result, SliderConfig, SliderError,
    TrackPress, Values, dispatch_click, reconcile, resolve,
};

/// An input event delivered by the host.
///
/// Coordinates are in the same space as the measured track box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// A pointer went down on a handle.
    PointerDown {
        /// Index of the handle under the pointer.
        handle: usize,
        /// Pointer position.
        position: Point,
        /// Track and handle measurements at press time.
        measure: Measure,
    },
    /// The pointer moved.
    PointerMove {
        /// Pointer position.
        position: Point,
    },
    /// The pointer was released.
    PointerUp,
    /// A touch started on a handle.
    TouchStart {
        /// Index of the handle under the touch.
        handle: usize,
        /// Position of the first changed contact.
        position: Point,
        /// Number of simultaneous contacts carried by the event.
        contacts: usize,
        /// Track and handle measurements at touch time.
        measure: Measure,
    },
    /// A touch contact moved.
    TouchMove {
        /// Position of the first changed contact.
        position: Point,
        /// Number of simultaneous contacts carried by the event.
        contacts: usize,
    },
    /// The touch ended.
    TouchEnd,
    /// A pointer went down on the bare track, away from every handle.
    TrackDown {
        /// Pointer position.
        position: Point,
        /// Track bounding box.
        track: Rect,
    },
    /// A pointer that went down on the bare track was released.
    TrackUp {
        /// Pointer position.
        position: Point,
    },
    /// The host recognized a click on the bare track itself.
    TrackClick {
        /// Click position.
        position: Point,
        /// Track bounding box.
        track: Rect,
    },
}

/// Why the owner is being told about new values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UpdateCause {
    /// A drag moved a handle; only with [`ReportCadence::OnMove`].
    DragMove,
    /// A drag ended.
    DragEnd,
    /// A click on the track moved the nearest handle.
    Click,
    /// External values were reconciled.
    External,
}

/// The public state reported to the owner.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuesUpdated {
    /// Lower bound of the domain.
    pub min: f64,
    /// Upper bound of the domain.
    pub max: f64,
    /// Handle values in handle order.
    pub values: Values,
    /// What caused the update.
    pub cause: UpdateCause,
}

/// Neighbor-bounded value limits of one handle, for accessibility labeling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HandleBounds {
    /// Smallest value the handle can currently take.
    pub min: f64,
    /// Largest value the handle can currently take.
    pub max: f64,
    /// Current value.
    pub now: f64,
}

/// The filled part of the track, in percent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProgressSpan {
    /// Left edge of the filled segment.
    pub start: f64,
    /// Width of the filled segment.
    pub width: f64,
}

/// Result of pushing owner values into the slider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncOutcome {
    /// The update reported to the owner, if the handle set changed or the owner's
    /// values needed correcting.
    pub update: Option<ValuesUpdated>,
    /// Values that could not be used; their handles kept their previous values.
    pub errors: SmallVec<[SliderError; 1]>,
}

type Observer = Box<dyn FnMut(&ValuesUpdated)>;

/// A headless multi-handle range slider.
///
/// See the [module documentation](self) for the state machine.
pub struct RangeSlider<S: InputSurface> {
    range: Range,
    handles: Resolution,
    disabled: bool,
    fallback_separation: f64,
    measured_separation: Option<f64>,
    pending_range: Option<Range>,
    report: ReportCadence,
    drag: Option<DragSession>,
    press: TrackPress,
    surface: S,
    position_override: Option<Box<dyn PositionOverride>>,
    observer: Option<Observer>,
}

impl<S: InputSurface> fmt::Debug for RangeSlider<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeSlider")
            .field("range", &self.range)
            .field("handles", &self.handles)
            .field("disabled", &self.disabled)
            .field("min_separation", &self.min_separation())
            .field("pending_range", &self.pending_range)
            .field("report", &self.report)
            .field("drag", &self.drag)
            .field("press", &self.press)
            .field("has_override", &self.position_override.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: InputSurface> RangeSlider<S> {
    /// Creates a slider from `config`, wiring drag listeners through `surface`.
    ///
    /// Fails with [`SliderError::InvalidRange`] if the configured range is invalid.
    /// Initial values are resolved in ascending index order, so crossed or squeezed
    /// values come out ordered and separated.
    pub fn new(config: SliderConfig, surface: S) -> Result<Self> {
        let range = config.range()?;
        let separation = config.sanitized_separation();
        let mut positions: Positions = config
            .values
            .iter()
            .map(|&value| range.position_of(value))
            .collect();
        normalize(&mut positions, separation);

        Ok(Self {
            range,
            handles: Resolution::from_positions(&range, positions),
            disabled: config.disabled,
            fallback_separation: separation,
            measured_separation: None,
            pending_range: None,
            report: config.report,
            drag: None,
            press: TrackPress::new(),
            surface,
            position_override: None,
            observer: None,
        })
    }

    /// Registers the owner callback invoked with every reported update.
    pub fn on_values_updated(&mut self, observer: impl FnMut(&ValuesUpdated) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Installs a hook that may veto or replace positions proposed by drags and clicks.
    pub fn set_position_override(&mut self, hook: impl PositionOverride + 'static) {
        self.position_override = Some(Box::new(hook));
    }

    /// Removes the position override hook.
    pub fn clear_position_override(&mut self) {
        self.position_override = None;
    }

    /// Processes one input event.
    ///
    /// Returns the update that was reported to the owner, if any.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<Option<ValuesUpdated>> {
        if self.disabled {
            #[cfg(feature = "tracing")]
            tracing::debug!(?event, "slider disabled; input ignored");
            return Ok(None);
        }

        match event {
            InputEvent::PointerDown {
                handle, measure, ..
            } => {
                self.begin_drag(handle, InputKind::Pointer, measure);
                Ok(None)
            }
            InputEvent::TouchStart {
                handle,
                contacts,
                measure,
                ..
            } => {
                if contacts > 1 {
                    return Ok(self.abort_for_multi_touch());
                }
                self.begin_drag(handle, InputKind::Touch, measure);
                Ok(None)
            }
            InputEvent::PointerMove { position } => {
                if self.drag_kind() == Some(InputKind::Pointer) {
                    return self.drag_to(position.x);
                }
                self.press.on_move(position);
                Ok(None)
            }
            InputEvent::TouchMove { position, contacts } => {
                if contacts > 1 {
                    return Ok(self.abort_for_multi_touch());
                }
                if self.drag_kind() == Some(InputKind::Touch) {
                    return self.drag_to(position.x);
                }
                Ok(None)
            }
            InputEvent::PointerUp => Ok(self.end_drag_of(InputKind::Pointer)),
            InputEvent::TouchEnd => Ok(self.end_drag_of(InputKind::Touch)),
            InputEvent::TrackDown { position, track } => {
                if self.drag.is_none() {
                    self.press.on_down(position, track);
                }
                Ok(None)
            }
            InputEvent::TrackUp { position } => match self.press.on_up(position) {
                PressResult::Click { position, track } => self.click(position, track),
                PressResult::Suppressed => Ok(None),
            },
            InputEvent::TrackClick { position, track } => {
                if self.drag.is_some() {
                    return Ok(None);
                }
                self.click(position, track)
            }
        }
    }

    /// Pushes owner-supplied values into the slider.
    ///
    /// While a drag is active this is a no-op. Otherwise changed values are resolved
    /// in ascending index order. If the handle set changed, or any supplied value could
    /// not be adopted as given, the corrected set is reported once with
    /// [`UpdateCause::External`].
    pub fn set_external_values(&mut self, external: &[RawValue]) -> SyncOutcome {
        let reconciliation = reconcile(
            external,
            &self.handles,
            &self.range,
            self.min_separation(),
            self.drag.is_some(),
        );

        #[cfg(feature = "tracing")]
        for err in &reconciliation.errors {
            tracing::warn!(%err, "external value rejected");
        }

        let update = reconciliation.resolution.map(|resolution| {
            self.handles = resolution;
            #[cfg(feature = "tracing")]
            tracing::debug!(values = ?self.handles.values, "external values reconciled");
            self.notify(UpdateCause::External)
        });
        SyncOutcome {
            update,
            errors: reconciliation.errors,
        }
    }

    /// Applies a new configuration from the owner.
    ///
    /// An invalid range fails with [`SliderError::InvalidRange`] and leaves the slider
    /// untouched. Otherwise positions are re-derived from the current values under the
    /// new range and separation, and then the configured values are reconciled. The
    /// fallback separation takes effect at once unless a handle width has been measured.
    ///
    /// During a drag the range change is held until the drag ends, and the configured
    /// values are ignored like any other external values.
    pub fn reconfigure(&mut self, config: &SliderConfig) -> Result<SyncOutcome> {
        let range = config.range()?;
        self.fallback_separation = config.sanitized_separation();
        self.report = config.report;

        let mut outcome = SyncOutcome {
            update: self.set_disabled(config.disabled),
            errors: SmallVec::new(),
        };

        if self.drag.is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(?range, "drag active; range change deferred");
            self.pending_range = Some(range);
            return Ok(outcome);
        }

        let before = self.handles.values.clone();
        self.apply_range(range);

        let external: SmallVec<[RawValue; 2]> =
            config.values.iter().copied().map(RawValue::from).collect();
        let synced = self.set_external_values(&external);
        outcome.errors = synced.errors;
        if synced.update.is_some() {
            outcome.update = synced.update;
        } else if self.handles.values != before {
            outcome.update = Some(self.notify(UpdateCause::External));
        }
        Ok(outcome)
    }

    /// Enables or disables input.
    ///
    /// Disabling during a drag ends the drag normally; the returned update is its
    /// final report.
    pub fn set_disabled(&mut self, disabled: bool) -> Option<ValuesUpdated> {
        self.disabled = disabled;
        if !disabled {
            return None;
        }
        self.press.cancel();
        self.end_drag()
    }

    /// Forces the slider back to idle, detaching any drag listeners.
    ///
    /// Nothing is reported. This is the unmount path; it is also run on drop.
    /// Returns `true` if a drag was active.
    pub fn cancel(&mut self) -> bool {
        self.press.cancel();
        let closed = self.close_session();
        #[cfg(feature = "tracing")]
        if closed {
            tracing::debug!("drag cancelled without report");
        }
        closed
    }

    /// Current drag state.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.drag
            .as_ref()
            .map_or(DragState::Idle, |session| DragState::Dragging(session.index()))
    }

    /// The active drag session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Handle positions in percent.
    #[must_use]
    pub fn positions(&self) -> &[f64] {
        &self.handles.positions
    }

    /// Handle values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.handles.values
    }

    /// Number of handles.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.handles.positions.len()
    }

    /// The value domain.
    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Whether input is ignored.
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Separation currently enforced between adjacent handles, in percent.
    ///
    /// This is derived from the last measured handle width, or the configured
    /// fallback until a handle has been measured.
    #[must_use]
    pub fn min_separation(&self) -> f64 {
        self.measured_separation.unwrap_or(self.fallback_separation)
    }

    /// The input surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Neighbor-bounded limits of handle `index`, for accessibility attributes.
    #[must_use]
    pub fn handle_bounds(&self, index: usize) -> Option<HandleBounds> {
        let values = &self.handles.values;
        let now = *values.get(index)?;
        let min = index
            .checked_sub(1)
            .and_then(|prev| values.get(prev))
            .map_or(self.range.min(), |&prev| prev.max(self.range.min()));
        let max = values
            .get(index + 1)
            .map_or(self.range.max(), |&next| next.min(self.range.max()));
        Some(HandleBounds { min, max, now })
    }

    /// The filled segment of the track.
    ///
    /// Spans from the first to the last handle; a single handle fills from the start
    /// of the track.
    #[must_use]
    pub fn progress_span(&self) -> ProgressSpan {
        match self.handles.positions.as_slice() {
            [] => ProgressSpan::default(),
            [only] => ProgressSpan {
                start: 0.0,
                width: *only,
            },
            [first, .., last] => ProgressSpan {
                start: *first,
                width: last - first,
            },
        }
    }

    fn drag_kind(&self) -> Option<InputKind> {
        self.drag.as_ref().map(DragSession::kind)
    }

    fn begin_drag(&mut self, index: usize, kind: InputKind, measure: Measure) {
        if self.drag.is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, "drag already active; start ignored");
            return;
        }
        if index >= self.handle_count() {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, "no such handle; start ignored");
            return;
        }
        self.press.cancel();
        let session = DragSession::begin(&mut self.surface, index, kind, measure);
        self.measured_separation = session.measured_separation();
        #[cfg(feature = "tracing")]
        tracing::debug!(index, ?kind, min_separation = self.min_separation(), "drag started");
        self.drag = Some(session);
    }

    fn drag_to(&mut self, x: f64) -> Result<Option<ValuesUpdated>> {
        let Some(session) = self.drag.as_ref() else {
            return Ok(None);
        };
        let index = session.index();
        let min_separation = self.min_separation();
        let Some(proposed) = session.proposed_position(x) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, "track has no width; move ignored");
            return Ok(None);
        };

        let hook = self
            .position_override
            .as_mut()
            .map(|hook| &mut **hook as &mut dyn PositionOverride);
        let resolution = match resolve(
            &self.range,
            index,
            proposed,
            &self.handles.positions,
            min_separation,
            hook,
        ) {
            Ok(resolution) => resolution,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%err, index, "override failed; drag aborted");
                self.cancel();
                return Err(err);
            }
        };

        let changed = resolution != self.handles;
        self.handles = resolution;
        #[cfg(feature = "tracing")]
        tracing::trace!(index, proposed, position = self.handles.positions[index], "drag moved");

        if changed && self.report == ReportCadence::OnMove {
            return Ok(Some(self.notify(UpdateCause::DragMove)));
        }
        Ok(None)
    }

    fn end_drag_of(&mut self, kind: InputKind) -> Option<ValuesUpdated> {
        if self.drag_kind() != Some(kind) {
            return None;
        }
        self.end_drag()
    }

    fn abort_for_multi_touch(&mut self) -> Option<ValuesUpdated> {
        #[cfg(feature = "tracing")]
        if self.drag.is_some() {
            tracing::debug!("multi-touch; drag aborted");
        } else {
            tracing::debug!("multi-touch start ignored");
        }
        self.end_drag()
    }

    fn end_drag(&mut self) -> Option<ValuesUpdated> {
        if !self.close_session() {
            return None;
        }
        Some(self.notify(UpdateCause::DragEnd))
    }

    /// Detaches the active session and applies a range change held back during it.
    fn close_session(&mut self) -> bool {
        let Some(mut session) = self.drag.take() else {
            return false;
        };
        session.release(&mut self.surface);
        if let Some(range) = self.pending_range.take() {
            self.apply_range(range);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(index = session.index(), values = ?self.handles.values, "drag ended");
        true
    }

    fn apply_range(&mut self, range: Range) {
        self.range = range;
        let mut positions: Positions = self
            .handles
            .values
            .iter()
            .map(|&value| range.position_of(value))
            .collect();
        normalize(&mut positions, self.min_separation());
        self.handles = Resolution::from_positions(&range, positions);
    }

    fn click(&mut self, position: Point, track: Rect) -> Result<Option<ValuesUpdated>> {
        let Some((index, percent)) = dispatch_click(position.x, track, &self.handles.positions)
        else {
            return Ok(None);
        };
        let min_separation = self.min_separation();

        let hook = self
            .position_override
            .as_mut()
            .map(|hook| &mut **hook as &mut dyn PositionOverride);
        self.handles = resolve(
            &self.range,
            index,
            percent,
            &self.handles.positions,
            min_separation,
            hook,
        )?;
        #[cfg(feature = "tracing")]
        tracing::debug!(index, percent, values = ?self.handles.values, "track click dispatched");
        Ok(Some(self.notify(UpdateCause::Click)))
    }

    fn notify(&mut self, cause: UpdateCause) -> ValuesUpdated {
        let update = ValuesUpdated {
            min: self.range.min(),
            max: self.range.max(),
            values: self.handles.values.clone(),
            cause,
        };
        if let Some(observer) = self.observer.as_mut() {
            observer(&update);
        }
        update
    }
}

impl<S: InputSurface> Drop for RangeSlider<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    /// Records attach/detach calls so tests can check pairing.
    #[derive(Debug, Default)]
    struct Surface {
        attached: Vec<InputKind>,
        detached: Vec<InputKind>,
    }

    impl Surface {
        fn live(&self) -> usize {
            self.attached.len() - self.detached.len()
        }
    }

    impl InputSurface for Surface {
        fn attach(&mut self, kind: InputKind) {
            self.attached.push(kind);
        }

        fn detach(&mut self, kind: InputKind) {
            self.detached.push(kind);
        }
    }

    const TRACK: Rect = Rect::new(0.0, 0.0, 200.0, 24.0);

    fn slider(config: SliderConfig) -> RangeSlider<Surface> {
        RangeSlider::new(config, Surface::default()).unwrap()
    }

    fn pointer_down(handle: usize, x: f64) -> InputEvent {
        InputEvent::PointerDown {
            handle,
            position: Point::new(x, 12.0),
            measure: Measure::new(TRACK, None),
        }
    }

    fn pointer_move(x: f64) -> InputEvent {
        InputEvent::PointerMove {
            position: Point::new(x, 12.0),
        }
    }

    fn touch_start(handle: usize, x: f64, contacts: usize) -> InputEvent {
        InputEvent::TouchStart {
            handle,
            position: Point::new(x, 12.0),
            contacts,
            measure: Measure::new(TRACK, None),
        }
    }

    fn touch_move(x: f64, contacts: usize) -> InputEvent {
        InputEvent::TouchMove {
            position: Point::new(x, 12.0),
            contacts,
        }
    }

    #[test]
    fn drag_clamps_against_the_upper_neighbor() {
        let mut s = slider(SliderConfig::default());
        assert_eq!(s.handle_event(pointer_down(0, 0.0)).unwrap(), None);
        assert_eq!(s.state(), DragState::Dragging(0));
        assert_eq!(s.surface().attached, [InputKind::Pointer]);

        // 190px of 200px is 95%.
        assert_eq!(s.handle_event(pointer_move(190.0)).unwrap(), None);
        assert_eq!(s.positions(), &[88.0, 100.0]);

        let update = s.handle_event(InputEvent::PointerUp).unwrap().unwrap();
        assert_eq!(update.values.as_slice(), &[88.0, 100.0]);
        assert_eq!(update.cause, UpdateCause::DragEnd);
        assert_eq!((update.min, update.max), (0.0, 100.0));
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(s.surface().live(), 0);
    }

    #[test]
    fn upper_handle_cannot_cross_the_lower_one() {
        let mut s = slider(SliderConfig::default().with_values([40.0, 90.0]));
        s.handle_event(pointer_down(1, 180.0)).unwrap();
        s.handle_event(pointer_move(-50.0)).unwrap();
        s.handle_event(InputEvent::PointerUp).unwrap();
        assert_eq!(s.values(), &[40.0, 52.0]);
    }

    #[test]
    fn measured_handle_width_drives_separation_and_grip() {
        let mut s = slider(SliderConfig::default());
        s.handle_event(InputEvent::PointerDown {
            handle: 0,
            position: Point::new(0.0, 12.0),
            measure: Measure::new(TRACK, Some(20.0)),
        })
        .unwrap();
        // A 20px handle on a 200px track is 10%.
        assert_eq!(s.min_separation(), 10.0);

        // 110px minus 10px of grip is 100px: 50%.
        s.handle_event(pointer_move(110.0)).unwrap();
        assert_eq!(s.positions(), &[50.0, 100.0]);

        s.handle_event(pointer_move(400.0)).unwrap();
        assert_eq!(s.positions(), &[90.0, 100.0]);
    }

    #[test]
    fn on_end_cadence_reports_exactly_once() {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let mut s = slider(SliderConfig::default());
        let sink = Rc::clone(&reports);
        s.on_values_updated(move |update| sink.borrow_mut().push(update.clone()));

        s.handle_event(pointer_down(0, 0.0)).unwrap();
        for x in [20.0, 40.0, 60.0] {
            assert_eq!(s.handle_event(pointer_move(x)).unwrap(), None);
        }
        s.handle_event(InputEvent::PointerUp).unwrap();
        // A stray up after the drag is a no-op.
        assert_eq!(s.handle_event(InputEvent::PointerUp).unwrap(), None);

        let reports = reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].values.as_slice(), &[30.0, 100.0]);
    }

    #[test]
    fn on_move_cadence_reports_changes_and_the_end() {
        let mut s = slider(SliderConfig::default().with_report(ReportCadence::OnMove));
        s.handle_event(pointer_down(0, 0.0)).unwrap();

        let first = s.handle_event(pointer_move(20.0)).unwrap().unwrap();
        assert_eq!(first.cause, UpdateCause::DragMove);
        assert_eq!(first.values.as_slice(), &[10.0, 100.0]);

        // Same spot again: nothing changed, nothing reported.
        assert_eq!(s.handle_event(pointer_move(20.0)).unwrap(), None);

        let end = s.handle_event(InputEvent::PointerUp).unwrap().unwrap();
        assert_eq!(end.cause, UpdateCause::DragEnd);
    }

    #[test]
    fn multi_touch_aborts_and_detaches() {
        for handle in [0, 1] {
            let mut s = slider(SliderConfig::default().with_values([20.0, 80.0]));
            s.handle_event(touch_start(handle, 100.0, 1)).unwrap();
            assert_eq!(s.state(), DragState::Dragging(handle));
            assert_eq!(s.surface().attached, [InputKind::Touch]);

            let update = s.handle_event(touch_move(120.0, 2)).unwrap().unwrap();
            assert_eq!(update.cause, UpdateCause::DragEnd);
            assert_eq!(s.state(), DragState::Idle);
            assert_eq!(s.surface().detached, [InputKind::Touch]);
            // Values are what they were before the aborting event.
            assert_eq!(update.values.as_slice(), &[20.0, 80.0]);
        }
    }

    #[test]
    fn multi_touch_start_is_rejected() {
        let mut s = slider(SliderConfig::default());
        assert_eq!(s.handle_event(touch_start(0, 0.0, 2)).unwrap(), None);
        assert_eq!(s.state(), DragState::Idle);
        assert!(s.surface().attached.is_empty());
    }

    #[test]
    fn second_start_does_not_open_a_second_session() {
        let mut s = slider(SliderConfig::default());
        s.handle_event(touch_start(0, 0.0, 1)).unwrap();
        s.handle_event(touch_start(1, 200.0, 1)).unwrap();
        s.handle_event(pointer_down(1, 200.0)).unwrap();
        assert_eq!(s.state(), DragState::Dragging(0));
        assert_eq!(s.surface().attached.len(), 1);
    }

    #[test]
    fn moves_of_the_other_kind_are_not_delivered() {
        let mut s = slider(SliderConfig::default());
        s.handle_event(touch_start(0, 0.0, 1)).unwrap();
        s.handle_event(pointer_move(100.0)).unwrap();
        assert_eq!(s.positions(), &[0.0, 100.0]);
        // Nor does a pointer-up end a touch drag.
        assert_eq!(s.handle_event(InputEvent::PointerUp).unwrap(), None);
        assert!(s.state().is_dragging());

        s.handle_event(touch_move(100.0, 1)).unwrap();
        assert_eq!(s.positions(), &[50.0, 100.0]);
        assert!(s.handle_event(InputEvent::TouchEnd).unwrap().is_some());
    }

    #[test]
    fn invalid_override_aborts_the_drag() {
        let mut s = slider(SliderConfig::default());
        s.set_position_override(|_: usize, proposed: f64| {
            if proposed > 50.0 { f64::NAN } else { proposed }
        });
        s.handle_event(pointer_down(0, 0.0)).unwrap();
        s.handle_event(pointer_move(60.0)).unwrap();
        assert_eq!(s.positions(), &[30.0, 100.0]);

        let err = s.handle_event(pointer_move(150.0)).unwrap_err();
        assert!(matches!(err, SliderError::InvalidOverride { index: 0, .. }));
        assert_eq!(s.state(), DragState::Idle);
        assert_eq!(s.surface().live(), 0);
        // Positions stay at the last good resolution.
        assert_eq!(s.positions(), &[30.0, 100.0]);
    }

    #[test]
    fn track_click_moves_the_nearest_handle() {
        let mut s = slider(SliderConfig::default().with_values([10.0, 90.0]));
        let update = s
            .handle_event(InputEvent::TrackClick {
                position: Point::new(60.0, 12.0),
                track: TRACK,
            })
            .unwrap()
            .unwrap();
        assert_eq!(update.cause, UpdateCause::Click);
        assert_eq!(update.values.as_slice(), &[30.0, 90.0]);
        assert_eq!(s.state(), DragState::Idle);
        assert!(s.surface().attached.is_empty());
    }

    #[test]
    fn track_press_becomes_a_click_only_when_still() {
        let mut s = slider(SliderConfig::default().with_values([10.0, 90.0]));

        s.handle_event(InputEvent::TrackDown {
            position: Point::new(160.0, 12.0),
            track: TRACK,
        })
        .unwrap();
        s.handle_event(pointer_move(162.0)).unwrap();
        let update = s
            .handle_event(InputEvent::TrackUp {
                position: Point::new(162.0, 12.0),
            })
            .unwrap()
            .unwrap();
        assert_eq!(update.values.as_slice(), &[10.0, 81.0]);

        s.handle_event(InputEvent::TrackDown {
            position: Point::new(20.0, 12.0),
            track: TRACK,
        })
        .unwrap();
        s.handle_event(pointer_move(90.0)).unwrap();
        let suppressed = s
            .handle_event(InputEvent::TrackUp {
                position: Point::new(21.0, 12.0),
            })
            .unwrap();
        assert_eq!(suppressed, None);
        assert_eq!(s.values(), &[10.0, 81.0]);
    }

    #[test]
    fn external_update_is_resolved_and_reported_once() {
        let count = Rc::new(RefCell::new(0));
        let mut s = slider(SliderConfig::default());
        let sink = Rc::clone(&count);
        s.on_values_updated(move |_| *sink.borrow_mut() += 1);

        let outcome = s.set_external_values(&[5.0.into(), 100.0.into()]);
        let update = outcome.update.unwrap();
        assert_eq!(update.values.as_slice(), &[5.0, 100.0]);
        assert_eq!(update.cause, UpdateCause::External);
        assert_eq!(*count.borrow(), 1);

        // Same values again: nothing to report.
        assert!(s.set_external_values(&[5.0.into(), 100.0.into()]).update.is_none());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn external_update_during_drag_is_ignored() {
        let mut s = slider(SliderConfig::default());
        s.handle_event(pointer_down(1, 200.0)).unwrap();
        s.handle_event(pointer_move(150.0)).unwrap();

        let outcome = s.set_external_values(&[0.0.into(), 20.0.into()]);
        assert_eq!(outcome, SyncOutcome::default());
        assert_eq!(s.values(), &[0.0, 75.0]);

        let end = s.handle_event(InputEvent::PointerUp).unwrap().unwrap();
        assert_eq!(end.values.as_slice(), &[0.0, 75.0]);
    }

    #[test]
    fn unparsable_external_value_surfaces_an_error() {
        let mut s = slider(SliderConfig::default().with_values([20.0, 80.0]));
        let outcome = s.set_external_values(&["12x".into(), "70".into()]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.update.unwrap().values.as_slice(), &[20.0, 70.0]);
    }

    #[test]
    fn cancel_releases_listeners_without_reporting() {
        let reported = Rc::new(RefCell::new(false));
        let mut s = slider(SliderConfig::default());
        let sink = Rc::clone(&reported);
        s.on_values_updated(move |_| *sink.borrow_mut() = true);

        s.handle_event(pointer_down(0, 0.0)).unwrap();
        assert!(s.cancel());
        assert!(!s.cancel());
        assert_eq!(s.surface().live(), 0);
        assert!(!*reported.borrow());
    }

    #[test]
    fn dropping_mid_drag_detaches() {
        let mut surface = Surface::default();
        {
            let mut s = RangeSlider::new(SliderConfig::default(), &mut surface).unwrap();
            s.handle_event(pointer_down(0, 0.0)).unwrap();
        }
        assert_eq!(surface.attached, [InputKind::Pointer]);
        assert_eq!(surface.detached, [InputKind::Pointer]);
    }

    #[test]
    fn disabled_slider_ignores_input() {
        let mut s = slider(SliderConfig::default().with_disabled(true));
        s.handle_event(pointer_down(0, 0.0)).unwrap();
        assert_eq!(s.state(), DragState::Idle);
        let click = s
            .handle_event(InputEvent::TrackClick {
                position: Point::new(60.0, 12.0),
                track: TRACK,
            })
            .unwrap();
        assert_eq!(click, None);
        assert_eq!(s.values(), &[0.0, 100.0]);
    }

    #[test]
    fn disabling_mid_drag_ends_the_drag() {
        let mut s = slider(SliderConfig::default());
        s.handle_event(pointer_down(0, 0.0)).unwrap();
        s.handle_event(pointer_move(40.0)).unwrap();
        let end = s.set_disabled(true).unwrap();
        assert_eq!(end.values.as_slice(), &[20.0, 100.0]);
        assert_eq!(s.surface().live(), 0);
        assert_eq!(s.set_disabled(false), None);
    }

    #[test]
    fn construction_normalizes_and_validates() {
        assert!(matches!(
            RangeSlider::new(SliderConfig::default().with_range(10.0, 0.0), ()),
            Err(SliderError::InvalidRange { .. })
        ));

        let s = slider(
            SliderConfig::default()
                .with_range(0.0, 1000.0)
                .with_values([0.0, 10.0]),
        );
        assert_eq!(s.values(), &[0.0, 120.0]);
    }

    #[test]
    fn reconfigure_keeps_values_across_a_range_change() {
        let mut s = slider(SliderConfig::default().with_values([20.0, 80.0]));
        let config = SliderConfig::default()
            .with_range(0.0, 200.0)
            .with_values([20.0, 80.0]);
        let outcome = s.reconfigure(&config).unwrap();
        assert_eq!(outcome.update, None);
        assert_eq!(s.positions(), &[10.0, 40.0]);
        assert_eq!(s.values(), &[20.0, 80.0]);

        assert!(
            s.reconfigure(&SliderConfig::default().with_range(1.0, 1.0))
                .is_err()
        );
        assert_eq!(s.range().max(), 200.0);
    }

    #[test]
    fn owner_learns_about_a_value_clamped_in_place() {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let mut s = slider(SliderConfig::default().with_values([88.0, 100.0]));
        let sink = Rc::clone(&reports);
        s.on_values_updated(move |update| sink.borrow_mut().push(update.values.clone()));

        let update = s
            .set_external_values(&[99.0.into(), 100.0.into()])
            .update
            .unwrap();
        assert_eq!(update.values.as_slice(), &[88.0, 100.0]);
        assert_eq!(s.values(), &[88.0, 100.0]);
        assert_eq!(reports.borrow().len(), 1);
        assert_eq!(reports.borrow()[0].as_slice(), &[88.0, 100.0]);

        // Once the owner holds the corrected set there is nothing left to say.
        assert!(s.set_external_values(&[88.0.into(), 100.0.into()]).update.is_none());
        assert_eq!(reports.borrow().len(), 1);
    }

    #[test]
    fn reconfigured_separation_applies_before_any_measurement() {
        let mut s = slider(SliderConfig::default());
        let config = SliderConfig::default()
            .with_min_separation(2.0)
            .with_values([95.0, 100.0]);
        let outcome = s.reconfigure(&config).unwrap();
        assert_eq!(s.min_separation(), 2.0);
        assert_eq!(outcome.update.unwrap().values.as_slice(), &[95.0, 100.0]);
    }

    #[test]
    fn reconfigured_separation_renormalizes_the_handles() {
        let mut s = slider(
            SliderConfig::default()
                .with_min_separation(2.0)
                .with_values([40.0, 50.0]),
        );
        let config = SliderConfig::default()
            .with_min_separation(20.0)
            .with_values([40.0, 50.0]);
        let outcome = s.reconfigure(&config).unwrap();
        assert_eq!(s.values(), &[30.0, 50.0]);
        assert_eq!(outcome.update.unwrap().values.as_slice(), &[30.0, 50.0]);
    }

    #[test]
    fn measured_separation_survives_reconfigure() {
        let mut s = slider(SliderConfig::default());
        s.handle_event(InputEvent::PointerDown {
            handle: 0,
            position: Point::new(0.0, 12.0),
            measure: Measure::new(TRACK, Some(20.0)),
        })
        .unwrap();
        s.handle_event(InputEvent::PointerUp).unwrap();

        let config = SliderConfig::default()
            .with_min_separation(2.0)
            .with_values([95.0, 100.0]);
        let outcome = s.reconfigure(&config).unwrap();
        assert_eq!(s.min_separation(), 10.0);
        assert_eq!(outcome.update.unwrap().values.as_slice(), &[90.0, 100.0]);
    }

    #[test]
    fn range_change_waits_for_the_drag_to_end() {
        let mut s = slider(SliderConfig::default());
        s.handle_event(pointer_down(0, 0.0)).unwrap();
        s.handle_event(pointer_move(60.0)).unwrap();

        let config = SliderConfig::default()
            .with_range(0.0, 200.0)
            .with_values([0.0, 100.0]);
        let outcome = s.reconfigure(&config).unwrap();
        assert_eq!(outcome, SyncOutcome::default());
        assert_eq!(s.range().max(), 100.0);
        assert_eq!(s.positions(), &[30.0, 100.0]);

        s.handle_event(pointer_move(80.0)).unwrap();
        assert_eq!(s.positions(), &[40.0, 100.0]);

        let end = s.handle_event(InputEvent::PointerUp).unwrap().unwrap();
        assert_eq!(end.max, 200.0);
        assert_eq!(end.values.as_slice(), &[40.0, 100.0]);
        assert_eq!(s.positions(), &[20.0, 50.0]);
    }

    #[test]
    fn cancelled_drag_still_applies_a_held_range() {
        let mut s = slider(SliderConfig::default().with_values([20.0, 80.0]));
        s.handle_event(touch_start(1, 160.0, 1)).unwrap();
        s.reconfigure(
            &SliderConfig::default()
                .with_range(0.0, 400.0)
                .with_values([20.0, 80.0]),
        )
        .unwrap();
        assert!(s.cancel());
        assert_eq!(s.range().max(), 400.0);
        assert_eq!(s.values(), &[20.0, 80.0]);
        assert_eq!(s.positions(), &[5.0, 20.0]);
    }

    #[test]
    fn handle_bounds_follow_neighbors() {
        let s = slider(SliderConfig::default().with_values([20.0, 50.0, 80.0]));
        assert_eq!(
            s.handle_bounds(0),
            Some(HandleBounds {
                min: 0.0,
                max: 50.0,
                now: 20.0
            })
        );
        assert_eq!(
            s.handle_bounds(1),
            Some(HandleBounds {
                min: 20.0,
                max: 80.0,
                now: 50.0
            })
        );
        assert_eq!(
            s.handle_bounds(2),
            Some(HandleBounds {
                min: 50.0,
                max: 100.0,
                now: 80.0
            })
        );
        assert_eq!(s.handle_bounds(3), None);
    }

    #[test]
    fn progress_span_covers_first_to_last() {
        let s = slider(SliderConfig::default().with_values([20.0, 50.0, 80.0]));
        assert_eq!(
            s.progress_span(),
            ProgressSpan {
                start: 20.0,
                width: 60.0
            }
        );

        let single = slider(SliderConfig::default().with_values([30.0]));
        assert_eq!(
            single.progress_span(),
            ProgressSpan {
                start: 0.0,
                width: 30.0
            }
        );
        assert_eq!(
            slider(SliderConfig::default().with_values(vec![])).progress_span(),
            ProgressSpan::default()
        );
    }
}
