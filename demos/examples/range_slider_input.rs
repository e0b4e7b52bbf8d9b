// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range slider driven by scripted input, with an owner holding text values.
//!
//! This example shows how to:
//! - wire drag listeners through an `InputSurface`,
//! - keep owner-side state in sync through `on_values_updated`,
//! - push user-edited text back into the slider with `set_external_values`,
//! - read accessibility bounds and the progress span for rendering.
//!
//! Run:
//! - `cargo run -p understory_range_slider_demos --example range_slider_input`
//! - `RUST_LOG=trace cargo run -p understory_range_slider_demos --example range_slider_input`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_range_slider::{
    InputEvent, InputKind, InputSurface, Measure, RangeSlider, RawValue, ReportCadence,
    SliderConfig,
};

/// Stands in for a host that registers document-level move/end listeners.
#[derive(Debug, Default)]
struct DocumentListeners {
    pointer: bool,
    touch: bool,
}

impl InputSurface for DocumentListeners {
    fn attach(&mut self, kind: InputKind) {
        tracing::info!(?kind, "listeners attached");
        match kind {
            InputKind::Pointer => self.pointer = true,
            InputKind::Touch => self.touch = true,
        }
    }

    fn detach(&mut self, kind: InputKind) {
        tracing::info!(?kind, "listeners detached");
        match kind {
            InputKind::Pointer => self.pointer = false,
            InputKind::Touch => self.touch = false,
        }
    }
}

const TRACK: Rect = Rect::new(40.0, 100.0, 440.0, 124.0);
const HANDLE_WIDTH: f64 = 16.0;

fn at(x: f64) -> Point {
    Point::new(x, 112.0)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SliderConfig::default()
        .with_range(0.0, 1000.0)
        .with_values([0.0, 1000.0])
        .with_report(ReportCadence::OnMove);
    let mut slider =
        RangeSlider::new(config, DocumentListeners::default()).expect("valid configuration");

    // The owner renders values into two text fields.
    let fields = Rc::new(RefCell::new(vec![String::from("0"), String::from("1000")]));
    let sink = Rc::clone(&fields);
    slider.on_values_updated(move |update| {
        tracing::info!(cause = ?update.cause, values = ?update.values, "owner notified");
        *sink.borrow_mut() = update.values.iter().map(ToString::to_string).collect();
    });

    // Snap handles to 5% steps.
    slider.set_position_override(|_index: usize, proposed: f64| {
        ((proposed / 5.0).round() * 5.0).clamp(0.0, 100.0)
    });

    let measure = Measure::new(TRACK, Some(HANDLE_WIDTH));

    // Drag the lower handle most of the way across.
    let script = [
        InputEvent::PointerDown {
            handle: 0,
            position: at(40.0),
            measure,
        },
        InputEvent::PointerMove { position: at(150.0) },
        InputEvent::PointerMove { position: at(260.0) },
        InputEvent::PointerMove { position: at(430.0) },
        InputEvent::PointerUp,
    ];
    for event in script {
        if let Err(err) = slider.handle_event(event) {
            tracing::error!(%err, "input rejected");
        }
    }
    println!("after drag: {:?}", fields.borrow());

    // The user types into both fields; one entry is not a number.
    let typed: Vec<RawValue> = vec!["250".into(), "12abc".into()];
    let outcome = slider.set_external_values(&typed);
    for err in &outcome.errors {
        println!("field error: {err}");
    }
    println!("after typing: {:?}", slider.values());

    // Clicking near the right end moves the upper handle.
    let click = slider.handle_event(InputEvent::TrackClick {
        position: at(400.0),
        track: TRACK,
    });
    println!("after click: {:?}", click.map(|update| update.map(|u| u.values)));

    // A second finger lands mid-drag: the drag is abandoned.
    let touches = [
        InputEvent::TouchStart {
            handle: 1,
            position: at(400.0),
            contacts: 1,
            measure,
        },
        InputEvent::TouchMove {
            position: at(300.0),
            contacts: 1,
        },
        InputEvent::TouchMove {
            position: at(280.0),
            contacts: 2,
        },
    ];
    for event in touches {
        if let Err(err) = slider.handle_event(event) {
            tracing::error!(%err, "input rejected");
        }
    }
    println!(
        "after multi-touch: {:?} (touch listeners live: {})",
        slider.values(),
        slider.surface().touch
    );

    for index in 0..slider.handle_count() {
        if let Some(bounds) = slider.handle_bounds(index) {
            println!(
                "handle {index}: valuemin={} valuemax={} valuenow={}",
                bounds.min, bounds.max, bounds.now
            );
        }
    }
    let span = slider.progress_span();
    println!("progress: left={}% width={}%", span.start, span.width);
}
