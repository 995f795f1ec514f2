// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_slide_panel --heading-base-level=0

//! Understory Slide Panel: a headless sliding panel engine.
//!
//! A sliding panel is a container with two children: the main content and a
//! panel that peeks in from one edge and can be dragged between collapsed,
//! anchored and expanded positions, or hidden entirely. This crate owns the
//! interaction logic and leaves measurement and painting to the host.
//!
//! - **Geometry** ([`PanelGeometry`]): converts between a normalized slide
//!   offset (`0` collapsed, `1` expanded) and the panel's pixel top.
//! - **Drag engine** ([`drag::DragEngine`]): pointer capture, clamped
//!   movement, the fling/anchor release decision and the settle animation.
//! - **Touch router** ([`router::TouchRouter`]): decides whether the panel or
//!   a nested scrollable owns a pointer stream and splices synthetic
//!   cancel/down samples when ownership changes mid-stream.
//! - **State machine** ([`machine::PanelStateMachine`]): the [`PanelState`]
//!   lifecycle and [`PanelListener`] notifications.
//! - **Parallax** ([`ParallaxAdapter`]): main-content translation derived
//!   from the slide offset.
//! - **Facade** ([`SlidingPanel`]): ties everything together and returns an
//!   [`Arrangement`] describing where the children go.
//!
//! ## Quick Start
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_slide_panel::{
//!     LayoutSnapshot, PanelConfig, PanelEvent, PanelState, PointerEvent, SlidingPanel,
//! };
//!
//! let config = PanelConfig {
//!     peek_height: 100.0,
//!     anchor_point: 0.5,
//!     ..PanelConfig::default()
//! };
//! let mut panel = SlidingPanel::new(config, Vec::<PanelEvent>::new(), ());
//! panel
//!     .layout(LayoutSnapshot {
//!         container: Rect::new(0.0, 0.0, 400.0, 800.0),
//!         panel_height: 500.0,
//!         ..LayoutSnapshot::default()
//!     })
//!     .unwrap();
//!
//! // Drag the panel up 150px and let go slowly.
//! panel.handle_pointer(PointerEvent::down(0, Point::new(200.0, 750.0), 0));
//! panel.handle_pointer(PointerEvent::moved(0, Point::new(200.0, 600.0), 400));
//! panel.handle_pointer(PointerEvent::up(0, Point::new(200.0, 600.0), 1000));
//! while panel.tick() {}
//!
//! // Offset 0.375 is past half the anchor, so the panel rests anchored.
//! assert_eq!(panel.state(), PanelState::ANCHORED);
//! assert_eq!(panel.slide_offset(), 0.5);
//! assert_eq!(panel.listener().last(), Some(&PanelEvent::Anchored));
//! ```
//!
//! ## Driving the panel
//!
//! The engine never reads a clock. Pointer samples carry their own
//! timestamps, and settle animations advance only when the host calls
//! [`SlidingPanel::tick`] or [`SlidingPanel::advance`]. Tests can therefore
//! replay gestures deterministically.
//!
//! ## Logging
//!
//! State transitions, captures and settles are reported through [`tracing`]
//! at `debug` level; per-sample routing at `trace`. Install a subscriber in the
//! host to see them.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The default `std` feature forwards
//! to Kurbo and `tracing`; without it, enable `libm` so Kurbo can supply the
//! float math.

#![no_std]

extern crate alloc;

pub mod arrange;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod listener;
pub mod machine;
pub mod panel;
pub mod parallax;
pub mod pointer;
pub mod router;
pub mod scroll;
pub mod settle;
pub mod state;
pub mod velocity;

pub use arrange::Arrangement;
pub use config::{PanelConfig, PanelFlags};
pub use drag::PointerError;
pub use geometry::{PanelEdge, PanelGeometry};
pub use listener::{PanelEvent, PanelListener};
pub use panel::{LayoutError, LayoutSnapshot, RouteOutcome, SlidingPanel, StateRequestError};
pub use parallax::{ParallaxAdapter, parallax_offset};
pub use pointer::{PointerEvent, PointerId, PointerPhase};
pub use scroll::{NestedScroll, ScrollMetrics};
pub use settle::Interpolator;
pub use state::{PanelState, StableState};
