// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag engine: capture a pointer, move the panel, and settle it after release.
//!
//! ## Usage
//!
//! 1) Keep the engine's [`PanelGeometry`] current with [`DragEngine::set_geometry`].
//! 2) On pointer down over the panel, call [`DragEngine::try_capture`].
//! 3) Feed moves to [`DragEngine::on_pointer_move`]; the panel top is clamped
//!    to the draggable span.
//! 4) On release, [`DragEngine::on_pointer_release`] picks a resting target with
//!    [`settle_target`] and starts a settle.
//! 5) Call [`DragEngine::tick`] (or [`DragEngine::advance`]) once per frame
//!    while it returns `true`.
//! 6) After every call, [`DragEngine::drain_events`] yields what happened.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_slide_panel::drag::{CaptureTarget, DragEngine, DragSettings};
//! use understory_slide_panel::{PanelEdge, PanelGeometry};
//!
//! let geometry = PanelGeometry::new(0.0, 800.0, 500.0, 100.0, PanelEdge::Bottom);
//! let mut engine = DragEngine::new(DragSettings::default());
//! engine.set_geometry(geometry);
//! engine.set_top(geometry.collapsed_top());
//!
//! assert!(engine.try_capture(0, CaptureTarget::Panel, Point::new(50.0, 750.0), 0));
//! engine.on_pointer_move(0, Point::new(50.0, 650.0), 16).unwrap();
//! assert_eq!(engine.top(), 600.0);
//!
//! // A slow release just past the middle settles fully expanded (no anchor).
//! engine.on_pointer_move(0, Point::new(50.0, 540.0), 500).unwrap();
//! engine.on_pointer_release(0, 1000).unwrap();
//! while engine.tick() {}
//! assert_eq!(engine.top(), geometry.expanded_top());
//! ```

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use crate::geometry::PanelGeometry;
use crate::pointer::PointerId;
use crate::settle::{Interpolator, SettleAnimation, ease_out_quint, settle_duration};
use crate::velocity::{VelocityTracker, clamp_magnitude};

/// What the engine is doing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// Nothing is moving the panel.
    #[default]
    Idle,
    /// A pointer has captured the panel.
    Dragging,
    /// A settle animation is moving the panel.
    Settling,
}

/// Which child a capture attempt targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CaptureTarget {
    /// The slideable panel.
    Panel,
    /// Anything else (typically the main content).
    Other,
}

/// Something the engine did, to be consumed by the state machine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragEvent {
    /// A pointer captured the panel.
    Captured {
        /// The capturing pointer.
        pointer_id: PointerId,
    },
    /// The panel top moved.
    PositionChanged {
        /// New panel top.
        top: f64,
        /// Signed distance moved.
        dy: f64,
    },
    /// The capturing pointer was released and a resting target chosen.
    Released {
        /// Release velocity after clamping, in px/s (screen orientation).
        velocity: f64,
        /// The chosen resting top.
        target_top: f64,
    },
    /// The engine changed phase; [`DragPhase::Idle`] marks a completed settle.
    PhaseChanged(DragPhase),
    /// The interaction was abandoned and the panel returned to `top`.
    Canceled {
        /// The restored panel top.
        top: f64,
    },
}

/// Events produced by one engine call.
pub type DragEvents = SmallVec<[DragEvent; 4]>;

/// Error for pointer samples the engine cannot attribute to its capture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerError {
    /// The sample came from a pointer other than the capturing one.
    UnknownPointer {
        /// The offending pointer.
        id: PointerId,
        /// The pointer that holds the capture.
        active: PointerId,
    },
}

impl fmt::Display for PointerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPointer { id, active } => {
                write!(f, "pointer {id} is not tracked (active pointer is {active})")
            }
        }
    }
}

impl core::error::Error for PointerError {}

/// Tunables for drag and settle behavior.
#[derive(Copy, Clone, Debug)]
pub struct DragSettings {
    /// Intermediate resting offset in `(0, 1]`.
    pub anchor_point: f64,
    /// Release speeds below this (px/s) count as zero.
    pub min_fling_velocity: f64,
    /// Release speeds are capped at this (px/s).
    pub max_fling_velocity: f64,
    /// Easing used by settle animations.
    pub interpolator: Interpolator,
    /// Time advanced by one [`DragEngine::tick`].
    pub frame_interval_ms: u64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            anchor_point: 1.0,
            min_fling_velocity: 400.0,
            max_fling_velocity: 8000.0,
            interpolator: ease_out_quint,
            frame_interval_ms: 16,
        }
    }
}

/// Picks the resting offset after a release.
///
/// `direction` is the release velocity oriented positive toward expanded.
/// Velocity decides when present; otherwise the midpoints between
/// `0`, `anchor` and `1` do.
#[must_use]
pub fn settle_target(offset: f64, anchor: f64, direction: f64) -> f64 {
    if direction > 0.0 {
        if offset <= anchor { anchor } else { 1.0 }
    } else if direction < 0.0 {
        if offset >= anchor { anchor } else { 0.0 }
    } else if offset >= (1.0 + anchor) / 2.0 {
        1.0
    } else if offset >= anchor / 2.0 {
        anchor
    } else {
        0.0
    }
}

#[derive(Clone, Debug)]
struct DragSession {
    pointer_id: PointerId,
    last_y: f64,
    initial: Point,
    tracker: VelocityTracker,
}

/// Moves a panel under pointer control and settles it afterwards.
#[derive(Clone, Debug)]
pub struct DragEngine {
    settings: DragSettings,
    geometry: PanelGeometry,
    top: f64,
    phase: DragPhase,
    session: Option<DragSession>,
    settle: Option<SettleAnimation>,
    // Where the panel last rested before this interaction; restored by `cancel`.
    rest_top: Option<f64>,
    unable_to_drag: bool,
    events: DragEvents,
}

impl DragEngine {
    /// Creates an idle engine with an empty geometry.
    #[must_use]
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            geometry: PanelGeometry::default(),
            top: 0.0,
            phase: DragPhase::Idle,
            session: None,
            settle: None,
            rest_top: None,
            unable_to_drag: false,
            events: DragEvents::new(),
        }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &DragSettings {
        &self.settings
    }

    /// Replaces the settings. An in-flight settle keeps its interpolator.
    pub fn set_settings(&mut self, settings: DragSettings) {
        self.settings = settings;
    }

    /// Current geometry.
    #[must_use]
    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    /// Replaces the geometry used for clamping and targets.
    pub fn set_geometry(&mut self, geometry: PanelGeometry) {
        self.geometry = geometry;
    }

    /// Current panel top.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Places the panel without emitting events (used by layout).
    pub fn set_top(&mut self, top: f64) {
        self.top = top;
    }

    /// Current slide offset.
    #[must_use]
    pub fn slide_offset(&self) -> f64 {
        self.geometry.offset_from_top(self.top)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Returns `true` while a pointer holds the capture.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Returns `true` while a settle animation is running.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    /// The in-flight settle, if any.
    #[must_use]
    pub fn settle(&self) -> Option<&SettleAnimation> {
        self.settle.as_ref()
    }

    /// The capturing pointer, if any.
    #[must_use]
    pub fn active_pointer(&self) -> Option<PointerId> {
        self.session.as_ref().map(|s| s.pointer_id)
    }

    /// Where the capturing pointer first touched, if captured.
    #[must_use]
    pub fn initial_point(&self) -> Option<Point> {
        self.session.as_ref().map(|s| s.initial)
    }

    /// Blocks (or re-allows) captures for the current gesture.
    pub fn set_unable_to_drag(&mut self, unable: bool) {
        self.unable_to_drag = unable;
    }

    /// Returns `true` if captures are blocked for the current gesture.
    #[must_use]
    pub fn is_unable_to_drag(&self) -> bool {
        self.unable_to_drag
    }

    /// Takes the events produced since the last drain.
    pub fn drain_events(&mut self) -> DragEvents {
        core::mem::take(&mut self.events)
    }

    /// Tries to capture the panel for `pointer_id`.
    ///
    /// Fails if `target` is not the panel, captures are blocked, or another
    /// pointer already holds the capture. Capturing during a settle stops the
    /// panel where it is.
    pub fn try_capture(
        &mut self,
        pointer_id: PointerId,
        target: CaptureTarget,
        at: Point,
        time_ms: u64,
    ) -> bool {
        if self.unable_to_drag || target != CaptureTarget::Panel {
            return false;
        }
        if let Some(active) = self.active_pointer() {
            return active == pointer_id;
        }
        if self.phase == DragPhase::Idle {
            self.rest_top = Some(self.top);
        }
        self.settle = None;
        let mut tracker = VelocityTracker::default();
        tracker.add(at, time_ms);
        self.session = Some(DragSession {
            pointer_id,
            last_y: at.y,
            initial: at,
            tracker,
        });
        tracing::debug!(pointer_id, top = self.top, "panel captured");
        self.events.push(DragEvent::Captured { pointer_id });
        self.set_phase(DragPhase::Dragging);
        true
    }

    /// Moves the captured panel by the pointer's vertical delta.
    ///
    /// Returns `Ok(false)` when nothing is captured.
    pub fn on_pointer_move(
        &mut self,
        pointer_id: PointerId,
        at: Point,
        time_ms: u64,
    ) -> Result<bool, PointerError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(false);
        };
        if session.pointer_id != pointer_id {
            return Err(PointerError::UnknownPointer {
                id: pointer_id,
                active: session.pointer_id,
            });
        }
        session.tracker.add(at, time_ms);
        let dy = at.y - session.last_y;
        session.last_y = at.y;

        let clamped = self.geometry.clamp_top(self.top + dy);
        self.move_to(clamped);
        Ok(true)
    }

    /// Releases the capture using the tracked velocity and starts a settle.
    ///
    /// Returns `Ok(false)` when nothing is captured.
    pub fn on_pointer_release(
        &mut self,
        pointer_id: PointerId,
        time_ms: u64,
    ) -> Result<bool, PointerError> {
        let session = self.take_session(pointer_id)?;
        let Some(session) = session else {
            return Ok(false);
        };
        let velocity = session.tracker.velocity_at(time_ms).y;
        self.release(velocity);
        Ok(true)
    }

    /// Treats an abandoned stream as a release with zero velocity.
    pub fn on_pointer_cancel(&mut self, pointer_id: PointerId) -> Result<bool, PointerError> {
        let Some(_) = self.take_session(pointer_id)? else {
            return Ok(false);
        };
        self.release(0.0);
        Ok(true)
    }

    /// Animates the panel to `target_top`.
    ///
    /// Drops any capture. Returns `false` if the panel is already there, in
    /// which case a non-idle engine goes idle.
    pub fn smooth_slide_to(&mut self, target_top: f64, velocity: f64) -> bool {
        self.session = None;
        if self.phase == DragPhase::Idle {
            self.rest_top = Some(self.top);
        }
        self.start_settle(target_top, velocity)
    }

    /// Advances the settle by one frame. Returns `true` while still settling.
    pub fn tick(&mut self) -> bool {
        self.advance(self.settings.frame_interval_ms)
    }

    /// Advances the settle by `dt_ms`. Returns `true` while still settling.
    pub fn advance(&mut self, dt_ms: u64) -> bool {
        let Some(settle) = self.settle.as_mut() else {
            return false;
        };
        let top = settle.advance(dt_ms);
        let finished = settle.is_finished();
        tracing::trace!(top, finished, "settle step");
        self.move_to(top);
        if finished {
            self.finish_settle();
            return false;
        }
        true
    }

    /// Abandons the current drag or settle and returns the panel to where the
    /// interaction began.
    ///
    /// Emits [`DragEvent::Canceled`] but never a completed settle. Returns
    /// `false` (and emits nothing) when already idle.
    pub fn cancel(&mut self) -> bool {
        if self.phase == DragPhase::Idle && self.session.is_none() && self.settle.is_none() {
            return false;
        }
        self.session = None;
        self.settle = None;
        let top = self.rest_top.take().unwrap_or(self.top);
        self.top = top;
        self.phase = DragPhase::Idle;
        tracing::debug!(top, "drag canceled");
        self.events.push(DragEvent::Canceled { top });
        true
    }

    /// Finishes an in-flight settle immediately at its target.
    pub fn abort(&mut self) -> bool {
        let Some(settle) = self.settle.as_mut() else {
            return false;
        };
        let top = settle.finish();
        self.move_to(top);
        self.finish_settle();
        true
    }

    /// Releases the capture with zero velocity, whichever pointer holds it.
    ///
    /// Used when the stream that fed the capture has ended without a release
    /// reaching the engine. Returns `false` when nothing is captured.
    pub fn release_capture(&mut self) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        self.release(0.0);
        true
    }

    /// Clears a capture left behind after its pointer stream moved elsewhere.
    pub fn force_idle(&mut self) -> bool {
        if self.phase != DragPhase::Dragging {
            return false;
        }
        self.session = None;
        self.rest_top = None;
        self.set_phase(DragPhase::Idle);
        true
    }

    fn take_session(&mut self, pointer_id: PointerId) -> Result<Option<DragSession>, PointerError> {
        match &self.session {
            Some(session) if session.pointer_id != pointer_id => {
                Err(PointerError::UnknownPointer {
                    id: pointer_id,
                    active: session.pointer_id,
                })
            }
            _ => Ok(self.session.take()),
        }
    }

    fn release(&mut self, screen_velocity: f64) {
        let velocity = clamp_magnitude(
            screen_velocity,
            self.settings.min_fling_velocity,
            self.settings.max_fling_velocity,
        );
        let direction = self.geometry.edge.expanding_velocity(velocity);
        let target = settle_target(self.slide_offset(), self.settings.anchor_point, direction);
        let target_top = self.geometry.top_from_offset(target);
        tracing::debug!(velocity, target, "panel released");
        self.events.push(DragEvent::Released {
            velocity,
            target_top,
        });
        self.start_settle(target_top, velocity);
    }

    fn start_settle(&mut self, target_top: f64, velocity: f64) -> bool {
        let dy = target_top - self.top;
        if dy == 0.0 {
            self.settle = None;
            self.rest_top = None;
            self.set_phase(DragPhase::Idle);
            return false;
        }
        let duration = settle_duration(
            dy,
            velocity,
            self.geometry.container_height(),
            self.geometry.range(),
        );
        tracing::debug!(from = self.top, to = target_top, duration, "settle started");
        self.settle = Some(SettleAnimation::new(
            self.top,
            target_top,
            duration,
            self.settings.interpolator,
        ));
        self.set_phase(DragPhase::Settling);
        true
    }

    fn finish_settle(&mut self) {
        self.settle = None;
        self.rest_top = None;
        self.set_phase(DragPhase::Idle);
    }

    fn move_to(&mut self, top: f64) {
        if top == self.top {
            return;
        }
        let dy = top - self.top;
        self.top = top;
        self.events.push(DragEvent::PositionChanged { top, dy });
    }

    fn set_phase(&mut self, phase: DragPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.events.push(DragEvent::PhaseChanged(phase));
        }
    }
}
