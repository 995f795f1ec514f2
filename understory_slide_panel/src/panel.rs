// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sliding panel facade.
//!
//! [`SlidingPanel`] owns the drag engine, the touch router and the state
//! machine, and is the only type most hosts need. A host:
//!
//! 1) calls [`SlidingPanel::layout`] whenever its children are measured and
//!    applies the returned [`Arrangement`],
//! 2) forwards every pointer sample to [`SlidingPanel::handle_pointer`] and
//!    dispatches the returned deliveries to the nested scrollable or its own
//!    children,
//! 3) calls [`SlidingPanel::tick`] once per frame while
//!    [`SlidingPanel::is_animating`] is `true`.

use core::fmt;

use kurbo::{Point, Rect};

use crate::arrange::Arrangement;
use crate::config::{PanelConfig, PanelFlags, is_valid_anchor_point};
use crate::drag::{CaptureTarget, DragEngine, DragPhase};
use crate::geometry::PanelGeometry;
use crate::listener::PanelListener;
use crate::machine::PanelStateMachine;
use crate::parallax::parallax_offset;
use crate::pointer::{PointerEvent, PointerPhase};
use crate::router::{Deliveries, Delivery, Ownership, RouteContext, RouteTarget, TouchRouter};
use crate::scroll::NestedScroll;
use crate::settle::{Interpolator, settle_duration};
use crate::state::{PanelState, StableState};

/// Measurements supplied by the host's layout pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutSnapshot {
    /// Container content box, in container coordinates.
    pub container: Rect,
    /// Screen position of the container's origin.
    pub screen_origin: Point,
    /// Number of children the container holds; must be 2.
    pub child_count: usize,
    /// Measured height of the slideable panel.
    pub panel_height: f64,
    /// Whether the host shows the panel child; a hidden child forces
    /// [`StableState::Hidden`].
    pub panel_visible: bool,
    /// Screen bounds of the drag handle; `None` means the whole panel.
    pub drag_handle: Option<Rect>,
    /// Screen bounds of the nested scrollable, if any.
    pub scrollable: Option<Rect>,
}

impl Default for LayoutSnapshot {
    fn default() -> Self {
        Self {
            container: Rect::ZERO,
            screen_origin: Point::ORIGIN,
            child_count: 2,
            panel_height: 0.0,
            panel_visible: true,
            drag_handle: None,
            scrollable: None,
        }
    }
}

/// Error returned by [`SlidingPanel::layout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The container does not hold exactly a main view and a panel.
    ChildCount {
        /// Number of children found.
        found: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChildCount { found } => {
                write!(f, "sliding panel needs exactly 2 children, found {found}")
            }
        }
    }
}

impl core::error::Error for LayoutError {}

/// Error returned by [`SlidingPanel::request_state`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StateRequestError {
    /// [`PanelState::Dragging`] can only be entered by moving the panel.
    NotSettable,
}

impl fmt::Display for StateRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSettable => f.write_str("panel state cannot be set to DRAGGING"),
        }
    }
}

impl core::error::Error for StateRequestError {}

/// What became of one pointer sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteOutcome {
    /// Samples the host must dispatch to the nested scrollable or its own
    /// children, in order.
    pub deliveries: Deliveries,
    /// The panel handled the sample.
    pub consumed: bool,
    /// A settle is running; keep calling [`SlidingPanel::tick`].
    pub animating: bool,
}

/// A two-child container whose second child slides over or alongside the first.
///
/// ```
/// use kurbo::{Point, Rect};
/// use understory_slide_panel::{LayoutSnapshot, PanelConfig, PanelState, PointerEvent, SlidingPanel};
///
/// let mut panel = SlidingPanel::new(PanelConfig { peek_height: 100.0, ..PanelConfig::default() }, (), ());
/// panel
///     .layout(LayoutSnapshot {
///         container: Rect::new(0.0, 0.0, 400.0, 800.0),
///         panel_height: 500.0,
///         ..LayoutSnapshot::default()
///     })
///     .unwrap();
/// assert_eq!(panel.panel_top(), 700.0);
///
/// // Fling the handle upward.
/// panel.handle_pointer(PointerEvent::down(0, Point::new(50.0, 750.0), 0));
/// panel.handle_pointer(PointerEvent::moved(0, Point::new(50.0, 720.0), 10));
/// panel.handle_pointer(PointerEvent::moved(0, Point::new(50.0, 680.0), 20));
/// panel.handle_pointer(PointerEvent::up(0, Point::new(50.0, 680.0), 25));
/// while panel.tick() {}
/// assert_eq!(panel.state(), PanelState::EXPANDED);
/// ```
#[derive(Debug)]
pub struct SlidingPanel<L = (), S = ()> {
    config: PanelConfig,
    listener: L,
    scroll: S,
    engine: DragEngine,
    router: TouchRouter,
    machine: PanelStateMachine,
    container: Rect,
    screen_origin: Point,
    drag_handle: Option<Rect>,
    scrollable: Option<Rect>,
    // The next layout positions the panel from its state.
    first_layout: bool,
    laid_out: bool,
    attached: bool,
}

impl<L: PanelListener, S: NestedScroll> SlidingPanel<L, S> {
    /// Creates a panel. Nothing is positioned until the first [`layout`](Self::layout).
    pub fn new(config: PanelConfig, listener: L, scroll: S) -> Self {
        let config = config.sanitized();
        Self {
            engine: DragEngine::new(config.drag_settings()),
            router: TouchRouter::new(),
            machine: PanelStateMachine::new(config.initial_state),
            config,
            listener,
            scroll,
            container: Rect::ZERO,
            screen_origin: Point::ORIGIN,
            drag_handle: None,
            scrollable: None,
            first_layout: true,
            laid_out: false,
            attached: true,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// The listener.
    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// The nested scroll accessor.
    #[must_use]
    pub fn nested_scroll(&self) -> &S {
        &self.scroll
    }

    /// Mutable access to the nested scroll accessor.
    pub fn nested_scroll_mut(&mut self) -> &mut S {
        &mut self.scroll
    }

    /// Replaces the nested scroll accessor.
    pub fn set_nested_scroll(&mut self, scroll: S) {
        self.scroll = scroll;
    }

    /// Current geometry. Empty before the first layout.
    #[must_use]
    pub fn geometry(&self) -> &PanelGeometry {
        self.engine.geometry()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.machine.state()
    }

    /// Current slide offset.
    #[must_use]
    pub fn slide_offset(&self) -> f64 {
        self.machine.slide_offset()
    }

    /// Current panel top, in container coordinates.
    #[must_use]
    pub fn panel_top(&self) -> f64 {
        self.engine.top()
    }

    /// Returns `false` once the panel has come to rest hidden.
    #[must_use]
    pub fn is_panel_visible(&self) -> bool {
        self.machine.is_panel_visible()
    }

    /// Returns `true` while a settle animation is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.engine.is_settling()
    }

    /// Main-content parallax translation for the current offset.
    #[must_use]
    pub fn parallax_offset(&self) -> f64 {
        if self.config.parallax_max > 0.0 {
            parallax_offset(self.slide_offset(), self.config.parallax_max, self.config.edge)
        } else {
            0.0
        }
    }

    /// The state to persist; never the transient dragging state.
    #[must_use]
    pub fn saved_state(&self) -> StableState {
        self.state().persisted()
    }

    /// Restores a persisted state name. Unknown or missing names restore
    /// [`StableState::Collapsed`]. The panel moves at the next layout.
    pub fn restore_state(&mut self, name: Option<&str>) {
        let state = StableState::restore(name);
        tracing::debug!(%state, "panel state restored");
        self.abort_interaction();
        self.machine.set_stable(state);
        self.first_layout = true;
    }

    /// Returns `true` if touches currently reach the panel.
    #[must_use]
    pub fn is_touch_enabled(&self) -> bool {
        self.config.touch_enabled
            && self.attached
            && self.laid_out
            && !self.state().is(StableState::Hidden)
    }

    /// Current child placement and paint geometry.
    #[must_use]
    pub fn arrangement(&self) -> Arrangement {
        Arrangement::compute(
            self.container,
            self.engine.geometry(),
            self.engine.top(),
            self.state(),
            self.is_panel_visible(),
            &self.config,
        )
    }

    /// Applies a layout pass and returns where the children go.
    ///
    /// The first layout (and any layout after the container height changed)
    /// positions the panel from its state and reports
    /// [`PanelListener::on_layout`]; later layouts keep the slide offset.
    pub fn layout(&mut self, snapshot: LayoutSnapshot) -> Result<Arrangement, LayoutError> {
        if snapshot.child_count != 2 {
            return Err(LayoutError::ChildCount {
                found: snapshot.child_count,
            });
        }
        if self.laid_out && snapshot.container.height() != self.container.height() {
            tracing::debug!(
                old = self.container.height(),
                new = snapshot.container.height(),
                "container height changed"
            );
            self.first_layout = true;
        }
        self.container = snapshot.container;
        self.screen_origin = snapshot.screen_origin;
        self.drag_handle = snapshot.drag_handle;
        self.scrollable = snapshot.scrollable;

        let geometry = PanelGeometry::new(
            snapshot.container.y0,
            snapshot.container.y1,
            snapshot.panel_height,
            self.config.peek_height,
            self.config.edge,
        );
        self.engine.set_geometry(geometry);

        if !snapshot.panel_visible
            && self.state().stable().is_some_and(|s| s != StableState::Hidden)
        {
            self.machine.set_stable(StableState::Hidden);
        }

        if self.first_layout {
            self.abort_interaction();
            let state = self.state().persisted();
            let top = self.rest_top(state);
            self.engine.set_top(top);
            self.machine.set_stable(state);
            self.machine.place(top, &geometry);
            tracing::debug!(%state, top, "panel positioned");
            self.listener.on_layout(PanelState::Stable(state));
            self.first_layout = false;
        } else if self.engine.phase() == DragPhase::Idle {
            let top = match self.state() {
                PanelState::Stable(StableState::Hidden) => geometry.hidden_top(),
                _ => geometry.top_from_offset(self.machine.slide_offset()),
            };
            self.engine.set_top(top);
            self.machine.place(top, &geometry);
        }
        self.laid_out = true;
        Ok(self.arrangement())
    }

    /// Updates the drag handle and nested scrollable screen bounds between layouts.
    pub fn set_hit_regions(&mut self, drag_handle: Option<Rect>, scrollable: Option<Rect>) {
        self.drag_handle = drag_handle;
        self.scrollable = scrollable;
    }

    /// Feeds one pointer sample through the router and the drag engine.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> RouteOutcome {
        let mut outcome = RouteOutcome::default();
        if !self.config.enabled || !self.is_touch_enabled() {
            if self.config.enabled {
                // Drop pointer tracking only; a running settle keeps ticking.
                self.engine.force_idle();
                self.pump();
            } else {
                self.abort_interaction();
            }
            self.router.reset();
            outcome.deliveries.push(Delivery {
                target: RouteTarget::Host,
                event,
            });
            outcome.animating = self.is_animating();
            return outcome;
        }

        let ctx = self.route_context();
        let route = self.router.route(event, &ctx);
        if route.cancel_drag {
            self.engine.cancel();
        }
        self.engine.set_unable_to_drag(self.router.is_unable_to_drag());

        for delivery in route.deliveries {
            match delivery.target {
                RouteTarget::Panel => outcome.consumed |= self.feed_engine(delivery.event),
                RouteTarget::Child | RouteTarget::Host => outcome.deliveries.push(delivery),
            }
        }
        if route.reset_panel {
            self.engine.force_idle();
        }
        if self.router.ownership() == Ownership::Idle && self.engine.release_capture() {
            tracing::debug!("capture outlived its stream, released");
        }
        self.pump();

        if route.tap && self.config.toggle_on_tap {
            let target = match self.state() {
                PanelState::Stable(StableState::Expanded | StableState::Anchored) => {
                    StableState::Collapsed
                }
                _ if self.config.anchor_point < 1.0 => StableState::Anchored,
                _ => StableState::Expanded,
            };
            tracing::debug!(%target, "drag handle tapped");
            if self.request_state(target.into()) == Ok(true) {
                outcome.consumed = true;
            }
        }
        outcome.animating = self.is_animating();
        outcome
    }

    /// Advances a running settle by one frame. Returns `true` while animating.
    pub fn tick(&mut self) -> bool {
        self.advance(self.config.frame_interval_ms)
    }

    /// Advances a running settle by `dt_ms`. Returns `true` while animating.
    pub fn advance(&mut self, dt_ms: u64) -> bool {
        if !self.config.enabled {
            self.abort_interaction();
            return false;
        }
        let animating = self.engine.advance(dt_ms);
        self.pump();
        animating
    }

    /// Asks the panel to move to `target`.
    ///
    /// Returns `Ok(true)` if a settle started (or, before the first layout,
    /// the state was stored), `Ok(false)` if the request was ignored.
    pub fn request_state(&mut self, target: PanelState) -> Result<bool, StateRequestError> {
        let PanelState::Stable(target) = target else {
            return Err(StateRequestError::NotSettable);
        };
        if !self.config.enabled {
            return Ok(false);
        }
        if self.first_layout {
            self.machine.set_stable(target);
            return Ok(true);
        }
        let Some(current) = self.state().stable() else {
            return Ok(false);
        };
        if current == target || self.engine.phase() != DragPhase::Idle {
            return Ok(false);
        }
        tracing::debug!(from = %current, to = %target, "panel state requested");

        if current == StableState::Hidden {
            self.machine.set_panel_visible(true);
        }
        let geometry = *self.engine.geometry();
        let top = match target {
            StableState::Anchored => geometry.top_from_offset(self.config.anchor_point),
            StableState::Expanded => geometry.expanded_top(),
            StableState::Collapsed => {
                if current == StableState::Hidden {
                    let duration = self.peek_duration();
                    self.listener.on_shown_executed(self.config.interpolator, duration);
                }
                geometry.collapsed_top()
            }
            StableState::Hidden => {
                let duration = self.peek_duration();
                self.listener.on_hidden_executed(self.config.interpolator, duration);
                geometry.hidden_top()
            }
        };
        Ok(self.slide_to_top(top, 0.0))
    }

    /// Animates the panel to `offset`. Returns `false` if nothing moves.
    pub fn smooth_slide_to(&mut self, offset: f64, velocity: f64) -> bool {
        let top = self.engine.geometry().top_from_offset(offset);
        self.slide_to_top(top, velocity)
    }

    /// Abandons the current drag or settle and returns the panel to where it
    /// last rested. Returns `false` if nothing was in progress.
    pub fn cancel(&mut self) -> bool {
        let canceled = self.engine.cancel();
        self.router.reset();
        self.pump();
        canceled
    }

    /// Enables or disables the panel. Disabling finishes any movement.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.abort_interaction();
            self.router.reset();
        }
    }

    /// Enables or disables touch handling.
    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.config.touch_enabled = enabled;
    }

    /// Marks the panel as attached to (or detached from) a window. The next
    /// layout after a reattach positions the panel from its state.
    pub fn set_attached(&mut self, attached: bool) {
        if self.attached != attached {
            self.abort_interaction();
            self.router.reset();
            self.first_layout = true;
        }
        self.attached = attached;
    }

    /// Sets the anchor point. Values outside `(0, 1]` are rejected and the
    /// previous value is kept.
    pub fn set_anchor_point(&mut self, anchor: f64) -> bool {
        if !is_valid_anchor_point(anchor) {
            tracing::warn!(anchor, "anchor point out of range, keeping previous");
            return false;
        }
        self.config.anchor_point = anchor;
        self.engine.set_settings(self.config.drag_settings());
        true
    }

    /// Sets the peek height. A collapsed panel settles to the new collapsed
    /// position; other states keep their offset.
    pub fn set_peek_height(&mut self, peek_height: f64) {
        if self.config.peek_height == peek_height {
            return;
        }
        self.config.peek_height = peek_height;
        if !self.laid_out {
            return;
        }
        let geometry = PanelGeometry {
            peek_height,
            ..*self.engine.geometry()
        };
        self.engine.set_geometry(geometry);
        if self.state().is(StableState::Collapsed) {
            self.slide_to_top(geometry.collapsed_top(), 0.0);
        } else if self.engine.phase() == DragPhase::Idle {
            let state = self.state().persisted();
            let top = match state {
                StableState::Hidden => geometry.hidden_top(),
                _ => geometry.top_from_offset(self.machine.slide_offset()),
            };
            self.engine.set_top(top);
            self.machine.place(top, &geometry);
        }
    }

    /// Sets the maximum parallax translation.
    pub fn set_parallax_max(&mut self, max: f64) {
        self.config.parallax_max = max;
    }

    /// Sets the minimum fling speed in px/s.
    pub fn set_min_fling_velocity(&mut self, velocity: f64) {
        self.config.min_fling_velocity = velocity;
        self.engine.set_settings(self.config.drag_settings());
    }

    /// Sets whether the panel overlays the main content.
    pub fn set_overlay(&mut self, overlay: bool) {
        self.config.flags.set(PanelFlags::OVERLAY, overlay);
    }

    /// Sets whether the main content is clipped against the panel.
    pub fn set_clip_panel(&mut self, clip: bool) {
        self.config.flags.set(PanelFlags::CLIP_PANEL, clip);
    }

    /// Sets the covered-fade color (ARGB); `0` disables the scrim.
    pub fn set_covered_fade_color(&mut self, color: u32) {
        self.config.covered_fade_color = color;
    }

    /// Sets the shadow height; `0` disables the shadow.
    pub fn set_shadow_height(&mut self, height: f64) {
        self.config.shadow_height = height;
    }

    /// Sets the settle easing. Settles already running keep theirs.
    pub fn set_interpolator(&mut self, interpolator: Interpolator) {
        self.config.interpolator = interpolator;
        self.engine.set_settings(self.config.drag_settings());
    }

    fn rest_top(&self, state: StableState) -> f64 {
        let geometry = self.engine.geometry();
        match state {
            StableState::Expanded => geometry.expanded_top(),
            StableState::Collapsed => geometry.collapsed_top(),
            StableState::Anchored => geometry.top_from_offset(self.config.anchor_point),
            StableState::Hidden => geometry.hidden_top(),
        }
    }

    fn peek_duration(&self) -> u64 {
        let geometry = self.engine.geometry();
        settle_duration(
            self.config.peek_height,
            0.0,
            geometry.container_height(),
            geometry.range(),
        )
    }

    fn slide_to_top(&mut self, top: f64, velocity: f64) -> bool {
        if !self.config.enabled || !self.laid_out {
            return false;
        }
        let started = self.engine.smooth_slide_to(top, velocity);
        self.pump();
        started
    }

    fn route_context(&self) -> RouteContext {
        let geometry = self.engine.geometry();
        let origin = self.screen_origin.to_vec2();
        let panel = geometry.panel_rect(self.container.x0, self.container.x1, self.engine.top());
        RouteContext {
            drag_handle: self.drag_handle.unwrap_or(panel + origin),
            scrollable: self.scrollable,
            screen_origin: self.screen_origin,
            scroll_position: self.scroll.scroll_position(self.config.edge),
            slide_offset: self.engine.slide_offset(),
            edge: self.config.edge,
            touch_slop: self.config.touch_slop,
        }
    }

    fn feed_engine(&mut self, event: PointerEvent) -> bool {
        let id = event.pointer_id;
        let result = match event.phase {
            PointerPhase::Down => {
                let panel = self.engine.geometry().panel_rect(
                    self.container.x0,
                    self.container.x1,
                    self.engine.top(),
                );
                let target = if panel.contains(event.position) {
                    CaptureTarget::Panel
                } else {
                    CaptureTarget::Other
                };
                Ok(self
                    .engine
                    .try_capture(id, target, event.position, event.time_ms))
            }
            PointerPhase::Move => self.engine.on_pointer_move(id, event.position, event.time_ms),
            PointerPhase::Up => self.engine.on_pointer_release(id, event.time_ms),
            PointerPhase::Cancel => self.engine.on_pointer_cancel(id),
        };
        result.unwrap_or_else(|err| {
            tracing::debug!(%err, "pointer sample ignored");
            false
        })
    }

    /// Finishes a settle at its target, or drops a capture in place.
    fn abort_interaction(&mut self) {
        if !self.engine.abort() {
            self.engine.force_idle();
        }
        self.pump();
    }

    fn pump(&mut self) {
        let geometry = *self.engine.geometry();
        for event in self.engine.drain_events() {
            self.machine.apply(&event, &geometry, &mut self.listener);
        }
    }
}
