// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch router: decides who owns an in-flight pointer stream.
//!
//! A stream that starts over the panel may belong to the panel (it drags),
//! to a nested scrollable inside the panel (it scrolls), or to whatever sits
//! under the panel's interception (the host). The router keeps an explicit
//! [`Ownership`] state and turns each incoming sample into a list of
//! [`Delivery`]s. When ownership changes mid-stream, the losing side receives
//! a synthetic `Cancel` and the gaining side a synthetic `Down`, so a stream
//! is never owned by two parties at once.
//!
//! The router never touches the panel itself: deliveries addressed to
//! [`RouteTarget::Panel`] are fed to the drag engine by the caller.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_slide_panel::router::{Ownership, RouteContext, RouteTarget, TouchRouter};
//! use understory_slide_panel::{PanelEdge, PointerEvent};
//!
//! let ctx = RouteContext {
//!     drag_handle: Rect::new(0.0, 700.0, 400.0, 800.0),
//!     ..RouteContext::default()
//! };
//! let mut router = TouchRouter::new();
//!
//! let down = router.route(PointerEvent::down(0, Point::new(10.0, 750.0), 0), &ctx);
//! assert_eq!(down.deliveries.len(), 2);
//! assert_eq!(router.ownership(), Ownership::Undecided);
//!
//! // A vertical move on the handle hands the stream to the panel and cancels
//! // the host's copy.
//! let moved = router.route(PointerEvent::moved(0, Point::new(10.0, 700.0), 16), &ctx);
//! assert_eq!(router.ownership(), Ownership::PanelOwns);
//! assert_eq!(moved.deliveries[0].target, RouteTarget::Host);
//! assert_eq!(moved.deliveries[1].target, RouteTarget::Panel);
//! ```

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::geometry::PanelEdge;
use crate::pointer::{PointerEvent, PointerId, PointerPhase};

/// Who currently owns the pointer stream.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// No stream in progress.
    #[default]
    Idle,
    /// A stream started and has been offered to both sides.
    Undecided,
    /// The panel drags.
    PanelOwns,
    /// Content below the panel's interception owns the stream: the nested
    /// scrollable if the stream started over it, the host otherwise.
    ChildOwns,
}

/// Recipient of a routed sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RouteTarget {
    /// The drag engine.
    Panel,
    /// The nested scrollable.
    Child,
    /// The host's own dispatch (main content or panel content).
    Host,
}

/// A sample addressed to one recipient.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Delivery {
    /// Recipient.
    pub target: RouteTarget,
    /// Sample to deliver; may be synthetic.
    pub event: PointerEvent,
}

/// Deliveries produced for a single incoming sample.
pub type Deliveries = SmallVec<[Delivery; 4]>;

/// Result of routing one sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    /// Samples to deliver, in order.
    pub deliveries: Deliveries,
    /// The gesture was just ruled out as a panel drag; the caller should
    /// cancel any drag in progress.
    pub cancel_drag: bool,
    /// The stream ended while another party owned it; a capture the panel
    /// still holds should be forced idle.
    pub reset_panel: bool,
    /// The stream was a tap on the drag handle.
    pub tap: bool,
}

impl Route {
    fn deliver(&mut self, target: RouteTarget, event: PointerEvent) {
        self.deliveries.push(Delivery { target, event });
    }
}

/// Per-sample inputs the router needs from the panel.
///
/// Bounds are in screen coordinates; samples are in container coordinates and
/// are offset by `screen_origin` for hit testing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RouteContext {
    /// Region that starts a panel drag.
    pub drag_handle: Rect,
    /// Bounds of the nested scrollable, if any.
    pub scrollable: Option<Rect>,
    /// Screen position of the container's origin.
    pub screen_origin: Point,
    /// Nested scroll position measured away from the resting edge.
    pub scroll_position: f64,
    /// Current slide offset.
    pub slide_offset: f64,
    /// Edge the panel is attached to.
    pub edge: PanelEdge,
    /// Movement below this distance is not a drag.
    pub touch_slop: f64,
}

impl Default for RouteContext {
    fn default() -> Self {
        Self {
            drag_handle: Rect::ZERO,
            scrollable: None,
            screen_origin: Point::ORIGIN,
            scroll_position: 0.0,
            slide_offset: 0.0,
            edge: PanelEdge::Bottom,
            touch_slop: 8.0,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Gesture {
    pointer_id: PointerId,
    initial: Point,
    prev_y: f64,
    on_handle: bool,
    over_scrollable: bool,
    tap_candidate: bool,
}

impl Gesture {
    fn pass_through(&self) -> RouteTarget {
        if self.over_scrollable {
            RouteTarget::Child
        } else {
            RouteTarget::Host
        }
    }
}

/// Ownership state machine for pointer streams over a sliding panel.
#[derive(Clone, Debug, Default)]
pub struct TouchRouter {
    ownership: Ownership,
    unable_to_drag: bool,
    gesture: Option<Gesture>,
}

impl TouchRouter {
    /// Creates an idle router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current owner of the stream.
    #[must_use]
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Returns `true` once the current gesture has been ruled out as a drag.
    #[must_use]
    pub fn is_unable_to_drag(&self) -> bool {
        self.unable_to_drag
    }

    /// Forgets the current stream.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Routes one sample.
    pub fn route(&mut self, event: PointerEvent, ctx: &RouteContext) -> Route {
        let mut route = Route::default();
        let Some(gesture) = self.gesture else {
            if event.phase == PointerPhase::Down {
                self.begin(event, ctx, &mut route);
            } else {
                route.deliver(RouteTarget::Host, event);
            }
            return route;
        };
        if event.phase == PointerPhase::Down && gesture.pointer_id == event.pointer_id {
            // A repeated down restarts the stream.
            self.begin(event, ctx, &mut route);
            return route;
        }
        if gesture.pointer_id != event.pointer_id {
            // Secondary pointers follow the primary's owner.
            self.deliver_to_owner(&gesture, event, &mut route);
            return route;
        }
        match event.phase {
            PointerPhase::Move => self.on_move(gesture, event, ctx, &mut route),
            PointerPhase::Up | PointerPhase::Cancel => self.end(gesture, event, &mut route),
            PointerPhase::Down => {}
        }
        route
    }

    fn begin(&mut self, event: PointerEvent, ctx: &RouteContext, route: &mut Route) {
        let screen = event.position + ctx.screen_origin.to_vec2();
        let on_handle = ctx.drag_handle.contains(screen);
        let gesture = Gesture {
            pointer_id: event.pointer_id,
            initial: event.position,
            prev_y: event.position.y,
            on_handle,
            over_scrollable: ctx.scrollable.is_some_and(|r| r.contains(screen)),
            tap_candidate: on_handle,
        };
        tracing::trace!(
            pointer_id = event.pointer_id,
            on_handle = gesture.on_handle,
            over_scrollable = gesture.over_scrollable,
            "stream started"
        );
        self.gesture = Some(gesture);
        self.unable_to_drag = false;
        self.ownership = Ownership::Undecided;
        route.deliver(RouteTarget::Panel, event);
        route.deliver(gesture.pass_through(), event);
    }

    fn on_move(
        &mut self,
        mut gesture: Gesture,
        event: PointerEvent,
        ctx: &RouteContext,
        route: &mut Route,
    ) {
        let total = event.position - gesture.initial;
        let (adx, ady) = (total.x.abs(), total.y.abs());
        let dy = event.position.y - gesture.prev_y;
        gesture.prev_y = event.position.y;
        if total.hypot() > ctx.touch_slop {
            gesture.tap_candidate = false;
        }
        self.gesture = Some(gesture);

        if self.unable_to_drag {
            route.deliver(gesture.pass_through(), event);
            return;
        }
        if ady > ctx.touch_slop && adx > ady {
            self.rule_out(&gesture, event, route);
            return;
        }

        if gesture.over_scrollable {
            let owner = if ctx.edge.is_collapsing(dy) {
                if ctx.scroll_position > 0.0 {
                    Ownership::ChildOwns
                } else {
                    Ownership::PanelOwns
                }
            } else if ctx.edge.is_expanding(dy) {
                if ctx.slide_offset < 1.0 {
                    Ownership::PanelOwns
                } else {
                    Ownership::ChildOwns
                }
            } else {
                self.deliver_to_owner(&gesture, event, route);
                return;
            };
            tracing::trace!(dy, scroll = ctx.scroll_position, ?owner, "nested move");
            self.take_over(owner, &gesture, event, route);
            return;
        }

        if !gesture.on_handle {
            self.rule_out(&gesture, event, route);
            return;
        }
        self.take_over(Ownership::PanelOwns, &gesture, event, route);
    }

    fn end(&mut self, gesture: Gesture, event: PointerEvent, route: &mut Route) {
        self.deliver_to_owner(&gesture, event, route);
        if self.ownership == Ownership::ChildOwns {
            route.reset_panel = true;
        }
        route.tap = event.phase == PointerPhase::Up && gesture.tap_candidate && !self.unable_to_drag;
        self.ownership = Ownership::Idle;
        self.gesture = None;
    }

    fn rule_out(&mut self, gesture: &Gesture, event: PointerEvent, route: &mut Route) {
        tracing::debug!(pointer_id = event.pointer_id, "gesture is not a panel drag");
        self.unable_to_drag = true;
        route.cancel_drag = true;
        self.take_over(Ownership::ChildOwns, gesture, event, route);
    }

    /// Moves ownership to `owner`, splicing cancel/down samples as needed, and
    /// delivers `event` to the new owner.
    fn take_over(
        &mut self,
        owner: Ownership,
        gesture: &Gesture,
        event: PointerEvent,
        route: &mut Route,
    ) {
        let pass = gesture.pass_through();
        let (gaining, losing) = match owner {
            Ownership::PanelOwns => (RouteTarget::Panel, pass),
            _ => (pass, RouteTarget::Panel),
        };
        if self.ownership != owner {
            match self.ownership {
                Ownership::Undecided => {
                    route.deliver(losing, event.with_phase(PointerPhase::Cancel));
                }
                Ownership::PanelOwns | Ownership::ChildOwns => {
                    route.deliver(losing, event.with_phase(PointerPhase::Cancel));
                    route.deliver(gaining, event.with_phase(PointerPhase::Down));
                }
                Ownership::Idle => {}
            }
            tracing::debug!(from = ?self.ownership, to = ?owner, "stream ownership changed");
            self.ownership = owner;
        }
        route.deliver(gaining, event);
    }

    fn deliver_to_owner(&self, gesture: &Gesture, event: PointerEvent, route: &mut Route) {
        match self.ownership {
            Ownership::PanelOwns => route.deliver(RouteTarget::Panel, event),
            Ownership::ChildOwns => route.deliver(gesture.pass_through(), event),
            Ownership::Undecided => {
                route.deliver(RouteTarget::Panel, event);
                route.deliver(gesture.pass_through(), event);
            }
            Ownership::Idle => route.deliver(RouteTarget::Host, event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn ctx() -> RouteContext {
        RouteContext {
            drag_handle: Rect::new(0.0, 300.0, 400.0, 350.0),
            scrollable: Some(Rect::new(0.0, 350.0, 400.0, 800.0)),
            ..RouteContext::default()
        }
    }

    fn targets(route: &Route) -> Vec<(RouteTarget, PointerPhase)> {
        route
            .deliveries
            .iter()
            .map(|d| (d.target, d.event.phase))
            .collect()
    }

    #[test]
    fn down_offers_stream_to_panel_and_pass_through() {
        let mut router = TouchRouter::new();
        let r = router.route(PointerEvent::down(0, Point::new(10.0, 320.0), 0), &ctx());
        assert_eq!(
            targets(&r),
            [
                (RouteTarget::Panel, PointerPhase::Down),
                (RouteTarget::Host, PointerPhase::Down)
            ]
        );

        let r = router.route(PointerEvent::down(0, Point::new(10.0, 500.0), 0), &ctx());
        assert_eq!(r.deliveries[1].target, RouteTarget::Child);
    }

    #[test]
    fn hit_testing_uses_screen_origin() {
        let mut router = TouchRouter::new();
        let ctx = RouteContext {
            screen_origin: Point::new(0.0, 100.0),
            ..ctx()
        };
        // Container y 220 is screen y 320: on the handle.
        router.route(PointerEvent::down(0, Point::new(10.0, 220.0), 0), &ctx);
        router.route(PointerEvent::moved(0, Point::new(10.0, 200.0), 16), &ctx);
        assert_eq!(router.ownership(), Ownership::PanelOwns);
    }

    #[test]
    fn vertical_drag_on_handle_goes_to_panel() {
        let mut router = TouchRouter::new();
        router.route(PointerEvent::down(0, Point::new(10.0, 320.0), 0), &ctx());
        let r = router.route(PointerEvent::moved(0, Point::new(10.0, 300.0), 16), &ctx());
        assert_eq!(
            targets(&r),
            [
                (RouteTarget::Host, PointerPhase::Cancel),
                (RouteTarget::Panel, PointerPhase::Move)
            ]
        );
        let r = router.route(PointerEvent::moved(0, Point::new(10.0, 280.0), 32), &ctx());
        assert_eq!(targets(&r), [(RouteTarget::Panel, PointerPhase::Move)]);
        let r = router.route(PointerEvent::up(0, Point::new(10.0, 280.0), 40), &ctx());
        assert_eq!(targets(&r), [(RouteTarget::Panel, PointerPhase::Up)]);
        assert!(!r.tap);
        assert_eq!(router.ownership(), Ownership::Idle);
    }

    #[test]
    fn horizontal_gesture_is_ruled_out() {
        let mut router = TouchRouter::new();
        router.route(PointerEvent::down(0, Point::new(10.0, 320.0), 0), &ctx());
        let r = router.route(PointerEvent::moved(0, Point::new(60.0, 330.0), 16), &ctx());
        assert!(r.cancel_drag);
        assert!(router.is_unable_to_drag());
        assert_eq!(router.ownership(), Ownership::ChildOwns);
        assert_eq!(
            targets(&r),
            [
                (RouteTarget::Panel, PointerPhase::Cancel),
                (RouteTarget::Host, PointerPhase::Move)
            ]
        );

        // Later vertical movement stays with the host.
        let r = router.route(PointerEvent::moved(0, Point::new(60.0, 200.0), 32), &ctx());
        assert!(!r.cancel_drag);
        assert_eq!(targets(&r), [(RouteTarget::Host, PointerPhase::Move)]);

        let r = router.route(PointerEvent::up(0, Point::new(60.0, 200.0), 40), &ctx());
        assert!(r.reset_panel);

        // The next stream starts fresh.
        router.route(PointerEvent::down(0, Point::new(10.0, 320.0), 50), &ctx());
        assert!(!router.is_unable_to_drag());
    }

    #[test]
    fn drag_outside_handle_is_ruled_out() {
        let mut router = TouchRouter::new();
        let ctx = RouteContext {
            scrollable: None,
            ..ctx()
        };
        router.route(PointerEvent::down(0, Point::new(10.0, 500.0), 0), &ctx);
        let r = router.route(PointerEvent::moved(0, Point::new(10.0, 480.0), 16), &ctx);
        assert!(r.cancel_drag);
        assert_eq!(router.ownership(), Ownership::ChildOwns);
    }

    #[test]
    fn nested_scroll_keeps_collapsing_drag_until_at_rest() {
        let mut router = TouchRouter::new();
        let mut ctx = RouteContext {
            slide_offset: 1.0,
            scroll_position: 40.0,
            ..ctx()
        };
        router.route(PointerEvent::down(0, Point::new(10.0, 400.0), 0), &ctx);

        // Dragging down (collapsing) while the child is scrolled.
        let r = router.route(PointerEvent::moved(0, Point::new(10.0, 420.0), 16), &ctx);
        assert_eq!(
            targets(&r),
            [
                (RouteTarget::Panel, PointerPhase::Cancel),
                (RouteTarget::Child, PointerPhase::Move)
            ]
        );
        assert_eq!(router.ownership(), Ownership::ChildOwns);

        // Child reached the top: the panel takes over mid-stream.
        ctx.scroll_position = 0.0;
        let r = router.route(PointerEvent::moved(0, Point::new(10.0, 440.0), 32), &ctx);
        assert_eq!(
            targets(&r),
            [
                (RouteTarget::Child, PointerPhase::Cancel),
                (RouteTarget::Panel, PointerPhase::Down),
                (RouteTarget::Panel, PointerPhase::Move)
            ]
        );
        assert!(r.deliveries.iter().all(|d| d.event.time_ms == 32));
        assert_eq!(router.ownership(), Ownership::PanelOwns);
    }

    #[test]
    fn fully_expanded_panel_hands_expanding_drag_to_child() {
        let mut router = TouchRouter::new();
        let mut ctx = ctx();
        ctx.slide_offset = 0.6;
        router.route(PointerEvent::down(0, Point::new(10.0, 600.0), 0), &ctx);
        let r = router.route(PointerEvent::moved(0, Point::new(10.0, 580.0), 16), &ctx);
        assert_eq!(
            targets(&r),
            [
                (RouteTarget::Child, PointerPhase::Cancel),
                (RouteTarget::Panel, PointerPhase::Move)
            ]
        );

        ctx.slide_offset = 1.0;
        let r = router.route(PointerEvent::moved(0, Point::new(10.0, 560.0), 32), &ctx);
        assert_eq!(
            targets(&r),
            [
                (RouteTarget::Panel, PointerPhase::Cancel),
                (RouteTarget::Child, PointerPhase::Down),
                (RouteTarget::Child, PointerPhase::Move)
            ]
        );

        // A still sample goes to whoever owns the stream.
        let r = router.route(PointerEvent::moved(0, Point::new(12.0, 560.0), 40), &ctx);
        assert_eq!(targets(&r), [(RouteTarget::Child, PointerPhase::Move)]);

        let r = router.route(PointerEvent::up(0, Point::new(12.0, 560.0), 48), &ctx);
        assert_eq!(targets(&r), [(RouteTarget::Child, PointerPhase::Up)]);
        assert!(r.reset_panel);
    }

    #[test]
    fn top_edge_panel_collapses_upward() {
        let mut router = TouchRouter::new();
        let ctx = RouteContext {
            edge: PanelEdge::Top,
            scroll_position: 10.0,
            slide_offset: 1.0,
            ..ctx()
        };
        router.route(PointerEvent::down(0, Point::new(10.0, 500.0), 0), &ctx);
        // Moving up collapses a top-attached panel; the scrolled child keeps it.
        router.route(PointerEvent::moved(0, Point::new(10.0, 480.0), 16), &ctx);
        assert_eq!(router.ownership(), Ownership::ChildOwns);
    }

    #[test]
    fn tap_on_handle_is_reported() {
        let mut router = TouchRouter::new();
        router.route(PointerEvent::down(0, Point::new(10.0, 320.0), 0), &ctx());
        router.route(PointerEvent::moved(0, Point::new(12.0, 322.0), 10), &ctx());
        let r = router.route(PointerEvent::up(0, Point::new(12.0, 322.0), 20), &ctx());
        assert!(r.tap);

        // Not on cancel, not off the handle.
        router.route(PointerEvent::down(0, Point::new(10.0, 320.0), 30), &ctx());
        let r = router.route(PointerEvent::cancel(0, Point::new(10.0, 320.0), 40), &ctx());
        assert!(!r.tap);
        router.route(PointerEvent::down(0, Point::new(10.0, 500.0), 50), &ctx());
        let r = router.route(PointerEvent::up(0, Point::new(10.0, 500.0), 60), &ctx());
        assert!(!r.tap);
    }

    #[test]
    fn stray_samples_go_to_the_host() {
        let mut router = TouchRouter::new();
        let r = router.route(PointerEvent::moved(0, Point::new(10.0, 320.0), 0), &ctx());
        assert_eq!(targets(&r), [(RouteTarget::Host, PointerPhase::Move)]);
    }

    #[test]
    fn secondary_pointer_follows_owner() {
        let mut router = TouchRouter::new();
        router.route(PointerEvent::down(0, Point::new(10.0, 320.0), 0), &ctx());
        router.route(PointerEvent::moved(0, Point::new(10.0, 300.0), 16), &ctx());
        let r = router.route(PointerEvent::moved(5, Point::new(200.0, 100.0), 20), &ctx());
        assert_eq!(targets(&r), [(RouteTarget::Panel, PointerPhase::Move)]);
        assert_eq!(router.ownership(), Ownership::PanelOwns);
    }
}
