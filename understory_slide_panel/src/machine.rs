// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel state machine: turns drag engine events into panel states and
//! listener notifications.
//!
//! The panel enters [`PanelState::Dragging`] on the first movement and
//! leaves it when the engine goes idle, at which point the resting offset is
//! classified into a [`StableState`]. A canceled interaction reverts to the
//! state it started from without a state notification.

use crate::drag::{DragEvent, DragPhase};
use crate::geometry::PanelGeometry;
use crate::listener::PanelListener;
use crate::state::{PanelState, StableState};

/// Offsets this close to `0` or `1` are snapped onto them.
pub const OFFSET_EPSILON: f64 = 1e-6;

/// Classifies a resting offset, snapping near-integral values.
///
/// ```
/// use understory_slide_panel::machine::classify_offset;
/// use understory_slide_panel::StableState;
///
/// assert_eq!(classify_offset(0.999_999_9), (StableState::Expanded, 1.0));
/// assert_eq!(classify_offset(0.4), (StableState::Anchored, 0.4));
/// assert_eq!(classify_offset(-0.25), (StableState::Hidden, -0.25));
/// ```
#[must_use]
pub fn classify_offset(offset: f64) -> (StableState, f64) {
    if offset >= 1.0 - OFFSET_EPSILON {
        (StableState::Expanded, 1.0)
    } else if offset.abs() < OFFSET_EPSILON {
        (StableState::Collapsed, 0.0)
    } else if offset < 0.0 {
        (StableState::Hidden, offset)
    } else {
        (StableState::Anchored, offset)
    }
}

/// Tracks the panel state, slide offset, visibility and edge contact.
#[derive(Clone, Debug)]
pub struct PanelStateMachine {
    state: PanelState,
    offset: f64,
    panel_visible: bool,
    at_top: bool,
    at_bottom: bool,
}

impl Default for PanelStateMachine {
    fn default() -> Self {
        Self::new(StableState::default())
    }
}

impl PanelStateMachine {
    /// Creates a machine resting in `initial`.
    #[must_use]
    pub fn new(initial: StableState) -> Self {
        Self {
            state: PanelState::Stable(initial),
            offset: 0.0,
            panel_visible: initial != StableState::Hidden,
            at_top: false,
            at_bottom: false,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Current slide offset.
    #[must_use]
    pub fn slide_offset(&self) -> f64 {
        self.offset
    }

    /// Returns `true` unless the panel came to rest hidden.
    #[must_use]
    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Returns `true` while the panel top sits at its upper screen extreme.
    #[must_use]
    pub fn is_top_reached(&self) -> bool {
        self.at_top
    }

    /// Returns `true` while the panel top sits at its lower screen extreme.
    #[must_use]
    pub fn is_bottom_reached(&self) -> bool {
        self.at_bottom
    }

    /// Shows or hides the panel without notifications.
    pub fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
    }

    /// Forces a resting state without notifications (restore and layout).
    pub fn set_stable(&mut self, state: StableState) {
        self.state = PanelState::Stable(state);
        self.panel_visible = state != StableState::Hidden;
    }

    /// Places the panel after a layout: records the offset and resets edge
    /// contact from the actual top without notifications.
    pub fn place(&mut self, top: f64, geometry: &PanelGeometry) {
        self.offset = geometry.offset_from_top(top);
        self.at_top = top <= geometry.upper_top();
        self.at_bottom = top >= geometry.lower_top();
    }

    /// Applies one drag engine event.
    pub fn apply<L: PanelListener + ?Sized>(
        &mut self,
        event: &DragEvent,
        geometry: &PanelGeometry,
        listener: &mut L,
    ) {
        match *event {
            DragEvent::PositionChanged { top, .. } => {
                if let PanelState::Stable(resume_to) = self.state {
                    tracing::debug!(from = %resume_to, "panel dragging");
                    self.state = PanelState::Dragging { resume_to };
                }
                self.slide_to(top, geometry, listener);
            }
            DragEvent::PhaseChanged(DragPhase::Idle) => self.settle(listener),
            DragEvent::Canceled { top } => {
                if let PanelState::Dragging { resume_to } = self.state {
                    tracing::debug!(to = %resume_to, "panel drag reverted");
                    self.state = PanelState::Stable(resume_to);
                }
                if let PanelState::Stable(state) = self.state {
                    self.panel_visible = state != StableState::Hidden;
                }
                if geometry.offset_from_top(top) != self.offset {
                    self.slide_to(top, geometry, listener);
                }
            }
            DragEvent::Captured { .. }
            | DragEvent::Released { .. }
            | DragEvent::PhaseChanged(_) => {}
        }
    }

    fn slide_to<L: PanelListener + ?Sized>(
        &mut self,
        top: f64,
        geometry: &PanelGeometry,
        listener: &mut L,
    ) {
        self.offset = geometry.offset_from_top(top);
        listener.on_slide(self.offset);

        let at_top = top <= geometry.upper_top();
        if at_top != self.at_top {
            self.at_top = at_top;
            listener.on_top_reached(at_top);
        }
        let at_bottom = top >= geometry.lower_top();
        if at_bottom != self.at_bottom {
            self.at_bottom = at_bottom;
            listener.on_bottom_reached(at_bottom);
        }
    }

    fn settle<L: PanelListener + ?Sized>(&mut self, listener: &mut L) {
        let PanelState::Dragging { resume_to } = self.state else {
            return;
        };
        let (state, offset) = classify_offset(self.offset);
        self.offset = offset;
        self.state = PanelState::Stable(state);
        self.panel_visible = state != StableState::Hidden;
        if state == resume_to {
            return;
        }
        tracing::debug!(from = %resume_to, to = %state, offset, "panel settled");
        match state {
            StableState::Expanded => listener.on_expanded(),
            StableState::Collapsed => listener.on_collapsed(),
            StableState::Anchored => listener.on_anchored(),
            StableState::Hidden => listener.on_hidden(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PanelEdge;
    use crate::listener::PanelEvent;
    use alloc::vec::Vec;

    fn geometry() -> PanelGeometry {
        PanelGeometry::new(0.0, 800.0, 500.0, 100.0, PanelEdge::Bottom)
    }

    fn moved(top: f64) -> DragEvent {
        DragEvent::PositionChanged { top, dy: 0.0 }
    }

    const IDLE: DragEvent = DragEvent::PhaseChanged(DragPhase::Idle);

    #[test]
    fn classification_snaps_near_edges() {
        assert_eq!(classify_offset(1.0), (StableState::Expanded, 1.0));
        assert_eq!(classify_offset(1e-7), (StableState::Collapsed, 0.0));
        assert_eq!(classify_offset(-1e-7), (StableState::Collapsed, 0.0));
        assert_eq!(classify_offset(0.5), (StableState::Anchored, 0.5));
        assert_eq!(classify_offset(-0.1), (StableState::Hidden, -0.1));
    }

    #[test]
    fn drag_to_expanded_notifies_once() {
        let g = geometry();
        let mut machine = PanelStateMachine::default();
        machine.place(g.collapsed_top(), &g);
        let mut log: Vec<PanelEvent> = Vec::new();

        for top in [650.0, 500.0, 300.0] {
            machine.apply(&moved(top), &g, &mut log);
            assert!(machine.state().is_dragging());
        }
        machine.apply(&IDLE, &g, &mut log);
        machine.apply(&IDLE, &g, &mut log);

        assert_eq!(machine.state(), PanelState::EXPANDED);
        assert_eq!(
            log,
            [
                PanelEvent::Slide(0.125),
                PanelEvent::BottomReached(false),
                PanelEvent::Slide(0.5),
                PanelEvent::Slide(1.0),
                PanelEvent::TopReached(true),
                PanelEvent::Expanded,
            ]
        );
    }

    #[test]
    fn returning_to_the_start_state_is_silent() {
        let g = geometry();
        let mut machine = PanelStateMachine::default();
        machine.place(g.collapsed_top(), &g);
        let mut log: Vec<PanelEvent> = Vec::new();
        machine.apply(&moved(600.0), &g, &mut log);
        machine.apply(&moved(700.0), &g, &mut log);
        machine.apply(&IDLE, &g, &mut log);
        assert_eq!(machine.state(), PanelState::COLLAPSED);
        assert!(!log.iter().any(|e| *e == PanelEvent::Collapsed));
    }

    #[test]
    fn settling_past_collapsed_hides_the_panel() {
        let g = geometry();
        let mut machine = PanelStateMachine::default();
        machine.place(g.collapsed_top(), &g);
        let mut log: Vec<PanelEvent> = Vec::new();
        machine.apply(&moved(g.hidden_top()), &g, &mut log);
        machine.apply(&IDLE, &g, &mut log);
        assert_eq!(machine.state(), PanelState::HIDDEN);
        assert!(!machine.is_panel_visible());
        assert_eq!(log.last(), Some(&PanelEvent::Hidden));
    }

    #[test]
    fn intermediate_rest_is_anchored() {
        let g = geometry();
        let mut machine = PanelStateMachine::new(StableState::Expanded);
        machine.place(g.expanded_top(), &g);
        let mut log: Vec<PanelEvent> = Vec::new();
        machine.apply(&moved(500.0), &g, &mut log);
        machine.apply(&IDLE, &g, &mut log);
        assert_eq!(machine.state(), PanelState::ANCHORED);
        assert_eq!(
            log,
            [
                PanelEvent::Slide(0.5),
                PanelEvent::TopReached(false),
                PanelEvent::Anchored
            ]
        );
    }

    #[test]
    fn cancel_reverts_without_state_notification() {
        let g = geometry();
        let mut machine = PanelStateMachine::new(StableState::Collapsed);
        machine.place(g.collapsed_top(), &g);
        let mut log: Vec<PanelEvent> = Vec::new();
        machine.apply(&moved(600.0), &g, &mut log);
        machine.apply(&DragEvent::Canceled { top: 700.0 }, &g, &mut log);
        assert_eq!(machine.state(), PanelState::COLLAPSED);
        assert_eq!(machine.slide_offset(), 0.0);
        assert_eq!(
            log,
            [
                PanelEvent::Slide(0.25),
                PanelEvent::BottomReached(false),
                PanelEvent::Slide(0.0),
                PanelEvent::BottomReached(true),
            ]
        );

        // A second cancel changes nothing.
        log.clear();
        machine.apply(&DragEvent::Canceled { top: 700.0 }, &g, &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn idle_without_movement_keeps_state() {
        let g = geometry();
        let mut machine = PanelStateMachine::new(StableState::Anchored);
        machine.place(500.0, &g);
        let mut log: Vec<PanelEvent> = Vec::new();
        machine.apply(&DragEvent::Captured { pointer_id: 0 }, &g, &mut log);
        machine.apply(&IDLE, &g, &mut log);
        assert_eq!(machine.state(), PanelState::ANCHORED);
        assert!(log.is_empty());
    }

    #[test]
    fn canceled_show_stays_hidden_and_invisible() {
        let g = geometry();
        let mut machine = PanelStateMachine::new(StableState::Hidden);
        machine.place(g.hidden_top(), &g);
        let mut log: Vec<PanelEvent> = Vec::new();

        // Showing makes the panel visible before it starts moving.
        machine.set_panel_visible(true);
        machine.apply(&moved(760.0), &g, &mut log);
        machine.apply(&DragEvent::Canceled { top: g.hidden_top() }, &g, &mut log);
        assert_eq!(machine.state(), PanelState::HIDDEN);
        assert!(!machine.is_panel_visible());

        // Canceled before the first frame moved it.
        machine.set_panel_visible(true);
        machine.apply(&DragEvent::Canceled { top: g.hidden_top() }, &g, &mut log);
        assert!(!machine.is_panel_visible());
    }

    #[test]
    fn edge_flags_follow_the_top() {
        let g = geometry();
        let mut machine = PanelStateMachine::default();
        machine.place(g.collapsed_top(), &g);
        assert!(machine.is_bottom_reached());
        assert!(!machine.is_top_reached());

        let mut log: Vec<PanelEvent> = Vec::new();
        machine.apply(&moved(500.0), &g, &mut log);
        assert!(!machine.is_bottom_reached());
        assert!(!machine.is_top_reached());
        machine.apply(&moved(g.expanded_top()), &g, &mut log);
        assert!(machine.is_top_reached());
    }
}
