// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel lifecycle notifications.
//!
//! Callbacks are delivered synchronously from whichever call moved the panel.
//! Every method has an empty default, so implementors only override what they
//! need.
//!
//! ```
//! use understory_slide_panel::{PanelEvent, PanelListener, PanelState};
//!
//! let mut log: Vec<PanelEvent> = Vec::new();
//! log.on_slide(0.25);
//! log.on_expanded();
//! assert_eq!(log, [PanelEvent::Slide(0.25), PanelEvent::Expanded]);
//! ```

use alloc::vec::Vec;

use crate::settle::Interpolator;
use crate::state::PanelState;

/// Receives panel lifecycle notifications.
pub trait PanelListener {
    /// The slide offset changed.
    fn on_slide(&mut self, offset: f64) {
        let _ = offset;
    }

    /// The panel came to rest collapsed.
    fn on_collapsed(&mut self) {}

    /// The panel came to rest fully expanded.
    fn on_expanded(&mut self) {}

    /// The panel came to rest at the anchor point.
    fn on_anchored(&mut self) {}

    /// The panel came to rest hidden.
    fn on_hidden(&mut self) {}

    /// A hide animation was started.
    fn on_hidden_executed(&mut self, interpolator: Interpolator, duration_ms: u64) {
        let _ = (interpolator, duration_ms);
    }

    /// A show animation (hidden to collapsed) was started.
    fn on_shown_executed(&mut self, interpolator: Interpolator, duration_ms: u64) {
        let _ = (interpolator, duration_ms);
    }

    /// The panel top reached (`true`) or left (`false`) the upper screen extreme.
    fn on_top_reached(&mut self, reached: bool) {
        let _ = reached;
    }

    /// The panel top reached (`true`) or left (`false`) the lower screen extreme.
    fn on_bottom_reached(&mut self, reached: bool) {
        let _ = reached;
    }

    /// The panel was positioned by its first layout.
    fn on_layout(&mut self, state: PanelState) {
        let _ = state;
    }
}

impl PanelListener for () {}

/// A recorded notification; see [`PanelListener`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PanelEvent {
    /// [`PanelListener::on_slide`].
    Slide(f64),
    /// [`PanelListener::on_collapsed`].
    Collapsed,
    /// [`PanelListener::on_expanded`].
    Expanded,
    /// [`PanelListener::on_anchored`].
    Anchored,
    /// [`PanelListener::on_hidden`].
    Hidden,
    /// [`PanelListener::on_hidden_executed`].
    HiddenExecuted {
        /// Duration of the hide animation.
        duration_ms: u64,
    },
    /// [`PanelListener::on_shown_executed`].
    ShownExecuted {
        /// Duration of the show animation.
        duration_ms: u64,
    },
    /// [`PanelListener::on_top_reached`].
    TopReached(bool),
    /// [`PanelListener::on_bottom_reached`].
    BottomReached(bool),
    /// [`PanelListener::on_layout`].
    Layout(PanelState),
}

impl PanelListener for Vec<PanelEvent> {
    fn on_slide(&mut self, offset: f64) {
        self.push(PanelEvent::Slide(offset));
    }

    fn on_collapsed(&mut self) {
        self.push(PanelEvent::Collapsed);
    }

    fn on_expanded(&mut self) {
        self.push(PanelEvent::Expanded);
    }

    fn on_anchored(&mut self) {
        self.push(PanelEvent::Anchored);
    }

    fn on_hidden(&mut self) {
        self.push(PanelEvent::Hidden);
    }

    fn on_hidden_executed(&mut self, _interpolator: Interpolator, duration_ms: u64) {
        self.push(PanelEvent::HiddenExecuted { duration_ms });
    }

    fn on_shown_executed(&mut self, _interpolator: Interpolator, duration_ms: u64) {
        self.push(PanelEvent::ShownExecuted { duration_ms });
    }

    fn on_top_reached(&mut self, reached: bool) {
        self.push(PanelEvent::TopReached(reached));
    }

    fn on_bottom_reached(&mut self, reached: bool) {
        self.push(PanelEvent::BottomReached(reached));
    }

    fn on_layout(&mut self, state: PanelState) {
        self.push(PanelEvent::Layout(state));
    }
}

/// Forwards every notification to both listeners, first `A` then `B`.
impl<A: PanelListener, B: PanelListener> PanelListener for (A, B) {
    fn on_slide(&mut self, offset: f64) {
        self.0.on_slide(offset);
        self.1.on_slide(offset);
    }

    fn on_collapsed(&mut self) {
        self.0.on_collapsed();
        self.1.on_collapsed();
    }

    fn on_expanded(&mut self) {
        self.0.on_expanded();
        self.1.on_expanded();
    }

    fn on_anchored(&mut self) {
        self.0.on_anchored();
        self.1.on_anchored();
    }

    fn on_hidden(&mut self) {
        self.0.on_hidden();
        self.1.on_hidden();
    }

    fn on_hidden_executed(&mut self, interpolator: Interpolator, duration_ms: u64) {
        self.0.on_hidden_executed(interpolator, duration_ms);
        self.1.on_hidden_executed(interpolator, duration_ms);
    }

    fn on_shown_executed(&mut self, interpolator: Interpolator, duration_ms: u64) {
        self.0.on_shown_executed(interpolator, duration_ms);
        self.1.on_shown_executed(interpolator, duration_ms);
    }

    fn on_top_reached(&mut self, reached: bool) {
        self.0.on_top_reached(reached);
        self.1.on_top_reached(reached);
    }

    fn on_bottom_reached(&mut self, reached: bool) {
        self.0.on_bottom_reached(reached);
        self.1.on_bottom_reached(reached);
    }

    fn on_layout(&mut self, state: PanelState) {
        self.0.on_layout(state);
        self.1.on_layout(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settle::linear;

    #[test]
    fn unit_listener_accepts_everything() {
        ().on_slide(0.5);
        ().on_hidden_executed(linear, 100);
        ().on_layout(PanelState::COLLAPSED);
    }

    #[test]
    fn pair_fans_out_in_order() {
        let mut pair: (Vec<PanelEvent>, Vec<PanelEvent>) = (Vec::new(), Vec::new());
        pair.on_top_reached(true);
        pair.on_shown_executed(linear, 42);
        let expected = [
            PanelEvent::TopReached(true),
            PanelEvent::ShownExecuted { duration_ms: 42 },
        ];
        assert_eq!(pair.0, expected);
        assert_eq!(pair.1, expected);
    }
}
