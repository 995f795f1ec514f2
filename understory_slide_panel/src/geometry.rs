// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset ⇄ pixel conversion for a sliding panel.
//!
//! A panel is attached to one edge of its container and slides away from it.
//! Its position is described either as a pixel `top` (the y coordinate of the
//! panel's upper edge, in container coordinates) or as a normalized slide
//! offset where `0.0` is collapsed (only the peek strip visible) and `1.0` is
//! fully expanded.
//!
//! The two conversions are exact algebraic inverses for a fixed geometry and
//! perform no clamping; clamping is the drag engine's job.
//!
//! ```
//! use understory_slide_panel::{PanelEdge, PanelGeometry};
//!
//! // 800px tall container, 500px tall panel peeking 100px from the bottom.
//! let geometry = PanelGeometry::new(0.0, 800.0, 500.0, 100.0, PanelEdge::Bottom);
//! assert_eq!(geometry.range(), 400.0);
//! assert_eq!(geometry.top_from_offset(0.0), 700.0);
//! assert_eq!(geometry.top_from_offset(1.0), 300.0);
//! assert_eq!(geometry.offset_from_top(500.0), 0.5);
//! ```

use kurbo::Rect;

/// The container edge a panel is attached to.
///
/// A bottom-attached panel peeks up from the bottom edge and slides up to
/// expand; a top-attached panel hangs from the top edge and slides down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PanelEdge {
    /// Attached to the bottom edge, expands upward.
    #[default]
    Bottom,
    /// Attached to the top edge, expands downward.
    Top,
}

impl PanelEdge {
    /// Converts a screen-space vertical velocity (positive = downward) into a
    /// velocity that is positive toward the expanded position.
    #[must_use]
    pub fn expanding_velocity(self, screen_velocity_y: f64) -> f64 {
        match self {
            Self::Bottom => -screen_velocity_y,
            Self::Top => screen_velocity_y,
        }
    }

    /// Returns `true` if a vertical pointer delta moves the panel toward its
    /// collapsed position.
    #[must_use]
    pub fn is_collapsing(self, dy: f64) -> bool {
        self.expanding_velocity(dy) < 0.0
    }

    /// Returns `true` if a vertical pointer delta moves the panel toward its
    /// expanded position.
    #[must_use]
    pub fn is_expanding(self, dy: f64) -> bool {
        self.expanding_velocity(dy) > 0.0
    }
}

/// Measured geometry needed to place a panel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanelGeometry {
    /// Top of the container's content box.
    pub container_top: f64,
    /// Bottom of the container's content box.
    pub container_bottom: f64,
    /// Measured height of the slideable panel.
    pub panel_height: f64,
    /// Height of the strip that stays visible while collapsed.
    pub peek_height: f64,
    /// Edge the panel is attached to.
    pub edge: PanelEdge,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, PanelEdge::Bottom)
    }
}

impl PanelGeometry {
    /// Creates a geometry from container bounds and panel measurements.
    #[must_use]
    pub const fn new(
        container_top: f64,
        container_bottom: f64,
        panel_height: f64,
        peek_height: f64,
        edge: PanelEdge,
    ) -> Self {
        Self {
            container_top,
            container_bottom,
            panel_height,
            peek_height,
            edge,
        }
    }

    /// Pixel distance the panel travels between collapsed and expanded.
    ///
    /// Never negative: a panel shorter than its peek height has no range.
    #[must_use]
    pub fn range(&self) -> f64 {
        (self.panel_height - self.peek_height).max(0.0)
    }

    /// Height of the container's content box.
    #[must_use]
    pub fn container_height(&self) -> f64 {
        self.container_bottom - self.container_top
    }

    /// Panel top for the given slide offset.
    #[must_use]
    pub fn top_from_offset(&self, offset: f64) -> f64 {
        let travel = offset * self.range();
        match self.edge {
            PanelEdge::Bottom => self.container_bottom - self.peek_height - travel,
            PanelEdge::Top => self.container_top - self.panel_height + self.peek_height + travel,
        }
    }

    /// Slide offset for the given panel top.
    ///
    /// Returns `0.0` when the range is zero.
    #[must_use]
    pub fn offset_from_top(&self, top: f64) -> f64 {
        let range = self.range();
        if range <= 0.0 {
            return 0.0;
        }
        let collapsed = self.collapsed_top();
        match self.edge {
            PanelEdge::Bottom => (collapsed - top) / range,
            PanelEdge::Top => (top - collapsed) / range,
        }
    }

    /// Panel top while collapsed.
    #[must_use]
    pub fn collapsed_top(&self) -> f64 {
        self.top_from_offset(0.0)
    }

    /// Panel top while fully expanded.
    #[must_use]
    pub fn expanded_top(&self) -> f64 {
        self.top_from_offset(1.0)
    }

    /// Panel top while hidden: the collapsed top pushed outward by one peek height.
    #[must_use]
    pub fn hidden_top(&self) -> f64 {
        match self.edge {
            PanelEdge::Bottom => self.collapsed_top() + self.peek_height,
            PanelEdge::Top => self.collapsed_top() - self.peek_height,
        }
    }

    /// Slide offset of the hidden position (negative when the range is non-zero).
    #[must_use]
    pub fn hidden_offset(&self) -> f64 {
        self.offset_from_top(self.hidden_top())
    }

    /// Smallest top the panel can be dragged to.
    #[must_use]
    pub fn upper_top(&self) -> f64 {
        self.collapsed_top().min(self.expanded_top())
    }

    /// Largest top the panel can be dragged to.
    #[must_use]
    pub fn lower_top(&self) -> f64 {
        self.collapsed_top().max(self.expanded_top())
    }

    /// Clamps a proposed top into the draggable span.
    #[must_use]
    pub fn clamp_top(&self, top: f64) -> f64 {
        top.clamp(self.upper_top(), self.lower_top())
    }

    /// Panel rectangle at `top`, spanning `[x0, x1]` horizontally.
    #[must_use]
    pub fn panel_rect(&self, x0: f64, x1: f64, top: f64) -> Rect {
        Rect::new(x0, top, x1, top + self.panel_height)
    }
}
