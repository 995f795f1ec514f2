// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested scroll position accessors.
//!
//! The router only needs one number from a nested scrollable: how far it is
//! scrolled away from the position it rests at when the panel is collapsed.
//! For a bottom-attached panel that is the distance from the top of the
//! content; for a top-attached panel it is the distance from the bottom.

use crate::geometry::PanelEdge;

/// Reads the scroll position of the panel's nested scrollable.
pub trait NestedScroll {
    /// Scroll distance away from the resting edge; `0` when at rest.
    fn scroll_position(&self, edge: PanelEdge) -> f64;
}

/// No nested scrollable: always at rest.
impl NestedScroll for () {
    fn scroll_position(&self, _edge: PanelEdge) -> f64 {
        0.0
    }
}

impl<F: Fn(PanelEdge) -> f64> NestedScroll for F {
    fn scroll_position(&self, edge: PanelEdge) -> f64 {
        self(edge)
    }
}

/// Scroll metrics of a generic vertical scroll container.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the content.
    pub offset: f64,
    /// Total content height.
    pub content_extent: f64,
    /// Visible height.
    pub viewport_extent: f64,
}

impl NestedScroll for ScrollMetrics {
    fn scroll_position(&self, edge: PanelEdge) -> f64 {
        match edge {
            PanelEdge::Bottom => self.offset.max(0.0),
            PanelEdge::Top => (self.content_extent - self.viewport_extent - self.offset).max(0.0),
        }
    }
}
