// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallax translation of the main content.
//!
//! As the panel expands, the main content can be nudged in the same direction
//! by up to `max` pixels. Negative offsets (hiding) never translate.

use crate::geometry::PanelEdge;
use crate::listener::PanelListener;

/// Vertical translation of the main content for a slide offset.
///
/// Content under a bottom-attached panel moves up; under a top-attached
/// panel it moves down.
#[must_use]
pub fn parallax_offset(offset: f64, max: f64, edge: PanelEdge) -> f64 {
    let travel = max * offset.max(0.0);
    match edge {
        PanelEdge::Bottom => -travel,
        PanelEdge::Top => travel,
    }
}

/// Tracks the main content translation by listening to slide notifications.
///
/// ```
/// use understory_slide_panel::{PanelEdge, PanelListener, ParallaxAdapter};
///
/// let mut parallax = ParallaxAdapter::new(100.0, PanelEdge::Bottom);
/// parallax.on_slide(0.5);
/// assert_eq!(parallax.translation(), -50.0);
/// parallax.on_slide(-0.2);
/// assert_eq!(parallax.translation(), 0.0);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ParallaxAdapter {
    max: f64,
    edge: PanelEdge,
    translation: f64,
}

impl ParallaxAdapter {
    /// Creates an adapter at rest.
    #[must_use]
    pub fn new(max: f64, edge: PanelEdge) -> Self {
        Self {
            max,
            edge,
            translation: 0.0,
        }
    }

    /// Maximum translation in pixels.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Changes the maximum translation. Takes effect on the next slide.
    pub fn set_max(&mut self, max: f64) {
        self.max = max;
    }

    /// Changes the edge. Takes effect on the next slide.
    pub fn set_edge(&mut self, edge: PanelEdge) {
        self.edge = edge;
    }

    /// Latest translation.
    #[must_use]
    pub fn translation(&self) -> f64 {
        self.translation
    }
}

impl PanelListener for ParallaxAdapter {
    fn on_slide(&mut self, offset: f64) {
        self.translation = parallax_offset(offset, self.max, self.edge);
    }
}
