// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child placement and paint geometry for the current panel position.
//!
//! Nothing here draws; an [`Arrangement`] lists the rectangles and colors a
//! host needs to lay out and paint the two children.

use kurbo::Rect;

use crate::config::PanelConfig;
use crate::geometry::{PanelEdge, PanelGeometry};
use crate::parallax::parallax_offset;
use crate::state::{PanelState, StableState};

/// Scales the alpha channel of an ARGB color by `offset`.
///
/// ```
/// use understory_slide_panel::arrange::covered_fade_color;
///
/// assert_eq!(covered_fade_color(0x9900_0000, 1.0), 0x9900_0000);
/// assert_eq!(covered_fade_color(0x9900_0000, 0.5), 0x4C00_0000);
/// assert_eq!(covered_fade_color(0x80FF_0000, 0.0), 0x00FF_0000);
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "alpha is clamped to 0..=255 before the cast"
)]
pub fn covered_fade_color(color: u32, offset: f64) -> u32 {
    let base_alpha = f64::from(color >> 24);
    let alpha = (base_alpha * offset.clamp(0.0, 1.0)) as u32;
    (alpha.min(0xFF) << 24) | (color & 0x00FF_FFFF)
}

/// Where the children go and what to paint around them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arrangement {
    /// Panel bounds at its current position.
    pub panel: Rect,
    /// Whether the panel should be shown at all.
    pub panel_visible: bool,
    /// Main content bounds.
    pub main: Rect,
    /// Vertical parallax translation applied to the main content.
    pub main_translation: f64,
    /// Clip applied when painting the main content.
    pub main_clip: Option<Rect>,
    /// Scrim color painted over the (clipped) main content.
    pub scrim: Option<u32>,
    /// Shadow band along the panel's leading edge.
    pub shadow: Option<Rect>,
}

impl Arrangement {
    /// Arranges both children inside `container` (content box).
    #[must_use]
    pub fn compute(
        container: Rect,
        geometry: &PanelGeometry,
        top: f64,
        state: PanelState,
        panel_visible: bool,
        config: &PanelConfig,
    ) -> Self {
        let offset = geometry.offset_from_top(top);
        let panel = geometry.panel_rect(container.x0, container.x1, top);
        let hidden = state.is(StableState::Hidden);
        let overlay = config.overlay();

        let main = if overlay || hidden {
            container
        } else {
            // The main content gives up the peek strip and follows the panel
            // once it moves past collapsed.
            match geometry.edge {
                PanelEdge::Bottom => {
                    let bottom = top.max(geometry.collapsed_top());
                    Rect::new(container.x0, container.y0, container.x1, bottom)
                }
                PanelEdge::Top => {
                    let panel_bottom = top + geometry.panel_height;
                    let collapsed_bottom = geometry.collapsed_top() + geometry.panel_height;
                    let y0 = panel_bottom.min(collapsed_bottom).max(container.y0);
                    Rect::new(container.x0, y0, container.x1, container.y1)
                }
            }
        };

        let main_translation = if config.parallax_max > 0.0 {
            parallax_offset(offset, config.parallax_max, geometry.edge)
        } else {
            0.0
        };

        let main_clip = (config.clip_panel() && !overlay && panel_visible).then(|| {
            match geometry.edge {
                PanelEdge::Bottom => Rect::new(
                    container.x0,
                    container.y0,
                    container.x1,
                    container.y1.min(panel.y0),
                ),
                PanelEdge::Top => Rect::new(
                    container.x0,
                    container.y0.max(panel.y1),
                    container.x1,
                    container.y1,
                ),
            }
        });

        let scrim = (config.covered_fade_color != 0 && offset > 0.0)
            .then(|| covered_fade_color(config.covered_fade_color, offset));

        let shadow_height = config.shadow_height;
        let shadow = (shadow_height > 0.0 && panel_visible).then(|| match geometry.edge {
            PanelEdge::Bottom => Rect::new(panel.x0, panel.y0 - shadow_height, panel.x1, panel.y0),
            PanelEdge::Top => Rect::new(panel.x0, panel.y1, panel.x1, panel.y1 + shadow_height),
        });

        Self {
            panel,
            panel_visible,
            main,
            main_translation,
            main_clip,
            scrim,
            shadow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelFlags;

    const CONTAINER: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

    fn geometry(edge: PanelEdge) -> PanelGeometry {
        PanelGeometry::new(0.0, 800.0, 500.0, 100.0, edge)
    }

    #[test]
    fn collapsed_bottom_panel_shrinks_main() {
        let g = geometry(PanelEdge::Bottom);
        let a = Arrangement::compute(
            CONTAINER,
            &g,
            700.0,
            PanelState::COLLAPSED,
            true,
            &PanelConfig::default(),
        );
        assert_eq!(a.panel, Rect::new(0.0, 700.0, 400.0, 1200.0));
        assert_eq!(a.main, Rect::new(0.0, 0.0, 400.0, 700.0));
        assert_eq!(a.main_clip, Some(Rect::new(0.0, 0.0, 400.0, 700.0)));
        assert_eq!(a.scrim, None);
        assert_eq!(a.shadow, Some(Rect::new(0.0, 696.0, 400.0, 700.0)));
    }

    #[test]
    fn expanding_keeps_main_and_fades_it() {
        let g = geometry(PanelEdge::Bottom);
        let a = Arrangement::compute(
            CONTAINER,
            &g,
            500.0,
            PanelState::ANCHORED,
            true,
            &PanelConfig::default(),
        );
        assert_eq!(a.main, Rect::new(0.0, 0.0, 400.0, 700.0));
        assert_eq!(a.main_clip, Some(Rect::new(0.0, 0.0, 400.0, 500.0)));
        assert_eq!(a.scrim, Some(0x4C00_0000));
    }

    #[test]
    fn hiding_grows_main_with_panel() {
        let g = geometry(PanelEdge::Bottom);
        let config = PanelConfig::default();
        let moving = Arrangement::compute(
            CONTAINER,
            &g,
            750.0,
            PanelState::Dragging {
                resume_to: StableState::Collapsed,
            },
            true,
            &config,
        );
        assert_eq!(moving.main.y1, 750.0);

        let hidden = Arrangement::compute(CONTAINER, &g, 800.0, PanelState::HIDDEN, false, &config);
        assert_eq!(hidden.main, CONTAINER);
        assert_eq!(hidden.main_clip, None);
        assert_eq!(hidden.shadow, None);
    }

    #[test]
    fn overlay_uses_whole_container() {
        let g = geometry(PanelEdge::Bottom);
        let config = PanelConfig {
            flags: PanelFlags::OVERLAY | PanelFlags::CLIP_PANEL,
            ..PanelConfig::default()
        };
        let a = Arrangement::compute(CONTAINER, &g, 500.0, PanelState::ANCHORED, true, &config);
        assert_eq!(a.main, CONTAINER);
        assert_eq!(a.main_clip, None);
    }

    #[test]
    fn top_edge_mirrors_bottom() {
        let g = geometry(PanelEdge::Top);
        let config = PanelConfig {
            parallax_max: 40.0,
            ..PanelConfig::default()
        };
        let a = Arrangement::compute(CONTAINER, &g, -200.0, PanelState::ANCHORED, true, &config);
        assert_eq!(a.panel, Rect::new(0.0, -200.0, 400.0, 300.0));
        assert_eq!(a.main, Rect::new(0.0, 100.0, 400.0, 800.0));
        assert_eq!(a.main_clip, Some(Rect::new(0.0, 300.0, 400.0, 800.0)));
        assert_eq!(a.shadow, Some(Rect::new(0.0, 300.0, 400.0, 304.0)));
        assert_eq!(a.main_translation, 20.0);
    }
}
