// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel configuration.

use crate::drag::DragSettings;
use crate::geometry::PanelEdge;
use crate::settle::{Interpolator, ease_out_quint};
use crate::state::StableState;

bitflags::bitflags! {
    /// Layout and paint options.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PanelFlags: u8 {
        /// The panel slides over the main content instead of shrinking it.
        const OVERLAY    = 0b0000_0001;
        /// The main content is clipped against the panel.
        const CLIP_PANEL = 0b0000_0010;
    }
}

impl Default for PanelFlags {
    fn default() -> Self {
        Self::CLIP_PANEL
    }
}

/// Default peek height in pixels.
pub const DEFAULT_PEEK_HEIGHT: f64 = 68.0;
/// Default shadow height in pixels.
pub const DEFAULT_SHADOW_HEIGHT: f64 = 4.0;
/// Default maximum parallax translation (none).
pub const DEFAULT_PARALLAX_MAX: f64 = 0.0;
/// Default minimum fling speed in px/s.
pub const DEFAULT_MIN_FLING_VELOCITY: f64 = 400.0;
/// Default maximum fling speed in px/s.
pub const DEFAULT_MAX_FLING_VELOCITY: f64 = 8000.0;
/// Default covered-fade color (ARGB): 60% black.
pub const DEFAULT_COVERED_FADE_COLOR: u32 = 0x9900_0000;
/// Default anchor point (no intermediate stop).
pub const DEFAULT_ANCHOR_POINT: f64 = 1.0;
/// Default touch slop in pixels.
pub const DEFAULT_TOUCH_SLOP: f64 = 8.0;
/// Default frame interval for [`SlidingPanel::tick`](crate::SlidingPanel::tick).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Returns `true` for anchor points in `(0, 1]`.
#[must_use]
pub fn is_valid_anchor_point(anchor: f64) -> bool {
    anchor > 0.0 && anchor <= 1.0
}

/// Everything a [`SlidingPanel`](crate::SlidingPanel) can be configured with.
///
/// ```
/// use understory_slide_panel::{PanelConfig, PanelEdge, PanelFlags};
///
/// let config = PanelConfig {
///     edge: PanelEdge::Top,
///     anchor_point: 0.6,
///     flags: PanelFlags::OVERLAY,
///     ..PanelConfig::default()
/// };
/// assert_eq!(config.drag_settings().anchor_point, 0.6);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct PanelConfig {
    /// Edge the panel is attached to.
    pub edge: PanelEdge,
    /// Visible height while collapsed.
    pub peek_height: f64,
    /// Height of the shadow band on the panel's leading edge; `0` disables it.
    pub shadow_height: f64,
    /// Maximum main-content parallax translation; `0` disables it.
    pub parallax_max: f64,
    /// Release speeds below this count as zero.
    pub min_fling_velocity: f64,
    /// Release speeds are capped at this.
    pub max_fling_velocity: f64,
    /// ARGB color faded over the main content as the panel expands; `0`
    /// disables it.
    pub covered_fade_color: u32,
    /// Layout and paint options.
    pub flags: PanelFlags,
    /// Intermediate resting offset in `(0, 1]`.
    pub anchor_point: f64,
    /// State used by the first layout.
    pub initial_state: StableState,
    /// Movement below this distance is not a drag.
    pub touch_slop: f64,
    /// Time advanced per [`tick`](crate::SlidingPanel::tick).
    pub frame_interval_ms: u64,
    /// A tap on the drag handle toggles the panel.
    pub toggle_on_tap: bool,
    /// Easing for settle animations.
    pub interpolator: Interpolator,
    /// When `false` the panel ignores touches and state requests.
    pub enabled: bool,
    /// When `false` the panel ignores touches.
    pub touch_enabled: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            edge: PanelEdge::Bottom,
            peek_height: DEFAULT_PEEK_HEIGHT,
            shadow_height: DEFAULT_SHADOW_HEIGHT,
            parallax_max: DEFAULT_PARALLAX_MAX,
            min_fling_velocity: DEFAULT_MIN_FLING_VELOCITY,
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY,
            covered_fade_color: DEFAULT_COVERED_FADE_COLOR,
            flags: PanelFlags::default(),
            anchor_point: DEFAULT_ANCHOR_POINT,
            initial_state: StableState::Collapsed,
            touch_slop: DEFAULT_TOUCH_SLOP,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            toggle_on_tap: true,
            interpolator: ease_out_quint,
            enabled: true,
            touch_enabled: true,
        }
    }
}

impl PanelConfig {
    /// Returns `true` if the panel overlays the main content.
    #[must_use]
    pub fn overlay(&self) -> bool {
        self.flags.contains(PanelFlags::OVERLAY)
    }

    /// Returns `true` if the main content is clipped against the panel.
    #[must_use]
    pub fn clip_panel(&self) -> bool {
        self.flags.contains(PanelFlags::CLIP_PANEL)
    }

    /// Drag engine settings derived from this configuration.
    #[must_use]
    pub fn drag_settings(&self) -> DragSettings {
        DragSettings {
            anchor_point: self.anchor_point,
            min_fling_velocity: self.min_fling_velocity,
            max_fling_velocity: self.max_fling_velocity,
            interpolator: self.interpolator,
            frame_interval_ms: self.frame_interval_ms,
        }
    }

    /// Replaces an out-of-range anchor point with the default.
    #[must_use]
    pub(crate) fn sanitized(mut self) -> Self {
        if !is_valid_anchor_point(self.anchor_point) {
            tracing::warn!(anchor = self.anchor_point, "anchor point out of range, using default");
            self.anchor_point = DEFAULT_ANCHOR_POINT;
        }
        self
    }
}
