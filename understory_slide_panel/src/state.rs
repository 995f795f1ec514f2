// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel states.
//!
//! A panel is either resting in one of four [`StableState`]s or being moved
//! by a drag or settle. The moving state remembers the stable state it left,
//! so the transient state can never be persisted:
//!
//! ```
//! use understory_slide_panel::{PanelState, StableState};
//!
//! let state = PanelState::Dragging { resume_to: StableState::Anchored };
//! assert!(state.is_dragging());
//! assert_eq!(state.persisted(), StableState::Anchored);
//! assert_eq!(StableState::from_name("bogus"), StableState::Collapsed);
//! ```

use core::fmt;

/// A resting panel state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StableState {
    /// Fully expanded (offset `1.0`).
    Expanded,
    /// Collapsed to the peek strip (offset `0.0`).
    #[default]
    Collapsed,
    /// Resting at the anchor point.
    Anchored,
    /// Pushed past the collapsed edge and not visible.
    Hidden,
}

impl StableState {
    /// Every stable state, in declaration order.
    pub const ALL: [Self; 4] = [Self::Expanded, Self::Collapsed, Self::Anchored, Self::Hidden];

    /// Stable name used when persisting the state.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Expanded => "EXPANDED",
            Self::Collapsed => "COLLAPSED",
            Self::Anchored => "ANCHORED",
            Self::Hidden => "HIDDEN",
        }
    }

    /// Parses a persisted name.
    ///
    /// Unrecognized names fall back to [`StableState::Collapsed`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// Parses an optional persisted name; missing values are [`StableState::Collapsed`].
    #[must_use]
    pub fn restore(name: Option<&str>) -> Self {
        name.map(Self::from_name).unwrap_or_default()
    }
}

impl fmt::Display for StableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The full panel state: resting, or moving under a drag or settle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PanelState {
    /// Resting in a stable state.
    Stable(StableState),
    /// Being dragged or settling.
    Dragging {
        /// The stable state the panel was in when the movement began.
        resume_to: StableState,
    },
}

impl Default for PanelState {
    fn default() -> Self {
        Self::Stable(StableState::default())
    }
}

impl From<StableState> for PanelState {
    fn from(state: StableState) -> Self {
        Self::Stable(state)
    }
}

impl PanelState {
    /// Shorthand for `PanelState::Stable(StableState::Expanded)`.
    pub const EXPANDED: Self = Self::Stable(StableState::Expanded);
    /// Shorthand for `PanelState::Stable(StableState::Collapsed)`.
    pub const COLLAPSED: Self = Self::Stable(StableState::Collapsed);
    /// Shorthand for `PanelState::Stable(StableState::Anchored)`.
    pub const ANCHORED: Self = Self::Stable(StableState::Anchored);
    /// Shorthand for `PanelState::Stable(StableState::Hidden)`.
    pub const HIDDEN: Self = Self::Stable(StableState::Hidden);

    /// Returns `true` while a drag or settle is moving the panel.
    #[must_use]
    pub const fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// The resting state, if the panel is resting.
    #[must_use]
    pub const fn stable(self) -> Option<StableState> {
        match self {
            Self::Stable(state) => Some(state),
            Self::Dragging { .. } => None,
        }
    }

    /// The state to persist: the resting state, or the one a drag started from.
    #[must_use]
    pub const fn persisted(self) -> StableState {
        match self {
            Self::Stable(state) | Self::Dragging { resume_to: state } => state,
        }
    }

    /// Returns `true` if the panel is resting in `state`.
    #[must_use]
    pub fn is(self, state: StableState) -> bool {
        self == Self::Stable(state)
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable(state) => state.fmt(f),
            Self::Dragging { .. } => f.write_str("DRAGGING"),
        }
    }
}
