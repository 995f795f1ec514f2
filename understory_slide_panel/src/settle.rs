// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Settle animation: a stepped simulation toward a target position.
//!
//! A [`SettleAnimation`] is advanced with an explicit time delta, so it can be
//! driven by a display-refresh callback, a timer, or a test harness alike.
//!
//! ```
//! use understory_slide_panel::settle::{SettleAnimation, ease_out_quint};
//!
//! let mut settle = SettleAnimation::new(700.0, 300.0, 200, ease_out_quint);
//! let mid = settle.advance(100);
//! assert!(mid < 700.0 && mid > 300.0);
//! assert_eq!(settle.advance(100), 300.0);
//! assert!(settle.is_finished());
//! ```

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `sin` and `round`

/// Maps linear progress in `[0, 1]` to eased progress.
pub type Interpolator = fn(f64) -> f64;

/// Settle duration for a slow release across the whole range is twice this.
pub const BASE_SETTLE_DURATION_MS: u64 = 256;

/// Upper bound on any settle duration.
pub const MAX_SETTLE_DURATION_MS: u64 = 600;

/// Quintic ease-out: fast start, gentle landing.
#[must_use]
pub fn ease_out_quint(t: f64) -> f64 {
    let t = t - 1.0;
    t * t * t * t * t + 1.0
}

/// Linear progress.
#[must_use]
pub fn linear(t: f64) -> f64 {
    t
}

/// Eases the distance contribution so short and long snaps feel alike.
fn distance_influence(ratio: f64) -> f64 {
    ((ratio - 0.5) * 0.3 * PI / 2.0).sin()
}

/// How long a settle over `dy` pixels should take.
///
/// - `velocity` is the release velocity in px/s (0 for a programmatic settle).
/// - `extent` is the container extent along the slide axis.
/// - `range` is the panel's slide range.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "clamped to MAX_SETTLE_DURATION_MS before the cast"
)]
pub fn settle_duration(dy: f64, velocity: f64, extent: f64, range: f64) -> u64 {
    let dy = dy.abs();
    if dy == 0.0 {
        return 0;
    }
    let velocity = velocity.abs();
    let millis = if velocity > 0.0 {
        let half = extent.max(0.0) / 2.0;
        let ratio = if extent > 0.0 {
            (dy / extent).min(1.0)
        } else {
            1.0
        };
        let distance = half + half * distance_influence(ratio);
        4.0 * (1000.0 * (distance / velocity)).round()
    } else {
        let portion = if range > 0.0 { dy / range } else { 1.0 };
        (portion + 1.0) * BASE_SETTLE_DURATION_MS as f64
    };
    millis.clamp(0.0, MAX_SETTLE_DURATION_MS as f64) as u64
}

/// An in-flight settle from one position to another.
#[derive(Clone, Debug)]
pub struct SettleAnimation {
    from: f64,
    to: f64,
    elapsed_ms: u64,
    duration_ms: u64,
    interpolator: Interpolator,
}

impl SettleAnimation {
    /// Starts a settle from `from` to `to` lasting `duration_ms`.
    #[must_use]
    pub fn new(from: f64, to: f64, duration_ms: u64, interpolator: Interpolator) -> Self {
        Self {
            from,
            to,
            elapsed_ms: 0,
            duration_ms,
            interpolator,
        }
    }

    /// Starting position.
    #[must_use]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Target position.
    #[must_use]
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Total duration.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Time advanced so far.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Returns `true` once the target has been reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Current position. Exactly [`to`](Self::to) once finished.
    #[must_use]
    pub fn position(&self) -> f64 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed_ms as f64 / self.duration_ms as f64;
        self.from + (self.to - self.from) * (self.interpolator)(t)
    }

    /// Advances by `dt_ms` and returns the new position.
    pub fn advance(&mut self, dt_ms: u64) -> f64 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        self.position()
    }

    /// Jumps to the end and returns the target.
    pub fn finish(&mut self) -> f64 {
        self.elapsed_ms = self.duration_ms;
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quintic_endpoints() {
        assert_eq!(ease_out_quint(0.0), 0.0);
        assert_eq!(ease_out_quint(1.0), 1.0);
        assert!(ease_out_quint(0.5) > 0.5);
    }

    #[test]
    fn zero_distance_takes_no_time() {
        assert_eq!(settle_duration(0.0, 1000.0, 800.0, 400.0), 0);
        assert_eq!(settle_duration(0.0, 0.0, 800.0, 400.0), 0);
    }

    #[test]
    fn slow_settle_scales_with_range_fraction() {
        // Half the range: (0.5 + 1) * 256.
        assert_eq!(settle_duration(200.0, 0.0, 800.0, 400.0), 384);
        // Full range would be 512.
        assert_eq!(settle_duration(-400.0, 0.0, 800.0, 400.0), 512);
        // Past the range is capped.
        assert_eq!(settle_duration(1200.0, 0.0, 800.0, 400.0), MAX_SETTLE_DURATION_MS);
    }

    #[test]
    fn fast_fling_settles_quicker_than_slow_release() {
        let slow = settle_duration(200.0, 0.0, 800.0, 400.0);
        let fast = settle_duration(200.0, 8000.0, 800.0, 400.0);
        assert!(fast < slow, "fast {fast} should beat slow {slow}");
        assert!(fast > 0);
    }

    #[test]
    fn duration_never_exceeds_cap() {
        assert_eq!(settle_duration(400.0, 1.0, 800.0, 400.0), MAX_SETTLE_DURATION_MS);
    }

    #[test]
    fn advance_reaches_target_exactly() {
        let mut settle = SettleAnimation::new(0.0, 100.0, 48, linear);
        assert!((settle.advance(16) - 100.0 / 3.0).abs() < 1e-9);
        assert!(!settle.is_finished());
        settle.advance(16);
        assert_eq!(settle.advance(1_000), 100.0);
        assert!(settle.is_finished());
        assert_eq!(settle.elapsed_ms(), 48);
    }

    #[test]
    fn zero_duration_is_finished_immediately() {
        let settle = SettleAnimation::new(10.0, 20.0, 0, ease_out_quint);
        assert!(settle.is_finished());
        assert_eq!(settle.position(), 20.0);
    }

    #[test]
    fn finish_jumps_to_target() {
        let mut settle = SettleAnimation::new(10.0, 20.0, 300, ease_out_quint);
        assert_eq!(settle.finish(), 20.0);
        assert!(settle.is_finished());
    }
}
