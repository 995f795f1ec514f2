// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer velocity estimation.
//!
//! [`VelocityTracker`] smooths instantaneous velocities with an exponential
//! moving average. Timestamps are in milliseconds and velocities in pixels
//! per second.
//!
//! ```
//! use kurbo::Point;
//! use understory_slide_panel::velocity::VelocityTracker;
//!
//! let mut tracker = VelocityTracker::default();
//! tracker.add(Point::new(0.0, 100.0), 0);
//! tracker.add(Point::new(0.0, 80.0), 10);
//! // 20px up in 10ms.
//! assert_eq!(tracker.velocity_at(10).y, -2000.0);
//! ```

use kurbo::{Point, Vec2};

/// Weight of the newest sample in the moving average.
const SMOOTHING: f64 = 0.3;

/// Samples further apart than this are treated as a new movement.
const MAX_SAMPLE_GAP_MS: u64 = 500;

/// A pointer that has not moved for this long is considered at rest.
pub const STALE_AFTER_MS: u64 = 100;

/// Exponentially smoothed pointer velocity.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    last: Option<(Point, u64)>,
    velocity: Vec2,
    deltas: u32,
}

impl VelocityTracker {
    /// Records a pointer sample.
    ///
    /// Samples with a timestamp at or before the previous one only move the
    /// reference position.
    pub fn add(&mut self, pos: Point, time_ms: u64) {
        if let Some((last_pos, last_time)) = self.last {
            let dt_ms = time_ms.saturating_sub(last_time);
            if dt_ms > 0 && dt_ms < MAX_SAMPLE_GAP_MS {
                let dt = dt_ms as f64 / 1000.0;
                let instant = (pos - last_pos) / dt;
                self.velocity = if self.deltas == 0 {
                    instant
                } else {
                    self.velocity * (1.0 - SMOOTHING) + instant * SMOOTHING
                };
                self.deltas += 1;
            } else if dt_ms >= MAX_SAMPLE_GAP_MS {
                self.velocity = Vec2::ZERO;
                self.deltas = 0;
            }
        }
        self.last = Some((pos, time_ms));
    }

    /// Current velocity estimate, or zero if the pointer has been still for
    /// longer than [`STALE_AFTER_MS`] at `now_ms`.
    #[must_use]
    pub fn velocity_at(&self, now_ms: u64) -> Vec2 {
        match self.last {
            Some((_, last_time)) if now_ms.saturating_sub(last_time) <= STALE_AFTER_MS => {
                self.velocity
            }
            _ => Vec2::ZERO,
        }
    }

    /// Forgets all samples.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Clamps the magnitude of a velocity.
///
/// Magnitudes below `min` become zero; magnitudes above `max` are capped at
/// `max` with the sign preserved.
#[must_use]
pub fn clamp_magnitude(value: f64, min: f64, max: f64) -> f64 {
    let magnitude = value.abs();
    if magnitude < min {
        0.0
    } else if magnitude > max {
        max.copysign(value)
    } else {
        value
    }
}
