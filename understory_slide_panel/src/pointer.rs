// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer samples fed into the panel.

use kurbo::Point;

/// Identifier of a pointer (finger, pen, mouse) within a touch stream.
pub type PointerId = u32;

/// Where a pointer sample sits in its stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// The pointer went down.
    Down,
    /// The pointer moved while down.
    Move,
    /// The pointer was lifted.
    Up,
    /// The stream was abandoned by the host.
    Cancel,
}

/// A single pointer sample in container coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Stream position of this sample.
    pub phase: PointerPhase,
    /// Pointer that produced the sample.
    pub pointer_id: PointerId,
    /// Position relative to the container's origin.
    pub position: Point,
    /// Timestamp in milliseconds. Must not decrease within a stream.
    pub time_ms: u64,
}

impl PointerEvent {
    /// Creates a sample.
    #[must_use]
    pub const fn new(
        phase: PointerPhase,
        pointer_id: PointerId,
        position: Point,
        time_ms: u64,
    ) -> Self {
        Self {
            phase,
            pointer_id,
            position,
            time_ms,
        }
    }

    /// A `Down` sample.
    #[must_use]
    pub const fn down(pointer_id: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(PointerPhase::Down, pointer_id, position, time_ms)
    }

    /// A `Move` sample.
    #[must_use]
    pub const fn moved(pointer_id: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(PointerPhase::Move, pointer_id, position, time_ms)
    }

    /// An `Up` sample.
    #[must_use]
    pub const fn up(pointer_id: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(PointerPhase::Up, pointer_id, position, time_ms)
    }

    /// A `Cancel` sample.
    #[must_use]
    pub const fn cancel(pointer_id: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(PointerPhase::Cancel, pointer_id, position, time_ms)
    }

    /// The same sample reinterpreted with another phase.
    ///
    /// Used to splice synthetic `Cancel`/`Down` samples into a stream when
    /// gesture ownership changes; the timestamp is kept so streams stay
    /// monotonic.
    #[must_use]
    pub const fn with_phase(self, phase: PointerPhase) -> Self {
        Self { phase, ..self }
    }

    /// Returns `true` for `Up` and `Cancel`.
    #[must_use]
    pub const fn ends_stream(&self) -> bool {
        matches!(self.phase, PointerPhase::Up | PointerPhase::Cancel)
    }
}
