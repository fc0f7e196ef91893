//! Snap-back correction once a scroll comes to rest between rows.

use std::time::Duration;

use rotor_model::ItemExtent;

/// Offsets at or below this are corrected in a single exact step (px).
const EXACT_THRESHOLD_PX: f32 = 2.0;
/// Offsets below this get a fixed nudge instead of a proportional step (px).
const NUDGE_THRESHOLD_PX: f32 = 12.0;
/// Fixed nudge distance for small offsets (px).
const NUDGE_PX: f32 = 2.0;
/// Large offsets close this fraction of the remaining distance per step.
const DECELERATION_DIVISOR: f32 = 6.0;

/// Default duration of one snap animation.
pub const DEFAULT_SNAP_DURATION: Duration = Duration::from_millis(50);

/// Corrective distance for a resting offset `d`.
///
/// Tiny offsets snap exactly, small ones move by a fixed nudge, and large
/// ones close a sixth of the gap so repeated settles decelerate over several
/// frames instead of jumping.
pub fn settle_distance(d: f32) -> f32 {
    let magnitude = d.abs();
    if magnitude <= EXACT_THRESHOLD_PX {
        d
    } else if magnitude < NUDGE_THRESHOLD_PX {
        NUDGE_PX.copysign(d)
    } else {
        d / DECELERATION_DIVISOR
    }
}

/// A smooth scroll the host should animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapRequest {
    /// Signed pixel distance to scroll by.
    pub distance: f32,
    pub duration: Duration,
}

/// Decides whether a stopped scroll needs a snap and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSettler {
    duration: Duration,
}

impl Default for ScrollSettler {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_DURATION)
    }
}

impl ScrollSettler {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Snap for the top row resting at `offset` px from its boundary.
    ///
    /// Within half a row the wheel settles back onto the top row; past half
    /// it settles forward onto the next one. Returns `None` when the rows
    /// are already aligned or no extent has been measured yet.
    pub fn snap(
        &self,
        offset: f32,
        extent: Option<ItemExtent>,
    ) -> Option<SnapRequest> {
        let extent = extent?;
        if offset == 0.0 || !offset.is_finite() {
            return None;
        }
        let remaining = if offset.abs() < extent.half() {
            offset
        } else {
            extent.px() + offset
        };
        Some(SnapRequest {
            distance: settle_distance(remaining),
            duration: self.duration,
        })
    }
}
