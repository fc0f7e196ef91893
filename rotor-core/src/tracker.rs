//! Scroll observation → committed selection.
//!
//! The tracker resolves every scroll observation to a logical index, updates
//! the current selection immediately and arms a debounce. Only the debounce
//! firing counts as a commit, so a fling across twenty rows produces one
//! settled event for the row it lands on.

use std::time::{Duration, Instant};

use rotor_model::{ItemExtent, VirtualIndex};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::mapper::PositionMapper;
use crate::scheduler::DeferredSlot;

/// Default quiet period before a selection change is committed.
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(300);

/// Where the tracker is in its observe → commit cycle.
///
/// `Idle` → `Settling` → `Committing` → `Idle`. `Settling` only lasts while
/// an observation is being resolved; [`SelectionTracker::observe`] always
/// leaves the tracker `Committing` or `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerPhase {
    /// No commit debounce running.
    #[default]
    Idle,
    /// Resolving the nearest row for a reported scroll position.
    Settling,
    /// The commit debounce is running.
    Committing,
}

/// Selection bookkeeping owned by one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelRuntimeState {
    /// Latest resolved selection; `None` until the first resolution.
    pub current: Option<usize>,
    /// Index waiting on the debounce, if any.
    pub pending: Option<usize>,
    pub last_commit_at: Option<Instant>,
}

/// Outcome of feeding one scroll observation to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The observation could not be resolved (sentinel slot, no extent or a
    /// non-finite offset).
    Ignored,
    /// The center row resolved to the current selection.
    Unchanged { center: VirtualIndex, index: usize },
    /// The selection moved and a commit is now pending.
    Changed { center: VirtualIndex, index: usize },
}

impl Resolution {
    /// Host row at the center of the window, when resolved.
    pub fn center(&self) -> Option<VirtualIndex> {
        match self {
            Resolution::Ignored => None,
            Resolution::Unchanged { center, .. }
            | Resolution::Changed { center, .. } => Some(*center),
        }
    }
}

/// A scroll position reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Pixel offset of the top visible row from its resting boundary.
    pub offset: f32,
    /// Host row currently at the top of the viewport.
    pub first_visible: VirtualIndex,
    /// Commit even when the resolved index matches the current one.
    pub forced: bool,
}

impl Observation {
    pub fn new(offset: f32, first_visible: VirtualIndex) -> Self {
        Self {
            offset,
            first_visible,
            forced: false,
        }
    }

    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }
}

/// Debounced selection tracking for a single wheel.
#[derive(Debug)]
pub struct SelectionTracker {
    state: WheelRuntimeState,
    phase: TrackerPhase,
    commit_delay: Duration,
    debounce: DeferredSlot<usize>,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_DELAY)
    }
}

impl SelectionTracker {
    pub fn new(commit_delay: Duration) -> Self {
        Self {
            state: WheelRuntimeState::default(),
            phase: TrackerPhase::Idle,
            commit_delay,
            debounce: DeferredSlot::new(),
        }
    }

    pub fn state(&self) -> WheelRuntimeState {
        self.state
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn current(&self) -> Option<usize> {
        self.state.current
    }

    pub fn commit_delay(&self) -> Duration {
        self.commit_delay
    }

    pub fn set_commit_delay(&mut self, delay: Duration) {
        self.commit_delay = delay;
    }

    /// Top row the host should treat as nearest to rest for `offset`.
    pub fn nearest_row(
        first_visible: VirtualIndex,
        offset: f32,
        extent: ItemExtent,
    ) -> VirtualIndex {
        if offset.abs() <= extent.half() {
            first_visible
        } else {
            first_visible.offset(1)
        }
    }

    /// Resolve `observation` against the current geometry.
    ///
    /// A changed (or forced) resolution updates `current` at once and
    /// restarts the commit debounce from `now`.
    pub fn observe(
        &mut self,
        now: Instant,
        observation: Observation,
        mapper: &PositionMapper,
        extent: Option<ItemExtent>,
        len: usize,
    ) -> Result<Resolution> {
        let Some(extent) = extent else {
            trace!(target: "rotor::tracker", "extent not measured, skipping");
            return Ok(Resolution::Ignored);
        };
        if !observation.offset.is_finite() {
            warn!(
                target: "rotor::tracker",
                offset = observation.offset,
                "ignoring non-finite scroll offset"
            );
            return Ok(Resolution::Ignored);
        }
        // slot 0 is never legitimately on top of a looping list
        if mapper.is_looping() && observation.first_visible == VirtualIndex::ZERO {
            trace!(target: "rotor::tracker", "looping wheel at layout boundary");
            return Ok(Resolution::Ignored);
        }

        let resumed = self.phase;
        self.phase = TrackerPhase::Settling;
        let nearest =
            Self::nearest_row(observation.first_visible, observation.offset, extent);
        let center = mapper.center_slot(nearest);
        let index = match mapper.logical_at(center, len) {
            Ok(index) => index,
            Err(err) => {
                self.phase = resumed;
                return Err(err);
            }
        };

        trace!(
            target: "rotor::tracker",
            first = %observation.first_visible,
            offset = observation.offset,
            %center,
            index,
            "resolved scroll observation"
        );

        if self.state.current == Some(index) && !observation.forced {
            self.phase = resumed;
            return Ok(Resolution::Unchanged { center, index });
        }

        self.state.current = Some(index);
        self.state.pending = Some(index);
        self.debounce.schedule(now, self.commit_delay, index);
        self.phase = TrackerPhase::Committing;
        Ok(Resolution::Changed { center, index })
    }

    /// Take the pending commit if its debounce has elapsed, returning the
    /// tracker to `Idle`.
    pub fn poll_commit(&mut self, now: Instant) -> Option<usize> {
        let index = self.debounce.take_due(now)?;
        self.state.pending = None;
        self.state.last_commit_at = Some(now);
        self.phase = TrackerPhase::Idle;
        debug!(target: "rotor::tracker", index, "selection committed");
        Some(index)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Drop any pending commit without touching the current selection.
    pub fn cancel(&mut self) {
        if self.debounce.cancel().is_some() {
            trace!(target: "rotor::tracker", "pending commit cancelled");
        }
        self.state.pending = None;
        self.phase = TrackerPhase::Idle;
    }

    /// Drop any pending commit and pull the selection inside a data set of
    /// `len` items.
    pub fn retain_within(&mut self, len: usize) {
        self.cancel();
        if let Some(current) = self.state.current {
            self.state.current = Some(current.min(len.saturating_sub(1)));
        }
    }

    /// Forget the selection entirely.
    pub fn reset(&mut self) {
        self.cancel();
        self.state.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotor_model::WindowSize;

    fn extent() -> Option<ItemExtent> {
        ItemExtent::new(40.0).ok()
    }

    fn finite(size: usize) -> PositionMapper {
        PositionMapper::new(WindowSize::new(size).expect("odd"), false)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_resolves_before_extent_is_known() {
        let mut tracker = SelectionTracker::default();
        let res = tracker
            .observe(
                Instant::now(),
                Observation::new(0.0, VirtualIndex(2)),
                &finite(3),
                None,
                10,
            )
            .expect("observe");
        assert_eq!(res, Resolution::Ignored);
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn looping_sentinel_is_ignored() {
        let mapper = PositionMapper::new(WindowSize::DEFAULT, true);
        let mut tracker = SelectionTracker::default();
        let res = tracker
            .observe(
                Instant::now(),
                Observation::new(0.0, VirtualIndex::ZERO),
                &mapper,
                extent(),
                12,
            )
            .expect("observe");
        assert_eq!(res, Resolution::Ignored);
        assert_eq!(tracker.phase(), TrackerPhase::Idle);
    }

    #[test]
    fn offset_past_half_row_selects_next_row() {
        let mapper = finite(3);
        let mut tracker = SelectionTracker::default();
        let now = Instant::now();
        let res = tracker
            .observe(now, Observation::new(-20.0, VirtualIndex(4)), &mapper, extent(), 10)
            .expect("observe");
        assert_eq!(
            res,
            Resolution::Changed {
                center: VirtualIndex(5),
                index: 4
            }
        );
        let res = tracker
            .observe(now, Observation::new(-21.0, VirtualIndex(4)), &mapper, extent(), 10)
            .expect("observe");
        assert_eq!(
            res,
            Resolution::Changed {
                center: VirtualIndex(6),
                index: 5
            }
        );
    }

    #[test]
    fn rapid_changes_coalesce_into_one_commit() {
        let mapper = finite(3);
        let mut tracker = SelectionTracker::default();
        let t0 = Instant::now();
        for step in 0..5u64 {
            tracker
                .observe(
                    t0 + ms(step * 50),
                    Observation::new(0.0, VirtualIndex(step as i64)),
                    &mapper,
                    extent(),
                    10,
                )
                .expect("observe");
            assert_eq!(tracker.poll_commit(t0 + ms(step * 50 + 10)), None);
        }
        assert_eq!(tracker.phase(), TrackerPhase::Committing);
        assert_eq!(tracker.state().pending, Some(4));
        // last observation at 200ms, debounce 300ms
        assert_eq!(tracker.poll_commit(t0 + ms(499)), None);
        assert_eq!(tracker.poll_commit(t0 + ms(500)), Some(4));
        assert_eq!(tracker.phase(), TrackerPhase::Idle);
        assert_eq!(tracker.poll_commit(t0 + ms(5_000)), None);
        assert_eq!(tracker.state().last_commit_at, Some(t0 + ms(500)));
    }

    #[test]
    fn unchanged_index_does_not_rearm_unless_forced() {
        let mapper = finite(3);
        let mut tracker = SelectionTracker::new(ms(100));
        let t0 = Instant::now();
        let obs = Observation::new(0.0, VirtualIndex(3));
        tracker.observe(t0, obs, &mapper, extent(), 10).expect("observe");
        assert_eq!(tracker.poll_commit(t0 + ms(100)), Some(3));

        let res = tracker.observe(t0 + ms(150), obs, &mapper, extent(), 10).expect("observe");
        assert!(matches!(res, Resolution::Unchanged { index: 3, .. }));
        assert_eq!(tracker.next_deadline(), None);
        assert_eq!(tracker.phase(), TrackerPhase::Idle);

        let res = tracker
            .observe(t0 + ms(150), obs.forced(), &mapper, extent(), 10)
            .expect("observe");
        assert!(matches!(res, Resolution::Changed { index: 3, .. }));
        assert_eq!(tracker.next_deadline(), Some(t0 + ms(250)));
    }

    #[test]
    fn reset_clears_selection_and_timer() {
        let mapper = finite(3);
        let mut tracker = SelectionTracker::default();
        let t0 = Instant::now();
        tracker
            .observe(t0, Observation::new(0.0, VirtualIndex(1)), &mapper, extent(), 10)
            .expect("observe");
        tracker.reset();
        assert_eq!(tracker.state(), WheelRuntimeState::default());
        assert_eq!(tracker.poll_commit(t0 + ms(1_000)), None);
    }

    #[test]
    fn unchanged_observation_keeps_running_debounce() {
        let mapper = finite(3);
        let mut tracker = SelectionTracker::new(ms(100));
        let t0 = Instant::now();
        let obs = Observation::new(0.0, VirtualIndex(2));
        tracker.observe(t0, obs, &mapper, extent(), 10).expect("observe");
        tracker.observe(t0 + ms(50), obs, &mapper, extent(), 10).expect("observe");
        assert_eq!(tracker.phase(), TrackerPhase::Committing);
        assert_eq!(tracker.next_deadline(), Some(t0 + ms(100)));
    }

    #[test]
    fn retain_within_keeps_clamped_selection() {
        let mapper = finite(3);
        let mut tracker = SelectionTracker::default();
        let t0 = Instant::now();
        tracker
            .observe(t0, Observation::new(0.0, VirtualIndex(7)), &mapper, extent(), 10)
            .expect("observe");
        tracker.retain_within(10);
        assert_eq!(tracker.current(), Some(7));
        assert_eq!(tracker.phase(), TrackerPhase::Idle);
        assert_eq!(tracker.poll_commit(t0 + ms(1_000)), None);

        tracker.retain_within(4);
        assert_eq!(tracker.current(), Some(3));
    }
}
