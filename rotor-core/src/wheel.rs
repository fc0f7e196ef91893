//! Wheel: one picker column and everything the host needs to drive it.
//!
//! A wheel never touches the host list directly. Scroll observations come in
//! through [`Wheel::on_scrolled`] / [`Wheel::on_scroll_stopped`], and the
//! commands the host must carry out (jumps, snaps, restyles, reloads) are
//! queued and handed over by [`Wheel::drain_requests`].

use std::mem;
use std::time::{Duration, Instant};

use rotor_model::{
    DataSet, ItemExtent, Selection, VirtualIndex, WheelConfig, WheelStyle,
    WindowSize,
};
use tracing::{debug, trace, warn};

use crate::error::{Result, WheelError};
use crate::listener::Listener;
use crate::mapper::PositionMapper;
use crate::scheduler::DeferredSlot;
use crate::settle::{DEFAULT_SNAP_DURATION, ScrollSettler, SnapRequest};
use crate::styler::{SlotStyle, style_window};
use crate::tracker::{
    DEFAULT_COMMIT_DELAY, Observation, Resolution, SelectionTracker,
    TrackerPhase,
};

/// Default delay before a join-triggered data reset is applied.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(10);

/// Timer settings for one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelTiming {
    /// Quiet period before a selection change is committed.
    pub commit_delay: Duration,
    /// Duration of each snap animation.
    pub snap_duration: Duration,
    /// Delay before a join-triggered reset is applied.
    pub reset_delay: Duration,
}

impl Default for WheelTiming {
    fn default() -> Self {
        Self {
            commit_delay: DEFAULT_COMMIT_DELAY,
            snap_duration: DEFAULT_SNAP_DURATION,
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }
}

/// Commands for the host list, in the order they were issued.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// The row count or contents changed; re-bind every row.
    Reload { item_count: i64 },
    /// Place this host row at the top of the viewport without animating.
    JumpTo(VirtualIndex),
    /// Animate a scroll by the given distance.
    SmoothScrollBy(SnapRequest),
    /// Apply these styles to the listed rows.
    Restyle(Vec<SlotStyle>),
}

/// A single picker column.
#[derive(Debug)]
pub struct Wheel<T> {
    config: WheelConfig,
    mapper: PositionMapper,
    extent: Option<ItemExtent>,
    data: Option<DataSet<T>>,
    style: WheelStyle,
    timing: WheelTiming,
    settler: ScrollSettler,
    tracker: SelectionTracker,
    requested: usize,
    last_center: Option<VirtualIndex>,
    reset: DeferredSlot<DataSet<T>>,
    outbox: Vec<HostRequest>,
    on_settled: Listener<Selection<T>>,
    on_activated: Listener<Selection<T>>,
}

impl<T> Default for Wheel<T> {
    fn default() -> Self {
        Self::new(WheelConfig::default())
    }
}

impl<T> Wheel<T> {
    pub fn new(config: WheelConfig) -> Self {
        Self::with_timing(config, WheelTiming::default())
    }

    pub fn with_timing(config: WheelConfig, timing: WheelTiming) -> Self {
        Self {
            config,
            mapper: PositionMapper::new(config.window_size, config.looping),
            extent: None,
            data: None,
            style: WheelStyle::default(),
            timing,
            settler: ScrollSettler::new(timing.snap_duration),
            tracker: SelectionTracker::new(timing.commit_delay),
            requested: 0,
            last_center: None,
            reset: DeferredSlot::new(),
            outbox: Vec::new(),
            on_settled: Listener::default(),
            on_activated: Listener::default(),
        }
    }

    pub fn with_style(mut self, style: WheelStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_data(mut self, data: DataSet<T>) -> Self {
        self.set_data(data);
        self
    }

    pub fn config(&self) -> WheelConfig {
        self.config
    }

    pub fn mapper(&self) -> &PositionMapper {
        &self.mapper
    }

    pub fn timing(&self) -> WheelTiming {
        self.timing
    }

    pub fn style(&self) -> &WheelStyle {
        &self.style
    }

    pub fn item_extent(&self) -> Option<ItemExtent> {
        self.extent
    }

    pub fn data(&self) -> Option<&DataSet<T>> {
        self.data.as_ref()
    }

    pub fn phase(&self) -> TrackerPhase {
        self.tracker.phase()
    }

    /// Number of items in the data set, 0 before any data is set.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, DataSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    /// Rows the host list must advertise, 0 before any data is set.
    pub fn host_item_count(&self) -> i64 {
        self.data
            .as_ref()
            .and_then(|data| self.mapper.host_item_count(data.len()).ok())
            .unwrap_or(0)
    }

    /// Replace the data set and re-center on the current selection, clamped
    /// to the new length. The selection is kept, so the host reporting the
    /// same row again does not commit it a second time.
    pub fn set_data(&mut self, data: DataSet<T>) {
        let target = self
            .tracker
            .current()
            .unwrap_or(self.requested)
            .min(data.len() - 1);
        let len = data.len();
        self.data = Some(data);
        self.tracker.retain_within(len);
        self.requested = target;
        self.reload_and_jump(target);
    }

    /// Change the number of visible rows; `size` must be odd.
    pub fn set_wheel_size(&mut self, size: usize) -> Result<()> {
        let window = WindowSize::new(size)?;
        if window == self.config.window_size {
            return Ok(());
        }
        self.config.window_size = window;
        self.mapper = PositionMapper::new(window, self.config.looping);
        let target = self.tracker.current().unwrap_or(self.requested);
        self.tracker.cancel();
        self.requested = target;
        if self.data.is_some() {
            self.reload_and_jump(target);
        }
        Ok(())
    }

    /// Toggle looping. Any change resets the selection to the first item.
    pub fn set_loop(&mut self, looping: bool) {
        if looping == self.config.looping {
            return;
        }
        self.config.looping = looping;
        self.mapper = PositionMapper::new(self.config.window_size, looping);
        self.tracker.reset();
        self.requested = 0;
        if self.data.is_some() {
            self.reload_and_jump(0);
        }
    }

    pub fn set_clickable(&mut self, clickable: bool) {
        self.config.clickable = clickable;
    }

    pub fn set_style(&mut self, style: WheelStyle) {
        self.style = style;
        if let Some(center) = self.last_center {
            self.push_restyle(center);
        }
    }

    pub fn set_timing(&mut self, timing: WheelTiming) {
        self.timing = timing;
        self.settler = ScrollSettler::new(timing.snap_duration);
        self.tracker.set_commit_delay(timing.commit_delay);
    }

    /// Record the measured row height.
    ///
    /// The first measurement styles the rows around the current (or
    /// requested) selection so the wheel renders correctly before any scroll.
    pub fn set_item_extent(&mut self, px: f32) -> Result<()> {
        let extent = ItemExtent::new(px)?;
        let first_measure = self.extent.is_none();
        self.extent = Some(extent);
        if first_measure && let Some(data) = &self.data {
            let target = self.tracker.current().unwrap_or(self.requested);
            let first = self.mapper.first_visible_for(target, data.len())?;
            self.push_restyle(self.mapper.center_slot(first));
        }
        Ok(())
    }

    /// Queue a jump that centers `logical`.
    ///
    /// Before any data is set the request is remembered and applied by the
    /// first [`set_data`](Self::set_data).
    pub fn scroll_to(&mut self, logical: usize) -> Result<()> {
        let Some(data) = &self.data else {
            self.requested = logical;
            return Ok(());
        };
        if logical >= data.len() {
            return Err(WheelError::InvalidArgument(format!(
                "selection {logical} out of range for {} items",
                data.len()
            )));
        }
        let first = self.mapper.first_visible_for(logical, data.len())?;
        self.requested = logical;
        self.outbox.push(HostRequest::JumpTo(first));
        Ok(())
    }

    /// Last index passed to [`scroll_to`](Self::scroll_to).
    pub fn requested_selection(&self) -> usize {
        self.requested
    }

    pub fn current_index(&self) -> Option<usize> {
        self.tracker.current()
    }

    pub fn current_selection(&self) -> Option<Selection<&T>> {
        let index = self.tracker.current()?;
        let item = self.data.as_ref()?.get(index)?;
        Some(Selection::new(index, item))
    }

    /// Feed a scroll position reported while the list is moving.
    pub fn on_scrolled(
        &mut self,
        now: Instant,
        offset: f32,
        first_visible: VirtualIndex,
    ) -> Result<Resolution> {
        self.observe(now, Observation::new(offset, first_visible))
    }

    /// Feed the resting position once scrolling stops.
    ///
    /// Returns the snap the host should animate, if the rows are not
    /// aligned. The same snap is queued as [`HostRequest::SmoothScrollBy`].
    pub fn on_scroll_stopped(
        &mut self,
        now: Instant,
        offset: f32,
        first_visible: VirtualIndex,
    ) -> Result<Option<SnapRequest>> {
        self.observe(now, Observation::new(offset, first_visible))?;
        let snap = self.settler.snap(offset, self.extent);
        if let Some(snap) = snap {
            trace!(
                target: "rotor::tracker",
                distance = snap.distance,
                "snapping to row boundary"
            );
            self.outbox.push(HostRequest::SmoothScrollBy(snap));
        }
        Ok(snap)
    }

    /// Replace the data after the reset delay, then jump to the first item
    /// and force a commit.
    ///
    /// A reset scheduled while another is pending replaces it.
    pub fn reset_data_from_top(&mut self, now: Instant, data: DataSet<T>) {
        if self.reset.schedule(now, self.timing.reset_delay, data).is_some() {
            debug!(target: "rotor::join", "pending reset replaced");
        }
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset.is_pending()
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.reset.deadline(), self.tracker.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Hand the queued host commands over, oldest first.
    pub fn drain_requests(&mut self) -> Vec<HostRequest> {
        mem::take(&mut self.outbox)
    }

    /// Styles for the rows around the last resolved center.
    pub fn visible_styles(&self) -> Option<Vec<SlotStyle>> {
        self.last_center
            .map(|center| style_window(center, self.mapper.half(), &self.style))
    }

    pub fn on_selection_settled(
        &mut self,
        callback: impl FnMut(Selection<T>) + 'static,
    ) {
        self.on_settled.set(callback);
    }

    pub fn on_item_activated(
        &mut self,
        callback: impl FnMut(Selection<T>) + 'static,
    ) {
        self.on_activated.set(callback);
    }

    pub fn clear_listeners(&mut self) {
        self.on_settled.clear();
        self.on_activated.clear();
    }

    /// Cancel every outstanding timer. Idempotent.
    pub fn shutdown(&mut self) {
        self.tracker.cancel();
        self.reset.cancel();
    }

    fn observe(
        &mut self,
        now: Instant,
        observation: Observation,
    ) -> Result<Resolution> {
        let Some(len) = self.data.as_ref().map(DataSet::len) else {
            warn!(target: "rotor::tracker", "scroll observed before data was set");
            return Ok(Resolution::Ignored);
        };
        let resolution =
            self.tracker
                .observe(now, observation, &self.mapper, self.extent, len)?;
        if let Some(center) = resolution.center()
            && self.last_center != Some(center)
        {
            self.push_restyle(center);
        }
        Ok(resolution)
    }

    fn push_restyle(&mut self, center: VirtualIndex) {
        self.last_center = Some(center);
        let styles = style_window(center, self.mapper.half(), &self.style);
        self.outbox.push(HostRequest::Restyle(styles));
    }

    fn reload_and_jump(&mut self, logical: usize) {
        let Some(len) = self.data.as_ref().map(DataSet::len) else {
            return;
        };
        self.last_center = None;
        match (
            self.mapper.host_item_count(len),
            self.mapper.first_visible_for(logical, len),
        ) {
            (Ok(item_count), Ok(first)) => {
                self.outbox.push(HostRequest::Reload { item_count });
                self.outbox.push(HostRequest::JumpTo(first));
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(target: "rotor::tracker", error = %err, "cannot reposition wheel");
            }
        }
    }
}

impl<T: Clone> Wheel<T> {
    /// Fire whatever timers are due at `now`.
    ///
    /// A due reset is applied first. A due commit notifies the settled
    /// listener and is returned so the caller can cascade it.
    pub fn tick(&mut self, now: Instant) -> Result<Option<Selection<T>>> {
        if let Some(data) = self.reset.take_due(now) {
            self.apply_reset(now, data)?;
        }

        let Some(index) = self.tracker.poll_commit(now) else {
            return Ok(None);
        };
        let selection = self
            .data
            .as_ref()
            .and_then(|data| data.get(index))
            .map(|item| Selection::new(index, item.clone()));
        if let Some(selection) = &selection {
            self.on_settled.emit(selection.clone());
        }
        Ok(selection)
    }

    /// Report a click on the wheel.
    ///
    /// Clicks are swallowed unless the wheel is clickable. The activated
    /// selection is always the current one, not the clicked row.
    pub fn on_item_clicked(&mut self) -> Option<Selection<T>> {
        if !self.config.clickable {
            return None;
        }
        let selection = self.current_selection()?.cloned();
        self.on_activated.emit(selection.clone());
        Some(selection)
    }

    fn apply_reset(&mut self, now: Instant, data: DataSet<T>) -> Result<()> {
        let len = data.len();
        self.data = Some(data);
        self.tracker.reset();
        self.requested = 0;
        self.last_center = None;
        let first = self.mapper.first_visible_for(0, len)?;
        let item_count = self.mapper.host_item_count(len)?;
        self.outbox.push(HostRequest::Reload { item_count });
        self.outbox.push(HostRequest::JumpTo(first));
        debug!(target: "rotor::join", len, %first, "data reset from top");
        self.observe(now, Observation::new(0.0, first).forced())?;
        Ok(())
    }
}

impl<T> Drop for Wheel<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
