//! Tokio event loop that feeds host events into a [`WheelRegistry`].
//!
//! Wheels are `!Send`, so the driver future is too: await it on a
//! current-thread runtime (or inside `tokio::join!`) rather than spawning it
//! onto a multi-threaded one.

use std::future;

use rotor_model::{DataSet, JoinKey, Selection, VirtualIndex};
use tokio::sync::mpsc;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

use crate::error::{Result, WheelError};
use crate::join::JoinTable;
use crate::registry::{Settled, WheelId, WheelRegistry};
use crate::wheel::{HostRequest, Wheel};

/// Input from the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent<T> {
    Scrolled {
        wheel: WheelId,
        offset: f32,
        first_visible: VirtualIndex,
    },
    ScrollStopped {
        wheel: WheelId,
        offset: f32,
        first_visible: VirtualIndex,
    },
    ItemExtent {
        wheel: WheelId,
        px: f32,
    },
    ScrollTo {
        wheel: WheelId,
        index: usize,
    },
    Clicked {
        wheel: WheelId,
    },
    SetData {
        wheel: WheelId,
        data: DataSet<T>,
    },
    SetWheelSize {
        wheel: WheelId,
        size: usize,
    },
    SetLoop {
        wheel: WheelId,
        looping: bool,
    },
    SetClickable {
        wheel: WheelId,
        clickable: bool,
    },
    Join {
        primary: WheelId,
        dependent: WheelId,
    },
    Unjoin {
        primary: WheelId,
    },
    SetJoinData {
        primary: WheelId,
        table: JoinTable<T>,
    },
    /// Stop the loop and hand the registry back.
    Shutdown,
}

/// Output toward the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverOutput<T> {
    Request { wheel: WheelId, request: HostRequest },
    Settled(Settled<T>),
    Activated { wheel: WheelId, selection: Selection<T> },
    /// A host event or cascade violated the wheel contract.
    Failed(WheelError),
}

#[derive(Debug)]
pub struct WheelDriver<T> {
    registry: WheelRegistry<T>,
    events: mpsc::UnboundedReceiver<HostEvent<T>>,
    output: mpsc::UnboundedSender<DriverOutput<T>>,
}

impl<T: Clone + JoinKey> WheelDriver<T> {
    pub fn new(
        registry: WheelRegistry<T>,
        events: mpsc::UnboundedReceiver<HostEvent<T>>,
        output: mpsc::UnboundedSender<DriverOutput<T>>,
    ) -> Self {
        Self {
            registry,
            events,
            output,
        }
    }

    /// Build a driver together with both ends the host holds.
    pub fn channel(
        registry: WheelRegistry<T>,
    ) -> (
        Self,
        mpsc::UnboundedSender<HostEvent<T>>,
        mpsc::UnboundedReceiver<DriverOutput<T>>,
    ) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        (Self::new(registry, event_rx, output_tx), event_tx, output_rx)
    }

    /// Run until [`HostEvent::Shutdown`] arrives or every event sender is
    /// dropped, then return the registry with all timers cancelled.
    pub async fn run(mut self) -> WheelRegistry<T> {
        debug!(target: "rotor::driver", wheels = self.registry.len(), "driver started");
        self.flush();
        loop {
            let deadline = self.registry.next_deadline();
            let sleep = async move {
                match deadline {
                    Some(at) => time::sleep_until(TokioInstant::from_std(at)).await,
                    None => future::pending::<()>().await,
                }
            };

            let event = tokio::select! {
                event = self.events.recv() => Some(event),
                () = sleep => None,
            };

            match event {
                Some(None) | Some(Some(HostEvent::Shutdown)) => break,
                Some(Some(event)) => {
                    if let Err(err) = self.handle(event) {
                        self.emit(DriverOutput::Failed(err));
                    }
                }
                None => trace!(target: "rotor::driver", "timer deadline reached"),
            }

            self.fire_timers();
            self.flush();
        }

        let ids: Vec<WheelId> = self.registry.ids().collect();
        for id in ids {
            if let Some(wheel) = self.registry.get_mut(id) {
                wheel.shutdown();
            }
        }
        debug!(target: "rotor::driver", "driver stopped");
        self.registry
    }

    fn handle(&mut self, event: HostEvent<T>) -> Result<()> {
        let now = TokioInstant::now().into_std();
        match event {
            HostEvent::Scrolled {
                wheel,
                offset,
                first_visible,
            } => {
                self.wheel(wheel)?.on_scrolled(now, offset, first_visible)?;
            }
            HostEvent::ScrollStopped {
                wheel,
                offset,
                first_visible,
            } => {
                self.wheel(wheel)?
                    .on_scroll_stopped(now, offset, first_visible)?;
            }
            HostEvent::ItemExtent { wheel, px } => {
                self.wheel(wheel)?.set_item_extent(px)?;
            }
            HostEvent::ScrollTo { wheel, index } => {
                self.wheel(wheel)?.scroll_to(index)?;
            }
            HostEvent::Clicked { wheel } => {
                if let Some(selection) = self.wheel(wheel)?.on_item_clicked() {
                    self.emit(DriverOutput::Activated { wheel, selection });
                }
            }
            HostEvent::SetData { wheel, data } => {
                self.wheel(wheel)?.set_data(data);
            }
            HostEvent::SetWheelSize { wheel, size } => {
                self.wheel(wheel)?.set_wheel_size(size)?;
            }
            HostEvent::SetLoop { wheel, looping } => {
                self.wheel(wheel)?.set_loop(looping);
            }
            HostEvent::SetClickable { wheel, clickable } => {
                self.wheel(wheel)?.set_clickable(clickable);
            }
            HostEvent::Join { primary, dependent } => {
                self.registry.join(primary, dependent)?;
            }
            HostEvent::Unjoin { primary } => {
                if self.registry.unjoin(primary).is_none() {
                    trace!(target: "rotor::driver", %primary, "unjoin without a join");
                }
            }
            HostEvent::SetJoinData { primary, table } => {
                self.registry.set_join_data(primary, table)?;
            }
            HostEvent::Shutdown => {}
        }
        Ok(())
    }

    fn wheel(&mut self, id: WheelId) -> Result<&mut Wheel<T>> {
        self.registry.get_mut(id).ok_or_else(|| {
            warn!(target: "rotor::driver", wheel = %id, "event for unknown wheel");
            WheelError::InvalidArgument(format!("{id} is not registered"))
        })
    }

    fn fire_timers(&mut self) {
        let now = TokioInstant::now().into_std();
        let report = self.registry.tick(now);
        for settled in report.settled {
            debug!(
                target: "rotor::driver",
                wheel = %settled.wheel,
                index = settled.selection.index,
                "selection settled"
            );
            self.emit(DriverOutput::Settled(settled));
        }
        for (_, err) in report.failures {
            self.emit(DriverOutput::Failed(err));
        }
    }

    fn flush(&mut self) {
        for (wheel, request) in self.registry.drain_requests() {
            self.emit(DriverOutput::Request { wheel, request });
        }
    }

    fn emit(&self, output: DriverOutput<T>) {
        if self.output.send(output).is_err() {
            trace!(target: "rotor::driver", "output receiver dropped");
        }
    }
}
