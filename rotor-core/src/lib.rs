//! Selection engine for circular, virtualized picker wheels.
//!
//! A [`Wheel`] tracks which item of its [`DataSet`](rotor_model::DataSet)
//! sits at the center of the visible window as the host list scrolls. It
//! folds virtual host rows back into logical indices, settles the list onto
//! row boundaries, debounces selection commits and, through a
//! [`WheelRegistry`], cascades commits from a primary wheel into the data of
//! its dependent.
//!
//! Time is explicit: every time-dependent call takes an `Instant` and timers
//! fire from `tick`. The optional `runtime` feature adds a tokio
//! `driver` that supplies the clock and the event loop.

#![allow(missing_docs)]

pub mod error;
pub mod join;
pub mod listener;
pub mod mapper;
pub mod registry;
pub mod scheduler;
pub mod settle;
pub mod styler;
pub mod tracker;
pub mod wheel;

#[cfg(feature = "runtime")]
pub mod driver;

pub use error::{Result, WheelError};
pub use join::{JoinEdge, JoinTable};
pub use listener::Listener;
pub use mapper::{PositionMapper, VIRTUAL_ITEM_COUNT, to_logical, virtual_base};
pub use registry::{Settled, TickReport, WheelId, WheelRegistry};
pub use scheduler::DeferredSlot;
pub use settle::{ScrollSettler, SnapRequest, settle_distance};
pub use styler::{ItemStyle, SlotStyle, style, style_window};
pub use tracker::{
    Observation, Resolution, SelectionTracker, TrackerPhase, WheelRuntimeState,
};
pub use wheel::{HostRequest, Wheel, WheelTiming};

#[cfg(feature = "runtime")]
pub use driver::{DriverOutput, HostEvent, WheelDriver};

pub use rotor_model;
