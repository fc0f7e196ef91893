//! Settings for rotor wheels.
//!
//! Loads [`WheelSettings`] from a TOML/JSON file, inline JSON or defaults,
//! applies scalar environment overrides and validates the result into the
//! engine's `WheelConfig`, `WheelTiming` and `WheelStyle`. The
//! `rotor-preview` binary drives a small clock built from these settings.

#![allow(missing_docs)]

pub mod error;
pub mod models;
pub mod util;

pub use error::SettingsError;
pub use models::{
    SettingsSource, StyleSettings, TimingSettings, WheelSettings,
};
