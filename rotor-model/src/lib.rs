//! Core data model definitions shared across rotor crates.
#![allow(missing_docs)]

pub mod config;
pub mod data;
pub mod error;
pub mod index;
pub mod style;

pub use config::{ItemExtent, WheelConfig, WindowSize};
pub use data::{DataSet, JoinKey, Selection};
pub use error::{ModelError, Result as ModelResult};
pub use index::VirtualIndex;
pub use style::{Color, WheelStyle};
