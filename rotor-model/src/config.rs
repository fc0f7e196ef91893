//! Wheel geometry: visible window, row extent, and boundary behavior.

use crate::error::{ModelError, Result};

/// Number of simultaneously visible rows. Always odd so one row sits at the
/// exact center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "usize", into = "usize")
)]
pub struct WindowSize(usize);

impl WindowSize {
    /// Three rows, the stock wheel.
    pub const DEFAULT: WindowSize = WindowSize(3);

    pub fn new(size: usize) -> Result<Self> {
        if size % 2 == 0 {
            return Err(ModelError::EvenWindowSize(size));
        }
        Ok(WindowSize(size))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Rows between the top edge and the center row.
    pub fn half(&self) -> usize {
        self.0 / 2
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for WindowSize {
    type Error = ModelError;

    fn try_from(value: usize) -> Result<Self> {
        WindowSize::new(value)
    }
}

impl From<WindowSize> for usize {
    fn from(value: WindowSize) -> Self {
        value.0
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pixel height of a single row, as measured by the host layout.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ItemExtent(f32);

impl ItemExtent {
    pub fn new(px: f32) -> Result<Self> {
        if !px.is_finite() || px <= 0.0 {
            return Err(ModelError::InvalidExtent(px));
        }
        Ok(ItemExtent(px))
    }

    pub fn px(&self) -> f32 {
        self.0
    }

    pub fn half(&self) -> f32 {
        self.0 / 2.0
    }
}

/// Boundary and interaction settings for one wheel.
///
/// The row extent is deliberately absent: it is unknown until the host has
/// laid out at least one row and is tracked by the engine separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelConfig {
    pub window_size: WindowSize,
    /// Wrap around at both ends instead of stopping at the first/last item.
    pub looping: bool,
    /// Forward clicks on the wheel as item activations.
    pub clickable: bool,
}

impl WheelConfig {
    pub fn new(window_size: WindowSize) -> Self {
        Self {
            window_size,
            ..Default::default()
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }
}
