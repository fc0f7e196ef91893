//! Visual parameters for wheel rows.

use crate::error::{ModelError, Result};

/// ARGB color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const GRAY: Color = Color(0xFFA8_A8A8);

    pub const fn from_argb(argb: u32) -> Self {
        Color(argb)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Parse `#RRGGBB` (opaque) or `#AARRGGBB`.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidColor(raw.to_string());
        let hex = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Color(0xFF00_0000 | value)),
            8 => Ok(Color(value)),
            _ => Err(invalid()),
        }
    }

    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(&self) -> u8 {
        self.0 as u8
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.alpha() == 0xFF {
            write!(f, "#{:06X}", self.0 & 0x00FF_FFFF)
        } else {
            write!(f, "#{:08X}", self.0)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// Row styling shared by every slot of a wheel.
///
/// The centered row uses the selected color at `text_size *
/// selected_text_zoom`; other rows fade by `text_alpha` per row of distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelStyle {
    pub text_color: Color,
    pub selected_text_color: Color,
    /// Base text size in density-independent pixels.
    pub text_size: f32,
    pub selected_text_zoom: f32,
    /// Per-row opacity factor in `(0, 1]`.
    pub text_alpha: f32,
    /// Relative scale applied to rows away from the center.
    pub off_center_scale: f32,
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self {
            text_color: Color::GRAY,
            selected_text_color: Color::BLACK,
            text_size: 16.0,
            selected_text_zoom: 1.0,
            text_alpha: 0.7,
            off_center_scale: 1.0,
        }
    }
}
