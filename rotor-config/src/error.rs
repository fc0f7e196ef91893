use thiserror::Error;

/// Settings that parsed but cannot drive a wheel.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingsError {
    #[error("wheel_size must be odd, got {0}")]
    EvenWheelSize(usize),

    #[error("text_alpha must be in (0, 1], got {0}")]
    TextAlpha(f32),

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} is not a color: {value:?}")]
    Color { field: &'static str, value: String },

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: String, value: String },
}
