pub mod settings;
pub mod source;

pub use settings::{StyleSettings, TimingSettings, WheelSettings};
pub use source::SettingsSource;
