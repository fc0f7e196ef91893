use anyhow::{Context, anyhow};
use rotor_core::WheelTiming;
use rotor_model::{Color, WheelConfig, WheelStyle, WindowSize};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

use crate::error::SettingsError;
use crate::util::{parse_bool_var, parse_usize_var};

use super::source::SettingsSource;

pub const CONFIG_PATH_VAR: &str = "ROTOR_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "ROTOR_CONFIG_JSON";
pub const WHEEL_SIZE_VAR: &str = "ROTOR_WHEEL_SIZE";
pub const LOOP_VAR: &str = "ROTOR_LOOP";
pub const CLICKABLE_VAR: &str = "ROTOR_CLICKABLE";

/// Settings for one wheel, as written in `rotor.toml` or passed inline.
///
/// Every field has a default, so a file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelSettings {
    /// Visible rows. Must be odd.
    pub wheel_size: usize,
    /// Wrap from the last item back to the first.
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Report clicks on the wheel as activations.
    pub clickable: bool,
    pub timing: TimingSettings,
    pub style: StyleSettings,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            wheel_size: WindowSize::DEFAULT.get(),
            looping: false,
            clickable: false,
            timing: TimingSettings::default(),
            style: StyleSettings::default(),
        }
    }
}

/// Timer tuning, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Quiet period after the last scroll before the selection is reported.
    /// Shorter feels snappier but fires more events while the user hunts for
    /// a value.
    pub commit_delay_ms: u64,
    /// Length of each snap-to-row animation.
    pub snap_duration_ms: u64,
    /// Delay before a dependent wheel swaps in data from its primary.
    pub reset_delay_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        let timing = WheelTiming::default();
        Self {
            commit_delay_ms: millis(timing.commit_delay),
            snap_duration_ms: millis(timing.snap_duration),
            reset_delay_ms: millis(timing.reset_delay),
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Row styling. Colors are `#RRGGBB` or `#AARRGGBB`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleSettings {
    pub text_color: String,
    pub selected_text_color: String,
    pub text_size: f32,
    pub selected_text_zoom: f32,
    /// Opacity multiplier per row of distance from the center.
    pub text_alpha: f32,
    pub off_center_scale: f32,
}

impl Default for StyleSettings {
    fn default() -> Self {
        let style = WheelStyle::default();
        Self {
            text_color: style.text_color.to_string(),
            selected_text_color: style.selected_text_color.to_string(),
            text_size: style.text_size,
            selected_text_zoom: style.selected_text_zoom,
            text_alpha: style.text_alpha,
            off_center_scale: style.off_center_scale,
        }
    }
}

impl WheelSettings {
    /// Load settings using environment variables.
    /// Evaluation order:
    /// 1) `$ROTOR_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$ROTOR_CONFIG_JSON` (inline JSON),
    /// 3) the first default file found in the working directory,
    /// 4) defaults.
    ///
    /// Scalar overrides from `ROTOR_WHEEL_SIZE`, `ROTOR_LOOP` and
    /// `ROTOR_CLICKABLE` are applied on top of whichever source won.
    pub fn load_from_env() -> anyhow::Result<(Self, SettingsSource)> {
        Self::load_from_env_in(Path::new(""))
    }

    /// [`load_from_env`](Self::load_from_env), looking for default files
    /// under `dir` instead of the working directory.
    pub fn load_from_env_in(
        dir: &Path,
    ) -> anyhow::Result<(Self, SettingsSource)> {
        let (mut settings, source) = Self::load_base(dir)?;
        settings
            .apply_env_overrides()
            .context("invalid rotor environment override")?;
        debug!(?source, "wheel settings loaded");
        Ok((settings, source))
    }

    fn load_base(dir: &Path) -> anyhow::Result<(Self, SettingsSource)> {
        if let Ok(path_str) = env::var(CONFIG_PATH_VAR)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let settings = Self::load_from_file(&path)?;
            return Ok((settings, SettingsSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var(CONFIG_JSON_VAR)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_VAR}"))?;
            return Ok((parsed, SettingsSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(dir) {
            let settings = Self::load_from_file(&path)?;
            return Ok((settings, SettingsSource::File(path)));
        }

        Ok((Self::default(), SettingsSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read wheel settings from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid wheel settings {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!(
                        "invalid wheel settings {}: {}",
                        path.display(),
                        err
                    )
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    /// Parse TOML, falling back to JSON.
    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse wheel settings {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid wheel settings json: {err}"))
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string(self).context("failed to render wheel settings")
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), SettingsError> {
        if let Some(size) = parse_usize_var(WHEEL_SIZE_VAR)? {
            self.wheel_size = size;
        }
        if let Some(looping) = parse_bool_var(LOOP_VAR)? {
            self.looping = looping;
        }
        if let Some(clickable) = parse_bool_var(CLICKABLE_VAR)? {
            self.clickable = clickable;
        }
        Ok(())
    }

    /// Check every field and convert into engine types.
    pub fn validate(
        &self,
    ) -> Result<(WheelConfig, WheelTiming, WheelStyle), SettingsError> {
        let window = WindowSize::new(self.wheel_size)
            .map_err(|_| SettingsError::EvenWheelSize(self.wheel_size))?;
        let config = WheelConfig::new(window)
            .looping(self.looping)
            .clickable(self.clickable);

        let timing = WheelTiming {
            commit_delay: Duration::from_millis(self.timing.commit_delay_ms),
            snap_duration: Duration::from_millis(self.timing.snap_duration_ms),
            reset_delay: Duration::from_millis(self.timing.reset_delay_ms),
        };

        Ok((config, timing, self.style.validate()?))
    }

    fn find_default_file(dir: &Path) -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "rotor.toml",
            "rotor.json",
            "config/rotor.toml",
            "config/rotor.json",
        ];

        CANDIDATES
            .iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.exists())
    }
}

impl StyleSettings {
    pub fn validate(&self) -> Result<WheelStyle, SettingsError> {
        let text_alpha = self.text_alpha;
        if !(text_alpha > 0.0 && text_alpha <= 1.0) {
            return Err(SettingsError::TextAlpha(text_alpha));
        }
        positive("text_size", self.text_size)?;
        positive("selected_text_zoom", self.selected_text_zoom)?;
        positive("off_center_scale", self.off_center_scale)?;

        Ok(WheelStyle {
            text_color: color("text_color", &self.text_color)?,
            selected_text_color: color(
                "selected_text_color",
                &self.selected_text_color,
            )?,
            text_size: self.text_size,
            selected_text_zoom: self.selected_text_zoom,
            text_alpha,
            off_center_scale: self.off_center_scale,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NonPositive { field, value })
    }
}

fn color(field: &'static str, raw: &str) -> Result<Color, SettingsError> {
    Color::parse(raw).map_err(|_| SettingsError::Color {
        field,
        value: raw.to_string(),
    })
}
