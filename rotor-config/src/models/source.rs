use std::path::PathBuf;

/// Source that produced the wheel settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SettingsSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl std::fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsSource::Default => f.write_str("built-in defaults"),
            SettingsSource::EnvPath(path) => {
                write!(f, "$ROTOR_CONFIG_PATH ({})", path.display())
            }
            SettingsSource::EnvInline => f.write_str("$ROTOR_CONFIG_JSON"),
            SettingsSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
