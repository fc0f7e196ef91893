use crate::error::SettingsError;

/// Parse a boolean value from a raw string, accepting common env-style forms.
///
/// Accepted truthy values (case-insensitive): `"1"`, `"true"`, `"yes"`, `"on"`.
/// Accepted falsy values: `"0"`, `"false"`, `"no"`, `"off"`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean env var. Unset or blank is `Ok(None)`; anything
/// [`parse_bool`] rejects is an error.
pub fn parse_bool_var(name: &str) -> Result<Option<bool>, SettingsError> {
    match non_blank_var(name) {
        None => Ok(None),
        Some(raw) => parse_bool(&raw)
            .map(Some)
            .ok_or_else(|| SettingsError::InvalidEnv {
                name: name.to_string(),
                value: raw,
            }),
    }
}

pub fn parse_usize_var(name: &str) -> Result<Option<usize>, SettingsError> {
    match non_blank_var(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            SettingsError::InvalidEnv {
                name: name.to_string(),
                value: raw,
            }
        }),
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}
