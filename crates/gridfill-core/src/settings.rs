//! User settings.

use serde::Deserialize;

/// Spreadsheet applications refuse formulas with more separate arguments
/// than this.
pub const DEFAULT_MAX_DISCRETE_REFS: usize = 255;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Longest discrete reference list a formula may expand to.
    pub max_discrete_refs: usize,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_discrete_refs: DEFAULT_MAX_DISCRETE_REFS,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
