//! User-level interface settings.
//!
//! ```toml
//! enable_hotkeys = true
//! enable_tooltips = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Interface switches that affect how labels react to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether hotkeys toggle labels.
    pub enable_hotkeys: bool,
    /// Whether hotkey hints are rendered next to labels.
    pub enable_tooltips: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_hotkeys: true,
            enable_tooltips: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(
            target: "horizon_annotate::config",
            path = %path.display(),
            ?settings,
            "loaded settings"
        );
        Ok(settings)
    }

    /// Whether a hotkey hint should be shown for a label.
    pub fn shows_hotkey_hint(&self) -> bool {
        self.enable_hotkeys && self.enable_tooltips
    }
}
