use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The config file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Whether `list --json` embeds base64 icons by default
    pub include_icons: bool,
    /// Extra directories scanned for desktop entries alongside
    /// $XDG_DATA_HOME/applications, e.g. flatpak exports
    pub extra_app_dirs: Vec<PathBuf>,
}

impl ConfigFile {
    /// Load ~/.config/launchr/launchr.toml
    #[mutants::skip] // Cannot test directly, depends on system state
    pub fn load() -> Result<Self> {
        Ok(confy::load("launchr")?)
    }
}
