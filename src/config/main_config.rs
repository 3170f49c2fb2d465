use crate::{config::config_file::ConfigFile, error::Result, utils};
use std::io::IsTerminal;

/// Holds the loaded config file and what main needs to know about the
/// execution environment
#[derive(Default, Debug)]
pub struct Config {
    /// Launchr-specific config file
    pub file: ConfigFile,
    /// Whether or not stdout is a terminal
    pub terminal_output: bool,
}

impl Config {
    /// Create a new instance of Config
    #[mutants::skip] // Cannot test directly, depends on system state
    pub fn new() -> Result<Self> {
        let file = ConfigFile::load();
        let terminal_output = std::io::stdout().is_terminal();

        // Issue a notification if launchr is not being run in a terminal
        // Config's errors are not able to be handled by `main`'s similar error handling
        if let Err(ref e) = file {
            if !terminal_output {
                utils::notify("launchr error", &e.to_string())?
            }
        }

        Ok(Self {
            file: file?,
            terminal_output,
        })
    }
}
