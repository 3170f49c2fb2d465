use std::fmt::Write;

use crate::{
    apps::{PackageRegistry, SystemRegistry},
    config::ConfigFile,
};
use clap::{builder::StyledStr, Parser};
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};

/// Inspect and launch installed applications
///
/// Application directory over the desktop-entry database: check whether an
/// application is installed, list what is, check whether it is enabled, and
/// launch it by identifier.
#[deny(missing_docs)]
#[derive(Parser)]
#[clap(disable_help_subcommand = true)]
#[clap(version, about)]
pub enum Cmd {
    /// Check whether an application is installed
    ///
    /// Prints a tab-separated `id name version` line for the matching
    /// application and fails when there is none.
    ///
    /// When using `--json`, output will be in the form:
    ///
    /// {
    ///   "name": "Zenith",
    ///   "id": "org.example.zenith",
    ///   "version_code": "42",
    ///   "version_name": "1.2.3"
    /// }
    #[clap(verbatim_doc_comment)]
    Check {
        /// Application identifier to look up
        #[clap(add = ArgValueCompleter::new(autocomplete_identifiers))]
        id: String,
        /// Output the descriptor as json
        #[clap(long)]
        json: bool,
    },

    /// List installed applications
    ///
    /// System-provided applications are excluded. With a query, only
    /// applications whose identifier or name contains it are kept,
    /// ignoring case.
    ///
    /// Output is formatted as a table with name, id, and version columns.
    ///
    /// When using `--json`, output will be in the form:
    ///
    /// [
    ///   {
    ///     "name": "Zenith",
    ///     "id": "org.example.zenith",
    ///     "version_code": "42",
    ///     "version_name": "1.2.3"
    ///   },
    ///   ...
    /// ]
    ///
    /// With `--icons` (or `include_icons` in the config file), each json
    /// entry also carries an "icon" key with the base64-encoded icon
    #[clap(verbatim_doc_comment)]
    List {
        /// Case-insensitive substring to filter identifiers and names by
        query: Option<String>,
        /// Output application info as json
        #[clap(long)]
        json: bool,
        /// Embed base64 icons in json output
        #[clap(long)]
        icons: bool,
    },

    /// Check whether an application is enabled
    ///
    /// Prints `true` or `false`. Unknown identifiers are an error.
    Enabled {
        /// Application identifier to look up
        #[clap(add = ArgValueCompleter::new(autocomplete_identifiers))]
        id: String,
    },

    /// Launch an application by identifier
    ///
    /// Resolves the application's launch entry point and starts it in a
    /// task detached from the current process.
    Launch {
        /// Application identifier to launch
        #[clap(add = ArgValueCompleter::new(autocomplete_identifiers))]
        id: String,
    },
}

/// Generate candidates for application identifiers
#[mutants::skip] // Cannot test directly, relies on system state
fn autocomplete_identifiers(
    current: &std::ffi::OsStr,
) -> Vec<CompletionCandidate> {
    let registry = SystemRegistry::populate(&ConfigFile::default())
        .expect("Could not read the application directories");

    registry
        .packages()
        .into_iter()
        .filter(|record| {
            record.id.starts_with(current.to_string_lossy().as_ref())
        })
        .map(|record| {
            let mut help = StyledStr::new();
            write!(help, "{}", registry.label(&record.id).unwrap_or_default())
                .expect("Could not write application name");
            CompletionCandidate::new(record.id).help(Some(help))
        })
        .collect()
}
