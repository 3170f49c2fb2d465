use crate::error::{Error, Result};
use aho_corasick::AhoCorasick;
use freedesktop_desktop_entry::{
    get_languages_from_env, DesktopEntry as FreeDesktopEntry,
};
use once_cell::sync::Lazy;
use std::{
    convert::TryFrom,
    path::{Path, PathBuf},
};

/// Freedesktop field codes that may appear in an `Exec` line.
/// Launching takes no caller arguments, so they are removed wholesale.
static FIELD_CODES: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new_auto_configured(&["%f", "%F", "%u", "%U", "%i", "%c", "%k"])
});

/// Represents a desktop entry file for an application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Identifier of the application, the desktop file's stem
    pub id: String,
    /// Name of the application
    pub name: String,
    /// Command to execute
    pub exec: String,
    /// Value of the `Icon` key, an icon name or an absolute path
    pub icon: Option<String>,
    /// Whether the entry is marked `Hidden` or `NoDisplay`
    pub hidden: bool,
    /// Monotonic version stamp from `X-App-Version-Code`
    pub version_code: i64,
    /// Human-readable version from `X-App-Version`
    pub version_name: Option<String>,
}

impl DesktopEntry {
    /// Split the `Exec` line into an argv, removing field codes
    pub fn launch_command(&self) -> Result<Vec<String>> {
        let bad_exec =
            || Error::BadExec(self.exec.clone(), format!("{}.desktop", self.id));

        let argv: Vec<String> = shlex::split(&self.exec)
            .ok_or_else(|| bad_exec())?
            .into_iter()
            .filter_map(|arg| {
                if !FIELD_CODES.is_match(&arg) {
                    return Some(arg);
                }
                let stripped =
                    FIELD_CODES.replace_all(&arg, &["", "", "", "", "", "", ""]);
                (!stripped.is_empty()).then_some(stripped)
            })
            .collect();

        if argv.is_empty() {
            return Err(bad_exec());
        }

        Ok(argv)
    }

    /// Parse a desktop entry file, given a path
    fn parse_file(path: &Path) -> Option<DesktopEntry> {
        // Assume the set locales will not change while launchr is running
        static LOCALES: Lazy<Vec<String>> = Lazy::new(get_languages_from_env);

        let fd_entry =
            FreeDesktopEntry::from_path(path.to_path_buf(), &LOCALES).ok()?;

        let entry = DesktopEntry {
            id: path.file_stem()?.to_str()?.to_owned(),
            name: fd_entry.name(&LOCALES)?.into_owned(),
            exec: fd_entry.exec()?.to_owned(),
            icon: fd_entry.icon().map(str::to_owned),
            hidden: fd_entry.no_display()
                || fd_entry.desktop_entry("Hidden") == Some("true"),
            version_code: fd_entry
                .desktop_entry("X-App-Version-Code")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            version_name: fd_entry
                .desktop_entry("X-App-Version")
                .map(str::to_owned),
        };

        if !entry.name.is_empty() && !entry.exec.is_empty() {
            Some(entry)
        } else {
            None
        }
    }
}

impl TryFrom<PathBuf> for DesktopEntry {
    type Error = Error;
    fn try_from(path: PathBuf) -> Result<Self> {
        Self::parse_file(&path).ok_or(Error::BadEntry(path))
    }
}
