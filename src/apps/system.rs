use crate::{
    apps::{PackageOrigin, PackageRecord, PackageRegistry},
    common::DesktopEntry,
    config::ConfigFile,
    error::{Error, Result},
};
use itertools::Itertools;
use std::{
    collections::BTreeMap,
    convert::TryFrom,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// Registry of applications backed by the desktop entries
/// in the XDG data directories
#[derive(Debug, Default, Clone)]
pub struct SystemRegistry {
    records: BTreeMap<String, (DesktopEntry, PackageOrigin)>,
    /// Data directories searched when resolving icon names
    icon_roots: Vec<PathBuf>,
}

impl SystemRegistry {
    /// Scan the data directories and build the registry.
    ///
    /// Entries under `$XDG_DATA_HOME/applications` and the configured extra
    /// directories count as user-installed; entries under the
    /// `$XDG_DATA_DIRS` are system-provided.
    #[mutants::skip] // Cannot test directly, depends on system state
    pub fn populate(config: &ConfigFile) -> Result<Self> {
        let base = xdg::BaseDirectories::new()?;

        let user_dirs = std::iter::once(base.get_data_home())
            .chain(config.extra_app_dirs.iter().cloned())
            .map(|d| d.join("applications"))
            .collect_vec();
        let system_dirs = base
            .get_data_dirs()
            .into_iter()
            .map(|d| d.join("applications"))
            .collect_vec();

        let user = user_dirs.iter().flat_map(|d| Self::scan_dir(d)).collect();
        let system =
            system_dirs.iter().flat_map(|d| Self::scan_dir(d)).collect();

        let icon_roots = std::iter::once(base.get_data_home())
            .chain(base.get_data_dirs())
            .collect();

        Ok(Self::from_entries(user, system, icon_roots))
    }

    /// Parse every desktop entry in a directory, skipping malformed ones
    fn scan_dir(dir: &Path) -> Vec<DesktopEntry> {
        std::fs::read_dir(dir)
            .into_iter()
            .flatten()
            .filter_map(|entry| Some(entry.ok()?.path()))
            .filter(|p| {
                p.extension().and_then(|x| x.to_str()) == Some("desktop")
            })
            .filter_map(|p| DesktopEntry::try_from(p).ok())
            .collect()
    }

    /// Classify parsed entries by origin.
    ///
    /// Within one side the first entry for an id wins, following XDG
    /// precedence. A user copy of a system entry shadows it and marks the
    /// record as an updated system application.
    fn from_entries(
        user: Vec<DesktopEntry>,
        system: Vec<DesktopEntry>,
        icon_roots: Vec<PathBuf>,
    ) -> Self {
        let mut records: BTreeMap<String, (DesktopEntry, PackageOrigin)> =
            BTreeMap::new();

        for entry in system {
            records
                .entry(entry.id.clone())
                .or_insert((entry, PackageOrigin::System));
        }

        for entry in user {
            let origin = match records.get(&entry.id) {
                Some((_, PackageOrigin::System)) => {
                    Some(PackageOrigin::UpdatedSystem)
                }
                // An earlier user entry already claimed the id
                Some(_) => None,
                None => Some(PackageOrigin::User),
            };

            if let Some(origin) = origin {
                records.insert(entry.id.clone(), (entry, origin));
            }
        }

        Self {
            records,
            icon_roots,
        }
    }

    /// Resolve the `Icon` key to a file, trying it as an absolute path
    /// first and falling back to the conventional pixmap and hicolor
    /// locations under each data directory
    fn icon_file(&self, icon: &str) -> Option<PathBuf> {
        let path = Path::new(icon);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        self.icon_roots
            .iter()
            .flat_map(|root| {
                ["png", "svg", "xpm"].into_iter().flat_map(move |ext| {
                    [
                        root.join(format!("pixmaps/{icon}.{ext}")),
                        root.join(format!(
                            "icons/hicolor/48x48/apps/{icon}.{ext}"
                        )),
                        root.join(format!(
                            "icons/hicolor/scalable/apps/{icon}.{ext}"
                        )),
                    ]
                })
            })
            .find(|p| p.exists())
    }

    fn record(entry: &DesktopEntry, origin: PackageOrigin) -> PackageRecord {
        PackageRecord {
            id: entry.id.clone(),
            version_code: entry.version_code,
            version_name: entry.version_name.clone(),
            origin,
        }
    }
}

impl PackageRegistry for SystemRegistry {
    fn packages(&self) -> Vec<PackageRecord> {
        self.records
            .values()
            .map(|(entry, origin)| Self::record(entry, *origin))
            .collect()
    }

    fn package(&self, id: &str) -> Result<PackageRecord> {
        self.records
            .get(id)
            .map(|(entry, origin)| Self::record(entry, *origin))
            .ok_or_else(|| Error::NotFound(id.to_owned()))
    }

    fn enabled(&self, id: &str) -> Result<bool> {
        self.records
            .get(id)
            .map(|(entry, _)| !entry.hidden)
            .ok_or_else(|| Error::NotFound(id.to_owned()))
    }

    fn label(&self, id: &str) -> Option<String> {
        self.records.get(id).map(|(entry, _)| entry.name.clone())
    }

    fn icon(&self, id: &str) -> Option<Vec<u8>> {
        let (entry, _) = self.records.get(id)?;
        let file = self.icon_file(entry.icon.as_deref()?)?;
        std::fs::read(file).ok()
    }

    fn launch_command(&self, id: &str) -> Option<Vec<String>> {
        let (entry, _) = self.records.get(id)?;
        entry.launch_command().ok()
    }

    #[mutants::skip] // Cannot test directly, runs command
    fn spawn(&self, argv: &[String]) -> Result<()> {
        let (cmd, args) = match argv.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };

        Command::new(cmd)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(())
    }
}
