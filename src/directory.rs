use crate::{
    apps::{PackageRecord, PackageRegistry},
    common::{AppDescriptor, AppList},
    error::{Error, Result},
};
use base64::{engine::general_purpose::STANDARD, Engine};

/// The application directory service.
///
/// Answers directory queries against the host's package registry. The
/// registry binding follows the host lifecycle and may be absent; every
/// operation checks it on entry and degrades to its documented default
/// rather than failing.
#[derive(Debug, Default)]
pub struct Directory<R> {
    registry: Option<R>,
}

impl<R: PackageRegistry> Directory<R> {
    /// Bind the directory to a registry, or to nothing
    pub fn attach(registry: Option<R>) -> Self {
        Self { registry }
    }

    /// Look up exactly one application by identifier.
    ///
    /// The returned descriptor carries no icon. A detached directory
    /// answers the same way as an unknown identifier.
    pub fn check_availability(&self, id: &str) -> Result<AppDescriptor> {
        let registry = self.registry(id)?;
        let record = registry.package(id)?;

        Ok(Self::descriptor(registry, record, false))
    }

    /// Enumerate the installed applications, excluding system-provided
    /// ones. Icons are attached best-effort when `icons` is set.
    ///
    /// Order is whatever order the registry yields.
    pub fn installed_apps(&self, icons: bool) -> AppList {
        match &self.registry {
            None => AppList::default(),
            Some(registry) => registry
                .packages()
                .into_iter()
                .filter(|record| !record.origin.is_system())
                .map(|record| Self::descriptor(registry, record, icons))
                .collect(),
        }
    }

    /// Same enumeration as [`Self::installed_apps`], keeping only entries
    /// whose identifier or name contains the case-folded query
    pub fn installed_apps_by_query(&self, query: &str, icons: bool) -> AppList {
        let mut apps = self.installed_apps(icons);
        apps.retain(|app| app.matches_query(query));
        apps
    }

    /// Look up the application's enabled flag.
    ///
    /// Unknown identifiers are an error; a detached directory defaults
    /// to `false`.
    pub fn is_app_enabled(&self, id: &str) -> Result<bool> {
        match &self.registry {
            None => Ok(false),
            Some(registry) => registry.enabled(id),
        }
    }

    /// Resolve the application's launch entry point and start it in a
    /// detached task. Irrevocable once triggered.
    pub fn launch_app(&self, id: &str) -> Result<()> {
        let registry = self.registry(id)?;
        registry.package(id)?;

        let argv = registry
            .launch_command(id)
            .ok_or_else(|| Error::NotFound(id.to_owned()))?;

        registry.spawn(&argv)
    }

    /// The bound registry, or `NotFound` for the queried identifier
    fn registry(&self, id: &str) -> Result<&R> {
        self.registry
            .as_ref()
            .ok_or_else(|| Error::NotFound(id.to_owned()))
    }

    /// Normalize one registry record into a descriptor.
    ///
    /// The label falls back to the empty string and the icon sub-step
    /// converts any failure into an absent icon; a missing field never
    /// fails the operation.
    fn descriptor(
        registry: &R,
        record: PackageRecord,
        icon: bool,
    ) -> AppDescriptor {
        let name = registry.label(&record.id).unwrap_or_default();
        let icon = icon
            .then(|| registry.icon(&record.id))
            .flatten()
            .map(|bytes| STANDARD.encode(bytes));

        AppDescriptor {
            name,
            id: record.id,
            version_code: record.version_code.to_string(),
            version_name: record.version_name,
            icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::PackageOrigin;
    use similar_asserts::assert_eq;
    use std::cell::RefCell;

    struct FakeApp {
        record: PackageRecord,
        label: Option<String>,
        icon: Option<Vec<u8>>,
        enabled: bool,
        command: Option<Vec<String>>,
    }

    #[derive(Default)]
    struct FakeRegistry {
        apps: Vec<FakeApp>,
        launched: RefCell<Vec<Vec<String>>>,
    }

    impl FakeRegistry {
        fn get(&self, id: &str) -> Option<&FakeApp> {
            self.apps.iter().find(|app| app.record.id == id)
        }
    }

    impl PackageRegistry for FakeRegistry {
        fn packages(&self) -> Vec<PackageRecord> {
            self.apps.iter().map(|app| app.record.clone()).collect()
        }

        fn package(&self, id: &str) -> Result<PackageRecord> {
            self.get(id)
                .map(|app| app.record.clone())
                .ok_or_else(|| Error::NotFound(id.to_owned()))
        }

        fn enabled(&self, id: &str) -> Result<bool> {
            self.get(id)
                .map(|app| app.enabled)
                .ok_or_else(|| Error::NotFound(id.to_owned()))
        }

        fn label(&self, id: &str) -> Option<String> {
            self.get(id)?.label.clone()
        }

        fn icon(&self, id: &str) -> Option<Vec<u8>> {
            self.get(id)?.icon.clone()
        }

        fn launch_command(&self, id: &str) -> Option<Vec<String>> {
            self.get(id)?.command.clone()
        }

        fn spawn(&self, argv: &[String]) -> Result<()> {
            self.launched.borrow_mut().push(argv.to_vec());
            Ok(())
        }
    }

    fn app(id: &str, label: &str) -> FakeApp {
        FakeApp {
            record: PackageRecord {
                id: id.into(),
                version_code: 1,
                version_name: None,
                origin: PackageOrigin::User,
            },
            label: (!label.is_empty()).then(|| label.to_owned()),
            icon: None,
            enabled: true,
            command: Some(vec![id.to_owned()]),
        }
    }

    fn system_app(id: &str, label: &str, origin: PackageOrigin) -> FakeApp {
        let mut app = app(id, label);
        app.record.origin = origin;
        app
    }

    // The registry from the worked example: one user application and one
    // system entry, plus an updated system entry and an iconful app
    fn directory() -> Directory<FakeRegistry> {
        let mut example = app("com.example.app", "Example");
        example.record.version_code = 42;
        example.record.version_name = Some("1.2.3".into());

        let mut painter = app("org.example.painter", "Painter");
        painter.icon = Some(b"icon".to_vec());

        Directory::attach(Some(FakeRegistry {
            apps: vec![
                example,
                painter,
                system_app(
                    "com.android.settings",
                    "Settings",
                    PackageOrigin::System,
                ),
                system_app(
                    "com.android.webview",
                    "WebView",
                    PackageOrigin::UpdatedSystem,
                ),
            ],
            launched: RefCell::default(),
        }))
    }

    fn detached() -> Directory<FakeRegistry> {
        Directory::attach(None)
    }

    fn ids(apps: &AppList) -> Vec<&str> {
        apps.iter().map(|app| app.id.as_str()).collect()
    }

    #[test]
    fn unknown_identifiers_are_not_found() {
        let directory = directory();

        for result in [
            directory.check_availability("com.missing").err(),
            directory.is_app_enabled("com.missing").err(),
            directory.launch_app("com.missing").err(),
        ] {
            assert!(matches!(
                result,
                Some(Error::NotFound(id)) if id == "com.missing"
            ));
        }
    }

    #[test]
    fn check_availability_echoes_the_identifier() -> Result<()> {
        let descriptor = directory().check_availability("com.example.app")?;

        assert_eq!(descriptor.id, "com.example.app");
        assert_eq!(descriptor.name, "Example");
        assert_eq!(descriptor.version_code, "42");
        assert_eq!(descriptor.version_name.as_deref(), Some("1.2.3"));

        Ok(())
    }

    #[test]
    fn check_availability_never_attaches_an_icon() -> Result<()> {
        // The registry has icon bytes for this one
        let descriptor =
            directory().check_availability("org.example.painter")?;
        assert_eq!(descriptor.icon, None);

        Ok(())
    }

    #[test]
    fn system_apps_are_filtered_from_enumeration() {
        let apps = directory().installed_apps(false);

        assert_eq!(
            ids(&apps),
            vec!["com.example.app", "org.example.painter"]
        );
    }

    #[test]
    fn system_apps_still_answer_direct_lookups() -> Result<()> {
        let directory = directory();

        assert_eq!(
            directory.check_availability("com.android.settings")?.id,
            "com.android.settings"
        );
        assert!(directory.is_app_enabled("com.android.settings")?);
        directory.launch_app("com.android.webview")?;

        Ok(())
    }

    #[test]
    fn query_results_are_a_case_folded_subset() {
        let directory = directory();
        let all = directory.installed_apps(false);

        // Case-insensitive match on the name "Example"
        let matched = directory.installed_apps_by_query("EXA", false);
        assert_eq!(ids(&matched), vec!["com.example.app"]);

        for app in matched.iter() {
            assert!(all.contains(app));
            assert!(
                app.id.to_lowercase().contains("exa")
                    || app.name.to_lowercase().contains("exa")
            );
        }

        // Identifier matching works too
        let by_id = directory.installed_apps_by_query("PAINTER", false);
        assert_eq!(ids(&by_id), vec!["org.example.painter"]);

        assert!(directory
            .installed_apps_by_query("com.android", false)
            .is_empty());
    }

    #[test]
    fn empty_query_matches_everything() {
        let directory = directory();

        assert_eq!(
            directory.installed_apps_by_query("", true),
            directory.installed_apps(true)
        );
    }

    #[test]
    fn icon_failures_never_poison_the_enumeration() {
        let apps = directory().installed_apps(true);

        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].icon, None);
        // base64 of b"icon"
        assert_eq!(apps[1].icon.as_deref(), Some("aWNvbg=="));
    }

    #[test]
    fn icons_are_only_fetched_on_request() {
        let apps = directory().installed_apps(false);

        assert!(apps.iter().all(|app| app.icon.is_none()));
    }

    #[test]
    fn missing_label_falls_back_to_empty_name() -> Result<()> {
        let directory = Directory::attach(Some(FakeRegistry {
            apps: vec![app("org.example.unnamed", "")],
            launched: RefCell::default(),
        }));

        let descriptor =
            directory.check_availability("org.example.unnamed")?;
        assert_eq!(descriptor.name, "");
        assert_eq!(descriptor.id, "org.example.unnamed");

        Ok(())
    }

    #[test]
    fn enabled_flag_comes_from_the_registry() -> Result<()> {
        let mut disabled = app("org.example.ghost", "Ghost");
        disabled.enabled = false;

        let directory = Directory::attach(Some(FakeRegistry {
            apps: vec![app("com.example.app", "Example"), disabled],
            launched: RefCell::default(),
        }));

        assert!(directory.is_app_enabled("com.example.app")?);
        assert!(!directory.is_app_enabled("org.example.ghost")?);

        Ok(())
    }

    #[test]
    fn launch_spawns_the_resolved_command() -> Result<()> {
        let directory = directory();

        directory.launch_app("com.example.app")?;

        let registry = directory.registry.as_ref().expect("attached");
        assert_eq!(
            *registry.launched.borrow(),
            vec![vec!["com.example.app".to_string()]]
        );

        Ok(())
    }

    #[test]
    fn unresolvable_entry_point_is_not_found() {
        let mut headless = app("org.example.daemon", "Daemon");
        headless.command = None;

        let directory = Directory::attach(Some(FakeRegistry {
            apps: vec![headless],
            launched: RefCell::default(),
        }));

        assert!(matches!(
            directory.launch_app("org.example.daemon"),
            Err(Error::NotFound(id)) if id == "org.example.daemon"
        ));
        assert!(directory
            .registry
            .as_ref()
            .expect("attached")
            .launched
            .borrow()
            .is_empty());
    }

    #[test]
    fn detached_directory_degrades_gracefully() -> Result<()> {
        let directory = detached();

        assert!(directory.installed_apps(true).is_empty());
        assert!(directory.installed_apps_by_query("exa", true).is_empty());
        assert!(!directory.is_app_enabled("com.example.app")?);
        assert!(matches!(
            directory.check_availability("com.example.app"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            directory.launch_app("com.example.app"),
            Err(Error::NotFound(_))
        ));

        Ok(())
    }
}
