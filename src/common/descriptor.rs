use crate::{common::render_table, error::Result};
use derive_more::{Deref, DerefMut};
use serde::Serialize;
use std::io::Write;
use tabled::Tabled;

/// Uniform descriptor for one application known to the registry
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AppDescriptor {
    /// Display label, empty when the registry cannot resolve one
    pub name: String,
    /// Stable identifier the registry was queried with
    pub id: String,
    /// Monotonic integer version stamp, in its string form
    pub version_code: String,
    /// Human-readable version, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    /// Base64-encoded icon bytes, absent when retrieval fails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl AppDescriptor {
    /// Check whether the query occurs in the identifier or the name.
    /// Both sides are case-folded, so the empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.id.to_lowercase().contains(&needle)
            || self.name.to_lowercase().contains(&needle)
    }

    /// Version to display, preferring the human-readable form
    fn version(&self) -> &str {
        self.version_name.as_deref().unwrap_or(&self.version_code)
    }
}

/// Helper struct for a list of `AppDescriptor`s
#[derive(
    Debug, Default, Clone, Deref, DerefMut, Serialize, PartialEq, Eq,
)]
pub struct AppList(Vec<AppDescriptor>);

impl FromIterator<AppDescriptor> for AppList {
    fn from_iter<I: IntoIterator<Item = AppDescriptor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<AppDescriptor>> for AppList {
    fn from(apps: Vec<AppDescriptor>) -> Self {
        Self(apps)
    }
}

/// Internal helper struct for turning an AppDescriptor into tabular data
#[derive(Tabled)]
struct AppRow<'a> {
    name: &'a str,
    id: &'a str,
    version: &'a str,
}

impl<'a> AppRow<'a> {
    fn new(app: &'a AppDescriptor) -> Self {
        Self {
            name: &app.name,
            id: &app.id,
            version: app.version(),
        }
    }
}

/// Render a table of applications from a directory enumeration
/// and write it to the given writer
pub fn app_table<W: Write>(
    writer: &mut W,
    apps: &AppList,
    output_json: bool,
    terminal_output: bool,
) -> Result<()> {
    let output = if output_json {
        serde_json::to_string(apps)?
    } else {
        let rows = apps.iter().map(AppRow::new).collect::<Vec<_>>();
        render_table(&rows, terminal_output)
    };

    writeln!(writer, "{output}")?;

    Ok(())
}

/// Write a single application descriptor, as a tab-separated line or as JSON
pub fn show_app<W: Write>(
    writer: &mut W,
    app: &AppDescriptor,
    output_json: bool,
) -> Result<()> {
    let output = if output_json {
        serde_json::to_string(app)?
    } else {
        format!("{}\t{}\t{}", app.id, app.name, app.version())
    };

    writeln!(writer, "{output}")?;

    Ok(())
}
