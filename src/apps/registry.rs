use crate::error::Result;

/// Where the registry found an application's entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageOrigin {
    /// Installed by the user
    User,
    /// Shipped with the system
    System,
    /// Shipped with the system, since overridden by a user copy
    UpdatedSystem,
}

impl PackageOrigin {
    /// Whether enumeration excludes the record.
    /// Built-in components and system components updated by the user
    /// are both filtered out; direct lookups ignore this.
    pub fn is_system(self) -> bool {
        matches!(self, Self::System | Self::UpdatedSystem)
    }
}

/// One application record as the registry stores it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    /// Unique, stable identifier of the package
    pub id: String,
    /// Monotonic integer version stamp
    pub version_code: i64,
    /// Human-readable version, if any
    pub version_name: Option<String>,
    /// Origin classification, drives the system-application filter
    pub origin: PackageOrigin,
}

/// Collaborator interface over the host's package registry.
///
/// Lookups that can fail with "no such application" return a `Result`
/// carrying `Error::NotFound`; best-effort lookups return an `Option`
/// and never fail the surrounding operation.
pub trait PackageRegistry {
    /// Enumerate all records known to the registry, in registry order
    fn packages(&self) -> Vec<PackageRecord>;

    /// Fetch one record by identifier
    fn package(&self, id: &str) -> Result<PackageRecord>;

    /// Whether the application is enabled
    fn enabled(&self, id: &str) -> Result<bool>;

    /// Resolve a human-readable label, best-effort
    fn label(&self, id: &str) -> Option<String>;

    /// Resolve raw icon bytes, best-effort
    fn icon(&self, id: &str) -> Option<Vec<u8>>;

    /// Resolve the launch entry point as an argv
    fn launch_command(&self, id: &str) -> Option<Vec<String>>;

    /// Start the given entry point detached from this process
    fn spawn(&self, argv: &[String]) -> Result<()>;
}
