mod registry;
mod system;

pub use registry::{PackageOrigin, PackageRecord, PackageRegistry};
pub use system::SystemRegistry;
