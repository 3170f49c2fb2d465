// This file exists solely to trick build script into working
// These types are used by cli.rs, which cannot be transitively imported
// because they rely on their own dependencies and so on

use std::error::Error;

pub trait PackageRegistry {}

pub struct PackageRecord {
    pub id: String,
}

pub struct SystemRegistry;

impl SystemRegistry {
    pub fn populate(
        _config: &crate::config::ConfigFile,
    ) -> Result<Self, Box<dyn Error>> {
        Ok(Self)
    }

    pub fn packages(&self) -> Vec<PackageRecord> {
        vec![PackageRecord { id: String::new() }]
    }

    pub fn label(&self, _id: &str) -> Option<String> {
        None
    }
}
