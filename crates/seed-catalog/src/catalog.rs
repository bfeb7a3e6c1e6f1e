//! Seed catalog
//!
//! Immutable, versioned set of seed entries per entity type. A catalog is
//! purely declarative: building or loading one never touches a store.

use crate::error::CatalogError;
use crate::seeds::{
    ApplicationSeed, FileSettingSeed, MessageSeed, NotificationSeed, ProgramRef, ProgramSeed,
    SettingSeed, UniversitySeed,
};
use seed_store::EntityType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Canonical sample records, grouped by entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCatalog {
    /// Catalog version tag
    pub version: String,
    #[serde(default)]
    pub universities: Vec<UniversitySeed>,
    #[serde(default)]
    pub programs: Vec<ProgramSeed>,
    #[serde(default)]
    pub settings: Vec<SettingSeed>,
    #[serde(default)]
    pub file_settings: Vec<FileSettingSeed>,
    #[serde(default)]
    pub applications: Vec<ApplicationSeed>,
    #[serde(default)]
    pub messages: Vec<MessageSeed>,
    #[serde(default)]
    pub notifications: Vec<NotificationSeed>,
}

impl SeedCatalog {
    /// Create an empty catalog with a version tag
    #[must_use]
    pub fn empty(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            universities: Vec::new(),
            programs: Vec::new(),
            settings: Vec::new(),
            file_settings: Vec::new(),
            applications: Vec::new(),
            messages: Vec::new(),
            notifications: Vec::new(),
        }
    }

    /// Parse and validate a TOML catalog
    ///
    /// # Errors
    /// `CatalogError::Parse` on malformed input, or any validation error
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a TOML catalog file
    ///
    /// # Errors
    /// `CatalogError::Io` if the file cannot be read, otherwise as
    /// [`SeedCatalog::from_toml_str`]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Number of entries seeding one entity type
    #[must_use]
    pub fn entry_count(&self, entity: EntityType) -> usize {
        match entity {
            EntityType::University => self.universities.len(),
            EntityType::Program => self.programs.len(),
            EntityType::Setting => self.settings.len(),
            EntityType::FileSetting => self.file_settings.len(),
            EntityType::Application => self.applications.len(),
            EntityType::Message => self.messages.len(),
            EntityType::Notification => self.notifications.len(),
            EntityType::User => 0,
        }
    }

    /// Total number of entries
    #[must_use]
    pub fn total_entries(&self) -> usize {
        EntityType::ALL.iter().map(|e| self.entry_count(*e)).sum()
    }

    /// Check internal consistency
    ///
    /// Rejects duplicate natural keys within one entity list and references
    /// to entries the catalog does not seed.
    ///
    /// # Errors
    /// The first inconsistency found
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.version.trim().is_empty() {
            return Err(CatalogError::MissingVersion);
        }

        let universities = unique("university", self.universities.iter().map(|u| u.name.clone()))?;
        let programs = unique("program", self.programs.iter().map(ProgramSeed::program_ref))?;
        unique("setting", self.settings.iter().map(|s| s.key.clone()))?;
        unique("file setting", self.file_settings.iter().map(|f| f.file_type.clone()))?;
        let applications = unique(
            "application",
            self.applications.iter().map(ApplicationSeed::program_ref),
        )?;

        for program in &self.programs {
            if !universities.contains(&program.university) {
                return Err(CatalogError::UnknownUniversity {
                    program: program.name.clone(),
                    university: program.university.clone(),
                });
            }
        }

        for application in &self.applications {
            let target = application.program_ref();
            if !programs.contains(&target) {
                return Err(CatalogError::UnknownProgram {
                    entity: "application",
                    program: target.to_string(),
                });
            }
        }

        for message in &self.messages {
            let target = message.program_ref();
            if !programs.contains(&target) {
                return Err(CatalogError::UnknownProgram {
                    entity: "message",
                    program: target.to_string(),
                });
            }
            if !applications.contains(&target) {
                return Err(CatalogError::UnseededApplication {
                    program: target.to_string(),
                });
            }
        }

        Ok(())
    }
}

fn unique<K>(entity: &'static str, keys: impl Iterator<Item = K>) -> Result<HashSet<K>, CatalogError>
where
    K: std::hash::Hash + Eq + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for key in keys {
        if seen.contains(&key) {
            return Err(CatalogError::DuplicateEntry {
                entity,
                key: key.to_string(),
            });
        }
        seen.insert(key);
    }
    Ok(seen)
}
