//! Seedbed Catalog
//!
//! Static, versioned seed data for the provisioning pipeline.
//!
//! Entries reference other entries by natural key (a program names its
//! university, an application names its program) so the catalog never
//! hardcodes store-assigned identifiers. Resolution to ids happens at
//! insertion time.
//!
//! # Example
//!
//! ```rust
//! use seed_catalog::SeedCatalog;
//! use seed_store::EntityType;
//!
//! let catalog = SeedCatalog::standard();
//! catalog.validate().unwrap();
//! assert_eq!(catalog.entry_count(EntityType::University), 5);
//! ```

#![allow(missing_docs)]

pub mod catalog;
pub mod error;
pub mod seeds;
mod standard;

pub use catalog::SeedCatalog;
pub use error::CatalogError;
pub use seeds::{
    ApplicationSeed, FileSettingSeed, MessageSeed, NotificationSeed, ProgramRef, ProgramSeed,
    SettingSeed, UniversitySeed,
};
pub use standard::{demo_accounts, ADMIN_EMAIL, STANDARD_VERSION, STUDENT_EMAIL};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
