//! Seedbed Store
//!
//! Entity model and backing-store contract for the provisioning pipeline.
//!
//! # Overview
//!
//! - **EntityType / Record**: the tables and rows the pipeline provisions
//! - **NaturalKey**: per-entity idempotency key, computed purely from a record
//! - **EntityStore**: exists / insert / delete_all / query adapter contract
//! - **InMemoryStore**: reference implementation enforcing unique natural
//!   keys and referential existence
//!
//! # Example
//!
//! ```rust
//! use seed_store::{EntityStore, InMemoryStore, Record, University};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = InMemoryStore::new();
//! let record = Record::University(University {
//!     name: "Ankara University".into(),
//!     name_local: "Ankara Üniversitesi".into(),
//!     country: "Turkey".into(),
//!     city: "Ankara".into(),
//!     founded_year: 1946,
//!     website: "https://www.ankara.edu.tr".into(),
//!     is_active: true,
//! });
//! let key = record.natural_key().unwrap();
//!
//! store.insert(record).await.unwrap();
//! assert!(store.exists(&key).await.unwrap());
//! # }
//! ```

#![allow(missing_docs)]

pub mod adapter;
pub mod entity;
pub mod error;
pub mod memory;
pub mod record;

// Re-exports
pub use adapter::EntityStore;
pub use entity::{ApplicationStatus, DegreeType, EntityType, NotificationKind, RecordId, UserRole};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use record::{
    Application, FileSetting, Filter, Message, NaturalKey, Notification, Program, Record, Setting,
    StoredRecord, University, User,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for store operations
    pub use crate::{
        EntityStore, EntityType, Filter, InMemoryStore, NaturalKey, Record, RecordId,
        StoreError, StoredRecord,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
