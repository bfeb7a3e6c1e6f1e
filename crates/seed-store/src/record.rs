//! Records, natural keys and query filters
//!
//! A [`Record`] wraps exactly one entity row. Its [`NaturalKey`] is the
//! stable, human-meaningful identity used to decide whether the row
//! already exists, independent of the store-assigned [`RecordId`].

use crate::entity::{
    ApplicationStatus, DegreeType, EntityType, NotificationKind, RecordId, UserRole,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// University row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub name: String,
    pub name_local: String,
    pub country: String,
    pub city: String,
    pub founded_year: u16,
    pub website: String,
    pub is_active: bool,
}

/// Program row, owned by a university
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub name_local: String,
    pub university_id: RecordId,
    pub degree_type: DegreeType,
    pub language: String,
    pub duration_years: u8,
    /// Yearly tuition in USD
    pub tuition_fee: u32,
    pub quota: u32,
    pub is_active: bool,
}

/// Platform setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub category: String,
    pub description: String,
    pub is_public: bool,
}

/// Upload rule for one document type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSetting {
    pub file_type: String,
    pub category: String,
    pub max_size_mb: u32,
    pub allowed_extensions: Vec<String>,
    pub is_required: bool,
}

/// Student application to a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub student_id: RecordId,
    pub university_id: RecordId,
    pub program_id: RecordId,
    pub status: ApplicationStatus,
    pub personal_info: serde_json::Value,
    pub academic_info: serde_json::Value,
}

/// Message posted on an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub application_id: RecordId,
    pub sender_id: RecordId,
    pub sender_role: UserRole,
    pub content: String,
    pub is_read: bool,
}

/// Notification for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: RecordId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
}

/// Pre-existing user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

/// One row of any entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum Record {
    University(University),
    Program(Program),
    Setting(Setting),
    FileSetting(FileSetting),
    Application(Application),
    Message(Message),
    Notification(Notification),
    User(User),
}

impl Record {
    /// Entity type of this row
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        match self {
            Record::University(_) => EntityType::University,
            Record::Program(_) => EntityType::Program,
            Record::Setting(_) => EntityType::Setting,
            Record::FileSetting(_) => EntityType::FileSetting,
            Record::Application(_) => EntityType::Application,
            Record::Message(_) => EntityType::Message,
            Record::Notification(_) => EntityType::Notification,
            Record::User(_) => EntityType::User,
        }
    }

    /// Compute the idempotency key of this row
    ///
    /// Pure: depends only on the record's own attributes. Append-only
    /// entities have no natural key and return `None`.
    #[must_use]
    pub fn natural_key(&self) -> Option<NaturalKey> {
        match self {
            Record::University(u) => Some(NaturalKey::University {
                name: u.name.clone(),
            }),
            Record::Program(p) => Some(NaturalKey::Program {
                name: p.name.clone(),
                university_id: p.university_id,
            }),
            Record::Setting(s) => Some(NaturalKey::Setting { key: s.key.clone() }),
            Record::FileSetting(f) => Some(NaturalKey::FileSetting {
                file_type: f.file_type.clone(),
            }),
            Record::Application(a) => Some(NaturalKey::Application {
                student_id: a.student_id,
                program_id: a.program_id,
            }),
            Record::User(u) => Some(NaturalKey::User {
                email: u.email.clone(),
            }),
            Record::Message(_) | Record::Notification(_) => None,
        }
    }

    /// Foreign references held by this row
    #[must_use]
    pub fn references(&self) -> Vec<(EntityType, RecordId)> {
        match self {
            Record::Program(p) => vec![(EntityType::University, p.university_id)],
            Record::Application(a) => vec![
                (EntityType::User, a.student_id),
                (EntityType::University, a.university_id),
                (EntityType::Program, a.program_id),
            ],
            Record::Message(m) => vec![
                (EntityType::Application, m.application_id),
                (EntityType::User, m.sender_id),
            ],
            Record::Notification(n) => vec![(EntityType::User, n.user_id)],
            Record::University(_)
            | Record::Setting(_)
            | Record::FileSetting(_)
            | Record::User(_) => Vec::new(),
        }
    }

    /// Read a named column as a string, for equality filters
    #[must_use]
    pub fn field(&self, field: &str) -> Option<String> {
        let value = match (self, field) {
            (Record::University(u), "name") => u.name.clone(),
            (Record::University(u), "country") => u.country.clone(),
            (Record::University(u), "city") => u.city.clone(),
            (Record::Program(p), "name") => p.name.clone(),
            (Record::Program(p), "university_id") => p.university_id.to_string(),
            (Record::Program(p), "degree_type") => p.degree_type.as_str().to_string(),
            (Record::Program(p), "language") => p.language.clone(),
            (Record::Setting(s), "key") => s.key.clone(),
            (Record::Setting(s), "category") => s.category.clone(),
            (Record::FileSetting(f), "file_type") => f.file_type.clone(),
            (Record::FileSetting(f), "category") => f.category.clone(),
            (Record::Application(a), "student_id") => a.student_id.to_string(),
            (Record::Application(a), "university_id") => a.university_id.to_string(),
            (Record::Application(a), "program_id") => a.program_id.to_string(),
            (Record::Application(a), "status") => a.status.as_str().to_string(),
            (Record::Message(m), "application_id") => m.application_id.to_string(),
            (Record::Message(m), "sender_id") => m.sender_id.to_string(),
            (Record::Notification(n), "user_id") => n.user_id.to_string(),
            (Record::Notification(n), "title") => n.title.clone(),
            (Record::User(u), "email") => u.email.clone(),
            (Record::User(u), "role") => u.role.as_str().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Borrow as a university row
    #[must_use]
    pub fn as_university(&self) -> Option<&University> {
        match self {
            Record::University(u) => Some(u),
            _ => None,
        }
    }

    /// Borrow as a program row
    #[must_use]
    pub fn as_program(&self) -> Option<&Program> {
        match self {
            Record::Program(p) => Some(p),
            _ => None,
        }
    }

    /// Borrow as an application row
    #[must_use]
    pub fn as_application(&self) -> Option<&Application> {
        match self {
            Record::Application(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow as a user row
    #[must_use]
    pub fn as_user(&self) -> Option<&User> {
        match self {
            Record::User(u) => Some(u),
            _ => None,
        }
    }
}

/// A persisted row with its store-assigned identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub record: Record,
}

/// Idempotency key of a row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum NaturalKey {
    University { name: String },
    Program { name: String, university_id: RecordId },
    Setting { key: String },
    FileSetting { file_type: String },
    Application { student_id: RecordId, program_id: RecordId },
    User { email: String },
}

impl NaturalKey {
    /// Entity type the key belongs to
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        match self {
            NaturalKey::University { .. } => EntityType::University,
            NaturalKey::Program { .. } => EntityType::Program,
            NaturalKey::Setting { .. } => EntityType::Setting,
            NaturalKey::FileSetting { .. } => EntityType::FileSetting,
            NaturalKey::Application { .. } => EntityType::Application,
            NaturalKey::User { .. } => EntityType::User,
        }
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaturalKey::University { name } => write!(f, "university '{name}'"),
            NaturalKey::Program {
                name,
                university_id,
            } => write!(f, "program '{name}' at {university_id}"),
            NaturalKey::Setting { key } => write!(f, "setting '{key}'"),
            NaturalKey::FileSetting { file_type } => write!(f, "file setting '{file_type}'"),
            NaturalKey::Application {
                student_id,
                program_id,
            } => write!(f, "application of {student_id} to {program_id}"),
            NaturalKey::User { email } => write!(f, "user '{email}'"),
        }
    }
}

/// Row selection for [`crate::EntityStore::query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every row of the entity type
    All,
    /// The row identified by a natural key
    NaturalKey(NaturalKey),
    /// String equality on a named column
    Field { field: String, value: String },
}

impl Filter {
    /// Equality filter on a named column
    #[inline]
    pub fn field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check whether a row satisfies the filter
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::NaturalKey(key) => record.natural_key().as_ref() == Some(key),
            Filter::Field { field, value } => record.field(field).as_deref() == Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn university(name: &str) -> Record {
        Record::University(University {
            name: name.to_string(),
            name_local: name.to_string(),
            country: "Turkey".to_string(),
            city: "Istanbul".to_string(),
            founded_year: 1900,
            website: "https://example.edu".to_string(),
            is_active: true,
        })
    }

    #[test]
    fn append_only_records_have_no_natural_key() {
        let msg = Record::Notification(Notification {
            user_id: RecordId::new(),
            title: "hi".to_string(),
            message: "hello".to_string(),
            kind: NotificationKind::Info,
            is_read: false,
        });
        assert!(msg.natural_key().is_none());
        assert!(msg.entity_type().is_append_only());
    }

    #[test]
    fn program_key_includes_university() {
        let a = RecordId::new();
        let b = RecordId::new();
        let program = |university_id| {
            Record::Program(Program {
                name: "Computer Engineering".to_string(),
                name_local: "Bilgisayar Mühendisliği".to_string(),
                university_id,
                degree_type: DegreeType::Bachelor,
                language: "English".to_string(),
                duration_years: 4,
                tuition_fee: 5000,
                quota: 50,
                is_active: true,
            })
        };
        assert_ne!(program(a).natural_key(), program(b).natural_key());
        assert_eq!(program(a).natural_key(), program(a).natural_key());
    }

    #[test]
    fn filter_matches_field_and_reference() {
        let uni_id = RecordId::new();
        let program = Record::Program(Program {
            name: "Medicine".to_string(),
            name_local: "Tıp".to_string(),
            university_id: uni_id,
            degree_type: DegreeType::Doctorate,
            language: "Turkish".to_string(),
            duration_years: 6,
            tuition_fee: 12000,
            quota: 20,
            is_active: true,
        });

        assert!(Filter::field("language", "Turkish").matches(&program));
        assert!(!Filter::field("language", "English").matches(&program));
        assert!(!Filter::field("unknown", "x").matches(&program));
    }

    #[test]
    fn record_serde_is_tagged() {
        let json = serde_json::to_value(university("Ankara University")).unwrap();
        assert_eq!(json["entity"], "university");
        assert_eq!(json["name"], "Ankara University");
    }

    proptest! {
        #[test]
        fn natural_key_is_deterministic(name in "[A-Za-z ]{1,40}") {
            let a = university(&name);
            let b = university(&name);
            prop_assert_eq!(a.natural_key(), b.natural_key());
            prop_assert!(Filter::NaturalKey(a.natural_key().unwrap()).matches(&b));
        }
    }
}
