//! Entity types and identifiers
//!
//! Defines the tables the provisioning pipeline works with and the
//! typed attribute enums shared by their records.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Entity types known to the backing store
///
/// `User` is the pre-existing account table. It is read by the pipeline
/// but never written or deleted by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Universities
    University,
    /// Study programs offered by a university
    Program,
    /// Platform settings (key/value)
    Setting,
    /// Upload rules per document type
    FileSetting,
    /// Student applications to a program
    Application,
    /// Messages exchanged on an application
    Message,
    /// User notifications
    Notification,
    /// Pre-existing user accounts
    User,
}

impl EntityType {
    /// All entity types
    pub const ALL: [EntityType; 8] = [
        EntityType::University,
        EntityType::Program,
        EntityType::Setting,
        EntityType::FileSetting,
        EntityType::Application,
        EntityType::Message,
        EntityType::Notification,
        EntityType::User,
    ];

    /// Stable table name
    #[inline]
    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            EntityType::University => "universities",
            EntityType::Program => "programs",
            EntityType::Setting => "settings",
            EntityType::FileSetting => "file_settings",
            EntityType::Application => "applications",
            EntityType::Message => "messages",
            EntityType::Notification => "notifications",
            EntityType::User => "users",
        }
    }

    /// Rows of this type carry no natural key and are only ever appended
    #[inline]
    #[must_use]
    pub fn is_append_only(self) -> bool {
        matches!(self, EntityType::Message | EntityType::Notification)
    }

    /// Entity types this type holds foreign references to
    #[must_use]
    pub fn parents(self) -> &'static [EntityType] {
        match self {
            EntityType::Program => &[EntityType::University],
            EntityType::Application => &[
                EntityType::User,
                EntityType::University,
                EntityType::Program,
            ],
            EntityType::Message => &[EntityType::Application, EntityType::User],
            EntityType::Notification => &[EntityType::User],
            EntityType::University
            | EntityType::Setting
            | EntityType::FileSetting
            | EntityType::User => &[],
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Store-assigned record identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Ulid);

impl RecordId {
    /// Generate new record ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Degree awarded by a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeType {
    /// Two-year associate degree
    Associate,
    /// Undergraduate
    Bachelor,
    /// Graduate
    Master,
    /// PhD
    Doctorate,
}

impl DegreeType {
    /// Column value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DegreeType::Associate => "associate",
            DegreeType::Bachelor => "bachelor",
            DegreeType::Master => "master",
            DegreeType::Doctorate => "doctorate",
        }
    }
}

/// Lifecycle status of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Column value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Account role, also used as the sender role of messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Admin,
}

impl UserRole {
    /// Column value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// Column value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_unique() {
        let mut names: Vec<_> = EntityType::ALL.iter().map(|e| e.table_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EntityType::ALL.len());
    }

    #[test]
    fn only_messages_and_notifications_are_append_only() {
        let append_only: Vec<_> = EntityType::ALL
            .into_iter()
            .filter(|e| e.is_append_only())
            .collect();
        assert_eq!(
            append_only,
            vec![EntityType::Message, EntityType::Notification]
        );
    }

    #[test]
    fn program_depends_on_university() {
        assert_eq!(EntityType::Program.parents(), &[EntityType::University]);
        assert!(EntityType::University.parents().is_empty());
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&UserRole::Student).unwrap();
        assert_eq!(json, "\"student\"");
        assert_eq!(ApplicationStatus::UnderReview.as_str(), "under_review");
    }
}
