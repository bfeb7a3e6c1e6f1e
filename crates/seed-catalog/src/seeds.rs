//! Seed entry types
//!
//! One declarative entry type per entity. Cross-entity references are
//! expressed by the referenced entity's natural key (a university name, a
//! program/university name pair, a user role) and are resolved to store ids
//! only when the row is inserted.

use seed_store::{
    Application, ApplicationStatus, DegreeType, FileSetting, Message, Notification,
    NotificationKind, Program, RecordId, Setting, University, UserRole,
};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_true() -> bool {
    true
}

/// University entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversitySeed {
    pub name: String,
    pub name_local: String,
    pub country: String,
    pub city: String,
    pub founded_year: u16,
    pub website: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl UniversitySeed {
    /// Build the row
    #[must_use]
    pub fn to_record(&self) -> University {
        University {
            name: self.name.clone(),
            name_local: self.name_local.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
            founded_year: self.founded_year,
            website: self.website.clone(),
            is_active: self.is_active,
        }
    }
}

/// Program entry; `university` names its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSeed {
    pub name: String,
    pub name_local: String,
    pub university: String,
    pub degree_type: DegreeType,
    pub language: String,
    pub duration_years: u8,
    pub tuition_fee: u32,
    pub quota: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ProgramSeed {
    /// Build the row once the owning university is resolved
    #[must_use]
    pub fn to_record(&self, university_id: RecordId) -> Program {
        Program {
            name: self.name.clone(),
            name_local: self.name_local.clone(),
            university_id,
            degree_type: self.degree_type,
            language: self.language.clone(),
            duration_years: self.duration_years,
            tuition_fee: self.tuition_fee,
            quota: self.quota,
            is_active: self.is_active,
        }
    }

    /// Natural reference to this program
    #[must_use]
    pub fn program_ref(&self) -> ProgramRef {
        ProgramRef::new(&self.name, &self.university)
    }
}

/// Setting entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingSeed {
    pub key: String,
    pub value: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
}

impl SettingSeed {
    /// Build the row
    #[must_use]
    pub fn to_record(&self) -> Setting {
        Setting {
            key: self.key.clone(),
            value: self.value.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            is_public: self.is_public,
        }
    }
}

/// File setting entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSettingSeed {
    pub file_type: String,
    pub category: String,
    pub max_size_mb: u32,
    pub allowed_extensions: Vec<String>,
    #[serde(default)]
    pub is_required: bool,
}

impl FileSettingSeed {
    /// Build the row
    #[must_use]
    pub fn to_record(&self) -> FileSetting {
        FileSetting {
            file_type: self.file_type.clone(),
            category: self.category.clone(),
            max_size_mb: self.max_size_mb,
            allowed_extensions: self.allowed_extensions.clone(),
            is_required: self.is_required,
        }
    }
}

/// A program named by its natural key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramRef {
    pub program: String,
    pub university: String,
}

impl ProgramRef {
    /// Create program reference
    #[inline]
    #[must_use]
    pub fn new(program: impl Into<String>, university: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            university: university.into(),
        }
    }
}

impl fmt::Display for ProgramRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.program, self.university)
    }
}

/// Application entry for the seeded student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSeed {
    pub program: String,
    pub university: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub personal_info: serde_json::Value,
    #[serde(default)]
    pub academic_info: serde_json::Value,
}

impl ApplicationSeed {
    /// Program this application targets
    #[must_use]
    pub fn program_ref(&self) -> ProgramRef {
        ProgramRef::new(&self.program, &self.university)
    }

    /// Build the row once student, university and program are resolved
    #[must_use]
    pub fn to_record(
        &self,
        student_id: RecordId,
        university_id: RecordId,
        program_id: RecordId,
    ) -> Application {
        Application {
            student_id,
            university_id,
            program_id,
            status: self.status,
            personal_info: self.personal_info.clone(),
            academic_info: self.academic_info.clone(),
        }
    }
}

/// Message entry on the seeded student's application to `program`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSeed {
    pub program: String,
    pub university: String,
    pub sender: UserRole,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
}

impl MessageSeed {
    /// Program of the application this message belongs to
    #[must_use]
    pub fn program_ref(&self) -> ProgramRef {
        ProgramRef::new(&self.program, &self.university)
    }

    /// Build the row once application and sender are resolved
    #[must_use]
    pub fn to_record(&self, application_id: RecordId, sender_id: RecordId) -> Message {
        Message {
            application_id,
            sender_id,
            sender_role: self.sender,
            content: self.content.clone(),
            is_read: self.is_read,
        }
    }
}

/// Notification entry; `recipient` selects the first account of that role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSeed {
    pub recipient: UserRole,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(default)]
    pub is_read: bool,
}

impl NotificationSeed {
    /// Build the row once the recipient is resolved
    #[must_use]
    pub fn to_record(&self, user_id: RecordId) -> Notification {
        Notification {
            user_id,
            title: self.title.clone(),
            message: self.message.clone(),
            kind: self.kind,
            is_read: self.is_read,
        }
    }
}
