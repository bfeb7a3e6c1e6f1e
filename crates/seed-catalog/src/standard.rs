//! Built-in demo dataset

use crate::catalog::SeedCatalog;
use crate::seeds::{
    ApplicationSeed, FileSettingSeed, MessageSeed, NotificationSeed, ProgramSeed, SettingSeed,
    UniversitySeed,
};
use seed_store::{ApplicationStatus, DegreeType, NotificationKind, User, UserRole};
use serde_json::json;

/// Version tag of the built-in dataset
pub const STANDARD_VERSION: &str = "2024.1";

/// Email of the demo student account
pub const STUDENT_EMAIL: &str = "student@example.com";
/// Email of the demo admin account
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Accounts the standard dataset expects to exist before provisioning
///
/// The pipeline never creates users; hosts seed these themselves.
#[must_use]
pub fn demo_accounts() -> Vec<User> {
    vec![
        User {
            email: STUDENT_EMAIL.to_string(),
            full_name: "Demo Student".to_string(),
            role: UserRole::Student,
        },
        User {
            email: ADMIN_EMAIL.to_string(),
            full_name: "Demo Admin".to_string(),
            role: UserRole::Admin,
        },
    ]
}

impl SeedCatalog {
    /// The built-in demo dataset
    #[must_use]
    pub fn standard() -> Self {
        Self {
            version: STANDARD_VERSION.to_string(),
            universities: universities(),
            programs: programs(),
            settings: settings(),
            file_settings: file_settings(),
            applications: applications(),
            messages: messages(),
            notifications: notifications(),
        }
    }
}

fn university(
    name: &str,
    name_local: &str,
    city: &str,
    founded_year: u16,
    website: &str,
) -> UniversitySeed {
    UniversitySeed {
        name: name.to_string(),
        name_local: name_local.to_string(),
        country: "Turkey".to_string(),
        city: city.to_string(),
        founded_year,
        website: website.to_string(),
        is_active: true,
    }
}

fn universities() -> Vec<UniversitySeed> {
    vec![
        university(
            "Istanbul University",
            "İstanbul Üniversitesi",
            "Istanbul",
            1453,
            "https://www.istanbul.edu.tr",
        ),
        university(
            "Middle East Technical University",
            "Orta Doğu Teknik Üniversitesi",
            "Ankara",
            1956,
            "https://www.metu.edu.tr",
        ),
        university(
            "Bogazici University",
            "Boğaziçi Üniversitesi",
            "Istanbul",
            1863,
            "https://www.boun.edu.tr",
        ),
        university(
            "Ankara University",
            "Ankara Üniversitesi",
            "Ankara",
            1946,
            "https://www.ankara.edu.tr",
        ),
        university(
            "Hacettepe University",
            "Hacettepe Üniversitesi",
            "Ankara",
            1967,
            "https://www.hacettepe.edu.tr",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn program(
    name: &str,
    name_local: &str,
    university: &str,
    degree_type: DegreeType,
    language: &str,
    duration_years: u8,
    tuition_fee: u32,
    quota: u32,
) -> ProgramSeed {
    ProgramSeed {
        name: name.to_string(),
        name_local: name_local.to_string(),
        university: university.to_string(),
        degree_type,
        language: language.to_string(),
        duration_years,
        tuition_fee,
        quota,
        is_active: true,
    }
}

fn programs() -> Vec<ProgramSeed> {
    vec![
        program(
            "Computer Engineering",
            "Bilgisayar Mühendisliği",
            "Middle East Technical University",
            DegreeType::Bachelor,
            "English",
            4,
            4500,
            60,
        ),
        program(
            "Electrical and Electronics Engineering",
            "Elektrik-Elektronik Mühendisliği",
            "Middle East Technical University",
            DegreeType::Bachelor,
            "English",
            4,
            4500,
            50,
        ),
        program(
            "Medicine",
            "Tıp",
            "Hacettepe University",
            DegreeType::Doctorate,
            "English",
            6,
            14000,
            25,
        ),
        program(
            "Law",
            "Hukuk",
            "Istanbul University",
            DegreeType::Bachelor,
            "Turkish",
            4,
            3500,
            120,
        ),
        program(
            "Business Administration",
            "İşletme",
            "Istanbul University",
            DegreeType::Master,
            "English",
            2,
            5200,
            40,
        ),
        program(
            "Economics",
            "Ekonomi",
            "Bogazici University",
            DegreeType::Bachelor,
            "English",
            4,
            6000,
            45,
        ),
        program(
            "Molecular Biology and Genetics",
            "Moleküler Biyoloji ve Genetik",
            "Bogazici University",
            DegreeType::Master,
            "English",
            2,
            5500,
            20,
        ),
        program(
            "International Relations",
            "Uluslararası İlişkiler",
            "Ankara University",
            DegreeType::Bachelor,
            "Turkish",
            4,
            3000,
            80,
        ),
    ]
}

fn setting(key: &str, value: &str, category: &str, description: &str, is_public: bool) -> SettingSeed {
    SettingSeed {
        key: key.to_string(),
        value: value.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        is_public,
    }
}

fn settings() -> Vec<SettingSeed> {
    vec![
        setting("site_name", "Study in Turkey", "general", "Display name of the platform", true),
        setting("contact_email", "info@example.com", "general", "Public contact address", true),
        setting(
            "application_deadline",
            "2024-07-31",
            "admissions",
            "Last day to submit applications",
            true,
        ),
        setting(
            "max_applications_per_student",
            "5",
            "admissions",
            "Upper bound on open applications per student",
            false,
        ),
        setting("default_language", "en", "localization", "Fallback UI language", true),
        setting("maintenance_mode", "false", "system", "Reject logins when true", false),
    ]
}

fn file_setting(
    file_type: &str,
    category: &str,
    max_size_mb: u32,
    extensions: &[&str],
    is_required: bool,
) -> FileSettingSeed {
    FileSettingSeed {
        file_type: file_type.to_string(),
        category: category.to_string(),
        max_size_mb,
        allowed_extensions: extensions.iter().map(ToString::to_string).collect(),
        is_required,
    }
}

fn file_settings() -> Vec<FileSettingSeed> {
    vec![
        file_setting("passport", "identity", 5, &["pdf", "jpg", "png"], true),
        file_setting("photo", "identity", 2, &["jpg", "png"], true),
        file_setting("transcript", "academic", 10, &["pdf"], true),
        file_setting("diploma", "academic", 10, &["pdf"], true),
        file_setting("language_certificate", "academic", 5, &["pdf"], false),
    ]
}

fn applications() -> Vec<ApplicationSeed> {
    vec![
        ApplicationSeed {
            program: "Computer Engineering".to_string(),
            university: "Middle East Technical University".to_string(),
            status: ApplicationStatus::Submitted,
            personal_info: json!({
                "nationality": "Azerbaijan",
                "date_of_birth": "2005-03-14",
                "phone": "+994 50 000 00 00",
            }),
            academic_info: json!({
                "high_school": "Baku Lyceum No. 6",
                "graduation_year": 2023,
                "gpa": 4.6,
                "gpa_scale": 5.0,
            }),
        },
        ApplicationSeed {
            program: "Medicine".to_string(),
            university: "Hacettepe University".to_string(),
            status: ApplicationStatus::UnderReview,
            personal_info: json!({
                "nationality": "Azerbaijan",
                "date_of_birth": "2005-03-14",
            }),
            academic_info: json!({
                "high_school": "Baku Lyceum No. 6",
                "graduation_year": 2023,
                "exam": "YÖS",
                "exam_score": 88,
            }),
        },
    ]
}

fn messages() -> Vec<MessageSeed> {
    vec![
        MessageSeed {
            program: "Computer Engineering".to_string(),
            university: "Middle East Technical University".to_string(),
            sender: UserRole::Student,
            content: "Hello, do I need a notarized translation of my transcript?".to_string(),
            is_read: true,
        },
        MessageSeed {
            program: "Computer Engineering".to_string(),
            university: "Middle East Technical University".to_string(),
            sender: UserRole::Admin,
            content: "Yes, please upload a notarized Turkish or English translation.".to_string(),
            is_read: false,
        },
        MessageSeed {
            program: "Medicine".to_string(),
            university: "Hacettepe University".to_string(),
            sender: UserRole::Admin,
            content: "Your application is under review. We will contact you shortly.".to_string(),
            is_read: false,
        },
    ]
}

fn notifications() -> Vec<NotificationSeed> {
    vec![
        NotificationSeed {
            recipient: UserRole::Student,
            title: "Application submitted".to_string(),
            message: "Your application to Computer Engineering was submitted.".to_string(),
            kind: NotificationKind::Success,
            is_read: false,
        },
        NotificationSeed {
            recipient: UserRole::Student,
            title: "Missing document".to_string(),
            message: "Please upload your language certificate.".to_string(),
            kind: NotificationKind::Warning,
            is_read: false,
        },
        NotificationSeed {
            recipient: UserRole::Admin,
            title: "New application".to_string(),
            message: "A new application is waiting for review.".to_string(),
            kind: NotificationKind::Info,
            is_read: false,
        },
    ]
}
