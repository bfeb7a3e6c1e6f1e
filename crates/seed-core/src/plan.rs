//! Stage planning
//!
//! Turns the catalog entries of one stage into units of work. Catalog
//! entries name their parents by natural key; planning resolves those names
//! to store ids against rows read from the store. An entry whose parent
//! cannot be resolved becomes a precondition skip instead of a unit.
//!
//! Planning is pure: all reads happen beforehand and are handed over as a
//! [`Resolver`].

use crate::outcome::SkipReason;
use crate::stage::Stage;
use seed_catalog::{ProgramRef, SeedCatalog};
use seed_store::{
    EntityType, Message, Notification, Record, RecordId, StoredRecord, UserRole,
};
use std::collections::{HashMap, HashSet};

/// One unit of a stage, before dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedUnit {
    /// Attempt to create one record
    Upsert { label: String, record: Record },
    /// Resolved without touching the store
    Skip { label: String, reason: SkipReason },
}

impl PlannedUnit {
    /// Unit label used in logs and error lists
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            PlannedUnit::Upsert { label, .. } | PlannedUnit::Skip { label, .. } => label,
        }
    }

    fn upsert(label: impl Into<String>, record: Record) -> Self {
        Self::Upsert {
            label: label.into(),
            record,
        }
    }

    fn already_seeded(label: impl Into<String>) -> Self {
        Self::Skip {
            label: label.into(),
            reason: SkipReason::AlreadySeeded,
        }
    }

    fn unmet(label: impl Into<String>, why: impl Into<String>) -> Self {
        Self::Skip {
            label: label.into(),
            reason: SkipReason::PreconditionUnmet(why.into()),
        }
    }
}

/// Natural-key lookup over rows already in the store
#[derive(Debug, Default)]
pub struct Resolver {
    universities: HashMap<String, RecordId>,
    programs: HashMap<(String, RecordId), RecordId>,
    applications: HashMap<(RecordId, RecordId), RecordId>,
    users: HashMap<UserRole, (String, RecordId)>,
    messages: HashSet<(RecordId, RecordId, String)>,
    notifications: HashSet<(RecordId, String)>,
}

impl Resolver {
    /// Create empty resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index rows of any entity type
    pub fn absorb(&mut self, rows: &[StoredRecord]) {
        for row in rows {
            match &row.record {
                Record::University(u) => {
                    self.universities.insert(u.name.clone(), row.id);
                }
                Record::Program(p) => {
                    self.programs.insert((p.name.clone(), p.university_id), row.id);
                }
                Record::Application(a) => {
                    self.applications.insert((a.student_id, a.program_id), row.id);
                }
                Record::User(u) => {
                    // first account of a role by email
                    let replace = match self.users.get(&u.role) {
                        Some((email, _)) => u.email < *email,
                        None => true,
                    };
                    if replace {
                        self.users.insert(u.role, (u.email.clone(), row.id));
                    }
                }
                Record::Message(m) => {
                    self.messages
                        .insert((m.application_id, m.sender_id, m.content.clone()));
                }
                Record::Notification(n) => {
                    self.notifications.insert((n.user_id, n.title.clone()));
                }
                Record::Setting(_) | Record::FileSetting(_) => {}
            }
        }
    }

    /// University id by name
    #[must_use]
    pub fn university(&self, name: &str) -> Option<RecordId> {
        self.universities.get(name).copied()
    }

    /// University and program ids of a program reference
    #[must_use]
    pub fn program(&self, program: &ProgramRef) -> Option<(RecordId, RecordId)> {
        let university_id = self.university(&program.university)?;
        let program_id = self
            .programs
            .get(&(program.program.clone(), university_id))
            .copied()?;
        Some((university_id, program_id))
    }

    /// Application of a student to a program
    #[must_use]
    pub fn application(&self, student_id: RecordId, program_id: RecordId) -> Option<RecordId> {
        self.applications.get(&(student_id, program_id)).copied()
    }

    /// Account with the lowest email among accounts of `role`
    #[must_use]
    pub fn user(&self, role: UserRole) -> Option<RecordId> {
        self.users.get(&role).map(|(_, id)| *id)
    }

    /// Check if an equal message already sits on the application
    #[must_use]
    pub fn has_message(&self, message: &Message) -> bool {
        self.messages.contains(&(
            message.application_id,
            message.sender_id,
            message.content.clone(),
        ))
    }

    /// Check if the user already holds a notification with this title
    #[must_use]
    pub fn has_notification(&self, notification: &Notification) -> bool {
        self.notifications
            .contains(&(notification.user_id, notification.title.clone()))
    }
}

/// Builds the units of each stage from the catalog
#[derive(Debug)]
pub struct StagePlanner<'a> {
    catalog: &'a SeedCatalog,
    resolver: &'a Resolver,
}

impl<'a> StagePlanner<'a> {
    /// Create planner over a catalog and resolved store rows
    #[must_use]
    pub fn new(catalog: &'a SeedCatalog, resolver: &'a Resolver) -> Self {
        Self { catalog, resolver }
    }

    /// Tables a stage reads while planning
    #[must_use]
    pub fn reads(stage: Stage) -> &'static [EntityType] {
        match stage {
            Stage::Universities | Stage::Settings | Stage::FileSettings => &[],
            Stage::Programs => &[EntityType::University],
            Stage::Applications => &[
                EntityType::University,
                EntityType::Program,
                EntityType::User,
            ],
            Stage::Messages => &[
                EntityType::University,
                EntityType::Program,
                EntityType::Application,
                EntityType::User,
                EntityType::Message,
            ],
            Stage::Notifications => &[EntityType::User, EntityType::Notification],
        }
    }

    /// Units of one stage, in catalog order
    #[must_use]
    pub fn plan(&self, stage: Stage) -> Vec<PlannedUnit> {
        match stage {
            Stage::Universities => self.universities(),
            Stage::Settings => self.settings(),
            Stage::FileSettings => self.file_settings(),
            Stage::Programs => self.programs(),
            Stage::Applications => self.applications(),
            Stage::Messages => self.messages(),
            Stage::Notifications => self.notifications(),
        }
    }

    fn universities(&self) -> Vec<PlannedUnit> {
        self.catalog
            .universities
            .iter()
            .map(|seed| PlannedUnit::upsert(&seed.name, Record::University(seed.to_record())))
            .collect()
    }

    fn settings(&self) -> Vec<PlannedUnit> {
        self.catalog
            .settings
            .iter()
            .map(|seed| PlannedUnit::upsert(&seed.key, Record::Setting(seed.to_record())))
            .collect()
    }

    fn file_settings(&self) -> Vec<PlannedUnit> {
        self.catalog
            .file_settings
            .iter()
            .map(|seed| {
                PlannedUnit::upsert(&seed.file_type, Record::FileSetting(seed.to_record()))
            })
            .collect()
    }

    fn programs(&self) -> Vec<PlannedUnit> {
        self.catalog
            .programs
            .iter()
            .map(|seed| {
                let label = seed.program_ref().to_string();
                match self.resolver.university(&seed.university) {
                    Some(university_id) => {
                        PlannedUnit::upsert(label, Record::Program(seed.to_record(university_id)))
                    }
                    None => PlannedUnit::unmet(
                        label,
                        format!("university '{}' not found", seed.university),
                    ),
                }
            })
            .collect()
    }

    fn applications(&self) -> Vec<PlannedUnit> {
        let student = self.resolver.user(UserRole::Student);

        self.catalog
            .applications
            .iter()
            .map(|seed| {
                let program = seed.program_ref();
                let label = program.to_string();
                let Some(student_id) = student else {
                    return PlannedUnit::unmet(label, "no student account");
                };
                match self.resolver.program(&program) {
                    Some((university_id, program_id)) => PlannedUnit::upsert(
                        label,
                        Record::Application(seed.to_record(student_id, university_id, program_id)),
                    ),
                    None => PlannedUnit::unmet(label, format!("program '{program}' not found")),
                }
            })
            .collect()
    }

    fn messages(&self) -> Vec<PlannedUnit> {
        let student = self.resolver.user(UserRole::Student);

        self.catalog
            .messages
            .iter()
            .enumerate()
            .map(|(idx, seed)| {
                let program = seed.program_ref();
                let label = format!("{program} #{idx}");
                let Some(student_id) = student else {
                    return PlannedUnit::unmet(label, "no student account");
                };
                let Some((_, program_id)) = self.resolver.program(&program) else {
                    return PlannedUnit::unmet(label, format!("program '{program}' not found"));
                };
                let Some(application_id) = self.resolver.application(student_id, program_id)
                else {
                    return PlannedUnit::unmet(
                        label,
                        format!("application for '{program}' not found"),
                    );
                };
                let Some(sender_id) = self.resolver.user(seed.sender) else {
                    return PlannedUnit::unmet(label, format!("no {} account", seed.sender));
                };
                let message = seed.to_record(application_id, sender_id);
                if self.resolver.has_message(&message) {
                    return PlannedUnit::already_seeded(label);
                }
                PlannedUnit::upsert(label, Record::Message(message))
            })
            .collect()
    }

    fn notifications(&self) -> Vec<PlannedUnit> {
        self.catalog
            .notifications
            .iter()
            .map(|seed| {
                let label = format!("{}: {}", seed.recipient, seed.title);
                let Some(user_id) = self.resolver.user(seed.recipient) else {
                    return PlannedUnit::unmet(label, format!("no {} account", seed.recipient));
                };
                let notification = seed.to_record(user_id);
                if self.resolver.has_notification(&notification) {
                    return PlannedUnit::already_seeded(label);
                }
                PlannedUnit::upsert(label, Record::Notification(notification))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_store::{NotificationKind, University, User};

    fn stored(record: Record) -> StoredRecord {
        StoredRecord {
            id: RecordId::new(),
            created_at: std::time::SystemTime::now().into(),
            record,
        }
    }

    fn university(name: &str) -> StoredRecord {
        stored(Record::University(University {
            name: name.to_string(),
            name_local: name.to_string(),
            country: "Turkey".to_string(),
            city: "Ankara".to_string(),
            founded_year: 1956,
            website: "https://example.edu".to_string(),
            is_active: true,
        }))
    }

    fn user(email: &str, role: UserRole) -> StoredRecord {
        stored(Record::User(User {
            email: email.to_string(),
            full_name: email.to_string(),
            role,
        }))
    }

    fn unmet_count(units: &[PlannedUnit]) -> usize {
        units
            .iter()
            .filter(|u| {
                matches!(
                    u,
                    PlannedUnit::Skip {
                        reason: SkipReason::PreconditionUnmet(_),
                        ..
                    }
                )
            })
            .count()
    }

    #[test]
    fn independent_stages_plan_every_entry() {
        let catalog = SeedCatalog::standard();
        let resolver = Resolver::new();
        let planner = StagePlanner::new(&catalog, &resolver);

        assert_eq!(planner.plan(Stage::Universities).len(), 5);
        assert_eq!(planner.plan(Stage::Settings).len(), 6);
        assert_eq!(planner.plan(Stage::FileSettings).len(), 5);
        assert_eq!(unmet_count(&planner.plan(Stage::Universities)), 0);
    }

    #[test]
    fn programs_without_university_are_unmet() {
        let catalog = SeedCatalog::standard();
        let mut resolver = Resolver::new();
        resolver.absorb(&[university("Hacettepe University")]);
        let planner = StagePlanner::new(&catalog, &resolver);

        let units = planner.plan(Stage::Programs);
        assert_eq!(units.len(), 8);
        // only Medicine belongs to Hacettepe
        assert_eq!(unmet_count(&units), 7);
        let medicine = units
            .iter()
            .find(|u| u.label() == "Medicine @ Hacettepe University")
            .unwrap();
        assert!(matches!(medicine, PlannedUnit::Upsert { .. }));
    }

    #[test]
    fn applications_need_a_student() {
        let catalog = SeedCatalog::standard();
        let resolver = Resolver::new();
        let planner = StagePlanner::new(&catalog, &resolver);

        let units = planner.plan(Stage::Applications);
        assert_eq!(unmet_count(&units), units.len());
        assert!(units.iter().all(|u| matches!(
            u,
            PlannedUnit::Skip { reason: SkipReason::PreconditionUnmet(why), .. } if why == "no student account"
        )));
    }

    #[test]
    fn lowest_email_wins_per_role() {
        let b = user("b@example.com", UserRole::Student);
        let a = user("a@example.com", UserRole::Student);
        let admin = user("admin@example.com", UserRole::Admin);
        let a_id = a.id;

        let mut resolver = Resolver::new();
        resolver.absorb(&[b, a, admin]);
        assert_eq!(resolver.user(UserRole::Student), Some(a_id));
        assert!(resolver.user(UserRole::Admin).is_some());
    }

    #[test]
    fn only_matching_notifications_are_already_seeded() {
        let catalog = SeedCatalog::standard();
        let student = user("student@example.com", UserRole::Student);
        let admin = user("admin@example.com", UserRole::Admin);
        let submitted = stored(Record::Notification(Notification {
            user_id: student.id,
            title: "Application submitted".to_string(),
            message: "Edited after seeding".to_string(),
            kind: NotificationKind::Success,
            is_read: true,
        }));
        // unrelated row on the same recipient
        let unrelated = stored(Record::Notification(Notification {
            user_id: student.id,
            title: "Welcome".to_string(),
            message: "Hello".to_string(),
            kind: NotificationKind::Info,
            is_read: true,
        }));

        let mut resolver = Resolver::new();
        resolver.absorb(&[student, admin, submitted, unrelated]);
        let planner = StagePlanner::new(&catalog, &resolver);

        let units = planner.plan(Stage::Notifications);
        let seeded = units
            .iter()
            .filter(|u| matches!(u, PlannedUnit::Skip { reason: SkipReason::AlreadySeeded, .. }))
            .count();
        let inserts = units
            .iter()
            .filter(|u| matches!(u, PlannedUnit::Upsert { .. }))
            .count();
        assert_eq!(seeded, 1);
        assert_eq!(inserts, 2);
    }

    #[test]
    fn messages_follow_their_application() {
        let catalog = SeedCatalog::standard();
        let metu = university("Middle East Technical University");
        let student = user("student@example.com", UserRole::Student);
        let admin = user("admin@example.com", UserRole::Admin);
        let program = stored(Record::Program(seed_store::Program {
            name: "Computer Engineering".to_string(),
            name_local: "Bilgisayar Mühendisliği".to_string(),
            university_id: metu.id,
            degree_type: seed_store::DegreeType::Bachelor,
            language: "English".to_string(),
            duration_years: 4,
            tuition_fee: 1000,
            quota: 10,
            is_active: true,
        }));
        let application = stored(Record::Application(seed_store::Application {
            student_id: student.id,
            university_id: metu.id,
            program_id: program.id,
            status: seed_store::ApplicationStatus::Submitted,
            personal_info: serde_json::Value::Null,
            academic_info: serde_json::Value::Null,
        }));
        let application_id = application.id;

        let mut resolver = Resolver::new();
        resolver.absorb(&[metu, student, admin, program, application]);
        let planner = StagePlanner::new(&catalog, &resolver);
        let units = planner.plan(Stage::Messages);

        // two messages on the METU application, one on an unseeded one
        let inserts: Vec<_> = units
            .iter()
            .filter_map(|u| match u {
                PlannedUnit::Upsert {
                    record: Record::Message(Message { application_id, .. }),
                    ..
                } => Some(*application_id),
                _ => None,
            })
            .collect();
        assert_eq!(inserts, vec![application_id, application_id]);
        assert_eq!(unmet_count(&units), 1);
    }
}
