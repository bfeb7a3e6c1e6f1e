//! Testing utilities for seedbed workspace
//!
//! Shared store doubles, a manual clock, and fixtures.

#![allow(missing_docs)]

mod clock;
mod faulty;
mod fixtures;
mod laggy;

pub use clock::ManualClock;
pub use faulty::{FaultyStore, InsertAttempt};
pub use fixtures::{demo_users, setup_pipeline, store_with_users};
pub use seed_catalog::{ADMIN_EMAIL, STUDENT_EMAIL};
pub use laggy::LaggyStore;
