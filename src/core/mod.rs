//! Core domain models and business logic for the CampusConnect portal

pub mod dashboard;
mod role;

#[cfg(feature = "ssr")]
pub mod auth;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod db;
#[cfg(feature = "ssr")]
pub mod validation;

#[cfg(all(test, feature = "ssr"))]
pub(crate) mod testing;

pub use dashboard::{CourseEnrollment, CourseSummary, DashboardView, StaffProfileView};
pub use role::Role;
