//! Dashboard view models
//!
//! Course enrollment records live on the student account; the dashboard
//! derives attendance percentages from them. Everything here is shared by
//! the server and the hydrated client.

use serde::{Deserialize, Serialize};

use crate::core::Role;

/// One course a student is enrolled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEnrollment {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub classes_held: u32,
    #[serde(default)]
    pub classes_attended: u32,
    #[serde(default)]
    pub grade: Option<String>,
}

impl CourseEnrollment {
    /// Attendance as a whole percentage, `None` until a class has been held
    pub fn attendance_percentage(&self) -> Option<u32> {
        attendance_percentage(self.classes_attended.into(), self.classes_held.into())
    }
}

/// `round(attended / held * 100)`
pub fn attendance_percentage(attended: u64, held: u64) -> Option<u32> {
    if held == 0 {
        return None;
    }
    Some((attended as f64 / held as f64 * 100.0).round() as u32)
}

/// Text shown for a percentage cell
pub fn format_attendance(percentage: Option<u32>) -> String {
    match percentage {
        Some(p) => format!("{}%", p),
        None => "N/A".to_string(),
    }
}

/// Per-course row on the student dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub code: String,
    pub name: String,
    pub classes_held: u32,
    pub classes_attended: u32,
    pub attendance: Option<u32>,
    pub grade: Option<String>,
}

impl From<&CourseEnrollment> for CourseSummary {
    fn from(course: &CourseEnrollment) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            classes_held: course.classes_held,
            classes_attended: course.classes_attended,
            attendance: course.attendance_percentage(),
            grade: course.grade.clone(),
        }
    }
}

/// Everything the student dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub name: String,
    pub email: String,
    pub roll: String,
    pub section: u32,
    pub phone: Option<String>,
    pub branch: String,
    pub ug: String,
    pub courses: Vec<CourseSummary>,
    /// Attendance over all courses combined
    pub overall_attendance: Option<u32>,
}

impl DashboardView {
    /// Build the view from the course list and profile fields
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        roll: impl Into<String>,
        section: u32,
        phone: Option<String>,
        branch: impl Into<String>,
        ug: impl Into<String>,
        courses: &[CourseEnrollment],
    ) -> Self {
        // Pooled in u64 so many large per-course counters cannot overflow
        let held: u64 = courses.iter().map(|c| u64::from(c.classes_held)).sum();
        let attended: u64 = courses.iter().map(|c| u64::from(c.classes_attended)).sum();

        Self {
            name: name.into(),
            email: email.into(),
            roll: roll.into(),
            section,
            phone,
            branch: branch.into(),
            ug: ug.into(),
            courses: courses.iter().map(CourseSummary::from).collect(),
            overall_attendance: attendance_percentage(attended, held),
        }
    }
}

#[cfg(feature = "ssr")]
impl DashboardView {
    /// Dashboard for a student account; `None` for staff accounts
    pub fn for_account(account: &crate::core::db::models::UserAccount) -> Option<Self> {
        let profile = account.student.as_ref()?;
        Some(Self::new(
            account.name.clone(),
            account.email.clone(),
            profile.roll.clone(),
            profile.section,
            account.phone.clone(),
            profile.branch.to_string(),
            profile.ug.clone(),
            &profile.courses,
        ))
    }
}

/// Profile card shown on admin and professor dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffProfileView {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}
