//! Database models for CampusConnect
//!
//! `UserRow` maps the `users` table one to one. The rest of the crate works
//! with `UserAccount`, which groups the student-only columns into a
//! `StudentProfile` so staff accounts cannot carry half a profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::core::Role;
use crate::core::dashboard::CourseEnrollment;

// ============================================================================
// Branch
// ============================================================================

/// Academic branch, derived from the roll number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Branch {
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "ECE")]
    Ece,
    #[serde(rename = "AIDS")]
    Aids,
    #[default]
    Unknown,
}

impl Branch {
    /// Map a 2-digit roll number branch code
    pub fn from_code(code: &str) -> Self {
        match code {
            "10" => Branch::Cse,
            "20" => Branch::Ece,
            "30" => Branch::Aids,
            _ => Branch::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Cse => "CSE",
            Branch::Ece => "ECE",
            Branch::Aids => "AIDS",
            Branch::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CSE" => Ok(Branch::Cse),
            "ECE" => Ok(Branch::Ece),
            "AIDS" => Ok(Branch::Aids),
            "Unknown" => Ok(Branch::Unknown),
            _ => Err(format!("Invalid branch: {}", s)),
        }
    }
}

// ============================================================================
// User Account
// ============================================================================

/// Student-only part of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub roll: String,
    pub section: u32,
    pub branch: Branch,
    /// Years since admission
    pub ug: String,
    pub courses: Vec<CourseEnrollment>,
}

/// A stored account of any role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    /// `None` for accounts created through an OAuth provider. Never
    /// serialized, so an account stored in a session carries no hash.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub student: Option<StudentProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Only meaningful for accounts loaded from the credential store
    pub fn is_oauth(&self) -> bool {
        self.password_hash.is_none()
    }
}

/// Account data for creation (without id and timestamps)
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub student: Option<StudentProfile>,
}

/// Account without secrets (for API responses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub is_oauth: bool,
    pub phone: Option<String>,
    pub roll: Option<String>,
    pub section: Option<u32>,
    pub branch: Option<Branch>,
    pub ug: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&UserAccount> for AccountResponse {
    fn from(account: &UserAccount) -> Self {
        let student = account.student.as_ref();
        Self {
            id: account.id,
            role: account.role,
            name: account.name.clone(),
            email: account.email.clone(),
            is_oauth: account.is_oauth(),
            phone: account.phone.clone(),
            roll: student.map(|s| s.roll.clone()),
            section: student.map(|s| s.section),
            branch: student.map(|s| s.branch),
            ug: student.map(|s| s.ug.clone()),
            created_at: account.created_at,
        }
    }
}

// ============================================================================
// Row mapping
// ============================================================================

/// Raw `users` row
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_oauth: bool,
    pub phone: Option<String>,
    pub roll: Option<String>,
    pub section: Option<i32>,
    pub branch: Option<String>,
    pub ug: Option<String>,
    pub courses: Json<Vec<CourseEnrollment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row that breaks the account invariants
#[derive(Debug, Clone, PartialEq)]
pub struct CorruptRow {
    pub id: Uuid,
    pub reason: &'static str,
}

impl std::fmt::Display for CorruptRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user {} is corrupt: {}", self.id, self.reason)
    }
}

impl TryFrom<UserRow> for UserAccount {
    type Error = CorruptRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt = |reason| CorruptRow { id: row.id, reason };

        if row.is_oauth != row.password_hash.is_none() {
            return Err(corrupt("is_oauth disagrees with password_hash"));
        }

        let student = match (row.role, row.roll) {
            (Role::Student, Some(roll)) => {
                let section = row
                    .section
                    .and_then(|s| u32::try_from(s).ok())
                    .filter(|s| *s > 0)
                    .ok_or_else(|| corrupt("student without a positive section"))?;
                Some(StudentProfile {
                    roll,
                    section,
                    branch: row
                        .branch
                        .as_deref()
                        .and_then(|b| b.parse().ok())
                        .unwrap_or_default(),
                    ug: row.ug.unwrap_or_default(),
                    courses: row.courses.0,
                })
            }
            (Role::Student, None) => return Err(corrupt("student without a roll number")),
            (_, _) => None,
        };

        Ok(UserAccount {
            id: row.id,
            role: row.role,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            student,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn student_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            role: Role::Student,
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: Some("$2b$10$hash".to_string()),
            is_oauth: false,
            phone: Some("9876543210".to_string()),
            roll: Some("S202310045".to_string()),
            section: Some(3),
            branch: Some("CSE".to_string()),
            ug: Some("3".to_string()),
            courses: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_branch_from_code() {
        assert_eq!(Branch::from_code("10"), Branch::Cse);
        assert_eq!(Branch::from_code("20"), Branch::Ece);
        assert_eq!(Branch::from_code("30"), Branch::Aids);
        assert_eq!(Branch::from_code("40"), Branch::Unknown);
        assert_eq!(Branch::Aids.to_string(), "AIDS");
        assert_eq!("ECE".parse::<Branch>().unwrap(), Branch::Ece);
    }

    #[test]
    fn test_student_row_to_account() {
        let account = UserAccount::try_from(student_row()).unwrap();
        let profile = account.student.as_ref().unwrap();

        assert!(!account.is_oauth());
        assert_eq!(profile.roll, "S202310045");
        assert_eq!(profile.section, 3);
        assert_eq!(profile.branch, Branch::Cse);
        assert!(profile.courses.is_empty());
    }

    #[test]
    fn test_staff_row_has_no_profile() {
        let row = UserRow {
            role: Role::Admin,
            roll: None,
            section: None,
            branch: None,
            ug: None,
            ..student_row()
        };
        let account = UserAccount::try_from(row).unwrap();
        assert!(account.student.is_none());
    }

    #[test]
    fn test_rejects_inconsistent_oauth_flag() {
        let row = UserRow {
            is_oauth: true,
            ..student_row()
        };
        assert!(UserAccount::try_from(row).is_err());
    }

    #[test]
    fn test_rejects_student_without_roll() {
        let row = UserRow {
            roll: None,
            ..student_row()
        };
        let err = UserAccount::try_from(row).unwrap_err();
        assert_eq!(err.reason, "student without a roll number");
    }

    #[test]
    fn test_account_response_hides_hash() {
        let account = UserAccount::try_from(student_row()).unwrap();
        let response = AccountResponse::from(&account);
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("hash"));
        assert_eq!(response.roll.as_deref(), Some("S202310045"));
        assert!(!response.is_oauth);
    }
}
