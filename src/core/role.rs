//! Portal roles
//!
//! Every account belongs to exactly one role. The role decides which signup
//! rules apply, which dashboard a session lands on, and which pages it may see.

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ssr", derive(sqlx::Type))]
#[cfg_attr(feature = "ssr", sqlx(type_name = "VARCHAR", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
    Professor,
}

impl Role {
    /// Stored and serialized name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::Professor => "professor",
        }
    }

    /// Human-readable label for page titles
    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Admin => "Admin",
            Role::Professor => "Professor",
        }
    }

    /// Where an authenticated session of this role is sent
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Student => "/dashboard",
            Role::Admin => "/admin/dashboard",
            Role::Professor => "/professor/dashboard",
        }
    }

    /// Page hosting the login form for this role
    pub fn login_path(&self) -> &'static str {
        match self {
            Role::Student => "/login",
            Role::Admin => "/admin/login",
            Role::Professor => "/professor/login",
        }
    }

    /// Form action for the login endpoint of this role
    pub fn login_endpoint(&self) -> &'static str {
        match self {
            Role::Student => "/auth/login",
            Role::Admin => "/auth/admin/login",
            Role::Professor => "/auth/professor/login",
        }
    }

    /// Form action for the signup endpoint of this role
    pub fn signup_endpoint(&self) -> &'static str {
        match self {
            Role::Student => "/auth/signup",
            Role::Admin => "/auth/admin/signup",
            Role::Professor => "/auth/professor/signup",
        }
    }

    /// Staff roles sign up in one step and never go through registration
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Student)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            "professor" => Ok(Role::Professor),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}
