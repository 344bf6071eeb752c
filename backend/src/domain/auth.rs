//! Caller identity and role-based access rules.
//!
//! A [`Principal`] is the trusted (id, email, role) triple published for each
//! authenticated request. Inbound adapters build it from a verified bearer
//! credential; services receive it as an explicit argument.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Error;

/// Role carried by every credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Enrolled student; may check in and read their own records.
    Student,
    /// Teaching staff; may create sessions and read rosters.
    Lecturer,
    /// Administrator; may read institution-wide analytics and delete events.
    Admin,
}

impl Role {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Lecturer => "lecturer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "lecturer" => Ok(Self::Lecturer),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: i64,
    email: String,
    role: Role,
}

impl Principal {
    /// Construct a principal from verified claims.
    pub fn new(id: i64, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    /// Principal identifier within its role's table.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Email claim.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Role claim.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Require an exact role, returning `403 Forbidden` on mismatch.
    ///
    /// # Examples
    /// ```
    /// use attendance::domain::{Principal, Role};
    ///
    /// let lecturer = Principal::new(7, "l@uni.edu", Role::Lecturer);
    /// assert!(lecturer.require_role(Role::Lecturer).is_ok());
    /// assert!(lecturer.require_role(Role::Student).is_err());
    /// ```
    pub fn require_role(&self, role: Role) -> Result<(), Error> {
        self.require_any_role(&[role])
    }

    /// Require one of the listed roles.
    pub fn require_any_role(&self, roles: &[Role]) -> Result<(), Error> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            let allowed = roles
                .iter()
                .map(|role| role.as_str())
                .collect::<Vec<_>>()
                .join(" or ");
            Err(Error::forbidden(format!(
                "this action requires the {allowed} role"
            )))
        }
    }

    /// Students may only view their own resources; staff may view any.
    pub fn ensure_can_view_student(&self, student_id: i64) -> Result<(), Error> {
        match self.role {
            Role::Lecturer | Role::Admin => Ok(()),
            Role::Student if self.id == student_id => Ok(()),
            Role::Student => Err(Error::forbidden(
                "students may only view their own records",
            )),
        }
    }
}
