//! Account roles chosen at sign-up.
//!
//! These must match the `ck_profiles_role` check constraint in
//! `20261018000002_create_profiles_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_COMPANY: &str = "company";

/// The role a profile was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Company,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Company => ROLE_COMPANY,
        }
    }

    /// Heading shown on the home view for this role.
    pub fn dashboard_title(self) -> &'static str {
        match self {
            Role::Student => "Student Dashboard",
            Role::Company => "Company Dashboard",
        }
    }

    /// One-line description shown under the dashboard heading.
    pub fn dashboard_subtitle(self) -> &'static str {
        match self {
            Role::Student => {
                "Book time slots, track appointments, and (soon) build your profile for matching."
            }
            Role::Company => {
                "Manage scheduling and (soon) create time slots and view bookings."
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_COMPANY => Ok(Role::Company),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}
