use serde::{Deserialize, Serialize};

/// Valid role values matching the DB CHECK constraint.
pub const USER_ROLES: &[&str] = &["POLICE", "FORENSIC", "JUDGE", "ADMIN"];

/// Actor role in the evidence workflow. Permissions are disjoint:
/// each lifecycle action is owned by exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Police,
    Forensic,
    Judge,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Police => "POLICE",
            UserRole::Forensic => "FORENSIC",
            UserRole::Judge => "JUDGE",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "POLICE" => Some(UserRole::Police),
            "FORENSIC" => Some(UserRole::Forensic),
            "JUDGE" => Some(UserRole::Judge),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Prefix for the role-scoped public identifier issued at registration
    /// (e.g. `POL-1718822400000-4821`).
    pub fn badge_prefix(&self) -> &'static str {
        match self {
            UserRole::Police => "POL",
            UserRole::Forensic => "FOR",
            UserRole::Judge => "JUD",
            UserRole::Admin => "ADM",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_valid_user_role(s: &str) -> bool {
    USER_ROLES.contains(&s)
}
