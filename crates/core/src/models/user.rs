//! User model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Record;

/// Backend user role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Nurse,
}

impl UserRole {
    /// Parse the backend role string. Unknown roles get the least privileged role.
    pub fn parse(s: &str) -> Self {
        match s {
            "Admin" => UserRole::Admin,
            "Manager" => UserRole::Manager,
            _ => UserRole::Nurse,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Manager => "Manager",
            UserRole::Nurse => "Nurse",
        }
    }

    /// Human-readable role label
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Manager => "Manager",
            UserRole::Nurse => "Nurse",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Location a non-admin account is bound to
    #[serde(default)]
    pub headquarter_id: Option<i64>,
}

impl CurrentUser {
    /// Build the current user from a login response.
    ///
    /// The response may nest the user under `user` or be flat; the id may
    /// come as `id` or `userId`, as a number or a string.
    pub fn from_login_response(body: &Value, submitted_email: &str) -> Self {
        let root = Record::new(body);
        let user = root.record(&["user"]).unwrap_or(root);

        let id = user
            .integer(&["id"])
            .or_else(|| root.integer(&["userId", "id"]))
            .unwrap_or(0);

        Self {
            id,
            name: user.string(&["name"]).unwrap_or_else(|| "User".to_string()),
            email: user
                .string(&["email"])
                .unwrap_or_else(|| submitted_email.to_string()),
            role: user
                .string(&["role"])
                .map(|r| UserRole::parse(&r))
                .unwrap_or_default(),
            headquarter_id: user
                .integer(&["headquarterId", "headquarter_id"])
                .or_else(|| root.integer(&["headquarterId", "headquarter_id"])),
        }
    }

    /// Location this user must be scoped to, if any.
    ///
    /// Admins are never pinned.
    pub fn pinned_headquarter(&self) -> Option<i64> {
        if self.role.is_admin() {
            None
        } else {
            self.headquarter_id
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.role.display_name())
    }

    /// Employee records are visible to managers and administrators
    pub fn can_view_employees(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Manager)
    }
}
