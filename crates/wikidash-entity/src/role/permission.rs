//! Permission enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dashboard permission, granted through role assignments.
///
/// The role → permission mapping is static configuration owned by the role
/// manager; permissions are never stored per-user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Administer the service itself (held only by super_admin).
    ManageSystem,
    /// Edit chapter settings and profile.
    ManageChapter,
    /// Manage chapter membership.
    ManageUsers,
    /// Grant and revoke role assignments.
    ManageRoles,
    /// Hide, approve, or remove submitted content.
    ModerateContent,
    /// Create and edit dashboard content.
    EditContent,
    /// View chapter reports and statistics exports.
    ViewReports,
    /// View the authenticated dashboard at all.
    ViewDashboard,
}

impl Permission {
    /// Return the permission as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageSystem => "manage_system",
            Self::ManageChapter => "manage_chapter",
            Self::ManageUsers => "manage_users",
            Self::ManageRoles => "manage_roles",
            Self::ModerateContent => "moderate_content",
            Self::EditContent => "edit_content",
            Self::ViewReports => "view_reports",
            Self::ViewDashboard => "view_dashboard",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = wikidash_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manage_system" => Ok(Self::ManageSystem),
            "manage_chapter" => Ok(Self::ManageChapter),
            "manage_users" => Ok(Self::ManageUsers),
            "manage_roles" => Ok(Self::ManageRoles),
            "moderate_content" => Ok(Self::ModerateContent),
            "edit_content" => Ok(Self::EditContent),
            "view_reports" => Ok(Self::ViewReports),
            "view_dashboard" => Ok(Self::ViewDashboard),
            _ => Err(wikidash_core::AppError::validation(format!(
                "Invalid permission: '{s}'"
            ))),
        }
    }
}
