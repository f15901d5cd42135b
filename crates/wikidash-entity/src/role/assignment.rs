//! Role assignment entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::name::RoleName;

/// A (user, role, chapter) binding.
///
/// The triple is unique; a user may hold many assignments across chapters.
/// `chapter_id` is `None` for global roles.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleAssignment {
    /// The user holding the role.
    pub user_id: Uuid,
    /// The role held.
    pub role: RoleName,
    /// The chapter the role is scoped to, if any.
    pub chapter_id: Option<i64>,
    /// Who granted the assignment.
    pub assigned_by: Uuid,
    /// When the assignment was granted.
    pub assigned_at: DateTime<Utc>,
}

impl RoleAssignment {
    /// The (role, chapter) binding without grant metadata.
    pub fn binding(&self) -> RoleBinding {
        RoleBinding {
            role: self.role,
            chapter_id: self.chapter_id,
        }
    }
}

/// A (role, chapter) pair — the shape embedded in token claims and returned
/// by the role manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleBinding {
    /// The role held.
    pub role: RoleName,
    /// The chapter the role is scoped to, if any.
    pub chapter_id: Option<i64>,
}

impl RoleBinding {
    /// Creates a new binding.
    pub fn new(role: RoleName, chapter_id: Option<i64>) -> Self {
        Self { role, chapter_id }
    }

    /// Whether the binding applies to the given chapter scope.
    ///
    /// A global binding applies everywhere; a chapter-scoped binding applies
    /// only to its own chapter.
    pub fn applies_to(&self, chapter_id: Option<i64>) -> bool {
        match self.chapter_id {
            None => true,
            Some(own) => chapter_id == Some(own),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_binding_applies_everywhere() {
        let binding = RoleBinding::new(RoleName::SuperAdmin, None);
        assert!(binding.applies_to(None));
        assert!(binding.applies_to(Some(5)));
    }

    #[test]
    fn test_scoped_binding_is_isolated() {
        let binding = RoleBinding::new(RoleName::ChapterAdmin, Some(5));
        assert!(binding.applies_to(Some(5)));
        assert!(!binding.applies_to(Some(6)));
        assert!(!binding.applies_to(None));
    }
}
