//! Role name enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the dashboard.
///
/// `chapter_*` roles are scoped to a single chapter; `super_admin` and the
/// `community_*` roles are global and carry no chapter id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role_name", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    /// Full system administrator across every chapter.
    SuperAdmin,
    /// Administers one chapter: membership, roles, moderation.
    ChapterAdmin,
    /// Moderates content within one chapter.
    ChapterModerator,
    /// External partner attached to one chapter.
    ChapterPartner,
    /// Paid staff of one chapter.
    ChapterStaff,
    /// Affiliate member of one chapter.
    ChapterAffiliate,
    /// Administers community-wide (cross-chapter) spaces.
    CommunityAdmin,
    /// Moderates community-wide spaces.
    CommunityModerator,
    /// Community-wide partner.
    CommunityPartner,
}

impl RoleName {
    /// Whether this role is global, i.e. carries no chapter id.
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            Self::SuperAdmin
                | Self::CommunityAdmin
                | Self::CommunityModerator
                | Self::CommunityPartner
        )
    }

    /// Whether this role must be scoped to a chapter.
    pub fn is_chapter_scoped(&self) -> bool {
        !self.is_global()
    }

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::ChapterAdmin => "chapter_admin",
            Self::ChapterModerator => "chapter_moderator",
            Self::ChapterPartner => "chapter_partner",
            Self::ChapterStaff => "chapter_staff",
            Self::ChapterAffiliate => "chapter_affiliate",
            Self::CommunityAdmin => "community_admin",
            Self::CommunityModerator => "community_moderator",
            Self::CommunityPartner => "community_partner",
        }
    }

    /// All known roles, for iteration in the policy table.
    pub fn all() -> [RoleName; 9] {
        [
            Self::SuperAdmin,
            Self::ChapterAdmin,
            Self::ChapterModerator,
            Self::ChapterPartner,
            Self::ChapterStaff,
            Self::ChapterAffiliate,
            Self::CommunityAdmin,
            Self::CommunityModerator,
            Self::CommunityPartner,
        ]
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = wikidash_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "super_admin" => Ok(Self::SuperAdmin),
            "chapter_admin" => Ok(Self::ChapterAdmin),
            "chapter_moderator" => Ok(Self::ChapterModerator),
            "chapter_partner" => Ok(Self::ChapterPartner),
            "chapter_staff" => Ok(Self::ChapterStaff),
            "chapter_affiliate" => Ok(Self::ChapterAffiliate),
            "community_admin" => Ok(Self::CommunityAdmin),
            "community_moderator" => Ok(Self::CommunityModerator),
            "community_partner" => Ok(Self::CommunityPartner),
            _ => Err(wikidash_core::AppError::validation(format!(
                "Invalid role name: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_split() {
        assert!(RoleName::SuperAdmin.is_global());
        assert!(RoleName::CommunityModerator.is_global());
        assert!(RoleName::ChapterAdmin.is_chapter_scoped());
        assert!(RoleName::ChapterAffiliate.is_chapter_scoped());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "chapter_admin".parse::<RoleName>().unwrap(),
            RoleName::ChapterAdmin
        );
        assert_eq!(
            "SUPER_ADMIN".parse::<RoleName>().unwrap(),
            RoleName::SuperAdmin
        );
        assert!("sysop".parse::<RoleName>().is_err());
    }

    #[test]
    fn test_round_trip_all() {
        for role in RoleName::all() {
            assert_eq!(role.as_str().parse::<RoleName>().unwrap(), role);
        }
    }
}
