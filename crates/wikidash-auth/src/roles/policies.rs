//! Role-to-permission mapping definitions.
//!
//! Static configuration built once at startup and immutable thereafter.
//! Permissions are never stored per-user.

use std::collections::{HashMap, HashSet};

use wikidash_entity::role::{Permission, RoleName};

/// Defines the mapping from each role to its set of permissions.
#[derive(Debug, Clone)]
pub struct RolePolicies {
    /// Role → set of permissions. `super_admin` is handled implicitly.
    policies: HashMap<RoleName, HashSet<Permission>>,
}

impl RolePolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        // chapter_admin: runs one chapter end to end.
        let mut chapter_admin = HashSet::new();
        chapter_admin.insert(Permission::ManageChapter);
        chapter_admin.insert(Permission::ManageUsers);
        chapter_admin.insert(Permission::ManageRoles);
        chapter_admin.insert(Permission::ModerateContent);
        chapter_admin.insert(Permission::EditContent);
        chapter_admin.insert(Permission::ViewReports);
        chapter_admin.insert(Permission::ViewDashboard);
        policies.insert(RoleName::ChapterAdmin, chapter_admin);

        // chapter_moderator: content duties within the chapter.
        let mut chapter_moderator = HashSet::new();
        chapter_moderator.insert(Permission::ModerateContent);
        chapter_moderator.insert(Permission::EditContent);
        chapter_moderator.insert(Permission::ViewReports);
        chapter_moderator.insert(Permission::ViewDashboard);
        policies.insert(RoleName::ChapterModerator, chapter_moderator);

        // chapter_staff: edits and reads reports, no moderation.
        let mut chapter_staff = HashSet::new();
        chapter_staff.insert(Permission::EditContent);
        chapter_staff.insert(Permission::ViewReports);
        chapter_staff.insert(Permission::ViewDashboard);
        policies.insert(RoleName::ChapterStaff, chapter_staff);

        // chapter_partner: contributes content.
        let mut chapter_partner = HashSet::new();
        chapter_partner.insert(Permission::EditContent);
        chapter_partner.insert(Permission::ViewDashboard);
        policies.insert(RoleName::ChapterPartner, chapter_partner);

        // chapter_affiliate: dashboard access only.
        let mut chapter_affiliate = HashSet::new();
        chapter_affiliate.insert(Permission::ViewDashboard);
        policies.insert(RoleName::ChapterAffiliate, chapter_affiliate);

        // community_admin: cross-chapter user and content duties, but not
        // chapter settings and not role grants.
        let mut community_admin = HashSet::new();
        community_admin.insert(Permission::ManageUsers);
        community_admin.insert(Permission::ModerateContent);
        community_admin.insert(Permission::EditContent);
        community_admin.insert(Permission::ViewReports);
        community_admin.insert(Permission::ViewDashboard);
        policies.insert(RoleName::CommunityAdmin, community_admin);

        // community_moderator: cross-chapter moderation.
        let mut community_moderator = HashSet::new();
        community_moderator.insert(Permission::ModerateContent);
        community_moderator.insert(Permission::ViewDashboard);
        policies.insert(RoleName::CommunityModerator, community_moderator);

        // community_partner: dashboard access only.
        let mut community_partner = HashSet::new();
        community_partner.insert(Permission::ViewDashboard);
        policies.insert(RoleName::CommunityPartner, community_partner);

        Self { policies }
    }

    /// Checks whether the given role grants the permission.
    ///
    /// `super_admin` implicitly holds every permission.
    pub fn has_permission(&self, role: RoleName, permission: Permission) -> bool {
        if role == RoleName::SuperAdmin {
            return true;
        }
        self.policies
            .get(&role)
            .is_some_and(|set| set.contains(&permission))
    }

    /// Returns the permission set for a role.
    pub fn permissions_for(&self, role: RoleName) -> HashSet<Permission> {
        if role == RoleName::SuperAdmin {
            return [
                Permission::ManageSystem,
                Permission::ManageChapter,
                Permission::ManageUsers,
                Permission::ManageRoles,
                Permission::ModerateContent,
                Permission::EditContent,
                Permission::ViewReports,
                Permission::ViewDashboard,
            ]
            .into_iter()
            .collect();
        }
        self.policies.get(&role).cloned().unwrap_or_default()
    }
}

impl Default for RolePolicies {
    fn default() -> Self {
        Self::new()
    }
}
