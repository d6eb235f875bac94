//! Role-based privilege and its per-scan memo.

use gallery_core::{Member, StaffRoles, UserId};
use std::collections::HashMap;

/// Lowercased role names that make a member staff or privileged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    staff: Vec<String>,
    artist: String,
}

impl RoleSet {
    /// Build the set from the server's staff roles and the channel's artist role.
    pub fn new(staff: &StaffRoles, artist_role: &str) -> Self {
        Self {
            staff: vec![staff.admin().to_lowercase(), staff.moderator().to_lowercase()],
            artist: artist_role.to_lowercase(),
        }
    }

    /// Holds the admin or moderator role.
    pub fn is_staff(&self, member: &Member) -> bool {
        member.has_any_role(self.staff.iter().map(String::as_str))
    }

    /// Holds a staff role or the artist role.
    pub fn is_privileged(&self, member: &Member) -> bool {
        member.has_any_role(
            self.staff
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(self.artist.as_str())),
        )
    }
}

/// What one scan has learned about users' roles.
///
/// Entries only ever move from "unknown" or "no" to "yes", so a user seen as
/// privileged or admin stays that way until the cache is dropped with its scan.
#[derive(Debug, Default, Clone)]
pub struct PrivilegeCache {
    privileged: HashMap<UserId, bool>,
    admin: HashMap<UserId, bool>,
}

impl PrivilegeCache {
    /// A fresh, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized privilege of `user`, if already evaluated.
    pub fn privileged(&self, user: UserId) -> Option<bool> {
        self.privileged.get(&user).copied()
    }

    /// The memoized admin status of `user`, if already evaluated.
    pub fn admin(&self, user: UserId) -> Option<bool> {
        self.admin.get(&user).copied()
    }

    /// Remember `user`'s privilege. Never downgrades.
    pub fn record_privileged(&mut self, user: UserId, privileged: bool) {
        let entry = self.privileged.entry(user).or_insert(false);
        *entry |= privileged;
    }

    /// Remember `user`'s admin status. An admin is also privileged.
    pub fn record_admin(&mut self, user: UserId, admin: bool) {
        let entry = self.admin.entry(user).or_insert(false);
        *entry |= admin;
        if admin {
            self.record_privileged(user, true);
        }
    }

    /// Number of users with a memoized privilege.
    pub fn len(&self) -> usize {
        self.privileged.len()
    }

    /// True when nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.privileged.is_empty() && self.admin.is_empty()
    }
}
