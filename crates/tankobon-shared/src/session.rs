use crate::{
    id::DbId,
    uac::{Email, Role, Username},
};

/// One team membership carried in the session payload
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TeamRole {
    pub team_id: DbId,
    pub role: Role,
}

/// The resolved identity stored in the session and handed to handlers.
///
/// Equality is used by the read-repair path to decide whether the cached
/// payload drifted from the database view, so `team_roles` must be kept
/// sorted by team id (the database loader orders them).
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: DbId,
    pub username: Username,
    pub email: Email,
    pub role: Role,
    pub team_roles: Vec<TeamRole>,
}

impl CurrentUser {
    /// The caller's role within the given team, if they are a member
    pub fn team_role(&self, team_id: DbId) -> Option<Role> {
        self.team_roles
            .iter()
            .find(|entry| entry.team_id == team_id)
            .map(|entry| entry.role)
    }
}
