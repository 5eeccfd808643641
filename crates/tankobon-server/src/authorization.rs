//! Team scoped checks that run in handlers, after the route middleware has
//! already confirmed the caller is logged in.
//!
//! Site-wide roles deliberately do not bypass these: a site admin who is not
//! a member of a team cannot act within it.

use tankobon_shared::{
    id::DbId,
    session::CurrentUser,
    uac::{PermissionsError, Role},
};

pub fn require_team_role(
    user: &CurrentUser,
    team_id: DbId,
    required: Role,
) -> Result<(), PermissionsError> {
    match user.team_role(team_id) {
        None => Err(PermissionsError::NotATeamMember { team_id }),
        Some(role) if role.meets(required) => Ok(()),
        Some(_) => Err(PermissionsError::InsufficientTeamRole { team_id, required }),
    }
}
