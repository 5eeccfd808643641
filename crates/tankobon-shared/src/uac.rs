//! Shared items related to user access control

mod errors;
mod permissions;
mod role;
mod user;

pub use errors::{AuthError, PermissionsError, RegisterError};
pub use permissions::{
    default_access_map, init_access_map_to_defaults, permissions_for_role, required_access,
    role_grants, try_set_access_map, AccessMap, AccessReq, Permission,
};
pub use role::Role;
pub use user::{Email, UserListEntry, Username};
