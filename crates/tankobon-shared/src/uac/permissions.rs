use std::{collections::HashMap, fmt::Display, sync::OnceLock};

use serde::{Deserialize, Serialize};

use crate::{const_config::path::*, errors::ConversionError};

use super::Role;

/// Named capability that can be granted to a user in addition to what their
/// role already allows
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(try_from = "String", into = "String")]
pub enum Permission {
    CreateContent,
    EditContent,
    DeleteContent,
    CreateChapter,
    UploadFiles,
    ModerateComments,
    ManageTeams,
    ManageUsers,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::CreateContent => "create:content",
            Permission::EditContent => "edit:content",
            Permission::DeleteContent => "delete:content",
            Permission::CreateChapter => "create:chapter",
            Permission::UploadFiles => "upload:files",
            Permission::ModerateComments => "moderate:comments",
            Permission::ManageTeams => "manage:teams",
            Permission::ManageUsers => "manage:users",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<&str> for Permission {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "create:content" => Ok(Permission::CreateContent),
            "edit:content" => Ok(Permission::EditContent),
            "delete:content" => Ok(Permission::DeleteContent),
            "create:chapter" => Ok(Permission::CreateChapter),
            "upload:files" => Ok(Permission::UploadFiles),
            "moderate:comments" => Ok(Permission::ModerateComments),
            "manage:teams" => Ok(Permission::ManageTeams),
            "manage:users" => Ok(Permission::ManageUsers),
            other => Err(ConversionError::Invalid(format!(
                "not a known permission: {other:?}"
            ))),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

/// Static role to permission table.
///
/// `admin` and `owner` are not listed because [`role_grants`] short-circuits
/// them to allow-all before consulting the table.
pub fn permissions_for_role(role: Role) -> &'static [Permission] {
    match role {
        Role::User => &[],
        Role::Uploader => &[Permission::CreateChapter, Permission::UploadFiles],
        Role::Moderator => &[
            Permission::CreateContent,
            Permission::EditContent,
            Permission::CreateChapter,
            Permission::UploadFiles,
            Permission::ModerateComments,
            Permission::ManageTeams,
        ],
        Role::Admin | Role::Owner => &[],
    }
}

/// Decides a named-permission check from the role alone (the caller falls
/// back to the per-user grant table in the database when this returns false)
pub fn role_grants(role: Role, permission: Permission) -> bool {
    if role.meets(Role::Admin) {
        return true;
    }
    permissions_for_role(role).contains(&permission)
}

/// The access requirement a protected endpoint declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReq {
    /// Any logged in user (the handler may apply further checks)
    LoggedIn,
    /// Site role threshold
    MinRole(Role),
    /// Named capability
    Permission(Permission),
}

pub type AccessMap = HashMap<&'static str, AccessReq>;

static ACCESS_MAP: OnceLock<AccessMap> = OnceLock::new();

pub fn default_access_map() -> AccessMap {
    let mut result: AccessMap = HashMap::new();
    result.insert(PATH_AUTH_ME, AccessReq::LoggedIn);
    result.insert(PATH_API_ADMIN_USER_LIST, AccessReq::MinRole(Role::Admin));
    result.insert(PATH_API_ADMIN_USER_ROLE, AccessReq::MinRole(Role::Admin));
    result.insert(
        PATH_API_ADMIN_USER_PERMISSION,
        AccessReq::MinRole(Role::Admin),
    );
    result.insert(PATH_API_TEAM_CREATE, AccessReq::MinRole(Role::Moderator));
    result.insert(PATH_API_TEAM_MINE, AccessReq::LoggedIn);
    // Team scoped checks happen in the handler where the team id is known
    result.insert(PATH_API_TEAM_MEMBER_ADD, AccessReq::LoggedIn);
    result.insert(PATH_API_TEAM_MEMBER_REMOVE, AccessReq::LoggedIn);
    result.insert(
        PATH_API_CONTENT_CREATE,
        AccessReq::Permission(Permission::CreateContent),
    );
    result.insert(PATH_API_CONTENT_CHAPTER_CREATE, AccessReq::LoggedIn);
    result.insert(
        PATH_API_UPLOAD_STORE,
        AccessReq::Permission(Permission::UploadFiles),
    );
    result.insert(
        PATH_API_UPLOAD_DELETE,
        AccessReq::Permission(Permission::UploadFiles),
    );
    result
}

/// Only sets the access map if it hasn't already been set
pub fn try_set_access_map(value: AccessMap) -> Result<(), AccessMap> {
    ACCESS_MAP.set(value)
}

/// Initializes the access map, may be run more than once without issue (will
/// only have an effect the first time)
pub fn init_access_map_to_defaults() {
    let _ = try_set_access_map(default_access_map());
}

/// Takes a path and returns the access requirement for it if found
///
/// **Note:** All paths behind the login middleware must have an entry to be
/// accessed, even if the entry is only [`AccessReq::LoggedIn`]
#[tracing::instrument(ret)]
pub fn required_access(path: &str) -> Option<AccessReq> {
    ACCESS_MAP
        .get()
        .expect("access map was not initialized")
        .get(path)
        .copied()
}
