use serde::{Deserialize, Serialize};

use crate::errors::ConversionError;

/// Site-wide role with a total order used for threshold checks.
///
/// The declaration order is the authorization order: a later variant passes
/// every check an earlier variant passes.
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
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Uploader,
    Moderator,
    Admin,
    Owner,
}

impl Role {
    /// Threshold rule: allowed iff the caller's role is at least `required`
    pub fn meets(self, required: Role) -> bool {
        self >= required
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Uploader => "uploader",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "uploader" => Ok(Role::Uploader),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            other => Err(ConversionError::Invalid(format!(
                "not a known role: {other:?}"
            ))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}
