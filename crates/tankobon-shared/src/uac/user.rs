use std::fmt::Display;

use crate::{errors::ConversionError, id::DbId};

use super::Role;

/// Represents a username, constrained to be non-empty and bounded in length
#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Username(String);

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Email(String);

impl Username {
    pub const MAX_LENGTH: usize = 32;
}

impl Email {
    pub const MAX_LENGTH: usize = 254;
}

impl TryFrom<String> for Username {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Username {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for Email {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        if !value.contains('@') {
            return Err(ConversionError::Invalid(format!(
                "not an email address: {value:?}"
            )));
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Email {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the admin user listing
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UserListEntry {
    pub user_id: DbId,
    pub username: Username,
    pub email: Email,
    pub role: Role,
}

pub mod sql {
    use super::*;
    use sqlx::Postgres;

    impl sqlx::Encode<'_, Postgres> for Username {
        fn encode_by_ref(
            &self,
            buf: &mut <Postgres as sqlx::Database>::ArgumentBuffer<'_>,
        ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
            <String as sqlx::Encode<'_, Postgres>>::encode_by_ref(&self.0, buf)
        }
    }

    impl sqlx::Encode<'_, Postgres> for Email {
        fn encode_by_ref(
            &self,
            buf: &mut <Postgres as sqlx::Database>::ArgumentBuffer<'_>,
        ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
            <String as sqlx::Encode<'_, Postgres>>::encode_by_ref(&self.0, buf)
        }
    }

    impl sqlx::Type<Postgres> for Username {
        fn type_info() -> <Postgres as sqlx::Database>::TypeInfo {
            <String as sqlx::Type<Postgres>>::type_info()
        }
    }

    impl sqlx::Type<Postgres> for Email {
        fn type_info() -> <Postgres as sqlx::Database>::TypeInfo {
            <String as sqlx::Type<Postgres>>::type_info()
        }
    }
}
