#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Copy, Hash,
)]
pub struct DbId(i64);

impl From<i64> for DbId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<DbId> for i64 {
    fn from(value: DbId) -> Self {
        value.0
    }
}

impl std::fmt::Display for DbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DbId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

pub mod sql {
    use super::*;
    use sqlx::Postgres;

    impl sqlx::Encode<'_, Postgres> for DbId {
        fn encode_by_ref(
            &self,
            buf: &mut <Postgres as sqlx::Database>::ArgumentBuffer<'_>,
        ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
            <i64 as sqlx::Encode<'_, Postgres>>::encode_by_ref(&self.0, buf)
        }
    }

    impl sqlx::Type<Postgres> for DbId {
        fn type_info() -> <Postgres as sqlx::Database>::TypeInfo {
            <i64 as sqlx::Type<Postgres>>::type_info()
        }
    }
}
