//! Response types for the catalog and team surface

use chrono::{DateTime, Utc};

use crate::{id::DbId, uac::Role};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ContentSummary {
    pub id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub team_id: Option<DbId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ChapterSummary {
    pub id: DbId,
    pub content_id: DbId,
    pub team_id: DbId,
    pub number: i32,
    pub title: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct TeamSummary {
    pub team_id: DbId,
    pub name: String,
    /// The requesting user's role within the team
    pub role: Role,
}
