//! Database loaders for the identity carried in the session

use anyhow::Context as _;
use sqlx::{PgPool, Row as _};
use tankobon_shared::{
    id::DbId,
    session::{CurrentUser, TeamRole},
    uac::{Permission, Username},
};

/// Loads the caller's identity as the database currently sees it. Returns
/// `None` when the user row no longer exists.
pub async fn load_current_user(pool: &PgPool, user_id: DbId) -> anyhow::Result<Option<CurrentUser>> {
    let Some(row) = sqlx::query("SELECT username, email, role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("failed to load user")?
    else {
        return Ok(None);
    };
    let team_roles = load_team_roles(pool, user_id).await?;
    Ok(Some(CurrentUser {
        user_id,
        username: row.try_get::<String, _>("username")?.try_into()?,
        email: row.try_get::<String, _>("email")?.try_into()?,
        role: row.try_get::<String, _>("role")?.try_into()?,
        team_roles,
    }))
}

/// Ordered by team id so the result is stable and comparable to the cached
/// session payload
pub async fn load_team_roles(pool: &PgPool, user_id: DbId) -> anyhow::Result<Vec<TeamRole>> {
    let rows =
        sqlx::query("SELECT team_id, role FROM team_members WHERE user_id = $1 ORDER BY team_id")
            .bind(user_id)
            .fetch_all(pool)
            .await
            .context("failed to load team memberships")?;
    rows.into_iter()
        .map(|row| {
            Ok(TeamRole {
                team_id: row.try_get::<i64, _>("team_id")?.into(),
                role: row.try_get::<String, _>("role")?.try_into()?,
            })
        })
        .collect()
}

pub async fn user_id_by_username(
    pool: &PgPool,
    username: &Username,
) -> anyhow::Result<Option<DbId>> {
    let row = sqlx::query("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("failed to look up user by username")?;
    Ok(match row {
        Some(row) => Some(row.try_get::<i64, _>("id")?.into()),
        None => None,
    })
}

/// Checks the per-user grant table, used after the role table declined
pub async fn has_user_permission(
    pool: &PgPool,
    user_id: DbId,
    permission: Permission,
) -> anyhow::Result<bool> {
    let row = sqlx::query(
        "SELECT EXISTS (SELECT 1 FROM user_permissions WHERE user_id = $1 AND permission = $2) AS granted",
    )
    .bind(user_id)
    .bind(permission.as_str())
    .fetch_one(pool)
    .await
    .context("failed to check user permission")?;
    Ok(row.try_get("granted")?)
}
