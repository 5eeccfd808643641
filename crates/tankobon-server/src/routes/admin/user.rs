//! Site admin user management. The route middleware has already required the
//! admin role before any of these run.

use actix_web::{http::StatusCode, web, HttpResponse};
use anyhow::Context as _;
use sqlx::{PgPool, Row as _};
use tankobon_shared::{
    e404, e500,
    errors::message_response,
    req_args::api::admin::user::{PermissionGrantReqArgs, RoleUpdateReqArgs},
    uac::UserListEntry,
};

use crate::{db_utils::validate_one_row_affected, identity::user_id_by_username};

#[tracing::instrument(name = "List users", skip_all)]
pub async fn admin_user_list(
    pool: web::Data<PgPool>,
) -> actix_web::Result<web::Json<Vec<UserListEntry>>> {
    let rows = sqlx::query("SELECT id, username, email, role FROM users ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .context("failed to list users")
        .map_err(e500)?;
    let users = rows
        .into_iter()
        .map(|row| -> anyhow::Result<UserListEntry> {
            Ok(UserListEntry {
                user_id: row.try_get::<i64, _>("id")?.into(),
                username: row.try_get::<String, _>("username")?.try_into()?,
                email: row.try_get::<String, _>("email")?.try_into()?,
                role: row.try_get::<String, _>("role")?.try_into()?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(e500)?;
    Ok(web::Json(users))
}

#[tracing::instrument(name = "Update user role", skip(pool))]
pub async fn admin_user_role_update(
    pool: web::Data<PgPool>,
    args: web::Json<RoleUpdateReqArgs>,
) -> actix_web::Result<HttpResponse> {
    let args = args.into_inner();
    let sql_result = sqlx::query("UPDATE users SET role = $1 WHERE username = $2")
        .bind(args.role.as_str())
        .bind(&args.username)
        .execute(pool.get_ref())
        .await
        .context("failed to update user role")
        .map_err(e500)?;
    if sql_result.rows_affected() == 0 {
        return Err(e404(anyhow::anyhow!(
            "no user found with username {:?}",
            args.username.as_ref()
        )));
    }
    validate_one_row_affected(&sql_result).map_err(e500)?;
    Ok(message_response(StatusCode::OK, "role updated"))
}

/// Grants are additive on top of what the role table already allows; granting
/// an already held permission is a no-op
#[tracing::instrument(name = "Grant user permission", skip(pool))]
pub async fn admin_user_permission_grant(
    pool: web::Data<PgPool>,
    args: web::Json<PermissionGrantReqArgs>,
) -> actix_web::Result<HttpResponse> {
    let args = args.into_inner();
    let Some(user_id) = user_id_by_username(&pool, &args.username)
        .await
        .map_err(e500)?
    else {
        return Err(e404(anyhow::anyhow!(
            "no user found with username {:?}",
            args.username.as_ref()
        )));
    };
    sqlx::query(
        "INSERT INTO user_permissions (user_id, permission) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(args.permission.as_str())
    .execute(pool.get_ref())
    .await
    .context("failed to grant permission")
    .map_err(e500)?;
    Ok(message_response(StatusCode::OK, "permission granted"))
}
