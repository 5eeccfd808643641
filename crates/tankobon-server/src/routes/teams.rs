use actix_web::{http::StatusCode, web, HttpResponse};
use anyhow::Context as _;
use sqlx::{PgPool, Row as _};
use tankobon_shared::{
    catalog::TeamSummary,
    e400, e404, e500,
    errors::message_response,
    id::DbId,
    req_args::api::teams::{CreateReqArgs, MemberAddReqArgs, MemberRemoveReqArgs},
    session::CurrentUser,
    uac::Role,
};

use crate::{authorization::require_team_role, identity::user_id_by_username};

/// Creates the team with the caller as its owner. The caller's session still
/// carries the old membership list until read-repair rewrites it.
#[tracing::instrument(name = "Create team", skip(pool, user))]
pub async fn team_create(
    pool: web::Data<PgPool>,
    args: web::Json<CreateReqArgs>,
    user: web::ReqData<CurrentUser>,
) -> actix_web::Result<web::Json<TeamSummary>> {
    let name = args.into_inner().name.trim().to_string();
    if name.is_empty() {
        return Err(e400(anyhow::anyhow!("team name must not be empty")));
    }
    let mut transaction = pool
        .begin()
        .await
        .context("failed to start transaction")
        .map_err(e500)?;
    let insert = sqlx::query("INSERT INTO teams (name) VALUES ($1) RETURNING id")
        .bind(&name)
        .fetch_one(&mut *transaction)
        .await;
    let row = match insert {
        Ok(row) => row,
        Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some("teams_name_key") => {
            return Err(e400(anyhow::anyhow!("team name {name:?} is already taken")))
        }
        Err(e) => {
            return Err(e500(
                anyhow::Error::from(e).context("failed to insert team"),
            ))
        }
    };
    let team_id: DbId = row
        .try_get::<i64, _>("id")
        .context("failed to read id")
        .map_err(e500)?
        .into();
    sqlx::query("INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3)")
        .bind(team_id)
        .bind(user.user_id)
        .bind(Role::Owner.as_str())
        .execute(&mut *transaction)
        .await
        .context("failed to add creator to team")
        .map_err(e500)?;
    transaction
        .commit()
        .await
        .context("failed to commit")
        .map_err(e500)?;
    Ok(web::Json(TeamSummary {
        team_id,
        name,
        role: Role::Owner,
    }))
}

#[tracing::instrument(name = "List own teams", skip_all)]
pub async fn teams_mine(
    pool: web::Data<PgPool>,
    user: web::ReqData<CurrentUser>,
) -> actix_web::Result<web::Json<Vec<TeamSummary>>> {
    let rows = sqlx::query(
        "SELECT t.id, t.name, tm.role FROM team_members tm \
         JOIN teams t ON t.id = tm.team_id WHERE tm.user_id = $1 ORDER BY t.id",
    )
    .bind(user.user_id)
    .fetch_all(pool.get_ref())
    .await
    .context("failed to list teams")
    .map_err(e500)?;
    let teams = rows
        .into_iter()
        .map(|row| -> anyhow::Result<TeamSummary> {
            Ok(TeamSummary {
                team_id: row.try_get::<i64, _>("id")?.into(),
                name: row.try_get("name")?,
                role: row.try_get::<String, _>("role")?.try_into()?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(e500)?;
    Ok(web::Json(teams))
}

/// Requires the team admin role within the target team. Site-wide roles do
/// not apply here.
#[tracing::instrument(name = "Add team member", skip(pool, user))]
pub async fn team_member_add(
    pool: web::Data<PgPool>,
    args: web::Json<MemberAddReqArgs>,
    user: web::ReqData<CurrentUser>,
) -> actix_web::Result<HttpResponse> {
    let args = args.into_inner();
    require_team_role(&user, args.team_id, Role::Admin)?;
    let Some(member_id) = user_id_by_username(&pool, &args.username)
        .await
        .map_err(e500)?
    else {
        return Err(e404(anyhow::anyhow!(
            "no user found with username {:?}",
            args.username.as_ref()
        )));
    };
    // Re-adding an existing member updates their team role instead
    sqlx::query(
        "INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3) \
         ON CONFLICT (team_id, user_id) DO UPDATE SET role = EXCLUDED.role",
    )
    .bind(args.team_id)
    .bind(member_id)
    .bind(args.role.as_str())
    .execute(pool.get_ref())
    .await
    .context("failed to add team member")
    .map_err(e500)?;
    Ok(message_response(StatusCode::OK, "member added"))
}

#[tracing::instrument(name = "Remove team member", skip(pool, user))]
pub async fn team_member_remove(
    pool: web::Data<PgPool>,
    args: web::Json<MemberRemoveReqArgs>,
    user: web::ReqData<CurrentUser>,
) -> actix_web::Result<HttpResponse> {
    let args = args.into_inner();
    require_team_role(&user, args.team_id, Role::Admin)?;
    let Some(member_id) = user_id_by_username(&pool, &args.username)
        .await
        .map_err(e500)?
    else {
        return Err(e404(anyhow::anyhow!(
            "no user found with username {:?}",
            args.username.as_ref()
        )));
    };
    let sql_result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
        .bind(args.team_id)
        .bind(member_id)
        .execute(pool.get_ref())
        .await
        .context("failed to remove team member")
        .map_err(e500)?;
    if sql_result.rows_affected() == 0 {
        return Err(e404(anyhow::anyhow!(
            "{:?} is not a member of team {}",
            args.username.as_ref(),
            args.team_id
        )));
    }
    Ok(message_response(StatusCode::OK, "member removed"))
}
