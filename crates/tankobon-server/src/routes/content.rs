use actix_web::{web, HttpResponse};
use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row as _};
use tankobon_shared::{
    catalog::{ChapterSummary, ContentSummary},
    e400, e404, e500,
    req_args::api::content::{ChapterCreateReqArgs, CreateReqArgs, LookupReqArgs},
    session::CurrentUser,
    uac::Role,
};

use crate::authorization::require_team_role;

/// Gated by the create:content permission in the route middleware
#[tracing::instrument(name = "Create content entry", skip(pool, user))]
pub async fn content_create(
    pool: web::Data<PgPool>,
    args: web::Json<CreateReqArgs>,
    user: web::ReqData<CurrentUser>,
) -> actix_web::Result<web::Json<ContentSummary>> {
    let args = args.into_inner();
    let title = args.title.trim().to_string();
    if title.is_empty() {
        return Err(e400(anyhow::anyhow!("title must not be empty")));
    }
    if let Some(team_id) = args.team_id {
        // Crediting a team requires being a member of it
        require_team_role(&user, team_id, Role::User)?;
    }
    let row = sqlx::query(
        "INSERT INTO content (title, summary, team_id, created_by) \
         VALUES ($1, $2, $3, $4) RETURNING id, created_at",
    )
    .bind(&title)
    .bind(&args.summary)
    .bind(args.team_id)
    .bind(user.user_id)
    .fetch_one(pool.get_ref())
    .await
    .context("failed to insert content")
    .map_err(e500)?;
    let entry = ContentSummary {
        id: row
            .try_get::<i64, _>("id")
            .context("failed to read id")
            .map_err(e500)?
            .into(),
        title,
        summary: args.summary,
        team_id: args.team_id,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .context("failed to read created_at")
            .map_err(e500)?,
    };
    Ok(web::Json(entry))
}

/// Chapters are uploaded on behalf of a team, requiring at least the
/// uploader role within it
#[tracing::instrument(name = "Create chapter", skip(pool, user))]
pub async fn chapter_create(
    pool: web::Data<PgPool>,
    args: web::Json<ChapterCreateReqArgs>,
    user: web::ReqData<CurrentUser>,
) -> actix_web::Result<web::Json<ChapterSummary>> {
    let args = args.into_inner();
    require_team_role(&user, args.team_id, Role::Uploader)?;

    let found: bool = sqlx::query("SELECT EXISTS (SELECT 1 FROM content WHERE id = $1) AS found")
        .bind(args.content_id)
        .fetch_one(pool.get_ref())
        .await
        .context("failed to check content")
        .map_err(e500)?
        .try_get("found")
        .context("failed to read found")
        .map_err(e500)?;
    if !found {
        return Err(e404(anyhow::anyhow!(
            "no content entry with id {}",
            args.content_id
        )));
    }

    let insert = sqlx::query(
        "INSERT INTO chapters (content_id, team_id, number, title, created_by) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(args.content_id)
    .bind(args.team_id)
    .bind(args.number)
    .bind(&args.title)
    .bind(user.user_id)
    .fetch_one(pool.get_ref())
    .await;
    let row = match insert {
        Ok(row) => row,
        Err(sqlx::Error::Database(db_err))
            if db_err.constraint() == Some("chapters_content_id_team_id_number_key") =>
        {
            return Err(e400(anyhow::anyhow!(
                "chapter {} already exists for this team",
                args.number
            )))
        }
        Err(e) => {
            return Err(e500(
                anyhow::Error::from(e).context("failed to insert chapter"),
            ))
        }
    };
    let chapter = ChapterSummary {
        id: row
            .try_get::<i64, _>("id")
            .context("failed to read id")
            .map_err(e500)?
            .into(),
        content_id: args.content_id,
        team_id: args.team_id,
        number: args.number,
        title: args.title,
    };
    Ok(web::Json(chapter))
}

#[tracing::instrument(name = "List content", skip_all)]
pub async fn content_list(
    pool: web::Data<PgPool>,
) -> actix_web::Result<web::Json<Vec<ContentSummary>>> {
    let rows = sqlx::query(
        "SELECT id, title, summary, team_id, created_at FROM content \
         ORDER BY created_at DESC, id DESC LIMIT 100",
    )
    .fetch_all(pool.get_ref())
    .await
    .context("failed to list content")
    .map_err(e500)?;
    let entries = rows
        .into_iter()
        .map(row_to_summary)
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(e500)?;
    Ok(web::Json(entries))
}

#[tracing::instrument(name = "Look up content", skip(pool))]
pub async fn content_lookup(
    pool: web::Data<PgPool>,
    query: web::Query<LookupReqArgs>,
) -> actix_web::Result<web::Json<ContentSummary>> {
    let id = query.into_inner().id;
    let Some(row) =
        sqlx::query("SELECT id, title, summary, team_id, created_at FROM content WHERE id = $1")
            .bind(id)
            .fetch_optional(pool.get_ref())
            .await
            .context("failed to look up content")
            .map_err(e500)?
    else {
        return Err(e404(anyhow::anyhow!("no content entry with id {id}")));
    };
    Ok(web::Json(row_to_summary(row).map_err(e500)?))
}

fn row_to_summary(row: sqlx::postgres::PgRow) -> anyhow::Result<ContentSummary> {
    Ok(ContentSummary {
        id: row.try_get::<i64, _>("id")?.into(),
        title: row.try_get("title")?,
        summary: row.try_get("summary")?,
        team_id: row.try_get::<Option<i64>, _>("team_id")?.map(Into::into),
        created_at: row.try_get("created_at")?,
    })
}
