use actix_session::SessionInsertError;
use actix_web::{web, HttpResponse};
use anyhow::Context as _;
use secrecy::ExposeSecret as _;
use sqlx::{PgPool, Row as _};
use tankobon_shared::{
    e500,
    errors::NotLoggedInError,
    req_args::{LoginReqArgs, RegisterReqArgs},
    session::CurrentUser,
    telemetry::spawn_blocking_with_tracing,
    uac::{AuthError, Email, RegisterError, Role, Username},
};

use crate::{
    authentication::{compute_password_hash, validate_credentials, AuthenticatedUser, Credentials},
    identity::{load_current_user, load_team_roles},
    session_state::TypedSession,
};

/// Creates the account and logs the caller straight in
#[tracing::instrument(name = "Register a new account", skip(pool, session), fields(username = %args.username))]
pub async fn register(
    args: web::Json<RegisterReqArgs>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, RegisterError> {
    let RegisterReqArgs {
        username,
        email,
        password,
    } = args.into_inner();
    let username = Username::try_from(username)?;
    let email = Email::try_from(email)?;
    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("failed to spawn blocking task.")
        .map_err(RegisterError::UnexpectedError)??;

    let insert = sqlx::query(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&username)
    .bind(&email)
    .bind(password_hash.expose_secret())
    .fetch_one(pool.get_ref())
    .await;
    let row = match insert {
        Ok(row) => row,
        Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some("users_username_key") => {
            return Err(RegisterError::UsernameTaken)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some("users_email_key") => {
            return Err(RegisterError::EmailTaken)
        }
        Err(e) => {
            return Err(anyhow::Error::from(e)
                .context("failed to insert user")
                .into())
        }
    };
    let user_id: i64 = row.try_get("id").context("failed to read id")?;

    let user = CurrentUser {
        user_id: user_id.into(),
        username,
        email,
        role: Role::User,
        team_roles: Vec::new(),
    };
    session.renew();
    session
        .insert_user_info(user.clone())
        .context("failed to store session")?;
    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(name = "Login", skip(args, pool, session), fields(email = %args.email))]
pub async fn login(
    args: web::Json<LoginReqArgs>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, AuthError> {
    let LoginReqArgs { email, password } = args.into_inner();
    let AuthenticatedUser {
        user_id,
        username,
        email,
        role,
    } = validate_credentials(Credentials { email, password }, &pool).await?;
    let team_roles = load_team_roles(&pool, user_id)
        .await
        .context("failed to load team memberships")?;

    let user = CurrentUser {
        user_id,
        username,
        email,
        role,
        team_roles,
    };
    session.renew();
    session
        .insert_user_info(user.clone())
        .context("failed to store session")?;
    Ok(HttpResponse::Ok().json(user))
}

/// Idempotent, succeeds whether or not the caller had a session
#[tracing::instrument(name = "Logout", skip_all)]
pub async fn log_out(session: TypedSession) -> HttpResponse {
    session.log_out();
    HttpResponse::Ok().json(serde_json::json!({ "message": "logged out" }))
}

/// Returns the caller's identity, repairing the session if the cached
/// payload no longer matches the database
#[tracing::instrument(name = "Current user", skip_all)]
pub async fn me(
    pool: web::Data<PgPool>,
    session: TypedSession,
    cached: web::ReqData<CurrentUser>,
) -> actix_web::Result<web::Json<CurrentUser>> {
    let cached = cached.into_inner();
    let Some(fresh) = load_current_user(&pool, cached.user_id)
        .await
        .map_err(e500)?
    else {
        // The account is gone so the session must not outlive it
        tracing::warn!("session referenced a deleted user, purging");
        session.log_out();
        return Err(NotLoggedInError.into());
    };
    repair_session(&session, &cached, &fresh).map_err(e500)?;
    Ok(web::Json(fresh))
}

/// Rewrites the session payload only when the database view drifted from the
/// cached copy
fn repair_session(
    session: &TypedSession,
    cached: &CurrentUser,
    fresh: &CurrentUser,
) -> Result<(), SessionInsertError> {
    if fresh != cached {
        tracing::info!("session payload drifted from the database, rewriting");
        session.insert_user_info(fresh.clone())?;
    }
    Ok(())
}
