use anyhow::Context as _;
use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _,
    PasswordVerifier as _, Version,
};
use secrecy::{ExposeSecret as _, SecretString};
use sqlx::{PgPool, Row as _};
use tankobon_shared::{
    id::DbId,
    telemetry::spawn_blocking_with_tracing,
    uac::{AuthError, Email, Role, Username},
};

pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// Identity columns loaded while checking a password. Team memberships are
/// attached separately by the login handler.
pub struct AuthenticatedUser {
    pub user_id: DbId,
    pub username: Username,
    pub email: Email,
    pub role: Role,
}

struct StoredCredentials {
    user_id: i64,
    username: String,
    email: String,
    role: String,
    password_hash: SecretString,
}

impl Default for StoredCredentials {
    /// Stand-in row used when the email is unknown so that the request still
    /// pays for a hash verification, keeping response timing independent of
    /// whether the account exists
    fn default() -> Self {
        Self {
            user_id: 0,
            username: String::new(),
            email: String::new(),
            role: "user".to_string(),
            password_hash: SecretString::from(
                "$argon2id$v=19$m=15000,t=2,p=1$\
                gZiV/M1gPc22ElAH/Jh1Hw$\
                CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno",
            ),
        }
    }
}

#[tracing::instrument(name = "Validate credentials", skip(credentials, pool))]
pub async fn validate_credentials(
    credentials: Credentials,
    pool: &PgPool,
) -> Result<AuthenticatedUser, AuthError> {
    let stored = get_stored_credentials(&credentials.email, pool).await?;
    let user_exists = stored.is_some();
    let StoredCredentials {
        user_id,
        username,
        email,
        role,
        password_hash,
    } = stored.unwrap_or_default();

    spawn_blocking_with_tracing(move || verify_password_hash(password_hash, credentials.password))
        .await
        .context("failed to spawn blocking task.")
        .map_err(AuthError::UnexpectedError)??;

    if !user_exists {
        return Err(AuthError::InvalidEmailOrPassword);
    }

    Ok(AuthenticatedUser {
        user_id: DbId::from(user_id),
        username: Username::try_from(username).context("stored username is invalid")?,
        email: Email::try_from(email).context("stored email is invalid")?,
        role: Role::try_from(role.as_str()).context("stored role is invalid")?,
    })
}

#[tracing::instrument(name = "Get stored credentials", skip(email, pool))]
async fn get_stored_credentials(
    email: &str,
    pool: &PgPool,
) -> Result<Option<StoredCredentials>, AuthError> {
    let Some(row) =
        sqlx::query("SELECT id, username, email, role, password_hash FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .context("failed to retrieve stored credentials")?
    else {
        return Ok(None);
    };
    Ok(Some(StoredCredentials {
        user_id: row.try_get("id").context("failed to read id")?,
        username: row.try_get("username").context("failed to read username")?,
        email: row.try_get("email").context("failed to read email")?,
        role: row.try_get("role").context("failed to read role")?,
        password_hash: SecretString::from(
            row.try_get::<String, _>("password_hash")
                .context("failed to read password_hash")?,
        ),
    }))
}

#[tracing::instrument(
    name = "Verify password hash",
    skip(expected_password_hash, password_candidate)
)]
fn verify_password_hash(
    expected_password_hash: SecretString,
    password_candidate: SecretString,
) -> Result<(), AuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .context("failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .map_err(|_| AuthError::InvalidEmailOrPassword)
}

pub fn compute_password_hash(password: SecretString) -> anyhow::Result<SecretString> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_settings())
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .context("failed to hash password")?
        .to_string();
    Ok(SecretString::from(password_hash))
}

fn argon2_settings() -> Params {
    Params::new(15000, 2, 1, None).expect("failed to build Argon2 parameters")
}
