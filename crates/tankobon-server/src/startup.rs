use std::net::TcpListener;

use actix_session::{config::PersistentSession, SessionMiddleware};
use actix_web::{
    cookie::{time::Duration as CookieDuration, Key, SameSite},
    dev::Server,
    middleware::from_fn,
    web, App, HttpServer,
};
use anyhow::Context as _;
use secrecy::ExposeSecret as _;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tankobon_shared::{
    const_config::{path::*, server::DB_ACQUIRE_TIMEOUT_SECS, session::SESSION_COOKIE_NAME},
    telemetry::{get_subscriber, init_subscriber},
    uac::init_access_map_to_defaults,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::fmt::MakeWriter;

use crate::{
    authentication::validate_user_access,
    configuration::{Configuration, DatabaseSettings},
    routes::{
        admin_user_list, admin_user_permission_grant, admin_user_role_update, chapter_create,
        content_create, content_list, content_lookup, health_check, log_out, login, me, not_found,
        register, team_create, team_member_add, team_member_remove, teams_mine, upload_delete,
        upload_store,
    },
    uploads::UploadStorage,
};

/// A fully configured server, bound to a port but not yet running
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Configuration, db_pool: PgPool) -> anyhow::Result<Self> {
        init_access_map_to_defaults();

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address).context("failed to bind server address")?;
        let port = listener.local_addr().context("no local addr")?.port();
        let server = run(listener, db_pool, configuration).await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

async fn run(
    listener: TcpListener,
    db_pool: PgPool,
    configuration: Configuration,
) -> anyhow::Result<Server> {
    let db_pool = web::Data::new(db_pool);
    let upload_storage = web::Data::new(UploadStorage::from_settings(&configuration.upload)?);
    let secret_key = Key::from(
        configuration
            .application
            .hmac_secret
            .expose_secret()
            .as_bytes(),
    );
    let session_ttl = CookieDuration::seconds(configuration.session.ttl_seconds as i64);

    #[cfg(feature = "redis-session-rustls")]
    let session_store = actix_session::storage::RedisSessionStore::new(
        configuration.redis_uri.expose_secret(),
    )
    .await
    .expect("failed to connect to Redis");

    let server = HttpServer::new(move || {
        #[cfg(feature = "redis-session-rustls")]
        let session_store = session_store.clone();
        #[cfg(all(not(feature = "redis-session-rustls"), feature = "cookie-session"))]
        let session_store = actix_session::storage::CookieSessionStore::default();

        let session_middleware = SessionMiddleware::builder(session_store, secret_key.clone())
            .cookie_name(SESSION_COOKIE_NAME.into())
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
            .build();

        App::new()
            .wrap(TracingLogger::default())
            .wrap(session_middleware)
            .route(PATH_HEALTH_CHECK, web::get().to(health_check))
            .route(PATH_CONTENT_LIST, web::get().to(content_list))
            .route(PATH_CONTENT_LOOKUP, web::get().to(content_lookup))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login))
                    .route("/logout", web::post().to(log_out))
                    .service(
                        web::resource("/me")
                            .wrap(from_fn(validate_user_access))
                            .route(web::get().to(me)),
                    ),
            )
            .service(
                web::scope("/api")
                    .wrap(from_fn(validate_user_access))
                    .service(
                        web::scope("/admin/user")
                            .route("/list", web::get().to(admin_user_list))
                            .route("/role", web::post().to(admin_user_role_update))
                            .route("/permission", web::post().to(admin_user_permission_grant)),
                    )
                    .service(
                        web::scope("/teams")
                            .route("/create", web::post().to(team_create))
                            .route("/mine", web::get().to(teams_mine))
                            .route("/member/add", web::post().to(team_member_add))
                            .route("/member/remove", web::post().to(team_member_remove)),
                    )
                    .service(
                        web::scope("/content")
                            .route("/create", web::post().to(content_create))
                            .route("/chapter/create", web::post().to(chapter_create)),
                    )
                    .service(
                        web::scope("/uploads")
                            .route("/store", web::post().to(upload_store))
                            .route("/delete", web::post().to(upload_delete)),
                    ),
            )
            .app_data(db_pool.clone())
            .app_data(upload_storage.clone())
            .default_service(web::route().to(not_found))
    })
    .listen(listener)
    .context("failed to listen on bound port")?
    .run();

    Ok(server)
}

pub fn get_db_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS))
        .connect_lazy_with(configuration.with_db())
}

/// Sets up the tracing subscriber for the whole process
pub fn initialize_tracing<Sink>(name: String, default_env_filter: String, sink: Sink)
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let subscriber = get_subscriber(name, default_env_filter, sink);
    init_subscriber(subscriber);
}
