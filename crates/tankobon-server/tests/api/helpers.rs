use std::sync::LazyLock;

use sqlx::{Connection as _, Executor as _, PgConnection, PgPool};
use tankobon_server::{get_configuration, Application, DatabaseSettings};
use tankobon_shared::telemetry::{get_subscriber, init_subscriber};
use uuid::Uuid;

// Ensure that the `tracing` stack is only initialised once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    /// Holds the session cookie of the "main" user of a test. Tests that
    /// need a second identity create another client with [`TestApp::new_client`].
    pub api_client: reqwest::Client,
}

pub struct TestUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    pub fn generate() -> Self {
        let tag = Uuid::new_v4().simple().to_string();
        Self {
            username: format!("user-{}", &tag[..12]),
            email: format!("{tag}@example.com"),
            password: Uuid::new_v4().to_string(),
        }
    }
}

impl TestApp {
    pub fn new_client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build client")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.get_with(&self.api_client, path).await
    }

    pub async fn get_with(&self, client: &reqwest::Client, path: &str) -> reqwest::Response {
        client
            .get(format!("{}{path}", self.address))
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> reqwest::Response {
        self.post_json_with(&self.api_client, path, body).await
    }

    pub async fn post_json_with<T: serde::Serialize>(
        &self,
        client: &reqwest::Client,
        path: &str,
        body: &T,
    ) -> reqwest::Response {
        client
            .post(format!("{}{path}", self.address))
            .json(body)
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn post_empty(&self, path: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}{path}", self.address))
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn register(&self, user: &TestUser) -> reqwest::Response {
        self.register_with(&self.api_client, user).await
    }

    pub async fn register_with(
        &self,
        client: &reqwest::Client,
        user: &TestUser,
    ) -> reqwest::Response {
        self.post_json_with(
            client,
            "/auth/register",
            &serde_json::json!({
                "username": user.username,
                "email": user.email,
                "password": user.password,
            }),
        )
        .await
    }

    pub async fn login(&self, user: &TestUser) -> reqwest::Response {
        self.post_json(
            "/auth/login",
            &serde_json::json!({
                "email": user.email,
                "password": user.password,
            }),
        )
        .await
    }

    /// Changes the role directly in the database. The user's session stays
    /// stale until read-repair rewrites it.
    pub async fn set_site_role(&self, username: &str, role: &str) {
        sqlx::query("UPDATE users SET role = $1 WHERE username = $2")
            .bind(role)
            .bind(username)
            .execute(&self.db_pool)
            .await
            .expect("failed to set role");
    }

    /// Registers a user on the given client, promotes them and refreshes the
    /// session via read-repair so the new role is immediately usable
    pub async fn register_with_site_role(
        &self,
        client: &reqwest::Client,
        role: &str,
    ) -> TestUser {
        let user = TestUser::generate();
        let response = self.register_with(client, &user).await;
        assert!(response.status().is_success(), "registration failed");
        self.set_site_role(&user.username, role).await;
        let response = self.get_with(client, "/auth/me").await;
        assert!(response.status().is_success(), "session refresh failed");
        user
    }

    /// Creates a team and refreshes the creator's session so the owner
    /// membership is usable right away
    pub async fn create_team(&self, client: &reqwest::Client, name: &str) -> i64 {
        let response = self
            .post_json_with(client, "/api/teams/create", &serde_json::json!({ "name": name }))
            .await;
        assert!(response.status().is_success(), "team creation failed");
        let body: serde_json::Value = response.json().await.expect("invalid team response");
        let team_id = body["team_id"].as_i64().expect("missing team_id");
        let response = self.get_with(client, "/auth/me").await;
        assert!(response.status().is_success(), "session refresh failed");
        team_id
    }
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("failed to read configuration.");
        // Different database and upload root for each test case
        c.database.database_name = Uuid::new_v4().to_string();
        c.upload.local_root =
            std::env::temp_dir().join(format!("tankobon-uploads-{}", Uuid::new_v4()));
        // A random OS port
        c.application.port = 0;
        c
    };

    let db_pool = configure_database(&configuration.database).await;

    let application = Application::build(configuration, db_pool.clone())
        .await
        .expect("failed to build application.");
    let application_port = application.port();
    tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{application_port}"),
        db_pool,
        api_client: TestApp::new_client(),
    }
}

async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("failed to migrate the database");

    connection_pool
}
