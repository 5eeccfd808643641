use crate::helpers::{spawn_app, TestUser};

/// Logging out without ever logging in succeeds
#[tokio::test]
async fn logout_is_idempotent() {
    let app = spawn_app().await;

    let response = app.post_empty("/auth/logout").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "logged out");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    assert!(app.register(&user).await.status().is_success());
    assert!(app.get("/auth/me").await.status().is_success());

    let response = app.post_empty("/auth/logout").await;
    assert!(response.status().is_success());

    let response = app.get("/auth/me").await;
    assert_eq!(response.status().as_u16(), 401);

    // Repeating the logout still succeeds
    let response = app.post_empty("/auth/logout").await;
    assert!(response.status().is_success());
}
