use crate::helpers::{spawn_app, TestApp, TestUser};

#[tokio::test]
async fn user_list_requires_the_admin_role() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    assert!(app.register(&user).await.status().is_success());

    let response = app.get("/api/admin/user/list").await;

    assert_eq!(response.status().as_u16(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["required"], "admin",
        "the response should name the missing role"
    );
}

#[tokio::test]
async fn admin_can_list_users() {
    let app = spawn_app().await;
    let other = TestUser::generate();
    assert!(
        app.register_with(&TestApp::new_client(), &other)
            .await
            .status()
            .is_success()
    );
    let admin = app.register_with_site_role(&app.api_client, "admin").await;

    let response = app.get("/api/admin/user/list").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    let usernames: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["username"].as_str().unwrap())
        .collect();
    assert!(usernames.contains(&other.username.as_str()));
    assert!(usernames.contains(&admin.username.as_str()));
}

#[tokio::test]
async fn admin_can_change_a_users_role() {
    let app = spawn_app().await;
    let target_client = TestApp::new_client();
    let target = TestUser::generate();
    assert!(
        app.register_with(&target_client, &target)
            .await
            .status()
            .is_success()
    );
    app.register_with_site_role(&app.api_client, "admin").await;

    let response = app
        .post_json(
            "/api/admin/user/role",
            &serde_json::json!({"username": target.username, "role": "uploader"}),
        )
        .await;
    assert!(response.status().is_success());

    // The target picks the new role up through read-repair
    let response = app.get_with(&target_client, "/auth/me").await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["role"], "uploader");
}

#[tokio::test]
async fn role_update_for_an_unknown_user_is_a_404() {
    let app = spawn_app().await;
    app.register_with_site_role(&app.api_client, "admin").await;

    let response = app
        .post_json(
            "/api/admin/user/role",
            &serde_json::json!({"username": "nobody-here", "role": "uploader"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn permission_grant_unlocks_the_gated_endpoint() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    assert!(app.register(&user).await.status().is_success());

    // Without the grant the permission-gated endpoint refuses
    let response = app
        .post_json(
            "/api/content/create",
            &serde_json::json!({"title": "One Piece"}),
        )
        .await;
    assert_eq!(response.status().as_u16(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["required"], "create:content");

    let admin_client = TestApp::new_client();
    app.register_with_site_role(&admin_client, "admin").await;
    let response = app
        .post_json_with(
            &admin_client,
            "/api/admin/user/permission",
            &serde_json::json!({"username": user.username, "permission": "create:content"}),
        )
        .await;
    assert!(response.status().is_success());

    // Per-user grants apply immediately, no session refresh needed
    let response = app
        .post_json(
            "/api/content/create",
            &serde_json::json!({"title": "One Piece"}),
        )
        .await;
    assert!(response.status().is_success());
}
