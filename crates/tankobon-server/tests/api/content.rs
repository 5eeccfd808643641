use crate::helpers::{spawn_app, TestApp, TestUser};

#[tokio::test]
async fn moderator_can_create_content_and_the_catalog_is_public() {
    let app = spawn_app().await;
    app.register_with_site_role(&app.api_client, "moderator")
        .await;

    let response = app
        .post_json(
            "/api/content/create",
            &serde_json::json!({"title": "Berserk", "summary": "A dark fantasy"}),
        )
        .await;
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Berserk");
    let id = body["id"].as_i64().unwrap();

    // Anonymous clients can browse the catalog
    let anonymous = TestApp::new_client();
    let response = app.get_with(&anonymous, "/content").await;
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body[0]["title"], "Berserk");

    let response = app
        .get_with(&anonymous, &format!("/content/lookup?id={id}"))
        .await;
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"].as_i64(), Some(id));
}

#[tokio::test]
async fn lookup_of_a_missing_entry_is_a_404() {
    let app = spawn_app().await;

    let response = app.get("/content/lookup?id=999999").await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn crediting_a_foreign_team_is_rejected() {
    let app = spawn_app().await;
    let owner_client = TestApp::new_client();
    app.register_with_site_role(&owner_client, "moderator")
        .await;
    let team_id = app.create_team(&owner_client, "Scans").await;

    // A moderator who is not a member of the team
    app.register_with_site_role(&app.api_client, "moderator")
        .await;
    let response = app
        .post_json(
            "/api/content/create",
            &serde_json::json!({"title": "Berserk", "team_id": team_id}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn team_uploader_can_create_chapters() {
    let app = spawn_app().await;
    let owner_client = TestApp::new_client();
    app.register_with_site_role(&owner_client, "moderator")
        .await;
    let team_id = app.create_team(&owner_client, "Scans").await;
    let response = app
        .post_json_with(
            &owner_client,
            "/api/content/create",
            &serde_json::json!({"title": "Berserk", "team_id": team_id}),
        )
        .await;
    assert!(response.status().is_success());
    let content: serde_json::Value = response.json().await.unwrap();
    let content_id = content["id"].as_i64().unwrap();

    // A plain user added to the team as uploader
    let uploader = TestUser::generate();
    assert!(app.register(&uploader).await.status().is_success());
    let response = app
        .post_json_with(
            &owner_client,
            "/api/teams/member/add",
            &serde_json::json!({
                "team_id": team_id,
                "username": uploader.username,
                "role": "uploader",
            }),
        )
        .await;
    assert!(response.status().is_success());
    assert!(app.get("/auth/me").await.status().is_success());

    let response = app
        .post_json(
            "/api/content/chapter/create",
            &serde_json::json!({
                "content_id": content_id,
                "team_id": team_id,
                "number": 1,
                "title": "The Black Swordsman",
            }),
        )
        .await;
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["number"], 1);
    assert_eq!(body["content_id"].as_i64(), Some(content_id));

    // Same chapter number for the same team is rejected
    let response = app
        .post_json(
            "/api/content/chapter/create",
            &serde_json::json!({
                "content_id": content_id,
                "team_id": team_id,
                "number": 1,
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn chapter_create_without_a_team_id_is_rejected() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    assert!(app.register(&user).await.status().is_success());

    let response = app
        .post_json(
            "/api/content/chapter/create",
            &serde_json::json!({"content_id": 1, "number": 1}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn non_members_cannot_create_chapters() {
    let app = spawn_app().await;
    let owner_client = TestApp::new_client();
    app.register_with_site_role(&owner_client, "moderator")
        .await;
    let team_id = app.create_team(&owner_client, "Scans").await;
    let response = app
        .post_json_with(
            &owner_client,
            "/api/content/create",
            &serde_json::json!({"title": "Berserk", "team_id": team_id}),
        )
        .await;
    let content: serde_json::Value = response.json().await.unwrap();
    let content_id = content["id"].as_i64().unwrap();

    let outsider = TestUser::generate();
    assert!(app.register(&outsider).await.status().is_success());

    let response = app
        .post_json(
            "/api/content/chapter/create",
            &serde_json::json!({
                "content_id": content_id,
                "team_id": team_id,
                "number": 1,
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 403);
}
