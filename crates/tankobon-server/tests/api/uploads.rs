use crate::helpers::{spawn_app, TestUser};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n";

#[tokio::test]
async fn storing_an_upload_requires_the_permission() {
    let app = spawn_app().await;
    let user = TestUser::generate();
    assert!(app.register(&user).await.status().is_success());

    let response = app
        .api_client
        .post(format!(
            "{}/api/uploads/store?category=chapter&id=7",
            app.address
        ))
        .header("Content-Type", "image/png")
        .body(PNG_HEADER)
        .send()
        .await
        .expect("failed to execute request");

    assert_eq!(response.status().as_u16(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["required"], "upload:files");
}

#[tokio::test]
async fn uploader_can_store_and_delete_files() {
    let app = spawn_app().await;
    app.register_with_site_role(&app.api_client, "uploader")
        .await;

    let response = app
        .api_client
        .post(format!(
            "{}/api/uploads/store?category=chapter&id=7",
            app.address
        ))
        .header("Content-Type", "image/png")
        .body(PNG_HEADER)
        .send()
        .await
        .expect("failed to execute request");
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["location"], "chapter/7");

    let response = app
        .post_json(
            "/api/uploads/delete",
            &serde_json::json!({"category": "chapter", "id": 7}),
        )
        .await;
    assert!(response.status().is_success());

    // A second delete finds nothing
    let response = app
        .post_json(
            "/api/uploads/delete",
            &serde_json::json!({"category": "chapter", "id": 7}),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn disallowed_media_types_are_rejected() {
    let app = spawn_app().await;
    app.register_with_site_role(&app.api_client, "uploader")
        .await;

    let response = app
        .api_client
        .post(format!(
            "{}/api/uploads/store?category=chapter&id=7",
            app.address
        ))
        .header("Content-Type", "text/plain")
        .body("not an image")
        .send()
        .await
        .expect("failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn missing_content_type_is_rejected() {
    let app = spawn_app().await;
    app.register_with_site_role(&app.api_client, "uploader")
        .await;

    let response = app
        .api_client
        .post(format!(
            "{}/api/uploads/store?category=chapter&id=7",
            app.address
        ))
        .body(PNG_HEADER)
        .send()
        .await
        .expect("failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}
