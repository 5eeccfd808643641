mod admin;
mod auth;
mod content;
mod health_check;
mod teams;
mod uploads;

pub use admin::user::{admin_user_list, admin_user_permission_grant, admin_user_role_update};
pub use auth::{log_out, login, me, register};
pub use content::{chapter_create, content_create, content_list, content_lookup};
pub use health_check::health_check;
pub use teams::{team_create, team_member_add, team_member_remove, teams_mine};
pub use uploads::{upload_delete, upload_store};

pub async fn not_found(req: actix_web::HttpRequest) -> actix_web::HttpResponse {
    tracing::error!("no route matched {} {:?}", req.method(), req.path());
    tankobon_shared::errors::message_response(
        actix_web::http::StatusCode::NOT_FOUND,
        &format!("no route for {} {:?}", req.method(), req.path()),
    )
}
