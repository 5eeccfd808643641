use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, FromRequest as _, HttpMessage as _,
};
use sqlx::PgPool;
use tankobon_shared::{
    e500,
    errors::NotLoggedInError,
    session::CurrentUser,
    uac::{required_access, role_grants, AccessReq, PermissionsError},
};

use crate::{identity::has_user_permission, session_state::TypedSession};

/// Rejects requests that are not logged in or do not meet the access
/// requirement registered for the path. On success the resolved identity is
/// inserted into the request extensions for handlers to extract.
pub async fn validate_user_access(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let session = {
        let (http_request, payload) = req.parts_mut();
        TypedSession::from_request(http_request, payload).await
    }?;
    let user = resolve_session_user(session)?;
    check_access(&req, &user).await?;
    tracing::info!("validated request for {:?}", user.username.as_ref());
    req.extensions_mut().insert(user);
    next.call(req).await
}

fn resolve_session_user(session: TypedSession) -> Result<CurrentUser, actix_web::Error> {
    match session.get_user_info() {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(NotLoggedInError.into()),
        Err(e) => {
            // An unreadable payload would otherwise fail every request
            // carrying this cookie until the TTL expires
            session.log_out();
            Err(e500(e))
        }
    }
}


async fn check_access(req: &ServiceRequest, user: &CurrentUser) -> Result<(), actix_web::Error> {
    let path = req.path();
    let Some(requirement) = required_access(path) else {
        tracing::error!("no access requirement registered for {path:?}");
        return Err(PermissionsError::PathNotFound(path.to_string()).into());
    };
    match requirement {
        AccessReq::LoggedIn => Ok(()),
        AccessReq::MinRole(required) => {
            if user.role.meets(required) {
                Ok(())
            } else {
                Err(PermissionsError::MissingRole { required }.into())
            }
        }
        AccessReq::Permission(required) => {
            if role_grants(user.role, required) {
                return Ok(());
            }
            // The role table said no, check per-user grants
            let pool = req
                .app_data::<web::Data<PgPool>>()
                .ok_or_else(|| e500("database pool missing from app data"))?;
            if has_user_permission(pool, user.user_id, required)
                .await
                .map_err(e500)?
            {
                Ok(())
            } else {
                Err(PermissionsError::MissingPermission { required }.into())
            }
        }
    }
}
