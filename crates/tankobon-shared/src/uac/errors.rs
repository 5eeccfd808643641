use actix_web::{http::StatusCode, HttpResponse};

use crate::{errors::message_response, id::DbId};

use super::{Permission, Role};

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid Email or Password")]
    InvalidEmailOrPassword,
    #[error("Unexpected Error")]
    UnexpectedError(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum RegisterError {
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Email is already registered")]
    EmailTaken,
    #[error("{0}")]
    InvalidField(#[from] crate::errors::ConversionError),
    #[error("Unexpected Error")]
    UnexpectedError(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum PermissionsError {
    #[error("role {required} is required to access this endpoint")]
    MissingRole { required: Role },
    #[error("permission {required} is required to access this endpoint")]
    MissingPermission { required: Permission },
    #[error("you are not a member of team {team_id}")]
    NotATeamMember { team_id: DbId },
    #[error("team role {required} is required in team {team_id}")]
    InsufficientTeamRole { team_id: DbId, required: Role },
    #[error("unable to find an access requirement for this path '{0}'")]
    PathNotFound(String),
}

impl actix_web::error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidEmailOrPassword => StatusCode::UNAUTHORIZED,
            AuthError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        message_response(self.status_code(), &self.to_string())
    }
}

impl actix_web::error::ResponseError for RegisterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegisterError::UsernameTaken
            | RegisterError::EmailTaken
            | RegisterError::InvalidField(_) => StatusCode::BAD_REQUEST,
            RegisterError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        message_response(self.status_code(), &self.to_string())
    }
}

impl actix_web::error::ResponseError for PermissionsError {
    fn status_code(&self) -> StatusCode {
        match self {
            PermissionsError::MissingRole { .. }
            | PermissionsError::MissingPermission { .. }
            | PermissionsError::NotATeamMember { .. }
            | PermissionsError::InsufficientTeamRole { .. } => StatusCode::FORBIDDEN,
            PermissionsError::PathNotFound(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // 403 responses name the missing capability so clients can show it
        let required = match self {
            PermissionsError::MissingRole { required } => Some(required.to_string()),
            PermissionsError::MissingPermission { required } => Some(required.to_string()),
            PermissionsError::InsufficientTeamRole { required, .. } => Some(required.to_string()),
            PermissionsError::NotATeamMember { .. } | PermissionsError::PathNotFound(_) => None,
        };
        match required {
            Some(required) => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "message": self.to_string(),
                "required": required,
            })),
            None => message_response(self.status_code(), &self.to_string()),
        }
    }
}
