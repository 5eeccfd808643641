mod middleware;
mod password;

pub use middleware::validate_user_access;
pub use password::{compute_password_hash, validate_credentials, AuthenticatedUser, Credentials};
