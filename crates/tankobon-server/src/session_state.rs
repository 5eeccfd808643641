use std::future::{ready, Ready};

use actix_session::{Session, SessionExt as _, SessionGetError, SessionInsertError};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use tankobon_shared::session::CurrentUser;

/// Typed access to the data our app stores in the session
pub struct TypedSession(Session);

impl TypedSession {
    const USER_INFO_KEY: &'static str = "user_info";

    /// Rotates the session key, retaining the state
    pub fn renew(&self) {
        self.0.renew();
    }

    pub fn insert_user_info(&self, user_info: CurrentUser) -> Result<(), SessionInsertError> {
        self.0.insert(Self::USER_INFO_KEY, user_info)
    }

    pub fn get_user_info(&self) -> Result<Option<CurrentUser>, SessionGetError> {
        self.0.get(Self::USER_INFO_KEY)
    }

    /// Removes the session both client and server side. A no-op for
    /// requests that never had a session, which keeps logout idempotent.
    pub fn log_out(self) {
        self.0.purge()
    }
}

impl FromRequest for TypedSession {
    // Same error as the implementation of `FromRequest` for `Session`
    type Error = <Session as FromRequest>::Error;
    // Wrap into `Ready` because `TypedSession` does no I/O of its own
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
