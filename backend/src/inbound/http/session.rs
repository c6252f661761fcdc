//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting the authenticated user, reading it
//! back, and clearing it at logout. The session holds the public user fields
//! only; the password hash never enters the cookie.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, PublicUser};

pub(crate) const USER_KEY: &str = "user";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user in the session cookie.
    pub fn persist_user(&self, user: &PublicUser) -> Result<(), Error> {
        self.0
            .insert(USER_KEY, user)
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))
    }

    /// Drop all session state, returning the client to anonymous.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the current user from the session, if present.
    ///
    /// A payload that no longer deserialises is treated as an absent session
    /// rather than a server error.
    pub fn current_user(&self) -> Option<PublicUser> {
        match self.0.get::<PublicUser>(USER_KEY) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "unreadable session payload treated as anonymous");
                None
            }
        }
    }

    /// Require an authenticated user or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<PublicUser, Error> {
        self.current_user()
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
