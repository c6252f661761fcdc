//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data`; the stores are
//! constructed explicitly at startup and injected here, never reached through
//! module globals.

use std::sync::Arc;

use crate::outbound::{RoundStore, UserStore};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Round persistence.
    pub rounds: Arc<RoundStore>,
    /// Credential persistence.
    pub users: Arc<UserStore>,
}

impl HttpState {
    /// Bundle the two stores for injection into handlers.
    pub fn new(rounds: Arc<RoundStore>, users: Arc<UserStore>) -> Self {
        Self { rounds, users }
    }
}
