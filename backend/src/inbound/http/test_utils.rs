//! Shared fixtures for HTTP adapter tests.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::web;

use crate::inbound::http::state::HttpState;
use crate::outbound::sheets::InMemorySpreadsheetClient;
use crate::outbound::{RoundStore, UserStore};

/// Cookie-session middleware with a throwaway key, mirroring the production
/// configuration apart from `cookie_secure`, which tests run over plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// Handler state over a fresh in-memory spreadsheet.
pub fn test_state() -> web::Data<HttpState> {
    let client = Arc::new(InMemorySpreadsheetClient::new());
    web::Data::new(HttpState::new(
        Arc::new(RoundStore::new(client.clone(), "rounds-test")),
        Arc::new(UserStore::new(client, "users-test")),
    ))
}
