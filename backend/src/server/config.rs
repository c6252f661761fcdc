//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Google Sheets connection settings.
///
/// Both sheet ids are required together; the token file may hold either a
/// long-lived static token or a refresh token with its client credentials.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet holding the round rows.
    pub rounds_sheet_id: String,
    /// Spreadsheet holding the `Member` sheet.
    pub users_sheet_id: String,
    /// Path to the stored OAuth token JSON.
    pub token_file: PathBuf,
    /// OAuth client id, for refresh-token flows.
    pub client_id: Option<String>,
    /// OAuth client secret, for refresh-token flows.
    pub client_secret: Option<String>,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) sheets: Option<SheetsConfig>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            sheets: None,
        }
    }

    /// Attach Google Sheets settings. Without them the server runs against an
    /// in-memory spreadsheet that forgets everything on restart.
    #[must_use]
    pub fn with_sheets(mut self, sheets: SheetsConfig) -> Self {
        self.sheets = Some(sheets);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
