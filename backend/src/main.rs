//! Backend entry-point: reads environment configuration and starts the server.

use actix_web::cookie::{Key, SameSite};
use std::env;
use std::net::SocketAddr;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::server::{create_server, ServerConfig, SheetsConfig};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn sheets_config() -> Option<SheetsConfig> {
    let rounds_sheet_id = env::var("ROUNDS_SHEET_ID").ok()?;
    let users_sheet_id = env::var("USERS_SHEET_ID").ok()?;
    Some(SheetsConfig {
        rounds_sheet_id,
        users_sheet_id,
        token_file: env::var("SHEETS_TOKEN_FILE")
            .unwrap_or_else(|_| "token.json".into())
            .into(),
        client_id: env::var("GOOGLE_CLIENT_ID").ok(),
        client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
    })
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);
    match sheets_config() {
        Some(sheets) => config = config.with_sheets(sheets),
        None => warn!("ROUNDS_SHEET_ID/USERS_SHEET_ID unset; using the in-memory store"),
    }

    create_server(config)?.await
}
