//! HTTP server assembly.
//!
//! Dependencies are built here and injected into the app explicitly; handlers
//! receive their stores through [`HttpState`] rather than module globals, so
//! tests can assemble the same app over an in-memory spreadsheet.

mod config;

pub use config::{ServerConfig, SheetsConfig};

use std::sync::Arc;
use std::time::Duration;

use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use tracing::warn;

use crate::domain::ports::SpreadsheetClient;
use crate::inbound::http::auth::{check, login, logout, me, register};
use crate::inbound::http::health::health;
use crate::inbound::http::rounds::{create_round, list_rounds, statistics};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::sheets::{GoogleSheetsClient, InMemorySpreadsheetClient, TokenProvider};
use crate::outbound::{RoundStore, UserStore};

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;

const TOKEN_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the spreadsheet client from configuration.
///
/// Falls back to the in-memory client when no Sheets settings are present,
/// with a warning, so a development server runs without credentials.
fn build_spreadsheet_client(config: &ServerConfig) -> std::io::Result<Arc<dyn SpreadsheetClient>> {
    match &config.sheets {
        Some(sheets) => {
            let http = reqwest::Client::builder()
                .timeout(TOKEN_HTTP_TIMEOUT)
                .build()
                .map_err(std::io::Error::other)?;
            let tokens = TokenProvider::new(
                http,
                &sheets.token_file,
                sheets.client_id.clone(),
                sheets.client_secret.clone(),
            );
            let client = GoogleSheetsClient::new(tokens)
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            Ok(Arc::new(client))
        }
        None => {
            warn!("no sheets configuration; rounds and users are stored in memory only");
            Ok(Arc::new(InMemorySpreadsheetClient::new()))
        }
    }
}

fn build_http_state(config: &ServerConfig, client: Arc<dyn SpreadsheetClient>) -> web::Data<HttpState> {
    let (rounds_id, users_id) = match &config.sheets {
        Some(sheets) => (sheets.rounds_sheet_id.clone(), sheets.users_sheet_id.clone()),
        None => ("rounds".to_owned(), "users".to_owned()),
    };
    web::Data::new(HttpState::new(
        Arc::new(RoundStore::new(client.clone(), rounds_id)),
        Arc::new(UserStore::new(client, users_id)),
    ))
}

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .build();

    let api = web::scope("/api")
        .wrap(session)
        .service(health)
        .service(register)
        .service(login)
        .service(logout)
        .service(me)
        .service(check)
        .service(list_rounds)
        .service(create_round)
        .service(statistics);

    let app = App::new().app_data(http_state).wrap(Trace).service(api);

    #[cfg(debug_assertions)]
    let app = app.route(
        "/api-docs/openapi.json",
        web::get().to(|| async { web::Json(ApiDoc::openapi()) }),
    );

    app
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the outbound client cannot be built or
/// the socket cannot be bound.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let client = build_spreadsheet_client(&config)?;
    let http_state = build_http_state(&config, client);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        sheets: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
