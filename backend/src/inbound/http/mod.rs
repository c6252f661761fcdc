//! HTTP adapter: handlers, session helpers, and the domain-error mapping.

pub mod auth;
pub mod error;
pub mod health;
pub mod rounds;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod test_utils;

pub use self::error::ApiResult;
pub use self::session::SessionContext;
pub use self::state::HttpState;
