//! Backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by the debug docs route and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
