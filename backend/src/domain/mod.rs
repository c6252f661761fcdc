//! Domain types and pure round/statistics logic.
//!
//! Everything in this module is transport and storage agnostic: rounds are
//! mutated in memory, statistics are computed over loaded summaries, and
//! errors carry a category plus a user-facing message. Inbound adapters map
//! [`Error`] to HTTP responses; outbound stores implement
//! [`ports::SpreadsheetClient`].

pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod round;
pub mod stats;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, RegistrationRequest, RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::round::{HoleDetail, Round, RoundSummary, HOLES};
pub use self::stats::{player_statistics, PlayerStatistics};
pub use self::user::PublicUser;
