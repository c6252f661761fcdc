//! Domain user identity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User fields safe to return to clients and to keep in the session.
///
/// The password hash never leaves the user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicUser {
    /// 128-bit random identifier, hex-encoded.
    pub user_id: String,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
}
