//! Spreadsheet-backed credential store.
//!
//! Users live in a six-column `Member` sheet. Rows are append-only with one
//! mutable exception: `last_login` is updated in place after a successful
//! authentication. All uniqueness and lookup logic is linear-scan
//! application logic; the underlying store enforces nothing.

use std::sync::Arc;

use chrono::Local;
use rand::RngCore;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::auth::{LoginCredentials, RegistrationRequest};
use crate::domain::password::{hash_password, verify_password};
use crate::domain::ports::{RemoteStoreError, SpreadsheetClient};
use crate::domain::user::PublicUser;

const DATA_RANGE: &str = "Member!A1:F1000";
const HEADER_RANGE: &str = "Member!A1:F1";

const HEADERS: [&str; 6] = [
    "user_id",
    "username",
    "email",
    "password_hash",
    "created_at",
    "last_login",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Registration failure.
///
/// The duplicate checks and the append are separate round-trips with no lock,
/// so two concurrent registrations with the same username can both succeed.
/// That race is a documented property of the store, not something this module
/// papers over.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Another row already carries this username (case-sensitive match).
    #[error("username already registered")]
    DuplicateUsername,
    /// Another row already carries this email (case-sensitive match).
    #[error("email already registered")]
    DuplicateEmail,
    /// The append itself failed; the user was not created.
    #[error(transparent)]
    Store(#[from] RemoteStoreError),
}

/// Authentication failure. Unknown username and wrong password collapse into
/// one variant so responses cannot enumerate accounts.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No row matched, or the password hash did not verify.
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// One full row of the `Member` sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// 128-bit random identifier, hex-encoded.
    pub user_id: String,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Stored `salt:digest` password hash. Never leaves the store layer.
    pub password_hash: String,
    /// Creation timestamp, `%Y-%m-%d %H:%M:%S`.
    pub created_at: String,
    /// Last successful login timestamp; empty until the first login.
    pub last_login: String,
}

impl UserRecord {
    fn public(&self) -> PublicUser {
        PublicUser {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Store for user rows in the `Member` sheet.
pub struct UserStore {
    client: Arc<dyn SpreadsheetClient>,
    sheet_id: String,
}

impl UserStore {
    /// Build a store against `sheet_id`.
    pub fn new(client: Arc<dyn SpreadsheetClient>, sheet_id: impl Into<String>) -> Self {
        Self {
            client,
            sheet_id: sheet_id.into(),
        }
    }

    /// Write the fixed six-column header if the sheet has none yet.
    /// Idempotent.
    pub async fn ensure_headers(&self) -> Result<(), RemoteStoreError> {
        let rows = self.client.read(&self.sheet_id, HEADER_RANGE).await?;
        if rows.first().is_some_and(|row| !row.is_empty()) {
            return Ok(());
        }
        let header = HEADERS.iter().map(|&h| h.to_owned()).collect();
        self.client
            .update(&self.sheet_id, HEADER_RANGE, vec![header])
            .await?;
        info!(sheet_id = %self.sheet_id, "member sheet header row written");
        Ok(())
    }

    /// Create a new user row and return its generated id.
    ///
    /// Username and email must not match any existing row (case-sensitive
    /// exact match, checked by linear scan before the append).
    pub async fn register(&self, request: &RegistrationRequest) -> Result<String, RegistrationError> {
        if let Err(err) = self.ensure_headers().await {
            warn!(error = %err, sheet_id = %self.sheet_id, "member header bootstrap failed");
        }
        if self.by_username(request.username()).await.is_some() {
            return Err(RegistrationError::DuplicateUsername);
        }
        if self.by_email(request.email()).await.is_some() {
            return Err(RegistrationError::DuplicateEmail);
        }

        let user_id = generate_user_id();
        let created_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let row = vec![
            user_id.clone(),
            request.username().to_owned(),
            request.email().to_owned(),
            hash_password(request.password()),
            created_at,
            String::new(),
        ];
        self.client.append(&self.sheet_id, DATA_RANGE, row).await?;
        info!(username = %request.username(), "user registered");
        Ok(user_id)
    }

    /// Verify credentials and return the public user fields.
    ///
    /// Lookup is by username only; an email supplied in the username field
    /// does not resolve. On success `last_login` is stamped in place; a
    /// failure to stamp it is logged and does not fail the login.
    pub async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<PublicUser, AuthError> {
        let Some(user) = self.by_username(credentials.username()).await else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(credentials.password(), &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        self.update_last_login(&user.user_id).await;
        Ok(user.public())
    }

    /// First row matching `username`, if any.
    pub async fn by_username(&self, username: &str) -> Option<UserRecord> {
        self.scan(|record| record.username == username).await
    }

    /// First row matching `email`, if any.
    pub async fn by_email(&self, email: &str) -> Option<UserRecord> {
        self.scan(|record| record.email == email).await
    }

    /// First row matching `user_id`, if any.
    pub async fn by_id(&self, user_id: &str) -> Option<UserRecord> {
        self.scan(|record| record.user_id == user_id).await
    }

    /// Public fields for every stored user.
    pub async fn all_users(&self) -> Vec<PublicUser> {
        self.rows()
            .await
            .iter()
            .skip(1)
            .filter_map(|row| parse_row(row))
            .map(|record| record.public())
            .collect()
    }

    /// Full-range read degraded to empty on remote failure.
    async fn rows(&self) -> Vec<Vec<String>> {
        match self.client.read(&self.sheet_id, DATA_RANGE).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, sheet_id = %self.sheet_id, "failed to load member rows");
                Vec::new()
            }
        }
    }

    /// Linear scan over data rows, first match wins.
    async fn scan(&self, matches: impl Fn(&UserRecord) -> bool) -> Option<UserRecord> {
        self.rows()
            .await
            .iter()
            .skip(1)
            .filter_map(|row| parse_row(row))
            .find(|record| matches(record))
    }

    /// Stamp `last_login` for `user_id` with a single-cell update.
    async fn update_last_login(&self, user_id: &str) {
        let rows = self.rows().await;
        // Sheet rows are 1-based and row 1 is the header.
        let Some(sheet_row) = rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| row.first().map(String::as_str) == Some(user_id))
            .map(|(index, _)| index + 1)
        else {
            warn!(user_id, "user row vanished before last_login update");
            return;
        };
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let range = format!("Member!F{sheet_row}");
        match self
            .client
            .update(&self.sheet_id, &range, vec![vec![stamp]])
            .await
        {
            Ok(()) => debug!(user_id, "last_login updated"),
            Err(err) => warn!(error = %err, user_id, "failed to update last_login"),
        }
    }
}

/// 128-bit random identifier, hex-encoded.
fn generate_user_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Map one sheet row onto a record. Rows with fewer than four cells are
/// skipped; missing timestamps read back as empty strings.
fn parse_row(row: &[String]) -> Option<UserRecord> {
    if row.len() < 4 {
        return None;
    }
    Some(UserRecord {
        user_id: row[0].clone(),
        username: row[1].clone(),
        email: row[2].clone(),
        password_hash: row[3].clone(),
        created_at: row.get(4).cloned().unwrap_or_default(),
        last_login: row.get(5).cloned().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::sheets::InMemorySpreadsheetClient;

    fn store() -> (Arc<InMemorySpreadsheetClient>, UserStore) {
        let client = Arc::new(InMemorySpreadsheetClient::new());
        let store = UserStore::new(client.clone(), "users-sheet");
        (client, store)
    }

    fn registration(username: &str, email: &str) -> RegistrationRequest {
        RegistrationRequest::try_from_parts(username, email, "secret1").expect("valid registration")
    }

    fn login(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("valid credentials")
    }

    #[tokio::test]
    async fn register_creates_a_row_with_hex_id_and_empty_last_login() {
        let (client, store) = store();
        let user_id = store
            .register(&registration("alice", "alice@x.com"))
            .await
            .expect("registration succeeds");
        assert_eq!(user_id.len(), 32);
        assert!(user_id.bytes().all(|b| b.is_ascii_hexdigit()));

        let rows = client.read("users-sheet", DATA_RANGE).await.expect("read");
        assert_eq!(rows.len(), 2);
        let row = &rows[1];
        assert_eq!(row[0], user_id);
        assert_eq!(row[1], "alice");
        assert_eq!(row[2], "alice@x.com");
        assert!(row[3].contains(':'));
        // last_login is empty, so the remote representation drops the cell.
        assert_eq!(row.len(), 5);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (_, store) = store();
        store
            .register(&registration("alice", "alice@x.com"))
            .await
            .expect("first registration");
        let err = store
            .register(&registration("alice", "other@x.com"))
            .await
            .expect_err("duplicate username");
        assert!(matches!(err, RegistrationError::DuplicateUsername));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_for_a_new_username() {
        let (_, store) = store();
        store
            .register(&registration("alice", "alice@x.com"))
            .await
            .expect("first registration");
        let err = store
            .register(&registration("bob", "alice@x.com"))
            .await
            .expect_err("duplicate email");
        assert!(matches!(err, RegistrationError::DuplicateEmail));
    }

    #[tokio::test]
    async fn duplicate_checks_are_case_sensitive() {
        let (_, store) = store();
        store
            .register(&registration("alice", "alice@x.com"))
            .await
            .expect("first registration");
        store
            .register(&registration("Alice", "Alice@x.com"))
            .await
            .expect("different case is a different identity");
    }

    #[tokio::test]
    async fn authenticate_returns_public_fields_and_stamps_last_login() {
        let (_, store) = store();
        let user_id = store
            .register(&registration("alice", "alice@x.com"))
            .await
            .expect("registration");

        let user = store
            .authenticate(&login("alice", "secret1"))
            .await
            .expect("login succeeds");
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@x.com");

        let record = store.by_id(&user_id).await.expect("record present");
        assert!(!record.last_login.is_empty());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_identically() {
        let (_, store) = store();
        store
            .register(&registration("alice", "alice@x.com"))
            .await
            .expect("registration");

        let wrong_password = store
            .authenticate(&login("alice", "wrong"))
            .await
            .expect_err("wrong password");
        let unknown_user = store
            .authenticate(&login("mallory", "secret1"))
            .await
            .expect_err("unknown user");
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn email_in_the_username_field_does_not_resolve() {
        // Lookup is wired to username only; this mirrors the observed
        // behaviour of the store rather than fixing it.
        let (_, store) = store();
        store
            .register(&registration("alice", "alice@x.com"))
            .await
            .expect("registration");
        let err = store
            .authenticate(&login("alice@x.com", "secret1"))
            .await
            .expect_err("email login is not wired");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn lookups_return_the_first_matching_row() {
        let (client, store) = store();
        store.ensure_headers().await.expect("bootstrap");
        for suffix in ["first", "second"] {
            client
                .append(
                    "users-sheet",
                    DATA_RANGE,
                    vec![
                        format!("id-{suffix}"),
                        "dup".into(),
                        format!("{suffix}@x.com"),
                        "salt:hash".into(),
                    ],
                )
                .await
                .expect("append");
        }
        let record = store.by_username("dup").await.expect("record found");
        assert_eq!(record.user_id, "id-first");
    }

    #[tokio::test]
    async fn short_rows_are_skipped_and_hashes_stay_internal() {
        let (client, store) = store();
        store.ensure_headers().await.expect("bootstrap");
        client
            .append("users-sheet", DATA_RANGE, vec!["only-id".into()])
            .await
            .expect("short row");
        store
            .register(&registration("alice", "alice@x.com"))
            .await
            .expect("registration");

        let users = store.all_users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
        let serialised = serde_json::to_string(&users[0]).expect("serialise");
        assert!(!serialised.contains("password"));
    }
}
