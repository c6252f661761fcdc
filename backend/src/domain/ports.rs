//! Outbound ports for the spreadsheet-backed datastore.
//!
//! The stores only depend on this trait; adapters own transport, token
//! lifecycle, and error mapping.

use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to the remote tabular store.
///
/// Stores treat these as non-fatal: they log and degrade to empty or default
/// results instead of failing the request (availability over consistency).
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    /// The request never completed (connect, timeout, TLS, ...).
    #[error("transport failure: {0}")]
    Transport(String),
    /// The store answered with a non-success status.
    #[error("remote store returned {status}: {body}")]
    Status {
        /// HTTP status code from the store.
        status: u16,
        /// Response body text, possibly truncated.
        body: String,
    },
    /// No usable access token could be obtained.
    #[error("could not obtain an access token: {0}")]
    Token(String),
    /// The response payload did not decode.
    #[error("could not decode remote payload: {0}")]
    Decode(String),
}

/// Range-addressed access to a remote spreadsheet.
///
/// All cell values round-trip as strings; numeric fields are serialised by
/// callers on write and parsed by callers on read, tolerating non-numeric
/// content by falling back to zero.
#[async_trait]
pub trait SpreadsheetClient: Send + Sync {
    /// Read the addressed range as rows of cell text.
    ///
    /// Ragged rows are allowed; an empty store yields an empty vec.
    async fn read(&self, sheet_id: &str, range: &str)
        -> Result<Vec<Vec<String>>, RemoteStoreError>;

    /// Append one row after the existing content of the addressed table.
    ///
    /// Returns the number of rows written as reported by the store.
    async fn append(
        &self,
        sheet_id: &str,
        range: &str,
        row: Vec<String>,
    ) -> Result<u32, RemoteStoreError>;

    /// Overwrite exactly the addressed rectangular range.
    async fn update(
        &self,
        sheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), RemoteStoreError>;
}
