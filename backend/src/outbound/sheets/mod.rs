//! Spreadsheet client adapters.

mod client;
mod memory;
mod token;

pub use client::GoogleSheetsClient;
pub use memory::InMemorySpreadsheetClient;
pub use token::TokenProvider;
