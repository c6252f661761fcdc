//! In-memory spreadsheet fixture.
//!
//! Backs the stores in tests and when no sheet ids are configured. Ranges use
//! the same A1 notation as the remote store; a `Sheet!` prefix is accepted and
//! ignored because each logical sheet is addressed by its id.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{RemoteStoreError, SpreadsheetClient};

/// Grid-per-sheet fixture guarded by a process-local mutex.
///
/// The mutex only makes the fixture `Sync`; like the remote store, it offers
/// no cross-request transactionality.
#[derive(Default)]
pub struct InMemorySpreadsheetClient {
    sheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

impl InMemorySpreadsheetClient {
    /// Create an empty fixture.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpreadsheetClient for InMemorySpreadsheetClient {
    async fn read(
        &self,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, RemoteStoreError> {
        let sheets = self.sheets.lock().expect("sheets lock poisoned");
        let Some(grid) = sheets.get(sheet_id) else {
            return Ok(Vec::new());
        };
        let (start, end) = parse_range(range);
        let last_row = end
            .map(|(row, _)| row.min(grid.len().saturating_sub(1)))
            .unwrap_or(grid.len().saturating_sub(1));
        let mut rows = Vec::new();
        for grid_row in grid.iter().take(last_row + 1).skip(start.0) {
            let last_col = end
                .map(|(_, col)| col.min(grid_row.len().saturating_sub(1)))
                .unwrap_or(grid_row.len().saturating_sub(1));
            let mut cells: Vec<String> = grid_row
                .iter()
                .take(last_col + 1)
                .skip(start.1)
                .cloned()
                .collect();
            // The remote store omits trailing empty cells.
            while cells.last().is_some_and(|cell| cell.is_empty()) {
                cells.pop();
            }
            rows.push(cells);
        }
        // ... and trailing empty rows.
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn append(
        &self,
        sheet_id: &str,
        _range: &str,
        row: Vec<String>,
    ) -> Result<u32, RemoteStoreError> {
        let mut sheets = self.sheets.lock().expect("sheets lock poisoned");
        sheets.entry(sheet_id.to_owned()).or_default().push(row);
        Ok(1)
    }

    async fn update(
        &self,
        sheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), RemoteStoreError> {
        let mut sheets = self.sheets.lock().expect("sheets lock poisoned");
        let grid = sheets.entry(sheet_id.to_owned()).or_default();
        let (start, _) = parse_range(range);
        for (offset, cells) in rows.into_iter().enumerate() {
            let row_index = start.0 + offset;
            if grid.len() <= row_index {
                grid.resize(row_index + 1, Vec::new());
            }
            let grid_row = &mut grid[row_index];
            let needed = start.1 + cells.len();
            if grid_row.len() < needed {
                grid_row.resize(needed, String::new());
            }
            for (col_offset, cell) in cells.into_iter().enumerate() {
                grid_row[start.1 + col_offset] = cell;
            }
        }
        Ok(())
    }
}

/// Parse an A1 range like `A1:F1000`, `Member!F3`, or `A1` into zero-based
/// `(row, column)` coordinates. Unparseable parts default to the origin.
fn parse_range(range: &str) -> ((usize, usize), Option<(usize, usize)>) {
    let cells = range.rsplit('!').next().unwrap_or(range);
    match cells.split_once(':') {
        Some((start, end)) => (parse_cell(start), Some(parse_cell(end))),
        None => (parse_cell(cells), Some(parse_cell(cells))),
    }
}

fn parse_cell(cell: &str) -> (usize, usize) {
    let letters: String = cell.chars().take_while(char::is_ascii_alphabetic).collect();
    let digits: String = cell.chars().skip_while(char::is_ascii_alphabetic).collect();
    let col = letters
        .chars()
        .fold(0usize, |acc, ch| {
            acc * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1)
        })
        .saturating_sub(1);
    let row = digits.parse::<usize>().unwrap_or(1).saturating_sub(1);
    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A1", (0, 0))]
    #[case("F3", (2, 5))]
    #[case("DI1", (0, 112))]
    #[case("Z1000", (999, 25))]
    fn parses_a1_cells(#[case] cell: &str, #[case] expected: (usize, usize)) {
        assert_eq!(parse_cell(cell), expected);
    }

    #[test]
    fn sheet_prefix_is_ignored() {
        let (start, end) = parse_range("Member!A1:F1000");
        assert_eq!(start, (0, 0));
        assert_eq!(end, Some((999, 5)));
    }

    #[tokio::test]
    async fn empty_sheet_reads_as_empty() {
        let client = InMemorySpreadsheetClient::new();
        let rows = client.read("s", "A1:F1000").await.expect("read");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn update_then_read_round_trips_the_header() {
        let client = InMemorySpreadsheetClient::new();
        client
            .update("s", "A1:C1", vec![vec!["a".into(), "b".into(), "c".into()]])
            .await
            .expect("update");
        let rows = client.read("s", "A1:C1").await.expect("read");
        assert_eq!(rows, vec![vec!["a", "b", "c"]]);
    }

    #[tokio::test]
    async fn append_adds_after_existing_content() {
        let client = InMemorySpreadsheetClient::new();
        client
            .update("s", "A1:B1", vec![vec!["h1".into(), "h2".into()]])
            .await
            .expect("update");
        client
            .append("s", "A1:B1000", vec!["x".into(), "y".into()])
            .await
            .expect("append");
        let rows = client.read("s", "A1:B1000").await.expect("read");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["x", "y"]);
    }

    #[tokio::test]
    async fn single_cell_update_grows_the_row() {
        let client = InMemorySpreadsheetClient::new();
        client
            .append("s", "A1:F1000", vec!["id".into(), "user".into()])
            .await
            .expect("append");
        client
            .update("s", "F1", vec![vec!["stamp".into()]])
            .await
            .expect("update");
        let rows = client.read("s", "A1:F1000").await.expect("read");
        assert_eq!(rows[0].len(), 6);
        assert_eq!(rows[0][5], "stamp");
    }

    #[tokio::test]
    async fn read_clips_to_the_requested_range() {
        let client = InMemorySpreadsheetClient::new();
        for i in 0..3 {
            client
                .append("s", "A1:B1000", vec![format!("r{i}"), "x".into()])
                .await
                .expect("append");
        }
        let rows = client.read("s", "A1:B1").await.expect("read");
        assert_eq!(rows, vec![vec!["r0", "x"]]);
    }

    #[tokio::test]
    async fn trailing_empty_cells_are_trimmed() {
        let client = InMemorySpreadsheetClient::new();
        client
            .append("s", "A1:C1000", vec!["a".into(), String::new(), String::new()])
            .await
            .expect("append");
        let rows = client.read("s", "A1:C1000").await.expect("read");
        assert_eq!(rows, vec![vec!["a"]]);
    }
}
