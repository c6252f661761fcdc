//! Spreadsheet-backed persistence for golf rounds.
//!
//! Rounds live in one append-only sheet: a fixed 113-column header (5 summary
//! columns plus 6 detail columns for each of 18 holes) followed by one row per
//! round. Remote failures are logged and degraded to empty or skipped results
//! rather than propagated; a transient store outage must not fail request
//! handling.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{RemoteStoreError, SpreadsheetClient};
use crate::domain::round::{Round, RoundSummary, HOLES};

/// Full table range; 113 columns end at `DI`.
const DATA_RANGE: &str = "A1:DI1000";
const HEADER_RANGE: &str = "A1:DI1";

const SUMMARY_HEADERS: [&str; 5] = ["date", "player", "course", "total_score", "handicap"];

/// Store for round rows in a single spreadsheet.
pub struct RoundStore {
    client: Arc<dyn SpreadsheetClient>,
    sheet_id: String,
}

impl RoundStore {
    /// Build a store against `sheet_id`.
    pub fn new(client: Arc<dyn SpreadsheetClient>, sheet_id: impl Into<String>) -> Self {
        Self {
            client,
            sheet_id: sheet_id.into(),
        }
    }

    /// Write the fixed header row if the sheet has none yet.
    ///
    /// Idempotent; safe to call on every write path.
    pub async fn ensure_headers(&self) -> Result<(), RemoteStoreError> {
        let rows = self.client.read(&self.sheet_id, HEADER_RANGE).await?;
        if rows.first().is_some_and(|row| !row.is_empty()) {
            return Ok(());
        }
        self.client
            .update(&self.sheet_id, HEADER_RANGE, vec![header_row()])
            .await?;
        info!(sheet_id = %self.sheet_id, "round sheet header row written");
        Ok(())
    }

    /// Flatten `round` into one 113-cell row and append it.
    ///
    /// Failures are logged and swallowed; appended rows are immutable and
    /// there is no update or delete path.
    pub async fn append(&self, round: &Round) {
        if let Err(err) = self.ensure_headers().await {
            warn!(error = %err, sheet_id = %self.sheet_id, "round header bootstrap failed");
        }
        match self
            .client
            .append(&self.sheet_id, DATA_RANGE, flatten(round))
            .await
        {
            Ok(rows_written) => {
                debug!(rows_written, player = %round.player_name, "round appended");
            }
            Err(err) => {
                warn!(error = %err, sheet_id = %self.sheet_id, "failed to append round");
            }
        }
    }

    /// Load every stored round as a summary.
    ///
    /// The header row is dropped; rows with fewer than five cells are
    /// skipped; non-numeric cells parse as zero. Only the flat per-hole
    /// scores are reconstructed, never the club breakdowns. Remote failure
    /// degrades to an empty list.
    pub async fn load_all(&self) -> Vec<RoundSummary> {
        let rows = match self.client.read(&self.sheet_id, DATA_RANGE).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, sheet_id = %self.sheet_id, "failed to load rounds");
                return Vec::new();
            }
        };
        rows.iter().skip(1).filter_map(|row| parse_row(row)).collect()
    }
}

/// The fixed 113-column header: summary labels then
/// `hole{n}_{par,driver,wood_util,iron,putter,total}` for each hole.
fn header_row() -> Vec<String> {
    let mut headers: Vec<String> = SUMMARY_HEADERS.iter().map(|&h| h.to_owned()).collect();
    for hole in 1..=HOLES {
        for field in ["par", "driver", "wood_util", "iron", "putter", "total"] {
            headers.push(format!("hole{hole}_{field}"));
        }
    }
    headers
}

fn flatten(round: &Round) -> Vec<String> {
    let mut cells = vec![
        round.date.clone(),
        round.player_name.clone(),
        round.course_name.clone(),
        round.total_score.to_string(),
        round.handicap.to_string(),
    ];
    for detail in &round.detailed_scores {
        cells.push(detail.par.to_string());
        cells.push(detail.driver.to_string());
        cells.push(detail.wood_util.to_string());
        cells.push(detail.iron.to_string());
        cells.push(detail.putter.to_string());
        cells.push(detail.total.to_string());
    }
    cells
}

fn parse_row(row: &[String]) -> Option<RoundSummary> {
    if row.len() < 5 {
        return None;
    }
    let scores: Vec<i32> = row
        .iter()
        .skip(5)
        .take(HOLES)
        .map(|cell| parse_cell(cell))
        .collect();
    Some(RoundSummary {
        date: row[0].clone(),
        player_name: row[1].clone(),
        course_name: row[2].clone(),
        total_score: parse_cell(&row[3]),
        handicap: parse_cell(&row[4]),
        scores,
    })
}

/// Cell text to number with the store-wide zero fallback.
fn parse_cell(cell: &str) -> i32 {
    cell.trim().parse().unwrap_or(0)
}
