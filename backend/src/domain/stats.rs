//! Player statistics over previously stored rounds.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::round::RoundSummary;

/// How many of the most recent rounds feed the rolling average.
const RECENT_WINDOW: usize = 5;

/// Aggregate figures for one player's stored rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlayerStatistics {
    /// Player the statistics cover.
    pub player_name: String,
    /// Number of stored rounds for the player.
    pub total_rounds: usize,
    /// Mean total score across all rounds, rounded to one decimal.
    pub average_score: f64,
    /// Lowest total score.
    pub best_score: i32,
    /// Highest total score.
    pub worst_score: i32,
    /// Mean total score over the most recent `min(N, 5)` rounds in store
    /// order, rounded to one decimal. Append order is assumed chronological.
    pub recent_5_rounds_avg: f64,
}

/// Compute statistics for `player_name` over `rounds`.
///
/// Rounds are filtered by exact player-name match. `None` signals the valid
/// empty state of a player with no stored rounds; it is not an error.
pub fn player_statistics(player_name: &str, rounds: &[RoundSummary]) -> Option<PlayerStatistics> {
    let totals: Vec<i32> = rounds
        .iter()
        .filter(|round| round.player_name == player_name)
        .map(|round| round.total_score)
        .collect();
    if totals.is_empty() {
        return None;
    }

    let recent_start = totals.len().saturating_sub(RECENT_WINDOW);
    let recent = &totals[recent_start..];

    Some(PlayerStatistics {
        player_name: player_name.to_owned(),
        total_rounds: totals.len(),
        average_score: mean_to_one_decimal(&totals),
        best_score: totals.iter().copied().min().unwrap_or(0),
        worst_score: totals.iter().copied().max().unwrap_or(0),
        recent_5_rounds_avg: mean_to_one_decimal(recent),
    })
}

fn mean_to_one_decimal(values: &[i32]) -> f64 {
    let sum: i32 = values.iter().sum();
    let mean = f64::from(sum) / values.len() as f64;
    (mean * 10.0).round() / 10.0
}
