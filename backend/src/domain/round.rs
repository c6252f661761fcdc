//! Golf round aggregate and per-hole scoring operations.
//!
//! A [`Round`] is built in memory hole by hole, finalised by
//! [`Round::compute_handicap`], and then appended to the round store as one
//! flat row. Rows are immutable once appended; there is no update or delete
//! path.

use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of holes in a regulation round. All storage layouts assume this.
pub const HOLES: usize = 18;

/// Default par used until a course-specific value is recorded.
const DEFAULT_PAR: i32 = 4;

/// Per-hole stroke breakdown by club category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HoleDetail {
    /// Par for the hole.
    pub par: i32,
    /// Strokes played with the driver.
    pub driver: i32,
    /// Strokes played with woods or utility clubs.
    pub wood_util: i32,
    /// Strokes played with irons.
    pub iron: i32,
    /// Putts.
    pub putter: i32,
    /// Sum of the four club categories.
    pub total: i32,
}

impl Default for HoleDetail {
    fn default() -> Self {
        Self {
            par: DEFAULT_PAR,
            driver: 0,
            wood_util: 0,
            iron: 0,
            putter: 0,
            total: DEFAULT_PAR,
        }
    }
}

/// One 18-hole outing for a single player.
///
/// ## Invariants
/// - `total_score == scores.iter().sum()` after every mutation.
/// - When a hole has a detailed score, `scores[i] == detailed_scores[i].total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Round {
    /// Round date, `YYYY-MM-DD`.
    pub date: String,
    /// Player the round belongs to.
    pub player_name: String,
    /// Course the round was played on.
    pub course_name: String,
    /// Hole count; fixed at 18.
    pub holes: usize,
    /// Simple per-hole scores, one entry per hole.
    pub scores: Vec<i32>,
    /// Per-hole club breakdowns, one entry per hole.
    pub detailed_scores: Vec<HoleDetail>,
    /// Sum of all per-hole scores.
    pub total_score: i32,
    /// Par for each hole.
    pub par_scores: Vec<i32>,
    /// Simplified handicap: strokes over total par, floored at zero.
    pub handicap: i32,
}

impl Round {
    /// Start a fresh round with zeroed scores and default par-4 holes.
    ///
    /// `date` defaults to today's local date when `None`.
    pub fn new(player_name: impl Into<String>, course_name: impl Into<String>, date: Option<String>) -> Self {
        let date = date.unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());
        Self {
            date,
            player_name: player_name.into(),
            course_name: course_name.into(),
            holes: HOLES,
            scores: vec![0; HOLES],
            detailed_scores: vec![HoleDetail::default(); HOLES],
            total_score: 0,
            par_scores: vec![DEFAULT_PAR; HOLES],
            handicap: 0,
        }
    }

    /// Record a simple score for a 1-based hole number.
    ///
    /// A hole number outside `1..=holes` is a silent no-op; the permissive
    /// bounds policy is part of the contract, not an oversight.
    pub fn set_score(&mut self, hole: usize, score: i32) {
        if (1..=self.holes).contains(&hole) {
            self.scores[hole - 1] = score;
            self.total_score = sum_saturating(&self.scores);
        }
    }

    /// Record a detailed score for a 1-based hole number.
    ///
    /// The detail total is mirrored into the simple score for the same hole.
    /// Out-of-range hole numbers are a silent no-op, as with
    /// [`Round::set_score`].
    pub fn set_detailed_score(
        &mut self,
        hole: usize,
        par: i32,
        driver: i32,
        wood_util: i32,
        iron: i32,
        putter: i32,
    ) {
        if (1..=self.holes).contains(&hole) {
            // Saturating sums: stroke counts arrive unvalidated from clients.
            let total = sum_saturating(&[driver, wood_util, iron, putter]);
            self.detailed_scores[hole - 1] = HoleDetail {
                par,
                driver,
                wood_util,
                iron,
                putter,
                total,
            };
            self.scores[hole - 1] = total;
            self.total_score = sum_saturating(&self.scores);
        }
    }

    /// Compute, store, and return the handicap:
    /// `max(0, total_score - sum(par_scores))`.
    pub fn compute_handicap(&mut self) -> i32 {
        let total_par = sum_saturating(&self.par_scores);
        self.handicap = self.total_score.saturating_sub(total_par).max(0);
        self.handicap
    }
}

fn sum_saturating(values: &[i32]) -> i32 {
    values.iter().copied().fold(0, i32::saturating_add)
}

/// Round shape reconstructed from a persisted row.
///
/// Only the flat per-hole scores survive a reload; the club breakdowns are
/// persisted but not read back. Stores return this shape, and statistics are
/// computed over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoundSummary {
    /// Round date as stored, `YYYY-MM-DD`.
    pub date: String,
    /// Player the round belongs to.
    pub player_name: String,
    /// Course the round was played on.
    pub course_name: String,
    /// Total strokes for the round.
    pub total_score: i32,
    /// Handicap recorded when the round was appended.
    pub handicap: i32,
    /// Simple per-hole scores for holes 1 to 18.
    pub scores: Vec<i32>,
}
