use chrono::NaiveDate;
use serde::Serialize;
use tracing::trace;

use crate::pgn::{ParsedGame, parse_block};
use crate::player::UNKNOWN;
use crate::time_window::TimeWindow;

const DATE_FORMAT: &str = "%Y.%m.%d";
const WHITE_WINS: &str = "1-0";
const BLACK_WINS: &str = "0-1";
const DRAW: &str = "1/2-1/2";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub player_id: String,
    pub white: String,
    pub black: String,
    pub result: String,
    pub opening: String,
    pub time_control: String,
    pub termination: String,
    pub move_count: usize,
    pub avg_move_length: f64,
    pub moves: Vec<String>,
}

impl MatchRecord {
    /// Builds a record from one archive block. `None` when the block has no
    /// readable `Date` tag or falls outside `window`.
    pub fn from_block(block: &str, window: &TimeWindow, player_id: &str) -> Option<Self> {
        let game = parse_block(block)?;
        Self::from_game(game, window, player_id)
    }

    pub fn from_game(game: ParsedGame, window: &TimeWindow, player_id: &str) -> Option<Self> {
        let raw_date = game.header("Date").unwrap_or(UNKNOWN);
        let date = match NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                trace!(raw_date, "skipping block with unreadable date");
                return None;
            }
        };
        if !window.contains(date) {
            return None;
        }

        let header = |key: &str| game.header(key).unwrap_or(UNKNOWN).to_string();
        let white = header("White");
        let black = header("Black");
        let result = header("Result");
        let time_control = header("TimeControl");
        let termination = header("Termination");
        let opening = opening_label(game.header("ECOUrl"));

        Some(Self {
            date,
            player_id: player_id.to_string(),
            white,
            black,
            result,
            opening,
            time_control,
            termination,
            move_count: game.moves.len(),
            avg_move_length: avg_move_length(&game.moves),
            moves: game.moves,
        })
    }

    pub fn moves_text(&self) -> String {
        self.moves.join(" ")
    }
}

/// Last path segment of the ECO url, e.g. `.../openings/Kings-Pawn-Opening`.
pub fn opening_label(eco_url: Option<&str>) -> String {
    eco_url
        .and_then(|url| url.trim().trim_end_matches('/').rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn avg_move_length(moves: &[String]) -> f64 {
    if moves.is_empty() {
        return 0.0;
    }
    let total: usize = moves.iter().map(|mv| mv.chars().count()).sum();
    round2(total as f64 / moves.len() as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Parses every block, keeps the in-window ones and orders them by date.
/// Equal dates keep their fetch order.
pub fn collect_records(
    blocks: &[String],
    window: &TimeWindow,
    player_id: &str,
) -> Vec<MatchRecord> {
    let mut records = blocks
        .iter()
        .filter_map(|block| MatchRecord::from_block(block, window, player_id))
        .collect::<Vec<_>>();
    records.sort_by_key(|record| record.date);
    records
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateReport {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_percentage: f64,
}

impl AggregateReport {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let count = |token: &str| records.iter().filter(|r| r.result == token).count();
        let total = records.len();
        let wins = count(WHITE_WINS);
        let win_percentage = if total > 0 {
            wins as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            wins,
            losses: count(BLACK_WINS),
            draws: count(DRAW),
            win_percentage,
        }
    }
}
