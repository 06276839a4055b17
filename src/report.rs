use std::fmt::Write;

use crate::aggregate::{AggregateReport, MatchRecord};
use crate::time_window::TimeWindow;

pub const NO_GAMES_MESSAGE: &str = "\nNo games found for last week.";

const COLUMNS: [&str; 6] = [
    "Date",
    "White_Player",
    "Black_Player",
    "Result",
    "Opening",
    "Move_Count",
];

/// Console text for one run: the games table and the performance summary, or
/// only the no-games message when nothing survived filtering.
pub fn render_report(
    username: &str,
    window: &TimeWindow,
    records: &[MatchRecord],
    summary: &AggregateReport,
) -> String {
    if records.is_empty() {
        return NO_GAMES_MESSAGE.to_string();
    }

    let mut out = String::new();
    out.push_str("\nGames Played Last Week:\n");
    out.push_str(&render_table(records));

    let _ = write!(
        out,
        "\nPlayer {username} Performance ({}):\n",
        window.label()
    );
    let _ = writeln!(out, "Total Games: {}", summary.total);
    let _ = writeln!(
        out,
        "Wins: {}, Losses: {}, Draws: {}",
        summary.wins, summary.losses, summary.draws
    );
    let _ = write!(out, "Win Percentage: {:.2}%", summary.win_percentage);
    out
}

fn render_table(records: &[MatchRecord]) -> String {
    let rows = records
        .iter()
        .map(|record| {
            [
                record.date.format("%Y-%m-%d").to_string(),
                record.white.clone(),
                record.black.clone(),
                record.result.clone(),
                record.opening.clone(),
                record.move_count.to_string(),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = COLUMNS.map(|name| name.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &COLUMNS.map(str::to_string), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
