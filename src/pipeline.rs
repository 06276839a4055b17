use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::aggregate::{AggregateReport, MatchRecord, collect_records};
use crate::config::PipelineConfig;
use crate::http_client::HttpSource;
use crate::match_fetch::fetch_match_blocks;
use crate::player::resolve_player_id;
use crate::report::render_report;
use crate::time_window::TimeWindow;

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReport {
    pub username: String,
    pub player_id: String,
    pub window: TimeWindow,
    pub records: Vec<MatchRecord>,
    pub summary: AggregateReport,
    pub errors: Vec<String>,
}

impl WeeklyReport {
    pub fn render(&self) -> String {
        render_report(&self.username, &self.window, &self.records, &self.summary)
    }
}

/// Runs the whole pipeline: identity, window, fetch, aggregate. Network and
/// decode failures end up in `errors`; the report is always produced.
pub fn run_weekly_report<S: HttpSource + Sync + ?Sized>(
    source: &S,
    config: &PipelineConfig,
    now: NaiveDateTime,
) -> WeeklyReport {
    let mut errors = Vec::new();

    let lookup = resolve_player_id(source, config);
    errors.extend(lookup.errors);

    let window = TimeWindow::last_week(now);
    let fetch = fetch_match_blocks(source, config, &window.months);
    errors.extend(fetch.errors);

    let records = collect_records(&fetch.blocks, &window, &lookup.player_id);
    let summary = AggregateReport::from_records(&records);
    info!(
        blocks = fetch.blocks.len(),
        kept = records.len(),
        "aggregated weekly games"
    );

    WeeklyReport {
        username: config.username.clone(),
        player_id: lookup.player_id,
        window,
        records,
        summary,
        errors,
    }
}
