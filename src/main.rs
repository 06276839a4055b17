use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::EnvFilter;

use weekly_games::config::{PipelineConfig, env_flag};
use weekly_games::http_client::ApiClient;
use weekly_games::pipeline::run_weekly_report;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let config = PipelineConfig::from_env();
    let client = ApiClient::new(config.user_agent.clone())?;
    let now = Local::now().naive_local();

    let report = run_weekly_report(&client, &config, now);

    if env_flag("REPORT_JSON") {
        let json = serde_json::to_string_pretty(&report).context("serialize weekly report")?;
        println!("{json}");
    } else {
        println!("{}", report.render());
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
