use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::http_client::HttpSource;

pub const UNKNOWN: &str = "Unknown";

pub struct PlayerLookup {
    pub player_id: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerProfile {
    #[serde(default)]
    player_id: Option<serde_json::Value>,
}

/// Looks the username up once. Any failure degrades to the `Unknown` id and a
/// recorded warning; the run carries on either way.
pub fn resolve_player_id<S: HttpSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
) -> PlayerLookup {
    let url = config.player_url();
    let mut errors = Vec::new();

    let player_id = match fetch_profile(source, &url) {
        Ok(profile) => profile
            .player_id
            .as_ref()
            .and_then(id_to_string)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        Err(err) => {
            let msg = err.to_string();
            warn!("{msg}");
            errors.push(msg);
            errors.push("Failed to fetch player information.".to_string());
            UNKNOWN.to_string()
        }
    };

    debug!(username = %config.username, player_id = %player_id, "resolved player");
    PlayerLookup { player_id, errors }
}

fn fetch_profile<S: HttpSource + ?Sized>(source: &S, url: &str) -> Result<PlayerProfile> {
    let resp = source
        .get(url)
        .with_context(|| format!("Error: Unable to fetch data from {url} (request failed)"))?;
    if !resp.is_ok() {
        return Err(anyhow!(
            "Error: Unable to fetch data from {url} (Status Code: {})",
            resp.status
        ));
    }
    parse_profile_json(&resp.body)
        .map_err(|_| anyhow!("Error: Failed to decode JSON from {url}"))
}

fn parse_profile_json(raw: &str) -> Result<PlayerProfile> {
    serde_json::from_str::<PlayerProfile>(raw.trim()).context("invalid player json")
}

fn id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
