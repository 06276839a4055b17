use std::collections::BTreeSet;
use std::env;

use anyhow::{Result, anyhow};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::http_client::HttpSource;
use crate::time_window::YearMonth;

const BLOCK_DELIMITER: &str = "\n\n\n";

pub struct MatchFetch {
    pub blocks: Vec<String>,
    pub errors: Vec<String>,
}

/// Pulls the monthly PGN archive for every month token. A failing month adds
/// a warning and nothing else; the remaining months are still fetched.
pub fn fetch_match_blocks<S: HttpSource + Sync + ?Sized>(
    source: &S,
    config: &PipelineConfig,
    months: &BTreeSet<YearMonth>,
) -> MatchFetch {
    let results: Vec<Result<Vec<String>>> = if config.parallel_fetch {
        with_fetch_pool(|| {
            months
                .par_iter()
                .map(|month| fetch_month(source, config, *month))
                .collect()
        })
    } else {
        months
            .iter()
            .map(|month| fetch_month(source, config, *month))
            .collect()
    };

    let mut blocks = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(month_blocks) => blocks.extend(month_blocks),
            Err(err) => {
                let msg = err.to_string();
                warn!("{msg}");
                errors.push(msg);
            }
        }
    }

    MatchFetch { blocks, errors }
}

fn fetch_month<S: HttpSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
    month: YearMonth,
) -> Result<Vec<String>> {
    let url = config.games_url(&month.to_string());
    let resp = source.get(&url).map_err(|err| {
        anyhow!("Error: Unable to fetch PGN data from {url} (request failed: {err:#})")
    })?;

    if !resp.is_ok() || resp.body.trim().is_empty() {
        return Err(anyhow!(
            "Error: Unable to fetch PGN data from {url} (Status Code: {})",
            resp.status
        ));
    }

    let blocks = split_blocks(&resp.body);
    debug!(%month, blocks = blocks.len(), "fetched month archive");
    Ok(blocks)
}

/// Splits a monthly archive into one string per game.
pub fn split_blocks(payload: &str) -> Vec<String> {
    payload
        .trim()
        .split(BLOCK_DELIMITER)
        .filter(|block| !block.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn with_fetch_pool<T>(action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    let threads = fetch_parallelism();
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

fn fetch_parallelism() -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(4)
        .clamp(1, 12)
}
