use std::env;

const DEFAULT_USERNAME: &str = "javalle";
const DEFAULT_API_BASE: &str = "https://api.chess.com";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Inputs for one pipeline run. Built once in `main` and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub username: String,
    pub api_base: String,
    pub user_agent: String,
    pub parallel_fetch: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            parallel_fetch: false,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            username: opt_env("CHESS_USERNAME").unwrap_or(defaults.username),
            api_base: opt_env("CHESS_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            user_agent: opt_env("CHESS_USER_AGENT").unwrap_or(defaults.user_agent),
            parallel_fetch: opt_env("PARALLEL_FETCH")
                .map(|val| parse_flag(&val))
                .unwrap_or(defaults.parallel_fetch),
        }
    }

    pub fn player_url(&self) -> String {
        format!("{}/pub/player/{}", self.api_base, self.username)
    }

    pub fn games_url(&self, year_month: &str) -> String {
        format!(
            "{}/pub/player/{}/games/{}/pgn",
            self.api_base, self.username, year_month
        )
    }
}

pub(crate) fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

pub fn env_flag(key: &str) -> bool {
    opt_env(key).is_some_and(|val| parse_flag(&val))
}

pub(crate) fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
