use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs()))
            .build()
            .context("failed to build http client")
    })
}

fn request_timeout_secs() -> u64 {
    env::var("REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .max(1)
}

/// Status and body of a completed GET. Non-success statuses are still `Ok`;
/// only transport failures surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Something that can answer a GET. The pipeline only talks to this trait so
/// tests can swap in canned responses.
pub trait HttpSource {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Shared blocking client plus the identification header the public API
/// insists on.
pub struct ApiClient {
    client: &'static Client,
    user_agent: String,
}

impl ApiClient {
    pub fn new(user_agent: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            user_agent: user_agent.into(),
        })
    }
}

impl HttpSource for ApiClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .context("request failed")?;
        let status = resp.status().as_u16();
        let body = resp.text().context("failed reading body")?;
        Ok(HttpResponse { status, body })
    }
}
