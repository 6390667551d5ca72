#![deny(clippy::all, clippy::pedantic)]

use reqwest::{Client, Method, Response, StatusCode, Url};
use rubrica_api_types::Envelope;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("site URL is required (use --site or RUBRICA_SITE_URL)")]
    MissingSite,
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub client: Client,
    pub base: Url,
}

impl Ctx {
    pub fn new(site: &str) -> Result<Self, CliError> {
        let base = Url::parse(site)?.join("/")?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("rubrica-cli/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, CliError> {
        self.base.join(path).map_err(CliError::Url)
    }

    pub async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> Result<T, CliError> {
        let mut url = self.url(path)?;
        if let Some(q) = query {
            url.set_query(None);
            let mut qp = url.query_pairs_mut();
            for (k, v) in q {
                qp.append_pair(k, v);
            }
        }

        debug!(target: "rubrica_cli::http", %method, %url, "sending request");
        let mut req = self.client.request(method, url);
        if let Some(b) = body {
            req = req.json(&b);
        }

        let resp = req.send().await?;
        Self::handle(resp).await
    }

    /// `/health` answers 503 with a well-formed report when degraded, so the
    /// body is parsed regardless of status.
    pub async fn request_any_status<T: for<'de> Deserialize<'de>>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, CliError> {
        let url = self.url(path)?;
        debug!(target: "rubrica_cli::http", %method, %url, "sending request");
        let resp = self.client.request(method, url).send().await?;
        debug!(target: "rubrica_cli::http", status = %resp.status(), "response received");
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CliError::Server(format!("failed to parse body: {e}")))
    }

    async fn handle<T: for<'de> Deserialize<'de>>(resp: Response) -> Result<T, CliError> {
        let status = resp.status();
        debug!(target: "rubrica_cli::http", %status, "response received");
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(CliError::Server(normalize_failure(status, &bytes)));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| CliError::Server(format!("failed to parse body: {e}")))
    }
}

/// Prefer the server's own envelope message; fall back to the bare status
/// when the body is not one of ours.
fn normalize_failure(status: StatusCode, bytes: &[u8]) -> String {
    match serde_json::from_slice::<Envelope<serde_json::Value>>(bytes) {
        Ok(envelope) => {
            let mut message = envelope.message;
            if let Some(violations) = envelope.errors {
                let fields = violations
                    .iter()
                    .map(|v| format!("{}: {}", v.field, v.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                if !fields.is_empty() {
                    message = format!("{message} ({fields})");
                }
            }
            message
        }
        Err(_) => format!("request failed with status {status}"),
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let site = cli.site.clone().ok_or(CliError::MissingSite)?;
    Ctx::new(&site)
}
