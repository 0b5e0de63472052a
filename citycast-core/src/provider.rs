use crate::{
    Config, Failure, WeatherResult,
    provider::{open_meteo::OpenMeteoProvider, wttr::WttrProvider},
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

pub mod open_meteo;
pub mod wttr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "open-meteo")]
    OpenMeteo,
    #[serde(rename = "wttr")]
    Wttr,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "open-meteo",
            ProviderId::Wttr => "wttr",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source of weather for a free-text city name.
///
/// Implementations validate and normalize the provider payload into a
/// [`WeatherResult`]; raw provider JSON never leaves the adapter. No retries
/// happen at this layer.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn resolve(&self, city_query: &str) -> Result<WeatherResult, Failure>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
    http: reqwest::Client,
) -> Box<dyn WeatherProvider> {
    match id {
        ProviderId::OpenMeteo => Box::new(OpenMeteoProvider::from_config(config, http)),
        ProviderId::Wttr => Box::new(WttrProvider::from_config(config, http)),
    }
}

/// Sends the request and returns status and body. Transport errors are
/// [`Failure::Network`].
pub(crate) async fn send(request: RequestBuilder, what: &str) -> Result<(StatusCode, String), Failure> {
    let res = request
        .send()
        .await
        .map_err(|err| Failure::network(format!("failed to send {what} request: {err}")))?;

    let status = res.status();
    debug!(%status, url = %res.url(), "{what} response");

    let body = res
        .text()
        .await
        .map_err(|err| Failure::network(format!("failed to read {what} response body: {err}")))?;

    Ok((status, body))
}

/// Like [`send`], but any non-2xx status is a [`Failure::Network`].
pub(crate) async fn fetch_text(request: RequestBuilder, what: &str) -> Result<String, Failure> {
    let (status, body) = send(request, what).await?;
    ensure_success(status, body, what)
}

pub(crate) fn ensure_success(status: StatusCode, body: String, what: &str) -> Result<String, Failure> {
    if !status.is_success() {
        return Err(Failure::network(format!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body),
        )));
    }
    Ok(body)
}

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_builds_each_provider() {
        let cfg = Config::default();
        for id in [ProviderId::OpenMeteo, ProviderId::Wttr] {
            let provider = provider_from_config(id, &cfg, reqwest::Client::new());
            assert_eq!(provider.id(), id);
            assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{id}\""));
        }
    }

    #[test]
    fn non_success_status_is_network_failure() {
        let err = ensure_success(StatusCode::BAD_GATEWAY, "upstream down".into(), "forecast")
            .unwrap_err();
        assert!(matches!(err, Failure::Network(ref msg) if msg.contains("502")));

        let ok = ensure_success(StatusCode::OK, "{}".into(), "forecast").unwrap();
        assert_eq!(ok, "{}");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "погода".repeat(100);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        assert_eq!(endpoint("https://example.test/v1/", "/search"), "https://example.test/v1/search");
        assert_eq!(endpoint("https://example.test/v1", "forecast"), "https://example.test/v1/forecast");
    }
}
