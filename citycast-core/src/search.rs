use anyhow::Result;
use tracing::{info, warn};

use crate::{
    Config, Failure, WeatherResult,
    provider::{ProviderId, WeatherProvider, provider_from_config},
};

/// Resolves weather for a city: one primary attempt, then one fallback
/// attempt if the primary fails for any reason. The two calls are sequential.
#[derive(Debug)]
pub struct SearchOrchestrator {
    primary: Box<dyn WeatherProvider>,
    fallback: Box<dyn WeatherProvider>,
}

impl SearchOrchestrator {
    pub fn new(primary: Box<dyn WeatherProvider>, fallback: Box<dyn WeatherProvider>) -> Self {
        Self { primary, fallback }
    }

    /// Open-Meteo first, wttr.in as fallback, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = config.http_client()?;
        Ok(Self::new(
            provider_from_config(ProviderId::OpenMeteo, config, http.clone()),
            provider_from_config(ProviderId::Wttr, config, http),
        ))
    }

    /// Blank queries fail with [`Failure::Validation`] before any network
    /// call. When both providers fail, only the fallback's failure is returned.
    pub async fn fetch_weather(&self, city_query: &str) -> Result<WeatherResult, Failure> {
        let query = city_query.trim();
        if query.is_empty() {
            return Err(Failure::validation("city name is empty"));
        }

        match self.primary.resolve(query).await {
            Ok(result) => {
                info!(provider = %self.primary.id(), location = %result.location_name, "weather resolved");
                Ok(result)
            }
            Err(primary_err) => {
                warn!(
                    provider = %self.primary.id(),
                    error = %primary_err,
                    "primary provider failed, trying {}",
                    self.fallback.id()
                );

                let result = self.fallback.resolve(query).await?;
                info!(provider = %self.fallback.id(), location = %result.location_name, "weather resolved");
                Ok(result)
            }
        }
    }
}
