use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{Config, Failure, config::SearchSettings, model::CityCandidate};

/// Geocoding search used for autocomplete.
#[async_trait]
pub trait CityLookup: Send + Sync + Debug {
    async fn search_cities(&self, query: &str, limit: u8) -> Result<Vec<CityCandidate>, Failure>;
}

#[async_trait]
impl<T: CityLookup + ?Sized> CityLookup for Arc<T> {
    async fn search_cities(&self, query: &str, limit: u8) -> Result<Vec<CityCandidate>, Failure> {
        (**self).search_cities(query, limit).await
    }
}

/// One-shot city suggestions. Debouncing lives in [`crate::session`].
#[derive(Debug, Clone)]
pub struct CitySuggester<L> {
    lookup: L,
    limit: u8,
    min_chars: usize,
}

impl<L: CityLookup> CitySuggester<L> {
    pub fn new(lookup: L, settings: &SearchSettings) -> Self {
        Self { lookup, limit: settings.suggestion_limit, min_chars: settings.min_query_chars }
    }

    pub fn from_config(lookup: L, config: &Config) -> Self {
        Self::new(lookup, &config.search)
    }

    /// Queries shorter than the minimum (counted in characters, after
    /// trimming) succeed with no candidates and no lookup.
    pub fn needs_lookup(&self, partial_query: &str) -> bool {
        partial_query.trim().chars().count() >= self.min_chars
    }

    /// Up to `limit` candidates for `partial_query`. Failures carry a generic
    /// reason; the caller shows an empty list.
    pub async fn suggest(&self, partial_query: &str) -> Result<Vec<CityCandidate>, Failure> {
        if !self.needs_lookup(partial_query) {
            return Ok(Vec::new());
        }

        let query = partial_query.trim();
        debug!(query, "looking up city suggestions");

        match self.lookup.search_cities(query, self.limit).await {
            Ok(mut cities) => {
                cities.truncate(usize::from(self.limit));
                Ok(cities)
            }
            Err(err) => {
                warn!(query, error = %err, "city suggestion lookup failed");
                Err(Failure::network("could not look up cities"))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use super::*;

    /// Records every query it receives and answers with candidates named after it.
    #[derive(Debug, Default)]
    pub struct RecordingLookup {
        pub queries: Mutex<Vec<String>>,
        pub fail: bool,
    }

    impl RecordingLookup {
        pub fn calls(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    pub fn city(id: i64, name: &str) -> CityCandidate {
        CityCandidate {
            id,
            name: name.to_string(),
            country: "Testland".to_string(),
            admin1: String::new(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[async_trait]
    impl CityLookup for RecordingLookup {
        async fn search_cities(&self, query: &str, limit: u8) -> Result<Vec<CityCandidate>, Failure> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(Failure::network("connection refused"));
            }
            Ok((0..i64::from(limit) + 2).map(|i| city(i, &format!("{query}{i}"))).collect())
        }
    }
}
