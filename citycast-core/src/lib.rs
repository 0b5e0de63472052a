//! Core library for the `citycast` weather lookup.
//!
//! This crate defines:
//! - Provider adapters normalizing two remote weather sources into one [`WeatherResult`]
//! - The search orchestrator with primary/fallback policy
//! - City suggestions and the debounced search session
//! - Rain advisories, unit conversion and weather-code descriptions
//! - Configuration handling
//!
//! It is used by `citycast-cli`, but the two entry points
//! [`SearchOrchestrator::fetch_weather`] and [`CitySuggester::suggest`] are
//! meant for any embedding front end.

pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod provider;
pub mod rain;
pub mod search;
pub mod session;
pub mod suggest;
pub mod units;
pub mod weather_code;

pub use config::{Config, Endpoints, HttpSettings, SearchSettings};
pub use error::{Failure, FailureKind};
pub use model::{CityCandidate, CurrentConditions, DayForecast, HourRecord, Language, WeatherResult};
pub use provider::{ProviderId, WeatherProvider};
pub use rain::{DayRainOutlook, RainAdvisory, RainLevel};
pub use search::SearchOrchestrator;
pub use session::{SearchSession, SearchState};
pub use suggest::{CityLookup, CitySuggester};
