use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::provider::ProviderId;

/// Display locale for descriptions and provider queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Language {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            _ => Err(anyhow::anyhow!("Unknown language '{value}'. Supported languages: ru, en.")),
        }
    }
}

/// A geocoding match offered as a suggestion or used to resolve a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCandidate {
    pub id: i64,
    pub name: String,
    pub country: String,
    /// First-level administrative area; empty when the geocoder has none.
    pub admin1: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityCandidate {
    /// `name, admin1, country`, skipping `admin1` when empty.
    pub fn display_name(&self) -> String {
        if self.admin1.is_empty() {
            format!("{}, {}", self.name, self.country)
        } else {
            format!("{}, {}, {}", self.name, self.admin1, self.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: i32,
    pub humidity_pct: u8,
    pub pressure_hpa: i32,
    pub visibility_km: i32,
    pub feels_like_c: i32,
    pub wind_speed: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRecord {
    /// 0..=23
    pub hour: u8,
    pub chance_of_rain_pct: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub max_temp_c: i32,
    pub min_temp_c: i32,
    pub description: String,
    pub humidity_pct: u8,
    pub chance_of_rain_pct: u8,
    /// A single record when the provider only has daily data.
    pub hourly: Vec<HourRecord>,
}

/// Number of forecast days every [`WeatherResult`] carries.
pub const FORECAST_DAYS: usize = 3;

/// Canonical result produced by every provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub provider: ProviderId,
    pub location_name: String,
    pub current: CurrentConditions,
    /// Exactly [`FORECAST_DAYS`] entries, index 0 is today.
    pub forecast: Vec<DayForecast>,
}
