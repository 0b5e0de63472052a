use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Config, Failure,
    model::{
        CityCandidate, CurrentConditions, DayForecast, FORECAST_DAYS, HourRecord, Language,
        WeatherResult,
    },
    suggest::CityLookup,
    units, weather_code,
};

use super::{ProviderId, WeatherProvider, endpoint, fetch_text};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,surface_pressure,\
                              visibility,apparent_temperature,wind_speed_10m";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// Primary adapter: geocode the city, then fetch current conditions and a
/// three-day daily forecast for the coordinates.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_base: String,
    forecast_base: String,
    language: Language,
}

impl OpenMeteoProvider {
    pub fn new(http: Client, geocoding_base: String, forecast_base: String, language: Language) -> Self {
        Self { http, geocoding_base, forecast_base, language }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(
            http,
            config.endpoints.geocoding.clone(),
            config.endpoints.forecast.clone(),
            config.language,
        )
    }

    /// Geocoding search returning at most `count` candidates in the display locale.
    pub async fn geocode(&self, name: &str, count: u8) -> Result<Vec<CityCandidate>, Failure> {
        let query = GeocodeQuery {
            name,
            count,
            language: self.language.as_str(),
            format: "json",
        };
        let url = endpoint(&self.geocoding_base, "search");
        debug!(%url, name, count, "geocoding");

        let body = fetch_text(self.http.get(&url).query(&query), "geocoding").await?;
        parse_geocode_response(&body)
    }

    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<String, Failure> {
        let query = ForecastQuery {
            latitude,
            longitude,
            current: CURRENT_FIELDS,
            daily: DAILY_FIELDS,
            timezone: "auto",
            forecast_days: FORECAST_DAYS,
        };
        let url = endpoint(&self.forecast_base, "forecast");
        debug!(%url, latitude, longitude, "fetching forecast");

        fetch_text(self.http.get(&url).query(&query), "forecast").await
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn resolve(&self, city_query: &str) -> Result<WeatherResult, Failure> {
        let city = first_match(self.geocode(city_query, 1).await?, city_query)?;

        info!(city = %city.name, lat = city.latitude, lon = city.longitude, "geocoded");

        let body = self.fetch_forecast(city.latitude, city.longitude).await?;
        parse_forecast_response(&body, city.name, self.language)
    }
}

#[async_trait]
impl CityLookup for OpenMeteoProvider {
    async fn search_cities(&self, query: &str, limit: u8) -> Result<Vec<CityCandidate>, Failure> {
        self.geocode(query, limit).await
    }
}

#[derive(Debug, Serialize)]
struct GeocodeQuery<'a> {
    name: &'a str,
    count: u8,
    language: &'a str,
    format: &'a str,
}

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    current: &'a str,
    daily: &'a str,
    timezone: &'a str,
    forecast_days: usize,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    id: i64,
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<OmCurrent>,
    daily: Option<OmDaily>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmCurrent {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    weather_code: Option<i32>,
    surface_pressure: Option<f64>,
    visibility: Option<f64>,
    apparent_temperature: Option<f64>,
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_probability_max: Vec<Option<f64>>,
}

fn parse_geocode_response(body: &str) -> Result<Vec<CityCandidate>, Failure> {
    let payload: GeocodeResponse = serde_json::from_str(body)
        .map_err(|err| Failure::data(format!("geocoding payload: {err}")))?;

    Ok(payload
        .results
        .unwrap_or_default()
        .into_iter()
        .map(|r| CityCandidate {
            id: r.id,
            name: r.name,
            country: r.country.unwrap_or_default(),
            admin1: r.admin1.unwrap_or_default(),
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect())
}

/// Zero geocoding matches is [`Failure::NotFound`], never an empty result.
fn first_match(cities: Vec<CityCandidate>, city_query: &str) -> Result<CityCandidate, Failure> {
    cities
        .into_iter()
        .next()
        .ok_or_else(|| Failure::not_found(city_query))
}

fn parse_forecast_response(
    body: &str,
    location_name: String,
    lang: Language,
) -> Result<WeatherResult, Failure> {
    let payload: ForecastResponse = serde_json::from_str(body)
        .map_err(|err| Failure::data(format!("forecast payload: {err}")))?;

    let current = payload
        .current
        .ok_or_else(|| Failure::data("forecast payload: missing current"))?;
    let daily = payload
        .daily
        .ok_or_else(|| Failure::data("forecast payload: missing daily"))?;

    let humidity_pct = units::to_percent(units::finite_or_zero(current.relative_humidity_2m));

    let current = CurrentConditions {
        temperature_c: units::to_integer_celsius(units::finite_or_zero(current.temperature_2m)),
        humidity_pct,
        pressure_hpa: units::to_integer_hpa(units::finite_or_zero(current.surface_pressure)),
        visibility_km: units::to_km(units::finite_or_zero(current.visibility)),
        feels_like_c: units::to_integer_celsius(units::finite_or_zero(
            current.apparent_temperature,
        )),
        wind_speed: units::to_speed_unit(units::finite_or_zero(current.wind_speed_10m)),
        description: describe_opt(current.weather_code, lang).to_string(),
    };

    let forecast = build_days(&daily, humidity_pct, lang)?;

    Ok(WeatherResult { provider: ProviderId::OpenMeteo, location_name, current, forecast })
}

fn build_days(daily: &OmDaily, humidity_pct: u8, lang: Language) -> Result<Vec<DayForecast>, Failure> {
    let available = daily
        .time
        .len()
        .min(daily.weather_code.len())
        .min(daily.temperature_2m_max.len())
        .min(daily.temperature_2m_min.len());

    if available < FORECAST_DAYS {
        return Err(Failure::data(format!(
            "forecast payload: expected {FORECAST_DAYS} daily entries, got {available}"
        )));
    }

    (0..FORECAST_DAYS)
        .map(|i| -> Result<DayForecast, Failure> {
            let date = NaiveDate::parse_from_str(daily.time[i].trim(), "%Y-%m-%d").map_err(|err| {
                Failure::data(format!("forecast payload: bad date '{}': {err}", daily.time[i]))
            })?;
            let description = describe_opt(daily.weather_code[i], lang).to_string();
            let chance_of_rain_pct = units::to_percent(units::finite_or_zero(
                daily.precipitation_probability_max.get(i).copied().flatten(),
            ));

            Ok(DayForecast {
                date,
                max_temp_c: units::to_integer_celsius(units::finite_or_zero(
                    daily.temperature_2m_max[i],
                )),
                min_temp_c: units::to_integer_celsius(units::finite_or_zero(
                    daily.temperature_2m_min[i],
                )),
                humidity_pct,
                chance_of_rain_pct,
                hourly: vec![HourRecord { hour: 0, chance_of_rain_pct, description: description.clone() }],
                description,
            })
        })
        .collect()
}

fn describe_opt(code: Option<i32>, lang: Language) -> &'static str {
    code.map_or_else(|| weather_code::unknown(lang), |c| weather_code::describe(c, lang))
}
