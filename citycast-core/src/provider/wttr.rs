use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::{
    Config, Failure,
    model::{CurrentConditions, DayForecast, FORECAST_DAYS, HourRecord, Language, WeatherResult},
    units, weather_code,
};

use super::{ProviderId, WeatherProvider, ensure_success, send};

/// Fallback adapter: a single all-in-one endpoint keyed by city name.
///
/// Readings are taken in the provider's own units (°C, hPa, km, km/h) and
/// only rounded; nothing is re-normalized.
#[derive(Debug, Clone)]
pub struct WttrProvider {
    http: Client,
    base: String,
    language: Language,
}

impl WttrProvider {
    pub fn new(http: Client, base: String, language: Language) -> Self {
        Self { http, base, language }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(http, config.endpoints.fallback.clone(), config.language)
    }

    fn city_url(&self, city: &str) -> Result<Url, Failure> {
        let mut url = Url::parse(&self.base)
            .map_err(|err| Failure::network(format!("invalid fallback endpoint '{}': {err}", self.base)))?;
        url.path_segments_mut()
            .map_err(|()| Failure::network(format!("invalid fallback endpoint '{}'", self.base)))?
            .pop_if_empty()
            .push(city);
        Ok(url)
    }
}

#[async_trait]
impl WeatherProvider for WttrProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Wttr
    }

    async fn resolve(&self, city_query: &str) -> Result<WeatherResult, Failure> {
        let url = self.city_url(city_query)?;
        debug!(%url, "fetching fallback weather");

        let request = self
            .http
            .get(url)
            .query(&[("format", "j1"), ("lang", self.language.as_str())]);
        let (status, body) = send(request, "fallback weather").await?;
        let body = check_status(status, body, city_query)?;

        parse_response(&body, city_query, self.language)
    }
}

/// wttr.in answers an unknown city with 404.
fn check_status(status: StatusCode, body: String, city_query: &str) -> Result<String, Failure> {
    if status == StatusCode::NOT_FOUND {
        return Err(Failure::not_found(city_query));
    }
    ensure_success(status, body, "fallback weather")
}

#[derive(Debug, Deserialize)]
struct WttrResponse {
    current_condition: Option<Vec<WttrCurrent>>,
    weather: Option<Vec<WttrDay>>,
    #[serde(default, deserialize_with = "lenient")]
    nearest_area: Vec<WttrArea>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WttrText {
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WttrArea {
    #[serde(rename = "areaName")]
    area_name: Vec<WttrText>,
}

#[derive(Debug, Deserialize)]
struct WttrCurrent {
    #[serde(rename = "temp_C", default, deserialize_with = "lenient_f64")]
    temp_c: f64,
    #[serde(rename = "FeelsLikeC", default, deserialize_with = "lenient_f64")]
    feels_like_c: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    humidity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pressure: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    visibility: f64,
    #[serde(rename = "windspeedKmph", default, deserialize_with = "lenient_f64")]
    windspeed_kmph: f64,
    #[serde(rename = "weatherDesc", default, deserialize_with = "lenient")]
    weather_desc: Vec<WttrText>,
    #[serde(default, deserialize_with = "lenient")]
    lang_ru: Vec<WttrText>,
}

#[derive(Debug, Deserialize)]
struct WttrDay {
    #[serde(default)]
    date: String,
    #[serde(rename = "maxtempC", default, deserialize_with = "lenient_f64")]
    max_temp_c: f64,
    #[serde(rename = "mintempC", default, deserialize_with = "lenient_f64")]
    min_temp_c: f64,
    #[serde(default, deserialize_with = "lenient_each")]
    hourly: Vec<WttrHour>,
}

#[derive(Debug, Deserialize)]
struct WttrHour {
    /// `0`, `300`, ..., `2100`.
    #[serde(default, deserialize_with = "lenient_f64")]
    time: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    chanceofrain: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    humidity: f64,
    #[serde(rename = "weatherDesc", default, deserialize_with = "lenient")]
    weather_desc: Vec<WttrText>,
    #[serde(default, deserialize_with = "lenient")]
    lang_ru: Vec<WttrText>,
}

/// Numbers arrive as strings; anything unparseable or non-finite reads as 0.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(units::finite_or_zero(number))
}

/// A malformed nested value reads as its default instead of failing the payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decodes array elements one by one, dropping the malformed ones. A
/// non-array reads as empty.
fn lenient_each<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

fn pick_text(localized: &[WttrText], fallback: &[WttrText], lang: Language) -> Option<String> {
    let localized = match lang {
        Language::Ru => localized.first(),
        Language::En => None,
    };
    localized
        .or_else(|| fallback.first())
        .map(|t| t.value.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn decode_hour(raw: f64) -> u8 {
    ((raw.max(0.0) as u32) / 100).min(23) as u8
}

fn parse_response(body: &str, city_query: &str, lang: Language) -> Result<WeatherResult, Failure> {
    let payload: WttrResponse = serde_json::from_str(body)
        .map_err(|err| Failure::data(format!("fallback payload: {err}")))?;

    let current = payload
        .current_condition
        .ok_or_else(|| Failure::data("fallback payload: missing current_condition"))?
        .into_iter()
        .next()
        .ok_or_else(|| Failure::data("fallback payload: empty current_condition"))?;
    let days = payload
        .weather
        .ok_or_else(|| Failure::data("fallback payload: missing weather"))?;

    if days.len() < FORECAST_DAYS {
        return Err(Failure::data(format!(
            "fallback payload: expected {FORECAST_DAYS} days, got {}",
            days.len()
        )));
    }

    let location_name = payload
        .nearest_area
        .first()
        .and_then(|area| area.area_name.first())
        .map(|t| t.value.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| city_query.trim().to_string());

    let current = CurrentConditions {
        temperature_c: units::to_integer_celsius(current.temp_c),
        humidity_pct: units::to_percent(current.humidity),
        pressure_hpa: units::to_integer_hpa(current.pressure),
        visibility_km: units::to_whole(current.visibility),
        feels_like_c: units::to_integer_celsius(current.feels_like_c),
        wind_speed: units::to_speed_unit(current.windspeed_kmph),
        description: pick_text(&current.lang_ru, &current.weather_desc, lang)
            .unwrap_or_else(|| weather_code::unknown(lang).to_string()),
    };

    let forecast = days
        .into_iter()
        .take(FORECAST_DAYS)
        .map(|day| build_day(day, lang))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherResult { provider: ProviderId::Wttr, location_name, current, forecast })
}

fn build_day(day: WttrDay, lang: Language) -> Result<DayForecast, Failure> {
    let date = NaiveDate::parse_from_str(day.date.trim(), "%Y-%m-%d")
        .map_err(|err| Failure::data(format!("fallback payload: bad date '{}': {err}", day.date)))?;

    let hourly: Vec<HourRecord> = day
        .hourly
        .iter()
        .map(|h| HourRecord {
            hour: decode_hour(h.time),
            chance_of_rain_pct: units::to_percent(h.chanceofrain),
            description: pick_text(&h.lang_ru, &h.weather_desc, lang)
                .unwrap_or_else(|| weather_code::unknown(lang).to_string()),
        })
        .collect();

    // Representative hour for the day summary: noon if present.
    let noon = day
        .hourly
        .iter()
        .position(|h| decode_hour(h.time) == 12)
        .or_else(|| (!day.hourly.is_empty()).then_some(0));

    let description = noon
        .map(|i| hourly[i].description.clone())
        .unwrap_or_else(|| weather_code::unknown(lang).to_string());
    let humidity_pct = noon.map_or(0, |i| units::to_percent(day.hourly[i].humidity));
    let chance_of_rain_pct = hourly.iter().map(|h| h.chance_of_rain_pct).max().unwrap_or(0);

    Ok(DayForecast {
        date,
        max_temp_c: units::to_integer_celsius(day.max_temp_c),
        min_temp_c: units::to_integer_celsius(day.min_temp_c),
        description,
        humidity_pct,
        chance_of_rain_pct,
        hourly,
    })
}
