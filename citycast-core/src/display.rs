//! Presentation hints derived from normalized data.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionIcon {
    Sunny,
    Cloudy,
    Rainy,
    Snow,
    Fog,
    Thunderstorm,
    PartlySunny,
}

impl ConditionIcon {
    /// Classifies a description in either supported language by keyword.
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| desc.contains(n));

        if has(&["гроза", "thunder"]) {
            ConditionIcon::Thunderstorm
        } else if has(&["снег", "снеж", "snow"]) {
            ConditionIcon::Snow
        } else if has(&["дожд", "ливн", "ливен", "морос", "rain", "drizzle", "shower"]) {
            ConditionIcon::Rainy
        } else if has(&["туман", "изморозь", "fog", "mist"]) {
            ConditionIcon::Fog
        } else if has(&["облач", "пасмурн", "cloud", "overcast"]) {
            ConditionIcon::Cloudy
        } else if has(&["ясно", "солн", "clear", "sun"]) {
            ConditionIcon::Sunny
        } else {
            ConditionIcon::PartlySunny
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConditionIcon::Sunny => "sunny",
            ConditionIcon::Cloudy => "cloudy",
            ConditionIcon::Rainy => "rainy",
            ConditionIcon::Snow => "snow",
            ConditionIcon::Fog => "cloudy-night",
            ConditionIcon::Thunderstorm => "thunderstorm",
            ConditionIcon::PartlySunny => "partly-sunny",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    Hot,
    Warm,
    Cool,
    Cold,
}

impl TemperatureBand {
    pub fn of(temperature_c: i32) -> Self {
        match temperature_c {
            t if t >= 25 => TemperatureBand::Hot,
            t if t >= 15 => TemperatureBand::Warm,
            t if t >= 5 => TemperatureBand::Cool,
            _ => TemperatureBand::Cold,
        }
    }

    /// Background gradient start and end colors.
    pub fn gradient(&self) -> [&'static str; 2] {
        match self {
            TemperatureBand::Hot => ["#FF6B6B", "#FF8E53"],
            TemperatureBand::Warm => ["#4ECDC4", "#44A08D"],
            TemperatureBand::Cool => ["#667eea", "#764ba2"],
            TemperatureBand::Cold => ["#2196F3", "#21CBF3"],
        }
    }
}
