//! Rain likelihood derived from per-hour records.

use serde::Serialize;

use crate::model::{DayForecast, HourRecord, Language};

/// An hour strictly above this chance marks the rain onset.
pub const ONSET_THRESHOLD_PCT: u8 = 30;
/// A day whose peak chance is strictly above this gets a "possible rain" advisory.
pub const POSSIBLE_THRESHOLD_PCT: u8 = 10;
/// Hours strictly above this chance are listed in the hourly rain strip.
pub const RAINY_HOUR_THRESHOLD_PCT: u8 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RainAdvisory {
    /// `None` when no single hour crossed the onset threshold.
    pub onset_hour: Option<u8>,
    pub probability_pct: u8,
    pub description: String,
}

/// Icon-selection hint for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RainLevel {
    Definite,
    Possible,
    None,
}

impl RainLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            RainLevel::Definite => "rainy",
            RainLevel::Possible => "rainy-outline",
            RainLevel::None => "sunny",
        }
    }

    pub fn has_rain(&self) -> bool {
        !matches!(self, RainLevel::None)
    }
}

impl RainAdvisory {
    pub fn level(&self) -> RainLevel {
        if self.probability_pct > ONSET_THRESHOLD_PCT {
            RainLevel::Definite
        } else {
            RainLevel::Possible
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRainOutlook {
    pub text: String,
    pub level: RainLevel,
}

/// First hour above [`ONSET_THRESHOLD_PCT`] wins; otherwise the day's peak is
/// reported when above [`POSSIBLE_THRESHOLD_PCT`]. `None` means no advisory,
/// which is distinct from an advisory with zero probability.
pub fn derive_daily_advisory(hourly: &[HourRecord], lang: Language) -> Option<RainAdvisory> {
    if let Some(hour) = hourly.iter().find(|h| h.chance_of_rain_pct > ONSET_THRESHOLD_PCT) {
        let description = if hour.description.trim().is_empty() {
            rain_word(lang).to_string()
        } else {
            hour.description.clone()
        };
        return Some(RainAdvisory {
            onset_hour: Some(hour.hour),
            probability_pct: hour.chance_of_rain_pct,
            description,
        });
    }

    let peak = hourly.iter().map(|h| h.chance_of_rain_pct).max()?;
    (peak > POSSIBLE_THRESHOLD_PCT).then(|| RainAdvisory {
        onset_hour: None,
        probability_pct: peak,
        description: possible_rain(lang).to_string(),
    })
}

/// Advisory for a whole day. A day carrying a single record comes from a
/// daily-only source, so its record's hour is not an onset time.
fn day_advisory(day: &DayForecast, lang: Language) -> Option<RainAdvisory> {
    let mut advisory = derive_daily_advisory(&day.hourly, lang)?;
    if day.hourly.len() == 1 {
        advisory.onset_hour = None;
    }
    Some(advisory)
}

/// One-line summary for today's entry of a forecast, if rain is expected.
pub fn today_summary(forecast: &[DayForecast], lang: Language) -> Option<String> {
    let today = forecast.first()?;
    let advisory = day_advisory(today, lang)?;

    Some(match (advisory.onset_hour, lang) {
        (Some(hour), Language::Ru) => {
            format!("{} с {hour:02}:00 ({}%)", advisory.description, advisory.probability_pct)
        }
        (Some(hour), Language::En) => {
            format!("{} from {hour:02}:00 ({}%)", advisory.description, advisory.probability_pct)
        }
        (None, Language::Ru) => {
            format!("{} (до {}%)", advisory.description, advisory.probability_pct)
        }
        (None, Language::En) => {
            format!("{} (up to {}%)", advisory.description, advisory.probability_pct)
        }
    })
}

pub fn day_outlook(day: &DayForecast, lang: Language) -> DayRainOutlook {
    let Some(advisory) = day_advisory(day, lang) else {
        let text = match lang {
            Language::Ru => "Без осадков",
            Language::En => "No precipitation",
        };
        return DayRainOutlook { text: text.to_string(), level: RainLevel::None };
    };

    let level = advisory.level();
    let text = match (advisory.onset_hour, level) {
        (Some(hour), _) => format!(
            "{} {hour:02}:00 ({}%)",
            match lang {
                Language::Ru => "Дождь с",
                Language::En => "Rain from",
            },
            advisory.probability_pct
        ),
        (None, RainLevel::Definite) => format!("{} ({}%)", rain_word(lang), advisory.probability_pct),
        (None, _) => format!("{} ({}%)", possible_rain(lang), advisory.probability_pct),
    };

    DayRainOutlook { text, level }
}

pub fn rainy_hours(day: &DayForecast) -> Vec<&HourRecord> {
    day.hourly.iter().filter(|h| h.chance_of_rain_pct > RAINY_HOUR_THRESHOLD_PCT).collect()
}

fn rain_word(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Дождь",
        Language::En => "Rain",
    }
}

fn possible_rain(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Возможен дождь",
        Language::En => "Possible rain",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn hour(hour: u8, chance: u8, description: &str) -> HourRecord {
        HourRecord { hour, chance_of_rain_pct: chance, description: description.to_string() }
    }

    fn day(hourly: Vec<HourRecord>) -> DayForecast {
        DayForecast {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            max_temp_c: 21,
            min_temp_c: 12,
            description: "Overcast".into(),
            humidity_pct: 70,
            chance_of_rain_pct: 0,
            hourly,
        }
    }

    #[test]
    fn first_hour_above_onset_wins() {
        let hourly = vec![
            hour(0, 5, "Clear"),
            hour(3, 31, "Light rain"),
            hour(6, 90, "Heavy rain"),
        ];
        let advisory = derive_daily_advisory(&hourly, Language::En).unwrap();
        assert_eq!(advisory.onset_hour, Some(3));
        assert_eq!(advisory.probability_pct, 31);
        assert_eq!(advisory.description, "Light rain");
        assert_eq!(advisory.level(), RainLevel::Definite);
    }

    #[test]
    fn exactly_thirty_is_not_an_onset() {
        let hourly = vec![hour(9, 30, "Cloudy"), hour(12, 25, "Cloudy")];
        let advisory = derive_daily_advisory(&hourly, Language::En).unwrap();
        assert_eq!(advisory.onset_hour, None);
        assert_eq!(advisory.probability_pct, 30);
        assert_eq!(advisory.description, "Possible rain");
        assert_eq!(advisory.level(), RainLevel::Possible);
    }

    #[test]
    fn low_peak_gives_no_advisory() {
        let hourly = vec![hour(0, 10, "Clear"), hour(3, 0, "Clear")];
        assert_eq!(derive_daily_advisory(&hourly, Language::En), None);
    }

    #[test]
    fn empty_hourly_gives_no_advisory() {
        assert_eq!(derive_daily_advisory(&[], Language::Ru), None);
    }

    #[test]
    fn blank_description_falls_back_to_rain_word() {
        let hourly = vec![hour(15, 60, "  ")];
        let advisory = derive_daily_advisory(&hourly, Language::Ru).unwrap();
        assert_eq!(advisory.description, "Дождь");
    }

    #[test]
    fn today_summary_formats_onset_and_peak() {
        let forecast = vec![day(vec![hour(0, 0, "Clear"), hour(9, 45, "Light rain")])];
        assert_eq!(
            today_summary(&forecast, Language::En).as_deref(),
            Some("Light rain from 09:00 (45%)")
        );

        let forecast = vec![day(vec![hour(0, 20, "Cloudy")])];
        assert_eq!(
            today_summary(&forecast, Language::Ru).as_deref(),
            Some("Возможен дождь (до 20%)")
        );

        assert_eq!(today_summary(&[], Language::En), None);
    }

    #[test]
    fn day_outlook_tri_state() {
        let definite =
            day_outlook(&day(vec![hour(15, 20, "Cloudy"), hour(18, 70, "Rain")]), Language::En);
        assert_eq!(definite.level, RainLevel::Definite);
        assert_eq!(definite.text, "Rain from 18:00 (70%)");
        assert_eq!(definite.level.icon(), "rainy");

        let possible = day_outlook(&day(vec![hour(0, 15, "Cloudy")]), Language::Ru);
        assert_eq!(possible.level, RainLevel::Possible);
        assert_eq!(possible.text, "Возможен дождь (15%)");
        assert_eq!(possible.level.icon(), "rainy-outline");

        let none = day_outlook(&day(vec![hour(0, 5, "Clear")]), Language::En);
        assert_eq!(none.level, RainLevel::None);
        assert_eq!(none.text, "No precipitation");
        assert!(!none.level.has_rain());
    }

    #[test]
    fn single_daily_record_never_claims_an_onset_hour() {
        let daily = day(vec![hour(0, 85, "Light rain")]);

        let outlook = day_outlook(&daily, Language::En);
        assert_eq!(outlook.text, "Rain (85%)");
        assert_eq!(outlook.level, RainLevel::Definite);

        let outlook = day_outlook(&daily, Language::Ru);
        assert_eq!(outlook.text, "Дождь (85%)");

        let summary = today_summary(&[daily], Language::En);
        assert_eq!(summary.as_deref(), Some("Light rain (up to 85%)"));
    }

    #[test]
    fn rainy_hours_lists_hours_above_twenty() {
        let d = day(vec![hour(0, 20, "a"), hour(3, 21, "b"), hour(6, 80, "c")]);
        let hours: Vec<u8> = rainy_hours(&d).iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![3, 6]);
    }
}
