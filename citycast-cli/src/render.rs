use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use citycast_core::{
    DayForecast, Language, WeatherResult,
    display::{ConditionIcon, TemperatureBand},
    rain,
};

struct Labels {
    feels_like: &'static str,
    humidity: &'static str,
    pressure: &'static str,
    hpa: &'static str,
    visibility: &'static str,
    km: &'static str,
    wind: &'static str,
    speed_unit: &'static str,
    forecast_title: &'static str,
    today: &'static str,
    tomorrow: &'static str,
    rain_hours: &'static str,
}

const RU: Labels = Labels {
    feels_like: "Ощущается как",
    humidity: "Влажность",
    pressure: "Давление",
    hpa: "гПа",
    visibility: "Видимость",
    km: "км",
    wind: "Ветер",
    speed_unit: "км/ч",
    forecast_title: "Прогноз на 3 дня",
    today: "Сегодня",
    tomorrow: "Завтра",
    rain_hours: "Дождь по часам",
};

const EN: Labels = Labels {
    feels_like: "Feels like",
    humidity: "Humidity",
    pressure: "Pressure",
    hpa: "hPa",
    visibility: "Visibility",
    km: "km",
    wind: "Wind",
    speed_unit: "km/h",
    forecast_title: "3-day forecast",
    today: "Today",
    tomorrow: "Tomorrow",
    rain_hours: "Rain by hour",
};

fn labels(lang: Language) -> &'static Labels {
    match lang {
        Language::Ru => &RU,
        Language::En => &EN,
    }
}

/// "Today" and "Tomorrow" by position, the weekday name after that.
pub fn day_label(date: NaiveDate, index: usize, lang: Language) -> String {
    let l = labels(lang);
    match index {
        0 => l.today.to_string(),
        1 => l.tomorrow.to_string(),
        _ => weekday_name(date.weekday(), lang).to_string(),
    }
}

fn weekday_name(day: Weekday, lang: Language) -> &'static str {
    match (lang, day) {
        (Language::Ru, Weekday::Mon) => "понедельник",
        (Language::Ru, Weekday::Tue) => "вторник",
        (Language::Ru, Weekday::Wed) => "среда",
        (Language::Ru, Weekday::Thu) => "четверг",
        (Language::Ru, Weekday::Fri) => "пятница",
        (Language::Ru, Weekday::Sat) => "суббота",
        (Language::Ru, Weekday::Sun) => "воскресенье",
        (Language::En, Weekday::Mon) => "Monday",
        (Language::En, Weekday::Tue) => "Tuesday",
        (Language::En, Weekday::Wed) => "Wednesday",
        (Language::En, Weekday::Thu) => "Thursday",
        (Language::En, Weekday::Fri) => "Friday",
        (Language::En, Weekday::Sat) => "Saturday",
        (Language::En, Weekday::Sun) => "Sunday",
    }
}

fn short_date(date: NaiveDate, lang: Language) -> String {
    match lang {
        Language::Ru => date.format("%d.%m").to_string(),
        Language::En => date.format("%b %d").to_string(),
    }
}

/// Full text report: current conditions, today's rain summary and the forecast.
pub fn weather(result: &WeatherResult, lang: Language, today: NaiveDate) -> String {
    Report { result, lang, today }.to_string()
}

struct Report<'a> {
    result: &'a WeatherResult,
    lang: Language,
    today: NaiveDate,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report { result, lang, today } = *self;
        let l = labels(lang);
        let current = &result.current;

        writeln!(f, "{}  ({}, {})", result.location_name, result.provider, short_date(today, lang))?;
        writeln!(
            f,
            "  {}°  {}  [{}, {:?}]",
            current.temperature_c,
            current.description,
            ConditionIcon::from_description(&current.description).name(),
            TemperatureBand::of(current.temperature_c),
        )?;
        writeln!(f, "  {} {}°", l.feels_like, current.feels_like_c)?;
        if let Some(summary) = rain::today_summary(&result.forecast, lang) {
            writeln!(f, "  {summary}")?;
        }
        writeln!(
            f,
            "  {} {} {} · {} {}% · {} {} {} · {} {} {}",
            l.visibility,
            current.visibility_km,
            l.km,
            l.humidity,
            current.humidity_pct,
            l.pressure,
            current.pressure_hpa,
            l.hpa,
            l.wind,
            current.wind_speed,
            l.speed_unit,
        )?;

        writeln!(f)?;
        writeln!(f, "{}", l.forecast_title)?;
        for (index, day) in result.forecast.iter().enumerate() {
            write_day(f, day, index, lang)?;
        }
        Ok(())
    }
}

fn write_day(f: &mut fmt::Formatter<'_>, day: &DayForecast, index: usize, lang: Language) -> fmt::Result {
    let l = labels(lang);
    let outlook = rain::day_outlook(day, lang);

    writeln!(
        f,
        "  {:<12} {}  {}° / {}°  {}",
        day_label(day.date, index, lang),
        short_date(day.date, lang),
        day.max_temp_c,
        day.min_temp_c,
        day.description,
    )?;
    writeln!(f, "      {} {}% · {} [{}]", l.humidity, day.humidity_pct, outlook.text, outlook.level.icon())?;

    // Daily-only providers have a single synthesized record; no strip for those.
    let rainy = rain::rainy_hours(day);
    if day.hourly.len() > 1 && !rainy.is_empty() {
        let hours: Vec<String> = rainy
            .iter()
            .map(|h| format!("{:02}:00 {}%", h.hour, h.chance_of_rain_pct))
            .collect();
        writeln!(f, "      {}: {}", l.rain_hours, hours.join(", "))?;
    }
    Ok(())
}
