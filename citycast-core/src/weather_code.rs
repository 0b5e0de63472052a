//! WMO weather interpretation codes as used by the primary forecast provider.

use crate::model::Language;

/// Human-readable description for a weather code. Total: unknown codes map
/// to the "unknown" text of the language.
pub fn describe(code: i32, lang: Language) -> &'static str {
    match lang {
        Language::Ru => describe_ru(code),
        Language::En => describe_en(code),
    }
}

pub fn unknown(lang: Language) -> &'static str {
    match lang {
        Language::Ru => "Неизвестно",
        Language::En => "Unknown",
    }
}

fn describe_ru(code: i32) -> &'static str {
    match code {
        0 => "Ясно",
        1 => "Преимущественно ясно",
        2 => "Переменная облачность",
        3 => "Пасмурно",
        45 => "Туман",
        48 => "Изморозь",
        51 => "Легкая морось",
        53 => "Умеренная морось",
        55 => "Сильная морось",
        56 => "Легкая ледяная морось",
        57 => "Сильная ледяная морось",
        61 => "Легкий дождь",
        63 => "Умеренный дождь",
        65 => "Сильный дождь",
        66 => "Легкий ледяной дождь",
        67 => "Сильный ледяной дождь",
        71 => "Легкий снег",
        73 => "Умеренный снег",
        75 => "Сильный снег",
        77 => "Снежные зерна",
        80 => "Легкие ливни",
        81 => "Умеренные ливни",
        82 => "Сильные ливни",
        85 => "Легкие снежные ливни",
        86 => "Сильные снежные ливни",
        95 => "Гроза",
        96 => "Гроза с легким градом",
        99 => "Гроза с сильным градом",
        _ => unknown(Language::Ru),
    }
}

fn describe_en(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Light rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Light snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Light rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Light snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with light hail",
        99 => "Thunderstorm with heavy hail",
        _ => unknown(Language::En),
    }
}
