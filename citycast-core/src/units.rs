//! Conversion of raw provider measurements to display units.
//!
//! All functions round half away from zero (`f64::round`). Callers replace
//! absent or non-finite readings with `0.0` via [`finite_or_zero`] first.

pub fn to_integer_celsius(raw_c: f64) -> i32 {
    to_whole(raw_c)
}

pub fn to_integer_hpa(raw_hpa: f64) -> i32 {
    to_whole(raw_hpa)
}

/// Meters to whole kilometers.
pub fn to_km(raw_meters: f64) -> i32 {
    to_whole(raw_meters / 1000.0)
}

/// Rounds a speed, keeping the provider's unit.
pub fn to_speed_unit(raw: f64) -> i32 {
    to_whole(raw)
}

/// Rounds and clamps to 0..=100.
pub fn to_percent(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round() as u8
}

pub fn finite_or_zero(raw: Option<f64>) -> f64 {
    match raw {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Nearest whole number for readings already in display units. `as`
/// saturates at the i32 bounds.
pub fn to_whole(value: f64) -> i32 {
    value.round() as i32
}
