//! Display formatting for weather values
//!
//! Pure mappings from raw snapshot fields to labels, icons and times. Every
//! function is total: out-of-range input is folded into a valid bucket or a
//! placeholder rather than panicking.

use chrono::{DateTime, Local, TimeZone};

use crate::data::AqiStatus;

/// Compass points, clockwise from north
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Host serving weather icon images
const ICON_HOST: &str = "https://openweathermap.org/img/wn";

/// Maps a wind bearing in degrees to one of 16 compass points
pub fn wind_direction_label(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return COMPASS_POINTS[0];
    }
    let index = (degrees.rem_euclid(360.0) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// Lunar phase bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Buckets a phase fraction at 0.125 steps. Each threshold starts the
    /// next bucket, so 0.5 is Full Moon.
    pub fn from_fraction(phase: f64) -> Self {
        match phase {
            p if p < 0.125 => MoonPhase::New,
            p if p < 0.25 => MoonPhase::WaxingCrescent,
            p if p < 0.375 => MoonPhase::FirstQuarter,
            p if p < 0.5 => MoonPhase::WaxingGibbous,
            p if p < 0.625 => MoonPhase::Full,
            p if p < 0.75 => MoonPhase::WaningGibbous,
            p if p < 0.875 => MoonPhase::LastQuarter,
            _ => MoonPhase::WaningCrescent,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoonPhase::New => "🌑",
            MoonPhase::WaxingCrescent => "🌒",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::WaxingGibbous => "🌔",
            MoonPhase::Full => "🌕",
            MoonPhase::WaningGibbous => "🌖",
            MoonPhase::LastQuarter => "🌗",
            MoonPhase::WaningCrescent => "🌘",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

pub fn moon_phase(phase: f64) -> MoonPhase {
    MoonPhase::from_fraction(phase)
}

/// Moon phase as "<emoji> <name>", e.g. "🌕 Full Moon"
pub fn moon_phase_label(phase: f64) -> String {
    let bucket = moon_phase(phase);
    format!("{} {}", bucket.emoji(), bucket.name())
}

pub fn aqi_status(aqi: u16) -> AqiStatus {
    AqiStatus::from_aqi(aqi)
}

/// UV exposure band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
}

impl UvLevel {
    pub fn label(&self) -> &'static str {
        match self {
            UvLevel::Low => "Low",
            UvLevel::Moderate => "Moderate",
            UvLevel::High => "High",
        }
    }
}

/// High above 7, Moderate above 3, Low otherwise
pub fn uv_label(index: u8) -> UvLevel {
    if index > 7 {
        UvLevel::High
    } else if index > 3 {
        UvLevel::Moderate
    } else {
        UvLevel::Low
    }
}

/// Formats epoch seconds as zero-padded 24-hour `HH:MM` in local time
pub fn format_time(epoch_seconds: i64) -> String {
    format_time_in(epoch_seconds, &Local)
}

/// Formats epoch seconds as `HH:MM` in the given zone, or `--:--` if the
/// timestamp is out of range
pub fn format_time_in<Tz: TimeZone>(epoch_seconds: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|utc| utc.with_timezone(tz).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// URL of the image for an OpenWeatherMap icon code
pub fn weather_icon_url(icon_code: &str) -> String {
    format!("{}/{}@2x.png", ICON_HOST, icon_code)
}

/// Emoji for an OpenWeatherMap icon code, for terminals that cannot show images
pub fn icon_emoji(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" | "10n" => "🌧️",
        "10d" => "🌦️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => "🌤️",
    }
}
