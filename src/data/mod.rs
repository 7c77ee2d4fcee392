//! Core data models for WeatherLens
//!
//! This module contains the weather entities shown by the dashboard: current
//! conditions, the daily and hourly forecasts, and air quality. Every entity
//! serializes with camelCase keys, which is both the bridge wire format and
//! the export document format.

pub mod bridge;
pub mod source;
pub mod synth;

pub use bridge::BridgeClient;
pub use source::{fetch_snapshot, CityQuery, Latency, SourceError, SyntheticSource, WeatherSource};
pub use synth::Synthesizer;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of days in the extended forecast
pub const FORECAST_DAYS: usize = 15;

/// Number of hours in the hourly forecast
pub const HOURLY_HOURS: usize = 72;

/// Measurement system requested from a source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Parses a units name as accepted on the command line
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Some(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Some(Units::Imperial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Suffix for temperatures, e.g. "°C"
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    /// Unit for wind speeds
    pub fn speed_unit(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }

    /// Converts a whole-degree temperature measured in `from` into these units
    pub fn temperature_from(&self, value: i32, from: Units) -> i32 {
        match (from, *self) {
            (Units::Metric, Units::Imperial) => (value as f64 * 9.0 / 5.0 + 32.0).round() as i32,
            (Units::Imperial, Units::Metric) => {
                ((value as f64 - 32.0) * 5.0 / 9.0).round() as i32
            }
            _ => value,
        }
    }

    /// Converts a wind speed measured in `from` into these units, to one decimal place
    pub fn speed_from(&self, value: f64, from: Units) -> f64 {
        match (from, *self) {
            (Units::Metric, Units::Imperial) => {
                (value * MPH_PER_METRE_PER_SECOND * 10.0).round() / 10.0
            }
            (Units::Imperial, Units::Metric) => {
                (value / MPH_PER_METRE_PER_SECOND * 10.0).round() / 10.0
            }
            _ => value,
        }
    }
}

const MPH_PER_METRE_PER_SECOND: f64 = 2.237;

/// Geographic coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Severity tag carried by a weather alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A weather alert attached to the current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Display label, e.g. "⛈️ Storm Warning"
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable advice
    pub message: String,
    pub severity: Severity,
}

/// Current conditions for a city
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub city: String,
    /// ISO 3166 alpha-2 country code
    pub country: String,
    pub coordinates: Coordinates,
    pub temperature: i32,
    pub feels_like: i32,
    pub description: String,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: u16,
    pub wind_speed: f64,
    /// Wind direction in degrees [0, 360)
    pub wind_direction: u16,
    /// Visibility in km
    pub visibility: u16,
    pub uv_index: u8,
    pub dew_point: i32,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: u8,
    /// OpenWeatherMap icon code, e.g. "10d"
    pub icon: String,
    /// Sunrise as epoch seconds
    pub sunrise: i64,
    /// Sunset as epoch seconds
    pub sunset: i64,
    /// Lunar phase fraction in [0, 1)
    pub moon_phase: f64,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    pub last_updated: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Re-expresses temperatures and wind speed measured in `from` in `to`
    pub fn convert(mut self, from: Units, to: Units) -> Self {
        self.temperature = to.temperature_from(self.temperature, from);
        self.feels_like = to.temperature_from(self.feels_like, from);
        self.dew_point = to.temperature_from(self.dew_point, from);
        self.wind_speed = to.speed_from(self.wind_speed, from);
        self
    }
}

/// One day of the extended forecast
///
/// `temp_high >= temp_low` is not guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp_high: i32,
    pub temp_low: i32,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
    /// Chance of precipitation (0-100)
    pub precipitation: u8,
    pub uv_index: u8,
    pub sunrise: i64,
    pub sunset: i64,
}

impl ForecastDay {
    pub fn convert(mut self, from: Units, to: Units) -> Self {
        self.temp_high = to.temperature_from(self.temp_high, from);
        self.temp_low = to.temperature_from(self.temp_low, from);
        self.wind_speed = to.speed_from(self.wind_speed, from);
        self
    }
}

/// One hour of the hourly forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyEntry {
    /// Epoch seconds at the start of the hour
    pub timestamp: i64,
    pub temperature: i32,
    pub description: String,
    pub icon: String,
    pub precipitation: u8,
    pub wind_speed: f64,
    pub humidity: u8,
}

impl HourlyEntry {
    pub fn convert(mut self, from: Units, to: Units) -> Self {
        self.temperature = to.temperature_from(self.temperature, from);
        self.wind_speed = to.speed_from(self.wind_speed, from);
        self
    }
}

/// Air quality bucket derived from the AQI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AqiStatus {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
}

impl AqiStatus {
    /// Buckets an AQI value: Good (<=50), Moderate (<=100),
    /// Unhealthy for Sensitive (<=150), Unhealthy above that.
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiStatus::Good,
            51..=100 => AqiStatus::Moderate,
            101..=150 => AqiStatus::UnhealthyForSensitive,
            _ => AqiStatus::Unhealthy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiStatus::Good => "Good",
            AqiStatus::Moderate => "Moderate",
            AqiStatus::UnhealthyForSensitive => "Unhealthy for Sensitive",
            AqiStatus::Unhealthy => "Unhealthy",
        }
    }

    /// Style class shared with the web widget stylesheet
    pub fn style_class(&self) -> &'static str {
        match self {
            AqiStatus::Good => "aqi-good",
            AqiStatus::Moderate => "aqi-moderate",
            AqiStatus::UnhealthyForSensitive | AqiStatus::Unhealthy => "aqi-unhealthy",
        }
    }
}

/// Pollutant concentrations in µg/m³
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    pub pm25: u16,
    pub pm10: u16,
    pub o3: u16,
    pub no2: u16,
    pub so2: u16,
    pub co: u32,
}

/// Pollen levels on a 0-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pollen {
    pub tree: u8,
    pub grass: u8,
    pub weed: u8,
}

/// Air quality for a city
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualitySnapshot {
    /// Air Quality Index [1, 300]
    pub aqi: u16,
    pub status: AqiStatus,
    pub pollutants: Pollutants,
    pub pollen: Pollen,
}

/// Everything shown for one city at one point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastDay>,
    pub hourly: Vec<HourlyEntry>,
    pub air_quality: AirQualitySnapshot,
}

impl Snapshot {
    /// Name of the city this snapshot describes
    pub fn city(&self) -> &str {
        &self.current.city
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aqi_status_boundaries() {
        assert_eq!(AqiStatus::from_aqi(1), AqiStatus::Good);
        assert_eq!(AqiStatus::from_aqi(50), AqiStatus::Good);
        assert_eq!(AqiStatus::from_aqi(51), AqiStatus::Moderate);
        assert_eq!(AqiStatus::from_aqi(100), AqiStatus::Moderate);
        assert_eq!(AqiStatus::from_aqi(101), AqiStatus::UnhealthyForSensitive);
        assert_eq!(AqiStatus::from_aqi(150), AqiStatus::UnhealthyForSensitive);
        assert_eq!(AqiStatus::from_aqi(151), AqiStatus::Unhealthy);
        assert_eq!(AqiStatus::from_aqi(300), AqiStatus::Unhealthy);
    }

    #[test]
    fn test_aqi_status_labels_and_classes() {
        assert_eq!(AqiStatus::Good.label(), "Good");
        assert_eq!(AqiStatus::Good.style_class(), "aqi-good");
        assert_eq!(AqiStatus::Moderate.style_class(), "aqi-moderate");
        assert_eq!(
            AqiStatus::UnhealthyForSensitive.label(),
            "Unhealthy for Sensitive"
        );
        assert_eq!(
            AqiStatus::UnhealthyForSensitive.style_class(),
            "aqi-unhealthy"
        );
        assert_eq!(AqiStatus::Unhealthy.style_class(), "aqi-unhealthy");
    }

    #[test]
    fn test_units_parsing() {
        assert_eq!(Units::from_str("metric"), Some(Units::Metric));
        assert_eq!(Units::from_str("IMPERIAL"), Some(Units::Imperial));
        assert_eq!(Units::from_str("f"), Some(Units::Imperial));
        assert_eq!(Units::from_str("kelvin"), None);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(Units::Imperial.temperature_from(15, Units::Metric), 59);
        assert_eq!(Units::Imperial.temperature_from(35, Units::Metric), 95);
        assert_eq!(Units::Metric.temperature_from(59, Units::Imperial), 15);
        assert_eq!(Units::Metric.temperature_from(21, Units::Metric), 21);
        assert_eq!(Units::Imperial.speed_from(10.0, Units::Metric), 22.4);
        assert_eq!(Units::Metric.speed_from(22.4, Units::Imperial), 10.0);
    }

    #[test]
    fn test_whole_degree_conversion_round_trips() {
        for celsius in -40..=50 {
            let fahrenheit = Units::Imperial.temperature_from(celsius, Units::Metric);
            assert_eq!(Units::Metric.temperature_from(fahrenheit, Units::Imperial), celsius);
        }
    }

    #[test]
    fn test_alert_serializes_kind_as_type() {
        let alert = Alert {
            kind: "☀️ UV Warning".to_string(),
            message: "Very high UV index detected.".to_string(),
            severity: Severity::Low,
        };

        let json = serde_json::to_value(&alert).expect("Failed to serialize Alert");

        assert_eq!(json["type"], "☀️ UV Warning");
        assert_eq!(json["severity"], "low");
    }

    #[test]
    fn test_weather_snapshot_uses_camel_case_keys() {
        let json = r#"{
            "city": "London",
            "country": "GB",
            "coordinates": { "lat": 51.5, "lon": -0.12 },
            "temperature": 18,
            "feelsLike": 17,
            "description": "light rain",
            "humidity": 72,
            "pressure": 1012,
            "windSpeed": 4.2,
            "windDirection": 225,
            "visibility": 10,
            "uvIndex": 3,
            "dewPoint": 12,
            "cloudCover": 80,
            "icon": "10d",
            "sunrise": 1721016000,
            "sunset": 1721073600,
            "moonPhase": 0.42,
            "lastUpdated": "2024-07-15T12:00:00Z"
        }"#;

        let snapshot: WeatherSnapshot =
            serde_json::from_str(json).expect("Failed to deserialize WeatherSnapshot");

        assert_eq!(snapshot.city, "London");
        assert_eq!(snapshot.feels_like, 17);
        assert_eq!(snapshot.wind_direction, 225);
        assert_eq!(snapshot.cloud_cover, 80);
        assert!((snapshot.moon_phase - 0.42).abs() < 1e-9);
        assert!(snapshot.alerts.is_empty());
    }
}
