//! Mock weather generation
//!
//! Produces plausible weather for any city name by bounded random sampling of
//! each field. Entities are drawn independently: the hourly forecast does not
//! agree with the daily one, and a day's low may exceed its high.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{
    AirQualitySnapshot, Alert, AqiStatus, Coordinates, ForecastDay, HourlyEntry, Pollen,
    Pollutants, Severity, Snapshot, WeatherSnapshot, FORECAST_DAYS, HOURLY_HOURS,
};

/// Condition descriptions a generated entity can carry
pub const CONDITIONS: [&str; 14] = [
    "sunny",
    "partly cloudy",
    "cloudy",
    "overcast",
    "light rain",
    "moderate rain",
    "heavy rain",
    "thunderstorm",
    "snow",
    "fog",
    "mist",
    "drizzle",
    "clear sky",
    "scattered clouds",
];

/// OpenWeatherMap icon codes a generated entity can carry
pub const ICONS: [&str; 9] = ["01d", "02d", "03d", "04d", "09d", "10d", "11d", "13d", "50d"];

const COUNTRIES: [&str; 10] = ["GB", "US", "FR", "DE", "IT", "ES", "CA", "AU", "JP", "IN"];

/// Fixed alert catalog: (label, message, severity)
const ALERT_CATALOG: [(&str, &str, Severity); 5] = [
    (
        "⛈️ Storm Warning",
        "Severe thunderstorms expected in the next 6 hours. Seek shelter indoors.",
        Severity::High,
    ),
    (
        "🌡️ Heat Advisory",
        "Temperatures may reach dangerous levels. Stay hydrated and avoid prolonged sun exposure.",
        Severity::Medium,
    ),
    (
        "🌫️ Air Quality Alert",
        "Poor air quality conditions detected. Limit outdoor activities.",
        Severity::Medium,
    ),
    (
        "☀️ UV Warning",
        "Very high UV index detected. Use sunscreen and protective clothing.",
        Severity::Low,
    ),
    (
        "🌪️ Wind Advisory",
        "Strong winds expected. Secure loose objects and avoid high-profile vehicles.",
        Severity::Medium,
    ),
];

/// Probability that a snapshot carries an alert
const ALERT_PROBABILITY: f64 = 0.4;

/// Base coordinates that generated locations scatter around (London)
const BASE_COORDINATES: Coordinates = Coordinates {
    lat: 51.5074,
    lon: -0.1278,
};

/// Generates mock weather entities from an injected random source.
///
/// Seeding the source with [`Synthesizer::seeded`] makes every draw
/// reproducible, which is what the tests rely on.
#[derive(Debug, Clone)]
pub struct Synthesizer<R = StdRng> {
    rng: R,
}

impl Synthesizer<StdRng> {
    /// Creates a synthesizer seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a synthesizer with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Synthesizer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Synthesizer<R> {
    /// Creates a synthesizer drawing from the given random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a full snapshot for `city` as of `now`
    pub fn snapshot(&mut self, city: &str, now: DateTime<Utc>) -> Snapshot {
        debug!("Synthesizing snapshot for {}", city);
        Snapshot {
            current: self.current(city, now),
            forecast: self.forecast(now, FORECAST_DAYS),
            hourly: self.hourly(now, HOURLY_HOURS),
            air_quality: self.air_quality(),
        }
    }

    /// Generates current conditions
    pub fn current(&mut self, city: &str, now: DateTime<Utc>) -> WeatherSnapshot {
        let now_secs = now.timestamp();
        let coordinates = Coordinates {
            lat: BASE_COORDINATES.lat + (self.rng.gen::<f64>() - 0.5) * 10.0,
            lon: BASE_COORDINATES.lon + (self.rng.gen::<f64>() - 0.5) * 10.0,
        };

        WeatherSnapshot {
            city: city.to_string(),
            country: self.pick(&COUNTRIES).to_string(),
            coordinates,
            temperature: self.temperature(),
            feels_like: self.temperature(),
            description: self.condition(),
            humidity: self.humidity(),
            pressure: self.draw(1000.0, 50.0) as u16,
            wind_speed: self.wind_speed(),
            wind_direction: (self.draw(0.0, 360.0) as u16) % 360,
            visibility: self.draw(5.0, 15.0) as u16,
            uv_index: self.uv_index(),
            dew_point: self.draw(10.0, 15.0) as i32,
            cloud_cover: self.percent(),
            icon: self.icon(),
            sunrise: now_secs - 3600,
            sunset: now_secs + 3600,
            moon_phase: self.rng.gen::<f64>(),
            alerts: self.alerts(),
            last_updated: now,
        }
    }

    /// Generates `days` forecast days starting today
    pub fn forecast(&mut self, now: DateTime<Utc>, days: usize) -> Vec<ForecastDay> {
        let now_secs = now.timestamp();
        (0..days)
            .map(|i| {
                let offset = i as i64 * 60;
                ForecastDay {
                    date: (now + Duration::days(i as i64)).date_naive(),
                    temp_high: self.draw(18.0, 15.0) as i32,
                    temp_low: self.draw(5.0, 15.0) as i32,
                    description: self.condition(),
                    icon: self.icon(),
                    humidity: self.humidity(),
                    wind_speed: self.wind_speed(),
                    precipitation: self.percent(),
                    uv_index: self.uv_index(),
                    sunrise: now_secs - 3600 + offset,
                    sunset: now_secs + 3600 + offset,
                }
            })
            .collect()
    }

    /// Generates `hours` hourly entries starting now, in chronological order
    pub fn hourly(&mut self, now: DateTime<Utc>, hours: usize) -> Vec<HourlyEntry> {
        let now_secs = now.timestamp();
        (0..hours)
            .map(|i| HourlyEntry {
                timestamp: now_secs + i as i64 * 3600,
                temperature: self.temperature(),
                description: self.condition(),
                icon: self.icon(),
                precipitation: self.percent(),
                wind_speed: self.wind_speed(),
                humidity: self.humidity(),
            })
            .collect()
    }

    /// Generates air quality with independent pollutant and pollen draws
    pub fn air_quality(&mut self) -> AirQualitySnapshot {
        // round(1 + U(0,300)) can land on 301
        let aqi = (self.draw(1.0, 300.0) as u16).min(300);

        AirQualitySnapshot {
            aqi,
            status: AqiStatus::from_aqi(aqi),
            pollutants: Pollutants {
                pm25: self.draw(0.0, 100.0) as u16,
                pm10: self.draw(0.0, 150.0) as u16,
                o3: self.draw(0.0, 200.0) as u16,
                no2: self.draw(0.0, 100.0) as u16,
                so2: self.draw(0.0, 50.0) as u16,
                co: self.draw(0.0, 10000.0) as u32,
            },
            pollen: Pollen {
                tree: self.draw(0.0, 5.0) as u8,
                grass: self.draw(0.0, 5.0) as u8,
                weed: self.draw(0.0, 5.0) as u8,
            },
        }
    }

    /// Draws zero or one alert from the fixed catalog
    pub fn alerts(&mut self) -> Vec<Alert> {
        if !self.rng.gen_bool(ALERT_PROBABILITY) {
            return Vec::new();
        }

        let (kind, message, severity) = *self.pick(&ALERT_CATALOG);
        vec![Alert {
            kind: kind.to_string(),
            message: message.to_string(),
            severity,
        }]
    }

    /// round(base + U(0, span))
    fn draw(&mut self, base: f64, span: f64) -> f64 {
        (base + self.rng.gen::<f64>() * span).round()
    }

    fn temperature(&mut self) -> i32 {
        self.draw(15.0, 20.0) as i32
    }

    fn humidity(&mut self) -> u8 {
        self.draw(40.0, 40.0) as u8
    }

    fn percent(&mut self) -> u8 {
        self.draw(0.0, 100.0) as u8
    }

    fn uv_index(&mut self) -> u8 {
        self.draw(0.0, 11.0) as u8
    }

    /// One decimal place, [0, 15]
    fn wind_speed(&mut self) -> f64 {
        (self.rng.gen::<f64>() * 15.0 * 10.0).round() / 10.0
    }

    fn condition(&mut self) -> String {
        self.pick(&CONDITIONS).to_string()
    }

    fn icon(&mut self) -> String {
        self.pick(&ICONS).to_string()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        // Catalogs are non-empty constants
        items.choose(&mut self.rng).unwrap_or(&items[0])
    }
}
