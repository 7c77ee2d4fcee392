//! Weather data sources
//!
//! The dashboard can be driven either by local synthesis or by a host bridge.
//! Both sit behind [`WeatherSource`]; [`fetch_snapshot`] assembles a complete
//! [`Snapshot`] from whichever one is configured.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    AirQualitySnapshot, Coordinates, ForecastDay, HourlyEntry, Snapshot, Synthesizer, Units,
    WeatherSnapshot, FORECAST_DAYS, HOURLY_HOURS,
};
use crate::assistant::Assistant;

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum SourceError {
    /// The remote side reported a failure; the message is shown verbatim
    #[error("{0}")]
    Remote(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A successful reply did not carry the expected payload
    #[error("Missing expected field in response: {0}")]
    MissingPayload(&'static str),
}

/// Parameters shared by every fetch for one city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub city: String,
    pub units: Units,
    /// Language code for descriptions, e.g. "en"
    pub lang: String,
}

impl CityQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            units: Units::Metric,
            lang: "en".to_string(),
        }
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// A provider of weather entities and assistant replies.
///
/// Every call is an asynchronous wait point. Implementations return the same
/// entity shapes whether they generate data locally or call out to a host.
pub trait WeatherSource {
    /// Current conditions for the queried city
    fn current(
        &self,
        query: &CityQuery,
    ) -> impl Future<Output = Result<WeatherSnapshot, SourceError>> + Send;

    /// Extended forecast of `days` days
    fn forecast(
        &self,
        query: &CityQuery,
        days: usize,
    ) -> impl Future<Output = Result<Vec<ForecastDay>, SourceError>> + Send;

    /// Hourly forecast of `hours` hours
    fn hourly(
        &self,
        query: &CityQuery,
        hours: usize,
    ) -> impl Future<Output = Result<Vec<HourlyEntry>, SourceError>> + Send;

    /// Air quality at the coordinates resolved by [`WeatherSource::current`]
    fn air_quality(
        &self,
        query: &CityQuery,
        coordinates: Coordinates,
    ) -> impl Future<Output = Result<AirQualitySnapshot, SourceError>> + Send;

    /// Answers a free-text question about the queried city, given its
    /// latest conditions (in `query.units`) if any
    fn ask(
        &self,
        question: &str,
        current: Option<&WeatherSnapshot>,
        query: &CityQuery,
    ) -> impl Future<Output = Result<String, SourceError>> + Send;
}

/// Fetches a complete snapshot for the queried city.
///
/// Current conditions are fetched first because air quality needs their
/// coordinates. If they fail nothing else is requested. The remaining three
/// fetches run concurrently and any failure fails the whole snapshot, so the
/// caller never sees partial data.
pub async fn fetch_snapshot<S: WeatherSource>(
    source: &S,
    query: &CityQuery,
) -> Result<Snapshot, SourceError> {
    info!("Fetching weather for {}", query.city);

    let current = source.current(query).await.map_err(|e| {
        warn!("Current weather for {} failed: {}", query.city, e);
        e
    })?;

    let (forecast, hourly, air_quality) = futures::try_join!(
        source.forecast(query, FORECAST_DAYS),
        source.hourly(query, HOURLY_HOURS),
        source.air_quality(query, current.coordinates),
    )
    .map_err(|e| {
        warn!("Snapshot for {} failed: {}", query.city, e);
        e
    })?;

    debug!(
        "Snapshot for {}: {} forecast days, {} hourly entries, AQI {}",
        query.city,
        forecast.len(),
        hourly.len(),
        air_quality.aqi
    );

    Ok(Snapshot {
        current,
        forecast,
        hourly,
        air_quality,
    })
}

/// Simulated delays applied by [`SyntheticSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// Delay before current conditions are returned
    pub fetch: Duration,
    /// Minimum assistant "thinking" delay
    pub think_min: Duration,
    /// Random extra thinking time, up to this much
    pub think_jitter: Duration,
}

impl Latency {
    /// No delays at all
    pub fn none() -> Self {
        Self {
            fetch: Duration::ZERO,
            think_min: Duration::ZERO,
            think_jitter: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            fetch: Duration::from_millis(1500),
            think_min: Duration::from_secs(2),
            think_jitter: Duration::from_secs(2),
        }
    }
}

/// Local source backed by the [`Synthesizer`] and the [`Assistant`]
///
/// The synthesizer draws metric values; they are converted to the units of
/// each query before being returned.
#[derive(Debug)]
pub struct SyntheticSource {
    synth: Mutex<Synthesizer>,
    assistant: Mutex<Assistant>,
    latency: Latency,
}

impl SyntheticSource {
    /// Creates an entropy-seeded source with the default simulated latency
    pub fn new() -> Self {
        Self {
            synth: Mutex::new(Synthesizer::new()),
            assistant: Mutex::new(Assistant::new()),
            latency: Latency::default(),
        }
    }

    /// Creates a source whose synthesizer and assistant are seeded
    pub fn seeded(seed: u64) -> Self {
        Self {
            synth: Mutex::new(Synthesizer::seeded(seed)),
            assistant: Mutex::new(Assistant::seeded(seed.wrapping_add(1))),
            latency: Latency::default(),
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Runs `f` against the synthesizer. A poisoned lock is recovered since
    /// the synthesizer holds no invariants beyond its RNG state.
    fn with_synth<T>(&self, f: impl FnOnce(&mut Synthesizer) -> T) -> T {
        let mut synth = self.synth.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut synth)
    }

    fn think_delay(&self) -> Duration {
        let jitter = self.latency.think_jitter.as_millis() as u64;
        let extra = if jitter == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..jitter)
        };
        self.latency.think_min + Duration::from_millis(extra)
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherSource for SyntheticSource {
    async fn current(&self, query: &CityQuery) -> Result<WeatherSnapshot, SourceError> {
        if !self.latency.fetch.is_zero() {
            tokio::time::sleep(self.latency.fetch).await;
        }
        let current = self.with_synth(|s| s.current(&query.city, Utc::now()));
        Ok(current.convert(Units::Metric, query.units))
    }

    async fn forecast(
        &self,
        query: &CityQuery,
        days: usize,
    ) -> Result<Vec<ForecastDay>, SourceError> {
        let forecast = self.with_synth(|s| s.forecast(Utc::now(), days));
        Ok(forecast
            .into_iter()
            .map(|day| day.convert(Units::Metric, query.units))
            .collect())
    }

    async fn hourly(&self, query: &CityQuery, hours: usize) -> Result<Vec<HourlyEntry>, SourceError> {
        let hourly = self.with_synth(|s| s.hourly(Utc::now(), hours));
        Ok(hourly
            .into_iter()
            .map(|hour| hour.convert(Units::Metric, query.units))
            .collect())
    }

    async fn air_quality(
        &self,
        _query: &CityQuery,
        _coordinates: Coordinates,
    ) -> Result<AirQualitySnapshot, SourceError> {
        Ok(self.with_synth(|s| s.air_quality()))
    }

    async fn ask(
        &self,
        question: &str,
        current: Option<&WeatherSnapshot>,
        query: &CityQuery,
    ) -> Result<String, SourceError> {
        let delay = self.think_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        // Reply bands and templates are in °C and m/s
        let metric = current.map(|c| c.clone().convert(query.units, Units::Metric));
        let mut assistant = self.assistant.lock().unwrap_or_else(|e| e.into_inner());
        Ok(assistant.reply(question, metric.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quiet_source(seed: u64) -> SyntheticSource {
        SyntheticSource::seeded(seed).with_latency(Latency::none())
    }

    #[tokio::test]
    async fn test_fetch_snapshot_from_synthetic_source() {
        let source = quiet_source(1);
        let query = CityQuery::new("Paris");

        let snapshot = fetch_snapshot(&source, &query)
            .await
            .expect("Synthetic fetch should succeed");

        assert_eq!(snapshot.city(), "Paris");
        assert_eq!(snapshot.forecast.len(), FORECAST_DAYS);
        assert_eq!(snapshot.hourly.len(), HOURLY_HOURS);
        assert!((1..=300).contains(&snapshot.air_quality.aqi));
    }

    #[tokio::test]
    async fn test_synthetic_ask_answers_rain_questions() {
        let source = quiet_source(2);
        let reply = source
            .ask("Do I need an umbrella?", None, &CityQuery::new("London"))
            .await
            .expect("Synthetic ask should succeed");

        assert!(crate::assistant::RAIN_REPLIES.contains(&reply.as_str()));
    }

    #[tokio::test]
    async fn test_imperial_query_converts_synthesized_values() {
        let source = quiet_source(3);
        let query = CityQuery::new("Denver").with_units(Units::Imperial);

        for _ in 0..200 {
            let current = source.current(&query).await.unwrap();
            // 15..=35 °C
            assert!((59..=95).contains(&current.temperature), "got {}", current.temperature);
            assert!((59..=95).contains(&current.feels_like));
            // 10..=25 °C
            assert!((50..=77).contains(&current.dew_point));
            assert!((0.0..=33.6).contains(&current.wind_speed));
        }

        let snapshot = fetch_snapshot(&source, &query).await.unwrap();
        for day in &snapshot.forecast {
            assert!((64..=91).contains(&day.temp_high), "got {}", day.temp_high);
            assert!((41..=68).contains(&day.temp_low), "got {}", day.temp_low);
        }
        for hour in &snapshot.hourly {
            assert!((59..=95).contains(&hour.temperature), "got {}", hour.temperature);
        }
    }

    #[tokio::test]
    async fn test_metric_query_keeps_synthesized_values() {
        let source = quiet_source(4);
        let current = source.current(&CityQuery::new("Oslo")).await.unwrap();

        assert!((15..=35).contains(&current.temperature));
    }

    #[tokio::test]
    async fn test_ask_reads_imperial_conditions_as_celsius() {
        let source = quiet_source(5);
        let query = CityQuery::new("Denver").with_units(Units::Imperial);
        let mut current = source.current(&query).await.unwrap();
        // 20 °C is mild; 68 read as °C would be warm
        current.temperature = 68;

        let reply = source
            .ask("What should I wear?", Some(&current), &query)
            .await
            .unwrap();

        assert_eq!(reply, crate::assistant::MILD_CLOTHING);
    }

    #[test]
    fn test_latency_none_is_zero() {
        let latency = Latency::none();
        assert!(latency.fetch.is_zero());
        assert!(latency.think_min.is_zero());
        assert!(latency.think_jitter.is_zero());
        assert_eq!(Latency::default().fetch, Duration::from_millis(1500));
    }

    #[test]
    fn test_city_query_builders() {
        let query = CityQuery::new("Madrid")
            .with_units(Units::Imperial)
            .with_lang("es");

        assert_eq!(query.city, "Madrid");
        assert_eq!(query.units, Units::Imperial);
        assert_eq!(query.lang, "es");
    }

    /// Source whose current-conditions call fails and that counts the
    /// secondary calls it receives
    struct FailingCurrent {
        secondary_calls: AtomicUsize,
    }

    impl WeatherSource for FailingCurrent {
        async fn current(&self, _query: &CityQuery) -> Result<WeatherSnapshot, SourceError> {
            Err(SourceError::Remote("network unreachable".to_string()))
        }

        async fn forecast(
            &self,
            _query: &CityQuery,
            _days: usize,
        ) -> Result<Vec<ForecastDay>, SourceError> {
            self.secondary_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn hourly(
            &self,
            _query: &CityQuery,
            _hours: usize,
        ) -> Result<Vec<HourlyEntry>, SourceError> {
            self.secondary_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn air_quality(
            &self,
            _query: &CityQuery,
            _coordinates: Coordinates,
        ) -> Result<AirQualitySnapshot, SourceError> {
            self.secondary_calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::MissingPayload("airQuality"))
        }

        async fn ask(
            &self,
            _question: &str,
            _current: Option<&WeatherSnapshot>,
            _query: &CityQuery,
        ) -> Result<String, SourceError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_current_failure_skips_dependent_fetches() {
        let source = FailingCurrent {
            secondary_calls: AtomicUsize::new(0),
        };

        let err = fetch_snapshot(&source, &CityQuery::new("Paris"))
            .await
            .expect_err("Fetch should fail");

        assert_eq!(err.to_string(), "network unreachable");
        assert_eq!(source.secondary_calls.load(Ordering::SeqCst), 0);
    }

    /// Source that succeeds everywhere except air quality
    struct FailingAirQuality(SyntheticSource);

    impl WeatherSource for FailingAirQuality {
        async fn current(&self, query: &CityQuery) -> Result<WeatherSnapshot, SourceError> {
            self.0.current(query).await
        }

        async fn forecast(
            &self,
            query: &CityQuery,
            days: usize,
        ) -> Result<Vec<ForecastDay>, SourceError> {
            self.0.forecast(query, days).await
        }

        async fn hourly(
            &self,
            query: &CityQuery,
            hours: usize,
        ) -> Result<Vec<HourlyEntry>, SourceError> {
            self.0.hourly(query, hours).await
        }

        async fn air_quality(
            &self,
            _query: &CityQuery,
            _coordinates: Coordinates,
        ) -> Result<AirQualitySnapshot, SourceError> {
            Err(SourceError::Remote("air quality service down".to_string()))
        }

        async fn ask(
            &self,
            question: &str,
            current: Option<&WeatherSnapshot>,
            query: &CityQuery,
        ) -> Result<String, SourceError> {
            self.0.ask(question, current, query).await
        }
    }

    #[tokio::test]
    async fn test_secondary_failure_fails_whole_snapshot() {
        let source = FailingAirQuality(quiet_source(3));

        let err = fetch_snapshot(&source, &CityQuery::new("Paris"))
            .await
            .expect_err("Fetch should fail");

        assert_eq!(err.to_string(), "air quality service down");
    }
}
