//! Weather assistant
//!
//! Answers free-text questions by matching keywords against a fixed set of
//! topics and picking one of that topic's canned replies. Questions that match
//! no topic get a general reply built from the latest conditions.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::data::WeatherSnapshot;

/// Question suggestions offered in the assistant panel
pub const SUGGESTIONS: [&str; 8] = [
    "What should I wear today?",
    "Is it good weather for a picnic this weekend?",
    "When will the rain stop?",
    "Should I water my plants today?",
    "Best time for morning run?",
    "Do I need an umbrella?",
    "Is the air quality good for cycling?",
    "What's the UV index like today?",
];

/// Shown when the assistant cannot be reached
pub const APOLOGY: &str = "I apologize, but I'm having trouble processing your question right now. Please try again in a moment.";

pub const RAIN_REPLIES: [&str; 3] = [
    "Based on current weather patterns, there's a 60% chance of rain this afternoon. I recommend carrying an umbrella, especially between 2-5 PM when precipitation is most likely.",
    "Looking at the radar data, light showers are expected around 3 PM. The rain should be brief, but an umbrella would be wise for outdoor activities.",
    "Current atmospheric pressure suggests rain is likely within the next 4 hours. Pack an umbrella and consider waterproof clothing if you'll be outside for extended periods.",
];

pub const EXERCISE_REPLIES: [&str; 3] = [
    "Perfect conditions for outdoor exercise! The air quality is good (AQI: 45), temperature is comfortable at 22°C, and UV index is moderate. Best time would be between 7-9 AM or 6-8 PM.",
    "Great weather for running! Current conditions show low humidity (55%), light winds, and excellent visibility. I'd recommend early morning for the coolest temperatures.",
    "Ideal outdoor activity weather! Air quality is excellent, no precipitation expected for the next 6 hours, and comfortable temperature. Don't forget sunscreen - UV index is 6.",
];

pub const TRAVEL_REPLIES: [&str; 3] = [
    "Weather conditions look favorable for travel. Clear skies with minimal wind shear expected. However, check your destination's weather as conditions can vary significantly.",
    "Excellent travel weather! No severe weather alerts in the area, good visibility (15km), and stable atmospheric conditions. Safe travels!",
    "Travel conditions are optimal. No storms or adverse weather expected along major travel routes. Flight delays due to weather are unlikely today.",
];

pub const OUTDOOR_EVENT_REPLIES: [&str; 3] = [
    "Perfect picnic weather! Clear skies, comfortable temperature, and light winds. I'd recommend setting up in a spot with some shade for the afternoon. Don't forget to secure lightweight items.",
    "Great day for outdoor dining! No rain expected, pleasant temperature, and good air quality. The wind is calm, so your napkins won't blow away! Enjoy your meal outdoors.",
    "Excellent conditions for a barbecue! Low wind speeds mean easy grilling, and the weather will stay pleasant through the evening. Perfect for outdoor entertaining.",
];

pub const WARM_CLOTHING: &str = "It's quite warm today! I recommend light, breathable clothing like cotton or linen. Don't forget sunglasses, a hat, and sunscreen. Shorts and a t-shirt would be perfect.";
pub const MILD_CLOTHING: &str = "Pleasant temperature today! A light jacket or cardigan would be perfect for layering. Jeans and a long-sleeve shirt should be comfortable. You might want to bring a light sweater for evening.";
pub const COLD_CLOTHING: &str = "It's a bit chilly today. I recommend layering with a warm jacket or coat. Long pants, closed shoes, and perhaps a scarf would keep you comfortable. Don't forget gloves if you'll be outside long.";

pub const SKIP_WATERING: &str = "High humidity levels (75%) mean your plants are getting plenty of moisture from the air. Check soil moisture before watering - they might not need as much today.";
pub const WATER_NOW: &str = "With current humidity at 55% and no recent rainfall, your plants would appreciate some watering. Early morning or evening would be the best times to water.";

/// Number of general templates
pub const GENERAL_TEMPLATE_COUNT: usize = 4;

/// Temperature assumed when no conditions are loaded
const DEFAULT_TEMPERATURE: i32 = 20;
/// Humidity assumed when no conditions are loaded
const DEFAULT_HUMIDITY: u8 = 60;

/// Question categories, in matching order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Rain,
    Exercise,
    Travel,
    Clothing,
    Garden,
    OutdoorEvent,
    General,
}

/// Keyword groups checked in order; the first group with a hit wins
const KEYWORDS: [(Topic, &[&str]); 6] = [
    (Topic::Rain, &["rain", "umbrella"]),
    (Topic::Exercise, &["run", "exercise", "outdoor"]),
    (Topic::Travel, &["travel", "trip", "flight"]),
    (Topic::Clothing, &["wear", "clothes", "dress"]),
    (Topic::Garden, &["plants", "garden", "water"]),
    (Topic::OutdoorEvent, &["picnic", "barbecue", "bbq"]),
];

/// Classifies a question by case-insensitive substring search
pub fn classify(question: &str) -> Topic {
    let lower = question.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::General)
}

/// Clothing advice for a temperature in °C
pub fn clothing_advice(temperature: i32) -> &'static str {
    if temperature > 25 {
        WARM_CLOTHING
    } else if temperature > 15 {
        MILD_CLOTHING
    } else {
        COLD_CLOTHING
    }
}

/// Watering advice for a relative humidity percentage
pub fn watering_advice(humidity: u8) -> &'static str {
    if humidity > 70 {
        SKIP_WATERING
    } else {
        WATER_NOW
    }
}

/// Renders general template `index` (mod [`GENERAL_TEMPLATE_COUNT`])
pub fn general_reply(index: usize, current: Option<&WeatherSnapshot>) -> String {
    let description = |fallback: &'static str| {
        current
            .map(|c| c.description.as_str())
            .unwrap_or(fallback)
            .to_string()
    };

    match index % GENERAL_TEMPLATE_COUNT {
        0 => format!(
            "Based on current conditions in {}, the weather is {} with a temperature of {}°C. Air quality is good for most activities.",
            current.map(|c| c.city.as_str()).unwrap_or("your area"),
            description("pleasant"),
            current.map(|c| c.temperature).unwrap_or(DEFAULT_TEMPERATURE),
        ),
        1 => format!(
            "Current weather shows {} with comfortable conditions. Humidity is at {}% and winds are {} m/s. Great day to be outside!",
            description("clear skies"),
            current.map(|c| c.humidity).unwrap_or(DEFAULT_HUMIDITY),
            current.map(|c| c.wind_speed).unwrap_or(5.0),
        ),
        2 => format!(
            "Weather conditions are stable with {} skies. Temperature feels like {}°C. UV index is {}, so consider sun protection for extended outdoor time.",
            description("partly cloudy"),
            current.map(|c| c.feels_like).unwrap_or(22),
            current.map(|c| c.uv_index).unwrap_or(5),
        ),
        _ => format!(
            "Today's forecast shows {} conditions. Visibility is excellent at {}km, and atmospheric pressure is stable at {} hPa.",
            description("pleasant"),
            current.map(|c| c.visibility).unwrap_or(10),
            current.map(|c| c.pressure).unwrap_or(1013),
        ),
    }
}

/// Picks replies for questions.
///
/// Each call draws independently; there is no conversation memory.
#[derive(Debug, Clone)]
pub struct Assistant<R = StdRng> {
    rng: R,
}

impl Assistant<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Assistant<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Assistant<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Returns a reply for `question`, using `current` where a topic depends
    /// on conditions
    pub fn reply(&mut self, question: &str, current: Option<&WeatherSnapshot>) -> String {
        match classify(question) {
            Topic::Rain => self.pick(&RAIN_REPLIES),
            Topic::Exercise => self.pick(&EXERCISE_REPLIES),
            Topic::Travel => self.pick(&TRAVEL_REPLIES),
            Topic::Clothing => clothing_advice(
                current.map(|c| c.temperature).unwrap_or(DEFAULT_TEMPERATURE),
            )
            .to_string(),
            Topic::Garden => {
                watering_advice(current.map(|c| c.humidity).unwrap_or(DEFAULT_HUMIDITY))
                    .to_string()
            }
            Topic::OutdoorEvent => self.pick(&OUTDOOR_EVENT_REPLIES),
            Topic::General => {
                let index = self.rng.gen_range(0..GENERAL_TEMPLATE_COUNT);
                general_reply(index, current)
            }
        }
    }

    fn pick(&mut self, replies: &[&str]) -> String {
        replies
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default()
            .to_string()
    }
}
