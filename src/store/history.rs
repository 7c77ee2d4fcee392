//! Recently searched cities, most recent first

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Store;

/// Maximum number of remembered cities
pub const MAX_CITY_HISTORY: usize = 10;

/// Store key holding the history
const HISTORY_KEY: &str = "cities";

/// Ordered, duplicate-free list of searched city names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityHistory {
    cities: Vec<String>,
}

impl CityHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the history from the store, or an empty one if none is saved
    pub fn load(store: &Store) -> Self {
        let mut history = store
            .read::<CityHistory>(HISTORY_KEY)
            .map(|stored| stored.data)
            .unwrap_or_default();
        // Files edited by hand may break the invariants
        let cities = std::mem::take(&mut history.cities);
        for city in cities.into_iter().rev() {
            history.record(&city);
        }
        history
    }

    /// Saves the history; failures are logged, the in-memory list stays valid
    pub fn save(&self, store: &Store) {
        if let Err(e) = store.write(HISTORY_KEY, self) {
            warn!("Failed to save city history: {}", e);
        }
    }

    /// Moves `city` to the front, dropping the oldest entry past the limit.
    /// Blank names are ignored.
    pub fn record(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }

        self.cities.retain(|c| c != city);
        self.cities.insert(0, city.to_string());
        self.cities.truncate(MAX_CITY_HISTORY);
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cities.get(index).map(String::as_str)
    }
}
