//! Persistent state for WeatherLens
//!
//! This module provides a small key-value store that keeps JSON documents in
//! the platform data directory, and the recently searched city list built on
//! top of it.

mod history;
mod manager;

pub use history::{CityHistory, MAX_CITY_HISTORY};
pub use manager::{Store, StoredData};
