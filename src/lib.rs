//! WeatherLens Library
//!
//! Exposes the application modules so the binary and integration tests share them.

pub mod app;
pub mod assistant;
pub mod cli;
pub mod data;
pub mod export;
pub mod format;
pub mod logging;
pub mod store;
pub mod ui;
