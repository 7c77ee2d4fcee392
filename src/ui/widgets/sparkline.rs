//! Temperature sparkline widget for the hourly forecast

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperatures (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A one-row sparkline of temperatures, scaled between their minimum and maximum
pub struct TemperatureSparkline<'a> {
    temperatures: &'a [i32],
    min: i32,
    max: i32,
    /// Highlighted entry (index into temperatures)
    marker: Option<usize>,
    style: Style,
    marker_style: Style,
}

impl<'a> TemperatureSparkline<'a> {
    pub fn new(temperatures: &'a [i32]) -> Self {
        let min = temperatures.iter().copied().min().unwrap_or(0);
        let max = temperatures.iter().copied().max().unwrap_or(0);
        Self {
            temperatures,
            min,
            max,
            marker: None,
            style: Style::default().fg(Color::Cyan),
            marker_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn marker(mut self, index: usize) -> Self {
        self.marker = Some(index);
        self
    }

    fn temperature_to_block(&self, temperature: i32) -> char {
        // In f64 so that extreme bridge values cannot overflow
        let span = self.max as f64 - self.min as f64;
        if span <= 0.0 {
            return BLOCKS[3];
        }
        let normalized = ((temperature as f64 - self.min as f64) / span).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TemperatureSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, temperature) in self.temperatures.iter().take(width).enumerate() {
            let block = self.temperature_to_block(*temperature);
            let x = area.x + i as u16;

            let style = if self.marker == Some(i) {
                self.marker_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}
