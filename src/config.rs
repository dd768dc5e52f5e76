use anyhow::{ensure, Result};
use std::time::Duration;

/// Tunable constants for one play session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    /// Window width in pixels
    pub width_px: u32,
    /// Window height in pixels
    pub height_px: u32,
    /// Edge length of one segment / food cell in pixels
    pub unit: u32,
    pub initial_length: usize,
    pub tick_interval: Duration,
    pub score_per_food: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width_px: 800,
            height_px: 600,
            unit: 10,
            initial_length: 3,
            tick_interval: Duration::from_millis(100),
            score_per_food: 10,
        }
    }
}

impl GameConfig {
    /// Config with the default constants but a `width` × `height` grid.
    #[cfg(test)]
    pub fn with_grid(width: u32, height: u32) -> Self {
        let unit = Self::default().unit;
        Self {
            width_px: width * unit,
            height_px: height * unit,
            ..Default::default()
        }
    }

    pub fn grid_width(&self) -> i32 {
        (self.width_px / self.unit) as i32
    }

    pub fn grid_height(&self) -> i32 {
        (self.height_px / self.unit) as i32
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width() as usize * self.grid_height() as usize
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.unit > 0, "grid unit must be positive");
        ensure!(
            self.grid_width() > 0 && self.grid_height() > 0,
            "window {}x{} holds no {}px cell",
            self.width_px,
            self.height_px,
            self.unit
        );
        ensure!(self.initial_length > 0, "snake must start with a segment");
        // The body extends left of the centre cell.
        ensure!(
            self.initial_length <= (self.grid_width() / 2) as usize + 1,
            "a {}-segment snake does not fit in a {}-cell wide grid",
            self.initial_length,
            self.grid_width()
        );
        ensure!(
            self.initial_length < self.cell_count(),
            "no room left for food"
        );
        ensure!(!self.tick_interval.is_zero(), "tick interval must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width(), 80);
        assert_eq!(config.grid_height(), 60);
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.score_per_food, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_grid() {
        let config = GameConfig::with_grid(12, 7);
        assert_eq!(config.grid_width(), 12);
        assert_eq!(config.grid_height(), 7);
        assert_eq!(config.cell_count(), 84);
    }

    #[test]
    fn test_partial_cells_are_dropped() {
        let config = GameConfig {
            width_px: 805,
            height_px: 609,
            ..Default::default()
        };
        assert_eq!(config.grid_width(), 80);
        assert_eq!(config.grid_height(), 60);
    }

    #[test]
    fn test_invalid_configs() {
        let zero_unit = GameConfig {
            unit: 0,
            ..Default::default()
        };
        assert!(zero_unit.validate().is_err());

        let too_small = GameConfig {
            width_px: 5,
            ..Default::default()
        };
        assert!(too_small.validate().is_err());

        let no_snake = GameConfig {
            initial_length: 0,
            ..Default::default()
        };
        assert!(no_snake.validate().is_err());

        let too_long = GameConfig {
            initial_length: 5,
            ..GameConfig::with_grid(6, 6)
        };
        assert!(too_long.validate().is_err());

        // Snake fills the only row entirely
        let full = GameConfig {
            initial_length: 3,
            ..GameConfig::with_grid(3, 1)
        };
        assert!(full.validate().is_err());

        let frozen = GameConfig {
            tick_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(frozen.validate().is_err());
    }

    #[test]
    fn test_smallest_valid_grid() {
        let config = GameConfig {
            initial_length: 3,
            ..GameConfig::with_grid(4, 1)
        };
        assert!(config.validate().is_ok());
    }
}
