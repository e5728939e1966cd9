//! Simulation configuration.
//!
//! Every run is driven by an explicit [`Config`] value owned by the caller.
//! Configs can be loaded from and saved to YAML files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Default quantity for a food cell without an override entry.
pub const DEFAULT_FOOD_QUANTITY: u32 = 1000;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("map does not contain a nest ('N') cell")]
    MissingNest,
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Row-major character map: `.` empty, `W` wall, `N` nest, `F` food, `D` deadly.
    pub map: Vec<String>,
    /// Per-cell food quantities; food cells not listed get [`DEFAULT_FOOD_QUANTITY`].
    #[serde(default)]
    pub food_quantities: Vec<FoodQuantity>,
    /// Tick budget.
    pub max_time: u64,
    pub nest: NestConfig,
    pub q_learning: QLearningConfig,
    pub pheromones: PheromoneConfig,
    /// Seed for reproducible runs; a fresh one is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodQuantity {
    pub x: usize,
    pub y: usize,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NestConfig {
    pub ants: AntCounts,
}

/// Number of ants of each kind hatched at the nest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AntCounts {
    #[serde(default)]
    pub explorer: usize,
    #[serde(default)]
    pub fighter: usize,
    #[serde(default)]
    pub collector: usize,
}

impl AntCounts {
    pub fn total(&self) -> usize {
        self.explorer + self.fighter + self.collector
    }
}

/// Hyperparameters applied to every ant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QLearningConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
}

/// Dissipation and reward shaping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PheromoneConfig {
    pub dissipation_rate: f64,
    pub food_reward: f64,
    pub nest_reward: f64,
    pub deadly_reward: f64,
    pub move_reward: f64,
}

impl Default for Config {
    fn default() -> Self {
        let mut map = vec![
            "NNW................F".to_string(),
            ".NW................F".to_string(),
            ".W........DD......F.".to_string(),
        ];
        map.extend((0..14).map(|_| ".".repeat(20)));
        map.extend((0..3).map(|_| format!("F{}", ".".repeat(19))));

        let food_quantities = [
            (19, 0, 20_000),
            (19, 1, 20_000),
            (19, 2, 20_000),
            (0, 17, 1000),
            (0, 18, 1000),
            (0, 19, 1000),
        ]
        .into_iter()
        .map(|(x, y, quantity)| FoodQuantity { x, y, quantity })
        .collect();

        Self {
            grid_width: 20,
            grid_height: 20,
            map,
            food_quantities,
            max_time: 100_000,
            nest: NestConfig::default(),
            q_learning: QLearningConfig::default(),
            pheromones: PheromoneConfig::default(),
            seed: None,
        }
    }
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            ants: AntCounts {
                explorer: 2,
                fighter: 1,
                collector: 3,
            },
        }
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 0.1,
        }
    }
}

impl Default for PheromoneConfig {
    fn default() -> Self {
        Self {
            dissipation_rate: 0.01,
            food_reward: 1000.0,
            nest_reward: 1000.0,
            deadly_reward: -500.0,
            move_reward: -1.0,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Food overrides keyed by cell; later entries win.
    pub fn food_quantity_map(&self) -> HashMap<(usize, usize), u32> {
        self.food_quantities
            .iter()
            .map(|f| ((f.x, f.y), f.quantity))
            .collect()
    }

    /// Checks value ranges. The nest is checked when the grid is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid(
                "grid dimensions must be non-zero".to_string(),
            ));
        }
        // cells are addressed with i32 coordinates
        let cells = self
            .grid_width
            .checked_mul(self.grid_height)
            .filter(|&cells| i32::try_from(cells).is_ok());
        if cells.is_none() {
            return Err(ConfigError::Invalid(format!(
                "grid is too large: {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        let q = &self.q_learning;
        for (name, value) in [
            ("learning_rate", q.learning_rate),
            ("discount_factor", q.discount_factor),
            ("epsilon", q.epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        let p = &self.pheromones;
        if !(0.0..1.0).contains(&p.dissipation_rate) {
            return Err(ConfigError::Invalid(format!(
                "dissipation_rate must be within [0, 1), got {}",
                p.dissipation_rate
            )));
        }
        for (name, value) in [
            ("food_reward", p.food_reward),
            ("nest_reward", p.nest_reward),
            ("deadly_reward", p.deadly_reward),
            ("move_reward", p.move_reward),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }

        Ok(())
    }
}
