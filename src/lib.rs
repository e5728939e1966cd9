//! # AI-Fants
//!
//! An ant colony that forages on a grid using tabular Q-learning in place of
//! pheromone trails. Each ant picks moves epsilon-greedily from one of two
//! shared Q-tables (seeking food, returning to the nest); every tick the
//! tables evaporate a little.
//!
//! ```rust,no_run
//! use aifants::{Config, Simulation};
//!
//! let mut sim = Simulation::new(Config::default()).unwrap();
//! while !sim.is_finished() {
//!     sim.step();
//! }
//! println!("finished at tick {}", sim.tick());
//! ```

pub mod config;
pub mod grid;
pub mod pheromones;

pub mod agent;

pub use agent::{Ant, AntKind, Mode};

pub mod simulation;

pub use simulation::{Simulation, SimulationSummary};
pub use simulation::history::{AntSnapshot, History, Snapshot};

pub mod sweep;

pub use config::{Config, ConfigError};
pub use grid::{Cell, Direction, FoodSource, Grid};
pub use pheromones::{PheromoneGrid, QTable};
