pub mod history;

use log::{debug, info};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::agent::qlearning;
use crate::agent::{Ant, AntKind, Mode};
use crate::config::{Config, ConfigError, PheromoneConfig};
use crate::grid::{Cell, FoodSource, Grid, Vec2};
use crate::pheromones::PheromoneGrid;
use history::{History, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nest {
    pub pos: Vec2,
    /// Total food dropped off so far.
    pub food_collected: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSummary {
    pub ticks: u64,
    pub food_collected: u64,
    pub food_remaining: u64,
    pub survivors: usize,
    pub food_exhausted: bool,
}

/// Reward for arriving on `cell` in `mode`. Deadly cells dominate.
pub fn reward(cell: Cell, mode: Mode, rewards: &PheromoneConfig) -> f64 {
    match (cell, mode) {
        (Cell::Deadly, _) => rewards.deadly_reward,
        (Cell::Food, Mode::SeekingFood) => rewards.food_reward,
        (Cell::Nest, Mode::ReturningToNest) => rewards.nest_reward,
        _ => rewards.move_reward,
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: Config,
    time: u64,
    ants: Vec<Ant>,
    grid: Grid,
    pheromones: PheromoneGrid,
    nest: Nest,
    history: History,

    rng: ChaCha8Rng,
    seed: u64,
}

impl Simulation {
    /// Uses `config.seed`, or a fresh random seed when unset.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let width = i32::try_from(config.grid_width)
            .map_err(|_| ConfigError::Invalid("grid_width is too large".to_string()))?;
        let height = i32::try_from(config.grid_height)
            .map_err(|_| ConfigError::Invalid("grid_height is too large".to_string()))?;

        let grid = Grid::from_map(width, height, config.map.as_slice(), &config.food_quantity_map());
        let nest_pos = grid.nest().ok_or(ConfigError::MissingNest)?;

        let counts = config.nest.ants;
        let mut ants = Vec::with_capacity(counts.total());
        for kind in AntKind::ALL {
            let count = match kind {
                AntKind::Explorer => counts.explorer,
                AntKind::Fighter => counts.fighter,
                AntKind::Collector => counts.collector,
            };
            ants.extend((0..count).map(|_| Ant::new(kind, nest_pos, &config.q_learning)));
        }

        info!(
            "simulation created: {}x{} grid, {} ants, {} food sources, seed {}",
            width,
            height,
            ants.len(),
            grid.food_sources().len(),
            seed
        );

        Ok(Self {
            time: 0,
            ants,
            pheromones: PheromoneGrid::new(width, height),
            nest: Nest {
                pos: nest_pos,
                food_collected: 0,
            },
            history: History::new(),
            grid,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn config(&self) -> &Config {&self.config}
    pub fn tick(&self) -> u64 {self.time}
    pub fn ants(&self) -> &[Ant] {&self.ants}
    pub fn grid(&self) -> &Grid {&self.grid}
    pub fn pheromones(&self) -> &PheromoneGrid {&self.pheromones}
    pub fn nest(&self) -> &Nest {&self.nest}
    pub fn history(&self) -> &History {&self.history}
    pub fn seed(&self) -> u64 {self.seed}

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid.cell((x, y))
    }

    pub fn food_sources(&self) -> &[FoodSource] {
        self.grid.food_sources()
    }

    pub fn snapshot_at(&self, tick: u64) -> Option<&Snapshot> {
        self.history.at(tick)
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.config.max_time || self.grid.remaining_food() == 0
    }

    /// Advances one tick. Does nothing once the run is finished.
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }

        let rewards = self.config.pheromones;
        let mut dead = Vec::new();

        for (i, ant) in self.ants.iter_mut().enumerate() {
            if !ant.tick_timer() {
                continue; // still in transit
            }
            let landed_on = Self::act(
                ant,
                &mut self.grid,
                &mut self.pheromones,
                &mut self.nest,
                &rewards,
                &mut self.rng,
            );
            if landed_on == Cell::Deadly {
                dead.push(i);
            }
        }

        for &i in dead.iter().rev() {
            let ant = self.ants.remove(i);
            debug!("tick {}: {} died at {:?}", self.time + 1, ant.kind, ant.pos);
        }

        self.pheromones.dissipate(rewards.dissipation_rate);

        self.time += 1;
        self.history.record(Snapshot::capture(self.time, &self.ants));

        if self.is_finished() {
            let summary = self.summary();
            info!(
                "simulation finished at tick {}: {} food collected, {} remaining, {} ants alive",
                summary.ticks, summary.food_collected, summary.food_remaining, summary.survivors
            );
        }
    }

    /// Steps until finished or `max_steps` ticks have passed; returns ticks advanced.
    pub fn run(&mut self, max_steps: u64) -> u64 {
        let start = self.time;
        for _ in 0..max_steps {
            if self.is_finished() {
                break;
            }
            self.step();
        }
        self.time - start
    }

    pub fn summary(&self) -> SimulationSummary {
        let food_remaining = self.grid.remaining_food();
        SimulationSummary {
            ticks: self.time,
            food_collected: self.nest.food_collected,
            food_remaining,
            survivors: self.ants.len(),
            food_exhausted: food_remaining == 0,
        }
    }

    // one decision: choose, move, interact, learn. returns the cell the ant ends up on.
    fn act(
        ant: &mut Ant,
        grid: &mut Grid,
        pheromones: &mut PheromoneGrid,
        nest: &mut Nest,
        rewards: &PheromoneConfig,
        rng: &mut ChaCha8Rng,
    ) -> Cell {
        let old_pos = ant.pos;
        let action = qlearning::choose_action(ant, grid, pheromones, rng);

        // off-grid counts as wall; blocked moves leave the ant in place
        let target = action.apply(old_pos);
        let target_cell = grid.cell(target).unwrap_or(Cell::Wall);
        let new_pos = if target_cell == Cell::Wall { old_pos } else { target };

        // reward is judged in the mode the ant decided in
        let reward = reward(target_cell, ant.mode, rewards);

        ant.pos = new_pos;
        ant.reset_timer();
        let landed_on = grid.cell(new_pos).unwrap_or(Cell::Empty);
        Self::interact(ant, landed_on, grid, nest);

        // the update lands in the table of the mode after any switch
        qlearning::update_q_value(ant, pheromones, old_pos, action, reward, new_pos);

        landed_on
    }

    fn interact(ant: &mut Ant, cell: Cell, grid: &mut Grid, nest: &mut Nest) {
        match (cell, ant.mode) {
            (Cell::Food, Mode::SeekingFood) => {
                let Some(source) = grid.food_source_at_mut(ant.pos) else {
                    return;
                };
                if source.is_exhausted() {
                    return;
                }
                ant.load += source.take(ant.free_capacity());
                ant.switch_mode();
                if source.is_exhausted() {
                    debug!("food source at ({}, {}) exhausted", source.x, source.y);
                }
            }
            (Cell::Nest, Mode::ReturningToNest) => {
                nest.food_collected += ant.load as u64;
                ant.load = 0;
                ant.switch_mode();
            }
            _ => (),
        }
    }
}
