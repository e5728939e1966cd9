//! Headless parameter sweeps.
//!
//! Each run owns its config clone and its seeded RNG, so runs are
//! independent and are spread over the rayon thread pool.

use std::io::Write;

use clap::ValueEnum;
use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{Config, ConfigError};
use crate::simulation::{Simulation, SimulationSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Epsilon,
    LearningRate,
    DiscountFactor,
    DissipationRate,
}

impl Parameter {
    pub fn apply(self, config: &mut Config, value: f64) {
        match self {
            Parameter::Epsilon => config.q_learning.epsilon = value,
            Parameter::LearningRate => config.q_learning.learning_rate = value,
            Parameter::DiscountFactor => config.q_learning.discount_factor = value,
            Parameter::DissipationRate => config.pheromones.dissipation_rate = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepResult {
    pub parameter: Parameter,
    pub value: f64,
    pub seed: u64,
    pub ticks: u64,
    pub food_collected: u64,
    pub food_remaining: u64,
    pub survivors: usize,
    pub food_exhausted: bool,
}

/// Runs a simulation until it finishes.
pub fn run_headless(config: Config, seed: u64) -> Result<SimulationSummary, ConfigError> {
    let mut sim = Simulation::with_seed(config, seed)?;
    while !sim.is_finished() {
        sim.step();
    }
    Ok(sim.summary())
}

pub struct Sweep {
    pub base: Config,
    pub parameter: Parameter,
    pub values: Vec<f64>,
    /// Shared by every run so only the parameter differs.
    pub seed: u64,
}

impl Sweep {
    pub fn new(base: Config, parameter: Parameter, values: Vec<f64>, seed: u64) -> Self {
        Self {
            base,
            parameter,
            values,
            seed,
        }
    }

    /// Results come back in the order of `values`. Any invalid value fails the sweep.
    pub fn run(&self) -> Result<Vec<SweepResult>, ConfigError> {
        info!(
            "sweeping {:?} over {} values (seed {})",
            self.parameter,
            self.values.len(),
            self.seed
        );

        self.values
            .par_iter()
            .map(|&value| -> Result<SweepResult, ConfigError> {
                let mut config = self.base.clone();
                self.parameter.apply(&mut config, value);
                let summary = run_headless(config, self.seed)?;
                info!("{:?} = {}: finished in {} ticks", self.parameter, value, summary.ticks);
                Ok(SweepResult {
                    parameter: self.parameter,
                    value,
                    seed: self.seed,
                    ticks: summary.ticks,
                    food_collected: summary.food_collected,
                    food_remaining: summary.food_remaining,
                    survivors: summary.survivors,
                    food_exhausted: summary.food_exhausted,
                })
            })
            .collect()
    }
}

/// Fewest ticks wins; earlier entries win ties.
pub fn best(results: &[SweepResult]) -> Option<&SweepResult> {
    results.iter().reduce(|best, r| if r.ticks < best.ticks { r } else { best })
}

pub fn write_csv<W: Write>(writer: W, results: &[SweepResult]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}
