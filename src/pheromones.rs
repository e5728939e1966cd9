//! Q-value tables standing in for pheromone trails.

use crate::agent::Mode;
use crate::grid::{Direction, Vec2};

pub type QValues = [f64; 4];

/// Dense per-cell table of action values, indexed N, E, S, W.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    width: i32,
    height: i32,
    values: Vec<QValues>,
}

impl QTable {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            values: vec![[0.0; 4]; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {self.width}
    pub fn height(&self) -> i32 {self.height}

    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.0 >= 0 && pos.0 < self.width && pos.1 >= 0 && pos.1 < self.height
    }

    // panics on out-of-bounds cells, like slice indexing
    fn index(&self, pos: Vec2) -> usize {
        assert!(self.in_bounds(pos), "cell {:?} outside {}x{} table", pos, self.width, self.height);
        (pos.1 * self.width + pos.0) as usize
    }

    pub fn values(&self, pos: Vec2) -> &QValues {
        &self.values[self.index(pos)]
    }

    pub fn get(&self, pos: Vec2, dir: Direction) -> f64 {
        self.values(pos)[dir.index()]
    }

    pub fn set(&mut self, pos: Vec2, dir: Direction, value: f64) {
        let index = self.index(pos);
        self.values[index][dir.index()] = value;
    }

    /// Best value over all four actions, regardless of walls.
    pub fn max_value(&self, pos: Vec2) -> f64 {
        self.values(pos).iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Row-major iterator over every cell's values.
    pub fn iter(&self) -> impl Iterator<Item = &QValues> {
        self.values.iter()
    }

    /// Largest single value in the table, or 0.0 when empty.
    pub fn peak(&self) -> f64 {
        self.values
            .iter()
            .flat_map(|v| v.iter().copied())
            .fold(0.0, f64::max)
    }

    pub fn dissipate(&mut self, rate: f64) {
        let factor = 1.0 - rate;
        for cell in self.values.iter_mut() {
            for value in cell.iter_mut() {
                *value *= factor;
            }
        }
    }
}

/// One table per ant mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneGrid {
    pub food: QTable,
    pub nest: QTable,
}

impl PheromoneGrid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            food: QTable::new(width, height),
            nest: QTable::new(width, height),
        }
    }

    pub fn table(&self, mode: Mode) -> &QTable {
        match mode {
            Mode::SeekingFood => &self.food,
            Mode::ReturningToNest => &self.nest,
        }
    }

    pub fn table_mut(&mut self, mode: Mode) -> &mut QTable {
        match mode {
            Mode::SeekingFood => &mut self.food,
            Mode::ReturningToNest => &mut self.nest,
        }
    }

    pub fn dissipate(&mut self, rate: f64) {
        self.food.dissipate(rate);
        self.nest.dissipate(rate);
    }
}
