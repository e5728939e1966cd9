pub mod qlearning;

use std::fmt;

use crate::config::QLearningConfig;
use crate::grid::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntKind {
    Explorer,
    Fighter,
    Collector,
}

/// Fixed capabilities of an ant kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindTraits {
    pub max_load: u32,
    /// Ticks per move.
    pub speed: u32,
    /// Not used by any decision yet.
    pub vision_range: u32,
}

impl AntKind {
    pub const ALL: [AntKind; 3] = [AntKind::Explorer, AntKind::Fighter, AntKind::Collector];

    pub fn traits(self) -> KindTraits {
        match self {
            AntKind::Explorer => KindTraits { max_load: 10, speed: 5, vision_range: 1 },
            AntKind::Fighter => KindTraits { max_load: 10, speed: 5, vision_range: 1 },
            AntKind::Collector => KindTraits { max_load: 100, speed: 10, vision_range: 0 },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AntKind::Explorer => "Explorer",
            AntKind::Fighter => "Fighter",
            AntKind::Collector => "Collector",
        }
    }
}

impl fmt::Display for AntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    SeekingFood,
    ReturningToNest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ant {
    pub kind: AntKind,
    pub pos: Vec2,
    pub load: u32,
    pub mode: Mode,
    /// Ticks left before the next decision.
    pub movement_timer: u32,

    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
}

impl Ant {
    pub fn new(kind: AntKind, pos: Vec2, params: &QLearningConfig) -> Self {
        Self {
            kind,
            pos,
            load: 0,
            mode: Mode::SeekingFood,
            movement_timer: kind.traits().speed,
            learning_rate: params.learning_rate,
            discount_factor: params.discount_factor,
            epsilon: params.epsilon,
        }
    }

    pub fn max_load(&self) -> u32 {self.kind.traits().max_load}
    pub fn speed(&self) -> u32 {self.kind.traits().speed}
    pub fn vision_range(&self) -> u32 {self.kind.traits().vision_range}

    pub fn free_capacity(&self) -> u32 {
        self.max_load().saturating_sub(self.load)
    }

    pub fn switch_mode(&mut self) {
        self.mode = if self.load > 0 {
            Mode::ReturningToNest
        } else {
            Mode::SeekingFood
        };
    }

    /// Counts down one tick; true when the ant gets to act this tick.
    pub fn tick_timer(&mut self) -> bool {
        self.movement_timer = self.movement_timer.saturating_sub(1);
        self.movement_timer == 0
    }

    pub fn reset_timer(&mut self) {
        self.movement_timer = self.speed();
    }
}
