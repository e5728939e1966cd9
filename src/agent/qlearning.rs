use rand::Rng;

use super::Ant;
use crate::grid::{Direction, Grid, Vec2};
use crate::pheromones::PheromoneGrid;

/// Returned when no neighbour is walkable.
pub const FALLBACK_ACTION: Direction = Direction::North;

/// Directions leading to an in-bounds, non-wall cell, in N, E, S, W order.
pub fn valid_actions(grid: &Grid, pos: Vec2) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|dir| grid.is_walkable(dir.apply(pos)))
        .collect()
}

/// Epsilon-greedy choice over the table of the ant's current mode.
pub fn choose_action<R: Rng + ?Sized>(
    ant: &Ant,
    grid: &Grid,
    pheromones: &PheromoneGrid,
    rng: &mut R,
) -> Direction {
    if rng.random::<f64>() < ant.epsilon {
        let valid = valid_actions(grid, ant.pos);
        if valid.is_empty() {
            return FALLBACK_ACTION;
        }
        valid[rng.random_range(0..valid.len())]
    } else {
        best_action(ant, grid, pheromones)
    }
}

/// Highest-valued valid direction; ties go to the earliest in N, E, S, W.
pub fn best_action(ant: &Ant, grid: &Grid, pheromones: &PheromoneGrid) -> Direction {
    let q_values = pheromones.table(ant.mode).values(ant.pos);

    let mut best: Option<(Direction, f64)> = None;
    for dir in valid_actions(grid, ant.pos) {
        let value = q_values[dir.index()];
        match best {
            Some((_, best_value)) if value <= best_value => (),
            _ => best = Some((dir, value)),
        }
    }

    best.map(|(dir, _)| dir).unwrap_or(FALLBACK_ACTION)
}

pub fn q_update(old_q: f64, reward: f64, max_future_q: f64, learning_rate: f64, discount_factor: f64) -> f64 {
    old_q + learning_rate * (reward + discount_factor * max_future_q - old_q)
}

/// Applies one Q-learning step to the table of the ant's mode as it is now,
/// which may already reflect a switch caused by the move.
pub fn update_q_value(
    ant: &Ant,
    pheromones: &mut PheromoneGrid,
    old_pos: Vec2,
    action: Direction,
    reward: f64,
    new_pos: Vec2,
) {
    let table = pheromones.table_mut(ant.mode);
    let old_q = table.get(old_pos, action);
    let max_future_q = table.max_value(new_pos);
    let new_q = q_update(old_q, reward, max_future_q, ant.learning_rate, ant.discount_factor);
    table.set(old_pos, action, new_q);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AntKind, Mode};
    use crate::config::QLearningConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn assert_approx_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
    }

    fn ant_at(pos: Vec2, epsilon: f64) -> Ant {
        let params = QLearningConfig {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon,
        };
        Ant::new(AntKind::Explorer, pos, &params)
    }

    // 3x3 open field with the nest in the middle
    fn open_field() -> Grid {
        Grid::from_map(3, 3, &["...", ".N.", "..."], &HashMap::new())
    }

    #[test]
    fn test_q_update_formula() {
        assert_approx_eq(q_update(0.0, 1000.0, 0.0, 0.1, 0.9), 100.0);
        assert_approx_eq(q_update(100.0, -1.0, 50.0, 0.1, 0.9), 100.0 + 0.1 * (-1.0 + 45.0 - 100.0));
    }

    #[test]
    fn test_valid_actions_skip_walls_and_edges() {
        let grid = Grid::from_map(3, 2, &["NW.", "..."], &HashMap::new());
        assert_eq!(valid_actions(&grid, (0, 0)), vec![Direction::South]);
        assert_eq!(
            valid_actions(&grid, (1, 1)),
            vec![Direction::East, Direction::West]
        );
    }

    #[test]
    fn test_greedy_picks_max_valid_action() {
        let grid = Grid::from_map(3, 3, &[".W.", ".N.", "..."], &HashMap::new());
        let mut pheromones = PheromoneGrid::new(3, 3);
        // north is the best value but walled off
        pheromones.food.set((1, 1), Direction::North, 50.0);
        pheromones.food.set((1, 1), Direction::South, 5.0);
        pheromones.food.set((1, 1), Direction::West, 4.0);

        let ant = ant_at((1, 1), 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(choose_action(&ant, &grid, &pheromones, &mut rng), Direction::South);
        }
    }

    #[test]
    fn test_greedy_ties_break_in_fixed_order() {
        let grid = open_field();
        let mut pheromones = PheromoneGrid::new(3, 3);
        let ant = ant_at((1, 1), 0.0);
        assert_eq!(best_action(&ant, &grid, &pheromones), Direction::North);

        pheromones.food.set((1, 1), Direction::North, -1.0);
        assert_eq!(best_action(&ant, &grid, &pheromones), Direction::East);

        pheromones.food.set((1, 1), Direction::South, 2.0);
        pheromones.food.set((1, 1), Direction::West, 2.0);
        assert_eq!(best_action(&ant, &grid, &pheromones), Direction::South);
    }

    #[test]
    fn test_greedy_uses_table_of_current_mode() {
        let grid = open_field();
        let mut pheromones = PheromoneGrid::new(3, 3);
        pheromones.food.set((1, 1), Direction::East, 10.0);
        pheromones.nest.set((1, 1), Direction::West, 10.0);

        let mut ant = ant_at((1, 1), 0.0);
        assert_eq!(best_action(&ant, &grid, &pheromones), Direction::East);
        ant.mode = Mode::ReturningToNest;
        assert_eq!(best_action(&ant, &grid, &pheromones), Direction::West);
    }

    #[test]
    fn test_full_exploration_stays_on_valid_actions() {
        let grid = Grid::from_map(3, 3, &[".W.", ".NW", "..."], &HashMap::new());
        let pheromones = PheromoneGrid::new(3, 3);
        let ant = ant_at((1, 1), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let mut counts = HashMap::new();
        for _ in 0..3000 {
            let dir = choose_action(&ant, &grid, &pheromones, &mut rng);
            *counts.entry(dir).or_insert(0) += 1;
        }

        assert!(!counts.contains_key(&Direction::North));
        assert!(!counts.contains_key(&Direction::East));
        // roughly even split between south and west
        for dir in [Direction::South, Direction::West] {
            let count = counts[&dir];
            assert!(count > 1300 && count < 1700, "{:?}: {}", dir, count);
        }
    }

    #[test]
    fn test_fallback_when_boxed_in() {
        let grid = Grid::from_map(3, 3, &["WWW", "WNW", "WWW"], &HashMap::new());
        let pheromones = PheromoneGrid::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for epsilon in [0.0, 1.0] {
            let ant = ant_at((1, 1), epsilon);
            assert_eq!(choose_action(&ant, &grid, &pheromones, &mut rng), FALLBACK_ACTION);
        }
    }

    #[test]
    fn test_update_writes_current_mode_table() {
        let mut pheromones = PheromoneGrid::new(3, 1);
        pheromones.nest.set((1, 0), Direction::East, 20.0);

        let mut ant = ant_at((1, 0), 0.0);
        ant.mode = Mode::ReturningToNest;
        update_q_value(&ant, &mut pheromones, (0, 0), Direction::East, 1000.0, (1, 0));

        assert_approx_eq(pheromones.nest.get((0, 0), Direction::East), 0.1 * (1000.0 + 0.9 * 20.0));
        assert_eq!(pheromones.food.get((0, 0), Direction::East), 0.0);
    }
}
