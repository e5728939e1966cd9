//! End-to-end properties of the simulation engine

use aifants::config::{AntCounts, FoodQuantity};
use aifants::{Config, ConfigError, Mode, Simulation};

fn corridor(food: u32) -> Config {
    let mut config = Config::default();
    config.grid_width = 3;
    config.grid_height = 1;
    config.map = vec!["NF.".to_string()];
    config.food_quantities = vec![FoodQuantity { x: 1, y: 0, quantity: food }];
    config.max_time = 1000;
    config.nest.ants = AntCounts { explorer: 0, fighter: 0, collector: 1 };
    config
}

#[test]
fn test_history_tracks_tick_and_loads_stay_bounded() {
    let mut config = Config::default();
    config.max_time = 3000;
    let mut sim = Simulation::with_seed(config, 2024).unwrap();

    let mut previous: Vec<u32> = sim.food_sources().iter().map(|s| s.quantity).collect();
    while !sim.is_finished() {
        sim.step();
        assert_eq!(sim.history().len() as u64, sim.tick());
        assert_eq!(sim.history().latest().unwrap().tick, sim.tick());

        for ant in sim.ants() {
            assert!(ant.load <= ant.max_load());
            assert_eq!(ant.mode == Mode::ReturningToNest, ant.load > 0);
            assert!(sim.grid().in_bounds(ant.pos));
        }

        let current: Vec<u32> = sim.food_sources().iter().map(|s| s.quantity).collect();
        for ((now, before), source) in current.iter().zip(&previous).zip(sim.food_sources()) {
            assert!(now <= before);
            assert!(*now <= source.initial_quantity);
        }
        previous = current;
    }

    assert_eq!(sim.tick(), 3000);
    for table in [&sim.pheromones().food, &sim.pheromones().nest] {
        assert!(table.iter().flatten().all(|q| q.is_finite()));
    }
}

#[test]
fn test_collector_empties_corridor() {
    let mut sim = Simulation::with_seed(corridor(10), 7).unwrap();
    let advanced = sim.run(u64::MAX);

    assert!(sim.is_finished());
    assert!(sim.tick() <= 1000);
    assert_eq!(advanced, sim.tick());
    assert_eq!(sim.food_sources()[0].quantity, 0);
    assert!(sim.summary().food_exhausted);
}

#[test]
fn test_many_round_trips_with_exploration() {
    let mut config = corridor(500);
    config.max_time = 10_000;
    config.q_learning.epsilon = 0.3;
    let mut sim = Simulation::with_seed(config, 31).unwrap();
    sim.run(u64::MAX);

    assert!(sim.summary().food_exhausted);
    // the last load never makes it home
    assert_eq!(sim.nest().food_collected + sim.ants()[0].load as u64, 500);
}

#[test]
fn test_zero_max_time() {
    let mut config = Config::default();
    config.max_time = 0;
    let mut sim = Simulation::with_seed(config, 1).unwrap();

    assert!(sim.is_finished());
    sim.step();
    assert_eq!(sim.tick(), 0);
    assert!(sim.history().is_empty());
}

#[test]
fn test_same_seed_same_history() {
    let mut config = Config::default();
    config.max_time = 1500;
    config.q_learning.epsilon = 0.5;

    let mut a = Simulation::with_seed(config.clone(), 77).unwrap();
    let mut b = Simulation::with_seed(config, 77).unwrap();
    a.run(u64::MAX);
    b.run(u64::MAX);

    assert_eq!(a.history(), b.history());
    assert_eq!(a.pheromones(), b.pheromones());
}

#[test]
fn test_replay_lookup() {
    let mut sim = Simulation::with_seed(corridor(10), 3).unwrap();
    sim.run(10);

    assert!(sim.snapshot_at(0).is_none());
    assert_eq!(sim.snapshot_at(9).unwrap().ants[0].x, 0);
    let last = sim.snapshot_at(10).unwrap();
    assert_eq!(last.ants[0].x, 1);
    assert_eq!(last.ants[0].load, 10);
    assert_eq!(last.ants[0].kind.name(), "Collector");
}

#[test]
fn test_configuration_errors() {
    let mut config = corridor(10);
    config.map = vec!["..F".to_string()];
    assert!(matches!(Simulation::new(config), Err(ConfigError::MissingNest)));

    let mut config = corridor(10);
    config.q_learning.learning_rate = -0.1;
    assert!(matches!(Simulation::new(config), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_file_roundtrip() {
    let path = std::env::temp_dir().join(format!("aifants_config_{}.yaml", std::process::id()));
    let mut config = corridor(10);
    config.seed = Some(5);
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
    std::fs::remove_file(&path).unwrap();
}
