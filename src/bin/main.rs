use aifants::simulation::history::AntSnapshot;
use aifants::{AntKind, Cell, Config, Simulation};
use clap::Parser;
use macroquad::prelude::*;
use std::path::PathBuf;

const STATUS_AREA_HEIGHT: f32 = 60.0;
const STATUS_TEXT_SIZE: f32 = 24.0;
const WINDOW_SIZE: i32 = 600; // pixels
const TICK_SPEED: f32 = 0.05; // seconds

#[derive(Parser)]
#[command(name = "aifants", about = "Watch a Q-learning ant colony forage")]
struct Args {
    /// Configuration file (YAML); the built-in world is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PheromoneView {
    None,
    Food,
    Nest,
}

impl PheromoneView {
    fn next(self) -> Self {
        match self {
            PheromoneView::None => PheromoneView::Food,
            PheromoneView::Food => PheromoneView::Nest,
            PheromoneView::Nest => PheromoneView::None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            PheromoneView::None => "none",
            PheromoneView::Food => "food",
            PheromoneView::Nest => "nest",
        }
    }
}

struct Viewer {
    running: bool,
    view: PheromoneView,
    replay_tick: Option<u64>, // None: live
}

fn window_conf() -> Conf {
    Conf {
        window_title: "AI-Fants".to_owned(),
        window_width: WINDOW_SIZE,
        window_height: (STATUS_AREA_HEIGHT as i32) + WINDOW_SIZE,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("could not load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut sim = new_simulation(&config);
    let mut viewer = Viewer {
        running: false,
        view: PheromoneView::None,
        replay_tick: None,
    };
    let mut time_accumulator: f32 = 0.0; // seconds

    loop {
        if handle_key_inputs(&mut viewer, &sim) {
            sim = new_simulation(&config);
            time_accumulator = 0.0;
        }

        if viewer.running && !sim.is_finished() {
            time_accumulator += get_frame_time();
            while time_accumulator >= TICK_SPEED {
                time_accumulator -= TICK_SPEED;
                sim.step();
            }
            if sim.is_finished() {
                viewer.running = false;
            }
        }

        draw(&sim, &viewer);

        next_frame().await
    }
}

fn new_simulation(config: &Config) -> Simulation {
    match Simulation::new(config.clone()) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    }
}

// space: run/pause, r: reset, p: pheromone view, left/right: scrub history, enter: back to live.
// returns true when a reset was requested
fn handle_key_inputs(viewer: &mut Viewer, sim: &Simulation) -> bool {
    if is_key_pressed(KeyCode::R) {
        viewer.running = false;
        viewer.replay_tick = None;
        return true;
    }
    if is_key_pressed(KeyCode::Space) {
        viewer.running = !viewer.running && !sim.is_finished();
        if viewer.running {
            viewer.replay_tick = None;
        }
    }
    if is_key_pressed(KeyCode::P) {
        viewer.view = viewer.view.next();
    }
    if is_key_pressed(KeyCode::Enter) {
        viewer.replay_tick = None;
    }

    // scrubbing only while paused
    if !viewer.running && sim.tick() > 0 {
        let current = viewer.replay_tick.unwrap_or(sim.tick());
        if is_key_down(KeyCode::Left) {
            viewer.replay_tick = Some(current.saturating_sub(1).max(1));
        } else if is_key_down(KeyCode::Right) {
            let next = (current + 1).min(sim.tick());
            viewer.replay_tick = if next == sim.tick() { None } else { Some(next) };
        }
    }

    false
}

fn draw(sim: &Simulation, viewer: &Viewer) {
    clear_background(WHITE);

    let screen_w = screen_width();
    let screen_h = screen_height();

    // status area

    draw_rectangle(0.0, 0.0, screen_w, STATUS_AREA_HEIGHT, Color::new(0.1, 0.1, 0.2, 1.0));
    draw_line(0.0, STATUS_AREA_HEIGHT, screen_w, STATUS_AREA_HEIGHT, 2.0, BLACK);

    let summary = sim.summary();
    let time_text = match viewer.replay_tick {
        Some(tick) => format!("Replay: {} / {}", tick, sim.tick()),
        None => format!("Time: {}", sim.tick()),
    };
    let status = format!(
        "{}   Food left: {}   Collected: {}   Ants: {}   View: {}",
        time_text,
        summary.food_remaining,
        summary.food_collected,
        summary.survivors,
        viewer.view.label()
    );
    draw_text(&status, 10.0, STATUS_AREA_HEIGHT / 2.0 + 6.0, STATUS_TEXT_SIZE, WHITE);

    // world area

    let grid = sim.grid();
    let area_y = STATUS_AREA_HEIGHT;
    let cell_width = screen_w / grid.width() as f32;
    let cell_height = (screen_h - area_y) / grid.height() as f32;

    draw_pheromones(sim, viewer.view, area_y, cell_width, cell_height);

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let color = match grid.cell((x, y)) {
                Some(Cell::Wall) => BLACK,
                Some(Cell::Food) => GREEN,
                Some(Cell::Nest) => BLUE,
                Some(Cell::Deadly) => RED,
                _ => continue,
            };
            draw_rectangle(
                x as f32 * cell_width,
                area_y + y as f32 * cell_height,
                cell_width,
                cell_height,
                color,
            );
        }
    }

    let ants: Vec<AntSnapshot> = match viewer.replay_tick.and_then(|t| sim.snapshot_at(t)) {
        Some(snapshot) => snapshot.ants.clone(),
        None => sim.ants().iter().map(AntSnapshot::from).collect(),
    };

    let radius = cell_width.min(cell_height) / 4.0;
    for ant in &ants {
        let color = match ant.kind {
            AntKind::Explorer => ORANGE,
            AntKind::Fighter => PURPLE,
            AntKind::Collector => BROWN,
        };
        let cx = (ant.x as f32 + 0.5) * cell_width;
        let cy = area_y + (ant.y as f32 + 0.5) * cell_height;
        draw_circle(cx, cy, radius, color);
        draw_circle_lines(cx, cy, radius, 1.0, BLACK);
    }
}

// shows the live tables even during replay; they are not part of history
fn draw_pheromones(sim: &Simulation, view: PheromoneView, area_y: f32, cell_width: f32, cell_height: f32) {
    let table = match view {
        PheromoneView::None => return,
        PheromoneView::Food => &sim.pheromones().food,
        PheromoneView::Nest => &sim.pheromones().nest,
    };

    let peak = table.peak().max(0.001);
    for y in 0..table.height() {
        for x in 0..table.width() {
            let best = table.max_value((x, y));
            if best <= 0.0 {
                continue;
            }
            let intensity = (best / peak).min(1.0) as f32;
            let color = match view {
                PheromoneView::Nest => Color::new(1.0 - intensity, 1.0 - intensity, 1.0, 1.0),
                _ => Color::new(1.0, 1.0 - intensity, 1.0 - intensity, 1.0),
            };
            draw_rectangle(
                x as f32 * cell_width,
                area_y + y as f32 * cell_height,
                cell_width,
                cell_height,
                color,
            );
        }
    }
}
