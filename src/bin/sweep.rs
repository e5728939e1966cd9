use aifants::sweep::{self, Parameter, Sweep};
use aifants::Config;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "sweep", about = "Run headless simulations over a range of parameter values")]
struct Args {
    /// Configuration file (YAML); the built-in world is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parameter to vary
    #[arg(short, long, value_enum, default_value_t = Parameter::Epsilon)]
    parameter: Parameter,

    /// Comma-separated values to try
    #[arg(short, long, value_delimiter = ',', default_values_t = vec![0.1, 0.3, 0.5])]
    values: Vec<f64>,

    /// Seed shared by every run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write results as CSV here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    println!("--- baseline run ---");
    let start = Instant::now();
    let baseline = sweep::run_headless(config.clone(), args.seed)?;
    println!("finished at tick {}", baseline.ticks);
    println!("food collected: {}, ants alive: {}", baseline.food_collected, baseline.survivors);
    println!("elapsed: {:.2}s", start.elapsed().as_secs_f64());

    let parameter = args.parameter;
    println!("\n--- sweeping {:?} over {:?} ---", parameter, args.values);
    let start = Instant::now();
    let results = Sweep::new(config, parameter, args.values, args.seed).run()?;
    println!("elapsed: {:.2}s", start.elapsed().as_secs_f64());

    if let Some(best) = sweep::best(&results) {
        println!("best: {:?} = {} in {} ticks", parameter, best.value, best.ticks);
    }

    match &args.output {
        Some(path) => {
            sweep::write_csv(std::fs::File::create(path)?, &results)?;
            println!("results written to {}", path.display());
        }
        None => sweep::write_csv(std::io::stdout(), &results)?,
    }

    Ok(())
}
