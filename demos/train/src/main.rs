//! train — search the occupancy-threshold control space and fit a surrogate.
//!
//! ```text
//! cargo run -p train --release -- [grid|greedy] [DATA_DIR] [OUTPUT_DIR]
//! ```
//!
//! Every evaluated candidate is written to `OUTPUT_DIR/cost_records.csv`.
//! The records are then reloaded into a nearest-neighbour surrogate and
//! scanned on a unit grid for the cheapest estimated triple.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use pool_models::load_chemical_params;
use pool_occupancy::load_occupancy_params;
use pool_output::{load_cost_records_csv, CsvWriter, SimOutputObserver};
use pool_sim::{load_scenario, GreedySearch, GridSearch, SimBuilder, Surrogate, SurrogateScan};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_DATA_DIR:   &str = "demos/data";
const DEFAULT_OUTPUT_DIR: &str = "output/train";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let method = args.next().unwrap_or_else(|| "grid".into());
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_DATA_DIR.into()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into()));

    let config = load_scenario(&data_dir.join("scenario.json"))
        .with_context(|| format!("loading scenario from {}", data_dir.display()))?;
    let occupancy = load_occupancy_params(&data_dir.join("occupancy_params.json"))
        .context("loading occupancy parameters")?;
    let chemistry = load_chemical_params(&data_dir.join("chemical_params.json"))
        .context("loading chemical parameters")?;

    println!("=== train — {method} search ===");
    let sim = SimBuilder::new(config.clone(), chemistry).occupancy_params(occupancy).build()?;
    println!("{} swimmers over {} steps", sim.occupants.len(), sim.grid.len());

    std::fs::create_dir_all(&out_dir)?;
    let mut obs = SimOutputObserver::new(CsvWriter::new(&out_dir)?);

    // 1. Search.  The observer finishes the writer when the search ends.
    let t0 = Instant::now();
    let outcome = match method.as_str() {
        "grid" => GridSearch::from_ranges(&config.search).run(&sim, &mut obs)?,
        "greedy" => GreedySearch::default().run(&sim, &mut obs)?,
        other => bail!("unknown search method {other:?}; expected \"grid\" or \"greedy\""),
    };
    if let Some(err) = obs.take_error() {
        return Err(err).context("writing cost records");
    }
    println!(
        "{} candidates evaluated in {:.2} s",
        outcome.len(),
        t0.elapsed().as_secs_f64()
    );
    let Some(best) = outcome.best else {
        bail!("search evaluated no candidates");
    };
    println!(
        "search minimum   cost {:>10.4}  water {:>8.3} m³  health {:>10.3}  at ({}, {}, {})",
        best.cost, best.water_use, best.health_cost, best.gamma_l, best.gamma_m, best.gamma_h
    );

    // 2. Surrogate.
    let records = load_cost_records_csv(&out_dir.join("cost_records.csv"))?;
    let surrogate = Surrogate::new(&records, config.lambda, sim.grid.step_secs());
    println!("surrogate over {} records (radius {})", surrogate.len(), surrogate.radius());

    let t1 = Instant::now();
    match SurrogateScan::default().scan(&surrogate) {
        Some((control, estimate)) => println!(
            "surrogate minimum cost {:>10.4}  water {:>8.3} m³  health {:>10.3}  at {control}  ({:.2} s)",
            estimate.cost,
            estimate.water_use,
            estimate.health_cost,
            t1.elapsed().as_secs_f64()
        ),
        None => println!("surrogate scan found no point with nearby data"),
    }

    println!();
    println!("Output written to {}", out_dir.display());
    Ok(())
}
