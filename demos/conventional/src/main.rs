//! conventional — one week of pool operation under the three water policies.
//!
//! Generates a swimmer population from the occupancy parameters, then runs
//! the fixed-rate, occupancy-threshold, and scheduled-injection policies on
//! the same forcings and compares their water use and TCM exposure.
//!
//! ```text
//! cargo run -p conventional --release -- [DATA_DIR] [OUTPUT_DIR]
//! ```
//!
//! `DATA_DIR` defaults to `demos/data` and must contain `scenario.json`,
//! `occupancy_params.json`, and `chemical_params.json`.  Set `RUST_LOG=info`
//! for progress.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use pool_models::{
    load_chemical_params, ControlParameters, FixedRate, FlowPolicy, OccupancyThreshold,
    ScheduledInjection,
};
use pool_occupancy::load_occupancy_params;
use pool_output::{daily_summaries, CsvWriter, SimOutputObserver};
use pool_sim::{load_scenario, SimBuilder};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_DATA_DIR:   &str = "demos/data";
const DEFAULT_OUTPUT_DIR: &str = "output/conventional";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_DATA_DIR.into()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into()));

    // 1. Inputs.
    let config = load_scenario(&data_dir.join("scenario.json"))
        .with_context(|| format!("loading scenario from {}", data_dir.display()))?;
    let occupancy = load_occupancy_params(&data_dir.join("occupancy_params.json"))
        .context("loading occupancy parameters")?;
    let chemistry = load_chemical_params(&data_dir.join("chemical_params.json"))
        .context("loading chemical parameters")?;

    println!("=== conventional — pool water management ===");
    println!(
        "{} → {}  |  step {} s  |  water {} °C  |  seed {}",
        config.start, config.end, config.step_secs, config.water_temp_c, config.seed
    );

    // 2. Population and forcings.
    let t0 = Instant::now();
    let sim = SimBuilder::new(config.clone(), chemistry).occupancy_params(occupancy).build()?;
    println!(
        "{} swimmers over {} steps (built in {:.3} s)",
        sim.occupants.len(),
        sim.grid.len(),
        t0.elapsed().as_secs_f64()
    );
    println!();

    // 3. Output.
    std::fs::create_dir_all(&out_dir)?;
    let mut obs = SimOutputObserver::new(CsvWriter::new(&out_dir)?);

    // 4. Policies.
    let fixed = FixedRate::default();
    let threshold = OccupancyThreshold::new(ControlParameters::default());
    let scheduled = ScheduledInjection::default();
    let policies: [&dyn FlowPolicy; 3] = [&fixed, &threshold, &scheduled];

    println!(
        "{:<22} {:>12} {:>12} {:>10} {:>10} {:>8}",
        "Policy", "Water m³", "Health", "Cost", "Max TCM", "Days>θ"
    );
    println!("{}", "-".repeat(79));
    for policy in policies {
        let eval = sim.run(policy, &mut obs)?;
        let summary = daily_summaries(&sim.grid, &sim.occupants, &eval.records, config.tcm_threshold);
        obs.write_daily_summaries(eval.policy, &summary.days);
        println!(
            "{:<22} {:>12.2} {:>12.4} {:>10.3} {:>10.3} {:>8}",
            eval.policy,
            eval.cost.water_m3,
            eval.cost.health,
            eval.cost.total,
            summary.max_tcm,
            summary.exceeded_days()
        );
    }
    obs.finish()?;

    println!();
    println!("Output written to {}", out_dir.display());
    Ok(())
}
