//! `pool-sim` — scenario runs, cost evaluation, and control-parameter search.
//!
//! # Evaluation loop
//!
//! ```text
//! SimBuilder::build
//!   ① grid        — TimeGrid from the scenario's start / end / step
//!   ② occupants   — supplied, or generated from occupancy parameters
//!   ③ forcings    — bather load, body-fluid release, evaporation
//!                   (fixed for the whole search)
//!
//! Sim::evaluate(policy)
//!   ④ water       — WaterManagement::run → clamped inflow / outflow
//!   ⑤ chemistry   — Kinetics::run        → StepRecord per step
//!   ⑥ cost        — CostFunction          → water m³ + λ · health
//! ```
//!
//! Searches repeat ④–⑥ per candidate [`ControlParameters`]; every candidate
//! is independent of the others.
//!
//! # Search strategies
//!
//! | Type                | Strategy                                                    |
//! |---------------------|-------------------------------------------------------------|
//! | [`GridSearch`]      | Exhaustive over ordered triples, plateau cut-off per row     |
//! | [`GreedySearch`]    | Walk from a seed, trading water against health cost          |
//! | [`Surrogate`]       | Gaussian-weighted neighbours of stored [`CostRecord`]s       |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs grid-search rows on Rayon's thread pool.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pool_sim::{GridSearch, NoopObserver, ScenarioConfig, SimBuilder};
//!
//! let config = ScenarioConfig::default();
//! let sim = SimBuilder::new(config.clone(), chemical_params)
//!     .occupancy_params(occupancy_params)
//!     .build()?;
//! let outcome = GridSearch::from_ranges(&config.search).run(&sim, &mut NoopObserver)?;
//! ```
//!
//! [`ControlParameters`]: pool_models::ControlParameters

pub mod builder;
pub mod config;
pub mod cost;
pub mod error;
pub mod observer;
pub mod search;
pub mod sim;


pub use builder::SimBuilder;
pub use config::{load_scenario, load_scenario_reader, ParamRange, ScenarioConfig, SearchRanges};
pub use cost::{CostBreakdown, CostFunction, CostRecord};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use search::{
    GreedySearch, GridSearch, PlateauDetector, SearchOutcome, Surrogate, SurrogateEstimate,
    SurrogateScan,
};
pub use sim::{Evaluation, Forcings, Sim};
