//! `pool-models` — the per-step physics of the pool.
//!
//! Every model takes the [`TimeGrid`](pool_core::TimeGrid) it runs on and
//! returns one value per grid step.  Step `i` of every output lines up with
//! step `i` of every other output.
//!
//! ```text
//! occupants ─┬─▶ body_fluid_release ──────────────────────────────┐
//!            └─▶ bather_load ─▶ EvaporationModel ─┐               │
//!                                                 ▼               ▼
//!                     FlowPolicy ─▶ WaterManagement::run ─▶ Kinetics::run ─▶ StepRecord[]
//! ```
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`body_fluid`]  | Sweat release per step from activity and water temperature   |
//! | [`evaporation`] | Lookup table + bather-density correction                     |
//! | [`water`]       | `ControlParameters`, `FlowPolicy` + three policies, clamping |
//! | [`chemistry`]   | `Kinetics`, `PoolState`, `StepRecord`                        |
//! | [`loader`]      | JSON chemical parameters and evaporation tables              |

pub mod body_fluid;
pub mod chemistry;
pub mod error;
pub mod evaporation;
pub mod loader;
pub mod water;

#[cfg(test)]
mod tests;

pub use body_fluid::{body_fluid_release, BodyFluidModel, SweatParameters};
pub use chemistry::{
    Byproduct, ByproductParameters, ChemicalParameters, InitialChemistry, Kinetics, PoolState,
    StepForcing, StepRecord,
};
pub use error::{ModelError, ModelResult};
pub use evaporation::{EvaporationEntry, EvaporationModel, EvaporationTable};
pub use loader::{
    load_chemical_params, load_chemical_params_reader, load_evaporation_table,
    load_evaporation_table_reader,
};
pub use water::{
    ActivityBand, ControlParameters, FixedRate, Flow, FlowContext, FlowPolicy, OccupancyThreshold,
    ScheduledInjection, WaterFlows, WaterManagement,
};
