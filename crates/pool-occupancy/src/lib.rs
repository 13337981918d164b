//! `pool-occupancy` — who is in the pool, and when.
//!
//! # Pipeline
//!
//! ```text
//! occupancy JSON ──load_occupancy_params──▶ OccupancyParameters
//!                                               │
//! TimeGrid ──────────────▶ OccupancyGenerator::generate ──▶ Vec<Occupant>
//!                                                               │
//!                                 bather_load(grid, occupants, Grouping)
//! ```
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`occupant`]    | `Occupant`, `Gender`                                       |
//! | [`params`]      | Typed monthly / weekday / hourly tables, age brackets      |
//! | [`loader`]      | JSON parameter file → `OccupancyParameters`                |
//! | [`generator`]   | Compound normal-exponential arrival process                |
//! | [`bather_load`] | Per-step (covering rule) and per-day (arrival date) counts |

pub mod bather_load;
pub mod error;
pub mod generator;
pub mod loader;
pub mod occupant;
pub mod params;


pub use bather_load::bather_load;
pub use error::{OccupancyError, OccupancyResult};
pub use generator::{OccupancyGenerator, SwimmerDraw};
pub use loader::{load_occupancy_params, load_occupancy_params_reader};
pub use occupant::{Gender, Occupant};
pub use params::{
    AgeBracket, AgeBrackets, BodySize, HourlyPattern, MeanStd, MonthlyPattern, OccupancyParameters,
    WeekdayPattern,
};
