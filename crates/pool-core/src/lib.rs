//! `pool-core` — foundational types for the pool water-management simulator.
//!
//! Every other `pool-*` crate depends on this one.  It has no `pool-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`time`]        | `TimeGrid`, `Timestamps`, `parse_timestamp`             |
//! | [`calendar`]    | `MonthTable`, `WeekdayTable`, `HourTable`               |
//! | [`group`]       | `Buckets`, `Grouping` — per-step and per-day reduction  |
//! | [`rng`]         | `SimRng` with normal / exponential draws                |
//! | [`ids`]         | `OccupantId`                                            |
//! | [`error`]       | `PoolError`, `PoolResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the public value types.  |

pub mod calendar;
pub mod error;
pub mod group;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use calendar::{HourTable, MonthTable, WeekdayTable};
pub use error::{PoolError, PoolResult};
pub use group::{Buckets, Grouping};
pub use ids::OccupantId;
pub use rng::SimRng;
pub use time::{parse_timestamp, TimeGrid, Timestamps, TIMESTAMP_FORMAT};
