//! Bather load: how many occupants are in the water.
//!
//! | Grouping          | Counted into bucket `i` when …                                 |
//! |-------------------|----------------------------------------------------------------|
//! | `Grouping::Step`  | `arrival < t_i + step` and `departure > t_i` (covering rule)   |
//! | `Grouping::Day`   | the arrival falls on the `i`-th calendar date of the grid      |

use pool_core::{Buckets, Grouping, TimeGrid};

use crate::Occupant;

/// Occupant counts per bucket of `grid` under `grouping`.
///
/// Empty input gives a zero-filled vector with one entry per bucket.
pub fn bather_load(grid: &TimeGrid, occupants: &[Occupant], grouping: Grouping) -> Vec<u32> {
    match grouping {
        Grouping::Step => per_step(grid, occupants),
        Grouping::Day => Buckets::new(grid, Grouping::Day).count(occupants.iter().map(|o| o.arrival)),
    }
}

fn per_step(grid: &TimeGrid, occupants: &[Occupant]) -> Vec<u32> {
    let step = grid.step_secs() as i64;
    let len = grid.len() as i64;
    let mut load = vec![0u32; grid.len()];

    for o in occupants {
        // arrival < i*step + step  <=>  i >= floor(a / step)
        // departure > i*step       <=>  i <  ceil(d / step)
        let a = grid.offset_secs(o.arrival);
        let d = grid.offset_secs(o.departure);
        let first = a.div_euclid(step).max(0);
        let last = (d + step - 1).div_euclid(step).min(len);
        for i in first..last {
            load[i as usize] += 1;
        }
    }
    load
}
