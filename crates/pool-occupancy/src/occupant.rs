//! Occupant records.

use chrono::{Duration, NaiveDateTime};

use pool_core::OccupantId;

use crate::BodySize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Male,
    Female,
}

/// One visit to the pool.
///
/// `activity_levels[k]` is the activity level (0–100, percent of maximum)
/// during the `k`-th grid step after arrival.  Records are immutable once
/// generated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupant {
    pub id:              OccupantId,
    pub arrival:         NaiveDateTime,
    pub departure:       NaiveDateTime,
    pub gender:          Gender,
    pub age:             u32,
    pub weight_kg:       f64,
    pub height_cm:       f64,
    pub activity_levels: Vec<f64>,
}

impl Occupant {
    /// Build a record from an arrival instant and a stay duration.
    pub fn new(
        id:              OccupantId,
        arrival:         NaiveDateTime,
        stay_secs:       i64,
        gender:          Gender,
        age:             u32,
        body:            BodySize,
        activity_levels: Vec<f64>,
    ) -> Self {
        Self {
            id,
            arrival,
            departure: arrival + Duration::seconds(stay_secs),
            gender,
            age,
            weight_kg: body.weight_kg,
            height_cm: body.height_cm,
            activity_levels,
        }
    }

    #[inline]
    pub fn stay_secs(&self) -> i64 {
        self.departure.signed_duration_since(self.arrival).num_seconds()
    }

    /// Activity level during the `k`-th step after arrival, if sampled.
    #[inline]
    pub fn activity_at(&self, k: usize) -> Option<f64> {
        self.activity_levels.get(k).copied()
    }

    /// Body-surface-area proxy `sqrt(weight_kg × height_cm / 100) / 6`.
    #[inline]
    pub fn body_surface_area(&self) -> f64 {
        (self.weight_kg * self.height_cm / 100.0).sqrt() / 6.0
    }
}

/// `ceil(stay / step)`, the number of activity samples for a stay.
pub(crate) fn activity_sample_count(stay_secs: i64, step_secs: u32) -> usize {
    if stay_secs <= 0 || step_secs == 0 {
        return 0;
    }
    (stay_secs as u64).div_ceil(step_secs as u64) as usize
}
