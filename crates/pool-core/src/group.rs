//! Reduction of per-step series and event instants into buckets.
//!
//! A [`Buckets`] value fixes a grouping key over a [`TimeGrid`]:
//!
//! - [`Grouping::Step`] — one bucket per grid instant.
//! - [`Grouping::Day`]  — one bucket per distinct calendar date touched by
//!   the grid, in chronological order.
//!
//! Per-day arrivals, water totals, and daily TCM maxima all go through the
//! same three reductions: [`count`](Buckets::count), [`sum`](Buckets::sum),
//! and [`max`](Buckets::max).

use chrono::{NaiveDate, NaiveDateTime};
use rustc_hash::FxHashMap;

use crate::TimeGrid;

/// Grouping key for [`Buckets`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Grouping {
    Step,
    Day,
}

/// Maps grid steps and arbitrary instants onto bucket indices.
#[derive(Clone, Debug)]
pub struct Buckets {
    grid:      TimeGrid,
    grouping:  Grouping,
    /// Bucket of each grid step.  For `Step` this is the identity.
    step_slot: Vec<usize>,
    dates:     Vec<NaiveDate>,
    day_slot:  FxHashMap<NaiveDate, usize>,
}

impl Buckets {
    pub fn new(grid: &TimeGrid, grouping: Grouping) -> Self {
        let mut dates = Vec::new();
        let mut day_slot = FxHashMap::default();
        let mut step_slot = Vec::with_capacity(grid.len());

        for t in grid.iter() {
            let date = t.date();
            let next = dates.len();
            let slot = *day_slot.entry(date).or_insert_with(|| {
                dates.push(date);
                next
            });
            step_slot.push(match grouping {
                Grouping::Step => step_slot.len(),
                Grouping::Day => slot,
            });
        }

        Self { grid: *grid, grouping, step_slot, dates, day_slot }
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        match self.grouping {
            Grouping::Step => self.step_slot.len(),
            Grouping::Day => self.dates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct calendar dates of the grid in order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Bucket containing the instant `t`, if it lies within the grid's span
    /// (`Step`) or on one of its dates (`Day`).
    pub fn bucket_of(&self, t: NaiveDateTime) -> Option<usize> {
        match self.grouping {
            Grouping::Step => self.grid.index_of(t),
            Grouping::Day => self.day_slot.get(&t.date()).copied(),
        }
    }

    /// Count instants per bucket.  Instants outside every bucket are ignored.
    pub fn count<I>(&self, instants: I) -> Vec<u32>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut out = vec![0u32; self.len()];
        for t in instants {
            if let Some(b) = self.bucket_of(t) {
                out[b] += 1;
            }
        }
        out
    }

    /// Sum a per-step series into buckets.  `values` is aligned with the
    /// grid; extra trailing values are ignored.
    pub fn sum(&self, values: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.len()];
        for (&b, &v) in self.step_slot.iter().zip(values) {
            out[b] += v;
        }
        out
    }

    /// Maximum of a per-step series per bucket (0 for empty buckets).
    pub fn max(&self, values: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0f64; self.len()];
        for (&b, &v) in self.step_slot.iter().zip(values) {
            out[b] = out[b].max(v);
        }
        out
    }
}
