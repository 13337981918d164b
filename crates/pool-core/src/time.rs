//! Simulation time grid.
//!
//! # Design
//!
//! Instants are naive local date-times (`chrono::NaiveDateTime`): a pool runs
//! on its own wall clock and never crosses time zones.  A [`TimeGrid`] is the
//! triple `(start, end, step_secs)` and describes the sequence
//!
//!   t_i = start + i * step_secs,   0 <= i < floor((end - start) / step_secs)
//!
//! The sequence is produced lazily by [`TimeGrid::iter`].  A [`Timestamps`]
//! iterator is consumed once; call `iter()` again to regenerate it.  Because
//! the step is fixed, every component downstream can map an instant back to
//! its step index with integer arithmetic.

use std::iter::FusedIterator;

use chrono::{Duration, NaiveDateTime};

use crate::{PoolError, PoolResult};

/// Textual format accepted by [`parse_timestamp`]: `YYYY/MM/DD hh:mm:ss`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Parse a `YYYY/MM/DD hh:mm:ss` string.
///
/// Returns [`PoolError::Format`] for anything else, including trailing
/// characters and out-of-range fields.
pub fn parse_timestamp(text: &str) -> PoolResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|_| PoolError::Format(text.to_owned()))
}

// ── TimeGrid ──────────────────────────────────────────────────────────────────

/// A fixed-step sequence of instants in `[start, end)`.
///
/// `TimeGrid` is `Copy` and holds no heap data; it is passed by value to every
/// model that needs to line its output up with the step sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeGrid {
    start:     NaiveDateTime,
    end:       NaiveDateTime,
    step_secs: u32,
    len:       usize,
}

impl TimeGrid {
    /// Build a grid from two instants and a step in seconds.
    ///
    /// Fails with [`PoolError::InvalidRange`] if `end <= start` or
    /// `step_secs <= 0`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, step_secs: i64) -> PoolResult<Self> {
        if step_secs <= 0 {
            return Err(PoolError::InvalidRange(format!(
                "step must be positive, got {step_secs} s"
            )));
        }
        if end <= start {
            return Err(PoolError::InvalidRange(format!(
                "end {end} is not after start {start}"
            )));
        }
        let step_secs = u32::try_from(step_secs).map_err(|_| {
            PoolError::InvalidRange(format!("step of {step_secs} s does not fit in u32"))
        })?;

        let span = end.signed_duration_since(start).num_seconds();
        let len = (span / step_secs as i64) as usize;

        Ok(Self { start, end, step_secs, len })
    }

    /// Parse both endpoints with [`parse_timestamp`], then call [`new`](Self::new).
    ///
    /// Format is checked before range, so a malformed `end` reports
    /// `Format` even when `start` is also out of order.
    pub fn from_text(start: &str, end: &str, step_secs: i64) -> PoolResult<Self> {
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        Self::new(start, end, step_secs)
    }

    #[inline]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[inline]
    pub fn step_secs(&self) -> u32 {
        self.step_secs
    }

    /// The step as a `chrono::Duration`.
    #[inline]
    pub fn step(&self) -> Duration {
        Duration::seconds(self.step_secs as i64)
    }

    /// Number of instants: `floor((end - start) / step)`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `i`-th instant, or `None` past the end.
    pub fn at(&self, i: usize) -> Option<NaiveDateTime> {
        (i < self.len).then(|| self.start + Duration::seconds(i as i64 * self.step_secs as i64))
    }

    /// Signed seconds from `start` to `t`.
    #[inline]
    pub fn offset_secs(&self, t: NaiveDateTime) -> i64 {
        t.signed_duration_since(self.start).num_seconds()
    }

    /// Index of the step whose half-open window `[t_i, t_i + step)` contains `t`.
    ///
    /// Returns `None` before `start` or at/after the last window.
    pub fn index_of(&self, t: NaiveDateTime) -> Option<usize> {
        let offset = self.offset_secs(t);
        if offset < 0 {
            return None;
        }
        let i = (offset / self.step_secs as i64) as usize;
        (i < self.len).then_some(i)
    }

    /// A fresh lazy iterator over the instants.
    pub fn iter(&self) -> Timestamps {
        Timestamps {
            next:      self.start,
            step:      self.step(),
            remaining: self.len,
        }
    }
}

impl IntoIterator for &TimeGrid {
    type Item = NaiveDateTime;
    type IntoIter = Timestamps;

    fn into_iter(self) -> Timestamps {
        self.iter()
    }
}

// ── Timestamps ────────────────────────────────────────────────────────────────

/// Single-pass iterator over the instants of a [`TimeGrid`].
#[derive(Clone, Debug)]
pub struct Timestamps {
    next:      NaiveDateTime,
    step:      Duration,
    remaining: usize,
}

impl Iterator for Timestamps {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        if self.remaining == 0 {
            return None;
        }
        let t = self.next;
        self.next += self.step;
        self.remaining -= 1;
        Some(t)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Timestamps {}
impl FusedIterator for Timestamps {}
