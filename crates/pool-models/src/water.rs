//! Fresh-water inflow and wastewater outflow.
//!
//! # Two stages
//!
//! 1. A [`FlowPolicy`] proposes unclamped `(inflow, outflow)` for every grid
//!    step.  Proposals never depend on the pool volume.
//! 2. [`WaterManagement::run`] walks the proposals in order and clamps each
//!    step against the volume bounds before it is committed:
//!
//! ```text
//! tentative = V + in - out - E
//! tentative > max  →  out += tentative - max
//! tentative < min  →  in  += min - tentative
//! V = V + in - out - E
//! ```
//!
//! so `min <= V <= max` holds after every step.
//!
//! # Policies
//!
//! | Policy                 | Proposal per step                                        |
//! |------------------------|----------------------------------------------------------|
//! | [`FixedRate`]          | `in = q_in * r`, `out = q_out * r - E`                   |
//! | [`OccupancyThreshold`] | `in = Σ γ_band(occupant) * r`, `out = in - E`            |
//! | [`ScheduledInjection`] | daily top-ups sized by departures, `out = in`            |
//!
//! where `r = step / time_base`.  An outflow below zero means evaporation
//! exceeds the drained volume; the pool is topped up through the drain
//! balance rather than the metered inflow.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use pool_core::{Buckets, Grouping, TimeGrid};
use pool_occupancy::Occupant;

use crate::error::check_len;
use crate::{ModelError, ModelResult};

/// Time base the gamma rates and fixed rates are expressed against.
pub const DEFAULT_TIME_BASE_SECS: u32 = 30 * 60;

// ── Control parameters ────────────────────────────────────────────────────────

/// Injection rate (litres per time base, per occupant) for each activity band.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlParameters {
    pub gamma_l: f64,
    pub gamma_m: f64,
    pub gamma_h: f64,
}

impl Default for ControlParameters {
    fn default() -> Self {
        Self::new(5.0, 10.0, 20.0)
    }
}

impl ControlParameters {
    pub const fn new(gamma_l: f64, gamma_m: f64, gamma_h: f64) -> Self {
        Self { gamma_l, gamma_m, gamma_h }
    }

    /// `gamma_l < gamma_m < gamma_h`.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.gamma_l < self.gamma_m && self.gamma_m < self.gamma_h
    }

    #[inline]
    pub fn rate(&self, band: ActivityBand) -> f64 {
        match band {
            ActivityBand::Low => self.gamma_l,
            ActivityBand::Medium => self.gamma_m,
            ActivityBand::High => self.gamma_h,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.gamma_l, self.gamma_m, self.gamma_h]
    }
}

impl fmt::Display for ControlParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(γL={}, γM={}, γH={})", self.gamma_l, self.gamma_m, self.gamma_h)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActivityBand {
    Low,
    Medium,
    High,
}

impl ActivityBand {
    /// Band of an activity level given in percent: `< 40` low, `< 70`
    /// medium, otherwise high.
    pub fn classify(level_pct: f64) -> Self {
        let fraction = level_pct / 100.0;
        if fraction < 0.4 {
            Self::Low
        } else if fraction < 0.7 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

// ── Policies ──────────────────────────────────────────────────────────────────

/// Litres in and out during one step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Flow {
    pub inflow:  f64,
    pub outflow: f64,
}

/// Read-only inputs shared by every policy.
#[derive(Copy, Clone, Debug)]
pub struct FlowContext<'a> {
    pub grid:           &'a TimeGrid,
    pub occupants:      &'a [Occupant],
    /// Litres evaporated per step, aligned with `grid`.
    pub evaporation:    &'a [f64],
    pub time_base_secs: u32,
}

impl FlowContext<'_> {
    /// `step / time_base`: converts per-time-base rates into per-step litres.
    #[inline]
    pub fn step_ratio(&self) -> f64 {
        self.grid.step_secs() as f64 / self.time_base_secs as f64
    }
}

/// A water-management strategy.
///
/// Implementations propose one [`Flow`] per grid step.  Clamping against the
/// volume bounds is applied afterwards by [`WaterManagement::run`] and is the
/// same for every policy.
pub trait FlowPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn proposed_flows(&self, ctx: &FlowContext<'_>) -> ModelResult<Vec<Flow>>;
}

/// Constant inflow and outflow, in litres per time base.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedRate {
    pub inflow_per_base:  f64,
    pub outflow_per_base: f64,
}

impl Default for FixedRate {
    fn default() -> Self {
        Self { inflow_per_base: 50.0, outflow_per_base: 50.0 }
    }
}

impl FlowPolicy for FixedRate {
    fn name(&self) -> &'static str {
        "fixed-rate"
    }

    fn proposed_flows(&self, ctx: &FlowContext<'_>) -> ModelResult<Vec<Flow>> {
        let r = ctx.step_ratio();
        Ok(ctx
            .evaporation
            .iter()
            .map(|&e| Flow {
                inflow:  self.inflow_per_base * r,
                outflow: self.outflow_per_base * r - e,
            })
            .collect())
    }
}

/// Inflow proportional to the activity bands of the occupants in the water.
///
/// Occupant `o` adds `γ_band(levels[k]) * r` to step `start + k`, where
/// `start` is the step containing its arrival, for every step up to the one
/// containing its departure and every `k` that has an activity sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OccupancyThreshold {
    pub control: ControlParameters,
}

impl OccupancyThreshold {
    pub fn new(control: ControlParameters) -> Self {
        Self { control }
    }
}

impl FlowPolicy for OccupancyThreshold {
    fn name(&self) -> &'static str {
        "occupancy-threshold"
    }

    fn proposed_flows(&self, ctx: &FlowContext<'_>) -> ModelResult<Vec<Flow>> {
        let grid = ctx.grid;
        let step = grid.step_secs() as i64;
        let len = grid.len() as i64;
        let r = ctx.step_ratio();
        let mut inflow = vec![0.0; grid.len()];

        for o in ctx.occupants {
            let first = grid.offset_secs(o.arrival).div_euclid(step);
            let last = grid.offset_secs(o.departure).div_euclid(step);
            for (k, n) in (first..last).enumerate() {
                let Some(level) = o.activity_at(k) else {
                    break;
                };
                if n >= len {
                    break;
                }
                if n < 0 {
                    continue;
                }
                inflow[n as usize] += self.control.rate(ActivityBand::classify(level)) * r;
            }
        }

        Ok(inflow
            .into_iter()
            .zip(ctx.evaporation)
            .map(|(inflow, &e)| Flow { inflow, outflow: inflow - e })
            .collect())
    }
}

/// Top-ups at fixed clock times, sized by the bathers who left since the
/// previous top-up.
///
/// Events fall at whole hours spread evenly over
/// `[first_hour, last_hour]` on every date of the grid.  An occupant is
/// charged to the first event after its departure.  Once the grid passes an
/// event, its volume joins the pending amount, which is dispensed at no more
/// than `max_rate_lps` per second.  Outflow matches inflow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScheduledInjection {
    pub daily_events:      usize,
    pub first_hour:        f64,
    pub last_hour:         f64,
    pub liters_per_bather: f64,
    pub max_rate_lps:      f64,
}

impl Default for ScheduledInjection {
    fn default() -> Self {
        Self {
            daily_events:      3,
            first_hour:        11.0,
            last_hour:         23.0,
            liters_per_bather: 15.0,
            max_rate_lps:      1.0,
        }
    }
}

impl ScheduledInjection {
    /// Whole event hours: `linspace(first_hour, last_hour, daily_events)`,
    /// truncated.
    pub fn event_hours(&self) -> ModelResult<Vec<u32>> {
        let n = self.daily_events;
        if n == 0 {
            return Err(ModelError::InvalidParameters("daily_events must be positive".into()));
        }
        let span = self.last_hour - self.first_hour;
        let mut hours = Vec::with_capacity(n);
        for k in 0..n {
            let h = if n == 1 {
                self.first_hour
            } else {
                self.first_hour + span * k as f64 / (n - 1) as f64
            };
            if !(0.0..24.0).contains(&h) {
                return Err(ModelError::InvalidParameters(format!(
                    "injection hour {h} is outside 0..24"
                )));
            }
            hours.push(h as u32);
        }
        Ok(hours)
    }

    /// Every event instant over the grid's dates, ascending.
    pub fn events(&self, grid: &TimeGrid) -> ModelResult<Vec<NaiveDateTime>> {
        let hours = self.event_hours()?;
        let days = Buckets::new(grid, Grouping::Day);
        let mut events = Vec::with_capacity(days.len() * hours.len());
        for date in days.dates() {
            for &h in &hours {
                let t = date.and_hms_opt(h, 0, 0).ok_or_else(|| {
                    ModelError::InvalidParameters(format!("invalid injection hour {h}"))
                })?;
                events.push(t);
            }
        }
        events.sort_unstable();
        events.dedup();
        Ok(events)
    }
}

impl FlowPolicy for ScheduledInjection {
    fn name(&self) -> &'static str {
        "scheduled-injection"
    }

    fn proposed_flows(&self, ctx: &FlowContext<'_>) -> ModelResult<Vec<Flow>> {
        let events = self.events(ctx.grid)?;
        let mut bathers = vec![0u32; events.len()];
        let mut unassigned = 0usize;
        for o in ctx.occupants {
            let i = events.partition_point(|&e| e <= o.departure);
            match bathers.get_mut(i) {
                Some(n) => *n += 1,
                None => unassigned += 1,
            }
        }
        if unassigned > 0 {
            log::debug!("{unassigned} occupants leave after the last injection event");
        }

        let cap = self.max_rate_lps * ctx.grid.step_secs() as f64;
        let mut next = 0;
        let mut pending = 0.0;
        let mut flows = Vec::with_capacity(ctx.grid.len());
        for t in ctx.grid.iter() {
            while next < events.len() && events[next] < t {
                pending += bathers[next] as f64 * self.liters_per_bather;
                next += 1;
            }
            let inflow = pending.min(cap);
            pending -= inflow;
            flows.push(Flow { inflow, outflow: inflow });
        }
        Ok(flows)
    }
}

// ── Volume clamp ──────────────────────────────────────────────────────────────

/// Clamped flows and the volume after each step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaterFlows {
    pub inflow:  Vec<f64>,
    pub outflow: Vec<f64>,
    pub volume:  Vec<f64>,
}

impl WaterFlows {
    pub fn len(&self) -> usize {
        self.inflow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflow.is_empty()
    }

    /// Total fresh water, litres.
    pub fn total_inflow(&self) -> f64 {
        self.inflow.iter().sum()
    }
}

/// Volume bounds and the time base of the policy rates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaterManagement {
    min_volume:     f64,
    max_volume:     f64,
    time_base_secs: u32,
}

impl WaterManagement {
    pub fn new(min_volume: f64, max_volume: f64) -> ModelResult<Self> {
        if !(min_volume.is_finite() && max_volume.is_finite()) || min_volume <= 0.0 || min_volume > max_volume {
            return Err(ModelError::InvalidParameters(format!(
                "volume bounds [{min_volume}, {max_volume}] must be positive and ordered"
            )));
        }
        Ok(Self { min_volume, max_volume, time_base_secs: DEFAULT_TIME_BASE_SECS })
    }

    pub fn with_time_base(mut self, secs: u32) -> ModelResult<Self> {
        if secs == 0 {
            return Err(ModelError::InvalidParameters("time base must be positive".into()));
        }
        self.time_base_secs = secs;
        Ok(self)
    }

    pub fn min_volume(&self) -> f64 {
        self.min_volume
    }

    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }

    pub fn time_base_secs(&self) -> u32 {
        self.time_base_secs
    }

    /// Clamp one proposed step.  Returns the committed flow and the new volume.
    pub fn clamp(&self, volume: f64, proposed: Flow, evaporation: f64) -> (Flow, f64) {
        let Flow { mut inflow, mut outflow } = proposed;
        let tentative = volume + inflow - outflow - evaporation;
        if tentative > self.max_volume {
            outflow += tentative - self.max_volume;
        } else if tentative < self.min_volume {
            inflow += self.min_volume - tentative;
        }
        let volume = volume + inflow - outflow - evaporation;
        (Flow { inflow, outflow }, volume)
    }

    /// Run `policy` over the grid from `initial_volume`.
    pub fn run(
        &self,
        policy:         &dyn FlowPolicy,
        grid:           &TimeGrid,
        occupants:      &[Occupant],
        evaporation:    &[f64],
        initial_volume: f64,
    ) -> ModelResult<WaterFlows> {
        check_len(grid.len(), evaporation.len(), "evaporation")?;
        let ctx = FlowContext { grid, occupants, evaporation, time_base_secs: self.time_base_secs };
        let proposed = policy.proposed_flows(&ctx)?;
        check_len(grid.len(), proposed.len(), "proposed flows")?;

        let mut out = WaterFlows {
            inflow:  Vec::with_capacity(grid.len()),
            outflow: Vec::with_capacity(grid.len()),
            volume:  Vec::with_capacity(grid.len()),
        };
        let mut volume = initial_volume;
        for (&flow, &e) in proposed.iter().zip(evaporation) {
            let (flow, next) = self.clamp(volume, flow, e);
            volume = next;
            out.inflow.push(flow.inflow);
            out.outflow.push(flow.outflow);
            out.volume.push(volume);
        }
        log::debug!(
            "{} policy: {:.1} L fresh water over {} steps",
            policy.name(),
            out.total_inflow(),
            out.len()
        );
        Ok(out)
    }
}
