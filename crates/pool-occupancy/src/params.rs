//! Typed occupancy distribution tables.
//!
//! Every statistic of the arrival process is the product of a monthly base
//! value and weekday / hourly adjustments:
//!
//! | Quantity            | Monthly         | Weekday        | Hourly          |
//! |---------------------|-----------------|----------------|-----------------|
//! | inter-arrival mean  | mean (s)        | ÷ divider      | ÷ divider       |
//! | inter-arrival std   | std (s)         | —              | —               |
//! | P(male)             | probability     | × multiplier   | × multiplier    |
//! | non-adult age mean  | mean            | × multiplier   | × multiplier    |
//! | adult age mean      | mean            | × multiplier   | × multiplier    |
//! | P(adult)            | —               | —              | probability     |
//! | stay (minutes)      | —               | —              | mean, std       |
//! | activity (0–1)      | —               | —              | mean, std       |

use chrono::NaiveDateTime;

use pool_core::{HourTable, MonthTable, WeekdayTable};

use crate::Gender;

/// Parameters of a normal distribution.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MeanStd {
    pub mean: f64,
    pub std:  f64,
}

impl MeanStd {
    pub const fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }
}

/// Body dimensions used for the surface-area proxy.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BodySize {
    pub height_cm: f64,
    pub weight_kg: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyPattern {
    pub inter_arrival_secs: MonthTable<MeanStd>,
    pub male_probability:   MonthTable<f64>,
    pub age_low:            MonthTable<MeanStd>,
    pub age_high:           MonthTable<MeanStd>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeekdayPattern {
    pub inter_arrival_divider: WeekdayTable<f64>,
    pub gender_multiplier:     WeekdayTable<f64>,
    pub age_low_multiplier:    WeekdayTable<f64>,
    pub age_high_multiplier:   WeekdayTable<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HourlyPattern {
    pub inter_arrival_divider: HourTable<f64>,
    pub gender_multiplier:     HourTable<f64>,
    pub age_low_multiplier:    HourTable<f64>,
    pub age_high_multiplier:   HourTable<f64>,
    pub probability_adult:     HourTable<f64>,
    pub stay_minutes:          HourTable<MeanStd>,
    pub activity:              HourTable<MeanStd>,
}

// ── Age brackets ──────────────────────────────────────────────────────────────

/// Height/weight lookup by upper-bound age bracket.
///
/// Brackets are sorted by `upper_age`.  An age maps to the smallest bracket
/// whose upper bound is strictly greater than it; ages at or above every
/// bound fall into the last bracket.
#[derive(Clone, Debug, PartialEq)]
pub struct AgeBrackets {
    brackets: Vec<AgeBracket>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgeBracket {
    pub upper_age: u32,
    pub male:      BodySize,
    pub female:    BodySize,
}

impl AgeBrackets {
    /// Sorts `brackets` by upper age.  Returns `None` if empty.
    pub fn new(mut brackets: Vec<AgeBracket>) -> Option<Self> {
        if brackets.is_empty() {
            return None;
        }
        brackets.sort_by_key(|b| b.upper_age);
        Some(Self { brackets })
    }

    pub fn brackets(&self) -> &[AgeBracket] {
        &self.brackets
    }

    pub fn lookup(&self, age: f64, gender: Gender) -> BodySize {
        let bracket = self
            .brackets
            .iter()
            .find(|b| b.upper_age as f64 > age)
            .or(self.brackets.last())
            .copied();
        match (bracket, gender) {
            (Some(b), Gender::Male) => b.male,
            (Some(b), Gender::Female) => b.female,
            (None, _) => BodySize::default(),
        }
    }
}

// ── OccupancyParameters ───────────────────────────────────────────────────────

/// The full set of distribution tables driving [`OccupancyGenerator`].
///
/// [`OccupancyGenerator`]: crate::OccupancyGenerator
#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyParameters {
    pub monthly:  MonthlyPattern,
    pub weekday:  WeekdayPattern,
    pub hourly:   HourlyPattern,
    pub physical: AgeBrackets,
}

impl OccupancyParameters {
    /// Inter-arrival distribution for the calendar slot of `t`.
    pub fn inter_arrival(&self, t: &NaiveDateTime) -> MeanStd {
        let base = self.monthly.inter_arrival_secs.at(t);
        MeanStd {
            mean: base.mean
                / self.weekday.inter_arrival_divider.at(t)
                / self.hourly.inter_arrival_divider.at(t),
            std: base.std,
        }
    }

    pub fn male_probability(&self, t: &NaiveDateTime) -> f64 {
        self.monthly.male_probability.at(t)
            * self.weekday.gender_multiplier.at(t)
            * self.hourly.gender_multiplier.at(t)
    }

    pub fn adult_probability(&self, t: &NaiveDateTime) -> f64 {
        *self.hourly.probability_adult.at(t)
    }

    /// Age distribution of the adult (`true`) or non-adult component.
    pub fn age(&self, t: &NaiveDateTime, adult: bool) -> MeanStd {
        let (base, weekday, hourly) = if adult {
            (&self.monthly.age_high, &self.weekday.age_high_multiplier, &self.hourly.age_high_multiplier)
        } else {
            (&self.monthly.age_low, &self.weekday.age_low_multiplier, &self.hourly.age_low_multiplier)
        };
        let base = base.at(t);
        MeanStd::new(base.mean * weekday.at(t) * hourly.at(t), base.std)
    }

    /// Stay duration in seconds.
    pub fn stay_secs(&self, t: &NaiveDateTime) -> MeanStd {
        let m = self.hourly.stay_minutes.at(t);
        MeanStd::new(m.mean * 60.0, m.std * 60.0)
    }

    /// Activity level as a 0–1 fraction.
    pub fn activity(&self, t: &NaiveDateTime) -> MeanStd {
        *self.hourly.activity.at(t)
    }
}
