//! JSON occupancy parameter loader.
//!
//! # File layout
//!
//! ```json
//! {
//!   "MonthlyPattern": {
//!     "InterArrivalTime_Seconds": { "January": { "mean": 300, "std": 60 }, ... },
//!     "GenderMaleProbability":    { "January": 0.5, ... },
//!     "AgeLowDistribution":       { "January": { "mean": 10, "std": 3 }, ... },
//!     "AgeHighDistribution":      { "January": { "mean": 40, "std": 12 }, ... }
//!   },
//!   "WeekDailyPattern": {
//!     "InterArrivalTime_Divider": { "Monday": 1.0, ... },
//!     "Gender_Multiplier": { ... }, "AgeLow_Multiplier": { ... }, "AgeHigh_Multiplier": { ... }
//!   },
//!   "HourlyPattern": {
//!     "InterArrivalRate_Divider": { "0": 0.1, ..., "23": 0.1 },
//!     "Gender_Multiplier": { ... }, "AgeLow_Multiplier": { ... }, "AgeHigh_Multiplier": { ... },
//!     "ProbabilityAdult": { ... },
//!     "TimeOfStay_Minutes_mean": { ... }, "TimeOfStay_Minutes_std": { ... },
//!     "ActivityLevel_mean": { ... },      "ActivityLevel_std": { ... }
//!   },
//!   "PhysicalModel": {
//!     "male":   { "5": { "height": 110, "weight": 19 }, ..., "100": { ... } },
//!     "female": { ... same keys ... }
//!   }
//! }
//! ```
//!
//! Every month, weekday, and hour key must be present.  A missing key, or a
//! negative standard deviation, is an [`OccupancyError::Config`] naming its
//! full path; the run never starts with an undefined table entry.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use pool_core::{HourTable, MonthTable, WeekdayTable};

use crate::params::{
    AgeBracket, AgeBrackets, BodySize, HourlyPattern, MeanStd, MonthlyPattern,
    OccupancyParameters, WeekdayPattern,
};
use crate::{OccupancyError, OccupancyResult};

// ── Raw JSON records ──────────────────────────────────────────────────────────

type Table<T> = HashMap<String, T>;

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawParameters {
    #[serde(rename = "MonthlyPattern")]
    monthly:  RawMonthly,
    #[serde(rename = "WeekDailyPattern")]
    weekday:  RawWeekday,
    #[serde(rename = "HourlyPattern")]
    hourly:   RawHourly,
    #[serde(rename = "PhysicalModel")]
    physical: Table<Table<RawBody>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawMonthly {
    #[serde(rename = "InterArrivalTime_Seconds")]
    inter_arrival:    Table<RawMeanStd>,
    #[serde(rename = "GenderMaleProbability")]
    male_probability: Table<f64>,
    #[serde(rename = "AgeLowDistribution")]
    age_low:          Table<RawMeanStd>,
    #[serde(rename = "AgeHighDistribution")]
    age_high:         Table<RawMeanStd>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawWeekday {
    #[serde(rename = "InterArrivalTime_Divider")]
    inter_arrival_divider: Table<f64>,
    #[serde(rename = "Gender_Multiplier")]
    gender:                Table<f64>,
    #[serde(rename = "AgeLow_Multiplier")]
    age_low:               Table<f64>,
    #[serde(rename = "AgeHigh_Multiplier")]
    age_high:              Table<f64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawHourly {
    #[serde(rename = "InterArrivalRate_Divider")]
    inter_arrival_divider: Table<f64>,
    #[serde(rename = "Gender_Multiplier")]
    gender:                Table<f64>,
    #[serde(rename = "AgeLow_Multiplier")]
    age_low:               Table<f64>,
    #[serde(rename = "AgeHigh_Multiplier")]
    age_high:              Table<f64>,
    #[serde(rename = "ProbabilityAdult")]
    probability_adult:     Table<f64>,
    #[serde(rename = "TimeOfStay_Minutes_mean")]
    stay_mean:             Table<f64>,
    #[serde(rename = "TimeOfStay_Minutes_std")]
    stay_std:              Table<f64>,
    #[serde(rename = "ActivityLevel_mean")]
    activity_mean:         Table<f64>,
    #[serde(rename = "ActivityLevel_std")]
    activity_std:          Table<f64>,
}

#[derive(Deserialize, Clone, Copy)]
struct RawMeanStd {
    mean: Option<f64>,
    std:  Option<f64>,
}

#[derive(Deserialize, Clone, Copy)]
struct RawBody {
    height: Option<f64>,
    weight: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load [`OccupancyParameters`] from a JSON file.
pub fn load_occupancy_params(path: &Path) -> OccupancyResult<OccupancyParameters> {
    let file = std::fs::File::open(path)?;
    load_occupancy_params_reader(std::io::BufReader::new(file))
}

/// Like [`load_occupancy_params`] but accepts any `Read` source.
pub fn load_occupancy_params_reader<R: Read>(reader: R) -> OccupancyResult<OccupancyParameters> {
    let raw: RawParameters = serde_json::from_reader(reader)?;
    let params = convert(raw)?;
    log::debug!(
        "loaded occupancy parameters ({} age brackets)",
        params.physical.brackets().len()
    );
    Ok(params)
}

// ── Conversion ────────────────────────────────────────────────────────────────

fn convert(raw: RawParameters) -> OccupancyResult<OccupancyParameters> {
    const M: &str = "MonthlyPattern";
    const W: &str = "WeekDailyPattern";
    const H: &str = "HourlyPattern";

    let r = &raw.monthly;
    let monthly = MonthlyPattern {
        inter_arrival_secs: MonthTable::try_from_labels(|k| {
            mean_std(&r.inter_arrival, M, "InterArrivalTime_Seconds", k)
        })?,
        male_probability: MonthTable::try_from_labels(|k| {
            value(&r.male_probability, M, "GenderMaleProbability", k)
        })?,
        age_low: MonthTable::try_from_labels(|k| mean_std(&r.age_low, M, "AgeLowDistribution", k))?,
        age_high: MonthTable::try_from_labels(|k| mean_std(&r.age_high, M, "AgeHighDistribution", k))?,
    };

    let r = &raw.weekday;
    let weekday = WeekdayPattern {
        inter_arrival_divider: WeekdayTable::try_from_labels(|k| {
            value(&r.inter_arrival_divider, W, "InterArrivalTime_Divider", k)
        })?,
        gender_multiplier:   WeekdayTable::try_from_labels(|k| value(&r.gender, W, "Gender_Multiplier", k))?,
        age_low_multiplier:  WeekdayTable::try_from_labels(|k| value(&r.age_low, W, "AgeLow_Multiplier", k))?,
        age_high_multiplier: WeekdayTable::try_from_labels(|k| value(&r.age_high, W, "AgeHigh_Multiplier", k))?,
    };

    let r = &raw.hourly;
    let hourly = HourlyPattern {
        inter_arrival_divider: HourTable::try_from_labels(|k| {
            value(&r.inter_arrival_divider, H, "InterArrivalRate_Divider", k)
        })?,
        gender_multiplier:   HourTable::try_from_labels(|k| value(&r.gender, H, "Gender_Multiplier", k))?,
        age_low_multiplier:  HourTable::try_from_labels(|k| value(&r.age_low, H, "AgeLow_Multiplier", k))?,
        age_high_multiplier: HourTable::try_from_labels(|k| value(&r.age_high, H, "AgeHigh_Multiplier", k))?,
        probability_adult:   HourTable::try_from_labels(|k| value(&r.probability_adult, H, "ProbabilityAdult", k))?,
        stay_minutes: HourTable::try_from_labels(|k| -> OccupancyResult<MeanStd> {
            Ok(MeanStd::new(
                value(&r.stay_mean, H, "TimeOfStay_Minutes_mean", k)?,
                std_dev(value(&r.stay_std, H, "TimeOfStay_Minutes_std", k)?, H, "TimeOfStay_Minutes_std", k)?,
            ))
        })?,
        activity: HourTable::try_from_labels(|k| -> OccupancyResult<MeanStd> {
            Ok(MeanStd::new(
                value(&r.activity_mean, H, "ActivityLevel_mean", k)?,
                std_dev(value(&r.activity_std, H, "ActivityLevel_std", k)?, H, "ActivityLevel_std", k)?,
            ))
        })?,
    };

    Ok(OccupancyParameters {
        monthly,
        weekday,
        hourly,
        physical: age_brackets(&raw.physical)?,
    })
}

fn missing(section: &str, name: &str, key: &str) -> OccupancyError {
    OccupancyError::Config(format!("missing key {section}.{name}.{key}"))
}

fn value(table: &Table<f64>, section: &str, name: &str, key: &str) -> OccupancyResult<f64> {
    table.get(key).copied().ok_or_else(|| missing(section, name, key))
}

fn mean_std(
    table:   &Table<RawMeanStd>,
    section: &str,
    name:    &str,
    key:     &str,
) -> OccupancyResult<MeanStd> {
    let entry = table.get(key).ok_or_else(|| missing(section, name, key))?;
    let mean = entry.mean.ok_or_else(|| missing(section, name, &format!("{key}.mean")))?;
    let std = entry.std.ok_or_else(|| missing(section, name, &format!("{key}.std")))?;
    Ok(MeanStd::new(mean, std_dev(std, section, name, &format!("{key}.std"))?))
}

/// A standard deviation must be finite and non-negative.
fn std_dev(std: f64, section: &str, name: &str, key: &str) -> OccupancyResult<f64> {
    if std.is_finite() && std >= 0.0 {
        Ok(std)
    } else {
        Err(OccupancyError::Config(format!(
            "{section}.{name}.{key}: standard deviation must be non-negative, got {std}"
        )))
    }
}

fn age_brackets(raw: &Table<Table<RawBody>>) -> OccupancyResult<AgeBrackets> {
    const P: &str = "PhysicalModel";

    let male = raw.get("male").ok_or_else(|| OccupancyError::Config(format!("missing key {P}.male")))?;
    let female = raw.get("female").ok_or_else(|| OccupancyError::Config(format!("missing key {P}.female")))?;

    let body = |table: &Table<RawBody>, gender: &str, key: &str| -> OccupancyResult<BodySize> {
        let entry = table.get(key).ok_or_else(|| missing(P, gender, key))?;
        Ok(BodySize {
            height_cm: entry.height.ok_or_else(|| missing(P, gender, &format!("{key}.height")))?,
            weight_kg: entry.weight.ok_or_else(|| missing(P, gender, &format!("{key}.weight")))?,
        })
    };

    let mut brackets = Vec::with_capacity(male.len());
    for key in male.keys() {
        let upper_age = key.trim().parse::<u32>().map_err(|_| {
            OccupancyError::Config(format!("{P}.male: age bracket {key:?} is not an integer"))
        })?;
        brackets.push(AgeBracket {
            upper_age,
            male:   body(male, "male", key)?,
            female: body(female, "female", key)?,
        });
    }
    if female.len() != male.len() {
        return Err(OccupancyError::Config(format!(
            "{P}: male has {} age brackets but female has {}",
            male.len(),
            female.len()
        )));
    }

    AgeBrackets::new(brackets)
        .ok_or_else(|| OccupancyError::Config(format!("{P}: no age brackets")))
}
