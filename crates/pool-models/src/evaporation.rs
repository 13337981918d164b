//! Water evaporation from the pool surface.
//!
//! # Model
//!
//! An [`EvaporationTable`] row gives, for one set of room conditions, the
//! unoccupied evaporation rate `E0` (kg m⁻² h⁻¹) and the air density
//! difference `δρ`.  With bather density `N* = bathers / area`:
//!
//! ```text
//! E = E0                                   if N* <= 0.05
//! E = E0 * (1.9 - 21 δρ + 5.3 N*)          otherwise
//! litres per step = area * E * step / 3600
//! ```
//!
//! Rows match when `|Δwater| < 0.5`, `|Δair| < 0.5`, and `|ΔRH| < 0.1`;
//! the first matching row wins.

use serde::Deserialize;

use pool_core::TimeGrid;

use crate::error::check_len;
use crate::{ModelError, ModelResult};

const WATER_TOLERANCE: f64 = 0.5;
const AIR_TOLERANCE: f64 = 0.5;
const HUMIDITY_TOLERANCE: f64 = 0.1;

/// Bather density above which the occupied correction applies.
const OCCUPIED_DENSITY: f64 = 0.05;

/// One row of the evaporation table.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct EvaporationEntry {
    pub water_temp:        f64,
    pub air_temp:          f64,
    pub relative_humidity: f64,
    #[serde(rename = "E0")]
    pub e0:                f64,
    #[serde(rename = "delta_roe")]
    pub delta_rho:         f64,
}

const fn row(water_temp: f64, air_temp: f64, e0: f64, delta_rho: f64) -> EvaporationEntry {
    EvaporationEntry { water_temp, air_temp, relative_humidity: 0.5, e0, delta_rho }
}

/// Published rows at 50 % relative humidity.
pub const PUBLISHED_ROWS: [EvaporationEntry; 9] = [
    row(28.0, 28.0, 0.1360, 0.0219),
    row(28.0, 29.0, 0.1171, 0.0168),
    row(28.0, 30.0, 0.0968, 0.0116),
    row(29.0, 28.0, 0.1651, 0.0282),
    row(29.0, 29.0, 0.1463, 0.0231),
    row(29.0, 30.0, 0.1268, 0.0180),
    row(30.0, 28.0, 0.1959, 0.0347),
    row(30.0, 29.0, 0.1771, 0.0295),
    row(30.0, 30.0, 0.1575, 0.0244),
];

#[derive(Clone, Debug, PartialEq)]
pub struct EvaporationTable {
    entries: Vec<EvaporationEntry>,
}

impl Default for EvaporationTable {
    fn default() -> Self {
        Self { entries: PUBLISHED_ROWS.to_vec() }
    }
}

impl EvaporationTable {
    pub fn new(entries: Vec<EvaporationEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[EvaporationEntry] {
        &self.entries
    }

    /// First row within tolerance of the given conditions.
    pub fn lookup(&self, water_temp: f64, air_temp: f64, humidity: f64) -> Option<&EvaporationEntry> {
        self.entries.iter().find(|r| {
            (r.water_temp - water_temp).abs() < WATER_TOLERANCE
                && (r.air_temp - air_temp).abs() < AIR_TOLERANCE
                && (r.relative_humidity - humidity).abs() < HUMIDITY_TOLERANCE
        })
    }
}

/// Evaporation for one pool under fixed room conditions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EvaporationModel {
    surface_area_m2: f64,
    e0:              f64,
    delta_rho:       f64,
}

impl EvaporationModel {
    /// Look up the row for the room conditions.
    ///
    /// Fails with [`ModelError::NoEvaporationEntry`] when no row matches and
    /// with `InvalidParameters` for a non-positive surface area.
    pub fn new(
        table:           &EvaporationTable,
        surface_area_m2: f64,
        water_temp:      f64,
        air_temp:        f64,
        humidity:        f64,
    ) -> ModelResult<Self> {
        check_area(surface_area_m2)?;
        let entry = table.lookup(water_temp, air_temp, humidity).ok_or(
            ModelError::NoEvaporationEntry { water_temp, air_temp, humidity },
        )?;
        log::debug!(
            "evaporation row: water {} °C, air {} °C, RH {} → E0 {}, δρ {}",
            entry.water_temp,
            entry.air_temp,
            entry.relative_humidity,
            entry.e0,
            entry.delta_rho
        );
        Ok(Self { surface_area_m2, e0: entry.e0, delta_rho: entry.delta_rho })
    }

    /// Like [`new`](Self::new) but a missing row gives a zero-evaporation
    /// model and a warning instead of an error.
    pub fn lenient(
        table:           &EvaporationTable,
        surface_area_m2: f64,
        water_temp:      f64,
        air_temp:        f64,
        humidity:        f64,
    ) -> ModelResult<Self> {
        match Self::new(table, surface_area_m2, water_temp, air_temp, humidity) {
            Err(e @ ModelError::NoEvaporationEntry { .. }) => {
                log::warn!("{e}; evaporation set to zero");
                Ok(Self { surface_area_m2, e0: 0.0, delta_rho: 0.0 })
            }
            other => other,
        }
    }

    /// A model with explicit coefficients, bypassing the table.
    pub fn from_coefficients(surface_area_m2: f64, e0: f64, delta_rho: f64) -> ModelResult<Self> {
        check_area(surface_area_m2)?;
        Ok(Self { surface_area_m2, e0, delta_rho })
    }

    pub fn surface_area_m2(&self) -> f64 {
        self.surface_area_m2
    }

    pub fn e0(&self) -> f64 {
        self.e0
    }

    pub fn delta_rho(&self) -> f64 {
        self.delta_rho
    }

    /// Evaporation rate (kg m⁻² h⁻¹) with `bathers` in the water.
    pub fn rate(&self, bathers: u32) -> f64 {
        let density = bathers as f64 / self.surface_area_m2;
        if density > OCCUPIED_DENSITY {
            self.e0 * (1.9 - 21.0 * self.delta_rho + 5.3 * density)
        } else {
            self.e0
        }
    }

    /// Litres evaporated per grid step.  `bather_load` must be per step.
    pub fn process(&self, grid: &TimeGrid, bather_load: &[u32]) -> ModelResult<Vec<f64>> {
        check_len(grid.len(), bather_load.len(), "bather load")?;
        let hours = grid.step_secs() as f64 / 3600.0;
        Ok(bather_load
            .iter()
            .map(|&n| self.surface_area_m2 * self.rate(n) * hours)
            .collect())
    }
}

fn check_area(surface_area_m2: f64) -> ModelResult<()> {
    if surface_area_m2.is_nan() || surface_area_m2 <= 0.0 {
        return Err(ModelError::InvalidParameters(format!(
            "surface area must be positive, got {surface_area_m2} m²"
        )));
    }
    Ok(())
}
