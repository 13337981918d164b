//! Fluent builder for constructing a [`Sim`].

use pool_core::Grouping;
use pool_models::{
    BodyFluidModel, ChemicalParameters, EvaporationModel, EvaporationTable, Kinetics, PoolState,
    SweatParameters, WaterManagement,
};
use pool_occupancy::{bather_load, Occupant, OccupancyGenerator, OccupancyParameters};

use crate::{CostFunction, Forcings, ScenarioConfig, Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`ScenarioConfig`] — grid, pool geometry, temperatures, cost weights
/// - [`ChemicalParameters`] — from [`pool_models::load_chemical_params`]
///
/// # Optional inputs (have defaults)
///
/// | Method                      | Default                                   |
/// |-----------------------------|-------------------------------------------|
/// | `.occupants(v)`             | —                                         |
/// | `.occupancy_params(p)`      | — (`occupants` wins if both are given)    |
/// | `.evaporation_table(t)`     | `EvaporationTable::default()`             |
/// | `.lenient_evaporation(b)`   | `false`: a missing table row is an error  |
/// | `.sweat(p)`                 | `SweatParameters::default()`              |
/// | `.time_base_secs(s)`        | 1800                                      |
///
/// With neither occupants nor occupancy parameters the pool stays empty.
pub struct SimBuilder {
    config:              ScenarioConfig,
    chemistry:           ChemicalParameters,
    occupants:           Option<Vec<Occupant>>,
    occupancy:           Option<OccupancyParameters>,
    evaporation_table:   Option<EvaporationTable>,
    lenient_evaporation: bool,
    sweat:               SweatParameters,
    time_base_secs:      Option<u32>,
}

impl SimBuilder {
    pub fn new(config: ScenarioConfig, chemistry: ChemicalParameters) -> Self {
        Self {
            config,
            chemistry,
            occupants:           None,
            occupancy:           None,
            evaporation_table:   None,
            lenient_evaporation: false,
            sweat:               SweatParameters::default(),
            time_base_secs:      None,
        }
    }

    /// Use a fixed population instead of generating one.
    pub fn occupants(mut self, occupants: Vec<Occupant>) -> Self {
        self.occupants = Some(occupants);
        self
    }

    /// Generate the population from `params` with the scenario seed.
    pub fn occupancy_params(mut self, params: OccupancyParameters) -> Self {
        self.occupancy = Some(params);
        self
    }

    pub fn evaporation_table(mut self, table: EvaporationTable) -> Self {
        self.evaporation_table = Some(table);
        self
    }

    /// Fall back to zero evaporation (with a warning) when no table row
    /// matches the room conditions.
    pub fn lenient_evaporation(mut self, lenient: bool) -> Self {
        self.lenient_evaporation = lenient;
        self
    }

    pub fn sweat(mut self, params: SweatParameters) -> Self {
        self.sweat = params;
        self
    }

    pub fn time_base_secs(mut self, secs: u32) -> Self {
        self.time_base_secs = Some(secs);
        self
    }

    /// Validate the scenario, place the occupants, and precompute every
    /// forcing that does not depend on water management.
    pub fn build(self) -> SimResult<Sim> {
        let config = self.config;
        config.validate()?;
        let grid = config.grid()?;

        // ── Population ────────────────────────────────────────────────────
        let occupants = match (self.occupants, self.occupancy) {
            (Some(v), _) => v,
            (None, Some(params)) => OccupancyGenerator::new(params, config.seed).generate(&grid)?,
            (None, None) => {
                log::warn!("no occupants or occupancy parameters given; the pool stays empty");
                Vec::new()
            }
        };

        // ── Forcings ──────────────────────────────────────────────────────
        let load = bather_load(&grid, &occupants, Grouping::Step);
        let body_fluid = BodyFluidModel::new(config.water_temp_c)
            .with_params(self.sweat)
            .release(&grid, &occupants);

        let table = self.evaporation_table.unwrap_or_default();
        let (area, water_temp, air_temp, rh) = (
            config.surface_area_m2,
            config.water_temp_c,
            config.room_temp_c,
            config.room_humidity,
        );
        let model = if self.lenient_evaporation {
            EvaporationModel::lenient(&table, area, water_temp, air_temp, rh)?
        } else {
            EvaporationModel::new(&table, area, water_temp, air_temp, rh)?
        };
        let evaporation = model.process(&grid, &load)?;

        // ── Models ────────────────────────────────────────────────────────
        let mut water = WaterManagement::new(config.min_volume_l, config.max_volume_l)?;
        if let Some(secs) = self.time_base_secs {
            water = water.with_time_base(secs)?;
        }
        let kinetics = Kinetics::new(&self.chemistry, config.water_temp_c, grid.step_secs())?;
        let initial_state =
            PoolState::initial(&config.initial_chemistry, &self.chemistry, config.initial_volume_l);
        let cost = CostFunction {
            lambda:        config.lambda,
            tcm_threshold: config.tcm_threshold,
            step_secs:     grid.step_secs(),
        };

        log::info!(
            "scenario ready: {} steps, {} occupants, {:.1} L evaporation",
            grid.len(),
            occupants.len(),
            evaporation.iter().sum::<f64>()
        );

        Ok(Sim {
            config,
            grid,
            occupants,
            forcings: Forcings { bather_load: load, body_fluid, evaporation },
            water,
            kinetics,
            initial_state,
            cost,
        })
    }
}
