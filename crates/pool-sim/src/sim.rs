//! The `Sim` struct: precomputed forcings plus the per-candidate pipeline.

use pool_core::TimeGrid;
use pool_models::{
    ControlParameters, FlowPolicy, Kinetics, OccupancyThreshold, PoolState, StepForcing, StepRecord,
    WaterFlows, WaterManagement,
};
use pool_occupancy::Occupant;

use crate::{CostBreakdown, CostFunction, ScenarioConfig, SimError, SimObserver, SimResult};

/// Per-step inputs that do not depend on water management.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Forcings {
    pub bather_load: Vec<u32>,
    /// Litres of body fluid released per step.
    pub body_fluid:  Vec<f64>,
    /// Litres evaporated per step.
    pub evaporation: Vec<f64>,
}

impl Forcings {
    pub fn len(&self) -> usize {
        self.bather_load.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bather_load.is_empty()
    }

    /// Kinetics inputs for each step under `flows`.
    pub fn with_flows<'a>(&'a self, flows: &'a WaterFlows) -> impl Iterator<Item = StepForcing> + 'a {
        self.body_fluid
            .iter()
            .zip(&self.evaporation)
            .zip(flows.inflow.iter().zip(&flows.outflow))
            .map(|((&body_fluid, &evaporation), (&inflow, &outflow))| StepForcing {
                body_fluid,
                evaporation,
                inflow,
                outflow,
            })
    }
}

/// Result of one full run under a single policy.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub policy:  &'static str,
    pub flows:   WaterFlows,
    pub records: Vec<StepRecord>,
    pub cost:    CostBreakdown,
}

/// A scenario ready to evaluate any number of water-management policies.
///
/// Everything here is read-only after [`SimBuilder::build`][crate::SimBuilder::build];
/// evaluations take `&self` and may run concurrently.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config:        ScenarioConfig,
    pub grid:          TimeGrid,
    pub occupants:     Vec<Occupant>,
    pub forcings:      Forcings,
    pub water:         WaterManagement,
    pub kinetics:      Kinetics,
    /// Chemistry at `grid.start()`, before the first step.
    pub initial_state: PoolState,
    pub cost:          CostFunction,
}

impl Sim {
    /// Water management, chemistry, and cost under `policy`.
    pub fn evaluate(&self, policy: &dyn FlowPolicy) -> SimResult<Evaluation> {
        let flows = self.water.run(
            policy,
            &self.grid,
            &self.occupants,
            &self.forcings.evaporation,
            self.config.initial_volume_l,
        )?;
        let records = self.kinetics.run(self.initial_state, self.forcings.with_flows(&flows))?;
        let cost = self.cost.evaluate(&flows.inflow, &self.forcings.bather_load, &records)?;
        Ok(Evaluation { policy: policy.name(), flows, records, cost })
    }

    /// Cost of the occupancy-threshold policy with `control`.
    ///
    /// Fails with [`SimError::InvalidControl`] unless `γL < γM < γH`.
    pub fn evaluate_control(&self, control: ControlParameters) -> SimResult<CostBreakdown> {
        if !control.is_ordered() {
            return Err(SimError::InvalidControl(control));
        }
        Ok(self.evaluate(&OccupancyThreshold::new(control))?.cost)
    }

    /// [`evaluate`](Self::evaluate), reporting every step to `observer`.
    pub fn run<O: SimObserver>(&self, policy: &dyn FlowPolicy, observer: &mut O) -> SimResult<Evaluation> {
        observer.on_run_start(policy.name(), &self.grid);
        let evaluation = self.evaluate(policy)?;
        for (i, (t, record)) in self.grid.iter().zip(&evaluation.records).enumerate() {
            observer.on_step(i, t, self.forcings.bather_load[i], record);
        }
        observer.on_run_end(evaluation.policy, &evaluation.cost);
        log::info!(
            "{}: water {:.2} m³, health {:.4}, cost {:.4}",
            evaluation.policy,
            evaluation.cost.water_m3,
            evaluation.cost.health,
            evaluation.cost.total
        );
        Ok(evaluation)
    }
}
