//! Unit tests for pool-models.

use chrono::{NaiveDate, NaiveDateTime};

use pool_core::{OccupantId, TimeGrid};
use pool_occupancy::{BodySize, Gender, Occupant};

use crate::{ByproductParameters, ChemicalParameters};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ts(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 6, day).unwrap().and_hms_opt(h, m, 0).unwrap()
}

fn day_grid() -> TimeGrid {
    TimeGrid::new(ts(1, 0, 0), ts(2, 0, 0), 360).unwrap()
}

const BODY: BodySize = BodySize { height_cm: 175.0, weight_kg: 70.0 };

/// A swimmer with one activity sample per started step of the stay.
fn swimmer(id: u32, arrival: NaiveDateTime, stay_secs: i64, level: f64) -> Occupant {
    let samples = (stay_secs as usize).div_ceil(360);
    Occupant::new(OccupantId(id), arrival, stay_secs, Gender::Male, 30, BODY, vec![level; samples])
}

fn chem_params() -> ChemicalParameters {
    let common = ByproductParameters {
        activation_energy: 22_300.0,
        pre_exponential:   612.0,
        m:                 0.002,
        n:                 -0.4,
        molar_mass:        119.38,
    };
    ChemicalParameters {
        gas_constant:       8.3145,
        bf_to_toc_ratio_mg: 400.0,
        byproducts:         [
            common,
            ByproductParameters { molar_mass: 128.94, m: 0.001, ..common },
            ByproductParameters { molar_mass: 163.39, n: -0.2, ..common },
            ByproductParameters { molar_mass: 109.94, m: 0.003, n: -0.8, ..common },
        ],
    }
}

// ── Body fluid ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod body_fluid {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{body_fluid_release, SweatParameters};

    #[test]
    fn reference_conditions_give_a_plus_b() {
        let p = SweatParameters::default();
        assert_relative_eq!(p.normalized_rate(71.0, 29.0, 3600.0), 0.18 + 0.0146, epsilon = 1e-12);
        assert_relative_eq!(p.normalized_rate(71.0, 29.0, 1800.0), (0.18 + 0.0146) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn warmer_water_and_harder_swimming_sweat_more() {
        let p = SweatParameters::default();
        assert!(p.normalized_rate(50.0, 30.0, 360.0) > p.normalized_rate(50.0, 28.0, 360.0));
        assert!(p.normalized_rate(90.0, 30.0, 360.0) > p.normalized_rate(20.0, 30.0, 360.0));
    }

    #[test]
    fn release_only_strictly_inside_the_visit() {
        let grid = day_grid();
        let o = swimmer(0, ts(1, 0, 0), 3600, 50.0);
        let release = body_fluid_release(&grid, std::slice::from_ref(&o), 30.0);

        assert_eq!(release.len(), grid.len());
        for (i, r) in release.iter().enumerate() {
            if (1..=9).contains(&i) {
                assert!(*r > 0.0, "step {i} should release");
            } else {
                assert_eq!(*r, 0.0, "step {i} should be dry");
            }
        }
        let expected = o.body_surface_area() * SweatParameters::default().normalized_rate(50.0, 30.0, 360.0);
        assert_relative_eq!(release[1], expected, max_relative = 1e-12);
    }

    #[test]
    fn first_partial_step_is_prorated() {
        let grid = day_grid();
        let arrival = ts(1, 0, 0) + chrono::Duration::seconds(100);
        let o = swimmer(0, arrival, 3600, 50.0);
        let release = body_fluid_release(&grid, std::slice::from_ref(&o), 30.0);

        let p = SweatParameters::default();
        let bsa = o.body_surface_area();
        assert_relative_eq!(release[1], bsa * p.normalized_rate(50.0, 30.0, 260.0), max_relative = 1e-12);
        assert_relative_eq!(release[2], bsa * p.normalized_rate(50.0, 30.0, 360.0), max_relative = 1e-12);
    }

    #[test]
    fn occupants_are_summed() {
        let grid = day_grid();
        let one = swimmer(0, ts(1, 10, 0), 1800, 40.0);
        let two = swimmer(1, ts(1, 10, 0), 1800, 40.0);
        let single = body_fluid_release(&grid, std::slice::from_ref(&one), 29.0);
        let both = body_fluid_release(&grid, &[one, two], 29.0);
        for (s, b) in single.iter().zip(&both) {
            assert_relative_eq!(*b, 2.0 * s, epsilon = 1e-15);
        }
    }

    #[test]
    fn missing_activity_samples_contribute_nothing() {
        let grid = day_grid();
        let o = Occupant::new(OccupantId(0), ts(1, 8, 0), 3600, Gender::Female, 25, BODY, Vec::new());
        let release = body_fluid_release(&grid, &[o], 30.0);
        assert!(release.iter().all(|&r| r == 0.0));
    }
}

// ── Evaporation ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod evaporation {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{EvaporationModel, EvaporationTable, ModelError};

    #[test]
    fn lookup_uses_tolerances() {
        let table = EvaporationTable::default();
        let row = table.lookup(29.3, 28.7, 0.55).unwrap();
        assert_eq!((row.water_temp, row.air_temp), (29.0, 29.0));
        assert_eq!(row.e0, 0.1463);
        assert!(table.lookup(29.5, 29.0, 0.5).is_none());
        assert!(table.lookup(29.0, 29.0, 0.65).is_none());
    }

    #[test]
    fn unoccupied_pool_evaporates_e0_every_step() {
        let grid = day_grid();
        let model = EvaporationModel::new(&EvaporationTable::default(), 150.0, 30.0, 30.0, 0.5).unwrap();
        let e = model.process(&grid, &vec![0; grid.len()]).unwrap();
        assert_eq!(e.len(), grid.len());
        for v in e {
            assert_relative_eq!(v, 150.0 * 0.1575 * 0.1, max_relative = 1e-12);
        }
    }

    #[test]
    fn density_correction_applies_above_threshold() {
        let model = EvaporationModel::from_coefficients(100.0, 0.2, 0.03).unwrap();
        // N* = 0.05 is not above the threshold.
        assert_eq!(model.rate(5), 0.2);
        // N* = 0.1
        assert_relative_eq!(model.rate(10), 0.2 * (1.9 - 21.0 * 0.03 + 5.3 * 0.1), max_relative = 1e-12);
    }

    #[test]
    fn missing_row_is_an_error_unless_lenient() {
        let table = EvaporationTable::default();
        let err = EvaporationModel::new(&table, 150.0, 26.0, 30.0, 0.5).unwrap_err();
        assert!(matches!(err, ModelError::NoEvaporationEntry { water_temp, .. } if water_temp == 26.0));

        let lenient = EvaporationModel::lenient(&table, 150.0, 26.0, 30.0, 0.5).unwrap();
        assert_eq!(lenient.e0(), 0.0);
        assert_eq!(lenient.rate(50), 0.0);
    }

    #[test]
    fn lenient_still_rejects_bad_area() {
        let table = EvaporationTable::default();
        assert!(matches!(
            EvaporationModel::lenient(&table, 0.0, 26.0, 30.0, 0.5),
            Err(ModelError::InvalidParameters(_))
        ));
    }

    #[test]
    fn bather_load_must_match_grid() {
        let grid = day_grid();
        let model = EvaporationModel::from_coefficients(150.0, 0.1, 0.02).unwrap();
        let err = model.process(&grid, &[0; 3]).unwrap_err();
        assert!(matches!(err, ModelError::LengthMismatch { expected: 240, got: 3, .. }));
    }
}

// ── Water management ──────────────────────────────────────────────────────────

#[cfg(test)]
mod water {
    use approx::assert_relative_eq;

    use pool_core::SimRng;

    use super::*;
    use crate::{
        ActivityBand, ControlParameters, FixedRate, Flow, FlowContext, FlowPolicy, ModelError,
        ModelResult, OccupancyThreshold, ScheduledInjection, WaterManagement,
    };

    const MIN: f64 = 150_000.0;
    const MAX: f64 = 250_000.0;

    fn manager() -> WaterManagement {
        WaterManagement::new(MIN, MAX).unwrap()
    }

    fn assert_within_bounds(volume: &[f64]) {
        for (i, v) in volume.iter().enumerate() {
            assert!(*v >= MIN - 1e-6 && *v <= MAX + 1e-6, "step {i}: volume {v} out of bounds");
        }
    }

    /// Replays a fixed list of proposals.
    struct Scripted(Vec<Flow>);

    impl FlowPolicy for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn proposed_flows(&self, _ctx: &FlowContext<'_>) -> ModelResult<Vec<Flow>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn bands_split_at_forty_and_seventy_percent() {
        assert_eq!(ActivityBand::classify(0.0), ActivityBand::Low);
        assert_eq!(ActivityBand::classify(39.9), ActivityBand::Low);
        assert_eq!(ActivityBand::classify(40.0), ActivityBand::Medium);
        assert_eq!(ActivityBand::classify(69.9), ActivityBand::Medium);
        assert_eq!(ActivityBand::classify(70.0), ActivityBand::High);
        assert_eq!(ActivityBand::classify(100.0), ActivityBand::High);
    }

    #[test]
    fn control_parameters_must_be_ordered() {
        assert!(ControlParameters::new(4.0, 20.0, 160.0).is_ordered());
        assert!(!ControlParameters::new(20.0, 20.0, 160.0).is_ordered());
        assert!(!ControlParameters::new(4.0, 170.0, 160.0).is_ordered());
    }

    #[test]
    fn bounds_are_validated() {
        assert!(WaterManagement::new(250_000.0, 150_000.0).is_err());
        assert!(WaterManagement::new(0.0, 150_000.0).is_err());
        assert!(manager().with_time_base(0).is_err());
    }

    #[test]
    fn clamp_moves_excess_to_outflow_before_commit() {
        let wm = manager();
        let (flow, v) = wm.clamp(249_990.0, Flow { inflow: 50.0, outflow: 0.0 }, 5.0);
        assert_relative_eq!(v, MAX, epsilon = 1e-9);
        assert_relative_eq!(flow.outflow, 35.0, epsilon = 1e-9);
        assert_eq!(flow.inflow, 50.0);

        let (flow, v) = wm.clamp(150_010.0, Flow { inflow: 0.0, outflow: 40.0 }, 5.0);
        assert_relative_eq!(v, MIN, epsilon = 1e-9);
        assert_relative_eq!(flow.inflow, 35.0, epsilon = 1e-9);
    }

    #[test]
    fn clamp_holds_for_arbitrary_proposals() {
        let grid = day_grid();
        let mut rng = SimRng::new(7);
        let flows: Vec<Flow> = (0..grid.len())
            .map(|_| Flow {
                inflow:  rng.uniform() * 20_000.0,
                outflow: rng.uniform() * 25_000.0 - 5_000.0,
            })
            .collect();
        let evaporation: Vec<f64> = (0..grid.len()).map(|_| rng.uniform() * 50.0).collect();

        let out = manager().run(&Scripted(flows), &grid, &[], &evaporation, 200_000.0).unwrap();
        assert_eq!(out.len(), grid.len());
        assert_within_bounds(&out.volume);
    }

    #[test]
    fn clamp_holds_for_every_policy() {
        let grid = day_grid();
        let occupants: Vec<Occupant> = (0..400)
            .map(|i| swimmer(i, ts(1, 6, 0) + chrono::Duration::seconds(i as i64 * 97), 5400, 85.0))
            .collect();
        let evaporation = vec![2.5; grid.len()];

        let policies: Vec<Box<dyn FlowPolicy>> = vec![
            Box::new(FixedRate { inflow_per_base: 50_000.0, outflow_per_base: 0.0 }),
            Box::new(FixedRate { inflow_per_base: 0.0, outflow_per_base: 50_000.0 }),
            Box::new(OccupancyThreshold::new(ControlParameters::new(50.0, 500.0, 5_000.0))),
            Box::new(ScheduledInjection { liters_per_bather: 2_000.0, max_rate_lps: 100.0, ..Default::default() }),
        ];
        for policy in &policies {
            for start in [MIN, 200_000.0, MAX, 100_000.0, 300_000.0] {
                let out = manager().run(policy.as_ref(), &grid, &occupants, &evaporation, start).unwrap();
                assert_within_bounds(&out.volume);
            }
        }
    }

    #[test]
    fn fixed_rate_scales_to_step_and_offsets_evaporation() {
        let grid = day_grid();
        let evaporation = vec![2.0; grid.len()];
        let out = manager().run(&FixedRate::default(), &grid, &[], &evaporation, 200_000.0).unwrap();
        // 50 L per 30 min → 10 L per 6 min step.
        assert_relative_eq!(out.inflow[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(out.outflow[0], 8.0, epsilon = 1e-12);
        assert_relative_eq!(out.volume[grid.len() - 1], 200_000.0, epsilon = 1e-6);
    }

    #[test]
    fn occupancy_threshold_injects_medium_band_rate_while_present() {
        let grid = day_grid();
        let control = ControlParameters::new(5.0, 20.0, 60.0);
        let o = swimmer(0, ts(1, 0, 0), 3600, 50.0);
        let evaporation = vec![2.0; grid.len()];
        let out = manager()
            .run(&OccupancyThreshold::new(control), &grid, &[o], &evaporation, 200_000.0)
            .unwrap();

        for i in 0..grid.len() {
            let expected = if i < 10 { 20.0 * 360.0 / 1800.0 } else { 0.0 };
            assert_relative_eq!(out.inflow[i], expected, epsilon = 1e-12);
            assert_relative_eq!(out.outflow[i], expected - 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn occupancy_threshold_accumulates_bands_per_step() {
        let grid = day_grid();
        let control = ControlParameters::new(5.0, 20.0, 60.0);
        let occupants = [
            swimmer(0, ts(1, 9, 0), 720, 10.0),
            swimmer(1, ts(1, 9, 0), 720, 55.0),
            swimmer(2, ts(1, 9, 0), 720, 95.0),
        ];
        let ctx = FlowContext {
            grid:           &grid,
            occupants:      &occupants,
            evaporation:    &vec![0.0; grid.len()],
            time_base_secs: 1800,
        };
        let flows = OccupancyThreshold::new(control).proposed_flows(&ctx).unwrap();
        let i = 90;
        assert_relative_eq!(flows[i].inflow, (5.0 + 20.0 + 60.0) * 0.2, epsilon = 1e-12);
        assert_relative_eq!(flows[i + 1].inflow, (5.0 + 20.0 + 60.0) * 0.2, epsilon = 1e-12);
        assert_eq!(flows[i + 2].inflow, 0.0);
    }

    #[test]
    fn occupancy_threshold_stops_at_grid_end() {
        let grid = day_grid();
        let o = swimmer(0, ts(1, 23, 54), 3600, 50.0);
        let ctx = FlowContext { grid: &grid, occupants: &[o], evaporation: &vec![0.0; 240], time_base_secs: 1800 };
        let flows = OccupancyThreshold::new(ControlParameters::default()).proposed_flows(&ctx).unwrap();
        assert_eq!(flows.len(), 240);
        assert!(flows[239].inflow > 0.0);
    }

    #[test]
    fn scheduled_event_hours_follow_linspace() {
        assert_eq!(ScheduledInjection::default().event_hours().unwrap(), vec![11, 17, 23]);
        let four = ScheduledInjection { daily_events: 4, ..Default::default() };
        assert_eq!(four.event_hours().unwrap(), vec![11, 15, 19, 23]);
        let none = ScheduledInjection { daily_events: 0, ..Default::default() };
        assert!(matches!(none.event_hours(), Err(ModelError::InvalidParameters(_))));
    }

    #[test]
    fn scheduled_injection_charges_next_event_after_departure() {
        let grid = TimeGrid::new(ts(1, 0, 0), ts(3, 0, 0), 360).unwrap();
        let occupants: Vec<Occupant> = (0..3).map(|i| swimmer(i, ts(1, 11, 30), 3600, 50.0)).collect();
        let ctx = FlowContext {
            grid:           &grid,
            occupants:      &occupants,
            evaporation:    &vec![0.0; grid.len()],
            time_base_secs: 1800,
        };
        let flows = ScheduledInjection::default().proposed_flows(&ctx).unwrap();

        // Leaving at 12:30 → 17:00 event, applied on the 17:06 step.
        let applied = 17 * 10 + 1;
        assert_relative_eq!(flows[applied].inflow, 45.0, epsilon = 1e-12);
        assert_relative_eq!(flows[applied].outflow, 45.0, epsilon = 1e-12);
        let total: f64 = flows.iter().map(|f| f.inflow).sum();
        assert_relative_eq!(total, 45.0, epsilon = 1e-12);
    }

    #[test]
    fn scheduled_injection_rolls_late_departures_to_next_day() {
        let grid = TimeGrid::new(ts(1, 0, 0), ts(3, 0, 0), 360).unwrap();
        let occupants = [swimmer(0, ts(1, 23, 10), 3600, 50.0)];
        let ctx = FlowContext {
            grid:           &grid,
            occupants:      &occupants,
            evaporation:    &vec![0.0; grid.len()],
            time_base_secs: 1800,
        };
        let flows = ScheduledInjection::default().proposed_flows(&ctx).unwrap();
        let applied = 240 + 11 * 10 + 1;
        assert_relative_eq!(flows[applied].inflow, 15.0, epsilon = 1e-12);
        assert_eq!(flows[..applied].iter().map(|f| f.inflow).sum::<f64>(), 0.0);
    }

    #[test]
    fn scheduled_injection_dispenses_at_capped_rate() {
        let grid = day_grid();
        let occupants: Vec<Occupant> = (0..3).map(|i| swimmer(i, ts(1, 11, 30), 3600, 50.0)).collect();
        let policy = ScheduledInjection { max_rate_lps: 0.05, ..Default::default() };
        let ctx = FlowContext {
            grid:           &grid,
            occupants:      &occupants,
            evaporation:    &vec![0.0; grid.len()],
            time_base_secs: 1800,
        };
        let flows = policy.proposed_flows(&ctx).unwrap();
        let applied = 17 * 10 + 1;
        assert_relative_eq!(flows[applied].inflow, 18.0, epsilon = 1e-12);
        assert_relative_eq!(flows[applied + 1].inflow, 18.0, epsilon = 1e-12);
        assert_relative_eq!(flows[applied + 2].inflow, 9.0, epsilon = 1e-12);
        assert_eq!(flows[applied + 3].inflow, 0.0);
    }

    #[test]
    fn evaporation_length_is_checked() {
        let grid = day_grid();
        let err = manager().run(&FixedRate::default(), &grid, &[], &[1.0; 5], 200_000.0).unwrap_err();
        assert!(matches!(err, ModelError::LengthMismatch { what: "evaporation", .. }));
    }

    #[test]
    fn short_proposals_are_rejected() {
        let grid = day_grid();
        let err = manager()
            .run(&Scripted(vec![Flow::default(); 3]), &grid, &[], &vec![0.0; grid.len()], 200_000.0)
            .unwrap_err();
        assert!(matches!(err, ModelError::LengthMismatch { what: "proposed flows", .. }));
    }
}

// ── Chemistry ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod chemistry {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{Byproduct, InitialChemistry, Kinetics, ModelError, PoolState, StepForcing};

    fn clean_state(volume: f64) -> PoolState {
        PoolState::initial(&InitialChemistry::default(), &chem_params(), volume)
    }

    #[test]
    fn initial_state_takes_toc_from_body_fluid() {
        let init = InitialChemistry { bf: 0.002, tcm: 0.035, ..Default::default() };
        let s = PoolState::initial(&init, &chem_params(), 200_000.0);
        assert_relative_eq!(s.toc, 0.8, epsilon = 1e-12);
        assert_eq!(s.tcm(), 0.035);
        assert_eq!(s.concentration(Byproduct::Dcaa), 0.0);
        assert_eq!(s.concentration(Byproduct::Tcaa), 0.0);
        assert_eq!(s.concentration(Byproduct::Dcan), 0.0);
        assert_eq!((s.ph, s.orp, s.fac), (7.8, 700.0, 1.0));
    }

    #[test]
    fn no_spontaneous_generation() {
        let k = Kinetics::new(&chem_params(), 30.0, 360).unwrap();
        let initial = clean_state(200_000.0);
        let forcings = std::iter::repeat_n(StepForcing::default(), 240);
        let records = k.run(initial, forcings).unwrap();

        assert_eq!(records.len(), 240);
        for r in &records {
            assert_eq!(r.toc, 0.0);
            assert_eq!((r.tcm, r.dcaa, r.tcaa, r.dcan), (0.0, 0.0, 0.0, 0.0));
            assert_eq!(r.volume, 200_000.0);
            assert_eq!(r.new_toc, 0.0);
        }
    }

    #[test]
    fn rate_coefficient_is_arrhenius_per_step() {
        let params = chem_params();
        let k = Kinetics::new(&params, 30.0, 360).unwrap();
        let expected = 612.0 * (-22_300.0 / (8.3145 * 303.15_f64)).exp() * 0.1;
        assert_relative_eq!(k.coefficient(Byproduct::Tcm), expected, max_relative = 1e-12);
    }

    #[test]
    fn formation_follows_each_byproducts_own_equilibrium() {
        let params = chem_params();
        let k = Kinetics::new(&params, 30.0, 360).unwrap();
        let mut state = clean_state(200_000.0);
        state.toc = 2.0;

        let (next, record) = k.step(0, &state, &StepForcing::default()).unwrap();
        let t_abs = 303.15;
        let mut consumed = 0.0;
        for b in Byproduct::ALL {
            let p = params.byproduct(b);
            let formed = 200_000.0 * k.coefficient(b) * 2.0 * (p.m * t_abs + p.n);
            assert_relative_eq!(next.concentration(b), formed / 200_000.0, max_relative = 1e-12);
            consumed += b.carbon_atoms() * formed * 0.001 / p.molar_mass * 12.011;
        }
        assert_relative_eq!(next.toc, (200_000.0 * 2.0 - consumed) / 200_000.0, max_relative = 1e-12);
        assert_eq!(record.tcm, next.tcm());
        assert_eq!(record.dcan, next.concentration(Byproduct::Dcan));
    }

    #[test]
    fn volatile_loss_amplifies_evaporation() {
        let mut params = chem_params();
        for p in &mut params.byproducts {
            p.pre_exponential = 0.0;
        }
        let k = Kinetics::new(&params, 30.0, 360).unwrap();
        let mut state = clean_state(1_000.0);
        state.byproducts[Byproduct::Tcm.index()] = 10.0;
        state.toc = 5.0;

        let forcing = StepForcing { evaporation: 10.0, ..Default::default() };
        let (next, _) = k.step(0, &state, &forcing).unwrap();
        assert_relative_eq!(next.tcm(), (1_000.0 - 11.6 / 0.3 * 10.0) * 10.0 / 990.0, max_relative = 1e-12);
        assert_relative_eq!(next.toc, 1_000.0 * 5.0 / 990.0, max_relative = 1e-12);
        assert_relative_eq!(next.volume, 990.0, epsilon = 1e-12);
    }

    #[test]
    fn body_fluid_adds_toc_and_flows_mix() {
        let k = Kinetics::new(&chem_params(), 30.0, 360).unwrap();
        let state = clean_state(200_000.0);
        let forcing = StepForcing { body_fluid: 0.01, evaporation: 2.0, inflow: 30.0, outflow: 28.0 };
        let (next, record) = k.step(0, &state, &forcing).unwrap();

        assert_relative_eq!(record.new_toc, 4.0, epsilon = 1e-12);
        assert_relative_eq!(next.toc, 4.0 / 200_000.0, max_relative = 1e-12);
        assert_relative_eq!(next.volume, 200_000.0, epsilon = 1e-9);
        assert_eq!((record.inflow, record.outflow, record.evaporation), (30.0, 28.0, 2.0));
    }

    #[test]
    fn non_positive_mixing_volume_fails_fast() {
        let k = Kinetics::new(&chem_params(), 30.0, 360).unwrap();
        let ok = StepForcing { outflow: 400.0, ..Default::default() };
        let drain = StepForcing { outflow: 700.0, ..Default::default() };
        let err = k.run(clean_state(1_000.0), [ok, drain]).unwrap_err();
        assert!(matches!(err, ModelError::NonPositiveVolume { step: 1, volume } if volume == -100.0));
    }

    #[test]
    fn invalid_constants_are_rejected() {
        let mut params = chem_params();
        params.gas_constant = 0.0;
        assert!(Kinetics::new(&params, 30.0, 360).is_err());

        let mut params = chem_params();
        params.byproducts[Byproduct::Tcaa.index()].molar_mass = 0.0;
        assert!(matches!(Kinetics::new(&params, 30.0, 360), Err(ModelError::InvalidParameters(m)) if m.contains("TCAA")));
    }

    #[test]
    fn record_serializes_with_short_field_names() {
        let k = Kinetics::new(&chem_params(), 30.0, 360).unwrap();
        let (_, record) = k.step(0, &clean_state(1_000.0), &StepForcing::default()).unwrap();
        let v = serde_json::to_value(record).unwrap();
        for key in ["FAC", "TCM", "DCAA", "TCAA", "DCAN", "CC", "pH", "ORP", "toc", "VoW", "newTOC", "Evap", "inW", "outW"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use serde_json::{json, Value};

    use super::*;
    use crate::{load_chemical_params_reader, load_evaporation_table_reader, Byproduct, ModelError};

    fn chem_json() -> Value {
        let entry = |mass: f64| json!({ "EA": 22300.0, "A": 612.0, "m": 0.002, "n": -0.4, "MolarMass": mass });
        json!({
            "R": 8.3145,
            "bf_2_toc_ratio_mg": 400.0,
            "TCM": entry(119.38),
            "DCAA": entry(128.94),
            "TCAA": entry(163.39),
            "DCAN": entry(109.94)
        })
    }

    fn load(v: &Value) -> Result<ChemicalParameters, ModelError> {
        load_chemical_params_reader(v.to_string().as_bytes())
    }

    #[test]
    fn complete_file_loads() {
        let p = load(&chem_json()).unwrap();
        assert_eq!(p.gas_constant, 8.3145);
        assert_eq!(p.bf_to_toc_ratio_mg, 400.0);
        assert_eq!(p.byproduct(Byproduct::Dcan).molar_mass, 109.94);
        assert_eq!(p.byproduct(Byproduct::Tcm).activation_energy, 22300.0);
    }

    #[test]
    fn missing_nested_key_is_named() {
        let mut v = chem_json();
        v["DCAN"].as_object_mut().unwrap().remove("MolarMass");
        match load(&v) {
            Err(ModelError::Config(msg)) => assert!(msg.contains("DCAN.MolarMass"), "{msg}"),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn missing_section_and_bad_types_are_config_errors() {
        let mut v = chem_json();
        v.as_object_mut().unwrap().remove("TCAA");
        assert!(matches!(load(&v), Err(ModelError::Config(m)) if m.contains("TCAA")));

        let mut v = chem_json();
        v["R"] = json!("eight");
        assert!(matches!(load(&v), Err(ModelError::Config(m)) if m.contains("R is not a number")));
    }

    #[test]
    fn evaporation_table_loads_rows() {
        let text = r#"[{"water_temp": 26, "air_temp": 27, "relative_humidity": 0.6, "E0": 0.09, "delta_roe": 0.01}]"#;
        let table = load_evaporation_table_reader(text.as_bytes()).unwrap();
        let row = table.lookup(26.0, 27.0, 0.6).unwrap();
        assert_eq!(row.e0, 0.09);
        assert_eq!(row.delta_rho, 0.01);

        assert!(matches!(load_evaporation_table_reader("[]".as_bytes()), Err(ModelError::Config(_))));
        assert!(matches!(load_evaporation_table_reader("{".as_bytes()), Err(ModelError::Json(_))));
    }
}
