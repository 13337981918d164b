//! Chemical kinetics: total organic carbon and disinfection by-products.
//!
//! # Step function
//!
//! For each by-product `x` with rate coefficient `c_x = k_x * step / 3600`
//! and equilibrium slope `q_x = m_x * T_abs + n_x`:
//!
//! ```text
//! formed_x   = V * c_x * (toc * q_x - x)                    (µg)
//! consumed   = Σ carbon_x * formed_x * 0.001 / molar_x * 12.011   (mg C)
//! new_toc    = body_fluid * bf_to_toc
//! D          = V - out - E + in
//! toc'       = ((V - out) * toc + new_toc - consumed) / D
//! x'         = ((V - out - 38.67 * E) * x + formed_x) / D
//! V'         = V - out + in - E
//! ```
//!
//! `k_x = A_x * exp(-Ea_x / (R * T_abs))` is computed once per run; the water
//! temperature is constant.  `D <= 0` is reported as
//! [`ModelError::NonPositiveVolume`] and ends the run.
//!
//! The by-product loss term uses the volatility of chloroform relative to
//! water (11.6 / 0.3) for every by-product.

use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult};

const CELSIUS_TO_KELVIN: f64 = 273.15;
const CARBON_MOLAR_MASS: f64 = 12.011;
const UG_TO_MG: f64 = 0.001;
/// Evaporation rate of chloroform over that of water (butyl acetate = 1).
const VOLATILITY_RATIO: f64 = 11.6 / 0.3;
/// Share of TOC available to by-product formation.
const TOC_AVAILABLE: f64 = 1.0;

// ── By-products ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Byproduct {
    /// Trichloromethane (chloroform), CHCl3.
    Tcm,
    /// Dichloroacetic acid, C2H2Cl2O2.
    Dcaa,
    /// Trichloroacetic acid, C2HCl3O2.
    Tcaa,
    /// Dichloroacetonitrile, C2HCl2N.
    Dcan,
}

impl Byproduct {
    pub const ALL: [Byproduct; 4] = [Self::Tcm, Self::Dcaa, Self::Tcaa, Self::Dcan];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Key in the chemical parameter file.
    pub fn key(self) -> &'static str {
        match self {
            Self::Tcm => "TCM",
            Self::Dcaa => "DCAA",
            Self::Tcaa => "TCAA",
            Self::Dcan => "DCAN",
        }
    }

    /// Carbon atoms per molecule.
    pub fn carbon_atoms(self) -> f64 {
        match self {
            Self::Tcm => 1.0,
            Self::Dcaa | Self::Tcaa | Self::Dcan => 2.0,
        }
    }
}

// ── Parameters ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ByproductParameters {
    /// `Ea`, J/mol.
    pub activation_energy: f64,
    /// `A`, per hour.
    pub pre_exponential:   f64,
    pub m:                 f64,
    pub n:                 f64,
    /// g/mol.
    pub molar_mass:        f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChemicalParameters {
    /// `R`, J/(mol K).
    pub gas_constant:       f64,
    /// mg of TOC per litre of body fluid.
    pub bf_to_toc_ratio_mg: f64,
    /// Indexed by [`Byproduct::index`].
    pub byproducts:         [ByproductParameters; 4],
}

impl ChemicalParameters {
    #[inline]
    pub fn byproduct(&self, b: Byproduct) -> &ByproductParameters {
        &self.byproducts[b.index()]
    }
}

/// Measured chemistry at the start of a run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitialChemistry {
    #[serde(rename = "FAC")]
    pub fac: f64,
    #[serde(rename = "TCM")]
    pub tcm: f64,
    #[serde(rename = "CC")]
    pub cc:  f64,
    #[serde(rename = "pH")]
    pub ph:  f64,
    #[serde(rename = "ORP")]
    pub orp: f64,
    /// Body fluid already in the water, litres per litre.
    #[serde(rename = "BF")]
    pub bf:  f64,
}

impl Default for InitialChemistry {
    fn default() -> Self {
        Self { fac: 1.0, tcm: 0.0, cc: 0.0, ph: 7.8, orp: 700.0, bf: 0.0 }
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Pool water state between steps.  Concentrations are per litre; by-products
/// in µg/L, TOC in mg/L.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PoolState {
    pub volume:      f64,
    pub toc:         f64,
    /// Indexed by [`Byproduct::index`].
    pub byproducts:  [f64; 4],
    pub fac:         f64,
    pub cc:          f64,
    pub ph:          f64,
    pub orp:         f64,
}

impl PoolState {
    /// State at the start of a run: measured values, no acids or nitriles,
    /// and TOC from the body fluid already dissolved.
    pub fn initial(init: &InitialChemistry, params: &ChemicalParameters, volume: f64) -> Self {
        let mut byproducts = [0.0; 4];
        byproducts[Byproduct::Tcm.index()] = init.tcm;
        Self {
            volume,
            toc: init.bf * params.bf_to_toc_ratio_mg,
            byproducts,
            fac: init.fac,
            cc: init.cc,
            ph: init.ph,
            orp: init.orp,
        }
    }

    #[inline]
    pub fn concentration(&self, b: Byproduct) -> f64 {
        self.byproducts[b.index()]
    }

    #[inline]
    pub fn tcm(&self) -> f64 {
        self.concentration(Byproduct::Tcm)
    }
}

/// Per-step inputs to the kinetics, all in litres.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepForcing {
    pub body_fluid:  f64,
    pub evaporation: f64,
    pub inflow:      f64,
    pub outflow:     f64,
}

/// The state after one step together with what drove it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(rename = "FAC")]
    pub fac:         f64,
    #[serde(rename = "TCM")]
    pub tcm:         f64,
    #[serde(rename = "DCAA")]
    pub dcaa:        f64,
    #[serde(rename = "TCAA")]
    pub tcaa:        f64,
    #[serde(rename = "DCAN")]
    pub dcan:        f64,
    #[serde(rename = "CC")]
    pub cc:          f64,
    #[serde(rename = "pH")]
    pub ph:          f64,
    #[serde(rename = "ORP")]
    pub orp:         f64,
    pub toc:         f64,
    #[serde(rename = "VoW")]
    pub volume:      f64,
    /// TOC added by body fluid this step, mg.
    #[serde(rename = "newTOC")]
    pub new_toc:     f64,
    #[serde(rename = "Evap")]
    pub evaporation: f64,
    #[serde(rename = "inW")]
    pub inflow:      f64,
    #[serde(rename = "outW")]
    pub outflow:     f64,
}

impl StepRecord {
    fn new(state: &PoolState, forcing: &StepForcing, new_toc: f64) -> Self {
        Self {
            fac:         state.fac,
            tcm:         state.concentration(Byproduct::Tcm),
            dcaa:        state.concentration(Byproduct::Dcaa),
            tcaa:        state.concentration(Byproduct::Tcaa),
            dcan:        state.concentration(Byproduct::Dcan),
            cc:          state.cc,
            ph:          state.ph,
            orp:         state.orp,
            toc:         state.toc,
            volume:      state.volume,
            new_toc,
            evaporation: forcing.evaporation,
            inflow:      forcing.inflow,
            outflow:     forcing.outflow,
        }
    }
}

// ── Kinetics ──────────────────────────────────────────────────────────────────

/// Rate coefficients for one water temperature and step length.
#[derive(Clone, Debug, PartialEq)]
pub struct Kinetics {
    /// `k * step / 3600` per by-product.
    coefficient:        [f64; 4],
    /// `m * T_abs + n` per by-product.
    equilibrium:        [f64; 4],
    /// `carbon * 0.001 / molar_mass * 12.011` per by-product.
    carbon_yield:       [f64; 4],
    bf_to_toc_ratio_mg: f64,
}

impl Kinetics {
    pub fn new(params: &ChemicalParameters, water_temp_c: f64, step_secs: u32) -> ModelResult<Self> {
        let t_abs = water_temp_c + CELSIUS_TO_KELVIN;
        if !(params.gas_constant > 0.0) || !(t_abs > 0.0) {
            return Err(ModelError::InvalidParameters(format!(
                "gas constant {} and absolute temperature {t_abs} K must be positive",
                params.gas_constant
            )));
        }
        let hours = step_secs as f64 / 3600.0;

        let mut coefficient = [0.0; 4];
        let mut equilibrium = [0.0; 4];
        let mut carbon_yield = [0.0; 4];
        for b in Byproduct::ALL {
            let p = params.byproduct(b);
            if !(p.molar_mass > 0.0) {
                return Err(ModelError::InvalidParameters(format!(
                    "{} molar mass must be positive, got {}",
                    b.key(),
                    p.molar_mass
                )));
            }
            let k = p.pre_exponential * (-p.activation_energy / (params.gas_constant * t_abs)).exp();
            let i = b.index();
            coefficient[i] = k * hours;
            equilibrium[i] = p.m * t_abs + p.n;
            carbon_yield[i] = b.carbon_atoms() * UG_TO_MG / p.molar_mass * CARBON_MOLAR_MASS;
        }

        Ok(Self {
            coefficient,
            equilibrium,
            carbon_yield,
            bf_to_toc_ratio_mg: params.bf_to_toc_ratio_mg,
        })
    }

    /// Per-step rate coefficient `k * step / 3600`.
    pub fn coefficient(&self, b: Byproduct) -> f64 {
        self.coefficient[b.index()]
    }

    /// Advance `state` by one step.  `index` only labels errors.
    pub fn step(
        &self,
        index:   usize,
        state:   &PoolState,
        forcing: &StepForcing,
    ) -> ModelResult<(PoolState, StepRecord)> {
        let StepForcing { body_fluid, evaporation: e, inflow, outflow } = *forcing;
        let v = state.volume;

        let denominator = v - outflow - e + inflow;
        if !(denominator > 0.0) {
            return Err(ModelError::NonPositiveVolume { step: index, volume: denominator });
        }

        let mut formed = [0.0; 4];
        let mut consumed = 0.0;
        for i in 0..4 {
            formed[i] = v
                * self.coefficient[i]
                * (state.toc * TOC_AVAILABLE * self.equilibrium[i] - state.byproducts[i]);
            consumed += self.carbon_yield[i] * formed[i];
        }

        let new_toc = body_fluid * self.bf_to_toc_ratio_mg;
        let retained = v - outflow;
        let retained_volatile = retained - VOLATILITY_RATIO * e;

        let mut next = *state;
        next.toc = (retained * state.toc + new_toc - consumed) / denominator;
        for i in 0..4 {
            next.byproducts[i] = (retained_volatile * state.byproducts[i] + formed[i]) / denominator;
        }
        next.volume = v - outflow + inflow - e;

        let record = StepRecord::new(&next, forcing, new_toc);
        Ok((next, record))
    }

    /// Step through `forcings` in order from `initial`.
    pub fn run<I>(&self, initial: PoolState, forcings: I) -> ModelResult<Vec<StepRecord>>
    where
        I: IntoIterator<Item = StepForcing>,
    {
        let forcings = forcings.into_iter();
        let mut records = Vec::with_capacity(forcings.size_hint().0);
        let mut state = initial;
        for (i, f) in forcings.enumerate() {
            let (next, record) = self.step(i, &state, &f)?;
            state = next;
            records.push(record);
        }
        Ok(records)
    }
}
