//! JSON loaders for the chemical parameter file and evaporation tables.
//!
//! # Chemical parameter file
//!
//! ```json
//! {
//!   "R": 8.3145,
//!   "bf_2_toc_ratio_mg": 400.0,
//!   "TCM":  { "EA": 22300, "A": 612.0, "m": 0.01, "n": -2.5, "MolarMass": 119.38 },
//!   "DCAA": { ... }, "TCAA": { ... }, "DCAN": { ... }
//! }
//! ```
//!
//! Every key is required; a missing or non-numeric one is a
//! [`ModelError::Config`] naming it.
//!
//! # Evaporation table
//!
//! An array of rows:
//!
//! ```json
//! [ { "water_temp": 28, "air_temp": 28, "relative_humidity": 0.5, "E0": 0.136, "delta_roe": 0.0219 } ]
//! ```

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::{
    Byproduct, ByproductParameters, ChemicalParameters, EvaporationEntry, EvaporationTable,
    ModelError, ModelResult,
};

// ── Chemical parameters ───────────────────────────────────────────────────────

pub fn load_chemical_params(path: &Path) -> ModelResult<ChemicalParameters> {
    let file = std::fs::File::open(path)?;
    load_chemical_params_reader(std::io::BufReader::new(file))
}

pub fn load_chemical_params_reader<R: Read>(reader: R) -> ModelResult<ChemicalParameters> {
    let root: Value = serde_json::from_reader(reader)?;

    let mut byproducts = [ByproductParameters {
        activation_energy: 0.0,
        pre_exponential:   0.0,
        m:                 0.0,
        n:                 0.0,
        molar_mass:        0.0,
    }; 4];
    for b in Byproduct::ALL {
        let section = root
            .get(b.key())
            .ok_or_else(|| ModelError::Config(format!("missing key {}", b.key())))?;
        byproducts[b.index()] = ByproductParameters {
            activation_energy: number(section, b.key(), "EA")?,
            pre_exponential:   number(section, b.key(), "A")?,
            m:                 number(section, b.key(), "m")?,
            n:                 number(section, b.key(), "n")?,
            molar_mass:        number(section, b.key(), "MolarMass")?,
        };
    }

    let params = ChemicalParameters {
        gas_constant:       number(&root, "", "R")?,
        bf_to_toc_ratio_mg: number(&root, "", "bf_2_toc_ratio_mg")?,
        byproducts,
    };
    log::debug!(
        "loaded chemical parameters (R = {}, bf→toc = {} mg/L)",
        params.gas_constant,
        params.bf_to_toc_ratio_mg
    );
    Ok(params)
}

fn number(object: &Value, section: &str, key: &str) -> ModelResult<f64> {
    let path = if section.is_empty() { key.to_owned() } else { format!("{section}.{key}") };
    match object.get(key) {
        None => Err(ModelError::Config(format!("missing key {path}"))),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| ModelError::Config(format!("{path} is not a number: {v}"))),
    }
}

// ── Evaporation table ─────────────────────────────────────────────────────────

pub fn load_evaporation_table(path: &Path) -> ModelResult<EvaporationTable> {
    let file = std::fs::File::open(path)?;
    load_evaporation_table_reader(std::io::BufReader::new(file))
}

pub fn load_evaporation_table_reader<R: Read>(reader: R) -> ModelResult<EvaporationTable> {
    let rows: Vec<EvaporationEntry> = serde_json::from_reader(reader)?;
    if rows.is_empty() {
        return Err(ModelError::Config("evaporation table has no rows".into()));
    }
    Ok(EvaporationTable::new(rows))
}
