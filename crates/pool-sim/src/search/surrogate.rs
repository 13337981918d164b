//! Nearest-neighbour cost surrogate over stored [`CostRecord`]s.
//!
//! Records are indexed in an R-tree keyed by `[γL, γM, γH]`.  A query
//! averages every record within `radius` (default 3), weighted by
//! `exp(-2 d²)`.  Health cost is divided by steps per hour before
//! averaging, so estimates are in bather-hours like the cost itself.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use pool_models::ControlParameters;

use super::PlateauDetector;
use crate::{CostRecord, ParamRange, SimError, SimResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct SamplePoint {
    point:       [f64; 3], // [γL, γM, γH]
    water_use:   f64,
    /// Already divided by steps per hour.
    health_cost: f64,
}

impl RTreeObject for SamplePoint {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SamplePoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        self.point.iter().zip(point).map(|(a, b)| (a - b) * (a - b)).sum()
    }
}

// ── Surrogate ─────────────────────────────────────────────────────────────────

/// Weighted-average estimate at one query point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurrogateEstimate {
    /// m³
    pub water_use:   f64,
    /// Bather-hours above threshold.
    pub health_cost: f64,
    pub cost:        f64,
}

pub struct Surrogate {
    tree:   RTree<SamplePoint>,
    lambda: f64,
    radius: f64,
}

impl Surrogate {
    pub const DEFAULT_RADIUS: f64 = 3.0;

    /// Index `records`, which were computed on a grid of `step_secs`.
    pub fn new(records: &[CostRecord], lambda: f64, step_secs: u32) -> Self {
        let time_adj = 3600.0 / step_secs as f64;
        let points = records
            .iter()
            .map(|r| SamplePoint {
                point:       [r.gamma_l, r.gamma_m, r.gamma_h],
                water_use:   r.water_use,
                health_cost: r.health_cost / time_adj,
            })
            .collect();
        Self { tree: RTree::bulk_load(points), lambda, radius: Self::DEFAULT_RADIUS }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Fails with [`SimError::NoDataInRadius`] when no record lies within
    /// the radius of `control`.
    pub fn estimate(&self, control: ControlParameters) -> SimResult<SurrogateEstimate> {
        let query = control.as_array();
        let (mut water, mut health, mut weights) = (0.0, 0.0, 0.0);
        for sample in self.tree.locate_within_distance(query, self.radius * self.radius) {
            let w = (-2.0 * sample.distance_2(&query)).exp();
            water += w * sample.water_use;
            health += w * sample.health_cost;
            weights += w;
        }
        if !(weights > 0.0) {
            return Err(SimError::NoDataInRadius { query: control, radius: self.radius });
        }
        let (water_use, health_cost) = (water / weights, health / weights);
        Ok(SurrogateEstimate { water_use, health_cost, cost: water_use + self.lambda * health_cost })
    }
}

// ── Scan ──────────────────────────────────────────────────────────────────────

/// Dense scan of the surrogate over ordered triples.
///
/// Points without data are skipped and do not count towards the plateau.
#[derive(Clone, Debug, PartialEq)]
pub struct SurrogateScan {
    pub gamma_l:        ParamRange,
    pub gamma_m:        ParamRange,
    pub gamma_h:        ParamRange,
    pub plateau_window: usize,
}

impl Default for SurrogateScan {
    fn default() -> Self {
        Self {
            gamma_l:        ParamRange::new(2.0, 22.0, 1.0),
            gamma_m:        ParamRange::new(20.0, 82.0, 1.0),
            gamma_h:        ParamRange::new(100.0, 182.0, 1.0),
            plateau_window: PlateauDetector::DEFAULT_WINDOW,
        }
    }
}

impl SurrogateScan {
    /// Lowest estimated cost and where it occurs.  `None` if no scanned
    /// point has data.
    pub fn scan(&self, surrogate: &Surrogate) -> Option<(ControlParameters, SurrogateEstimate)> {
        let (ls, ms, hs) = (self.gamma_l.values(), self.gamma_m.values(), self.gamma_h.values());
        let mut best: Option<(ControlParameters, SurrogateEstimate)> = None;

        for &l in &ls {
            log::debug!("surrogate scan: γL = {l}");
            for &m in ms.iter().filter(|&&m| m > l) {
                let mut plateau = PlateauDetector::new(self.plateau_window);
                for &h in hs.iter().filter(|&&h| h > m) {
                    let control = ControlParameters::new(l, m, h);
                    let Ok(estimate) = surrogate.estimate(control) else {
                        continue;
                    };
                    if best.is_none_or(|(_, b)| estimate.cost < b.cost) {
                        best = Some((control, estimate));
                    }
                    if plateau.push(estimate.cost) {
                        break;
                    }
                }
            }
        }
        if let Some((control, estimate)) = &best {
            log::info!("surrogate minimum {:.4} at {control}", estimate.cost);
        }
        best
    }
}
