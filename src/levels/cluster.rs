// =============================================================================
// Level Clusterer — support / resistance from raw extrema
// =============================================================================
//
// Peaks build resistance candidates and troughs build support candidates, each
// side independently and in discovery order:
//
//   1. For each extremum, look for an open cluster whose centroid is within
//      `tolerance` of its price.
//        - FirstMatch (default): the earliest-formed cluster that qualifies.
//        - Nearest: the qualifying cluster with the closest centroid.
//   2. On a match, fold the price into the running average, bump the touch
//      count and keep the max index as `last_tested`. Otherwise open a new
//      single-touch cluster.
//   3. Drop clusters with fewer than `min_touch_count` touches and clusters on
//      the wrong side of the current price (resistance must sit strictly
//      above, support strictly below).
//   4. Sort by distance to the current price and keep the first `max_levels`.
//
// Reported strength is capped at 10; matching and filtering use the true
// touch count.

use serde::{Deserialize, Serialize};

use super::extrema::{Extrema, ExtremaPoint};
use crate::types::LevelKind;

/// Reported strength never exceeds this value.
pub const MAX_STRENGTH: u32 = 10;

/// How an extremum picks among several clusters within tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClusterStrategy {
    FirstMatch,
    Nearest,
}

impl Default for ClusterStrategy {
    fn default() -> Self {
        Self::FirstMatch
    }
}

/// A clustered support or resistance price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Running average of every extremum assigned to the level.
    pub price: f64,
    /// Touch count, capped at [`MAX_STRENGTH`].
    pub strength: u32,
    pub kind: LevelKind,
    /// Highest series index among the member extrema.
    pub last_tested: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelParams {
    /// Absolute price distance for an extremum to join a cluster.
    pub tolerance: f64,
    pub min_touch_count: usize,
    pub max_levels: usize,
    pub strategy: ClusterStrategy,
}

/// Filtered, distance-sorted levels on both sides of the current price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSet {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
    pub nearest_support: Option<f64>,
    pub nearest_resistance: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Cluster {
    centroid: f64,
    touches: usize,
    last_tested: usize,
}

impl Cluster {
    fn open(point: &ExtremaPoint) -> Self {
        Self {
            centroid: point.price,
            touches: 1,
            last_tested: point.index,
        }
    }

    fn absorb(&mut self, point: &ExtremaPoint) {
        self.touches += 1;
        self.centroid += (point.price - self.centroid) / self.touches as f64;
        self.last_tested = self.last_tested.max(point.index);
    }
}

/// Cluster `extrema` into support/resistance levels around `current_price`.
pub fn cluster_levels(extrema: &Extrema, current_price: f64, params: &LevelParams) -> LevelSet {
    let resistance = select(
        build_clusters(&extrema.peaks, params),
        LevelKind::Resistance,
        current_price,
        params,
    );
    let support = select(
        build_clusters(&extrema.troughs, params),
        LevelKind::Support,
        current_price,
        params,
    );

    LevelSet {
        nearest_support: support.first().map(|l| l.price),
        nearest_resistance: resistance.first().map(|l| l.price),
        support,
        resistance,
    }
}

fn build_clusters(points: &[ExtremaPoint], params: &LevelParams) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for point in points {
        let within = |c: &Cluster| (c.centroid - point.price).abs() <= params.tolerance;
        let slot = match params.strategy {
            ClusterStrategy::FirstMatch => clusters.iter().position(within),
            ClusterStrategy::Nearest => clusters
                .iter()
                .enumerate()
                .filter(|&(_, c)| within(c))
                .min_by(|(_, a), (_, b)| {
                    let da = (a.centroid - point.price).abs();
                    let db = (b.centroid - point.price).abs();
                    da.total_cmp(&db)
                })
                .map(|(i, _)| i),
        };

        match slot {
            Some(i) => clusters[i].absorb(point),
            None => clusters.push(Cluster::open(point)),
        }
    }

    clusters
}

fn select(
    clusters: Vec<Cluster>,
    kind: LevelKind,
    current_price: f64,
    params: &LevelParams,
) -> Vec<Level> {
    let mut levels: Vec<Level> = clusters
        .into_iter()
        .filter(|c| c.touches >= params.min_touch_count)
        .filter(|c| match kind {
            LevelKind::Resistance => c.centroid > current_price,
            LevelKind::Support => c.centroid < current_price,
        })
        .map(|c| Level {
            price: c.centroid,
            strength: c.touches.min(MAX_STRENGTH as usize) as u32,
            kind,
            last_tested: c.last_tested,
        })
        .collect();

    levels.sort_by(|a, b| {
        let da = (a.price - current_price).abs();
        let db = (b.price - current_price).abs();
        da.total_cmp(&db)
    });
    levels.truncate(params.max_levels);
    levels
}
