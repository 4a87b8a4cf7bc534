//! `SpatialIndex` — the tick-scoped index of agent positions (§4.6, "Aura").
//!
//! Distinct from [`RoadNetwork`](crate::RoadNetwork)'s own R-tree, which
//! indexes the static network's nodes once at load time. `SpatialIndex`
//! indexes *agents*, is rebuilt from scratch every Aura phase by the
//! coordinator thread (bulk-loading is cheaper than incrementally updating
//! an R-tree across a full population turnover), and answers the
//! rectangle queries Behavior/Movement need to see nearby agents owned by
//! *other* Workers — the only channel through which cross-Worker
//! visibility happens in this engine (§4.5's "no direct struct access"
//! rule).

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use dt_core::{AgentId, Point2D};

#[derive(Clone, Copy)]
struct AgentEntry {
    point: [f32; 2],
    id: AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// A snapshot of every agent's position, valid for exactly one tick.
///
/// Built once per tick from the positions every Worker published during
/// Flip; queried freely (read-only) by every Worker during the following
/// tick's Behavior/Movement sub-steps.
pub struct SpatialIndex {
    tree: RTree<AgentEntry>,
}

impl SpatialIndex {
    /// Bulk-load an index from `(AgentId, position)` pairs. O(n log n).
    pub fn build(positions: impl IntoIterator<Item = (AgentId, Point2D)>) -> Self {
        let entries: Vec<AgentEntry> = positions
            .into_iter()
            .map(|(id, p)| AgentEntry { point: [p.x, p.y], id })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn empty() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All agents whose position falls within the axis-aligned rectangle
    /// `[min, max]`, inclusive.
    pub fn query_rect(&self, min: Point2D, max: Point2D) -> Vec<AgentId> {
        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|e| e.id)
            .collect()
    }

    /// All agents within `radius_m` of `center` (a circular query built on
    /// top of the R-tree's nearest-neighbor iterator).
    pub fn query_radius(&self, center: Point2D, radius_m: f32) -> Vec<AgentId> {
        let r2 = radius_m * radius_m;
        self.tree
            .nearest_neighbor_iter(&[center.x, center.y])
            .take_while(|e| e.distance_2(&[center.x, center.y]) <= r2)
            .map(|e| e.id)
            .collect()
    }

    /// The single nearest agent to `point`, if the index is non-empty.
    pub fn nearest(&self, point: Point2D) -> Option<AgentId> {
        self.tree.nearest_neighbor(&[point.x, point.y]).map(|e| e.id)
    }
}
