//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `dt-sim` calls routing via the [`Router`] trait, so applications can swap
//! in custom implementations (contraction hierarchies, A*, behavioural
//! models) without touching the framework core. The default
//! [`DijkstraRouter`] is sufficient for typical scenario sizes.
//!
//! # Cost units
//!
//! All costs and totals are in **milliseconds** (u32) internally. `Route`
//! exposes `total_travel_secs: f32` and a `travel_ticks()` helper for
//! integration with the sim clock.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use dt_core::{NodeId, SegmentId, TransportMode};

use crate::network::RoadNetwork;
use crate::SpatialError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered list of `SegmentId`s and the
/// total travel time for the requested mode.
#[derive(Debug, Clone)]
pub struct Route {
    /// Segments to traverse in order, from source to destination.
    pub segments: Vec<SegmentId>,
    /// Cumulative travel time in seconds for the mode the route was computed for.
    pub total_travel_secs: f32,
}

impl Route {
    /// Convert travel time to simulation ticks (ceiling division so agents
    /// never arrive before the correct tick).
    pub fn travel_ticks(&self, tick_duration_secs: u32) -> u64 {
        (self.total_travel_secs / tick_duration_secs as f32).ceil() as u64
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implement this trait to replace the default Dijkstra with a contraction
/// hierarchy, A*, or a behavioural model (e.g. congestion avoidance).
///
/// # Thread safety
///
/// Each Worker owns its network and router for the run's lifetime, so
/// implementations need not be `Send`/`Sync`; they are never shared across
/// threads concurrently.
pub trait Router {
    /// Compute a route from `from` to `to` for the given transport mode.
    ///
    /// Returns an empty [`Route`] (not an error) when `from == to`.
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        mode: TransportMode,
    ) -> Result<Route, SpatialError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph.
///
/// Uses `segment_travel_ms` (derived from segment length and free-flow
/// speed) as cost for `Car` mode. For other modes the cost is derived from
/// `segment_length_m` divided by the mode's assumed speed:
///
/// | Mode    | Speed     |
/// |---------|-----------|
/// | Car     | per-segment free-flow speed |
/// | Walk    | 1.4 m/s   |
/// | Bike    | 4.2 m/s   |
/// | Transit | 8.3 m/s   |
///
/// Applications that need mode-specific road graphs (e.g. cycling paths,
/// GTFS transit) should implement their own [`Router`].
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        mode: TransportMode,
    ) -> Result<Route, SpatialError> {
        dijkstra(network, from, to, mode)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[inline]
fn segment_cost_ms(network: &RoadNetwork, segment: SegmentId, mode: TransportMode) -> u32 {
    match mode {
        TransportMode::Car | TransportMode::None => network.segment_travel_ms[segment.index()],
        TransportMode::Walk => (network.segment_length_m[segment.index()] / 1.4 * 1000.0) as u32,
        TransportMode::Bike => (network.segment_length_m[segment.index()] / 4.2 * 1000.0) as u32,
        TransportMode::Transit => {
            // Approximation; real transit uses scheduled trips in dt-mobility.
            (network.segment_length_m[segment.index()] / 8.3 * 1000.0) as u32
        }
        // Future modes added to TransportMode fall back to car cost.
        _ => network.segment_travel_ms[segment.index()],
    }
}

/// Free-flow speed for `segment` under `mode`, in metres/second.
///
/// Shares the same per-mode speed table as routing cost above, so a
/// `Route`'s `total_travel_secs` and a caller's own per-segment speed
/// computation (e.g. `dt-mobility`'s incremental position update) always
/// agree on how fast an agent covers a given segment.
#[inline]
pub fn segment_speed_mps(network: &RoadNetwork, segment: SegmentId, mode: TransportMode) -> f32 {
    match mode {
        TransportMode::Walk => 1.4,
        TransportMode::Bike => 4.2,
        TransportMode::Transit => 8.3,
        TransportMode::Car | TransportMode::None => {
            let length = network.segment_length_m[segment.index()];
            let travel_secs = network.segment_travel_ms[segment.index()] as f32 / 1000.0;
            if travel_secs > 0.0 {
                length / travel_secs
            } else {
                0.0
            }
        }
        _ => {
            let length = network.segment_length_m[segment.index()];
            let travel_secs = network.segment_travel_ms[segment.index()] as f32 / 1000.0;
            if travel_secs > 0.0 {
                length / travel_secs
            } else {
                0.0
            }
        }
    }
}

fn dijkstra(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    mode: TransportMode,
) -> Result<Route, SpatialError> {
    if from == to {
        return Ok(Route {
            segments: vec![],
            total_travel_secs: 0.0,
        });
    }

    let n = network.node_count();
    let mut dist = vec![u32::MAX; n];
    let mut prev_segment = vec![SegmentId::INVALID; n];

    dist[from.index()] = 0;

    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, prev_segment, to, cost));
        }

        if cost > dist[node.index()] {
            continue;
        }

        for segment in network.out_segments(node) {
            let neighbor = network.segment_to[segment.index()];
            let new_cost = cost.saturating_add(segment_cost_ms(network, segment, mode));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_segment[neighbor.index()] = segment;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    network: &RoadNetwork,
    prev_segment: Vec<SegmentId>,
    to: NodeId,
    total_ms: u32,
) -> Route {
    let mut segments = Vec::new();
    let mut cur = to;
    loop {
        let s = prev_segment[cur.index()];
        if s == SegmentId::INVALID {
            break;
        }
        segments.push(s);
        cur = network.segment_from[s.index()];
    }
    segments.reverse();
    Route {
        segments,
        total_travel_secs: total_ms as f32 / 1000.0,
    }
}
