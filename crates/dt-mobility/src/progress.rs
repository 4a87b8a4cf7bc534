//! `RouteProgress` — an agent's position along a `Route`, advanced one
//! tick's worth of distance at a time.
//!
//! Replaces the teacher's `MovementState` teleport-at-arrival model
//! (stationary until `arrival_tick`, then instantly at the destination)
//! with genuine incremental movement: every tick walks the agent forward
//! along its current segment, crossing into the next segment (at that
//! segment's own free-flow speed) if the tick's distance budget outlasts
//! what's left of the one it's on.

use dt_core::Point2D;
use dt_spatial::{segment_speed_mps, RoadNetwork, Route};

/// Where an agent sits along a [`Route`]: which segment it's on and how
/// far into that segment (in metres).
#[derive(Debug, Clone)]
pub struct RouteProgress {
    route: Route,
    segment_idx: usize,
    offset_m: f32,
}

impl RouteProgress {
    /// Start at the beginning of `route` (offset zero on its first
    /// segment). A trivial (empty-segment) route is immediately
    /// [`is_finished`](Self::is_finished).
    pub fn new(route: Route) -> Self {
        Self {
            route,
            segment_idx: 0,
            offset_m: 0.0,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// `true` once every segment in the route has been walked.
    pub fn is_finished(&self) -> bool {
        self.segment_idx >= self.route.segments.len()
    }

    /// Advance by the distance covered in `time_budget_secs` at the
    /// mode's free-flow speed, crossing segment boundaries as needed.
    /// Returns `true` if the route finished during this call.
    ///
    /// Speed is re-read from `network` on every segment crossing, so a
    /// single tick correctly spans segments with different free-flow
    /// speeds rather than assuming the whole tick moves at the starting
    /// segment's speed.
    pub fn advance(&mut self, network: &RoadNetwork, mode: dt_core::TransportMode, mut time_budget_secs: f32) -> bool {
        while time_budget_secs > 0.0 && !self.is_finished() {
            let segment = self.route.segments[self.segment_idx];
            let length = network.segment_length_m[segment.index()];
            let speed = segment_speed_mps(network, segment, mode);
            let remaining_m = (length - self.offset_m).max(0.0);

            if speed <= 0.0 {
                // Degenerate (zero-length or zero-speed) segment: skip it
                // without consuming any time budget.
                self.segment_idx += 1;
                self.offset_m = 0.0;
                continue;
            }

            let time_to_finish_segment = remaining_m / speed;
            if time_to_finish_segment <= time_budget_secs {
                time_budget_secs -= time_to_finish_segment;
                self.segment_idx += 1;
                self.offset_m = 0.0;
            } else {
                self.offset_m += speed * time_budget_secs;
                time_budget_secs = 0.0;
            }
        }
        self.is_finished()
    }

    /// Current interpolated position along the route.
    ///
    /// Segments carry no poly-line in this network model (see
    /// `dt-spatial::RoadNetwork`), so position is a straight-line
    /// interpolation between the current segment's endpoints — exact at
    /// segment boundaries, a linear approximation mid-segment.
    pub fn position(&self, network: &RoadNetwork) -> Point2D {
        if self.route.is_trivial() {
            return Point2D::ZERO;
        }
        if self.is_finished() {
            let last = *self.route.segments.last().expect("route is non-trivial");
            return network.node_pos[network.segment_to[last.index()].index()];
        }
        let segment = self.route.segments[self.segment_idx];
        let from = network.node_pos[network.segment_from[segment.index()].index()];
        let to = network.node_pos[network.segment_to[segment.index()].index()];
        let length = network.segment_length_m[segment.index()];
        if length <= 0.0 {
            return to;
        }
        let t = (self.offset_m / length).clamp(0.0, 1.0);
        from + (to - from) * t
    }
}
