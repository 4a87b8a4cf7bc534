//! `TravelRole` — the Movement half of the Role contract for an agent
//! covering a `SubTrip` by car, on foot, by bike, or by transit.

use std::rc::Rc;

use dt_agent::{FrameResult, Role, RoleContext};
use dt_buffer::{BufferedField, DoubleBuffered};
use dt_core::{NodeId, Point2D, TransportMode};
use dt_spatial::{RoadNetwork, Route, Router};

use crate::progress::RouteProgress;
use crate::{MobilityError, MobilityResult};

/// An agent in transit from `origin` to `destination` by `mode`, advancing
/// along `route` a tick's worth of distance at a time.
pub struct TravelRole {
    mode: TransportMode,
    destination: NodeId,
    progress: RouteProgress,
    position: Rc<DoubleBuffered<Point2D>>,
}

impl TravelRole {
    /// Compute a route from `origin` to `destination` and build a
    /// `TravelRole` that will advance `position` along it one tick at a
    /// time. `position` is normally the travelling `Agent`'s own
    /// published position, shared via `Rc`.
    pub fn new<R: Router>(
        router: &R,
        network: &RoadNetwork,
        position: Rc<DoubleBuffered<Point2D>>,
        origin: NodeId,
        destination: NodeId,
        mode: TransportMode,
    ) -> MobilityResult<Self> {
        let route = router
            .route(network, origin, destination, mode)
            .map_err(MobilityError::Routing)?;
        position.set(network.node_pos[origin.index()]);
        Ok(Self {
            mode,
            destination,
            progress: RouteProgress::new(route),
            position,
        })
    }

    pub fn route(&self) -> &Route {
        self.progress.route()
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }
}

impl Role for TravelRole {
    fn mode(&self) -> TransportMode {
        self.mode
    }

    fn subscription_list(&self) -> Vec<Rc<dyn BufferedField>> {
        vec![self.position.clone()]
    }

    fn frame_tick(&mut self, ctx: &RoleContext) -> FrameResult {
        let finished = self
            .progress
            .advance(ctx.network, self.mode, ctx.clock.tick_duration_secs as f32);
        self.position.set(self.progress.position(ctx.network));
        if finished {
            FrameResult::Done
        } else {
            FrameResult::Continue
        }
    }
}
