//! `MobilityEngine` — a thin `Router` wrapper that builds `TravelRole`s for
//! `dt-agent`'s trip-chain sequencer.

use std::rc::Rc;

use dt_buffer::DoubleBuffered;
use dt_core::{NodeId, Point2D, TransportMode};
use dt_spatial::{RoadNetwork, Router};

use crate::{MobilityResult, TravelRole};

/// Wraps a [`Router`] to provide the single operation `dt-mobility`
/// exposes to the rest of the engine: turn a `(origin, destination,
/// mode)` request into a runnable [`TravelRole`].
///
/// # Type parameter
///
/// `R` must implement [`Router`] (e.g. [`dt_spatial::DijkstraRouter`]).
/// Swap it at compile time for a different routing algorithm with no
/// runtime overhead.
pub struct MobilityEngine<R: Router> {
    pub router: R,
}

impl<R: Router> MobilityEngine<R> {
    pub fn new(router: R) -> Self {
        Self { router }
    }

    /// Compute a route and build the `TravelRole` that will advance
    /// `position` along it, one tick at a time, until `destination` is
    /// reached.
    pub fn begin_travel(
        &self,
        network: &RoadNetwork,
        position: Rc<DoubleBuffered<Point2D>>,
        origin: NodeId,
        destination: NodeId,
        mode: TransportMode,
    ) -> MobilityResult<TravelRole> {
        TravelRole::new(&self.router, network, position, origin, destination, mode)
    }
}
