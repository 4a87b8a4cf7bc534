//! The one `RoleFactory` this demo needs: turn a `TripChainItem` into
//! either a dwell (`ActivityRole`) or a drive (`TravelRole`), resolving
//! `Destination::Home`/`Destination::Work` through a per-agent lookup built
//! once at population time.
//!
//! One instance of this factory is built per Worker thread (see
//! `SimBuilder::role_factory`), so the home/work maps and the router are
//! shared read-only state, not per-agent.

use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use dt_agent::{Destination, Role, RoleFactory, SubTrip, TripChainItem};
use dt_behavior::{ActivityRole, BehaviorModel};
use dt_buffer::DoubleBuffered;
use dt_core::{AgentId, NodeId, Point2D};
use dt_mobility::TravelRole;
use dt_spatial::{DijkstraRouter, RoadNetwork};

pub struct BasicRoleFactory {
    pub network: Arc<RoadNetwork>,
    pub router: DijkstraRouter,
    pub behavior: Rc<dyn BehaviorModel>,
    pub homes: Arc<FxHashMap<AgentId, NodeId>>,
    pub works: Arc<FxHashMap<AgentId, NodeId>>,
}

impl BasicRoleFactory {
    fn resolve(&self, agent: AgentId, destination: Destination) -> NodeId {
        match destination {
            Destination::Node(n) => n,
            Destination::Home => *self
                .homes
                .get(&agent)
                .unwrap_or_else(|| panic!("agent {agent:?} has no modeled home node")),
            Destination::Work => *self
                .works
                .get(&agent)
                .unwrap_or_else(|| panic!("agent {agent:?} has no modeled work node")),
        }
    }
}

impl RoleFactory for BasicRoleFactory {
    fn create_role(
        &self,
        agent: AgentId,
        item: &TripChainItem,
        sub_trip: Option<&SubTrip>,
        position: &Rc<DoubleBuffered<Point2D>>,
    ) -> Box<dyn Role> {
        match item {
            TripChainItem::Activity(activity) => {
                Box::new(ActivityRole::new(agent, activity.end_tick, self.behavior.clone()))
            }
            TripChainItem::Trip(_) => {
                let sub_trip = sub_trip.expect("a Trip item always has a current sub-trip");
                let origin = self.resolve(agent, sub_trip.origin);
                let destination = self.resolve(agent, sub_trip.destination);
                let role = TravelRole::new(
                    &self.router,
                    &self.network,
                    position.clone(),
                    origin,
                    destination,
                    sub_trip.mode,
                )
                .expect("every pair of nodes in the demo network is connected");
                Box::new(role)
            }
        }
    }
}
