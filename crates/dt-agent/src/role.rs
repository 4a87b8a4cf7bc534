//! `Role` — the pluggable Behavior+Movement unit an `Agent` delegates to.
//!
//! The specification leaves the choice between a class hierarchy and a
//! sum-type enum of Roles explicitly open (SPEC_FULL.md §9, "Class
//! hierarchies vs. sum types"): applications must be able to define their
//! own Roles (a custom vehicle type, a novel activity), which a closed
//! enum can't express without the engine knowing about every variant in
//! advance. `Box<dyn Role>` is the idiomatic Rust answer — the same
//! tradeoff the original C++ resolves with a `Role` base class and
//! virtual dispatch (`Role::Update`, `Role::frame_init`, etc.).

use std::rc::Rc;

use dt_buffer::{BufferedField, DoubleBuffered};
use dt_core::{AgentId, MessageKind, Point2D, SimClock, TransportMode};
use dt_spatial::{RoadNetwork, SpatialIndex};

use crate::trip_chain::{SubTrip, TripChainItem};

/// Read-only context a Role needs to make decisions during one tick.
///
/// Borrowed, not owned: the coordinator rebuilds `aura` every tick and
/// hands out a fresh `RoleContext` to each Worker before its Tick phase,
/// so no Role ever holds one across a tick boundary.
pub struct RoleContext<'a> {
    pub agent: AgentId,
    pub clock: &'a SimClock,
    pub network: &'a RoadNetwork,
    pub aura: &'a SpatialIndex,
}

/// What a Role's per-tick update wants the engine to do next.
pub enum FrameResult {
    /// Keep running this Role next tick.
    Continue,
    /// Replace this Role with a new one starting next tick (e.g. a
    /// traveling agent completing its trip and starting its next
    /// activity). The old Role is retained as `prev_role` for one tick so
    /// any in-flight messages addressed to it are not silently dropped.
    SwitchRole(Box<dyn Role>),
    /// The agent has nothing left to do and should be removed from the
    /// simulation.
    Done,
}

/// The behavior+movement unit an `Agent` delegates its per-tick update to.
///
/// A Role owns whatever buffered state it publishes (lane position,
/// queue position, activity progress) and is responsible for registering
/// that state with the Worker's `FlipSet` via
/// [`subscription_list`](Role::subscription_list) when it starts running.
pub trait Role {
    /// Transport mode this Role represents, for routing-cost and output
    /// purposes. `TransportMode::None` for non-traveling Roles (e.g. an
    /// activity).
    fn mode(&self) -> TransportMode;

    /// Buffered fields this Role publishes, for the Worker to register
    /// with its `FlipSet` when the Role starts and deregister when it
    /// stops (swapped out or the agent is removed).
    fn subscription_list(&self) -> Vec<Rc<dyn BufferedField>> {
        Vec::new()
    }

    /// Called exactly once, the first tick this Role is active, before
    /// `frame_tick`.
    fn frame_init(&mut self, ctx: &RoleContext) -> FrameResult {
        let _ = ctx;
        FrameResult::Continue
    }

    /// The Role's main per-tick update: advance Behavior (decide) and
    /// Movement (act) for this tick.
    fn frame_tick(&mut self, ctx: &RoleContext) -> FrameResult;

    /// Deliver a message addressed to this agent while this Role is
    /// active. Messages sent during tick *t* are delivered no earlier
    /// than the start of tick *t+1*.
    fn on_message(&mut self, msg: &MessageKind, ctx: &RoleContext) {
        let _ = (msg, ctx);
    }
}

/// Constructs the `Role` for an Agent's next trip-chain item, mirroring
/// the original `RoleFactory<Person_ST>::createRole(tripChainItem,
/// subTrip, person)`. Kept as an application-supplied trait object rather
/// than a closed dispatch table so apps can register Roles this crate
/// doesn't know about (a custom vehicle type, a novel activity) without
/// `dt-agent` depending on `dt-mobility`, `dt-signal`, or any other
/// Role-providing crate.
pub trait RoleFactory {
    /// Build the Role that should run for `item` (and, if it is a
    /// `Trip`, the specific `sub_trip` now active). Called by
    /// [`Agent::frame_tick`](crate::agent::Agent::frame_tick) whenever the
    /// active Role signals [`FrameResult::Done`] and the trip chain has a
    /// next item to advance to.
    ///
    /// `agent` identifies whose trip chain this is — a single Worker-local
    /// `RoleFactory` instance builds Roles for every agent it owns, so a
    /// Role that needs to remember which agent it belongs to (e.g.
    /// `dt-behavior`'s `ActivityRole`, for `on_contacts`/`on_message`) has
    /// no other way to learn it.
    ///
    /// `position` is the agent's own published position handle — the same
    /// `Rc` the `Agent` holds for its whole lifetime. A Role that moves
    /// the agent (e.g. `dt-mobility`'s `TravelRole`) must publish into
    /// this exact handle rather than create one of its own, or the
    /// positions the rest of the engine (the `SpatialIndex`, output
    /// snapshots) sees would silently stop tracking it.
    fn create_role(
        &self,
        agent: AgentId,
        item: &TripChainItem,
        sub_trip: Option<&SubTrip>,
        position: &Rc<DoubleBuffered<Point2D>>,
    ) -> Box<dyn Role>;
}

/// A [`RoleFactory`] for agents whose trip chain never has more than one
/// item — [`Agent::frame_tick`](crate::agent::Agent::frame_tick) only
/// consults the factory when `trip_chain.advance()` succeeds, so this is
/// safe as the default for single-leg demo agents and tests. Panics if a
/// real multi-item trip chain is ever paired with it, since that signals
/// a missing application-supplied factory rather than a reachable runtime
/// condition.
pub struct NullRoleFactory;

impl RoleFactory for NullRoleFactory {
    fn create_role(
        &self,
        _agent: AgentId,
        _item: &TripChainItem,
        _sub_trip: Option<&SubTrip>,
        _position: &Rc<DoubleBuffered<Point2D>>,
    ) -> Box<dyn Role> {
        panic!(
            "NullRoleFactory::create_role called — supply a real RoleFactory for agents whose \
             trip chain has more than one item"
        )
    }
}
