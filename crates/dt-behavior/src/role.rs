//! `ActivityRole` — the non-mobile half of the Role contract: an agent
//! dwelling at a location between trips (home, work, an errand, waiting
//! for a bus). Grounded on `original_source/.../entities/roles/activityRole`
//! and `waitBusActivityRole/WaitBusActivityRole.hpp` — both are Roles with
//! no Movement facet, only a start/end window and a set of contact/message
//! reactions.

use std::rc::Rc;

use dt_agent::{FrameResult, Role, RoleContext};
use dt_core::{AgentId, MessageKind, Tick, TransportMode};

use crate::model::BehaviorModel;

/// A dwell at a location from `start_tick` to `end_tick`. `frame_tick`
/// keeps returning `Continue` until the clock reaches `end_tick`, at which
/// point it returns `Done` — `Agent::frame_tick` takes that as "this
/// trip-chain item is over" and advances to whatever comes next.
pub struct ActivityRole {
    agent: AgentId,
    end_tick: Tick,
    model: Rc<dyn BehaviorModel>,
    /// Populated by `on_contacts`/`on_message` for the coordinator to drain
    /// once the full engine is wired up; see `dt-behavior`'s crate docs for
    /// why intents are buffered here rather than applied directly.
    pending_intents: Vec<crate::Intent>,
}

impl ActivityRole {
    pub fn new(agent: AgentId, end_tick: Tick, model: Rc<dyn BehaviorModel>) -> Self {
        Self {
            agent,
            end_tick,
            model,
            pending_intents: Vec::new(),
        }
    }

    /// Give the activity a chance to react to whoever else is present at
    /// the same location this tick (e.g. another agent arriving at the
    /// same bus stop). Call once per tick from the owning engine loop
    /// before `frame_tick`; not part of the `Role` trait because its
    /// input (the co-located agent set) is an engine-level query, not
    /// something a bare `RoleContext` exposes yet.
    pub fn note_contacts(&mut self, agents_at_location: &[AgentId], ctx: &RoleContext) {
        let intents = self.model.on_contacts(self.agent, agents_at_location, ctx);
        self.pending_intents.extend(intents);
    }

    /// Drain and return whatever intents have accumulated since the last
    /// call.
    pub fn take_pending_intents(&mut self) -> Vec<crate::Intent> {
        std::mem::take(&mut self.pending_intents)
    }
}

impl Role for ActivityRole {
    fn mode(&self) -> TransportMode {
        TransportMode::None
    }

    fn frame_tick(&mut self, ctx: &RoleContext) -> FrameResult {
        if ctx.clock.current_tick >= self.end_tick {
            FrameResult::Done
        } else {
            FrameResult::Continue
        }
    }

    fn on_message(&mut self, msg: &MessageKind, ctx: &RoleContext) {
        if let MessageKind::Custom { payload, .. } = msg {
            let intents = self.model.on_message(self.agent, payload, ctx);
            self.pending_intents.extend(intents);
        }
    }
}
