//! `Agent` — one simulated person or vehicle: identity, published position,
//! the active `Role`, and its day plan.

use std::rc::Rc;

use dt_buffer::DoubleBuffered;
use dt_core::{AgentId, AgentRng, Point2D};

use crate::role::{FrameResult, Role, RoleContext, RoleFactory};
use crate::trip_chain::TripChain;

/// One simulated agent, owned by exactly one Worker for its entire
/// lifetime in that Worker (migration happens by moving the whole
/// `Agent` to another Worker's store during the Flip phase, never by
/// reaching into it from another thread).
pub struct Agent {
    pub id: AgentId,
    /// Published position, shared with the owning Worker's `FlipSet` via
    /// `Rc` so both can hold a handle without borrow conflicts (see
    /// `dt-buffer`'s module docs).
    pub position: Rc<DoubleBuffered<Point2D>>,
    pub rng: AgentRng,
    pub trip_chain: TripChain,
    role: Box<dyn Role>,
    /// The Role active last tick, kept for exactly one tick after a
    /// switch so messages addressed before the switch still land on a
    /// live object rather than being silently dropped.
    prev_role: Option<Box<dyn Role>>,
    /// Builds the Role for the trip chain's next item when the current
    /// one signals `FrameResult::Done`. Mirrors the original
    /// `RoleFactory<Person_ST>` consulted by `Person_ST::findPersonNextRole`.
    role_factory: Rc<dyn RoleFactory>,
    done: bool,
}

impl Agent {
    /// Construct an `Agent` around an already-built position handle.
    ///
    /// Taking the `Rc` directly (rather than a raw `Point2D`) lets the
    /// very first `Role` — built by application code or a `RoleFactory`
    /// before this call — share the exact same published-position cell
    /// the `Agent` will hold for the rest of its life.
    pub fn new(
        id: AgentId,
        position: Rc<DoubleBuffered<Point2D>>,
        rng: AgentRng,
        trip_chain: TripChain,
        role: Box<dyn Role>,
        role_factory: Rc<dyn RoleFactory>,
    ) -> Self {
        Self {
            id,
            position,
            rng,
            trip_chain,
            role,
            prev_role: None,
            role_factory,
            done: false,
        }
    }

    pub fn role(&self) -> &dyn Role {
        self.role.as_ref()
    }

    pub fn role_mut(&mut self) -> &mut dyn Role {
        self.role.as_mut()
    }

    pub fn prev_role(&self) -> Option<&dyn Role> {
        self.prev_role.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Swap in `next`, running its `frame_init` and retaining the
    /// outgoing Role as `prev_role` for exactly one tick.
    fn switch_role(&mut self, mut next: Box<dyn Role>, ctx: &RoleContext) {
        next.frame_init(ctx);
        let old = std::mem::replace(&mut self.role, next);
        self.prev_role = Some(old);
    }

    /// Run one tick: dispatch to the active Role and apply whatever
    /// `FrameResult` it returns. The previous tick's `prev_role`, if any,
    /// is dropped at the start of every new tick (its one-tick grace
    /// period has elapsed).
    ///
    /// `FrameResult::Done` means the current trip-chain item (sub-trip or
    /// activity) is finished, not that the agent itself is — it advances
    /// `trip_chain` and asks `role_factory` for the Role to run next,
    /// mirroring `Person_ST::findPersonNextRole`/`updatePersonRole`. Only
    /// when the trip chain has no further items does the agent become
    /// done and eligible for removal.
    pub fn frame_tick(&mut self, ctx: &RoleContext) {
        self.prev_role = None;
        if self.done {
            return;
        }
        match self.role.frame_tick(ctx) {
            FrameResult::Continue => {}
            FrameResult::SwitchRole(next) => {
                self.switch_role(next, ctx);
            }
            FrameResult::Done => {
                if self.trip_chain.advance() {
                    let item = self
                        .trip_chain
                        .current_item()
                        .expect("advance() returned true so an item must exist")
                        .clone();
                    let sub_trip = self.trip_chain.current_sub_trip().cloned();
                    let next = self
                        .role_factory
                        .create_role(self.id, &item, sub_trip.as_ref(), &self.position);
                    self.switch_role(next, ctx);
                } else {
                    self.done = true;
                }
            }
        }
    }
}
