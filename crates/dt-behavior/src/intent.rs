//! Agent intents — the actions a decision hook can request in response to
//! a contact or an inbound message.

use dt_core::{AgentId, NodeId, Tick, TransportMode};

/// An action requested by a [`BehaviorModel`][crate::BehaviorModel] hook.
///
/// Intents are data, not effects: they describe what an agent wants, and
/// are applied by whatever owns the tick loop (a `Role`'s own `frame_tick`,
/// or the coordinator once the full engine is wired up), the same
/// separation the original engine keeps between deciding and acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Agent wants to travel to `destination` via `mode`.
    TravelTo {
        destination: NodeId,
        mode: TransportMode,
    },

    /// Agent wants to be woken again at `tick` for re-planning.
    WakeAt(Tick),

    /// Agent wants to deliver a message to `to`.
    SendMessage { to: AgentId, payload: Vec<u8> },
}
