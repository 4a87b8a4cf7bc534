//! The `BehaviorModel` trait — the main extension point for user code that
//! wants an `ActivityRole` to react to contacts and messages.
//!
//! Individual behavioral equations (who decides to travel where, and why)
//! are explicitly out of scope for this engine; what's specified is the
//! contact/message contact surface a Role exposes to application code, not
//! any particular decision procedure.

use dt_agent::RoleContext;
use dt_core::AgentId;

use crate::Intent;

/// Pluggable reaction to contacts and messages during an `Activity`.
///
/// Both methods have no-op defaults so an `ActivityRole` can be used with
/// no model at all (a pure dwell with no social behavior).
pub trait BehaviorModel: 'static {
    /// Called when co-located agents are present at this agent's current
    /// location, once per tick while the activity is ongoing.
    ///
    /// `agents_at_location` is the raw slice of everyone present,
    /// **including `agent` itself** — filter it out if only neighbors
    /// matter.
    fn on_contacts(
        &self,
        _agent: AgentId,
        _agents_at_location: &[AgentId],
        _ctx: &RoleContext<'_>,
    ) -> Vec<Intent> {
        vec![]
    }

    /// Called when another agent's `Intent::SendMessage` is delivered to
    /// this agent while the activity is ongoing. `MessageKind::Custom`
    /// carries no sender field, so the sender isn't available here; a
    /// model that needs it should encode it in the payload.
    fn on_message(&self, _agent: AgentId, _payload: &[u8], _ctx: &RoleContext<'_>) -> Vec<Intent> {
        vec![]
    }
}
