//! Typed payloads for the engine's inter-agent message bus.
//!
//! A message sent during tick *t* is delivered no earlier than the start of
//! tick *t+1* (see the concurrency model). The bus itself lives in
//! `dt-agent` (it needs `AgentId` routing and per-Role `onMessage`
//! dispatch); this module only fixes the payload shapes so every crate
//! agrees on what e.g. a `WaitingPersonArrival` looks like on the wire.

use crate::{AgentId, SegmentId};

/// A message kind recognized (or produced) by the core engine.
///
/// `Custom` lets applications define their own kinds without the engine
/// needing to know about them; the core only ever constructs the three
/// named variants below.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// A pedestrian has reached a bus stop and is now waiting.
    WaitingPersonArrival { agent: AgentId },
    /// Request to reroute around a set of blacklisted segments (e.g. an incident).
    ReRouteRequest { blacklisted_links: Vec<SegmentId> },
    /// Enables region-tracking ("commsim") for an agent.
    CommsimEnabled { agent: AgentId },
    /// Application-defined message, identified by an opaque tag and payload.
    Custom { tag: u32, payload: Vec<u8> },
}

impl MessageKind {
    /// A short label for logging — avoids formatting the (possibly large)
    /// `Custom` payload.
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::WaitingPersonArrival { .. } => "WaitingPersonArrival",
            MessageKind::ReRouteRequest { .. } => "ReRouteRequest",
            MessageKind::CommsimEnabled { .. } => "CommsimEnabled",
            MessageKind::Custom { .. } => "Custom",
        }
    }
}
