//! `dt-core` — foundational types for the `dt` traffic micro-simulation engine.
//!
//! This crate is a dependency of every other `dt-*` crate.  It intentionally
//! has no `dt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`, `SegmentId`, `LinkId`, `TurningId`, `CrossingId`, `WorkerId`, `ActivityId` |
//! | [`geo`]         | `GeoPoint` (WGS-84), `Point2D` + 2-D vector math          |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                 |
//! | [`transport`]   | `TransportMode` enum                                      |
//! | [`message`]     | `MessageKind`, the typed inter-agent message bus payloads |
//! | [`error`]       | `DtError`, `DtResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod message;
pub mod rng;
pub mod time;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DtError, DtResult};
pub use geo::{GeoPoint, Point2D};
pub use ids::{
    ActivityId, AgentId, CrossingId, EdgeId, LaneId, LinkId, NodeId, SegmentId, TurningId,
    WorkerId,
};
pub use message::MessageKind;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
pub use transport::TransportMode;
