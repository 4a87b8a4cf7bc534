//! `dt-mobility` — incremental movement along a routed path.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|---------------------------------------------------------------------|
//! | [`progress`] | `RouteProgress` — position along a `Route`, advanced by distance   |
//! | [`role`]     | `TravelRole` — the Movement half of the Role contract              |
//! | [`engine`]   | `MobilityEngine<R>` — `Router` wrapper that builds `TravelRole`s    |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`                                |
//!
//! # Movement model
//!
//! Agents move incrementally, not by teleport: each tick, `TravelRole`
//! advances `RouteProgress` by `distance = speed × tick_duration_secs`
//! along the current route segment (crossing into the next segment, at
//! that segment's own free-flow speed, if the tick's budget outlasts it),
//! and publishes the interpolated position to the agent's `DoubleBuffered`
//! position field. `FrameResult::Done` once the route's last segment is
//! passed hands control back to `Agent::frame_tick`, which advances the
//! trip chain and asks the `RoleFactory` for whatever comes next.

pub mod engine;
pub mod error;
pub mod progress;
pub mod role;


pub use engine::MobilityEngine;
pub use error::{MobilityError, MobilityResult};
pub use progress::RouteProgress;
pub use role::TravelRole;
