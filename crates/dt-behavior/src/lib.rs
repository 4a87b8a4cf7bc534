//! `dt-behavior` — the `BehaviorModel` extension point and `ActivityRole`,
//! the non-mobile half of the Role contract.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                  |
//! |-----------|------------------------------------------------------------|
//! | [`intent`] | `Intent` enum (`TravelTo`, `WakeAt`, `SendMessage`)        |
//! | [`model`]  | `BehaviorModel` trait                                      |
//! | [`noop`]   | `NoopBehavior` — placeholder that never produces intents   |
//! | [`role`]   | `ActivityRole`, a `dt_agent::Role` for non-travel dwells   |
//! | [`error`]  | `BehaviorError`, `BehaviorResult<T>`                       |
//!
//! Individual behavioral equations (who decides to travel where, and why)
//! are out of scope here; what's specified is the contact/message surface
//! an `ActivityRole` exposes to application code, not any particular
//! decision procedure.

pub mod error;
pub mod intent;
pub mod model;
pub mod noop;
pub mod role;

#[cfg(test)]
mod tests;

pub use error::{BehaviorError, BehaviorResult};
pub use intent::Intent;
pub use model::BehaviorModel;
pub use noop::NoopBehavior;
pub use role::ActivityRole;
