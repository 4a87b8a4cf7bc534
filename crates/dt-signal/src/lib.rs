//! `dt-signal` — adaptive traffic signal timing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                          |
//! |---------------|----------------------------------------------------|
//! | [`color`]     | `Color`, `ColorSequence`                           |
//! | [`phase`]     | `Phase`, `LinkMapping`, `CrossingMapping`, `compute_total_g` |
//! | [`split_plan`]| `SplitPlan`, `cycle_length_for_ds`                  |
//! | [`role`]      | `SignalControllerRole` (implements `dt_agent::Role`)|
//! | [`error`]     | `SignalError`, `SignalResult<T>`                    |

pub mod color;
pub mod error;
pub mod phase;
pub mod role;
pub mod split_plan;


pub use color::{Color, ColorSequence};
pub use error::{SignalError, SignalResult};
pub use phase::{compute_total_g, CrossingMapping, LinkMapping, Phase};
pub use role::SignalControllerRole;
pub use split_plan::{cycle_length_for_ds, SplitPlan};
