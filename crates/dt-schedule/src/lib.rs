//! `dt-schedule` — loads each agent's start time, initial placement, and
//! trip chain from CSV configuration, and stages not-yet-active agents
//! for the coordinator to hand to Workers as simulated time advances.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|----------------------------------------------------------------|
//! | [`config`] | `Placement`, `load_config_csv`, `load_config_readers`           |
//! | [`stager`] | `EntityStager`, `PendingAgent`                                  |
//! | [`error`]  | `ScheduleError`, `ScheduleResult<T>`                            |
//!
//! # Data flow
//!
//! `config::load_config_csv` reads an `agents.csv` (start time and road
//! placement) and a `trip_chain.csv` (ordered day-plan) and joins them
//! into one [`stager::PendingAgent`] per agent. The coordinator loads all
//! of these into an [`stager::EntityStager`] before the run starts, then
//! each tick calls `pop_ready` for the agents whose `start_tick` has
//! arrived and hands them to a Worker to build into real `dt_agent::Agent`
//! values.

pub mod config;
pub mod error;
pub mod stager;


pub use config::{load_config_csv, load_config_readers, Placement};
pub use error::{ScheduleError, ScheduleResult};
pub use stager::{EntityStager, PendingAgent};
