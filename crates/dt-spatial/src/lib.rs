//! `dt-spatial` — road network, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`, lanes/links/turnings/crossings |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                  |
//! | [`aura`]    | `SpatialIndex` — tick-scoped agent position index           |
//! | [`loader`]  | `load_network_csv`, `load_network_readers`                  |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod aura;
pub mod error;
pub mod loader;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use aura::SpatialIndex;
pub use error::{SpatialError, SpatialResult};
pub use loader::{load_network_csv, load_network_readers};
pub use network::{Crossing, Lane, Link, RoadNetwork, RoadNetworkBuilder, Turning};
pub use router::{segment_speed_mps, DijkstraRouter, Route, Router};
