//! CSV configuration loader — the idiomatic stand-in for the
//! "XML configuration parsing" collaborator named out of scope. Recognizes
//! the per-agent keys named in the specification's "Configuration
//! (consumed)" interface: `startTime`, `startSegmentId`,
//! `startLaneIndex`, `segmentStartOffset`, `initialSpeed`, and an ordered
//! trip-chain.
//!
//! # CSV format
//!
//! Two files, joined on `agent_id`.
//!
//! `agents.csv` — one row per agent, its start time and initial placement:
//!
//! ```csv
//! agent_id,start_time_unix_secs,start_segment_id,start_lane_index,segment_start_offset_m,initial_speed_mps
//! 0,0,3,0,0.0,0.0
//! 1,1800,7,1,12.5,0.0
//! ```
//!
//! `trip_chain.csv` — one row per trip-chain item (or sub-trip leg of a
//! multi-leg trip), in the order each agent should execute them:
//!
//! ```csv
//! agent_id,item_index,leg_index,kind,mode,origin,destination,start_tick,end_tick
//! 0,0,0,activity,,,home,0,8
//! 0,1,0,trip,walk,home,node:42,,
//! 0,1,1,trip,transit,node:42,work,,
//! 0,2,0,activity,,,work,,
//! ```
//!
//! Rows sharing `(agent_id, item_index)` with `kind = trip` are legs
//! (sub-trips) of the same `Trip` item, ordered by `leg_index`. A `kind =
//! activity` row is always a standalone item; its `start_tick`/`end_tick`
//! columns are required, and `mode`/`origin` are ignored.
//!
//! **`origin`/`destination`** accept `home`, `work`, or `node:<u32>`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use dt_agent::trip_chain::{Activity, Destination, SubTrip, Trip, TripChainItem};
use dt_agent::TripChain;
use dt_core::{AgentId, SegmentId, SimClock, Tick, TransportMode};

use crate::stager::PendingAgent;
use crate::ScheduleError;

// ── Placement ─────────────────────────────────────────────────────────────────

/// Initial placement for a mobile agent, resolved against the road
/// network by whoever builds the `Agent` (this crate has no
/// `dt-spatial` dependency, so it carries the raw network-relative
/// fields rather than a `Point2D`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub start_segment: SegmentId,
    pub start_lane_index: u8,
    pub segment_start_offset_m: f32,
    pub initial_speed_mps: f32,
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AgentRecord {
    agent_id: u32,
    start_time_unix_secs: i64,
    start_segment_id: u32,
    start_lane_index: u8,
    segment_start_offset_m: f32,
    initial_speed_mps: f32,
}

#[derive(Deserialize)]
struct TripChainRecord {
    agent_id: u32,
    item_index: u32,
    leg_index: u32,
    kind: String,
    mode: String,
    origin: String,
    destination: String,
    start_tick: Option<u64>,
    end_tick: Option<u64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every agent's start time, initial placement, and trip chain from
/// a pair of CSV files, producing the [`PendingAgent`]s to feed an
/// [`crate::EntityStager`].
pub fn load_config_csv(
    agents_path: &Path,
    trip_chain_path: &Path,
    clock: &SimClock,
) -> Result<Vec<PendingAgent>, ScheduleError> {
    let agents_file = std::fs::File::open(agents_path).map_err(ScheduleError::Io)?;
    let trip_chain_file = std::fs::File::open(trip_chain_path).map_err(ScheduleError::Io)?;
    load_config_readers(agents_file, trip_chain_file, clock)
}

/// Like [`load_config_csv`] but accepts any `Read` sources (useful for
/// tests: pass `std::io::Cursor`s).
pub fn load_config_readers<A: Read, T: Read>(
    agents_reader: A,
    trip_chain_reader: T,
    clock: &SimClock,
) -> Result<Vec<PendingAgent>, ScheduleError> {
    let placements = load_placements(agents_reader, clock)?;
    let trip_chains = load_trip_chains(trip_chain_reader)?;

    let mut agents: Vec<PendingAgent> = Vec::with_capacity(placements.len());
    for (agent_id, (start_tick, placement)) in placements {
        let trip_chain = trip_chains.get(&agent_id).cloned().unwrap_or_else(TripChain::empty);
        agents.push(PendingAgent {
            agent_id,
            start_tick,
            placement,
            trip_chain,
        });
    }
    agents.sort_by_key(|a| (a.start_tick, a.agent_id.0));
    Ok(agents)
}

// ── agents.csv ────────────────────────────────────────────────────────────────

fn load_placements<R: Read>(
    reader: R,
    clock: &SimClock,
) -> Result<BTreeMap<AgentId, (Tick, Placement)>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut out = BTreeMap::new();
    for result in csv_reader.deserialize::<AgentRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let agent_id = AgentId(row.agent_id);
        let start_tick = clock.tick_for_unix_secs(row.start_time_unix_secs);
        let placement = Placement {
            start_segment: SegmentId(row.start_segment_id),
            start_lane_index: row.start_lane_index,
            segment_start_offset_m: row.segment_start_offset_m,
            initial_speed_mps: row.initial_speed_mps,
        };
        out.insert(agent_id, (start_tick, placement));
    }
    Ok(out)
}

// ── trip_chain.csv ────────────────────────────────────────────────────────────

fn load_trip_chains<R: Read>(reader: R) -> Result<BTreeMap<AgentId, TripChain>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    // agent_id -> item_index -> (kind-specific rows, ordered by leg_index)
    let mut by_agent: BTreeMap<AgentId, BTreeMap<u32, Vec<TripChainRecord>>> = BTreeMap::new();

    for result in csv_reader.deserialize::<TripChainRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        by_agent
            .entry(AgentId(row.agent_id))
            .or_default()
            .entry(row.item_index)
            .or_default()
            .push(row);
    }

    let mut chains = BTreeMap::new();
    for (agent_id, items) in by_agent {
        let mut chain_items = Vec::with_capacity(items.len());
        for (_item_index, mut rows) in items {
            rows.sort_by_key(|r| r.leg_index);
            chain_items.push(build_item(&rows)?);
        }
        chains.insert(agent_id, TripChain::new(chain_items));
    }
    Ok(chains)
}

fn build_item(rows: &[TripChainRecord]) -> Result<TripChainItem, ScheduleError> {
    let first = rows.first().ok_or_else(|| ScheduleError::Parse("empty trip-chain item".to_string()))?;
    match first.kind.trim() {
        "activity" => {
            let destination = parse_destination(&first.destination)?;
            let start_tick = Tick(first.start_tick.ok_or_else(|| {
                ScheduleError::Parse(format!("activity for agent {} missing start_tick", first.agent_id))
            })?);
            let end_tick = Tick(first.end_tick.ok_or_else(|| {
                ScheduleError::Parse(format!("activity for agent {} missing end_tick", first.agent_id))
            })?);
            Ok(TripChainItem::Activity(Activity {
                destination,
                start_tick,
                end_tick,
            }))
        }
        "trip" => {
            let sub_trips = rows
                .iter()
                .map(|r| {
                    Ok(SubTrip {
                        mode: parse_mode(&r.mode)?,
                        origin: parse_destination(&r.origin)?,
                        destination: parse_destination(&r.destination)?,
                    })
                })
                .collect::<Result<Vec<_>, ScheduleError>>()?;
            Ok(TripChainItem::Trip(Trip::new(sub_trips)))
        }
        other => Err(ScheduleError::Parse(format!(
            "unknown trip-chain item kind {other:?}: expected \"activity\" or \"trip\""
        ))),
    }
}

fn parse_destination(s: &str) -> Result<Destination, ScheduleError> {
    match s.trim() {
        "home" => Ok(Destination::Home),
        "work" => Ok(Destination::Work),
        other => other
            .strip_prefix("node:")
            .and_then(|n| n.parse::<u32>().ok())
            .map(|n| Destination::Node(dt_core::NodeId(n)))
            .ok_or_else(|| {
                ScheduleError::Parse(format!(
                    "invalid destination {other:?}: expected \"home\", \"work\", or \"node:<id>\""
                ))
            }),
    }
}

fn parse_mode(s: &str) -> Result<TransportMode, ScheduleError> {
    match s.trim() {
        "car" => Ok(TransportMode::Car),
        "walk" => Ok(TransportMode::Walk),
        "bike" => Ok(TransportMode::Bike),
        "transit" => Ok(TransportMode::Transit),
        other => Err(ScheduleError::Parse(format!(
            "invalid transport mode {other:?}: expected car, walk, bike, or transit"
        ))),
    }
}
