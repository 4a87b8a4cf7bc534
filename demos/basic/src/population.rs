//! Builds the demo's 8-agent commuter population: each agent alternates
//! between a home activity, a car trip to work, a work activity, and a car
//! trip back home, repeated for every simulated day.

use rustc_hash::FxHashMap;

use dt_agent::{Activity, Destination, SubTrip, Trip, TripChain, TripChainItem};
use dt_core::{AgentId, NodeId, SegmentId, Tick, TransportMode};
use dt_schedule::{Placement, PendingAgent};
use dt_spatial::RoadNetwork;

pub const AGENT_COUNT: usize = 8;

/// Assign the first 5 agents to the north/downtown pair and the rest to
/// the south/commerce-park pair, mirroring a two-neighborhood commute.
pub fn assign_homes_and_works(
    north_residential: NodeId,
    south_residential: NodeId,
    downtown: NodeId,
    commerce_park: NodeId,
) -> (FxHashMap<AgentId, NodeId>, FxHashMap<AgentId, NodeId>) {
    let mut homes = FxHashMap::default();
    let mut works = FxHashMap::default();
    for i in 0..AGENT_COUNT {
        let agent = AgentId(i as u32);
        if i < 5 {
            homes.insert(agent, north_residential);
            works.insert(agent, downtown);
        } else {
            homes.insert(agent, south_residential);
            works.insert(agent, commerce_park);
        }
    }
    (homes, works)
}

/// One [home, commute, work, commute] cycle per simulated day; the final
/// activity's `end_tick` is clamped to `total_ticks` so every agent's trip
/// chain finishes exactly when the run does.
fn build_trip_chain(sim_days: u64, total_ticks: u64) -> TripChain {
    let mut items = Vec::new();
    for day in 0..sim_days {
        let base = day * 24;
        items.push(TripChainItem::Activity(Activity {
            destination: Destination::Home,
            start_tick: Tick(base),
            end_tick: Tick(base + 8),
        }));
        items.push(TripChainItem::Trip(Trip::new(vec![SubTrip {
            mode: TransportMode::Car,
            origin: Destination::Home,
            destination: Destination::Work,
        }])));
        items.push(TripChainItem::Activity(Activity {
            destination: Destination::Work,
            start_tick: Tick(base + 9),
            end_tick: Tick(base + 17),
        }));
        items.push(TripChainItem::Trip(Trip::new(vec![SubTrip {
            mode: TransportMode::Car,
            origin: Destination::Work,
            destination: Destination::Home,
        }])));
        let evening_end = (base + 24).min(total_ticks);
        items.push(TripChainItem::Activity(Activity {
            destination: Destination::Home,
            start_tick: Tick(base + 18),
            end_tick: Tick(evening_end),
        }));
    }
    TripChain::new(items)
}

/// Place an agent at the start of the first outgoing segment of its home
/// node — any segment works since `TravelRole` republishes the position at
/// the origin node the moment the first `Trip` begins.
fn home_placement(network: &RoadNetwork, home: NodeId) -> Placement {
    let start_segment = network.out_segments(home).next().unwrap_or(SegmentId(0));
    Placement {
        start_segment,
        start_lane_index: 0,
        segment_start_offset_m: 0.0,
        initial_speed_mps: 0.0,
    }
}

pub fn build_population(
    network: &RoadNetwork,
    homes: &FxHashMap<AgentId, NodeId>,
    sim_days: u64,
    total_ticks: u64,
) -> Vec<PendingAgent> {
    (0..AGENT_COUNT)
        .map(|i| {
            let agent_id = AgentId(i as u32);
            let home = homes[&agent_id];
            PendingAgent {
                agent_id,
                start_tick: Tick::ZERO,
                placement: home_placement(network, home),
                trip_chain: build_trip_chain(sim_days, total_ticks),
            }
        })
        .collect()
}
