//! Integration tests for dt-sim. Single-worker tests keep the machinery
//! fast and deterministic; a multi-worker variant proves round-robin
//! dispatch and reporting compose the same way regardless of worker count.

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dt_agent::{
    Activity, Destination, FrameResult, Role, RoleContext, RoleFactory, SubTrip, TripChain,
    TripChainItem,
};
use dt_core::{AgentId, MessageKind, Point2D, SegmentId, SimConfig, Tick, TransportMode};
use dt_schedule::{PendingAgent, Placement};
use dt_spatial::RoadNetwork;

use crate::builder::SimBuilder;
use crate::observer::{NoopObserver, SimObserver};

/// A Role that runs for exactly `ticks_remaining` more `frame_tick` calls
/// before signalling `Done`.
struct CountingRole {
    ticks_remaining: u32,
}

impl Role for CountingRole {
    fn mode(&self) -> TransportMode {
        TransportMode::None
    }

    fn frame_tick(&mut self, _ctx: &RoleContext) -> FrameResult {
        if self.ticks_remaining == 0 {
            FrameResult::Done
        } else {
            self.ticks_remaining -= 1;
            FrameResult::Continue
        }
    }
}

struct CountingRoleFactory {
    ticks_per_item: u32,
}

impl RoleFactory for CountingRoleFactory {
    fn create_role(
        &self,
        _agent: AgentId,
        _item: &TripChainItem,
        _sub_trip: Option<&SubTrip>,
        _position: &Rc<dt_buffer::DoubleBuffered<Point2D>>,
    ) -> Box<dyn Role> {
        Box::new(CountingRole {
            ticks_remaining: self.ticks_per_item,
        })
    }
}

fn flat_network() -> RoadNetwork {
    RoadNetwork::empty()
}

fn placement() -> Placement {
    Placement {
        start_segment: SegmentId(0),
        start_lane_index: 0,
        segment_start_offset_m: 0.0,
        initial_speed_mps: 0.0,
    }
}

fn single_activity_chain(ticks: u32) -> TripChain {
    TripChain::new(vec![TripChainItem::Activity(Activity {
        destination: Destination::Home,
        start_tick: Tick::ZERO,
        end_tick: Tick(ticks as u64),
    })])
}

fn pending_agent(id: u32, start_tick: u64, ticks_alive: u32) -> PendingAgent {
    PendingAgent {
        agent_id: AgentId(id),
        start_tick: Tick(start_tick),
        placement: placement(),
        trip_chain: single_activity_chain(ticks_alive),
    }
}

fn config(worker_count: usize, total_ticks: u64) -> SimConfig {
    SimConfig {
        start_unix_secs: 0,
        tick_duration_secs: 1,
        total_ticks,
        seed: 42,
        num_threads: None,
        output_interval_ticks: 1,
        worker_count,
        tick_step: 1,
        signal_voting_window: 5,
    }
}

#[test]
fn single_worker_runs_agents_to_completion() {
    let sim = SimBuilder::new()
        .config(config(1, 5))
        .network(flat_network())
        .role_factory(|| Box::new(CountingRoleFactory { ticks_per_item: 2 }))
        .agents(vec![pending_agent(0, 0, 2), pending_agent(1, 0, 2)])
        .build()
        .expect("build sim");

    sim.run(&mut NoopObserver).expect("run to completion");
}

#[test]
fn multi_worker_round_robin_dispatch_completes() {
    let agents: Vec<PendingAgent> = (0..8).map(|i| pending_agent(i, 0, 1)).collect();

    let sim = SimBuilder::new()
        .config(config(3, 4))
        .network(flat_network())
        .role_factory(|| Box::new(CountingRoleFactory { ticks_per_item: 1 }))
        .agents(agents)
        .build()
        .expect("build sim");

    sim.run(&mut NoopObserver).expect("run to completion");
}

#[test]
fn late_start_agent_stays_pending_until_its_tick() {
    // Agent 0 is ready immediately; agent 1 doesn't start until tick 3.
    // Total ticks must cover both so neither Worker thread outlives its
    // configured loop count.
    let sim = SimBuilder::new()
        .config(config(1, 6))
        .network(flat_network())
        .role_factory(|| Box::new(CountingRoleFactory { ticks_per_item: 1 }))
        .agents(vec![pending_agent(0, 0, 1), pending_agent(1, 3, 1)])
        .build()
        .expect("build sim");

    sim.run(&mut NoopObserver).expect("run to completion");
}

struct SnapshotObserver {
    seen_positions: Arc<AtomicUsize>,
}

impl SimObserver for SnapshotObserver {
    fn on_snapshot(&mut self, _tick: Tick, positions: &[(AgentId, Point2D)]) {
        if !positions.is_empty() {
            self.seen_positions.fetch_add(positions.len(), Ordering::SeqCst);
        }
    }
}

#[test]
fn observer_receives_non_empty_snapshots() {
    let seen = Arc::new(AtomicUsize::new(0));
    let mut observer = SnapshotObserver {
        seen_positions: seen.clone(),
    };

    let sim = SimBuilder::new()
        .config(config(2, 4))
        .network(flat_network())
        .role_factory(|| Box::new(CountingRoleFactory { ticks_per_item: 3 }))
        .agents(vec![pending_agent(0, 0, 3), pending_agent(1, 0, 3)])
        .build()
        .expect("build sim");

    sim.run(&mut observer).expect("run to completion");
    assert!(seen.load(Ordering::SeqCst) > 0);
}

#[test]
fn queued_message_is_delivered_next_tick() {
    struct EchoRole {
        received: Arc<AtomicUsize>,
    }

    impl Role for EchoRole {
        fn mode(&self) -> TransportMode {
            TransportMode::None
        }

        fn frame_tick(&mut self, _ctx: &RoleContext) -> FrameResult {
            FrameResult::Continue
        }

        fn on_message(&mut self, _msg: &MessageKind, _ctx: &RoleContext) {
            self.received.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct EchoRoleFactory {
        received: Arc<AtomicUsize>,
    }

    impl RoleFactory for EchoRoleFactory {
        fn create_role(
            &self,
            _agent: AgentId,
            _item: &TripChainItem,
            _sub_trip: Option<&SubTrip>,
            _position: &Rc<dt_buffer::DoubleBuffered<Point2D>>,
        ) -> Box<dyn Role> {
            Box::new(EchoRole {
                received: self.received.clone(),
            })
        }
    }

    let received = Arc::new(AtomicUsize::new(0));
    let received_for_factory = received.clone();

    let mut sim = SimBuilder::new()
        .config(config(1, 3))
        .network(flat_network())
        .role_factory(move || {
            Box::new(EchoRoleFactory {
                received: received_for_factory.clone(),
            })
        })
        .agents(vec![pending_agent(0, 0, 3)])
        .build()
        .expect("build sim");

    sim.queue_message(AgentId(0), MessageKind::CommsimEnabled { agent: AgentId(0) });
    sim.run_ticks(3, &mut NoopObserver).expect("run ticks");

    assert_eq!(received.load(Ordering::SeqCst), 1);
}
