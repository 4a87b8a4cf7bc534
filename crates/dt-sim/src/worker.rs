//! `Worker` — owns a disjoint slice of the agent population for the whole
//! run and drives it through one macro-step per round: Tick, Flip, Aura.
//!
//! A Worker never reaches into another Worker's agents and is never handed
//! an `Agent` built by anyone else; the only things that cross the thread
//! boundary are the plain-data types below (`PendingAgent`, `AuraUpdate`,
//! `WorkerReport`) and a fresh `Box<dyn RoleFactory>` the Worker builds for
//! itself at startup.

use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use dt_agent::{Agent, AgentStore, RoleContext, RoleFactory};
use dt_buffer::buffered::set_current_phase;
use dt_buffer::{DoubleBuffered, FlexiBarrier, FlipSet, Phase};
use dt_core::{AgentId, AgentRng, MessageKind, Point2D, SimClock, WorkerId};
use dt_schedule::{PendingAgent, Placement};
use dt_spatial::{RoadNetwork, SpatialIndex};

/// Shared state the coordinator publishes to every Worker once per
/// macro-step, after the previous round's Aura phase completes.
#[derive(Clone)]
pub struct AuraUpdate {
    pub aura: Arc<SpatialIndex>,
    pub clock: SimClock,
    pub messages: Arc<Vec<(AgentId, MessageKind)>>,
}

/// What a Worker reports back to the coordinator once its Flip phase is done.
pub struct WorkerReport {
    pub worker: WorkerId,
    pub positions: Vec<(AgentId, Point2D)>,
    pub done: Vec<AgentId>,
}

/// The Worker thread's entry point. Runs exactly `total_ticks` macro-steps,
/// then returns — both the Worker and the coordinator know this count up
/// front, so no shutdown message is needed.
#[allow(clippy::too_many_arguments)]
pub fn run_worker(
    id: WorkerId,
    total_ticks: u64,
    network: Arc<RoadNetwork>,
    role_factory: Box<dyn RoleFactory>,
    seed: u64,
    additions_rx: Receiver<PendingAgent>,
    updates_rx: Receiver<AuraUpdate>,
    report_tx: Sender<WorkerReport>,
    frame_tick_barrier: Arc<FlexiBarrier>,
    flip_barrier: Arc<FlexiBarrier>,
    aura_barrier: Arc<FlexiBarrier>,
) {
    let role_factory: Rc<dyn RoleFactory> = Rc::from(role_factory);
    let mut store = AgentStore::new();

    for _ in 0..total_ticks {
        set_current_phase(Phase::Tick);

        let update = match updates_rx.recv() {
            Ok(update) => update,
            Err(_) => {
                log::warn!("worker {id:?}: coordinator dropped, stopping early");
                return;
            }
        };

        while let Ok(pending) = additions_rx.try_recv() {
            insert_pending_agent(&mut store, pending, &network, &role_factory, seed, &update);
        }

        let messages_by_agent = index_messages(&update.messages);

        for agent in store.iter_mut() {
            let ctx = RoleContext {
                agent: agent.id,
                clock: &update.clock,
                network: &network,
                aura: &update.aura,
            };
            if let Some(msgs) = messages_by_agent.get(&agent.id) {
                for msg in msgs {
                    agent.role_mut().on_message(msg, &ctx);
                }
            }
            agent.frame_tick(&ctx);
        }

        frame_tick_barrier.wait();

        // ── Flip phase ──────────────────────────────────────────────────
        set_current_phase(Phase::Flip);

        // `dt-buffer`'s FlipSet has no per-field removal, so it's rebuilt
        // fresh every round from whichever Roles are actually subscribed
        // right now rather than incrementally maintained.
        let mut flip_set = FlipSet::new();
        for agent in store.iter() {
            flip_set.subscribe_all(agent.role().subscription_list());
            if let Some(prev) = agent.prev_role() {
                flip_set.subscribe_all(prev.subscription_list());
            }
        }
        flip_set.flip_all();

        let positions: Vec<(AgentId, Point2D)> =
            store.iter().map(|agent| (agent.id, agent.position.get())).collect();
        let done = store.remove_done();

        if report_tx
            .send(WorkerReport {
                worker: id,
                positions,
                done,
            })
            .is_err()
        {
            log::warn!("worker {id:?}: coordinator's report channel closed, stopping early");
            return;
        }

        flip_barrier.wait();

        // ── Aura phase ──────────────────────────────────────────────────
        //
        // Nothing to do locally; this barrier just holds every Worker
        // until the coordinator has finished folding all reports into the
        // next `SpatialIndex` and is ready to publish it.
        set_current_phase(Phase::Aura);
        aura_barrier.wait();
    }
}

/// Build a real `Agent` from a `PendingAgent` the coordinator just staged
/// in, and run its `frame_init` once — `Agent` itself only calls
/// `frame_init` on a role swap, never for the very first one.
fn insert_pending_agent(
    store: &mut AgentStore,
    pending: PendingAgent,
    network: &RoadNetwork,
    role_factory: &Rc<dyn RoleFactory>,
    seed: u64,
    update: &AuraUpdate,
) {
    let PendingAgent {
        agent_id,
        placement,
        trip_chain,
        ..
    } = pending;

    let Some(item) = trip_chain.current_item().cloned() else {
        log::warn!("agent {agent_id:?} has an empty trip chain; not inserting it");
        return;
    };
    let sub_trip = trip_chain.current_sub_trip().cloned();
    let position = Rc::new(DoubleBuffered::new(resolve_initial_position(network, &placement)));
    let role = role_factory.create_role(agent_id, &item, sub_trip.as_ref(), &position);

    let mut agent = Agent::new(
        agent_id,
        position,
        AgentRng::new(seed, agent_id),
        trip_chain,
        role,
        role_factory.clone(),
    );

    let ctx = RoleContext {
        agent: agent.id,
        clock: &update.clock,
        network,
        aura: &update.aura,
    };
    agent.role_mut().frame_init(&ctx);

    store.insert(agent);
}

/// Place an agent along its starting segment, interpolating linearly
/// between the segment's endpoints by `segment_start_offset_m` — the same
/// straight-line approximation `dt-mobility::RouteProgress` uses mid-route,
/// since `RoadNetwork` carries no poly-lines.
fn resolve_initial_position(network: &RoadNetwork, placement: &Placement) -> Point2D {
    let segment = placement.start_segment;
    if segment.index() >= network.segment_count() {
        return Point2D::ZERO;
    }
    let from = network.node_pos[network.segment_from[segment.index()].index()];
    let to = network.node_pos[network.segment_to[segment.index()].index()];
    let length = network.segment_length_m[segment.index()];
    if length <= 0.0 {
        return from;
    }
    let t = (placement.segment_start_offset_m / length).clamp(0.0, 1.0);
    from + (to - from) * t
}

fn index_messages(messages: &[(AgentId, MessageKind)]) -> FxHashMap<AgentId, Vec<&MessageKind>> {
    let mut by_agent: FxHashMap<AgentId, Vec<&MessageKind>> = FxHashMap::default();
    for (agent, msg) in messages {
        by_agent.entry(*agent).or_default().push(msg);
    }
    by_agent
}
