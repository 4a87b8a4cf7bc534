//! `WorkGroup` — spawns one OS thread per `Worker` and owns the channels
//! and `FlexiBarrier`s the coordinator drives them through each macro-step.
//!
//! Three shared barriers (FrameTick, Flip, Aura), each sized
//! `worker_count + 1` — one contribution per Worker plus one for the
//! coordinator, per round (§4.5's `initBarriers`). No other mutable state
//! is shared across threads on the hot path.

use std::any::Any;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use dt_agent::RoleFactory;
use dt_core::WorkerId;
use dt_schedule::PendingAgent;
use dt_spatial::RoadNetwork;

use crate::error::{SimError, SimResult};
use crate::worker::{run_worker, AuraUpdate, WorkerReport};
use dt_buffer::FlexiBarrier;

pub struct WorkGroup {
    worker_count: usize,
    additions_tx: Vec<Sender<PendingAgent>>,
    updates_tx: Vec<Sender<AuraUpdate>>,
    report_rx: Receiver<WorkerReport>,
    pub frame_tick_barrier: Arc<FlexiBarrier>,
    pub flip_barrier: Arc<FlexiBarrier>,
    pub aura_barrier: Arc<FlexiBarrier>,
    handles: Vec<JoinHandle<()>>,
    next_dispatch: usize,
}

impl WorkGroup {
    /// Spawn `worker_count` Worker threads, each running `total_ticks`
    /// macro-steps against its own freshly constructed `RoleFactory`
    /// (built by calling `role_factory_fn` on that Worker's own thread —
    /// `Box<dyn RoleFactory>` need not itself be `Send`, only the
    /// constructor closure is).
    pub fn spawn(
        worker_count: usize,
        total_ticks: u64,
        network: Arc<RoadNetwork>,
        seed: u64,
        role_factory_fn: Arc<dyn Fn() -> Box<dyn RoleFactory> + Send + Sync>,
    ) -> Self {
        let frame_tick_barrier = Arc::new(FlexiBarrier::new(worker_count + 1));
        let flip_barrier = Arc::new(FlexiBarrier::new(worker_count + 1));
        let aura_barrier = Arc::new(FlexiBarrier::new(worker_count + 1));
        let (report_tx, report_rx) = channel::<WorkerReport>();

        let mut additions_tx = Vec::with_capacity(worker_count);
        let mut updates_tx = Vec::with_capacity(worker_count);
        let mut handles = Vec::with_capacity(worker_count);

        for i in 0..worker_count {
            let id = WorkerId(i as u16);
            let (add_tx, add_rx) = channel::<PendingAgent>();
            let (upd_tx, upd_rx) = channel::<AuraUpdate>();
            additions_tx.push(add_tx);
            updates_tx.push(upd_tx);

            let network = network.clone();
            let report_tx = report_tx.clone();
            let role_factory_fn = role_factory_fn.clone();
            let frame_tick_barrier = frame_tick_barrier.clone();
            let flip_barrier = flip_barrier.clone();
            let aura_barrier = aura_barrier.clone();

            let handle = std::thread::Builder::new()
                .name(format!("dt-sim-worker-{i}"))
                .spawn(move || {
                    let role_factory = role_factory_fn();
                    run_worker(
                        id,
                        total_ticks,
                        network,
                        role_factory,
                        seed,
                        add_rx,
                        upd_rx,
                        report_tx,
                        frame_tick_barrier,
                        flip_barrier,
                        aura_barrier,
                    );
                })
                .expect("failed to spawn dt-sim worker thread");
            handles.push(handle);
        }

        Self {
            worker_count,
            additions_tx,
            updates_tx,
            report_rx,
            frame_tick_barrier,
            flip_barrier,
            aura_barrier,
            handles,
            next_dispatch: 0,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Hand each newly-ready agent to a Worker in round-robin order.
    pub fn dispatch(&mut self, agents: Vec<PendingAgent>) {
        for agent in agents {
            let i = self.next_dispatch;
            // A dropped receiver means that worker's thread already died;
            // the panic is surfaced when `join` is called at the end of
            // the run, so a failed send here is silently skipped.
            let _ = self.additions_tx[i].send(agent);
            self.next_dispatch = (i + 1) % self.worker_count;
        }
    }

    /// Publish this macro-step's shared state to every Worker.
    pub fn broadcast(&self, update: AuraUpdate) {
        for tx in &self.updates_tx {
            let _ = tx.send(update.clone());
        }
    }

    /// Block for the next `WorkerReport` to arrive. Returns
    /// `Err(SimError::WorkerDisconnected)` if every sender has been dropped
    /// (all Workers gone).
    pub fn recv_report(&self) -> SimResult<WorkerReport> {
        self.report_rx.recv().map_err(|_| SimError::WorkerDisconnected)
    }

    /// Join every Worker thread. Returns the first panic encountered, if any.
    pub fn join(self) -> SimResult<()> {
        for (i, handle) in self.handles.into_iter().enumerate() {
            if let Err(payload) = handle.join() {
                return Err(SimError::WorkerPanicked(format!(
                    "worker {i}: {}",
                    panic_message(payload.as_ref())
                )));
            }
        }
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
