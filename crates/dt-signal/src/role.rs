//! `SignalControllerRole` — wraps a [`SplitPlan`] as a `dt_agent::Role` so a
//! signalized intersection can be driven by the same per-tick dispatch as
//! any traveling agent.
//!
//! Grounded on the original `Signal`/`Agent` relationship: in the source
//! engine a traffic signal is itself an `Agent` subtype updated every tick
//! alongside vehicles and pedestrians, rather than a passive lookup table
//! the road network consults. Modeling it as a `Role` keeps that symmetry:
//! the coordinator doesn't need a separate signal-update pass, and a
//! signal's `SplitPlan` is free to react to `MessageKind::Custom` demand
//! observations the same way any other Role reacts to messages.

use std::rc::Rc;

use dt_agent::{FrameResult, Role, RoleContext};
use dt_buffer::BufferedField;
use dt_core::{MessageKind, NodeId, TransportMode};

use crate::split_plan::SplitPlan;

/// Message tag used by upstream demand-observation producers (typically
/// `dt-mobility`'s lane-queue sampler) to deliver one degree-of-saturation
/// reading per phase via `MessageKind::Custom`.
pub const DS_OBSERVATION_TAG: u32 = 0xD5_0B5_001;

/// A signalized intersection, driven by its `SplitPlan` every tick.
///
/// `cycle_ds_accum`/`cycle_ds_count` accumulate DS observations received
/// during the cycle currently in progress; `frame_tick` averages and feeds
/// them to `plan.vote()` exactly once, on cycle-timer wraparound
/// (SPEC_FULL.md §4.9: "on wraparound, end-of-cycle processing runs" —
/// driven by the cycle clock, not by how many messages happened to arrive
/// during it).
pub struct SignalControllerRole {
    pub intersection: NodeId,
    plan: SplitPlan,
    elapsed_ms: u32,
    tick_duration_ms: u32,
    cycle_ds_accum: Vec<f32>,
    cycle_ds_count: usize,
}

impl SignalControllerRole {
    pub fn new(intersection: NodeId, plan: SplitPlan, tick_duration_ms: u32) -> Self {
        let phase_count = plan.phases().len();
        Self {
            intersection,
            plan,
            elapsed_ms: 0,
            tick_duration_ms: tick_duration_ms.max(1),
            cycle_ds_accum: vec![0.0; phase_count],
            cycle_ds_count: 0,
        }
    }

    pub fn plan(&self) -> &SplitPlan {
        &self.plan
    }

    /// Decode a `DS_OBSERVATION_TAG` payload: one little-endian `f32` per
    /// phase, in phase order.
    fn decode_ds_payload(payload: &[u8], phase_count: usize) -> Option<Vec<f32>> {
        if payload.len() != phase_count * 4 {
            return None;
        }
        Some(
            payload
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    /// Recompute every phase's mapping colors for the current cycle-timer
    /// position (`lapse = currCycleTimer - phaseOffset` per SPEC_FULL.md
    /// §4.9). A malformed color sequence (§7 kind 5) is logged and that
    /// mapping simply holds its last published color.
    fn update_colors(&self) {
        for phase in self.plan.phases() {
            if let Err(err) = phase.update_colors(self.elapsed_ms) {
                log::warn!(
                    "signal at {:?} phase {:?}: {err}; holding last color",
                    self.intersection,
                    phase.name
                );
            }
        }
    }

    /// End-of-cycle processing: average the DS observed this cycle (zero
    /// for any phase that received none), feed it to the split-plan vote,
    /// then reset the accumulator for the next cycle.
    fn end_of_cycle(&mut self) {
        let divisor = self.cycle_ds_count.max(1) as f32;
        let ds_avg: Vec<f32> = self
            .cycle_ds_accum
            .iter()
            .map(|&sum| sum / divisor)
            .collect();
        if let Err(err) = self.plan.vote(&ds_avg) {
            log::warn!(
                "signal at {:?} failed end-of-cycle split-plan selection: {err}",
                self.intersection
            );
        }
        self.cycle_ds_accum.iter_mut().for_each(|a| *a = 0.0);
        self.cycle_ds_count = 0;
    }
}

impl Role for SignalControllerRole {
    fn mode(&self) -> TransportMode {
        TransportMode::None
    }

    fn subscription_list(&self) -> Vec<Rc<dyn BufferedField>> {
        let mut fields: Vec<Rc<dyn BufferedField>> = Vec::new();
        for phase in self.plan.phases() {
            for link in &phase.links {
                fields.push(link.curr_color.clone());
            }
            for crossing in &phase.crossings {
                fields.push(crossing.curr_color.clone());
            }
        }
        fields
    }

    fn frame_tick(&mut self, _ctx: &RoleContext) -> FrameResult {
        let cycle_length_ms = self.plan.cycle_length_ms().max(1);
        let next_elapsed_ms = self.elapsed_ms + self.tick_duration_ms;
        let wrapped = next_elapsed_ms >= cycle_length_ms;
        self.elapsed_ms = if wrapped {
            next_elapsed_ms % cycle_length_ms
        } else {
            next_elapsed_ms
        };

        if wrapped {
            self.end_of_cycle();
        }
        self.update_colors();

        FrameResult::Continue
    }

    fn on_message(&mut self, msg: &MessageKind, _ctx: &RoleContext) {
        if let MessageKind::Custom { tag, payload } = msg {
            if *tag == DS_OBSERVATION_TAG {
                match Self::decode_ds_payload(payload, self.plan.phases().len()) {
                    Some(ds) => {
                        for (acc, d) in self.cycle_ds_accum.iter_mut().zip(&ds) {
                            *acc += d;
                        }
                        self.cycle_ds_count += 1;
                    }
                    None => log::warn!(
                        "signal at {:?} received a malformed DS observation",
                        self.intersection
                    ),
                }
            }
        }
    }
}
