//! `SplitPlan` — adaptive selection of which green-time allocation
//! ("split plan") a signal's phases use, driven by observed demand.
//!
//! Grounded on the original `SplitPlan` class's algorithm:
//! `Vote` accumulates a degree-of-saturation (DS) observation per phase;
//! once a voting window elapses, `calMaxProDS` scores every candidate
//! plan in the choice set, `findNextPlanIndex`/`fmin_ID` pick the best
//! scorer, `getMaxVote` resolves ties across the accumulated vote tally,
//! and `updatecurrSplitPlan` applies the winning plan's percentages to
//! the phases before the next cycle starts.
//!
//! The cycle-length side of the original `Update` method delegated to a
//! `Cycle` class that is not present in the available source; see
//! SPEC_FULL.md §4.9 for the replacement formula used by
//! [`cycle_length_for_ds`].

use dt_core::TurningId;

use crate::phase::{compute_total_g, Phase};
use crate::{SignalError, SignalResult};

/// Default amber duration applied uniformly to every phase.
const DEFAULT_AMBER_MS: u32 = 3_000;
/// Default all-red clearance interval applied uniformly to every phase.
const DEFAULT_ALL_RED_MS: u32 = 1_000;

/// Adaptive split-plan controller for one signalized intersection.
pub struct SplitPlan {
    phases: Vec<Phase>,
    /// Each entry is a candidate allocation: one percentage per phase,
    /// summing to ~100.0.
    choice_set: Vec<Vec<f32>>,
    current_plan_index: usize,
    votes: Vec<u32>,
    ds_accum: Vec<f32>,
    vote_count: usize,
    voting_window: usize,
    cycle_length_ms: u32,
    cycle_length_min_ms: u32,
    cycle_length_max_ms: u32,
}

impl SplitPlan {
    /// Construct a controller, validate the choice set's shape, and apply
    /// `choice_set[default_plan_index]` as the initial plan (`initialize`
    /// in the original).
    pub fn new(
        phases: Vec<Phase>,
        choice_set: Vec<Vec<f32>>,
        default_plan_index: usize,
        voting_window: usize,
        cycle_length_min_ms: u32,
        cycle_length_max_ms: u32,
    ) -> SignalResult<Self> {
        if phases.is_empty() {
            return Err(SignalError::NoPhases);
        }
        if choice_set.is_empty() {
            return Err(SignalError::EmptyChoiceSet);
        }
        for choice in &choice_set {
            if choice.len() != phases.len() {
                return Err(SignalError::ChoiceSetShapeMismatch {
                    got: choice.len(),
                    expected: phases.len(),
                });
            }
        }

        let n_phases = phases.len();
        let n_choices = choice_set.len();
        let mut plan = Self {
            phases,
            choice_set,
            current_plan_index: default_plan_index.min(n_choices - 1),
            votes: vec![0; n_choices],
            ds_accum: vec![0.0; n_phases],
            vote_count: 0,
            voting_window: voting_window.max(1),
            cycle_length_ms: cycle_length_min_ms,
            cycle_length_min_ms,
            cycle_length_max_ms,
        };
        plan.update_curr_split_plan();
        Ok(plan)
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn current_plan_index(&self) -> usize {
        self.current_plan_index
    }

    pub fn cycle_length_ms(&self) -> u32 {
        self.cycle_length_ms
    }

    pub fn curr_split_plan(&self) -> &[f32] {
        &self.choice_set[self.current_plan_index]
    }

    /// Which phase is active `elapsed_ms` into the current cycle.
    pub fn compute_curr_phase(&self, elapsed_ms: u32) -> usize {
        let t = elapsed_ms % self.cycle_length_ms.max(1);
        self.phases
            .iter()
            .position(|p| p.is_active(t))
            .unwrap_or(0)
    }

    /// `true` if `turning` currently has right-of-way.
    pub fn grants(&self, turning: TurningId, elapsed_ms: u32) -> bool {
        self.phases[self.compute_curr_phase(elapsed_ms)].grants(turning)
    }

    /// Record one DS observation per phase (`Vote` in the original).
    /// Every `voting_window` calls, resolves the accumulated votes into a
    /// (possibly new) current plan and cycle length.
    pub fn vote(&mut self, ds_per_phase: &[f32]) -> SignalResult<()> {
        if ds_per_phase.len() != self.phases.len() {
            return Err(SignalError::DsShapeMismatch {
                got: ds_per_phase.len(),
                expected: self.phases.len(),
            });
        }
        for (acc, &ds) in self.ds_accum.iter_mut().zip(ds_per_phase) {
            *acc += ds;
        }
        self.vote_count += 1;

        if self.vote_count >= self.voting_window {
            let ds_avg: Vec<f32> = self
                .ds_accum
                .iter()
                .map(|&s| s / self.vote_count as f32)
                .collect();

            let next_idx = self.find_next_plan_index(&ds_avg);
            self.votes[next_idx] += 1;
            self.current_plan_index = self.get_max_vote();

            let ds_all = ds_avg.iter().cloned().fold(0.0f32, f32::max);
            self.cycle_length_ms = cycle_length_for_ds(
                ds_all,
                self.cycle_length_min_ms,
                self.cycle_length_max_ms,
            );
            self.update_curr_split_plan();

            self.ds_accum.iter_mut().for_each(|a| *a = 0.0);
            self.vote_count = 0;
        }
        Ok(())
    }

    /// `calMaxProDS`: for a candidate `choice`, the worst (maximum)
    /// projected demand-to-capacity ratio across phases, projecting each
    /// phase's observed DS from the current plan's allocation onto
    /// `choice`'s allocation: `ds[j] * current[j] / choice[j]`. Lower is
    /// better: it means no phase in this plan would be starved relative
    /// to what it's observed to need under the plan actually running now.
    fn cal_max_pro_ds(choice: &[f32], ds: &[f32], current_choice: &[f32]) -> f32 {
        choice
            .iter()
            .zip(ds)
            .zip(current_choice)
            .map(|((&pct, &d), &curr_pct)| {
                let share = pct.max(1e-6);
                d * curr_pct / share
            })
            .fold(f32::MIN, f32::max)
    }

    /// `findNextPlanIndex` / `fmin_ID`: the choice-set index with the
    /// smallest `calMaxProDS`, ties broken toward the lowest index.
    fn find_next_plan_index(&self, ds: &[f32]) -> usize {
        let current_choice = &self.choice_set[self.current_plan_index];
        self.choice_set
            .iter()
            .map(|choice| Self::cal_max_pro_ds(choice, ds, current_choice))
            .enumerate()
            .fold((0, f32::MAX), |(best_i, best_v), (i, v)| {
                if v < best_v {
                    (i, v)
                } else {
                    (best_i, best_v)
                }
            })
            .0
    }

    /// `getMaxVote`: the plan with the most accumulated votes, ties
    /// broken toward the lowest index.
    fn get_max_vote(&self) -> usize {
        self.votes
            .iter()
            .enumerate()
            .fold((0, 0u32), |(best_i, best_v), (i, &v)| {
                if v > best_v {
                    (i, v)
                } else {
                    (best_i, best_v)
                }
            })
            .0
    }

    /// Apply the current plan's percentages to `phases`, recompute each
    /// phase's length and offset from the cycle length (`Update` on
    /// `Phase` in the original), and rebuild each phase's mapping color
    /// timelines.
    fn update_curr_split_plan(&mut self) {
        let plan = self.choice_set[self.current_plan_index].clone();
        let cycle_length_ms = self.cycle_length_ms;
        let mut offset = 0u32;
        for (phase, &pct) in self.phases.iter_mut().zip(&plan) {
            phase.set_percentage(pct);
            phase.set_phase_offset(offset);
            phase.update(cycle_length_ms, DEFAULT_AMBER_MS, DEFAULT_ALL_RED_MS);
            offset += phase.phase_length_ms;
        }
        let total_g = compute_total_g(&self.phases);
        if (total_g - 100.0).abs() > 0.5 {
            log::warn!("split plan's phase percentages sum to {total_g}, expected ~100");
        }
    }

    pub fn set_default_split_plan(&mut self, index: usize) {
        self.current_plan_index = index.min(self.choice_set.len() - 1);
        self.update_curr_split_plan();
    }

    pub fn default_amber_ms() -> u32 {
        DEFAULT_AMBER_MS
    }
}

/// Resolves §9's cycle-length open question: the original `Cycle` class
/// referenced by `SplitPlan::Update` is absent from the available source,
/// so the mapping from aggregate demand (`ds_all`, the worst per-phase DS
/// this voting window) to cycle length is this documented monotone linear
/// schedule rather than a guess at missing logic.
///
/// `ds_all` is clamped to `[0.0, 1.0]` before interpolating between
/// `min_ms` and `max_ms`.
pub fn cycle_length_for_ds(ds_all: f32, min_ms: u32, max_ms: u32) -> u32 {
    let ds = ds_all.clamp(0.0, 1.0);
    let span = max_ms.saturating_sub(min_ms) as f32;
    (min_ms as f32 + ds * span).round() as u32
}
