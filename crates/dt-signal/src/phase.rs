//! `Phase` — one stage of a signal's cycle, owning a link-mapping and a
//! crossing-mapping, each publishing its own color timeline.
//!
//! Grounded on the original `Phase` class (`percentage`, `phaseOffset`,
//! `phaseLength`, `links_map_`, `crossings_map_`), translated from a
//! mutable-in-place C++ object into a value type recomputed by
//! [`update`](Phase::update) whenever the enclosing
//! [`SplitPlan`](crate::split_plan::SplitPlan) changes the cycle length or
//! the plan's percentages.

use std::rc::Rc;

use dt_buffer::DoubleBuffered;
use dt_core::{CrossingId, TurningId};

use crate::color::{Color, ColorSequence};
use crate::SignalResult;

/// A link→link right-of-way mapping within a phase: the turnings it grants
/// green time to, plus its own published color timeline (`currColor` in
/// the original).
#[derive(Clone, Debug)]
pub struct LinkMapping {
    pub turnings: Vec<TurningId>,
    pub color_sequence: ColorSequence,
    pub curr_color: Rc<DoubleBuffered<Color>>,
}

impl LinkMapping {
    pub fn new(turnings: Vec<TurningId>) -> Self {
        Self {
            turnings,
            color_sequence: ColorSequence::default(),
            curr_color: Rc::new(DoubleBuffered::new(Color::Red)),
        }
    }
}

/// A pedestrian-crossing mapping within a phase, kept separate from
/// [`LinkMapping`] because its color timeline uses the one-third
/// Green / two-thirds FlashingGreen split instead of a plain Green.
#[derive(Clone, Debug)]
pub struct CrossingMapping {
    pub crossing: CrossingId,
    pub color_sequence: ColorSequence,
    pub curr_color: Rc<DoubleBuffered<Color>>,
}

impl CrossingMapping {
    pub fn new(crossing: CrossingId) -> Self {
        Self {
            crossing,
            color_sequence: ColorSequence::default(),
            curr_color: Rc::new(DoubleBuffered::new(Color::Red)),
        }
    }
}

/// One stage of a traffic signal's cycle.
#[derive(Clone, Debug)]
pub struct Phase {
    pub name: String,
    /// Share of the cycle allotted to this phase, 0.0-100.0.
    pub percentage: f32,
    /// Offset from the start of the cycle, in milliseconds. Set by
    /// [`SplitPlan::update_curr_split_plan`](crate::split_plan::SplitPlan::update_curr_split_plan)
    /// from the cumulative percentage of all preceding phases.
    pub phase_offset_ms: u32,
    /// Absolute duration of this phase within the current cycle, in
    /// milliseconds. Recomputed by [`update`](Self::update).
    pub phase_length_ms: u32,
    /// Link→link mappings granted right-of-way while this phase is active.
    pub links: Vec<LinkMapping>,
    /// Pedestrian-crossing mappings active during this phase.
    pub crossings: Vec<CrossingMapping>,
}

impl Phase {
    /// `green_turnings` becomes a single [`LinkMapping`] (the common case:
    /// one approach's turnings per phase); add crossings afterwards with
    /// [`with_crossings`](Self::with_crossings).
    pub fn new(name: impl Into<String>, percentage: f32, green_turnings: Vec<TurningId>) -> Self {
        let links = if green_turnings.is_empty() {
            Vec::new()
        } else {
            vec![LinkMapping::new(green_turnings)]
        };
        Self {
            name: name.into(),
            percentage,
            phase_offset_ms: 0,
            phase_length_ms: 0,
            links,
            crossings: Vec::new(),
        }
    }

    pub fn with_crossings(mut self, crossings: Vec<CrossingId>) -> Self {
        self.crossings = crossings.into_iter().map(CrossingMapping::new).collect();
        self
    }

    pub fn set_percentage(&mut self, percentage: f32) {
        self.percentage = percentage;
    }

    pub fn set_phase_offset(&mut self, offset_ms: u32) {
        self.phase_offset_ms = offset_ms;
    }

    /// Recompute `phase_length_ms` from `percentage` and the cycle's total
    /// length, then rebuild every link- and crossing-mapping's color
    /// timeline from the green-time derivation (SPEC_FULL.md §4.9):
    /// `phaseLength` minus the fixed `amber_ms` and `all_red_ms` becomes
    /// Green for link-mappings, or the one-third/two-thirds Green/
    /// FlashingGreen split for crossing-mappings.
    pub fn update(&mut self, cycle_length_ms: u32, amber_ms: u32, all_red_ms: u32) {
        self.phase_length_ms = self.calculate_phase_length(cycle_length_ms);
        let green_ms = self.phase_length_ms.saturating_sub(amber_ms + all_red_ms);
        for link in &mut self.links {
            link.color_sequence = ColorSequence::standard(green_ms, amber_ms, self.phase_length_ms);
        }
        for crossing in &mut self.crossings {
            crossing.color_sequence =
                ColorSequence::crossing(green_ms, amber_ms, self.phase_length_ms);
        }
    }

    pub fn calculate_phase_length(&self, cycle_length_ms: u32) -> u32 {
        ((self.percentage / 100.0) * cycle_length_ms as f32).round() as u32
    }

    /// `true` if `elapsed_ms` (since the cycle started) falls within this
    /// phase's window.
    pub fn is_active(&self, elapsed_ms: u32) -> bool {
        elapsed_ms >= self.phase_offset_ms
            && elapsed_ms < self.phase_offset_ms + self.phase_length_ms
    }

    pub fn grants(&self, turning: TurningId) -> bool {
        self.links.iter().any(|l| l.turnings.contains(&turning))
    }

    /// Recompute every mapping's `currColor` for `currCycleTimer` (the
    /// `lapse = currCycleTimer - phaseOffset` step of SPEC_FULL.md §4.9).
    /// A negative lapse (this phase hasn't started yet this cycle) leaves
    /// the previously published colors untouched.
    pub fn update_colors(&self, curr_cycle_timer_ms: u32) -> SignalResult<()> {
        let lapse = curr_cycle_timer_ms as i64 - self.phase_offset_ms as i64;
        if lapse < 0 {
            return Ok(());
        }
        let lapse = lapse as u32;
        for link in &self.links {
            link.curr_color.set(link.color_sequence.color_at(lapse)?);
        }
        for crossing in &self.crossings {
            crossing
                .curr_color
                .set(crossing.color_sequence.color_at(lapse)?);
        }
        Ok(())
    }
}

/// Sum of every phase's `percentage` — should be ~100.0 for a well-formed
/// split plan; callers use this to sanity-check loaded configuration.
pub fn compute_total_g(phases: &[Phase]) -> f32 {
    phases.iter().map(|p| p.percentage).sum()
}
