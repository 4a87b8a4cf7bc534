//! Signal colors and per-mapping color timelines.

use crate::{SignalError, SignalResult};

/// The right-of-way state of one link- or crossing-mapping at an instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    Red,
    Amber,
    Green,
    FlashingRed,
    FlashingAmber,
    FlashingGreen,
}

/// A repeating color timeline within one phase, expressed as `(color,
/// duration_ms)` segments summing to the phase length.
#[derive(Clone, Debug, Default)]
pub struct ColorSequence {
    segments: Vec<(Color, u32)>,
}

impl ColorSequence {
    /// Build the standard three-segment sequence for a link-mapping of
    /// `green_ms` green time, given the controller's fixed amber duration.
    pub fn standard(green_ms: u32, amber_ms: u32, total_ms: u32) -> Self {
        let green_ms = green_ms.min(total_ms);
        let amber_ms = amber_ms.min(total_ms - green_ms);
        let red_ms = total_ms - green_ms - amber_ms;
        let mut segments = Vec::with_capacity(3);
        if green_ms > 0 {
            segments.push((Color::Green, green_ms));
        }
        if amber_ms > 0 {
            segments.push((Color::Amber, amber_ms));
        }
        if red_ms > 0 {
            segments.push((Color::Red, red_ms));
        }
        Self { segments }
    }

    /// Build the four-segment sequence for a pedestrian-crossing mapping:
    /// the same `green_ms`/`amber_ms` derivation as [`standard`](Self::standard),
    /// except `green_ms` is split one-third solid Green and two-thirds
    /// FlashingGreen (SPEC_FULL.md §4.9's green-time derivation).
    pub fn crossing(green_ms: u32, amber_ms: u32, total_ms: u32) -> Self {
        let green_ms = green_ms.min(total_ms);
        let amber_ms = amber_ms.min(total_ms - green_ms);
        let red_ms = total_ms - green_ms - amber_ms;
        let solid_ms = green_ms / 3;
        let flashing_ms = green_ms - solid_ms;
        let mut segments = Vec::with_capacity(4);
        if solid_ms > 0 {
            segments.push((Color::Green, solid_ms));
        }
        if flashing_ms > 0 {
            segments.push((Color::FlashingGreen, flashing_ms));
        }
        if amber_ms > 0 {
            segments.push((Color::Amber, amber_ms));
        }
        if red_ms > 0 {
            segments.push((Color::Red, red_ms));
        }
        Self { segments }
    }

    /// Total duration of one full cycle through the sequence.
    pub fn total_ms(&self) -> u32 {
        self.segments.iter().map(|(_, d)| d).sum()
    }

    /// The color active at `elapsed_ms` since the sequence started,
    /// wrapping around if it has completed more than one cycle.
    ///
    /// A sequence with no segments (zero total duration) can't resolve a
    /// color at all — SPEC_FULL.md §4.9/§7 kind 5 treats this as a domain
    /// error rather than silently picking one.
    pub fn color_at(&self, elapsed_ms: u32) -> SignalResult<Color> {
        let total = self.total_ms();
        if total == 0 {
            return Err(SignalError::MalformedColorSequence);
        }
        let mut t = elapsed_ms % total;
        for &(color, dur) in &self.segments {
            if t < dur {
                return Ok(color);
            }
            t -= dur;
        }
        Err(SignalError::MalformedColorSequence)
    }
}
