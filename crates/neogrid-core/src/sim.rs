//! Tick-driven simulation interface.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::display::MatrixDisplay;

/// Why a simulation threw away its state and started over.
///
/// These are expected events, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResetReason {
    /// No live cells remain.
    Extinct,
    /// The latest state keeps recurring (still life or short oscillator).
    Stagnant,
    /// A run of recent states exactly repeats an earlier run.
    Cycling,
    /// The generation ceiling was reached.
    GenerationLimit,
    /// The step ceiling was reached.
    StepLimit,
    /// The playfield filled up.
    Full,
    /// The grain budget was spent.
    GrainLimit,
    /// Gravity was reversed.
    Flipped,
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ResetReason::Extinct => "extinct",
            ResetReason::Stagnant => "stagnant",
            ResetReason::Cycling => "cycling",
            ResetReason::GenerationLimit => "generation limit",
            ResetReason::StepLimit => "step limit",
            ResetReason::Full => "full",
            ResetReason::GrainLimit => "grain limit",
            ResetReason::Flipped => "flipped",
        };
        f.write_str(text)
    }
}

/// Outcome of one [`Simulation::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// State advanced by one step.
    Advanced,
    /// State was replaced (reseeded, refilled or flipped).
    Reset {
        /// What triggered the reset.
        reason: ResetReason,
    },
}

impl Tick {
    /// Returns the reset reason, if this tick reset.
    pub fn reset_reason(self) -> Option<ResetReason> {
        match self {
            Tick::Advanced => None,
            Tick::Reset { reason } => Some(reason),
        }
    }
}

/// A simulation advanced one tick at a time by a caller-owned loop.
pub trait Simulation {
    /// Short human-readable name.
    fn name(&self) -> &str;

    /// Advances by one tick.
    fn tick(&mut self) -> Tick;

    /// Ticks since construction.
    fn frame(&self) -> u64;
}

/// Something that can draw itself onto a matrix display.
///
/// Drawing stages colors only; the caller decides when to present.
pub trait Scene {
    /// Stages this scene's colors on `display`.
    fn draw(&self, display: &mut dyn MatrixDisplay);
}

/// A runnable mode: a simulation that can also draw itself.
pub trait Mode: Simulation + Scene {}

impl<T: Simulation + Scene> Mode for T {}
