//! Hourglass: sand drains through a narrow neck, rests, and the glass flips.

use neogrid_core::{ConfigError, DEFAULT_SIZE, ResetReason, Simulation, Tick, validate_dimensions};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{GOLDEN_SAND, Gravity, Playfield, SandBox};

/// Largest per-grain brightness shift around the base sand color.
pub const COLOR_VARIATION: i16 = 20;

/// Configuration for [`HourglassSim`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HourglassConfig {
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Grains in the glass. Capped by the size of the upper chamber.
    pub grains: usize,
    /// Frames shown before the sand starts to fall.
    pub hold_frames: u32,
    /// Consecutive frames without movement that end the fall.
    pub stable_frames: u32,
    /// Frames shown after the fall before the flip.
    pub rest_frames: u32,
    /// RNG seed.
    pub seed: u64,
}

impl Default for HourglassConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            grains: 20,
            hold_frames: 30,
            stable_frames: 20,
            rest_frames: 50,
            seed: 0,
        }
    }
}

impl HourglassConfig {
    /// Sets the number of grains.
    pub fn with_grains(mut self, grains: usize) -> Self {
        self.grains = grains;
        self
    }

    /// Sets the hold, stable and rest frame counts.
    pub fn with_timing(mut self, hold: u32, stable: u32, rest: u32) -> Self {
        self.hold_frames = hold;
        self.stable_frames = stable;
        self.rest_frames = rest;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.width, self.height)?;
        if self.width < 2 || self.height < 4 {
            return Err(ConfigError::HourglassTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.grains == 0 {
            return Err(ConfigError::Zero { name: "grains" });
        }
        if self.stable_frames == 0 {
            return Err(ConfigError::Zero {
                name: "stable_frames",
            });
        }
        Ok(())
    }
}

/// Where the hourglass is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Showing the full chamber before the sand moves.
    Holding {
        /// Frames shown so far.
        elapsed: u32,
    },
    /// Sand is falling.
    Falling {
        /// Consecutive frames without movement.
        stable: u32,
    },
    /// Showing the drained glass before the flip.
    Resting {
        /// Frames shown so far.
        elapsed: u32,
    },
}

/// Hourglass that flips forever.
///
/// Starts with the upper chamber filled with settled grains. Each cycle
/// holds, lets the sand fall until it has been still for a while, rests,
/// then flips gravity and reports [`Tick::Reset`] with
/// [`ResetReason::Flipped`].
#[derive(Debug, Clone)]
pub struct HourglassSim {
    config: HourglassConfig,
    sand: SandBox,
    phase: Phase,
    rng: SmallRng,
    frame: u64,
    flips: u64,
}

impl HourglassSim {
    /// Validates `config` and fills the upper chamber.
    pub fn new(config: HourglassConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sim = Self {
            sand: SandBox::new(config.width, config.height, Playfield::Hourglass),
            phase: Phase::Holding { elapsed: 0 },
            rng: SmallRng::seed_from_u64(config.seed),
            frame: 0,
            flips: 0,
            config,
        };
        sim.fill();
        Ok(sim)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HourglassConfig {
        &self.config
    }

    /// Returns the engine.
    pub fn sand(&self) -> &SandBox {
        &self.sand
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Flips so far.
    pub fn flips(&self) -> u64 {
        self.flips
    }

    /// Returns true when no grain is left in the chamber the sand drains from.
    ///
    /// The shoulder cells beside the neck have no open cell below them, so a
    /// settled glass can still report false.
    pub fn is_drained(&self) -> bool {
        !self.sand.source_chamber_occupied()
    }

    /// Refills the upper chamber in shuffled cells and restores downward
    /// gravity.
    fn fill(&mut self) {
        self.sand.clear();
        let (width, height) = (self.sand.width(), self.sand.height());

        let mut cells: Vec<(usize, usize)> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                Playfield::Hourglass.contains(x as i32, y as i32, width, height)
                    && Playfield::Hourglass.in_source_chamber(y, height, Gravity::Down)
            })
            .collect();
        cells.shuffle(&mut self.rng);

        for &(x, y) in cells.iter().take(self.config.grains) {
            let shift = self.rng.random_range(-COLOR_VARIATION..=COLOR_VARIATION);
            self.sand.place_settled(x, y, GOLDEN_SAND.offset(shift));
        }
        info!(grains = self.sand.grain_count(), "hourglass filled");
    }
}

impl Simulation for HourglassSim {
    fn name(&self) -> &str {
        "hourglass"
    }

    fn tick(&mut self) -> Tick {
        self.frame += 1;

        self.phase = match self.phase {
            Phase::Holding { elapsed } => {
                let elapsed = elapsed + 1;
                if elapsed >= self.config.hold_frames {
                    Phase::Falling { stable: 0 }
                } else {
                    Phase::Holding { elapsed }
                }
            }
            Phase::Falling { stable } => {
                let moved = self.sand.update(&mut self.rng);
                let stable = if moved { 0 } else { stable + 1 };
                debug!(
                    frame = self.frame,
                    active = self.sand.active_count(),
                    stable,
                    "hourglass falling"
                );
                if stable >= self.config.stable_frames {
                    info!(drained = self.is_drained(), "hourglass settled");
                    Phase::Resting { elapsed: 0 }
                } else {
                    Phase::Falling { stable }
                }
            }
            Phase::Resting { elapsed } => {
                let elapsed = elapsed + 1;
                if elapsed < self.config.rest_frames {
                    Phase::Resting { elapsed }
                } else {
                    self.sand.flip();
                    self.flips += 1;
                    self.phase = Phase::Holding { elapsed: 0 };
                    info!(flips = self.flips, gravity = ?self.sand.gravity(), "hourglass flipped");
                    return Tick::Reset {
                        reason: ResetReason::Flipped,
                    };
                }
            }
        };
        Tick::Advanced
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}
