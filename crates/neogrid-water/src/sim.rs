use neogrid_core::{
    ConfigError, DEFAULT_SIZE, Simulation, Tick, validate_dimensions, validate_probability,
    validate_range,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::WaterField;

/// Wave speeds at or above this make the finest ripples grow instead of fade.
pub const MAX_WAVE_SPEED: f32 = 2.0;

/// Where and when drops land.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DropPattern {
    /// A random drop with probability `chance` each frame.
    Random {
        /// Per-frame drop probability.
        chance: f32,
    },
    /// Up to two 30% drop attempts per frame.
    Rain,
    /// Strength 60 at the center every 30 frames.
    CenterPulse,
    /// Strength 50 at the next corner every 20 frames.
    CornerDrops,
    /// Strength 40 on a random row of the left edge every 15 frames.
    WaveMachine,
    /// Two strength 40 sources on the middle row every 20 frames.
    Interference,
}

impl Default for DropPattern {
    fn default() -> Self {
        DropPattern::Random { chance: 0.03 }
    }
}

impl DropPattern {
    /// Every pattern, with the default chance for [`DropPattern::Random`].
    pub const ALL: [DropPattern; 6] = [
        DropPattern::Random { chance: 0.03 },
        DropPattern::Rain,
        DropPattern::CenterPulse,
        DropPattern::CornerDrops,
        DropPattern::WaveMachine,
        DropPattern::Interference,
    ];

    /// Short name.
    pub fn label(&self) -> &'static str {
        match self {
            DropPattern::Random { .. } => "random",
            DropPattern::Rain => "rain",
            DropPattern::CenterPulse => "center-pulse",
            DropPattern::CornerDrops => "corner-drops",
            DropPattern::WaveMachine => "wave-machine",
            DropPattern::Interference => "interference",
        }
    }
}

/// Configuration for [`WaterSim`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaterConfig {
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Pull toward the neighbor average, in `(0, 2)`.
    pub wave_speed: f32,
    /// Velocity multiplier per frame, in `(0, 1)`.
    pub damping: f32,
    /// Weakest random drop.
    pub strength_min: f32,
    /// Strongest random drop.
    pub strength_max: f32,
    /// Drop schedule.
    pub pattern: DropPattern,
    /// RNG seed.
    pub seed: u64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            wave_speed: 0.5,
            damping: 0.96,
            strength_min: 30.0,
            strength_max: 60.0,
            pattern: DropPattern::default(),
            seed: 0,
        }
    }
}

impl WaterConfig {
    /// Sets the grid size.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the wave speed.
    pub fn with_wave_speed(mut self, wave_speed: f32) -> Self {
        self.wave_speed = wave_speed;
        self
    }

    /// Sets the damping factor.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Sets the random drop strength range.
    pub fn with_strength(mut self, min: f32, max: f32) -> Self {
        self.strength_min = min;
        self.strength_max = max;
        self
    }

    /// Sets the drop schedule.
    pub fn with_pattern(mut self, pattern: DropPattern) -> Self {
        self.pattern = pattern;
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
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "damping",
                value: self.damping,
                min: 0.0,
                max: 1.0,
            });
        }
        if !(self.wave_speed > 0.0 && self.wave_speed < MAX_WAVE_SPEED) {
            return Err(ConfigError::OutOfRange {
                name: "wave_speed",
                value: self.wave_speed,
                min: 0.0,
                max: MAX_WAVE_SPEED,
            });
        }
        validate_range("strength", self.strength_min, self.strength_max)?;
        if let DropPattern::Random { chance } = self.pattern {
            validate_probability("drop_chance", chance)?;
        }
        Ok(())
    }
}

/// Water surface with a drop schedule. Never resets.
#[derive(Debug, Clone)]
pub struct WaterSim {
    config: WaterConfig,
    field: WaterField,
    rng: SmallRng,
    frame: u64,
    drops: u64,
}

impl WaterSim {
    /// Validates `config` and starts with a calm surface.
    pub fn new(config: WaterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            field: WaterField::new(
                config.width,
                config.height,
                config.wave_speed,
                config.damping,
            ),
            rng: SmallRng::seed_from_u64(config.seed),
            frame: 0,
            drops: 0,
            config,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WaterConfig {
        &self.config
    }

    /// Returns the surface.
    pub fn field(&self) -> &WaterField {
        &self.field
    }

    /// Drops so far, counting each source of a multi-source drop.
    pub fn drops(&self) -> u64 {
        self.drops
    }

    /// Flattens the surface.
    pub fn calm(&mut self) {
        self.field.clear();
    }

    fn drop_at(&mut self, x: usize, y: usize, strength: f32) {
        self.field.drop(x, y, strength);
        self.drops += 1;
        debug!(x, y, strength, "water drop");
    }

    fn random_drop(&mut self) {
        let strength = (self.config.strength_min, self.config.strength_max);
        self.field.random_drop(&mut self.rng, strength);
        self.drops += 1;
        debug!(frame = self.frame, "random water drop");
    }

    /// Applies this frame's drops.
    fn schedule_drops(&mut self) {
        let (width, height) = (self.field.width(), self.field.height());
        let frame = self.frame;

        match self.config.pattern {
            DropPattern::Random { chance } => {
                if self.rng.random::<f32>() < chance {
                    self.random_drop();
                }
            }
            DropPattern::Rain => {
                for _ in 0..self.rng.random_range(0..=2) {
                    if self.rng.random::<f32>() < 0.3 {
                        self.random_drop();
                    }
                }
            }
            DropPattern::CenterPulse => {
                if frame % 30 == 0 {
                    self.drop_at(width / 2, height / 2, 60.0);
                }
            }
            DropPattern::CornerDrops => {
                if frame % 20 == 0 {
                    let corners = [
                        (0, 0),
                        (width - 1, 0),
                        (0, height - 1),
                        (width - 1, height - 1),
                    ];
                    let (x, y) = corners[(frame / 20 % 4) as usize];
                    self.drop_at(x, y, 50.0);
                }
            }
            DropPattern::WaveMachine => {
                if frame % 15 == 0 {
                    let y = self.rng.random_range(0..height);
                    self.drop_at(0, y, 40.0);
                }
            }
            DropPattern::Interference => {
                if frame % 20 == 0 {
                    self.drop_at(1, height / 2, 40.0);
                    self.drop_at(width.saturating_sub(2), height / 2, 40.0);
                }
            }
        }
    }
}

impl Simulation for WaterSim {
    fn name(&self) -> &str {
        "water"
    }

    fn tick(&mut self) -> Tick {
        self.schedule_drops();
        self.field.step();
        self.frame += 1;
        trace!(
            frame = self.frame,
            max_height = self.field.max_height(),
            "water frame"
        );
        Tick::Advanced
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}
