use neogrid_core::{
    ConfigError, DEFAULT_SIZE, ResetReason, Rgb, Simulation, Tick, validate_dimensions,
    validate_probability, wheel,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Playfield, SAND_COLORS, SandBox};

/// Grains spawned per palette color in layered mode.
const LAYER_SIZE: usize = 8;

/// How spawned grains are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SandColors {
    /// Bands of palette colors, advancing every few grains.
    #[default]
    Layered,
    /// A random palette color per grain.
    Random,
    /// Rainbow wheel by spawn count.
    Rainbow,
}

/// Configuration for [`SandSim`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SandConfig {
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Chance of spawning a grain each frame.
    pub spawn_rate: f32,
    /// Grains spawned before the pile is reset.
    pub max_grains: usize,
    /// Grain coloring.
    pub colors: SandColors,
    /// RNG seed.
    pub seed: u64,
}

impl Default for SandConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            spawn_rate: 0.3,
            max_grains: 50,
            colors: SandColors::Layered,
            seed: 0,
        }
    }
}

impl SandConfig {
    /// Sets the grid size.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the spawn probability.
    pub fn with_spawn_rate(mut self, spawn_rate: f32) -> Self {
        self.spawn_rate = spawn_rate;
        self
    }

    /// Sets the grain budget.
    pub fn with_max_grains(mut self, max_grains: usize) -> Self {
        self.max_grains = max_grains;
        self
    }

    /// Sets the coloring.
    pub fn with_colors(mut self, colors: SandColors) -> Self {
        self.colors = colors;
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
        validate_probability("spawn_rate", self.spawn_rate)?;
        if self.max_grains == 0 {
            return Err(ConfigError::Zero { name: "max_grains" });
        }
        Ok(())
    }
}

/// Sand poured from the top until the pile is complete, then cleared.
#[derive(Debug, Clone)]
pub struct SandSim {
    config: SandConfig,
    sand: SandBox,
    rng: SmallRng,
    spawned: usize,
    layer: usize,
    frame: u64,
}

impl SandSim {
    /// Validates `config` and starts with an empty box.
    pub fn new(config: SandConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sand: SandBox::new(config.width, config.height, Playfield::Open),
            rng: SmallRng::seed_from_u64(config.seed),
            spawned: 0,
            layer: 0,
            frame: 0,
            config,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SandConfig {
        &self.config
    }

    /// Returns the engine.
    pub fn sand(&self) -> &SandBox {
        &self.sand
    }

    /// Grains spawned since the last reset.
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Why the pile should be cleared, if it should.
    pub fn reset_reason(&self) -> Option<ResetReason> {
        if self.sand.is_full() {
            Some(ResetReason::Full)
        } else if self.spawned >= self.config.max_grains {
            Some(ResetReason::GrainLimit)
        } else {
            None
        }
    }

    /// Spawns one grain in the top row. Returns false if the row is full.
    pub fn spawn(&mut self) -> bool {
        let color = self.next_color();
        let placed = self.sand.spawn_in_source_row(&mut self.rng, color);
        if placed {
            self.spawned += 1;
        }
        placed
    }

    fn next_color(&mut self) -> Rgb {
        match self.config.colors {
            SandColors::Rainbow => wheel(self.spawned as u32 * 10),
            SandColors::Random => SAND_COLORS[self.rng.random_range(0..SAND_COLORS.len())],
            SandColors::Layered => {
                let color = SAND_COLORS[self.layer % SAND_COLORS.len()];
                if self.spawned % LAYER_SIZE == 0 {
                    self.layer += 1;
                }
                color
            }
        }
    }

    /// Empties the box.
    pub fn reset(&mut self) {
        self.sand.clear();
        self.spawned = 0;
    }
}

impl Simulation for SandSim {
    fn name(&self) -> &str {
        "sand"
    }

    fn tick(&mut self) -> Tick {
        self.frame += 1;

        let roll = self.rng.random::<f32>();
        if roll < self.config.spawn_rate
            && self.spawned < self.config.max_grains
            && !self.sand.is_full()
        {
            self.spawn();
        }

        self.sand.update(&mut self.rng);
        debug!(
            frame = self.frame,
            grains = self.spawned,
            active = self.sand.active_count(),
            "sand frame"
        );

        if let Some(reason) = self.reset_reason() {
            info!(grains = self.spawned, %reason, "sand pile complete");
            self.reset();
            return Tick::Reset { reason };
        }
        Tick::Advanced
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}

/// Endless stream of rainbow grains poured into the top-left corner and
/// drained at the bottom-right corner.
#[derive(Debug, Clone)]
pub struct WaterfallSim {
    sand: SandBox,
    rng: SmallRng,
    frame: u64,
    drained: u64,
}

impl WaterfallSim {
    /// Creates an empty waterfall.
    pub fn new(width: usize, height: usize, seed: u64) -> Result<Self, ConfigError> {
        validate_dimensions(width, height)?;
        Ok(Self {
            sand: SandBox::new(width, height, Playfield::Open),
            rng: SmallRng::seed_from_u64(seed),
            frame: 0,
            drained: 0,
        })
    }

    /// Returns the engine.
    pub fn sand(&self) -> &SandBox {
        &self.sand
    }

    /// Grains removed at the drain so far.
    pub fn drained(&self) -> u64 {
        self.drained
    }
}

impl Simulation for WaterfallSim {
    fn name(&self) -> &str {
        "waterfall"
    }

    fn tick(&mut self) -> Tick {
        let color = wheel((self.frame * 2 % 256) as u32);
        self.sand.spawn_at(0, 0, color);

        let (drain_x, drain_y) = (self.sand.width() - 1, self.sand.height() - 1);
        if self.sand.remove_at(drain_x, drain_y).is_some() {
            self.drained += 1;
        }

        self.sand.update(&mut self.rng);
        self.frame += 1;
        debug!(
            frame = self.frame,
            grains = self.sand.grain_count(),
            drained = self.drained,
            "waterfall frame"
        );
        Tick::Advanced
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pile_resets() {
        let config = SandConfig::default().with_spawn_rate(1.0).with_seed(5);
        let mut sim = SandSim::new(config).unwrap();
        let mut reason = None;
        for _ in 0..500 {
            if let Tick::Reset { reason: r } = sim.tick() {
                reason = Some(r);
                break;
            }
        }
        assert!(matches!(
            reason,
            Some(ResetReason::Full | ResetReason::GrainLimit)
        ));
        assert_eq!(sim.sand().grain_count(), 0);
        assert_eq!(sim.spawned(), 0);
    }

    #[test]
    fn test_grain_limit() {
        let config = SandConfig::default()
            .with_spawn_rate(1.0)
            .with_max_grains(3);
        let mut sim = SandSim::new(config).unwrap();
        assert_eq!(sim.tick(), Tick::Advanced);
        assert_eq!(sim.tick(), Tick::Advanced);
        assert_eq!(
            sim.tick(),
            Tick::Reset {
                reason: ResetReason::GrainLimit
            }
        );
    }

    #[test]
    fn test_no_spawn_at_zero_rate() {
        let mut sim = SandSim::new(SandConfig::default().with_spawn_rate(0.0)).unwrap();
        for _ in 0..50 {
            assert_eq!(sim.tick(), Tick::Advanced);
        }
        assert_eq!(sim.sand().grain_count(), 0);
    }

    #[test]
    fn test_layered_colors_band() {
        let mut sim = SandSim::new(SandConfig::default().with_max_grains(64)).unwrap();
        let mut colors = Vec::new();
        for _ in 0..10 {
            let before = sim.spawned();
            sim.spawn();
            assert_eq!(sim.spawned(), before + 1);
            let grain = sim.sand().grains().find(|g| g.y == 0).copied();
            colors.push(grain.map(|g| g.color));
            sim.sand.update(&mut sim.rng);
        }
        assert_eq!(colors[0], Some(SAND_COLORS[0]));
        assert!(colors[1..=8].iter().all(|c| *c == Some(SAND_COLORS[1])));
        assert_eq!(colors[9], Some(SAND_COLORS[2]));
    }

    #[test]
    fn test_rainbow_colors() {
        let config = SandConfig::default().with_colors(SandColors::Rainbow);
        let mut sim = SandSim::new(config).unwrap();
        sim.spawn();
        let grain = sim.sand().grains().next().copied().unwrap();
        assert_eq!(grain.color, wheel(0));
    }

    #[test]
    fn test_rejects_bad_spawn_rate() {
        assert!(matches!(
            SandSim::new(SandConfig::default().with_spawn_rate(1.2)),
            Err(ConfigError::Probability { name: "spawn_rate", .. })
        ));
    }

    #[test]
    fn test_waterfall_drains() {
        let mut sim = WaterfallSim::new(8, 8, 1).unwrap();
        for _ in 0..400 {
            sim.tick();
        }
        assert!(sim.drained() > 0);
        assert!(sim.sand().grain_count() < 64);
        assert_eq!(sim.frame(), 400);
    }
}
