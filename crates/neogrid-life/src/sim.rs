use neogrid_core::{
    Addressing, ConfigError, DEFAULT_SIZE, Grid, ResetReason, Simulation, Tick,
    validate_dimensions, validate_probability, validate_range,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

use crate::pattern::{self, CATALOG};
use crate::{DEFAULT_HISTORY, DEFAULT_REPEAT_THRESHOLD, GameOfLife};

/// Name accepted in place of a catalog pattern to start from a random fill.
pub const RANDOM_SEED_NAME: &str = "random";

/// Configuration for [`LifeSim`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LifeConfig {
    /// Board width.
    pub width: usize,
    /// Board height.
    pub height: usize,
    /// Edge behavior. Life is toroidal by default.
    pub addressing: Addressing,
    /// Generations kept for stagnation detection.
    pub history_len: usize,
    /// Appearances of the latest generation in the history that count as stagnant.
    pub repeat_threshold: usize,
    /// Generation ceiling before a forced reseed.
    pub max_generations: u32,
    /// Lower bound of the random-fill density.
    pub density_min: f32,
    /// Upper bound of the random-fill density.
    pub density_max: f32,
    /// First pattern to load: a catalog name or `"random"`. `None` starts at
    /// the head of the catalog.
    pub pattern: Option<String>,
    /// RNG seed.
    pub seed: u64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            addressing: Addressing::Wrap,
            history_len: DEFAULT_HISTORY,
            repeat_threshold: DEFAULT_REPEAT_THRESHOLD,
            max_generations: 200,
            density_min: 0.25,
            density_max: 0.5,
            pattern: None,
            seed: 0,
        }
    }
}

impl LifeConfig {
    /// Sets the board size.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the edge behavior.
    pub fn with_addressing(mut self, addressing: Addressing) -> Self {
        self.addressing = addressing;
        self
    }

    /// Sets the generation ceiling.
    pub fn with_max_generations(mut self, max_generations: u32) -> Self {
        self.max_generations = max_generations;
        self
    }

    /// Sets the random-fill density range.
    pub fn with_density(mut self, min: f32, max: f32) -> Self {
        self.density_min = min;
        self.density_max = max;
        self
    }

    /// Sets the first pattern by name.
    pub fn with_pattern(mut self, name: impl Into<String>) -> Self {
        self.pattern = Some(name.into());
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
        if self.history_len == 0 {
            return Err(ConfigError::Zero { name: "history_len" });
        }
        if self.repeat_threshold == 0 {
            return Err(ConfigError::Zero {
                name: "repeat_threshold",
            });
        }
        if self.repeat_threshold > self.history_len {
            return Err(ConfigError::WindowTooLarge {
                name: "repeat_threshold",
                window: self.repeat_threshold,
                needed: self.repeat_threshold,
                capacity: self.history_len,
            });
        }
        if self.max_generations == 0 {
            return Err(ConfigError::Zero {
                name: "max_generations",
            });
        }
        validate_probability("density_min", self.density_min)?;
        validate_probability("density_max", self.density_max)?;
        validate_range("density", self.density_min, self.density_max)?;
        if let Some(name) = &self.pattern {
            if name != RANDOM_SEED_NAME && pattern::index_of(name).is_none() {
                return Err(ConfigError::UnknownPattern { name: name.clone() });
            }
        }
        Ok(())
    }

    fn start_index(&self) -> usize {
        match self.pattern.as_deref() {
            None => 0,
            Some(RANDOM_SEED_NAME) => CATALOG.len(),
            Some(name) => pattern::index_of(name).unwrap_or(0),
        }
    }
}

/// What the board was last seeded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seed {
    /// A catalog pattern, by catalog index.
    Pattern(usize),
    /// A random fill at the given density.
    Random {
        /// Live-cell probability used for the fill.
        density: f32,
    },
}

impl Seed {
    /// Short label for logs and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Seed::Pattern(index) => CATALOG.get(*index).map_or("unknown", |p| p.name),
            Seed::Random { .. } => RANDOM_SEED_NAME,
        }
    }
}

/// Self-reseeding Game of Life.
///
/// Each tick first checks whether the current run is over (extinct, then
/// stagnant, then generation ceiling). If so the board is reseeded from the
/// catalog, cycling through every pattern and then one random fill, and the
/// tick reports [`Tick::Reset`]. Otherwise the board advances a generation.
#[derive(Debug, Clone)]
pub struct LifeSim {
    config: LifeConfig,
    game: GameOfLife,
    ages: Grid<u32>,
    index: usize,
    seed: Seed,
    rng: SmallRng,
    frame: u64,
    reseeds: u64,
}

impl LifeSim {
    /// Validates `config` and loads the first seed.
    pub fn new(config: LifeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let game = GameOfLife::new(config.width, config.height, config.addressing)
            .with_history(config.history_len, config.repeat_threshold);
        let mut sim = Self {
            ages: Grid::new(config.width, config.height, config.addressing),
            index: config.start_index(),
            seed: Seed::Pattern(0),
            rng: SmallRng::seed_from_u64(config.seed),
            game,
            frame: 0,
            reseeds: 0,
            config,
        };
        sim.load_current();
        Ok(sim)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    /// Returns the underlying stepper.
    pub fn game(&self) -> &GameOfLife {
        &self.game
    }

    /// Returns the underlying stepper mutably.
    pub fn game_mut(&mut self) -> &mut GameOfLife {
        &mut self.game
    }

    /// Consecutive generations each cell has been alive.
    pub fn ages(&self) -> &Grid<u32> {
        &self.ages
    }

    /// What the board was last seeded with.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Number of reseeds since construction.
    pub fn reseeds(&self) -> u64 {
        self.reseeds
    }

    /// Why the current run should end, if it should.
    pub fn reset_reason(&self) -> Option<ResetReason> {
        if self.game.is_extinct() {
            Some(ResetReason::Extinct)
        } else if self.game.is_stagnant() {
            Some(ResetReason::Stagnant)
        } else if self.game.generation() >= self.config.max_generations {
            Some(ResetReason::GenerationLimit)
        } else {
            None
        }
    }

    /// Loads the next seed: the next catalog pattern, or a random fill after
    /// the last one.
    pub fn reseed(&mut self) {
        self.index = (self.index + 1) % (CATALOG.len() + 1);
        self.load_current();
        self.reseeds += 1;
    }

    fn load_current(&mut self) {
        self.ages.clear();

        if let Some(pattern) = CATALOG.get(self.index) {
            match self.game.load_pattern(pattern) {
                Ok(()) => {
                    self.seed = Seed::Pattern(self.index);
                    info!(pattern = pattern.name, "loaded life pattern");
                    return;
                }
                Err(err) => warn!(pattern = pattern.name, %err, "pattern skipped"),
            }
        }

        let density = self
            .rng
            .random_range(self.config.density_min..=self.config.density_max);
        self.game.randomize(&mut self.rng, density);
        self.seed = Seed::Random { density };
        info!(
            density,
            population = self.game.population(),
            "random life fill"
        );
    }

    fn update_ages(&mut self) {
        for (x, y, &alive) in self.game.cells().iter_cells() {
            if let Some(age) = self.ages.get_mut(x, y) {
                *age = if alive { age.saturating_add(1) } else { 0 };
            }
        }
    }
}

impl Simulation for LifeSim {
    fn name(&self) -> &str {
        "life"
    }

    fn tick(&mut self) -> Tick {
        self.frame += 1;

        if let Some(reason) = self.reset_reason() {
            info!(
                generation = self.game.generation(),
                population = self.game.population(),
                seed = self.seed.label(),
                %reason,
                "life run ended"
            );
            self.reseed();
            return Tick::Reset { reason };
        }

        self.game.step();
        self.update_ages();
        trace!(
            generation = self.game.generation(),
            population = self.game.population(),
            "life step"
        );
        Tick::Advanced
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}
