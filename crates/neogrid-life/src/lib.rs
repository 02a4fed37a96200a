//! Conway's Game of Life on a small toroidal grid.
//!
//! [`GameOfLife`] is the bare B3/S23 stepper with its stagnation history.
//! [`LifeSim`] wraps it with the reseeding policy: when a pattern dies out,
//! stagnates or runs too long, the next catalog pattern (or a random fill)
//! takes its place.
//!
//! # Example
//!
//! ```
//! use neogrid_core::Addressing;
//! use neogrid_life::{GameOfLife, pattern};
//!
//! let mut life = GameOfLife::new(8, 8, Addressing::Wrap);
//! life.load_pattern(&pattern::BLINKER).unwrap();
//! let start = life.cells().clone();
//!
//! life.steps(2);
//! assert_eq!(life.cells(), &start);
//! assert_eq!(life.generation(), 2);
//! ```

pub mod pattern;
mod sim;

use neogrid_core::{Addressing, FingerprintHistory, Grid, GridError, Moore};
use rand::Rng;

pub use pattern::{CATALOG, Pattern};
pub use sim::{LifeConfig, LifeSim, Seed};

/// Neighbor counts that bring a dead cell to life.
pub const BIRTH: &[u8] = &[3];

/// Neighbor counts that keep a live cell alive.
pub const SURVIVE: &[u8] = &[2, 3];

/// Default number of generations kept for stagnation detection.
pub const DEFAULT_HISTORY: usize = 10;

/// Default number of appearances of the latest state that counts as stagnant.
pub const DEFAULT_REPEAT_THRESHOLD: usize = 3;

/// Game of Life stepper with a bounded history of generation fingerprints.
#[derive(Debug, Clone)]
pub struct GameOfLife {
    cells: Grid<bool>,
    generation: u32,
    history: FingerprintHistory,
    repeat_threshold: usize,
}

impl GameOfLife {
    /// Creates an empty board with the default history settings.
    pub fn new(width: usize, height: usize, addressing: Addressing) -> Self {
        Self {
            cells: Grid::new(width, height, addressing),
            generation: 0,
            history: FingerprintHistory::new(DEFAULT_HISTORY),
            repeat_threshold: DEFAULT_REPEAT_THRESHOLD,
        }
    }

    /// Sets the history capacity and the repeat count that marks stagnation.
    pub fn with_history(mut self, capacity: usize, repeat_threshold: usize) -> Self {
        self.history = FingerprintHistory::new(capacity);
        self.repeat_threshold = repeat_threshold;
        self
    }

    /// Returns the width.
    pub fn width(&self) -> usize {
        self.cells.width()
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.cells.height()
    }

    /// Returns the cell grid.
    pub fn cells(&self) -> &Grid<bool> {
        &self.cells
    }

    /// Gets the state of a cell.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells.get(x, y).copied().unwrap_or(false)
    }

    /// Sets the state of a cell.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        self.cells.set(x, y, alive);
    }

    /// Generations stepped since the last load.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Counts total alive cells.
    pub fn population(&self) -> usize {
        self.cells.count(|&alive| alive)
    }

    /// Recent generation fingerprints, oldest first.
    pub fn history(&self) -> &FingerprintHistory {
        &self.history
    }

    /// Clears all cells and forgets the history.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.restart();
    }

    fn restart(&mut self) {
        self.generation = 0;
        self.history.clear();
    }

    /// Replaces the board with `pattern` at its offset, wrapping at the edges.
    pub fn load_pattern(&mut self, pattern: &Pattern) -> Result<(), GridError> {
        let (width, height) = (self.width(), self.height());
        if pattern.width() > width || pattern.height() > height {
            return Err(GridError::PatternTooLarge {
                name: pattern.name,
                width: pattern.width(),
                height: pattern.height(),
                grid_width: width,
                grid_height: height,
            });
        }

        let live = pattern.live_cells()?;
        self.cells.clear();
        for (x, y) in live {
            let px = (x + pattern.offset_x) % width;
            let py = (y + pattern.offset_y) % height;
            self.cells.set(px, py, true);
        }
        self.restart();
        Ok(())
    }

    /// Fills the board randomly with the given live-cell density.
    ///
    /// Never leaves the board empty: if the draw comes up empty, one random
    /// cell is lit.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f32) {
        let density = density.clamp(0.0, 1.0) as f64;
        for cell in self.cells.iter_mut() {
            *cell = rng.random_bool(density);
        }
        if self.population() == 0 && !self.cells.is_empty() {
            let x = rng.random_range(0..self.width());
            let y = rng.random_range(0..self.height());
            self.cells.set(x, y, true);
        }
        self.restart();
    }

    /// Counts alive Moore neighbors under the board's addressing.
    pub fn count_neighbors(&self, x: usize, y: usize) -> u8 {
        self.cells.count_neighbors(x, y, &Moore, |&alive| alive)
    }

    /// Advances one generation.
    ///
    /// The next generation is computed into a fresh buffer from a frozen
    /// snapshot, so evaluation order never matters.
    pub fn step(&mut self) {
        let mut next = Grid::new(self.width(), self.height(), self.cells.addressing());

        for (x, y, &alive) in self.cells.iter_cells() {
            let neighbors = self.count_neighbors(x, y);
            let lives = if alive {
                SURVIVE.contains(&neighbors)
            } else {
                BIRTH.contains(&neighbors)
            };
            next.set(x, y, lives);
        }

        self.cells = next;
        self.generation += 1;
        self.history.push(self.cells.fingerprint());
    }

    /// Advances multiple generations.
    pub fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Returns true when no cell is alive.
    pub fn is_extinct(&self) -> bool {
        self.population() == 0
    }

    /// Returns true when the history is full and the latest generation
    /// appears in it at least the repeat threshold number of times.
    ///
    /// Catches still lifes and oscillators of short period.
    pub fn is_stagnant(&self) -> bool {
        if !self.history.is_full() {
            return false;
        }
        self.history
            .latest()
            .is_some_and(|latest| self.history.occurrences(latest) >= self.repeat_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn board() -> GameOfLife {
        GameOfLife::new(8, 8, Addressing::Wrap)
    }

    #[test]
    fn test_block_is_fixed_point() {
        let mut life = board();
        life.load_pattern(&pattern::BLOCK).unwrap();
        let start = life.cells().clone();
        for _ in 0..20 {
            life.step();
            assert_eq!(life.cells(), &start);
        }
    }

    #[test]
    fn test_blinker_period_two() {
        let mut life = board();
        life.load_pattern(&pattern::BLINKER).unwrap();
        let start = life.cells().clone();

        life.step();
        assert_ne!(life.cells(), &start);
        // Vertical phase centered on the middle cell.
        assert!(life.get(3, 2) && life.get(3, 3) && life.get(3, 4));
        assert_eq!(life.population(), 3);

        life.step();
        assert_eq!(life.cells(), &start);
    }

    #[test]
    fn test_step_is_deterministic() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut a = board();
        a.randomize(&mut rng, 0.4);
        let mut b = a.clone();
        a.steps(15);
        b.steps(15);
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn test_glider_wraps_around_torus() {
        let mut life = board();
        life.load_pattern(&pattern::GLIDER).unwrap();
        let start = life.cells().clone();
        // A glider moves one cell diagonally every 4 generations; on an 8x8
        // torus it is back where it started after 32.
        life.steps(32);
        assert_eq!(life.cells(), &start);
        assert_eq!(life.population(), 5);
    }

    #[test]
    fn test_neighbors_wrap() {
        let mut life = board();
        life.set(0, 0, true);
        life.set(7, 7, true);
        life.set(7, 0, true);
        assert_eq!(life.count_neighbors(0, 7), 3);
    }

    #[test]
    fn test_bounded_board_loses_edge_neighbors() {
        let mut life = GameOfLife::new(8, 8, Addressing::Bounded);
        life.set(0, 0, true);
        life.set(7, 7, true);
        assert_eq!(life.count_neighbors(0, 7), 0);
    }

    #[test]
    fn test_block_becomes_stagnant() {
        let mut life = board();
        life.load_pattern(&pattern::BLOCK).unwrap();
        life.steps(DEFAULT_HISTORY - 1);
        assert!(!life.is_stagnant());
        life.step();
        assert!(life.is_stagnant());
    }

    #[test]
    fn test_glider_not_stagnant() {
        let mut life = board();
        life.load_pattern(&pattern::GLIDER).unwrap();
        life.steps(25);
        assert!(!life.is_stagnant());
    }

    #[test]
    fn test_lonely_cell_goes_extinct() {
        let mut life = board();
        life.set(4, 4, true);
        assert!(!life.is_extinct());
        life.step();
        assert!(life.is_extinct());
    }

    #[test]
    fn test_randomize_never_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut life = board();
        for _ in 0..10 {
            life.randomize(&mut rng, 0.0);
            assert_eq!(life.population(), 1);
        }
        life.randomize(&mut rng, 1.0);
        assert_eq!(life.population(), 64);
    }

    #[test]
    fn test_load_resets_generation() {
        let mut life = board();
        life.load_pattern(&pattern::TOAD).unwrap();
        life.steps(3);
        life.load_pattern(&pattern::BEACON).unwrap();
        assert_eq!(life.generation(), 0);
        assert!(life.history().is_empty());
    }

    #[test]
    fn test_pattern_too_large() {
        let mut life = GameOfLife::new(4, 4, Addressing::Wrap);
        let err = life.load_pattern(&pattern::TWO_GLIDERS).unwrap_err();
        assert!(matches!(err, GridError::PatternTooLarge { name: "two_gliders", .. }));
    }
}
