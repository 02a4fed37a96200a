//! Damped height-field water ripples.
//!
//! Each cell holds a height and a velocity. A step pulls every cell toward
//! the average of its four axis neighbors (an edge cell stands in for its
//! missing neighbors, so waves reflect), damps the velocity, and integrates
//! the height. All velocities are computed from tick-start heights into a
//! scratch buffer before any height changes.
//!
//! # Example
//!
//! ```
//! use neogrid_water::WaterField;
//!
//! let mut water = WaterField::new(8, 8, 0.5, 0.96);
//! water.drop(4, 4, 50.0);
//! let start = water.wave_energy();
//! for _ in 0..300 {
//!     water.step();
//! }
//! assert!(water.wave_energy() < start);
//! ```

mod sim;

use neogrid_core::{Addressing, Grid, Neighborhood2D, VonNeumann};
use rand::Rng;

pub use sim::{DropPattern, WaterConfig, WaterSim};

/// Height-field wave solver on a bounded grid.
#[derive(Debug, Clone)]
pub struct WaterField {
    heights: Grid<f32>,
    velocities: Grid<f32>,
    /// Next velocities, swapped with `velocities` after each step.
    scratch: Grid<f32>,
    wave_speed: f32,
    damping: f32,
}

impl WaterField {
    /// Creates a flat, still field.
    ///
    /// `wave_speed` scales the pull toward the neighbor average and
    /// `damping` multiplies every velocity once per step. Parameters are
    /// taken as given; [`WaterConfig::validate`] checks them.
    pub fn new(width: usize, height: usize, wave_speed: f32, damping: f32) -> Self {
        Self {
            heights: Grid::new(width, height, Addressing::Bounded),
            velocities: Grid::new(width, height, Addressing::Bounded),
            scratch: Grid::new(width, height, Addressing::Bounded),
            wave_speed,
            damping,
        }
    }

    /// Returns the width.
    pub fn width(&self) -> usize {
        self.heights.width()
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.heights.height()
    }

    /// Height grid.
    pub fn heights(&self) -> &Grid<f32> {
        &self.heights
    }

    /// Velocity grid.
    pub fn velocities(&self) -> &Grid<f32> {
        &self.velocities
    }

    /// Height of a cell, or `None` out of range.
    pub fn height_at(&self, x: usize, y: usize) -> Option<f32> {
        self.heights.get(x, y).copied()
    }

    /// Sets a cell's height to `strength`. Out-of-range drops are ignored.
    pub fn drop(&mut self, x: usize, y: usize, strength: f32) {
        self.heights.set(x, y, strength);
    }

    /// Drops at a random cell with a strength drawn from `strength`.
    pub fn random_drop<R: Rng + ?Sized>(&mut self, rng: &mut R, strength: (f32, f32)) {
        let x = rng.random_range(0..self.width());
        let y = rng.random_range(0..self.height());
        let (min, max) = strength;
        let strength = if min < max {
            rng.random_range(min..=max)
        } else {
            min
        };
        self.drop(x, y, strength);
    }

    /// Advances the field one tick.
    pub fn step(&mut self) {
        let heights = &self.heights;
        let (speed, damping) = (self.wave_speed, self.damping);
        let neighborhood = VonNeumann;
        let offsets = neighborhood.offsets();

        let cells = heights
            .iter_cells()
            .zip(self.velocities.iter().zip(self.scratch.iter_mut()));
        for ((x, y, &h), (&v, next)) in cells {
            let (x, y) = (x as i32, y as i32);
            let sum: f32 = offsets
                .iter()
                .map(|&(dx, dy)| heights.get_wrapped(x + dx, y + dy).copied().unwrap_or(h))
                .sum();
            let average = sum / offsets.len() as f32;
            let acceleration = (average - h) * speed;
            *next = (v + acceleration) * damping;
        }

        std::mem::swap(&mut self.velocities, &mut self.scratch);
        for (h, &v) in self.heights.iter_mut().zip(self.velocities.iter()) {
            *h += v;
        }
    }

    /// Runs `n` steps.
    pub fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Flattens and stills the field.
    pub fn clear(&mut self) {
        self.heights.fill(0.0);
        self.velocities.fill(0.0);
        self.scratch.fill(0.0);
    }

    /// Largest absolute height.
    pub fn max_height(&self) -> f32 {
        self.heights.iter().fold(0.0_f32, |max, h| max.max(h.abs()))
    }

    /// Sum of all heights. Reflecting edges keep it constant between drops.
    pub fn volume(&self) -> f32 {
        self.heights.iter().sum()
    }

    /// Average height.
    pub fn mean_height(&self) -> f32 {
        self.volume() / self.heights.len() as f32
    }

    /// Displacement from the mean level plus motion: Σ|h - mean| + Σ|v|.
    ///
    /// Zero exactly when the surface is flat and still.
    pub fn wave_energy(&self) -> f32 {
        let mean = self.mean_height();
        let displacement: f32 = self.heights.iter().map(|h| (h - mean).abs()).sum();
        let motion: f32 = self.velocities.iter().map(|v| v.abs()).sum();
        displacement + motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> WaterField {
        WaterField::new(8, 8, 0.5, 0.96)
    }

    /// Largest energy seen over `window` steps.
    fn peak_energy(water: &mut WaterField, window: usize) -> f32 {
        (0..window)
            .map(|_| {
                water.step();
                water.wave_energy()
            })
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_flat_field_stays_flat() {
        let mut water = field();
        water.steps(20);
        assert_eq!(water.max_height(), 0.0);
        assert_eq!(water.wave_energy(), 0.0);
    }

    #[test]
    fn test_drop_sets_height() {
        let mut water = field();
        water.drop(2, 5, 42.0);
        assert_eq!(water.height_at(2, 5), Some(42.0));
        assert_eq!(water.max_height(), 42.0);
    }

    #[test]
    fn test_drop_out_of_range_ignored() {
        let mut water = field();
        water.drop(8, 0, 50.0);
        water.drop(0, 100, 50.0);
        assert_eq!(water.max_height(), 0.0);
    }

    #[test]
    fn test_step_uses_tick_start_heights() {
        // A lone raised cell pulls each of its four neighbors equally.
        let mut water = field();
        water.drop(4, 4, 40.0);
        water.step();

        let left = water.height_at(3, 4).unwrap();
        let right = water.height_at(5, 4).unwrap();
        let up = water.height_at(4, 3).unwrap();
        let down = water.height_at(4, 5).unwrap();
        let expected = 40.0 / 4.0 * 0.5 * 0.96;
        for h in [left, right, up, down] {
            assert!((h - expected).abs() < 1e-5, "{h} vs {expected}");
        }
        assert!(water.height_at(4, 4).unwrap() < 40.0);
        assert_eq!(water.height_at(0, 0), Some(0.0));
    }

    #[test]
    fn test_edge_cell_reflects() {
        // A corner drop only sees two real neighbors; the rest mirror itself.
        let mut water = field();
        water.drop(0, 0, 40.0);
        water.step();
        let expected_v = (20.0 - 40.0) * 0.5 * 0.96;
        assert!((water.height_at(0, 0).unwrap() - (40.0 + expected_v)).abs() < 1e-4);
    }

    #[test]
    fn test_energy_decays_toward_rest() {
        let mut water = field();
        water.drop(4, 4, 50.0);

        let early = peak_energy(&mut water, 50);
        water.steps(150);
        let middle = peak_energy(&mut water, 50);
        water.steps(300);
        let late = peak_energy(&mut water, 50);

        assert!(early > middle, "{early} <= {middle}");
        assert!(middle > late, "{middle} <= {late}");
        water.steps(500);
        assert!(water.wave_energy() < 0.01);
    }

    #[test]
    fn test_volume_conserved() {
        let mut water = field();
        water.drop(1, 6, 50.0);
        water.drop(6, 2, 30.0);
        water.steps(400);
        assert!((water.volume() - 80.0).abs() < 0.05, "{}", water.volume());
        assert!((water.mean_height() - 80.0 / 64.0).abs() < 1e-3);
    }

    #[test]
    fn test_clear() {
        let mut water = field();
        water.drop(3, 3, 50.0);
        water.steps(3);
        water.clear();
        assert_eq!(water.wave_energy(), 0.0);
        assert_eq!(water.volume(), 0.0);
    }
}
