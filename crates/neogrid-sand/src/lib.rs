//! Falling sand on a bounded grid.
//!
//! Every grain lives in exactly one grid slot; the slot owns it. A tick
//! visits grains nearest the destination side first so they vacate cells
//! before the grains behind them look for room. Each grain tries to fall
//! straight, then diagonally (side chosen by a coin flip), and settles when
//! all three targets are blocked.
//!
//! [`SandBox`] is the engine. [`SandSim`], [`HourglassSim`] and
//! [`WaterfallSim`] drive it in the three classic ways.
//!
//! # Example
//!
//! ```
//! use neogrid_core::Rgb;
//! use neogrid_sand::{Playfield, SandBox};
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut rng = SmallRng::seed_from_u64(1);
//! let mut sand = SandBox::new(8, 8, Playfield::Open);
//! sand.spawn_at(3, 0, Rgb::YELLOW);
//!
//! for _ in 0..10 {
//!     sand.update(&mut rng);
//! }
//! assert!(sand.grain_at(3, 7).is_some_and(|g| g.settled));
//! ```

mod hourglass;
mod sim;

use neogrid_core::{Addressing, Grid, Rgb};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use hourglass::{HourglassConfig, HourglassSim, Phase};
pub use sim::{SandColors, SandConfig, SandSim, WaterfallSim};

/// Earthy sand palette.
pub const SAND_COLORS: [Rgb; 5] = [
    Rgb::new(194, 178, 128),
    Rgb::new(210, 180, 140),
    Rgb::new(139, 119, 101),
    Rgb::new(255, 200, 100),
    Rgb::new(180, 140, 100),
];

/// Golden sand, the base color of hourglass grains.
pub const GOLDEN_SAND: Rgb = Rgb::new(255, 200, 100);

// ============================================================================
// Gravity and playfields
// ============================================================================

/// Which way grains fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Gravity {
    /// Toward increasing `y`.
    #[default]
    Down,
    /// Toward decreasing `y`.
    Up,
}

impl Gravity {
    /// Row step of a fall.
    pub fn dy(self) -> i32 {
        match self {
            Gravity::Down => 1,
            Gravity::Up => -1,
        }
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Gravity::Down => Gravity::Up,
            Gravity::Up => Gravity::Down,
        }
    }
}

/// Region of the grid grains may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Playfield {
    /// The whole grid.
    #[default]
    Open,
    /// Two chambers joined by a two-row neck at the middle rows.
    ///
    /// On 8x8 the rows are, top to bottom: full, full, 1..=6, 3..=4, 3..=4,
    /// 1..=6, full, full.
    Hourglass,
}

impl Playfield {
    /// Returns true if `(x, y)` is inside the grid and the playfield.
    pub fn contains(self, x: i32, y: i32, width: usize, height: usize) -> bool {
        if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
            return false;
        }
        match self {
            Playfield::Open => true,
            Playfield::Hourglass => {
                let (neck_top, neck_bottom) = neck_rows(height);
                // Distances doubled so the half-cell center stays integral.
                let dx2 = (2 * x - (width as i32 - 1)).abs();
                let max_dx2 = if y < neck_top {
                    2 * (neck_top + 1 - y) + 1
                } else if y > neck_bottom {
                    2 * (y - neck_bottom + 1) + 1
                } else {
                    2
                };
                dx2 <= max_dx2
            }
        }
    }

    /// Returns true for playfield cells with a 4-neighbor outside it.
    pub fn is_edge(self, x: usize, y: usize, width: usize, height: usize) -> bool {
        let (x, y) = (x as i32, y as i32);
        self.contains(x, y, width, height)
            && [(-1, 0), (1, 0), (0, -1), (0, 1)]
                .iter()
                .any(|&(dx, dy)| !self.contains(x + dx, y + dy, width, height))
    }

    /// Returns true if row `y` lies in the chamber grains fall away from.
    ///
    /// For the open playfield only the spawn row counts.
    pub fn in_source_chamber(self, y: usize, height: usize, gravity: Gravity) -> bool {
        let y = y as i32;
        match self {
            Playfield::Open => match gravity {
                Gravity::Down => y == 0,
                Gravity::Up => y == height as i32 - 1,
            },
            Playfield::Hourglass => {
                let (neck_top, neck_bottom) = neck_rows(height);
                match gravity {
                    Gravity::Down => y < neck_top,
                    Gravity::Up => y > neck_bottom,
                }
            }
        }
    }
}

/// Rows of the hourglass neck.
fn neck_rows(height: usize) -> (i32, i32) {
    let half = height as i32 / 2;
    (half - 1, half)
}

// ============================================================================
// Grains
// ============================================================================

/// A sand grain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grain {
    /// Column. Always equals the column of the slot holding the grain.
    pub x: usize,
    /// Row. Always equals the row of the slot holding the grain.
    pub y: usize,
    /// Display color, fixed at spawn.
    pub color: Rgb,
    /// True when the grain found no room on its last update.
    pub settled: bool,
}

impl Grain {
    /// Creates an unsettled grain.
    pub fn new(x: usize, y: usize, color: Rgb) -> Self {
        Self {
            x,
            y,
            color,
            settled: false,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Grain storage plus the settling rule.
#[derive(Debug, Clone)]
pub struct SandBox {
    slots: Grid<Option<Grain>>,
    playfield: Playfield,
    gravity: Gravity,
}

impl SandBox {
    /// Creates an empty box with downward gravity.
    pub fn new(width: usize, height: usize, playfield: Playfield) -> Self {
        Self {
            slots: Grid::new(width, height, Addressing::Bounded),
            playfield,
            gravity: Gravity::Down,
        }
    }

    /// Returns the width.
    pub fn width(&self) -> usize {
        self.slots.width()
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.slots.height()
    }

    /// Returns the playfield.
    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Returns the current gravity.
    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Returns the slot grid.
    pub fn slots(&self) -> &Grid<Option<Grain>> {
        &self.slots
    }

    /// Grain in a slot, if any.
    pub fn grain_at(&self, x: usize, y: usize) -> Option<&Grain> {
        self.slots.get(x, y).and_then(Option::as_ref)
    }

    /// Iterates grains in row-major order.
    pub fn grains(&self) -> impl Iterator<Item = &Grain> {
        self.slots.iter().flatten()
    }

    /// Number of grains.
    pub fn grain_count(&self) -> usize {
        self.slots.count(Option::is_some)
    }

    /// Number of grains that are not settled.
    pub fn active_count(&self) -> usize {
        self.grains().filter(|g| !g.settled).count()
    }

    /// Returns true if a grain may move into `(x, y)`.
    ///
    /// The cell must be in the grid, inside the playfield and empty.
    pub fn can_move_to(&self, x: i32, y: i32) -> bool {
        self.playfield.contains(x, y, self.width(), self.height())
            && self.grain_at(x as usize, y as usize).is_none()
    }

    /// Places a grain. Returns false if the cell is outside the playfield
    /// or occupied.
    pub fn spawn_at(&mut self, x: usize, y: usize, color: Rgb) -> bool {
        if !self.can_move_to(x as i32, y as i32) {
            return false;
        }
        self.slots.set(x, y, Some(Grain::new(x, y, color)))
    }

    /// Places an already settled grain. Returns false if it cannot be placed.
    pub fn place_settled(&mut self, x: usize, y: usize, color: Rgb) -> bool {
        if !self.can_move_to(x as i32, y as i32) {
            return false;
        }
        let grain = Grain {
            settled: true,
            ..Grain::new(x, y, color)
        };
        self.slots.set(x, y, Some(grain))
    }

    /// Row grains enter from: the top under downward gravity, else the bottom.
    pub fn source_row(&self) -> usize {
        match self.gravity {
            Gravity::Down => 0,
            Gravity::Up => self.height().saturating_sub(1),
        }
    }

    /// Empty playfield cells of the source row.
    pub fn open_source_cells(&self) -> Vec<usize> {
        let y = self.source_row();
        (0..self.width())
            .filter(|&x| self.can_move_to(x as i32, y as i32))
            .collect()
    }

    /// Spawns a grain in a random empty cell of the source row.
    ///
    /// Returns false if the row has no room.
    pub fn spawn_in_source_row<R: Rng + ?Sized>(&mut self, rng: &mut R, color: Rgb) -> bool {
        let open = self.open_source_cells();
        if open.is_empty() {
            return false;
        }
        let x = open[rng.random_range(0..open.len())];
        let y = self.source_row();
        self.spawn_at(x, y, color)
    }

    /// Removes and returns the grain in a slot.
    pub fn remove_at(&mut self, x: usize, y: usize) -> Option<Grain> {
        self.slots.take(x, y).flatten()
    }

    /// Returns true when every playfield cell of the source row holds a
    /// settled grain.
    pub fn is_full(&self) -> bool {
        let y = self.source_row();
        (0..self.width())
            .filter(|&x| {
                self.playfield
                    .contains(x as i32, y as i32, self.width(), self.height())
            })
            .all(|x| self.grain_at(x, y).is_some_and(|g| g.settled))
    }

    /// Returns true while any grain remains in the source chamber.
    pub fn source_chamber_occupied(&self) -> bool {
        let height = self.height();
        self.grains()
            .any(|g| self.playfield.in_source_chamber(g.y, height, self.gravity))
    }

    /// Reverses gravity and unsettles every grain.
    pub fn flip(&mut self) {
        self.gravity = self.gravity.flipped();
        for grain in self.slots.iter_mut().flatten() {
            grain.settled = false;
        }
    }

    /// Removes every grain and restores downward gravity.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.gravity = Gravity::Down;
    }

    /// Start-of-tick grain positions, nearest the destination side first and
    /// left to right within a row.
    fn processing_order(&self) -> Vec<(usize, usize)> {
        let (width, height) = (self.width(), self.height());
        let rows: Box<dyn Iterator<Item = usize>> = match self.gravity {
            Gravity::Down => Box::new((0..height).rev()),
            Gravity::Up => Box::new(0..height),
        };
        rows.flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.grain_at(x, y).is_some())
            .collect()
    }

    /// Straight target first, then both diagonals in coin-flip order.
    fn targets<R: Rng + ?Sized>(&self, x: usize, y: usize, rng: &mut R) -> [(i32, i32); 3] {
        let (x, y) = (x as i32, y as i32);
        let ty = y + self.gravity.dy();
        if rng.random_bool(0.5) {
            [(x, ty), (x + 1, ty), (x - 1, ty)]
        } else {
            [(x, ty), (x - 1, ty), (x + 1, ty)]
        }
    }

    /// Moves a grain from one slot to another, keeping its coordinates in
    /// step with the slot.
    fn transfer(&mut self, from: (usize, usize), to: (usize, usize)) {
        if let Some(mut grain) = self.remove_at(from.0, from.1) {
            grain.x = to.0;
            grain.y = to.1;
            grain.settled = false;
            self.slots.set(to.0, to.1, Some(grain));
        }
    }

    /// Advances every grain once. Returns true if any grain moved.
    ///
    /// Settled grains are re-checked too: a settled grain whose target has
    /// opened up falls again.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let mut any_moved = false;

        for (x, y) in self.processing_order() {
            let targets = self.targets(x, y, rng);
            let free = targets
                .into_iter()
                .find(|&(tx, ty)| self.can_move_to(tx, ty));

            match free {
                Some((tx, ty)) => {
                    self.transfer((x, y), (tx as usize, ty as usize));
                    any_moved = true;
                }
                None => {
                    if let Some(Some(grain)) = self.slots.get_mut(x, y) {
                        grain.settled = true;
                    }
                }
            }
        }

        any_moved
    }
}
