//! Fixed-size 2D cell storage with wrap or bounded addressing.

use std::hash::{DefaultHasher, Hash, Hasher};

use glam::IVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::GridError;

// ============================================================================
// Addressing
// ============================================================================

/// How coordinates outside the grid are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Addressing {
    /// Toroidal: coordinates wrap modulo width/height.
    #[default]
    Wrap,
    /// Coordinates outside the grid do not exist.
    Bounded,
}

// ============================================================================
// Neighborhoods
// ============================================================================

/// A 2D neighborhood pattern.
///
/// Offsets are `(dx, dy)` relative to the center cell, which is never included.
pub trait Neighborhood2D {
    /// Returns the relative offsets of neighboring cells.
    fn offsets(&self) -> &[(i32, i32)];

    /// Returns the maximum number of neighbors.
    fn max_neighbors(&self) -> u8 {
        self.offsets().len() as u8
    }
}

/// Moore neighborhood - 8 neighbors (orthogonal + diagonal).
///
/// ```text
/// ┌───┬───┬───┐
/// │ X │ X │ X │
/// ├───┼───┼───┤
/// │ X │ · │ X │
/// ├───┼───┼───┤
/// │ X │ X │ X │
/// └───┴───┴───┘
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Moore;

impl Neighborhood2D for Moore {
    fn offsets(&self) -> &[(i32, i32)] {
        &[
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ]
    }
}

/// Von Neumann neighborhood - 4 neighbors (orthogonal only).
///
/// Ordered left, right, up, down.
#[derive(Debug, Clone, Copy, Default)]
pub struct VonNeumann;

impl Neighborhood2D for VonNeumann {
    fn offsets(&self) -> &[(i32, i32)] {
        &[(-1, 0), (1, 0), (0, -1), (0, 1)]
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Row-major grid of cells with a fixed size and addressing policy.
///
/// Cells are addressed `(x, y)` with `x` the column and `y` the row, `(0, 0)`
/// top-left. In-range access goes through [`get`](Self::get) and
/// [`set`](Self::set); signed coordinates that may fall outside the grid go
/// through [`resolve`](Self::resolve), which applies the addressing policy.
///
/// # Example
///
/// ```
/// use neogrid_core::{Addressing, Grid, Moore};
///
/// let mut grid = Grid::<bool>::new(8, 8, Addressing::Wrap);
/// grid.set(0, 0, true);
/// grid.set(7, 7, true);
///
/// // (7, 7) is a neighbor of (0, 0) on a torus.
/// assert_eq!(grid.count_neighbors(0, 0, &Moore, |&alive| alive), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    addressing: Addressing,
    cells: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a grid with every cell set to `T::default()`.
    pub fn new(width: usize, height: usize, addressing: Addressing) -> Self {
        Self::filled(width, height, addressing, T::default())
    }

    /// Resets every cell to `T::default()`.
    pub fn clear(&mut self) {
        self.fill(T::default());
    }
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, addressing: Addressing, value: T) -> Self {
        Self {
            width,
            height,
            addressing,
            cells: vec![value; width * height],
        }
    }

    /// Builds a grid from rows, rejecting empty input and ragged rows.
    pub fn from_rows(rows: Vec<Vec<T>>, addressing: Addressing) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    len: values.len(),
                    expected: width,
                });
            }
            cells.extend(values);
        }

        Ok(Self {
            width,
            height,
            addressing,
            cells,
        })
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    /// Returns the width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the addressing policy.
    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Returns true if `(x, y)` lies inside the grid without wrapping.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Resolves signed coordinates under the addressing policy.
    ///
    /// Wrapping grids always resolve; bounded grids return `None` outside.
    pub fn resolve(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        match self.addressing {
            Addressing::Wrap => Some((
                x.rem_euclid(self.width as i32) as usize,
                y.rem_euclid(self.height as i32) as usize,
            )),
            Addressing::Bounded => self.contains(x, y).then_some((x as usize, y as usize)),
        }
    }

    /// Gets an in-range cell.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Gets an in-range cell mutably.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Gets a cell by signed coordinates, applying the addressing policy.
    pub fn get_wrapped(&self, x: i32, y: i32) -> Option<&T> {
        let (x, y) = self.resolve(x, y)?;
        self.get(x, y)
    }

    /// Gets a cell by position vector, applying the addressing policy.
    pub fn at(&self, pos: IVec2) -> Option<&T> {
        self.get_wrapped(pos.x, pos.y)
    }

    /// Sets an in-range cell. Returns false if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        match self.get_mut(x, y) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Iterates the neighbors of `(x, y)` that exist under the addressing policy.
    pub fn neighbors<'a, N: Neighborhood2D + ?Sized>(
        &'a self,
        x: usize,
        y: usize,
        neighborhood: &'a N,
    ) -> impl Iterator<Item = &'a T> + 'a {
        neighborhood
            .offsets()
            .iter()
            .filter_map(move |&(dx, dy)| self.get_wrapped(x as i32 + dx, y as i32 + dy))
    }

    /// Counts neighbors of `(x, y)` matching `predicate`.
    ///
    /// Neighbors outside a bounded grid are absent and never counted.
    pub fn count_neighbors<N, F>(&self, x: usize, y: usize, neighborhood: &N, predicate: F) -> u8
    where
        N: Neighborhood2D + ?Sized,
        F: Fn(&T) -> bool,
    {
        self.neighbors(x, y, neighborhood)
            .filter(|cell| predicate(cell))
            .count() as u8
    }

    /// Counts cells matching `predicate`.
    pub fn count<F: Fn(&T) -> bool>(&self, predicate: F) -> usize {
        self.cells.iter().filter(|cell| predicate(cell)).count()
    }

    /// Iterates cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterates cells mutably in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.cells.iter_mut()
    }

    /// Iterates `(x, y, cell)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % width, i / width, cell))
    }

    /// Iterates the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Returns a new grid with `f` applied to every cell.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            addressing: self.addressing,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Takes the value out of a cell, leaving the default behind.
    pub fn take(&mut self, x: usize, y: usize) -> Option<T>
    where
        T: Default,
    {
        self.get_mut(x, y).map(std::mem::take)
    }
}

impl<T: Hash> Grid<T> {
    /// Content fingerprint of the cells.
    ///
    /// Equal grids always produce equal fingerprints within a process.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_cells(&mut hasher);
        hasher.finish()
    }

    /// Feeds the cell contents into an existing hasher.
    pub fn hash_cells<H: Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.height.hash(state);
        self.cells.hash(state);
    }
}
