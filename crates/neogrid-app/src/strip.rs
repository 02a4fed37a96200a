//! Mapping between matrix coordinates and positions on an LED strip.

/// Wiring of a matrix built from one continuous LED strip.
///
/// Rows run left to right. With `serpentine` wiring every odd row runs
/// right to left, which is how most 8x8 panels are soldered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    width: usize,
    height: usize,
    serpentine: bool,
}

impl StripLayout {
    /// Creates a layout.
    pub fn new(width: usize, height: usize, serpentine: bool) -> Self {
        Self {
            width,
            height,
            serpentine,
        }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of LEDs on the strip.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Returns true for a zero-sized matrix.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strip position of a cell, or `None` outside the matrix.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let column = if self.serpentine && y % 2 == 1 {
            self.width - 1 - x
        } else {
            x
        };
        Some(y * self.width + column)
    }

    /// Cell at a strip position, or `None` past the end of the strip.
    pub fn coords(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.len() {
            return None;
        }
        let (y, column) = (index / self.width, index % self.width);
        let x = if self.serpentine && y % 2 == 1 {
            self.width - 1 - column
        } else {
            column
        };
        Some((x, y))
    }
}
