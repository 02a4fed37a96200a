//! Boundary between the simulations and whatever shows the pixels.
//!
//! Simulations and renderers only ever address cells by `(x, y)`. Physical
//! pixel indices, strip layout and brightness belong to the implementor.

use crate::color::Rgb;
use crate::error::DisplayError;

/// A 2D matrix of colored cells that can be flushed as one frame.
pub trait MatrixDisplay {
    /// Returns `(width, height)` in cells.
    fn dimensions(&self) -> (usize, usize);

    /// Stages a color for a cell. Out-of-range coordinates are ignored.
    fn set_cell_color(&mut self, x: usize, y: usize, color: Rgb);

    /// Flushes all staged writes to the physical display as one frame.
    fn present(&mut self) -> Result<(), DisplayError>;

    /// Sets every staged cell to black.
    ///
    /// Call [`present`](Self::present) afterwards to blank the device.
    fn clear(&mut self);

    /// Stages the same color on every cell.
    fn fill(&mut self, color: Rgb) {
        let (width, height) = self.dimensions();
        for y in 0..height {
            for x in 0..width {
                self.set_cell_color(x, y, color);
            }
        }
    }
}

/// In-memory display; useful for headless runs and tests.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    staged: Vec<Rgb>,
    shown: Vec<Rgb>,
    presents: u64,
}

impl FrameBuffer {
    /// Creates an all-black frame buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            staged: vec![Rgb::BLACK; width * height],
            shown: vec![Rgb::BLACK; width * height],
            presents: 0,
        }
    }

    /// Color last presented at `(x, y)`.
    pub fn shown(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.shown[y * self.width + x])
    }

    /// Color staged (not necessarily presented) at `(x, y)`.
    pub fn staged(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.staged[y * self.width + x])
    }

    /// Number of frames presented so far.
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Number of lit cells in the presented frame.
    pub fn lit_cells(&self) -> usize {
        self.shown.iter().filter(|c| !c.is_black()).count()
    }

    /// Presented frame, row-major.
    pub fn pixels(&self) -> &[Rgb] {
        &self.shown
    }
}

impl MatrixDisplay for FrameBuffer {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_cell_color(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.staged[y * self.width + x] = color;
        }
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.shown.copy_from_slice(&self.staged);
        self.presents += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.staged.fill(Rgb::BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_is_atomic() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_cell_color(1, 1, Rgb::RED);
        assert_eq!(fb.shown(1, 1), Some(Rgb::BLACK));
        fb.present().unwrap();
        assert_eq!(fb.shown(1, 1), Some(Rgb::RED));
        assert_eq!(fb.presents(), 1);
    }

    #[test]
    fn test_clear_then_present_blanks() {
        let mut fb = FrameBuffer::new(3, 3);
        fb.fill(Rgb::BLUE);
        fb.present().unwrap();
        assert_eq!(fb.lit_cells(), 9);
        fb.clear();
        fb.present().unwrap();
        assert_eq!(fb.lit_cells(), 0);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_cell_color(5, 0, Rgb::RED);
        fb.present().unwrap();
        assert_eq!(fb.lit_cells(), 0);
        assert_eq!(fb.shown(5, 0), None);
    }
}
