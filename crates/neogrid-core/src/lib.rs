//! Shared building blocks for small LED-matrix simulations.
//!
//! Provides the fixed-size [`Grid`] with wrap or bounded addressing, the
//! [`FingerprintHistory`] ring buffer used for stagnation and cycle
//! detection, the [`MatrixDisplay`] boundary to the physical pixels and the
//! [`Simulation`]/[`Scene`] traits every mode implements.
//!
//! # Example
//!
//! ```
//! use neogrid_core::{Addressing, FrameBuffer, Grid, MatrixDisplay, Moore, Rgb};
//!
//! let mut grid = Grid::<bool>::new(8, 8, Addressing::Wrap);
//! grid.set(3, 3, true);
//! grid.set(4, 3, true);
//! assert_eq!(grid.count_neighbors(3, 4, &Moore, |&c| c), 2);
//!
//! let mut display = FrameBuffer::new(8, 8);
//! for (x, y, &alive) in grid.iter_cells() {
//!     if alive {
//!         display.set_cell_color(x, y, Rgb::GREEN);
//!     }
//! }
//! display.present().unwrap();
//! assert_eq!(display.lit_cells(), 2);
//! ```

mod color;
mod display;
mod error;
mod grid;
mod history;
mod sim;

pub use color::{Rgb, wheel};
pub use display::{FrameBuffer, MatrixDisplay};
pub use error::{
    ConfigError, DisplayError, GridError, validate_dimensions, validate_probability,
    validate_range,
};
pub use grid::{Addressing, Grid, Moore, Neighborhood2D, VonNeumann};
pub use history::FingerprintHistory;
pub use sim::{Mode, ResetReason, Scene, Simulation, Tick};

/// Largest accepted grid side.
pub const MAX_DIMENSION: usize = 64;

/// Side length of the reference LED matrix.
pub const DEFAULT_SIZE: usize = 8;
