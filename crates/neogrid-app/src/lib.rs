//! Runs neogrid simulations on a terminal or in memory.
//!
//! The binary is a thin clap layer over this library: a [`ModeConfig`]
//! describes a mode, [`run_sequence`] drives one or more of them through the
//! tick, draw, present, pause loop, and a [`Pacer`] decides how long each
//! pause lasts and whether an interrupt ended the run.
//!
//! ```
//! use neogrid_app::{RunOptions, Unpaced, run_sequence, showcase};
//! use neogrid_core::FrameBuffer;
//! use std::time::Duration;
//!
//! let mut display = FrameBuffer::new(8, 8);
//! let options = RunOptions { delay: Duration::ZERO, frames: Some(3) };
//! let summaries = run_sequence(&showcase(8, 8, 0), &mut display, &mut Unpaced, &options).unwrap();
//! assert!(summaries.iter().all(|s| s.frames == 3));
//! assert_eq!(display.lit_cells(), 0);
//! ```

mod logging;
mod mode;
mod runner;
mod strip;
mod terminal;

pub use logging::{LogTarget, init_tracing};
pub use mode::{ModeConfig, showcase};
pub use runner::{Control, Pacer, RunOptions, RunSummary, Unpaced, run, run_sequence};
pub use strip::StripLayout;
pub use terminal::{DEFAULT_BRIGHTNESS, KeyPacer, TerminalDisplay, TerminalSession};

/// Frames per mode for headless runs without an explicit limit.
pub const DEFAULT_HEADLESS_FRAMES: u64 = 120;

/// Frames per mode in the showcase without an explicit limit.
pub const SHOWCASE_FRAMES: u64 = 300;
