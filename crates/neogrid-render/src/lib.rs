//! Scenes: simulations paired with the colors they are shown in.
//!
//! Every scene owns its simulation, delegates [`Simulation`] to it and
//! implements [`Scene`] by staging one color per cell on a
//! [`MatrixDisplay`]. Scenes never present; the caller flushes the frame.
//!
//! # Example
//!
//! ```
//! use neogrid_core::{FrameBuffer, MatrixDisplay, Scene, Simulation};
//! use neogrid_life::{LifeConfig, LifeSim};
//! use neogrid_render::{LifeScene, LifeStyle};
//!
//! let sim = LifeSim::new(LifeConfig::default().with_pattern("glider")).unwrap();
//! let mut scene = LifeScene::new(sim, LifeStyle::Classic);
//! let mut display = FrameBuffer::new(8, 8);
//!
//! scene.tick();
//! scene.draw(&mut display);
//! display.present().unwrap();
//! assert_eq!(display.lit_cells(), 5);
//! ```
//!
//! [`Simulation`]: neogrid_core::Simulation
//! [`Scene`]: neogrid_core::Scene
//! [`MatrixDisplay`]: neogrid_core::MatrixDisplay

mod ant;
mod life;
pub mod palette;
mod sand;
mod water;

pub use ant::{AntScene, AntStyle};
pub use life::{LifeScene, LifeStyle};
pub use palette::WaterPalette;
pub use sand::{HourglassScene, SandScene, WaterfallScene};
pub use water::WaterScene;
