use neogrid_core::{MatrixDisplay, Scene, Simulation, Tick};
use neogrid_water::WaterSim;

use crate::palette::WaterPalette;

/// Water surface colored by height.
#[derive(Debug, Clone)]
pub struct WaterScene {
    sim: WaterSim,
    palette: WaterPalette,
}

impl WaterScene {
    /// Creates a scene.
    pub fn new(sim: WaterSim, palette: WaterPalette) -> Self {
        Self { sim, palette }
    }

    /// Returns the simulation.
    pub fn sim(&self) -> &WaterSim {
        &self.sim
    }

    /// Returns the palette.
    pub fn palette(&self) -> WaterPalette {
        self.palette
    }
}

impl Simulation for WaterScene {
    fn name(&self) -> &str {
        self.sim.name()
    }

    fn tick(&mut self) -> Tick {
        self.sim.tick()
    }

    fn frame(&self) -> u64 {
        self.sim.frame()
    }
}

impl Scene for WaterScene {
    fn draw(&self, display: &mut dyn MatrixDisplay) {
        for (x, y, &height) in self.sim.field().heights().iter_cells() {
            display.set_cell_color(x, y, self.palette.color(height));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neogrid_core::FrameBuffer;
    use neogrid_water::{DropPattern, WaterConfig};

    #[test]
    fn test_calm_surface_is_uniform() {
        let config = WaterConfig::default().with_pattern(DropPattern::Random { chance: 0.0 });
        let scene = WaterScene::new(WaterSim::new(config).unwrap(), WaterPalette::Water);
        let mut fb = FrameBuffer::new(8, 8);
        scene.draw(&mut fb);
        fb.present().unwrap();
        let calm = WaterPalette::Water.color(0.0);
        assert!(fb.pixels().iter().all(|&c| c == calm));
    }

    #[test]
    fn test_pulse_shows_crest() {
        let config = WaterConfig::default().with_pattern(DropPattern::CenterPulse);
        let mut scene = WaterScene::new(WaterSim::new(config).unwrap(), WaterPalette::Sunset);
        scene.tick();
        let mut fb = FrameBuffer::new(8, 8);
        scene.draw(&mut fb);
        fb.present().unwrap();

        let heights = scene.sim().field().heights();
        for (x, y, &h) in heights.iter_cells() {
            assert_eq!(fb.shown(x, y), Some(WaterPalette::Sunset.color(h)));
        }
        assert_ne!(fb.shown(4, 4), Some(WaterPalette::Sunset.color(0.0)));
    }
}
