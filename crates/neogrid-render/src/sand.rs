use neogrid_core::{MatrixDisplay, Scene, Simulation, Tick};
use neogrid_sand::{HourglassSim, SandBox, SandSim, WaterfallSim};

use crate::palette::GLASS;

/// Stages every grain in its own color.
fn draw_grains(sand: &SandBox, display: &mut dyn MatrixDisplay) {
    for grain in sand.grains() {
        display.set_cell_color(grain.x, grain.y, grain.color);
    }
}

/// Continuous sand pile.
#[derive(Debug, Clone)]
pub struct SandScene {
    sim: SandSim,
}

impl SandScene {
    /// Creates a scene.
    pub fn new(sim: SandSim) -> Self {
        Self { sim }
    }

    /// Returns the simulation.
    pub fn sim(&self) -> &SandSim {
        &self.sim
    }
}

impl Simulation for SandScene {
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

impl Scene for SandScene {
    fn draw(&self, display: &mut dyn MatrixDisplay) {
        display.clear();
        draw_grains(self.sim.sand(), display);
    }
}

/// Hourglass with its glass outline.
#[derive(Debug, Clone)]
pub struct HourglassScene {
    sim: HourglassSim,
}

impl HourglassScene {
    /// Creates a scene.
    pub fn new(sim: HourglassSim) -> Self {
        Self { sim }
    }

    /// Returns the simulation.
    pub fn sim(&self) -> &HourglassSim {
        &self.sim
    }
}

impl Simulation for HourglassScene {
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

impl Scene for HourglassScene {
    fn draw(&self, display: &mut dyn MatrixDisplay) {
        let sand = self.sim.sand();
        let (width, height) = (sand.width(), sand.height());
        let playfield = sand.playfield();

        display.clear();
        for y in 0..height {
            for x in 0..width {
                if playfield.is_edge(x, y, width, height) {
                    display.set_cell_color(x, y, GLASS);
                }
            }
        }
        draw_grains(sand, display);
    }
}

/// Rainbow waterfall.
#[derive(Debug, Clone)]
pub struct WaterfallScene {
    sim: WaterfallSim,
}

impl WaterfallScene {
    /// Creates a scene.
    pub fn new(sim: WaterfallSim) -> Self {
        Self { sim }
    }

    /// Returns the simulation.
    pub fn sim(&self) -> &WaterfallSim {
        &self.sim
    }
}

impl Simulation for WaterfallScene {
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

impl Scene for WaterfallScene {
    fn draw(&self, display: &mut dyn MatrixDisplay) {
        display.clear();
        draw_grains(self.sim.sand(), display);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neogrid_core::{FrameBuffer, Rgb};
    use neogrid_sand::{GOLDEN_SAND, HourglassConfig, SandConfig};

    fn render(scene: &dyn Scene) -> FrameBuffer {
        let mut fb = FrameBuffer::new(8, 8);
        scene.draw(&mut fb);
        fb.present().unwrap();
        fb
    }

    #[test]
    fn test_sand_scene_draws_grains() {
        let config = SandConfig::default().with_spawn_rate(1.0).with_seed(3);
        let mut scene = SandScene::new(SandSim::new(config).unwrap());
        for _ in 0..10 {
            scene.tick();
        }
        let fb = render(&scene);
        let sand = scene.sim().sand();
        assert_eq!(fb.lit_cells(), sand.grain_count());
        for grain in sand.grains() {
            assert_eq!(fb.shown(grain.x, grain.y), Some(grain.color));
        }
    }

    #[test]
    fn test_hourglass_outline_and_grains() {
        let scene = HourglassScene::new(HourglassSim::new(HourglassConfig::default()).unwrap());
        let fb = render(&scene);

        // Neck cells are always glass edges; the lower chamber starts empty.
        assert_eq!(fb.shown(3, 3), Some(GLASS));
        assert_eq!(fb.shown(0, 7), Some(GLASS));
        assert_eq!(fb.shown(3, 6), Some(Rgb::BLACK));
        assert_eq!(fb.shown(0, 3), Some(Rgb::BLACK));

        let sand = scene.sim().sand();
        for grain in sand.grains() {
            let shown = fb.shown(grain.x, grain.y).unwrap();
            assert_eq!(shown, grain.color);
            assert!(shown.r.abs_diff(GOLDEN_SAND.r) <= 20);
        }
    }

    #[test]
    fn test_waterfall_scene_shows_stream() {
        let mut scene = WaterfallScene::new(WaterfallSim::new(8, 8, 1).unwrap());
        for _ in 0..12 {
            scene.tick();
        }
        let fb = render(&scene);
        assert_eq!(fb.lit_cells(), scene.sim().sand().grain_count());
        assert!(fb.lit_cells() > 0);
    }
}
