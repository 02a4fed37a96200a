use neogrid_core::{MatrixDisplay, Rgb, Scene, Simulation, Tick, wheel};
use neogrid_life::LifeSim;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::palette::{LIFE_GREEN, life_age, life_heat};

/// How live cells are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LifeStyle {
    /// Green on black.
    #[default]
    Classic,
    /// Rainbow wheel by generation and position.
    Rainbow,
    /// By live neighbor count.
    Heat,
    /// By consecutive generations alive.
    Age,
}

impl LifeStyle {
    /// Styles in rotation order.
    pub const ALL: [LifeStyle; 4] = [
        LifeStyle::Classic,
        LifeStyle::Rainbow,
        LifeStyle::Heat,
        LifeStyle::Age,
    ];

    /// Style used after `reseeds` reseeds when rotating.
    pub fn rotation(reseeds: u64) -> Self {
        Self::ALL[(reseeds % Self::ALL.len() as u64) as usize]
    }
}

/// Game of Life with a display style.
#[derive(Debug, Clone)]
pub struct LifeScene {
    sim: LifeSim,
    style: Option<LifeStyle>,
}

impl LifeScene {
    /// Draws every pattern in `style`.
    pub fn new(sim: LifeSim, style: LifeStyle) -> Self {
        Self {
            sim,
            style: Some(style),
        }
    }

    /// Advances the style on every reseed, starting from classic.
    pub fn rotating(sim: LifeSim) -> Self {
        Self { sim, style: None }
    }

    /// Returns the simulation.
    pub fn sim(&self) -> &LifeSim {
        &self.sim
    }

    /// Style of the next frame.
    pub fn style(&self) -> LifeStyle {
        self.style
            .unwrap_or_else(|| LifeStyle::rotation(self.sim.reseeds()))
    }
}

impl Simulation for LifeScene {
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

impl Scene for LifeScene {
    fn draw(&self, display: &mut dyn MatrixDisplay) {
        let game = self.sim.game();
        let style = self.style();
        let generation = game.generation();

        display.clear();
        for (x, y, &alive) in game.cells().iter_cells() {
            if !alive {
                continue;
            }
            let color = match style {
                LifeStyle::Classic => LIFE_GREEN,
                LifeStyle::Rainbow => rainbow(generation, x, y),
                LifeStyle::Heat => life_heat(game.count_neighbors(x, y)),
                LifeStyle::Age => life_age(self.sim.ages().get(x, y).copied().unwrap_or(0)),
            };
            display.set_cell_color(x, y, color);
        }
    }
}

/// Wheel position drifting with the generation. Only the low byte matters to
/// [`wheel`], so wrapping keeps the drift smooth past `u32::MAX`.
fn rainbow(generation: u32, x: usize, y: usize) -> Rgb {
    let diagonal = (x as u32).wrapping_add(y as u32).wrapping_mul(10);
    wheel(generation.wrapping_mul(3).wrapping_add(diagonal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use neogrid_core::FrameBuffer;
    use neogrid_life::LifeConfig;

    fn blinker() -> LifeSim {
        LifeSim::new(LifeConfig::default().with_pattern("blinker")).unwrap()
    }

    fn render(scene: &LifeScene) -> FrameBuffer {
        let mut fb = FrameBuffer::new(8, 8);
        scene.draw(&mut fb);
        fb.present().unwrap();
        fb
    }

    #[test]
    fn test_classic_draws_live_cells_green() {
        let scene = LifeScene::new(blinker(), LifeStyle::Classic);
        let fb = render(&scene);
        let population = scene.sim().game().population();
        assert_eq!(fb.lit_cells(), population);
        for (x, y, &alive) in scene.sim().game().cells().iter_cells() {
            let expected = if alive { Rgb::GREEN } else { Rgb::BLACK };
            assert_eq!(fb.shown(x, y), Some(expected));
        }
    }

    #[test]
    fn test_heat_colors_by_neighbors() {
        // A blinker's middle cell has two neighbors, its ends one each.
        let scene = LifeScene::new(blinker(), LifeStyle::Heat);
        let fb = render(&scene);
        let game = scene.sim().game();
        for (x, y, &alive) in game.cells().iter_cells() {
            if alive {
                let expected = life_heat(game.count_neighbors(x, y));
                assert_eq!(fb.shown(x, y), Some(expected));
            }
        }
        assert!(fb.pixels().contains(&Rgb::GREEN));
        assert!(fb.pixels().contains(&Rgb::BLUE));
    }

    #[test]
    fn test_rainbow_uses_wheel() {
        let scene = LifeScene::new(blinker(), LifeStyle::Rainbow);
        let fb = render(&scene);
        for (x, y, &alive) in scene.sim().game().cells().iter_cells() {
            if alive {
                let expected = wheel(x as u32 * 10 + y as u32 * 10);
                assert_eq!(fb.shown(x, y), Some(expected));
            }
        }
    }

    #[test]
    fn test_rainbow_wraps_at_generation_limit() {
        // 3 * u32::MAX ends in 253 modulo 256; 253 + 30 wraps the wheel to 27.
        assert_eq!(rainbow(u32::MAX, 1, 2), wheel(27));
        assert_eq!(rainbow(0, 1, 2), wheel(30));
    }

    #[test]
    fn test_redraw_clears_dead_cells() {
        let mut scene = LifeScene::new(blinker(), LifeStyle::Classic);
        let mut fb = FrameBuffer::new(8, 8);
        scene.draw(&mut fb);
        scene.tick();
        scene.draw(&mut fb);
        fb.present().unwrap();
        assert_eq!(fb.lit_cells(), scene.sim().game().population());
    }

    #[test]
    fn test_rotation_follows_reseeds() {
        assert_eq!(LifeStyle::rotation(0), LifeStyle::Classic);
        assert_eq!(LifeStyle::rotation(3), LifeStyle::Age);
        assert_eq!(LifeStyle::rotation(6), LifeStyle::Heat);

        let mut scene = LifeScene::rotating(blinker());
        assert_eq!(scene.style(), LifeStyle::Classic);
        let mut reseeded = false;
        for _ in 0..50 {
            if scene.tick() != Tick::Advanced {
                reseeded = true;
                break;
            }
        }
        assert!(reseeded);
        assert_eq!(scene.style(), LifeStyle::Rainbow);
    }
}
