use neogrid_ant::AntSim;
use neogrid_core::{MatrixDisplay, Rgb, Scene, Simulation, Tick, wheel};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::palette::{ANT_TRAIL, MULTI_ANT_TRAIL, ant_color, ant_state};

/// How painted cells are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AntStyle {
    /// Light gray trail, dimmer when several ants share the grid.
    #[default]
    Classic,
    /// Rainbow wheel by position and step count.
    Rainbow,
    /// Rainbow wheel running against position, so older trail cools.
    Heat,
    /// One palette color per paint state.
    MultiState,
}

impl AntStyle {
    /// Every style.
    pub const ALL: [AntStyle; 4] = [
        AntStyle::Classic,
        AntStyle::Rainbow,
        AntStyle::Heat,
        AntStyle::MultiState,
    ];

    /// Multi-state palette for rules with more than two states, classic
    /// otherwise.
    pub fn for_states(states: u8) -> Self {
        if states > 2 {
            AntStyle::MultiState
        } else {
            AntStyle::Classic
        }
    }
}

/// Langton's Ant with a display style. Ants are drawn over the trail.
#[derive(Debug, Clone)]
pub struct AntScene {
    sim: AntSim,
    style: AntStyle,
}

impl AntScene {
    /// Creates a scene.
    pub fn new(sim: AntSim, style: AntStyle) -> Self {
        Self { sim, style }
    }

    /// Returns the simulation.
    pub fn sim(&self) -> &AntSim {
        &self.sim
    }

    /// Returns the style.
    pub fn style(&self) -> AntStyle {
        self.style
    }

    fn cell_color(&self, x: usize, y: usize, state: u8) -> Rgb {
        let run = self.sim.ant();
        let steps = run.step_count() as i64;
        let (xi, yi) = (x as i64, y as i64);

        match self.style {
            AntStyle::Classic if run.ants().len() > 1 => MULTI_ANT_TRAIL,
            AntStyle::Classic => ANT_TRAIL,
            AntStyle::Rainbow => wheel((xi * 30 + yi * 30 + steps).rem_euclid(256) as u32),
            AntStyle::Heat => wheel((steps - xi * 10 - yi * 10).rem_euclid(256) as u32),
            AntStyle::MultiState => ant_state(state),
        }
    }
}

impl Simulation for AntScene {
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

impl Scene for AntScene {
    fn draw(&self, display: &mut dyn MatrixDisplay) {
        let run = self.sim.ant();

        display.clear();
        for (x, y, &state) in run.grid().iter_cells() {
            if state != 0 {
                display.set_cell_color(x, y, self.cell_color(x, y, state));
            }
        }
        for (i, ant) in run.ants().iter().enumerate() {
            let (x, y) = (ant.position.x as usize, ant.position.y as usize);
            display.set_cell_color(x, y, ant_color(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neogrid_ant::AntConfig;
    use neogrid_core::FrameBuffer;

    fn render(scene: &AntScene) -> FrameBuffer {
        let mut fb = FrameBuffer::new(8, 8);
        scene.draw(&mut fb);
        fb.present().unwrap();
        fb
    }

    fn classic() -> AntSim {
        let config = AntConfig::default()
            .with_random_start(false)
            .with_cycle_detection(false);
        AntSim::new(config).unwrap()
    }

    #[test]
    fn test_ant_drawn_red_on_top() {
        let mut scene = AntScene::new(classic(), AntStyle::Classic);
        for _ in 0..5 {
            scene.tick();
        }
        let fb = render(&scene);
        let ant = scene.sim().ant().ants()[0];
        let (x, y) = (ant.position.x as usize, ant.position.y as usize);
        assert_eq!(fb.shown(x, y), Some(Rgb::RED));
        assert!(fb.pixels().contains(&ANT_TRAIL));
    }

    #[test]
    fn test_trail_matches_painted_cells() {
        let mut scene = AntScene::new(classic(), AntStyle::Classic);
        for _ in 0..40 {
            scene.tick();
        }
        let fb = render(&scene);
        let run = scene.sim().ant();
        let ant = run.ants()[0];
        for (x, y, &state) in run.grid().iter_cells() {
            if (x as i32, y as i32) == (ant.position.x, ant.position.y) {
                continue;
            }
            let expected = if state == 0 { Rgb::BLACK } else { ANT_TRAIL };
            assert_eq!(fb.shown(x, y), Some(expected), "cell {x},{y}");
        }
    }

    #[test]
    fn test_multi_state_palette() {
        let config = AntConfig::default()
            .with_rule("LLRR")
            .with_random_start(false)
            .with_cycle_detection(false);
        let mut scene = AntScene::new(AntSim::new(config).unwrap(), AntStyle::for_states(4));
        assert_eq!(scene.style(), AntStyle::MultiState);
        for _ in 0..60 {
            scene.tick();
        }
        let fb = render(&scene);
        let run = scene.sim().ant();
        let ant = run.ants()[0];
        for (x, y, &state) in run.grid().iter_cells() {
            if (x as i32, y as i32) != (ant.position.x, ant.position.y) {
                assert_eq!(fb.shown(x, y), Some(ant_state(state)));
            }
        }
    }

    #[test]
    fn test_several_ants_get_their_colors() {
        let config = AntConfig::default().with_ants(3).with_seed(11);
        let scene = AntScene::new(AntSim::new(config).unwrap(), AntStyle::Classic);
        let fb = render(&scene);
        let ants = scene.sim().ant().ants();
        assert_eq!(ants.len(), 3);
        // Later ants overwrite earlier ones sharing a cell.
        let last = ants[2];
        let (x, y) = (last.position.x as usize, last.position.y as usize);
        assert_eq!(fb.shown(x, y), Some(Rgb::BLUE));
    }

    #[test]
    fn test_heat_wraps_negative_positions() {
        let scene = AntScene::new(classic(), AntStyle::Heat);
        assert_eq!(scene.cell_color(7, 7, 1), wheel(256 - 140));
    }
}
