//! Fixed colors and state-to-color maps shared by the scenes.

use neogrid_core::Rgb;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Life
// ============================================================================

/// Live cells in the classic style.
pub const LIFE_GREEN: Rgb = Rgb::GREEN;

/// Heat color of a live cell by its live neighbor count.
///
/// Lonely cells are blue, stable green, thriving yellow, crowded red.
pub fn life_heat(neighbors: u8) -> Rgb {
    match neighbors {
        0 | 1 => Rgb::BLUE,
        2 => Rgb::GREEN,
        3 => Rgb::YELLOW,
        _ => Rgb::RED,
    }
}

/// Color of a live cell by consecutive generations alive.
pub fn life_age(age: u32) -> Rgb {
    match age {
        0..3 => Rgb::WHITE,
        3..6 => Rgb::CYAN,
        6..10 => Rgb::GREEN,
        10..20 => Rgb::YELLOW,
        _ => Rgb::new(255, 100, 0),
    }
}

// ============================================================================
// Ant
// ============================================================================

/// Painted cells of a single-ant classic trail.
pub const ANT_TRAIL: Rgb = Rgb::new(200, 200, 200);

/// Painted cells when several ants share the grid.
pub const MULTI_ANT_TRAIL: Rgb = Rgb::new(100, 100, 100);

/// Ant colors, assigned in list order and repeating.
pub const ANT_COLORS: [Rgb; 4] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE, Rgb::YELLOW];

/// Paint state colors for multi-state rules. State 0 is unpainted.
pub const ANT_STATE_COLORS: [Rgb; 8] = [
    Rgb::BLACK,
    Rgb::RED,
    Rgb::ORANGE,
    Rgb::YELLOW,
    Rgb::GREEN,
    Rgb::CYAN,
    Rgb::BLUE,
    Rgb::MAGENTA,
];

/// Color of the `index`-th ant.
pub fn ant_color(index: usize) -> Rgb {
    ANT_COLORS[index % ANT_COLORS.len()]
}

/// Color of a paint state.
pub fn ant_state(state: u8) -> Rgb {
    ANT_STATE_COLORS[state as usize % ANT_STATE_COLORS.len()]
}

// ============================================================================
// Hourglass
// ============================================================================

/// Outline of the hourglass playfield.
pub const GLASS: Rgb = Rgb::new(40, 60, 80);

// ============================================================================
// Water
// ============================================================================

/// Height mapped to the ends of a water palette.
pub const WATER_FULL_SCALE: f32 = 50.0;

/// Height-to-color maps for the water surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaterPalette {
    /// Dark blue troughs, cyan to white crests.
    #[default]
    Water,
    /// Purple depths, orange and gold crests.
    Sunset,
    /// Purple, cyan and pink bands.
    Neon,
}

impl WaterPalette {
    /// Every palette.
    pub const ALL: [WaterPalette; 3] = [
        WaterPalette::Water,
        WaterPalette::Sunset,
        WaterPalette::Neon,
    ];

    /// Short name.
    pub fn label(self) -> &'static str {
        match self {
            WaterPalette::Water => "water",
            WaterPalette::Sunset => "sunset",
            WaterPalette::Neon => "neon",
        }
    }

    /// Color of a cell at `height`.
    ///
    /// Heights are normalized by [`WATER_FULL_SCALE`] and clamped to
    /// `[-1, 1]`; calm water sits in the middle of the palette.
    pub fn color(self, height: f32) -> Rgb {
        let h = (height / WATER_FULL_SCALE).clamp(-1.0, 1.0);
        let h = if h.is_nan() { 0.0 } else { h };
        let c = |v: f32| v.clamp(0.0, 255.0) as u8;

        match self {
            WaterPalette::Water => {
                if h < 0.0 {
                    let f = 1.0 + h;
                    Rgb::new(0, c(50.0 * f), c(150.0 + 50.0 * f))
                } else {
                    Rgb::new(c(100.0 * h), c(150.0 + 100.0 * h), c(200.0 + 55.0 * h))
                }
            }
            WaterPalette::Sunset => {
                if h < 0.0 {
                    let f = 1.0 + h;
                    Rgb::new(c(50.0 * f), 0, c(100.0 + 50.0 * f))
                } else {
                    Rgb::new(c(150.0 + 105.0 * h), c(80.0 + 80.0 * h), c(50.0 * (1.0 - h)))
                }
            }
            WaterPalette::Neon => {
                if h < -0.3 {
                    Rgb::new(c(50.0 * (1.0 + h)), 0, c(200.0 * (1.0 + h)))
                } else if h < 0.3 {
                    Rgb::new(0, c(200.0 * (h + 1.0)), c(150.0 * (1.0 - h.abs())))
                } else {
                    Rgb::new(c(255.0 * h), c(100.0 * h), c(200.0 * (1.0 - h)))
                }
            }
        }
    }
}
