//! Seed patterns for the Game of Life.
//!
//! Patterns are ASCII art: `#` is a live cell, `.` a dead one. Each carries
//! the offset it is placed at on an 8x8 board.

use neogrid_core::GridError;

/// A named seed pattern with its placement offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    /// Catalog name.
    pub name: &'static str,
    /// Rows of `#`/`.` glyphs, top to bottom.
    pub rows: &'static [&'static str],
    /// Column offset of the top-left corner.
    pub offset_x: usize,
    /// Row offset of the top-left corner.
    pub offset_y: usize,
}

impl Pattern {
    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|row| row.chars().count()).max().unwrap_or(0)
    }

    /// Live cells relative to the pattern's top-left corner.
    ///
    /// Rejects ragged rows and unknown glyphs.
    pub fn live_cells(&self) -> Result<Vec<(usize, usize)>, GridError> {
        let expected = self.rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            let len = row.chars().count();
            if len != expected {
                return Err(GridError::RaggedRow { row: y, len, expected });
            }
            for (x, glyph) in row.chars().enumerate() {
                match glyph {
                    '#' => cells.push((x, y)),
                    '.' => {}
                    _ => return Err(GridError::Glyph { glyph, x, y }),
                }
            }
        }
        Ok(cells)
    }
}

/// Moves diagonally, period 4.
pub const GLIDER: Pattern = Pattern {
    name: "glider",
    rows: &[
        ".#.",
        "..#",
        "###",
    ],
    offset_x: 0,
    offset_y: 0,
};

/// Period-2 oscillator.
pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    rows: &["###"],
    offset_x: 2,
    offset_y: 3,
};

/// Period-2 oscillator.
pub const TOAD: Pattern = Pattern {
    name: "toad",
    rows: &[
        ".###",
        "###.",
    ],
    offset_x: 2,
    offset_y: 3,
};

/// Period-2 oscillator.
pub const BEACON: Pattern = Pattern {
    name: "beacon",
    rows: &[
        "##..",
        "##..",
        "..##",
        "..##",
    ],
    offset_x: 2,
    offset_y: 2,
};

/// Chaotic methuselah.
pub const R_PENTOMINO: Pattern = Pattern {
    name: "r_pentomino",
    rows: &[
        ".##",
        "##.",
        ".#.",
    ],
    offset_x: 2,
    offset_y: 2,
};

/// Dies out on an unbounded plane; wraps on a small torus.
pub const DIEHARD: Pattern = Pattern {
    name: "diehard",
    rows: &[
        "......#.",
        "##......",
        ".#...###",
    ],
    offset_x: 0,
    offset_y: 2,
};

/// Long-lived methuselah.
pub const ACORN: Pattern = Pattern {
    name: "acorn",
    rows: &[
        ".#.....",
        "...#...",
        "##..###",
    ],
    offset_x: 0,
    offset_y: 2,
};

/// Still life.
pub const BLOCK: Pattern = Pattern {
    name: "block",
    rows: &[
        "##",
        "##",
    ],
    offset_x: 3,
    offset_y: 3,
};

/// Still life.
pub const BEEHIVE: Pattern = Pattern {
    name: "beehive",
    rows: &[
        ".##.",
        "#..#",
        ".##.",
    ],
    offset_x: 2,
    offset_y: 3,
};

/// Two gliders on a collision course.
pub const TWO_GLIDERS: Pattern = Pattern {
    name: "two_gliders",
    rows: &[
        ".#......",
        "..#.....",
        "###.....",
        "........",
        ".....###",
        ".....#..",
        "......#.",
    ],
    offset_x: 0,
    offset_y: 0,
};

/// Reseed order. A random fill follows the last entry.
pub const CATALOG: [Pattern; 10] = [
    GLIDER,
    BLINKER,
    TOAD,
    BEACON,
    R_PENTOMINO,
    DIEHARD,
    ACORN,
    BLOCK,
    BEEHIVE,
    TWO_GLIDERS,
];

/// Looks up a catalog pattern by name.
pub fn by_name(name: &str) -> Option<&'static Pattern> {
    CATALOG.iter().find(|p| p.name == name)
}

/// Index of a catalog pattern by name.
pub fn index_of(name: &str) -> Option<usize> {
    CATALOG.iter().position(|p| p.name == name)
}
