//! Langton's Ant and its multi-state, multi-ant generalizations.
//!
//! Each cell holds a paint state in `0..n` where `n` is the length of the
//! rule string. An ant reads the state under it, turns as the rule says for
//! that state, advances the cell to the next state and moves one cell
//! forward. Several ants may share a grid; they step in list order and see
//! each other's writes within the same tick.
//!
//! # Example
//!
//! ```
//! use neogrid_ant::{AntRule, Direction, LangtonsAnt};
//! use neogrid_core::Addressing;
//!
//! let rule: AntRule = "RL".parse().unwrap();
//! let mut ant = LangtonsAnt::new(8, 8, Addressing::Wrap, rule);
//! ant.step();
//!
//! let first = &ant.ants()[0];
//! assert_eq!(first.direction, Direction::East);
//! assert_eq!((first.position.x, first.position.y), (5, 4));
//! assert_eq!(ant.state(4, 4), 1);
//! ```

mod sim;

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::str::FromStr;

use glam::IVec2;
use neogrid_core::{Addressing, ConfigError, FingerprintHistory, Grid};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use sim::{AntConfig, AntSim};

/// Fewest symbols an ant rule may have.
pub const MIN_RULE_LEN: usize = 2;

/// Most symbols an ant rule may have.
pub const MAX_RULE_LEN: usize = 16;

/// Default number of state fingerprints kept for cycle detection.
pub const DEFAULT_HISTORY: usize = 500;

/// Default length of the run compared when looking for cycles.
pub const DEFAULT_CYCLE_WINDOW: usize = 50;

// ============================================================================
// Directions and turns
// ============================================================================

/// Direction for 2D grid movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// North (up, -Y).
    #[default]
    North,
    /// East (right, +X).
    East,
    /// South (down, +Y).
    South,
    /// West (left, -X).
    West,
}

impl Direction {
    /// All four directions, clockwise from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Turns left (counter-clockwise).
    pub fn turn_left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::East => Direction::North,
            Direction::South => Direction::East,
            Direction::West => Direction::South,
        }
    }

    /// Turns right (clockwise).
    pub fn turn_right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Turns around (180 degrees).
    pub fn turn_around(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit step in this direction.
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::East => IVec2::new(1, 0),
            Direction::South => IVec2::new(0, 1),
            Direction::West => IVec2::new(-1, 0),
        }
    }
}

/// Turn instruction attached to a paint state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Turn {
    /// No turn (continue straight).
    None,
    /// Turn left (counter-clockwise).
    Left,
    /// Turn right (clockwise).
    Right,
    /// Turn around (180 degrees).
    Around,
}

impl Turn {
    /// Applies this turn to a direction.
    pub fn apply(self, dir: Direction) -> Direction {
        match self {
            Turn::None => dir,
            Turn::Left => dir.turn_left(),
            Turn::Right => dir.turn_right(),
            Turn::Around => dir.turn_around(),
        }
    }

    fn symbol(self) -> char {
        match self {
            Turn::None => 'N',
            Turn::Left => 'L',
            Turn::Right => 'R',
            Turn::Around => 'U',
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

/// A validated turn table, one [`Turn`] per paint state.
///
/// Parsed from strings such as `"RL"` or `"LLRR"`: `L` left, `R` right,
/// `N` straight on, `U` U-turn. Case is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AntRule {
    turns: Vec<Turn>,
}

impl AntRule {
    /// Number of paint states.
    pub fn states(&self) -> u8 {
        self.turns.len() as u8
    }

    /// Turn for a paint state.
    pub fn turn(&self, state: u8) -> Turn {
        self.turns
            .get(state as usize)
            .copied()
            .unwrap_or(Turn::None)
    }

    /// Turn table, indexed by paint state.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

impl Default for AntRule {
    fn default() -> Self {
        Self {
            turns: vec![Turn::Right, Turn::Left],
        }
    }
}

impl FromStr for AntRule {
    type Err = ConfigError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let len = rule.chars().count();
        if !(MIN_RULE_LEN..=MAX_RULE_LEN).contains(&len) {
            return Err(ConfigError::RuleLength {
                rule: rule.to_string(),
                len,
                min: MIN_RULE_LEN,
                max: MAX_RULE_LEN,
            });
        }

        let turns = rule
            .chars()
            .enumerate()
            .map(|(position, symbol)| match symbol.to_ascii_uppercase() {
                'L' => Ok(Turn::Left),
                'R' => Ok(Turn::Right),
                'N' => Ok(Turn::None),
                'U' => Ok(Turn::Around),
                _ => Err(ConfigError::RuleSymbol {
                    rule: rule.to_string(),
                    symbol,
                    position,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { turns })
    }
}

impl fmt::Display for AntRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for turn in &self.turns {
            write!(f, "{}", turn.symbol())?;
        }
        Ok(())
    }
}

/// Common Langton's Ant rule presets.
pub mod rules {
    /// Classic Langton's Ant: builds a highway on an open plane.
    pub const LANGTON: &str = "RL";

    /// Three states.
    pub const RLR: &str = "RLR";

    /// Symmetrical growth.
    pub const LLRR: &str = "LLRR";

    /// Filled triangles.
    pub const LRRL: &str = "LRRL";

    /// Square-filling.
    pub const RRLLLRLLLRRR: &str = "RRLLLRLLLRRR";

    /// Convoluted highway.
    pub const LLRRRLRLRLLR: &str = "LLRRRLRLRLLR";

    /// Rotation used by the chaos mode.
    pub const CHAOS: [&str; 6] = [LANGTON, RLR, LLRR, LRRL, RRLLLRLLLRRR, LLRRRLRLRLLR];
}

// ============================================================================
// Ants
// ============================================================================

/// A single walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ant {
    /// Current cell. Always inside the grid.
    pub position: IVec2,
    /// Facing.
    pub direction: Direction,
    /// Steps taken by this ant.
    pub steps: u64,
}

impl Ant {
    /// Creates an ant that has not moved yet.
    pub fn new(x: i32, y: i32, direction: Direction) -> Self {
        Self {
            position: IVec2::new(x, y),
            direction,
            steps: 0,
        }
    }

    /// Moves one cell forward.
    ///
    /// Wrapping grids wrap the position. Bounded grids clamp it to the edge
    /// and reverse the facing, checked per axis.
    fn advance(&mut self, width: usize, height: usize, addressing: Addressing) {
        let next = self.position + self.direction.offset();
        let (w, h) = (width as i32, height as i32);

        self.position = match addressing {
            Addressing::Wrap => IVec2::new(next.x.rem_euclid(w), next.y.rem_euclid(h)),
            Addressing::Bounded => {
                let mut bounced = next;
                if next.x < 0 || next.x >= w {
                    bounced.x = next.x.clamp(0, w - 1);
                    self.direction = self.direction.turn_around();
                }
                if next.y < 0 || next.y >= h {
                    bounced.y = next.y.clamp(0, h - 1);
                    self.direction = self.direction.turn_around();
                }
                bounced
            }
        };
        self.steps += 1;
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Langton's Ant with any number of ants on one shared grid.
///
/// Wrapping grids are toroidal. Bounded grids bounce ants off the walls.
#[derive(Debug, Clone)]
pub struct LangtonsAnt {
    grid: Grid<u8>,
    ants: Vec<Ant>,
    rule: AntRule,
    history: FingerprintHistory,
    cycle_window: usize,
    step_count: u64,
}

impl LangtonsAnt {
    /// Creates an empty grid with one ant at the center, facing north.
    pub fn new(width: usize, height: usize, addressing: Addressing, rule: AntRule) -> Self {
        let center = Ant::new(width as i32 / 2, height as i32 / 2, Direction::North);
        Self {
            grid: Grid::new(width, height, addressing),
            ants: vec![center],
            rule,
            history: FingerprintHistory::new(DEFAULT_HISTORY),
            cycle_window: DEFAULT_CYCLE_WINDOW,
            step_count: 0,
        }
    }

    /// Sets the fingerprint history length and cycle window.
    pub fn with_history(mut self, capacity: usize, cycle_window: usize) -> Self {
        self.history = FingerprintHistory::new(capacity);
        self.cycle_window = cycle_window;
        self
    }

    /// Replaces the ants. Positions outside the grid are wrapped or clamped.
    pub fn with_ants(mut self, ants: impl IntoIterator<Item = Ant>) -> Self {
        self.ants.clear();
        for ant in ants {
            self.add_ant(ant);
        }
        self
    }

    /// Adds an ant after the existing ones.
    pub fn add_ant(&mut self, mut ant: Ant) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        ant.position = match self.grid.addressing() {
            Addressing::Wrap => {
                IVec2::new(ant.position.x.rem_euclid(w), ant.position.y.rem_euclid(h))
            }
            Addressing::Bounded => IVec2::new(
                ant.position.x.clamp(0, w - 1),
                ant.position.y.clamp(0, h - 1),
            ),
        };
        self.ants.push(ant);
    }

    /// Returns the width.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Returns the paint-state grid.
    pub fn grid(&self) -> &Grid<u8> {
        &self.grid
    }

    /// Returns the ants in stepping order.
    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    /// Returns the rule.
    pub fn rule(&self) -> &AntRule {
        &self.rule
    }

    /// Ticks taken since construction.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Paint state of a cell (0 outside the grid).
    pub fn state(&self, x: usize, y: usize) -> u8 {
        self.grid.get(x, y).copied().unwrap_or(0)
    }

    /// Sets the paint state of a cell, reduced modulo the number of states.
    pub fn paint(&mut self, x: usize, y: usize, state: u8) {
        let states = self.rule.states().max(1);
        self.grid.set(x, y, state % states);
    }

    /// Counts cells in each paint state.
    pub fn state_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.rule.states() as usize];
        for &cell in self.grid.iter() {
            if let Some(count) = counts.get_mut(cell as usize) {
                *count += 1;
            }
        }
        counts
    }

    /// Advances every ant by one step, in list order.
    ///
    /// An ant sees the writes of the ants stepped before it in the same tick.
    pub fn step(&mut self) {
        let states = self.rule.states().max(1);
        let (width, height, addressing) = (self.width(), self.height(), self.grid.addressing());

        for ant in &mut self.ants {
            let Some(&state) = self.grid.at(ant.position) else {
                continue;
            };
            let (x, y) = (ant.position.x as usize, ant.position.y as usize);

            ant.direction = self.rule.turn(state).apply(ant.direction);
            self.grid.set(x, y, (state + 1) % states);
            ant.advance(width, height, addressing);
        }

        self.step_count += 1;
        self.history.push(self.fingerprint());
    }

    /// Advances multiple steps.
    pub fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Fingerprint of the ants' positions and facings plus the grid.
    ///
    /// Step counters are excluded, so revisiting a configuration yields the
    /// same fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for ant in &self.ants {
            ant.position.x.hash(&mut hasher);
            ant.position.y.hash(&mut hasher);
            ant.direction.hash(&mut hasher);
        }
        self.grid.hash_cells(&mut hasher);
        hasher.finish()
    }

    /// Returns true when the most recent run of states repeats an earlier one.
    pub fn is_cycling(&self) -> bool {
        self.history.repeats_tail(self.cycle_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> LangtonsAnt {
        LangtonsAnt::new(8, 8, Addressing::Wrap, AntRule::default())
    }

    fn pos(ant: &Ant) -> (i32, i32) {
        (ant.position.x, ant.position.y)
    }

    #[test]
    fn test_direction_turns() {
        for dir in Direction::ALL {
            assert_eq!(dir.turn_left().turn_right(), dir);
            assert_eq!(dir.turn_around().turn_around(), dir);
            assert_eq!(dir.turn_right().turn_right(), dir.turn_around());
        }
        assert_eq!(Direction::North.offset(), IVec2::new(0, -1));
    }

    #[test]
    fn test_rule_parsing() {
        let rule: AntRule = "rl".parse().unwrap();
        assert_eq!(rule.turns(), &[Turn::Right, Turn::Left]);
        assert_eq!(rule.to_string(), "RL");

        let rule: AntRule = "LNUR".parse().unwrap();
        assert_eq!(rule.states(), 4);
        assert_eq!(rule.turn(2), Turn::Around);

        for preset in rules::CHAOS {
            assert!(preset.parse::<AntRule>().is_ok(), "{preset}");
        }
    }

    #[test]
    fn test_rule_rejects_bad_strings() {
        assert!(matches!(
            "R".parse::<AntRule>(),
            Err(ConfigError::RuleLength { len: 1, .. })
        ));
        assert!(matches!(
            "".parse::<AntRule>(),
            Err(ConfigError::RuleLength { len: 0, .. })
        ));
        assert!(matches!(
            "RLRLRLRLRLRLRLRLR".parse::<AntRule>(),
            Err(ConfigError::RuleLength { len: 17, .. })
        ));
        assert_eq!(
            "RLX".parse::<AntRule>(),
            Err(ConfigError::RuleSymbol {
                rule: "RLX".into(),
                symbol: 'X',
                position: 2
            })
        );
    }

    #[test]
    fn test_classic_trace_first_eleven_steps() {
        let mut sim = classic();
        let expected = [
            ((5, 4), Direction::East),
            ((5, 5), Direction::South),
            ((4, 5), Direction::West),
            ((4, 4), Direction::North),
            ((3, 4), Direction::West),
            ((3, 3), Direction::North),
            ((4, 3), Direction::East),
            ((4, 4), Direction::South),
            ((3, 4), Direction::West),
            ((3, 5), Direction::South),
            ((2, 5), Direction::West),
        ];

        for (i, &(position, direction)) in expected.iter().enumerate() {
            sim.step();
            let ant = &sim.ants()[0];
            assert_eq!(pos(ant), position, "position after step {}", i + 1);
            assert_eq!(ant.direction, direction, "direction after step {}", i + 1);
        }

        let painted: Vec<_> = sim
            .grid()
            .iter_cells()
            .filter(|(_, _, s)| **s == 1)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(painted.len(), 7);
        for cell in [(4, 4), (5, 4), (5, 5), (4, 5), (3, 3), (4, 3), (3, 5)] {
            assert!(painted.contains(&cell), "{cell:?} should be painted");
        }
        assert_eq!(sim.state(3, 4), 0);
        assert_eq!(sim.ants()[0].steps, 11);
    }

    #[test]
    fn test_wraps_on_torus() {
        let rule: AntRule = "NN".parse().unwrap();
        let mut sim = LangtonsAnt::new(8, 8, Addressing::Wrap, rule)
            .with_ants([Ant::new(0, 0, Direction::West)]);
        sim.step();
        assert_eq!(pos(&sim.ants()[0]), (7, 0));
        assert_eq!(sim.ants()[0].direction, Direction::West);
    }

    #[test]
    fn test_bounces_off_walls() {
        let rule: AntRule = "NN".parse().unwrap();
        let mut sim = LangtonsAnt::new(8, 8, Addressing::Bounded, rule)
            .with_ants([Ant::new(0, 4, Direction::West)]);
        sim.step();
        let ant = sim.ants()[0];
        assert_eq!(pos(&ant), (0, 4));
        assert_eq!(ant.direction, Direction::East);

        sim.step();
        assert_eq!(pos(&sim.ants()[0]), (1, 4));
    }

    #[test]
    fn test_bounce_on_vertical_edge() {
        let rule: AntRule = "NN".parse().unwrap();
        let mut sim = LangtonsAnt::new(8, 8, Addressing::Bounded, rule)
            .with_ants([Ant::new(3, 7, Direction::South)]);
        sim.step();
        assert_eq!(pos(&sim.ants()[0]), (3, 7));
        assert_eq!(sim.ants()[0].direction, Direction::North);
    }

    #[test]
    fn test_ants_step_in_list_order() {
        let mut sim = classic().with_ants([
            Ant::new(4, 4, Direction::North),
            Ant::new(4, 4, Direction::North),
        ]);
        sim.step();

        // The first ant paints the shared cell; the second sees the paint
        // and turns the other way, clearing it again.
        let (first, second) = (sim.ants()[0], sim.ants()[1]);
        assert_eq!((pos(&first), first.direction), ((5, 4), Direction::East));
        assert_eq!((pos(&second), second.direction), ((3, 4), Direction::West));
        assert_eq!(sim.state(4, 4), 0);
        assert_eq!(sim.step_count(), 1);
    }

    #[test]
    fn test_multi_state_rule_cycles_paint() {
        let rule: AntRule = "LLRR".parse().unwrap();
        let mut sim = LangtonsAnt::new(8, 8, Addressing::Wrap, rule);
        sim.paint(4, 4, 3);
        sim.step();
        // State 3 turns right and wraps back to 0.
        assert_eq!(sim.state(4, 4), 0);
        assert_eq!(sim.ants()[0].direction, Direction::East);
        assert_eq!(sim.state_counts().iter().sum::<usize>(), 64);
    }

    #[test]
    fn test_detects_cycle() {
        // Marching straight up one column has period 16 on an 8x8 torus.
        let rule: AntRule = "NN".parse().unwrap();
        let mut sim = LangtonsAnt::new(8, 8, Addressing::Wrap, rule);
        sim.steps(99);
        assert!(!sim.is_cycling());
        sim.steps(101);
        assert!(sim.is_cycling());
    }

    #[test]
    fn test_classic_not_cycling_early() {
        let mut sim = classic();
        sim.steps(60);
        assert!(!sim.is_cycling());
    }
}
