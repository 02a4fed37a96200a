//! Error types for neogrid-core.

use thiserror::Error;

/// Errors raised while validating a simulation configuration.
///
/// All of these are construction-time failures. Runtime conditions such as
/// an extinct population or a full sand pile are reported through
/// [`Tick`](crate::Tick), never as errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Grid width or height is zero or too large.
    #[error("invalid grid dimensions {width}x{height} (each side must be 1..={max})")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
        /// Largest allowed side.
        max: usize,
    },

    /// Ant rule string has the wrong number of symbols.
    #[error("ant rule {rule:?} has {len} states (expected {min}..={max})")]
    RuleLength {
        /// The rejected rule string.
        rule: String,
        /// Number of symbols found.
        len: usize,
        /// Smallest accepted length.
        min: usize,
        /// Largest accepted length.
        max: usize,
    },

    /// Ant rule string contains an unknown symbol.
    #[error("ant rule {rule:?} has unknown symbol {symbol:?} at position {position}")]
    RuleSymbol {
        /// The rejected rule string.
        rule: String,
        /// Offending character.
        symbol: char,
        /// Character index of the offending symbol.
        position: usize,
    },

    /// A probability is outside `[0, 1]`.
    #[error("{name} must be a probability in [0, 1], got {value}")]
    Probability {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },

    /// A parameter is outside its open interval.
    #[error("{name} must lie in ({min}, {max}) exclusive, got {value}")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f32,
        /// Exclusive lower bound.
        min: f32,
        /// Exclusive upper bound.
        max: f32,
    },

    /// A `(min, max)` range is inverted or non-finite.
    #[error("{name} range [{min}, {max}] is invalid")]
    InvalidRange {
        /// Parameter name.
        name: &'static str,
        /// Lower end.
        min: f32,
        /// Upper end.
        max: f32,
    },

    /// A count parameter must be non-zero.
    #[error("{name} must be greater than zero")]
    Zero {
        /// Parameter name.
        name: &'static str,
    },

    /// A detection window needs more history than is kept.
    #[error("{name} window {window} needs a history of at least {needed}, got {capacity}")]
    WindowTooLarge {
        /// Parameter name.
        name: &'static str,
        /// Requested window.
        window: usize,
        /// History length the window requires.
        needed: usize,
        /// Configured history length.
        capacity: usize,
    },

    /// A named seed pattern does not exist.
    #[error("unknown pattern {name:?}")]
    UnknownPattern {
        /// The rejected name.
        name: String,
    },

    /// The hourglass outline does not fit the grid.
    #[error("hourglass needs at least a 2x4 grid, got {width}x{height}")]
    HourglassTooSmall {
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
}

/// Errors raised while building grids from literal data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Rows of a literal grid differ in length.
    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Length of the first row.
        expected: usize,
    },

    /// A literal grid has no rows or empty rows.
    #[error("grid literal is empty")]
    Empty,

    /// A pattern does not fit the grid it is loaded into.
    #[error("pattern {name:?} is {width}x{height}, larger than the {grid_width}x{grid_height} grid")]
    PatternTooLarge {
        /// Pattern name.
        name: &'static str,
        /// Pattern width.
        width: usize,
        /// Pattern height.
        height: usize,
        /// Grid width.
        grid_width: usize,
        /// Grid height.
        grid_height: usize,
    },

    /// A pattern glyph is neither `#` nor `.`.
    #[error("unknown pattern glyph {glyph:?} at ({x}, {y})")]
    Glyph {
        /// Offending character.
        glyph: char,
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
}

/// Errors raised by a concrete display when flushing a frame.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The underlying device or terminal failed.
    #[error("display i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Checks grid dimensions against [`MAX_DIMENSION`](crate::MAX_DIMENSION).
pub fn validate_dimensions(width: usize, height: usize) -> Result<(), ConfigError> {
    let max = crate::MAX_DIMENSION;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(ConfigError::InvalidDimensions { width, height, max });
    }
    Ok(())
}

/// Checks that `value` is a probability.
pub fn validate_probability(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Probability { name, value });
    }
    Ok(())
}

/// Checks that `(min, max)` is a finite, ordered range.
pub fn validate_range(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ConfigError::InvalidRange { name, min, max });
    }
    Ok(())
}
