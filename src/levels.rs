//! Level descriptors and the ordered progression table.
//!
//! Each level is an immutable [`LevelSpec`]; the session walks [`LEVELS`]
//! front to back. The table is validated once, when a session is built, so
//! the generator never sees a degenerate spec.

use std::error::Error;
use std::fmt;

use crate::CUP_COLORS;

/// Difficulty descriptor for one level. Optional knobs default to off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelSpec {
    /// Number of scored slots and of Normal cups.
    pub cup_count: usize,
    /// Countdown length for one attempt at this level.
    pub time_limit_seconds: u32,
    /// How many Normal cups repeat a color already in play.
    pub duplicate_colors: usize,
    /// How many decoy cups pad the stack (never scored).
    pub extra_cups: usize,
    /// Whether the stack carries a killer cup.
    pub has_killer_cup: bool,
}

impl LevelSpec {
    pub const fn plain(cup_count: usize, time_limit_seconds: u32) -> Self {
        Self {
            cup_count,
            time_limit_seconds,
            duplicate_colors: 0,
            extra_cups: 0,
            has_killer_cup: false,
        }
    }

    pub const fn with_duplicates(cup_count: usize, time_limit_seconds: u32, duplicate_colors: usize) -> Self {
        Self {
            cup_count,
            time_limit_seconds,
            duplicate_colors,
            extra_cups: 0,
            has_killer_cup: false,
        }
    }

    pub const fn with_extras(cup_count: usize, time_limit_seconds: u32, extra_cups: usize) -> Self {
        Self {
            cup_count,
            time_limit_seconds,
            duplicate_colors: 0,
            extra_cups,
            has_killer_cup: false,
        }
    }

    pub const fn with_killer(mut self) -> Self {
        self.has_killer_cup = true;
        self
    }
}

/// The shipped progression: ramping cup counts, then tighter timers, then
/// duplicate colors, then decoys, with killer cups in the final stretch.
pub static LEVELS: [LevelSpec; 38] = [
    LevelSpec::plain(2, 60),
    LevelSpec::plain(3, 60),
    LevelSpec::plain(4, 60),
    LevelSpec::plain(5, 60),
    LevelSpec::plain(6, 60),
    LevelSpec::plain(3, 45),
    LevelSpec::plain(4, 45),
    LevelSpec::plain(5, 45),
    LevelSpec::plain(7, 60),
    LevelSpec::plain(8, 60),
    LevelSpec::plain(9, 90),
    LevelSpec::plain(10, 90),
    LevelSpec::plain(11, 90),
    LevelSpec::plain(12, 90),
    LevelSpec::plain(9, 60),
    LevelSpec::with_duplicates(10, 75, 3),
    LevelSpec::with_duplicates(10, 75, 5),
    LevelSpec::with_duplicates(11, 75, 4),
    LevelSpec::with_duplicates(12, 75, 4),
    LevelSpec::with_duplicates(12, 75, 6),
    LevelSpec::with_extras(12, 100, 2),
    LevelSpec::with_extras(12, 100, 3),
    LevelSpec::with_extras(12, 100, 5),
    LevelSpec::with_extras(12, 100, 7),
    LevelSpec::with_extras(12, 100, 8),
    LevelSpec::plain(13, 100),
    LevelSpec::plain(14, 110),
    LevelSpec::plain(15, 120),
    LevelSpec::plain(16, 120),
    LevelSpec::plain(17, 120),
    LevelSpec::with_extras(17, 140, 2),
    LevelSpec::with_extras(17, 140, 3),
    LevelSpec::plain(18, 140),
    LevelSpec::plain(19, 140),
    LevelSpec::plain(20, 140),
    LevelSpec::plain(14, 110).with_killer(),
    LevelSpec::with_duplicates(16, 120, 4).with_killer(),
    LevelSpec::with_extras(18, 140, 3).with_killer(),
];

/// Rejected level-table configurations. These are caller bugs surfaced at
/// session construction, not runtime game outcomes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelTableError {
    EmptyTable,
    ZeroCupCount { level: usize },
    ZeroTimeLimit { level: usize },
    TooManyDuplicates { level: usize },
    PaletteExhausted { level: usize },
}

impl fmt::Display for LevelTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTable => write!(f, "level table is empty"),
            Self::ZeroCupCount { level } => write!(f, "level {level}: cup count must be at least 1"),
            Self::ZeroTimeLimit { level } => write!(f, "level {level}: time limit must be at least 1 second"),
            Self::TooManyDuplicates { level } => {
                write!(f, "level {level}: duplicate colors exceed cup count")
            }
            Self::PaletteExhausted { level } => {
                write!(f, "level {level}: needs more base colors than the palette holds")
            }
        }
    }
}

impl Error for LevelTableError {}

/// Checks every spec once, at the table/generator boundary.
pub fn validate_table(levels: &[LevelSpec]) -> Result<(), LevelTableError> {
    if levels.is_empty() {
        return Err(LevelTableError::EmptyTable);
    }
    for (level, spec) in levels.iter().enumerate() {
        if spec.cup_count < 1 {
            return Err(LevelTableError::ZeroCupCount { level });
        }
        if spec.time_limit_seconds < 1 {
            return Err(LevelTableError::ZeroTimeLimit { level });
        }
        if spec.duplicate_colors > spec.cup_count {
            return Err(LevelTableError::TooManyDuplicates { level });
        }
        if spec.cup_count - spec.duplicate_colors > CUP_COLORS.len() {
            return Err(LevelTableError::PaletteExhausted { level });
        }
    }
    Ok(())
}
