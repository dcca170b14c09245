use std::fmt;
use std::str::FromStr;

/// Physical parking level; each one is identified by a token in spot names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Basement {
    #[default]
    One,
    Two,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown basement `{0}`, expected 1 or 2")]
pub struct ParseBasementError(pub String);

impl Basement {
    pub const ALL: [Basement; 2] = [Basement::One, Basement::Two];

    pub fn level(self) -> u8 {
        match self {
            Basement::One => 1,
            Basement::Two => 2,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Basement::One),
            2 => Some(Basement::Two),
            _ => None,
        }
    }

    /// Case-sensitive substring carried by every spot name on this level.
    pub fn zone_token(self) -> &'static str {
        match self {
            Basement::One => "Zone B1",
            Basement::Two => "Zone B2",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Basement::One => Basement::Two,
            Basement::Two => Basement::One,
        }
    }
}

impl fmt::Display for Basement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Basement {}", self.level())
    }
}

impl FromStr for Basement {
    type Err = ParseBasementError;

    /// Accepts `1`, `B1` or the full zone token `Zone B1`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let level = trimmed
            .strip_prefix("Zone ")
            .unwrap_or(trimmed)
            .trim_start_matches(['B', 'b']);
        level
            .parse::<u8>()
            .ok()
            .and_then(Basement::from_level)
            .ok_or_else(|| ParseBasementError(value.to_string()))
    }
}
