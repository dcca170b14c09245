use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction queried on the count endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    Front,
    Right,
    Left,
}

impl Heading {
    pub const ALL: [Heading; 3] = [Heading::Front, Heading::Right, Heading::Left];

    pub fn as_query(self) -> &'static str {
        match self {
            Heading::Front => "front",
            Heading::Right => "right",
            Heading::Left => "left",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Heading::Front => "↑",
            Heading::Right => "→",
            Heading::Left => "←",
        }
    }

}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown heading `{0}`, expected front, right or left")]
pub struct ParseHeadingError(pub String);

impl FromStr for Heading {
    type Err = ParseHeadingError;

    /// Accepts the query values, ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Heading::ALL
            .into_iter()
            .find(|heading| heading.as_query().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseHeadingError(value.to_string()))
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query().to_uppercase())
    }
}

/// Free-spot counts per direction for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectionalCounts {
    pub zone: String,
    pub front: u32,
    pub right: u32,
    pub left: u32,
}

impl DirectionalCounts {
    pub fn get(&self, heading: Heading) -> u32 {
        match heading {
            Heading::Front => self.front,
            Heading::Right => self.right,
            Heading::Left => self.left,
        }
    }
}
