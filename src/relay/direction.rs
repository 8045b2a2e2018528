//! Direction of travel carried on the wire with every relay request.

use std::fmt;
use std::str::FromStr;

use crate::relay::error::RelayError;

/// Which leg of the journey a request is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Moving from the originator toward the terminal hop.
    #[default]
    Forward,
    /// Carrying the generation result back toward the originator.
    Return,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Return => "return",
        }
    }

    /// Resolve the direction from a raw header value.
    ///
    /// An absent or blank header means `Forward`.
    pub fn from_header(value: Option<&str>) -> Result<Self, RelayError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Direction::Forward),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for Direction {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "return" => Ok(Direction::Return),
            _ => Err(RelayError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
