//! Hop chain: the human-readable list of `name(direction)` labels.

use std::fmt;

use crate::relay::direction::Direction;

/// Separator written between chain labels.
pub const CHAIN_SEPARATOR: char = ',';

/// Separator used by older hops; still understood when reading.
const LEGACY_SEPARATOR: &str = "->";

/// Accumulated chain as carried in `X-Hop-Chain`.
///
/// The wire value is kept verbatim; appending only ever adds a suffix, so
/// entries written by earlier hops are never rewritten or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HopChain(String);

impl HopChain {
    pub fn from_header(value: Option<&str>) -> Self {
        Self(value.map(str::trim).unwrap_or_default().to_string())
    }

    /// Label for a single visit, e.g. `tokyo(forward)`.
    pub fn label(hop: &str, direction: Direction) -> String {
        format!("{}({})", hop, direction)
    }

    /// Return a new chain with this visit appended.
    pub fn append(&self, hop: &str, direction: Direction) -> Self {
        let label = Self::label(hop, direction);
        if self.0.is_empty() {
            Self(label)
        } else {
            Self(format!("{}{}{}", self.0, CHAIN_SEPARATOR, label))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Individual labels in visit order.
    pub fn entries(&self) -> Vec<&str> {
        self.0
            .split(CHAIN_SEPARATOR)
            .flat_map(|part| part.split(LEGACY_SEPARATOR))
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }
}

impl fmt::Display for HopChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
