//! Task priority tiers.

use super::ParsePriorityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Urgency tier of an action item.
///
/// Variants are declared most urgent first, so the derived ordering sorts
/// urgent work ahead of everything else. The storage and wire spelling is
/// `P1`, `P2` and `P3`; parsing accepts exactly those spellings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    /// High priority work (`P1`).
    #[serde(rename = "P1")]
    Urgent,
    /// Medium priority work (`P2`).
    #[serde(rename = "P2")]
    Medium,
    /// Low priority work (`P3`), assumed when nothing else is stated.
    #[default]
    #[serde(rename = "P3")]
    Low,
}

impl Priority {
    /// All tiers, most urgent first.
    pub const ALL: [Self; 3] = [Self::Urgent, Self::Medium, Self::Low];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "P1",
            Self::Medium => "P2",
            Self::Low => "P3",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Urgent => "High Priority",
            Self::Medium => "Medium Priority",
            Self::Low => "Low Priority",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "P1" => Ok(Self::Urgent),
            "P2" => Ok(Self::Medium),
            "P3" => Ok(Self::Low),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
