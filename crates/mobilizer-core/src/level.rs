//! Administrative hierarchy levels.
//!
//! The geographic hierarchy (country, state, LGA, ward, polling unit) and the
//! organizational hierarchy of a movement share the same ranks, so a single
//! enum serves both. [`OrgLevel`] and [`LocationLevel`] are aliases used where
//! the intent matters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rank in the country → polling unit hierarchy.
///
/// Variants are declared root-first, so the derived `Ord` puts `Country`
/// before `PollingUnit`. "Above" means closer to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    Country,
    State,
    Lga,
    Ward,
    PollingUnit,
}

/// Level of an organization within a movement.
pub type OrgLevel = HierarchyLevel;

/// Level of a location node.
pub type LocationLevel = HierarchyLevel;

const ALL_LEVELS: [HierarchyLevel; 5] = [
    HierarchyLevel::Country,
    HierarchyLevel::State,
    HierarchyLevel::Lga,
    HierarchyLevel::Ward,
    HierarchyLevel::PollingUnit,
];

impl HierarchyLevel {
    /// All levels, root first.
    #[must_use]
    pub fn all() -> &'static [HierarchyLevel] {
        &ALL_LEVELS
    }

    /// Distance from the root (`Country` = 0).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Country => 0,
            Self::State => 1,
            Self::Lga => 2,
            Self::Ward => 3,
            Self::PollingUnit => 4,
        }
    }

    /// The level directly above this one, `None` for `Country`.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Country => None,
            Self::State => Some(Self::Country),
            Self::Lga => Some(Self::State),
            Self::Ward => Some(Self::Lga),
            Self::PollingUnit => Some(Self::Ward),
        }
    }

    /// The level directly below this one, `None` for `PollingUnit`.
    #[must_use]
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Country => Some(Self::State),
            Self::State => Some(Self::Lga),
            Self::Lga => Some(Self::Ward),
            Self::Ward => Some(Self::PollingUnit),
            Self::PollingUnit => None,
        }
    }

    /// True when `self` is the same level as `other` or closer to the root.
    #[must_use]
    pub fn is_at_or_above(self, other: Self) -> bool {
        self.rank() <= other.rank()
    }

    /// True when `self` is the same level as `other` or further from the root.
    #[must_use]
    pub fn is_at_or_below(self, other: Self) -> bool {
        self.rank() >= other.rank()
    }

    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::State => "state",
            Self::Lga => "lga",
            Self::Ward => "ward",
            Self::PollingUnit => "polling_unit",
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hierarchy level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for HierarchyLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "country" => Ok(Self::Country),
            "state" => Ok(Self::State),
            "lga" => Ok(Self::Lga),
            "ward" => Ok(Self::Ward),
            "polling_unit" | "pollingunit" | "pu" => Ok(Self::PollingUnit),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}
