//! Action kind enum as the single source of truth for action codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical classification of one historical action on a tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Audit,
    Checkin,
    Checkout,
    LocationChange,
    ShipOut,
    ShipIn,
    ShipMove,
    Other,
}

impl ActionKind {
    /// Every kind, in summary display order.
    pub const ALL: [Self; 8] = [
        Self::Audit,
        Self::Checkin,
        Self::Checkout,
        Self::LocationChange,
        Self::ShipOut,
        Self::ShipIn,
        Self::ShipMove,
        Self::Other,
    ];

    /// Stable code used in storage, JSON and CLI flags.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audit => "AUDIT",
            Self::Checkin => "CHECKIN",
            Self::Checkout => "CHECKOUT",
            Self::LocationChange => "LOCATION_CHANGE",
            Self::ShipOut => "SHIP_OUT",
            Self::ShipIn => "SHIP_IN",
            Self::ShipMove => "SHIP_MOVE",
            Self::Other => "OTHER",
        }
    }

    /// Human-readable label for tables and exports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Audit => "Audit",
            Self::Checkin => "Check-in",
            Self::Checkout => "Check-out",
            Self::LocationChange => "Location change",
            Self::ShipOut => "Ship out",
            Self::ShipIn => "Ship in",
            Self::ShipMove => "Ship move",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = UnknownActionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "AUDIT" => Ok(Self::Audit),
            "CHECKIN" | "CHECK_IN" => Ok(Self::Checkin),
            "CHECKOUT" | "CHECK_OUT" => Ok(Self::Checkout),
            "LOCATION_CHANGE" | "LOCATION" => Ok(Self::LocationChange),
            "SHIP_OUT" => Ok(Self::ShipOut),
            "SHIP_IN" => Ok(Self::ShipIn),
            "SHIP_MOVE" => Ok(Self::ShipMove),
            "OTHER" => Ok(Self::Other),
            _ => Err(UnknownActionKind(s.to_string())),
        }
    }
}

impl Serialize for ActionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown action kind strings.
#[derive(Debug, Clone)]
pub struct UnknownActionKind(String);

impl fmt::Display for UnknownActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action kind: {}", self.0)
    }
}

impl std::error::Error for UnknownActionKind {}
