//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Unknown log source string.
    #[error("invalid event source: {value}")]
    InvalidSource { value: String },

    /// Unknown item type string.
    #[error("invalid item type: {value}")]
    InvalidItemType { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated event identifier.
    ///
    /// Event IDs are derived from the source log and the source row ID, so the
    /// same raw row always yields the same ID across rebuilds.
    EventId, "event ID"
);

impl EventId {
    /// Derives the ID for a row of the given source.
    ///
    /// Rows without their own row ID fall back to their position in the input
    /// array, which is only stable while the log is append-only.
    pub fn for_row(source: Source, row_id: Option<&str>, index: usize) -> Self {
        match row_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self(format!("{}:{id}", source.as_str())),
            None => Self(format!("{}#{index}", source.as_str())),
        }
    }
}

/// The operational log an event was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Rack/layer location changes.
    Location,
    /// Shipments between companies.
    Shipment,
    /// Status updates: audits, check-in/out.
    Status,
}

impl Source {
    /// String representation used in event IDs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Shipment => "shipment",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "location" => Ok(Self::Location),
            "shipment" => Ok(Self::Shipment),
            "status" => Ok(Self::Status),
            _ => Err(ValidationError::InvalidSource {
                value: s.to_string(),
            }),
        }
    }
}

/// Kind of tracked asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Mold,
    Cutter,
}

impl ItemType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mold => "mold",
            Self::Cutter => "cutter",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mold" => Ok(Self::Mold),
            "cutter" => Ok(Self::Cutter),
            _ => Err(ValidationError::InvalidItemType {
                value: s.to_string(),
            }),
        }
    }
}
