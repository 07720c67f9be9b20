//! Canonical events produced by aggregation.

use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::types::{EventId, ItemType, Source};

/// Placeholder shown for an empty from/to location.
pub const EMPTY_LOCATION: &str = "-";

/// One historical action on a tracked item.
///
/// Events are rebuilt from the raw logs on every aggregation run and are never
/// persisted. Read state lives in [`crate::store::ReadStateStore`] and is joined
/// at query time via [`AnnotatedEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Deterministic identifier derived from the source and the source row ID.
    pub id: EventId,
    pub source: Source,
    pub action: ActionKind,
    pub item_type: ItemType,
    pub item_id: String,
    pub item_code: String,
    pub item_name: String,
    /// Epoch milliseconds, `0` when the raw date could not be parsed.
    pub timestamp_ms: i64,
    /// Calendar day as `YYYY-MM-DD`, empty when the raw date could not be parsed.
    pub date_key: String,
    /// The trimmed date string from the raw row.
    pub raw_date: String,
    pub from_location: String,
    pub to_location: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_id: Option<String>,
    pub handler_name: String,
    /// Whether the event falls inside the recency window at build time.
    pub is_recent: bool,
}

/// An event joined with its read state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub is_read: bool,
}

impl AnnotatedEvent {
    /// Recent and not yet read or dismissed.
    pub const fn is_unread_notification(&self) -> bool {
        self.event.is_recent && !self.is_read
    }
}

/// Recency check used when building events.
///
/// Pure in `(timestamp_ms, now_ms)`: for a fixed timestamp the result can only
/// flip from true to false as `now_ms` advances.
pub const fn is_recent(timestamp_ms: i64, now_ms: i64, window_ms: i64) -> bool {
    timestamp_ms > 0 && now_ms.saturating_sub(timestamp_ms) <= window_ms
}
