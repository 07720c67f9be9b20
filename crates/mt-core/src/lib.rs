//! Core domain logic for mold/cutter event tracking.
//!
//! This crate contains the fundamental types and logic for:
//! - Classification: mapping raw log rows to action kinds
//! - Aggregation: merging the location, shipment and status logs into one timeline
//! - Read state: durable read/dismissed flags over a key/value store
//! - Queries: filtering, sorting and pagination of the timeline
//! - Notifications: the prioritized unread badge

mod action;
pub mod aggregate;
pub mod badge;
pub mod classify;
pub mod dates;
pub mod engine;
pub mod event;
pub mod export;
pub mod query;
pub mod raw;
pub mod reference;
pub mod schedule;
pub mod store;
mod types;

pub use action::{ActionKind, UnknownActionKind};
pub use aggregate::{BuildParams, BuildStats, build_events};
pub use badge::{BadgeClass, BadgeState, compute_badge};
pub use classify::{classify_shipment, classify_status};
pub use engine::{BuildTicket, Engine, EngineConfig, EngineError, EventStore, LogSource, SourceError};
pub use event::{AnnotatedEvent, EMPTY_LOCATION, Event};
pub use query::{
    DateRangeFilter, EventField, EventFilter, EventQuery, FieldFilter, Page, QueryResult,
    SortDirection, SortSpec, Summary, matches_date_search, run_query,
};
pub use raw::{ItemRecord, LocationChangeRow, NamedRecord, RawLogs, ReferenceData, ShipmentRow, StatusRow};
pub use reference::{ReferenceIndex, resolve_name};
pub use schedule::{Clock, Debouncer, ManualClock, PollTimer, SystemClock};
pub use store::{KeyValueStore, MemoryStore, NotificationState, ReadStateStore, StorageError};
pub use types::{EventId, ItemType, Source, ValidationError};
