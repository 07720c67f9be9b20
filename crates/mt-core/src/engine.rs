//! Engine context: published events and read state.
//!
//! The caller constructs one [`Engine`] and threads it through every
//! operation. Builds are published whole, so queries never observe a partial
//! aggregation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::aggregate::{BuildParams, BuildStats, build_events};
use crate::badge::{BadgeState, compute_badge};
use crate::event::{AnnotatedEvent, Event};
use crate::query::{EventFilter, EventQuery, QueryResult, Summary, filter_events, run_query};
use crate::raw::{RawLogs, ReferenceData};
use crate::reference::ReferenceIndex;
use crate::store::{KeyValueStore, NotificationState, ReadStateStore};
use crate::types::EventId;

/// Error reported by a [`LogSource`].
#[derive(Debug, Error)]
#[error("failed to fetch {what}: {message}")]
pub struct SourceError {
    pub what: &'static str,
    pub message: String,
}

impl SourceError {
    pub fn new(what: &'static str, message: impl Into<String>) -> Self {
        Self {
            what,
            message: message.into(),
        }
    }
}

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The raw log collaborator failed; the previous build stays published.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// No published event has this ID.
    #[error("unknown event: {0}")]
    UnknownEvent(EventId),
}

/// Provides the current raw logs and reference data.
pub trait LogSource {
    fn current_logs(&self) -> Result<RawLogs, SourceError>;
    fn reference_data(&self) -> Result<ReferenceData, SourceError>;
}

/// Settings fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub home_company_id: String,
    pub recent_window_days: u32,
    pub page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            home_company_id: "2".to_string(),
            recent_window_days: 7,
            page_size: crate::query::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Ticket for a build in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTicket {
    generation: u64,
}

/// The most recently completed build.
#[derive(Debug, Default)]
pub struct EventStore {
    next_generation: u64,
    published_generation: Option<u64>,
    events: Vec<Event>,
    built_at: Option<DateTime<Utc>>,
}

impl EventStore {
    pub const fn begin_build(&mut self) -> BuildTicket {
        self.next_generation += 1;
        BuildTicket {
            generation: self.next_generation,
        }
    }

    /// Replaces the published events wholesale.
    ///
    /// Last completion wins, whatever order the builds started in.
    pub fn publish(&mut self, ticket: BuildTicket, events: Vec<Event>, built_at: DateTime<Utc>) {
        if let Some(previous) = self.published_generation {
            if previous > ticket.generation {
                tracing::debug!(
                    previous,
                    generation = ticket.generation,
                    "older build completed last; publishing it"
                );
            }
        }
        self.events = events;
        self.published_generation = Some(ticket.generation);
        self.built_at = Some(built_at);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub const fn published_generation(&self) -> Option<u64> {
        self.published_generation
    }

    pub const fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }
}

/// Aggregation and notification engine over a storage collaborator.
#[derive(Debug)]
pub struct Engine<S> {
    config: EngineConfig,
    store: EventStore,
    read_state: ReadStateStore<S>,
}

impl<S: KeyValueStore> Engine<S> {
    pub fn new(config: EngineConfig, storage: S) -> Self {
        Self {
            config,
            store: EventStore::default(),
            read_state: ReadStateStore::new(storage),
        }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub const fn event_store(&self) -> &EventStore {
        &self.store
    }

    pub const fn read_state(&self) -> &ReadStateStore<S> {
        &self.read_state
    }

    /// Fetches from `source` and publishes a fresh build.
    ///
    /// A fetch failure is returned as-is and leaves the previous build in place.
    pub fn refresh(
        &mut self,
        source: &dyn LogSource,
        now: DateTime<Utc>,
    ) -> Result<BuildStats, EngineError> {
        let ticket = self.store.begin_build();
        let reference = source.reference_data()?;
        let logs = source.current_logs()?;
        Ok(self.rebuild(ticket, &logs, &reference, now))
    }

    /// Builds from already-fetched inputs and publishes the result.
    pub fn rebuild(
        &mut self,
        ticket: BuildTicket,
        logs: &RawLogs,
        reference: &ReferenceData,
        now: DateTime<Utc>,
    ) -> BuildStats {
        let index = ReferenceIndex::build(reference);
        let params = BuildParams {
            home_company_id: &self.config.home_company_id,
            now,
            recent_window_days: self.config.recent_window_days,
        };
        let (events, stats) = build_events(logs, &index, &params);
        self.store.publish(ticket, events, now);
        stats
    }

    /// Starts a build whose inputs are fetched by the caller.
    pub const fn begin_build(&mut self) -> BuildTicket {
        self.store.begin_build()
    }

    /// Every published event joined with its read state.
    pub fn annotated_events(&self) -> Vec<AnnotatedEvent> {
        let snapshot = self.read_state.snapshot();
        self.store
            .events()
            .iter()
            .map(|event| AnnotatedEvent {
                is_read: snapshot.is_read(&event.id),
                event: event.clone(),
            })
            .collect()
    }

    /// Filtered, sorted and paged events plus counts over all matches.
    pub fn query(&self, query: &EventQuery) -> QueryResult {
        run_query(&self.annotated_events(), query)
    }

    /// Counts over the events matching `filter`.
    pub fn summary(&self, filter: &EventFilter) -> Summary {
        let matched = filter_events(&self.annotated_events(), filter);
        Summary::of(matched.iter().map(|e| &e.event))
    }

    /// Badge over the full event set, independent of any query.
    pub fn badge(&self) -> BadgeState {
        compute_badge(&self.annotated_events())
    }

    pub fn notification_state(&self, id: &EventId) -> NotificationState {
        self.read_state.snapshot().state_of(id)
    }

    /// Marks one published event as read and returns the updated badge.
    pub fn mark_read(&mut self, id: &EventId) -> Result<BadgeState, EngineError> {
        if !self.store.events().iter().any(|event| &event.id == id) {
            return Err(EngineError::UnknownEvent(id.clone()));
        }
        self.read_state.mark_read(id);
        tracing::debug!(event_id = %id, "marked read");
        Ok(self.badge())
    }

    /// Dismisses every recent or read event.
    ///
    /// Returns how many events this call newly dismissed, with the updated
    /// badge. Read events are included so that clearing the read set never
    /// turns an already-read event back into an unread one.
    pub fn dismiss_all(&mut self) -> (usize, BadgeState) {
        let events = self.annotated_events();
        let ids: Vec<&EventId> = events
            .iter()
            .filter(|e| e.event.is_recent || e.is_read)
            .map(|e| &e.event.id)
            .collect();
        let newly_dismissed = self.read_state.dismiss_all(ids);
        (newly_dismissed, self.badge())
    }

    /// Clears all read and dismissed flags and returns the updated badge.
    pub fn reset(&mut self) -> BadgeState {
        self.read_state.reset();
        self.badge()
    }
}
