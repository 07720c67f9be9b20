//! Merging the three raw logs into one canonical event timeline.
//!
//! Aggregation is a pure function of the raw logs, the reference index, the
//! home company and the build time. Output is grouped by source (location,
//! shipment, status) and keeps input order within each group.

use chrono::{DateTime, Utc};

use crate::action::ActionKind;
use crate::classify::{classify_shipment, classify_status};
use crate::dates::timestamp_and_day_key;
use crate::event::{EMPTY_LOCATION, Event, is_recent};
use crate::raw::{LocationChangeRow, RawLogs, ShipmentRow, StatusRow};
use crate::reference::{ReferenceIndex, non_empty};
use crate::types::{EventId, ItemType, Source};

const DAY_MS: i64 = 86_400_000;

/// Parameters that are fixed for one aggregation run.
#[derive(Debug, Clone)]
pub struct BuildParams<'a> {
    pub home_company_id: &'a str,
    pub now: DateTime<Utc>,
    pub recent_window_days: u32,
}

impl BuildParams<'_> {
    fn window_ms(&self) -> i64 {
        i64::from(self.recent_window_days).saturating_mul(DAY_MS)
    }
}

/// Counts from one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub location_events: usize,
    pub shipment_events: usize,
    pub status_events: usize,
    /// Rows dropped for a missing item ID or an unchanged location.
    pub skipped_rows: usize,
}

impl BuildStats {
    pub const fn total_events(&self) -> usize {
        self.location_events + self.shipment_events + self.status_events
    }
}

/// Fields shared by every source before common post-processing.
struct Candidate<'r> {
    source: Source,
    row_id: Option<&'r str>,
    index: usize,
    item_type: ItemType,
    item_id: &'r str,
    action: ActionKind,
    from_location: Option<String>,
    to_location: Option<String>,
    date: Option<&'r str>,
    notes: Option<&'r str>,
    employee_id: Option<&'r str>,
}

/// Builds the event timeline from scratch.
pub fn build_events(
    logs: &RawLogs,
    index: &ReferenceIndex,
    params: &BuildParams<'_>,
) -> (Vec<Event>, BuildStats) {
    let mut stats = BuildStats::default();
    let mut events = Vec::with_capacity(logs.row_count());

    for (i, row) in logs.location.iter().enumerate() {
        match location_candidate(row, i) {
            Some(candidate) => {
                events.push(finish(candidate, index, params));
                stats.location_events += 1;
            }
            None => stats.skipped_rows += 1,
        }
    }

    for (i, row) in logs.shipments.iter().enumerate() {
        match shipment_candidate(row, i, index, params.home_company_id) {
            Some(candidate) => {
                events.push(finish(candidate, index, params));
                stats.shipment_events += 1;
            }
            None => stats.skipped_rows += 1,
        }
    }

    for (i, row) in logs.statuses.iter().enumerate() {
        match status_candidate(row, i, index) {
            Some(candidate) => {
                events.push(finish(candidate, index, params));
                stats.status_events += 1;
            }
            None => stats.skipped_rows += 1,
        }
    }

    tracing::info!(
        events = events.len(),
        skipped = stats.skipped_rows,
        "aggregated events"
    );
    (events, stats)
}

/// The row's item, preferring the mold ID when both are present.
fn item_ref<'r>(mold_id: Option<&'r str>, cutter_id: Option<&'r str>) -> Option<(ItemType, &'r str)> {
    non_empty(mold_id)
        .map(|id| (ItemType::Mold, id))
        .or_else(|| non_empty(cutter_id).map(|id| (ItemType::Cutter, id)))
}

fn location_candidate(row: &LocationChangeRow, index: usize) -> Option<Candidate<'_>> {
    let Some((item_type, item_id)) = item_ref(row.mold_id.as_deref(), row.cutter_id.as_deref())
    else {
        tracing::debug!(source = "location", index, "skipping row without item ID");
        return None;
    };
    let old_rack = row.old_rack_layer.as_deref().map(str::trim).unwrap_or_default();
    let new_rack = row.new_rack_layer.as_deref().map(str::trim).unwrap_or_default();
    if old_rack == new_rack {
        tracing::debug!(source = "location", index, "skipping unchanged location");
        return None;
    }

    Some(Candidate {
        source: Source::Location,
        row_id: row.row_id.as_deref(),
        index,
        item_type,
        item_id,
        action: ActionKind::LocationChange,
        from_location: Some(old_rack.to_string()),
        to_location: Some(new_rack.to_string()),
        date: row.date.as_deref(),
        notes: row.notes.as_deref(),
        employee_id: row.employee_id.as_deref(),
    })
}

fn shipment_candidate<'r>(
    row: &'r ShipmentRow,
    index: usize,
    refs: &ReferenceIndex,
    home_company_id: &str,
) -> Option<Candidate<'r>> {
    let Some((item_type, item_id)) = item_ref(row.mold_id.as_deref(), row.cutter_id.as_deref())
    else {
        tracing::debug!(source = "shipment", index, "skipping row without item ID");
        return None;
    };

    Some(Candidate {
        source: Source::Shipment,
        row_id: row.row_id.as_deref(),
        index,
        item_type,
        item_id,
        action: classify_shipment(row, home_company_id),
        from_location: non_empty(row.from_company_id.as_deref()).map(|id| refs.company_name(id)),
        to_location: non_empty(row.to_company_id.as_deref()).map(|id| refs.company_name(id)),
        date: row.date.as_deref(),
        notes: row.notes.as_deref(),
        employee_id: row.employee_id.as_deref(),
    })
}

fn status_candidate<'r>(
    row: &'r StatusRow,
    index: usize,
    refs: &ReferenceIndex,
) -> Option<Candidate<'r>> {
    let Some((item_type, item_id)) = item_ref(row.mold_id.as_deref(), row.cutter_id.as_deref())
    else {
        tracing::debug!(source = "status", index, "skipping row without item ID");
        return None;
    };

    Some(Candidate {
        source: Source::Status,
        row_id: row.row_id.as_deref(),
        index,
        item_type,
        item_id,
        action: classify_status(row),
        from_location: None,
        to_location: non_empty(row.destination_id.as_deref())
            .map(|id| refs.destination_name(id)),
        date: row.date.as_deref(),
        notes: row.notes.as_deref(),
        employee_id: row.employee_id.as_deref(),
    })
}

/// Common post-processing: item display values, notes, dates, recency.
fn finish(candidate: Candidate<'_>, refs: &ReferenceIndex, params: &BuildParams<'_>) -> Event {
    let item = refs.item(candidate.item_type, candidate.item_id);
    let item_code = item
        .and_then(|info| info.code.clone())
        .unwrap_or_else(|| candidate.item_id.to_string());
    let item_name = item
        .and_then(|info| info.name.clone())
        .unwrap_or_else(|| item_code.clone());

    let raw_date = candidate.date.map(str::trim).unwrap_or_default().to_string();
    let (timestamp_ms, date_key) = timestamp_and_day_key(&raw_date);

    let handler_id = non_empty(candidate.employee_id).map(String::from);
    let handler_name = handler_id
        .as_deref()
        .map_or_else(|| EMPTY_LOCATION.to_string(), |id| refs.employee_name(id));

    Event {
        id: EventId::for_row(candidate.source, candidate.row_id, candidate.index),
        source: candidate.source,
        action: candidate.action,
        item_type: candidate.item_type,
        item_id: candidate.item_id.to_string(),
        item_code,
        item_name,
        timestamp_ms,
        date_key,
        raw_date,
        from_location: location_or_placeholder(candidate.from_location),
        to_location: location_or_placeholder(candidate.to_location),
        notes: normalize_notes(candidate.notes.unwrap_or_default()),
        handler_id,
        handler_name,
        is_recent: is_recent(timestamp_ms, params.now.timestamp_millis(), params.window_ms()),
    }
}

fn location_or_placeholder(location: Option<String>) -> String {
    location
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| EMPTY_LOCATION.to_string())
}

/// Collapses whitespace runs into single spaces and trims.
pub fn normalize_notes(notes: &str) -> String {
    notes.split_whitespace().collect::<Vec<_>>().join(" ")
}
