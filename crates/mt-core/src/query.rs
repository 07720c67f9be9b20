//! Filtering, sorting and pagination over annotated events.
//!
//! Every call recomputes from the full event list; volumes are small enough
//! that no index is kept.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::ActionKind;
use crate::dates::parse_event_date;
use crate::event::{AnnotatedEvent, Event};

/// Default number of events per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

const DATE_SEPARATORS: &[char] = &['-', '/', '.', ' ', ':'];

/// Error for unknown field or sort key names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown event field: {0}")]
pub struct UnknownField(String);

/// A derived display field of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    Date,
    ItemCode,
    ItemName,
    Action,
    From,
    To,
    Notes,
    Handler,
}

impl EventField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::ItemCode => "item_code",
            Self::ItemName => "item_name",
            Self::Action => "action",
            Self::From => "from",
            Self::To => "to",
            Self::Notes => "notes",
            Self::Handler => "handler",
        }
    }

    /// The value shown for this field. `Date` is the calendar day.
    pub fn display_value(self, event: &Event) -> &str {
        match self {
            Self::Date => &event.date_key,
            Self::ItemCode => &event.item_code,
            Self::ItemName => &event.item_name,
            Self::Action => event.action.label(),
            Self::From => &event.from_location,
            Self::To => &event.to_location,
            Self::Notes => &event.notes,
            Self::Handler => &event.handler_name,
        }
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "date" | "day" => Ok(Self::Date),
            "item_code" | "code" => Ok(Self::ItemCode),
            "item_name" | "name" => Ok(Self::ItemName),
            "action" => Ok(Self::Action),
            "from" => Ok(Self::From),
            "to" => Ok(Self::To),
            "notes" => Ok(Self::Notes),
            "handler" => Ok(Self::Handler),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Single-key sort. `Date` sorts by timestamp; every other field sorts by
/// case-insensitive display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: EventField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: EventField::Date,
            direction: SortDirection::Desc,
        }
    }
}

/// Calendar-day bounds that only filter once explicitly applied.
///
/// Editing the bounds disarms the filter, so half-entered ranges never hide
/// events until [`DateRangeFilter::apply`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeFilter {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    armed: bool,
}

impl DateRangeFilter {
    /// Sets the bounds without arming.
    pub fn stage(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.from = from;
        self.to = to;
        self.armed = false;
    }

    /// Arms the filter with the currently staged bounds.
    pub fn apply(&mut self) {
        self.armed = true;
    }

    /// Disarms and forgets both bounds.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    pub const fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.from, self.to)
    }

    /// Inclusive bounds check on a `YYYY-MM-DD` day key.
    ///
    /// Events with no parsable date fail any armed, bounded range.
    pub fn matches(&self, date_key: &str) -> bool {
        if !self.armed || (self.from.is_none() && self.to.is_none()) {
            return true;
        }
        let Ok(day) = NaiveDate::parse_from_str(date_key, "%Y-%m-%d") else {
            return false;
        };
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

/// Exact (case-insensitive) match on one display field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: EventField,
    pub value: String,
}

impl FieldFilter {
    fn matches(&self, event: &Event) -> bool {
        let wanted = self.value.trim().to_lowercase();
        if self.field == EventField::Action && event.action.as_str().to_lowercase() == wanted {
            return true;
        }
        self.field.display_value(event).trim().to_lowercase() == wanted
    }
}

/// AND-combined filter criteria. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub date_range: DateRangeFilter,
    pub action: Option<ActionKind>,
    pub handler: Option<String>,
    pub keyword: Option<String>,
    pub field: Option<FieldFilter>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.date_range.matches(&event.date_key)
            && self.action.is_none_or(|action| event.action == action)
            && self
                .handler
                .as_deref()
                .is_none_or(|handler| event.handler_name == handler.trim())
            && self
                .keyword
                .as_deref()
                .is_none_or(|keyword| matches_keyword(event, keyword))
            && self.field.as_ref().is_none_or(|field| field.matches(event))
    }
}

/// Full query: filter, sort and the requested page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub filter: EventFilter,
    pub sort: SortSpec,
    /// 1-indexed page number; 0 is treated as 1.
    pub page: usize,
    pub page_size: usize,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            filter: EventFilter::default(),
            sort: SortSpec::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Total and per-kind counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub by_action: BTreeMap<ActionKind, usize>,
}

impl Summary {
    pub fn of<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut by_action: BTreeMap<ActionKind, usize> =
            ActionKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        let mut total = 0;
        for event in events {
            total += 1;
            *by_action.entry(event.action).or_default() += 1;
        }
        Self { total, by_action }
    }
}

/// Result of [`run_query`]: the requested page and counts over all matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub page: Page<AnnotatedEvent>,
    pub summary: Summary,
}

/// Filters, sorts and paginates.
pub fn run_query(events: &[AnnotatedEvent], query: &EventQuery) -> QueryResult {
    let mut matched = filter_events(events, &query.filter);
    sort_events(&mut matched, query.sort);
    let summary = Summary::of(matched.iter().map(|e| &e.event));
    QueryResult {
        page: paginate(&matched, query.page, query.page_size),
        summary,
    }
}

/// Events matching `filter`, in input order.
pub fn filter_events(events: &[AnnotatedEvent], filter: &EventFilter) -> Vec<AnnotatedEvent> {
    events
        .iter()
        .filter(|e| filter.matches(&e.event))
        .cloned()
        .collect()
}

/// Stable sort: ties keep their input order in both directions.
pub fn sort_events(events: &mut [AnnotatedEvent], sort: SortSpec) {
    events.sort_by(|a, b| {
        let ordering = compare_by(&a.event, &b.event, sort.key);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_by(a: &Event, b: &Event, key: EventField) -> Ordering {
    match key {
        EventField::Date => a.timestamp_ms.cmp(&b.timestamp_ms),
        _ => key
            .display_value(a)
            .to_lowercase()
            .cmp(&key.display_value(b).to_lowercase()),
    }
}

/// Returns `[(page-1)*size, page*size)`, clamped to the input.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total: items.len(),
        total_pages: items.len().div_ceil(page_size),
    }
}

/// Free-text match. Date-like terms are tried as date patterns first, then
/// every term falls back to substring search.
pub fn matches_keyword(event: &Event, keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return true;
    }
    if is_date_like(keyword) && matches_date_search(&event.raw_date, keyword) {
        return true;
    }
    let needle = keyword.to_lowercase();
    [
        event.item_code.as_str(),
        event.item_name.as_str(),
        event.from_location.as_str(),
        event.to_location.as_str(),
        event.notes.as_str(),
        event.handler_name.as_str(),
        event.raw_date.as_str(),
    ]
    .join(" ")
    .to_lowercase()
    .contains(&needle)
}

fn is_date_like(term: &str) -> bool {
    term.chars().any(|c| c.is_ascii_digit())
        && term
            .chars()
            .all(|c| c.is_ascii_digit() || DATE_SEPARATORS.contains(&c))
}

fn strip_separators(value: &str) -> String {
    value.chars().filter(|c| !DATE_SEPARATORS.contains(c)).collect()
}

/// Matches a search term against the common renderings of a raw date.
///
/// Candidates are `YYYYMMDD`, `YYYY/MM/DD`, `YYYY-MM-DD`, `MMDD`, `YYYYMM`,
/// `YYYY/MM` and `YYYY-MM`; separators are stripped from both sides before a
/// substring check.
pub fn matches_date_search(raw_date: &str, term: &str) -> bool {
    let needle = strip_separators(term.trim());
    if needle.is_empty() {
        return false;
    }
    let Some(date) = parse_event_date(raw_date) else {
        return false;
    };
    ["%Y%m%d", "%Y/%m/%d", "%Y-%m-%d", "%m%d", "%Y%m", "%Y/%m", "%Y-%m"]
        .iter()
        .map(|format| strip_separators(&date.format(format).to_string()))
        .any(|candidate| candidate.contains(&needle))
}
