//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::Utc;
use mt_core::export::display_datetime;
use mt_core::{
    ActionKind, AnnotatedEvent, BadgeState, BuildStats, Engine, EventField, EventFilter,
    FieldFilter, KeyValueStore, LogSource, SortDirection, SortSpec,
};

use crate::cli::{FilterArgs, SortArgs};

/// Converts command-line filter flags into a core filter.
///
/// A date range is armed as soon as either bound is given.
pub fn build_filter(args: &FilterArgs) -> Result<EventFilter> {
    let mut filter = EventFilter {
        action: args
            .action
            .as_deref()
            .map(str::parse::<ActionKind>)
            .transpose()?,
        handler: non_blank(args.handler.as_deref()),
        keyword: non_blank(args.search.as_deref()),
        ..EventFilter::default()
    };

    if let (Some(field), Some(value)) = (args.field.as_deref(), args.value.as_deref()) {
        filter.field = Some(FieldFilter {
            field: field.parse()?,
            value: value.to_string(),
        });
    }

    if args.from.is_some() || args.to.is_some() {
        if let (Some(from), Some(to)) = (args.from, args.to) {
            anyhow::ensure!(from <= to, "--from {from} is after --to {to}");
        }
        filter.date_range.stage(args.from, args.to);
        filter.date_range.apply();
    }

    Ok(filter)
}

pub fn build_sort(args: &SortArgs) -> Result<SortSpec> {
    let key: EventField = args.sort.parse()?;
    let direction = if args.asc {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };
    Ok(SortSpec { key, direction })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Rebuilds the engine's events from `source` as of now.
pub fn refresh<S: KeyValueStore>(
    engine: &mut Engine<S>,
    source: &dyn LogSource,
) -> Result<BuildStats> {
    let stats = engine
        .refresh(source, Utc::now())
        .context("failed to load event logs")?;
    tracing::debug!(
        events = stats.total_events(),
        skipped = stats.skipped_rows,
        "events rebuilt"
    );
    Ok(stats)
}

/// One-line badge description.
pub fn badge_line(badge: &BadgeState) -> String {
    match badge.active {
        Some(class) => format!("Unread {}: {}", class.label(), badge.displayed_count()),
        None => "No unread notifications.".to_string(),
    }
}

/// One-line event description. Unread notifications are starred.
pub fn event_line(event: &AnnotatedEvent) -> String {
    let marker = if event.is_unread_notification() { "*" } else { " " };
    let e = &event.event;
    format!(
        "{marker} {:<16} {:<16} {:<12} {:<16} {} -> {} ({})",
        e.id.as_str(),
        display_datetime(e),
        e.item_code,
        e.action.label(),
        e.from_location,
        e.to_location,
        e.handler_name,
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mt_core::BadgeClass;

    use super::*;

    #[test]
    fn empty_flags_build_an_open_filter() {
        let filter = build_filter(&FilterArgs::default()).unwrap();
        assert_eq!(filter, EventFilter::default());
    }

    #[test]
    fn one_bound_arms_the_range() {
        let args = FilterArgs {
            to: NaiveDate::from_ymd_opt(2025, 12, 18),
            ..FilterArgs::default()
        };
        let filter = build_filter(&args).unwrap();
        assert!(filter.date_range.is_armed());
        assert!(filter.date_range.matches("2025-12-18"));
        assert!(!filter.date_range.matches("2025-12-19"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let args = FilterArgs {
            from: NaiveDate::from_ymd_opt(2025, 12, 19),
            to: NaiveDate::from_ymd_opt(2025, 12, 18),
            ..FilterArgs::default()
        };
        assert!(build_filter(&args).is_err());
    }

    #[test]
    fn unknown_action_and_field_are_errors() {
        let args = FilterArgs {
            action: Some("teleport".into()),
            ..FilterArgs::default()
        };
        assert!(build_filter(&args).is_err());

        let sort = SortArgs {
            sort: "colour".into(),
            asc: false,
        };
        assert!(build_sort(&sort).is_err());
    }

    #[test]
    fn badge_line_shows_active_class_only() {
        let badge = BadgeState {
            shipment_out: 2,
            location_change: 5,
            active: Some(BadgeClass::ShipmentOut),
        };
        assert_eq!(badge_line(&badge), "Unread shipments out: 2");
        assert_eq!(
            badge_line(&BadgeState::default()),
            "No unread notifications."
        );
    }
}
