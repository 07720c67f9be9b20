//! Tabular exports of an event list.

use std::fmt::Write;

use chrono::DateTime;

use crate::event::{EMPTY_LOCATION, Event};

/// CSV header, in export column order.
pub const CSV_COLUMNS: [&str; 8] = [
    "Date/Time", "Code", "Name", "Action", "From", "To", "Notes", "Handler",
];

/// Date and time for display, or the raw date when it could not be parsed.
pub fn display_datetime(event: &Event) -> String {
    if event.timestamp_ms > 0 {
        if let Some(dt) = DateTime::from_timestamp_millis(event.timestamp_ms) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    if event.raw_date.is_empty() {
        EMPTY_LOCATION.to_string()
    } else {
        event.raw_date.clone()
    }
}

fn row_cells(event: &Event) -> [String; 8] {
    [
        display_datetime(event),
        event.item_code.clone(),
        event.item_name.clone(),
        event.action.label().to_string(),
        event.from_location.clone(),
        event.to_location.clone(),
        event.notes.clone(),
        event.handler_name.clone(),
    ]
}

/// Renders events as CSV with a header row.
pub fn to_csv<'a, I>(events: I) -> String
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');
    for event in events {
        let cells = row_cells(event);
        let line: Vec<String> = cells.iter().map(|cell| csv_escape(cell)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Column titles of the text summary.
const SUMMARY_COLUMNS: [&str; 7] = [
    "Date/Time", "Code", "Name", "Action", "Route", "Handler", "Notes",
];

fn summary_cells(event: &Event) -> [String; 7] {
    [
        display_datetime(event),
        event.item_code.clone(),
        event.item_name.clone(),
        event.action.label().to_string(),
        format!("{} -> {}", event.from_location, event.to_location),
        event.handler_name.clone(),
        event.notes.clone(),
    ]
}

/// Plain-text table suitable for pasting into a message.
///
/// Columns are padded to their widest cell; rows without notes stop after
/// the handler.
pub fn to_text_summary<'a, I>(events: I) -> String
where
    I: IntoIterator<Item = &'a Event>,
{
    let rows: Vec<[String; 7]> = events.into_iter().map(summary_cells).collect();
    let noun = if rows.len() == 1 { "event" } else { "events" };
    let mut out = format!("Asset history ({} {noun})\n", rows.len());
    if rows.is_empty() {
        return out;
    }

    let header = SUMMARY_COLUMNS.map(str::to_string);
    let mut widths = [0usize; 7];
    for row in std::iter::once(&header).chain(&rows) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for row in std::iter::once(&header).chain(&rows) {
        let cells = if row[6].is_empty() { &row[..6] } else { &row[..] };
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str(" | ");
            }
            let _ = write!(line, "{cell:<width$}");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::types::{EventId, ItemType, Source};

    fn sample() -> Vec<Event> {
        vec![
            Event {
                id: EventId::new("location:1").unwrap(),
                source: Source::Location,
                action: ActionKind::LocationChange,
                item_type: ItemType::Mold,
                item_id: "M1".into(),
                item_code: "MD-001".into(),
                item_name: "Lid, large".into(),
                timestamp_ms: 1_766_050_200_000,
                date_key: "2025-12-18".into(),
                raw_date: "2025-12-18 09:30".into(),
                from_location: "3".into(),
                to_location: "5".into(),
                notes: String::new(),
                handler_id: Some("E1".into()),
                handler_name: "Tanaka".into(),
                is_recent: true,
            },
            Event {
                id: EventId::new("shipment:4").unwrap(),
                source: Source::Shipment,
                action: ActionKind::ShipOut,
                item_type: ItemType::Cutter,
                item_id: "C1".into(),
                item_code: "CT-001".into(),
                item_name: "Blade".into(),
                timestamp_ms: 0,
                date_key: String::new(),
                raw_date: "unknown".into(),
                from_location: "Home Works".into(),
                to_location: "Osaka Press".into(),
                notes: "said \"rush\"".into(),
                handler_id: None,
                handler_name: "-".into(),
                is_recent: false,
            },
        ]
    }

    #[test]
    fn csv_has_fixed_columns_and_escapes() {
        let csv = to_csv(&sample());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date/Time,Code,Name,Action,From,To,Notes,Handler");
        assert_eq!(
            lines[1],
            "2025-12-18 09:30,MD-001,\"Lid, large\",Location change,3,5,,Tanaka"
        );
        assert_eq!(
            lines[2],
            "unknown,CT-001,Blade,Ship out,Home Works,Osaka Press,\"said \"\"rush\"\"\",-"
        );
    }

    #[test]
    fn text_summary() {
        let text = to_text_summary(&sample());
        insta::assert_snapshot!(text, @r#"
        Asset history (2 events)
        Date/Time        | Code   | Name       | Action          | Route                     | Handler | Notes
        2025-12-18 09:30 | MD-001 | Lid, large | Location change | 3 -> 5                    | Tanaka
        unknown          | CT-001 | Blade      | Ship out        | Home Works -> Osaka Press | -       | said "rush"
        "#);
    }

    #[test]
    fn empty_summary() {
        assert_eq!(to_text_summary(&[]), "Asset history (0 events)\n");
    }
}
