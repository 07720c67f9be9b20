//! Export command: every matching event, unpaged.

use std::io::Write;

use anyhow::Result;
use mt_core::export::{to_csv, to_text_summary};
use mt_core::query::{filter_events, sort_events};
use mt_core::{Engine, KeyValueStore};

use super::util::{build_filter, build_sort};
use crate::cli::{ExportFormat, FilterArgs, SortArgs};

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    engine: &Engine<S>,
    filter: &FilterArgs,
    sort: &SortArgs,
    format: ExportFormat,
) -> Result<()> {
    let filter = build_filter(filter)?;
    let sort = build_sort(sort)?;

    let mut events = filter_events(&engine.annotated_events(), &filter);
    sort_events(&mut events, sort);
    tracing::debug!(count = events.len(), ?format, "exporting events");

    let rendered = match format {
        ExportFormat::Csv => to_csv(events.iter().map(|e| &e.event)),
        ExportFormat::Text => to_text_summary(events.iter().map(|e| &e.event)),
    };
    writer.write_all(rendered.as_bytes())?;
    Ok(())
}
