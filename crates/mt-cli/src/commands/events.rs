//! Events command: one page of the filtered, sorted timeline.

use std::io::Write;

use anyhow::Result;
use mt_core::{Engine, EventQuery, KeyValueStore, QueryResult};

use super::util::{build_filter, build_sort, event_line};
use crate::cli::{FilterArgs, SortArgs};

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    engine: &Engine<S>,
    filter: &FilterArgs,
    sort: &SortArgs,
    page: usize,
    json: bool,
) -> Result<()> {
    let query = EventQuery {
        filter: build_filter(filter)?,
        sort: build_sort(sort)?,
        page,
        page_size: engine.config().page_size,
    };
    let result = engine.query(&query);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write_page(writer, &result)?;
    }
    Ok(())
}

/// Writes a result page as text lines followed by a page footer.
pub fn write_page<W: Write>(writer: &mut W, result: &QueryResult) -> Result<()> {
    let page = &result.page;
    if page.total == 0 {
        writeln!(writer, "No events match.")?;
        return Ok(());
    }
    for event in &page.items {
        writeln!(writer, "{}", event_line(event))?;
    }
    let noun = if page.total == 1 { "event" } else { "events" };
    writeln!(
        writer,
        "Page {}/{} ({} {noun})",
        page.page,
        page.total_pages.max(1),
        page.total
    )?;
    Ok(())
}
