//! Status command for showing where state lives and what was loaded.

use std::io::Write;

use anyhow::Result;
use mt_core::{BuildStats, Engine, KeyValueStore};

use super::util::badge_line;
use crate::Config;

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    config: &Config,
    engine: &Engine<S>,
    stats: &BuildStats,
) -> Result<()> {
    writeln!(writer, "Mold tracker status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(writer, "Logs: {}", config.logs_dir.display())?;
    if let Some(built_at) = engine.event_store().built_at() {
        writeln!(writer, "Loaded: {}", built_at.format("%Y-%m-%d %H:%M UTC"))?;
    }

    if stats.total_events() == 0 {
        writeln!(writer, "No events recorded.")?;
    } else {
        writeln!(
            writer,
            "Events: {} (location {}, shipment {}, status {})",
            stats.total_events(),
            stats.location_events,
            stats.shipment_events,
            stats.status_events
        )?;
    }
    if stats.skipped_rows > 0 {
        writeln!(writer, "Skipped rows: {}", stats.skipped_rows)?;
    }

    let snapshot = engine.read_state().snapshot();
    writeln!(
        writer,
        "Read: {}, dismissed: {}",
        snapshot.read_count(),
        snapshot.dismissed_count()
    )?;
    writeln!(writer, "{}", badge_line(&engine.badge()))?;

    Ok(())
}
