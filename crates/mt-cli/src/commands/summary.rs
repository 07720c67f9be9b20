//! Summary command: counts per action over the matching events.

use std::io::Write;

use anyhow::Result;
use mt_core::{Engine, KeyValueStore};

use super::util::build_filter;
use crate::cli::FilterArgs;

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    engine: &Engine<S>,
    filter: &FilterArgs,
    json: bool,
) -> Result<()> {
    let summary = engine.summary(&build_filter(filter)?);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    writeln!(writer, "Total: {}", summary.total)?;
    for (action, count) in &summary.by_action {
        if *count > 0 {
            writeln!(writer, "  {:<16} {count}", action.label())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::commands::test_support::fixture_engine;

    #[test]
    fn text_lists_only_present_actions() {
        let engine = fixture_engine();
        let mut output = Vec::new();
        run(&mut output, &engine, &FilterArgs::default(), false).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Total: 3
          Audit            1
          Location change  1
          Ship out         1
        ");
    }

    #[test]
    fn json_reports_every_action() {
        let engine = fixture_engine();
        let filter = FilterArgs {
            handler: Some("Sato".into()),
            ..FilterArgs::default()
        };
        let mut output = Vec::new();
        run(&mut output, &engine, &filter, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["by_action"]["LOCATION_CHANGE"], 1);
        assert_eq!(value["by_action"]["SHIP_IN"], 0);
    }
}
