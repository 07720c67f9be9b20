//! Badge command.

use std::io::Write;

use anyhow::Result;
use mt_core::{Engine, KeyValueStore};

use super::util::badge_line;

pub fn run<W: Write, S: KeyValueStore>(writer: &mut W, engine: &Engine<S>, json: bool) -> Result<()> {
    let badge = engine.badge();
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&badge)?)?;
    } else {
        writeln!(writer, "{}", badge_line(&badge))?;
        if badge.active.is_some() {
            writeln!(
                writer,
                "  shipments out: {}, location changes: {}",
                badge.shipment_out, badge.location_change
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fixture_engine;

    #[test]
    fn shipment_out_outranks_location_change() {
        let engine = fixture_engine();
        let mut output = Vec::new();
        run(&mut output, &engine, false).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Unread shipments out: 1\n  shipments out: 1, location changes: 1\n"
        );
    }

    #[test]
    fn json_shape() {
        let engine = fixture_engine();
        let mut output = Vec::new();
        run(&mut output, &engine, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "shipment_out": 1,
                "location_change": 1,
                "active": "shipment_out"
            })
        );
    }
}
