//! Read, dismiss and reset commands.

use std::io::Write;

use anyhow::Result;
use mt_core::{Engine, EventId, KeyValueStore};

use super::util::badge_line;

/// Marks one event as read.
pub fn read<W: Write, S: KeyValueStore>(
    writer: &mut W,
    engine: &mut Engine<S>,
    event_id: &str,
) -> Result<()> {
    let id = EventId::new(event_id)?;
    let badge = engine.mark_read(&id)?;
    writeln!(writer, "Marked {id} as read.")?;
    writeln!(writer, "{}", badge_line(&badge))?;
    Ok(())
}

/// Dismisses every recent or read event.
pub fn dismiss<W: Write, S: KeyValueStore>(writer: &mut W, engine: &mut Engine<S>) -> Result<()> {
    let (newly_dismissed, badge) = engine.dismiss_all();
    writeln!(writer, "Dismissed {newly_dismissed} events.")?;
    writeln!(writer, "{}", badge_line(&badge))?;
    Ok(())
}

/// Clears every read and dismissed flag.
pub fn reset<W: Write, S: KeyValueStore>(writer: &mut W, engine: &mut Engine<S>) -> Result<()> {
    let badge = engine.reset();
    writeln!(writer, "Cleared read and dismissed flags.")?;
    writeln!(writer, "{}", badge_line(&badge))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use mt_core::NotificationState;

    use super::*;
    use crate::commands::test_support::fixture_engine;

    fn output_of(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn read_moves_badge_to_next_class() {
        let mut engine = fixture_engine();
        let text = output_of(|w| read(w, &mut engine, "shipment:4"));
        assert_eq!(
            text,
            "Marked shipment:4 as read.\nUnread location changes: 1\n"
        );
    }

    #[test]
    fn read_unknown_event_fails() {
        let mut engine = fixture_engine();
        let mut output = Vec::new();
        let err = read(&mut output, &mut engine, "shipment:99").unwrap_err();
        assert_eq!(err.to_string(), "unknown event: shipment:99");
        assert!(output.is_empty());
    }

    #[test]
    fn read_blank_id_fails() {
        let mut engine = fixture_engine();
        assert!(read(&mut Vec::new(), &mut engine, "  ").is_err());
    }

    #[test]
    fn dismiss_then_reset() {
        let mut engine = fixture_engine();
        let text = output_of(|w| dismiss(w, &mut engine));
        assert_eq!(text, "Dismissed 2 events.\nNo unread notifications.\n");
        assert_eq!(
            engine.notification_state(&EventId::new("location:1").unwrap()),
            NotificationState::Dismissed
        );
        assert_eq!(
            engine.notification_state(&EventId::new("status:7").unwrap()),
            NotificationState::FreshUnread
        );

        let text = output_of(|w| dismiss(w, &mut engine));
        assert_eq!(text, "Dismissed 0 events.\nNo unread notifications.\n");

        let text = output_of(|w| reset(w, &mut engine));
        assert_eq!(
            text,
            "Cleared read and dismissed flags.\nUnread shipments out: 1\n"
        );
    }
}
