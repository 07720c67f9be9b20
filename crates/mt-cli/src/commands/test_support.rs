//! Shared fixtures for command tests.

use chrono::{DateTime, Utc};
use mt_core::{
    Engine, EngineConfig, ItemRecord, LocationChangeRow, MemoryStore, NamedRecord, RawLogs,
    ReferenceData, ShipmentRow, StatusRow,
};

pub fn fixture_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-12-20T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn named(id: &str, name: &str) -> NamedRecord {
    NamedRecord {
        id: Some(id.into()),
        name: Some(name.into()),
    }
}

pub fn fixture_logs() -> RawLogs {
    RawLogs {
        location: vec![LocationChangeRow {
            row_id: Some("1".into()),
            mold_id: Some("M1".into()),
            old_rack_layer: Some("3".into()),
            new_rack_layer: Some("5".into()),
            date: Some("2025-12-18 09:30".into()),
            employee_id: Some("E2".into()),
            ..LocationChangeRow::default()
        }],
        shipments: vec![ShipmentRow {
            row_id: Some("4".into()),
            mold_id: Some("M1".into()),
            from_company_id: Some("2".into()),
            to_company_id: Some("5".into()),
            date: Some("2025-12-19".into()),
            employee_id: Some("E1".into()),
            ..ShipmentRow::default()
        }],
        statuses: vec![StatusRow {
            row_id: Some("7".into()),
            cutter_id: Some("C1".into()),
            audit_type: Some("Full".into()),
            destination_id: Some("D2".into()),
            date: Some("2025-12-10".into()),
            ..StatusRow::default()
        }],
    }
}

pub fn fixture_reference() -> ReferenceData {
    ReferenceData {
        molds: vec![ItemRecord {
            id: Some("M1".into()),
            code: Some("MD-001".into()),
            name: Some("Lid".into()),
        }],
        cutters: vec![ItemRecord {
            id: Some("C1".into()),
            code: Some("CT-001".into()),
            name: Some("Blade".into()),
        }],
        companies: vec![named("2", "Home Works"), named("5", "Osaka Press")],
        employees: vec![named("E1", "Tanaka"), named("E2", "Sato")],
        destinations: vec![named("D2", "Line 2")],
    }
}

/// An in-memory engine holding one location change, one shipment out and
/// one older audit.
pub fn fixture_engine() -> Engine<MemoryStore> {
    let mut engine = Engine::new(EngineConfig::default(), MemoryStore::default());
    let ticket = engine.begin_build();
    engine.rebuild(ticket, &fixture_logs(), &fixture_reference(), fixture_now());
    engine
}
