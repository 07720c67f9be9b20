//! Classification of raw log rows into [`ActionKind`]s.
//!
//! Rules are ordered tables of predicate → kind; the first matching rule wins.
//! Text matching is case-insensitive substring matching on trimmed text, except
//! for the check-in/out status sets which require the whole status to match.

use crate::action::ActionKind;
use crate::raw::{ShipmentRow, StatusRow};
use crate::reference::non_empty;

const AUDIT_MARKERS: &[&str] = &["audit", "inventory", "棚卸", "監査", "点検"];
const CHECKIN_STATUSES: &[&str] = &["in", "checkin", "check_in", "check-in", "入庫"];
const CHECKOUT_STATUSES: &[&str] = &["out", "checkout", "check_out", "check-out", "出庫"];
const RETURN_MARKERS: &[&str] = &[
    "return", "ship_in", "ship in", "返却", "返送", "返品", "入荷", "受入",
];
const SHIP_OUT_MARKERS: &[&str] = &["ship", "send", "出荷", "発送", "送付", "出庫"];
const MOVE_MARKERS: &[&str] = &["move", "transfer", "移動", "移管", "転送"];

/// Normalized view of a status row used by the rule table.
struct StatusFacts {
    status: String,
    audit_type: String,
    notes: String,
}

/// Normalized view of a shipment row used by the rule table.
struct ShipmentFacts<'a> {
    from: Option<&'a str>,
    to: Option<&'a str>,
    home: &'a str,
    notes: String,
}

impl ShipmentFacts<'_> {
    fn from_is_home(&self) -> bool {
        self.from == Some(self.home)
    }

    fn to_is_home(&self) -> bool {
        self.to == Some(self.home)
    }
}

type StatusRule = (fn(&StatusFacts) -> bool, ActionKind);
type ShipmentRule = (for<'a> fn(&ShipmentFacts<'a>) -> bool, ActionKind);

const STATUS_RULES: &[StatusRule] = &[
    (
        |f| !f.audit_type.is_empty() || contains_any(&f.status, AUDIT_MARKERS),
        ActionKind::Audit,
    ),
    (|f| CHECKIN_STATUSES.contains(&f.status.as_str()), ActionKind::Checkin),
    (|f| CHECKOUT_STATUSES.contains(&f.status.as_str()), ActionKind::Checkout),
    (|f| contains_any(&f.notes, RETURN_MARKERS), ActionKind::ShipIn),
    (|f| contains_any(&f.notes, SHIP_OUT_MARKERS), ActionKind::ShipOut),
];

const SHIPMENT_RULES: &[ShipmentRule] = &[
    (
        |f| f.from.is_some() && f.to.is_some() && !f.from_is_home() && !f.to_is_home(),
        ActionKind::ShipMove,
    ),
    (|f| contains_any(&f.notes, MOVE_MARKERS), ActionKind::ShipMove),
    (
        |f| f.from_is_home() && f.to.is_some() && !f.to_is_home(),
        ActionKind::ShipOut,
    ),
    (
        |f| f.from.is_some() && !f.from_is_home() && f.to_is_home(),
        ActionKind::ShipIn,
    ),
    (|f| contains_any(&f.notes, RETURN_MARKERS), ActionKind::ShipIn),
    (|f| contains_any(&f.notes, SHIP_OUT_MARKERS), ActionKind::ShipOut),
    (|f| f.to.is_some(), ActionKind::ShipOut),
];

/// Classifies a status log row.
pub fn classify_status(row: &StatusRow) -> ActionKind {
    let facts = StatusFacts {
        status: lowered(row.status.as_deref()),
        audit_type: lowered(row.audit_type.as_deref()),
        notes: lowered(row.notes.as_deref()),
    };
    STATUS_RULES
        .iter()
        .find(|(matches, _)| matches(&facts))
        .map_or(ActionKind::Other, |(_, kind)| *kind)
}

/// Classifies a shipment log row relative to the home company.
pub fn classify_shipment(row: &ShipmentRow, home_company_id: &str) -> ActionKind {
    let facts = ShipmentFacts {
        from: non_empty(row.from_company_id.as_deref()),
        to: non_empty(row.to_company_id.as_deref()),
        home: home_company_id.trim(),
        notes: lowered(row.notes.as_deref()),
    };
    SHIPMENT_RULES
        .iter()
        .find(|(matches, _)| matches(&facts))
        .map_or(ActionKind::Other, |(_, kind)| *kind)
}

fn lowered(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    !haystack.is_empty() && needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment(from: Option<&str>, to: Option<&str>, notes: Option<&str>) -> ShipmentRow {
        ShipmentRow {
            from_company_id: from.map(String::from),
            to_company_id: to.map(String::from),
            notes: notes.map(String::from),
            ..ShipmentRow::default()
        }
    }

    fn status(status: Option<&str>, audit_type: Option<&str>, notes: Option<&str>) -> StatusRow {
        StatusRow {
            status: status.map(String::from),
            audit_type: audit_type.map(String::from),
            notes: notes.map(String::from),
            ..StatusRow::default()
        }
    }

    #[test]
    fn shipment_direction_relative_to_home() {
        assert_eq!(
            classify_shipment(&shipment(Some("2"), Some("5"), None), "2"),
            ActionKind::ShipOut
        );
        assert_eq!(
            classify_shipment(&shipment(Some("5"), Some("2"), None), "2"),
            ActionKind::ShipIn
        );
        assert_eq!(
            classify_shipment(&shipment(Some("5"), Some("7"), None), "2"),
            ActionKind::ShipMove
        );
    }

    #[test]
    fn shipment_ids_are_trimmed() {
        assert_eq!(
            classify_shipment(&shipment(Some(" 2 "), Some("5 "), None), "2"),
            ActionKind::ShipOut
        );
    }

    #[test]
    fn shipment_move_notes_beat_direction() {
        assert_eq!(
            classify_shipment(&shipment(Some("2"), Some("5"), Some("Transfer to plant B")), "2"),
            ActionKind::ShipMove
        );
        assert_eq!(
            classify_shipment(&shipment(None, None, Some("倉庫へ移動")), "2"),
            ActionKind::ShipMove
        );
    }

    #[test]
    fn shipment_notes_fallback() {
        assert_eq!(
            classify_shipment(&shipment(None, None, Some("RETURNED after repair")), "2"),
            ActionKind::ShipIn
        );
        assert_eq!(
            classify_shipment(&shipment(Some("2"), None, Some("出荷済み")), "2"),
            ActionKind::ShipOut
        );
    }

    #[test]
    fn shipment_defaults() {
        assert_eq!(
            classify_shipment(&shipment(None, Some("2"), None), "2"),
            ActionKind::ShipOut
        );
        assert_eq!(
            classify_shipment(&shipment(Some("2"), None, None), "2"),
            ActionKind::Other
        );
        assert_eq!(
            classify_shipment(&shipment(None, None, None), "2"),
            ActionKind::Other
        );
    }

    #[test]
    fn status_audit_has_highest_priority() {
        assert_eq!(
            classify_status(&status(Some("in"), Some("periodic"), None)),
            ActionKind::Audit
        );
        assert_eq!(
            classify_status(&status(Some("AUDIT"), None, None)),
            ActionKind::Audit
        );
        assert_eq!(
            classify_status(&status(Some("棚卸"), None, None)),
            ActionKind::Audit
        );
    }

    #[test]
    fn status_check_in_out_sets() {
        for value in ["in", " IN ", "checkin", "check_in"] {
            assert_eq!(
                classify_status(&status(Some(value), None, None)),
                ActionKind::Checkin,
                "{value}"
            );
        }
        for value in ["out", "Checkout", "check_out"] {
            assert_eq!(
                classify_status(&status(Some(value), None, None)),
                ActionKind::Checkout,
                "{value}"
            );
        }
    }

    #[test]
    fn status_set_membership_is_not_substring() {
        assert_eq!(
            classify_status(&status(Some("inspection"), None, None)),
            ActionKind::Other
        );
    }

    #[test]
    fn status_notes_markers() {
        assert_eq!(
            classify_status(&status(None, None, Some("Return from supplier"))),
            ActionKind::ShipIn
        );
        assert_eq!(
            classify_status(&status(None, None, Some("発送しました"))),
            ActionKind::ShipOut
        );
        assert_eq!(
            classify_status(&status(Some("repaired"), None, Some("polished"))),
            ActionKind::Other
        );
    }

    #[test]
    fn blank_audit_type_is_ignored() {
        assert_eq!(
            classify_status(&status(Some("out"), Some("   "), None)),
            ActionKind::Checkout
        );
    }
}
