//! Prioritized notification badge over the full event set.

use serde::Serialize;

use crate::action::ActionKind;
use crate::event::AnnotatedEvent;

/// Notification classes, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeClass {
    ShipmentOut,
    LocationChange,
}

impl BadgeClass {
    /// Priority order used to pick the displayed class.
    pub const PRIORITY: [Self; 2] = [Self::ShipmentOut, Self::LocationChange];

    pub const fn for_action(action: ActionKind) -> Option<Self> {
        match action {
            ActionKind::ShipOut => Some(Self::ShipmentOut),
            ActionKind::LocationChange => Some(Self::LocationChange),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::ShipmentOut => "shipments out",
            Self::LocationChange => "location changes",
        }
    }
}

/// Unread counts per class and the class to display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BadgeState {
    pub shipment_out: usize,
    pub location_change: usize,
    /// Highest-priority class with a non-zero count, if any.
    pub active: Option<BadgeClass>,
}

impl BadgeState {
    pub const fn count_for(&self, class: BadgeClass) -> usize {
        match class {
            BadgeClass::ShipmentOut => self.shipment_out,
            BadgeClass::LocationChange => self.location_change,
        }
    }

    /// The count shown on the badge: the active class only, never a sum.
    pub const fn displayed_count(&self) -> usize {
        match self.active {
            Some(class) => self.count_for(class),
            None => 0,
        }
    }
}

/// Computes the badge from every event, ignoring any user query.
///
/// An event counts as unread when it is recent and neither read nor dismissed.
pub fn compute_badge(events: &[AnnotatedEvent]) -> BadgeState {
    let mut state = BadgeState::default();
    for event in events.iter().filter(|e| e.is_unread_notification()) {
        match BadgeClass::for_action(event.event.action) {
            Some(BadgeClass::ShipmentOut) => state.shipment_out += 1,
            Some(BadgeClass::LocationChange) => state.location_change += 1,
            None => {}
        }
    }
    state.active = BadgeClass::PRIORITY
        .into_iter()
        .find(|class| state.count_for(*class) > 0);
    state
}
