//! ID→record lookup maps over the reference data.

use std::collections::HashMap;

use crate::raw::{ItemRecord, NamedRecord, ReferenceData};
use crate::types::ItemType;

/// Display values for one mold or cutter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    pub code: Option<String>,
    pub name: Option<String>,
}

/// Lookup maps keyed by trimmed string ID.
///
/// Mold and cutter IDs are separate ID spaces, so items are keyed by
/// `(ItemType, id)`. When the input holds the same ID twice the later record wins.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    items: HashMap<(ItemType, String), ItemInfo>,
    companies: HashMap<String, String>,
    employees: HashMap<String, String>,
    destinations: HashMap<String, String>,
}

impl ReferenceIndex {
    /// Builds every map from the reference collaborator's arrays.
    pub fn build(data: &ReferenceData) -> Self {
        let mut items = HashMap::new();
        insert_items(&mut items, ItemType::Mold, &data.molds);
        insert_items(&mut items, ItemType::Cutter, &data.cutters);

        let index = Self {
            items,
            companies: name_map(&data.companies),
            employees: name_map(&data.employees),
            destinations: name_map(&data.destinations),
        };
        tracing::debug!(
            items = index.items.len(),
            companies = index.companies.len(),
            employees = index.employees.len(),
            destinations = index.destinations.len(),
            "built reference index"
        );
        index
    }

    pub fn item(&self, item_type: ItemType, id: &str) -> Option<&ItemInfo> {
        self.items.get(&(item_type, id.trim().to_string()))
    }

    /// Company display name, or the raw ID when unknown.
    pub fn company_name(&self, id: &str) -> String {
        resolve_name(&self.companies, id, id)
    }

    /// Employee display name, or the raw ID when unknown.
    pub fn employee_name(&self, id: &str) -> String {
        resolve_name(&self.employees, id, id)
    }

    /// Destination display name, or the raw ID when unknown.
    pub fn destination_name(&self, id: &str) -> String {
        resolve_name(&self.destinations, id, id)
    }
}

/// Resolves `id` to a display name.
///
/// Falls back to `fallback` (normally the raw ID) so an unresolved lookup is
/// visible in the output instead of silently blank.
pub fn resolve_name(map: &HashMap<String, String>, id: &str, fallback: &str) -> String {
    map.get(id.trim())
        .cloned()
        .unwrap_or_else(|| fallback.trim().to_string())
}

fn insert_items(
    items: &mut HashMap<(ItemType, String), ItemInfo>,
    item_type: ItemType,
    records: &[ItemRecord],
) {
    for record in records {
        let Some(id) = non_empty(record.id.as_deref()) else {
            continue;
        };
        items.insert(
            (item_type, id.to_string()),
            ItemInfo {
                code: non_empty(record.code.as_deref()).map(String::from),
                name: non_empty(record.name.as_deref()).map(String::from),
            },
        );
    }
}

fn name_map(records: &[NamedRecord]) -> HashMap<String, String> {
    records
        .iter()
        .filter_map(|record| {
            let id = non_empty(record.id.as_deref())?;
            let name = non_empty(record.name.as_deref()).unwrap_or(id);
            Some((id.to_string(), name.to_string()))
        })
        .collect()
}

/// Trims and drops empty strings.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
