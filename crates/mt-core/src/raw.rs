//! Raw log rows and reference records as delivered by external collaborators.
//!
//! Every field is optional: the operational logs are loosely typed and
//! frequently incomplete. Validation happens in [`crate::aggregate`], never here.
//! Numeric cells are accepted and kept as their decimal string form.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accepts strings, numbers and booleans, returning `None` for null/missing.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// One row of the rack/layer location log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationChangeRow {
    #[serde(rename = "LocationLogID", default, deserialize_with = "lenient_string")]
    pub row_id: Option<String>,
    #[serde(rename = "MoldID", default, deserialize_with = "lenient_string")]
    pub mold_id: Option<String>,
    #[serde(rename = "CutterID", default, deserialize_with = "lenient_string")]
    pub cutter_id: Option<String>,
    #[serde(rename = "OldRackLayer", default, deserialize_with = "lenient_string")]
    pub old_rack_layer: Option<String>,
    #[serde(rename = "NewRackLayer", default, deserialize_with = "lenient_string")]
    pub new_rack_layer: Option<String>,
    #[serde(rename = "DateEntry", default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(rename = "Notes", alias = "notes", default, deserialize_with = "lenient_string")]
    pub notes: Option<String>,
    #[serde(rename = "EmployeeID", default, deserialize_with = "lenient_string")]
    pub employee_id: Option<String>,
}

/// One row of the inter-company shipment log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRow {
    #[serde(rename = "ShipID", alias = "ShipLogID", default, deserialize_with = "lenient_string")]
    pub row_id: Option<String>,
    #[serde(rename = "MoldID", default, deserialize_with = "lenient_string")]
    pub mold_id: Option<String>,
    #[serde(rename = "CutterID", default, deserialize_with = "lenient_string")]
    pub cutter_id: Option<String>,
    #[serde(rename = "FromCompanyID", default, deserialize_with = "lenient_string")]
    pub from_company_id: Option<String>,
    #[serde(rename = "ToCompanyID", default, deserialize_with = "lenient_string")]
    pub to_company_id: Option<String>,
    #[serde(rename = "ShipDate", alias = "DateEntry", default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(rename = "ShipNotes", alias = "Notes", default, deserialize_with = "lenient_string")]
    pub notes: Option<String>,
    #[serde(rename = "EmployeeID", default, deserialize_with = "lenient_string")]
    pub employee_id: Option<String>,
}

/// One row of the status log (audits, check-in/out and free-form updates).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    #[serde(rename = "StatusLogID", default, deserialize_with = "lenient_string")]
    pub row_id: Option<String>,
    #[serde(rename = "MoldID", default, deserialize_with = "lenient_string")]
    pub mold_id: Option<String>,
    #[serde(rename = "CutterID", default, deserialize_with = "lenient_string")]
    pub cutter_id: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(rename = "AuditType", default, deserialize_with = "lenient_string")]
    pub audit_type: Option<String>,
    #[serde(rename = "DestinationID", default, deserialize_with = "lenient_string")]
    pub destination_id: Option<String>,
    #[serde(rename = "Timestamp", alias = "DateEntry", default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(rename = "Notes", alias = "notes", default, deserialize_with = "lenient_string")]
    pub notes: Option<String>,
    #[serde(rename = "EmployeeID", default, deserialize_with = "lenient_string")]
    pub employee_id: Option<String>,
}

/// The three operational logs as of one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLogs {
    #[serde(default)]
    pub location: Vec<LocationChangeRow>,
    #[serde(default)]
    pub shipments: Vec<ShipmentRow>,
    #[serde(default)]
    pub statuses: Vec<StatusRow>,
}

impl RawLogs {
    /// Total number of raw rows across all logs.
    pub fn row_count(&self) -> usize {
        self.location.len() + self.shipments.len() + self.statuses.len()
    }
}

/// A mold or cutter master record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "ID", alias = "MoldID", alias = "CutterID", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "Code", alias = "MoldCode", alias = "CutterNo", alias = "CutterCode", default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(rename = "Name", alias = "MoldName", alias = "CutterName", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// A generic ID/name reference record (company, employee, destination).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRecord {
    #[serde(
        rename = "ID",
        alias = "CompanyID",
        alias = "EmployeeID",
        alias = "DestinationID",
        default,
        deserialize_with = "lenient_string"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "Name",
        alias = "CompanyName",
        alias = "CompanyShortName",
        alias = "EmployeeName",
        alias = "DestinationName",
        default,
        deserialize_with = "lenient_string"
    )]
    pub name: Option<String>,
}

/// Reference data used to resolve IDs into display values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub molds: Vec<ItemRecord>,
    #[serde(default)]
    pub cutters: Vec<ItemRecord>,
    #[serde(default)]
    pub companies: Vec<NamedRecord>,
    #[serde(default)]
    pub employees: Vec<NamedRecord>,
    #[serde(default)]
    pub destinations: Vec<NamedRecord>,
}
