//! JSON snapshot directory as a log source.
//!
//! The directory holds one JSON array per log or reference table. A missing
//! file reads as an empty table; an unreadable or malformed one fails the
//! whole fetch so the previous build stays published.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mt_core::{LogSource, RawLogs, ReferenceData, SourceError};
use serde::de::DeserializeOwned;

pub const LOCATION_LOG_FILE: &str = "locationlog.json";
pub const SHIPMENT_LOG_FILE: &str = "shiplog.json";
pub const STATUS_LOG_FILE: &str = "statuslog.json";
pub const MOLDS_FILE: &str = "molds.json";
pub const CUTTERS_FILE: &str = "cutters.json";
pub const COMPANIES_FILE: &str = "companies.json";
pub const EMPLOYEES_FILE: &str = "employees.json";
pub const DESTINATIONS_FILE: &str = "destinations.json";

/// Reads raw logs and reference tables from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    dir: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self, what: &'static str) -> Result<(), SourceError> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(SourceError::new(
                what,
                format!("{} is not a directory", self.dir.display()),
            ))
        }
    }

    fn read_table<T: DeserializeOwned>(
        &self,
        what: &'static str,
        file: &str,
    ) -> Result<Vec<T>, SourceError> {
        let path = self.dir.join(file);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "snapshot file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(SourceError::new(
                    what,
                    format!("{}: {e}", path.display()),
                ));
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents)
            .map_err(|e| SourceError::new(what, format!("{}: {e}", path.display())))
    }
}

impl LogSource for JsonSnapshotSource {
    fn current_logs(&self) -> Result<RawLogs, SourceError> {
        self.ensure_dir("logs")?;
        let logs = RawLogs {
            location: self.read_table("location log", LOCATION_LOG_FILE)?,
            shipments: self.read_table("shipment log", SHIPMENT_LOG_FILE)?,
            statuses: self.read_table("status log", STATUS_LOG_FILE)?,
        };
        tracing::debug!(rows = logs.row_count(), "loaded raw logs");
        Ok(logs)
    }

    fn reference_data(&self) -> Result<ReferenceData, SourceError> {
        self.ensure_dir("reference data")?;
        Ok(ReferenceData {
            molds: self.read_table("molds", MOLDS_FILE)?,
            cutters: self.read_table("cutters", CUTTERS_FILE)?,
            companies: self.read_table("companies", COMPANIES_FILE)?,
            employees: self.read_table("employees", EMPLOYEES_FILE)?,
            destinations: self.read_table("destinations", DESTINATIONS_FILE)?,
        })
    }
}
