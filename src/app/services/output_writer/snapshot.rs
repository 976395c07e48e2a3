//! Binary snapshot of the reconciled place map

use crate::app::models::time_series::DateRange;
use crate::app::models::{Place, PlaceKey};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Every reconciled place together with the dates its series cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    pub date_range: DateRange,
    pub places: BTreeMap<PlaceKey, Place>,
}

impl Snapshot {
    pub fn new(date_range: DateRange, places: BTreeMap<PlaceKey, Place>) -> Self {
        Self {
            created_at: Utc::now(),
            date_range,
            places,
        }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Write the snapshot, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io(format!("Failed to create directory {}", parent.display()), e)
            })?;
        }

        let file = File::create(path)
            .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self).map_err(|e| {
            Error::snapshot(format!("Failed to encode snapshot {}", path.display()), e)
        })?;
        writer
            .flush()
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;

        debug!("Saved snapshot with {} places to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open snapshot {}", path.display()), e))?;
        bincode::deserialize_from(BufReader::new(file)).map_err(|e| {
            Error::snapshot(format!("Failed to decode snapshot {}", path.display()), e)
        })
    }
}
