// Airport identifier source
// Reads airport documents from a JSON document store export and yields their IATA codes

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error reading {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid airport document in {}: {source}", .path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ObjectId {
    #[serde(rename = "$oid")]
    pub oid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Airport {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub airport_id: String,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub property_ids_expanded: Vec<String>,
    pub iata_code: String,
    pub city_id: String,
}

#[async_trait]
pub trait AirportSource: Send + Sync {
    async fn airport_codes(&self) -> Result<Vec<String>, SourceError>;
}

/// Airport collection stored as a JSON array of documents on disk.
///
/// The file is opened, read and closed inside each call, so no handle outlives it.
pub struct JsonFileAirportSource {
    path: PathBuf,
}

impl JsonFileAirportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn airports(&self) -> Result<Vec<Airport>, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::IoError {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&raw).map_err(|source| SourceError::InvalidDocument {
            path: self.path.clone(),
            source,
        })
    }
}

#[async_trait]
impl AirportSource for JsonFileAirportSource {
    async fn airport_codes(&self) -> Result<Vec<String>, SourceError> {
        let airports = self.airports().await?;
        let total = airports.len();

        let codes: Vec<String> = airports
            .into_iter()
            .filter_map(|airport| {
                let code = airport.iata_code.trim().to_string();
                if code.is_empty() {
                    warn!(
                        airport_id = %airport.airport_id,
                        "airport has no IATA code, skipping"
                    );
                    None
                } else {
                    Some(code)
                }
            })
            .collect();

        info!(
            path = %self.path.display(),
            airports = total,
            codes = codes.len(),
            "loaded airport codes"
        );
        Ok(codes)
    }
}
