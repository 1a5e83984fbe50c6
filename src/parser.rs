//! Location history document loading
//!
//! Reads `{ "locations": [ ... ] }` documents into a [`LocationSequence`].
//! Records keep the order of the document. Coordinates are not validated
//! here; a bad coordinate only skips that record's reveal later on.

use crate::error::Result;
use crate::types::{LocationRecord, LocationSequence};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct LocationDocument {
    locations: Vec<LocationRecord>,
}

/// Parse a location history document from a string
pub fn parse_location_str(json: &str) -> Result<LocationSequence> {
    let document: LocationDocument = serde_json::from_str(json)?;
    log::debug!("Parsed {} location record(s)", document.locations.len());
    Ok(LocationSequence::new(document.locations))
}

/// Parse a location history document from memory
pub fn parse_location_bytes(data: &[u8]) -> Result<LocationSequence> {
    let document: LocationDocument = serde_json::from_slice(data)?;
    log::debug!("Parsed {} location record(s)", document.locations.len());
    Ok(LocationSequence::new(document.locations))
}

/// Read a whole location history file into memory and parse it
pub fn parse_location_file(path: &Path) -> Result<LocationSequence> {
    let data = std::fs::read(path)?;
    log::info!("Read {} byte(s) from {}", data.len(), path.display());
    parse_location_bytes(&data)
}
