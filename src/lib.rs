//! Location Trail Library
//!
//! A Rust library for playing back location history exports (Google Takeout
//! style `{ "locations": [...] }` documents) as an animated trail of markers
//! on a map surface.
//!
//! # Features
//!
//! - **`json`** (default): Load location history documents
//! - **`csv`** (default): Enable CSV export of revealed trails
//! - **`cli`** (default): Build the command-line interface binary
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Play back an export against a headless surface:
//! ```rust,no_run
//! use location_trail::{parse_location_file, MapViewer, PlaybackOptions, RecordingSurface};
//! use std::path::Path;
//!
//! let sequence = parse_location_file(Path::new("Records.json")).unwrap();
//! let mut viewer = MapViewer::new(RecordingSurface::new(), PlaybackOptions::default());
//! viewer.upload(sequence);
//! let report = viewer.run_to_completion();
//! println!("Revealed {} markers, skipped {}", report.revealed, report.skipped);
//! ```
//!
//! # Public API
//!
//! ## Decoding
//! - [`decode_e7_text`] - Insert the decimal point into an E7 digit string
//! - [`decode_e7`] / [`decode_position`] - Decode record coordinates
//!
//! ## Playback
//! - [`MapViewer`] - Surface, shared timeline and current upload
//! - [`VisualizationSession`] - Store, sequencer and fitter of one upload
//! - [`MarkerSequencer`] - Staggered marker reveal
//! - [`Timeline`] - Generation-tagged reveal queue
//! - [`ViewportFitter`] - Fit the surface around revealed coordinates
//!
//! ## Surface
//! - [`MapSurface`] - Rendering backend boundary
//! - [`RecordingSurface`] - Headless backend that records calls
//!
//! ## Export
//! - [`export_trail`] - CSV/GPX export of a revealed trail

// Module declarations
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod info;
#[cfg(feature = "json")]
pub mod parser;
pub mod scheduler;
pub mod sequencer;
pub mod session;
pub mod store;
pub mod surface;
pub mod types;
pub mod viewport;

pub use codec::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use info::*;
#[cfg(feature = "json")]
pub use parser::*;
pub use scheduler::*;
pub use sequencer::*;
pub use session::*;
pub use store::*;
pub use surface::*;
pub use types::*;
pub use viewport::*;
