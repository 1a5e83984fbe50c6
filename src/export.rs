//! Export functionality for revealed trails
//!
//! Writes the markers a playback session revealed to CSV and GPX files next
//! to the input export (or into a chosen output directory).

use crate::config::TimestampUnit;
use crate::error::Result;
use crate::info::{format_utc_timestamp, timestamp_to_utc};
use crate::sequencer::RevealedMarker;
use chrono::SecondsFormat;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub gpx: bool,
    pub output_dir: Option<String>,
}

/// Paths written by an export run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub csv_path: Option<PathBuf>,
    pub gpx_path: Option<PathBuf>,
}

impl ExportReport {
    pub fn is_empty(&self) -> bool {
        self.csv_path.is_none() && self.gpx_path.is_none()
    }
}

/// Output directory and file stem for an input file
///
/// The directory defaults to the input's parent and is created if missing.
pub fn compute_export_paths(input_path: &Path, options: &ExportOptions) -> Result<(PathBuf, String)> {
    let base_name = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("locations")
        .to_string();

    let output_dir = match options.output_dir {
        Some(ref dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)?;
        log::debug!("Created output directory: {}", output_dir.display());
    }

    Ok((output_dir, base_name))
}

/// Write `<stem>.trail.csv`; returns `None` for an empty trail
#[cfg(feature = "csv")]
pub fn export_trail_to_csv(
    markers: &[RevealedMarker],
    input_path: &Path,
    options: &ExportOptions,
    unit: TimestampUnit,
) -> Result<Option<PathBuf>> {
    if markers.is_empty() {
        return Ok(None);
    }

    let (output_dir, base_name) = compute_export_paths(input_path, options)?;
    let csv_path = output_dir.join(format!("{base_name}.trail.csv"));

    let mut writer = csv::Writer::from_path(&csv_path)?;
    writer.write_record([
        "index",
        "timestamp_ms",
        "utc",
        "latitude",
        "longitude",
        "accuracy",
        "altitude",
        "velocity",
    ])?;

    let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    for marker in markers {
        writer.write_record([
            marker.index.to_string(),
            marker.record.timestamp_ms.to_string(),
            format_utc_timestamp(marker.record.timestamp_ms, unit),
            marker.position.latitude.text.clone(),
            marker.position.longitude.text.clone(),
            optional(marker.record.accuracy),
            optional(marker.record.altitude),
            optional(marker.record.velocity),
        ])?;
    }
    writer.flush()?;

    log::info!("Exported {} trail point(s) to {}", markers.len(), csv_path.display());
    Ok(Some(csv_path))
}

/// Write `<stem>.trail.gpx`; returns `None` for an empty trail
pub fn export_trail_to_gpx(
    markers: &[RevealedMarker],
    input_path: &Path,
    options: &ExportOptions,
    unit: TimestampUnit,
) -> Result<Option<PathBuf>> {
    if markers.is_empty() {
        return Ok(None);
    }

    let (output_dir, base_name) = compute_export_paths(input_path, options)?;
    let gpx_path = output_dir.join(format!("{base_name}.trail.gpx"));

    let mut gpx_file = BufWriter::new(File::create(&gpx_path)?);
    writeln!(gpx_file, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        gpx_file,
        r#"<gpx creator="location_trail" version="1.1" xmlns="http://www.topografix.com/GPX/1/1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#
    )?;
    writeln!(gpx_file, "<metadata><name>Location history</name></metadata>")?;
    writeln!(gpx_file, "<trk><name>{}</name><trkseg>", base_name)?;

    for marker in markers {
        write!(
            gpx_file,
            r#"  <trkpt lat="{}" lon="{}">"#,
            marker.position.latitude.text, marker.position.longitude.text
        )?;
        if let Some(altitude) = marker.record.altitude {
            write!(gpx_file, "<ele>{:.2}</ele>", altitude)?;
        }
        if let Some(time) = timestamp_to_utc(marker.record.timestamp_ms, unit) {
            write!(
                gpx_file,
                "<time>{}</time>",
                time.to_rfc3339_opts(SecondsFormat::Millis, true)
            )?;
        }
        writeln!(gpx_file, "</trkpt>")?;
    }

    writeln!(gpx_file, "</trkseg></trk>")?;
    writeln!(gpx_file, "</gpx>")?;
    gpx_file.flush()?;

    log::info!("Exported {} trail point(s) to {}", markers.len(), gpx_path.display());
    Ok(Some(gpx_path))
}

/// Run every export enabled in `options`
pub fn export_trail(
    markers: &[RevealedMarker],
    input_path: &Path,
    options: &ExportOptions,
    unit: TimestampUnit,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();

    if options.csv {
        report.csv_path = csv_export(markers, input_path, options, unit)?;
    }
    if options.gpx {
        report.gpx_path = export_trail_to_gpx(markers, input_path, options, unit)?;
    }

    Ok(report)
}

#[cfg(feature = "csv")]
fn csv_export(
    markers: &[RevealedMarker],
    input_path: &Path,
    options: &ExportOptions,
    unit: TimestampUnit,
) -> Result<Option<PathBuf>> {
    export_trail_to_csv(markers, input_path, options, unit)
}

#[cfg(not(feature = "csv"))]
fn csv_export(
    _markers: &[RevealedMarker],
    _input_path: &Path,
    _options: &ExportOptions,
    _unit: TimestampUnit,
) -> Result<Option<PathBuf>> {
    Err(crate::error::TrailError::Export(
        "CSV export requires the `csv` feature".to_string(),
    ))
}
