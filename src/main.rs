//! CLI binary for Location Trail
//!
//! Plays back one or more location history exports against a headless map
//! surface and reports what was revealed. Each file is a new upload into the
//! same viewer, replacing the previous one.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use glob::glob;
use location_trail::{
    export_trail, parse_location_file, ExportOptions, MapViewer, PlaybackOptions,
    RecordingSurface, TimestampUnit,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn build_command() -> Command {
    Command::new("Location Trail")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Play back location history exports as an animated marker trail.")
        .arg(
            Arg::new("files")
                .help("Location history JSON files (.json, case-insensitive, supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging of every reveal and surface call")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("delay-ms")
                .long("delay-ms")
                .help("Delay between two reveals in milliseconds")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .default_value("100"),
        )
        .arg(
            Arg::new("zoom")
                .long("zoom")
                .help("Zoom level used while following the newest marker")
                .value_name("LEVEL")
                .value_parser(clap::value_parser!(u8))
                .default_value("10"),
        )
        .arg(
            Arg::new("no-fit")
                .long("no-fit")
                .help("Do not fit the view to the whole trail when playback ends")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timestamp-seconds")
                .long("timestamp-seconds")
                .help("Treat timestampMs values as seconds instead of milliseconds")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("realtime")
                .long("realtime")
                .help("Sleep between reveals instead of playing back in virtual time")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export the revealed trail to <name>.trail.csv")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("gpx")
                .long("gpx")
                .help("Export the revealed trail to <name>.trail.gpx")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for exported files (default: same as input file)")
                .value_name("DIR"),
        )
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn expand_input_paths(patterns: &[&String]) -> Vec<PathBuf> {
    let mut valid_paths = Vec::new();

    for pattern in patterns {
        let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(paths) => {
                        log::debug!("Glob pattern '{pattern}' matched {} files", paths.len());
                        paths
                    }
                    Err(e) => {
                        eprintln!("Error expanding glob pattern '{pattern}': {e}");
                        continue;
                    }
                },
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![PathBuf::from(pattern.as_str())]
        };

        for path in paths {
            if !path.exists() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }
            if !has_json_extension(&path) {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("none");
                eprintln!("Warning: Skipping file with unsupported extension '{ext}': {path:?}");
                continue;
            }
            valid_paths.push(path);
        }
    }

    valid_paths
}

fn play_file(
    viewer: &mut MapViewer<RecordingSurface>,
    path: &Path,
    realtime: bool,
    export_options: &ExportOptions,
) -> Result<()> {
    let sequence = parse_location_file(path)
        .with_context(|| format!("Failed to load location history: {path:?}"))?;

    let plan = viewer.upload(sequence);
    if plan.scheduled == 0 {
        println!("  No locations to reveal");
        return Ok(());
    }

    if realtime {
        while let Some(wait) = viewer.next_due_in() {
            std::thread::sleep(wait);
            viewer.advance(wait);
        }
    } else {
        viewer.run_to_completion();
    }

    let session = viewer
        .session()
        .context("Upload did not produce a playback session")?;
    let summary = session.summary();

    println!(
        "  Records: {}, revealed: {}, skipped: {}, path segments: {}",
        summary.total, summary.revealed, summary.skipped, summary.segments
    );
    if let Some(bounds) = summary.bounds {
        println!("  Bounds: {bounds}");
    }
    for failure in session.failures() {
        eprintln!("  Skipped record {}: {}", failure.index, failure.error);
    }

    let report = export_trail(
        session.revealed_markers(),
        path,
        export_options,
        viewer.options().timestamp_unit,
    )
    .with_context(|| format!("Failed to export trail for {path:?}"))?;
    if let Some(csv_path) = report.csv_path {
        println!("  Exported trail to: {}", csv_path.display());
    }
    if let Some(gpx_path) = report.gpx_path {
        println!("  Exported trail to: {}", gpx_path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let delay_ms = matches.get_one::<u64>("delay-ms").copied().unwrap_or(100);
    let zoom = matches.get_one::<u8>("zoom").copied().unwrap_or(10);
    let realtime = matches.get_flag("realtime");

    let playback_options = PlaybackOptions {
        reveal_delay: Duration::from_millis(delay_ms),
        follow_zoom: zoom,
        fit_on_complete: !matches.get_flag("no-fit"),
        timestamp_unit: if matches.get_flag("timestamp-seconds") {
            TimestampUnit::Seconds
        } else {
            TimestampUnit::Milliseconds
        },
        ..PlaybackOptions::default()
    };
    let export_options = ExportOptions {
        csv: matches.get_flag("csv"),
        gpx: matches.get_flag("gpx"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();
    log::debug!("Input patterns: {file_patterns:?}");

    let valid_paths = expand_input_paths(&file_patterns);
    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Supported extension: .json (case-insensitive)");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut viewer = MapViewer::new(RecordingSurface::new(), playback_options);
    let mut processed_files = 0;

    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        match play_file(&mut viewer, path, realtime, &export_options) {
            Ok(()) => processed_files += 1,
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug flag for more detailed information.");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_validation() {
        for name in ["Records.json", "records.JSON", "a.Json"] {
            assert!(has_json_extension(Path::new(name)), "{name} should be valid");
        }
        for name in ["Records.csv", "Records", "records.json.bak"] {
            assert!(!has_json_extension(Path::new(name)), "{name} should be invalid");
        }
    }

    #[test]
    fn test_command_defaults() {
        let matches = build_command()
            .try_get_matches_from(["location_trail", "Records.json"])
            .unwrap();
        assert_eq!(matches.get_one::<u64>("delay-ms"), Some(&100));
        assert_eq!(matches.get_one::<u8>("zoom"), Some(&10));
        assert!(!matches.get_flag("no-fit"));
    }
}
