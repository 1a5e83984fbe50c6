//! Info window content shown when a marker is clicked

use crate::config::TimestampUnit;
use crate::types::LocationRecord;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Convert the export timestamp into a UTC datetime
pub fn timestamp_to_utc(timestamp: i64, unit: TimestampUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimestampUnit::Milliseconds => DateTime::from_timestamp_millis(timestamp),
        TimestampUnit::Seconds => DateTime::from_timestamp(timestamp, 0),
    }
}

/// RFC 1123 style UTC date, e.g. `Tue, 14 Nov 2017 22:13:20 GMT`
pub fn format_utc_timestamp(timestamp: i64, unit: TimestampUnit) -> String {
    match timestamp_to_utc(timestamp, unit) {
        Some(datetime) => datetime.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        None => format!("Invalid date ({timestamp})"),
    }
}

/// HTML table for one record: the date row, then any optional readings present
pub fn build_info_html(record: &LocationRecord, unit: TimestampUnit) -> String {
    let mut html = String::from("<table><tbody>");
    push_row(
        &mut html,
        "Date",
        &format_utc_timestamp(record.timestamp_ms, unit),
    );

    let optional = [
        ("Accuracy", record.accuracy),
        ("Altitude", record.altitude),
        ("Velocity", record.velocity),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            push_row(&mut html, label, &value.to_string());
        }
    }

    html.push_str("</tbody></table>");
    html
}

fn push_row(html: &mut String, label: &str, value: &str) {
    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
        label, value
    );
}
