//! E7 fixed-point coordinate decoding
//!
//! Location history exports store every coordinate as an integer scaled by
//! 10^7 with no decimal separator. The decimal point goes after the 2nd digit
//! for 9-digit values (two integer digits) and after the 1st digit for any
//! other width. Values shorter than 8 digits are rejected. Decoding is textual
//! so no precision is lost between the integer and the decimal string.

use crate::error::{Result, TrailError};
use crate::types::{LatLng, LocationRecord, E7};

/// Fewest digits an E7 value carries (single integer digit, 7 fraction digits)
pub const MIN_E7_DIGITS: usize = 8;

/// Digit count whose decimal point goes after the 2nd digit
const WIDE_E7_DIGITS: usize = 9;

/// A decoded coordinate, both as the exact decimal string and as degrees
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCoordinate {
    pub text: String,
    pub degrees: f64,
}

/// Decoded latitude/longitude pair of one record
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPosition {
    pub latitude: DecodedCoordinate,
    pub longitude: DecodedCoordinate,
}

impl DecodedPosition {
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.latitude.degrees, self.longitude.degrees)
    }
}

/// Insert the decimal point into an E7 digit string
///
/// An optional leading `-` or `+` is kept in front of the result.
pub fn decode_e7_text(raw: &str) -> Result<String> {
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => match raw.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", raw),
        },
    };

    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(TrailError::malformed(
            raw,
            format!("contains non-digit character '{}'", bad),
        ));
    }

    // All ASCII from here, so byte offsets are character offsets
    if digits.len() < MIN_E7_DIGITS {
        return Err(TrailError::malformed(
            raw,
            format!(
                "expected at least {} digits, found {}",
                MIN_E7_DIGITS,
                digits.len()
            ),
        ));
    }

    let dot_position = if digits.len() == WIDE_E7_DIGITS { 2 } else { 1 };
    let (whole, fraction) = digits.split_at(dot_position);

    Ok(format!("{sign}{whole}.{fraction}"))
}

/// Decode one E7 value into its decimal string and degrees
pub fn decode_e7(raw: &E7) -> Result<DecodedCoordinate> {
    let text = decode_e7_text(raw.as_str())?;
    let degrees = text
        .parse::<f64>()
        .map_err(|e| TrailError::malformed(raw.as_str(), e.to_string()))?;

    Ok(DecodedCoordinate { text, degrees })
}

/// Decode both coordinates of a record
pub fn decode_position(record: &LocationRecord) -> Result<DecodedPosition> {
    Ok(DecodedPosition {
        latitude: decode_e7(&record.latitude_e7)?,
        longitude: decode_e7(&record.longitude_e7)?,
    })
}
