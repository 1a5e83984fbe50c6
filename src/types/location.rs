use std::fmt;
use std::ops::Index;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw fixed-point coordinate as found in the export (`latitudeE7`/`longitudeE7`)
///
/// The value is kept textually so decoding never passes through a float.
/// Exports normally carry JSON integers, but strings are accepted too, and any
/// other JSON value is kept as an invalid raw value that fails at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct E7(String);

impl E7 {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i32> for E7 {
    fn from(value: i32) -> Self {
        E7(value.to_string())
    }
}

impl From<i64> for E7 {
    fn from(value: i64) -> Self {
        E7(value.to_string())
    }
}

impl From<&str> for E7 {
    fn from(value: &str) -> Self {
        E7(value.to_string())
    }
}

impl From<String> for E7 {
    fn from(value: String) -> Self {
        E7(value)
    }
}

impl fmt::Display for E7 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl Serialize for E7 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(value) => serializer.serialize_i64(value),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for E7 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};

        struct E7Visitor;

        impl<'de> Visitor<'de> for E7Visitor {
            type Value = E7;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an E7 fixed-point coordinate")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<E7, E> {
                Ok(E7(v.to_string()))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<E7, E> {
                Ok(E7(v.to_string()))
            }

            // Debug output always carries a `.` or exponent, so the codec
            // rejects every float, whole-valued ones included
            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<E7, E> {
                Ok(E7(format!("{v:?}")))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<E7, E> {
                Ok(E7(v.to_string()))
            }

            fn visit_string<E: serde::de::Error>(self, v: String) -> Result<E7, E> {
                Ok(E7(v))
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<E7, E> {
                Ok(E7(v.to_string()))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<E7, E> {
                Ok(E7(String::new()))
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<E7, E> {
                Ok(E7(String::new()))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<E7, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(E7(String::new()))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<E7, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(E7(String::new()))
            }
        }

        deserializer.deserialize_any(E7Visitor)
    }
}

/// One GPS fix from the location history export
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LocationRecord {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "timestamp_from_number_or_string"))]
    pub timestamp_ms: i64,
    pub latitude_e7: E7,
    pub longitude_e7: E7,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub accuracy: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub altitude: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub velocity: Option<f64>,
}

impl LocationRecord {
    pub fn new(timestamp_ms: i64, latitude_e7: impl Into<E7>, longitude_e7: impl Into<E7>) -> Self {
        Self {
            timestamp_ms,
            latitude_e7: latitude_e7.into(),
            longitude_e7: longitude_e7.into(),
            accuracy: None,
            altitude: None,
            velocity: None,
        }
    }
}

// Takeout writes timestampMs as a decimal string, older exports as a number
#[cfg(feature = "serde")]
fn timestamp_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse::<i64>().map_err(serde::de::Error::custom),
    }
}

/// Ordered, immutable sequence of location records for one upload
///
/// Cloning is cheap; every clone shares the same records.
#[derive(Debug, Clone)]
pub struct LocationSequence {
    records: Arc<[LocationRecord]>,
}

impl LocationSequence {
    pub fn new(records: Vec<LocationRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LocationRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocationRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[LocationRecord] {
        &self.records
    }
}

impl Default for LocationSequence {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<LocationRecord>> for LocationSequence {
    fn from(records: Vec<LocationRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<LocationRecord> for LocationSequence {
    fn from_iter<I: IntoIterator<Item = LocationRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for LocationSequence {
    type Output = LocationRecord;

    fn index(&self, index: usize) -> &LocationRecord {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a LocationSequence {
    type Item = &'a LocationRecord;
    type IntoIter = std::slice::Iter<'a, LocationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
