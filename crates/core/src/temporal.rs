//! Temporal scalar types used by model fields.

use core::str::FromStr;

use chrono::{NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// A time of day (`HH:MM:SS` with optional fractional seconds).
///
/// Serialized as its string form, e.g. `"21:37:56.955359"`. A trailing `Z`
/// is accepted on input and dropped; times carry no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(NaiveTime);

impl Time {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Current UTC wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().time())
    }

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, ModelError> {
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(Self)
            .ok_or_else(|| ModelError::invalid_temporal(format!("{hour}:{minute}:{second}")))
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    pub fn nanosecond(&self) -> u32 {
        self.0.nanosecond()
    }
}

impl core::fmt::Display for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S%.f"))
    }
}

impl FromStr for Time {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_suffix('Z').unwrap_or(raw);
        NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .map(Self)
            .map_err(|e| ModelError::invalid_temporal(format!("Time '{s}': {e}")))
    }
}

impl From<NaiveTime> for Time {
    fn from(value: NaiveTime) -> Self {
        Self(value)
    }
}

impl From<Time> for serde_json::Value {
    fn from(value: Time) -> Self {
        serde_json::Value::String(value.to_string())
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
