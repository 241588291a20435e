//! Fall incident and environmental rows as returned by the backend.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Status markers the backend uses for out-of-range rooms.
pub const WARNING_STATUSES: &[&str] = &["경고", "warning"];

/// The `{ "data": [...] }` wrapper around every list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A row from `/api/fall-incidents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallIncident {
    /// Incident id.
    pub accident_id: i64,

    /// Room name (e.g., "203").
    #[serde(default, deserialize_with = "lenient::string")]
    pub room_name: String,

    /// Patient display name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_name: String,

    /// When the fall was detected, as formatted by the backend.
    #[serde(default)]
    pub accident_date: Option<String>,

    /// "Y" when the incident is an active fall.
    #[serde(rename = "accident_YN", default, deserialize_with = "lenient::string")]
    pub accident_yn: String,
}

impl FallIncident {
    /// Check whether the backend flags this row as an active fall.
    pub fn is_active(&self) -> bool {
        self.accident_yn.eq_ignore_ascii_case("y")
    }
}

/// A row from `/api/environmental`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentalRow {
    /// Room name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub room_name: String,

    /// Temperature in degrees Celsius.
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub room_temp: Option<f64>,

    /// Relative humidity in percent.
    #[serde(default, alias = "room_humi", deserialize_with = "lenient::f64_opt")]
    pub humidity: Option<f64>,

    /// Status label; see [`WARNING_STATUSES`].
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

impl EnvironmentalRow {
    /// Check whether the room's reading is outside the normal range.
    pub fn is_warning(&self) -> bool {
        let status = self.status.trim();
        WARNING_STATUSES
            .iter()
            .any(|marker| status.eq_ignore_ascii_case(marker))
    }
}
