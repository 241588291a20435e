//! Request and response types for the ward backend.

mod auth;
mod incident;

pub use auth::{LoginRequest, RefreshRequest, TokenResponse};
pub use incident::{DataEnvelope, EnvironmentalRow, FallIncident, WARNING_STATUSES};

/// Lenient field decoders for backend rows.
///
/// The backend is not consistent about numbers: room names and sensor
/// values show up both as JSON strings and as JSON numbers.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept a string or a number, producing a string. Null becomes empty.
    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    /// Accept a number or a numeric string. Anything else becomes `None`.
    pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }
}
