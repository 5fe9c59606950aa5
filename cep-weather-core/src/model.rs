use serde::{Deserialize, Serialize, Serializer};

/// Offset used for the Kelvin conversion. Clients rely on the whole-number
/// value, so this is intentionally not 273.15.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Current temperature in the three units returned by `/weather`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    #[serde(rename = "temp_C", serialize_with = "serialize_number")]
    pub celsius: f64,
    #[serde(rename = "temp_F", serialize_with = "serialize_number")]
    pub fahrenheit: f64,
    #[serde(rename = "temp_K", serialize_with = "serialize_number")]
    pub kelvin: f64,
}

impl Temperature {
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius * 1.8 + 32.0,
            kelvin: celsius + KELVIN_OFFSET,
        }
    }
}

/// Whole numbers are written as integers (`30`, not `30.0`).
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
