use serde::{Deserialize, Serialize};
use std::fmt;

/// Market mood band, ordered from most pessimistic to most optimistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodStatus {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

impl fmt::Display for MoodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtremeFear => write!(f, "Extreme Fear"),
            Self::Fear => write!(f, "Fear"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Greed => write!(f, "Greed"),
            Self::ExtremeGreed => write!(f, "Extreme Greed"),
        }
    }
}

/// Mood index derived from the reference instrument's daily change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodResult {
    pub value: u8, // 0-100
    pub status: MoodStatus,
    /// Raw change percent of the quote, unclamped.
    pub change: f64,
}

impl MoodResult {
    /// Degraded-mode payload served when no quote is available.
    pub const fn fallback() -> Self {
        Self {
            value: 50,
            status: MoodStatus::Neutral,
            change: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_with_spaces() {
        let json = serde_json::to_string(&MoodStatus::ExtremeGreed).unwrap();
        assert_eq!(json, "\"Extreme Greed\"");
        let json = serde_json::to_string(&MoodStatus::Fear).unwrap();
        assert_eq!(json, "\"Fear\"");
    }

    #[test]
    fn test_fallback_payload_shape() {
        let value = serde_json::to_value(MoodResult::fallback()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "value": 50, "status": "Neutral", "change": 0.0 })
        );
    }
}
