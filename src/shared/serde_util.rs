//! Custom serde helpers for backend wire formats.

/// (De)serializes a Unix-millis `u64` as `DateTime<Utc>`.
///
/// The backend sends equity-curve and candle timestamps as epoch milliseconds,
/// not ISO 8601 strings.
pub mod timestamp_ms {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        DateTime::<Utc>::from_timestamp_millis(millis as i64)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {}", millis)))
    }

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(dt.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super::timestamp_ms")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_timestamp_ms_round_trip() {
        let s: Stamped = serde_json::from_str(r#"{"at":1700000000000}"#).unwrap();
        assert_eq!(s.at.timestamp_millis(), 1_700_000_000_000);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"at":1700000000000}"#);
    }

    #[test]
    fn test_timestamp_ms_rejects_strings() {
        let err = serde_json::from_str::<Stamped>(r#"{"at":"2023-11-14"}"#);
        assert!(err.is_err());
    }
}
