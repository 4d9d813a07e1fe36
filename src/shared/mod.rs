//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fmt;
pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── TradingId ───────────────────────────────────────────────────────────────

/// Newtype for trading identifiers (e.g. `"trd_8f2kQx91"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradingId(String);

impl TradingId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TradingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TradingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TradingId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for TradingId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TradingId(s.to_string()))
    }
}

impl Serialize for TradingId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TradingId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TradingId(s))
    }
}

// ─── BindingId ───────────────────────────────────────────────────────────────

/// Newtype for exchange-binding identifiers.
///
/// Serializes transparently as a JSON string. Can be used as a HashMap key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingId(String);

impl BindingId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BindingId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BindingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Serialize for BindingId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BindingId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(BindingId(s))
    }
}

// ─── Timeframe ───────────────────────────────────────────────────────────────

/// Equity-curve / candle timeframe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[default]
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Hour1 => "1h",
            Self::Hour4 => "4h",
            Self::Day1 => "1d",
        }
    }

    /// Duration of one bucket in seconds.
    pub fn seconds(&self) -> u64 {
        match self {
            Self::Minute1 => 60,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Hour1 => 3600,
            Self::Hour4 => 14400,
            Self::Day1 => 86400,
        }
    }

    /// Number of buckets per year, used to annualize per-period statistics.
    pub fn periods_per_year(&self) -> f64 {
        (365.0 * 86400.0) / self.seconds() as f64
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trading_id_serde() {
        let id = TradingId::from("trd_8f2kQx91");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"trd_8f2kQx91\"");
        let back: TradingId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_binding_id_serde() {
        let id = BindingId::new("bnd_01HYX");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bnd_01HYX\"");
    }

    #[test]
    fn test_timeframe_serde() {
        let tf: Timeframe = serde_json::from_str("\"4h\"").unwrap();
        assert_eq!(tf, Timeframe::Hour4);
        assert_eq!(tf.seconds(), 14400);
    }

    #[test]
    fn test_timeframe_periods_per_year() {
        assert_eq!(Timeframe::Day1.periods_per_year(), 365.0);
        assert_eq!(Timeframe::Hour1.periods_per_year(), 365.0 * 24.0);
    }
}
