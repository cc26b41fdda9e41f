//! Screener Document Model
//!
//! The snapshot written by the screener job. A fetched document is kept as
//! parsed JSON; [`ScreenerDocument::validate`] checks the top-level shape and
//! decodes it into typed entries. Numeric fields are decoded leniently so a
//! stray string renders as the documented fallback instead of failing the
//! whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Market identifier that switches prices to won formatting
pub const KRX_MARKET: &str = "KRX";

/// A fetched screener snapshot, not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerDocument {
    raw: Value,
}

impl ScreenerDocument {
    /// Wrap an already-parsed JSON value
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Parse a document from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self::from_value)
    }

    /// Access the underlying JSON
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Check the top-level shape and decode every entry.
    ///
    /// Fails closed: a missing `metadata` object, a non-sequence
    /// `filtered_stocks`, or any undecodable entry rejects the document.
    pub fn validate(&self) -> Result<ValidatedDocument, DocumentError> {
        let root = self.raw.as_object().ok_or(DocumentError::NotAnObject)?;

        let metadata = match root.get("metadata") {
            Some(value @ Value::Object(_)) => Metadata::deserialize(value)
                .map_err(|e| DocumentError::InvalidMetadata(e.to_string()))?,
            _ => return Err(DocumentError::MissingMetadata),
        };

        let entries = match root.get("filtered_stocks") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(DocumentError::StocksNotSequence),
        };

        let signal_breakdown = match root.get("signal_breakdown") {
            Some(value @ Value::Object(_)) => Some(
                SignalBreakdown::deserialize(value)
                    .map_err(|e| DocumentError::InvalidMetadata(e.to_string()))?,
            ),
            _ => None,
        };

        let stocks = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                StockEntry::deserialize(entry).map_err(|e| DocumentError::InvalidStock {
                    index,
                    error: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedDocument {
            metadata,
            signal_breakdown,
            stocks,
        })
    }
}

/// A document whose shape has been checked
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    pub metadata: Metadata,
    pub signal_breakdown: Option<SignalBreakdown>,
    pub stocks: Vec<StockEntry>,
}

/// Run summary written by the screener
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_analyzed: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub success_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub last_updated: Option<String>,
}

/// Per-signal hit counts
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignalBreakdown {
    #[serde(default, deserialize_with = "lenient_number")]
    pub signal1_count: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub signal2_count: Option<f64>,
}

/// One screened stock
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockEntry {
    pub ticker: String,

    #[serde(default)]
    pub name: Option<String>,

    pub market: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub current_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub volume_20_avg: Option<f64>,

    pub signals: Signals,
}

impl StockEntry {
    /// Name shown on the card; the screener job may omit `name`
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.ticker,
        }
    }

    /// Whether prices should use won formatting
    pub fn is_krx(&self) -> bool {
        self.market == KRX_MARKET
    }
}

/// Both signal families for an entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Signals {
    #[serde(default)]
    pub signal1: SignalPair,

    #[serde(default)]
    pub signal2: SignalPair,
}

/// Entry and exit variants of one signal family
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignalPair {
    #[serde(default)]
    pub entry: Option<SignalInstance>,

    #[serde(default)]
    pub exit: Option<SignalInstance>,
}

/// A triggered signal with its price levels
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignalInstance {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub breakout_level: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub exit_level: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub breakdown_level: Option<f64>,
}

/// Shape violations that reject a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("metadata is missing")]
    MissingMetadata,

    #[error("metadata is malformed: {0}")]
    InvalidMetadata(String),

    #[error("filtered_stocks is not a sequence")]
    StocksNotSequence,

    #[error("filtered_stocks[{index}] is malformed: {error}")]
    InvalidStock { index: usize, error: String },
}

/// Accept any JSON value, keeping it only when it is a number
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Accept strings and numbers as text, anything else as absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}
