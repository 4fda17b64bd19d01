//! Alert events delivered by the external alert producer.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
/// Currency code carried by an alert. Matching is exact and case-sensitive.
pub enum CurrencySymbol {
    /// Bitcoin.
    Btc,
    /// Ethereum.
    Eth,
    /// Digital dollar stablecoin.
    Usdd,
    /// Solana.
    Sol,
    /// Any other code, kept verbatim.
    Other(String),
}

impl CurrencySymbol {
    /// Returns the wire code for this symbol.
    pub fn code(&self) -> &str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Usdd => "USDD",
            Self::Sol => "SOL",
            Self::Other(code) => code,
        }
    }
}

impl Default for CurrencySymbol {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<&str> for CurrencySymbol {
    fn from(code: &str) -> Self {
        match code {
            "BTC" => Self::Btc,
            "ETH" => Self::Eth,
            "USDD" => Self::Usdd,
            "SOL" => Self::Sol,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for CurrencySymbol {
    fn from(code: String) -> Self {
        match Self::from(code.as_str()) {
            Self::Other(_) => Self::Other(code),
            known => known,
        }
    }
}

impl From<CurrencySymbol> for String {
    fn from(symbol: CurrencySymbol) -> Self {
        match symbol {
            CurrencySymbol::Other(code) => code,
            known => known.code().to_string(),
        }
    }
}

impl std::fmt::Display for CurrencySymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which producer rule fired. Informational only.
pub enum AlertKind {
    /// An absolute price target was crossed.
    Price,
    /// A daily percent-change target was crossed.
    Percent,
    /// A kind this build does not know about.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One fired alert. Consumed by a single notify call and then discarded.
pub struct AlertEvent {
    /// Currency the alert is about.
    #[serde(default, deserialize_with = "lenient_symbol")]
    pub symbol: CurrencySymbol,
    /// Free-text alert message, used as the notification body.
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    /// Producer rule kind, sent as `type` on the wire.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AlertKind>,
}

impl AlertEvent {
    /// Builds an alert without a producer rule kind.
    pub fn new(symbol: impl Into<CurrencySymbol>, message: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            message: message.into(),
            kind: None,
        }
    }
}

/// Reads a scalar as text: `null` is empty, numbers and booleans are rendered.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(de::Error::custom(format!("expected a scalar, found {other}"))),
    }
}

fn lenient_symbol<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<CurrencySymbol, D::Error> {
    lenient_text(deserializer).map(CurrencySymbol::from)
}

/// Decodes a raw producer payload into alert events.
///
/// Anything that is not an array (including `null`) decodes to an empty batch. An array whose
/// entries are not all alert objects is rejected as a whole.
///
/// # Errors
///
/// Returns the decoder message when the array holds an entry that is not an alert object.
pub fn decode_alert_batch(payload: Value) -> Result<Vec<AlertEvent>, String> {
    if !payload.is_array() {
        return Ok(Vec::new());
    }
    serde_json::from_value(payload).map_err(|e| e.to_string())
}
