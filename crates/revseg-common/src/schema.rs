use crate::de::de_ordered_pairs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Errors raised while building the core data types.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("ticker symbol must not be empty")]
    EmptyTicker,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Ticker symbol
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A trimmed, uppercased ticker symbol, e.g. `AAPL`.
///
/// Nothing beyond non-emptiness is checked; characters that would break a URL are
/// percent-encoded when the request is built rather than rejected here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

impl TickerSymbol {
    pub fn parse(raw: &str) -> Result<Self, SchemaError> {
        let symbol = raw.trim();
        if symbol.is_empty() {
            return Err(SchemaError::EmptyTicker);
        }
        Ok(Self(symbol.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TickerSymbol {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Output
//
////////////////////////////////////////////////////////////////////////////////////////////////////

static NEXT_SEGMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a single [`Segment`]; unique for the lifetime of the process.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(u64);

impl SegmentId {
    fn next() -> Self {
        Self(NEXT_SEGMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One product/service category and its reported revenue.
/// ```json
/// { "id": 17, "category": "iPhone", "value": 200583000000.0 }
/// ```
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub category: String,
    pub value: f64,
}

impl Segment {
    /// Build a fresh record with a new identity.
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self {
            id: SegmentId::next(),
            category: category.into(),
            value,
        }
    }
}

/// Segments of the most recent period, plus the period key they were reported under.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SegmentSet {
    pub period: Option<String>,
    pub segments: Vec<Segment>,
}

impl SegmentSet {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The `(category, value)` pairs, dropping record identities.
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.segments
            .iter()
            .map(|segment| (segment.category.as_str(), segment.value))
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Input
//
////////////////////////////////////////////////////////////////////////////////////////////////////

// [
//     {
//         "2024-09-28": {          <-- period key
//             "Mac": 29984000000,
//             "Service": 96169000000,
//             "Wearables, Home and Accessories": 37005000000,
//             "iPad": 26694000000,
//             "iPhone": 201183000000
//         }
//     },
//     {
//         "2023-09-30": { ... }    <-- older periods; ignored
//     }
// ]
pub type RevenueSegmentResponse = Vec<PeriodEntry>;

/// One element of the outer array. Key order of the wire payload is kept.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct PeriodEntry {
    #[serde(deserialize_with = "de_ordered_pairs")]
    pub periods: Vec<(String, CategoryValues)>,
}

/// `category -> revenue` for a single period, in wire order.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct CategoryValues {
    #[serde(deserialize_with = "de_ordered_pairs")]
    pub values: Vec<(String, f64)>,
}

/// Body returned by the provider on a rejected request, e.g. an invalid API key.
/// ```json
/// { "Error Message": "Invalid API KEY. Please retry or visit our documentation ..." }
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct ProviderError {
    #[serde(rename = "Error Message")]
    pub message: String,
}
