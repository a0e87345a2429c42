use crate::schema::{ProviderError, RevenueSegmentResponse, Segment, SegmentSet};
use log::{debug, trace};

/// The body could not be read as a revenue-segmentation payload.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered with its own error envelope instead of data.
    #[error("Failed to decode JSON: provider returned an error: {0}")]
    Provider(String),
}

/// Map a decoded response to the segments of its most recent period.
///
/// Only the first element of the outer array, and the first period inside it, are read;
/// everything after is ignored. Any level being empty gives an empty set.
pub fn parse(response: RevenueSegmentResponse) -> SegmentSet {
    let Some(latest) = response.into_iter().next() else {
        trace!("empty response; no segments");
        return SegmentSet::default();
    };

    let Some((period, categories)) = latest.periods.into_iter().next() else {
        trace!("first entry has no period; no segments");
        return SegmentSet::default();
    };

    let segments = categories
        .values
        .into_iter()
        .map(|(category, value)| Segment::new(category, value))
        .collect::<Vec<_>>();

    debug!("{} segments mapped for period {period}", segments.len());
    SegmentSet {
        period: Some(period),
        segments,
    }
}

/// Decode raw response bytes, then [`parse`] them.
pub fn parse_bytes(body: &[u8]) -> Result<SegmentSet, DecodeError> {
    match serde_json::from_slice::<RevenueSegmentResponse>(body) {
        Ok(response) => Ok(parse(response)),
        Err(e) => {
            // surface the provider's own message where there is one
            if let Ok(provider) = serde_json::from_slice::<ProviderError>(body) {
                return Err(DecodeError::Provider(provider.message));
            }
            Err(DecodeError::Json(e))
        }
    }
}
