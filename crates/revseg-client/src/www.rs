use crate::config::Period;
use crate::error::FetchError;
use revseg_common::TickerSymbol;
use url::Url;

pub const SEGMENTATION_PATH: &str = "/api/v4/revenue-product-segmentation";
const STRUCTURE: &str = "flat";

/// `{base}/api/v4/revenue-product-segmentation?symbol=AAPL&structure=flat&period=annual&apikey=...`
///
/// The symbol is percent-encoded, so any ticker produces a valid URL; only a broken
/// `base` fails.
pub fn segmentation_url(
    base: &str,
    symbol: &TickerSymbol,
    period: Period,
    api_key: &str,
) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: base.to_string(),
        reason,
    };

    let base_url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", base_url.scheme())));
    }

    let mut url = base_url
        .join(SEGMENTATION_PATH)
        .map_err(|e| invalid(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("symbol", symbol.as_str())
        .append_pair("structure", STRUCTURE)
        .append_pair("period", period.as_str())
        .append_pair("apikey", api_key);
    Ok(url)
}

/// The URL as a string with the API key masked, for logging.
pub fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
