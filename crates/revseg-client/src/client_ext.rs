use crate::config::Config;
use crate::error::{snippet, FetchError};
use crate::www;
use log::{debug, trace, warn};
use reqwest::Client;
use revseg_common::{parse_bytes, SegmentSet, TickerSymbol};
use std::future::Future;
use url::Url;

/// Add-on methods for [`reqwest::Client`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
pub trait ClientExt {
    /// GET `url` and return the raw body.
    ///
    /// With `check_status`, a non-2xx response is an error; without it, any body is
    /// returned as-is and left to the decoder.
    fn fetch_raw_body(
        &self,
        url: Url,
        check_status: bool,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

impl ClientExt for Client {
    async fn fetch_raw_body(&self, url: Url, check_status: bool) -> Result<Vec<u8>, FetchError> {
        let shown = www::redacted(&url);
        trace!("GET {shown}");

        let response = self.get(url).send().await.map_err(|e| {
            let err = FetchError::transport(e);
            debug!("failed fetching response from {shown}: {err}");
            err
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            let err = FetchError::transport(e);
            debug!("failed reading body from {shown}: {err}");
            err
        })?;
        debug!("{shown} responded {status} with {} bytes", body.len());

        if !status.is_success() {
            if check_status {
                warn!("{shown} responded {status}: {}", snippet(&body));
                return Err(FetchError::Status {
                    status,
                    body: snippet(&body),
                });
            }
            warn!("{shown} responded {status}; decoding the body anyway");
        }

        Ok(body.to_vec())
    }
}

/// Where the fetcher gets its bytes from.
///
/// URL construction is split from the request itself so a caller can reject a
/// broken request before touching any visible state.
pub trait SegmentSource: Send + Sync {
    fn request_url(&self, symbol: &TickerSymbol) -> Result<Url, FetchError>;

    fn fetch_raw(&self, url: Url) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// The Financial Modeling Prep revenue-segmentation endpoint.
#[derive(Debug, Clone)]
pub struct FmpClient {
    http: Client,
    config: Config,
}

impl FmpClient {
    pub fn new(http: Client, config: Config) -> Self {
        Self { http, config }
    }

    /// Build the HTTP client from `config` as well.
    pub fn from_config(config: Config) -> Result<Self, FetchError> {
        let http = crate::prelude::build_client(&config)?;
        Ok(Self::new(http, config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// One fetch-and-map cycle, without any state tracking.
    pub async fn fetch_segments(&self, symbol: &TickerSymbol) -> Result<SegmentSet, FetchError> {
        let url = self.request_url(symbol)?;
        let body = self.fetch_raw(url).await?;
        Ok(parse_bytes(&body)?)
    }
}

impl SegmentSource for FmpClient {
    fn request_url(&self, symbol: &TickerSymbol) -> Result<Url, FetchError> {
        www::segmentation_url(
            &self.config.base_url,
            symbol,
            self.config.period,
            &self.config.api_key,
        )
    }

    fn fetch_raw(&self, url: Url) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send {
        self.http.fetch_raw_body(url, self.config.check_status)
    }
}
