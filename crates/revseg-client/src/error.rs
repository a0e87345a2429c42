use reqwest::StatusCode;
use revseg_common::DecodeError;

/// Everything that can go wrong in one fetch cycle.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The request URL could not be built; nothing was sent.
    #[error("invalid request URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// Network unreachable, timeout, body read failure, ...
    #[error("Failed to fetch data: {message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch data: server responded with {status}")]
    Status { status: StatusCode, body: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FetchError {
    /// Transport errors carry the request URL, which holds the API key; strip it.
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        let source = e.without_url();
        FetchError::Transport {
            message: describe(&source),
            source,
        }
    }
}

/// An error and every cause beneath it, e.g.
/// `error sending request: client error (Connect): tcp connect error: Connection refused`.
pub(crate) fn describe(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut cause = e.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        // some layers repeat their child's text
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = inner.source();
    }
    message
}

const BODY_SNIPPET_LEN: usize = 200;

/// First few characters of a response body, for logs and error values.
pub(crate) fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_SNIPPET_LEN)
        .collect()
}
