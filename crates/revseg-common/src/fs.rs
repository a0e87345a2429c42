use crate::mapper::{parse_bytes, DecodeError};
use crate::schema::SegmentSet;
use log::{error, trace};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Reads a saved response body from `path`.
///
/// ```rust,ignore
/// let body = revseg_common::fs::read_bytes("./buffer/AAPL.json").await?;
/// ```
pub async fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>, ReadError> {
    let path = path.as_ref();
    trace!("reading file at path: \"{}\"", path.display());
    tokio::fs::read(path).await.map_err(|source| {
        error!("failed to read file at \"{}\": {source}", path.display());
        ReadError::Io {
            path: path.display().to_string(),
            source,
        }
    })
}

/// Reads a saved revenue-segmentation response and maps it, as if it had just been fetched.
pub async fn read_segments(path: impl AsRef<Path>) -> Result<SegmentSet, ReadError> {
    let body = read_bytes(path).await?;
    Ok(parse_bytes(&body)?)
}
