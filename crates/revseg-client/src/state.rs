use crate::client_ext::SegmentSource;
use crate::error::FetchError;
use log::{debug, error, warn};
use revseg_common::{parse_bytes, Segment, TickerSymbol};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Everything an observer needs to draw the screen.
///
/// Always replaced as a whole; observers never see one field updated without the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentState {
    pub symbol: Option<TickerSymbol>,
    pub loading: bool,
    pub error: Option<String>,
    pub period: Option<String>,
    pub segments: Vec<Segment>,
}

/// What the screen should show for a given state.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Nothing has been requested yet.
    Idle,
    Loading,
    Failed(String),
    /// The last fetch succeeded but reported no segments.
    Empty,
    Loaded,
}

impl SegmentState {
    /// Loading wins over an error, an error wins over data.
    pub fn view(&self) -> View {
        if self.loading {
            View::Loading
        } else if let Some(message) = &self.error {
            View::Failed(message.clone())
        } else if !self.segments.is_empty() {
            View::Loaded
        } else if self.symbol.is_none() {
            View::Idle
        } else {
            View::Empty
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// This request was the latest when it finished; its result is now visible.
    Applied(View),
    /// A newer request was issued meanwhile; the result was dropped.
    Stale,
    /// The request could not be built; visible state is untouched.
    Skipped(FetchError),
}

/// Runs fetches against a [`SegmentSource`] and publishes the resulting [`SegmentState`].
///
/// Each fetch takes a token from a monotonically increasing counter. Only the completion
/// carrying the latest token is published; earlier ones that finish late are discarded.
pub struct Tracker<S> {
    source: S,
    latest: AtomicU64,
    state: watch::Sender<SegmentState>,
}

impl<S: SegmentSource> Tracker<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(SegmentState::default());
        Self {
            source,
            latest: AtomicU64::new(0),
            state,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn subscribe(&self) -> watch::Receiver<SegmentState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SegmentState {
        self.state.borrow().clone()
    }

    /// Fetch and map the segments of `symbol`, publishing the result if still current.
    ///
    /// Dropping the future part-way clears `loading` unless a newer fetch has started.
    pub async fn fetch(&self, symbol: TickerSymbol) -> FetchOutcome {
        let url = match self.source.request_url(&symbol) {
            Ok(url) => url,
            Err(e) => {
                warn!("[{symbol}] request not sent: {e}");
                return FetchOutcome::Skipped(e);
            }
        };

        // token issue and the loading publish happen under the channel's lock,
        // so a completing request can't interleave between them
        let mut token = 0;
        self.state.send_modify(|state| {
            token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = SegmentState {
                symbol: Some(symbol.clone()),
                loading: true,
                error: None,
                period: state.period.take(),
                segments: std::mem::take(&mut state.segments),
            };
        });
        debug!("[{symbol}] request #{token} issued");
        let mut guard = LoadingGuard {
            state: &self.state,
            latest: &self.latest,
            token,
            armed: true,
        };

        let result = match self.source.fetch_raw(url).await {
            Ok(body) => parse_bytes(&body).map_err(FetchError::from),
            Err(e) => Err(e),
        };

        let mut view = None;
        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != token {
                return false;
            }
            let next = match result {
                Ok(set) => SegmentState {
                    symbol: Some(symbol.clone()),
                    loading: false,
                    error: None,
                    period: set.period,
                    segments: set.segments,
                },
                Err(e) => {
                    error!("[{symbol}] request #{token} failed: {e}");
                    SegmentState {
                        symbol: Some(symbol.clone()),
                        loading: false,
                        error: Some(e.to_string()),
                        period: state.period.take(),
                        segments: std::mem::take(&mut state.segments),
                    }
                }
            };
            view = Some(next.view());
            *state = next;
            true
        });
        guard.armed = false;

        match view {
            Some(view) => {
                debug!("[{symbol}] request #{token} applied");
                FetchOutcome::Applied(view)
            }
            None => {
                debug!("[{symbol}] request #{token} superseded; result discarded");
                FetchOutcome::Stale
            }
        }
    }
}

/// Clears `loading` if a fetch is dropped mid-flight while it is still the latest request.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SegmentState>,
    latest: &'a AtomicU64,
    token: u64,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != self.token || !state.loading {
                return false;
            }
            debug!("request #{} cancelled before completion", self.token);
            state.loading = false;
            true
        });
    }
}
