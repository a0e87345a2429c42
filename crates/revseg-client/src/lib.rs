pub mod client_ext;
pub mod config;
pub mod error;
pub mod state;
pub mod www;

pub mod prelude {
    pub use crate::client_ext::{ClientExt, FmpClient, SegmentSource};
    pub use crate::config::{Config, Period};
    pub use crate::error::FetchError;
    pub use crate::state::{FetchOutcome, SegmentState, Tracker, View};
    pub use reqwest::Client;

    /// Build the HTTP client with the user agent and timeout from `config`.
    pub fn build_client(config: &Config) -> Result<Client, FetchError> {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(FetchError::Client)
    }
}
