//! Driven port for fetching beers from a remote catalogue.

use async_trait::async_trait;

use crate::domain::{Beer, BeerId};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the remote catalogue.
    pub enum BeerSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "beer source transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "beer source timeout: {message}",
        /// The remote catalogue rate-limited the request.
        RateLimited { message: String } =>
            "beer source rate limited request: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "beer source response decode failed: {message}",
    }
}

impl BeerSourceError {
    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for reading single beers from a remote catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BeerSource: Send + Sync {
    /// Fetch one beer. `Ok(None)` when the catalogue has no such id.
    async fn fetch_beer(&self, id: BeerId) -> Result<Option<Beer>, BeerSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BeerSourceError::transport("reset"), true)]
    #[case(BeerSourceError::timeout("10s"), true)]
    #[case(BeerSourceError::rate_limited("429"), true)]
    #[case(BeerSourceError::decode("not json"), false)]
    fn retryable_errors_are_transient(#[case] err: BeerSourceError, #[case] expected: bool) {
        assert_eq!(err.is_retryable(), expected);
    }
}
