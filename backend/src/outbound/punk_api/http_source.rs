//! Reqwest-backed Punk API source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain beers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::PunkBeerDto;
use crate::domain::ports::{BeerSource, BeerSourceError};
use crate::domain::{Beer, BeerId};

const DEFAULT_USER_AGENT: &str = "beerorder-catalogue-seeder/0.1";

/// Remote catalogue adapter issuing `GET {endpoint}/{id}` requests.
pub struct PunkApiSource {
    client: Client,
    endpoint: Url,
}

impl PunkApiSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = PunkApiSource::new(endpoint, Duration::from_secs(10));
    /// assert!(source.is_ok() || source.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    fn beer_url(&self, id: BeerId) -> Result<Url, BeerSourceError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BeerSourceError::transport(format!(
                    "endpoint {} cannot carry a beer id",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl BeerSource for PunkApiSource {
    async fn fetch_beer(&self, id: BeerId) -> Result<Option<Beer>, BeerSourceError> {
        let url = self.beer_url(id)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_beer(body.as_ref())
    }
}

fn parse_beer(body: &[u8]) -> Result<Option<Beer>, BeerSourceError> {
    let decoded: Vec<PunkBeerDto> = serde_json::from_slice(body).map_err(|error| {
        BeerSourceError::decode(format!("invalid Punk API JSON payload: {error}"))
    })?;
    Ok(decoded.into_iter().next().map(PunkBeerDto::into_domain_beer))
}

fn map_transport_error(error: reqwest::Error) -> BeerSourceError {
    if error.is_timeout() {
        BeerSourceError::timeout(error.to_string())
    } else {
        BeerSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BeerSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => BeerSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BeerSourceError::timeout(message)
        }
        _ => BeerSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
