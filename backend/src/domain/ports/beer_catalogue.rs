//! Driving port for catalogue use-cases.
//!
//! Identifiers arrive as raw path segments; implementations reject anything
//! that is not a plain digit string with `InvalidArgument`.

use async_trait::async_trait;

use crate::domain::{Beer, Failure};

/// Catalogue commands and queries exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BeerCatalogue: Send + Sync {
    /// Add a beer. Any submitted `likedBy` entries are discarded.
    async fn create(&self, beer: Beer) -> Result<Beer, Failure>;

    /// Replace the descriptive content of beer `id`, keeping its likes.
    async fn update(&self, id: &str, beer: Beer) -> Result<Beer, Failure>;

    /// Fetch beer `id`.
    async fn get(&self, id: &str) -> Result<Beer, Failure>;

    /// Delete beer `id` after detaching it from every user's favourites.
    async fn delete(&self, id: &str) -> Result<(), Failure>;

    /// Beers with `abv > min_abv` and `ibu > min_ibu`.
    async fn strong_and_bitter(&self, min_abv: f64, min_ibu: f64) -> Result<Vec<Beer>, Failure>;

    /// Beers named with `prefix` whose malt total exceeds `min_malt`.
    async fn by_prefix_with_malt(
        &self,
        prefix: &str,
        min_malt: f64,
    ) -> Result<Vec<Beer>, Failure>;
}
