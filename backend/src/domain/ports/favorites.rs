//! Driving port for the favourites relationship.

use async_trait::async_trait;

use crate::domain::{BeerLookup, Failure, LikeEdge, LikeRemoval, RepairReport};

/// Like-edge commands exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Favorites: Send + Sync {
    /// Add a like edge for user `user_id`.
    async fn add(&self, user_id: &str, beer: BeerLookup) -> Result<LikeEdge, Failure>;

    /// Remove a like edge for user `user_id`; absent edges are not an error.
    async fn remove(&self, user_id: &str, beer: BeerLookup) -> Result<LikeRemoval, Failure>;

    /// Repair both mirrors for user `user_id`.
    async fn repair(&self, user_id: &str) -> Result<RepairReport, Failure>;
}
