//! Catalogue service.
//!
//! Enforces the two catalogue invariants on every write: ids are unique and
//! no two stored beers are business-equal. Likes are never written here;
//! `likedBy` is cleared on create and carried over on update.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{BeerCatalogue, BeerRepository, UserRepository};
use super::{Beer, BeerId, ConflictReason, Failure, LikeService, is_same_beer};

/// Catalogue service implementing [`BeerCatalogue`].
pub struct BeerService<B: ?Sized, U: ?Sized> {
    beers: Arc<B>,
    likes: LikeService<U, B>,
}

impl<B: ?Sized, U: ?Sized> Clone for BeerService<B, U> {
    fn clone(&self) -> Self {
        Self {
            beers: Arc::clone(&self.beers),
            likes: self.likes.clone(),
        }
    }
}

impl<B: ?Sized, U: ?Sized> BeerService<B, U> {
    /// Create a service over the beer store and the favourites manager that
    /// shares it.
    pub fn new(beers: Arc<B>, likes: LikeService<U, B>) -> Self {
        Self { beers, likes }
    }
}

impl<B, U> BeerService<B, U>
where
    B: BeerRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn require(&self, id: BeerId) -> Result<Beer, Failure> {
        self.beers
            .find_by_id(id)
            .await?
            .ok_or_else(|| Failure::beer_not_found(id))
    }

    /// Stored beers other than `except` that are business-equal to `beer`.
    ///
    /// Only same-named beers can match, so the name index narrows the scan.
    async fn equal_beer(&self, beer: &Beer, except: Option<BeerId>) -> Result<Option<Beer>, Failure> {
        let Some(name) = beer.name.as_deref() else {
            return Ok(None);
        };
        Ok(self
            .beers
            .find_by_name(name)
            .await?
            .into_iter()
            .find(|stored| Some(stored.id) != except && is_same_beer(stored, beer)))
    }
}

#[async_trait]
impl<B, U> BeerCatalogue for BeerService<B, U>
where
    B: BeerRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn create(&self, beer: Beer) -> Result<Beer, Failure> {
        let beer = beer.without_likes();
        if self.beers.find_by_id(beer.id).await?.is_some() {
            return Err(Failure::conflict(
                ConflictReason::DuplicateId,
                format!("This id {} already in use, try another one", beer.id),
            ));
        }
        if let Some(existing) = self.equal_beer(&beer, None).await? {
            info!(beer_id = %beer.id, existing_id = %existing.id, "duplicate beer rejected");
            return Err(Failure::conflict(
                ConflictReason::DuplicateBeer,
                "This beer already exists just with another id.",
            ));
        }
        self.beers.insert(&beer).await?;
        info!(beer_id = %beer.id, "beer created");
        Ok(beer)
    }

    async fn update(&self, id: &str, beer: Beer) -> Result<Beer, Failure> {
        let id: BeerId = id.parse()?;
        if beer.id != id {
            return Err(Failure::invalid_argument(format!(
                "path id {id} does not match body id {}",
                beer.id
            )));
        }
        self.require(id).await?;
        if let Some(existing) = self.equal_beer(&beer, Some(id)).await? {
            return Err(Failure::conflict(
                ConflictReason::CollidesWithExisting,
                format!("update would duplicate beer {}", existing.id),
            ));
        }
        let updated = self.beers.replace_attributes(&beer).await?;
        info!(beer_id = %id, "beer updated");
        Ok(updated)
    }

    async fn get(&self, id: &str) -> Result<Beer, Failure> {
        self.require(id.parse()?).await
    }

    async fn delete(&self, id: &str) -> Result<(), Failure> {
        let id: BeerId = id.parse()?;
        self.require(id).await?;
        self.likes.detach_beer(id).await?;
        if !self.beers.delete(id).await? {
            return Err(Failure::beer_not_found(id));
        }
        info!(beer_id = %id, "beer deleted");
        Ok(())
    }

    async fn strong_and_bitter(&self, min_abv: f64, min_ibu: f64) -> Result<Vec<Beer>, Failure> {
        Ok(self
            .beers
            .find_by_ibu_above(min_ibu)
            .await?
            .into_iter()
            .filter(|beer| beer.abv.is_some_and(|abv| abv > min_abv))
            .collect())
    }

    async fn by_prefix_with_malt(
        &self,
        prefix: &str,
        min_malt: f64,
    ) -> Result<Vec<Beer>, Failure> {
        let named = self.beers.find_by_name_prefix(prefix).await?;
        if named.is_empty() {
            return Err(Failure::beer_not_found(format!("starting with '{prefix}'")));
        }
        let matching: Vec<Beer> = named
            .into_iter()
            .filter(|beer| {
                beer.ingredients
                    .as_ref()
                    .is_some_and(|ingredients| ingredients.total_malt() > min_malt)
            })
            .collect();
        if matching.is_empty() {
            return Err(Failure::beer_not_found(format!(
                "starting with '{prefix}' with more than {min_malt} malt"
            )));
        }
        Ok(matching)
    }
}
