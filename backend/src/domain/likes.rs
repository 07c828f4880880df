//! Favourites relationship manager.
//!
//! A like edge between a user and a beer is stored twice: in
//! `User::favorites` and in `Beer::liked_by`. [`LikeService`] is the only
//! writer of either mirror. Writes go through the stores' atomic set
//! primitives, favourites first, then `likedBy`. There is no cross-record
//! transaction; a failed second write surfaces as
//! [`Failure::PartialRelationshipWrite`] and [`LikeService::reconcile`]
//! repairs the user's edges afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::ports::{
    BeerRepository, BeerRepositoryError, Favorites, UserRepository, UserRepositoryError,
};
use super::{Beer, BeerId, ConflictReason, Failure, MirrorSide, User, UserId, is_same_named_beer};

/// How the caller identifies the beer of an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum BeerLookup {
    /// Primary id.
    Id(BeerId),
    /// Business-key descriptor, matched against stored beers of the same
    /// name with [`is_same_named_beer`].
    Descriptor(Box<Beer>),
}

/// One persisted like edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeEdge {
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[schema(value_type = u64)]
    pub beer_id: BeerId,
}

/// Outcome of [`LikeService::remove_like`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeRemoval {
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[schema(value_type = Option<u64>)]
    pub beer_id: Option<BeerId>,
    pub removed_from_favorites: bool,
    pub removed_from_liked_by: bool,
}

impl LikeRemoval {
    fn untouched(user_id: UserId, beer_id: Option<BeerId>) -> Self {
        Self {
            user_id,
            beer_id,
            removed_from_favorites: false,
            removed_from_liked_by: false,
        }
    }
}

/// Outcome of [`LikeService::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    /// Beers whose `likedBy` entry was restored.
    #[schema(value_type = Vec<u64>)]
    pub restored: Vec<BeerId>,
    /// Favourites dropped because the beer no longer exists.
    #[schema(value_type = Vec<u64>)]
    pub dropped: Vec<BeerId>,
    /// Beers still listing the user although the favourite was removed.
    #[schema(value_type = Vec<u64>)]
    pub unlinked: Vec<BeerId>,
}

impl RepairReport {
    /// Whether the pass changed nothing.
    pub fn is_clean(&self) -> bool {
        self.restored.is_empty() && self.dropped.is_empty() && self.unlinked.is_empty()
    }
}

/// Relationship consistency manager for like edges.
pub struct LikeService<U: ?Sized, B: ?Sized> {
    users: Arc<U>,
    beers: Arc<B>,
}

impl<U: ?Sized, B: ?Sized> Clone for LikeService<U, B> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            beers: Arc::clone(&self.beers),
        }
    }
}

impl<U: ?Sized, B: ?Sized> LikeService<U, B> {
    /// Create a manager over the two mirrored stores.
    pub fn new(users: Arc<U>, beers: Arc<B>) -> Self {
        Self { users, beers }
    }
}

impl<U, B> LikeService<U, B>
where
    U: UserRepository + ?Sized,
    B: BeerRepository + ?Sized,
{
    async fn require_user(&self, user_id: &UserId) -> Result<User, Failure> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Failure::user_not_found(user_id))
    }

    async fn resolve(&self, lookup: &BeerLookup) -> Result<Option<Beer>, Failure> {
        match lookup {
            BeerLookup::Id(id) => Ok(self.beers.find_by_id(*id).await?),
            BeerLookup::Descriptor(descriptor) => {
                let Some(name) = descriptor.name.as_deref() else {
                    return Ok(None);
                };
                let candidates = self.beers.find_by_name(name).await?;
                Ok(candidates
                    .into_iter()
                    .find(|stored| is_same_named_beer(stored, descriptor)))
            }
        }
    }

    fn describe(lookup: &BeerLookup) -> String {
        match lookup {
            BeerLookup::Id(id) => id.to_string(),
            BeerLookup::Descriptor(descriptor) => descriptor
                .name
                .clone()
                .unwrap_or_else(|| "<unnamed>".to_owned()),
        }
    }

    /// Add the edge `(user_id, beer)`.
    ///
    /// Fails with `NotFound` when either side is missing and with
    /// `Conflict(EdgeAlreadyExists)` when either mirror already holds the
    /// edge. When the favourites write succeeds but the `likedBy` write
    /// fails the error is [`Failure::PartialRelationshipWrite`]; the
    /// favourite is kept.
    pub async fn add_like(
        &self,
        user_id: &UserId,
        beer: &BeerLookup,
    ) -> Result<LikeEdge, Failure> {
        let user = self.require_user(user_id).await?;
        let beer = self
            .resolve(beer)
            .await?
            .ok_or_else(|| Failure::beer_not_found(Self::describe(beer)))?;

        if user.likes(beer.id) || beer.is_liked_by(user_id) {
            return Err(Self::edge_exists(user_id, beer.id));
        }

        if !self.users.add_favorite(user_id, beer.id).await? {
            return Err(Self::edge_exists(user_id, beer.id));
        }

        if let Err(err) = self.beers.add_liked_by(beer.id, user_id).await {
            error!(
                user_id = %user_id,
                beer_id = %beer.id,
                failed_side = %MirrorSide::LikedBy,
                error = %err,
                "like edge half written"
            );
            return Err(Failure::PartialRelationshipWrite {
                user: user_id.clone(),
                beer: beer.id,
                failed_side: MirrorSide::LikedBy,
                message: err.to_string(),
            });
        }

        info!(user_id = %user_id, beer_id = %beer.id, "like added");
        Ok(LikeEdge {
            user_id: user_id.clone(),
            beer_id: beer.id,
        })
    }

    fn edge_exists(user_id: &UserId, beer_id: BeerId) -> Failure {
        Failure::conflict(
            ConflictReason::EdgeAlreadyExists,
            format!("beer {beer_id} is already a favorite of user {user_id}"),
        )
    }

    /// Remove the edge `(user_id, beer)`.
    ///
    /// Removing an absent edge succeeds and reports that nothing changed.
    /// The user must exist; the beer need not.
    pub async fn remove_like(
        &self,
        user_id: &UserId,
        beer: &BeerLookup,
    ) -> Result<LikeRemoval, Failure> {
        self.require_user(user_id).await?;
        let beer_id = match beer {
            BeerLookup::Id(id) => *id,
            BeerLookup::Descriptor(_) => match self.resolve(beer).await? {
                Some(stored) => stored.id,
                None => return Ok(LikeRemoval::untouched(user_id.clone(), None)),
            },
        };

        let removed_from_favorites = self.users.remove_favorite(user_id, beer_id).await?;
        let removed_from_liked_by = match self.beers.remove_liked_by(beer_id, user_id).await {
            Ok(changed) => changed,
            Err(BeerRepositoryError::MissingRecord { .. }) => false,
            Err(err) if !removed_from_favorites => return Err(err.into()),
            Err(err) => {
                error!(
                    user_id = %user_id,
                    beer_id = %beer_id,
                    failed_side = %MirrorSide::LikedBy,
                    error = %err,
                    "like edge half removed"
                );
                return Err(Failure::PartialRelationshipWrite {
                    user: user_id.clone(),
                    beer: beer_id,
                    failed_side: MirrorSide::LikedBy,
                    message: err.to_string(),
                });
            }
        };

        info!(
            user_id = %user_id,
            beer_id = %beer_id,
            removed_from_favorites,
            removed_from_liked_by,
            "like removed"
        );
        Ok(LikeRemoval {
            user_id: user_id.clone(),
            beer_id: Some(beer_id),
            removed_from_favorites,
            removed_from_liked_by,
        })
    }

    /// Bring both mirrors for `user_id` back in line.
    ///
    /// Favourites pointing at existing beers get their `likedBy` entry
    /// restored, favourites pointing at deleted beers are dropped, and beers
    /// listing the user without a matching favourite lose that entry.
    pub async fn reconcile(&self, user_id: &UserId) -> Result<RepairReport, Failure> {
        let user = self.require_user(user_id).await?;
        let mut report = RepairReport::default();

        for beer_id in user.favorites() {
            match self.beers.find_by_id(*beer_id).await? {
                Some(beer) if beer.is_liked_by(user_id) => {}
                Some(_) => {
                    if self.beers.add_liked_by(*beer_id, user_id).await? {
                        report.restored.push(*beer_id);
                    }
                }
                None => {
                    if self.users.remove_favorite(user_id, *beer_id).await? {
                        report.dropped.push(*beer_id);
                    }
                }
            }
        }

        for beer in self.beers.list().await? {
            if beer.is_liked_by(user_id)
                && !user.likes(beer.id)
                && self.beers.remove_liked_by(beer.id, user_id).await?
            {
                report.unlinked.push(beer.id);
            }
        }

        if report.is_clean() {
            info!(user_id = %user_id, "like edges already consistent");
        } else {
            warn!(
                user_id = %user_id,
                restored = report.restored.len(),
                dropped = report.dropped.len(),
                unlinked = report.unlinked.len(),
                "like edges repaired"
            );
        }
        Ok(report)
    }

    /// Remove `beer_id` from every user's favourites ahead of deleting it.
    pub async fn detach_beer(&self, beer_id: BeerId) -> Result<usize, Failure> {
        let mut detached = 0;
        for user in self.users.list().await? {
            if !user.likes(beer_id) {
                continue;
            }
            match self.users.remove_favorite(&user.id, beer_id).await {
                Ok(true) => detached += 1,
                Ok(false) | Err(UserRepositoryError::MissingRecord { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
        info!(beer_id = %beer_id, detached, "beer detached from favorites");
        Ok(detached)
    }

    /// Remove `user_id` from every beer's `likedBy` ahead of deleting it.
    pub async fn detach_user(&self, user_id: &UserId) -> Result<usize, Failure> {
        let mut detached = 0;
        for beer in self.beers.list().await? {
            if !beer.is_liked_by(user_id) {
                continue;
            }
            match self.beers.remove_liked_by(beer.id, user_id).await {
                Ok(true) => detached += 1,
                Ok(false) | Err(BeerRepositoryError::MissingRecord { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
        info!(user_id = %user_id, detached, "user detached from liked beers");
        Ok(detached)
    }
}

#[async_trait]
impl<U, B> Favorites for LikeService<U, B>
where
    U: UserRepository + ?Sized,
    B: BeerRepository + ?Sized,
{
    async fn add(&self, user_id: &str, beer: BeerLookup) -> Result<LikeEdge, Failure> {
        let user_id = UserId::new(user_id)?;
        self.add_like(&user_id, &beer).await
    }

    async fn remove(&self, user_id: &str, beer: BeerLookup) -> Result<LikeRemoval, Failure> {
        let user_id = UserId::new(user_id)?;
        self.remove_like(&user_id, &beer).await
    }

    async fn repair(&self, user_id: &str) -> Result<RepairReport, Failure> {
        let user_id = UserId::new(user_id)?;
        self.reconcile(&user_id).await
    }
}

#[cfg(test)]
#[path = "likes_tests.rs"]
mod tests;
