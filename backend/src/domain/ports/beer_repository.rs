//! Port for catalogue beer persistence.
//!
//! Besides whole-record reads and writes the port exposes atomic set
//! primitives for the `likedBy` mirror so adapters can mutate it without a
//! read-modify-write cycle in the caller.

use async_trait::async_trait;

use crate::domain::{Beer, BeerId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by beer repository adapters.
    pub enum BeerRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "beer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "beer repository query failed: {message}",
        /// Insert targeted an id that is already stored.
        DuplicateKey { id: u64 } =>
            "beer {id} already stored",
        /// Mutation targeted a beer that is not stored.
        MissingRecord { id: u64 } =>
            "beer {id} is not stored",
    }
}

/// Port for beer storage and secondary lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BeerRepository: Send + Sync {
    /// Fetch a beer by primary id.
    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, BeerRepositoryError>;

    /// Beers whose name equals `name` exactly.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Beer>, BeerRepositoryError>;

    /// Beers whose name starts with `prefix`.
    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<Beer>, BeerRepositoryError>;

    /// Beers whose `ibu` is strictly greater than `min_ibu`.
    async fn find_by_ibu_above(&self, min_ibu: f64) -> Result<Vec<Beer>, BeerRepositoryError>;

    /// Every stored beer, ordered by id.
    async fn list(&self) -> Result<Vec<Beer>, BeerRepositoryError>;

    /// Store a new beer.
    ///
    /// Fails with [`BeerRepositoryError::DuplicateKey`] when the id is taken.
    async fn insert(&self, beer: &Beer) -> Result<(), BeerRepositoryError>;

    /// Overwrite every attribute of an existing beer except `likedBy`, which
    /// keeps its stored value. Returns the record as stored.
    ///
    /// `likedBy` changes only through [`Self::add_liked_by`] and
    /// [`Self::remove_liked_by`]; the overwrite and the read of the stored
    /// set happen as one step so a concurrent like is never dropped.
    ///
    /// Fails with [`BeerRepositoryError::MissingRecord`] when absent.
    async fn replace_attributes(&self, beer: &Beer) -> Result<Beer, BeerRepositoryError>;

    /// Remove a beer. Returns whether a record was removed.
    async fn delete(&self, id: BeerId) -> Result<bool, BeerRepositoryError>;

    /// Atomically add `user` to the beer's `likedBy` set.
    ///
    /// Returns whether the set changed. Fails with
    /// [`BeerRepositoryError::MissingRecord`] when the beer is absent.
    async fn add_liked_by(&self, id: BeerId, user: &UserId) -> Result<bool, BeerRepositoryError>;

    /// Atomically remove `user` from the beer's `likedBy` set.
    ///
    /// Returns whether the set changed. Fails with
    /// [`BeerRepositoryError::MissingRecord`] when the beer is absent.
    async fn remove_liked_by(
        &self,
        id: BeerId,
        user: &UserId,
    ) -> Result<bool, BeerRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BeerRepositoryError::duplicate_key(4_u64), "beer 4 already stored")]
    #[case(BeerRepositoryError::missing_record(9_u64), "beer 9 is not stored")]
    #[case(
        BeerRepositoryError::query("lock poisoned"),
        "beer repository query failed: lock poisoned"
    )]
    fn messages_name_the_beer(#[case] err: BeerRepositoryError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }
}
