//! Port for user account persistence.

use async_trait::async_trait;

use crate::domain::{BeerId, User, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// Insert targeted an id that is already stored.
        DuplicateKey { id: String } =>
            "user {id} already stored",
        /// Mutation targeted a user that is not stored.
        MissingRecord { id: String } =>
            "user {id} is not stored",
    }
}

/// Port for user storage, lookup by `userName`, and the `favorites` mirror.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by primary id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user holding `user_name`.
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Every stored user, ordered by id.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Store a new user.
    ///
    /// Fails with [`UserRepositoryError::DuplicateKey`] when the id is taken.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Overwrite every attribute of an existing user except `favorites`,
    /// which keeps its stored value. Returns the record as stored.
    ///
    /// Fails with [`UserRepositoryError::MissingRecord`] when absent.
    async fn replace_attributes(&self, user: &User) -> Result<User, UserRepositoryError>;

    /// Remove a user. Returns whether a record was removed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// Atomically add `beer` to the user's `favorites`.
    ///
    /// Returns whether the set changed.
    async fn add_favorite(&self, id: &UserId, beer: BeerId) -> Result<bool, UserRepositoryError>;

    /// Atomically remove `beer` from the user's `favorites`.
    ///
    /// Returns whether the set changed.
    async fn remove_favorite(
        &self,
        id: &UserId,
        beer: BeerId,
    ) -> Result<bool, UserRepositoryError>;
}
