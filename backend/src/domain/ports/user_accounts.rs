//! Driving port for user account use-cases.

use async_trait::async_trait;

use crate::domain::{Failure, User, UserDraft};

/// User account commands and queries exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Register a user, generating an id when the draft has none.
    async fn create(&self, draft: UserDraft) -> Result<User, Failure>;

    /// Replace the profile of user `id`, keeping its favourites.
    async fn update(&self, id: &str, draft: UserDraft) -> Result<User, Failure>;

    /// Fetch user `id`.
    async fn get(&self, id: &str) -> Result<User, Failure>;

    /// Delete user `id` after detaching it from every liked beer.
    async fn delete(&self, id: &str) -> Result<(), Failure>;
}
