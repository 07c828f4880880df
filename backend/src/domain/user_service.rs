//! User account service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{BeerRepository, UserAccounts, UserRepository};
use super::{ConflictReason, Failure, LikeService, User, UserDraft, UserId};

/// Registration rules applied when a user is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPolicy {
    min_age: u32,
}

impl UserPolicy {
    /// Require users to be at least `min_age` years old.
    pub const fn new(min_age: u32) -> Self {
        Self { min_age }
    }

    /// Youngest accepted age.
    pub const fn min_age(&self) -> u32 {
        self.min_age
    }

    /// Deny drafts without an age or below the minimum.
    pub fn enforce_age(&self, age: Option<u32>) -> Result<(), Failure> {
        match age {
            Some(age) if age >= self.min_age => Ok(()),
            _ => Err(Failure::policy_denied(format!(
                "You're underage, you must be at least {}",
                self.min_age
            ))),
        }
    }
}

/// User account service implementing [`UserAccounts`].
pub struct UserService<U: ?Sized, B: ?Sized> {
    users: Arc<U>,
    likes: LikeService<U, B>,
    policy: UserPolicy,
}

impl<U: ?Sized, B: ?Sized> Clone for UserService<U, B> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            likes: self.likes.clone(),
            policy: self.policy,
        }
    }
}

impl<U: ?Sized, B: ?Sized> UserService<U, B> {
    /// Create a service over the user store and the favourites manager that
    /// shares it.
    pub fn new(users: Arc<U>, likes: LikeService<U, B>, policy: UserPolicy) -> Self {
        Self {
            users,
            likes,
            policy,
        }
    }
}

impl<U, B> UserService<U, B>
where
    U: UserRepository + ?Sized,
    B: BeerRepository + ?Sized,
{
    async fn require(&self, id: &UserId) -> Result<User, Failure> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Failure::user_not_found(id))
    }

    fn user_name_taken() -> Failure {
        Failure::conflict(
            ConflictReason::DuplicateUserName,
            "This userName is already taken, please try another one",
        )
    }
}

#[async_trait]
impl<U, B> UserAccounts for UserService<U, B>
where
    U: UserRepository + ?Sized,
    B: BeerRepository + ?Sized,
{
    async fn create(&self, draft: UserDraft) -> Result<User, Failure> {
        self.policy.enforce_age(draft.age)?;
        if self
            .users
            .find_by_user_name(&draft.user_name)
            .await?
            .is_some()
        {
            return Err(Self::user_name_taken());
        }
        let id = match draft.id.clone() {
            Some(id) => {
                if self.users.find_by_id(&id).await?.is_some() {
                    return Err(Failure::conflict(
                        ConflictReason::DuplicateId,
                        format!("user id {id} is already used"),
                    ));
                }
                id
            }
            None => UserId::random(),
        };
        let user = draft.into_user(id);
        self.users.insert(&user).await?;
        info!(user_id = %user.id, user_name = %user.user_name, "user created");
        Ok(user)
    }

    async fn update(&self, id: &str, draft: UserDraft) -> Result<User, Failure> {
        let id = UserId::new(id)?;
        if draft.id.as_ref().is_some_and(|body_id| *body_id != id) {
            return Err(Failure::invalid_argument("path id does not match body id"));
        }
        let stored = self.require(&id).await?;
        if draft.user_name != stored.user_name {
            let holder = self.users.find_by_user_name(&draft.user_name).await?;
            if holder.is_some_and(|holder| holder.id != id) {
                return Err(Self::user_name_taken());
            }
        }
        let user = self.users.replace_attributes(&draft.into_user(id)).await?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    async fn get(&self, id: &str) -> Result<User, Failure> {
        self.require(&UserId::new(id)?).await
    }

    async fn delete(&self, id: &str) -> Result<(), Failure> {
        let id = UserId::new(id)?;
        self.require(&id).await?;
        self.likes.detach_user(&id).await?;
        if !self.users.delete(&id).await? {
            return Err(Failure::user_not_found(&id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
