//! User account entity.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::BeerId;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier carried surrounding whitespace.
    #[error("user id must not contain surrounding whitespace")]
    PaddedId,
    /// The user name was blank.
    #[error("user name must not be empty")]
    EmptyUserName,
}

/// Primary user identifier.
///
/// Generated by the service (UUID v4) when a client does not supply one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique business key of a user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and wrap a user name.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyUserName);
        }
        Ok(Self(name))
    }

    /// Borrow the user name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered user.
///
/// ## Invariants
/// - `user_name` is unique across all users.
/// - `favorites` mirrors `Beer::liked_by`; only
///   [`crate::domain::LikeService`] changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String)]
    pub id: UserId,
    #[schema(value_type = String, example = "hoppy_ada")]
    pub user_name: UserName,
    pub given_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    #[serde(default)]
    #[schema(value_type = Vec<u64>)]
    favorites: BTreeSet<BeerId>,
}

impl User {
    /// Create a user with no personal details and no favourites.
    pub fn new(id: UserId, user_name: UserName) -> Self {
        Self {
            id,
            user_name,
            given_name: None,
            last_name: None,
            gender: None,
            age: None,
            favorites: BTreeSet::new(),
        }
    }

    /// Set the age, builder style.
    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Beers this user likes.
    pub fn favorites(&self) -> &BTreeSet<BeerId> {
        &self.favorites
    }

    /// Whether `beer` is in the user's favourites.
    pub fn likes(&self, beer: BeerId) -> bool {
        self.favorites.contains(&beer)
    }

    /// Return the same user with the favourites mirror emptied.
    #[must_use]
    pub fn without_favorites(mut self) -> Self {
        self.favorites.clear();
        self
    }

    /// Return the same user carrying `favorites` from a stored record.
    #[must_use]
    pub(crate) fn with_favorites_of(mut self, stored: &Self) -> Self {
        self.favorites = stored.favorites.clone();
        self
    }

    pub(crate) fn insert_favorite(&mut self, beer: BeerId) -> bool {
        self.favorites.insert(beer)
    }

    pub(crate) fn remove_favorite(&mut self, beer: BeerId) -> bool {
        self.favorites.remove(&beer)
    }
}

/// Client-submitted user. Any `favorites` in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub id: Option<UserId>,
    #[schema(value_type = String, example = "hoppy_ada")]
    pub user_name: UserName,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

impl UserDraft {
    /// Draft carrying only a user name.
    pub fn named(user_name: UserName) -> Self {
        Self {
            id: None,
            user_name,
            given_name: None,
            last_name: None,
            gender: None,
            age: None,
        }
    }

    /// Materialise the draft under `id` with no favourites.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            user_name: self.user_name,
            given_name: self.given_name,
            last_name: self.last_name,
            gender: self.gender,
            age: self.age,
            favorites: BTreeSet::new(),
        }
    }
}
