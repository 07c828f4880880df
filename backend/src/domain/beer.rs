//! Beer catalogue entity.
//!
//! Descriptive attributes are optional because records arrive from clients
//! and from the remote catalogue partially populated. Equality across
//! records is decided by [`crate::domain::identity`], never by `PartialEq`
//! on this type.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Numeric, client-supplied beer identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct BeerId(u64);

impl BeerId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a textual beer identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BeerIdParseError {
    /// Input contained something other than ASCII digits.
    #[error("'{0}' is invalid input!")]
    NotNumeric(String),
}

impl FromStr for BeerId {
    type Err = BeerIdParseError;

    /// Only plain digit strings are accepted; signs and whitespace are not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BeerIdParseError::NotNumeric(s.to_owned()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| BeerIdParseError::NotNumeric(s.to_owned()))
    }
}

/// A measured quantity such as a malt weight or a volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Amount {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl Amount {
    /// Build a fully populated amount.
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            unit: Some(unit.into()),
        }
    }
}

/// Malt ingredient with its weighted amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Malt {
    pub name: Option<String>,
    pub amount: Option<Amount>,
}

/// Hop ingredient and the brewing stage it is added at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hop {
    pub name: Option<String>,
    pub amount: Option<Amount>,
    pub add: Option<String>,
    pub attribute: Option<String>,
}

/// Recipe ingredients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ingredients {
    pub malt: Option<Vec<Malt>>,
    pub hops: Option<Vec<Hop>>,
    pub yeast: Option<String>,
}

impl Ingredients {
    /// Sum of all populated malt amounts; missing values contribute nothing.
    pub fn total_malt(&self) -> f64 {
        self.malt
            .iter()
            .flatten()
            .filter_map(|malt| malt.amount.as_ref().and_then(|amount| amount.value))
            .sum()
    }
}

/// Catalogue beer.
///
/// ## Invariants
/// - `id` is unique across the catalogue (enforced by the store).
/// - No two stored beers are business-equal under different ids (enforced
///   by [`crate::domain::BeerService`]).
/// - `liked_by` mirrors `User::favorites` and is only mutated by
///   [`crate::domain::LikeService`] through the store's set primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Beer {
    #[schema(value_type = u64, example = 1)]
    pub id: BeerId,
    pub name: Option<String>,
    pub first_brewed: Option<String>,
    pub description: Option<String>,
    pub brewers_tips: Option<String>,
    /// Alcohol by volume.
    pub abv: Option<f64>,
    /// International bitterness units.
    pub ibu: Option<f64>,
    pub ph: Option<f64>,
    pub volume: Option<Amount>,
    pub boil_volume: Option<Amount>,
    pub ingredients: Option<Ingredients>,
    pub food_pairing: Option<Vec<String>>,
    #[serde(default, rename = "likedBy")]
    #[schema(value_type = Vec<String>)]
    liked_by: BTreeSet<UserId>,
}

impl Beer {
    /// Create a beer carrying only an id.
    pub fn new(id: BeerId) -> Self {
        Self {
            id,
            name: None,
            first_brewed: None,
            description: None,
            brewers_tips: None,
            abv: None,
            ibu: None,
            ph: None,
            volume: None,
            boil_volume: None,
            ingredients: None,
            food_pairing: None,
            liked_by: BTreeSet::new(),
        }
    }

    /// Create a beer carrying only an id and a name.
    pub fn named(id: BeerId, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(id)
        }
    }

    /// Users that list this beer among their favourites.
    pub fn liked_by(&self) -> &BTreeSet<UserId> {
        &self.liked_by
    }

    /// Whether `user` appears in the mirrored `likedBy` set.
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.liked_by.contains(user)
    }

    /// Return the same beer with the relationship mirror emptied.
    #[must_use]
    pub fn without_likes(mut self) -> Self {
        self.liked_by.clear();
        self
    }

    /// Return the same beer carrying `liked_by` from a stored record.
    #[must_use]
    pub(crate) fn with_likes_of(mut self, stored: &Self) -> Self {
        self.liked_by = stored.liked_by.clone();
        self
    }

    pub(crate) fn insert_liker(&mut self, user: UserId) -> bool {
        self.liked_by.insert(user)
    }

    pub(crate) fn remove_liker(&mut self, user: &UserId) -> bool {
        self.liked_by.remove(user)
    }

    /// Whether the name starts with `prefix`; unnamed beers never match.
    pub fn name_starts_with(&self, prefix: &str) -> bool {
        self.name.as_deref().is_some_and(|name| name.starts_with(prefix))
    }
}
