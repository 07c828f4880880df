//! Domain primitives, aggregates and services.
//!
//! Purpose: define the beer catalogue, user accounts, favourites and orders
//! independently of any transport or store. Adapters reach the domain through
//! the traits in [`ports`].
//!
//! Public surface:
//! - Beer, User, Order and their identifiers.
//! - Failure: semantic failure taxonomy reported by services.
//! - Error / ErrorCode: transport-agnostic error payload.
//! - BeerService, UserService, LikeService, OrderService: use-case
//!   implementations of the driving ports.
//! - CatalogueSeeder: startup import from a remote catalogue.

pub mod beer;
pub mod beer_service;
pub mod catalogue_seeding;
pub mod error;
pub mod failure;
pub mod identity;
pub mod likes;
pub mod order;
pub mod order_pipeline;
pub mod order_service;
pub mod ports;
pub mod user;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::beer::{Amount, Beer, BeerId, BeerIdParseError, Hop, Ingredients, Malt};
pub use self::beer_service::BeerService;
pub use self::catalogue_seeding::{CatalogueSeeder, SeedReport, SeedSleeper, TokioSleeper};
pub use self::error::{Error, ErrorCode};
pub use self::failure::{ConflictReason, EntityKind, Failure, MirrorSide};
pub use self::identity::{BeerEquality, is_same_beer, is_same_named_beer, is_same_user};
pub use self::likes::{BeerLookup, LikeEdge, LikeRemoval, LikeService, RepairReport};
pub use self::order::{
    BeerLines, DeliveryDetails, Order, OrderDraft, OrderId, PricedOrder, SortDirection,
    bottle_quantity, by_sum_ascending, by_sum_descending,
};
pub use self::order_pipeline::{CatalogLookup, PricingPolicy, PricingPolicyError, validate_order};
pub use self::order_service::{OrderDateRange, OrderService};
pub use self::user::{User, UserDraft, UserId, UserName, UserValidationError};
pub use self::user_service::{UserPolicy, UserService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use beerorder::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::policy_denied("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
