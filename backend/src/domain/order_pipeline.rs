//! Order validation and pricing.
//!
//! [`validate_order`] turns a client draft into a [`PricedOrder`] or stops at
//! the first violation:
//!
//! 1. the ordering user must exist;
//! 2. every beer name must resolve in the catalogue;
//! 3. bottle quantities are summed as given;
//! 4. `orderSum` is recomputed from the configured unit price;
//! 5. sums below the configured minimum are denied.
//!
//! Nothing is persisted here; callers write only on success.

use async_trait::async_trait;
use tracing::debug;

use super::ports::BeerRepository;
use super::{Failure, OrderDraft, PricedOrder, bottle_quantity};

/// Reasons a pricing policy is rejected at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingPolicyError {
    /// The unit price is negative, infinite or NaN.
    #[error("unit price must be a finite, non-negative number, got {0}")]
    UnitPrice(f64),
    /// The minimum order value is negative, infinite or NaN.
    #[error("minimum order value must be a finite, non-negative number, got {0}")]
    MinimumOrderValue(f64),
}

/// Unit price and minimum order value applied to every order.
///
/// # Examples
/// ```
/// use beerorder::domain::PricingPolicy;
///
/// let policy = PricingPolicy::new(5.0, 20.0).expect("valid policy");
/// assert_eq!(policy.price(5), 25.0);
/// assert!(policy.enforce_minimum(25.0).is_ok());
/// assert!(policy.enforce_minimum(15.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    unit_price: f64,
    minimum_order_value: f64,
}

impl PricingPolicy {
    /// Validate and build a policy.
    pub fn new(unit_price: f64, minimum_order_value: f64) -> Result<Self, PricingPolicyError> {
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(PricingPolicyError::UnitPrice(unit_price));
        }
        if !minimum_order_value.is_finite() || minimum_order_value < 0.0 {
            return Err(PricingPolicyError::MinimumOrderValue(minimum_order_value));
        }
        Ok(Self {
            unit_price,
            minimum_order_value,
        })
    }

    /// Price per bottle.
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Smallest accepted `orderSum`.
    pub fn minimum_order_value(&self) -> f64 {
        self.minimum_order_value
    }

    /// Price `bottles` at the unit price.
    pub fn price(&self, bottles: i64) -> f64 {
        bottles as f64 * self.unit_price
    }

    /// Deny sums strictly below the minimum.
    pub fn enforce_minimum(&self, order_sum: f64) -> Result<(), Failure> {
        if order_sum < self.minimum_order_value {
            return Err(Failure::policy_denied(format!(
                "Minimum order amount is {:?}! please add a few more items.",
                self.minimum_order_value
            )));
        }
        Ok(())
    }
}

/// Name lookup the pipeline needs from the catalogue.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Whether at least one stored beer is called `name`.
    async fn has_beer_named(&self, name: &str) -> Result<bool, Failure>;
}

#[async_trait]
impl<T> CatalogLookup for T
where
    T: BeerRepository + ?Sized,
{
    async fn has_beer_named(&self, name: &str) -> Result<bool, Failure> {
        Ok(!self.find_by_name(name).await?.is_empty())
    }
}

/// Validate and price `draft`.
///
/// Any `order_sum` carried by the draft is discarded.
pub async fn validate_order<C>(
    draft: OrderDraft,
    catalog: &C,
    user_exists: bool,
    policy: &PricingPolicy,
) -> Result<PricedOrder, Failure>
where
    C: CatalogLookup + ?Sized,
{
    if !user_exists {
        return Err(Failure::user_not_found(&draft.user_name));
    }

    for name in draft.beers_ordered.keys() {
        if !catalog.has_beer_named(name).await? {
            debug!(user_name = %draft.user_name, beer = %name, "order references unknown beer");
            return Err(Failure::beer_not_found(name));
        }
    }

    let bottles = bottle_quantity(&draft.beers_ordered);
    let order_sum = policy.price(bottles);
    if let Some(submitted) = draft.order_sum.filter(|submitted| *submitted != order_sum) {
        debug!(submitted, order_sum, "discarding caller supplied order sum");
    }
    policy.enforce_minimum(order_sum)?;

    Ok(PricedOrder {
        user_name: draft.user_name,
        beers_ordered: draft.beers_ordered,
        order_sum,
        date_of_order: draft.date_of_order,
        delivery: draft.delivery,
    })
}
