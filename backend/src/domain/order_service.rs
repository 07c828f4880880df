//! Order service.
//!
//! Every create and update runs the full [`validate_order`] pipeline, so a
//! stored `orderSum` always reflects the stored line items.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use tracing::info;

use super::ports::{BeerRepository, OrderDesk, OrderRepository, UserRepository};
use super::{
    Failure, Order, OrderDraft, OrderId, PricedOrder, PricingPolicy, SortDirection, UserName,
    validate_order,
};

/// Inclusive date range used by order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for OrderDateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2022, 6, 30).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl OrderDateRange {
    /// First and last instants covered by the range, in UTC.
    pub fn bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), Failure> {
        if self.start > self.end {
            return Err(Failure::invalid_argument(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        let last_instant = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| Failure::invalid_argument("unrepresentable end of day"))?;
        Ok((
            self.start.and_time(NaiveTime::MIN).and_utc(),
            self.end.and_time(last_instant).and_utc(),
        ))
    }
}

/// Order service implementing [`OrderDesk`].
pub struct OrderService<O: ?Sized, U: ?Sized, B: ?Sized> {
    orders: Arc<O>,
    users: Arc<U>,
    beers: Arc<B>,
    policy: PricingPolicy,
    clock: Arc<dyn Clock>,
}

impl<O: ?Sized, U: ?Sized, B: ?Sized> Clone for OrderService<O, U, B> {
    fn clone(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
            users: Arc::clone(&self.users),
            beers: Arc::clone(&self.beers),
            policy: self.policy,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<O: ?Sized, U: ?Sized, B: ?Sized> OrderService<O, U, B> {
    /// Create a service over the three stores.
    ///
    /// `clock` stamps orders submitted without a date.
    pub fn new(
        orders: Arc<O>,
        users: Arc<U>,
        beers: Arc<B>,
        policy: PricingPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            users,
            beers,
            policy,
            clock,
        }
    }
}

impl<O, U, B> OrderService<O, U, B>
where
    O: OrderRepository + ?Sized,
    U: UserRepository + ?Sized,
    B: BeerRepository + ?Sized,
{
    async fn price(&self, draft: OrderDraft) -> Result<PricedOrder, Failure> {
        let user_exists = self
            .users
            .find_by_user_name(&draft.user_name)
            .await?
            .is_some();
        validate_order(draft, &*self.beers, user_exists, &self.policy).await
    }

    async fn require(&self, id: &OrderId) -> Result<Order, Failure> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| Failure::order_not_found(id))
    }

    fn parse_id(raw: &str) -> Result<OrderId, Failure> {
        if raw.trim().is_empty() {
            return Err(Failure::invalid_argument("order id must not be empty"));
        }
        Ok(OrderId::new(raw))
    }
}

#[async_trait]
impl<O, U, B> OrderDesk for OrderService<O, U, B>
where
    O: OrderRepository + ?Sized,
    U: UserRepository + ?Sized,
    B: BeerRepository + ?Sized,
{
    async fn create(&self, draft: OrderDraft) -> Result<Order, Failure> {
        let priced = self.price(draft).await?;
        let order = self.orders.insert(&priced, self.clock.utc()).await?;
        info!(
            order_id = %order.id,
            user_name = %order.user_name,
            order_sum = order.order_sum,
            "order placed"
        );
        Ok(order)
    }

    async fn update(&self, id: &str, draft: OrderDraft) -> Result<Order, Failure> {
        let id = Self::parse_id(id)?;
        if draft.id.as_ref().is_some_and(|body_id| *body_id != id) {
            return Err(Failure::invalid_argument("path id does not match body id"));
        }
        let stored = self.require(&id).await?;
        let mut priced = self.price(draft).await?;
        priced.date_of_order = Some(stored.date_of_order);
        let order = priced.into_order(id, stored.date_of_order);
        self.orders.replace(&order).await?;
        info!(order_id = %order.id, order_sum = order.order_sum, "order updated");
        Ok(order)
    }

    async fn get(&self, id: &str) -> Result<Order, Failure> {
        self.require(&Self::parse_id(id)?).await
    }

    async fn delete(&self, id: &str) -> Result<(), Failure> {
        let id = Self::parse_id(id)?;
        if !self.orders.delete(&id).await? {
            return Err(Failure::order_not_found(&id));
        }
        info!(order_id = %id, "order deleted");
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_name: &str,
        direction: SortDirection,
    ) -> Result<Vec<Order>, Failure> {
        let user_name = UserName::new(user_name)?;
        if self.users.find_by_user_name(&user_name).await?.is_none() {
            return Err(Failure::user_not_found(&user_name));
        }
        let mut orders = self.orders.find_by_user_name(&user_name).await?;
        if orders.is_empty() {
            return Err(Failure::order_not_found(format!("for user {user_name}")));
        }
        direction.sort(&mut orders);
        Ok(orders)
    }

    async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Order>, Failure> {
        let (from, to) = OrderDateRange { start, end }.bounds()?;
        let mut orders = self.orders.find_between(from, to).await?;
        orders.sort_by_key(|order| order.date_of_order);
        Ok(orders)
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
