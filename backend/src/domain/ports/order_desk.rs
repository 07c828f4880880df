//! Driving port for order use-cases.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Failure, Order, OrderDraft, SortDirection};

/// Order commands and queries exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderDesk: Send + Sync {
    /// Validate, price and store a new order.
    async fn create(&self, draft: OrderDraft) -> Result<Order, Failure>;

    /// Re-validate, re-price and replace order `id`.
    async fn update(&self, id: &str, draft: OrderDraft) -> Result<Order, Failure>;

    /// Fetch order `id`.
    async fn get(&self, id: &str) -> Result<Order, Failure>;

    /// Delete order `id`.
    async fn delete(&self, id: &str) -> Result<(), Failure>;

    /// Orders placed by `user_name`, sorted by `orderSum`.
    async fn list_for_user(
        &self,
        user_name: &str,
        direction: SortDirection,
    ) -> Result<Vec<Order>, Failure>;

    /// Orders dated within the whole days `start..=end`.
    async fn list_between(&self, start: NaiveDate, end: NaiveDate)
    -> Result<Vec<Order>, Failure>;
}
