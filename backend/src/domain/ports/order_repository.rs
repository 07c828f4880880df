//! Port for order persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Order, OrderId, PricedOrder, UserName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "order repository query failed: {message}",
        /// Mutation targeted an order that is not stored.
        MissingRecord { id: String } =>
            "order {id} is not stored",
    }
}

/// Port for order storage and listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch an order by id.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Orders placed by `user_name`, in storage order.
    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Orders whose `dateOfOrder` lies within `[start, end]`.
    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Store a priced order, assigning a fresh id.
    ///
    /// `placed_at` is used when the order carries no date of its own.
    async fn insert(
        &self,
        order: &PricedOrder,
        placed_at: DateTime<Utc>,
    ) -> Result<Order, OrderRepositoryError>;

    /// Overwrite an existing order.
    async fn replace(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Remove an order. Returns whether a record was removed.
    async fn delete(&self, id: &OrderId) -> Result<bool, OrderRepositoryError>;
}
