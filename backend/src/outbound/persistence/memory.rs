//! In-process document store backing the beer, user and order ports.
//!
//! Each collection sits behind its own `RwLock`. The relationship set
//! primitives mutate a single record under the write lock, so two concurrent
//! likes on the same beer cannot overwrite each other. Attribute updates
//! copy the stored relationship set under the same lock.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    BeerRepository, BeerRepositoryError, OrderRepository, OrderRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{Beer, BeerId, Order, OrderId, PricedOrder, User, UserId, UserName};

/// Document store holding every collection in memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    beers: RwLock<BTreeMap<BeerId, Beer>>,
    users: RwLock<BTreeMap<UserId, User>>,
    orders: RwLock<BTreeMap<OrderId, Order>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(collection: &str) -> String {
    format!("{collection} collection lock poisoned")
}

fn read<'a, T>(lock: &'a RwLock<T>, collection: &str) -> Result<RwLockReadGuard<'a, T>, String> {
    lock.read().map_err(|_| poisoned(collection))
}

fn write<'a, T>(lock: &'a RwLock<T>, collection: &str) -> Result<RwLockWriteGuard<'a, T>, String> {
    lock.write().map_err(|_| poisoned(collection))
}

impl InMemoryDocumentStore {
    fn beers_read(
        &self,
    ) -> Result<RwLockReadGuard<'_, BTreeMap<BeerId, Beer>>, BeerRepositoryError> {
        read(&self.beers, "beers").map_err(BeerRepositoryError::query)
    }

    fn beers_write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<BeerId, Beer>>, BeerRepositoryError> {
        write(&self.beers, "beers").map_err(BeerRepositoryError::query)
    }

    fn users_read(
        &self,
    ) -> Result<RwLockReadGuard<'_, BTreeMap<UserId, User>>, UserRepositoryError> {
        read(&self.users, "users").map_err(UserRepositoryError::query)
    }

    fn users_write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<UserId, User>>, UserRepositoryError> {
        write(&self.users, "users").map_err(UserRepositoryError::query)
    }

    fn orders_read(
        &self,
    ) -> Result<RwLockReadGuard<'_, BTreeMap<OrderId, Order>>, OrderRepositoryError> {
        read(&self.orders, "orders").map_err(OrderRepositoryError::query)
    }

    fn orders_write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<OrderId, Order>>, OrderRepositoryError> {
        write(&self.orders, "orders").map_err(OrderRepositoryError::query)
    }

    fn select_beers(
        &self,
        keep: impl Fn(&Beer) -> bool,
    ) -> Result<Vec<Beer>, BeerRepositoryError> {
        Ok(self
            .beers_read()?
            .values()
            .filter(|beer| keep(beer))
            .cloned()
            .collect())
    }

    fn select_orders(
        &self,
        keep: impl Fn(&Order) -> bool,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(self
            .orders_read()?
            .values()
            .filter(|order| keep(order))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BeerRepository for InMemoryDocumentStore {
    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, BeerRepositoryError> {
        Ok(self.beers_read()?.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Beer>, BeerRepositoryError> {
        self.select_beers(|beer| beer.name.as_deref() == Some(name))
    }

    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<Beer>, BeerRepositoryError> {
        self.select_beers(|beer| beer.name_starts_with(prefix))
    }

    async fn find_by_ibu_above(&self, min_ibu: f64) -> Result<Vec<Beer>, BeerRepositoryError> {
        self.select_beers(|beer| beer.ibu.is_some_and(|ibu| ibu > min_ibu))
    }

    async fn list(&self) -> Result<Vec<Beer>, BeerRepositoryError> {
        self.select_beers(|_| true)
    }

    async fn insert(&self, beer: &Beer) -> Result<(), BeerRepositoryError> {
        let mut beers = self.beers_write()?;
        if beers.contains_key(&beer.id) {
            return Err(BeerRepositoryError::duplicate_key(beer.id.get()));
        }
        beers.insert(beer.id, beer.clone());
        Ok(())
    }

    async fn replace_attributes(&self, beer: &Beer) -> Result<Beer, BeerRepositoryError> {
        let mut beers = self.beers_write()?;
        let slot = beers
            .get_mut(&beer.id)
            .ok_or_else(|| BeerRepositoryError::missing_record(beer.id.get()))?;
        let updated = beer.clone().with_likes_of(slot);
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: BeerId) -> Result<bool, BeerRepositoryError> {
        Ok(self.beers_write()?.remove(&id).is_some())
    }

    async fn add_liked_by(&self, id: BeerId, user: &UserId) -> Result<bool, BeerRepositoryError> {
        let mut beers = self.beers_write()?;
        let beer = beers
            .get_mut(&id)
            .ok_or_else(|| BeerRepositoryError::missing_record(id.get()))?;
        Ok(beer.insert_liker(user.clone()))
    }

    async fn remove_liked_by(
        &self,
        id: BeerId,
        user: &UserId,
    ) -> Result<bool, BeerRepositoryError> {
        let mut beers = self.beers_write()?;
        let beer = beers
            .get_mut(&id)
            .ok_or_else(|| BeerRepositoryError::missing_record(id.get()))?;
        Ok(beer.remove_liker(user))
    }
}

#[async_trait]
impl UserRepository for InMemoryDocumentStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users_read()?.get(id).cloned())
    }

    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .users_read()?
            .values()
            .find(|user| user.user_name == *user_name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.users_read()?.values().cloned().collect())
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users_write()?;
        if users.contains_key(&user.id) {
            return Err(UserRepositoryError::duplicate_key(user.id.as_str()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn replace_attributes(&self, user: &User) -> Result<User, UserRepositoryError> {
        let mut users = self.users_write()?;
        let slot = users
            .get_mut(&user.id)
            .ok_or_else(|| UserRepositoryError::missing_record(user.id.as_str()))?;
        let updated = user.clone().with_favorites_of(slot);
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.users_write()?.remove(id).is_some())
    }

    async fn add_favorite(&self, id: &UserId, beer: BeerId) -> Result<bool, UserRepositoryError> {
        let mut users = self.users_write()?;
        let user = users
            .get_mut(id)
            .ok_or_else(|| UserRepositoryError::missing_record(id.as_str()))?;
        Ok(user.insert_favorite(beer))
    }

    async fn remove_favorite(
        &self,
        id: &UserId,
        beer: BeerId,
    ) -> Result<bool, UserRepositoryError> {
        let mut users = self.users_write()?;
        let user = users
            .get_mut(id)
            .ok_or_else(|| UserRepositoryError::missing_record(id.as_str()))?;
        Ok(user.remove_favorite(beer))
    }
}

#[async_trait]
impl OrderRepository for InMemoryDocumentStore {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(self.orders_read()?.get(id).cloned())
    }

    async fn find_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        self.select_orders(|order| order.user_name == *user_name)
    }

    async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        self.select_orders(|order| (start..=end).contains(&order.date_of_order))
    }

    async fn insert(
        &self,
        order: &PricedOrder,
        placed_at: DateTime<Utc>,
    ) -> Result<Order, OrderRepositoryError> {
        let mut orders = self.orders_write()?;
        let mut id = OrderId::random();
        while orders.contains_key(&id) {
            id = OrderId::random();
        }
        let stored = order.clone().into_order(id.clone(), placed_at);
        orders.insert(id, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut orders = self.orders_write()?;
        let slot = orders
            .get_mut(&order.id)
            .ok_or_else(|| OrderRepositoryError::missing_record(order.id.as_str()))?;
        *slot = order.clone();
        Ok(())
    }

    async fn delete(&self, id: &OrderId) -> Result<bool, OrderRepositoryError> {
        Ok(self.orders_write()?.remove(id).is_some())
    }
}
