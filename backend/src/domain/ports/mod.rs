//! Driving and driven ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod beer_catalogue;
mod beer_repository;
mod beer_source;
mod favorites;
mod order_desk;
mod order_repository;
mod user_accounts;
mod user_repository;

pub use beer_catalogue::BeerCatalogue;
#[cfg(test)]
pub use beer_catalogue::MockBeerCatalogue;
#[cfg(test)]
pub use beer_repository::MockBeerRepository;
pub use beer_repository::{BeerRepository, BeerRepositoryError};
#[cfg(test)]
pub use beer_source::MockBeerSource;
pub use beer_source::{BeerSource, BeerSourceError};
pub use favorites::Favorites;
#[cfg(test)]
pub use favorites::MockFavorites;
#[cfg(test)]
pub use order_desk::MockOrderDesk;
pub use order_desk::OrderDesk;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
