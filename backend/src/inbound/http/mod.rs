//! HTTP inbound adapter exposing the beer, user and order REST endpoints.

pub mod beers;
pub mod error;
pub mod health;
pub mod messages;
pub mod orders;
pub mod state;
pub mod users;

pub use error::ApiResult;
