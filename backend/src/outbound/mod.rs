//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: document store for beers, users and orders
//! - **punk_api**: reqwest-backed remote beer catalogue
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod persistence;
pub mod punk_api;
