//! Beer ordering backend: catalogue, users, favourites and priced orders.
//!
//! The crate follows a hexagonal layout. [`domain`] owns entities, equality
//! policies, the favourites relationship manager, and the order pricing
//! pipeline; [`inbound`] exposes them over HTTP; [`outbound`] provides the
//! document store and remote catalogue adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware.
pub use middleware::Trace;
