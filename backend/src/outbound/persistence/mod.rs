//! Document store adapters for the beer, user and order ports.
//!
//! # Architecture
//!
//! - **Thin adapters**: stores translate between their storage layout and
//!   domain types. No business logic resides here.
//! - **Atomic relationship sets**: `likedBy` and `favorites` are changed by
//!   per-record set operations, never by replacing the whole document.
//! - **Strongly typed errors**: lock and lookup failures map onto the port
//!   error enums.
//!
//! # Example
//!
//! ```
//! use beerorder::outbound::persistence::InMemoryDocumentStore;
//!
//! let store = InMemoryDocumentStore::new();
//! # let _ = store;
//! ```

mod memory;

pub use memory::InMemoryDocumentStore;
