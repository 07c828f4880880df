//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BeerCatalogue, Favorites, OrderDesk, UserAccounts};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub beers: Arc<dyn BeerCatalogue>,
    pub users: Arc<dyn UserAccounts>,
    pub favorites: Arc<dyn Favorites>,
    pub orders: Arc<dyn OrderDesk>,
}

impl HttpState {
    /// Bundle the driving ports used by the handlers.
    pub fn new(
        beers: Arc<dyn BeerCatalogue>,
        users: Arc<dyn UserAccounts>,
        favorites: Arc<dyn Favorites>,
        orders: Arc<dyn OrderDesk>,
    ) -> Self {
        Self {
            beers,
            users,
            favorites,
            orders,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Builders for handler tests; unused ports are expectation-free mocks.

    use super::*;
    use crate::domain::ports::{
        MockBeerCatalogue, MockFavorites, MockOrderDesk, MockUserAccounts,
    };

    pub(crate) fn with_beers(beers: MockBeerCatalogue) -> HttpState {
        HttpState {
            beers: Arc::new(beers),
            ..empty()
        }
    }

    pub(crate) fn with_users(users: MockUserAccounts, favorites: MockFavorites) -> HttpState {
        HttpState {
            users: Arc::new(users),
            favorites: Arc::new(favorites),
            ..empty()
        }
    }

    pub(crate) fn with_orders(orders: MockOrderDesk) -> HttpState {
        HttpState {
            orders: Arc::new(orders),
            ..empty()
        }
    }

    fn empty() -> HttpState {
        HttpState::new(
            Arc::new(MockBeerCatalogue::new()),
            Arc::new(MockUserAccounts::new()),
            Arc::new(MockFavorites::new()),
            Arc::new(MockOrderDesk::new()),
        )
    }
}
