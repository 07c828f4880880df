//! Builders wiring the document store into services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{error, info};

use beerorder::domain::{BeerService, CatalogueSeeder, LikeService, OrderService, UserService};
use beerorder::inbound::http::state::HttpState;
use beerorder::middleware::trace::TraceId;
use beerorder::outbound::persistence::InMemoryDocumentStore;
use beerorder::outbound::punk_api::PunkApiSource;

use super::ServerConfig;
use super::config::SeedPlan;

/// Build the driving ports over a shared store.
pub(super) fn build_http_state(
    store: &Arc<InMemoryDocumentStore>,
    config: &ServerConfig,
) -> web::Data<HttpState> {
    let likes = LikeService::new(store.clone(), store.clone());
    let beers = BeerService::new(store.clone(), likes.clone());
    let users = UserService::new(store.clone(), likes.clone(), config.users);
    let orders = OrderService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        config.pricing,
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(
        Arc::new(beers),
        Arc::new(users),
        Arc::new(likes),
        Arc::new(orders),
    ))
}

/// Start the catalogue import in the background. The server does not wait
/// for it; per-beer failures are logged by the seeder.
pub(super) fn spawn_seeder(store: &Arc<InMemoryDocumentStore>, plan: SeedPlan) {
    let source = match PunkApiSource::new(plan.endpoint.clone(), plan.timeout) {
        Ok(source) => Arc::new(source),
        Err(err) => {
            error!(error = %err, endpoint = %plan.endpoint, "catalogue seeding disabled");
            return;
        }
    };
    let seeder = CatalogueSeeder::new(source, store.clone());
    let trace_id = TraceId::generate();
    info!(%trace_id, count = plan.count, endpoint = %plan.endpoint, "catalogue seeding started");
    actix_web::rt::spawn(TraceId::scope(trace_id, async move {
        seeder.seed(plan.count, plan.interval).await
    }));
}
