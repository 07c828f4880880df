//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};

use state_builders::{build_http_state, spawn_seeder};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use beerorder::Trace;
#[cfg(debug_assertions)]
use beerorder::doc::ApiDoc;
use beerorder::inbound::http::beers::{
    create_beer, delete_beer, get_beer, list_beers_by_prefix, list_strong_beers, update_beer,
};
use beerorder::inbound::http::health::{HealthState, live, ready};
use beerorder::inbound::http::orders::{
    create_order, delete_order, get_order, list_orders_between, list_orders_for_user,
    update_order,
};
use beerorder::inbound::http::state::HttpState;
use beerorder::inbound::http::users::{
    add_favorite, create_user, delete_user, get_user, remove_favorite, repair_favorites,
    update_user,
};
use beerorder::outbound::persistence::InMemoryDocumentStore;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Fixed segments before `{id}` so they are not captured by the path parameter.
    let api = web::scope("/api/v1")
        .service(create_beer)
        .service(list_strong_beers)
        .service(list_beers_by_prefix)
        .service(get_beer)
        .service(update_beer)
        .service(delete_beer)
        .service(create_user)
        .service(add_favorite)
        .service(remove_favorite)
        .service(repair_favorites)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(create_order)
        .service(list_orders_between)
        .service(list_orders_for_user)
        .service(get_order)
        .service(update_order)
        .service(delete_order);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over a fresh in-memory document store.
///
/// When seeding is configured the remote catalogue import is started in the
/// background before the listener binds.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let store = Arc::new(InMemoryDocumentStore::new());
    let http_state = build_http_state(&store, &config);
    if let Some(plan) = config.seeding.clone() {
        spawn_seeder(&store, plan);
    }

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Routing coverage for the assembled application.

    use super::*;
    use actix_web::{http::StatusCode, test};
    use beerorder::domain::{PricingPolicy, UserPolicy};
    use serde_json::{Value, json};

    fn test_config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().expect("address"),
            pricing: PricingPolicy::new(5.0, 20.0).expect("valid policy"),
            users: UserPolicy::new(18),
            seeding: None,
        }
    }

    #[actix_web::test]
    async fn query_routes_are_not_captured_by_id() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            build_http_state(&store, &test_config()),
        ))
        .await;

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/beers")
                .set_json(json!({ "id": 1, "name": "Buzz", "abv": 4.5, "ibu": 60.0 }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/beers/strong?minAbv=4&minIbu=50")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<Value> = test::read_body_json(res).await;
        assert_eq!(body.len(), 1);
    }

    #[actix_web::test]
    async fn responses_carry_a_trace_id() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            build_http_state(&store, &test_config()),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/users/ghost").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(res.headers().contains_key("trace-id"));
    }
}
