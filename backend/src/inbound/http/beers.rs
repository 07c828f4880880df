//! Beer catalogue endpoints.
//!
//! ```text
//! POST   /api/v1/beers
//! GET    /api/v1/beers/strong?minAbv=&minIbu=
//! GET    /api/v1/beers/prefix?startsWith=&minMalt=
//! GET    /api/v1/beers/{id}
//! PUT    /api/v1/beers/{id}
//! DELETE /api/v1/beers/{id}
//! ```
//!
//! The query routes are registered ahead of `{id}` so they are not captured
//! by the path parameter.

use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use serde::Deserialize;

use crate::domain::{Beer, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::map_failure;
use crate::inbound::http::messages::MessageResponse;
use crate::inbound::http::state::HttpState;

const DEFAULT_MIN_ABV: f64 = 3.0;
const DEFAULT_MIN_IBU: f64 = 30.0;

fn default_min_abv() -> f64 {
    DEFAULT_MIN_ABV
}

fn default_min_ibu() -> f64 {
    DEFAULT_MIN_IBU
}

/// Thresholds for the strong-and-bitter listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrongBeerQuery {
    #[serde(default = "default_min_abv")]
    pub min_abv: f64,
    #[serde(default = "default_min_ibu")]
    pub min_ibu: f64,
}

/// Name prefix and malt threshold for the prefix listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixQuery {
    pub starts_with: String,
    pub min_malt: f64,
}

/// Add a beer to the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/beers",
    request_body = Beer,
    responses(
        (status = 201, description = "Beer created", body = Beer),
        (status = 226, description = "Id taken or beer already stored", body = Error),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["beers"],
    operation_id = "createBeer"
)]
#[post("/beers")]
pub async fn create_beer(
    state: web::Data<HttpState>,
    payload: web::Json<Beer>,
) -> ApiResult<HttpResponse> {
    let beer = state
        .beers
        .create(payload.into_inner())
        .await
        .map_err(map_failure)?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/beers/{}", beer.id)))
        .json(beer))
}

/// Beers stronger than `minAbv` and more bitter than `minIbu`.
#[utoipa::path(
    get,
    path = "/api/v1/beers/strong",
    params(
        ("minAbv" = Option<f64>, Query, description = "Exclusive ABV floor, default 3.0"),
        ("minIbu" = Option<f64>, Query, description = "Exclusive IBU floor, default 30")
    ),
    responses(
        (status = 200, description = "Matching beers", body = Vec<Beer>),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["beers"],
    operation_id = "listStrongBeers"
)]
#[get("/beers/strong")]
pub async fn list_strong_beers(
    state: web::Data<HttpState>,
    query: web::Query<StrongBeerQuery>,
) -> ApiResult<web::Json<Vec<Beer>>> {
    let beers = state
        .beers
        .strong_and_bitter(query.min_abv, query.min_ibu)
        .await
        .map_err(map_failure)?;
    Ok(web::Json(beers))
}

/// Beers whose name starts with `startsWith` and carry more than `minMalt`
/// kilograms of malt.
#[utoipa::path(
    get,
    path = "/api/v1/beers/prefix",
    params(
        ("startsWith" = String, Query, description = "Case-sensitive name prefix"),
        ("minMalt" = f64, Query, description = "Exclusive floor for the summed malt amount")
    ),
    responses(
        (status = 200, description = "Matching beers", body = Vec<Beer>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No beer matches", body = Error)
    ),
    tags = ["beers"],
    operation_id = "listBeersByPrefix"
)]
#[get("/beers/prefix")]
pub async fn list_beers_by_prefix(
    state: web::Data<HttpState>,
    query: web::Query<PrefixQuery>,
) -> ApiResult<web::Json<Vec<Beer>>> {
    let beers = state
        .beers
        .by_prefix_with_malt(&query.starts_with, query.min_malt)
        .await
        .map_err(map_failure)?;
    Ok(web::Json(beers))
}

/// Fetch one beer.
#[utoipa::path(
    get,
    path = "/api/v1/beers/{id}",
    params(("id" = String, Path, description = "Numeric beer id")),
    responses(
        (status = 200, description = "Beer", body = Beer),
        (status = 400, description = "Non-numeric id", body = Error),
        (status = 404, description = "Unknown beer", body = Error)
    ),
    tags = ["beers"],
    operation_id = "getBeer"
)]
#[get("/beers/{id}")]
pub async fn get_beer(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Beer>> {
    let beer = state.beers.get(&path).await.map_err(map_failure)?;
    Ok(web::Json(beer))
}

/// Replace a beer's descriptive attributes.
#[utoipa::path(
    put,
    path = "/api/v1/beers/{id}",
    params(("id" = String, Path, description = "Numeric beer id")),
    request_body = Beer,
    responses(
        (status = 200, description = "Beer updated", body = Beer),
        (status = 226, description = "Update collides with another beer", body = Error),
        (status = 400, description = "Invalid id or mismatched body", body = Error),
        (status = 404, description = "Unknown beer", body = Error)
    ),
    tags = ["beers"],
    operation_id = "updateBeer"
)]
#[put("/beers/{id}")]
pub async fn update_beer(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Beer>,
) -> ApiResult<web::Json<Beer>> {
    let beer = state
        .beers
        .update(&path, payload.into_inner())
        .await
        .map_err(map_failure)?;
    Ok(web::Json(beer))
}

/// Remove a beer, detaching it from every user who liked it.
#[utoipa::path(
    delete,
    path = "/api/v1/beers/{id}",
    params(("id" = String, Path, description = "Numeric beer id")),
    responses(
        (status = 200, description = "Beer deleted", body = MessageResponse),
        (status = 400, description = "Non-numeric id", body = Error),
        (status = 404, description = "Unknown beer", body = Error)
    ),
    tags = ["beers"],
    operation_id = "deleteBeer"
)]
#[delete("/beers/{id}")]
pub async fn delete_beer(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.beers.delete(&path).await.map_err(map_failure)?;
    Ok(web::Json(MessageResponse::new(
        "The beer was successfully deleted.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockBeerCatalogue;
    use crate::domain::{BeerId, ConflictReason, Failure};
    use crate::inbound::http::state::test_support::with_beers;
    use actix_web::{App, http::StatusCode, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn call(
        catalogue: MockBeerCatalogue,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(with_beers(catalogue)))
                .service(
                    web::scope("/api/v1")
                        .service(create_beer)
                        .service(list_strong_beers)
                        .service(list_beers_by_prefix)
                        .service(get_beer)
                        .service(update_beer)
                        .service(delete_beer),
                ),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn create_returns_201_with_location() {
        let mut catalogue = MockBeerCatalogue::new();
        catalogue.expect_create().times(1).returning(Ok);

        let res = call(
            catalogue,
            test::TestRequest::post()
                .uri("/api/v1/beers")
                .set_json(Beer::named(BeerId::new(7), "Buzz")),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/api/v1/beers/7")
        );
        let body: Beer = test::read_body_json(res).await;
        assert_eq!(body.name.as_deref(), Some("Buzz"));
    }

    #[actix_web::test]
    async fn duplicate_beer_maps_to_im_used() {
        let mut catalogue = MockBeerCatalogue::new();
        catalogue.expect_create().returning(|_| {
            Err(Failure::conflict(
                ConflictReason::DuplicateBeer,
                "This beer already exists just with another id.",
            ))
        });

        let res = call(
            catalogue,
            test::TestRequest::post()
                .uri("/api/v1/beers")
                .set_json(Beer::named(BeerId::new(8), "Buzz")),
        )
        .await;

        assert_eq!(res.status(), StatusCode::IM_USED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("code").and_then(Value::as_str), Some("conflict"));
    }

    #[rstest]
    #[case::defaults("/api/v1/beers/strong", 3.0, 30.0)]
    #[case::explicit("/api/v1/beers/strong?minAbv=6.5&minIbu=70", 6.5, 70.0)]
    #[actix_web::test]
    async fn strong_listing_applies_thresholds(
        #[case] uri: &str,
        #[case] abv: f64,
        #[case] ibu: f64,
    ) {
        let mut catalogue = MockBeerCatalogue::new();
        catalogue
            .expect_strong_and_bitter()
            .withf(move |min_abv, min_ibu| {
                (min_abv - abv).abs() < f64::EPSILON && (min_ibu - ibu).abs() < f64::EPSILON
            })
            .times(1)
            .returning(|_, _| Ok(vec![Beer::named(BeerId::new(1), "Buzz")]));

        let res = call(catalogue, test::TestRequest::get().uri(uri)).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<Beer> = test::read_body_json(res).await;
        assert_eq!(body.len(), 1);
    }

    #[actix_web::test]
    async fn prefix_listing_requires_both_parameters() {
        let res = call(
            MockBeerCatalogue::new(),
            test::TestRequest::get().uri("/api/v1/beers/prefix?startsWith=Bu"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn prefix_listing_surfaces_not_found() {
        let mut catalogue = MockBeerCatalogue::new();
        catalogue
            .expect_by_prefix_with_malt()
            .withf(|prefix, min_malt| prefix == "Zz" && (min_malt - 1.5).abs() < f64::EPSILON)
            .returning(|prefix, _| {
                Err(Failure::beer_not_found(format!("starting with '{prefix}'")))
            });

        let res = call(
            catalogue,
            test::TestRequest::get().uri("/api/v1/beers/prefix?startsWith=Zz&minMalt=1.5"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn get_passes_raw_id_through() {
        let mut catalogue = MockBeerCatalogue::new();
        catalogue
            .expect_get()
            .withf(|id| id == "abc")
            .returning(|_| Err(Failure::invalid_argument("beer id must be numeric")));

        let res = call(catalogue, test::TestRequest::get().uri("/api/v1/beers/abc")).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn update_returns_stored_beer() {
        let mut catalogue = MockBeerCatalogue::new();
        catalogue
            .expect_update()
            .withf(|id, beer| id == "7" && beer.id == BeerId::new(7))
            .returning(|_, beer| Ok(beer));

        let res = call(
            catalogue,
            test::TestRequest::put()
                .uri("/api/v1/beers/7")
                .set_json(Beer::named(BeerId::new(7), "Buzz")),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn delete_confirms_with_message() {
        let mut catalogue = MockBeerCatalogue::new();
        catalogue.expect_delete().times(1).returning(|_| Ok(()));

        let res = call(catalogue, test::TestRequest::delete().uri("/api/v1/beers/7")).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("The beer was successfully deleted.")
        );
    }
}
