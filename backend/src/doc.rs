//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every beer, user, favourites, order and health
//! endpoint together with the domain payloads they exchange. Swagger UI
//! serves it in debug builds and `cargo run --bin openapi-dump` prints it as
//! YAML for external tooling.

use utoipa::OpenApi;

use crate::domain::{
    Amount, Beer, DeliveryDetails, Error, ErrorCode, Hop, Ingredients, LikeEdge, LikeRemoval,
    Malt, Order, OrderDraft, RepairReport, SortDirection, User, UserDraft,
};
use crate::inbound::http::messages::MessageResponse;
use crate::inbound::http::orders::OrderResponse;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Beer order API",
        description = "Beer catalogue, user favourites and priced bottle orders."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::beers::create_beer,
        crate::inbound::http::beers::list_strong_beers,
        crate::inbound::http::beers::list_beers_by_prefix,
        crate::inbound::http::beers::get_beer,
        crate::inbound::http::beers::update_beer,
        crate::inbound::http::beers::delete_beer,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::add_favorite,
        crate::inbound::http::users::remove_favorite,
        crate::inbound::http::users::repair_favorites,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::list_orders_between,
        crate::inbound::http::orders::list_orders_for_user,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Beer,
        Amount,
        Malt,
        Hop,
        Ingredients,
        User,
        UserDraft,
        Order,
        OrderDraft,
        OrderResponse,
        DeliveryDetails,
        SortDirection,
        LikeEdge,
        LikeRemoval,
        RepairReport,
        MessageResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "beers", description = "Beer catalogue"),
        (name = "users", description = "User accounts"),
        (name = "favorites", description = "Likes between users and beers"),
        (name = "orders", description = "Priced bottle orders"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("Beer", "likedBy")]
    #[case("User", "userName")]
    #[case("Order", "orderSum")]
    fn schemas_use_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/beers/{id}")]
    #[case("/api/v1/beers/strong")]
    #[case("/api/v1/users/{id}/favorites")]
    #[case("/api/v1/orders/by-user/{userName}")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
