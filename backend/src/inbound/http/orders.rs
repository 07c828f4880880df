//! Order endpoints.
//!
//! ```text
//! POST   /api/v1/orders
//! GET    /api/v1/orders?startDate=&endDate=
//! GET    /api/v1/orders/by-user/{userName}?sort=asc|desc
//! GET    /api/v1/orders/{id}
//! PUT    /api/v1/orders/{id}
//! DELETE /api/v1/orders/{id}
//! ```

use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Order, OrderDateRange, OrderDraft, SortDirection};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::map_failure;
use crate::inbound::http::messages::MessageResponse;
use crate::inbound::http::state::HttpState;

const DELIVERY_MESSAGE: &str =
    "Thank you for purchasing! You will receive your delivery in 10 business days.";

/// Stored order enriched with its bottle count and the delivery notice.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    #[schema(example = 5)]
    pub quantity_of_bottles: i64,
    #[schema(example = "Thank you for purchasing! You will receive your delivery in 10 business days.")]
    pub message: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            quantity_of_bottles: order.bottle_quantity(),
            order,
            message: DELIVERY_MESSAGE.to_owned(),
        }
    }
}

fn respond_all(orders: Vec<Order>) -> web::Json<Vec<OrderResponse>> {
    web::Json(orders.into_iter().map(OrderResponse::from).collect())
}

/// Listing order for a user's orders.
#[derive(Debug, Deserialize)]
pub struct SortQuery {
    #[serde(default)]
    pub sort: SortDirection,
}

/// Inclusive date window; either side falls back to the default range.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<DateRangeQuery> for OrderDateRange {
    fn from(query: DateRangeQuery) -> Self {
        let defaults = Self::default();
        Self {
            start: query.start_date.unwrap_or(defaults.start),
            end: query.end_date.unwrap_or(defaults.end),
        }
    }
}

/// Price and store a new order.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = OrderDraft,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Order rejected by validation", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    payload: web::Json<OrderDraft>,
) -> ApiResult<HttpResponse> {
    let order = state
        .orders
        .create(payload.into_inner())
        .await
        .map_err(map_failure)?;
    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/api/v1/orders/{}", order.id.as_str()),
        ))
        .json(OrderResponse::from(order)))
}

/// Orders placed within `startDate..=endDate`, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(
        ("startDate" = Option<String>, Query, description = "YYYY-MM-DD, default 2020-01-01"),
        ("endDate" = Option<String>, Query, description = "YYYY-MM-DD inclusive, default 2022-06-30")
    ),
    responses(
        (status = 200, description = "Orders in range", body = Vec<OrderResponse>),
        (status = 400, description = "Malformed or inverted range", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrdersBetween"
)]
#[get("/orders")]
pub async fn list_orders_between(
    state: web::Data<HttpState>,
    query: web::Query<DateRangeQuery>,
) -> ApiResult<web::Json<Vec<OrderResponse>>> {
    let range = OrderDateRange::from(query.into_inner());
    let orders = state
        .orders
        .list_between(range.start, range.end)
        .await
        .map_err(map_failure)?;
    Ok(respond_all(orders))
}

/// A user's orders sorted by `orderSum`.
#[utoipa::path(
    get,
    path = "/api/v1/orders/by-user/{userName}",
    params(
        ("userName" = String, Path, description = "Owner's user name"),
        ("sort" = Option<SortDirection>, Query, description = "asc (default) or desc")
    ),
    responses(
        (status = 200, description = "Orders of the user", body = Vec<OrderResponse>),
        (status = 404, description = "Unknown user or no orders", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrdersForUser"
)]
#[get("/orders/by-user/{user_name}")]
pub async fn list_orders_for_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<SortQuery>,
) -> ApiResult<web::Json<Vec<OrderResponse>>> {
    let orders = state
        .orders
        .list_for_user(&path, query.sort)
        .await
        .map_err(map_failure)?;
    Ok(respond_all(orders))
}

/// Fetch one order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 404, description = "Unknown order", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponse>> {
    let order = state.orders.get(&path).await.map_err(map_failure)?;
    Ok(web::Json(OrderResponse::from(order)))
}

/// Reprice and replace an order, keeping its original date.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    request_body = OrderDraft,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Order rejected by validation", body = Error),
        (status = 404, description = "Unknown order or user", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[put("/orders/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<OrderDraft>,
) -> ApiResult<web::Json<OrderResponse>> {
    let order = state
        .orders
        .update(&path, payload.into_inner())
        .await
        .map_err(map_failure)?;
    Ok(web::Json(OrderResponse::from(order)))
}

/// Cancel an order.
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 404, description = "Unknown order", body = Error)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.orders.delete(&path).await.map_err(map_failure)?;
    Ok(web::Json(MessageResponse::new(
        "The order was successfully deleted.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockOrderDesk;
    use crate::domain::{BeerLines, DeliveryDetails, Failure, OrderId, UserName};
    use crate::inbound::http::state::test_support::with_orders;
    use actix_web::{App, http::StatusCode, test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn order(id: &str, sum: f64) -> Order {
        Order {
            id: OrderId::new(id),
            user_name: UserName::new("ada").expect("valid name"),
            beers_ordered: BeerLines::from([("Buzz".to_owned(), 3), ("Punk IPA".to_owned(), 2)]),
            order_sum: sum,
            date_of_order: Utc
                .with_ymd_and_hms(2021, 3, 14, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
            delivery: DeliveryDetails::default(),
        }
    }

    fn date(raw: &str) -> NaiveDate {
        raw.parse().expect("valid date")
    }

    async fn call(orders: MockOrderDesk, req: test::TestRequest) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(with_orders(orders)))
                .service(
                    web::scope("/api/v1")
                        .service(create_order)
                        .service(list_orders_between)
                        .service(list_orders_for_user)
                        .service(get_order)
                        .service(update_order)
                        .service(delete_order),
                ),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn create_returns_bottles_and_delivery_message() {
        let mut orders = MockOrderDesk::new();
        orders
            .expect_create()
            .times(1)
            .returning(|_| Ok(order("o-1", 25.0)));

        let res = call(
            orders,
            test::TestRequest::post().uri("/api/v1/orders").set_json(json!({
                "userName": "ada",
                "beersOrdered": { "Buzz": 3, "Punk IPA": 2 },
                "phoneNumber": "+44 20 7946 0000"
            })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(
            res.headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/api/v1/orders/o-1")
        );
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("quantityOfBottles"), Some(&json!(5)));
        assert_eq!(body.get("orderSum"), Some(&json!(25.0)));
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some(DELIVERY_MESSAGE)
        );
    }

    #[actix_web::test]
    async fn rejected_order_is_a_bad_request() {
        let mut orders = MockOrderDesk::new();
        orders.expect_create().returning(|_| {
            Err(Failure::policy_denied(
                "Minimum order is 5 bottles of beer",
            ))
        });

        let res = call(
            orders,
            test::TestRequest::post().uri("/api/v1/orders").set_json(json!({
                "userName": "ada",
                "beersOrdered": { "Buzz": 1 }
            })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case::defaults("/api/v1/orders", "2020-01-01", "2022-06-30")]
    #[case::start_only("/api/v1/orders?startDate=2021-03-01", "2021-03-01", "2022-06-30")]
    #[case::both("/api/v1/orders?startDate=2021-03-01&endDate=2021-03-31", "2021-03-01", "2021-03-31")]
    #[actix_web::test]
    async fn range_listing_fills_default_bounds(
        #[case] uri: &str,
        #[case] start: &str,
        #[case] end: &str,
    ) {
        let (start, end) = (date(start), date(end));
        let mut orders = MockOrderDesk::new();
        orders
            .expect_list_between()
            .withf(move |s, e| *s == start && *e == end)
            .times(1)
            .returning(|_, _| Ok(vec![order("o-1", 25.0)]));

        let res = call(orders, test::TestRequest::get().uri(uri)).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<Value> = test::read_body_json(res).await;
        assert_eq!(body.len(), 1);
    }

    #[actix_web::test]
    async fn malformed_date_is_rejected_before_the_service() {
        let res = call(
            MockOrderDesk::new(),
            test::TestRequest::get().uri("/api/v1/orders?startDate=14-03-2021"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case::implicit("/api/v1/orders/by-user/ada", SortDirection::Asc)]
    #[case::descending("/api/v1/orders/by-user/ada?sort=desc", SortDirection::Desc)]
    #[actix_web::test]
    async fn user_listing_forwards_sort_direction(
        #[case] uri: &str,
        #[case] direction: SortDirection,
    ) {
        let mut orders = MockOrderDesk::new();
        orders
            .expect_list_for_user()
            .withf(move |user_name, sort| user_name == "ada" && *sort == direction)
            .times(1)
            .returning(|_, _| Ok(vec![order("o-2", 40.0), order("o-1", 25.0)]));

        let res = call(orders, test::TestRequest::get().uri(uri)).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn user_without_orders_is_not_found() {
        let mut orders = MockOrderDesk::new();
        orders
            .expect_list_for_user()
            .returning(|user_name, _| Err(Failure::order_not_found(format!("for user {user_name}"))));

        let res = call(
            orders,
            test::TestRequest::get().uri("/api/v1/orders/by-user/ada"),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_confirms_with_message() {
        let mut orders = MockOrderDesk::new();
        orders
            .expect_delete()
            .withf(|id| id == "o-1")
            .returning(|_| Ok(()));

        let res = call(orders, test::TestRequest::delete().uri("/api/v1/orders/o-1")).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: MessageResponse = test::read_body_json(res).await;
        assert_eq!(body.message, "The order was successfully deleted.");
    }
}
