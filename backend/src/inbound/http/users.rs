//! User account and favourites endpoints.
//!
//! ```text
//! POST   /api/v1/users
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! PUT    /api/v1/users/{id}/favorites
//! DELETE /api/v1/users/{id}/favorites
//! POST   /api/v1/users/{id}/favorites/repair
//! ```

use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use serde_json::Value;

use crate::domain::{
    Beer, BeerId, BeerLookup, Error, LikeEdge, LikeRemoval, RepairReport, User, UserDraft,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::map_failure;
use crate::inbound::http::messages::MessageResponse;
use crate::inbound::http::state::HttpState;

/// Interpret a favourites body: `{"id": n}` alone selects by primary id,
/// anything else must be a full beer descriptor.
fn parse_lookup(body: Value) -> Result<BeerLookup, Error> {
    if let Some(id) = id_only(&body) {
        return Ok(BeerLookup::Id(id));
    }
    serde_json::from_value::<Beer>(body)
        .map(|beer| BeerLookup::Descriptor(Box::new(beer)))
        .map_err(|err| Error::invalid_request(format!("invalid beer descriptor: {err}")))
}

fn id_only(body: &Value) -> Option<BeerId> {
    let object = body.as_object()?;
    if object.len() != 1 {
        return None;
    }
    object.get("id")?.as_u64().map(BeerId::new)
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserDraft,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 226, description = "User name or id already taken", body = Error),
        (status = 400, description = "Underage or invalid request", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserDraft>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users
        .create(payload.into_inner())
        .await
        .map_err(map_failure)?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/users/{}", user.id)))
        .json(user))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.get(&path).await.map_err(map_failure)?;
    Ok(web::Json(user))
}

/// Replace a user's profile. Favourites are kept.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UserDraft,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 226, description = "User name held by another user", body = Error),
        (status = 400, description = "Mismatched id", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserDraft>,
) -> ApiResult<web::Json<User>> {
    let user = state
        .users
        .update(&path, payload.into_inner())
        .await
        .map_err(map_failure)?;
    Ok(web::Json(user))
}

/// Remove a user, detaching them from every beer they liked.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.users.delete(&path).await.map_err(map_failure)?;
    Ok(web::Json(MessageResponse::new(
        "The user was successfully deleted.",
    )))
}

/// Like a beer, writing both sides of the edge.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/favorites",
    params(("id" = String, Path, description = "User id")),
    request_body(content = Beer, description = "Beer descriptor, or an object holding only `id`"),
    responses(
        (status = 200, description = "Edge written", body = LikeEdge),
        (status = 226, description = "Edge already present", body = Error),
        (status = 404, description = "Unknown user or beer", body = Error),
        (status = 500, description = "Edge half written", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[put("/users/{id}/favorites")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<LikeEdge>> {
    let lookup = parse_lookup(payload.into_inner())?;
    let edge = state
        .favorites
        .add(&path, lookup)
        .await
        .map_err(map_failure)?;
    Ok(web::Json(edge))
}

/// Unlike a beer. Missing sides are reported rather than rejected.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/favorites",
    params(("id" = String, Path, description = "User id")),
    request_body(content = Beer, description = "Beer descriptor, or an object holding only `id`"),
    responses(
        (status = 200, description = "Sides removed", body = LikeRemoval),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Edge half removed", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/users/{id}/favorites")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<LikeRemoval>> {
    let lookup = parse_lookup(payload.into_inner())?;
    let removal = state
        .favorites
        .remove(&path, lookup)
        .await
        .map_err(map_failure)?;
    Ok(web::Json(removal))
}

/// Reconcile the user's favourites with the beers' `likedBy` sets.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/favorites/repair",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Repair summary", body = RepairReport),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "repairFavorites"
)]
#[post("/users/{id}/favorites/repair")]
pub async fn repair_favorites(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RepairReport>> {
    let report = state.favorites.repair(&path).await.map_err(map_failure)?;
    Ok(web::Json(report))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
