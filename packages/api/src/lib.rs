// ABOUTME: HTTP API layer for Storefront providing REST endpoints and routing
// ABOUTME: Integration layer over the tag storage package

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod db;
pub mod response;
pub mod tags_handlers;

pub use db::DbState;

/// Creates the tags API router
pub fn create_tags_router() -> Router<DbState> {
    Router::new()
        .route("/", get(tags_handlers::list_tags))
        .route("/", post(tags_handlers::create_tag))
        .route("/{tag_id}", get(tags_handlers::get_tag))
        .route("/{tag_id}", put(tags_handlers::update_tag))
        .route("/{tag_id}", delete(tags_handlers::delete_tag))
}
