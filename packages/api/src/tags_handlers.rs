// ABOUTME: HTTP request handlers for tag operations
// ABOUTME: Handles CRUD operations for tags with database integration

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::db::DbState;
use crate::response::ApiError;
use storefront_tags::{CreatedTag, ProductTag, Tag, TagCreateInput, TagUpdateInput};

/// List all tags with their associated products
pub async fn list_tags(State(db): State<DbState>) -> Result<Json<Vec<Tag>>, ApiError> {
    info!("Listing tags");

    let tags = db.tag_storage.list_tags().await?;
    Ok(Json(tags))
}

/// Get a single tag by ID
pub async fn get_tag(
    State(db): State<DbState>,
    Path(tag_id): Path<i64>,
) -> Result<Json<Tag>, ApiError> {
    info!("Getting tag: {}", tag_id);

    let tag = db.tag_storage.get_tag(tag_id).await?;
    Ok(Json(tag))
}

/// Request body for creating a tag
#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub tag_name: String,
    #[serde(rename = "productIds", default)]
    pub product_ids: Vec<i64>,
}

/// Create a new tag, optionally associating it with products.
///
/// Responds with the created join rows when product ids were supplied
/// and with the created tag otherwise. The asymmetry is inherited
/// endpoint contract, kept for compatibility.
pub async fn create_tag(
    State(db): State<DbState>,
    Json(request): Json<CreateTagRequest>,
) -> Result<Json<CreatedTag>, ApiError> {
    info!("Creating tag: {}", request.tag_name);

    let input = TagCreateInput {
        tag_name: request.tag_name,
        product_ids: request.product_ids,
    };

    let created = db.tag_storage.create_tag(input).await?;
    Ok(Json(created))
}

/// Request body for updating a tag
#[derive(Deserialize)]
pub struct UpdateTagRequest {
    pub tag_name: String,
    #[serde(rename = "productIds", default)]
    pub product_ids: Vec<i64>,
}

/// Rename a tag and replace its product associations.
///
/// Responds with `[removed_count, created_rows]`.
pub async fn update_tag(
    State(db): State<DbState>,
    Path(tag_id): Path<i64>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<Json<(u64, Vec<ProductTag>)>, ApiError> {
    info!("Updating tag: {}", tag_id);

    let input = TagUpdateInput {
        tag_name: request.tag_name,
        product_ids: request.product_ids,
    };

    let (removed, created) = db.tag_storage.update_tag(tag_id, input).await?;
    Ok(Json((removed, created)))
}

/// Delete a tag, responding with the deletion count
pub async fn delete_tag(
    State(db): State<DbState>,
    Path(tag_id): Path<i64>,
) -> Result<Json<u64>, ApiError> {
    info!("Deleting tag: {}", tag_id);

    let deleted = db.tag_storage.delete_tag(tag_id).await?;
    Ok(Json(deleted))
}
