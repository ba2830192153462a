// ABOUTME: Tag type definitions
// ABOUTME: Structures for tags, embedded products, and join rows

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub tag_name: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Read model for the externally owned product records embedded in tag
/// responses. The full product lifecycle lives in another subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    pub price: f64,
    pub stock: i64,
}

/// One association between a tag and a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTag {
    pub id: i64,
    pub tag_id: i64,
    pub product_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCreateInput {
    pub tag_name: String,
    pub product_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagUpdateInput {
    pub tag_name: String,
    pub product_ids: Vec<i64>,
}

/// What a create returns: the join rows when product ids were supplied,
/// otherwise the tag itself. The asymmetry is inherited endpoint contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreatedTag {
    WithProducts(Vec<ProductTag>),
    Bare(Tag),
}
