// ABOUTME: Tag management with product associations for Storefront
// ABOUTME: Provides types, the association reconciler, and the storage layer

pub mod reconcile;
pub mod storage;
pub mod types;

// Re-export main types
pub use reconcile::{diff_associations, AssociationDiff};
pub use storage::TagStorage;
pub use types::{CreatedTag, Product, ProductTag, Tag, TagCreateInput, TagUpdateInput};
