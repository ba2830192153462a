// ABOUTME: Tag storage layer using SQLite
// ABOUTME: CRUD for tags plus transactional product-association reconciliation

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use storefront_storage::{StorageError, StorageResult};

use crate::reconcile::diff_associations;
use crate::types::{CreatedTag, Product, ProductTag, Tag, TagCreateInput, TagUpdateInput};

pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tags, each with its associated products embedded
    pub async fn list_tags(&self) -> StorageResult<Vec<Tag>> {
        debug!("Fetching all tags");

        let rows = sqlx::query("SELECT id, tag_name FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut tags = rows
            .iter()
            .map(row_to_tag)
            .collect::<StorageResult<Vec<_>>>()?;

        let product_rows = sqlx::query(
            r#"
            SELECT pt.tag_id, p.id, p.product_name, p.price, p.stock
            FROM product_tags pt
            JOIN products p ON p.id = pt.product_id
            ORDER BY pt.tag_id, p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_tag: HashMap<i64, Vec<Product>> = HashMap::new();
        for row in &product_rows {
            let tag_id: i64 = row.try_get("tag_id")?;
            by_tag.entry(tag_id).or_default().push(row_to_product(row)?);
        }

        for tag in &mut tags {
            if let Some(products) = by_tag.remove(&tag.id) {
                tag.products = products;
            }
        }

        Ok(tags)
    }

    /// Get a single tag by ID, with its associated products
    pub async fn get_tag(&self, tag_id: i64) -> StorageResult<Tag> {
        debug!("Fetching tag: {}", tag_id);

        let row = sqlx::query("SELECT id, tag_name FROM tags WHERE id = ?")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        let mut tag = row_to_tag(&row)?;
        tag.products = self.products_for_tag(tag_id).await?;
        Ok(tag)
    }

    async fn products_for_tag(&self, tag_id: i64) -> StorageResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.product_name, p.price, p.stock
            FROM product_tags pt
            JOIN products p ON p.id = pt.product_id
            WHERE pt.tag_id = ?
            ORDER BY p.id
            "#,
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    /// Create a tag and, when product ids were supplied, its join rows.
    ///
    /// Name collisions surface as `DuplicateName` via the UNIQUE
    /// constraint on `tags.tag_name`. Returns the created join rows when
    /// `product_ids` is non-empty and the bare tag otherwise.
    pub async fn create_tag(&self, input: TagCreateInput) -> StorageResult<CreatedTag> {
        debug!("Creating tag: {}", input.tag_name);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO tags (tag_name) VALUES (?)")
            .bind(&input.tag_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, &input.tag_name))?;

        let tag_id = result.last_insert_rowid();

        if input.product_ids.is_empty() {
            tx.commit().await?;
            return Ok(CreatedTag::Bare(self.get_tag(tag_id).await?));
        }

        // Duplicate ids in the request collapse to one join row each.
        let additions = diff_associations(&[], &input.product_ids).additions;
        let created = insert_product_tags(&mut tx, tag_id, &additions).await?;

        tx.commit().await?;

        Ok(CreatedTag::WithProducts(created))
    }

    /// Rename a tag and replace its product associations with `product_ids`.
    ///
    /// The rename, join-row deletions, and join-row insertions run in a
    /// single transaction so the association set is never left partially
    /// reconciled. Returns the number of join rows removed and the join
    /// rows created.
    pub async fn update_tag(
        &self,
        tag_id: i64,
        input: TagUpdateInput,
    ) -> StorageResult<(u64, Vec<ProductTag>)> {
        debug!("Updating tag: {}", tag_id);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE tags SET tag_name = ? WHERE id = ?")
            .bind(&input.tag_name)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, &input.tag_name))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        let rows = sqlx::query(
            "SELECT id, tag_id, product_id FROM product_tags WHERE tag_id = ? ORDER BY id",
        )
        .bind(tag_id)
        .fetch_all(&mut *tx)
        .await?;

        let current = rows
            .iter()
            .map(row_to_product_tag)
            .collect::<StorageResult<Vec<_>>>()?;

        let diff = diff_associations(&current, &input.product_ids);

        let mut removed = 0u64;
        for row_id in &diff.removals {
            let result = sqlx::query("DELETE FROM product_tags WHERE id = ?")
                .bind(row_id)
                .execute(&mut *tx)
                .await?;
            removed += result.rows_affected();
        }

        let created = insert_product_tags(&mut tx, tag_id, &diff.additions).await?;

        tx.commit().await?;

        Ok((removed, created))
    }

    /// Delete a tag by ID; join rows are removed by the FK cascade.
    ///
    /// Returns the number of tags deleted (always 1 on success).
    pub async fn delete_tag(&self, tag_id: i64) -> StorageResult<u64> {
        debug!("Deleting tag: {}", tag_id);

        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(result.rows_affected())
    }
}

async fn insert_product_tags(
    tx: &mut Transaction<'_, Sqlite>,
    tag_id: i64,
    product_ids: &[i64],
) -> StorageResult<Vec<ProductTag>> {
    let mut created = Vec::with_capacity(product_ids.len());

    for &product_id in product_ids {
        let result = sqlx::query("INSERT INTO product_tags (tag_id, product_id) VALUES (?, ?)")
            .bind(tag_id)
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        created.push(ProductTag {
            id: result.last_insert_rowid(),
            tag_id,
            product_id,
        });
    }

    Ok(created)
}

fn map_unique_violation(err: sqlx::Error, tag_name: &str) -> StorageError {
    if err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        StorageError::DuplicateName(tag_name.to_string())
    } else {
        StorageError::Sqlx(err)
    }
}

fn row_to_tag(row: &SqliteRow) -> StorageResult<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        tag_name: row.try_get("tag_name")?,
        products: Vec::new(),
    })
}

fn row_to_product(row: &SqliteRow) -> StorageResult<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        product_name: row.try_get("product_name")?,
        price: row.try_get("price")?,
        stock: row.try_get("stock")?,
    })
}

fn row_to_product_tag(row: &SqliteRow) -> StorageResult<ProductTag> {
    Ok(ProductTag {
        id: row.try_get("id")?,
        tag_id: row.try_get("tag_id")?,
        product_id: row.try_get("product_id")?,
    })
}
