// SPDX-License-Identifier: GPL-3.0-or-later
use std::collections::HashMap;

use anyhow::Result;
use reviewmaster_domain::{
    Entity, EntityId, EntityKind, EntityPatch, IdExhausted, Rating, Review, ReviewId, ReviewPatch,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::repositories::CatalogStore;

/// SQLx-backed catalog store. Each kind owns an entity table and a review
/// table; every mutation runs inside a single transaction.
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn create(&self, kind: EntityKind, name: String, genre: String) -> Result<Entity> {
        let q = format!("INSERT INTO {} (name, genre) VALUES (?, ?)", kind.path());
        let result = sqlx::query(&q)
            .bind(&name)
            .bind(&genre)
            .execute(&self.pool)
            .await?;
        let id = EntityId(result.last_insert_rowid());
        debug!(target: "repository", %kind, %id, "created entity");
        Ok(Entity::new(id, name, genre))
    }

    async fn get_by_id(&self, kind: EntityKind, id: EntityId) -> Result<Option<Entity>> {
        debug!(target: "repository", %kind, %id, "fetching entity by id");
        let mut tx = self.pool.begin().await?;
        let entity = fetch_entity(&mut tx, kind, id).await?;
        tx.commit().await?;
        Ok(entity)
    }

    async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        debug!(target: "repository", %kind, "listing entities");
        let mut tx = self.pool.begin().await?;

        let q = format!(
            "SELECT id, name, genre, last_review_id FROM {} ORDER BY id",
            kind.path()
        );
        let rows = sqlx::query(&q).fetch_all(&mut *tx).await?;

        let q = format!(
            "SELECT entity_id, review_id, rating, note FROM {} ORDER BY entity_id, review_id",
            kind.review_table()
        );
        let review_rows = sqlx::query(&q).fetch_all(&mut *tx).await?;
        tx.commit().await?;

        let mut reviews: HashMap<i64, Vec<Review>> = HashMap::new();
        for r in review_rows {
            let entity_id: i64 = r.try_get("entity_id")?;
            reviews.entry(entity_id).or_default().push(row_to_review(&r)?);
        }

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            let mut entity = row_to_entity(&r)?;
            entity.reviews = reviews.remove(&entity.id.get()).unwrap_or_default();
            out.push(entity);
        }
        Ok(out)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: EntityId,
        patch: EntityPatch,
    ) -> Result<Option<Entity>> {
        debug!(target: "repository", %kind, %id, "updating entity");
        let mut tx = self.pool.begin().await?;
        let q = format!(
            "UPDATE {} SET name = COALESCE(?, name), genre = COALESCE(?, genre) WHERE id = ?",
            kind.path()
        );
        let result = sqlx::query(&q)
            .bind(patch.name)
            .bind(patch.genre)
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let entity = fetch_entity(&mut tx, kind, id).await?;
        tx.commit().await?;
        Ok(entity)
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> Result<bool> {
        debug!(target: "repository", %kind, %id, "deleting entity");
        let mut tx = self.pool.begin().await?;
        let q = format!("DELETE FROM {} WHERE entity_id = ?", kind.review_table());
        sqlx::query(&q).bind(id.get()).execute(&mut *tx).await?;
        let q = format!("DELETE FROM {} WHERE id = ?", kind.path());
        let result = sqlx::query(&q).bind(id.get()).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn add_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        rating: Rating,
        note: String,
    ) -> Result<Option<Review>> {
        debug!(target: "repository", %kind, %id, "adding review");
        let mut tx = self.pool.begin().await?;

        // Bump the entity's high-water mark. No row means no entity, or a
        // counter already at i64::MAX, where `+ 1` would turn into a REAL.
        let high = format!(
            "MAX(last_review_id, COALESCE((SELECT MAX(review_id) FROM {reviews} WHERE entity_id = {entities}.id), 0))",
            entities = kind.path(),
            reviews = kind.review_table(),
        );
        let q = format!(
            r#"
            UPDATE {entities} SET last_review_id = {high} + 1
            WHERE id = ? AND {high} < ?
            RETURNING last_review_id
            "#,
            entities = kind.path(),
        );
        let row = sqlx::query(&q)
            .bind(id.get())
            .bind(i64::MAX)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            let q = format!("SELECT 1 FROM {} WHERE id = ?", kind.path());
            let exists = sqlx::query(&q)
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await?
                .is_some();
            if exists {
                return Err(IdExhausted.into());
            }
            return Ok(None);
        };
        let review_id = ReviewId(row.try_get("last_review_id")?);

        let q = format!(
            "INSERT INTO {} (entity_id, review_id, rating, note) VALUES (?, ?, ?, ?)",
            kind.review_table()
        );
        sqlx::query(&q)
            .bind(id.get())
            .bind(review_id.get())
            .bind(rating.value())
            .bind(&note)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(Review {
            review_id,
            rating,
            note,
        }))
    }

    async fn edit_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        review_id: ReviewId,
        patch: ReviewPatch,
    ) -> Result<Option<Review>> {
        debug!(target: "repository", %kind, %id, %review_id, "editing review");
        let mut tx = self.pool.begin().await?;
        let q = format!(
            r#"
            UPDATE {} SET rating = COALESCE(?, rating), note = COALESCE(?, note)
            WHERE entity_id = ? AND review_id = ?
            RETURNING review_id, rating, note
            "#,
            kind.review_table()
        );
        let row = sqlx::query(&q)
            .bind(patch.rating.map(Rating::value))
            .bind(patch.note)
            .bind(id.get())
            .bind(review_id.get())
            .fetch_optional(&mut *tx)
            .await?;
        let review = row.map(|r| row_to_review(&r)).transpose()?;
        tx.commit().await?;
        Ok(review)
    }

    async fn delete_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        review_id: ReviewId,
    ) -> Result<bool> {
        debug!(target: "repository", %kind, %id, %review_id, "deleting review");
        let q = format!(
            "DELETE FROM {} WHERE entity_id = ? AND review_id = ?",
            kind.review_table()
        );
        let result = sqlx::query(&q)
            .bind(id.get())
            .bind(review_id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

async fn fetch_entity(
    tx: &mut Transaction<'_, Sqlite>,
    kind: EntityKind,
    id: EntityId,
) -> Result<Option<Entity>> {
    let q = format!(
        "SELECT id, name, genre, last_review_id FROM {} WHERE id = ? LIMIT 1",
        kind.path()
    );
    let Some(row) = sqlx::query(&q)
        .bind(id.get())
        .fetch_optional(&mut **tx)
        .await?
    else {
        return Ok(None);
    };
    let mut entity = row_to_entity(&row)?;

    let q = format!(
        "SELECT review_id, rating, note FROM {} WHERE entity_id = ? ORDER BY review_id",
        kind.review_table()
    );
    let rows = sqlx::query(&q)
        .bind(id.get())
        .fetch_all(&mut **tx)
        .await?;
    entity.reviews = rows
        .iter()
        .map(row_to_review)
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(entity))
}

fn row_to_entity(row: &SqliteRow) -> Result<Entity> {
    Ok(Entity {
        id: EntityId(row.try_get("id")?),
        name: row.try_get("name")?,
        genre: row.try_get("genre")?,
        last_review_id: ReviewId(row.try_get("last_review_id")?),
        reviews: Vec::new(),
    })
}

fn row_to_review(row: &SqliteRow) -> Result<Review> {
    let rating: f64 = row.try_get("rating")?;
    Ok(Review {
        review_id: ReviewId(row.try_get("review_id")?),
        rating: Rating::new(rating)?,
        note: row.try_get("note")?,
    })
}
