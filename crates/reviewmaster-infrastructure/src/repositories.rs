// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Result;
use reviewmaster_domain::{
    Entity, EntityId, EntityKind, EntityPatch, Rating, Review, ReviewId, ReviewPatch,
};

// ============================================================================
// Persistence adapter trait
// ============================================================================

/// Storage for entities with nested reviews, one id space per [`EntityKind`].
///
/// Absence of an entity or review is reported as `Ok(None)` / `Ok(false)`;
/// `Err` is reserved for storage failures. Every mutation either commits
/// completely or leaves the stored state untouched. Implementations hand out
/// ids with a high-water mark so neither entity ids nor review ids are reused.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create(&self, kind: EntityKind, name: String, genre: String) -> Result<Entity>;
    async fn get_by_id(&self, kind: EntityKind, id: EntityId) -> Result<Option<Entity>>;
    /// All entities of `kind` in creation order.
    async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>>;
    async fn update(
        &self,
        kind: EntityKind,
        id: EntityId,
        patch: EntityPatch,
    ) -> Result<Option<Entity>>;
    /// Deletes the entity and all of its reviews.
    async fn delete(&self, kind: EntityKind, id: EntityId) -> Result<bool>;

    async fn add_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        rating: Rating,
        note: String,
    ) -> Result<Option<Review>>;
    async fn edit_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        review_id: ReviewId,
        patch: ReviewPatch,
    ) -> Result<Option<Review>>;
    async fn delete_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        review_id: ReviewId,
    ) -> Result<bool>;

    /// Case-insensitive substring match on the genre, creation order.
    async fn search_by_genre(&self, kind: EntityKind, genre: &str) -> Result<Vec<Entity>> {
        let entities = self.list(kind).await?;
        Ok(entities
            .into_iter()
            .filter(|e| e.genre_matches(genre))
            .collect())
    }

    /// Case-insensitive substring match on the name, creation order.
    async fn search_by_name(&self, kind: EntityKind, query: &str) -> Result<Vec<Entity>> {
        let entities = self.list(kind).await?;
        Ok(entities
            .into_iter()
            .filter(|e| e.name_matches(query))
            .collect())
    }
}
