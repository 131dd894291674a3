// SPDX-License-Identifier: GPL-3.0-or-later

//! Catalog operations shared by movies, books and TV shows.
//!
//! A [`CatalogRepository`] is bound to one [`EntityKind`] and a
//! [`CatalogStore`]. It validates input before touching storage, turns
//! absence reported by the store into [`CatalogError::NotFound`] and wraps
//! store failures in [`CatalogError::Storage`].

use std::sync::Arc;

use reviewmaster_domain::{
    validate_name, Entity, EntityId, EntityKind, EntityPatch, Rating, Review, ReviewId,
    ReviewPatch, ValidationError,
};
use reviewmaster_infrastructure::CatalogStore;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.message)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Repository for one entity kind.
#[derive(Clone)]
pub struct CatalogRepository {
    kind: EntityKind,
    store: Arc<dyn CatalogStore>,
}

impl std::fmt::Debug for CatalogRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogRepository")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl CatalogRepository {
    pub fn new(kind: EntityKind, store: Arc<dyn CatalogStore>) -> Self {
        Self { kind, store }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Create an entity with an empty review list.
    ///
    /// The name is trimmed and must not be blank; the genre may be empty.
    pub async fn create_entity(&self, name: &str, genre: Option<&str>) -> CatalogResult<Entity> {
        let name = validate_name(self.kind, name)?;
        let genre = genre.map(str::trim).unwrap_or_default().to_string();

        let entity = self.store.create(self.kind, name, genre).await?;
        info!(
            target: "catalog",
            kind = %self.kind,
            id = %entity.id,
            name = %entity.name,
            "entity created"
        );
        Ok(entity)
    }

    /// Append a review. The rating is checked before the entity is looked up.
    pub async fn add_review(
        &self,
        entity_id: EntityId,
        rating: f64,
        note: Option<&str>,
    ) -> CatalogResult<Review> {
        let rating = Rating::new(rating)?;
        let note = note.unwrap_or_default().to_string();

        let review = self
            .store
            .add_review(self.kind, entity_id, rating, note)
            .await?
            .ok_or_else(|| self.entity_not_found(entity_id))?;
        info!(
            target: "catalog",
            kind = %self.kind,
            id = %entity_id,
            review_id = %review.review_id,
            "review added"
        );
        Ok(review)
    }

    /// Partially update a review. At least one field must be supplied.
    pub async fn edit_review(
        &self,
        entity_id: EntityId,
        review_id: ReviewId,
        rating: Option<f64>,
        note: Option<&str>,
    ) -> CatalogResult<Review> {
        let patch = ReviewPatch {
            rating: rating.map(Rating::new).transpose()?,
            note: note.map(str::to_string),
        };
        if patch.is_empty() {
            return Err(CatalogError::Validation("No fields to update".to_string()));
        }

        let review = self
            .store
            .edit_review(self.kind, entity_id, review_id, patch)
            .await?;
        match review {
            Some(review) => {
                debug!(target: "catalog", kind = %self.kind, id = %entity_id, %review_id, "review edited");
                Ok(review)
            }
            None => Err(self.review_not_found(entity_id, review_id).await?),
        }
    }

    pub async fn delete_review(&self, entity_id: EntityId, review_id: ReviewId) -> CatalogResult<()> {
        if self
            .store
            .delete_review(self.kind, entity_id, review_id)
            .await?
        {
            info!(target: "catalog", kind = %self.kind, id = %entity_id, %review_id, "review deleted");
            Ok(())
        } else {
            Err(self.review_not_found(entity_id, review_id).await?)
        }
    }

    /// Remove the entity together with all of its reviews.
    pub async fn delete_entity(&self, entity_id: EntityId) -> CatalogResult<()> {
        if self.store.delete(self.kind, entity_id).await? {
            info!(target: "catalog", kind = %self.kind, id = %entity_id, "entity deleted");
            Ok(())
        } else {
            Err(self.entity_not_found(entity_id))
        }
    }

    pub async fn get_entity(&self, entity_id: EntityId) -> CatalogResult<Option<Entity>> {
        Ok(self.store.get_by_id(self.kind, entity_id).await?)
    }

    /// Every entity of this kind with nested reviews, in creation order.
    pub async fn list_entities(&self) -> CatalogResult<Vec<Entity>> {
        Ok(self.store.list(self.kind).await?)
    }

    pub async fn search_by_genre(&self, genre: &str) -> CatalogResult<Vec<Entity>> {
        let matches = self.store.search_by_genre(self.kind, genre).await?;
        debug!(target: "catalog", kind = %self.kind, genre, count = matches.len(), "genre search");
        Ok(matches)
    }

    pub async fn search_by_name(&self, query: &str) -> CatalogResult<Vec<Entity>> {
        let matches = self.store.search_by_name(self.kind, query).await?;
        debug!(target: "catalog", kind = %self.kind, query, count = matches.len(), "name search");
        Ok(matches)
    }

    pub async fn list_reviews(&self, entity_id: EntityId) -> CatalogResult<Vec<Review>> {
        self.store
            .get_by_id(self.kind, entity_id)
            .await?
            .map(|entity| entity.reviews)
            .ok_or_else(|| self.entity_not_found(entity_id))
    }

    /// Rename and/or re-genre an entity. Reviews are left alone.
    pub async fn update_entity(
        &self,
        entity_id: EntityId,
        name: Option<&str>,
        genre: Option<&str>,
    ) -> CatalogResult<Entity> {
        let patch = EntityPatch {
            name: name.map(|n| validate_name(self.kind, n)).transpose()?,
            genre: genre.map(|g| g.trim().to_string()),
        };
        if patch.is_empty() {
            return Err(CatalogError::Validation("No fields to update".to_string()));
        }

        let entity = self
            .store
            .update(self.kind, entity_id, patch)
            .await?
            .ok_or_else(|| self.entity_not_found(entity_id))?;
        info!(target: "catalog", kind = %self.kind, id = %entity_id, "entity updated");
        Ok(entity)
    }

    fn entity_not_found(&self, entity_id: EntityId) -> CatalogError {
        warn!(target: "catalog", kind = %self.kind, id = %entity_id, "entity not found");
        CatalogError::NotFound(format!("{} {} not found", self.kind.label(), entity_id))
    }

    /// Distinguish a missing entity from a missing review for the error message.
    async fn review_not_found(
        &self,
        entity_id: EntityId,
        review_id: ReviewId,
    ) -> CatalogResult<CatalogError> {
        if self.store.get_by_id(self.kind, entity_id).await?.is_none() {
            return Ok(self.entity_not_found(entity_id));
        }
        warn!(target: "catalog", kind = %self.kind, id = %entity_id, %review_id, "review not found");
        Ok(CatalogError::NotFound(format!(
            "review {} not found on {} {}",
            review_id,
            self.kind.label(),
            entity_id
        )))
    }
}
