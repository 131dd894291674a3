// SPDX-License-Identifier: GPL-3.0-or-later
use std::collections::HashMap;

use anyhow::Result;
use reviewmaster_domain::{
    Catalog, Entity, EntityId, EntityKind, EntityPatch, Rating, Review, ReviewId, ReviewPatch,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::repositories::CatalogStore;

/// Process-local store. Contents are lost on shutdown.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    catalogs: RwLock<HashMap<EntityKind, Catalog>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read<R>(&self, kind: EntityKind, f: impl FnOnce(&Catalog) -> R) -> R {
        let guard = self.catalogs.read().await;
        match guard.get(&kind) {
            Some(catalog) => f(catalog),
            None => f(&Catalog::default()),
        }
    }

    async fn write<R>(&self, kind: EntityKind, f: impl FnOnce(&mut Catalog) -> R) -> R {
        let mut guard = self.catalogs.write().await;
        f(guard.entry(kind).or_default())
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn create(&self, kind: EntityKind, name: String, genre: String) -> Result<Entity> {
        let entity = self.write(kind, |c| c.create(name, genre)).await?;
        debug!(target: "repository", %kind, id = %entity.id, "created entity in memory");
        Ok(entity)
    }

    async fn get_by_id(&self, kind: EntityKind, id: EntityId) -> Result<Option<Entity>> {
        Ok(self.read(kind, |c| c.get(id).cloned()).await)
    }

    async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        Ok(self.read(kind, |c| c.entities.clone()).await)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: EntityId,
        patch: EntityPatch,
    ) -> Result<Option<Entity>> {
        Ok(self.write(kind, |c| c.update(id, patch)).await)
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> Result<bool> {
        Ok(self.write(kind, |c| c.remove(id).is_some()).await)
    }

    async fn add_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        rating: Rating,
        note: String,
    ) -> Result<Option<Review>> {
        Ok(self.write(kind, |c| c.add_review(id, rating, note)).await?)
    }

    async fn edit_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        review_id: ReviewId,
        patch: ReviewPatch,
    ) -> Result<Option<Review>> {
        Ok(self
            .write(kind, |c| c.edit_review(id, review_id, patch))
            .await)
    }

    async fn delete_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        review_id: ReviewId,
    ) -> Result<bool> {
        Ok(self
            .write(kind, |c| c.remove_review(id, review_id).is_some())
            .await)
    }
}
