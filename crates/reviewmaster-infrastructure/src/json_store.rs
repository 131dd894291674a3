// SPDX-License-Identifier: GPL-3.0-or-later
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reviewmaster_domain::{
    Catalog, Entity, EntityId, EntityKind, EntityPatch, Rating, Review, ReviewId, ReviewPatch,
};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::repositories::CatalogStore;

/// Flat-file store: one pretty-printed JSON document per entity kind.
///
/// Each call reloads the document from disk. Mutations of a kind are
/// serialized and committed by writing a sibling temp file and renaming it
/// over the document, so readers only ever see a complete document.
pub struct JsonFileCatalogStore {
    dir: PathBuf,
    movies: Mutex<()>,
    books: Mutex<()>,
    shows: Mutex<()>,
}

impl JsonFileCatalogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!(target: "infrastructure", dir = %dir.display(), "using json catalog store");
        Self {
            dir,
            movies: Mutex::new(()),
            books: Mutex::new(()),
            shows: Mutex::new(()),
        }
    }

    pub fn document_path(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.path()))
    }

    fn temp_path(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", kind.path()))
    }

    fn lock(&self, kind: EntityKind) -> &Mutex<()> {
        match kind {
            EntityKind::Movie => &self.movies,
            EntityKind::Book => &self.books,
            EntityKind::Show => &self.shows,
        }
    }

    /// File name the desktop tabs used, e.g. `movie_reviews.json`.
    fn legacy_path(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.review_table()))
    }

    /// Current document, else the legacy one, else an empty catalog.
    /// The next commit always goes to [`Self::document_path`].
    async fn load(&self, kind: EntityKind) -> Result<Catalog> {
        if let Some(catalog) = read_document(&self.document_path(kind)).await? {
            return Ok(catalog);
        }
        let legacy = self.legacy_path(kind);
        match read_document(&legacy).await? {
            Some(catalog) => {
                debug!(target: "repository", %kind, path = %legacy.display(), "read legacy catalog document");
                Ok(catalog)
            }
            None => Ok(Catalog::default()),
        }
    }

    async fn save(&self, kind: EntityKind, catalog: &Catalog) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating data directory {}", self.dir.display()))?;

        let path = self.document_path(kind);
        let tmp = self.temp_path(kind);
        let bytes = serde_json::to_vec_pretty(catalog).context("serializing catalog")?;

        let mut file = tokio::fs::File::create(&tmp)
            .await
            .with_context(|| format!("creating {}", tmp.display()))?;
        file.write_all(&bytes)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("syncing {}", tmp.display()))?;
        drop(file);

        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("replacing {}", path.display()))?;
        debug!(target: "repository", %kind, entities = catalog.len(), "catalog document saved");
        Ok(())
    }

    /// Load, apply `f`, and save only when `f` reports a change with `Some`.
    /// An error from `f` leaves the document untouched.
    async fn mutate<R, F>(&self, kind: EntityKind, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Catalog) -> Result<Option<R>> + Send,
        R: Send,
    {
        let _guard = self.lock(kind).lock().await;
        let mut catalog = self.load(kind).await?;
        let outcome = f(&mut catalog)?;
        if outcome.is_some() {
            self.save(kind, &catalog).await?;
        }
        Ok(outcome)
    }
}

async fn read_document(path: &Path) -> Result<Option<Catalog>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .with_context(|| format!("parsing catalog document {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading catalog document {}", path.display())),
    }
}

#[async_trait::async_trait]
impl CatalogStore for JsonFileCatalogStore {
    async fn create(&self, kind: EntityKind, name: String, genre: String) -> Result<Entity> {
        let created = self
            .mutate(kind, |c| Ok(Some(c.create(name, genre)?)))
            .await?
            .context("catalog create produced no entity")?;
        debug!(target: "repository", %kind, id = %created.id, "created entity");
        Ok(created)
    }

    async fn get_by_id(&self, kind: EntityKind, id: EntityId) -> Result<Option<Entity>> {
        let catalog = self.load(kind).await?;
        Ok(catalog.get(id).cloned())
    }

    async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        Ok(self.load(kind).await?.entities)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: EntityId,
        patch: EntityPatch,
    ) -> Result<Option<Entity>> {
        self.mutate(kind, |c| Ok(c.update(id, patch))).await
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> Result<bool> {
        Ok(self.mutate(kind, |c| Ok(c.remove(id))).await?.is_some())
    }

    async fn add_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        rating: Rating,
        note: String,
    ) -> Result<Option<Review>> {
        self.mutate(kind, |c| Ok(c.add_review(id, rating, note)?))
            .await
    }

    async fn edit_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        review_id: ReviewId,
        patch: ReviewPatch,
    ) -> Result<Option<Review>> {
        self.mutate(kind, |c| Ok(c.edit_review(id, review_id, patch)))
            .await
    }

    async fn delete_review(
        &self,
        kind: EntityKind,
        id: EntityId,
        review_id: ReviewId,
    ) -> Result<bool> {
        Ok(self
            .mutate(kind, |c| Ok(c.remove_review(id, review_id)))
            .await?
            .is_some())
    }
}
