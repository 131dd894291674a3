// SPDX-License-Identifier: GPL-3.0-or-later

//! Create TV show entries from the external show catalog.

use std::sync::Arc;

use reviewmaster_domain::{Entity, EntityKind};
use reviewmaster_metadata::{LookupError, ShowCandidate, ShowLookupClient};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{CatalogError, CatalogRepository};

#[derive(Debug, Error)]
pub enum ShowImportError {
    #[error("title is required")]
    MissingTitle,

    #[error("no show matches '{0}'")]
    NoCandidate(String),

    #[error("show lookup failed: {0}")]
    Upstream(#[from] LookupError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type ShowImportResult<T> = Result<T, ShowImportError>;

/// Looks shows up by title and imports the best match into the TV show catalog.
#[derive(Debug, Clone)]
pub struct ShowImportService {
    client: Arc<ShowLookupClient>,
    shows: CatalogRepository,
}

impl ShowImportService {
    pub fn new(client: Arc<ShowLookupClient>, shows: CatalogRepository) -> Self {
        debug_assert_eq!(shows.kind(), EntityKind::Show);
        Self { client, shows }
    }

    /// Candidate shows for `title`, best match first.
    pub async fn lookup(&self, title: &str) -> ShowImportResult<Vec<ShowCandidate>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ShowImportError::MissingTitle);
        }
        Ok(self.client.lookup(title).await?)
    }

    /// Create a TV show from the best candidate. Genres are joined with ", ".
    pub async fn import(&self, title: &str) -> ShowImportResult<Entity> {
        let candidates = self.lookup(title).await?;
        let best = candidates
            .into_iter()
            .next()
            .ok_or_else(|| ShowImportError::NoCandidate(title.trim().to_string()))?;
        debug!(
            target: "catalog",
            external_id = best.external_id,
            title = %best.title,
            "importing show"
        );

        let genre = best.genre_label();
        let entity = self.shows.create_entity(&best.title, Some(&genre)).await?;
        info!(
            target: "catalog",
            id = %entity.id,
            external_id = best.external_id,
            "show imported from lookup"
        );
        Ok(entity)
    }
}
