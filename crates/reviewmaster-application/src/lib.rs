// SPDX-License-Identifier: GPL-3.0-or-later
use std::sync::Arc;

use reviewmaster_config::AppConfig;
use reviewmaster_domain::EntityKind;
use reviewmaster_infrastructure::CatalogStore;
use reviewmaster_metadata::ShowLookupClient;

pub mod catalog;
pub mod show_import;

pub use catalog::{CatalogError, CatalogRepository, CatalogResult};
pub use show_import::{ShowImportError, ShowImportResult, ShowImportService};

use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub movies: CatalogRepository,
    pub books: CatalogRepository,
    pub shows: CatalogRepository,
    /// `None` when show lookup is disabled in the configuration.
    pub show_import: Option<ShowImportService>,
}

impl AppState {
    /// One repository per kind, all sharing `store`.
    pub fn new(config: AppConfig, store: Arc<dyn CatalogStore>) -> Self {
        let shows = CatalogRepository::new(EntityKind::Show, store.clone());
        Self {
            config,
            movies: CatalogRepository::new(EntityKind::Movie, store.clone()),
            books: CatalogRepository::new(EntityKind::Book, store),
            shows,
            show_import: None,
        }
    }

    pub fn with_show_lookup(mut self, client: ShowLookupClient) -> Self {
        self.show_import = Some(ShowImportService::new(
            Arc::new(client),
            self.shows.clone(),
        ));
        self
    }

    pub fn catalog(&self, kind: EntityKind) -> &CatalogRepository {
        match kind {
            EntityKind::Movie => &self.movies,
            EntityKind::Book => &self.books,
            EntityKind::Show => &self.shows,
        }
    }

    pub fn on_start(&self) {
        info!(
            target: "application",
            backend = ?self.config.storage.backend,
            show_lookup = self.show_import.is_some(),
            "application state initialized"
        );
    }
}
