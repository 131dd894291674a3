//! Every catalog store must behave identically from the caller's side.
//! Each scenario runs against the memory, JSON-file and SQLite adapters.

use std::sync::Arc;

use reviewmaster_config::DatabaseConfig;
use reviewmaster_domain::{EntityId, EntityKind, EntityPatch, Rating, ReviewId, ReviewPatch};
use reviewmaster_infrastructure::{
    init_database, CatalogStore, JsonFileCatalogStore, MemoryCatalogStore, SqliteCatalogStore,
};
use tempfile::TempDir;

struct Harness {
    name: &'static str,
    store: Arc<dyn CatalogStore>,
    _dir: Option<TempDir>,
}

async fn stores() -> Vec<Harness> {
    let dir = tempfile::tempdir().expect("temp dir");
    let json = JsonFileCatalogStore::new(dir.path());

    let pool = init_database(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_max_size: 1,
    })
    .await
    .expect("in-memory sqlite");

    vec![
        Harness {
            name: "memory",
            store: Arc::new(MemoryCatalogStore::new()),
            _dir: None,
        },
        Harness {
            name: "json",
            store: Arc::new(json),
            _dir: Some(dir),
        },
        Harness {
            name: "sqlite",
            store: Arc::new(SqliteCatalogStore::new(pool)),
            _dir: None,
        },
    ]
}

fn rating(v: f64) -> Rating {
    Rating::new(v).unwrap()
}

#[tokio::test]
async fn inception_scenario() {
    for h in stores().await {
        let store = &h.store;
        let movie = store
            .create(EntityKind::Movie, "Inception".into(), "Sci-Fi".into())
            .await
            .unwrap();
        assert_eq!(movie.id, EntityId(1), "{}", h.name);

        let review = store
            .add_review(EntityKind::Movie, movie.id, rating(5.0), "great".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(review.review_id, ReviewId(1), "{}", h.name);

        let fetched = store
            .get_by_id(EntityKind::Movie, EntityId(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.name, "Inception", "{}", h.name);
        assert_eq!(fetched.genre, "Sci-Fi", "{}", h.name);
        assert_eq!(fetched.reviews, vec![review], "{}", h.name);
    }
}

#[tokio::test]
async fn review_ids_are_not_reused_after_delete() {
    for h in stores().await {
        let store = &h.store;
        let movie = store
            .create(EntityKind::Movie, "Inception".into(), "Sci-Fi".into())
            .await
            .unwrap();
        store
            .add_review(EntityKind::Movie, movie.id, rating(5.0), "great".into())
            .await
            .unwrap();
        assert!(store
            .delete_review(EntityKind::Movie, movie.id, ReviewId(1))
            .await
            .unwrap());

        let next = store
            .add_review(EntityKind::Movie, movie.id, rating(3.0), "ok".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.review_id, ReviewId(2), "{}", h.name);
    }
}

#[tokio::test]
async fn entity_ids_strictly_increase_across_deletes() {
    for h in stores().await {
        let store = &h.store;
        let mut last = EntityId(0);
        for i in 0..4 {
            let e = store
                .create(EntityKind::Book, format!("Book {i}"), String::new())
                .await
                .unwrap();
            assert!(e.id > last, "{}", h.name);
            last = e.id;
        }
        assert!(store.delete(EntityKind::Book, last).await.unwrap());
        let after = store
            .create(EntityKind::Book, "After".into(), String::new())
            .await
            .unwrap();
        assert!(after.id > last, "{}: {} <= {}", h.name, after.id, last);
    }
}

#[tokio::test]
async fn delete_removes_entity_and_reviews() {
    for h in stores().await {
        let store = &h.store;
        let keep = store
            .create(EntityKind::Show, "Dark".into(), "Mystery".into())
            .await
            .unwrap();
        let gone = store
            .create(EntityKind::Show, "Lost".into(), "Drama".into())
            .await
            .unwrap();
        store
            .add_review(EntityKind::Show, gone.id, rating(2.0), "meh".into())
            .await
            .unwrap();

        assert!(store.delete(EntityKind::Show, gone.id).await.unwrap());
        assert!(!store.delete(EntityKind::Show, gone.id).await.unwrap());

        assert!(store
            .get_by_id(EntityKind::Show, gone.id)
            .await
            .unwrap()
            .is_none());
        let listed = store.list(EntityKind::Show).await.unwrap();
        assert_eq!(listed.len(), 1, "{}", h.name);
        assert_eq!(listed[0].id, keep.id, "{}", h.name);
        assert!(store
            .add_review(EntityKind::Show, gone.id, rating(1.0), "".into())
            .await
            .unwrap()
            .is_none());
    }
}

#[tokio::test]
async fn list_preserves_creation_and_review_order() {
    for h in stores().await {
        let store = &h.store;
        for name in ["Zodiac", "Alien", "Memento"] {
            store
                .create(EntityKind::Movie, name.into(), String::new())
                .await
                .unwrap();
        }
        let alien = EntityId(2);
        for note in ["first", "second", "third"] {
            store
                .add_review(EntityKind::Movie, alien, rating(3.0), note.into())
                .await
                .unwrap();
        }

        let names: Vec<_> = store
            .list(EntityKind::Movie)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Zodiac", "Alien", "Memento"], "{}", h.name);

        let notes: Vec<_> = store
            .get_by_id(EntityKind::Movie, alien)
            .await
            .unwrap()
            .unwrap()
            .reviews
            .into_iter()
            .map(|r| r.note)
            .collect();
        assert_eq!(notes, vec!["first", "second", "third"], "{}", h.name);
    }
}

#[tokio::test]
async fn edit_review_is_partial() {
    for h in stores().await {
        let store = &h.store;
        let book = store
            .create(EntityKind::Book, "Emma".into(), "Classic".into())
            .await
            .unwrap();
        let review = store
            .add_review(EntityKind::Book, book.id, rating(4.0), "witty".into())
            .await
            .unwrap()
            .unwrap();

        let edited = store
            .edit_review(
                EntityKind::Book,
                book.id,
                review.review_id,
                ReviewPatch {
                    rating: None,
                    note: Some("very witty".into()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.rating, rating(4.0), "{}", h.name);
        assert_eq!(edited.note, "very witty", "{}", h.name);

        let edited = store
            .edit_review(
                EntityKind::Book,
                book.id,
                review.review_id,
                ReviewPatch {
                    rating: Some(rating(2.5)),
                    note: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.rating, rating(2.5), "{}", h.name);
        assert_eq!(edited.note, "very witty", "{}", h.name);

        assert!(store
            .edit_review(
                EntityKind::Book,
                book.id,
                ReviewId(42),
                ReviewPatch {
                    rating: Some(rating(1.0)),
                    note: None,
                },
            )
            .await
            .unwrap()
            .is_none());
    }
}

#[tokio::test]
async fn update_entity_keeps_reviews() {
    for h in stores().await {
        let store = &h.store;
        let show = store
            .create(EntityKind::Show, "Severence".into(), String::new())
            .await
            .unwrap();
        store
            .add_review(EntityKind::Show, show.id, rating(5.0), "".into())
            .await
            .unwrap();

        let updated = store
            .update(
                EntityKind::Show,
                show.id,
                EntityPatch {
                    name: Some("Severance".into()),
                    genre: Some("Thriller".into()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Severance", "{}", h.name);
        assert_eq!(updated.genre, "Thriller", "{}", h.name);
        assert_eq!(updated.reviews.len(), 1, "{}", h.name);

        assert!(store
            .update(EntityKind::Show, EntityId(99), EntityPatch::default())
            .await
            .unwrap()
            .is_none());
    }
}

#[tokio::test]
async fn genre_and_name_search_are_case_insensitive_substrings() {
    for h in stores().await {
        let store = &h.store;
        store
            .create(EntityKind::Book, "Dune".into(), "Science Fiction".into())
            .await
            .unwrap();
        store
            .create(EntityKind::Book, "Emma".into(), "Romance".into())
            .await
            .unwrap();
        store
            .create(EntityKind::Book, "Neuromancer".into(), "sci-fi".into())
            .await
            .unwrap();

        let sci: Vec<_> = store
            .search_by_genre(EntityKind::Book, "SCI")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(sci, vec!["Dune", "Neuromancer"], "{}", h.name);

        assert!(store
            .search_by_genre(EntityKind::Book, "horror")
            .await
            .unwrap()
            .is_empty());

        let by_name = store
            .search_by_name(EntityKind::Book, "mAnCeR")
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1, "{}", h.name);
        assert_eq!(by_name[0].name, "Neuromancer", "{}", h.name);
    }
}
