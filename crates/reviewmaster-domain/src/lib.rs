// SPDX-License-Identifier: GPL-3.0-or-later
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects & IDs
// ============================================================================

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn next(self) -> Result<Self, IdExhausted> {
        self.0.checked_add(1).map(Self).ok_or(IdExhausted)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReviewId(pub i64);

impl ReviewId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn next(self) -> Result<Self, IdExhausted> {
        self.0.checked_add(1).map(Self).ok_or(IdExhausted)
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A review score in `[Rating::MIN, Rating::MAX]`. Half stars are allowed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 5.0;

    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError {
                field: "rating",
                message: format!(
                    "rating must be between {} and {}, got {}",
                    Self::MIN,
                    Self::MAX,
                    value
                ),
            })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// The three catalog families. Each kind has its own id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Movie,
    Book,
    Show,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Movie, EntityKind::Book, EntityKind::Show];

    /// URL path segment and storage collection name.
    pub fn path(self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Book => "books",
            Self::Show => "tv_shows",
        }
    }

    /// Human readable singular, used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Book => "book",
            Self::Show => "TV show",
        }
    }

    /// Field the front ends use for the entity name.
    pub fn name_field(self) -> &'static str {
        match self {
            Self::Movie => "name",
            Self::Book | Self::Show => "title",
        }
    }

    /// Table holding the reviews of this kind.
    pub fn review_table(self) -> &'static str {
        match self {
            Self::Movie => "movie_reviews",
            Self::Book => "book_reviews",
            Self::Show => "tv_show_reviews",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: ReviewId,
    pub rating: Rating,
    #[serde(default)]
    pub note: String,
}

/// A movie, book or TV show together with its reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub genre: String,
    /// Highest review id ever handed out on this entity.
    #[serde(default)]
    pub last_review_id: ReviewId,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            genre: genre.into(),
            last_review_id: ReviewId::default(),
            reviews: Vec::new(),
        }
    }

    pub fn review(&self, review_id: ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| r.review_id == review_id)
    }

    /// One past the highest review id ever assigned here. Existing reviews are
    /// consulted too so documents written without the counter stay collision free.
    pub fn next_review_id(&self) -> Result<ReviewId, IdExhausted> {
        self.reviews
            .iter()
            .map(|r| r.review_id)
            .fold(self.last_review_id, std::cmp::max)
            .next()
    }

    pub fn push_review(
        &mut self,
        rating: Rating,
        note: impl Into<String>,
    ) -> Result<Review, IdExhausted> {
        let review = Review {
            review_id: self.next_review_id()?,
            rating,
            note: note.into(),
        };
        self.last_review_id = review.review_id;
        self.reviews.push(review.clone());
        Ok(review)
    }

    pub fn apply_review_patch(&mut self, review_id: ReviewId, patch: ReviewPatch) -> Option<Review> {
        let review = self.reviews.iter_mut().find(|r| r.review_id == review_id)?;
        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(note) = patch.note {
            review.note = note;
        }
        Some(review.clone())
    }

    pub fn remove_review(&mut self, review_id: ReviewId) -> Option<Review> {
        let index = self.reviews.iter().position(|r| r.review_id == review_id)?;
        Some(self.reviews.remove(index))
    }

    pub fn apply_patch(&mut self, patch: EntityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: f64 = self.reviews.iter().map(|r| r.rating.value()).sum();
        Some(total / self.reviews.len() as f64)
    }

    /// Case-insensitive substring match on the genre.
    pub fn genre_matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.genre, needle)
    }

    /// Case-insensitive substring match on the name.
    pub fn name_matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Partial update of a review; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    pub rating: Option<Rating>,
    pub note: Option<String>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.note.is_none()
    }
}

/// Partial update of an entity's own fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    pub name: Option<String>,
    pub genre: Option<String>,
}

impl EntityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.genre.is_none()
    }
}

// ============================================================================
// Catalog document
// ============================================================================

/// All entities of one kind, in creation order, plus the entity id high-water mark.
///
/// This is the unit the document-style stores load and save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub last_id: EntityId,
    #[serde(default, alias = "movies", alias = "books", alias = "shows")]
    pub entities: Vec<Entity>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> Result<EntityId, IdExhausted> {
        self.entities
            .iter()
            .map(|e| e.id)
            .fold(self.last_id, std::cmp::max)
            .next()
    }

    pub fn create(
        &mut self,
        name: impl Into<String>,
        genre: impl Into<String>,
    ) -> Result<Entity, IdExhausted> {
        let entity = Entity::new(self.next_id()?, name, genre);
        self.last_id = entity.id;
        self.entities.push(entity.clone());
        Ok(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn update(&mut self, id: EntityId, patch: EntityPatch) -> Option<Entity> {
        let entity = self.get_mut(id)?;
        entity.apply_patch(patch);
        Some(entity.clone())
    }

    /// Removes the entity together with its reviews.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn add_review(
        &mut self,
        id: EntityId,
        rating: Rating,
        note: impl Into<String>,
    ) -> Result<Option<Review>, IdExhausted> {
        match self.get_mut(id) {
            Some(entity) => entity.push_review(rating, note).map(Some),
            None => Ok(None),
        }
    }

    pub fn edit_review(
        &mut self,
        id: EntityId,
        review_id: ReviewId,
        patch: ReviewPatch,
    ) -> Option<Review> {
        self.get_mut(id)?.apply_review_patch(review_id, patch)
    }

    pub fn remove_review(&mut self, id: EntityId, review_id: ReviewId) -> Option<Review> {
        self.get_mut(id)?.remove_review(review_id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ============================================================================
// Domain Validation
// ============================================================================

/// The id counter sits at `i64::MAX` and cannot hand out another id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdExhausted;

impl std::fmt::Display for IdExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("id space exhausted")
    }
}

impl std::error::Error for IdExhausted {}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Trims the name and rejects it when nothing is left.
pub fn validate_name(kind: EntityKind, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: kind.name_field(),
            message: format!("{} {} cannot be empty", kind.label(), kind.name_field()),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(v: f64) -> Rating {
        Rating::new(v).unwrap()
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
        assert!(Rating::new(2.5).is_ok());
        assert!(Rating::new(-0.5).is_err());
        assert!(Rating::new(5.5).is_err());
        assert!(Rating::new(f64::NAN).is_err());
        assert!(Rating::new(f64::INFINITY).is_err());
    }

    #[test]
    fn rating_deserialization_is_validated() {
        assert!(serde_json::from_str::<Rating>("4.5").is_ok());
        assert!(serde_json::from_str::<Rating>("6").is_err());
    }

    #[test]
    fn catalog_ids_increase_and_are_not_reused() {
        let mut catalog = Catalog::new();
        let a = catalog.create("Alien", "Horror").unwrap();
        let b = catalog.create("Heat", "Crime").unwrap();
        assert_eq!(a.id, EntityId(1));
        assert_eq!(b.id, EntityId(2));

        catalog.remove(b.id).unwrap();
        let c = catalog.create("Up", "Animation").unwrap();
        assert_eq!(c.id, EntityId(3));
    }

    #[test]
    fn review_ids_survive_delete_then_add() {
        let mut catalog = Catalog::new();
        let movie = catalog.create("Inception", "Sci-Fi").unwrap();
        let first = catalog.add_review(movie.id, rating(5.0), "great").unwrap().unwrap();
        assert_eq!(first.review_id, ReviewId(1));

        catalog.remove_review(movie.id, first.review_id).unwrap();
        let second = catalog.add_review(movie.id, rating(3.0), "ok").unwrap().unwrap();
        assert_eq!(second.review_id, ReviewId(2));
    }

    #[test]
    fn deleting_a_review_does_not_renumber_the_rest() {
        let mut entity = Entity::new(EntityId(1), "Dune", "Sci-Fi");
        entity.push_review(rating(4.0), "a").unwrap();
        entity.push_review(rating(3.0), "b").unwrap();
        entity.push_review(rating(2.0), "c").unwrap();

        entity.remove_review(ReviewId(2)).unwrap();
        let ids: Vec<_> = entity.reviews.iter().map(|r| r.review_id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(entity.push_review(rating(1.0), "d").unwrap().review_id, ReviewId(4));
    }

    #[test]
    fn review_ids_are_per_entity() {
        let mut catalog = Catalog::new();
        let a = catalog.create("A", "").unwrap();
        let b = catalog.create("B", "").unwrap();
        catalog.add_review(a.id, rating(1.0), "").unwrap().unwrap();
        catalog.add_review(a.id, rating(2.0), "").unwrap().unwrap();
        let on_b = catalog.add_review(b.id, rating(3.0), "").unwrap().unwrap();
        assert_eq!(on_b.review_id, ReviewId(1));
    }

    #[test]
    fn review_patch_keeps_omitted_fields() {
        let mut entity = Entity::new(EntityId(1), "Dune", "");
        let review = entity.push_review(rating(4.0), "good").unwrap();

        let patched = entity
            .apply_review_patch(
                review.review_id,
                ReviewPatch {
                    rating: None,
                    note: Some("better on rewatch".into()),
                },
            )
            .unwrap();
        assert_eq!(patched.rating, rating(4.0));
        assert_eq!(patched.note, "better on rewatch");

        let patched = entity
            .apply_review_patch(
                review.review_id,
                ReviewPatch {
                    rating: Some(rating(5.0)),
                    note: None,
                },
            )
            .unwrap();
        assert_eq!(patched.rating, rating(5.0));
        assert_eq!(patched.note, "better on rewatch");
    }

    #[test]
    fn missing_targets_yield_none() {
        let mut catalog = Catalog::new();
        let movie = catalog.create("Heat", "").unwrap();
        assert!(catalog.add_review(EntityId(99), rating(1.0), "").unwrap().is_none());
        assert!(catalog.remove_review(movie.id, ReviewId(1)).is_none());
        assert!(catalog
            .edit_review(movie.id, ReviewId(7), ReviewPatch::default())
            .is_none());
        assert!(catalog.remove(EntityId(99)).is_none());
    }

    #[test]
    fn exhausted_ids_are_an_error_not_a_wrap() {
        let mut catalog = Catalog {
            last_id: EntityId(i64::MAX),
            entities: Vec::new(),
        };
        assert_eq!(catalog.create("Heat", ""), Err(IdExhausted));
        assert!(catalog.is_empty());
        assert_eq!(catalog.last_id, EntityId(i64::MAX));

        let mut catalog = Catalog::new();
        let movie = catalog.create("Heat", "").unwrap();
        catalog.get_mut(movie.id).unwrap().last_review_id = ReviewId(i64::MAX);
        assert_eq!(
            catalog.add_review(movie.id, rating(3.0), "again"),
            Err(IdExhausted)
        );
        assert!(catalog.get(movie.id).unwrap().reviews.is_empty());
    }

    #[test]
    fn genre_match_is_case_insensitive_substring() {
        let entity = Entity::new(EntityId(1), "Dune", "Science Fiction");
        assert!(entity.genre_matches("sci"));
        assert!(entity.genre_matches("FICTION"));
        assert!(!entity.genre_matches("drama"));
    }

    #[test]
    fn average_rating_of_reviews() {
        let mut entity = Entity::new(EntityId(1), "Dune", "");
        assert_eq!(entity.average_rating(), None);
        entity.push_review(rating(4.0), "").unwrap();
        entity.push_review(rating(3.0), "").unwrap();
        assert_eq!(entity.average_rating(), Some(3.5));
    }

    #[test]
    fn name_validation_trims() {
        assert_eq!(
            validate_name(EntityKind::Movie, "  Heat ").unwrap(),
            "Heat".to_string()
        );
        let err = validate_name(EntityKind::Book, "   ").unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn legacy_documents_without_counters_load() {
        let legacy = r#"{
            "books": [
                {"id": 1, "title": "Dune", "reviews": [
                    {"review_id": 1, "rating": 4, "note": "long"},
                    {"review_id": 3, "rating": 5, "note": "classic"}
                ]},
                {"id": 4, "title": "Emma", "reviews": []}
            ]
        }"#;
        let mut catalog: Catalog = serde_json::from_str(legacy).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(EntityId(1)).unwrap().name, "Dune");
        assert_eq!(catalog.next_id(), Ok(EntityId(5)));

        let review = catalog.add_review(EntityId(1), rating(2.0), "").unwrap().unwrap();
        assert_eq!(review.review_id, ReviewId(4));
    }

    #[test]
    fn entity_kind_paths() {
        assert_eq!(EntityKind::Movie.path(), "movies");
        assert_eq!(EntityKind::Show.path(), "tv_shows");
        assert_eq!(EntityKind::Show.review_table(), "tv_show_reviews");
        assert_eq!(EntityKind::Book.to_string(), "books");
    }
}
