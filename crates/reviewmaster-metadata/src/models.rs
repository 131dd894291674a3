// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One hit of `GET /search/shows?q=`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Relevance score assigned by the catalog.
    #[serde(default)]
    pub score: f64,
    pub show: ShowRecord,
}

/// Show as returned by the upstream catalog.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ShowRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Premiere date, `YYYY-MM-DD`.
    #[serde(default)]
    pub premiered: Option<String>,
    #[serde(default)]
    pub rating: ShowRating,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ShowRating {
    pub average: Option<f64>,
}

/// One entry of `GET /shows/{id}/cast`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CastCredit {
    pub person: Person,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Person {
    pub name: String,
}

/// Normalized lookup result handed to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowCandidate {
    pub external_id: u64,
    pub title: String,
    pub genres: Vec<String>,
    pub premiere_year: Option<i32>,
    pub cast: Vec<String>,
    /// Upstream audience rating on a 0-10 scale.
    pub rating: Option<f64>,
}

impl ShowCandidate {
    pub fn from_record(record: ShowRecord, cast: Vec<String>) -> Self {
        let premiere_year = record.premiered.as_deref().and_then(parse_premiere_year);
        Self {
            external_id: record.id,
            title: record.name,
            genres: record.genres,
            premiere_year,
            cast,
            rating: record.rating.average,
        }
    }

    /// Genres folded into the single genre string the catalog stores.
    pub fn genre_label(&self) -> String {
        self.genres.join(", ")
    }
}

fn parse_premiere_year(s: &str) -> Option<i32> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
