// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only TV show lookup against a TVmaze-compatible catalog.
//!
//! Used to prefill show records (title, genres, premiere year, cast,
//! rating). Requests are spaced by a shared throttle and lookups are cached.

pub mod client;
#[cfg(test)]
mod client_tests;
pub mod error;
pub mod models;
pub mod throttle;

pub use client::ShowLookupClient;
pub use error::{LookupError, Result};
pub use models::{CastCredit, SearchHit, ShowCandidate, ShowRecord};
