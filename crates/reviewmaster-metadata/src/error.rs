// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LookupError>;

/// Failure talking to the external show catalog.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("show catalog unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("show catalog is throttling requests")]
    Throttled,

    #[error("show catalog sent an unreadable response: {0}")]
    Malformed(String),

    #[error("show catalog has nothing at {0}")]
    NotFound(String),

    #[error("show catalog answered {status}: {body}")]
    Status { status: u16, body: String },
}
