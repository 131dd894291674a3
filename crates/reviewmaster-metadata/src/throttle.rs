// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Duration, Instant};

/// Hands out request slots at least `interval` apart, shared by every clone
/// of a [`crate::ShowLookupClient`].
///
/// Callers reserve a slot under the lock and sleep outside it, so a lookup
/// fanning out into several cast requests queues them in arrival order.
#[derive(Debug, Clone)]
pub struct RequestThrottle {
    interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RequestThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait for this caller's turn to hit the show catalog.
    pub async fn wait_turn(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next.map_or(now, |at| at.max(now));
            *next = Some(slot + self.interval);
            slot
        };

        if slot > Instant::now() {
            tracing::trace!(target: "metadata", delay = ?(slot - Instant::now()), "waiting for request slot");
            sleep_until(slot).await;
        }
    }
}
