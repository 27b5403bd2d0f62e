use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::Quote;

#[derive(Debug, Clone)]
pub struct CachedQuote {
    pub quote: Quote,
    pub fetched_at: DateTime<Utc>,
}

impl CachedQuote {
    pub fn new(quote: Quote) -> Self {
        Self {
            quote,
            fetched_at: Utc::now(),
        }
    }

    /// A window too large to represent never expires.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        match self.fetched_at.checked_add_signed(ttl) {
            Some(expires_at) => Utc::now() < expires_at,
            None => true,
        }
    }
}

/// Freshness cache keyed by symbol.
///
/// Each symbol owns one async mutex slot. Whoever holds the slot is the only
/// caller allowed to go upstream for that symbol; everyone else queues on the
/// lock and then reads what the holder stored.
///
/// The map holds at most `capacity` slots before a new symbol triggers
/// eviction of idle ones.
#[derive(Clone)]
pub struct QuoteCache {
    slots: Arc<DashMap<String, Arc<Mutex<Option<CachedQuote>>>>>,
    ttl: Duration,
    capacity: usize,
}

pub const DEFAULT_SLOT_CAPACITY: usize = 512;

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_SLOT_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Lock the slot for `symbol`, creating it on first use.
    pub async fn lock(&self, symbol: &str) -> QuoteSlot {
        if !self.slots.contains_key(symbol) && self.slots.len() >= self.capacity {
            self.evict_idle();
        }

        let slot = self
            .slots
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();

        QuoteSlot {
            guard: slot.lock_owned().await,
            ttl: self.ttl,
        }
    }

    /// Drop slots nobody is using: expired or empty ones first, then any idle
    /// slot if the map is still full.
    fn evict_idle(&self) {
        let ttl = self.ttl;
        self.slots.retain(|_, slot| !is_idle(slot) || slot_is_fresh(slot, ttl));

        if self.slots.len() >= self.capacity {
            self.slots.retain(|_, slot| !is_idle(slot));
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Only the map holds the slot and no caller has it locked. Clones are taken
/// under the shard lock, so the count cannot change during `retain`.
fn is_idle(slot: &Arc<Mutex<Option<CachedQuote>>>) -> bool {
    Arc::strong_count(slot) == 1 && slot.try_lock().is_ok()
}

fn slot_is_fresh(slot: &Arc<Mutex<Option<CachedQuote>>>, ttl: Duration) -> bool {
    match slot.try_lock() {
        Ok(guard) => (*guard).as_ref().is_some_and(|cached| cached.is_fresh(ttl)),
        Err(_) => true,
    }
}

/// Exclusive access to one symbol's cache entry
pub struct QuoteSlot {
    guard: OwnedMutexGuard<Option<CachedQuote>>,
    ttl: Duration,
}

impl QuoteSlot {
    /// The cached quote if it is still inside the freshness window
    pub fn fresh(&self) -> Option<&CachedQuote> {
        (*self.guard).as_ref().filter(|cached| cached.is_fresh(self.ttl))
    }

    pub fn store(&mut self, quote: Quote) {
        *self.guard = Some(CachedQuote::new(quote));
    }
}
