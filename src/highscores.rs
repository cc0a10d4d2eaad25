//! Best-score tracking
//!
//! One durable best score per game, keyed by the game's score key. The
//! backing store is read the first time a game is opened and written only
//! when a run beats the stored value.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Durable integer storage keyed by game identifier
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<u64>;
    fn set(&mut self, key: &str, score: u64);
}

/// Store shared between every engine of one arcade (single-threaded)
pub type SharedScoreStore = Rc<RefCell<dyn ScoreStore>>;

/// In-memory store, used natively and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    entries: HashMap<String, u64>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a shareable handle
    pub fn shared(self) -> SharedScoreStore {
        Rc::new(RefCell::new(self))
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: &str, score: u64) {
        self.entries.insert(key.to_string(), score);
    }
}

/// Best score for one game, mirrored to a [`ScoreStore`]
pub struct BestScore {
    key: &'static str,
    best: u64,
    store: SharedScoreStore,
}

impl BestScore {
    /// Read the stored best once; absent means zero
    pub fn load(key: &'static str, store: SharedScoreStore) -> Self {
        let best = store.borrow().get(key).unwrap_or(0);
        log::info!("Best score for {}: {}", key, best);
        Self { key, best, store }
    }

    /// Wrap a best value that was already read from `store`
    pub fn preloaded(key: &'static str, best: u64, store: SharedScoreStore) -> Self {
        Self { key, best, store }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> u64 {
        self.best
    }

    /// Record a score; persists and returns true only if it beats the best
    pub fn record(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.store.borrow_mut().set(self.key, score);
        log::debug!("New best for {}: {}", self.key, score);
        true
    }
}

impl fmt::Debug for BestScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestScore")
            .field("key", &self.key)
            .field("best", &self.best)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_is_zero() {
        let best = BestScore::load("snake", MemoryScoreStore::new().shared());
        assert_eq!(best.value(), 0);
    }

    #[test]
    fn test_record_only_improvements() {
        let store = MemoryScoreStore::new().shared();
        let mut best = BestScore::load("snake", store.clone());

        assert!(best.record(3));
        assert!(!best.record(2));
        assert!(!best.record(3));
        assert_eq!(best.value(), 3);
        assert_eq!(store.borrow().get("snake"), Some(3));
    }

    #[test]
    fn test_loads_existing_value() {
        let mut mem = MemoryScoreStore::new();
        mem.set("runner", 42);
        let store = mem.shared();
        let mut best = BestScore::load("runner", store.clone());
        assert_eq!(best.value(), 42);
        assert!(!best.record(10));
        assert_eq!(store.borrow().get("runner"), Some(42));
    }

    #[test]
    fn test_preloaded_skips_store_read() {
        let store = MemoryScoreStore::new().shared();
        let mut best = BestScore::preloaded("snake", 5, store.clone());
        assert_eq!(best.value(), 5);
        assert!(!best.record(4));
        assert_eq!(store.borrow().get("snake"), None);
        assert!(best.record(6));
        assert_eq!(store.borrow().get("snake"), Some(6));
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryScoreStore::new().shared();
        let mut snake = BestScore::load("snake", store.clone());
        let runner = BestScore::load("runner", store.clone());
        snake.record(7);
        assert_eq!(runner.value(), 0);
        assert_eq!(store.borrow().get("runner"), None);
    }
}
