//! LocalStorage-backed best scores

use crate::consts::BEST_SCORE_PREFIX;
use crate::highscores::ScoreStore;

/// [`ScoreStore`] persisted in the browser's LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalScoreStore;

impl LocalScoreStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl ScoreStore for LocalScoreStore {
    fn get(&self, key: &str) -> Option<u64> {
        let storage = Self::storage()?;
        let raw = storage
            .get_item(&format!("{BEST_SCORE_PREFIX}{key}"))
            .ok()??;
        match raw.trim().parse() {
            Ok(score) => Some(score),
            Err(_) => {
                log::warn!("Ignoring malformed best score for {}: {:?}", key, raw);
                None
            }
        }
    }

    fn set(&mut self, key: &str, score: u64) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score for {} not saved", key);
            return;
        };
        if storage
            .set_item(&format!("{BEST_SCORE_PREFIX}{key}"), &score.to_string())
            .is_err()
        {
            log::warn!("Could not save best score for {}", key);
        }
    }
}
