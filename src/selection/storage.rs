//! Key-value stores that selection sets persist into.

use std::cell::RefCell;
use std::collections::HashMap;

/// Synchronous string store addressed by key.
///
/// Writes are last-write-wins; implementations do no merging.
pub trait SelectionStorage {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Process-local store, used by tests and by callers without a session.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing any encoding.
    pub fn with_raw(self, key: &str, value: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.to_string(), value.into());
        self
    }
}

impl SelectionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: String) {
        self.entries.borrow_mut().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(feature = "server")]
mod session {
    use actix_session::Session;

    use super::SelectionStorage;

    /// Cookie-session backed store; the server-side stand-in for browser
    /// local storage. Each request sees the session as sent with it.
    impl SelectionStorage for Session {
        fn load(&self, key: &str) -> Option<String> {
            match self.get::<String>(key) {
                Ok(value) => value,
                Err(err) => {
                    log::warn!("Discarding unreadable session entry {key}: {err}");
                    None
                }
            }
        }

        fn save(&self, key: &str, value: String) {
            if let Err(err) = self.insert(key, value) {
                log::error!("Failed to persist session entry {key}: {err}");
            }
        }

        fn remove(&self, key: &str) {
            Session::remove(self, key);
        }
    }
}
