//! Explicit callback registration table.
//!
//! Replaces lookup-by-class-name reflection: hosts register each statically
//! known handler under a stable string key at startup, and later resolve the
//! key back to the handler, including after a process restart, as long as
//! registration runs before resolution.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::callback::AuthCallback;
use crate::error::{SealError, SealResult};

/// Table mapping stable string keys to callback handlers.
///
/// Keys are part of the host application's contract with itself; they must
/// stay stable across releases for persisted references to keep resolving.
#[derive(Default)]
pub struct CallbackRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn AuthCallback>>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::HandlerAlreadyRegistered`] if the key is taken;
    /// re-registration is a programming error, not a supported update path.
    pub fn register(&self, key: &str, handler: Arc<dyn AuthCallback>) -> SealResult<()> {
        let mut handlers = self
            .handlers
            .write()
            .map_err(|_| SealError::internal("callback registry lock poisoned"))?;
        if handlers.contains_key(key) {
            return Err(SealError::HandlerAlreadyRegistered {
                key: key.to_string(),
            });
        }
        handlers.insert(key.to_string(), handler);
        Ok(())
    }

    /// Resolves `key` to its registered handler.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<Arc<dyn AuthCallback>> {
        self.handlers
            .read()
            .ok()
            .and_then(|handlers| handlers.get(key).map(Arc::clone))
    }

    /// Returns all registered keys, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.handlers
            .read()
            .map(|handlers| handlers.keys().cloned().collect())
            .unwrap_or_default()
    }
}
