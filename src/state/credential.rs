use std::sync::{Arc, Mutex};

/// Single-use holder for session key material.
///
/// The value can be read exactly once; `take` clears the slot. Clones share
/// the same slot.
#[derive(Clone, Default)]
pub struct CredentialSlot {
    value: Arc<Mutex<Option<String>>>,
}

impl CredentialSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        let slot = Self::default();
        slot.put(value);
        slot
    }

    /// Replace whatever the slot holds
    pub fn put(&self, value: impl Into<String>) {
        *self.lock() = Some(value.into());
    }

    /// Read and clear the slot
    pub fn take(&self) -> Option<String> {
        self.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for CredentialSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_empty() { "empty" } else { "filled" };
        f.debug_tuple("CredentialSlot").field(&state).finish()
    }
}
