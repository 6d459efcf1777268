use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use cards::CardDetails;
use interfaces::connector_types::PaymentDetailsStore;

/// Process-local card store keyed by the host's session id
#[derive(Default)]
pub struct InMemoryPaymentDetailsStore {
    entries: Mutex<HashMap<String, CardDetails>>,
}

impl InMemoryPaymentDetailsStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock leaves the map itself intact.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CardDetails>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PaymentDetailsStore for InMemoryPaymentDetailsStore {
    fn store(&self, session_id: &str, details: CardDetails) {
        // Replacing drops (and zeroises) any earlier card for the session.
        self.entries().insert(session_id.to_string(), details);
    }

    fn take(&self, session_id: &str) -> Option<CardDetails> {
        self.entries().remove(session_id)
    }

    fn peek_exists(&self, session_id: &str) -> bool {
        self.entries().contains_key(session_id)
    }

    fn remove(&self, session_id: &str) -> bool {
        self.entries().remove(session_id).is_some()
    }
}

impl std::fmt::Debug for InMemoryPaymentDetailsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPaymentDetailsStore")
            .field("sessions", &self.entries().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CardDetails {
        CardDetails::new("4444333322221111", "09", "2099", "123", None).unwrap()
    }

    #[test]
    fn test_take_removes_details() {
        let store = InMemoryPaymentDetailsStore::new();
        store.store("session-1", card());
        assert!(store.peek_exists("session-1"));
        assert!(store.take("session-1").is_some());
        assert!(!store.peek_exists("session-1"));
        assert!(store.take("session-1").is_none());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = InMemoryPaymentDetailsStore::new();
        store.store("session-1", card());
        assert!(!store.peek_exists("session-2"));
        assert!(!store.remove("session-2"));
        assert!(store.remove("session-1"));
        assert!(!store.peek_exists("session-1"));
    }
}
