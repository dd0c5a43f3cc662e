//! Process-wide default Authorization value.
//!
//! The commerce API authenticates requests with the session token sent
//! verbatim in the `Authorization` header. That token is the one piece of
//! cross-cutting global state in the client, so it lives in a single-writer
//! cell: only the store's session write path may update it (the setter is
//! crate-private), everything else gets read-only access.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};

/// Single-writer cell holding the default Authorization header value.
///
/// Cheaply cloneable; clones share the same cell.
#[derive(Clone, Default)]
pub struct AuthCell {
    inner: Arc<RwLock<Option<SecretString>>>,
}

impl AuthCell {
    /// Create an unarmed cell (no Authorization header sent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cell's value. An empty token disarms the cell.
    ///
    /// This is a single authoritative assignment; values are never merged.
    pub(crate) fn set(&self, token: &str) {
        let next = if token.is_empty() {
            None
        } else {
            Some(SecretString::from(token.to_owned()))
        };
        if let Ok(mut guard) = self.inner.write() {
            *guard = next;
        }
    }

    /// Snapshot the current header value, if armed.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .as_ref()
                    .map(|token| token.expose_secret().to_owned())
            })
            .unwrap_or(None)
    }

    /// Whether a token is currently set.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for AuthCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCell")
            .field("token", &if self.is_armed() { "[REDACTED]" } else { "<unset>" })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let cell = AuthCell::new();
        assert!(!cell.is_armed());
        assert_eq!(cell.header_value(), None);

        cell.set("abc");
        assert!(cell.is_armed());
        assert_eq!(cell.header_value().as_deref(), Some("abc"));

        cell.set("");
        assert!(!cell.is_armed());
        assert_eq!(cell.header_value(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let cell = AuthCell::new();
        let clone = cell.clone();
        cell.set("shared-token");
        assert_eq!(clone.header_value().as_deref(), Some("shared-token"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let cell = AuthCell::new();
        cell.set("super-secret");
        let output = format!("{cell:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("super-secret"));
    }
}
