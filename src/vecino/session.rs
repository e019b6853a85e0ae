//! Client-side session state. The store holds the single authoritative
//! copy of the authenticated identity; the bootstrap hydrates it once at
//! startup from the transport credential. Writers are the bootstrap and
//! the auth flows, everything else reads or subscribes.

use crate::api::{ApiClient, Identity};
use tokio::sync::watch;
use tracing::debug;

/// Resolved session state. `Unknown` covers the window before the
/// bootstrap has answered; being unauthenticated is a terminal state, not
/// an error.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Unknown,
    Anonymous,
    Authenticated(Identity),
}

/// Single-writer store with atomic replace and subscriber notification.
pub struct SessionStore {
    tx: watch::Sender<Session>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::Unknown);
        Self { tx }
    }

    /// Replace the resident identity; `None` resolves to `Anonymous`.
    /// Subscribers observe the new value on their next read.
    pub fn set_identity(&self, identity: Option<Identity>) {
        let session = match identity {
            Some(identity) => Session::Authenticated(identity),
            None => Session::Anonymous,
        };
        self.tx.send_replace(session);
    }

    /// Drop the resident identity, typically on logout.
    pub fn clear(&self) {
        self.set_identity(None);
    }

    #[must_use]
    pub fn state(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// The resident identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        match &*self.tx.borrow() {
            Session::Authenticated(identity) => Some(identity.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.tx.borrow(), Session::Authenticated(_))
    }

    /// True once the bootstrap (or a flow) has produced an answer.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(&*self.tx.borrow(), Session::Unknown)
    }

    /// Watch for session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Hydrate the store from the transport credential. Every failure resolves
/// to `Anonymous`; none is surfaced to the user.
pub async fn bootstrap(api: &ApiClient, store: &SessionStore) {
    match api.fetch_session().await {
        Ok(identity) => store.set_identity(identity),
        Err(err) => {
            debug!("session bootstrap resolved to anonymous: {err}");
            store.set_identity(None);
        }
    }
}
