//! Identity-resolution session.
//!
//! [`SessionController`] owns the lifecycle `Empty → Resolving →
//! Resolved | Failed`, the current [`Identity`], and the fetched completed
//! list. It drives the [`CatalogSource`] and [`IdentityStore`] ports and
//! exposes a [`SessionSnapshot`] for presentation surfaces.
//!
//! At most one catalog operation is in flight at a time; a second `submit`
//! or `refresh_list` while one is pending is rejected. `clear` advances a
//! generation counter, and any result that settles under an older generation
//! is dropped so a late response cannot resurrect a cleared session.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::ports::{CatalogSource, IdentityStore};
use super::{
    CatalogEntry, Identity, MismatchView, Notice, NoticeSeverity, SessionError, project,
};

/// Where the session is in its resolution lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No identity has been resolved.
    Empty,
    /// A username lookup is in flight.
    Resolving,
    /// An identity is resolved; its list may be loading.
    Resolved,
    /// The last lookup failed.
    Failed,
}

/// Outcome of a session operation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The result was applied to the session.
    Applied,
    /// Another operation was in flight; nothing happened.
    Rejected,
    /// The session was cleared while the request was pending; the result was
    /// dropped.
    Discarded,
}

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Lifecycle state.
    pub state: SessionState,
    /// Last resolved identity, or the empty identity.
    pub identity: Identity,
    /// Username typed by the user, not yet submitted.
    pub pending_username: String,
    /// Current completed-list entries.
    pub entries: Vec<CatalogEntry>,
    /// Whether a catalog request is in flight.
    pub loading: bool,
    /// Most recent user-visible error.
    pub notice: Option<Notice>,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    identity: Identity,
    pending_username: String,
    entries: Vec<CatalogEntry>,
    in_flight: bool,
    generation: u64,
    notice: Option<Notice>,
}

impl SessionInner {
    fn record(&mut self, error: &SessionError) {
        self.notice = Some(error.to_notice());
    }

    /// Add `error` to a notice raised earlier in the same operation.
    fn append(&mut self, error: &SessionError) {
        let incoming = error.to_notice();
        self.notice = Some(match self.notice.take() {
            Some(earlier) => Notice {
                severity: if earlier.severity == NoticeSeverity::Hard {
                    NoticeSeverity::Hard
                } else {
                    incoming.severity
                },
                message: format!("{}; {}", earlier.message, incoming.message),
            },
            None => incoming,
        });
    }
}

/// Session state machine over the catalog and identity-store ports.
pub struct SessionController {
    source: Arc<dyn CatalogSource>,
    store: Arc<dyn IdentityStore>,
    inner: Mutex<SessionInner>,
}

impl SessionController {
    /// Build a session from the stored identity without touching the network.
    ///
    /// A stored, resolved identity starts the session in
    /// [`SessionState::Resolved`]; otherwise it starts [`SessionState::Empty`].
    pub fn new(source: Arc<dyn CatalogSource>, store: Arc<dyn IdentityStore>) -> Self {
        let identity = store.load();
        let state = if identity.is_resolved() {
            SessionState::Resolved
        } else {
            SessionState::Empty
        };
        debug!(?state, username = %identity.username, "session initialised from store");

        Self {
            source,
            store,
            inner: Mutex::new(SessionInner {
                state,
                pending_username: identity.username.clone(),
                identity,
                entries: Vec::new(),
                in_flight: false,
                generation: 0,
                notice: None,
            }),
        }
    }

    /// Build a session and, when a stored identity exists, fetch its list.
    ///
    /// A failed startup fetch is kept as a transient notice in the snapshot.
    ///
    /// ```rust,ignore
    /// let session = SessionController::start(source, store).await;
    /// let view = session.view()?;
    /// ```
    pub async fn start(source: Arc<dyn CatalogSource>, store: Arc<dyn IdentityStore>) -> Self {
        let session = Self::new(source, store);
        let resolved = session
            .lock()
            .map(|inner| inner.identity.is_resolved())
            .unwrap_or(false);
        if resolved {
            if let Err(error) = session.refresh_list().await {
                debug!(%error, "startup list fetch failed");
            }
        }
        session
    }

    /// Update the pending username. Never changes state or fetches.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StateUnavailable`] if the state lock is poisoned.
    pub fn set_identity_input(&self, username: impl Into<String>) -> Result<(), SessionError> {
        self.lock()?.pending_username = username.into();
        Ok(())
    }

    /// Resolve the pending username, persist it, then fetch its list.
    ///
    /// Returns [`Transition::Rejected`] when another operation is in flight.
    /// A failed list fetch after a successful lookup is not an error here; it
    /// is recorded as a transient notice.
    ///
    /// # Errors
    ///
    /// Lookup failures (`UserNotFound`, `Transport`, `MalformedResponse`) move
    /// the session to [`SessionState::Failed`] and are returned.
    pub async fn submit(&self) -> Result<Transition, SessionError> {
        let (username, generation) = {
            let mut inner = self.lock()?;
            if inner.in_flight {
                debug!("submit ignored: catalog request already in flight");
                return Ok(Transition::Rejected);
            }
            inner.in_flight = true;
            inner.state = SessionState::Resolving;
            inner.entries.clear();
            inner.notice = None;
            (inner.pending_username.clone(), inner.generation)
        };

        info!(username = %username, "resolving catalog user");
        let lookup = self.source.resolve_user(&username).await;

        let identity = {
            let mut inner = self.lock()?;
            if inner.generation != generation {
                info!(username = %username, "discarding lookup that settled after clear");
                return Ok(Transition::Discarded);
            }

            let resolved = lookup.map_err(SessionError::from).and_then(|user| {
                Identity::resolved(username.clone(), user.user_id, user.accent_color).ok_or_else(
                    || SessionError::UserNotFound {
                        username: username.clone(),
                    },
                )
            });
            let identity = match resolved {
                Ok(identity) => identity,
                Err(error) => {
                    warn!(%error, username = %username, "username lookup failed");
                    inner.state = SessionState::Failed;
                    inner.in_flight = false;
                    inner.record(&error);
                    return Err(error);
                }
            };
            info!(
                username = %identity.username,
                user_id = identity.user_id,
                accent = %identity.accent_color,
                "catalog user resolved"
            );
            inner.identity = identity.clone();
            inner.state = SessionState::Resolved;

            // Saved under the state lock: clear() cannot run between the
            // generation check and the write.
            if let Err(store_error) = self.store.save(&identity) {
                let error = SessionError::from(store_error);
                warn!(%error, "resolved identity was not persisted");
                inner.record(&error);
            }
            identity
        };

        if let Err(error) = self.run_list_fetch(identity, generation).await {
            debug!(%error, "list fetch after lookup failed");
        }
        Ok(Transition::Applied)
    }

    /// Re-fetch the completed list for the resolved identity.
    ///
    /// On success the entry set is replaced wholesale. On failure the previous
    /// entries stay and the error is downgraded to
    /// [`SessionError::QuietFetchFailure`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoIdentity`] without a resolved identity, or
    /// [`SessionError::QuietFetchFailure`] when the fetch fails.
    pub async fn refresh_list(&self) -> Result<Transition, SessionError> {
        let (identity, generation) = {
            let mut inner = self.lock()?;
            if !inner.identity.is_resolved() {
                let error = SessionError::NoIdentity;
                inner.record(&error);
                return Err(error);
            }
            if inner.in_flight {
                debug!("refresh ignored: catalog request already in flight");
                return Ok(Transition::Rejected);
            }
            inner.in_flight = true;
            inner.notice = None;
            (inner.identity.clone(), inner.generation)
        };
        self.run_list_fetch(identity, generation).await
    }

    /// Forget the identity: wipe the store and reset the session to `Empty`.
    ///
    /// Any request still in flight is orphaned; its result will be discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Persistence`] if the store could not be wiped.
    /// The in-memory session is reset regardless.
    pub fn clear(&self) -> Result<(), SessionError> {
        {
            let mut inner = self.lock()?;
            inner.generation = inner.generation.wrapping_add(1);
            inner.state = SessionState::Empty;
            inner.identity = Identity::empty();
            inner.pending_username.clear();
            inner.entries.clear();
            inner.in_flight = false;
            inner.notice = None;
        }
        info!("session cleared");

        self.store.clear().map_err(|store_error| {
            let error = SessionError::from(store_error);
            warn!(%error, "stored identity was not wiped");
            if let Ok(mut inner) = self.lock() {
                inner.record(&error);
            }
            error
        })
    }

    /// Copy the current session state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StateUnavailable`] if the state lock is poisoned.
    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let inner = self.lock()?;
        Ok(SessionSnapshot {
            state: inner.state,
            identity: inner.identity.clone(),
            pending_username: inner.pending_username.clone(),
            entries: inner.entries.clone(),
            loading: inner.in_flight,
            notice: inner.notice.clone(),
        })
    }

    /// Project the current entries into the mismatch view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StateUnavailable`] if the state lock is poisoned.
    pub fn view(&self) -> Result<MismatchView, SessionError> {
        Ok(project(&self.lock()?.entries))
    }

    async fn run_list_fetch(
        &self,
        identity: Identity,
        generation: u64,
    ) -> Result<Transition, SessionError> {
        debug!(username = %identity.username, user_id = identity.user_id, "fetching completed list");
        let fetched = self
            .source
            .fetch_completed_list(&identity.username, identity.user_id)
            .await;

        let mut inner = self.lock()?;
        if inner.generation != generation {
            info!(username = %identity.username, "discarding list that settled after clear");
            return Ok(Transition::Discarded);
        }
        inner.in_flight = false;
        match fetched {
            Ok(entries) => {
                info!(count = entries.len(), "completed list replaced");
                inner.entries = entries;
                Ok(Transition::Applied)
            }
            Err(source_error) => {
                let error = SessionError::quiet(&source_error);
                warn!(%error, "keeping previous completed list");
                inner.append(&error);
                Err(error)
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionInner>, SessionError> {
        self.inner
            .lock()
            .map_err(|_| SessionError::state_unavailable())
    }
}
