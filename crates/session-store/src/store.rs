//! Process-wide session state container.
//!
//! One [`SessionStore`] exists per running app instance. It owns the only
//! mutable copy of the session; consumers read cloned snapshots and branch on
//! [`SessionPhase`]. Every mutation goes through a store method, which drives
//! the FSM, writes the persisted envelope through the storage adapter, and
//! notifies the registered observer.

use crate::fsm::{SessionMachine, SessionMachineInput, SessionPhase};
use crate::{AuthApi, KeyValueStorage, SessionStorage, StoreError, StoreResult, UserProfile};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Key of the session envelope in general storage.
pub const SESSION_STORE_KEY: &str = "auth-session";

/// Version stamp written into the persisted envelope.
pub const ENVELOPE_VERSION: u32 = 1;

/// In-memory session state.
///
/// `is_authenticated == true` implies `user` is present. The access token is
/// held only here, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Profile of the signed-in user, if any.
    pub user: Option<UserProfile>,
    /// Short-lived credential authorizing API calls. Memory only.
    pub access_token: Option<String>,
    /// Long-lived credential used for silent refresh.
    pub refresh_token: Option<String>,
    /// Whether a session is currently established.
    pub is_authenticated: bool,
}

/// The subset of [`Session`] that is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    /// Persisted user profile; lets the UI render the account immediately
    /// after a successful silent refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    /// Authentication flag as of the last write.
    pub is_authenticated: bool,
    /// Refresh credential. Stripped by the storage adapter before the
    /// envelope reaches plain storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Envelope written to storage under [`SESSION_STORE_KEY`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnvelope {
    /// The persisted session fields.
    pub state: PersistedState,
    /// Envelope format version.
    pub version: u32,
}

/// Callback type for session change notifications.
pub type SessionChangedCallback = Box<dyn Fn(&Session) + Send + Sync>;

/// Single state container for the authenticated session.
pub struct SessionStore {
    storage: SessionStorage,
    state: Mutex<Session>,
    /// Internal FSM for tracking session transitions.
    fsm: Mutex<SessionMachine>,
    /// Set once the app-start restore has settled, success or not.
    hydrated: AtomicBool,
    /// Optional callback for change notifications.
    observer: Mutex<Option<SessionChangedCallback>>,
}

impl SessionStore {
    /// Create a new store over the composed storage adapter.
    ///
    /// The store starts in the Hydrating phase; callers run
    /// [`hydrate_from_refresh_token`](Self::hydrate_from_refresh_token) once
    /// before first render.
    pub fn new(storage: SessionStorage) -> Self {
        Self {
            storage,
            state: Mutex::new(Session::default()),
            fsm: Mutex::new(SessionMachine::new()),
            hydrated: AtomicBool::new(false),
            observer: Mutex::new(None),
        }
    }

    /// Set a callback to be notified whenever the session changes.
    pub fn set_observer(&self, callback: SessionChangedCallback) {
        *self.observer.lock().unwrap() = Some(callback);
    }

    /// Current phase of the session machine.
    pub fn phase(&self) -> SessionPhase {
        SessionPhase::from(self.fsm.lock().unwrap().state())
    }

    /// Whether the app-start restore has completed. Consumers must observe
    /// this before trusting [`is_authenticated`](Self::is_authenticated).
    pub fn has_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::SeqCst)
    }

    /// Immutable snapshot of the session.
    pub fn snapshot(&self) -> Session {
        self.state.lock().unwrap().clone()
    }

    /// Whether a session is currently established.
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().is_authenticated
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.state.lock().unwrap().access_token.clone()
    }

    /// Current user profile, if any.
    pub fn user(&self) -> Option<UserProfile> {
        self.state.lock().unwrap().user.clone()
    }

    /// Establish a session from values already obtained by a successful auth
    /// exchange.
    ///
    /// Pure state assignment plus write-through persistence; no network call
    /// happens here. Valid while hydrating or unauthenticated.
    pub fn login(
        &self,
        user: UserProfile,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> StoreResult<()> {
        self.transition(&SessionMachineInput::LoginSucceeded)?;

        let snapshot = self.apply(|s| {
            s.user = Some(user);
            s.access_token = Some(access_token.into());
            s.refresh_token = refresh_token;
            s.is_authenticated = true;
        });
        self.persist(&snapshot)?;

        info!(
            user_id = %snapshot.user.as_ref().map(|u| u.id.as_str()).unwrap_or_default(),
            "Session established"
        );
        self.notify(&snapshot);
        Ok(())
    }

    /// Invalidate the session and delete all persisted state, vault included.
    ///
    /// Safe to call from any phase, any number of times.
    pub fn logout(&self) -> StoreResult<()> {
        self.transition(&SessionMachineInput::LoggedOut)?;

        // Memory is cleared first so a storage failure can never leave the
        // user looking authenticated.
        let snapshot = self.apply(|s| *s = Session::default());
        self.storage.remove_item(SESSION_STORE_KEY)?;

        info!("Session cleared");
        self.notify(&snapshot);
        Ok(())
    }

    /// Replace the access credential after a mid-session silent refresh.
    ///
    /// Only valid while authenticated; reasserts the authentication flag.
    /// The access token is never persisted, so no storage write happens.
    pub fn update_access_token(&self, token: impl Into<String>) -> StoreResult<()> {
        self.transition(&SessionMachineInput::AccessTokenRotated)?;

        let snapshot = self.apply(|s| {
            s.access_token = Some(token.into());
            s.is_authenticated = true;
        });

        debug!("Access token updated");
        self.notify(&snapshot);
        Ok(())
    }

    /// App-start restore: exchange the persisted refresh credential for a
    /// fresh session.
    ///
    /// - No stored credential: clears stale storage and settles
    ///   Unauthenticated without touching the network.
    /// - Exchange success: adopts the returned user/tokens; a rotated refresh
    ///   credential replaces the stored one before hydration completes.
    /// - Exchange failure: wipes memory, storage, and vault, then settles
    ///   Unauthenticated. No retry; the user re-authenticates interactively.
    ///
    /// Runs at most once; later calls return immediately.
    pub async fn hydrate_from_refresh_token(&self, api: &dyn AuthApi) -> StoreResult<()> {
        if self.has_hydrated() {
            debug!("Hydration already completed, skipping");
            return Ok(());
        }
        if !self.phase().is_hydrating() {
            // An interactive login settled the session before hydration ran.
            debug!(phase = ?self.phase(), "Session already settled, skipping hydration");
            self.hydrated.store(true, Ordering::SeqCst);
            return Ok(());
        }

        let result = self.try_hydrate(api).await;
        if result.is_err() && self.phase().is_hydrating() {
            // A storage failure mid-restore must still settle the phase.
            let _ = self.transition(&SessionMachineInput::RestoreFailed);
        }
        // The restore has completed even when it failed; consumers may now
        // trust the authentication flag.
        self.hydrated.store(true, Ordering::SeqCst);
        result
    }

    async fn try_hydrate(&self, api: &dyn AuthApi) -> StoreResult<()> {
        let refresh_token = self
            .read_persisted()?
            .and_then(|persisted| persisted.refresh_token);

        let Some(refresh_token) = refresh_token else {
            debug!("No stored refresh credential, settling unauthenticated");
            self.storage.remove_item(SESSION_STORE_KEY)?;
            let snapshot = self.apply(|s| *s = Session::default());
            self.transition(&SessionMachineInput::RestoreFailed)?;
            self.notify(&snapshot);
            return Ok(());
        };

        match api.refresh_session(&refresh_token).await {
            Ok(payload) => {
                // Rotation: a credential in the response replaces the stored
                // one; otherwise the existing credential stays valid.
                let rotated = payload.refresh_token.unwrap_or(refresh_token);
                let snapshot = self.apply(|s| {
                    s.user = Some(payload.user);
                    s.access_token = Some(payload.access_token);
                    s.refresh_token = Some(rotated);
                    s.is_authenticated = true;
                });
                self.transition(&SessionMachineInput::RestoreSucceeded)?;
                self.persist(&snapshot)?;

                info!(
                    user_id = %snapshot.user.as_ref().map(|u| u.id.as_str()).unwrap_or_default(),
                    "Session restored from refresh credential"
                );
                self.notify(&snapshot);
            }
            Err(err) => {
                warn!(error = %err, "Silent refresh failed, clearing session");
                let snapshot = self.apply(|s| *s = Session::default());
                self.storage.remove_item(SESSION_STORE_KEY)?;
                self.transition(&SessionMachineInput::RestoreFailed)?;
                self.notify(&snapshot);
            }
        }

        Ok(())
    }

    /// Drive the FSM, logging phase changes.
    fn transition(&self, input: &SessionMachineInput) -> StoreResult<SessionPhase> {
        let mut fsm = self.fsm.lock().unwrap();
        let old_phase = SessionPhase::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            StoreError::Transition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_phase = SessionPhase::from(fsm.state());
        drop(fsm);

        if old_phase != new_phase {
            debug!(old_phase = ?old_phase, new_phase = ?new_phase, "Session phase transition");
        }

        Ok(new_phase)
    }

    fn apply<F: FnOnce(&mut Session)>(&self, mutate: F) -> Session {
        let mut state = self.state.lock().unwrap();
        mutate(&mut state);
        state.clone()
    }

    fn notify(&self, snapshot: &Session) {
        if let Some(callback) = self.observer.lock().unwrap().as_ref() {
            callback(snapshot);
        }
    }

    /// Write the persisted subset of `snapshot` as a single envelope.
    fn persist(&self, snapshot: &Session) -> StoreResult<()> {
        let envelope = SessionEnvelope {
            state: PersistedState {
                user: snapshot.user.clone(),
                is_authenticated: snapshot.is_authenticated,
                refresh_token: snapshot.refresh_token.clone(),
            },
            version: ENVELOPE_VERSION,
        };
        let raw = serde_json::to_string(&envelope)?;
        self.storage.set_item(SESSION_STORE_KEY, &raw)
    }

    /// Read the persisted state, downgrading a malformed envelope to absence.
    fn read_persisted(&self) -> StoreResult<Option<PersistedState>> {
        let Some(raw) = self.storage.get_item(SESSION_STORE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<SessionEnvelope>(&raw) {
            Ok(envelope) => Ok(Some(envelope.state)),
            Err(err) => {
                warn!(error = %err, "Malformed persisted session, treating as absent");
                Ok(None)
            }
        }
    }
}
