//! Session state machine using rust-fsm.
//!
//! The session has exactly three resting/entry states; every store operation
//! is a transition on this machine rather than an ad-hoc flag flip.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │    Hydrating    │ (initial, app start)
//! └────────┬────────┘
//!          │ RestoreSucceeded / LoginSucceeded     RestoreFailed / LoggedOut
//!          ▼                                                │
//! ┌─────────────────┐        LoggedOut          ┌───────────▼─────┐
//! │  Authenticated  │ ────────────────────────► │ Unauthenticated │
//! └────────┬────────┘                           └────────┬────────┘
//!          │ AccessTokenRotated (self)                   │ LoginSucceeded
//!          ▼                                             ▼
//!     Authenticated                                Authenticated
//! ```

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro.
// This generates a module `session_machine` with:
// - session_machine::State (enum)
// - session_machine::Input (enum)
// - session_machine::StateMachine (type alias)
// - session_machine::Impl (trait impl)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Hydrating)

    Hydrating => {
        RestoreSucceeded => Authenticated,
        RestoreFailed => Unauthenticated,
        LoginSucceeded => Authenticated,
        LoggedOut => Unauthenticated
    },
    Unauthenticated => {
        LoginSucceeded => Authenticated,
        LoggedOut => Unauthenticated
    },
    Authenticated => {
        AccessTokenRotated => Authenticated,
        LoggedOut => Unauthenticated
    }
}

// Re-export the generated types with clearer names
pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Consumer-facing view of the session state.
///
/// Navigation and screens branch on this; they must also check
/// [`crate::SessionStore::has_hydrated`] before trusting it at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// App-start restore is still in flight.
    Hydrating,
    /// A session has been established and not yet invalidated.
    Authenticated,
    /// No valid session.
    Unauthenticated,
}

impl SessionPhase {
    /// Returns true if a session is currently established.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionPhase::Authenticated)
    }

    /// Returns true while the app-start restore has not settled.
    pub fn is_hydrating(&self) -> bool {
        matches!(self, SessionPhase::Hydrating)
    }
}

impl From<&SessionMachineState> for SessionPhase {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Hydrating => SessionPhase::Hydrating,
            SessionMachineState::Authenticated => SessionPhase::Authenticated,
            SessionMachineState::Unauthenticated => SessionPhase::Unauthenticated,
        }
    }
}
