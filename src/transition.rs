//! Page transition state and its observable store.
//!
//! The store records *what* is happening during a transition. Timing lives in
//! [`crate::choreography`], which drives the store through its phases.

use std::sync::Arc;

use tokio::sync::watch;

/// Sub-state of an in-progress transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransitionPhase {
    /// No overlay visible
    #[default]
    Idle,
    /// Overlay is covering the viewport
    Entering,
    /// Overlay is revealing the new page
    Exiting,
}

/// Which choreography the current transition follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransitionKind {
    /// One-time application startup load
    #[default]
    Initial,
    /// Route change after startup
    Navigation,
}

/// Snapshot of the page transition state.
///
/// `is_transitioning` is true exactly when `phase` is not `Idle`, and
/// `target_url` is only set while a navigation is in flight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionState {
    pub is_transitioning: bool,
    pub phase: TransitionPhase,
    pub kind: TransitionKind,
    pub target_url: Option<String>,
    pub is_initial_load_complete: bool,
}

/// Shared, observable page transition state.
///
/// Cloning the store yields another handle to the same state. Every mutation
/// goes through one of the transition operations; each returns `true` when
/// applied and `false` (with a logged warning) when the call is out of
/// sequence, in which case the state is untouched. [`reset`](Self::reset) is
/// the one escape hatch back to idle.
///
/// ## Example
///
/// ```rust
/// use ascii_stage::{TransitionKind, TransitionPhase, TransitionStore};
///
/// let store = TransitionStore::new();
/// assert!(store.start_transition("/about"));
///
/// let state = store.state();
/// assert!(state.is_transitioning);
/// assert_eq!(state.phase, TransitionPhase::Entering);
/// assert_eq!(state.kind, TransitionKind::Navigation);
/// assert_eq!(state.target_url.as_deref(), Some("/about"));
///
/// assert!(store.complete_enter());
/// assert!(store.complete_transition());
/// assert_eq!(store.state().phase, TransitionPhase::Idle);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionStore {
    tx: Arc<watch::Sender<TransitionState>>,
}

impl Default for TransitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionStore {
    /// Create a store in the idle state with the initial load pending.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TransitionState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Current state snapshot.
    pub fn state(&self) -> TransitionState {
        self.tx.borrow().clone()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<TransitionState> {
        self.tx.subscribe()
    }

    #[inline]
    pub fn phase(&self) -> TransitionPhase {
        self.tx.borrow().phase
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.tx.borrow().is_transitioning
    }

    #[inline]
    pub fn is_initial_load_complete(&self) -> bool {
        self.tx.borrow().is_initial_load_complete
    }

    /// Begin the startup overlay.
    ///
    /// Rejected once the initial load has completed, so the startup
    /// choreography runs at most once per store.
    pub fn start_initial_load(&self) -> bool {
        self.apply("start_initial_load", |state| {
            if state.is_initial_load_complete || state.phase != TransitionPhase::Idle {
                return false;
            }
            state.is_transitioning = true;
            state.phase = TransitionPhase::Entering;
            state.kind = TransitionKind::Initial;
            true
        })
    }

    /// Begin a navigation transition towards `url`.
    ///
    /// Ignored while another transition is in flight.
    pub fn start_transition(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        self.apply("start_transition", move |state| {
            if state.phase != TransitionPhase::Idle {
                return false;
            }
            state.is_transitioning = true;
            state.phase = TransitionPhase::Entering;
            state.kind = TransitionKind::Navigation;
            state.target_url = Some(url);
            true
        })
    }

    /// The overlay fully covers the viewport; start revealing.
    pub fn complete_enter(&self) -> bool {
        self.apply("complete_enter", |state| {
            if state.phase != TransitionPhase::Entering {
                return false;
            }
            state.phase = TransitionPhase::Exiting;
            true
        })
    }

    /// Like [`complete_enter`](Self::complete_enter), but only applies to the
    /// startup overlay. A navigation in flight is left untouched.
    pub fn complete_initial_enter(&self) -> bool {
        self.apply("complete_initial_enter", |state| {
            if state.phase != TransitionPhase::Entering || state.kind != TransitionKind::Initial {
                return false;
            }
            state.phase = TransitionPhase::Exiting;
            true
        })
    }

    /// Drop any in-flight transition and return to idle.
    ///
    /// Startup completion is kept as it was. Returns `false` when already
    /// idle.
    pub fn reset(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if state.phase == TransitionPhase::Idle {
                return false;
            }
            tracing::debug!(from = ?state.phase, kind = ?state.kind, "transition reset");
            state.is_transitioning = false;
            state.phase = TransitionPhase::Idle;
            state.target_url = None;
            true
        })
    }

    /// The reveal has finished; return to idle.
    ///
    /// Finishing an `Initial` transition marks the initial load complete.
    pub fn complete_transition(&self) -> bool {
        self.apply("complete_transition", |state| {
            if state.phase != TransitionPhase::Exiting {
                return false;
            }
            state.is_transitioning = false;
            state.phase = TransitionPhase::Idle;
            state.target_url = None;
            if state.kind == TransitionKind::Initial {
                state.is_initial_load_complete = true;
            }
            true
        })
    }

    fn apply(&self, action: &'static str, transition: impl FnOnce(&mut TransitionState) -> bool) -> bool {
        let mut rejected_in = None;
        let applied = self.tx.send_if_modified(|state| {
            let from = state.phase;
            if transition(state) {
                tracing::debug!(action, ?from, to = ?state.phase, kind = ?state.kind, "transition");
                true
            } else {
                rejected_in = Some(from);
                false
            }
        });

        if let Some(phase) = rejected_in {
            let state = self.tx.borrow();
            tracing::warn!(
                action,
                ?phase,
                initial_load_complete = state.is_initial_load_complete,
                "ignoring out-of-sequence transition"
            );
        }
        applied
    }
}
