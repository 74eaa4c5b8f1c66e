//! Global Application State
//!
//! The signed-in nurse and toast messages, shared through context.

use ahana::auth_flow::ResetWizard;
use ahana::services::{auth, nurses};
use ahana::session::NurseSession;
use leptos::*;

use crate::api;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Nurse profile for the signed-in user, with their school
    pub nurse: RwSignal<Option<NurseSession>>,
    /// A nurse lookup is in flight
    pub nurse_loading: RwSignal<bool>,
    /// Wizard handed from the login page to the reset page
    pub pending_reset: RwSignal<Option<ResetWizard>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        nurse: create_rw_signal(None),
        nurse_loading: create_rw_signal(false),
        pending_reset: create_rw_signal(None),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

pub fn use_global_state() -> GlobalState {
    expect_context::<GlobalState>()
}

impl GlobalState {
    /// Resolve the nurse for the stored user, once per sign-in
    pub fn load_nurse(&self) {
        if self.nurse.get_untracked().is_some() || self.nurse_loading.get_untracked() {
            return;
        }
        self.nurse_loading.set(true);

        let state = *self;
        spawn_local(async move {
            match nurses::current_session(&api::client()).await {
                Ok(nurse) => state.nurse.set(nurse),
                Err(e) => state.show_error(&e.message()),
            }
            state.nurse_loading.set(false);
        });
    }

    /// School of the signed-in nurse, once known
    pub fn school_id(&self) -> Option<String> {
        self.nurse
            .with(|n| n.as_ref().and_then(|n| n.school_id().map(str::to_string)))
    }

    /// Same, without subscribing the caller
    pub fn school_id_untracked(&self) -> Option<String> {
        self.nurse
            .with_untracked(|n| n.as_ref().and_then(|n| n.school_id().map(str::to_string)))
    }

    pub fn logout(&self) {
        if let Err(e) = auth::logout(&api::client()) {
            self.show_error(&e.message());
        }
        self.nurse.set(None);
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
