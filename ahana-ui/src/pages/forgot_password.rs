//! Forgot Password Page
//!
//! Drives the three-step reset wizard. A forced reset from the login page
//! arrives through global state already at the last step.

use ahana::auth_flow::{ResetWizard, WizardStep};
use ahana::Route as AppRoute;
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::ConfirmDialog;
use crate::state::global::use_global_state;

#[derive(Clone, Copy)]
enum Action {
    SendTempPassword,
    Verify,
    SetPassword,
}

#[component]
pub fn ForgotPassword() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let initial = state
        .pending_reset
        .try_update(Option::take)
        .flatten()
        .unwrap_or_default();
    let wizard = create_rw_signal(initial);
    let busy = create_rw_signal(false);

    on_cleanup(|| {
        if let Err(e) = api::client().session().clear_temp_flow() {
            web_sys::console::error_1(&format!("Failed to clear reset state: {}", e).into());
        }
    });

    create_effect(move |_| {
        if wizard.with(|w| w.completed) {
            if let Some(msg) = wizard.with_untracked(|w| w.success.clone()) {
                state.show_success(&msg);
            }
            navigate(AppRoute::Login.path(), Default::default());
        }
    });

    let run = move |action: Action| {
        busy.set(true);
        spawn_local(async move {
            let client = api::client();
            let mut w = wizard.get_untracked();
            // Outcome is recorded on the wizard itself
            let _ = match action {
                Action::SendTempPassword => w.confirm_request(&client).await,
                Action::Verify => w.verify(&client).await,
                Action::SetPassword => w.set_password(&client).await,
            };
            wizard.update(|live| live.absorb_outcome(w));
            busy.set(false);
        });
    };

    let step = move || wizard.with(|w| w.step);

    view! {
        <div class="min-h-screen flex items-center justify-center bg-teal-50">
            <div class="bg-white rounded-xl shadow-lg w-full max-w-md p-8 space-y-5">
                <div>
                    <p class="text-xs text-gray-400">{move || format!("Step {} of 3", step().number())}</p>
                    <h1 class="text-xl font-bold text-gray-800">{move || step().title()}</h1>
                </div>

                {move || wizard.with(|w| w.error.clone()).map(|msg| view! {
                    <div class="bg-red-50 text-red-700 text-sm rounded-lg px-3 py-2">{msg}</div>
                })}
                {move || wizard.with(|w| w.success.clone()).map(|msg| view! {
                    <div class="bg-green-50 text-green-700 text-sm rounded-lg px-3 py-2">{msg}</div>
                })}

                {move || match step() {
                    WizardStep::Request => view! {
                        <WizardInput
                            label="Email"
                            input_type="email"
                            value=Signal::derive(move || wizard.with(|w| w.email.clone()))
                            on_input=Callback::new(move |v| wizard.update(|w| w.email = v))
                        />
                        <button
                            on:click=move |_| wizard.update(|w| { let _ = w.submit_request(); })
                            disabled=move || busy.get()
                            class="w-full bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white rounded-lg py-2.5 font-semibold"
                        >
                            "Send Temporary Password"
                        </button>
                    }.into_view(),
                    WizardStep::Verify => view! {
                        <WizardInput
                            label="Temporary Password"
                            input_type="password"
                            value=Signal::derive(move || wizard.with(|w| w.temp_password.clone()))
                            on_input=Callback::new(move |v| wizard.update(|w| w.temp_password = v))
                        />
                        <button
                            on:click=move |_| run(Action::Verify)
                            disabled=move || busy.get()
                            class="w-full bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white rounded-lg py-2.5 font-semibold"
                        >
                            "Verify"
                        </button>
                        <button
                            on:click=move |_| run(Action::SendTempPassword)
                            disabled=move || busy.get()
                            class="w-full text-sm text-teal-700 hover:underline"
                        >
                            "Resend temporary password"
                        </button>
                    }.into_view(),
                    WizardStep::SetPassword => view! {
                        <WizardInput
                            label="New Password"
                            input_type="password"
                            value=Signal::derive(move || wizard.with(|w| w.new_password.clone()))
                            on_input=Callback::new(move |v| wizard.update(|w| w.new_password = v))
                        />
                        <WizardInput
                            label="Confirm Password"
                            input_type="password"
                            value=Signal::derive(move || wizard.with(|w| w.confirm_password.clone()))
                            on_input=Callback::new(move |v| wizard.update(|w| w.confirm_password = v))
                        />
                        <button
                            on:click=move |_| run(Action::SetPassword)
                            disabled=move || busy.get()
                            class="w-full bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white rounded-lg py-2.5 font-semibold"
                        >
                            "Set Password"
                        </button>
                    }.into_view(),
                }}

                <div class="text-center">
                    <A href=AppRoute::Login.path() class="text-sm text-teal-700 hover:underline">
                        "Back to login"
                    </A>
                </div>
            </div>

            <ConfirmDialog
                open=Signal::derive(move || wizard.with(|w| w.confirm_pending))
                title="Send temporary password?"
                message="A temporary password will be emailed to you."
                confirm_label="Send"
                busy=busy
                on_confirm=Callback::new(move |_| run(Action::SendTempPassword))
                on_cancel=Callback::new(move |_| wizard.update(ResetWizard::cancel_request))
            />
        </div>
    }
}

#[component]
fn WizardInput(
    label: &'static str,
    input_type: &'static str,
    value: Signal<String>,
    on_input: Callback<String>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-600 mb-1">{label}</span>
            <input
                type=input_type
                prop:value=move || value.get()
                on:input=move |ev| on_input.call(event_target_value(&ev))
                class="w-full rounded-lg border border-gray-300 px-3 py-2 focus:border-teal-500 focus:outline-none"
            />
        </label>
    }
}
