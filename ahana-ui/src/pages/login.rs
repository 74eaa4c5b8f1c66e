//! Login Page

use ahana::auth_flow::ResetWizard;
use ahana::model::Credentials;
use ahana::services::{auth, LoginOutcome};
use ahana::Route as AppRoute;
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::global::use_global_state;

#[component]
pub fn Login() -> impl IntoView {
    if api::client().session().is_authenticated() {
        return view! { <Redirect path=AppRoute::Dashboard.path() /> }.into_view();
    }

    let state = use_global_state();
    let navigate = use_navigate();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let submitting = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let credentials = Credentials {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };

        submitting.set(true);
        error.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            let client = api::client();
            match auth::login(&client, &credentials).await {
                Ok(LoginOutcome::Authenticated(_)) => {
                    state.nurse.set(None);
                    state.load_nurse();
                    navigate(AppRoute::Dashboard.path(), Default::default());
                }
                Ok(LoginOutcome::PasswordResetRequired { user, token }) => {
                    match ResetWizard::from_login(client.session(), &user.email, &token) {
                        Ok(wizard) => {
                            state.pending_reset.set(Some(wizard));
                            navigate(AppRoute::ForgotPassword.path(), Default::default());
                        }
                        Err(e) => {
                            error.set(Some(e.message()));
                            submitting.set(false);
                        }
                    }
                }
                Err(e) => {
                    error.set(Some(e.message()));
                    submitting.set(false);
                }
            }
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-teal-50">
            <form on:submit=on_submit class="bg-white rounded-xl shadow-lg w-full max-w-sm p-8 space-y-5">
                <div class="text-center">
                    <h1 class="text-2xl font-bold text-teal-700">"Ahana"</h1>
                    <p class="text-gray-500 text-sm">"School Nurse Portal"</p>
                </div>

                {move || error.get().map(|msg| view! {
                    <div class="bg-red-50 text-red-700 text-sm rounded-lg px-3 py-2">{msg}</div>
                })}

                <label class="block">
                    <span class="block text-sm text-gray-600 mb-1">"Email"</span>
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                        class="w-full rounded-lg border border-gray-300 px-3 py-2 focus:border-teal-500 focus:outline-none"
                    />
                </label>
                <label class="block">
                    <span class="block text-sm text-gray-600 mb-1">"Password"</span>
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                        class="w-full rounded-lg border border-gray-300 px-3 py-2 focus:border-teal-500 focus:outline-none"
                    />
                </label>

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white rounded-lg py-2.5 font-semibold"
                >
                    {move || if submitting.get() { "Signing in..." } else { "Sign In" }}
                </button>

                <div class="text-center">
                    <A href=AppRoute::ForgotPassword.path() class="text-sm text-teal-700 hover:underline">
                        "Forgot password?"
                    </A>
                </div>
            </form>
        </div>
    }
    .into_view()
}
