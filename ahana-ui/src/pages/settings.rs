//! Settings Page

use leptos::*;
use leptos_router::A;

use ahana::routes::Route as AppRoute;

use crate::api;
use crate::state::global::use_global_state;

#[component]
pub fn Settings() -> impl IntoView {
    let state = use_global_state();
    let api_url = create_rw_signal(api::get_api_base());

    let on_save = move |_| {
        api::set_api_base(&api_url.get_untracked());
        api_url.set(api::get_api_base());
        state.show_success("Backend URL saved");
    };

    let on_reset = move |_| {
        api::set_api_base("");
        api_url.set(api::get_api_base());
        state.show_success("Backend URL reset to default");
    };

    view! {
        <div class="max-w-2xl space-y-6">
            <h1 class="text-2xl font-bold">"Settings"</h1>

            <div class="bg-white rounded-xl shadow-sm p-6 space-y-4">
                <h2 class="text-lg font-semibold">"Backend"</h2>
                <label class="block">
                    <span class="block text-sm text-gray-600 mb-1">"API URL"</span>
                    <input
                        type="url"
                        prop:value=move || api_url.get()
                        on:input=move |ev| api_url.set(event_target_value(&ev))
                        class="w-full rounded-lg border border-gray-300 px-3 py-2 focus:border-teal-500 focus:outline-none"
                    />
                </label>
                <p class="text-xs text-gray-500">
                    "Requests go to this address. Leave it on the default to use the portal server."
                </p>
                <div class="flex space-x-3">
                    <button
                        on:click=on_save
                        class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
                    >
                        "Save"
                    </button>
                    <button
                        on:click=on_reset
                        class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                    >
                        "Reset"
                    </button>
                </div>
            </div>

            <div class="bg-white rounded-xl shadow-sm p-6 space-y-2">
                <h2 class="text-lg font-semibold">"Password"</h2>
                <p class="text-sm text-gray-600">
                    "A temporary password will be emailed to you, then you can choose a new one."
                </p>
                <A href=AppRoute::ForgotPassword.path() class="inline-block text-teal-700 hover:underline">
                    "Change password"
                </A>
            </div>
        </div>
    }
}
