//! Search-as-you-type student chooser used by the add forms

use ahana::model::{Member, MemberQuery};
use ahana::services::members;
use gloo_timers::callback::Timeout;
use leptos::*;

use crate::api;
use crate::state::global::use_global_state;

const DEBOUNCE_MS: u32 = 300;

#[component]
pub fn StudentPicker(on_select: Callback<Member>) -> impl IntoView {
    let state = use_global_state();
    let query = create_rw_signal(String::new());
    let results = create_rw_signal(Vec::<Member>::new());
    let chosen = create_rw_signal(None::<Member>);
    let pending = store_value(None::<Timeout>);

    let lookup = move |text: String| {
        let Some(school_id) = state.school_id_untracked() else {
            return;
        };
        if text.trim().is_empty() {
            results.set(Vec::new());
            return;
        }
        let mut q = MemberQuery::students(&school_id, 1, 10);
        q.search = Some(text.trim().to_string());
        spawn_local(async move {
            match members::list(&api::client(), &q).await {
                Ok(found) => results.set(found),
                Err(e) => web_sys::console::error_1(&format!("Student search failed: {}", e).into()),
            }
        });
    };

    let on_input = move |ev| {
        let text = event_target_value(&ev);
        query.set(text.clone());
        chosen.set(None);
        // Replacing the handle drops (cancels) the previous timer
        pending.set_value(Some(Timeout::new(DEBOUNCE_MS, move || lookup(text))));
    };

    view! {
        <div class="relative">
            <span class="block text-sm text-gray-600 mb-1">"Student" <span class="text-red-500">" *"</span></span>
            <input
                type="text"
                placeholder="Search by name or ID"
                prop:value=move || query.get()
                on:input=on_input
                class="w-full rounded-lg border border-gray-300 px-3 py-2 focus:border-teal-500 focus:outline-none"
            />
            <Show when=move || chosen.with(Option::is_none) && results.with(|r| !r.is_empty())>
                <ul class="absolute z-40 mt-1 w-full bg-white border border-gray-200 rounded-lg shadow max-h-60 overflow-auto">
                    {move || results.get().into_iter().map(|m| {
                        let picked = m.clone();
                        view! {
                            <li
                                on:click=move |_| {
                                    query.set(picked.name.clone());
                                    chosen.set(Some(picked.clone()));
                                    on_select.call(picked.clone());
                                }
                                class="px-3 py-2 hover:bg-teal-50 cursor-pointer text-sm"
                            >
                                <span class="font-medium">{m.name.clone()}</span>
                                <span class="text-gray-500">
                                    {format!(" · {} · {} {}", m.display_id(), m.grade().unwrap_or("-"), m.section().unwrap_or(""))}
                                </span>
                            </li>
                        }
                    }).collect_view()}
                </ul>
            </Show>
        </div>
    }
}
