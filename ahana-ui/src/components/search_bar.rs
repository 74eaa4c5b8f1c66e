//! Search input with explicit Search / Clear buttons

use ahana::listing::SearchBox;
use leptos::*;

/// Calls `on_change` only when the applied search actually changes
#[component]
pub fn SearchBar(
    search: RwSignal<SearchBox>,
    #[prop(default = "Search...")] placeholder: &'static str,
    on_change: Callback<String>,
) -> impl IntoView {
    let apply = move || {
        let mut changed = false;
        search.update(|s| changed = s.search());
        if changed {
            on_change.call(search.with_untracked(|s| s.active().to_string()));
        }
    };
    let clear = move |_| {
        let mut changed = false;
        search.update(|s| changed = s.clear());
        if changed {
            on_change.call(String::new());
        }
    };

    view! {
        <div class="flex space-x-2">
            <input
                type="text"
                placeholder=placeholder
                prop:value=move || search.with(|s| s.input.clone())
                on:input=move |ev| search.update(|s| s.input = event_target_value(&ev))
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        apply();
                    }
                }
                class="flex-1 rounded-lg border border-gray-300 px-3 py-2 focus:border-teal-500 focus:outline-none"
            />
            <button
                on:click=move |_| apply()
                class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
            >
                "Search"
            </button>
            <Show when=move || search.with(|s| !s.active().is_empty())>
                <button
                    on:click=clear
                    class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                >
                    "Clear"
                </button>
            </Show>
        </div>
    }
}
