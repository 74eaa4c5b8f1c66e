//! Confirmation modal used before deletes and the temporary-password email

use leptos::*;

#[component]
pub fn ConfirmDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(default = "Confirm")] confirm_label: &'static str,
    #[prop(into, optional)] busy: MaybeSignal<bool>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="fixed inset-0 z-40 bg-black/40 flex items-center justify-center">
                <div class="bg-white rounded-xl shadow-xl w-full max-w-md p-6">
                    <h3 class="text-lg font-semibold mb-2">{title.clone()}</h3>
                    <p class="text-gray-600 mb-6">{message.clone()}</p>
                    <div class="flex justify-end space-x-3">
                        <button
                            on:click=move |_| on_cancel.call(())
                            disabled=move || busy.get()
                            class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                        >
                            "Cancel"
                        </button>
                        <button
                            on:click=move |_| on_confirm.call(())
                            disabled=move || busy.get()
                            class="px-4 py-2 rounded-lg bg-red-600 hover:bg-red-700 disabled:bg-gray-400 text-white"
                        >
                            {move || if busy.get() { "Please wait..." } else { confirm_label }}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
