//! Labelled form inputs bound to a field of a form struct

use ahana::ValidationErrors;
use leptos::*;

/// Read/write handles for one `String` field of a form held in a signal
pub fn bind<F: 'static>(
    form: RwSignal<F>,
    get: fn(&F) -> String,
    set: fn(&mut F, String),
) -> (Signal<String>, Callback<String>) {
    (
        Signal::derive(move || form.with(get)),
        Callback::new(move |value: String| form.update(|f| set(f, value))),
    )
}

/// Message for one field of a validation result
pub fn error_for(errors: RwSignal<ValidationErrors>, field: &'static str) -> Signal<Option<String>> {
    Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
}

const INPUT_CLASS: &str =
    "w-full rounded-lg border border-gray-300 px-3 py-2 focus:border-teal-500 focus:outline-none";

#[component]
fn FieldError(error: Option<Signal<Option<String>>>) -> impl IntoView {
    move || {
        error
            .and_then(|e| e.get())
            .map(|msg| view! { <p class="text-xs text-red-600 mt-1">{msg}</p> })
    }
}

#[component]
pub fn Field(
    label: &'static str,
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] error: Option<Signal<Option<String>>>,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-600 mb-1">
                {label}
                {required.then_some(view! { <span class="text-red-500">" *"</span> })}
            </span>
            <input
                type=input_type
                prop:value=move || value.get()
                on:input=move |ev| on_input.call(event_target_value(&ev))
                class=INPUT_CLASS
            />
            <FieldError error=error />
        </label>
    }
}

#[component]
pub fn SelectField(
    label: &'static str,
    #[prop(into)] options: MaybeSignal<Vec<String>>,
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional)] error: Option<Signal<Option<String>>>,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-600 mb-1">
                {label}
                {required.then_some(view! { <span class="text-red-500">" *"</span> })}
            </span>
            <select
                on:change=move |ev| on_input.call(event_target_value(&ev))
                class=INPUT_CLASS
            >
                <option value="" selected=move || value.get().is_empty()>"Select"</option>
                {move || options.get().into_iter().map(|opt| {
                    let selected = opt.clone();
                    view! {
                        <option value=opt.clone() selected=move || value.get() == selected>{opt}</option>
                    }
                }).collect_view()}
            </select>
            <FieldError error=error />
        </label>
    }
}

#[component]
pub fn TextArea(
    label: &'static str,
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional)] error: Option<Signal<Option<String>>>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-600 mb-1">{label}</span>
            <textarea
                rows="3"
                prop:value=move || value.get()
                on:input=move |ev| on_input.call(event_target_value(&ev))
                class=INPUT_CLASS
            />
            <FieldError error=error />
        </label>
    }
}

/// Static option list from string literals
pub fn options(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
