//! Reports Page
//!
//! Infirmary report with removable filter chips and CSV download.

use ahana::listing::{FilterDraft, SearchBox};
use ahana::reports::{self, ReportFilters, ReportRow};
use leptos::*;

use crate::api;
use crate::components::{Field, ListSkeleton, SearchBar};
use crate::state::global::use_global_state;

fn chip_label(key: &str) -> &'static str {
    match key {
        "class" => "Class",
        "section" => "Section",
        "studentId" => "Student ID",
        "name" => "Name",
        "fromDate" => "From",
        "toDate" => "To",
        _ => "Filter",
    }
}

#[component]
pub fn Reports() -> impl IntoView {
    let state = use_global_state();

    let rows = create_rw_signal(Vec::<ReportRow>::new());
    let loading = create_rw_signal(false);
    let search = create_rw_signal(SearchBox::default());
    let filters = create_rw_signal(FilterDraft::<ReportFilters>::default());
    let show_filters = create_rw_signal(false);

    let load = move || {
        let school_id = state.school_id_untracked();
        let active = filters.with_untracked(|f| f.active().clone());
        let text = search.with_untracked(|s| s.active().to_string());
        loading.set(true);
        spawn_local(async move {
            match reports::fetch(&api::client(), &active, school_id.as_deref(), &text).await {
                Ok(found) => rows.set(found),
                Err(e) => state.show_error(&e.message()),
            }
            loading.set(false);
        });
    };

    create_effect(move |_| {
        if state.school_id().is_some() {
            load();
        }
    });

    let remove_chip = move |key: &'static str| {
        filters.update(|f| {
            f.discard();
            f.draft.clear(key);
            f.apply();
        });
        load();
    };

    let download = move |_| {
        let csv = rows.with_untracked(|r| reports::to_csv(r));
        let result = csv
            .map_err(|e| e.message())
            .and_then(|text| api::download_text("infirmary-report.csv", "text/csv", &text));
        if let Err(message) = result {
            state.show_error(&message);
        }
    };

    let draft_field = move |get: fn(&ReportFilters) -> String, set: fn(&mut ReportFilters, String)| {
        (
            Signal::derive(move || filters.with(|f| get(&f.draft))),
            Callback::new(move |v: String| filters.update(|f| set(&mut f.draft, v))),
        )
    };
    let (class, set_class) = draft_field(|f| f.class.clone(), |f, v| f.class = v);
    let (section, set_section) = draft_field(|f| f.section.clone(), |f, v| f.section = v);
    let (student_id, set_student_id) = draft_field(|f| f.student_id.clone(), |f, v| f.student_id = v);
    let (name, set_name) = draft_field(|f| f.name.clone(), |f, v| f.name = v);
    let (from, set_from) = draft_field(|f| f.from_date.clone(), |f, v| f.from_date = v);
    let (to, set_to) = draft_field(|f| f.to_date.clone(), |f, v| f.to_date = v);

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Reports"</h1>
                <div class="space-x-2">
                    <button
                        on:click=move |_| show_filters.update(|open| *open = !*open)
                        class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                    >
                        "Filters"
                    </button>
                    <button
                        on:click=download
                        disabled=move || rows.with(Vec::is_empty)
                        class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white"
                    >
                        "Download CSV"
                    </button>
                </div>
            </div>

            <div class="bg-white rounded-xl shadow-sm p-4 space-y-4">
                <SearchBar
                    search=search
                    placeholder="Search reports"
                    on_change=Callback::new(move |_| load())
                />

                <Show when=move || show_filters.get()>
                    <div class="grid grid-cols-2 md:grid-cols-3 gap-3">
                        <Field label="Class" value=class on_input=set_class />
                        <Field label="Section" value=section on_input=set_section />
                        <Field label="Student ID" value=student_id on_input=set_student_id />
                        <Field label="Name" value=name on_input=set_name />
                        <Field label="From" input_type="date" value=from on_input=set_from />
                        <Field label="To" input_type="date" value=to on_input=set_to />
                    </div>
                    <div class="flex justify-end space-x-2">
                        <button
                            on:click=move |_| {
                                filters.update(FilterDraft::discard);
                                show_filters.set(false);
                            }
                            class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                        >
                            "Cancel"
                        </button>
                        <button
                            on:click=move |_| {
                                let mut changed = false;
                                filters.update(|f| changed = f.reset());
                                if changed {
                                    load();
                                }
                            }
                            class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                        >
                            "Reset"
                        </button>
                        <button
                            on:click=move |_| {
                                let mut changed = false;
                                filters.update(|f| changed = f.apply());
                                show_filters.set(false);
                                if changed {
                                    load();
                                }
                            }
                            class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
                        >
                            "Apply"
                        </button>
                    </div>
                </Show>

                <div class="flex flex-wrap gap-2">
                    {move || filters.with(|f| {
                        f.active()
                            .active()
                            .into_iter()
                            .map(|(key, value)| {
                                let text = format!("{}: {}", chip_label(key), value);
                                view! {
                                    <span class="inline-flex items-center px-3 py-1 rounded-full bg-teal-50 text-teal-800 text-sm">
                                        {text}
                                        <button on:click=move |_| remove_chip(key) class="ml-2 text-teal-600 hover:text-teal-900">
                                            "×"
                                        </button>
                                    </span>
                                }
                            })
                            .collect_view()
                    })}
                </div>
            </div>

            <div class="bg-white rounded-xl shadow-sm overflow-auto">
                {move || {
                    if loading.get() && rows.with(Vec::is_empty) {
                        return view! { <div class="p-4"><ListSkeleton /></div> }.into_view();
                    }
                    if rows.with(Vec::is_empty) {
                        return view! { <p class="p-6 text-gray-500">"No records match these filters."</p> }.into_view();
                    }
                    view! {
                        <table class="w-full text-sm">
                            <thead class="bg-gray-50 text-left text-gray-500">
                                <tr>
                                    <th class="px-4 py-2">"Date"</th>
                                    <th class="px-4 py-2">"Student"</th>
                                    <th class="px-4 py-2">"Student ID"</th>
                                    <th class="px-4 py-2">"Complaints"</th>
                                    <th class="px-4 py-2">"Consent"</th>
                                    <th class="px-4 py-2">"Treatment"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows.get().into_iter().map(|r| view! {
                                    <tr class="border-t border-gray-100">
                                        <td class="px-4 py-2">{r.date}</td>
                                        <td class="px-4 py-2 font-medium">{r.name}</td>
                                        <td class="px-4 py-2">{r.student_id}</td>
                                        <td class="px-4 py-2">{r.complaints}</td>
                                        <td class="px-4 py-2 capitalize">{r.consent_from}</td>
                                        <td class="px-4 py-2">{r.treatment}</td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view()
                }}
            </div>
        </div>
    }
}
