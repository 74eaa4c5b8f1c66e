//! Infirmary Page
//!
//! Visit log for the school and the form for recording a new visit,
//! including medicine drawn from inventory.

use ahana::forms::infirmary::{self, tablet_options, InfirmaryForm, COMPLAINT_OPTIONS, CONSENT_OPTIONS, OTHER_COMPLAINT};
use ahana::listing::{filter_rows, ListState, PendingDelete, ScrollWindow, SearchBox, DEFAULT_PAGE_SIZE};
use ahana::model::{InfirmaryQuery, InfirmaryRecord, InventoryItem, InventoryQuery, Member};
use ahana::services::{infirmary as visits, inventory};
use ahana::ValidationErrors;
use leptos::*;

use crate::api;
use crate::components::{
    bind, error_for, options, ConfirmDialog, Field, ListSkeleton, SearchBar, SelectField, StudentPicker, TextArea,
};
use crate::state::global::use_global_state;
use crate::state::{fetch_page, grow_window};

fn short_date(value: Option<&str>) -> String {
    value.map(|d| d.get(..10).unwrap_or(d).to_string()).unwrap_or_default()
}

#[component]
pub fn Infirmary() -> impl IntoView {
    let state = use_global_state();

    let list = create_rw_signal(ListState::<InfirmaryRecord>::new(DEFAULT_PAGE_SIZE));
    let search = create_rw_signal(SearchBox::default());
    let quick = create_rw_signal(String::new());
    let window = create_rw_signal(ScrollWindow::default());
    let pending = create_rw_signal(PendingDelete::default());
    let deleting = create_rw_signal(false);
    let adding = create_rw_signal(false);

    let load = move |page: u32| {
        let Some(school_id) = state.school_id_untracked() else {
            return;
        };
        if page <= 1 {
            window.update(ScrollWindow::reset);
        }
        let query = InfirmaryQuery {
            school_id: Some(school_id),
            search: search.with_untracked(|s| {
                let active = s.active().trim();
                (!active.is_empty()).then(|| active.to_string())
            }),
            page,
            limit: list.with_untracked(|l| l.limit()),
            ..InfirmaryQuery::default()
        };
        fetch_page(list, page, async move { visits::list(&api::client(), &query).await });
    };

    create_effect(move |_| {
        if state.school_id().is_some() {
            load(1);
        }
    });

    let confirm_delete = Callback::new(move |_: ()| {
        let mut target = pending.get_untracked();
        deleting.set(true);
        spawn_local(async move {
            let result = target
                .confirm(|id| async move { visits::delete(&api::client(), &id).await })
                .await;
            match result {
                Ok(Some(id)) => {
                    list.update(|l| {
                        l.remove_id(&id);
                    });
                    state.show_success("Infirmary record deleted");
                }
                Ok(None) => {}
                Err(e) => state.show_error(&e.message()),
            }
            pending.set(target);
            deleting.set(false);
        });
    });

    let visible = move || {
        list.with(|l| {
            let rows = filter_rows(l.rows(), &quick.get());
            let range = window.with(|w| w.range(rows.len()));
            rows[range].iter().map(|r| (*r).clone()).collect::<Vec<_>>()
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Infirmary"</h1>
                <button
                    on:click=move |_| adding.set(true)
                    class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
                >
                    "+ Record Visit"
                </button>
            </div>

            <div class="bg-white rounded-xl shadow-sm p-4 space-y-3">
                <SearchBar
                    search=search
                    placeholder="Search visits"
                    on_change=Callback::new(move |_| load(1))
                />
                <input
                    type="text"
                    placeholder="Filter loaded rows by student or complaint"
                    prop:value=move || quick.get()
                    on:input=move |ev| quick.set(event_target_value(&ev))
                    class="w-full rounded-lg border border-gray-200 px-3 py-2 text-sm"
                />
            </div>

            {move || list.with(|l| l.error().map(str::to_string)).map(|msg| view! {
                <div class="bg-red-50 text-red-700 rounded-lg px-4 py-3">{msg}</div>
            })}

            <div
                class="bg-white rounded-xl shadow-sm max-h-[60vh] overflow-auto"
                on:scroll=move |ev| {
                    let total = list.with_untracked(|l| l.rows().len());
                    grow_window(&ev, window, total);
                }
            >
                {move || {
                    let (loading, empty) = list.with(|l| (l.is_loading(), l.is_empty()));
                    if loading && empty {
                        view! { <div class="p-4"><ListSkeleton /></div> }.into_view()
                    } else if empty {
                        view! { <p class="p-6 text-gray-500">"No infirmary visits recorded."</p> }.into_view()
                    } else {
                        view! {
                            <table class="w-full text-sm">
                                <thead class="bg-gray-50 text-left text-gray-500 sticky top-0">
                                    <tr>
                                        <th class="px-4 py-2">"Date"</th>
                                        <th class="px-4 py-2">"Time"</th>
                                        <th class="px-4 py-2">"Student"</th>
                                        <th class="px-4 py-2">"Complaint"</th>
                                        <th class="px-4 py-2">"Treatment"</th>
                                        <th class="px-4 py-2">"Medicine"</th>
                                        <th class="px-4 py-2"></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {visible().into_iter().map(|r| {
                                        let id = r.id.clone();
                                        let student = r.student_id.name().unwrap_or(r.student_id.id()).to_string();
                                        let medicine = r.medicine_provided.as_ref().map(|m| {
                                            format!("{} x {}", m.inventory_id.name().unwrap_or(m.inventory_id.id()), m.quantity)
                                        });
                                        view! {
                                            <tr class="border-t border-gray-100 hover:bg-gray-50">
                                                <td class="px-4 py-2">{short_date(r.date.as_deref())}</td>
                                                <td class="px-4 py-2">{r.time.clone().unwrap_or_default()}</td>
                                                <td class="px-4 py-2 font-medium">{student}</td>
                                                <td class="px-4 py-2">{r.complaints.clone().unwrap_or_default()}</td>
                                                <td class="px-4 py-2">{r.treatment_given.clone().unwrap_or_default()}</td>
                                                <td class="px-4 py-2">{medicine.unwrap_or_else(|| "-".into())}</td>
                                                <td class="px-4 py-2 text-right">
                                                    <button
                                                        on:click=move |_| pending.update(|p| p.request(id.clone()))
                                                        class="text-red-600 hover:underline"
                                                    >
                                                        "Delete"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }).collect_view()}
                                </tbody>
                            </table>
                        }.into_view()
                    }
                }}
            </div>

            {move || list.with(|l| l.next_page()).map(|page| view! {
                <div class="text-center">
                    <button
                        on:click=move |_| load(page)
                        class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                    >
                        "Load more"
                    </button>
                </div>
            })}

            <ConfirmDialog
                open=Signal::derive(move || pending.with(PendingDelete::is_open))
                title="Delete infirmary record"
                message="This visit will be permanently removed."
                confirm_label="Delete"
                busy=Signal::derive(move || deleting.get())
                on_confirm=confirm_delete
                on_cancel=Callback::new(move |_| pending.update(PendingDelete::cancel))
            />

            <Show when=move || adding.get()>
                <VisitEditor
                    on_saved=Callback::new(move |_: InfirmaryRecord| {
                        adding.set(false);
                        load(1);
                    })
                    on_close=Callback::new(move |_| adding.set(false))
                />
            </Show>
        </div>
    }
}

#[component]
fn VisitEditor(on_saved: Callback<InfirmaryRecord>, on_close: Callback<()>) -> impl IntoView {
    let state = use_global_state();

    let form = create_rw_signal(InfirmaryForm::now());
    let student = create_rw_signal(None::<Member>);
    let stock = create_rw_signal(Vec::<InventoryItem>::new());
    let errors = create_rw_signal(ValidationErrors::new());
    let saving = create_rw_signal(false);

    let school_id = state.school_id_untracked();
    spawn_local(async move {
        let query = InventoryQuery {
            school_id,
            ..InventoryQuery::default()
        };
        match inventory::list(&api::client(), &query).await {
            Ok(items) => stock.set(items),
            Err(e) => web_sys::console::error_1(&format!("Failed to load inventory: {}", e).into()),
        }
    });

    let on_save = move |_| {
        let current = form.get_untracked();
        let Some(picked) = student.get_untracked() else {
            state.show_error("Please select a student");
            return;
        };
        let Some(nurse) = state.nurse.get_untracked() else {
            state.show_error("Nurse profile is still loading");
            return;
        };
        errors.set(ValidationErrors::new());
        saving.set(true);
        spawn_local(async move {
            match infirmary::submit(&api::client(), &current, &picked.id, &nurse).await {
                Ok(record) => {
                    state.show_success("Infirmary visit recorded");
                    on_saved.call(record);
                }
                Err(e) => {
                    if let Some(fields) = e.field_errors() {
                        errors.set(fields.clone());
                    }
                    state.show_error(&e.message());
                    saving.set(false);
                }
            }
        });
    };

    let (consent, set_consent) = bind(form, |f| f.consent_from.clone(), |f, v| f.consent_from = v);
    let (date, set_date) = bind(form, |f| f.consent_date.clone(), |f, v| f.consent_date = v);
    let (time, set_time) = bind(form, |f| f.consent_time.clone(), |f, v| f.consent_time = v);
    let (complaint, set_complaint) = bind(form, |f| f.complaints.clone(), |f, v| f.complaints = v);
    let (other, set_other) = bind(form, |f| f.other_complaint.clone(), |f, v| f.other_complaint = v);
    let (details, set_details) = bind(form, |f| f.details.clone(), |f, v| f.details = v);
    let (treatment, set_treatment) = bind(form, |f| f.treatment.clone(), |f, v| f.treatment = v);
    let (quantity, set_quantity) = bind(form, |f| f.quantity.clone(), |f, v| f.quantity = v);

    view! {
        <div class="fixed inset-0 z-30 bg-black/40 flex items-start justify-center overflow-auto py-10">
            <div class="bg-white rounded-xl shadow-xl w-full max-w-2xl p-6 space-y-6">
                <div class="flex items-center justify-between">
                    <h2 class="text-xl font-semibold">"Record Infirmary Visit"</h2>
                    <button on:click=move |_| on_close.call(()) class="text-gray-400 hover:text-gray-700">"✕"</button>
                </div>

                <StudentPicker on_select=Callback::new(move |m: Member| student.set(Some(m))) />

                <section class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <SelectField label="Consent From" options=options(&CONSENT_OPTIONS) value=consent on_input=set_consent error=error_for(errors, "consentFrom") required=true />
                    <Field label="Date" input_type="date" value=date on_input=set_date error=error_for(errors, "date") required=true />
                    <Field label="Time" input_type="time" value=time on_input=set_time />
                </section>

                <section class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <SelectField label="Complaint" options=options(&COMPLAINT_OPTIONS) value=complaint on_input=set_complaint error=error_for(errors, "complaints") required=true />
                    <Show when=move || form.with(|f| f.complaints == OTHER_COMPLAINT)>
                        <Field label="Describe Complaint" value=other on_input=set_other />
                    </Show>
                </section>

                <section class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <TextArea label="Details" value=details on_input=set_details />
                    <TextArea label="Treatment Given" value=treatment on_input=set_treatment />
                </section>

                <section class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <label class="block">
                        <span class="block text-sm text-gray-600 mb-1">"Tablet"</span>
                        <select
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.tablet = (!value.is_empty()).then_some(value));
                            }
                            class="w-full rounded-lg border border-gray-300 px-3 py-2"
                        >
                            <option value="">"None"</option>
                            {move || stock.with(|items| {
                                tablet_options(items)
                                    .into_iter()
                                    .map(|item| view! { <option value=item.id.clone()>{item.picker_label()}</option> })
                                    .collect_view()
                            })}
                        </select>
                        {move || errors.with(|e| e.get("tablet").map(str::to_string)).map(|msg| view! {
                            <p class="text-xs text-red-600 mt-1">{msg}</p>
                        })}
                    </label>
                    <Field label="Quantity" value=quantity on_input=set_quantity error=error_for(errors, "quantity") />
                </section>

                <div class="flex justify-end space-x-3">
                    <button
                        on:click=move |_| on_close.call(())
                        class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                    >
                        "Cancel"
                    </button>
                    <button
                        on:click=on_save
                        disabled=move || saving.get()
                        class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white"
                    >
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
