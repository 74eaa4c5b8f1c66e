//! Assessments Page
//!
//! Health check list with date/class filters, plus the assessment form.

use ahana::forms::assessment::{self, AssessmentForm, ORAL_HEALTH_OPTIONS};
use ahana::listing::{filter_rows, FilterDraft, ListState, PendingDelete, ScrollWindow, SearchBox, DEFAULT_PAGE_SIZE};
use ahana::model::{Assessment, AssessmentQuery, Member};
use ahana::services::assessments;
use ahana::ValidationErrors;
use leptos::*;

use crate::api;
use crate::components::{
    bind, error_for, options, ConfirmDialog, Field, ListSkeleton, SearchBar, SelectField, StudentPicker, TextArea,
};
use crate::state::global::use_global_state;
use crate::state::{fetch_page, grow_window};

const EYE_OPTIONS: [&str; 3] = ["Normal", "Needs Review", "Uses Glasses"];

#[derive(Debug, Clone, Default, PartialEq)]
struct AssessmentFilters {
    class: String,
    section: String,
    from_date: String,
    to_date: String,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn short_date(value: Option<&str>) -> String {
    value.map(|d| d.get(..10).unwrap_or(d).to_string()).unwrap_or_default()
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

#[component]
pub fn Assessments() -> impl IntoView {
    let state = use_global_state();

    let list = create_rw_signal(ListState::<Assessment>::new(DEFAULT_PAGE_SIZE));
    let search = create_rw_signal(SearchBox::default());
    let filters = create_rw_signal(FilterDraft::<AssessmentFilters>::default());
    let quick = create_rw_signal(String::new());
    let window = create_rw_signal(ScrollWindow::default());
    let pending = create_rw_signal(PendingDelete::default());
    let deleting = create_rw_signal(false);
    let editor = create_rw_signal(None::<Option<Assessment>>);

    let load = move |page: u32| {
        let Some(school_id) = state.school_id_untracked() else {
            return;
        };
        if page <= 1 {
            window.update(ScrollWindow::reset);
        }
        let limit = list.with_untracked(|l| l.limit());
        let mut query = AssessmentQuery {
            school_id: Some(school_id),
            search: search.with_untracked(|s| non_empty(s.active())),
            page: Some(page),
            limit: Some(limit),
            ..AssessmentQuery::default()
        };
        filters.with_untracked(|f| {
            let f = f.active();
            query.grade = non_empty(&f.class);
            query.section = non_empty(&f.section);
            query.from_date = non_empty(&f.from_date);
            query.to_date = non_empty(&f.to_date);
        });
        fetch_page(list, page, async move { assessments::list(&api::client(), &query).await });
    };

    create_effect(move |_| {
        if state.school_id().is_some() {
            load(1);
        }
    });

    let run_filters = move |reset: bool| {
        let mut changed = false;
        filters.update(|f| changed = if reset { f.reset() } else { f.apply() });
        if changed {
            load(1);
        }
    };

    let confirm_delete = Callback::new(move |_: ()| {
        let mut target = pending.get_untracked();
        deleting.set(true);
        spawn_local(async move {
            let result = target
                .confirm(|id| async move { assessments::delete(&api::client(), &id).await })
                .await;
            match result {
                Ok(Some(id)) => {
                    list.update(|l| {
                        l.remove_id(&id);
                    });
                    state.show_success("Assessment deleted");
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
            rows[range].iter().map(|a| (*a).clone()).collect::<Vec<_>>()
        })
    };

    let draft_field = move |get: fn(&AssessmentFilters) -> String, set: fn(&mut AssessmentFilters, String)| {
        (
            Signal::derive(move || filters.with(|f| get(&f.draft))),
            Callback::new(move |v: String| filters.update(|f| set(&mut f.draft, v))),
        )
    };
    let (class, set_class) = draft_field(|f| f.class.clone(), |f, v| f.class = v);
    let (section, set_section) = draft_field(|f| f.section.clone(), |f, v| f.section = v);
    let (from, set_from) = draft_field(|f| f.from_date.clone(), |f, v| f.from_date = v);
    let (to, set_to) = draft_field(|f| f.to_date.clone(), |f, v| f.to_date = v);

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Assessments"</h1>
                <button
                    on:click=move |_| editor.set(Some(None))
                    class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
                >
                    "+ New Assessment"
                </button>
            </div>

            <div class="bg-white rounded-xl shadow-sm p-4 space-y-4">
                <SearchBar
                    search=search
                    placeholder="Search by student"
                    on_change=Callback::new(move |_| load(1))
                />
                <div class="grid grid-cols-2 md:grid-cols-6 gap-3 items-end">
                    <Field label="Class" value=class on_input=set_class />
                    <Field label="Section" value=section on_input=set_section />
                    <Field label="From" input_type="date" value=from on_input=set_from />
                    <Field label="To" input_type="date" value=to on_input=set_to />
                    <button
                        on:click=move |_| run_filters(false)
                        class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
                    >
                        "Apply"
                    </button>
                    <button
                        on:click=move |_| run_filters(true)
                        class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                    >
                        "Reset"
                    </button>
                </div>
                <input
                    type="text"
                    placeholder="Filter loaded rows"
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
                        view! { <p class="p-6 text-gray-500">"No assessments found."</p> }.into_view()
                    } else {
                        view! {
                            <table class="w-full text-sm">
                                <thead class="bg-gray-50 text-left text-gray-500 sticky top-0">
                                    <tr>
                                        <th class="px-4 py-2">"Date"</th>
                                        <th class="px-4 py-2">"Student"</th>
                                        <th class="px-4 py-2">"Height"</th>
                                        <th class="px-4 py-2">"Weight"</th>
                                        <th class="px-4 py-2">"BMI"</th>
                                        <th class="px-4 py-2">"BP"</th>
                                        <th class="px-4 py-2">"Oral"</th>
                                        <th class="px-4 py-2"></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {visible().into_iter().map(|a| {
                                        let id = a.id.clone();
                                        let for_edit = a.clone();
                                        let student = a.student_id.name().unwrap_or(a.student_id.id()).to_string();
                                        view! {
                                            <tr class="border-t border-gray-100 hover:bg-gray-50">
                                                <td class="px-4 py-2">{short_date(a.date.as_deref())}</td>
                                                <td class="px-4 py-2 font-medium">{student}</td>
                                                <td class="px-4 py-2">{number(a.height)}</td>
                                                <td class="px-4 py-2">{number(a.weight)}</td>
                                                <td class="px-4 py-2">{number(a.bmi)}</td>
                                                <td class="px-4 py-2">{a.bp.clone().unwrap_or_default()}</td>
                                                <td class="px-4 py-2 capitalize">{a.oral_health.clone().unwrap_or_default()}</td>
                                                <td class="px-4 py-2 text-right space-x-2">
                                                    <button
                                                        on:click=move |_| editor.set(Some(Some(for_edit.clone())))
                                                        class="text-teal-700 hover:underline"
                                                    >
                                                        "Edit"
                                                    </button>
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
                title="Delete assessment"
                message="This assessment will be permanently removed."
                confirm_label="Delete"
                busy=Signal::derive(move || deleting.get())
                on_confirm=confirm_delete
                on_cancel=Callback::new(move |_| pending.update(PendingDelete::cancel))
            />

            {move || editor.get().map(|editing| view! {
                <AssessmentEditor
                    editing=editing
                    on_saved=Callback::new(move |saved: Assessment| {
                        let was_editing = editor.with_untracked(|e| matches!(e, Some(Some(_))));
                        editor.set(None);
                        if was_editing {
                            list.update(|l| l.replace(saved));
                        } else {
                            load(1);
                        }
                    })
                    on_close=Callback::new(move |_| editor.set(None))
                />
            })}
        </div>
    }
}

#[component]
fn AssessmentEditor(
    editing: Option<Assessment>,
    on_saved: Callback<Assessment>,
    on_close: Callback<()>,
) -> impl IntoView {
    let state = use_global_state();

    let title = if editing.is_some() { "Edit Assessment" } else { "New Assessment" };
    let form = create_rw_signal(
        editing
            .as_ref()
            .map(AssessmentForm::from_assessment)
            .unwrap_or_else(AssessmentForm::today),
    );
    let target = store_value(editing.as_ref().map(|a| (a.id.clone(), a.student_id.id().to_string())));
    let student = create_rw_signal(None::<Member>);
    let errors = create_rw_signal(ValidationErrors::new());
    let saving = create_rw_signal(false);

    let on_save = move |_| {
        let current = form.get_untracked();
        let found = current.validate();
        if !found.is_empty() {
            errors.set(found);
            return;
        }
        errors.set(ValidationErrors::new());

        let (editing_id, student_id) = match target.get_value() {
            Some((id, student_id)) => (Some(id), student_id),
            None => match student.get_untracked() {
                Some(m) => (None, m.id),
                None => {
                    state.show_error("Please select a student");
                    return;
                }
            },
        };
        let school_id = state.school_id_untracked();
        saving.set(true);
        spawn_local(async move {
            let result = assessment::save(
                &api::client(),
                &current,
                &student_id,
                school_id.as_deref(),
                editing_id.as_deref(),
            )
            .await;
            match result {
                Ok(saved) => {
                    state.show_success("Assessment saved successfully");
                    on_saved.call(saved);
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

    let (date, set_date) = bind(form, |f| f.date.clone(), |f, v| f.date = v);
    let (parent, set_parent) = bind(form, |f| f.parent_name.clone(), |f, v| f.parent_name = v);
    let (height, set_height) = bind(form, |f| f.height.clone(), |f, v| f.height = v);
    let (weight, set_weight) = bind(form, |f| f.weight.clone(), |f, v| f.weight = v);
    let (bmi, set_bmi) = bind(form, |f| f.bmi.clone(), |f, v| f.bmi = v);
    let (temperature, set_temperature) = bind(form, |f| f.temperature.clone(), |f, v| f.temperature = v);
    let (pulse, set_pulse) = bind(form, |f| f.pulse_rate.clone(), |f, v| f.pulse_rate = v);
    let (spo2, set_spo2) = bind(form, |f| f.sp_o2.clone(), |f, v| f.sp_o2 = v);
    let (bp, set_bp) = bind(form, |f| f.bp.clone(), |f, v| f.bp = v);
    let (oral, set_oral) = bind(form, |f| f.oral_health.clone(), |f, v| f.oral_health = v);
    let (dental, set_dental) = bind(form, |f| f.dental_issues.clone(), |f, v| f.dental_issues = v);
    let (left_eye, set_left_eye) = bind(form, |f| f.left_eye.clone(), |f, v| f.left_eye = v);
    let (right_eye, set_right_eye) = bind(form, |f| f.right_eye.clone(), |f, v| f.right_eye = v);
    let (hearing, set_hearing) = bind(form, |f| f.hearing_comments.clone(), |f, v| f.hearing_comments = v);
    let (comments, set_comments) = bind(form, |f| f.additional_comments.clone(), |f, v| f.additional_comments = v);
    let (signature, set_signature) = bind(form, |f| f.doctor_signature.clone(), |f, v| f.doctor_signature = v);

    let bmi_hint = move || {
        form.with(|f| {
            f.bmi
                .trim()
                .is_empty()
                .then(|| f.effective_bmi())
                .flatten()
                .map(|b| format!("Calculated BMI: {}", b))
        })
    };

    view! {
        <div class="fixed inset-0 z-30 bg-black/40 flex items-start justify-center overflow-auto py-10">
            <div class="bg-white rounded-xl shadow-xl w-full max-w-3xl p-6 space-y-6">
                <div class="flex items-center justify-between">
                    <h2 class="text-xl font-semibold">{title}</h2>
                    <button on:click=move |_| on_close.call(()) class="text-gray-400 hover:text-gray-700">"✕"</button>
                </div>

                {move || match target.get_value() {
                    Some(_) => None,
                    None => Some(view! {
                        <StudentPicker on_select=Callback::new(move |m: Member| student.set(Some(m))) />
                    }),
                }}

                <section class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <Field label="Date" input_type="date" value=date on_input=set_date error=error_for(errors, "date") required=true />
                    <Field label="Parent Name" value=parent on_input=set_parent />
                    <Field label="Height (cm)" value=height on_input=set_height error=error_for(errors, "height") required=true />
                    <Field label="Weight (kg)" value=weight on_input=set_weight error=error_for(errors, "weight") required=true />
                    <div>
                        <Field label="BMI" value=bmi on_input=set_bmi error=error_for(errors, "bmi") />
                        {move || bmi_hint().map(|hint| view! { <p class="text-xs text-gray-500 mt-1">{hint}</p> })}
                    </div>
                    <Field label="Temperature (F)" value=temperature on_input=set_temperature error=error_for(errors, "temperature") required=true />
                    <Field label="Pulse Rate" value=pulse on_input=set_pulse error=error_for(errors, "pulseRate") required=true />
                    <Field label="SpO2" value=spo2 on_input=set_spo2 error=error_for(errors, "spO2") required=true />
                    <Field label="Blood Pressure" value=bp on_input=set_bp error=error_for(errors, "bp") required=true />
                    <SelectField label="Oral Health" options=options(&ORAL_HEALTH_OPTIONS) value=oral on_input=set_oral error=error_for(errors, "oralHealth") required=true />
                    <SelectField label="Left Eye" options=options(&EYE_OPTIONS) value=left_eye on_input=set_left_eye />
                    <SelectField label="Right Eye" options=options(&EYE_OPTIONS) value=right_eye on_input=set_right_eye />
                </section>

                <section class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <TextArea label="Dental Issues" value=dental on_input=set_dental />
                    <TextArea label="Hearing" value=hearing on_input=set_hearing />
                    <TextArea label="Additional Comments" value=comments on_input=set_comments />
                    <Field label="Doctor Signature" value=signature on_input=set_signature />
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
