//! Students Page
//!
//! School roster with server search, class/section filters, a quick filter
//! over loaded rows, and the add/edit form.

use ahana::forms::student::{self, StudentForm};
use ahana::forms::{digits_only, is_pin_code, sanitize_mobile_input};
use ahana::listing::{filter_rows, FilterDraft, ListState, ScrollWindow, SearchBox, DEFAULT_PAGE_SIZE};
use ahana::model::member::{BLOOD_GROUPS, GUARDIAN_RELATIONS};
use ahana::error::ClientResult;
use ahana::model::{Member, MemberQuery, School};
use ahana::services::members::StudentHistory;
use ahana::services::{common, media, members, schools};
use ahana::ValidationErrors;
use leptos::*;

use crate::api;
use crate::components::{bind, error_for, options, Field, ListSkeleton, SearchBar, SelectField};
use crate::state::global::use_global_state;
use crate::state::{fetch_page, grow_window};

const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

#[derive(Debug, Clone, Default, PartialEq)]
struct StudentFilters {
    class: String,
    section: String,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[component]
pub fn Students() -> impl IntoView {
    let state = use_global_state();

    let list = create_rw_signal(ListState::<Member>::new(DEFAULT_PAGE_SIZE));
    let search = create_rw_signal(SearchBox::default());
    let filters = create_rw_signal(FilterDraft::<StudentFilters>::default());
    let quick = create_rw_signal(String::new());
    let window = create_rw_signal(ScrollWindow::default());
    let school = create_rw_signal(None::<School>);
    // Some(None) while adding, Some(Some(member)) while editing
    let editor = create_rw_signal(None::<Option<Member>>);
    let selected = create_rw_signal(None::<Member>);

    let load = move |page: u32| {
        let Some(school_id) = state.school_id_untracked() else {
            return;
        };
        if page <= 1 {
            window.update(ScrollWindow::reset);
        }
        let mut query = MemberQuery::students(&school_id, page, list.with_untracked(|l| l.limit()));
        query.search = search.with_untracked(|s| non_empty(s.active()));
        filters.with_untracked(|f| {
            query.grade = non_empty(&f.active().class);
            query.section = non_empty(&f.active().section);
        });
        fetch_page(list, page, async move { members::list(&api::client(), &query).await });
    };

    create_effect(move |_| {
        let Some(school_id) = state.school_id() else {
            return;
        };
        load(1);
        spawn_local(async move {
            match schools::get(&api::client(), &school_id).await {
                Ok(s) => school.set(Some(s)),
                Err(e) => web_sys::console::error_1(&format!("Failed to fetch school: {}", e).into()),
            }
        });
    });

    let class_options = Signal::derive(move || {
        school.with(|s| {
            s.as_ref()
                .map(|s| s.classes().into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        })
    });
    let draft_sections = Signal::derive(move || {
        let class = filters.with(|f| f.draft.class.clone());
        school.with(|s| {
            s.as_ref()
                .map(|s| s.sections(&class).into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        })
    });

    let visible = move || {
        list.with(|l| {
            let query = quick.get();
            let rows = filter_rows(l.rows(), &query);
            let range = window.with(|w| w.range(rows.len()));
            rows[range].iter().map(|m| (*m).clone()).collect::<Vec<_>>()
        })
    };

    let on_saved = Callback::new(move |member: Member| {
        let was_editing = editor.with_untracked(|e| matches!(e, Some(Some(_))));
        editor.set(None);
        if was_editing {
            list.update(|l| l.replace(member.clone()));
            if selected.with_untracked(|s| s.as_ref().is_some_and(|s| s.id == member.id)) {
                selected.set(Some(member));
            }
        } else {
            load(1);
        }
    });

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Students"</h1>
                <button
                    on:click=move |_| editor.set(Some(None))
                    class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
                >
                    "+ Add Student"
                </button>
            </div>

            <div class="bg-white rounded-xl shadow-sm p-4 space-y-4">
                <SearchBar
                    search=search
                    placeholder="Search students"
                    on_change=Callback::new(move |_| load(1))
                />
                <div class="grid grid-cols-2 md:grid-cols-4 gap-3 items-end">
                    <SelectField
                        label="Class"
                        options=class_options
                        value=Signal::derive(move || filters.with(|f| f.draft.class.clone()))
                        on_input=Callback::new(move |v| filters.update(|f| {
                            f.draft.class = v;
                            f.draft.section.clear();
                        }))
                    />
                    <SelectField
                        label="Section"
                        options=draft_sections
                        value=Signal::derive(move || filters.with(|f| f.draft.section.clone()))
                        on_input=Callback::new(move |v| filters.update(|f| f.draft.section = v))
                    />
                    <button
                        on:click=move |_| {
                            let mut changed = false;
                            filters.update(|f| changed = f.apply());
                            if changed {
                                load(1);
                            }
                        }
                        class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
                    >
                        "Apply"
                    </button>
                    <button
                        on:click=move |_| {
                            let mut changed = false;
                            filters.update(|f| changed = f.reset());
                            if changed {
                                load(1);
                            }
                        }
                        class="px-4 py-2 rounded-lg border border-gray-300 hover:bg-gray-100"
                    >
                        "Reset"
                    </button>
                </div>
                <input
                    type="text"
                    placeholder="Filter loaded rows by name, ID or mobile"
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
                        view! { <p class="p-6 text-gray-500">"No students found."</p> }.into_view()
                    } else {
                        view! {
                            <table class="w-full text-sm">
                                <thead class="bg-gray-50 text-left text-gray-500 sticky top-0">
                                    <tr>
                                        <th class="px-4 py-2">"ID"</th>
                                        <th class="px-4 py-2">"Name"</th>
                                        <th class="px-4 py-2">"Class"</th>
                                        <th class="px-4 py-2">"Section"</th>
                                        <th class="px-4 py-2">"Mobile"</th>
                                        <th class="px-4 py-2">"Blood Group"</th>
                                        <th class="px-4 py-2"></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {visible().into_iter().map(|m| {
                                        let for_view = m.clone();
                                        let for_edit = m.clone();
                                        view! {
                                            <tr class="border-t border-gray-100 hover:bg-gray-50">
                                                <td class="px-4 py-2 text-gray-500">{m.display_id().to_string()}</td>
                                                <td class="px-4 py-2 font-medium">{m.name.clone()}</td>
                                                <td class="px-4 py-2">{m.grade().unwrap_or("-").to_string()}</td>
                                                <td class="px-4 py-2">{m.section().unwrap_or("-").to_string()}</td>
                                                <td class="px-4 py-2">{m.phone.clone().unwrap_or_default()}</td>
                                                <td class="px-4 py-2">{m.blood_group.clone().unwrap_or_default()}</td>
                                                <td class="px-4 py-2 text-right space-x-2">
                                                    <button
                                                        on:click=move |_| selected.set(Some(for_view.clone()))
                                                        class="text-teal-700 hover:underline"
                                                    >
                                                        "View"
                                                    </button>
                                                    <button
                                                        on:click=move |_| editor.set(Some(Some(for_edit.clone())))
                                                        class="text-teal-700 hover:underline"
                                                    >
                                                        "Edit"
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

            {move || selected.get().map(|member| view! {
                <StudentDetail
                    member=member
                    on_close=Callback::new(move |_| selected.set(None))
                />
            })}

            {move || editor.get().map(|editing| view! {
                <StudentEditor
                    school=school
                    editing=editing
                    on_saved=on_saved
                    on_close=Callback::new(move |_| editor.set(None))
                />
            })}
        </div>
    }
}

#[component]
fn StudentEditor(
    school: RwSignal<Option<School>>,
    editing: Option<Member>,
    on_saved: Callback<Member>,
    on_close: Callback<()>,
) -> impl IntoView {
    let state = use_global_state();

    let title = if editing.is_some() { "Edit Student" } else { "Add Student" };
    let form = create_rw_signal(editing.as_ref().map(StudentForm::from_member).unwrap_or_default());
    let editing_id = store_value(editing.map(|m| m.id));
    let errors = create_rw_signal(ValidationErrors::new());
    let saving = create_rw_signal(false);
    let uploading = create_rw_signal(false);

    // Fill region and state once a full PIN has been typed
    create_effect(move |previous: Option<String>| {
        let pin = form.with(|f| f.address.pin_code.clone());
        if previous.is_some_and(|p| p != pin) && is_pin_code(&pin) {
            let lookup_pin = pin.clone();
            spawn_local(async move {
                match common::pincode(&api::client(), &lookup_pin).await {
                    Ok(lookup) => {
                        form.update(|f| f.apply_pincode(&lookup));
                        errors.update(|e| e.clear_field("pinCode"));
                    }
                    Err(e) => errors.update(|errs| errs.add("pinCode", e.message())),
                }
            });
        }
        pin
    });

    let section_options = Signal::derive(move || {
        let class = form.with(|f| f.class.clone());
        school.with(|s| {
            s.as_ref()
                .map(|s| s.sections(&class).into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        })
    });
    let class_options = Signal::derive(move || {
        school.with(|s| {
            s.as_ref()
                .map(|s| s.classes().into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        })
    });

    let on_picture = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        uploading.set(true);
        spawn_local(async move {
            if let Some((name, content_type, bytes)) = api::read_picked_file(&input).await {
                match media::upload(&api::client(), &name, &content_type, bytes).await {
                    Ok(uploaded) => form.update(|f| f.profile_pic = uploaded.url),
                    Err(e) => state.show_error(&e.message()),
                }
            }
            uploading.set(false);
        });
    };

    let on_save = move |_| {
        let current = form.get_untracked();
        let found = current.validate();
        if !found.is_empty() {
            errors.set(found);
            return;
        }
        errors.set(ValidationErrors::new());

        let Some(school_id) = state.school_id_untracked() else {
            state.show_error("No school is linked to this nurse");
            return;
        };
        let editing_id = editing_id.get_value();
        saving.set(true);
        spawn_local(async move {
            match student::save(&api::client(), &current, &school_id, editing_id.as_deref()).await {
                Ok(member) => {
                    state.show_success(if editing_id.is_some() {
                        "Student updated successfully"
                    } else {
                        "Student added successfully"
                    });
                    on_saved.call(member);
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

    let (name, set_name) = bind(form, |f| f.name.clone(), |f, v| f.name = v);
    let (dob, set_dob) = bind(form, |f| f.date_of_birth.clone(), |f, v| f.date_of_birth = v);
    let (gender, set_gender) = bind(form, |f| f.gender.clone(), |f, v| f.gender = v);
    let (mobile, set_mobile) = bind(form, |f| f.mobile.clone(), |f, v| f.mobile = sanitize_mobile_input(&v));
    let (alt_mobile, set_alt_mobile) = bind(
        form,
        |f| f.alternate_mobile.clone(),
        |f, v| f.alternate_mobile = sanitize_mobile_input(&v),
    );
    let (email, set_email) = bind(form, |f| f.email.clone(), |f, v| f.email = v);
    let (class, set_class) = bind(form, |f| f.class.clone(), |f, v| {
        f.class = v;
        f.section.clear();
    });
    let (section, set_section) = bind(form, |f| f.section.clone(), |f, v| f.section = v);
    let (blood, set_blood) = bind(form, |f| f.blood_group.clone(), |f, v| f.blood_group = v);
    let (height, set_height) = bind(form, |f| f.height_in_ft.clone(), |f, v| f.height_in_ft = v);
    let (weight, set_weight) = bind(form, |f| f.weight_in_kg.clone(), |f, v| f.weight_in_kg = v);
    let (guardian, set_guardian) = bind(form, |f| f.guardian_name.clone(), |f, v| f.guardian_name = v);
    let (guardian_mobile, set_guardian_mobile) = bind(
        form,
        |f| f.guardian_mobile.clone(),
        |f, v| f.guardian_mobile = sanitize_mobile_input(&v),
    );
    let (relation, set_relation) = bind(form, |f| f.guardian_relation.clone(), |f, v| f.guardian_relation = v);
    let (address, set_address) = bind(form, |f| f.address.description.clone(), |f, v| f.address.description = v);
    let (pin, set_pin) = bind(
        form,
        |f| f.address.pin_code.clone(),
        |f, v| f.address.pin_code = digits_only(&v).chars().take(6).collect(),
    );
    let (landmark, set_landmark) = bind(form, |f| f.address.landmark.clone(), |f, v| f.address.landmark = v);
    let (region, set_region) = bind(form, |f| f.address.region.clone(), |f, v| f.address.region = v);
    let (addr_state, set_addr_state) = bind(form, |f| f.address.state.clone(), |f, v| f.address.state = v);

    view! {
        <div class="fixed inset-0 z-30 bg-black/40 flex items-start justify-center overflow-auto py-10">
            <div class="bg-white rounded-xl shadow-xl w-full max-w-3xl p-6 space-y-6">
                <div class="flex items-center justify-between">
                    <h2 class="text-xl font-semibold">{title}</h2>
                    <button on:click=move |_| on_close.call(()) class="text-gray-400 hover:text-gray-700">"✕"</button>
                </div>

                <section class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <Field label="Name" value=name on_input=set_name error=error_for(errors, "name") required=true />
                    <Field label="Date of Birth" input_type="date" value=dob on_input=set_dob error=error_for(errors, "dateOfBirth") required=true />
                    <SelectField label="Gender" options=options(&GENDERS) value=gender on_input=set_gender error=error_for(errors, "gender") required=true />
                    <SelectField label="Blood Group" options=options(&BLOOD_GROUPS) value=blood on_input=set_blood error=error_for(errors, "bloodGroup") required=true />
                    <Field label="Mobile" input_type="tel" value=mobile on_input=set_mobile error=error_for(errors, "mobile") required=true />
                    <Field label="Alternate Mobile" input_type="tel" value=alt_mobile on_input=set_alt_mobile error=error_for(errors, "alternateMobile") />
                    <Field label="Email" input_type="email" value=email on_input=set_email error=error_for(errors, "email") required=true />
                    <SelectField label="Class" options=class_options value=class on_input=set_class error=error_for(errors, "class") required=true />
                    <SelectField label="Section" options=section_options value=section on_input=set_section error=error_for(errors, "section") required=true />
                    <Field label="Height (ft)" value=height on_input=set_height error=error_for(errors, "heightInFt") />
                    <Field label="Weight (kg)" value=weight on_input=set_weight error=error_for(errors, "weightInKg") />
                </section>

                <section class="space-y-3">
                    <h3 class="font-semibold text-gray-700">"Guardian"</h3>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <Field label="Name" value=guardian on_input=set_guardian />
                        <Field label="Mobile" input_type="tel" value=guardian_mobile on_input=set_guardian_mobile error=error_for(errors, "guardianMobile") />
                        <SelectField label="Relation" options=options(&GUARDIAN_RELATIONS) value=relation on_input=set_relation error=error_for(errors, "guardianRelation") />
                    </div>
                </section>

                <section class="space-y-3">
                    <h3 class="font-semibold text-gray-700">"Address"</h3>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <Field label="Address" value=address on_input=set_address />
                        <Field label="PIN Code" value=pin on_input=set_pin error=error_for(errors, "pinCode") />
                        <Field label="Landmark" value=landmark on_input=set_landmark />
                        <Field label="Region" value=region on_input=set_region />
                        <Field label="State" value=addr_state on_input=set_addr_state />
                    </div>
                </section>

                <section class="flex items-center space-x-4">
                    {move || {
                        let url = form.with(|f| f.profile_pic.clone());
                        (!url.is_empty()).then(|| view! {
                            <img src=url class="w-16 h-16 rounded-full object-cover" />
                        })
                    }}
                    <label class="text-sm text-gray-600">
                        "Profile picture "
                        <input type="file" accept="image/jpeg,image/png,image/gif,image/webp" on:change=on_picture />
                    </label>
                    <Show when=move || uploading.get()>
                        <span class="text-sm text-gray-500">"Uploading..."</span>
                    </Show>
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
                        disabled=move || saving.get() || uploading.get()
                        class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white"
                    >
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Student card with their assessments and infirmary visits
#[component]
fn StudentDetail(member: Member, on_close: Callback<()>) -> impl IntoView {
    let history = create_rw_signal(None::<ClientResult<StudentHistory>>);
    let student_id = member.id.clone();
    let state = use_global_state();

    spawn_local(async move {
        let result = members::history(&api::client(), &student_id).await;
        if let Err(e) = &result {
            state.show_error(&e.message());
        }
        history.set(Some(result));
    });

    let address = member
        .primary_address()
        .map(|a| format!("{} {}", a.description, a.pin_code).trim().to_string())
        .unwrap_or_default();
    let guardian = member
        .emergency_contact
        .as_ref()
        .map(|c| format!("{} ({}) {}", c.name, c.relation, c.phone))
        .unwrap_or_default();

    view! {
        <div class="fixed inset-y-0 right-0 z-30 w-full max-w-md bg-white shadow-xl p-6 overflow-auto space-y-6">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">{member.name.clone()}</h2>
                <button on:click=move |_| on_close.call(()) class="text-gray-400 hover:text-gray-700">"✕"</button>
            </div>
            <dl class="grid grid-cols-2 gap-2 text-sm">
                <dt class="text-gray-500">"ID"</dt><dd>{member.display_id().to_string()}</dd>
                <dt class="text-gray-500">"Class"</dt>
                <dd>{format!("{} {}", member.grade().unwrap_or("-"), member.section().unwrap_or(""))}</dd>
                <dt class="text-gray-500">"Mobile"</dt><dd>{member.phone.clone().unwrap_or_default()}</dd>
                <dt class="text-gray-500">"Blood Group"</dt><dd>{member.blood_group.clone().unwrap_or_default()}</dd>
                <dt class="text-gray-500">"Guardian"</dt><dd>{guardian}</dd>
                <dt class="text-gray-500">"Address"</dt><dd>{address}</dd>
            </dl>

            {move || match history.get() {
                None => view! { <ListSkeleton count=4 /> }.into_view(),
                Some(Err(e)) => view! {
                    <div class="bg-red-50 text-red-700 rounded-lg px-4 py-3 text-sm">
                        {format!("Could not load history: {}", e.message())}
                    </div>
                }.into_view(),
                Some(Ok(StudentHistory { assessments: checks, visits })) => view! {
                    <section>
                        <h3 class="font-semibold mb-2">"Assessments"</h3>
                        {if checks.is_empty() {
                            view! { <p class="text-sm text-gray-500">"No assessments yet."</p> }.into_view()
                        } else {
                            checks.into_iter().map(|a| view! {
                                <div class="text-sm py-1 border-b border-gray-100 flex justify-between">
                                    <span>{a.date.as_deref().map(|d| d.get(..10).unwrap_or(d).to_string()).unwrap_or_default()}</span>
                                    <span>{format!("BMI {}", a.bmi.map(|b| b.to_string()).unwrap_or_else(|| "-".into()))}</span>
                                    <span>{a.bp.clone().unwrap_or_default()}</span>
                                </div>
                            }).collect_view()
                        }}
                    </section>
                    <section>
                        <h3 class="font-semibold mb-2">"Infirmary Visits"</h3>
                        {if visits.is_empty() {
                            view! { <p class="text-sm text-gray-500">"No visits yet."</p> }.into_view()
                        } else {
                            visits.into_iter().map(|r| view! {
                                <div class="text-sm py-1 border-b border-gray-100 flex justify-between">
                                    <span>{r.date.as_deref().map(|d| d.get(..10).unwrap_or(d).to_string()).unwrap_or_default()}</span>
                                    <span>{r.complaints.clone().unwrap_or_default()}</span>
                                </div>
                            }).collect_view()
                        }}
                    </section>
                }.into_view(),
            }}
        </div>
    }
}
