//! Profile Page

use ahana::forms::nurse::NurseForm;
use ahana::forms::sanitize_mobile_input;
use ahana::services::{media, nurses};
use ahana::{NurseSession, ValidationErrors};
use leptos::*;

use crate::api;
use crate::components::{bind, error_for, options, Field, Loading, SelectField, TextArea};
use crate::state::global::use_global_state;

const GENDERS: [&str; 3] = ["male", "female", "other"];

#[component]
pub fn Profile() -> impl IntoView {
    let state = use_global_state();

    view! {
        {move || match state.nurse.get() {
            Some(session) => view! { <ProfileForm session=session /> }.into_view(),
            None if state.nurse_loading.get() => view! { <Loading /> }.into_view(),
            None => view! {
                <p class="text-gray-500">"No nurse profile is linked to this account."</p>
            }.into_view(),
        }}
    }
}

#[component]
fn ProfileForm(session: NurseSession) -> impl IntoView {
    let state = use_global_state();

    let form = create_rw_signal(NurseForm::from_nurse(&session.nurse));
    let errors = create_rw_signal(ValidationErrors::new());
    let saving = create_rw_signal(false);
    let uploading = create_rw_signal(false);
    let session = store_value(session);

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
        let current_session = session.get_value();
        let payload = match current.to_payload(current_session.school_id()) {
            Ok(payload) => payload,
            Err(e) => {
                if let Some(fields) = e.field_errors() {
                    errors.set(fields.clone());
                }
                return;
            }
        };
        errors.set(ValidationErrors::new());
        saving.set(true);
        spawn_local(async move {
            match nurses::update(&api::client(), current_session.nurse_id(), &payload).await {
                Ok(nurse) => {
                    let updated = NurseSession::new(current_session.user.clone(), nurse);
                    session.set_value(updated.clone());
                    state.nurse.set(Some(updated));
                    state.show_success("Profile updated successfully");
                }
                Err(e) => state.show_error(&e.message()),
            }
            saving.set(false);
        });
    };

    let (name, set_name) = bind(form, |f| f.name.clone(), |f, v| f.name = v);
    let (email, set_email) = bind(form, |f| f.email.clone(), |f, v| f.email = v);
    let (phone, set_phone) = bind(form, |f| f.phone.clone(), |f, v| f.phone = sanitize_mobile_input(&v));
    let (dob, set_dob) = bind(form, |f| f.dob.clone(), |f, v| f.dob = v);
    let (gender, set_gender) = bind(form, |f| f.gender.clone(), |f, v| f.gender = v);
    let (languages, set_languages) = bind(form, |f| f.languages.clone(), |f, v| f.languages = v);
    let (intro, set_intro) = bind(form, |f| f.introduction.clone(), |f, v| f.introduction = v);

    let school = session.with_value(|s| s.nurse.school_name().or(s.school_id()).unwrap_or("-").to_string());

    view! {
        <div class="max-w-3xl space-y-6">
            <h1 class="text-2xl font-bold">"My Profile"</h1>

            <div class="bg-white rounded-xl shadow-sm p-6 space-y-6">
                <div class="flex items-center space-x-4">
                    {move || {
                        let url = form.with(|f| f.profile_pic.clone());
                        if url.is_empty() {
                            view! {
                                <div class="w-20 h-20 rounded-full bg-teal-100 flex items-center justify-center text-2xl text-teal-700">
                                    {form.with(|f| f.name.chars().next().unwrap_or('?').to_string())}
                                </div>
                            }.into_view()
                        } else {
                            view! { <img src=url class="w-20 h-20 rounded-full object-cover" /> }.into_view()
                        }
                    }}
                    <div>
                        <p class="text-gray-500 text-sm">{format!("School: {}", school)}</p>
                        <label class="text-sm text-teal-700 cursor-pointer">
                            {move || if uploading.get() { "Uploading..." } else { "Change photo" }}
                            <input
                                type="file"
                                class="hidden"
                                accept="image/jpeg,image/png,image/gif,image/webp"
                                on:change=on_picture
                            />
                        </label>
                    </div>
                </div>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <Field label="Name" value=name on_input=set_name error=error_for(errors, "name") required=true />
                    <Field label="Email" input_type="email" value=email on_input=set_email error=error_for(errors, "email") />
                    <Field label="Phone" input_type="tel" value=phone on_input=set_phone error=error_for(errors, "phone") required=true />
                    <Field label="Date of Birth" input_type="date" value=dob on_input=set_dob error=error_for(errors, "dob") required=true />
                    <SelectField label="Gender" options=options(&GENDERS) value=gender on_input=set_gender error=error_for(errors, "gender") required=true />
                    <Field label="Languages (comma separated)" value=languages on_input=set_languages />
                </div>
                <TextArea label="Introduction" value=intro on_input=set_intro />

                <div class="flex justify-end">
                    <button
                        on:click=on_save
                        disabled=move || saving.get() || uploading.get()
                        class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 disabled:bg-gray-400 text-white"
                    >
                        {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
