//! Navigation Components
//!
//! Sidebar with the portal sections and the header with the signed-in nurse.

use ahana::Route as AppRoute;
use leptos::*;
use leptos_router::*;

use crate::state::global::use_global_state;

fn icon(route: AppRoute) -> &'static str {
    match route {
        AppRoute::Dashboard => "🏠",
        AppRoute::Students => "🎒",
        AppRoute::Assessments => "🩺",
        AppRoute::Infirmary => "🏥",
        AppRoute::Inventory => "💊",
        AppRoute::Reports => "📄",
        AppRoute::Settings => "⚙",
        AppRoute::Profile => "👤",
        AppRoute::Login | AppRoute::ForgotPassword => "",
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <aside class="w-60 shrink-0 bg-white border-r border-gray-200 min-h-screen">
            <A href="/" class="flex items-center space-x-2 h-16 px-6 border-b border-gray-200">
                <span class="text-2xl">"➕"</span>
                <span class="text-xl font-bold text-teal-700">"Ahana"</span>
            </A>
            <nav class="p-3 space-y-1">
                {AppRoute::NAVIGATION
                    .into_iter()
                    .map(|route| view! { <NavLink route=route /> })
                    .collect_view()}
            </nav>
        </aside>
    }
}

#[component]
fn NavLink(route: AppRoute) -> impl IntoView {
    view! {
        <A
            href=route.path()
            exact={route == AppRoute::Dashboard}
            class="flex items-center space-x-3 px-4 py-2 rounded-lg text-gray-600 hover:bg-teal-50 hover:text-teal-700 transition-colors"
            active_class="bg-teal-100 text-teal-800 font-medium"
        >
            <span>{icon(route)}</span>
            <span>{route.label()}</span>
        </A>
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let location = use_location();

    let title = move || {
        AppRoute::from_path(&location.pathname.get())
            .map(|r| r.label())
            .unwrap_or("Ahana")
    };

    let on_logout = move |_| {
        state.logout();
        navigate(AppRoute::Login.path(), Default::default());
    };

    view! {
        <header class="h-16 bg-white border-b border-gray-200 flex items-center justify-between px-6">
            <h1 class="text-lg font-semibold text-gray-800">{title}</h1>
            <div class="flex items-center space-x-4">
                <span class="text-sm text-gray-600">
                    {move || state.nurse.get().map(|n| n.display_name().to_string()).unwrap_or_default()}
                </span>
                <button
                    on:click=on_logout
                    class="px-3 py-1.5 text-sm rounded-lg border border-gray-300 hover:bg-gray-100"
                >
                    "Logout"
                </button>
            </div>
        </header>
    }
}
