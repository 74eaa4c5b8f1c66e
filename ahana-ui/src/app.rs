//! App Root Component
//!
//! Router, authentication guard and the sidebar/header layout.

use ahana::{Guard, Route as AppRoute};
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{Header, Sidebar, Toast};
use crate::pages::{
    Assessments, Dashboard, ForgotPassword, Infirmary, Inventory, Login, Profile, Reports,
    Settings, Students,
};
use crate::state::global::{provide_global_state, use_global_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <Routes>
                <Route path=AppRoute::Login.path() view=Login />
                <Route path=AppRoute::ForgotPassword.path() view=ForgotPassword />
                <Route path=AppRoute::Dashboard.path() view=|| view! { <Guarded route=AppRoute::Dashboard><Dashboard /></Guarded> } />
                <Route path=AppRoute::Students.path() view=|| view! { <Guarded route=AppRoute::Students><Students /></Guarded> } />
                <Route path=AppRoute::Assessments.path() view=|| view! { <Guarded route=AppRoute::Assessments><Assessments /></Guarded> } />
                <Route path=AppRoute::Infirmary.path() view=|| view! { <Guarded route=AppRoute::Infirmary><Infirmary /></Guarded> } />
                <Route path=AppRoute::Inventory.path() view=|| view! { <Guarded route=AppRoute::Inventory><Inventory /></Guarded> } />
                <Route path=AppRoute::Reports.path() view=|| view! { <Guarded route=AppRoute::Reports><Reports /></Guarded> } />
                <Route path=AppRoute::Settings.path() view=|| view! { <Guarded route=AppRoute::Settings><Settings /></Guarded> } />
                <Route path=AppRoute::Profile.path() view=|| view! { <Guarded route=AppRoute::Profile><Profile /></Guarded> } />
                <Route path="/*any" view=NotFound />
            </Routes>
            <Toast />
        </Router>
    }
}

/// Checks the stored auth flag on navigation; signed-in pages get the layout
#[component]
fn Guarded(route: AppRoute, children: Children) -> impl IntoView {
    match route.guard(api::client().session()) {
        Guard::Allow => {
            use_global_state().load_nurse();
            view! { <Layout>{children()}</Layout> }.into_view()
        }
        Guard::Redirect(to) => view! { <Redirect path=to.path() /> }.into_view(),
    }
}

#[component]
fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen flex bg-gray-50 text-gray-900">
            <Sidebar />
            <div class="flex-1 flex flex-col min-w-0">
                <Header />
                <main class="flex-1 p-6 overflow-auto">{children()}</main>
            </div>
        </div>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-screen text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href=AppRoute::Dashboard.path()
                class="px-6 py-3 bg-teal-600 hover:bg-teal-700 text-white rounded-lg font-medium"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
