//! Dashboard Page
//!
//! Counts for the nurse's school, recent infirmary visits and stock alerts.

use ahana::model::{InfirmaryQuery, InfirmaryRecord, InventoryItem, InventoryQuery, NurseStats, StockStatus};
use ahana::services::{infirmary, inventory, nurses};
use ahana::Route as AppRoute;
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{ListSkeleton, Loading};
use crate::state::global::use_global_state;

const RECENT_VISITS: u32 = 5;

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_global_state();

    let stats = create_rw_signal(None::<NurseStats>);
    let recent = create_rw_signal(None::<Vec<InfirmaryRecord>>);
    let low_stock = create_rw_signal(None::<Vec<InventoryItem>>);

    spawn_local(async move {
        match nurses::stats(&api::client()).await {
            Ok(s) => stats.set(Some(s)),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to fetch stats: {}", e).into());
                state.show_error(&e.message());
            }
        }
    });

    // School-scoped panels wait for the nurse profile
    create_effect(move |_| {
        let Some(school_id) = state.school_id() else {
            return;
        };

        let school = school_id.clone();
        spawn_local(async move {
            let query = InfirmaryQuery {
                school_id: Some(school),
                limit: RECENT_VISITS,
                ..InfirmaryQuery::default()
            };
            match infirmary::list(&api::client(), &query).await {
                Ok(rows) => recent.set(Some(rows)),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to fetch visits: {}", e).into());
                    recent.set(Some(Vec::new()));
                }
            }
        });

        spawn_local(async move {
            let query = InventoryQuery {
                school_id: Some(school_id),
                ..InventoryQuery::default()
            };
            match inventory::list(&api::client(), &query).await {
                Ok(items) => low_stock.set(Some(
                    items
                        .into_iter()
                        .filter(|i| i.stock_status() != StockStatus::InStock)
                        .collect(),
                )),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to fetch inventory: {}", e).into());
                    low_stock.set(Some(Vec::new()));
                }
            }
        });
    });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-2xl font-bold">
                    {move || state.nurse.get()
                        .map(|n| format!("Welcome, {}", n.display_name()))
                        .unwrap_or_else(|| "Welcome".to_string())}
                </h1>
                <p class="text-gray-500 mt-1">
                    {move || state.nurse.get()
                        .and_then(|n| n.nurse.school_name().map(str::to_string))
                        .unwrap_or_default()}
                </p>
            </div>

            {move || match stats.get() {
                None => view! { <Loading /> }.into_view(),
                Some(s) => view! {
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <StatCard label="Students" value=s.students href=AppRoute::Students.path() />
                        <StatCard label="Assessments" value=s.assessments href=AppRoute::Assessments.path() />
                        <StatCard label="Infirmary Visits" value=s.infirmaries href=AppRoute::Infirmary.path() />
                    </div>
                }.into_view(),
            }}

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <section class="bg-white rounded-xl shadow-sm p-6">
                    <h2 class="text-lg font-semibold mb-4">"Recent Infirmary Visits"</h2>
                    {move || match recent.get() {
                        None => view! { <ListSkeleton count=3 /> }.into_view(),
                        Some(rows) if rows.is_empty() => view! {
                            <p class="text-gray-500">"No visits recorded yet."</p>
                        }.into_view(),
                        Some(rows) => rows.into_iter().map(|r| view! {
                            <div class="flex justify-between py-2 border-b border-gray-100 text-sm">
                                <span>{r.student_id.name().unwrap_or(r.student_id.id()).to_string()}</span>
                                <span class="text-gray-500">{r.complaints.clone().unwrap_or_default()}</span>
                                <span class="text-gray-400">{r.date.as_deref().map(|d| d.get(..10).unwrap_or(d).to_string()).unwrap_or_default()}</span>
                            </div>
                        }).collect_view(),
                    }}
                </section>

                <section class="bg-white rounded-xl shadow-sm p-6">
                    <h2 class="text-lg font-semibold mb-4">"Stock Alerts"</h2>
                    {move || match low_stock.get() {
                        None => view! { <ListSkeleton count=3 /> }.into_view(),
                        Some(items) if items.is_empty() => view! {
                            <p class="text-gray-500">"All medicines are in stock."</p>
                        }.into_view(),
                        Some(items) => items.into_iter().map(|i| {
                            let badge = match i.stock_status() {
                                StockStatus::OutOfStock => "bg-red-100 text-red-700",
                                _ => "bg-amber-100 text-amber-700",
                            };
                            view! {
                                <div class="flex justify-between items-center py-2 border-b border-gray-100 text-sm">
                                    <span>{i.item_name.clone()}</span>
                                    <span class=format!("px-2 py-0.5 rounded-full text-xs {}", badge)>
                                        {format!("{} ({})", i.stock_status().label(), i.current_stock)}
                                    </span>
                                </div>
                            }
                        }).collect_view(),
                    }}
                </section>
            </div>
        </div>
    }
}

#[component]
fn StatCard(label: &'static str, value: u64, href: &'static str) -> impl IntoView {
    view! {
        <A href=href class="block bg-white rounded-xl shadow-sm p-6 hover:shadow-md transition-shadow">
            <p class="text-sm text-gray-500">{label}</p>
            <p class="text-3xl font-bold text-teal-700 mt-2">{value}</p>
        </A>
    }
}
