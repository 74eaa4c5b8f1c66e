//! Inventory Page

use ahana::forms::inventory::{self, InventoryForm, DEFAULT_UNIT};
use ahana::listing::{filter_rows, ListState, PendingDelete, SearchBox};
use ahana::model::{InventoryItem, InventoryQuery, StockStatus};
use ahana::services::inventory as items;
use ahana::ValidationErrors;
use leptos::*;

use crate::api;
use crate::components::{bind, error_for, ConfirmDialog, Field, ListSkeleton, SearchBar};
use crate::state::fetch_page;
use crate::state::global::use_global_state;

/// Backend values for the stock filter, with their labels
const STATUS_FILTERS: [(&str, &str); 3] = [
    ("in_stock", "In Stock"),
    ("low_stock", "Low Stock"),
    ("out_of_stock", "Out of Stock"),
];

fn status_badge(status: StockStatus) -> &'static str {
    match status {
        StockStatus::InStock => "bg-green-100 text-green-700",
        StockStatus::LowStock => "bg-yellow-100 text-yellow-700",
        StockStatus::OutOfStock => "bg-red-100 text-red-700",
    }
}

#[component]
pub fn Inventory() -> impl IntoView {
    let state = use_global_state();

    // The inventory endpoint is not paged; everything arrives at once
    let list = create_rw_signal(ListState::<InventoryItem>::new(u32::MAX));
    let search = create_rw_signal(SearchBox::default());
    let status = create_rw_signal(String::new());
    let expiring = create_rw_signal(String::new());
    let quick = create_rw_signal(String::new());
    let pending = create_rw_signal(PendingDelete::default());
    let deleting = create_rw_signal(false);
    let editor = create_rw_signal(None::<Option<InventoryItem>>);

    let load = move || {
        let non_empty = |v: String| (!v.trim().is_empty()).then(|| v.trim().to_string());
        let query = InventoryQuery {
            school_id: state.school_id_untracked(),
            search: search.with_untracked(|s| non_empty(s.active().to_string())),
            stock_status: non_empty(status.get_untracked()),
            expiry_before: non_empty(expiring.get_untracked()),
        };
        fetch_page(list, 1, async move { items::list(&api::client(), &query).await });
    };

    create_effect(move |_| {
        if state.school_id().is_some() {
            load();
        }
    });

    let confirm_delete = Callback::new(move |_: ()| {
        let mut target = pending.get_untracked();
        deleting.set(true);
        spawn_local(async move {
            let result = target
                .confirm(|id| async move { items::delete(&api::client(), &id).await })
                .await;
            match result {
                Ok(Some(id)) => {
                    list.update(|l| {
                        l.remove_id(&id);
                    });
                    state.show_success("Item deleted");
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
            filter_rows(l.rows(), &quick.get())
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Inventory"</h1>
                <button
                    on:click=move |_| editor.set(Some(None))
                    class="px-4 py-2 rounded-lg bg-teal-600 hover:bg-teal-700 text-white"
                >
                    "+ Add Item"
                </button>
            </div>

            <div class="bg-white rounded-xl shadow-sm p-4 space-y-4">
                <SearchBar
                    search=search
                    placeholder="Search medicines"
                    on_change=Callback::new(move |_| load())
                />
                <div class="grid grid-cols-1 md:grid-cols-3 gap-3 items-end">
                    <label class="block">
                        <span class="block text-sm text-gray-600 mb-1">"Stock"</span>
                        <select
                            on:change=move |ev| {
                                status.set(event_target_value(&ev));
                                load();
                            }
                            class="w-full rounded-lg border border-gray-300 px-3 py-2"
                        >
                            <option value="">"All"</option>
                            {STATUS_FILTERS.iter().map(|(value, label)| view! {
                                <option value=value.to_string()>{label.to_string()}</option>
                            }).collect_view()}
                        </select>
                    </label>
                    <label class="block">
                        <span class="block text-sm text-gray-600 mb-1">"Expiring before"</span>
                        <input
                            type="date"
                            prop:value=move || expiring.get()
                            on:change=move |ev| {
                                expiring.set(event_target_value(&ev));
                                load();
                            }
                            class="w-full rounded-lg border border-gray-300 px-3 py-2"
                        />
                    </label>
                    <input
                        type="text"
                        placeholder="Filter by name"
                        prop:value=move || quick.get()
                        on:input=move |ev| quick.set(event_target_value(&ev))
                        class="w-full rounded-lg border border-gray-200 px-3 py-2 text-sm"
                    />
                </div>
            </div>

            {move || list.with(|l| l.error().map(str::to_string)).map(|msg| view! {
                <div class="bg-red-50 text-red-700 rounded-lg px-4 py-3">{msg}</div>
            })}

            <div class="bg-white rounded-xl shadow-sm overflow-auto">
                {move || {
                    let (loading, empty) = list.with(|l| (l.is_loading(), l.is_empty()));
                    if loading && empty {
                        view! { <div class="p-4"><ListSkeleton /></div> }.into_view()
                    } else if empty {
                        view! { <p class="p-6 text-gray-500">"No inventory items."</p> }.into_view()
                    } else {
                        view! {
                            <table class="w-full text-sm">
                                <thead class="bg-gray-50 text-left text-gray-500">
                                    <tr>
                                        <th class="px-4 py-2">"Item"</th>
                                        <th class="px-4 py-2">"Stock"</th>
                                        <th class="px-4 py-2">"Status"</th>
                                        <th class="px-4 py-2">"Expiry"</th>
                                        <th class="px-4 py-2"></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {visible().into_iter().map(|item| {
                                        let id = item.id.clone();
                                        let for_edit = item.clone();
                                        let status = item.stock_status();
                                        let expiry = item
                                            .expiry_date
                                            .as_deref()
                                            .map(|d| d.get(..10).unwrap_or(d).to_string())
                                            .unwrap_or_else(|| "-".into());
                                        view! {
                                            <tr class="border-t border-gray-100 hover:bg-gray-50">
                                                <td class="px-4 py-2 font-medium">{item.item_name.clone()}</td>
                                                <td class="px-4 py-2">{format!("{} {}", item.current_stock, item.unit_label())}</td>
                                                <td class="px-4 py-2">
                                                    <span class=format!("px-2 py-1 rounded-full text-xs {}", status_badge(status))>
                                                        {status.label()}
                                                    </span>
                                                </td>
                                                <td class="px-4 py-2">{expiry}</td>
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

            <ConfirmDialog
                open=Signal::derive(move || pending.with(PendingDelete::is_open))
                title="Delete item"
                message="This inventory item will be permanently removed."
                confirm_label="Delete"
                busy=Signal::derive(move || deleting.get())
                on_confirm=confirm_delete
                on_cancel=Callback::new(move |_| pending.update(PendingDelete::cancel))
            />

            {move || editor.get().map(|editing| view! {
                <ItemEditor
                    editing=editing
                    on_saved=Callback::new(move |saved: InventoryItem| {
                        let was_editing = editor.with_untracked(|e| matches!(e, Some(Some(_))));
                        editor.set(None);
                        if was_editing {
                            list.update(|l| l.replace(saved));
                        } else {
                            load();
                        }
                    })
                    on_close=Callback::new(move |_| editor.set(None))
                />
            })}
        </div>
    }
}

#[component]
fn ItemEditor(
    editing: Option<InventoryItem>,
    on_saved: Callback<InventoryItem>,
    on_close: Callback<()>,
) -> impl IntoView {
    let state = use_global_state();

    let title = if editing.is_some() { "Edit Item" } else { "Add Item" };
    let form = create_rw_signal(editing.as_ref().map(InventoryForm::from_item).unwrap_or_else(|| InventoryForm {
        unit: DEFAULT_UNIT.to_string(),
        ..InventoryForm::default()
    }));
    let editing_id = store_value(editing.map(|i| i.id));
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
        let school_id = state.school_id_untracked();
        let editing_id = editing_id.get_value();
        saving.set(true);
        spawn_local(async move {
            match inventory::save(&api::client(), &current, school_id.as_deref(), editing_id.as_deref()).await {
                Ok(item) => {
                    state.show_success("Inventory saved successfully");
                    on_saved.call(item);
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

    let (name, set_name) = bind(form, |f| f.item_name.clone(), |f, v| f.item_name = v);
    let (stock, set_stock) = bind(form, |f| f.current_stock.clone(), |f, v| f.current_stock = v);
    let (expiry, set_expiry) = bind(form, |f| f.expiry_date.clone(), |f, v| f.expiry_date = v);
    let (unit, set_unit) = bind(form, |f| f.unit.clone(), |f, v| f.unit = v);

    view! {
        <div class="fixed inset-0 z-30 bg-black/40 flex items-center justify-center">
            <div class="bg-white rounded-xl shadow-xl w-full max-w-lg p-6 space-y-4">
                <div class="flex items-center justify-between">
                    <h2 class="text-xl font-semibold">{title}</h2>
                    <button on:click=move |_| on_close.call(()) class="text-gray-400 hover:text-gray-700">"✕"</button>
                </div>
                <Field label="Item Name" value=name on_input=set_name error=error_for(errors, "itemName") required=true />
                <div class="grid grid-cols-2 gap-4">
                    <Field label="Current Stock" value=stock on_input=set_stock error=error_for(errors, "currentStock") required=true />
                    <Field label="Unit" value=unit on_input=set_unit />
                </div>
                <Field label="Expiry Date" input_type="date" value=expiry on_input=set_expiry error=error_for(errors, "expiryDate") />
                <div class="flex justify-end space-x-3 pt-2">
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
