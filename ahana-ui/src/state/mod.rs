//! State Management
//!
//! Global context plus the list-loading helper every table page shares.

pub mod global;

use std::future::Future;

use ahana::error::ClientResult;
use ahana::listing::{ListState, ScrollWindow};
use leptos::*;

pub use global::{provide_global_state, GlobalState};

/// Mark `page` as loading, run `fetch`, and settle the result into `list`
/// unless a newer fetch or reset has started since
pub fn fetch_page<T, Fut>(list: RwSignal<ListState<T>>, page: u32, fetch: Fut)
where
    T: 'static,
    Fut: Future<Output = ClientResult<Vec<T>>> + 'static,
{
    let ticket = list.try_update(|l| l.begin(page)).unwrap_or_default();
    spawn_local(async move {
        let result = fetch.await;
        list.update(|l| {
            l.settle_if_current(ticket, page, result);
        });
    });
}

/// Pixels from the bottom of a table at which more rows are revealed
pub const SCROLL_THRESHOLD: f64 = 120.0;

/// Scroll handler for a table container; true when the window grew
pub fn grow_window(ev: &web_sys::Event, window: RwSignal<ScrollWindow>, total: usize) -> bool {
    let el = event_target::<web_sys::HtmlElement>(ev);
    let mut grown = false;
    window.update(|w| {
        grown = w.on_scroll(
            f64::from(el.scroll_top()),
            f64::from(el.client_height()),
            f64::from(el.scroll_height()),
            SCROLL_THRESHOLD,
            total,
        );
    });
    grown
}
