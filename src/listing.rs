//! List Page State
//!
//! The pieces every table page shares: page-number "load more", draft versus
//! active filters, the search box, client-side row filtering, scroll
//! windowing and confirm-before-delete. None of it talks to the network;
//! pages feed results in and read rows out.

use std::future::Future;

use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::model::{Assessment, InfirmaryRecord, InventoryItem, Member, Nurse};

/// Rows requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Rows rendered before the first scroll extension
pub const DEFAULT_WINDOW: usize = 20;

/// Records with a backend id
pub trait Identified {
    fn record_id(&self) -> &str;
}

impl Identified for Member {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Identified for Assessment {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Identified for InfirmaryRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Identified for InventoryItem {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Identified for Nurse {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Rows fetched so far plus paging and error state
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    rows: Vec<T>,
    page: u32,
    limit: u32,
    has_more: bool,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T> ListState<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            rows: Vec::new(),
            page: 1,
            limit: limit.max(1),
            has_more: true,
            loading: false,
            error: None,
            generation: 0,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mark a fetch of `page` as in flight; the returned ticket identifies it
    /// to [`ListState::settle_if_current`]
    pub fn begin(&mut self, page: u32) -> u64 {
        self.generation += 1;
        self.page = page.max(1);
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Page 1 replaces, later pages append; a full page means there may be more
    pub fn apply(&mut self, page: u32, rows: Vec<T>) {
        self.has_more = rows.len() == self.limit as usize;
        if page <= 1 {
            self.rows = rows;
        } else {
            self.rows.extend(rows);
        }
        self.page = page.max(1);
        self.loading = false;
        debug!(page, total = self.rows.len(), has_more = self.has_more, "List page applied");
    }

    /// Record a failed fetch; rows already shown stay as they were
    pub fn fail(&mut self, error: &ClientError) {
        self.error = Some(error.message());
        self.has_more = false;
        self.loading = false;
    }

    /// Apply a fetch result of either kind
    pub fn settle(&mut self, page: u32, result: ClientResult<Vec<T>>) {
        match result {
            Ok(rows) => self.apply(page, rows),
            Err(e) => self.fail(&e),
        }
    }

    /// Settle only if no later `begin` or `reset` superseded `ticket`
    pub fn settle_if_current(
        &mut self,
        ticket: u64,
        page: u32,
        result: ClientResult<Vec<T>>,
    ) -> bool {
        if ticket != self.generation {
            debug!(page, ticket, current = self.generation, "Dropped stale list response");
            return false;
        }
        self.settle(page, result);
        true
    }

    /// Page to request for "load more", if any
    pub fn next_page(&self) -> Option<u32> {
        (self.has_more && !self.loading && !self.rows.is_empty()).then_some(self.page + 1)
    }

    /// Forget everything, e.g. when filters change
    pub fn reset(&mut self) {
        self.generation += 1;
        self.rows.clear();
        self.page = 1;
        self.has_more = true;
        self.loading = false;
        self.error = None;
    }

    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }
}

impl<T: Identified> ListState<T> {
    /// Drop a deleted row; returns whether one was removed
    pub fn remove_id(&mut self, id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.record_id() != id);
        self.rows.len() != before
    }

    /// Swap in an updated row in place
    pub fn replace(&mut self, row: T) {
        if let Some(slot) = self
            .rows
            .iter_mut()
            .find(|r| r.record_id() == row.record_id())
        {
            *slot = row;
        }
    }
}

/// Text the client-side search matches against
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Member {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.display_id()];
        if let Some(phone) = &self.phone {
            fields.push(phone);
        }
        fields
    }
}

impl Searchable for Assessment {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.student_id.id()];
        fields.extend(self.student_id.name());
        fields.extend(self.student_id.member_id());
        fields.extend(self.student_id.phone());
        fields
    }
}

impl Searchable for InfirmaryRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.student_id.id()];
        fields.extend(self.student_id.name());
        fields.extend(self.student_id.member_id());
        fields.extend(self.student_id.phone());
        fields.extend(self.complaints.as_deref());
        fields
    }
}

impl Searchable for InventoryItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.item_name.as_str(), self.id.as_str()]
    }
}

/// Rows whose searchable text contains `query`, ignoring case;
/// a blank query keeps every row
pub fn filter_rows<'a, T: Searchable>(rows: &'a [T], query: &str) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|row| {
            row.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
        })
        .collect()
}

/// Search input versus the search actually applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    pub input: String,
    active: String,
}

impl SearchBox {
    pub fn active(&self) -> &str {
        &self.active
    }

    /// Apply the typed text; returns true when the active search changed
    pub fn search(&mut self) -> bool {
        let next = self.input.trim().to_string();
        let changed = next != self.active;
        self.active = next;
        changed
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.active.is_empty();
        self.input.clear();
        self.active.clear();
        changed
    }
}

/// Filters edited as a draft and committed on Apply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDraft<F> {
    pub draft: F,
    active: F,
}

impl<F: Clone + Default + PartialEq> FilterDraft<F> {
    pub fn active(&self) -> &F {
        &self.active
    }

    /// Commit the draft; returns true when the active filters changed
    pub fn apply(&mut self) -> bool {
        let changed = self.draft != self.active;
        self.active = self.draft.clone();
        changed
    }

    /// Throw away unapplied edits
    pub fn discard(&mut self) {
        self.draft = self.active.clone();
    }

    pub fn reset(&mut self) -> bool {
        let changed = self.active != F::default();
        self.draft = F::default();
        self.active = F::default();
        changed
    }
}

/// Visible slice of a long table, grown as the user scrolls near the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollWindow {
    start: usize,
    end: usize,
    step: usize,
}

impl Default for ScrollWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl ScrollWindow {
    pub fn new(step: usize) -> Self {
        Self {
            start: 0,
            end: step,
            step: step.max(1),
        }
    }

    /// Index range to render out of `total` rows
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        self.start.min(total)..self.end.min(total)
    }

    /// Extend when within `threshold` pixels of the bottom; true if grown
    pub fn on_scroll(
        &mut self,
        scroll_top: f64,
        client_height: f64,
        scroll_height: f64,
        threshold: f64,
        total: usize,
    ) -> bool {
        let near_end = scroll_top + client_height >= scroll_height - threshold;
        if near_end && self.end < total {
            self.end = (self.end + self.step).min(total);
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.step);
    }
}

/// A delete waiting on the user's confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingDelete {
    target: Option<String>,
}

impl PendingDelete {
    pub fn request(&mut self, id: impl Into<String>) {
        self.target = Some(id.into());
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Run the delete once for the pending id and hand the id back
    pub async fn confirm<F, Fut>(&mut self, delete: F) -> ClientResult<Option<String>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = ClientResult<Option<String>>>,
    {
        let Some(id) = self.target.take() else {
            return Ok(None);
        };
        delete(id.clone()).await?;
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::client::{ApiClient, Method};
    use crate::services::assessments;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn member(id: &str, name: &str, phone: &str) -> Member {
        Member {
            id: id.into(),
            member_id: Some(format!("STU-{}", id)),
            name: name.into(),
            phone: Some(phone.into()),
            ..Member::default()
        }
    }

    fn assessment(id: &str) -> Assessment {
        serde_json::from_value(json!({"_id": id, "studentId": "s1"})).unwrap()
    }

    #[test]
    fn test_pages_replace_then_append() {
        let mut list = ListState::new(2);
        list.begin(1);
        list.apply(1, vec![1, 2]);
        assert!(list.has_more());
        assert_eq!(list.next_page(), Some(2));

        list.begin(2);
        list.apply(2, vec![3]);
        assert_eq!(list.rows(), &[1, 2, 3]);
        assert!(!list.has_more());
        assert_eq!(list.next_page(), None);

        list.begin(1);
        list.apply(1, vec![9, 8]);
        assert_eq!(list.rows(), &[9, 8]);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut list = ListState::new(2);
        let unfiltered = list.begin(1);
        let filtered = list.begin(1);

        assert!(list.settle_if_current(filtered, 1, Ok(vec!["match"])));
        assert!(!list.settle_if_current(unfiltered, 1, Ok(vec!["old", "rows"])));
        assert_eq!(list.rows(), &["match"]);
        assert!(!list.is_loading());

        let before_reset = list.begin(2);
        list.reset();
        assert!(!list.settle_if_current(before_reset, 2, Ok(vec!["late"])));
        assert!(list.is_empty());
    }

    #[test]
    fn test_failure_keeps_rows() {
        let mut list = ListState::new(10);
        list.apply(1, vec!["a", "b"]);
        list.begin(2);
        list.settle(
            2,
            Err(ClientError::Http {
                status: 500,
                message: "Server exploded".into(),
            }),
        );

        assert_eq!(list.rows(), &["a", "b"]);
        assert_eq!(list.error(), Some("Server exploded"));
        assert!(!list.is_loading());
    }

    #[test]
    fn test_search_filters_and_clear_restores() {
        let rows = vec![
            member("1", "Asha Rao", "+919876543210"),
            member("2", "Ravi Kumar", "+919123456780"),
            member("3", "Meera Nair", "+919000000000"),
        ];

        let by_name: Vec<&str> = filter_rows(&rows, "rAo").iter().map(|m| m.id.as_str()).collect();
        assert_eq!(by_name, vec!["1"]);

        let by_id = filter_rows(&rows, "stu-2");
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "Ravi Kumar");

        assert_eq!(filter_rows(&rows, "91234").len(), 1);
        assert!(filter_rows(&rows, "zzz").is_empty());

        let mut search = SearchBox::default();
        search.input = "asha".into();
        assert!(search.search());
        assert_eq!(filter_rows(&rows, search.active()).len(), 1);
        assert!(search.clear());
        assert_eq!(filter_rows(&rows, search.active()).len(), 3);
    }

    #[test]
    fn test_visit_and_assessment_search_matches_student_mobile() {
        let visit: InfirmaryRecord = serde_json::from_value(json!({
            "_id": "v1",
            "studentId": {"_id": "s1", "name": "Asha", "phone": "+919876543210"},
            "complaints": "Fever"
        }))
        .unwrap();
        let check: Assessment = serde_json::from_value(json!({
            "_id": "a1",
            "studentId": {"_id": "s1", "name": "Asha", "phone": "+919876543210"}
        }))
        .unwrap();

        assert_eq!(filter_rows(std::slice::from_ref(&visit), "98765").len(), 1);
        assert_eq!(filter_rows(std::slice::from_ref(&check), "98765").len(), 1);
        assert!(filter_rows(std::slice::from_ref(&visit), "91111").is_empty());
    }

    #[test]
    fn test_filter_draft_only_applies_on_commit() {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Filters {
            grade: String,
        }

        let mut filters = FilterDraft::<Filters>::default();
        filters.draft.grade = "5".into();
        assert_eq!(filters.active().grade, "");
        assert!(filters.apply());
        assert_eq!(filters.active().grade, "5");
        assert!(!filters.apply());

        filters.draft.grade = "6".into();
        filters.discard();
        assert_eq!(filters.draft.grade, "5");
        assert!(filters.reset());
    }

    #[test]
    fn test_scroll_window_grows_near_end() {
        let mut window = ScrollWindow::new(20);
        assert_eq!(window.range(45), 0..20);
        assert!(!window.on_scroll(0.0, 400.0, 2000.0, 100.0, 45));
        assert!(window.on_scroll(1550.0, 400.0, 2000.0, 100.0, 45));
        assert_eq!(window.range(45), 0..40);
        assert!(window.on_scroll(1550.0, 400.0, 2000.0, 100.0, 45));
        assert_eq!(window.range(45), 0..45);
        assert!(!window.on_scroll(1550.0, 400.0, 2000.0, 100.0, 45));
        window.reset();
        assert_eq!(window.range(5), 0..5);
    }

    #[tokio::test]
    async fn test_confirmed_delete_calls_once_and_removes_row() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client
            .transport()
            .respond(200, json!({"status": "success", "message": "Deleted"}));

        let mut list = ListState::new(10);
        list.apply(1, vec![assessment("a1"), assessment("a2")]);

        let mut pending = PendingDelete::default();
        pending.request("a1");
        let deleted = pending
            .confirm(|id| {
                let client = &client;
                async move { assessments::delete(client, &id).await }
            })
            .await
            .unwrap();
        assert!(list.remove_id(&deleted.unwrap()));

        let sent = client.transport().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Delete);
        assert!(sent[0].url.ends_with("/api/v1/assessments/a1"));
        assert_eq!(list.rows().len(), 1);
        assert!(!pending.is_open());
    }

    #[tokio::test]
    async fn test_cancelled_delete_sends_nothing() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        let mut list = ListState::new(10);
        list.apply(1, vec![assessment("a1")]);

        let mut pending = PendingDelete::default();
        pending.request("a1");
        pending.cancel();
        let deleted = pending
            .confirm(|id| {
                let client = &client;
                async move { assessments::delete(client, &id).await }
            })
            .await
            .unwrap();

        assert!(deleted.is_none());
        assert_eq!(client.transport().request_count(), 0);
        assert_eq!(list.rows().len(), 1);
    }
}
