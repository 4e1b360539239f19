//! Generic resource store.
//!
//! One [`ResourceStore`] owns the list, pagination, count summary and loading
//! flag of a single entity, and is the only writer of that state. State lives
//! in a `watch` channel and is replaced as a whole value on every change, so
//! subscribers always see a consistent snapshot.
//!
//! List queries are sequenced: each one takes a generation token and its
//! response is only applied while that token is still the newest issued. A
//! fast page flip therefore always ends on the last page requested.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use clinic_core::{CountSummary, OperationResult, Pagination, Resource, filter_by_text};
use tokio::sync::watch;

use crate::envelope::{ApiReply, normalize_failure};
use crate::error::Result;
use crate::service::{Operation, ResourceService};
use crate::wrappers::{LoadingTracker, run_command, run_query};

/// How mutations reach the local list. A store applies one policy to every
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPolicy {
    /// Apply the server's acknowledgement locally: append or replace the
    /// returned record, patch the active flag, drop removed rows.
    #[default]
    Local,
    /// Leave the list alone and re-run the active query after each mutation.
    Refetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub pagination: Pagination,
    pub policy: MutationPolicy,
    /// Refresh the count summary after every successful list query.
    pub refresh_count_after_query: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            pagination: Pagination::default(),
            policy: MutationPolicy::default(),
            refresh_count_after_query: false,
        }
    }
}

/// The list query the store is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveQuery {
    #[default]
    All,
    Active,
    Search(String),
}

impl ActiveQuery {
    /// Blank search text is not a filter.
    pub fn search(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Self::All
        } else {
            Self::Search(text.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<R> {
    pub items: Vec<R>,
    pub pagination: Pagination,
    pub count: Option<CountSummary>,
    pub active_query: ActiveQuery,
}

impl<R> StoreState<R> {
    fn initial(pagination: Pagination) -> Self {
        Self {
            items: Vec::new(),
            pagination,
            count: None,
            active_query: ActiveQuery::All,
        }
    }
}

pub struct ResourceStore<R: Resource> {
    service: ResourceService<R>,
    policy: MutationPolicy,
    refresh_count_after_query: bool,
    state: watch::Sender<StoreState<R>>,
    loading: LoadingTracker,
    generation: AtomicU64,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(service: ResourceService<R>, options: StoreOptions) -> Self {
        let (state, _) = watch::channel(StoreState::initial(options.pagination));
        Self {
            service,
            policy: options.policy,
            refresh_count_after_query: options.refresh_count_after_query,
            state,
            loading: LoadingTracker::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &ResourceService<R> {
        &self.service
    }

    pub fn policy(&self) -> MutationPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> StoreState<R> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<R> {
        self.state.borrow().items.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.state.borrow().pagination
    }

    pub fn count(&self) -> Option<CountSummary> {
        self.state.borrow().count.clone()
    }

    pub fn active_query(&self) -> ActiveQuery {
        self.state.borrow().active_query.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<R>> {
        self.state.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Client-side filter over the currently loaded page.
    pub fn filtered(&self, text: &str) -> Vec<R> {
        filter_by_text(&self.state.borrow().items, text)
    }

    // ---- queries ----

    pub async fn fetch_all(&self) -> OperationResult {
        self.run_list(ActiveQuery::All, None, self.next_token()).await
    }

    pub async fn fetch_active(&self) -> OperationResult {
        self.run_list(ActiveQuery::Active, None, self.next_token()).await
    }

    /// Server-side search. An empty query behaves exactly like [`fetch_all`].
    ///
    /// [`fetch_all`]: Self::fetch_all
    pub async fn search(&self, text: &str) -> OperationResult {
        self.run_list(ActiveQuery::search(text), None, self.next_token())
            .await
    }

    /// Re-run whatever list query is active, on the current page.
    pub async fn refresh(&self) -> OperationResult {
        let (query, pagination) = {
            let state = self.state.borrow();
            (state.active_query.clone(), state.pagination)
        };
        self.run_list(query, Some(pagination), self.next_token())
            .await
    }

    /// Run `query` starting at `page`, whatever was shown before.
    pub async fn load(&self, query: ActiveQuery, page: u32) -> OperationResult {
        let pagination = self.pagination().with_page(page);
        self.run_list(query, Some(pagination), self.next_token())
            .await
    }

    /// Move to `page` and refetch the active query.
    ///
    /// The new page number is published before the fetch. If the fetch fails
    /// and no newer list query has started, the previous pagination is
    /// restored so it keeps describing the items on display.
    pub async fn set_page(&self, page: u32) -> OperationResult {
        let (query, previous) = {
            let state = self.state.borrow();
            (state.active_query.clone(), state.pagination)
        };
        self.switch_pagination(query, previous, previous.with_page(page))
            .await
    }

    /// Change the page size, go back to the first page and refetch. Failure
    /// restores the previous pagination, as for [`set_page`](Self::set_page).
    pub async fn set_page_size(&self, page_size: u32) -> OperationResult {
        let pagination = match Pagination::new(page_size) {
            Ok(p) => p,
            Err(e) => return OperationResult::error(e.to_string(), 400),
        };
        let (query, previous) = {
            let state = self.state.borrow();
            (state.active_query.clone(), state.pagination)
        };
        self.switch_pagination(query, previous, pagination).await
    }

    async fn switch_pagination(
        &self,
        query: ActiveQuery,
        previous: Pagination,
        next: Pagination,
    ) -> OperationResult {
        let token = self.next_token();
        self.state.send_modify(|state| state.pagination = next);
        let result = self.run_list(query, Some(next), token).await;
        if result.is_error() {
            self.state.send_if_modified(|state| {
                if self.generation.load(Ordering::SeqCst) != token || state.pagination != next {
                    return false;
                }
                state.pagination = previous;
                true
            });
        }
        result
    }

    /// Point lookup that bypasses the list. Errors are returned, not
    /// normalized, so callers can tell "not found" apart from other failures.
    pub async fn fetch_by_id(&self, id: &str) -> Result<R> {
        run_query(
            &self.loading,
            self.service.get_by_id(id),
            None::<std::future::Ready<OperationResult>>,
        )
        .await
    }

    pub async fn fetch_count(&self) -> OperationResult {
        run_query(
            &self.loading,
            async {
                let reply = match self.service.count().await {
                    Ok(reply) => reply,
                    Err(e) => return self.failed(Operation::Count, &e),
                };
                let outcome = reply.outcome();
                if !outcome.is_success() {
                    return outcome;
                }
                match reply.data::<CountSummary>() {
                    Ok(count) => {
                        let count = count.unwrap_or_default();
                        self.state.send_modify(|state| state.count = Some(count));
                        outcome
                    }
                    Err(e) => self.failed(Operation::Count, &e),
                }
            },
            None::<std::future::Ready<OperationResult>>,
        )
        .await
    }

    fn next_token(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Run one list query under `token`. Its response, and the count
    /// follow-up, only happen while `token` is the newest issued.
    async fn run_list(
        &self,
        query: ActiveQuery,
        pagination: Option<Pagination>,
        token: u64,
    ) -> OperationResult {
        let pagination = pagination.unwrap_or_else(|| {
            let state = self.state.borrow();
            if state.active_query == query {
                state.pagination
            } else {
                state.pagination.with_page(0)
            }
        });

        let applied_flag = AtomicBool::new(false);
        let was_applied = &applied_flag;
        let follow_up = (self.refresh_count_after_query && self.service.supports(Operation::Count))
            .then(|| async move {
                if was_applied.load(Ordering::SeqCst) {
                    Some(self.fetch_count().await)
                } else {
                    None
                }
            });

        run_query(
            &self.loading,
            async {
                let (op, reply) = match &query {
                    ActiveQuery::All => (Operation::GetAll, self.service.get_all(&pagination).await),
                    ActiveQuery::Active => (
                        Operation::GetActive,
                        self.service.get_active(&pagination).await,
                    ),
                    ActiveQuery::Search(text) => (
                        Operation::Search,
                        self.service.search_by_name(text, &pagination).await,
                    ),
                };
                let reply = match reply {
                    Ok(reply) => reply,
                    Err(e) => return self.failed(op, &e),
                };
                let outcome = reply.outcome();
                if !outcome.is_success() {
                    return outcome;
                }
                let items = match reply.data::<Vec<R>>() {
                    Ok(items) => items.unwrap_or_default(),
                    Err(e) => return self.failed(op, &e),
                };
                let pagination = reply
                    .page()
                    .map(|meta| pagination.apply(&meta))
                    .unwrap_or(pagination);

                let applied = self.state.send_if_modified(|state| {
                    if self.generation.load(Ordering::SeqCst) != token {
                        return false;
                    }
                    *state = StoreState {
                        items,
                        pagination,
                        count: state.count.take(),
                        active_query: query.clone(),
                    };
                    true
                });
                if applied {
                    applied_flag.store(true, Ordering::SeqCst);
                } else {
                    tracing::debug!(
                        resource = %R::KIND,
                        %op,
                        token,
                        "discarding stale list response"
                    );
                }
                outcome
            },
            follow_up,
        )
        .await
    }

    // ---- commands ----

    pub async fn create(&self, input: &R) -> OperationResult {
        self.mutate(Operation::Create, self.service.create(input), |store, reply| {
            store.upsert_from(reply, None)
        })
        .await
    }

    /// Replace the record with `id`. No local match leaves the list as is.
    pub async fn update(&self, id: &str, input: &R) -> OperationResult {
        self.mutate(
            Operation::Update,
            self.service.update(id, input),
            |store, reply| store.upsert_from(reply, Some(id)),
        )
        .await
    }

    pub async fn enable(&self, id: &str) -> OperationResult {
        self.mutate(Operation::Enable, self.service.enable(id), |store, _| {
            store.patch_active(id, true);
            None
        })
        .await
    }

    pub async fn disable(&self, id: &str) -> OperationResult {
        self.mutate(Operation::Disable, self.service.disable(id), |store, _| {
            store.patch_active(id, false);
            None
        })
        .await
    }

    pub async fn remove(&self, id: &str) -> OperationResult {
        self.mutate(Operation::Delete, self.service.delete(id), |store, _| {
            store.drop_record(id);
            None
        })
        .await
    }

    /// Shared command path. `apply_local` runs only under
    /// [`MutationPolicy::Local`] after a successful reply. When it cannot
    /// apply the change, the active query is refreshed instead; the server's
    /// outcome is returned either way, since the write already happened.
    async fn mutate<F, A>(&self, op: Operation, call: F, apply_local: A) -> OperationResult
    where
        F: std::future::Future<Output = Result<ApiReply>>,
        A: FnOnce(&Self, &ApiReply) -> Option<LocalMiss>,
    {
        let refetch = (self.policy == MutationPolicy::Refetch).then(|| self.refresh());

        run_command(
            &self.loading,
            async {
                let reply = match call.await {
                    Ok(reply) => reply,
                    Err(e) => return self.failed(op, &e),
                };
                let outcome = reply.outcome();
                if !outcome.is_success() || self.policy == MutationPolicy::Refetch {
                    return outcome;
                }
                let Some(miss) = apply_local(self, &reply) else {
                    return outcome;
                };
                if let LocalMiss::Undecodable(e) = &miss {
                    tracing::warn!(
                        resource = %R::KIND,
                        %op,
                        error = %e,
                        "returned record could not be applied locally"
                    );
                }
                self.refresh().await;
                outcome
            },
            refetch,
        )
        .await
    }

    /// Apply the record carried by `reply`. With `replace_id` set only an
    /// existing row with that id is replaced; otherwise the record replaces a
    /// row with the same id or is appended.
    fn upsert_from(&self, reply: &ApiReply, replace_id: Option<&str>) -> Option<LocalMiss> {
        let record = match reply.data::<R>() {
            Ok(Some(record)) => record,
            Ok(None) => return Some(LocalMiss::NoRecord),
            Err(e) => return Some(LocalMiss::Undecodable(e)),
        };
        self.state.send_if_modified(|state| {
            let target = replace_id.unwrap_or(record.id());
            let position = state.items.iter().position(|r| r.id() == target);
            let mut items = state.items.clone();
            match (position, replace_id) {
                (Some(idx), _) => items[idx] = record,
                (None, None) => items.push(record),
                (None, Some(_)) => return false,
            }
            state.items = items;
            true
        });
        None
    }

    fn patch_active(&self, id: &str, active: bool) {
        self.state.send_if_modified(|state| {
            let Some(idx) = state.items.iter().position(|r| r.id() == id) else {
                return false;
            };
            let mut items = state.items.clone();
            items[idx].set_active(active);
            state.items = items;
            true
        });
    }

    fn drop_record(&self, id: &str) {
        self.state.send_if_modified(|state| {
            if !state.items.iter().any(|r| r.id() == id) {
                return false;
            }
            state.items = state.items.iter().filter(|r| r.id() != id).cloned().collect();
            true
        });
    }

    fn failed(&self, op: Operation, err: &crate::ClientError) -> OperationResult {
        let result = normalize_failure(err);
        tracing::warn!(
            resource = %R::KIND,
            %op,
            status = result.status,
            error = %err,
            "operation failed"
        );
        result
    }
}

enum LocalMiss {
    NoRecord,
    Undecodable(crate::ClientError),
}
