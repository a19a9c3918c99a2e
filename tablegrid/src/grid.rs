//! The table grid engine.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::client::Missing;
use crate::client::Set;
use crate::client::Transport;
use crate::config::GridConfig;
use crate::error::Error;
use crate::message::LogMessages;
use crate::message::MessageSink;
use crate::model::GridRow;
use crate::model::PagerList;
use crate::query::QueryParams;
use crate::query::SortDirection;
use crate::query::resolve_order;
use crate::selection::SelectionModel;
use crate::store::MemoryStore;
use crate::store::StateStore;

type ParamsListener = Box<dyn Fn(&QueryParams) + Send + Sync>;

/// Headless data-grid engine binding a remote paged dataset to table state.
///
/// The grid owns the query parameters, the loaded page of rows, two
/// selection sets and the loading flag, and orchestrates loads, sorting,
/// pagination, debounced search and bulk delete against a [`Transport`].
/// Rendering is the caller's job; every piece of displayable state has an
/// accessor.
///
/// The grid is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely.
///
/// # Example
///
/// ```ignore
/// use tablegrid::{GridConfig, RestClient, TableGrid};
///
/// let client = RestClient::builder().origin("https://app.example.com").build();
/// let grid: TableGrid<Customer> = TableGrid::builder()
///     .transport(client)
///     .config(GridConfig {
///         base_url: Some("customer".to_string()),
///         ..GridConfig::default()
///     })
///     .build();
///
/// grid.initialize().await?;
/// for row in grid.rows() {
///     println!("{}", row.id());
/// }
/// ```
pub struct TableGrid<T: GridRow> {
    inner: Arc<GridInner<T>>,
}

impl<T: GridRow> Clone for TableGrid<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct GridInner<T> {
    config: GridConfig,
    transport: Arc<dyn Transport>,
    messages: Arc<dyn MessageSink>,
    store: Arc<dyn StateStore>,
    state: Mutex<GridState<T>>,
    /// Monotonically increasing query generation; responses from a
    /// superseded generation are discarded.
    generation: AtomicU64,
    pending_search: Mutex<Option<CancellationToken>>,
    listeners: Mutex<Vec<ParamsListener>>,
}

struct GridState<T> {
    params: QueryParams,
    rows: Vec<T>,
    total_count: u64,
    checked: SelectionModel,
    selected: SelectionModel,
    loading: bool,
    first_load: bool,
    show_pagination: bool,
}

impl<T: GridRow + DeserializeOwned> TableGrid<T> {
    /// Creates a new builder for constructing a grid.
    pub fn builder() -> TableGridBuilder<T, Missing> {
        TableGridBuilder::new()
    }

    fn state(&self) -> MutexGuard<'_, GridState<T>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Initialization and query state
    // =========================================================================

    /// Initializes paging and sorting, restores persisted query state, and
    /// issues the first query when `auto_load` is set.
    ///
    /// Call once from the composition root after the grid's content is
    /// attached.
    pub async fn initialize(&self) -> Result<(), Error> {
        {
            let mut state = self.state();
            state.params.page = 1;
            if let Some(first) = self.inner.config.page_size_options.first() {
                state.params.page_size = *first;
            }
            if let Some(sort_key) = &self.inner.config.sort_key {
                state.params.order = Some(sort_key.clone());
            }
        }
        self.restore_params().await;
        if self.inner.config.auto_load {
            self.query().await?;
        }
        Ok(())
    }

    async fn restore_params(&self) {
        let Some(key) = &self.inner.config.key else {
            return;
        };
        let Some(params) = self.inner.store.get(key).await else {
            return;
        };
        self.state().params = params.clone();
        self.notify_restored(&params);
    }

    /// Invokes the restore listeners with the lock released, so a listener
    /// may itself register further listeners.
    fn notify_restored(&self, params: &QueryParams) {
        let listeners = std::mem::take(
            &mut *self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for listener in &listeners {
            listener(params);
        }
        let mut guard = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let added = std::mem::replace(&mut *guard, listeners);
        guard.extend(added);
    }

    /// Registers a listener fired when persisted query state is restored.
    pub fn on_params_restored(&self, listener: impl Fn(&QueryParams) + Send + Sync + 'static) {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Returns a copy of the current query parameters.
    pub fn params(&self) -> QueryParams {
        self.state().params.clone()
    }

    /// Mutates the current query parameters in place.
    ///
    /// Typically used to push search-box input into a filter field before
    /// calling [`search`](Self::search).
    pub fn update_params(&self, mutate: impl FnOnce(&mut QueryParams)) {
        mutate(&mut self.state().params);
    }

    /// Handles a column sort event and reloads.
    ///
    /// `None` means the column header was reset; the order falls back to the
    /// configured `sort_key`.
    pub async fn sort(&self, column: &str, direction: Option<SortDirection>) -> Result<(), Error> {
        {
            let mut state = self.state();
            state.params.order =
                resolve_order(column, direction, self.inner.config.sort_key.as_deref());
        }
        self.query().await
    }

    /// Handles a page index change and reloads. The first page is 1.
    pub async fn page_index_change(&self, page: u64) -> Result<(), Error> {
        self.state().params.page = page;
        self.query().await
    }

    /// Handles a page size change, resets to the first page, and reloads.
    pub async fn page_size_change(&self, page_size: u64) -> Result<(), Error> {
        {
            let mut state = self.state();
            state.params.page_size = page_size;
            state.params.page = 1;
        }
        self.query().await
    }

    /// Replaces the query state wholesale and reloads from the first page
    /// with the originally configured sort key, dropping persisted state.
    pub async fn refresh(&self, params: QueryParams) -> Result<(), Error> {
        {
            let mut state = self.state();
            state.params = params;
            state.params.page = 1;
            if let Some(first) = self.inner.config.page_size_options.first() {
                state.params.page_size = *first;
            }
            state.params.order = self.inner.config.sort_key.clone();
        }
        if let Some(key) = &self.inner.config.key {
            self.inner.store.remove(key).await;
        }
        self.query().await
    }

    // =========================================================================
    // Data loading
    // =========================================================================

    /// Issues a query with the current parameters against the configured URL.
    pub async fn query(&self) -> Result<(), Error> {
        self.query_with(None, None).await
    }

    /// Issues a query with an explicit URL and/or parameters.
    ///
    /// The effective URL is the argument, else the configured `url`, else
    /// `/api/{base_url}`; with none of those set the call logs and returns
    /// without issuing a request. Effective parameters are persisted under
    /// the configured key before the request goes out.
    pub async fn query_with(
        &self,
        url: Option<&str>,
        params: Option<QueryParams>,
    ) -> Result<(), Error> {
        let url = url
            .map(str::to_string)
            .or_else(|| self.inner.config.load_url());
        let Some(url) = url else {
            log::warn!("grid query url not configured, skipping load");
            return Ok(());
        };
        let params = params.unwrap_or_else(|| self.state().params.clone());
        if let Some(key) = &self.inner.config.key {
            self.inner.store.add(key, params.clone()).await;
        }
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            // The very first load keeps the indicator untouched; every later
            // load sets it.
            let mut state = self.state();
            if state.first_load {
                state.first_load = false;
            } else {
                state.loading = true;
            }
        }
        let result = self.inner.transport.get_json(&url, &params.to_pairs()).await;
        self.state().loading = false;
        let payload = result?;
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            log::debug!("discarding stale grid response for {url}");
            return Ok(());
        }
        let mut list: PagerList<T> = PagerList::from_value(payload)?;
        list.init_line_numbers();
        let mut state = self.state();
        state.total_count = list.total_count;
        state.rows = list.data;
        state.checked.clear();
        state.selected.clear();
        state.show_pagination = state.total_count > 0;
        Ok(())
    }

    /// Schedules a debounced query after `delay` (or the configured default).
    ///
    /// Scheduling cancels any pending search, so only the last call within
    /// the window fires, and the query reads the parameters current at fire
    /// time. Must be called from within a tokio runtime.
    pub fn search(&self, delay: Option<Duration>) {
        let delay = delay.unwrap_or(self.inner.config.delay);
        let token = CancellationToken::new();
        let previous = self
            .inner
            .pending_search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        let grid = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Err(error) = grid.query().await {
                        log::warn!("debounced grid query failed: {error}");
                    }
                }
            }
        });
    }

    /// Clears the loaded rows, total count and both selection sets.
    pub fn clear(&self) {
        let mut state = self.state();
        state.rows.clear();
        state.total_count = 0;
        state.checked.clear();
        state.selected.clear();
        state.show_pagination = false;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles the header master checkbox: clears the checkbox selection when
    /// it is full, otherwise selects every displayed row.
    pub fn master_toggle(&self) {
        let mut guard = self.state();
        let state = &mut *guard;
        if Self::master_checked(state) {
            state.checked.clear();
            return;
        }
        for row in &state.rows {
            state.checked.select(row.id());
        }
    }

    /// Returns `true` when every displayed row is checked.
    pub fn is_master_checked(&self) -> bool {
        Self::master_checked(&self.state())
    }

    /// Returns the master checkbox tri-state signal: something is checked,
    /// but not the full displayed set.
    pub fn is_master_indeterminate(&self) -> bool {
        let state = self.state();
        state.checked.has_value() && (!Self::all_checked(&state) || state.rows.is_empty())
    }

    fn master_checked(state: &GridState<T>) -> bool {
        state.checked.has_value()
            && Self::all_checked(state)
            && state.checked.len() >= state.rows.len()
    }

    fn all_checked(state: &GridState<T>) -> bool {
        state.rows.iter().all(|row| state.checked.is_selected(&row.id()))
    }

    /// Toggles a row's checkbox.
    pub fn toggle_checked(&self, row: &T) {
        self.state().checked.toggle(&row.id());
    }

    /// Returns `true` if the row's checkbox is checked.
    pub fn is_checked(&self, row: &T) -> bool {
        self.state().checked.is_selected(&row.id())
    }

    /// Returns the checked rows, in display order.
    pub fn checked_rows(&self) -> Vec<T> {
        let state = self.state();
        state
            .rows
            .iter()
            .filter(|row| state.checked.is_selected(&row.id()))
            .cloned()
            .collect()
    }

    /// Returns the comma-joined identifiers of the checked rows.
    pub fn checked_ids(&self) -> String {
        self.checked_rows()
            .iter()
            .map(GridRow::id)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Makes `row` the single click-selected row, independent of the
    /// checkbox selection.
    pub fn check_row(&self, row: &T) {
        let mut state = self.state();
        state.selected.clear();
        state.selected.select(row.id());
    }

    /// Returns `true` if the row is the current click-selected row.
    pub fn is_row_selected(&self, row: &T) -> bool {
        self.state().selected.is_selected(&row.id())
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes rows by id after confirmation, defaulting to the checkbox
    /// selection when `ids` is `None`.
    ///
    /// With nothing selected and no explicit ids, shows a warning and issues
    /// no request. On success a toast is shown and the grid re-queries.
    pub async fn delete(&self, ids: Option<&str>) -> Result<(), Error> {
        let mut options = DeleteOptions::new();
        if let Some(ids) = ids {
            options = options.ids(ids);
        }
        self.delete_with(options).await
    }

    /// Deletes rows with explicit options.
    ///
    /// A supplied `on_success` callback runs instead of the default success
    /// toast and re-query.
    pub async fn delete_with(&self, options: DeleteOptions) -> Result<(), Error> {
        let text = &self.inner.config.text;
        let ids = options.ids.filter(|ids| !ids.is_empty()).or_else(|| {
            let checked = self.checked_ids();
            (!checked.is_empty()).then_some(checked)
        });
        let Some(ids) = ids else {
            self.inner.messages.warn(&text.delete_not_selected).await;
            return Ok(());
        };
        if !self.inner.messages.confirm(&text.delete_confirm).await {
            return Ok(());
        }
        let url = options.url.or_else(|| self.inner.config.remove_url());
        let Some(url) = url else {
            log::warn!("grid delete url not configured, skipping delete");
            return Ok(());
        };
        self.inner
            .transport
            .post_json(&url, &Value::String(ids))
            .await?;
        match options.on_success {
            Some(handler) => handler(),
            None => {
                self.inner.messages.success(&text.delete_success).await;
                self.query().await?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Display state
    // =========================================================================

    /// Returns a copy of the currently displayed rows.
    pub fn rows(&self) -> Vec<T> {
        self.state().rows.clone()
    }

    /// Returns the total row count across all pages.
    pub fn total_count(&self) -> u64 {
        self.state().total_count
    }

    /// Returns `true` while a (non-first) load is in flight.
    pub fn loading(&self) -> bool {
        self.state().loading
    }

    /// Returns `true` when the pagination UI should be shown.
    pub fn show_pagination(&self) -> bool {
        self.state().show_pagination
    }

    /// Returns the grid configuration.
    pub fn config(&self) -> &GridConfig {
        &self.inner.config
    }
}

/// Options for [`TableGrid::delete_with`].
#[derive(Default)]
pub struct DeleteOptions {
    ids: Option<String>,
    url: Option<String>,
    on_success: Option<Box<dyn FnOnce() + Send>>,
}

impl DeleteOptions {
    /// Creates empty options: ids from the checkbox selection, the configured
    /// delete URL, and the default success handling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comma-joined ids to delete.
    pub fn ids(mut self, ids: impl Into<String>) -> Self {
        self.ids = Some(ids.into());
        self
    }

    /// Sets the delete URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets a success callback invoked instead of the default toast and
    /// re-query.
    pub fn on_success(mut self, handler: impl FnOnce() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(handler));
        self
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Builder for constructing a [`TableGrid`].
///
/// Uses the typestate pattern so the required transport must be set before
/// `build` becomes available. Messages default to [`LogMessages`] and the
/// store to [`MemoryStore`].
pub struct TableGridBuilder<T, Tr> {
    transport: Tr,
    config: GridConfig,
    messages: Option<Arc<dyn MessageSink>>,
    store: Option<Arc<dyn StateStore>>,
    _row: PhantomData<T>,
}

impl<T: GridRow> TableGridBuilder<T, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            transport: Missing,
            config: GridConfig::default(),
            messages: None,
            store: None,
            _row: PhantomData,
        }
    }

    /// Sets the transport the grid queries through.
    pub fn transport(
        self,
        transport: impl Transport + 'static,
    ) -> TableGridBuilder<T, Set<Arc<dyn Transport>>> {
        TableGridBuilder {
            transport: Set::new(Arc::new(transport) as Arc<dyn Transport>),
            config: self.config,
            messages: self.messages,
            store: self.store,
            _row: PhantomData,
        }
    }
}

impl<T: GridRow> Default for TableGridBuilder<T, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Tr> TableGridBuilder<T, Tr> {
    /// Sets the grid configuration.
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the notification sink.
    pub fn messages(mut self, messages: impl MessageSink + 'static) -> Self {
        self.messages = Some(Arc::new(messages));
        self
    }

    /// Sets the query-state store.
    pub fn store(mut self, store: impl StateStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }
}

impl<T: GridRow> TableGridBuilder<T, Set<Arc<dyn Transport>>> {
    /// Builds the [`TableGrid`].
    ///
    /// This method is only available once the transport has been set.
    pub fn build(self) -> TableGrid<T> {
        let config = self.config;
        let state = GridState {
            params: config.params.clone(),
            rows: Vec::new(),
            total_count: 0,
            checked: SelectionModel::multi(),
            selected: SelectionModel::single(),
            loading: true,
            first_load: true,
            show_pagination: config.show_pagination,
        };
        TableGrid {
            inner: Arc::new(GridInner {
                config,
                transport: self.transport.into_inner(),
                messages: self
                    .messages
                    .unwrap_or_else(|| Arc::new(LogMessages::new())),
                store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
                state: Mutex::new(state),
                generation: AtomicU64::new(0),
                pending_search: Mutex::new(None),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }
}
