//! Pagination controller
//!
//! Drives full reloads, incremental page loads and detail fetches through a
//! [`ResourceStrategy`], owning the collection those fetches fill.

use super::events::ListEvent;
use super::types::{ListOptions, LoadingError, LoadingStatus, PageRequest, PaginationMeta};
use crate::decode::{DecoderConfig, PayloadDecoder};
use crate::detail::{DetailFetcher, DetailFilterView, DetailRequest, DetailView};
use crate::error::{Error, ErrorCode};
use crate::record::{ItemRecord, RecordStore};
use crate::resource::{Reply, ResourceStrategy};
use crate::schema::{Role, SchemaRegistry};
use crate::types::{AcceptFormat, JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Incrementally loaded list over a paginated collection endpoint
///
/// At most one fetch, page or detail, is in flight at a time. Triggers that
/// arrive while one is outstanding, or while the status is `Error`, are
/// ignored. Completions that arrive after the status moved away from the
/// matching in-flight state are discarded.
pub struct PaginationController {
    strategy: Arc<dyn ResourceStrategy>,

    // Query
    id_field: String,
    sort: Vec<String>,
    per_page: u32,
    filters: BTreeMap<String, String>,
    fields: Vec<String>,
    decoder_config: DecoderConfig,
    decoder: Box<dyn PayloadDecoder>,

    // Server-reported counters
    current_page: u32,
    total_count: u32,
    page_count: u32,

    status: LoadingStatus,
    error: LoadingError,
    last_requested_detail_id: Option<String>,

    records: RecordStore,
    schema: SchemaRegistry,
    detail_fetcher: DetailFetcher,
    detail_view: DetailFilterView,

    subscribers: Vec<UnboundedSender<ListEvent>>,
}

impl PaginationController {
    /// Create a controller for the resource behind `strategy`
    pub fn new(strategy: Arc<dyn ResourceStrategy>, options: ListOptions) -> Self {
        let decoder = options.decoder.build();
        Self {
            strategy,
            detail_fetcher: DetailFetcher::new(options.id_field.clone()),
            id_field: options.id_field,
            sort: options.sort,
            per_page: options.per_page,
            filters: options.filters,
            fields: options.fields,
            decoder_config: options.decoder,
            decoder,
            current_page: 0,
            total_count: 0,
            page_count: 0,
            status: LoadingStatus::Idle,
            error: LoadingError::default(),
            last_requested_detail_id: None,
            records: RecordStore::new(),
            schema: SchemaRegistry::new(),
            detail_view: DetailFilterView::new(),
            subscribers: Vec::new(),
        }
    }

    /// Receive change notifications
    pub fn subscribe(&mut self) -> UnboundedReceiver<ListEvent> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    // ========================================================================
    // Triggers
    // ========================================================================

    /// Request a full reload on the next fetch
    ///
    /// Does not fetch by itself. Ignored while a fetch is in flight or after
    /// an error; returns whether the request was accepted.
    pub fn reload(&mut self) -> bool {
        if !(self.status.is_idle() || self.status == LoadingStatus::RequestToReload) {
            debug!(status = ?self.status, "Ignoring reload request");
            return false;
        }
        self.set_status(LoadingStatus::RequestToReload);
        true
    }

    /// Whether the consumer should ask for more
    ///
    /// Compares the page counter with the total record count, as the
    /// consuming views expect.
    pub fn can_fetch_more(&self) -> bool {
        self.current_page < self.total_count
    }

    /// Enter the page-fetch state and build the request to issue
    ///
    /// Returns `None` when the trigger is ignored. The caller must deliver
    /// the outcome to [`on_fetch_more_completed`](Self::on_fetch_more_completed)
    /// or [`on_fetch_error`](Self::on_fetch_error).
    pub fn request_more(&mut self) -> Option<PageRequest> {
        let full_reload = match self.status {
            LoadingStatus::RequestToReload => {
                self.set_current_page(0);
                self.set_status(LoadingStatus::FullReloadProcessing);
                true
            }
            status if status.is_idle() => {
                self.set_status(LoadingStatus::LoadMoreProcessing);
                false
            }
            status => {
                debug!(?status, "Ignoring fetch-more trigger");
                return None;
            }
        };

        self.set_current_page(self.current_page.saturating_add(1));
        debug!(page = self.current_page, full_reload, "Requesting page");

        Some(PageRequest {
            sort: self.sort.clone(),
            per_page: self.per_page,
            page: self.current_page,
            filters: self.filters.clone(),
            fields: self.fields.clone(),
            accept: self.decoder_config.format,
            full_reload,
        })
    }

    /// Fetch the next page (or the first, after [`reload`](Self::reload))
    ///
    /// Returns the status once the fetch has been applied or ignored.
    pub async fn fetch_more(&mut self) -> LoadingStatus {
        let Some(request) = self.request_more() else {
            return self.status;
        };

        let strategy = Arc::clone(&self.strategy);
        match strategy.fetch_page(&request).await {
            Ok(reply) => self.on_fetch_more_completed(reply),
            Err(e) => self.on_fetch_error(e.code(), e.to_string()),
        }
        self.status
    }

    /// Select `id` for the detail view and build its detail request
    ///
    /// Returns `None` when ignored because a fetch is in flight or the status
    /// is `Error`, and also when the record already carries its full detail;
    /// in that case the selection still moves to `id`.
    pub fn request_detail(&mut self, id: &str) -> Option<DetailRequest> {
        if !self.status.is_idle() {
            debug!(status = ?self.status, id, "Ignoring detail trigger");
            return None;
        }

        if !self.detail_fetcher.needs_fetch(&self.records, id) {
            debug!(id, "Record already has full detail");
            self.select_detail(id);
            return None;
        }

        self.set_status(LoadingStatus::LoadDetailsProcessing);
        self.select_detail(id);

        Some(
            self.detail_fetcher
                .request(id, self.decoder_config.format, &self.fields),
        )
    }

    /// Fetch the full representation of `id` and merge it into the list
    pub async fn fetch_detail(&mut self, id: &str) -> LoadingStatus {
        let Some(request) = self.request_detail(id) else {
            return self.status;
        };

        let strategy = Arc::clone(&self.strategy);
        match strategy.fetch_detail(&request).await {
            Ok(reply) => self.on_fetch_detail_completed(reply),
            Err(e) => self.on_fetch_error(e.code(), e.to_string()),
        }
        self.status
    }

    /// Leave any state, including `Error`, for `Idle`
    ///
    /// A reply for a fetch that was in flight is discarded when it arrives.
    pub fn force_idle(&mut self) {
        self.set_status(LoadingStatus::Idle);
    }

    // ========================================================================
    // Completions
    // ========================================================================

    /// Apply a page reply
    pub fn on_fetch_more_completed(&mut self, reply: Reply) {
        if !self.status.is_page_fetch() {
            debug!(status = ?self.status, "Discarding stale page reply");
            return;
        }
        let full_reload = self.status == LoadingStatus::FullReloadProcessing;

        self.update_pagination(reply.pagination);

        let values = match self.decoder.decode_list(&reply.body) {
            Ok(values) => values,
            Err(e) => {
                self.on_fetch_error(e.code(), e.to_string());
                return;
            }
        };

        if full_reload {
            self.records.clear();
            self.emit(ListEvent::Reset);
        }

        if values.is_empty() {
            let err = Error::EmptyPage;
            warn!(rows = self.records.len(), "{err}");
            if full_reload {
                self.refresh_detail_view();
            }
            self.record_error(err.code(), err.to_string());
            self.set_status(LoadingStatus::Error);
            self.emit(ListEvent::CountChanged(self.records.len()));
            return;
        }

        let first = self.records.len();
        for fields in values {
            let fields = self.strategy.pre_process(fields);
            self.records.push(ItemRecord::new(fields, &self.id_field));
        }
        let last = self.records.len() - 1;
        self.emit(ListEvent::RowsInserted { first, last });

        self.schema.discover_if_needed(self.records.as_slice());
        self.refresh_detail_view();

        info!(
            inserted = last - first + 1,
            rows = self.records.len(),
            page = self.current_page,
            total = self.total_count,
            "Page loaded"
        );
        self.set_status(LoadingStatus::Idle);
        self.emit(ListEvent::CountChanged(self.records.len()));
    }

    /// Apply a detail reply
    pub fn on_fetch_detail_completed(&mut self, reply: Reply) {
        if self.status != LoadingStatus::LoadDetailsProcessing {
            debug!(status = ?self.status, "Discarding stale detail reply");
            return;
        }

        let merge = match self
            .detail_fetcher
            .apply(&mut self.records, self.decoder.as_ref(), &reply.body)
        {
            Ok(merge) => merge,
            Err(e) => {
                self.on_fetch_error(e.code(), e.to_string());
                return;
            }
        };

        if merge.inserted {
            self.emit(ListEvent::RowsInserted {
                first: merge.row,
                last: merge.row,
            });
            self.schema.discover_if_needed(self.records.as_slice());
            self.emit(ListEvent::CountChanged(self.records.len()));
        } else {
            self.emit(ListEvent::RowChanged(merge.row));
        }

        self.refresh_detail_view();
        info!(id = %merge.id, row = merge.row, "Detail loaded");
        self.set_status(LoadingStatus::IdleDetails);
    }

    /// Record a failed fetch
    ///
    /// Applies whatever was in flight; the status stays `Error` until
    /// [`force_idle`](Self::force_idle).
    pub fn on_fetch_error(&mut self, code: ErrorCode, message: impl Into<String>) {
        let message = message.into();
        warn!(%code, %message, status = ?self.status, "Fetch failed");
        self.record_error(code, message);
        self.set_status(LoadingStatus::Error);
    }

    // ========================================================================
    // Query configuration
    // ========================================================================

    /// Sort expressions for the next request
    pub fn set_sort(&mut self, sort: Vec<String>) {
        self.sort = sort;
    }

    /// Page size for the next request
    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page;
    }

    /// Filters for the next request
    pub fn set_filters(&mut self, filters: BTreeMap<String, String>) {
        self.filters = filters;
    }

    /// Field subset for the next request
    pub fn set_fields(&mut self, fields: Vec<String>) {
        self.fields = fields;
    }

    /// Identity field for records created from now on
    pub fn set_id_field(&mut self, id_field: impl Into<String>) {
        self.id_field = id_field.into();
        self.detail_fetcher.set_id_field(self.id_field.clone());
    }

    /// Representation to request, switching the payload decoder
    pub fn set_accept(&mut self, accept: AcceptFormat) {
        if self.decoder_config.format == accept {
            return;
        }
        self.decoder_config.format = accept;
        self.decoder = self.decoder_config.build();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current loading status
    pub fn loading_status(&self) -> LoadingStatus {
        self.status
    }

    /// Last recorded error
    pub fn loading_error(&self) -> &LoadingError {
        &self.error
    }

    /// Last recorded error code
    pub fn loading_error_code(&self) -> ErrorCode {
        self.error.code
    }

    /// Last recorded error message
    pub fn loading_error_message(&self) -> &str {
        &self.error.message
    }

    /// Pages requested so far, as last reported by the server
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total records reported by the server
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Total pages reported by the server
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Counters with the requested page size
    pub fn pagination(&self) -> PaginationMeta {
        PaginationMeta {
            current_page: self.current_page,
            total_count: self.total_count,
            page_count: self.page_count,
            per_page: self.per_page,
        }
    }

    /// Requested page size
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Sort expressions
    pub fn sort(&self) -> &[String] {
        &self.sort
    }

    /// Filters
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Requested field subset
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Requested representation
    pub fn accept(&self) -> AcceptFormat {
        self.decoder_config.format
    }

    /// Identity field
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Id most recently passed to a detail fetch
    pub fn last_requested_detail_id(&self) -> Option<&str> {
        self.last_requested_detail_id.as_deref()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The collection
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// First record with `id`
    pub fn find_by_id(&self, id: &str) -> Option<&ItemRecord> {
        self.records.find_by_id(id)
    }

    /// Discovered fields and roles
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// `(role, field)` table
    pub fn role_names(&self) -> impl Iterator<Item = (Role, &str)> {
        self.schema.roles()
    }

    /// Role of the identity field, once discovered
    pub fn id_field_role(&self) -> Option<Role> {
        self.schema.role_for_field(&self.id_field)
    }

    /// Value at `row` for the field behind `role`
    pub fn data(&self, row: usize, role: Role) -> Option<&JsonValue> {
        let field = self.schema.field_for_role(role)?;
        self.records.value(row, field)
    }

    /// Projection holding only the selected detail record
    pub fn detail_view(&self) -> DetailView<'_> {
        self.detail_view.project(&self.records)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn emit(&mut self, event: ListEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn set_status(&mut self, status: LoadingStatus) {
        if self.status == status {
            return;
        }
        debug!(from = ?self.status, to = ?status, "Loading status changed");
        self.status = status;
        self.emit(ListEvent::StatusChanged(status));
    }

    fn set_current_page(&mut self, page: u32) {
        if self.current_page == page {
            return;
        }
        self.current_page = page;
        self.emit(ListEvent::PaginationChanged(self.pagination()));
    }

    fn update_pagination(&mut self, meta: PaginationMeta) {
        if (self.current_page, self.total_count, self.page_count)
            == (meta.current_page, meta.total_count, meta.page_count)
        {
            return;
        }
        self.current_page = meta.current_page;
        self.total_count = meta.total_count;
        self.page_count = meta.page_count;
        self.emit(ListEvent::PaginationChanged(self.pagination()));
    }

    fn record_error(&mut self, code: ErrorCode, message: String) {
        self.error = LoadingError {
            code,
            message: message.clone(),
        };
        self.emit(ListEvent::ErrorChanged { code, message });
    }

    fn select_detail(&mut self, id: &str) {
        self.last_requested_detail_id = Some(id.to_string());
        self.detail_view.select(Some(id.to_string()));
        self.refresh_detail_view();
    }

    fn refresh_detail_view(&mut self) {
        self.detail_view.invalidate(&self.records);
        if let Some(id) = self.detail_view.selected() {
            let event = ListEvent::DetailChanged(Some(id.to_string()));
            self.emit(event);
        }
    }
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("status", &self.status)
            .field("rows", &self.records.len())
            .field("current_page", &self.current_page)
            .field("total_count", &self.total_count)
            .field("page_count", &self.page_count)
            .field("fields", &self.schema.field_names())
            .finish_non_exhaustive()
    }
}
