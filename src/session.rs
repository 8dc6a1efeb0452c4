use thiserror::Error;
use tracing::{debug, info, warn};

use crate::columns::{self, ColumnError, ColumnToggles};
use crate::detail::{Applied, DetailLoader, DetailPolicy, DetailView};
use crate::events::{Command, Completion, UiEvent};
use crate::feed::{FeedAdapter, FeedError, Narrowing};
use crate::grid::{DataGrid, TableGrid};
use crate::layout::{DashboardLayout, LayoutError, Orientation};
use crate::model::{RecordId, ThingType};
use crate::report::{Issue, ReportFlow, NO_SELECTION_MESSAGE};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{}", NO_SELECTION_MESSAGE)]
    NoSelection,

    #[error("no report is open")]
    ReportNotOpen,

    #[error("no issue is waiting for confirmation")]
    NothingToConfirm,

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("invalid filter: {message}")]
    Filter { message: String },
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub page_size: u32,
    pub narrowing: Narrowing,
    pub columns: ColumnToggles,
    pub detail_policy: DetailPolicy,
    pub orientation: Orientation,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: crate::feed::DEFAULT_PAGE_SIZE,
            narrowing: Narrowing::default(),
            columns: ColumnToggles::default(),
            detail_policy: DetailPolicy::default(),
            orientation: Orientation::default(),
        }
    }
}

/// Everything one browsing session owns. Handlers take events in and hand
/// fetch commands back; fetch results come in through [`Session::complete`].
#[derive(Debug)]
pub struct Session<G: DataGrid = TableGrid> {
    grid: G,
    layout: DashboardLayout,
    feed: FeedAdapter,
    toggles: ColumnToggles,
    detail_loader: DetailLoader,
    detail: DetailView,
    selection: Option<RecordId>,
    report: ReportFlow,
    issues: Vec<Issue>,
    has_bug_notice: bool,
    types: Option<Vec<ThingType>>,
    types_error: Option<String>,
}

impl Session<TableGrid> {
    pub fn new(options: SessionOptions) -> Result<Self, SessionError> {
        Self::with_grid(TableGrid::default(), options)
    }
}

impl<G: DataGrid> Session<G> {
    pub fn with_grid(mut grid: G, options: SessionOptions) -> Result<Self, SessionError> {
        let feed = FeedAdapter::new(options.page_size, options.narrowing)?;
        let layout = DashboardLayout::new(options.orientation)?;
        grid.set_columns(columns::project(&options.columns));
        Ok(Self {
            grid,
            layout,
            feed,
            toggles: options.columns,
            detail_loader: DetailLoader::new(options.detail_policy),
            detail: DetailView::default(),
            selection: None,
            report: ReportFlow::default(),
            issues: Vec::new(),
            has_bug_notice: false,
            types: None,
            types_error: None,
        })
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    pub fn feed(&self) -> &FeedAdapter {
        &self.feed
    }

    pub fn toggles(&self) -> &ColumnToggles {
        &self.toggles
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn detail_policy(&self) -> DetailPolicy {
        self.detail_loader.policy()
    }

    pub fn selection(&self) -> Option<&RecordId> {
        self.selection.as_ref()
    }

    pub fn report(&self) -> &ReportFlow {
        &self.report
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn has_bug_notice(&self) -> bool {
        self.has_bug_notice
    }

    pub fn types(&self) -> Option<&[ThingType]> {
        self.types.as_deref()
    }

    pub fn types_error(&self) -> Option<&str> {
        self.types_error.as_deref()
    }

    /// Initial load: the first page of the feed.
    pub fn start(&mut self) -> Result<Vec<Command>, SessionError> {
        self.handle(UiEvent::PageRequested { page: 1 })
    }

    pub fn handle(&mut self, event: UiEvent) -> Result<Vec<Command>, SessionError> {
        match event {
            UiEvent::PageRequested { page } => {
                let request = self.feed.request_page(page)?;
                Ok(vec![Command::FetchPage(request)])
            }
            UiEvent::NextPage => {
                let request = self.feed.request_next()?;
                Ok(vec![Command::FetchPage(request)])
            }
            UiEvent::RowSelected { id } => Ok(self.on_row_selected(id)),
            UiEvent::ToggleChanged { field, checked } => {
                self.toggles.set(&field, checked)?;
                Ok(Vec::new())
            }
            UiEvent::TogglesApplied => {
                let projected = columns::project(&self.toggles);
                info!(columns = projected.len(), "applying column selection");
                self.grid.set_columns(projected);
                Ok(Vec::new())
            }
            UiEvent::FilterApplied { field, op, value } => {
                self.grid
                    .set_filter(&field, op, &value)
                    .map_err(|message| SessionError::Filter { message })?;
                Ok(Vec::new())
            }
            UiEvent::FilterCleared => {
                self.grid.clear_filter();
                Ok(Vec::new())
            }
            UiEvent::NarrowingChanged { status, authority } => {
                info!(?status, ?authority, "reloading with new narrowing");
                self.feed.set_narrowing(Narrowing { status, authority });
                self.grid.clear_rows();
                self.selection = None;
                self.handle(UiEvent::PageRequested { page: 1 })
            }
            UiEvent::TypesRequested => Ok(vec![Command::FetchTypes]),
            UiEvent::ReportOpened => {
                self.report.open();
                Ok(Vec::new())
            }
            UiEvent::ReportClosed => {
                self.report.close();
                Ok(Vec::new())
            }
            UiEvent::IssueSubmitted { body } => {
                if !self.report.is_drafting() {
                    return Err(SessionError::ReportNotOpen);
                }
                match self.report.submit(&body, self.selection.as_ref()) {
                    Some(issue) => {
                        debug!(record = %issue.record_id, "issue drafted");
                        Ok(Vec::new())
                    }
                    None => Err(SessionError::NoSelection),
                }
            }
            UiEvent::FeedbackConfirmed => {
                let issue = self
                    .report
                    .confirm()
                    .ok_or(SessionError::NothingToConfirm)?;
                info!(record = %issue.record_id, body = %issue.body, "record flagged as buggy");
                self.grid.flag_row(&issue.record_id);
                self.issues.push(issue);
                Ok(Vec::new())
            }
            UiEvent::NoticeDismissed => {
                self.has_bug_notice = false;
                Ok(Vec::new())
            }
            UiEvent::PanesChanged(direction) => {
                self.layout.change_panes(direction)?;
                Ok(Vec::new())
            }
        }
    }

    fn on_row_selected(&mut self, id: RecordId) -> Vec<Command> {
        if self.grid.is_flagged(&id) {
            debug!(id = %id, "flagged row clicked");
            self.has_bug_notice = true;
            self.detail.clear();
            return Vec::new();
        }
        self.grid.select_row(&id);
        self.selection = Some(id.clone());
        vec![Command::FetchDetail(self.detail_loader.begin(id))]
    }

    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Page { request, result } => {
                if self.feed.pending_request() != Some(&request) {
                    debug!(offset = request.offset, "dropping page for a superseded request");
                    return;
                }
                match result {
                    Ok(response) => {
                        // Only the page right after the current one extends the
                        // table; any other page replaces it.
                        let extends = self.feed.pending_page() == Some(self.feed.current_page() + 1);
                        let response = self.feed.on_response(response);
                        if !extends {
                            debug!(page = self.feed.current_page(), "replacing table rows");
                            self.grid.clear_rows();
                            if let Some(id) = self.selection.as_ref() {
                                self.grid.select_row(id);
                            }
                        }
                        self.grid.append_rows(response.data);
                    }
                    Err(e) => self.feed.on_failure(e.to_string()),
                }
            }
            Completion::Detail { ticket, result } => {
                if let Applied::Failed =
                    self.detail_loader.apply(&ticket, result, &mut self.detail)
                {
                    warn!(id = %ticket.id, "detail fetch failed");
                }
            }
            Completion::Types { result } => match result {
                Ok(types) => {
                    self.types = Some(types);
                    self.types_error = None;
                }
                Err(e) => {
                    warn!(error = %e, "types fetch failed");
                    self.types_error = Some(e.to_string());
                }
            },
        }
    }
}
