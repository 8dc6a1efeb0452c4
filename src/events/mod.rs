use serde_json::Value;

use crate::detail::DetailTicket;
use crate::grid::FilterOp;
use crate::layout::Orientation;
use crate::model::{PageRequest, PageResponse, RecordId, ThingType};
use crate::source::FetchError;

/// User intents, independent of whatever surface produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    PageRequested { page: u64 },
    NextPage,
    RowSelected { id: RecordId },
    ToggleChanged { field: String, checked: bool },
    TogglesApplied,
    FilterApplied { field: String, op: FilterOp, value: String },
    FilterCleared,
    NarrowingChanged { status: Option<i64>, authority: Option<String> },
    TypesRequested,
    ReportOpened,
    ReportClosed,
    IssueSubmitted { body: String },
    FeedbackConfirmed,
    NoticeDismissed,
    PanesChanged(Orientation),
}

/// Asynchronous work the host must run and feed back as a [`Completion`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FetchPage(PageRequest),
    FetchDetail(DetailTicket),
    FetchTypes,
}

#[derive(Debug)]
pub enum Completion {
    Page {
        request: PageRequest,
        result: Result<PageResponse, FetchError>,
    },
    Detail {
        ticket: DetailTicket,
        result: Result<Value, FetchError>,
    },
    Types {
        result: Result<Vec<ThingType>, FetchError>,
    },
}
