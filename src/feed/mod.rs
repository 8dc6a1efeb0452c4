use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{PageRequest, PageResponse};

pub const DEFAULT_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("invalid page {page}, pages start at 1")]
    InvalidPage { page: u64 },

    #[error("invalid page size {limit}, expected a positive integer")]
    InvalidLimit { limit: u32 },

    #[error("page {page} requested while offset {pending_offset} is still loading")]
    Busy { page: u64, pending_offset: u64 },

    #[error("no more pages to load")]
    Exhausted,
}

/// Translates a 1-based page number into the zero-based offset the list
/// endpoint expects.
pub fn page_request(page: u64, limit: u32) -> Result<PageRequest, FeedError> {
    if page == 0 {
        return Err(FeedError::InvalidPage { page });
    }
    if limit == 0 {
        return Err(FeedError::InvalidLimit { limit });
    }
    Ok(PageRequest {
        offset: (page - 1).saturating_mul(u64::from(limit)),
        limit,
        status: None,
        authority: None,
    })
}

/// Server-side list narrowing sent with every page request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Narrowing {
    pub status: Option<i64>,
    pub authority: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FeedAdapter {
    page_size: u32,
    narrowing: Narrowing,
    loaded: u64,
    total: u64,
    current_page: u64,
    server_last_page: Option<u64>,
    responses: u64,
    pending: Option<(u64, PageRequest)>,
    last_error: Option<String>,
}

impl FeedAdapter {
    pub fn new(page_size: u32, narrowing: Narrowing) -> Result<Self, FeedError> {
        if page_size == 0 {
            return Err(FeedError::InvalidLimit { limit: page_size });
        }
        Ok(Self {
            page_size,
            narrowing,
            loaded: 0,
            total: 0,
            current_page: 0,
            server_last_page: None,
            responses: 0,
            pending: None,
            last_error: None,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn narrowing(&self) -> &Narrowing {
        &self.narrowing
    }

    /// Running count of records received across every completed page.
    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    /// `total_records` from the most recent response.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Page number of the most recent response, 0 before the first one.
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_page(&self) -> Option<u64> {
        self.pending.as_ref().map(|(page, _)| *page)
    }

    pub fn pending_request(&self) -> Option<&PageRequest> {
        self.pending.as_ref().map(|(_, request)| request)
    }

    pub fn request_page(&mut self, page: u64) -> Result<PageRequest, FeedError> {
        if let Some((_, pending)) = &self.pending {
            return Err(FeedError::Busy {
                page,
                pending_offset: pending.offset,
            });
        }
        let mut request = page_request(page, self.page_size)?;
        request.status = self.narrowing.status;
        request.authority = self.narrowing.authority.clone();
        debug!(page, offset = request.offset, limit = request.limit, "requesting page");
        self.pending = Some((page, request.clone()));
        Ok(request)
    }

    /// The page after the last one loaded, or `None` once the feed is drained.
    pub fn next_page(&self) -> Option<u64> {
        match self.server_last_page {
            Some(last) if self.current_page >= last => return None,
            Some(_) => {}
            None => {
                let covered = self.current_page.saturating_mul(u64::from(self.page_size));
                if self.responses > 0 && covered >= self.total {
                    return None;
                }
            }
        }
        Some(self.current_page + 1)
    }

    pub fn request_next(&mut self) -> Result<PageRequest, FeedError> {
        let page = self.next_page().ok_or(FeedError::Exhausted)?;
        self.request_page(page)
    }

    pub fn on_response(&mut self, response: PageResponse) -> PageResponse {
        let page = match self.pending.take() {
            Some((page, request)) => {
                if response.data.len() as u64 > u64::from(request.limit) {
                    warn!(
                        received = response.data.len(),
                        limit = request.limit,
                        "page response larger than requested limit"
                    );
                }
                page
            }
            None => self.current_page + 1,
        };
        self.loaded += response.data.len() as u64;
        self.total = response.total_records;
        self.current_page = page;
        self.server_last_page = response.last_page;
        self.responses += 1;
        self.last_error = None;
        debug!(
            page,
            received = response.data.len(),
            loaded = self.loaded,
            total = self.total,
            "page loaded"
        );
        response
    }

    pub fn on_failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "page fetch failed");
        self.pending = None;
        self.last_error = Some(message);
    }

    pub fn set_narrowing(&mut self, narrowing: Narrowing) {
        self.narrowing = narrowing;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.loaded = 0;
        self.total = 0;
        self.current_page = 0;
        self.server_last_page = None;
        self.responses = 0;
        self.pending = None;
        self.last_error = None;
    }
}
