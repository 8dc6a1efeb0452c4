use serde_json::Value;
use tracing::debug;

use crate::model::RecordId;
use crate::source::FetchError;

/// Which of several racing detail fetches gets to update the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetailPolicy {
    /// Every completion is applied; whichever resolves last stays on screen.
    #[default]
    LastResolved,
    /// Only the most recently issued fetch may update the view.
    LastRequested,
}

impl DetailPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "last-resolved" | "resolved" => Some(Self::LastResolved),
            "last-requested" | "requested" | "latest" => Some(Self::LastRequested),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LastResolved => "last-resolved",
            Self::LastRequested => "last-requested",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailTicket {
    pub seq: u64,
    pub id: RecordId,
}

/// What the raw-record pane currently shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailView {
    pub record_id: Option<RecordId>,
    pub content: Option<String>,
    pub error: Option<String>,
}

impl DetailView {
    pub fn clear(&mut self) {
        self.record_id = None;
        self.content = None;
        self.error = None;
    }
}

/// Outcome of applying a completed fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Shown,
    Failed,
    Stale,
}

#[derive(Clone, Debug, Default)]
pub struct DetailLoader {
    policy: DetailPolicy,
    issued: u64,
}

impl DetailLoader {
    pub fn new(policy: DetailPolicy) -> Self {
        Self { policy, issued: 0 }
    }

    pub fn policy(&self) -> DetailPolicy {
        self.policy
    }

    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    pub fn begin(&mut self, id: RecordId) -> DetailTicket {
        self.issued += 1;
        debug!(seq = self.issued, id = %id, "detail fetch issued");
        DetailTicket {
            seq: self.issued,
            id,
        }
    }

    pub fn apply(
        &self,
        ticket: &DetailTicket,
        result: Result<Value, FetchError>,
        view: &mut DetailView,
    ) -> Applied {
        if self.policy == DetailPolicy::LastRequested && ticket.seq != self.issued {
            debug!(
                seq = ticket.seq,
                latest = self.issued,
                id = %ticket.id,
                "dropping stale detail response"
            );
            return Applied::Stale;
        }
        match result.and_then(|doc| render_json(&ticket.id, &doc)) {
            Ok(pretty) => {
                view.record_id = Some(ticket.id.clone());
                view.content = Some(pretty);
                view.error = None;
                Applied::Shown
            }
            Err(e) => {
                view.error = Some(format!("could not load record {}: {e}", ticket.id));
                Applied::Failed
            }
        }
    }
}

fn render_json(id: &RecordId, doc: &Value) -> Result<String, FetchError> {
    serde_json::to_string_pretty(doc).map_err(|e| FetchError::Decode {
        url: id.to_string(),
        source: e,
    })
}
