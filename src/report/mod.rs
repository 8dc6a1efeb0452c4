use crate::model::RecordId;

pub const NO_SELECTION_MESSAGE: &str = "Please choose a record!";

/// A bug report against one record. Nothing is sent anywhere; confirmed
/// issues only flag the row for the rest of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub record_id: RecordId,
    pub body: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReportState {
    #[default]
    Closed,
    Drafting,
    AwaitingFeedback(Issue),
}

#[derive(Clone, Debug, Default)]
pub struct ReportFlow {
    state: ReportState,
}

impl ReportFlow {
    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ReportState::Closed
    }

    pub fn open(&mut self) {
        self.state = ReportState::Drafting;
    }

    pub fn close(&mut self) {
        self.state = ReportState::Closed;
    }

    pub fn is_drafting(&self) -> bool {
        self.state == ReportState::Drafting
    }

    /// Moves from drafting to the feedback step. Returns `None` without
    /// touching the state when no report is being drafted or no record is
    /// selected.
    pub fn submit(&mut self, body: &str, selection: Option<&RecordId>) -> Option<&Issue> {
        if !self.is_drafting() {
            return None;
        }
        let record_id = selection?.clone();
        self.state = ReportState::AwaitingFeedback(Issue {
            record_id,
            body: body.trim().to_string(),
        });
        match &self.state {
            ReportState::AwaitingFeedback(issue) => Some(issue),
            _ => None,
        }
    }

    pub fn confirm(&mut self) -> Option<Issue> {
        match std::mem::take(&mut self.state) {
            ReportState::AwaitingFeedback(issue) => Some(issue),
            other => {
                self.state = other;
                None
            }
        }
    }
}
