//! Screen-level state holders. Each view owns its data and exposes explicit
//! load functions; rendering produces plain text lines for the terminal.

pub mod candidate_list;
pub mod candidate_upload;
pub mod dashboard;
pub mod job_detail;
pub mod job_form;
pub mod job_management;
pub mod match_score;
pub mod pagination;

pub use candidate_list::CandidateList;
pub use candidate_upload::CandidateUpload;
pub use dashboard::Dashboard;
pub use job_detail::{JobDetail, JobDetailState, JobDetailTab};
pub use job_form::{EntryMode, JobCreation, JobDraft};
pub use job_management::{JobFilters, JobManagement};
pub use match_score::{MatchScorer, NoMatchScore};
pub use pagination::{Pagination, PAGE_SIZE};

/// Identifies one load request of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Hands out load tickets so a view can drop responses that arrive after
/// a newer load was started.
#[derive(Debug, Default)]
pub struct LoadTracker {
    issued: u64,
}

impl LoadTracker {
    pub fn begin(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let mut tracker = LoadTracker::default();
        let first = tracker.begin();
        assert!(tracker.is_current(first));

        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }
}
