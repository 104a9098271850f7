use crate::types::{CandidateSummary, Job};

/// Job/candidate compatibility, provided by an external service.
pub trait MatchScorer: Send + Sync {
    /// Percentage in `0..=100`, or `None` when no score is available.
    fn score(&self, job: &Job, candidate: &CandidateSummary) -> Option<u8>;
}

/// Used until a real scoring service is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMatchScore;

impl MatchScorer for NoMatchScore {
    fn score(&self, _job: &Job, _candidate: &CandidateSummary) -> Option<u8> {
        None
    }
}

pub fn format_score(score: Option<u8>) -> String {
    match score {
        Some(value) => format!("{}%", value.min(100)),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(None), "n/a");
        assert_eq!(format_score(Some(87)), "87%");
        assert_eq!(format_score(Some(250)), "100%");
    }
}
