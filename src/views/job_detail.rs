use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::core::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{CandidateSummary, Job};
use crate::views::candidate_list::CandidateList;
use crate::views::match_score::{format_score, MatchScorer, NoMatchScore};

#[derive(Debug, Clone)]
pub enum JobDetailState {
    Loading,
    Loaded(Job),
    /// Job could not be loaded; carries the message to show.
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobDetailTab {
    #[default]
    Description,
    Candidates,
    Add,
}

/// One job with the candidates uploaded for it.
pub struct JobDetail {
    job_id: String,
    state: JobDetailState,
    candidates: CandidateList,
    tab: JobDetailTab,
    selected_file: Option<PathBuf>,
    scorer: Box<dyn MatchScorer>,
}

impl JobDetail {
    pub fn new(job_id: impl Into<String>) -> Self {
        let job_id = job_id.into();
        Self {
            candidates: CandidateList::for_job(job_id.clone()),
            job_id,
            state: JobDetailState::Loading,
            tab: JobDetailTab::default(),
            selected_file: None,
            scorer: Box::new(NoMatchScore),
        }
    }

    pub fn with_scorer(mut self, scorer: Box<dyn MatchScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn state(&self) -> &JobDetailState {
        &self.state
    }

    pub fn job(&self) -> Option<&Job> {
        match &self.state {
            JobDetailState::Loaded(job) => Some(job),
            _ => None,
        }
    }

    pub fn candidates(&self) -> &[CandidateSummary] {
        self.candidates.candidates()
    }

    pub fn tab(&self) -> JobDetailTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: JobDetailTab) {
        self.tab = tab;
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.selected_file = Some(path.into());
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    /// Load the job, then its candidates. Candidate failures are logged
    /// and leave the previous list in place.
    pub async fn load(&mut self, client: &ApiClient) {
        self.state = JobDetailState::Loading;
        self.state = match client.get_job(&self.job_id).await {
            Ok(job) => JobDetailState::Loaded(job),
            Err(e) if e.is_not_found() => JobDetailState::NotFound("Job not found".to_string()),
            Err(e) => {
                error!("Failed to fetch job details: {}", e);
                JobDetailState::NotFound("Failed to load job details".to_string())
            }
        };

        self.refresh_candidates(client).await;
    }

    pub async fn refresh_candidates(&mut self, client: &ApiClient) {
        if let Err(e) = self.candidates.load(client).await {
            warn!("Failed to fetch candidates for job {}: {}", self.job_id, e);
        }
    }

    /// Upload the selected resume for this job, then show the candidate tab.
    /// Refused once the job is known not to exist.
    pub async fn upload_resume(&mut self, client: &ApiClient) -> ApiResult<()> {
        if let JobDetailState::NotFound(message) = &self.state {
            return Err(ApiError::Validation(message.clone()));
        }
        let Some(file) = self.selected_file.clone() else {
            return Err(ApiError::Validation("Please select a file first".to_string()));
        };

        client
            .upload_candidates(&[file], Some(self.job_id.as_str()))
            .await
            .map_err(|e| {
                error!("Failed to upload resume: {}", e);
                e
            })?;

        info!("Resume uploaded for job {}", self.job_id);
        self.selected_file = None;
        self.refresh_candidates(client).await;
        self.tab = JobDetailTab::Candidates;
        Ok(())
    }

    pub fn render(&self) -> Vec<String> {
        let job = match &self.state {
            JobDetailState::Loading => return vec!["Loading...".to_string()],
            JobDetailState::NotFound(message) => {
                return vec![message.clone(), "← Back to Jobs".to_string()];
            }
            JobDetailState::Loaded(job) => job,
        };

        let mut lines = vec![
            job.title.clone(),
            format!("{} • {}", job.company, job.location.as_deref().unwrap_or("Remote")),
            format!("Status: {}", job.status.label()),
            String::new(),
        ];

        match self.tab {
            JobDetailTab::Description => {
                lines.push("About the Role".to_string());
                lines.push(job.description.clone());
                for (heading, body) in [
                    ("Requirements", &job.requirements),
                    ("Responsibilities", &job.responsibilities),
                    ("Benefits", &job.benefits),
                ] {
                    if let Some(body) = body {
                        lines.push(heading.to_string());
                        lines.push(body.clone());
                    }
                }
                lines.push(format!("Salary Range: {}", job.salary_range()));
                if let Some(contact) = &job.contact_email {
                    lines.push(format!("Contact: {}", contact));
                }
            }
            JobDetailTab::Candidates => {
                let candidates = self.candidates.candidates();
                lines.push(format!("Candidates ({})", candidates.len()));
                if candidates.is_empty() {
                    lines.push("No candidates yet".to_string());
                }
                for candidate in candidates {
                    lines.push(format!(
                        "[{}] {} - {} - match {}",
                        candidate.id,
                        candidate.full_name.as_deref().unwrap_or("Unknown Candidate"),
                        candidate.status_label(),
                        format_score(self.scorer.score(job, candidate))
                    ));
                }
            }
            JobDetailTab::Add => {
                lines.push("Add Candidate".to_string());
                match &self.selected_file {
                    Some(path) => lines.push(format!("Selected: {}", path.display())),
                    None => lines.push("Upload New Resume (PDF)".to_string()),
                }
            }
        }

        lines
    }
}
