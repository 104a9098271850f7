use tracing::{error, info};

use crate::core::ApiClient;
use crate::error::ApiResult;
use crate::types::{Candidate, CandidateParams, CandidateSummary};
use crate::utils::format_date;
use crate::views::{LoadTicket, LoadTracker};

/// All uploaded candidates with a client-side search box.
#[derive(Debug, Default)]
pub struct CandidateList {
    candidates: Vec<CandidateSummary>,
    search: String,
    params: CandidateParams,
    loading: bool,
    tracker: LoadTracker,
}

impl CandidateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_job(job_id: impl Into<String>) -> Self {
        Self {
            params: CandidateParams::for_job(job_id),
            ..Self::default()
        }
    }

    pub fn candidates(&self) -> &[CandidateSummary] {
        &self.candidates
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn begin_load(&mut self) -> (LoadTicket, CandidateParams) {
        self.loading = true;
        (self.tracker.begin(), self.params.clone())
    }

    /// Store a load result unless a newer load has started since. Returns
    /// whether the result was applied; stale results are dropped silently.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        result: ApiResult<Vec<CandidateSummary>>,
    ) -> ApiResult<bool> {
        if !self.tracker.is_current(ticket) {
            info!("Discarding stale candidate list response");
            return Ok(false);
        }
        self.loading = false;
        let candidates = result.map_err(|e| {
            error!("Error fetching candidates: {}", e);
            e
        })?;
        self.candidates = candidates;
        Ok(true)
    }

    pub async fn load(&mut self, client: &ApiClient) -> ApiResult<()> {
        let (ticket, params) = self.begin_load();
        let result = client.get_candidates(&params).await;
        self.apply(ticket, result).map(|_| ())
    }

    /// Candidates whose name, email or location contains the search term,
    /// ignoring case. An empty term keeps everything.
    pub fn filtered(&self) -> Vec<&CandidateSummary> {
        let needle = self.search.trim().to_lowercase();
        self.candidates
            .iter()
            .filter(|c| c.matches(&needle))
            .collect()
    }

    /// On failure the list is left untouched and the error returned for display.
    pub async fn delete(&mut self, client: &ApiClient, candidate_id: &str) -> ApiResult<()> {
        match client.delete_candidate(candidate_id).await {
            Ok(_) => {
                self.candidates.retain(|c| c.id != candidate_id);
                Ok(())
            }
            Err(e) => {
                error!("Error deleting candidate {}: {}", candidate_id, e);
                Err(e)
            }
        }
    }

    pub async fn details(&self, client: &ApiClient, candidate_id: &str) -> ApiResult<Candidate> {
        client.get_candidate(candidate_id).await
    }

    pub fn count_label(&self) -> String {
        format!(
            "{} of {} candidates",
            self.filtered().len(),
            self.candidates.len()
        )
    }

    pub fn render(&self) -> Vec<String> {
        let visible = self.filtered();
        let mut lines = vec![self.count_label()];

        if visible.is_empty() {
            if self.search.trim().is_empty() {
                lines.push("No candidates yet".to_string());
                lines.push("Upload some resumes to get started".to_string());
            } else {
                lines.push("No candidates found".to_string());
                lines.push("Try adjusting your search terms".to_string());
            }
            return lines;
        }

        for c in visible {
            lines.push(format!(
                "[{}] {}",
                c.id,
                c.full_name.as_deref().unwrap_or("Unknown Candidate")
            ));
            for field in [&c.email, &c.phone, &c.location].into_iter().flatten() {
                lines.push(format!("    {}", field));
            }
            lines.push(format!(
                "    {} skills | {} experience | {} education",
                c.skills_count, c.experience_count, c.education_count
            ));
            if let Some(created) = &c.created_at {
                lines.push(format!("    Uploaded {}", format_date(created)));
            }
        }
        lines
    }
}

/// Full candidate record, as shown in the details modal.
pub fn render_candidate(candidate: &Candidate) -> Vec<String> {
    let mut lines = vec![candidate
        .full_name
        .clone()
        .unwrap_or_else(|| "Unknown Candidate".to_string())];

    lines.push("Contact Information".to_string());
    for field in [&candidate.email, &candidate.phone, &candidate.location]
        .into_iter()
        .flatten()
    {
        lines.push(format!("  {}", field));
    }

    if let Some(summary) = &candidate.summary {
        lines.push("Summary".to_string());
        lines.push(format!("  {}", summary));
    }

    if !candidate.skills.is_empty() {
        lines.push(format!("Skills ({})", candidate.skills.len()));
        let names: Vec<&str> = candidate.skills.iter().map(|s| s.name.as_str()).collect();
        lines.push(format!("  {}", names.join(", ")));
    }

    if !candidate.experience.is_empty() {
        lines.push(format!("Experience ({})", candidate.experience.len()));
        for exp in &candidate.experience {
            let period = match (&exp.start_date, &exp.end_date) {
                (Some(start), Some(end)) => format!(" ({} - {})", start, end),
                (Some(start), None) => format!(" ({} - Present)", start),
                _ => String::new(),
            };
            lines.push(format!("  {} at {}{}", exp.position, exp.company, period));
            if let Some(desc) = &exp.description {
                lines.push(format!("    {}", desc));
            }
        }
    }

    if !candidate.education.is_empty() {
        lines.push(format!("Education ({})", candidate.education.len()));
        for edu in &candidate.education {
            match &edu.field_of_study {
                Some(field) => lines.push(format!(
                    "  {} in {}, {}",
                    edu.degree, field, edu.institution
                )),
                None => lines.push(format!("  {}, {}", edu.degree, edu.institution)),
            }
        }
    }

    lines
}
