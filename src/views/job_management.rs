use tracing::{error, info};

use crate::core::ApiClient;
use crate::error::ApiResult;
use crate::types::{Job, JobList, JobParams, JobStatus};
use crate::utils::format_date;
use crate::views::{LoadTicket, LoadTracker, Pagination};

/// Server-side filters of the job list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilters {
    pub status: Option<JobStatus>,
    pub is_active: Option<bool>,
    pub search: String,
}

impl JobFilters {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.is_active.is_none() && self.search.trim().is_empty()
    }
}

/// Paged, filterable job list.
#[derive(Debug, Default)]
pub struct JobManagement {
    filters: JobFilters,
    pagination: Pagination,
    jobs: Vec<Job>,
    loading: bool,
    tracker: LoadTracker,
}

impl JobManagement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn filters(&self) -> &JobFilters {
        &self.filters
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // Any filter change starts over from the first page.

    pub fn set_status_filter(&mut self, status: Option<JobStatus>) {
        self.filters.status = status;
        self.pagination.reset();
    }

    pub fn set_active_filter(&mut self, is_active: Option<bool>) {
        self.filters.is_active = is_active;
        self.pagination.reset();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.pagination.reset();
    }

    pub fn clear_filters(&mut self) {
        self.filters = JobFilters::default();
        self.pagination.reset();
    }

    pub fn go_to_page(&mut self, page: u32) {
        self.pagination.page = page.max(1);
    }

    /// Move forward one page; returns false when "Next" is disabled.
    pub fn next_page(&mut self) -> bool {
        if !self.pagination.has_next() {
            return false;
        }
        self.pagination.page += 1;
        true
    }

    /// Move back one page; returns false when "Previous" is disabled.
    pub fn previous_page(&mut self) -> bool {
        if !self.pagination.has_previous() {
            return false;
        }
        self.pagination.page -= 1;
        true
    }

    pub fn params(&self) -> JobParams {
        JobParams {
            page: Some(self.pagination.page),
            size: Some(self.pagination.size),
            status: self.filters.status,
            is_active: self.filters.is_active,
            search: Some(self.filters.search.clone()),
        }
    }

    pub fn begin_load(&mut self) -> (LoadTicket, JobParams) {
        self.loading = true;
        (self.tracker.begin(), self.params())
    }

    /// Apply a job list response unless it belongs to a superseded load.
    pub fn apply(&mut self, ticket: LoadTicket, result: ApiResult<JobList>) -> ApiResult<bool> {
        if !self.tracker.is_current(ticket) {
            info!("Discarding stale job list response");
            return Ok(false);
        }
        self.loading = false;
        let list = result.map_err(|e| {
            error!("Failed to fetch jobs: {}", e);
            e
        })?;
        self.jobs = list.jobs;
        self.pagination.total = list.total;
        Ok(true)
    }

    pub async fn load(&mut self, client: &ApiClient) -> ApiResult<()> {
        let (ticket, params) = self.begin_load();
        let result = client.get_jobs(&params).await;
        self.apply(ticket, result).map(|_| ())
    }

    /// Delete then re-fetch the current page.
    pub async fn delete(&mut self, client: &ApiClient, job_id: &str) -> ApiResult<()> {
        client.delete_job(job_id).await?;
        self.load(client).await
    }

    pub async fn set_status(
        &mut self,
        client: &ApiClient,
        job_id: &str,
        status: JobStatus,
    ) -> ApiResult<()> {
        client.update_job_status(job_id, status).await?;
        self.load(client).await
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![self.pagination.total_label()];

        if self.jobs.is_empty() {
            lines.push("No jobs found".to_string());
            if self.filters.is_empty() {
                lines.push("Get started by creating your first job posting.".to_string());
            } else {
                lines.push("Try adjusting your filters or search terms.".to_string());
            }
            return lines;
        }

        for job in &self.jobs {
            lines.extend(render_job_card(job));
        }

        if self.pagination.shows_controls() {
            let prev = if self.pagination.has_previous() { "< Previous" } else { "  " };
            let next = if self.pagination.has_next() { "Next >" } else { "" };
            lines.push(format!("{}  {}  {}", prev, self.pagination.label(), next));
        }
        lines
    }
}

/// Summary card of one job in the list.
pub fn render_job_card(job: &Job) -> Vec<String> {
    let mut lines = vec![format!("[{}] {} ({})", job.id, job.title, job.status.label())];
    lines.push(format!("    {}", job.company));
    if let Some(location) = &job.location {
        lines.push(format!("    {}", location));
    }
    lines.push(format!("    {} | {}", job.salary_range(), job.job_type));
    if let Some(created) = &job.created_at {
        lines.push(format!("    Posted {}", format_date(created)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryTokenStore;
    use mockito::Matcher;
    use std::sync::Arc;

    fn list_with(total: u64) -> JobList {
        JobList {
            jobs: Vec::new(),
            total,
            page: None,
            size: None,
        }
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut view = JobManagement::new();
        view.go_to_page(3);
        view.set_status_filter(Some(JobStatus::Published));
        assert_eq!(view.pagination().page, 1);

        view.go_to_page(2);
        view.set_search("rust");
        assert_eq!(view.pagination().page, 1);

        let params = view.params();
        assert_eq!(params.size, Some(10));
        assert_eq!(params.status, Some(JobStatus::Published));
        assert_eq!(params.search.as_deref(), Some("rust"));
    }

    #[test]
    fn test_page_navigation_respects_bounds() {
        let mut view = JobManagement::new();
        let (ticket, _) = view.begin_load();
        view.apply(ticket, Ok(list_with(25))).unwrap();

        assert!(!view.previous_page());
        assert!(view.next_page());
        assert!(view.next_page());
        assert_eq!(view.pagination().page, 3);
        assert!(!view.next_page());
        assert!(view.previous_page());
        assert_eq!(view.pagination().page, 2);
    }

    #[test]
    fn test_later_requested_load_wins() {
        let mut view = JobManagement::new();
        let (first, _) = view.begin_load();
        view.set_search("go");
        let (second, _) = view.begin_load();

        assert!(view.apply(second, Ok(list_with(3))).unwrap());
        assert!(!view.apply(first, Ok(list_with(99))).unwrap());
        assert_eq!(view.pagination().total, 3);
    }

    #[test]
    fn test_render_empty_with_filters() {
        let mut view = JobManagement::new();
        view.set_active_filter(Some(true));
        let lines = view.render();
        assert_eq!(lines[0], "0 jobs");
        assert_eq!(lines[2], "Try adjusting your filters or search terms.");
    }

    #[tokio::test]
    async fn test_delete_refetches_list() {
        let mut server = mockito::Server::new_async().await;
        let delete = server
            .mock("DELETE", "/jobs/j1")
            .with_status(200)
            .with_body(r#"{"message":"Job deleted successfully"}"#)
            .create_async()
            .await;
        let list = server
            .mock("GET", "/jobs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("size".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"jobs":[{"id":"j2","title":"Go Dev","company":"Beta","description":"d",
                    "salary_min":50000,"salary_max":60000,"status":"closed"}],"total":1}"#,
            )
            .create_async()
            .await;

        let client =
            ApiClient::new(&server.url(), Arc::new(MemoryTokenStore::with_token("t"))).unwrap();
        let mut view = JobManagement::new();
        view.delete(&client, "j1").await.unwrap();

        assert_eq!(view.jobs().len(), 1);
        assert_eq!(view.jobs()[0].id, "j2");
        let card = render_job_card(&view.jobs()[0]);
        assert_eq!(card[0], "[j2] Go Dev (Closed)");
        assert_eq!(card[2], "    $50,000 - $60,000 | full-time");
        delete.assert_async().await;
        list.assert_async().await;
    }
}
