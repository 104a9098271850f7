use tracing::warn;

use crate::auth::AuthSession;
use crate::types::{CandidateParams, JobParams};

/// Landing page: greeting and a couple of counters.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub greeting: Option<String>,
    pub total_candidates: Option<usize>,
    pub total_jobs: Option<u64>,
}

impl Dashboard {
    /// Counts that fail to load are shown as unknown rather than failing the page.
    pub async fn load(session: &AuthSession) -> Self {
        let client = session.client();

        let total_candidates = match client.get_candidates(&CandidateParams::default()).await {
            Ok(candidates) => Some(candidates.len()),
            Err(e) => {
                warn!("Dashboard candidate count unavailable: {}", e);
                None
            }
        };

        let job_params = JobParams {
            page: Some(1),
            size: Some(1),
            ..JobParams::default()
        };
        let total_jobs = match client.get_jobs(&job_params).await {
            Ok(list) => Some(list.total),
            Err(e) => {
                warn!("Dashboard job count unavailable: {}", e);
                None
            }
        };

        Self {
            greeting: session.greeting(),
            total_candidates,
            total_jobs,
        }
    }

    pub fn render(&self) -> Vec<String> {
        let count = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

        let mut lines = Vec::new();
        if let Some(greeting) = &self.greeting {
            lines.push(greeting.clone());
        }
        lines.push("Overview".to_string());
        lines.push(format!(
            "  Total Candidates  {}",
            count(self.total_candidates.map(|n| n.to_string()))
        ));
        lines.push(format!(
            "  Total Jobs        {}",
            count(self.total_jobs.map(|n| n.to_string()))
        ));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ApiClient, MemoryTokenStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dashboard_counts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/auth/profile")
            .with_status(200)
            .with_body(r#"{"email":"r@acme.io","full_name":"Rae"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/candidates/all")
            .with_status(200)
            .with_body(r#"[{"id":"a"},{"id":"b"}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/jobs")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client =
            ApiClient::new(&server.url(), Arc::new(MemoryTokenStore::with_token("t"))).unwrap();
        let mut session = AuthSession::new(client);
        session.restore().await;

        let dashboard = Dashboard::load(&session).await;
        assert_eq!(
            dashboard.render(),
            vec![
                "Welcome, Rae".to_string(),
                "Overview".to_string(),
                "  Total Candidates  2".to_string(),
                "  Total Jobs        -".to_string(),
            ]
        );
    }
}
