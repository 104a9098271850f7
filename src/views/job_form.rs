use tracing::{error, info};

use crate::core::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{Job, JobCreate, JobParseResult};

/// Raw form input, every field as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub salary_min: String,
    pub salary_max: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub benefits: String,
    pub contact_email: String,
    pub application_deadline: String,
}

impl Default for JobDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            location: String::new(),
            job_type: "full-time".to_string(),
            salary_min: String::new(),
            salary_max: String::new(),
            description: String::new(),
            requirements: String::new(),
            responsibilities: String::new(),
            benefits: String::new(),
            contact_email: String::new(),
            application_deadline: String::new(),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_salary(value: &str) -> Option<i64> {
    value.trim().replace(',', "").parse().ok()
}

impl JobDraft {
    /// Check the draft and build the create payload.
    pub fn validate(&self) -> ApiResult<JobCreate> {
        for (label, value) in [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!(
                    "Please fill in the {} field.",
                    label
                )));
            }
        }

        if self.salary_min.trim().is_empty() || self.salary_max.trim().is_empty() {
            return Err(ApiError::Validation(
                "Please fill in both minimum and maximum salary fields.".to_string(),
            ));
        }

        let (Some(salary_min), Some(salary_max)) =
            (parse_salary(&self.salary_min), parse_salary(&self.salary_max))
        else {
            return Err(ApiError::Validation(
                "Please enter valid numbers for salary fields.".to_string(),
            ));
        };

        if salary_min > salary_max {
            return Err(ApiError::Validation(
                "Minimum salary cannot be greater than maximum salary.".to_string(),
            ));
        }

        Ok(JobCreate {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: optional(&self.location),
            job_type: optional(&self.job_type).unwrap_or_else(|| "full-time".to_string()),
            salary_min,
            salary_max,
            description: self.description.trim().to_string(),
            requirements: optional(&self.requirements),
            responsibilities: optional(&self.responsibilities),
            benefits: optional(&self.benefits),
            contact_email: optional(&self.contact_email),
            application_deadline: optional(&self.application_deadline),
        })
    }

    /// Replace the draft with what the AI parser extracted.
    pub fn fill_from(&mut self, parsed: &JobParseResult) {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let number = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();

        *self = Self {
            title: parsed.title.clone(),
            company: parsed.company.clone(),
            location: text(&parsed.location),
            job_type: parsed.job_type.clone(),
            salary_min: number(parsed.salary_min),
            salary_max: number(parsed.salary_max),
            description: parsed.description.clone(),
            requirements: text(&parsed.requirements),
            responsibilities: text(&parsed.responsibilities),
            benefits: text(&parsed.benefits),
            contact_email: text(&parsed.contact_email),
            application_deadline: text(&parsed.application_deadline),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMode {
    #[default]
    Manual,
    Ai,
}

/// Job creation page: manual form plus the AI parsing shortcut.
#[derive(Debug, Default)]
pub struct JobCreation {
    pub draft: JobDraft,
    pub mode: EntryMode,
    pub ai_text: String,
    last_parse: Option<JobParseResult>,
}

impl JobCreation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_parse(&self) -> Option<&JobParseResult> {
        self.last_parse.as_ref()
    }

    /// Send `ai_text` to the parser and switch back to the manual form for review.
    pub async fn parse_with_ai(&mut self, client: &ApiClient) -> ApiResult<&JobDraft> {
        if self.ai_text.trim().is_empty() {
            return Err(ApiError::Validation(
                "Please enter a job description to parse.".to_string(),
            ));
        }

        let parsed = client
            .parse_job_description(&self.ai_text)
            .await
            .map_err(|e| {
                error!("AI parsing error: {}", e);
                e
            })?;

        info!(
            "Parsed job description, fields: {:?}",
            parsed.parsed_fields
        );
        self.draft.fill_from(&parsed);
        self.last_parse = Some(parsed);
        self.mode = EntryMode::Manual;
        Ok(&self.draft)
    }

    /// Validate and create. Nothing is sent when validation fails.
    pub async fn submit(&self, client: &ApiClient) -> ApiResult<Job> {
        let payload = self.draft.validate()?;
        client.create_job(&payload).await.map_err(|e| {
            error!("Job creation error: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryTokenStore;
    use std::sync::Arc;

    fn valid_draft() -> JobDraft {
        JobDraft {
            title: "Rust Engineer".to_string(),
            company: "Acme".to_string(),
            salary_min: "90000".to_string(),
            salary_max: "120000".to_string(),
            description: "Systems work".to_string(),
            ..JobDraft::default()
        }
    }

    fn message(draft: &JobDraft) -> String {
        draft.validate().unwrap_err().to_string()
    }

    #[test]
    fn test_valid_draft_builds_payload() {
        let mut draft = valid_draft();
        draft.location = "  ".to_string();
        draft.contact_email = "jobs@acme.io".to_string();

        let job = draft.validate().unwrap();
        assert_eq!(job.salary_min, 90000);
        assert_eq!(job.salary_max, 120000);
        assert_eq!(job.job_type, "full-time");
        assert_eq!(job.location, None);
        assert_eq!(job.contact_email.as_deref(), Some("jobs@acme.io"));
        assert_eq!(job.application_deadline, None);
    }

    #[test]
    fn test_equal_salaries_are_allowed() {
        let mut draft = valid_draft();
        draft.salary_max = "90000".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_rejects_min_above_max() {
        let mut draft = valid_draft();
        draft.salary_min = "130000".to_string();
        assert_eq!(
            message(&draft),
            "Minimum salary cannot be greater than maximum salary."
        );
    }

    #[test]
    fn test_rejects_non_numeric_salary() {
        let mut draft = valid_draft();
        draft.salary_max = "lots".to_string();
        assert_eq!(message(&draft), "Please enter valid numbers for salary fields.");
    }

    #[test]
    fn test_rejects_missing_salary() {
        let mut draft = valid_draft();
        draft.salary_min.clear();
        assert_eq!(
            message(&draft),
            "Please fill in both minimum and maximum salary fields."
        );
    }

    #[test]
    fn test_rejects_missing_required_fields() {
        for field in ["title", "company", "description"] {
            let mut draft = valid_draft();
            match field {
                "title" => draft.title.clear(),
                "company" => draft.company = "   ".to_string(),
                _ => draft.description.clear(),
            }
            assert_eq!(message(&draft), format!("Please fill in the {} field.", field));
        }
    }

    #[tokio::test]
    async fn test_submit_skips_request_when_invalid() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/jobs/").expect(0).create_async().await;
        let client =
            ApiClient::new(&server.url(), Arc::new(MemoryTokenStore::with_token("t"))).unwrap();

        let mut page = JobCreation::new();
        page.draft = valid_draft();
        page.draft.salary_min = "200000".to_string();

        assert!(matches!(
            page.submit(&client).await,
            Err(ApiError::Validation(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ai_parse_fills_draft() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/jobs/parse")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "job_description": "We need a Rust dev in Berlin"
            })))
            .with_status(200)
            .with_body(
                r#"{"title":"Rust Developer","company":"Unknown","location":"Berlin",
                    "type":"full-time","salary_min":70000,"salary_max":95000,
                    "description":"We need a Rust dev in Berlin","confidence_score":0.8,
                    "parsed_fields":["title","location"]}"#,
            )
            .create_async()
            .await;
        let client =
            ApiClient::new(&server.url(), Arc::new(MemoryTokenStore::with_token("t"))).unwrap();

        let mut page = JobCreation::new();
        page.mode = EntryMode::Ai;
        page.ai_text = "We need a Rust dev in Berlin".to_string();
        page.parse_with_ai(&client).await.unwrap();

        assert_eq!(page.mode, EntryMode::Manual);
        assert_eq!(page.draft.location, "Berlin");
        assert_eq!(page.draft.salary_max, "95000");
        assert_eq!(page.last_parse().unwrap().confidence_score, Some(0.8));
        assert!(page.draft.validate().is_ok());
    }

    #[tokio::test]
    async fn test_ai_parse_requires_text() {
        let server = mockito::Server::new_async().await;
        let client =
            ApiClient::new(&server.url(), Arc::new(MemoryTokenStore::default())).unwrap();
        let mut page = JobCreation::new();
        let err = page.parse_with_ai(&client).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a job description to parse.");
    }
}
