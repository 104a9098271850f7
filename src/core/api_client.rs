// src/core/api_client.rs
//! Unified HTTP client for the Recruiter Assist API - every call goes through `execute`

use reqwest::multipart::{Form, Part};
use reqwest::{IntoUrl, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

use crate::core::token_store::TokenStore;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    ApplicationList, ApplicationParams, BatchUploadResult, Candidate, CandidateParams,
    CandidateSummary, ErrorBody, Job, JobCreate, JobList, JobParams, JobParseResult, JobStatus,
    JobUpdate, LoginRequest, LoginResponse, MessageResponse, User,
};
use crate::utils::{content_type_for, file_name_of};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

const LOGIN_ENDPOINT: &str = "/auth/login";
const PROFILE_ENDPOINT: &str = "/auth/profile";
const JOBS_ENDPOINT: &str = "/jobs";
const JOB_PARSE_ENDPOINT: &str = "/jobs/parse";
const CANDIDATES_ENDPOINT: &str = "/candidates";
const CANDIDATES_ALL_ENDPOINT: &str = "/candidates/all";
const CANDIDATES_UPLOAD_ENDPOINT: &str = "/candidates/upload";
const APPLICATIONS_ENDPOINT: &str = "/applications";

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// `endpoint` followed by `segments`, each percent-encoded as a single
    /// path segment so ids cannot add path components or a query.
    fn segment_url(&self, endpoint: &str, segments: &[&str]) -> ApiResult<Url> {
        let mut url = Url::parse(&self.url(endpoint))
            .map_err(|e| ApiError::Validation(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Validation("Invalid API base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request with the bearer token attached when one is stored.
    fn builder<U: IntoUrl>(&self, method: Method, url: U) -> ApiResult<RequestBuilder> {
        let request = self.client.request(method, url);
        Ok(match self.tokens.load()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Request that must carry a token; fails before touching the network otherwise.
    fn authed<U: IntoUrl>(&self, method: Method, url: U) -> ApiResult<RequestBuilder> {
        let token = self.tokens.load()?.ok_or(ApiError::MissingToken)?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn execute<R>(&self, request: RequestBuilder) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            error!("API request failed: {}", e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        trace!("Response status: {}", status);

        let body = response.bytes().await?;

        if status.is_success() {
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = error_message(status, &body);
            error!("API error response {}: {}", status, message);
            Err(ApiError::Http { status, message })
        }
    }

    /// Generic JSON request against `endpoint`.
    pub async fn request<R>(&self, method: Method, endpoint: &str) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        self.execute(self.builder(method, self.url(endpoint))?).await
    }

    /// Generic GET request
    pub async fn get<R>(&self, endpoint: &str, query: &[(&str, String)]) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let mut request = self.builder(Method::GET, self.url(endpoint))?;
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    /// Generic request with a JSON body
    pub async fn send_json<T, R>(&self, method: Method, endpoint: &str, payload: &T) -> ApiResult<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.builder(method, self.url(endpoint))?.json(payload);
        self.execute(request).await
    }

    // ===== Auth =====

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        info!("Logging in as {}", email);

        let request = self.client.post(self.url(LOGIN_ENDPOINT)).json(&payload);
        self.execute(request).await
    }

    pub async fn profile(&self) -> ApiResult<User> {
        self.execute(self.authed(Method::GET, self.url(PROFILE_ENDPOINT))?).await
    }

    // ===== Jobs =====

    pub async fn get_jobs(&self, params: &JobParams) -> ApiResult<JobList> {
        debug!("Fetching jobs with {:?}", params);
        self.get(JOBS_ENDPOINT, &params.to_query()).await
    }

    pub async fn get_job(&self, job_id: &str) -> ApiResult<Job> {
        let url = self.segment_url(JOBS_ENDPOINT, &[job_id])?;
        self.execute(self.builder(Method::GET, url)?).await
    }

    pub async fn create_job(&self, job: &JobCreate) -> ApiResult<Job> {
        info!("Creating job '{}' at {}", job.title, job.company);
        self.send_json(Method::POST, &format!("{}/", JOBS_ENDPOINT), job).await
    }

    pub async fn update_job(&self, job_id: &str, job: &JobUpdate) -> ApiResult<Job> {
        info!("Updating job {}", job_id);
        let url = self.segment_url(JOBS_ENDPOINT, &[job_id])?;
        self.execute(self.builder(Method::PUT, url)?.json(job)).await
    }

    pub async fn delete_job(&self, job_id: &str) -> ApiResult<MessageResponse> {
        info!("Deleting job {}", job_id);
        let url = self.segment_url(JOBS_ENDPOINT, &[job_id])?;
        self.execute(self.builder(Method::DELETE, url)?).await
    }

    pub async fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
    ) -> ApiResult<MessageResponse> {
        info!("Setting job {} status to {}", job_id, status);
        let url = self.segment_url(JOBS_ENDPOINT, &[job_id, "status"])?;
        let request = self
            .builder(Method::PATCH, url)?
            .query(&[("status", status.as_str())]);
        self.execute(request).await
    }

    pub async fn parse_job_description(&self, text: &str) -> ApiResult<JobParseResult> {
        info!("Sending job description ({} chars) to AI parser", text.len());
        let payload = serde_json::json!({ "job_description": text });
        self.send_json(Method::POST, JOB_PARSE_ENDPOINT, &payload).await
    }

    // ===== Candidates =====

    pub async fn get_candidates(
        &self,
        params: &CandidateParams,
    ) -> ApiResult<Vec<CandidateSummary>> {
        let mut request = self.authed(Method::GET, self.url(CANDIDATES_ALL_ENDPOINT))?;
        let query = params.to_query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        self.execute(request).await
    }

    pub async fn get_candidate(&self, candidate_id: &str) -> ApiResult<Candidate> {
        let url = self.segment_url(CANDIDATES_ENDPOINT, &[candidate_id])?;
        self.execute(self.authed(Method::GET, url)?).await
    }

    pub async fn delete_candidate(&self, candidate_id: &str) -> ApiResult<MessageResponse> {
        info!("Deleting candidate {}", candidate_id);
        let url = self.segment_url(CANDIDATES_ENDPOINT, &[candidate_id])?;
        self.execute(self.authed(Method::DELETE, url)?).await
    }

    pub async fn search_candidates(&self, query: &str) -> ApiResult<Vec<CandidateSummary>> {
        let url = self.segment_url(CANDIDATES_ENDPOINT, &["search", query])?;
        self.execute(self.authed(Method::GET, url)?).await
    }

    /// Upload one or more resume PDFs, optionally attached to a job.
    pub async fn upload_candidates<P>(
        &self,
        files: &[P],
        job_id: Option<&str>,
    ) -> ApiResult<BatchUploadResult>
    where
        P: AsRef<Path>,
    {
        let mut request = self.authed(Method::POST, self.url(CANDIDATES_UPLOAD_ENDPOINT))?;

        let mut form = Form::new();
        for path in files {
            let path = path.as_ref();
            let file_name = file_name_of(path)?;
            let content_type = content_type_for(&file_name)?;
            let content = tokio::fs::read(path).await?;

            let part = Part::bytes(content)
                .file_name(file_name)
                .mime_str(content_type)
                .map_err(|e| ApiError::InvalidFile(e.to_string()))?;
            form = form.part("files", part);
        }

        if let Some(job_id) = job_id {
            form = form.text("job_id", job_id.to_string());
            request = request.query(&[("job_id", job_id)]);
        }

        info!(
            "Uploading {} resume(s) to {}",
            files.len(),
            CANDIDATES_UPLOAD_ENDPOINT
        );
        self.execute(request.multipart(form)).await
    }

    // ===== Applications =====

    pub async fn get_applications(
        &self,
        params: &ApplicationParams,
    ) -> ApiResult<ApplicationList> {
        self.get(APPLICATIONS_ENDPOINT, &params.to_query()).await
    }

    pub async fn get_job_applications(
        &self,
        job_id: &str,
        params: &ApplicationParams,
    ) -> ApiResult<ApplicationList> {
        let url = self.segment_url(APPLICATIONS_ENDPOINT, &["job", job_id])?;
        let mut request = self.builder(Method::GET, url)?;
        let query = params.to_query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        self.execute(request).await
    }
}

/// Message for a non-2xx response: the server's `detail` string when present.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token_store::MemoryTokenStore;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard, token: Option<&str>) -> ApiClient {
        let store: Arc<dyn TokenStore> = match token {
            Some(t) => Arc::new(MemoryTokenStore::with_token(t)),
            None => Arc::new(MemoryTokenStore::default()),
        };
        ApiClient::new(&server.url(), store).unwrap()
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, br#"{"detail":"Job not found"}"#),
            "Job not found"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"<html>oops</html>"),
            "HTTP error! status: 502"
        );
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, br#"{"detail":[{"msg":"x"}]}"#),
            "HTTP error! status: 422"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new(
            "http://localhost:8000/api/v1/",
            Arc::new(MemoryTokenStore::default()),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
    }

    #[tokio::test]
    async fn test_get_jobs_sends_filters_and_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/jobs")
            .match_header("authorization", "Bearer tok")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("size".into(), "10".into()),
                Matcher::UrlEncoded("status".into(), "published".into()),
                Matcher::UrlEncoded("search".into(), "rust dev".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"jobs":[{"id":"j1","title":"Rust Dev","company":"Acme","description":"d"}],
                    "total":1,"page":1,"size":10}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        let params = JobParams {
            page: Some(1),
            size: Some(10),
            status: Some(JobStatus::Published),
            is_active: None,
            search: Some("rust dev".to_string()),
        };
        let list = client.get_jobs(&params).await.unwrap();

        assert_eq!(list.total, 1);
        assert_eq!(list.jobs[0].title, "Rust Dev");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_surfaces_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/jobs/missing")
            .with_status(404)
            .with_body(r#"{"detail":"Job not found"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        let err = client.get_job("missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Job not found");
    }

    #[tokio::test]
    async fn test_non_success_without_body_uses_generic_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/jobs/j1")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        let err = client.delete_job("j1").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_candidate_endpoints_require_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/candidates/all")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client
            .get_candidates(&CandidateParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::MissingToken));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_job_status_uses_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/jobs/j1/status")
            .match_query(Matcher::UrlEncoded("status".into(), "closed".into()))
            .with_status(200)
            .with_body(r#"{"message":"Job status updated to closed"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        let res = client
            .update_job_status("j1", JobStatus::Closed)
            .await
            .unwrap();

        assert_eq!(res.message, "Job status updated to closed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_job_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/jobs/")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "title": "Backend Engineer",
                "type": "full-time",
                "salary_min": 80000,
                "salary_max": 100000
            })))
            .with_status(201)
            .with_body(
                r#"{"id":"new","title":"Backend Engineer","company":"Acme","description":"d",
                    "salary_min":80000,"salary_max":100000,"status":"draft"}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        let job = JobCreate {
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            job_type: "full-time".to_string(),
            salary_min: 80000,
            salary_max: 100000,
            description: "d".to_string(),
            requirements: None,
            responsibilities: None,
            benefits: None,
            contact_email: None,
            application_deadline: None,
        };
        let created = client.create_job(&job).await.unwrap();

        assert_eq!(created.id, "new");
        assert_eq!(created.status, JobStatus::Draft);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf_before_request() {
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "plain text").unwrap();

        let client = client_for(&server, Some("tok"));
        let err = client.upload_candidates(&[path], None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidFile(_)));
    }

    #[tokio::test]
    async fn test_upload_sends_files_and_job_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/candidates/upload")
            .match_header("authorization", "Bearer tok")
            .match_query(Matcher::UrlEncoded("job_id".into(), "j9".into()))
            .match_body(Matcher::Regex(r#"filename="cv\.pdf""#.to_string()))
            .with_status(200)
            .with_body(
                r#"{"total_files":1,"succeeded":1,"failed":0,"failed_files":[],
                    "results":[{"full_name":"Grace Hopper","email":"grace@navy.mil",
                    "skills":[{"name":"COBOL"}],"experience":[]}]}"#,
            )
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        std::fs::write(&path, b"%PDF-1.4 fake").unwrap();

        let client = client_for(&server, Some("tok"));
        let result = client.upload_candidates(&[path], Some("j9")).await.unwrap();

        assert_eq!(result.succeeded, 1);
        assert_eq!(result.results[0].full_name.as_deref(), Some("Grace Hopper"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ids_with_reserved_characters_stay_in_one_segment() {
        let mut server = mockito::Server::new_async().await;
        let wrong = server
            .mock("GET", "/jobs/a")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let job = server
            .mock("GET", "/jobs/a%3Fx=1")
            .with_status(200)
            .with_body(r#"{"id":"a?x=1","title":"T","company":"C","description":"d"}"#)
            .create_async()
            .await;
        let candidate = server
            .mock("DELETE", "/candidates/x%2F..%2F..%2Fjobs%2Fj1")
            .with_status(200)
            .with_body(r#"{"message":"Candidate deleted successfully"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        assert_eq!(client.get_job("a?x=1").await.unwrap().id, "a?x=1");
        client.delete_candidate("x/../../jobs/j1").await.unwrap();

        job.assert_async().await;
        candidate.assert_async().await;
        wrong.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_candidates_encodes_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/candidates/search/react%20native")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server, Some("tok"));
        let found = client.search_candidates("react native").await.unwrap();

        assert!(found.is_empty());
        mock.assert_async().await;
    }
}
