use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::core::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{BatchUploadResult, UploadResult};
use crate::utils::{validate_file_extension, RESUME_EXTENSIONS};

const SKILL_PREVIEW: usize = 5;

/// Resume upload panel: PDF-only selection, then a per-file result list.
#[derive(Debug, Default)]
pub struct CandidateUpload {
    job_id: Option<String>,
    batch: Option<BatchUploadResult>,
    error: Option<String>,
    uploading: bool,
}

impl CandidateUpload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_job(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Self::default()
        }
    }

    pub fn results(&self) -> &[UploadResult] {
        self.batch
            .as_ref()
            .map(|b| b.results.as_slice())
            .unwrap_or_default()
    }

    pub fn batch(&self) -> Option<&BatchUploadResult> {
        self.batch.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Split a selection into PDFs and everything else.
    pub fn partition<P: AsRef<Path>>(files: &[P]) -> (Vec<PathBuf>, Vec<PathBuf>) {
        files
            .iter()
            .map(|p| p.as_ref().to_path_buf())
            .partition(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| validate_file_extension(n, RESUME_EXTENSIONS).is_ok())
                    .unwrap_or(false)
            })
    }

    /// Upload the selected files. Non-PDF files are dropped from the
    /// selection; an empty selection does nothing.
    pub async fn upload<P: AsRef<Path>>(
        &mut self,
        client: &ApiClient,
        files: &[P],
    ) -> ApiResult<&[UploadResult]> {
        if files.is_empty() {
            return Ok(self.results());
        }

        let (accepted, rejected) = Self::partition(files);
        for path in &rejected {
            warn!("Skipping non-PDF file {}", path.display());
        }
        if accepted.is_empty() {
            let err = ApiError::InvalidFile("only PDF resumes are accepted".to_string());
            self.error = Some(format!("Upload failed: {}", err));
            return Err(err);
        }

        self.uploading = true;
        self.batch = None;
        self.error = None;

        let result = client
            .upload_candidates(&accepted, self.job_id.as_deref())
            .await;
        self.uploading = false;

        match result {
            Ok(batch) => {
                info!(
                    "Upload finished: {} succeeded, {} failed",
                    batch.succeeded, batch.failed
                );
                self.batch = Some(batch);
                Ok(self.results())
            }
            Err(e) => {
                error!("Upload error: {}", e);
                self.error = Some(format!("Upload failed: {}", e));
                Err(e)
            }
        }
    }

    pub fn render(&self) -> Vec<String> {
        if let Some(error) = &self.error {
            return vec![error.clone()];
        }

        let Some(batch) = &self.batch else {
            return vec!["Upload PDF resumes to get started".to_string()];
        };

        let mut lines = vec!["Upload Results".to_string()];
        for result in &batch.results {
            lines.extend(render_upload_result(result));
        }
        if !batch.failed_files.is_empty() {
            lines.push(format!("Failed files: {}", batch.failed_files.join(", ")));
        }
        lines
    }
}

/// One result card: name, email, page count, counts and a short skill list.
pub fn render_upload_result(result: &UploadResult) -> Vec<String> {
    let pages = result
        .num_pages
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());

    let mut lines = vec![
        format!(
            "✓ {}",
            result.full_name.as_deref().unwrap_or("Unknown Candidate")
        ),
        format!(
            "    {} • {} page(s)",
            result.email.as_deref().unwrap_or("No email found"),
            pages
        ),
        format!(
            "    {} skills found, {} experience entries",
            result.skills.len(),
            result.experience.len()
        ),
    ];

    if !result.skills.is_empty() {
        let mut preview: Vec<String> = result
            .skills
            .iter()
            .take(SKILL_PREVIEW)
            .map(|s| s.name.clone())
            .collect();
        if result.skills.len() > SKILL_PREVIEW {
            preview.push(format!("+{} more", result.skills.len() - SKILL_PREVIEW));
        }
        lines.push(format!("    Skills: {}", preview.join(", ")));
    }

    lines
}
