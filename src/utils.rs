// src/utils.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::Path;

use crate::error::{ApiError, ApiResult};

pub const RESUME_EXTENSIONS: &[&str] = &["pdf"];

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> ApiResult<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| ApiError::InvalidFile(format!("File has no extension: {}", filename)))?;

    if !allowed.contains(&ext.as_str()) {
        return Err(ApiError::InvalidFile(format!(
            "File {} is not a PDF",
            filename
        )));
    }

    Ok(())
}

/// Content type sent for an uploaded resume
pub fn content_type_for(filename: &str) -> ApiResult<&'static str> {
    validate_file_extension(filename, RESUME_EXTENSIONS)?;
    Ok("application/pdf")
}

/// Final path component as an owned string
pub fn file_name_of(path: &Path) -> ApiResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidFile(format!("Not a file: {}", path.display())))
}

/// Render an API timestamp as `Jan 5, 2024`. The backend emits naive ISO
/// strings, sometimes with an offset; anything unparseable is shown as-is.
pub fn format_date(raw: &str) -> String {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Ceiling division used for page counts; zero-sized pages yield zero pages.
pub fn div_ceil(total: u64, size: u64) -> u64 {
    if size == 0 {
        0
    } else {
        total.div_ceil(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("test.pdf"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("Resume.PDF"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("cv.pdf", RESUME_EXTENSIONS).is_ok());
        assert!(validate_file_extension("CV.Pdf", RESUME_EXTENSIONS).is_ok());
        assert!(validate_file_extension("cv.docx", RESUME_EXTENSIONS).is_err());
        assert!(validate_file_extension("noext", RESUME_EXTENSIONS).is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-05T10:30:00.123456"), "Jan 5, 2024");
        assert_eq!(format_date("2024-03-15T08:00:00Z"), "Mar 15, 2024");
        assert_eq!(format_date("2024-12-31"), "Dec 31, 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_div_ceil() {
        assert_eq!(div_ceil(0, 10), 0);
        assert_eq!(div_ceil(10, 10), 1);
        assert_eq!(div_ceil(11, 10), 2);
        assert_eq!(div_ceil(5, 0), 0);
    }
}
