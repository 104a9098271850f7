//! Data transfer objects mirrored from the Recruiter Assist API

pub mod application;
pub mod auth;
pub mod candidate;
pub mod job;
pub mod response;

pub use application::{Application, ApplicationList, ApplicationParams};
pub use auth::{LoginRequest, LoginResponse, User};
pub use candidate::{
    BatchUploadResult, Candidate, CandidateParams, CandidateSummary, Education, Experience, Skill,
    UploadResult,
};
pub use job::{Job, JobCreate, JobList, JobParams, JobParseResult, JobStatus, JobUpdate};
pub use response::{ErrorBody, MessageResponse};
