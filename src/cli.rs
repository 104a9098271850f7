// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::types::{ApplicationList, ApplicationParams, CandidateSummary, JobStatus, JobUpdate};
use crate::utils::format_date;
use crate::views::candidate_list::render_candidate;
use crate::views::{
    CandidateList, CandidateUpload, Dashboard, EntryMode, JobCreation, JobDetail, JobDetailState,
    JobDetailTab, JobDraft, JobManagement,
};

#[derive(Parser, Debug)]
#[command(name = "recruiter-assist")]
#[command(about = "Manage job postings and candidates on a Recruiter Assist server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the API, e.g. http://localhost:8000/api/v1
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// File holding the access token between runs
    #[arg(long, global = true)]
    pub token_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the access token. The password is read from
    /// RECRUITER_PASSWORD, or from stdin when that is unset.
    Login {
        email: String,
        /// Discouraged: visible in shell history and process listings
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Greeting and headline counts
    Dashboard,
    /// Job postings
    #[command(subcommand)]
    Jobs(JobCommand),
    /// Uploaded candidates
    #[command(subcommand)]
    Candidates(CandidateCommand),
    /// Applications across all jobs
    #[command(subcommand)]
    Applications(ApplicationCommand),
}

#[derive(Subcommand, Debug)]
pub enum JobCommand {
    /// List jobs, ten per page
    List {
        #[arg(long)]
        status: Option<JobStatus>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one job
    Show {
        id: String,
        #[arg(long, value_enum, default_value_t = TabArg::Description)]
        tab: TabArg,
        /// Attach a PDF resume to this job before showing it
        #[arg(long)]
        upload: Option<PathBuf>,
    },
    /// Create a job from flags, or from free text with --ai
    Create {
        #[command(flatten)]
        fields: JobFields,
        /// Job description to extract the fields from
        #[arg(long)]
        ai: Option<String>,
    },
    /// Change some fields of a job
    Update {
        id: String,
        #[command(flatten)]
        fields: JobFields,
    },
    /// Delete a job
    Delete { id: String },
    /// Set draft, published or closed
    Status { id: String, status: JobStatus },
    /// Run the AI parser without creating anything
    Parse { text: String },
    /// Applications received for a job
    Applications {
        id: String,
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CandidateCommand {
    /// List candidates, optionally filtered locally
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        job_id: Option<String>,
    },
    /// Full record of one candidate
    Show { id: String },
    /// Delete a candidate
    Delete { id: String },
    /// Upload PDF resumes
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        job_id: Option<String>,
    },
    /// Server-side candidate search
    Search { query: String },
    /// Write the candidate list to a CSV file
    Export {
        file: PathBuf,
        #[arg(long)]
        job_id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ApplicationCommand {
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    Description,
    Candidates,
    Add,
}

impl From<TabArg> for JobDetailTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Description => JobDetailTab::Description,
            TabArg::Candidates => JobDetailTab::Candidates,
            TabArg::Add => JobDetailTab::Add,
        }
    }
}

/// Job fields shared by `jobs create` and `jobs update`.
#[derive(Args, Debug, Default, Clone)]
pub struct JobFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long = "type")]
    pub job_type: Option<String>,
    #[arg(long)]
    pub salary_min: Option<String>,
    #[arg(long)]
    pub salary_max: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub requirements: Option<String>,
    #[arg(long)]
    pub responsibilities: Option<String>,
    #[arg(long)]
    pub benefits: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub deadline: Option<String>,
}

impl JobFields {
    /// Overlay the given flags onto a draft.
    pub fn apply_to(self, draft: &mut JobDraft) {
        let slots = [
            (self.title, &mut draft.title),
            (self.company, &mut draft.company),
            (self.location, &mut draft.location),
            (self.job_type, &mut draft.job_type),
            (self.salary_min, &mut draft.salary_min),
            (self.salary_max, &mut draft.salary_max),
            (self.description, &mut draft.description),
            (self.requirements, &mut draft.requirements),
            (self.responsibilities, &mut draft.responsibilities),
            (self.benefits, &mut draft.benefits),
            (self.contact_email, &mut draft.contact_email),
            (self.deadline, &mut draft.application_deadline),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    pub fn into_update(self) -> Result<JobUpdate, ApiError> {
        let salary = |value: Option<String>| -> Result<Option<i64>, ApiError> {
            value
                .map(|v| {
                    v.trim().replace(',', "").parse::<i64>().map_err(|_| {
                        ApiError::Validation(
                            "Please enter valid numbers for salary fields.".to_string(),
                        )
                    })
                })
                .transpose()
        };

        let update = JobUpdate {
            salary_min: salary(self.salary_min)?,
            salary_max: salary(self.salary_max)?,
            title: self.title,
            company: self.company,
            location: self.location,
            job_type: self.job_type,
            description: self.description,
            requirements: self.requirements,
            responsibilities: self.responsibilities,
            benefits: self.benefits,
            contact_email: self.contact_email,
            application_deadline: self.deadline,
            ..JobUpdate::default()
        };

        if let (Some(min), Some(max)) = (update.salary_min, update.salary_max) {
            if min > max {
                return Err(ApiError::Validation(
                    "Minimum salary cannot be greater than maximum salary.".to_string(),
                ));
            }
        }
        if update.is_empty() {
            return Err(ApiError::Validation("Nothing to update".to_string()));
        }
        Ok(update)
    }
}

pub const PASSWORD_VAR: &str = "RECRUITER_PASSWORD";

/// Password from the `--password` flag, then `RECRUITER_PASSWORD`, then the
/// first line of `input`.
pub fn resolve_password<F, R>(given: Option<String>, lookup: F, mut input: R) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
    R: BufRead,
{
    if let Some(password) = given.or_else(|| lookup(PASSWORD_VAR)) {
        return Ok(password);
    }

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("Password required: set {} or pipe it on stdin", PASSWORD_VAR);
    }
    Ok(password.to_string())
}

fn print_lines<W: Write>(out: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn render_applications(list: &ApplicationList) -> Vec<String> {
    let mut lines = vec![format!("{} application(s)", list.total)];
    for app in &list.applications {
        let applied = app
            .applied_at
            .as_deref()
            .or(app.created_at.as_deref())
            .map(format_date)
            .unwrap_or_default();
        lines.push(format!(
            "[{}] candidate {} for job {} - {} {}",
            app.id, app.candidate_id, app.job_id, app.status, applied
        ));
    }
    lines
}

/// Write candidates as CSV, one row per candidate.
pub fn export_candidates(path: &Path, candidates: &[CandidateSummary]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record([
        "id",
        "full_name",
        "email",
        "phone",
        "location",
        "skills",
        "experience",
        "education",
        "status",
        "created_at",
    ])?;
    for c in candidates {
        let skills = c.skills_count.to_string();
        let experience = c.experience_count.to_string();
        let education = c.education_count.to_string();
        writer.write_record([
            c.id.as_str(),
            c.full_name.as_deref().unwrap_or(""),
            c.email.as_deref().unwrap_or(""),
            c.phone.as_deref().unwrap_or(""),
            c.location.as_deref().unwrap_or(""),
            skills.as_str(),
            experience.as_str(),
            education.as_str(),
            c.status_label(),
            c.created_at.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(candidates.len())
}

/// Every command except `login` and `logout` needs a valid session.
async fn require_session(session: &mut AuthSession) -> Result<()> {
    session.restore().await;
    if !session.is_authenticated() {
        return Err(ApiError::MissingToken)
            .context("Not signed in, run `recruiter-assist login <email> <password>` first");
    }
    Ok(())
}

pub async fn handle_command<W: Write>(
    command: Command,
    session: &mut AuthSession,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let password = resolve_password(
                password,
                |key| std::env::var(key).ok(),
                std::io::stdin().lock(),
            )?;
            let user = session.login(&email, &password).await?;
            info!("Logged in as {}", user.email);
            writeln!(out, "✅ Logged in as {}", user.display_name())?;
        }

        Command::Logout => {
            session.logout()?;
            writeln!(out, "✅ Logged out")?;
        }

        Command::Dashboard => {
            require_session(session).await?;
            let dashboard = Dashboard::load(session).await;
            print_lines(out, &dashboard.render())?;
        }

        Command::Jobs(cmd) => {
            require_session(session).await?;
            handle_job_command(cmd, session, out).await?;
        }

        Command::Candidates(cmd) => {
            require_session(session).await?;
            handle_candidate_command(cmd, session, out).await?;
        }

        Command::Applications(ApplicationCommand::List { status, page }) => {
            require_session(session).await?;
            let params = ApplicationParams {
                page: Some(page),
                size: None,
                status,
            };
            let list = session.client().get_applications(&params).await?;
            print_lines(out, &render_applications(&list))?;
        }
    }
    Ok(())
}

async fn handle_job_command<W: Write>(
    cmd: JobCommand,
    session: &AuthSession,
    out: &mut W,
) -> Result<()> {
    let client = session.client();

    match cmd {
        JobCommand::List {
            status,
            active,
            search,
            page,
        } => {
            let mut view = JobManagement::new();
            view.set_status_filter(status);
            view.set_active_filter(active);
            view.set_search(search.unwrap_or_default());
            view.go_to_page(page);
            view.load(client).await?;
            print_lines(out, &view.render())?;
        }

        JobCommand::Show { id, tab, upload } => {
            let mut view = JobDetail::new(id);
            view.load(client).await;
            if let JobDetailState::NotFound(message) = view.state() {
                print_lines(out, &view.render())?;
                anyhow::bail!("{}", message);
            }
            view.set_tab(tab.into());
            if let Some(file) = upload {
                view.select_file(file);
                view.upload_resume(client)
                    .await
                    .context("Failed to upload resume")?;
                writeln!(out, "✅ Resume uploaded")?;
            }
            print_lines(out, &view.render())?;
        }

        JobCommand::Create { fields, ai } => {
            let mut page = JobCreation::new();
            if let Some(text) = ai {
                page.mode = EntryMode::Ai;
                page.ai_text = text;
                page.parse_with_ai(client).await?;
            }
            fields.apply_to(&mut page.draft);
            let job = page.submit(client).await?;
            writeln!(out, "✅ Job created successfully:")?;
            writeln!(out, "   ID: {}", job.id)?;
            writeln!(out, "   Title: {}", job.title)?;
            writeln!(out, "   Status: {}", job.status.label())?;
        }

        JobCommand::Update { id, fields } => {
            let update = fields.into_update()?;
            let job = client.update_job(&id, &update).await?;
            writeln!(out, "✅ Job updated: [{}] {}", job.id, job.title)?;
        }

        JobCommand::Delete { id } => {
            let response = client.delete_job(&id).await?;
            writeln!(out, "✅ {}", response.message)?;
        }

        JobCommand::Status { id, status } => {
            let response = client.update_job_status(&id, status).await?;
            writeln!(out, "✅ {}", response.message)?;
        }

        JobCommand::Parse { text } => {
            let mut page = JobCreation::new();
            page.ai_text = text;
            let draft = page.parse_with_ai(client).await?.clone();
            if let Some(parsed) = page.last_parse() {
                if let Some(score) = parsed.confidence_score {
                    writeln!(out, "Confidence: {:.0}%", score * 100.0)?;
                }
                writeln!(out, "Parsed fields: {}", parsed.parsed_fields.join(", "))?;
            }
            writeln!(out, "Title: {}", draft.title)?;
            writeln!(out, "Company: {}", draft.company)?;
            writeln!(out, "Location: {}", draft.location)?;
            writeln!(out, "Type: {}", draft.job_type)?;
            writeln!(out, "Salary: {} - {}", draft.salary_min, draft.salary_max)?;
            writeln!(out, "Description: {}", draft.description)?;
        }

        JobCommand::Applications { id, status } => {
            let params = ApplicationParams {
                status,
                ..ApplicationParams::default()
            };
            let list = client.get_job_applications(&id, &params).await?;
            print_lines(out, &render_applications(&list))?;
        }
    }
    Ok(())
}

async fn handle_candidate_command<W: Write>(
    cmd: CandidateCommand,
    session: &AuthSession,
    out: &mut W,
) -> Result<()> {
    let client = session.client();

    match cmd {
        CandidateCommand::List { search, job_id } => {
            let mut view = match job_id {
                Some(job_id) => CandidateList::for_job(job_id),
                None => CandidateList::new(),
            };
            view.set_search(search.unwrap_or_default());
            view.load(client).await?;
            print_lines(out, &view.render())?;
        }

        CandidateCommand::Show { id } => {
            let candidate = client.get_candidate(&id).await?;
            print_lines(out, &render_candidate(&candidate))?;
        }

        CandidateCommand::Delete { id } => {
            let mut view = CandidateList::new();
            view.load(client).await?;
            view.delete(client, &id).await?;
            writeln!(out, "✅ Candidate {} deleted", id)?;
        }

        CandidateCommand::Upload { files, job_id } => {
            let mut view = match job_id {
                Some(job_id) => CandidateUpload::for_job(job_id),
                None => CandidateUpload::new(),
            };
            let (_, rejected) = CandidateUpload::partition(files.as_slice());
            for path in &rejected {
                writeln!(out, "⚠️  Skipping non-PDF file: {}", path.display())?;
            }
            let outcome = view.upload(client, files.as_slice()).await.map(|_| ());
            print_lines(out, &view.render())?;
            if let Some(batch) = view.batch() {
                writeln!(
                    out,
                    "  ✅ Success: {}\n  ❌ Errors:  {}",
                    batch.succeeded, batch.failed
                )?;
            }
            outcome?;
        }

        CandidateCommand::Search { query } => {
            let found = client.search_candidates(&query).await?;
            writeln!(out, "{} candidate(s) match '{}'", found.len(), query)?;
            for c in &found {
                writeln!(
                    out,
                    "[{}] {} {}",
                    c.id,
                    c.full_name.as_deref().unwrap_or("Unknown Candidate"),
                    c.email.as_deref().unwrap_or("")
                )?;
            }
        }

        CandidateCommand::Export { file, job_id } => {
            let mut view = match job_id {
                Some(job_id) => CandidateList::for_job(job_id),
                None => CandidateList::new(),
            };
            view.load(client).await?;
            let count = export_candidates(&file, view.candidates()).map_err(|e| {
                error!("Candidate export failed: {}", e);
                e
            })?;
            writeln!(out, "✅ Exported {} candidate(s) to {}", count, file.display())?;
        }
    }
    Ok(())
}
