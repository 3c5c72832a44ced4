use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job::Region;

/// Outcome of compiling one document. `Degraded` keeps every backend's
/// failure reason; the `.tex` source is then the only deliverable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompileStatus {
    Compiled,
    Degraded { reasons: Vec<String> },
}

impl CompileStatus {
    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileStatus::Compiled)
    }
}

/// Everything produced for a single job, as public paths under `/artifacts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub job_id: String,
    pub region: Region,
    pub resume_tex: String,
    pub cover_letter_tex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter_pdf: Option<String>,
    pub resume_compile: CompileStatus,
    pub cover_letter_compile: CompileStatus,
    pub jd_keywords_matched: Vec<String>,
    pub risks: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job that ended in a hard failure. The rest of the batch still runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailure {
    pub job_id: String,
    pub kind: String,
    pub message: String,
}

/// Result of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run: String,
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<JobFailure>,
    pub zip: String,
}
