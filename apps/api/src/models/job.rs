use std::fmt;

use serde::{Deserialize, Serialize};

/// Formatting convention bucket for a job. Any code outside the recognized
/// set is kept verbatim in `Other` so that region handling stays total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Region {
    #[default]
    Us,
    Eu,
    /// Global.
    Gl,
    Other(String),
}

impl Region {
    pub fn as_str(&self) -> &str {
        match self {
            Region::Us => "US",
            Region::Eu => "EU",
            Region::Gl => "GL",
            Region::Other(code) => code,
        }
    }
}

impl From<String> for Region {
    fn from(code: String) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "US" => Region::Us,
            "EU" => Region::Eu,
            "GL" => Region::Gl,
            _ => Region::Other(code),
        }
    }
}

impl From<&str> for Region {
    fn from(code: &str) -> Self {
        Region::from(code.to_string())
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.as_str().to_string()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One target job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobJD {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub region: Region,
    pub company: String,
    pub title: String,
    pub jd_text: String,
}

impl JobJD {
    /// The explicit id when given, otherwise the title. Reported as `job_id`.
    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(&self.title)
    }

    /// `label()` with spaces and path separators replaced by underscores,
    /// used in artifact file names.
    pub fn key(&self) -> String {
        self.label().replace([' ', '/', '\\'], "_")
    }
}
