//! Typed form of the generation service's response. Values of these types
//! only exist after `grounding::validator` has checked the raw JSON against
//! the declared schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutRole {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutProject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutEducation {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutResume {
    pub summary: String,
    pub skills_line: Vec<String>,
    pub experience: Vec<OutRole>,
    pub projects: Vec<OutProject>,
    pub education: Vec<OutEducation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutCoverLetter {
    pub address: String,
    pub intro: String,
    pub why_you: String,
    pub evidence: Vec<String>,
    pub why_them: String,
    pub close: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutAts {
    pub jd_keywords_matched: Vec<String>,
    pub risks: Vec<String>,
}

/// Validated, grounded generation output for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmOutput {
    pub resume: OutResume,
    pub cover_letter: OutCoverLetter,
    pub ats: OutAts,
}
