//! Fixtures shared by tests across the tailoring, grounding and pipeline modules.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::TailorError;
use crate::llm_client::TextGenerator;
use crate::models::profile::{Contact, Education, Profile, Project, Role};

/// Profile with one role at Acme Corp (2020-01 to 2022-06) and one school.
pub fn acme_profile() -> Profile {
    Profile {
        name: "Jane Doe".to_string(),
        contacts: Contact {
            email: "jane@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            location: "Austin, TX".to_string(),
            links: vec!["https://github.com/janedoe".to_string()],
        },
        summary: "Backend engineer focused on Python services.".to_string(),
        skills: vec!["Python".to_string(), "AWS".to_string(), "PostgreSQL".to_string()],
        experience: vec![Role {
            title: "Software Engineer".to_string(),
            company: "Acme Corp".to_string(),
            start: "2020-01".to_string(),
            end: "2022-06".to_string(),
            bullets: vec![
                "Organised the quarterly team offsite".to_string(),
                "Built Python ingestion services processing 5M events/day".to_string(),
                "Moved batch jobs to AWS Lambda, cutting infra cost 35%".to_string(),
            ],
        }],
        education: vec![Education {
            school: "State University".to_string(),
            degree: "BSc Computer Science".to_string(),
            period: "2016-2020".to_string(),
        }],
        projects: vec![Project {
            name: "ledger-rs".to_string(),
            stack: vec!["Rust".to_string()],
            bullets: vec!["Double-entry ledger with 100% test coverage".to_string()],
        }],
    }
}

/// A schema-valid response whose single experience entry names `company`.
pub fn grounded_response_value(company: &str) -> Value {
    json!({
        "resume": {
            "summary": "Python backend engineer with AWS depth.",
            "skills_line": ["Python", "AWS"],
            "experience": [{
                "title": "Software Engineer",
                "company": company,
                "start": "2020-01",
                "end": "2022-06",
                "bullets": ["Built Python services processing 5M events/day on AWS"]
            }],
            "projects": [{ "name": "ledger-rs", "stack": ["Rust"], "bullets": [] }],
            "education": [{
                "school": "State University",
                "degree": "BSc Computer Science",
                "period": "2016-2020"
            }]
        },
        "cover_letter": {
            "address": "Hiring Team, Acme Corp",
            "intro": "I am applying for the Backend Engineer role.",
            "why_you": "I build reliable Python services.",
            "evidence": ["Cut infra cost 35% by moving batch jobs to AWS Lambda"],
            "why_them": "Your platform team ships fast.",
            "close": "I look forward to talking."
        },
        "ats": {
            "jd_keywords_matched": ["python", "aws"],
            "risks": []
        }
    })
}

pub fn grounded_response(company: &str) -> String {
    grounded_response_value(company).to_string()
}

/// Scripted `TextGenerator` that records every prompt it receives.
pub struct StubGenerator {
    responses: Mutex<VecDeque<Result<String, TailorError>>>,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn scripted(responses: Vec<Result<String, TailorError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn new(response: impl Into<String>) -> Self {
        Self::scripted(vec![Ok(response.into())])
    }

    pub fn failing(err: TailorError) -> Self {
        Self::scripted(vec![Err(err)])
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str, _schema: &Value) -> Result<String, TailorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TailorError::Generation("no scripted response left".into())))
    }
}
