//! Output schema for generation, in the generation service's schema dialect
//! (`type` in upper case, `required` lists, nested `properties` / `items`).
//!
//! The same value is sent as the response schema, embedded literally in the
//! prompt, and walked by `grounding::validator` when the response comes back.

use std::sync::OnceLock;

use serde_json::{json, Value};

pub const REQUIRED_TOP_LEVEL: &[&str] = &["resume", "cover_letter", "ats"];

/// Returns the immutable output schema.
pub fn output_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(build_schema)
}

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

fn build_schema() -> Value {
    json!({
        "type": "OBJECT",
        "required": REQUIRED_TOP_LEVEL,
        "properties": {
            "resume": {
                "type": "OBJECT",
                "required": ["summary", "skills_line", "experience", "projects", "education"],
                "properties": {
                    "summary": string(),
                    "skills_line": string_array(),
                    "experience": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "required": ["title", "company", "bullets"],
                            "properties": {
                                "title": string(),
                                "company": string(),
                                "start": string(),
                                "end": string(),
                                "bullets": string_array()
                            }
                        }
                    },
                    "projects": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": string(),
                                "stack": string_array(),
                                "bullets": string_array()
                            }
                        }
                    },
                    "education": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "school": string(),
                                "degree": string(),
                                "period": string()
                            }
                        }
                    }
                }
            },
            "cover_letter": {
                "type": "OBJECT",
                "required": ["address", "intro", "why_you", "evidence", "why_them", "close"],
                "properties": {
                    "address": string(),
                    "intro": string(),
                    "why_you": string(),
                    "evidence": string_array(),
                    "why_them": string(),
                    "close": string()
                }
            },
            "ats": {
                "type": "OBJECT",
                "required": ["jd_keywords_matched", "risks"],
                "properties": {
                    "jd_keywords_matched": string_array(),
                    "risks": string_array()
                }
            }
        }
    })
}
