// Shared prompt fragments.
// Each service that needs generation calls defines its own prompts.rs alongside it.
// This file contains cross-cutting directives.

/// Directive that enforces JSON-only output against the supplied schema.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON for the given schema. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Directive that forbids fabricated credentials.
pub const GROUNDING_INSTRUCTION: &str = "Never invent companies, schools, or dates. \
    Every employer, school and date range you output must appear in PROFILE_MIN exactly as given. \
    Use exact JD keywords only when they are truthful for this candidate.";
