// Prompt constants for the tailoring pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Role and writing-style directive that opens every tailoring prompt.
pub const TAILOR_DIRECTIVE: &str = "You are an expert ATS resume & cover-letter tailor. \
    Produce ATS-optimized resume and cover-letter content for the job below. \
    Respect the REGION_RULES style and page guidance. \
    Keep bullets concise, metric-first and quantitative, each flowing as <action -> impactful result>. \
    Prefer the PRESELECTED_PROFILE_BULLETS as evidence; rephrase them, never change their facts.";

/// Closing line appended after the schema block.
pub const TAILOR_CLOSING: &str = "Return JSON only.";
