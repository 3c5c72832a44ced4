//! Tailoring pipeline: one job description in, validated and grounded output out.
//!
//! Flow: select_top_bullets → region_rules → build_prompt → generate →
//!       validate_response → check_grounding.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::TailorError;
use crate::grounding::checker::check_grounding;
use crate::grounding::validator::validate_response;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::TextGenerator;
use crate::models::job::JobJD;
use crate::models::output::LlmOutput;
use crate::models::profile::Profile;
use crate::tailoring::bullet_selector::{select_top_bullets, SelectedBullet};
use crate::tailoring::prompts::{TAILOR_CLOSING, TAILOR_DIRECTIVE};
use crate::tailoring::region_rules::{region_rules, RegionRules};
use crate::tailoring::schema::output_schema;

/// Progress of one job through the pipeline. Logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Selected,
    Prompted,
    Generated,
    Validated,
    Rejected,
    Rendered,
    Compiled,
    Degraded,
}

/// Runs selection, prompting, generation, validation and grounding for one job.
pub async fn run_tailor(
    generator: &dyn TextGenerator,
    profile: &Profile,
    job: &JobJD,
    bullet_limit: usize,
) -> Result<LlmOutput, TailorError> {
    let job_key = job.key();

    let selected = select_top_bullets(profile, &job.jd_text, bullet_limit);
    debug!(job = %job_key, stage = ?JobStage::Selected, "Selected {} bullets", selected.len());

    let rules = region_rules(&job.region);
    let prompt = build_prompt(profile, &job.jd_text, &rules, &selected)?;
    debug!(job = %job_key, stage = ?JobStage::Prompted, "Prompt is {} chars", prompt.len());

    let raw = generator.generate(&prompt, output_schema()).await?;
    debug!(job = %job_key, stage = ?JobStage::Generated, "Response is {} chars", raw.len());

    let checked = validate_response(&raw).and_then(|output| {
        check_grounding(&output, profile)?;
        Ok(output)
    });

    match checked {
        Ok(output) => {
            info!(
                job = %job_key,
                stage = ?JobStage::Validated,
                "Output validated: {} roles, {} keywords matched",
                output.resume.experience.len(),
                output.ats.jd_keywords_matched.len()
            );
            Ok(output)
        }
        Err(e) => {
            info!(job = %job_key, stage = ?JobStage::Rejected, "Output rejected: {e}");
            Err(e)
        }
    }
}

/// Builds the single instruction payload: directive followed by labelled
/// context blocks and the literal schema.
pub fn build_prompt(
    profile: &Profile,
    jd_text: &str,
    rules: &RegionRules,
    selected: &[SelectedBullet],
) -> Result<String, TailorError> {
    let rules_json = to_json(rules, "region rules")?;
    let profile_json = to_json(profile, "profile")?;
    let selected_json = to_json(selected, "selected bullets")?;
    let schema_json = to_json(output_schema(), "schema")?;

    Ok(format!(
        "{TAILOR_DIRECTIVE}\n{GROUNDING_INSTRUCTION}\n{JSON_ONLY_INSTRUCTION}\n\n\
         REGION_RULES:\n{rules_json}\n\n\
         PROFILE_MIN:\n{profile_json}\n\n\
         JD_TEXT:\n{jd_text}\n\n\
         PRESELECTED_PROFILE_BULLETS:\n{selected_json}\n\n\
         SCHEMA (immutable):\n{schema_json}\n\n\
         {TAILOR_CLOSING}"
    ))
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String, TailorError> {
    serde_json::to_string(value)
        .map_err(|e| TailorError::Render(format!("Failed to serialize {what}: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
