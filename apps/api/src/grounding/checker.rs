//! Grounding Checker: every employer, school and date range in the
//! generated resume must trace back to an entry in the source profile.
//!
//! Names compare case-insensitively with collapsed whitespace. Dates compare
//! after normalizing separators; an empty end, "present", "current" and "now"
//! all mean an open-ended role. Fields the output leaves empty make no claim
//! and are not checked.

use crate::errors::TailorError;
use crate::models::output::LlmOutput;
use crate::models::profile::{Profile, Role};

const OPEN_ENDED: &str = "present";

/// Fails with `TailorError::Grounding` on the first generated fact that has
/// no corresponding profile entry.
pub fn check_grounding(output: &LlmOutput, profile: &Profile) -> Result<(), TailorError> {
    for (i, role) in output.resume.experience.iter().enumerate() {
        let company = normalize_name(&role.company);
        let candidates: Vec<&Role> = profile
            .experience
            .iter()
            .filter(|r| normalize_name(&r.company) == company)
            .collect();

        if candidates.is_empty() {
            return Err(TailorError::grounding(
                format!("resume.experience[{i}].company"),
                &role.company,
            ));
        }

        // A dated role with no end renders as "Present", so an empty end is
        // only a non-claim when the start is omitted too.
        let start_claimed = !role.start.trim().is_empty();
        let end_claimed = start_claimed || !role.end.trim().is_empty();

        let start_ok =
            |r: &Role| !start_claimed || normalize_date(&r.start) == normalize_date(&role.start);
        let end_ok =
            |r: &Role| !end_claimed || normalize_date(&r.end) == normalize_date(&role.end);

        if candidates.iter().any(|r| start_ok(*r) && end_ok(*r)) {
            continue;
        }

        return Err(if candidates.iter().any(|r| start_ok(*r)) {
            TailorError::grounding(format!("resume.experience[{i}].end"), &role.end)
        } else {
            TailorError::grounding(format!("resume.experience[{i}].start"), &role.start)
        });
    }

    for (i, edu) in output.resume.education.iter().enumerate() {
        if edu.school.trim().is_empty() {
            continue;
        }
        let school = normalize_name(&edu.school);
        let candidates: Vec<_> = profile
            .education
            .iter()
            .filter(|e| normalize_name(&e.school) == school)
            .collect();

        if candidates.is_empty() {
            return Err(TailorError::grounding(
                format!("resume.education[{i}].school"),
                &edu.school,
            ));
        }

        if !edu.period.trim().is_empty()
            && !candidates
                .iter()
                .any(|e| normalize_date(&e.period) == normalize_date(&edu.period))
        {
            return Err(TailorError::grounding(
                format!("resume.education[{i}].period"),
                &edu.period,
            ));
        }
    }

    Ok(())
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn normalize_date(date: &str) -> String {
    let compact: String = date
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '–' | '—' | '/' => '-',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();

    match compact.as_str() {
        "" | "present" | "current" | "now" => OPEN_ENDED.to_string(),
        _ => compact,
    }
}
