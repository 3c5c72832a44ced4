//! Bullet Selector: ranks profile bullets by keyword overlap with a job description.
//!
//! Pure and deterministic: no I/O, no LLM calls. The top-K result is embedded
//! in the generation prompt as the preferred evidence for the tailored resume.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::profile::Profile;

/// Default number of bullets handed to the prompt.
pub const DEFAULT_BULLET_LIMIT: usize = 12;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "for", "to", "of", "in", "on", "at", "with", "from", "by",
    "as", "is", "are", "was", "were", "be", "been", "being", "will", "would", "should", "could",
    "into", "about", "over", "under", "within", "across",
];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A profile bullet scored against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedBullet {
    pub role_title: String,
    pub company: String,
    pub bullet: String,
    pub score: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Selection algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Splits text into lowercase runs of ASCII alphanumerics, `+`, `#` and `.`,
/// dropping single-character tokens and stopwords.
///
/// `"C++ and C# on AWS."` → `["c++", "c#", "aws."]`
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .filter(|t| t.len() > 1 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Builds the job-description token frequency table.
pub fn token_frequencies(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Scores a bullet: each of its token occurrences contributes that token's
/// frequency in the job description (0 when absent).
pub fn score_bullet(bullet: &str, jd_counts: &HashMap<String, u32>) -> u32 {
    tokenize(bullet)
        .iter()
        .map(|t| jd_counts.get(t).copied().unwrap_or(0))
        .sum()
}

/// Returns at most `limit` bullets from the profile's experience, highest
/// score first. Ties keep profile order (role order, then bullet order).
pub fn select_top_bullets(profile: &Profile, jd_text: &str, limit: usize) -> Vec<SelectedBullet> {
    let jd_counts = token_frequencies(jd_text);

    let mut pool: Vec<SelectedBullet> = profile
        .experience
        .iter()
        .flat_map(|role| {
            role.bullets.iter().map(|bullet| SelectedBullet {
                role_title: role.title.clone(),
                company: role.company.clone(),
                bullet: bullet.clone(),
                score: score_bullet(bullet, &jd_counts),
            })
        })
        .collect();

    // sort_by is stable, so equal scores stay in profile order
    pool.sort_by(|a, b| b.score.cmp(&a.score));
    pool.truncate(limit);
    pool
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Role;

    fn make_profile(roles: Vec<(&str, &str, Vec<&str>)>) -> Profile {
        Profile {
            name: "Test Candidate".to_string(),
            contacts: Default::default(),
            summary: String::new(),
            skills: vec![],
            experience: roles
                .into_iter()
                .map(|(title, company, bullets)| Role {
                    title: title.to_string(),
                    company: company.to_string(),
                    start: "2020-01".to_string(),
                    end: "2022-06".to_string(),
                    bullets: bullets.into_iter().map(str::to_string).collect(),
                })
                .collect(),
            education: vec![],
            projects: vec![],
        }
    }

    #[test]
    fn test_tokenize_keeps_language_symbols() {
        let tokens = tokenize("Shipped C++ and C# services on AWS with Node.js");
        assert_eq!(tokens, vec!["shipped", "c++", "c#", "services", "aws", "node.js"]);
    }

    #[test]
    fn test_tokenize_drops_single_chars_and_stopwords() {
        let tokens = tokenize("a B of the R and Go");
        assert_eq!(tokens, vec!["go"]);
    }

    #[test]
    fn test_score_counts_each_bullet_occurrence() {
        let jd = token_frequencies("python python aws");
        assert_eq!(score_bullet("Python tooling", &jd), 2);
        assert_eq!(score_bullet("Python and more Python", &jd), 4);
        assert_eq!(score_bullet("AWS Python", &jd), 3);
    }

    #[test]
    fn test_zero_overlap_scores_zero() {
        let jd = token_frequencies("Python backend engineer");
        assert_eq!(score_bullet("Organised the office party", &jd), 0);
    }

    #[test]
    fn test_relevant_bullets_rank_above_unrelated() {
        let profile = make_profile(vec![(
            "Engineer",
            "Acme Corp",
            vec![
                "Organised quarterly team offsites",
                "Built Python services handling 2M requests/day",
                "Migrated workloads to AWS cutting costs 30%",
            ],
        )]);
        let selected =
            select_top_bullets(&profile, "Python backend engineer with AWS experience", 12);

        assert_eq!(selected.len(), 3);
        assert_eq!(selected[2].bullet, "Organised quarterly team offsites");
        assert_eq!(selected[2].score, 0);
        assert!(selected[0].score > 0 && selected[1].score > 0);
    }

    #[test]
    fn test_result_never_exceeds_limit_and_is_non_increasing() {
        let bullets: Vec<String> = (0..30)
            .map(|i| format!("Rust service {} with {} kafka", i, "rust ".repeat(i % 4)))
            .collect();
        let profile = make_profile(vec![(
            "Engineer",
            "Acme Corp",
            bullets.iter().map(String::as_str).collect(),
        )]);

        for limit in [0, 1, 5, 12, 50] {
            let selected = select_top_bullets(&profile, "rust kafka rust", limit);
            assert!(selected.len() <= limit, "len {} > limit {limit}", selected.len());
            assert!(
                selected.windows(2).all(|w| w[0].score >= w[1].score),
                "scores must be non-increasing"
            );
        }
    }

    #[test]
    fn test_ties_keep_profile_order() {
        let profile = make_profile(vec![
            ("Engineer", "Acme Corp", vec!["Wrote Rust code", "Reviewed Rust code"]),
            ("Intern", "Beta Ltd", vec!["Tested Rust code"]),
        ]);
        let selected = select_top_bullets(&profile, "rust", 12);
        let order: Vec<_> = selected.iter().map(|s| s.bullet.as_str()).collect();
        assert_eq!(order, vec!["Wrote Rust code", "Reviewed Rust code", "Tested Rust code"]);
        assert_eq!(selected[2].company, "Beta Ltd");
    }

    #[test]
    fn test_empty_profile_selects_nothing() {
        let profile = make_profile(vec![]);
        assert!(select_top_bullets(&profile, "anything", DEFAULT_BULLET_LIMIT).is_empty());
    }
}
