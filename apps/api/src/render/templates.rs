//! Document Renderer: region-keyed LaTeX templates for resumes and cover letters.
//!
//! Each document gets its own context (profile + its half of the output + job).
//! Every interpolated value goes through `escape_latex`; only the template
//! scaffolding itself is emitted raw.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::TailorError;
use crate::models::job::{JobJD, Region};
use crate::models::output::{LlmOutput, OutCoverLetter, OutResume};
use crate::models::profile::Profile;
use crate::render::latex::{escape_join, escape_latex};

// ────────────────────────────────────────────────────────────────────────────
// Template registry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeTemplate {
    UsOnePage,
    EuTwoPage,
    GlOnePage,
}

impl ResumeTemplate {
    /// GL is the fallback for any region outside US/EU.
    pub fn for_region(region: &Region) -> Self {
        match region {
            Region::Us => ResumeTemplate::UsOnePage,
            Region::Eu => ResumeTemplate::EuTwoPage,
            Region::Gl | Region::Other(_) => ResumeTemplate::GlOnePage,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResumeTemplate::UsOnePage => "resume_us_onepage",
            ResumeTemplate::EuTwoPage => "resume_eu_twopage",
            ResumeTemplate::GlOnePage => "resume_gl_onepage",
        }
    }

    fn preamble(self) -> &'static str {
        match self {
            ResumeTemplate::UsOnePage => {
                "\\documentclass[10pt,letterpaper]{article}\n\
                 \\usepackage[margin=0.6in]{geometry}\n"
            }
            ResumeTemplate::EuTwoPage => {
                "\\documentclass[11pt,a4paper]{article}\n\
                 \\usepackage[margin=2cm]{geometry}\n"
            }
            ResumeTemplate::GlOnePage => {
                "\\documentclass[10pt,a4paper]{article}\n\
                 \\usepackage[margin=0.7in]{geometry}\n"
            }
        }
    }

    pub fn render(self, ctx: &ResumeContext<'_>) -> String {
        let mut tex = String::from(self.preamble());
        tex.push_str(COMMON_PACKAGES);
        tex.push_str("\\begin{document}\n\n");
        tex.push_str(&header(ctx.profile));

        match self {
            ResumeTemplate::EuTwoPage => {
                tex.push_str(&section("Profile", &escape_latex(&ctx.out.summary)));
                tex.push_str(&experience_block(ctx.out));
                tex.push_str(&education_block(ctx.out));
                tex.push_str(&skills_block(ctx.out));
                tex.push_str(&projects_block(ctx.out));
            }
            ResumeTemplate::UsOnePage | ResumeTemplate::GlOnePage => {
                tex.push_str(&section("Summary", &escape_latex(&ctx.out.summary)));
                tex.push_str(&skills_block(ctx.out));
                tex.push_str(&experience_block(ctx.out));
                tex.push_str(&projects_block(ctx.out));
                tex.push_str(&education_block(ctx.out));
            }
        }

        tex.push_str(&format!(
            "% tailored for {} at {}\n",
            escape_latex(&ctx.job.title),
            escape_latex(&ctx.job.company)
        ));
        tex.push_str("\\end{document}\n");
        tex
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverLetterTemplate {
    Simple,
    StandardGlobal,
}

impl CoverLetterTemplate {
    pub fn for_region(region: &Region) -> Self {
        match region {
            Region::Us | Region::Eu => CoverLetterTemplate::Simple,
            Region::Gl | Region::Other(_) => CoverLetterTemplate::StandardGlobal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CoverLetterTemplate::Simple => "cover_letter_simple",
            CoverLetterTemplate::StandardGlobal => "cover_letter_standard_global",
        }
    }

    pub fn render(self, ctx: &CoverLetterContext<'_>) -> String {
        let out = ctx.out;
        let mut tex = String::from(
            "\\documentclass[11pt,a4paper]{article}\n\
             \\usepackage[margin=1in]{geometry}\n",
        );
        tex.push_str(COMMON_PACKAGES);
        tex.push_str("\\begin{document}\n\n");
        tex.push_str(&header(ctx.profile));

        tex.push_str("\\today\n\n");
        if !out.address.trim().is_empty() {
            tex.push_str(&format!("{}\n\n", escape_latex(&out.address)));
        }

        if self == CoverLetterTemplate::StandardGlobal {
            tex.push_str(&format!(
                "\\textbf{{Re: {} at {}}}\n\n",
                escape_latex(&ctx.job.title),
                escape_latex(&ctx.job.company)
            ));
            tex.push_str("Dear Hiring Committee,\n\n");
        } else {
            tex.push_str("Dear Hiring Manager,\n\n");
        }

        for paragraph in [&out.intro, &out.why_you] {
            if !paragraph.trim().is_empty() {
                tex.push_str(&format!("{}\n\n", escape_latex(paragraph)));
            }
        }

        let evidence: Vec<&String> = out.evidence.iter().filter(|e| !e.trim().is_empty()).collect();
        if !evidence.is_empty() {
            tex.push_str("\\begin{itemize}\n");
            for item in evidence {
                tex.push_str(&format!("  \\item {}\n", escape_latex(item)));
            }
            tex.push_str("\\end{itemize}\n\n");
        }

        for paragraph in [&out.why_them, &out.close] {
            if !paragraph.trim().is_empty() {
                tex.push_str(&format!("{}\n\n", escape_latex(paragraph)));
            }
        }

        let sign_off = match self {
            CoverLetterTemplate::Simple => "Sincerely,",
            CoverLetterTemplate::StandardGlobal => "Kind regards,",
        };
        tex.push_str(&format!(
            "{sign_off}\\\\\n{}\n\n",
            escape_latex(&ctx.profile.name)
        ));
        tex.push_str("\\end{document}\n");
        tex
    }
}

pub struct ResumeContext<'a> {
    pub profile: &'a Profile,
    pub out: &'a OutResume,
    pub job: &'a JobJD,
}

pub struct CoverLetterContext<'a> {
    pub profile: &'a Profile,
    pub out: &'a OutCoverLetter,
    pub job: &'a JobJD,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared blocks
// ────────────────────────────────────────────────────────────────────────────

const COMMON_PACKAGES: &str = "\\usepackage[T1]{fontenc}\n\
     \\usepackage[utf8]{inputenc}\n\
     \\usepackage{enumitem}\n\
     \\usepackage[hidelinks]{hyperref}\n\
     \\setlist{nosep,leftmargin=1.2em}\n\
     \\pagestyle{empty}\n\
     \\setlength{\\parindent}{0pt}\n\n";

fn header(profile: &Profile) -> String {
    let c = &profile.contacts;
    let mut parts: Vec<String> = [&c.email, &c.phone, &c.location]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| escape_latex(s))
        .collect();
    parts.extend(
        c.links
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| format!("\\url{{{}}}", escape_url(l))),
    );

    let mut tex = format!(
        "\\begin{{center}}\n{{\\LARGE\\bfseries {}}}\\\\[2pt]\n",
        escape_latex(&profile.name)
    );
    tex.push_str(&parts.join(" $\\cdot$ "));
    tex.push_str("\n\\end{center}\n\n");
    tex
}

fn section(title: &str, body: &str) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    format!("\\section*{{{title}}}\n{body}\n\n")
}

fn itemize(items: &[String]) -> String {
    let items: Vec<&String> = items.iter().filter(|b| !b.trim().is_empty()).collect();
    if items.is_empty() {
        return String::new();
    }
    let mut tex = String::from("\\begin{itemize}\n");
    for item in items {
        tex.push_str(&format!("  \\item {}\n", escape_latex(item)));
    }
    tex.push_str("\\end{itemize}\n");
    tex
}

fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (s, "") => format!("{} -- Present", escape_latex(s)),
        ("", e) => escape_latex(e),
        (s, e) => format!("{} -- {}", escape_latex(s), escape_latex(e)),
    }
}

fn skills_block(out: &OutResume) -> String {
    section("Skills", &escape_join(&out.skills_line, ", "))
}

fn experience_block(out: &OutResume) -> String {
    let mut body = String::new();
    for role in &out.experience {
        body.push_str(&format!(
            "\\textbf{{{}}}, {} \\hfill {}\n",
            escape_latex(&role.title),
            escape_latex(&role.company),
            date_range(&role.start, &role.end)
        ));
        body.push_str(&itemize(&role.bullets));
        body.push('\n');
    }
    section("Experience", &body)
}

fn projects_block(out: &OutResume) -> String {
    let mut body = String::new();
    for project in out.projects.iter().filter(|p| !p.name.trim().is_empty()) {
        body.push_str(&format!("\\textbf{{{}}}", escape_latex(&project.name)));
        let stack = escape_join(&project.stack, ", ");
        if !stack.is_empty() {
            body.push_str(&format!(" \\textit{{({stack})}}"));
        }
        body.push('\n');
        body.push_str(&itemize(&project.bullets));
        body.push('\n');
    }
    section("Projects", &body)
}

fn education_block(out: &OutResume) -> String {
    let mut body = String::new();
    for edu in out.education.iter().filter(|e| !e.school.trim().is_empty()) {
        body.push_str(&format!("\\textbf{{{}}}", escape_latex(&edu.school)));
        if !edu.degree.trim().is_empty() {
            body.push_str(&format!(", {}", escape_latex(&edu.degree)));
        }
        body.push_str(&format!(" \\hfill {}\\\\\n", escape_latex(&edu.period)));
    }
    section("Education", &body)
}

/// URLs go through `\url{}`, which only needs `%`, `#` and braces guarded.
fn escape_url(url: &str) -> String {
    url.replace('\\', "")
        .replace('%', "\\%")
        .replace('#', "\\#")
        .replace(['{', '}'], "")
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

/// Paths of the two sources written for one job.
#[derive(Debug, Clone)]
pub struct RenderedDocs {
    pub resume_tex: PathBuf,
    pub cover_letter_tex: PathBuf,
}

/// Writes rendered documents into the shared artifacts directory.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    out_dir: PathBuf,
}

impl DocumentRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Renders and writes `{run_id}_{job_key}_resume.tex` and
    /// `{run_id}_{job_key}_cover.tex`. Existing files are overwritten.
    pub async fn render(
        &self,
        run_id: &str,
        job: &JobJD,
        profile: &Profile,
        output: &LlmOutput,
    ) -> Result<RenderedDocs, TailorError> {
        let resume_template = ResumeTemplate::for_region(&job.region);
        let letter_template = CoverLetterTemplate::for_region(&job.region);

        let resume = resume_template.render(&ResumeContext {
            profile,
            out: &output.resume,
            job,
        });
        let letter = letter_template.render(&CoverLetterContext {
            profile,
            out: &output.cover_letter,
            job,
        });

        tokio::fs::create_dir_all(&self.out_dir).await?;

        let base = format!("{run_id}_{}", job.key());
        let resume_tex = self.out_dir.join(format!("{base}_resume.tex"));
        let cover_letter_tex = self.out_dir.join(format!("{base}_cover.tex"));

        tokio::fs::write(&resume_tex, resume).await?;
        tokio::fs::write(&cover_letter_tex, letter).await?;

        debug!(
            job = %job.key(),
            "Rendered {} + {} into {}",
            resume_template.name(),
            letter_template.name(),
            self.out_dir.display()
        );

        Ok(RenderedDocs {
            resume_tex,
            cover_letter_tex,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
