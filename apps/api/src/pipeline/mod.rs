//! Batch pipeline: runs every job of a request through tailoring, rendering
//! and compilation, then bundles the run.
//!
//! Jobs run strictly in order. A hard failure in one job (generation, schema,
//! grounding, render) is recorded as a `JobFailure` and the batch moves on;
//! only a configuration error aborts the whole batch. When no job produced an
//! artifact, the first failure becomes the batch error.

pub mod handlers;

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::CurrentUserResolver;
use crate::errors::TailorError;
use crate::llm_client::TextGenerator;
use crate::models::artifact::{Artifact, JobFailure, RunSummary};
use crate::models::job::JobJD;
use crate::models::profile::Profile;
use crate::render::bundler::bundle;
use crate::render::compiler::DocumentCompiler;
use crate::render::templates::DocumentRenderer;
use crate::tailoring::tailor::{run_tailor, JobStage};

/// Public URL prefix under which the artifacts directory is served.
pub const ARTIFACTS_ROUTE: &str = "/artifacts";

pub struct TailorPipeline {
    generator: Arc<dyn TextGenerator>,
    renderer: DocumentRenderer,
    compiler: DocumentCompiler,
    bullet_limit: usize,
}

impl TailorPipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        renderer: DocumentRenderer,
        compiler: DocumentCompiler,
        bullet_limit: usize,
    ) -> Self {
        Self {
            generator,
            renderer,
            compiler,
            bullet_limit,
        }
    }

    pub fn artifacts_dir(&self) -> &Path {
        self.renderer.out_dir()
    }

    /// Runs one batch under a fresh run id. The caller supplies the resolver;
    /// the resolved user only tags the run logs.
    pub async fn run_batch(
        &self,
        profile: &Profile,
        jobs: &[JobJD],
        resolver: &dyn CurrentUserResolver,
        bearer: Option<&str>,
    ) -> Result<RunSummary, TailorError> {
        let run_id = Uuid::new_v4().to_string();
        let user = resolver.resolve(bearer).await;
        let user = user.as_deref().unwrap_or("anonymous");

        info!(run = %run_id, user = %user, "Starting batch of {} jobs", jobs.len());

        let mut artifacts = Vec::with_capacity(jobs.len());
        let mut failures = Vec::new();
        let mut first_error = None;

        for job in jobs {
            match self.run_job(&run_id, profile, job).await {
                Ok(artifact) => artifacts.push(artifact),
                Err(e @ TailorError::Configuration(_)) => {
                    warn!(run = %run_id, "Batch aborted: {e}");
                    return Err(e);
                }
                Err(e) => {
                    warn!(run = %run_id, job = %job.label(), kind = e.kind(), "Job failed: {e}");
                    failures.push(JobFailure {
                        job_id: job.label().to_string(),
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    });
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if artifacts.is_empty() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        let zip_path = bundle(self.artifacts_dir(), &run_id).await?;

        info!(
            run = %run_id,
            user = %user,
            "Batch finished: {} artifacts, {} failures",
            artifacts.len(),
            failures.len()
        );

        Ok(RunSummary {
            zip: public_path(&zip_path),
            run: run_id,
            artifacts,
            failures,
        })
    }

    async fn run_job(
        &self,
        run_id: &str,
        profile: &Profile,
        job: &JobJD,
    ) -> Result<Artifact, TailorError> {
        let output = run_tailor(self.generator.as_ref(), profile, job, self.bullet_limit).await?;

        let docs = self.renderer.render(run_id, job, profile, &output).await?;
        debug!(job = %job.key(), stage = ?JobStage::Rendered, "LaTeX sources written");

        let resume = self.compiler.compile(&docs.resume_tex).await;
        let cover = self.compiler.compile(&docs.cover_letter_tex).await;

        let stage = if resume.pdf.is_some() && cover.pdf.is_some() {
            JobStage::Compiled
        } else {
            JobStage::Degraded
        };
        debug!(job = %job.key(), stage = ?stage, "Compilation finished");

        let now = Utc::now();
        Ok(Artifact {
            job_id: job.label().to_string(),
            region: job.region.clone(),
            resume_tex: public_path(&docs.resume_tex),
            cover_letter_tex: public_path(&docs.cover_letter_tex),
            resume_pdf: resume.pdf.as_deref().map(public_path),
            cover_letter_pdf: cover.pdf.as_deref().map(public_path),
            resume_compile: resume.status(),
            cover_letter_compile: cover.status(),
            jd_keywords_matched: output.ats.jd_keywords_matched,
            risks: output.ats.risks,
            created_at: now,
            updated_at: now,
        })
    }
}

fn public_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{ARTIFACTS_ROUTE}/{name}")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::time::Duration;

    use super::*;
    use crate::auth::AnonymousResolver;
    use crate::models::artifact::CompileStatus;
    use crate::models::job::Region;
    use crate::render::compiler::CompileBackend;
    use crate::tailoring::test_support::{acme_profile, grounded_response, StubGenerator};

    fn copying_compiler() -> DocumentCompiler {
        DocumentCompiler::new(vec![CompileBackend::new(
            "local",
            "sh",
            &["-c", r#"cp "$0" "${0%.tex}.pdf""#, "{file}"],
            Duration::from_secs(10),
        )])
    }

    fn broken_compiler() -> DocumentCompiler {
        DocumentCompiler::new(vec![
            CompileBackend::new("local", "false", &[], Duration::from_secs(10)),
            CompileBackend::new("docker", "false", &[], Duration::from_secs(10)),
        ])
    }

    fn pipeline(
        generator: Arc<StubGenerator>,
        dir: &Path,
        compiler: DocumentCompiler,
    ) -> TailorPipeline {
        TailorPipeline::new(generator, DocumentRenderer::new(dir), compiler, 12)
    }

    fn job(id: &str) -> JobJD {
        JobJD {
            id: Some(id.to_string()),
            region: Region::Us,
            company: "Acme Corp".to_string(),
            title: "Backend Engineer".to_string(),
            jd_text: "Python backend engineer with AWS experience".to_string(),
        }
    }

    fn zip_entries(dir: &Path, run: &str) -> Vec<String> {
        let file = File::open(dir.join(format!("{run}_bundle.zip"))).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_acme_scenario_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::new(grounded_response("Acme Corp")));
        let pipeline = pipeline(generator.clone(), dir.path(), copying_compiler());

        let summary = pipeline
            .run_batch(&acme_profile(), &[job("acme")], &AnonymousResolver, None)
            .await
            .unwrap();

        assert_eq!(summary.artifacts.len(), 1);
        assert!(summary.failures.is_empty());
        assert_eq!(summary.zip, format!("/artifacts/{}_bundle.zip", summary.run));

        let artifact = &summary.artifacts[0];
        assert_eq!(artifact.job_id, "acme");
        assert_eq!(artifact.resume_tex, format!("/artifacts/{}_acme_resume.tex", summary.run));
        assert_eq!(
            artifact.resume_pdf.as_deref(),
            Some(format!("/artifacts/{}_acme_resume.pdf", summary.run).as_str())
        );
        assert!(artifact.resume_compile.is_compiled());
        assert_eq!(artifact.jd_keywords_matched, vec!["python", "aws"]);

        // the preselected bullets shown to the generator lead with the Python one
        let prompt = generator.last_prompt().unwrap();
        let start = prompt.find("PRESELECTED_PROFILE_BULLETS:\n").unwrap();
        let end = prompt.find("SCHEMA (immutable):").unwrap();
        let bullets = &prompt[start..end];
        let python = bullets.find("Built Python ingestion services").unwrap();
        let offsite = bullets.find("Organised the quarterly team offsite").unwrap();
        assert!(python < offsite, "Python bullet must rank ahead of the offsite bullet");

        let run = &summary.run;
        assert_eq!(
            zip_entries(dir.path(), run),
            vec![
                format!("{run}_acme_cover.pdf"),
                format!("{run}_acme_cover.tex"),
                format!("{run}_acme_resume.pdf"),
                format!("{run}_acme_resume.tex"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_job_is_recorded_and_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::scripted(vec![
            Ok(grounded_response("Other Inc")),
            Ok(grounded_response("Acme Corp")),
        ]));
        let pipeline = pipeline(generator.clone(), dir.path(), copying_compiler());

        let summary = pipeline
            .run_batch(&acme_profile(), &[job("first"), job("second")], &AnonymousResolver, None)
            .await
            .unwrap();

        assert_eq!(generator.call_count(), 2);
        assert_eq!(summary.artifacts.len(), 1);
        assert_eq!(summary.artifacts[0].job_id, "second");
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].job_id, "first");
        assert_eq!(summary.failures[0].kind, "grounding");
        assert!(summary.failures[0].message.contains("Other Inc"));

        let entries = zip_entries(dir.path(), &summary.run);
        assert!(entries.iter().all(|e| e.contains("_second_")), "failed job must leave no files");
    }

    #[tokio::test]
    async fn test_batch_with_no_artifacts_returns_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::new(grounded_response("Other Inc")));
        let pipeline = pipeline(generator, dir.path(), copying_compiler());

        let err = pipeline
            .run_batch(&acme_profile(), &[job("acme")], &AnonymousResolver, None)
            .await
            .unwrap_err();

        match err {
            TailorError::Grounding { field, value } => {
                assert_eq!(field, "resume.experience[0].company");
                assert_eq!(value, "Other Inc");
            }
            other => panic!("expected grounding error, got {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0, "no files may be written");
    }

    #[tokio::test]
    async fn test_configuration_error_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::scripted(vec![
            Ok(grounded_response("Acme Corp")),
            Err(TailorError::Configuration("GEMINI_API_KEY not set".into())),
            Ok(grounded_response("Acme Corp")),
        ]));
        let pipeline = pipeline(generator.clone(), dir.path(), copying_compiler());

        let err = pipeline
            .run_batch(
                &acme_profile(),
                &[job("one"), job("two"), job("three")],
                &AnonymousResolver,
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "configuration");
        assert_eq!(generator.call_count(), 2, "jobs after a configuration error must not run");
    }

    #[tokio::test]
    async fn test_degraded_compile_keeps_tex_only() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::new(grounded_response("Acme Corp")));
        let pipeline = pipeline(generator, dir.path(), broken_compiler());

        let summary = pipeline
            .run_batch(&acme_profile(), &[job("acme")], &AnonymousResolver, None)
            .await
            .unwrap();

        let artifact = &summary.artifacts[0];
        assert!(artifact.resume_pdf.is_none());
        assert!(artifact.cover_letter_pdf.is_none());
        match &artifact.resume_compile {
            CompileStatus::Degraded { reasons } => assert_eq!(reasons.len(), 2),
            other => panic!("expected degraded, got {other:?}"),
        }

        let run = &summary.run;
        assert_eq!(
            zip_entries(dir.path(), run),
            vec![format!("{run}_acme_cover.tex"), format!("{run}_acme_resume.tex")]
        );
    }

    #[tokio::test]
    async fn test_runs_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::scripted(vec![
            Ok(grounded_response("Acme Corp")),
            Ok(grounded_response("Acme Corp")),
        ]));
        let pipeline = pipeline(generator, dir.path(), copying_compiler());

        let a = pipeline
            .run_batch(&acme_profile(), &[job("acme")], &AnonymousResolver, None)
            .await
            .unwrap();
        let b = pipeline
            .run_batch(&acme_profile(), &[job("acme")], &AnonymousResolver, None)
            .await
            .unwrap();

        assert_ne!(a.run, b.run);
        assert_eq!(zip_entries(dir.path(), &b.run).len(), 4, "bundle must exclude the other run");
    }
}
