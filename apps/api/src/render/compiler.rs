//! Document Compiler: turns a `.tex` file into a sibling `.pdf` by trying an
//! ordered chain of backends.
//!
//! Each attempt yields an `AttemptOutcome` value. A failed attempt moves on to
//! the next backend; when every backend fails the report is degraded and the
//! `.tex` source is left untouched as the deliverable. Nothing here returns an
//! error to the caller.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::artifact::CompileStatus;

const LATEXMK_ARGS: [&str; 3] = ["-pdf", "-interaction=nonstopmode", "-halt-on-error"];
const CLEANUP_TIMEOUT: Duration = Duration::from_secs(30);

/// One way of running the compiler. `{file}`, `{dir}` and `{name}` in `args`
/// are replaced with the `.tex` file name, its absolute directory and a name
/// unique to the attempt. The process always runs with the file's directory
/// as working directory.
///
/// `cleanup` holds arguments for a second run of `program` after a timeout,
/// for work that outlives the killed process (a detached container).
#[derive(Debug, Clone)]
pub struct CompileBackend {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    pub cleanup: Option<Vec<String>>,
    pub timeout: Duration,
}

impl CompileBackend {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: &[&str],
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cleanup: None,
            timeout,
        }
    }

    pub fn with_cleanup(mut self, args: &[&str]) -> Self {
        self.cleanup = Some(args.iter().map(|a| a.to_string()).collect());
        self
    }

    /// `latexmk` from the host's PATH.
    pub fn local_latexmk(timeout: Duration) -> Self {
        let mut args = LATEXMK_ARGS.to_vec();
        args.push("{file}");
        Self::new("local", "latexmk", &args, timeout)
    }

    /// `latexmk` inside a throwaway container with the directory mounted at
    /// `/data`. A timed out container is removed by name.
    pub fn docker_latexmk(image: &str, timeout: Duration) -> Self {
        let mut args = vec![
            "run", "--rm", "--name", "{name}", "-v", "{dir}:/data", "-w", "/data", image, "latexmk",
        ];
        args.extend(LATEXMK_ARGS);
        args.push("{file}");
        Self::new("docker", "docker", &args, timeout).with_cleanup(&["rm", "-f", "{name}"])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Succeeded { backend: String, pdf: PathBuf },
    Failed { backend: String, reason: String },
}

/// Every attempt made for one file, in order, plus the PDF if one was produced.
#[derive(Debug, Clone)]
pub struct CompileReport {
    pub tex: PathBuf,
    pub pdf: Option<PathBuf>,
    pub attempts: Vec<AttemptOutcome>,
}

impl CompileReport {
    pub fn status(&self) -> CompileStatus {
        if self.pdf.is_some() {
            return CompileStatus::Compiled;
        }
        let reasons = self
            .attempts
            .iter()
            .filter_map(|a| match a {
                AttemptOutcome::Failed { backend, reason } => Some(format!("{backend}: {reason}")),
                AttemptOutcome::Succeeded { .. } => None,
            })
            .collect();
        CompileStatus::Degraded { reasons }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentCompiler {
    backends: Vec<CompileBackend>,
}

impl DocumentCompiler {
    pub fn new(backends: Vec<CompileBackend>) -> Self {
        Self { backends }
    }

    /// Local latexmk first, then the container.
    pub fn latexmk_chain(local: Duration, image: &str, container: Duration) -> Self {
        Self::new(vec![
            CompileBackend::local_latexmk(local),
            CompileBackend::docker_latexmk(image, container),
        ])
    }

    pub async fn compile(&self, tex: &Path) -> CompileReport {
        let pdf = tex.with_extension("pdf");
        let mut report = CompileReport {
            tex: tex.to_path_buf(),
            pdf: None,
            attempts: Vec::with_capacity(self.backends.len()),
        };

        let target = match resolve_target(tex).await {
            Ok(target) => target,
            Err(reason) => return self.degraded(report, reason),
        };

        // a PDF left over from an earlier run must not count as success
        if let Err(e) = remove_stale(&pdf).await {
            let reason = format!("cannot remove stale {}: {e}", pdf.display());
            return self.degraded(report, reason);
        }

        for backend in &self.backends {
            let outcome = attempt(backend, &target, &pdf).await;
            let succeeded = matches!(outcome, AttemptOutcome::Succeeded { .. });
            match &outcome {
                AttemptOutcome::Succeeded { backend, .. } => {
                    debug!("Compiled {} with {backend}", tex.display())
                }
                AttemptOutcome::Failed { backend, reason } => {
                    debug!("Backend {backend} failed for {}: {reason}", tex.display())
                }
            }
            report.attempts.push(outcome);
            if succeeded {
                report.pdf = Some(pdf);
                return report;
            }
        }

        warn!(
            "Compile degraded for {}; LaTeX source kept as the only artifact ({} attempts failed)",
            tex.display(),
            report.attempts.len()
        );
        report
    }

    /// Records `reason` against every backend without running any of them.
    fn degraded(&self, mut report: CompileReport, reason: String) -> CompileReport {
        for backend in &self.backends {
            report.attempts.push(AttemptOutcome::Failed {
                backend: backend.name.clone(),
                reason: reason.clone(),
            });
        }
        warn!("Compile degraded for {}: {reason}", report.tex.display());
        report
    }
}

async fn remove_stale(pdf: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(pdf).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

struct Target {
    dir: PathBuf,
    file_name: String,
}

async fn resolve_target(tex: &Path) -> Result<Target, String> {
    let file_name = tex
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("{} has no file name", tex.display()))?;
    let parent = match tex.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dir = tokio::fs::canonicalize(&parent)
        .await
        .map_err(|e| format!("cannot resolve {}: {e}", parent.display()))?;
    Ok(Target { dir, file_name })
}

async fn attempt(backend: &CompileBackend, target: &Target, pdf: &Path) -> AttemptOutcome {
    let failed = |reason: String| AttemptOutcome::Failed {
        backend: backend.name.clone(),
        reason,
    };

    let run_name = format!("tailor-latex-{}", Uuid::new_v4().simple());

    let child = Command::new(&backend.program)
        .args(expand(&backend.args, target, &run_name))
        .current_dir(&target.dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match child {
        Ok(child) => child,
        Err(e) => return failed(format!("failed to start `{}`: {e}", backend.program)),
    };

    // on timeout the child is dropped, which kills it
    let output = match timeout(backend.timeout, child.wait_with_output()).await {
        Err(_) => {
            clean_up_after_timeout(backend, target, &run_name, pdf).await;
            return failed(format!(
                "timed out after {:.1}s",
                backend.timeout.as_secs_f64()
            ));
        }
        Ok(Err(e)) => return failed(format!("failed to wait for `{}`: {e}", backend.program)),
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        let detail = last_line(&output.stderr).or_else(|| last_line(&output.stdout));
        return failed(match detail {
            Some(line) => format!("exited with {}: {line}", output.status),
            None => format!("exited with {}", output.status),
        });
    }

    match tokio::fs::try_exists(pdf).await {
        Ok(true) => AttemptOutcome::Succeeded {
            backend: backend.name.clone(),
            pdf: pdf.to_path_buf(),
        },
        _ => failed(format!("exited successfully but {} was not produced", pdf.display())),
    }
}

fn expand(args: &[String], target: &Target, run_name: &str) -> Vec<String> {
    let dir = target.dir.to_string_lossy();
    args.iter()
        .map(|a| {
            a.replace("{file}", &target.file_name)
                .replace("{dir}", &dir)
                .replace("{name}", run_name)
        })
        .collect()
}

/// Runs the backend's cleanup command, then drops any PDF the abandoned
/// attempt managed to write so the report and the directory agree.
async fn clean_up_after_timeout(
    backend: &CompileBackend,
    target: &Target,
    run_name: &str,
    pdf: &Path,
) {
    if let Some(cleanup) = &backend.cleanup {
        let status = Command::new(&backend.program)
            .args(expand(cleanup, target, run_name))
            .current_dir(&target.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();
        match timeout(CLEANUP_TIMEOUT, status).await {
            Ok(Ok(status)) if status.success() => {
                debug!("Cleaned up {run_name} after {} timed out", backend.name)
            }
            Ok(Ok(status)) => warn!("Cleanup of {run_name} exited with {status}"),
            Ok(Err(e)) => warn!("Cleanup of {run_name} could not start: {e}"),
            Err(_) => warn!("Cleanup of {run_name} timed out"),
        }
    }

    if let Err(e) = remove_stale(pdf).await {
        warn!("Cannot remove {} left by a timed out attempt: {e}", pdf.display());
    }
}

fn last_line(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let line = text.lines().rev().find(|l| !l.trim().is_empty())?.trim();
    Some(line.chars().take(200).collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
