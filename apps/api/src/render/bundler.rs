//! Artifact Bundler: packs one run's `.tex` and `.pdf` files into
//! `{run_id}_bundle.zip` next to them.
//!
//! Membership is decided by file name prefix only (`{run_id}_`), so other
//! runs sharing the directory never leak in. Archive writing is synchronous
//! and runs on the blocking pool.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::errors::TailorError;

const BUNDLED_EXTENSIONS: [&str; 2] = ["tex", "pdf"];

pub fn bundle_file_name(run_id: &str) -> String {
    format!("{run_id}_bundle.zip")
}

/// Writes the bundle for `run_id` and returns its path.
pub async fn bundle(out_dir: &Path, run_id: &str) -> Result<PathBuf, TailorError> {
    let out_dir = out_dir.to_path_buf();
    let run_id = run_id.to_string();

    let (path, count) = tokio::task::spawn_blocking(move || write_bundle(&out_dir, &run_id))
        .await
        .map_err(|e| TailorError::Archive(format!("spawn_blocking failed in bundler: {e}")))??;

    info!("Bundled {count} files into {}", path.display());
    Ok(path)
}

fn write_bundle(out_dir: &Path, run_id: &str) -> Result<(PathBuf, usize), TailorError> {
    let files = run_files(out_dir, run_id)?;
    let zip_path = out_dir.join(bundle_file_name(run_id));

    let file = File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, path) in &files {
        let content = fs::read(path)?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| TailorError::Archive(format!("failed to add {name}: {e}")))?;
        zip.write_all(&content)?;
    }

    zip.finish()
        .map_err(|e| TailorError::Archive(format!("failed to finalize {}: {e}", zip_path.display())))?;

    Ok((zip_path, files.len()))
}

/// `.tex`/`.pdf` files in `out_dir` belonging to `run_id`, sorted by name.
fn run_files(out_dir: &Path, run_id: &str) -> Result<Vec<(String, PathBuf)>, TailorError> {
    let prefix = format!("{run_id}_");
    let mut files = Vec::new();

    for entry in fs::read_dir(out_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let bundled = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| BUNDLED_EXTENSIONS.contains(&ext));
        let name = entry.file_name().to_string_lossy().into_owned();
        if bundled && name.starts_with(&prefix) {
            files.push((name, path));
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
