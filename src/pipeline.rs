//! End-to-end merge pipeline
//!
//! One merge job: discover eligible files in a folder (or take an explicit
//! list), convert every non-PDF into a PDF page set inside a scratch
//! directory, then concatenate everything into the output document. A file
//! that fails to convert is skipped and reported, never fatal; the job
//! only fails outright when nothing at all is eligible.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{FileKind, Settings, SortBy};
use crate::convert::{docx_to_pdf, eml_to_pdf, image_to_pdf};
use crate::discovery::{discover_files, filter_and_sort};
use crate::error::{Error, Result};
use crate::names::original_file_name;
use crate::pdf::merge::{merge_pdfs_with_progress, MergeOptions};
use crate::progress::MergeProgress;

/// Everything one merge job needs, resolved from [`Settings`] plus the
/// caller's input and output paths
#[derive(Debug, Clone)]
pub struct JobOptions {
    pub input_dir: PathBuf,
    pub output_pdf: PathBuf,
    pub include_subfolders: bool,
    pub sort_by: SortBy,
    pub sort_desc: bool,
    pub image_margin_pts: u32,
    pub max_image_dim_px: u32,
    pub soffice_path: Option<PathBuf>,
}

impl JobOptions {
    /// Resolve a job from settings and the run's input/output paths
    pub fn new(settings: &Settings, input_dir: &Path, output_pdf: &Path) -> Self {
        Self {
            input_dir: input_dir.to_path_buf(),
            output_pdf: output_pdf.to_path_buf(),
            include_subfolders: settings.include_subfolders,
            sort_by: settings.sort_by,
            sort_desc: settings.sort_desc,
            image_margin_pts: settings.image_margin_pts,
            max_image_dim_px: settings.max_image_dim_px,
            soffice_path: settings.soffice_path.clone(),
        }
    }
}

/// What a merge job did, returned to the caller and logged
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// Folder the job ran over (informational for manual runs)
    pub input: PathBuf,
    /// The output PDF that was written
    pub output: PathBuf,
    /// Files considered after filtering
    pub total_found: usize,
    /// PDFs that went into the output
    pub merged_count: usize,
    /// Files that needed conversion first
    pub converted_count: usize,
    /// Files that could not be processed
    pub skipped_count: usize,
    /// The skipped files themselves
    pub skipped: Vec<PathBuf>,
}

/// Run the end-to-end job from a folder.
///
/// Files are discovered under `input_dir`, filtered by the allow-lists,
/// and sorted per the settings before processing.
pub fn run_merge(
    input_dir: &Path,
    output_pdf: &Path,
    settings: &Settings,
    progress: &dyn MergeProgress,
) -> Result<MergeReport> {
    let job = JobOptions::new(settings, input_dir, output_pdf);

    let files = discover_files(&job.input_dir, job.include_subfolders)?;
    let files = filter_and_sort(files, &settings.allowed_exts(), job.sort_by, job.sort_desc);

    run_core(files, &job, settings, progress)
}

/// Run the job over an explicit, pre-ordered file list.
///
/// No discovery or re-sorting happens; the caller owns the order. The
/// report's `input` field is the first file's parent, for information
/// only.
pub fn run_manual_merge(
    files: &[PathBuf],
    output_pdf: &Path,
    settings: &Settings,
    progress: &dyn MergeProgress,
) -> Result<MergeReport> {
    let base_dir = files
        .first()
        .and_then(|f| f.parent())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let job = JobOptions::new(settings, &base_dir, output_pdf);
    run_core(files.to_vec(), &job, settings, progress)
}

/// Process an already discovered and ordered file list: convert, merge,
/// report.
fn run_core(
    files: Vec<PathBuf>,
    job: &JobOptions,
    settings: &Settings,
    progress: &dyn MergeProgress,
) -> Result<MergeReport> {
    let total = files.len();
    progress.on_discovery_complete(total);
    log::info!("Discovered {} file(s) to process", total);

    let scratch = tempfile::Builder::new().prefix("snapmerge_").tempdir()?;

    let mut to_merge: Vec<PathBuf> = Vec::new();
    let mut converted: Vec<PathBuf> = Vec::new();
    let mut skipped: Vec<PathBuf> = Vec::new();

    for (idx, file) in files.iter().enumerate() {
        if progress.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let display = file
            .file_name()
            .map(|n| original_file_name(&n.to_string_lossy()))
            .unwrap_or_else(|| file.display().to_string());
        progress.on_file_start(idx + 1, total, &display);

        // Converted files get an index prefix so same-named files from
        // different subfolders cannot clobber each other
        let scratch_pdf = |stem: &str| scratch.path().join(format!("{:04}_{}.pdf", idx, stem));

        match settings.classify(file) {
            Some(FileKind::Pdf) => {
                to_merge.push(file.clone());
            }
            Some(FileKind::Image) => {
                let stem = file_stem(file);
                let outp = scratch_pdf(&stem);
                match image_to_pdf(file, &outp, job.image_margin_pts, job.max_image_dim_px) {
                    Ok(()) => {
                        progress.on_file_converted(&outp);
                        converted.push(outp.clone());
                        to_merge.push(outp);
                    }
                    Err(e) => {
                        log::error!("Image conversion failed for {}: {}", file.display(), e);
                        progress.on_file_skipped(file, &e.to_string());
                        skipped.push(file.clone());
                    }
                }
            }
            Some(FileKind::Word) => {
                let stem = file_stem(file);
                let outp = scratch_pdf(&stem);
                match docx_to_pdf(file, &outp, job.soffice_path.as_deref()) {
                    Ok(()) => {
                        progress.on_file_converted(&outp);
                        converted.push(outp.clone());
                        to_merge.push(outp);
                    }
                    Err(e) => {
                        log::warn!(
                            "Word converter unavailable or failed for {}: {}",
                            file.display(),
                            e
                        );
                        progress.on_file_skipped(file, &e.to_string());
                        skipped.push(file.clone());
                    }
                }
            }
            Some(FileKind::Email) => {
                let stem = file_stem(file);
                let outp = scratch_pdf(&stem);
                match eml_to_pdf(file, &outp) {
                    Ok(result) => {
                        log::debug!(
                            "Rendered {} as {} page(s)",
                            file.display(),
                            result.pages
                        );
                        progress.on_file_converted(&outp);
                        converted.push(outp.clone());
                        to_merge.push(outp);
                    }
                    Err(e) => {
                        log::error!("Email conversion failed for {}: {}", file.display(), e);
                        progress.on_file_skipped(file, &e.to_string());
                        skipped.push(file.clone());
                    }
                }
            }
            None => {
                progress.on_file_skipped(file, "unsupported file type");
                skipped.push(file.clone());
            }
        }
    }

    if to_merge.is_empty() {
        return Err(Error::NoEligibleFiles);
    }

    if progress.is_cancelled() {
        return Err(Error::Cancelled);
    }

    log::info!("Writing {} PDF(s) to {}", to_merge.len(), job.output_pdf.display());
    merge_pdfs_with_progress(
        &MergeOptions {
            input_paths: to_merge.clone(),
            output_path: job.output_pdf.clone(),
        },
        progress,
    )?;

    let report = MergeReport {
        input: job.input_dir.clone(),
        output: job.output_pdf.clone(),
        total_found: total,
        merged_count: to_merge.len(),
        converted_count: converted.len(),
        skipped_count: skipped.len(),
        skipped,
    };

    progress.on_complete(report.merged_count, report.skipped_count);
    if let Ok(json) = serde_json::to_string(&report) {
        log::info!("Merge complete: {}", json);
    }

    Ok(report)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}
