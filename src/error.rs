//! Error types for the SnapMerge library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the SnapMerge library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input path is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No files found matching pattern: {0}")]
    NoFilesMatched(String),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Word-to-PDF conversion failed or the converter is unavailable
    #[error("Document conversion failed: {0}")]
    DocxConversion(String),

    /// Email could not be parsed
    #[error("Email parse error: {0}")]
    Email(String),

    /// Nothing in the folder (or file list) could be merged
    #[error("No eligible files found to merge")]
    NoEligibleFiles,

    /// The job was cancelled through the progress callback
    #[error("Merge cancelled")]
    Cancelled,

    /// General error
    #[error("{0}")]
    General(String),
}
