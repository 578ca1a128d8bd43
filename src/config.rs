//! Application settings
//!
//! Settings are loaded from a `config.yaml` shipped next to the executable.
//! A missing file falls back to the built-in defaults; a malformed file is
//! an error so a broken deployment is noticed instead of silently ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sort key for file enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Case-insensitive file name (default)
    #[default]
    Name,
    /// Filesystem creation time
    Created,
    /// Filesystem modification time
    Modified,
}

/// What kind of source a file is, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Pass through as-is
    Pdf,
    /// Rendered onto a single letter page
    Image,
    /// Converted via a headless office suite
    Word,
    /// Rendered as an Outlook-style text printout
    Email,
}

/// Settings loaded from `config.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Recurse into subdirectories during discovery
    #[serde(default = "default_include_subfolders")]
    pub include_subfolders: bool,

    /// Margin around images on their generated page, in points
    #[serde(default = "default_image_margin_pts")]
    pub image_margin_pts: u32,

    /// Downscale images whose longest side exceeds this many pixels
    #[serde(default = "default_max_image_dim_px")]
    pub max_image_dim_px: u32,

    /// Sort key for enumeration order
    #[serde(default)]
    pub sort_by: SortBy,

    /// Sort descending instead of ascending
    #[serde(default)]
    pub sort_desc: bool,

    /// Extensions treated as PDFs (lowercase, with leading dot)
    #[serde(default = "default_allowed_pdfs")]
    pub allowed_pdfs: Vec<String>,

    /// Extensions treated as images
    #[serde(default = "default_allowed_images")]
    pub allowed_images: Vec<String>,

    /// Extensions treated as word-processor documents
    #[serde(default = "default_allowed_docs")]
    pub allowed_docs: Vec<String>,

    /// Extensions treated as emails
    #[serde(default = "default_allowed_emails")]
    pub allowed_emails: Vec<String>,

    /// Explicit path to the office-suite binary; searched on PATH when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soffice_path: Option<PathBuf>,
}

fn default_include_subfolders() -> bool {
    true
}

fn default_image_margin_pts() -> u32 {
    24
}

fn default_max_image_dim_px() -> u32 {
    4000
}

fn default_allowed_pdfs() -> Vec<String> {
    vec![".pdf".to_string()]
}

fn default_allowed_images() -> Vec<String> {
    [".png", ".jpg", ".jpeg", ".bmp", ".tiff", ".webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_allowed_docs() -> Vec<String> {
    [".docx", ".doc", ".odt", ".rtf"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_allowed_emails() -> Vec<String> {
    vec![".eml".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_subfolders: default_include_subfolders(),
            image_margin_pts: default_image_margin_pts(),
            max_image_dim_px: default_max_image_dim_px(),
            sort_by: SortBy::default(),
            sort_desc: false,
            allowed_pdfs: default_allowed_pdfs(),
            allowed_images: default_allowed_images(),
            allowed_docs: default_allowed_docs(),
            allowed_emails: default_allowed_emails(),
            soffice_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// A missing file yields the defaults. A present-but-invalid file is an
    /// error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let settings = serde_yaml::from_str(&text)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Every allowed extension, across all kinds
    pub fn allowed_exts(&self) -> Vec<String> {
        let mut all = Vec::new();
        all.extend(self.allowed_pdfs.iter().cloned());
        all.extend(self.allowed_images.iter().cloned());
        all.extend(self.allowed_docs.iter().cloned());
        all.extend(self.allowed_emails.iter().cloned());
        all
    }

    /// Classify a file by its extension, or None if it is not eligible
    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let ext = extension_of(path)?;
        let matches = |list: &[String]| list.iter().any(|e| e.eq_ignore_ascii_case(&ext));

        if matches(&self.allowed_pdfs) {
            Some(FileKind::Pdf)
        } else if matches(&self.allowed_images) {
            Some(FileKind::Image)
        } else if matches(&self.allowed_docs) {
            Some(FileKind::Word)
        } else if matches(&self.allowed_emails) {
            Some(FileKind::Email)
        } else {
            None
        }
    }
}

/// Lowercased extension with its leading dot (".pdf"), or None
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.include_subfolders);
        assert_eq!(s.image_margin_pts, 24);
        assert_eq!(s.max_image_dim_px, 4000);
        assert_eq!(s.sort_by, SortBy::Name);
        assert!(!s.sort_desc);
        assert!(s.allowed_exts().contains(&".pdf".to_string()));
        assert!(s.allowed_exts().contains(&".webp".to_string()));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
            include_subfolders: false
            sort_by: modified
        "#;
        let s: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(!s.include_subfolders);
        assert_eq!(s.sort_by, SortBy::Modified);
        // Untouched keys keep their defaults
        assert_eq!(s.image_margin_pts, 24);
        assert_eq!(s.allowed_docs, vec![".docx", ".doc", ".odt", ".rtf"]);
    }

    #[test]
    fn test_unknown_sort_key_rejected() {
        let yaml = "sort_by: size";
        let result: std::result::Result<Settings, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_by_extension() {
        let s = Settings::default();
        assert_eq!(s.classify(Path::new("a.pdf")), Some(FileKind::Pdf));
        assert_eq!(s.classify(Path::new("b.PNG")), Some(FileKind::Image));
        assert_eq!(s.classify(Path::new("c.docx")), Some(FileKind::Word));
        assert_eq!(s.classify(Path::new("d.eml")), Some(FileKind::Email));
        // Excel formats are not eligible
        assert_eq!(s.classify(Path::new("e.xlsx")), None);
        assert_eq!(s.classify(Path::new("noext")), None);
    }

    #[test]
    fn test_load_missing_file_is_defaults() {
        let s = Settings::load(Path::new("does-not-exist.yaml")).unwrap();
        assert!(s.include_subfolders);
    }
}
