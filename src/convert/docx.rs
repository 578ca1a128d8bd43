//! Word document to PDF conversion via a headless office suite
//!
//! Runs `soffice --headless --convert-to pdf` (LibreOffice) on the input.
//! The same invocation handles `.docx`, `.doc`, `.odt`, and `.rtf`. The
//! pipeline treats a missing or failing converter as a per-file skip, not a
//! job failure, so callers get a `Result` here and downgrade it themselves.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Candidate binary names probed on PATH when no explicit path is given
const CONVERTER_NAMES: &[&str] = &["soffice", "libreoffice"];

/// Resolve the converter binary: the explicit configured path if given,
/// otherwise the first candidate that answers `--version`.
pub fn find_converter(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    CONVERTER_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| probe(candidate))
}

/// Whether a usable converter can be found
pub fn converter_available(explicit: Option<&Path>) -> bool {
    find_converter(explicit).is_some()
}

fn probe(binary: &Path) -> bool {
    Command::new(binary)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Convert a word-processor document to PDF.
///
/// The converter writes `<stem>.pdf` into a scratch out-dir; the result is
/// then moved to `out_pdf`.
pub fn docx_to_pdf(input: &Path, out_pdf: &Path, soffice: Option<&Path>) -> Result<()> {
    if !input.exists() {
        return Err(Error::FileNotFound(input.to_path_buf()));
    }

    let converter = find_converter(soffice).ok_or_else(|| {
        Error::DocxConversion("no office suite found (looked for soffice/libreoffice)".to_string())
    })?;

    let outdir = tempfile::tempdir()?;

    log::debug!(
        "Converting {} with {}",
        input.display(),
        converter.display()
    );

    let output = Command::new(&converter)
        .arg("--headless")
        .arg("--norestore")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(outdir.path())
        .arg(input)
        .output()
        .map_err(|e| Error::DocxConversion(format!("failed to run {}: {}", converter.display(), e)))?;

    if !output.status.success() {
        return Err(Error::DocxConversion(format!(
            "{} exited with {}: {}",
            converter.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    // soffice names the output after the input stem
    let stem = input
        .file_stem()
        .ok_or_else(|| Error::DocxConversion(format!("no file stem: {}", input.display())))?;
    let produced = outdir.path().join(stem).with_extension("pdf");

    if !produced.exists() {
        return Err(Error::DocxConversion(format!(
            "converter reported success but produced no PDF for {}",
            input.display()
        )));
    }

    if let Some(parent) = out_pdf.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Rename fails across filesystems; fall back to copy
    if std::fs::rename(&produced, out_pdf).is_err() {
        std::fs::copy(&produced, out_pdf)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_input_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = docx_to_pdf(
            Path::new("nonexistent.docx"),
            &tmp.path().join("out.pdf"),
            None,
        );
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_explicit_converter_path_must_exist() {
        assert!(find_converter(Some(Path::new("/no/such/soffice"))).is_none());
        assert!(!converter_available(Some(Path::new("/no/such/soffice"))));
    }

    #[test]
    fn test_unavailable_converter_is_a_conversion_error() {
        let tmp = TempDir::new().unwrap();
        let doc = tmp.path().join("letter.docx");
        std::fs::write(&doc, b"fake docx").unwrap();

        let result = docx_to_pdf(
            &doc,
            &tmp.path().join("out.pdf"),
            Some(Path::new("/no/such/soffice")),
        );
        assert!(matches!(result.unwrap_err(), Error::DocxConversion(_)));
    }
}
