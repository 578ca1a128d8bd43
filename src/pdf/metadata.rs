//! PDF metadata extraction

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Metadata pulled from a PDF for reporting and diagnostics
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
    /// Whether the document carries an encryption dictionary
    pub encrypted: bool,
}

/// Follow a reference in `dict` to the dictionary it points at
fn deref_dict<'a>(doc: &'a Document, dict: &Dictionary, key: &[u8]) -> Result<&'a Dictionary> {
    let id: ObjectId = match dict.get(key) {
        Ok(Object::Reference(id)) => *id,
        _ => {
            return Err(Error::General(format!(
                "Missing or non-reference /{} entry",
                String::from_utf8_lossy(key)
            )))
        }
    };
    match doc.get_object(id)? {
        Object::Dictionary(d) => Ok(d),
        _ => Err(Error::General(format!(
            "/{} does not point at a dictionary",
            String::from_utf8_lossy(key)
        ))),
    }
}

/// Count pages by reading the Count field from the root Pages dictionary.
///
/// More reliable than walking `get_pages()` for documents with nested page
/// trees.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog = deref_dict(doc, &doc.trailer, b"Root")?;
    let pages = deref_dict(doc, catalog, b"Pages")?;

    match pages.get(b"Count") {
        Ok(Object::Integer(n)) if *n >= 0 => Ok(*n as usize),
        _ => Err(Error::General("Pages /Count missing or invalid".to_string())),
    }
}

/// Read a text entry out of the trailer's Info dictionary
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = deref_dict(doc, &doc.trailer, b"Info").ok()?;
    let bytes = info.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(PdfMetadata {
        page_count,
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
        encrypted: doc.trailer.get(b"Encrypt").is_ok(),
    })
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages
/// dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pages_nonexistent_file() {
        let result = count_pages(Path::new("nonexistent.pdf"));
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_extract_metadata_nonexistent_file() {
        let result = extract_metadata(Path::new("nonexistent.pdf"));
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_metadata_of_generated_pdf() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("gen.pdf");
        crate::pdf::create::write_text_pdf(&out, "hello").unwrap();

        let meta = extract_metadata(&out).unwrap();
        assert_eq!(meta.page_count, 1);
        assert!(meta.title.is_none());
        assert!(!meta.encrypted);
    }
}
