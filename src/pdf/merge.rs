//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use std::path::PathBuf;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::progress::{MergeProgress, NoopProgress};

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// Merge multiple PDF files into a single PDF.
///
/// Pages appear in input order. Inputs that cannot be loaded (corrupt or
/// encrypted) are skipped with a warning and the merge continues; the call
/// fails only when nothing at all could be merged. Parent directories of
/// the output path are created as needed.
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
pub fn merge_pdfs(options: &MergeOptions) -> Result<()> {
    merge_pdfs_with_progress(options, &NoopProgress)
}

/// [`merge_pdfs`] with per-file progress reporting
pub fn merge_pdfs_with_progress(
    options: &MergeOptions,
    progress: &dyn MergeProgress,
) -> Result<()> {
    if options.input_paths.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    let total = options.input_paths.len();
    progress.on_merge_start(total);

    // Load what we can; an unreadable input is skipped, not fatal
    let mut documents: Vec<Document> = Vec::new();
    for (done, path) in options.input_paths.iter().enumerate() {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }

        match Document::load(path) {
            Ok(doc) if doc.get_pages().is_empty() => {
                log::warn!("Skipping PDF with no pages: {}", path.display());
            }
            Ok(doc) => documents.push(doc),
            Err(e) => {
                log::warn!(
                    "Skipping unreadable or encrypted PDF {}: {}",
                    path.display(),
                    e
                );
            }
        }
        progress.on_merge_progress(done + 1, total);
    }

    if documents.is_empty() {
        return Err(Error::General(
            "None of the input PDFs could be read".to_string(),
        ));
    }

    // Renumber every document into one shared ID space and pool the objects
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages = doc.get_pages();
        page_ids.extend(pages.into_values());

        objects.extend(doc.objects);
    }

    let mut merged_doc = Document::with_version("1.5");
    merged_doc.objects.extend(objects);

    // max_id must cover the pooled objects, or new_object_id() would hand
    // out colliding IDs
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = merged_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged_doc
        .objects
        .insert(catalog_id, Object::Dictionary(catalog));
    merged_doc
        .objects
        .insert(pages_id, Object::Dictionary(pages_object));
    merged_doc.trailer.set("Root", Object::Reference(catalog_id));

    // Every page must point at the new page tree
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(ref mut dict)) = merged_doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    if let Some(parent) = options.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    merged_doc.compress();
    merged_doc.save(&options.output_path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::create::write_text_pdf;
    use crate::pdf::metadata::count_pages;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_merge_options_creation() {
        let options = MergeOptions {
            input_paths: vec![PathBuf::from("test1.pdf"), PathBuf::from("test2.pdf")],
            output_path: PathBuf::from("merged.pdf"),
        };

        assert_eq!(options.input_paths.len(), 2);
        assert_eq!(options.output_path, Path::new("merged.pdf"));
    }

    #[test]
    fn test_merge_empty_input_list() {
        let result = merge_pdfs(&MergeOptions {
            input_paths: vec![],
            output_path: PathBuf::from("out.pdf"),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_nonexistent_file() {
        let tmp = TempDir::new().unwrap();
        let result = merge_pdfs(&MergeOptions {
            input_paths: vec![PathBuf::from("nonexistent.pdf")],
            output_path: tmp.path().join("out.pdf"),
        });
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_merge_adds_page_counts() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.pdf");
        let b = tmp.path().join("b.pdf");
        write_text_pdf(&a, "first document").unwrap();
        write_text_pdf(&b, "second document").unwrap();

        let out = tmp.path().join("merged.pdf");
        merge_pdfs(&MergeOptions {
            input_paths: vec![a, b],
            output_path: out.clone(),
        })
        .unwrap();

        assert_eq!(count_pages(&out).unwrap(), 2);
    }

    #[test]
    fn test_merge_skips_unreadable_input() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.pdf");
        write_text_pdf(&good, "fine").unwrap();
        let bad = tmp.path().join("bad.pdf");
        std::fs::write(&bad, b"this is not a pdf").unwrap();

        let out = tmp.path().join("merged.pdf");
        merge_pdfs(&MergeOptions {
            input_paths: vec![bad, good],
            output_path: out.clone(),
        })
        .unwrap();

        assert_eq!(count_pages(&out).unwrap(), 1);
    }

    #[test]
    fn test_merge_fails_when_nothing_readable() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("bad.pdf");
        std::fs::write(&bad, b"garbage").unwrap();

        let result = merge_pdfs(&MergeOptions {
            input_paths: vec![bad],
            output_path: tmp.path().join("out.pdf"),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_creates_output_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.pdf");
        write_text_pdf(&a, "content").unwrap();

        let out = tmp.path().join("deep/nested/out.pdf");
        merge_pdfs(&MergeOptions {
            input_paths: vec![a],
            output_path: out.clone(),
        })
        .unwrap();

        assert!(out.exists());
    }
}
