//! Per-file-type conversion strategies
//!
//! Every eligible non-PDF file becomes a PDF page set in the job's scratch
//! directory before the final merge: images are placed on a letter page,
//! Word documents go through a headless office suite, and emails are
//! rendered as a text printout.

pub mod docx;
pub mod eml;
pub mod image;

pub use docx::{converter_available, docx_to_pdf};
pub use eml::eml_to_pdf;
pub use image::image_to_pdf;
