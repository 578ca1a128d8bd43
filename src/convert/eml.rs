//! Email (.eml) to PDF conversion
//!
//! Renders a message the way an email client prints it: a header block
//! (From / Sent / To / Cc / Subject) above a rule, then the body. The body
//! prefers `text/plain`; an HTML-only message is reduced to plain text
//! first. The rendered text goes through [`crate::pdf::create`].

use std::path::{Path, PathBuf};

use mailparse::{parse_mail, MailHeaderMap, ParsedMail};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::pdf::create::write_text_pdf;

/// Result of converting a .eml file into a PDF
#[derive(Debug, Clone)]
pub struct EmlToPdfResult {
    pub input_eml: PathBuf,
    pub output_pdf: PathBuf,
    pub pages: usize,
}

/// Convert an email file to a multi-page PDF printout
pub fn eml_to_pdf(input_eml: &Path, output_pdf: &Path) -> Result<EmlToPdfResult> {
    if !input_eml.exists() {
        return Err(Error::FileNotFound(input_eml.to_path_buf()));
    }

    let raw = std::fs::read(input_eml)?;
    let text = build_printout_text(&raw)?;
    let pages = write_text_pdf(output_pdf, &text)?;

    Ok(EmlToPdfResult {
        input_eml: input_eml.to_path_buf(),
        output_pdf: output_pdf.to_path_buf(),
        pages,
    })
}

/// Header block + body, or `(empty email)` when there is nothing to show
fn build_printout_text(raw: &[u8]) -> Result<String> {
    let mail = parse_mail(raw).map_err(|e| Error::Email(e.to_string()))?;

    let header_block = build_header_block(&mail);
    let body = extract_best_body(&mail)
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let combined = match (header_block.is_empty(), body.is_empty()) {
        (false, false) => format!("{}\n{}", header_block, body),
        (false, true) => header_block,
        (true, _) => body,
    };

    let trimmed = combined.trim().to_string();
    if trimmed.is_empty() {
        Ok("(empty email)".to_string())
    } else {
        Ok(trimmed)
    }
}

/// Build an Outlook-print-style header section
fn build_header_block(mail: &ParsedMail) -> String {
    let mut lines = Vec::new();

    let mut push = |label: &str, header: &str| {
        if let Some(value) = mail.headers.get_first_value(header) {
            let value = value.trim().to_string();
            if !value.is_empty() {
                lines.push(format!("{}: {}", label, value));
            }
        }
    };

    push("From", "From");
    push("Sent", "Date");
    push("To", "To");
    push("Cc", "Cc");
    push("Subject", "Subject");

    if lines.is_empty() {
        return String::new();
    }

    let mut block = lines.join("\n");
    block.push('\n');
    block.push_str(&"-".repeat(72));
    block.push('\n');
    block
}

/// Pick the best body: first text/plain part, else text/html reduced to text
fn extract_best_body(mail: &ParsedMail) -> String {
    if let Some(part) = find_part(mail, "text/plain") {
        return part.get_body().unwrap_or_default();
    }

    if let Some(part) = find_part(mail, "text/html") {
        let html = part.get_body().unwrap_or_default();
        return html_to_text(&html);
    }

    String::new()
}

/// Depth-first search for the first part with the given MIME type
fn find_part<'a>(part: &'a ParsedMail<'a>, mimetype: &str) -> Option<&'a ParsedMail<'a>> {
    if part.ctype.mimetype.eq_ignore_ascii_case(mimetype) {
        return Some(part);
    }
    part.subparts
        .iter()
        .find_map(|sub| find_part(sub, mimetype))
}

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*br\s*/?>").unwrap());
static PARA_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Small HTML-to-text reduction, enough for email bodies
fn html_to_text(html: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(html, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = PARA_END.replace_all(&text, "\n\n");
    let text = ANY_TAG.replace_all(&text, "");

    let text = unescape_entities(&text);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    EXTRA_NEWLINES.replace_all(&text, "\n\n").trim().to_string()
}

/// The handful of entities that actually show up in email HTML
fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
