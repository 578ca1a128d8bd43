//! Display-name helpers

use once_cell::sync::Lazy;
use regex::Regex;

/// Staging prefix added when files are copied into an ordered staging
/// folder, e.g. `000123_invoice.pdf`.
static STAGING_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}_").unwrap());

/// Return the file name with any leading 6-digit staging prefix removed.
pub fn original_file_name(filename: &str) -> String {
    STAGING_PREFIX.replace(filename, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_staging_prefix() {
        assert_eq!(original_file_name("000123_report.pdf"), "report.pdf");
    }

    #[test]
    fn test_leaves_plain_names_alone() {
        assert_eq!(original_file_name("report.pdf"), "report.pdf");
        // Prefix must be exactly six digits followed by an underscore
        assert_eq!(original_file_name("12345_report.pdf"), "12345_report.pdf");
        assert_eq!(original_file_name("1234567report.pdf"), "1234567report.pdf");
    }
}
