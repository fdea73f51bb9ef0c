//! Accept rules for file selection
//!
//! Mirrors the accept-attribute grammar: a comma-separated list of
//! extension rules (`.pdf`), exact MIME types (`application/zip`), and
//! MIME wildcards (`image/*`). Matching is case-insensitive throughout.

use crate::file::FileMeta;

#[derive(Clone, Debug, PartialEq, Eq)]
enum AcceptRule {
    /// `.pdf`
    Extension(String),
    /// `application/zip`
    Mime(String),
    /// `image/*`, matches on the type class
    MimeClass(String),
}

impl AcceptRule {
    fn matches(&self, file: &FileMeta) -> bool {
        match self {
            AcceptRule::Extension(extension) => file
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(extension)),
            AcceptRule::Mime(mime) => file.mime.eq_ignore_ascii_case(mime),
            AcceptRule::MimeClass(class) => file
                .mime
                .split_once('/')
                .is_some_and(|(c, _)| c.eq_ignore_ascii_case(class)),
        }
    }
}

/// Which file types a controller accepts
///
/// An empty spec accepts everything.
///
/// ```
/// use opal_upload::{AcceptSpec, FileMeta};
///
/// let spec = AcceptSpec::parse("image/*, .pdf");
/// assert!(spec.accepts(&FileMeta::new("a.png", 10, "image/png")));
/// assert!(spec.accepts(&FileMeta::new("b.PDF", 10, "application/pdf")));
/// assert!(!spec.accepts(&FileMeta::new("c.exe", 10, "application/octet-stream")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcceptSpec {
    rules: Vec<AcceptRule>,
}

impl AcceptSpec {
    /// Spec that accepts every file
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse a comma-separated rule list
    ///
    /// Never fails: unparseable fragments are dropped with a warning.
    pub fn parse(spec: &str) -> Self {
        let mut rules = Vec::new();

        for fragment in spec.split(',') {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }

            if let Some(extension) = fragment.strip_prefix('.') {
                if extension.is_empty() || extension.contains('/') {
                    tracing::warn!(fragment, "unparseable accept rule, ignoring");
                    continue;
                }
                rules.push(AcceptRule::Extension(format!(
                    ".{}",
                    extension.to_ascii_lowercase()
                )));
            } else if let Some((class, subtype)) = fragment.split_once('/') {
                if class.is_empty() || subtype.is_empty() {
                    tracing::warn!(fragment, "unparseable accept rule, ignoring");
                } else if subtype == "*" {
                    rules.push(AcceptRule::MimeClass(class.to_ascii_lowercase()));
                } else {
                    rules.push(AcceptRule::Mime(fragment.to_ascii_lowercase()));
                }
            } else {
                tracing::warn!(fragment, "unparseable accept rule, ignoring");
            }
        }

        Self { rules }
    }

    /// Whether `file` satisfies any rule
    pub fn accepts(&self, file: &FileMeta) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        self.rules.iter().any(|rule| rule.matches(file))
    }

    /// Whether the spec places no restriction at all
    pub fn is_unrestricted(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kinds() {
        let spec = AcceptSpec::parse("image/*, .PDF, application/zip");

        assert!(spec.accepts(&FileMeta::new("a.png", 1, "image/png")));
        assert!(spec.accepts(&FileMeta::new("b.jpeg", 1, "image/jpeg")));
        assert!(spec.accepts(&FileMeta::new("report.pdf", 1, "application/pdf")));
        assert!(spec.accepts(&FileMeta::new("REPORT.PDF", 1, "application/pdf")));
        assert!(spec.accepts(&FileMeta::new("c.zip", 1, "application/zip")));

        assert!(!spec.accepts(&FileMeta::new("d.mp4", 1, "video/mp4")));
        assert!(!spec.accepts(&FileMeta::new("e.exe", 1, "application/octet-stream")));
    }

    #[test]
    fn test_empty_spec_accepts_everything() {
        let spec = AcceptSpec::parse("");
        assert!(spec.is_unrestricted());
        assert!(spec.accepts(&FileMeta::new("anything.bin", 1, "application/octet-stream")));

        assert_eq!(spec, AcceptSpec::any());
    }

    #[test]
    fn test_unparseable_fragments_ignored() {
        let spec = AcceptSpec::parse("image/*, garbage, ., /plain, text/");
        assert!(!spec.is_unrestricted());

        assert!(spec.accepts(&FileMeta::new("a.png", 1, "image/png")));
        assert!(!spec.accepts(&FileMeta::new("notes.txt", 1, "text/plain")));
    }

    #[test]
    fn test_extension_match_ignores_mime() {
        let spec = AcceptSpec::parse(".csv");
        assert!(spec.accepts(&FileMeta::new("data.csv", 1, "application/octet-stream")));
        assert!(!spec.accepts(&FileMeta::new("data", 1, "text/csv")));
    }
}
