//! Extension ↔ language identifier tables.

/// Language identifier used when nothing more specific is known.
pub const PLAIN_TEXT: &str = "plaintext";

/// Extension (lowercase, without the dot) of the diff-package format.
pub const DIFF_EXTENSION: &str = "diff";

const EXTENSION_TO_LANGUAGE: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("html", "html"),
    ("svg", "html"),
    ("css", "css"),
    ("vb", "vb"),
    ("bas", "vb"),
    ("cls", "vb"),
    ("vbs", "vb"),
    ("csv", "csv"),
    ("txt", PLAIN_TEXT),
    ("sql", "sql"),
    ("md", "markdown"),
    ("ipo", "pli"),
    ("pas", "pascal"),
    ("dpr", "pascal"),
    ("cs", "csharp"),
    ("py", "python"),
    ("jl", "julia"),
    ("go", "go"),
];

const LANGUAGE_TO_EXTENSION: &[(&str, &str)] = &[
    ("javascript", "js"),
    ("typescript", "ts"),
    ("html", "html"),
    ("css", "css"),
    ("vb", "vb"),
    ("csv", "csv"),
    (PLAIN_TEXT, "txt"),
    ("sql", "sql"),
    ("markdown", "md"),
    ("pli", "ipo"),
];

/// The lowercase extension of `file_name`, if it has one.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Language identifier for a file name; unknown extensions map to
/// [`PLAIN_TEXT`].
#[must_use]
pub fn language_for_file(file_name: &str) -> &'static str {
    extension_of(file_name)
        .and_then(|ext| {
            EXTENSION_TO_LANGUAGE
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, language)| *language)
        })
        .unwrap_or(PLAIN_TEXT)
}

/// Preferred save extension for a language, without the dot.
#[must_use]
pub fn extension_for_language(language: &str) -> Option<&'static str> {
    LANGUAGE_TO_EXTENSION
        .iter()
        .find(|(known, _)| *known == language)
        .map(|(_, ext)| *ext)
}

#[must_use]
pub fn is_diff_file(file_name: &str) -> bool {
    extension_of(file_name).as_deref() == Some(DIFF_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_for_file() {
        assert_eq!(language_for_file("Module1.BAS"), "vb");
        assert_eq!(language_for_file("logo.svg"), "html");
        assert_eq!(language_for_file("batch.ipo"), "pli");
        assert_eq!(language_for_file("notes"), PLAIN_TEXT);
        assert_eq!(language_for_file("archive.tar.zip"), PLAIN_TEXT);
    }

    #[test]
    fn test_extension_for_language() {
        assert_eq!(extension_for_language("markdown"), Some("md"));
        assert_eq!(extension_for_language("pli"), Some("ipo"));
        assert_eq!(extension_for_language("python"), None);
    }

    #[test]
    fn test_is_diff_file() {
        assert!(is_diff_file("change.DIFF"));
        assert!(!is_diff_file("change.diff.txt"));
        assert!(!is_diff_file("diff"));
    }
}
