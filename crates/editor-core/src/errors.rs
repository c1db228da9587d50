/// Failures while packing two buffers into a diff package.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// A content line would be read back as a fence and corrupt the package.
    #[error("{side} buffer line {line} starts with the fence marker and cannot be packed")]
    FenceInContent {
        side: crate::diff_package::Side,
        line: usize,
    },
    /// The language hint must fit on the fence line as a single word.
    #[error("language hint {0:?} contains whitespace")]
    InvalidLanguageHint(String),
}

/// Failures while building a source analyzer.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("invalid {role} pattern for language {language:?}: {source}")]
    Pattern {
        language: String,
        role: &'static str,
        #[source]
        source: regex::Error,
    },
}
