pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("position {line}:{column} is outside the document")]
    OutOfRange { line: usize, column: usize },
    #[error("edits in one event must not overlap")]
    Overlapping,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("cannot save comparison: {0}")]
    Pack(#[from] editor_core::errors::PackError),
    #[error(transparent)]
    Analyzer(#[from] editor_core::errors::AnalyzerError),
    #[error("buffer {0:?} is not part of the current layout")]
    BufferNotLive(crate::session::BufferId),
    #[error("operation requires comparison mode")]
    NotInComparisonMode,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
