pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] editor_state::SessionError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} was not opened as a diff package")]
    NotAPackage(String),
    #[error("line {0} is outside the document")]
    LineOutOfRange(usize),
}
