use thiserror::Error;

#[derive(Debug, Error)]
pub enum StewardError {
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    #[error("failed to load labels: {0}")]
    ConfigLoad(String),

    #[error("invalid labels: {0}")]
    ConfigValidation(String),

    #[error("failed to load session: {0}")]
    SessionLoad(String),

    #[error("grant does not match request: {0}")]
    GrantMismatch(String),
}
