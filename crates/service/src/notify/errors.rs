use thiserror::Error;

/// Errors surfaced by the fan-out path.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("repository error: {0}")]
    Repository(String),
}
