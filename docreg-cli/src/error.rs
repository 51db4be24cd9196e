//! CLI error type

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] docreg_client::error::Error),
}
