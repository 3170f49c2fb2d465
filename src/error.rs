/// Custom error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error(transparent)]
    Config(#[from] confy::ConfyError),
    #[error("application '{0}' not found")]
    NotFound(String),
    #[error("malformed desktop entry at {0}")]
    BadEntry(std::path::PathBuf),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error("Could not split exec command '{0}' in desktop file '{1}' into shell words")]
    BadExec(String, String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
