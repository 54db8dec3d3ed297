use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

pub type Error = ProbexError;
pub type Result<T> = std::result::Result<T, Error>;
