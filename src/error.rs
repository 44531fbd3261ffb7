use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Logger setup failed: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
