use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Corrupt scoreboard: unknown state {character:?} at position {position}")]
    CorruptScoreboard { character: char, position: usize },

    #[error("Process execution failed: {0}")]
    Process(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery queue full, dropped {0}")]
    QueueFull(String),

    #[error("Delivery queue closed, dropped {0}")]
    QueueClosed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
