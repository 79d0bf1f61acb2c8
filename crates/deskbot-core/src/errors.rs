/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type so the core can
/// handle failures consistently (recoverable transport/effector failures vs
/// fatal configuration problems).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("effector error: {0}")]
    Effector(String),
}

pub type Result<T> = std::result::Result<T, Error>;
