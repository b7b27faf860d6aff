use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("card {index} is not part of the deck ({len} cards)")]
    UnknownCard { index: usize, len: usize },
    #[error("no session is active")]
    NoActiveSession,
    #[error("need {required} distinct identities but the pool only has {available}")]
    InsufficientAssets { required: usize, available: usize },
    #[error("timer tick must be finite and non-negative, got {0}")]
    InvalidTick(f64),
    #[error("unknown difficulty tier `{0}`")]
    UnknownTier(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
