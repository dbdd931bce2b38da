use thiserror::*;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("the store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("the store returned no record")]
    MissingRecord,

    #[error("bad store configuration: {0}")]
    Config(String),
}
