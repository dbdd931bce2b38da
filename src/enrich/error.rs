use thiserror::*;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("the model returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("bad enricher configuration: {0}")]
    Config(String),
}
