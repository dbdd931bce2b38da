mod enrich;
mod error;
mod gemini;

pub use enrich::Enricher;
pub use error::EnrichError;
pub use gemini::GeminiEnricher;
