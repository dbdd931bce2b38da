use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{Enricher, EnrichError};
use crate::config::GeminiConfig;

const MAX_OUTPUT_TOKENS: u32 = 100;
const TEMPERATURE: f32 = 0.7;

/// Client for the generative language `generateContent` endpoint. One
/// request per title, capped at a single short sentence by the prompt
/// and the output token limit.
pub struct GeminiEnricher {
    http: Client,
    endpoint: Url,
}

impl GeminiEnricher {
    pub fn new(config: &GeminiConfig) -> Result<Self, EnrichError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|err| EnrichError::Config(format!("invalid api key: {}", err)))?;
        headers.insert("x-goog-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let endpoint = config
            .url
            .join(&format!("v1beta/models/{}:generateContent", config.model))
            .map_err(|err| EnrichError::Config(format!("invalid model url: {}", err)))?;
        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl Enricher for GeminiEnricher {
    async fn refine_description(&self, title: &str) -> Result<String, EnrichError> {
        debug!(title = %title, "refining description");
        let request = GenerateRequest::for_title(title);
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let reply: GenerateResponse = check(response).await?.json().await?;
        Ok(reply.text().trim().to_string())
    }
}

async fn check(response: Response) -> Result<Response, EnrichError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(EnrichError::Status {
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn for_title(title: &str) -> Self {
        let prompt = format!(
            "Provide a short, 1-sentence helpful description or action step \
             for a task titled: \"{}\".",
            title
        );
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// The model's reply is the concatenated text of the first candidate.
    /// No candidate, or a candidate without text, reads as an empty reply.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    fn enricher_for(server: &MockServer) -> GeminiEnricher {
        let config = GeminiConfig {
            url: Url::parse(&server.base_url()).unwrap(),
            api_key: "test-key".to_string(),
            model: "gemini-3-flash-preview".to_string(),
        };
        GeminiEnricher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_refines_a_title_into_one_sentence() {
        // GIVEN a model that answers the documented prompt
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-3-flash-preview:generateContent")
                .header("x-goog-api-key", "test-key")
                .json_body(json!({
                    "contents": [{
                        "parts": [{
                            "text": "Provide a short, 1-sentence helpful description \
                                     or action step for a task titled: \"Buy milk\"."
                        }]
                    }],
                    "generationConfig": {
                        "maxOutputTokens": 100,
                        "temperature": 0.7
                    }
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!({
                        "candidates": [{
                            "content": {
                                "parts": [{ "text": "  Pick up 2% milk from the store.\n" }],
                                "role": "model"
                            }
                        }]
                    })
                    .to_string(),
                );
        });

        // WHEN
        let description = enricher_for(&server)
            .refine_description("Buy milk")
            .await
            .unwrap();

        // THEN the reply comes back trimmed
        assert_eq!(description, "Pick up 2% milk from the store.");
    }

    #[tokio::test]
    async fn test_joins_multiple_reply_parts() {
        // GIVEN a candidate split across parts
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-3-flash-preview:generateContent");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!({
                        "candidates": [{
                            "content": {
                                "parts": [
                                    { "text": "Water the ferns" },
                                    { "text": " before noon." }
                                ],
                                "role": "model"
                            }
                        }]
                    })
                    .to_string(),
                );
        });

        // WHEN
        let description = enricher_for(&server)
            .refine_description("Water plants")
            .await
            .unwrap();

        // THEN
        assert_eq!(description, "Water the ferns before noon.");
    }

    #[tokio::test]
    async fn test_missing_candidates_read_as_empty() {
        // GIVEN a model with nothing to say
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-3-flash-preview:generateContent");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({ "candidates": [] }).to_string());
        });

        // WHEN
        let description = enricher_for(&server)
            .refine_description("Buy milk")
            .await
            .unwrap();

        // THEN
        assert_eq!(description, "", "no candidate must read as empty");
    }

    #[tokio::test]
    async fn test_error_status_carries_the_body() {
        // GIVEN a model over quota
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-3-flash-preview:generateContent");
            then.status(429)
                .header("content-type", "application/json")
                .body(r#"{"error":{"message":"Resource has been exhausted"}}"#);
        });

        // WHEN
        let err = enricher_for(&server)
            .refine_description("Buy milk")
            .await
            .unwrap_err();

        // THEN
        match err {
            EnrichError::Status { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("exhausted"), "body was: {}", body);
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }
}
