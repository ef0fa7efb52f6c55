//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends one `generateContent` request per call with the system instruction
//! in `systemInstruction` and the question as a single user turn.
//!
//! The API key is wrapped in [`secrecy::SecretString`], sent only in the
//! `x-goog-api-key` header, and never logged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use dsaguru_core::llm::provider::LlmProvider;
use dsaguru_types::llm::{CompletionRequest, CompletionResponse, UpstreamError, Usage};

use super::types::{
    GeminiContent, GeminiErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig,
};

/// Public Gemini REST endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini LLM provider.
///
/// Does not derive Debug so the key can never end up in logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a provider with a per-request timeout.
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the HTTP client (custom proxy or TLS settings).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn to_gemini_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    dsaguru_types::llm::MessageRole::User => "user",
                    dsaguru_types::llm::MessageRole::Assistant => "model",
                };
                GeminiContent::text(Some(role), m.content.clone())
            })
            .collect();

        GenerateContentRequest {
            system_instruction: request
                .system
                .as_ref()
                .map(|s| GeminiContent::text(None, s.clone())),
            contents,
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let body = self.to_gemini_request(request);

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), error_body));
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Deserialization(format!("failed to parse response: {e}"))
            }
        })?;

        let content = gemini_resp.first_candidate_text();
        let usage = gemini_resp
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: gemini_resp.response_id.unwrap_or_default(),
            content,
            model: gemini_resp.model_version.unwrap_or_else(|| model.to_string()),
            usage,
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Transport(format!("HTTP request failed: {err}"))
    }
}

/// Map a non-2xx response to an [`UpstreamError`].
///
/// Gemini answers an invalid key with 400 `INVALID_ARGUMENT`, so the message
/// is checked as well as the status.
fn map_status_error(status: u16, body: String) -> UpstreamError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    match status {
        401 | 403 => UpstreamError::Authentication,
        400 if message.contains("API key not valid") => UpstreamError::Authentication,
        429 => UpstreamError::RateLimited,
        _ => UpstreamError::Status {
            status,
            body: message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsaguru_types::llm::Message;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one HTTP connection, answer with `status_line` and `body`, and
    /// return the raw request text.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn provider(base_url: &str) -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key-not-real".to_string()),
            "gemini-1.5-flash",
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base_url)
        .with_http_client(
            reqwest::Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
        )
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("Explain binary search")],
            system: Some("You are a DSA tutor".to_string()),
            max_tokens: 1024,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_complete_success() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Halve the range."}]}}],"usageMetadata":{"promptTokenCount":7,"candidatesTokenCount":3},"responseId":"r-9"}"#,
        )
        .await;

        let response = provider(&url).complete(&request()).await.unwrap();
        assert_eq!(response.content, "Halve the range.");
        assert_eq!(response.id, "r-9");
        assert_eq!(response.model, "gemini-1.5-flash");
        assert_eq!(response.usage.input_tokens, 7);
        assert_eq!(response.usage.output_tokens, 3);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /models/gemini-1.5-flash:generateContent"));
        assert!(raw.to_ascii_lowercase().contains("x-goog-api-key: test-key-not-real"));
        assert!(raw.contains(r#""systemInstruction""#));
        assert!(raw.contains("Explain binary search"));
    }

    #[tokio::test]
    async fn test_complete_empty_candidates_returns_empty_content() {
        let (url, _server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;
        let response = provider(&url).complete(&request()).await.unwrap();
        assert_eq!(response.content, "");
    }

    #[tokio::test]
    async fn test_complete_server_error_maps_to_status() {
        let (url, _server) = serve_once(
            "503 Service Unavailable",
            r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#,
        )
        .await;

        let err = provider(&url).complete(&request()).await.unwrap_err();
        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "The model is overloaded.");
            }
            other => panic!("expected Status, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_complete_malformed_body_is_deserialization_error() {
        let (url, _server) = serve_once("200 OK", "not json at all").await;
        let err = provider(&url).complete(&request()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{addr}"))
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
    }

    #[test]
    fn test_map_status_error_variants() {
        assert!(matches!(map_status_error(401, String::new()), UpstreamError::Authentication));
        assert!(matches!(map_status_error(429, String::new()), UpstreamError::RateLimited));
        assert!(matches!(
            map_status_error(
                400,
                r#"{"error":{"message":"API key not valid. Please pass a valid API key."}}"#.to_string()
            ),
            UpstreamError::Authentication
        ));
        assert!(matches!(
            map_status_error(400, "bad request".to_string()),
            UpstreamError::Status { status: 400, .. }
        ));
    }

    #[test]
    fn test_request_uses_model_role_for_assistant_turns() {
        let provider = provider("http://localhost");
        let mut req = request();
        req.messages.push(Message {
            role: dsaguru_types::llm::MessageRole::Assistant,
            content: "earlier answer".to_string(),
        });

        let body = provider.to_gemini_request(&req);
        assert_eq!(body.contents.len(), 2);
        assert_eq!(body.contents[1].role.as_deref(), Some("model"));
        assert_eq!(body.generation_config.max_output_tokens, 1024);
    }
}
