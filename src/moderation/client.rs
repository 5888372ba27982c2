// CleanMod API client — a thin reqwest wrapper.
//
// One POST per moderate() call, bearer-token auth, fixed 5-second timeout,
// no retries. Anything transient is reported as an error and the caller
// decides what fail-open means for it.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{Decision, ModerationError, ModerationResult, Moderator};

/// Default base URL for the hosted CleanMod API.
pub const DEFAULT_BASE_URL: &str = "https://cleanmod.dev";

/// Default moderation model identifier.
pub const DEFAULT_MODEL: &str = "english-basic";

/// Total time budget for one moderation round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the CleanMod moderation API.
pub struct CleanModClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl CleanModClient {
    /// Create a client for the given API key, pointing at the default
    /// hosted endpoint with the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ModerationError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client pointing at an alternate endpoint — for self-hosted
    /// deployments or tests.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, ModerationError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ModerationError::Transport)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the moderation model (default: "english-basic").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl Moderator for CleanModClient {
    async fn moderate(&self, text: &str) -> Result<ModerationResult, ModerationError> {
        if self.api_key.is_empty() || text.is_empty() {
            return Err(ModerationError::InvalidInput);
        }

        let url = format!("{}/api/v1/moderate", self.base_url);

        let request = ModerateRequest {
            text,
            model: &self.model,
        };

        debug!(url = %url, model = %self.model, "moderation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ModerationError::Transport)?;

        let status = response.status().as_u16();
        // Read the body before branching on status — error details live in it.
        let body = response.text().await.map_err(ModerationError::Transport)?;

        parse_moderate_response(status, &body)
    }
}

/// Interpret a moderation API response. Pure so it can be tested without
/// a network.
///
/// Non-2xx: the error message comes from an `error` field in the JSON body
/// when one is present, else a generic "API error: {status}". 2xx: the body
/// must be JSON with a `decision` field; the decision string is carried
/// through verbatim.
pub fn parse_moderate_response(
    status: u16,
    body: &str,
) -> Result<ModerationResult, ModerationError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("API error: {status}"));
        return Err(ModerationError::Http { status, message });
    }

    let parsed: ModerateResponse = serde_json::from_str(body)
        .map_err(|e| ModerationError::Protocol(e.to_string()))?;

    let decision = parsed
        .decision
        .ok_or_else(|| ModerationError::Protocol("missing `decision` field".to_string()))?;

    Ok(ModerationResult {
        decision: Decision::parse(&decision),
    })
}

// --- CleanMod API request/response types ---

#[derive(Serialize)]
struct ModerateRequest<'a> {
    text: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct ModerateResponse {
    decision: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_yields_decision() {
        let result = parse_moderate_response(200, r#"{"decision":"block"}"#).unwrap();
        assert_eq!(result.decision, Decision::Block);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let result =
            parse_moderate_response(200, r#"{"decision":"flag","model":"english-basic"}"#)
                .unwrap();
        assert_eq!(result.decision, Decision::Flag);
    }

    #[test]
    fn unknown_decision_carried_verbatim() {
        let result = parse_moderate_response(200, r#"{"decision":"review"}"#).unwrap();
        assert_eq!(result.decision, Decision::Unknown("review".to_string()));
    }

    #[test]
    fn missing_decision_is_protocol_error() {
        let err = parse_moderate_response(200, r#"{"score":0.93}"#).unwrap_err();
        assert!(matches!(err, ModerationError::Protocol(_)));
    }

    #[test]
    fn non_json_body_is_protocol_error() {
        let err = parse_moderate_response(200, "<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, ModerationError::Protocol(_)));
    }

    #[test]
    fn error_field_becomes_http_message() {
        let err = parse_moderate_response(401, r#"{"error":"invalid API key"}"#).unwrap_err();
        match err {
            ModerationError::Http { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid API key");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn non_2xx_without_error_field_gets_generic_message() {
        let err = parse_moderate_response(500, "oops").unwrap_err();
        match err {
            ModerationError::Http { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "API error: 500");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn status_299_still_counts_as_success() {
        let result = parse_moderate_response(299, r#"{"decision":"allow"}"#).unwrap();
        assert_eq!(result.decision, Decision::Allow);
    }

    #[tokio::test]
    async fn empty_text_never_dispatches() {
        // No server is listening on this address — an InvalidInput result
        // proves the request was rejected before touching the network.
        let client = CleanModClient::with_base_url("key", "http://127.0.0.1:1").unwrap();
        let err = client.moderate("").await.unwrap_err();
        assert!(matches!(err, ModerationError::InvalidInput));
    }

    #[tokio::test]
    async fn empty_api_key_never_dispatches() {
        let client = CleanModClient::with_base_url("", "http://127.0.0.1:1").unwrap();
        let err = client.moderate("some text").await.unwrap_err();
        assert!(matches!(err, ModerationError::InvalidInput));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = CleanModClient::with_base_url("key", "http://127.0.0.1:1").unwrap();
        let err = client.moderate("some text").await.unwrap_err();
        assert!(matches!(err, ModerationError::Transport(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CleanModClient::with_base_url("key", "https://cleanmod.dev/").unwrap();
        assert_eq!(client.base_url, "https://cleanmod.dev");
    }
}
