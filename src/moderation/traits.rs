// Moderator trait — the swap-ready abstraction.
//
// One async call per piece of text, one decision back. The production
// implementation (CleanModClient) does an HTTP round trip; test doubles
// return canned results.

use async_trait::async_trait;
use thiserror::Error;

/// The verdict the moderation API hands back for a piece of text.
///
/// The API contract only names three decisions, but the wire value is
/// carried through verbatim — a decision string this version doesn't know
/// becomes `Unknown` and is treated like `Allow` downstream rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Flag,
    Block,
    Unknown(String),
}

impl Decision {
    /// Parse a wire decision string, preserving unrecognized values.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "allow" => Decision::Allow,
            "flag" => Decision::Flag,
            "block" => Decision::Block,
            other => Decision::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Decision::Allow => "allow",
            Decision::Flag => "flag",
            Decision::Block => "block",
            Decision::Unknown(raw) => raw,
        }
    }
}

/// The result of moderating a single piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationResult {
    pub decision: Decision,
}

/// Everything that can go wrong between "call the API" and "have a decision".
///
/// The filter treats all of these identically (fail-open), but they stay
/// distinct so the diagnostic sink and any host-side alerting can tell a
/// bad API key (Http 401) from an outage (Transport).
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Missing API key or empty text — the request is never dispatched.
    #[error("missing API key or text")]
    InvalidInput,

    /// Network-level failure: DNS, connection refused, timeout.
    #[error("moderation API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("CleanMod API error ({status}): {message}")]
    Http { status: u16, message: String },

    /// The body was not valid JSON, or had no `decision` field.
    #[error("invalid response from CleanMod API: {0}")]
    Protocol(String),
}

/// Trait for moderating text. Implementations are async because the real
/// provider is a remote HTTP API.
#[async_trait]
pub trait Moderator: Send + Sync {
    /// Moderate a single piece of text, returning the API's decision.
    async fn moderate(&self, text: &str) -> Result<ModerationResult, ModerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_decisions() {
        assert_eq!(Decision::parse("allow"), Decision::Allow);
        assert_eq!(Decision::parse("flag"), Decision::Flag);
        assert_eq!(Decision::parse("block"), Decision::Block);
    }

    #[test]
    fn parse_preserves_unknown_decision_verbatim() {
        let d = Decision::parse("quarantine");
        assert_eq!(d, Decision::Unknown("quarantine".to_string()));
        assert_eq!(d.as_str(), "quarantine");
    }

    #[test]
    fn parse_is_case_sensitive() {
        // The API contract is lowercase; anything else is an unknown value.
        assert_eq!(Decision::parse("Block"), Decision::Unknown("Block".to_string()));
    }
}
