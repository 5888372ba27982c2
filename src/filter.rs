// The approval filter — maps moderation decisions to publication states.
//
// This runs at the moment a new submission's approval status is about to
// be finalized: it receives the tentative state, consults the CleanMod API
// through an injected Moderator, and returns the (possibly overridden)
// state. Every failure path is fail-open — an unreachable or misbehaving
// moderation service must never block content submission.

use tracing::warn;

use crate::config::{BlockBehavior, FlagBehavior, PolicyConfig};
use crate::moderation::{Decision, ModerationError, Moderator};
use crate::sanitize::strip_markup;

/// Publication state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalState {
    /// Publicly visible
    Approved,
    /// Held in the moderation queue for manual review
    Hold,
    /// Marked as spam
    Spam,
    /// Trashed — never produced by the filter, passthrough only
    Trash,
}

impl ApprovalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalState::Approved => "approved",
            ApprovalState::Hold => "hold",
            ApprovalState::Spam => "spam",
            ApprovalState::Trash => "trash",
        }
    }
}

/// Where an evaluation request came from.
///
/// The filter only intervenes on newly arriving public submissions. Bulk
/// state changes made from the admin screens carry an explicit operator
/// decision and pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionContext {
    PublicSubmission,
    AdminBulk,
}

/// An incoming content submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub content: String,
    pub author: Option<String>,
    pub author_email: Option<String>,
}

impl Submission {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: None,
            author_email: None,
        }
    }
}

/// Receiver for moderation-failure diagnostics.
///
/// The filter never logs directly; when the API call fails it hands the
/// error and the original submission to the sink and moves on. Hosts hook
/// alerting or logging in here.
pub trait ApiFailureSink: Send + Sync {
    fn api_failure(&self, error: &ModerationError, submission: &Submission);
}

/// Default sink: logs failures through tracing at warn level.
pub struct TracingSink;

impl ApiFailureSink for TracingSink {
    fn api_failure(&self, error: &ModerationError, submission: &Submission) {
        warn!(
            error = %error,
            author = submission.author.as_deref().unwrap_or("<anonymous>"),
            "moderation API call failed; submission passed through unmoderated"
        );
    }
}

/// Decide the final approval state for an incoming submission.
///
/// Returns `current` unchanged when moderation is disabled or
/// unconfigured, when the call comes from an admin bulk action, when the
/// submission has no text once markup is stripped, when the API call
/// fails (after emitting one diagnostic through `sink`), and when the
/// API's decision is `allow` or unrecognized. Exactly one remote call is
/// made per invocation on the moderating path, none otherwise.
pub async fn evaluate(
    submission: &Submission,
    current: ApprovalState,
    policy: &PolicyConfig,
    context: SubmissionContext,
    moderator: &dyn Moderator,
    sink: &dyn ApiFailureSink,
) -> ApprovalState {
    // No-op if disabled or not configured
    if !policy.enabled || policy.api_key.is_empty() {
        return current;
    }

    // Operator-initiated state changes are never second-guessed
    if context == SubmissionContext::AdminBulk {
        return current;
    }

    let text = strip_markup(&submission.content);
    if text.is_empty() {
        return current;
    }

    let result = match moderator.moderate(&text).await {
        Ok(result) => result,
        Err(error) => {
            // Fail-open: surface the failure, keep the submission moving
            sink.api_failure(&error, submission);
            return current;
        }
    };

    match result.decision {
        Decision::Block => match policy.on_block {
            BlockBehavior::Spam => ApprovalState::Spam,
            BlockBehavior::Hold => ApprovalState::Hold,
        },
        Decision::Flag => match policy.on_flag {
            FlagBehavior::Hold => ApprovalState::Hold,
            FlagBehavior::NoChange => current,
        },
        Decision::Allow | Decision::Unknown(_) => current,
    }
}
