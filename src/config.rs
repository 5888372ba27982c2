use std::env;

use anyhow::Result;

use crate::moderation::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// What to do with a submission the API flagged as borderline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagBehavior {
    /// Hold for manual review (default)
    Hold,
    /// Leave the submission's state untouched
    NoChange,
}

/// What to do with a submission the API blocked outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockBehavior {
    /// Hold for manual review
    Hold,
    /// Mark as spam (default)
    Spam,
}

impl FlagBehavior {
    /// Parse a stored setting value. Anything outside the whitelist falls
    /// back to the default, matching how saved settings are sanitized.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "no_change" => FlagBehavior::NoChange,
            _ => FlagBehavior::Hold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlagBehavior::Hold => "hold",
            FlagBehavior::NoChange => "no_change",
        }
    }
}

impl BlockBehavior {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "hold" => BlockBehavior::Hold,
            _ => BlockBehavior::Spam,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockBehavior::Hold => "hold",
            BlockBehavior::Spam => "spam",
        }
    }
}

/// Admin-configured moderation policy.
///
/// This is the settings record the filter reads on every evaluation —
/// loaded fresh each time so it always reflects the latest saved values,
/// and passed explicitly rather than read from ambient global state.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Master switch. When false the filter passes everything through.
    pub enabled: bool,
    /// CleanMod API key. Empty means "not configured" — also pass-through.
    pub api_key: String,
    /// Moderation API endpoint (defaults to the hosted service).
    pub base_url: String,
    /// Moderation model identifier.
    pub model: String,
    pub on_flag: FlagBehavior,
    pub on_block: BlockBehavior,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            on_flag: FlagBehavior::Hold,
            on_block: BlockBehavior::Spam,
        }
    }
}

impl PolicyConfig {
    /// Load the policy from environment variables.
    ///
    /// The .env file is loaded at startup via dotenvy. Every field has a
    /// default; unrecognized behavior values fall back rather than error.
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::var("CLEANMOD_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            api_key: env::var("CLEANMOD_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.api_key),
            base_url: env::var("CLEANMOD_API_BASE").unwrap_or(defaults.base_url),
            model: env::var("CLEANMOD_MODEL").unwrap_or(defaults.model),
            on_flag: env::var("CLEANMOD_ON_FLAG")
                .map(|v| FlagBehavior::parse(&v))
                .unwrap_or(defaults.on_flag),
            on_block: env::var("CLEANMOD_ON_BLOCK")
                .map(|v| BlockBehavior::parse(&v))
                .unwrap_or(defaults.on_block),
        }
    }

    /// Check that an API key is configured.
    /// Call this before any operation that must reach the moderation API.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "CLEANMOD_API_KEY not set. Add it to your .env file or environment."
            );
        }
        Ok(())
    }
}
