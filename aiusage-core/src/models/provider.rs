//! Provider-related types.
//!
//! This module contains types related to supported AI coding tools:
//! - [`ProviderId`] - Enum of supported tools, in report order
//! - [`Capability`] - What a tool's data source is able to measure

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Provider Id
// ============================================================================

/// Supported AI coding tools.
///
/// The declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderId {
    /// Anthropic Claude Code (CLI and IDE extension)
    #[serde(rename = "claude-code")]
    ClaudeCode,
    /// Cursor IDE
    #[serde(rename = "cursor")]
    Cursor,
    /// GitHub Copilot
    #[serde(rename = "github-copilot")]
    GithubCopilot,
    /// Cline / Roo Code VS Code extensions
    #[serde(rename = "cline")]
    Cline,
    /// Codeium Windsurf
    #[serde(rename = "windsurf")]
    Windsurf,
    /// Warp terminal AI
    #[serde(rename = "warp")]
    Warp,
    /// OpenCode
    #[serde(rename = "opencode")]
    OpenCode,
    /// OpenAI Codex (organization usage API)
    #[serde(rename = "openai-codex")]
    OpenaiCodex,
    /// Google Gemini CLI
    #[serde(rename = "gemini-cli")]
    GeminiCli,
    /// Amazon Q Developer
    #[serde(rename = "amazon-q")]
    AmazonQ,
    /// Tabnine
    #[serde(rename = "tabnine")]
    Tabnine,
    /// Gemini Code Assist VS Code extension
    #[serde(rename = "gemini-code-assist")]
    GeminiCodeAssist,
    /// Sourcegraph Cody
    #[serde(rename = "sourcegraph-cody")]
    SourcegraphCody,
    /// Replit (web dashboard only)
    #[serde(rename = "replit")]
    Replit,
}

impl ProviderId {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ClaudeCode => "Claude Code",
            Self::Cursor => "Cursor",
            Self::GithubCopilot => "GitHub Copilot",
            Self::Cline => "Cline",
            Self::Windsurf => "Windsurf",
            Self::Warp => "Warp",
            Self::OpenCode => "OpenCode",
            Self::OpenaiCodex => "OpenAI Codex",
            Self::GeminiCli => "Gemini CLI",
            Self::AmazonQ => "Amazon Q",
            Self::Tabnine => "Tabnine",
            Self::GeminiCodeAssist => "Gemini Code Assist",
            Self::SourcegraphCody => "Sourcegraph Cody",
            Self::Replit => "Replit",
        }
    }

    /// Returns all provider ids in report order.
    pub fn all() -> &'static [ProviderId] {
        &[
            Self::ClaudeCode,
            Self::Cursor,
            Self::GithubCopilot,
            Self::Cline,
            Self::Windsurf,
            Self::Warp,
            Self::OpenCode,
            Self::OpenaiCodex,
            Self::GeminiCli,
            Self::AmazonQ,
            Self::Tabnine,
            Self::GeminiCodeAssist,
            Self::SourcegraphCody,
            Self::Replit,
        ]
    }

    /// Returns the CLI name for this provider (lowercase, dash separated).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::ClaudeCode => "claude-code",
            Self::Cursor => "cursor",
            Self::GithubCopilot => "github-copilot",
            Self::Cline => "cline",
            Self::Windsurf => "windsurf",
            Self::Warp => "warp",
            Self::OpenCode => "opencode",
            Self::OpenaiCodex => "openai-codex",
            Self::GeminiCli => "gemini-cli",
            Self::AmazonQ => "amazon-q",
            Self::Tabnine => "tabnine",
            Self::GeminiCodeAssist => "gemini-code-assist",
            Self::SourcegraphCody => "sourcegraph-cody",
            Self::Replit => "replit",
        }
    }

    /// Looks up a provider by its exact CLI name.
    pub fn from_cli_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.cli_name() == name)
    }

    /// Returns the position of this provider in report order.
    pub fn to_index(self) -> usize {
        Self::all().iter().position(|&p| p == self).unwrap_or(0)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for ProviderId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cli_name(&s.to_ascii_lowercase())
            .ok_or_else(|| CoreError::UnknownProvider(s.to_string()))
    }
}

// ============================================================================
// Capability
// ============================================================================

/// What a provider's data source is able to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Input/output token split (and usually cached tokens).
    Tokens,
    /// Only an overall token total per record.
    TotalTokens,
    /// Request/interaction counts only, no tokens.
    RequestsOnly,
    /// Nothing measurable locally; the tool only offers a web dashboard.
    LinkOnly,
}

impl Capability {
    /// Returns true if the provider claims to report any token counts.
    pub fn reports_tokens(&self) -> bool {
        matches!(self, Self::Tokens | Self::TotalTokens)
    }

    /// Returns a short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::TotalTokens => "total tokens",
            Self::RequestsOnly => "requests",
            Self::LinkOnly => "link only",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_names_are_unique() {
        let mut names: Vec<_> = ProviderId::all().iter().map(ProviderId::cli_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ProviderId::all().len());
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Claude-Code".parse::<ProviderId>().unwrap(), ProviderId::ClaudeCode);
        assert_eq!("warp".parse::<ProviderId>().unwrap(), ProviderId::Warp);
        assert!("nope".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_index_matches_order() {
        for (i, id) in ProviderId::all().iter().enumerate() {
            assert_eq!(id.to_index(), i);
        }
        assert_eq!(ProviderId::Replit.to_index(), 13);
    }

    #[test]
    fn test_capability_reports_tokens() {
        assert!(Capability::Tokens.reports_tokens());
        assert!(Capability::TotalTokens.reports_tokens());
        assert!(!Capability::RequestsOnly.reports_tokens());
        assert!(!Capability::LinkOnly.reports_tokens());
    }
}
