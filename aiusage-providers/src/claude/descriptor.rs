//! Claude Code provider descriptor.

use std::path::PathBuf;

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::parse_transcript_line;
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::logs::is_jsonl;
use crate::formats::{LogFormat, LogSource, LogTarget};

/// Creates the Claude Code provider descriptor.
pub fn claude_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::ClaudeCode,
        metadata: claude_metadata(),
        capability: Capability::Tokens,
        sources: claude_sources,
    }
}

/// Claude Code metadata.
fn claude_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "~/.claude/projects/**/*.jsonl session transcripts",
        dashboard_url: Some("https://console.anthropic.com/settings/usage"),
        credential_env: &[],
        aliases: &["claude"],
    }
}

fn projects_dir(roots: &PathRoots) -> PathBuf {
    roots.home_path(".claude/projects")
}

fn xdg_projects_dir(roots: &PathRoots) -> PathBuf {
    roots.config_path("claude/projects")
}

fn transcripts(root: fn(&PathRoots) -> PathBuf) -> LogTarget {
    LogTarget::Dir {
        root,
        depth: 4,
        filter: is_jsonl,
    }
}

/// Claude Code sources: the legacy and XDG transcript directories.
fn claude_sources() -> Vec<Box<dyn UsageSource>> {
    vec![
        Box::new(LogSource::new(
            "claude-code.projects",
            transcripts(projects_dir),
            LogFormat::Lines(parse_transcript_line),
        )),
        Box::new(LogSource::new(
            "claude-code.xdg",
            transcripts(xdg_projects_dir),
            LogFormat::Lines(parse_transcript_line),
        )),
    ]
}
