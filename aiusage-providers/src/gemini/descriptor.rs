//! Gemini CLI provider descriptor.

use std::path::{Path, PathBuf};

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::{parse_session_file, parse_telemetry_line};
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::logs::is_json;
use crate::formats::{EncryptedSource, LogFormat, LogSource, LogTarget};

/// Creates the Gemini CLI provider descriptor.
pub fn gemini_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::GeminiCli,
        metadata: gemini_metadata(),
        capability: Capability::Tokens,
        sources: gemini_sources,
    }
}

/// Gemini CLI metadata.
fn gemini_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "~/.gemini chat sessions and telemetry log",
        dashboard_url: Some("https://aistudio.google.com/usage"),
        credential_env: &[],
        aliases: &["gemini"],
    }
}

fn sessions_root(roots: &PathRoots) -> PathBuf {
    roots.home_path(".gemini/tmp")
}

fn telemetry_log(roots: &PathRoots) -> PathBuf {
    roots.home_path(".gemini/telemetry.log")
}

fn conversations_dir(roots: &PathRoots) -> PathBuf {
    roots.home_path(".gemini/antigravity/conversations")
}

/// `<hash>/chats/*.json`
fn is_chat_file(path: &Path) -> bool {
    is_json(path)
        && path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|n| n == "chats")
}

fn gemini_sources() -> Vec<Box<dyn UsageSource>> {
    vec![
        Box::new(
            LogSource::new(
                "gemini-cli.sessions",
                LogTarget::Dir {
                    root: sessions_root,
                    depth: 3,
                    filter: is_chat_file,
                },
                LogFormat::Documents(parse_session_file),
            )
            .require_files(),
        ),
        Box::new(LogSource::new(
            "gemini-cli.telemetry",
            LogTarget::File(telemetry_log),
            LogFormat::MixedLines(parse_telemetry_line),
        )),
        Box::new(EncryptedSource::new(
            "gemini-cli.conversations",
            conversations_dir,
            &["pb"],
            "conversations are encrypted .pb files, use /stats in Gemini CLI",
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_file_filter() {
        assert!(is_chat_file(Path::new("/h/.gemini/tmp/ab12/chats/session-1.json")));
        assert!(!is_chat_file(Path::new("/h/.gemini/tmp/ab12/logs.json")));
        assert!(!is_chat_file(Path::new("/h/.gemini/tmp/ab12/chats/notes.txt")));
    }
}
