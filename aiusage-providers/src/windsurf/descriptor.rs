//! Windsurf provider descriptor.

use std::path::{Path, PathBuf};

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::host::files;
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::{parse_cascade_document, parse_cascade_line};
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::logs::is_json;
use crate::formats::{EncryptedSource, LogFormat, LogSource, LogTarget};

/// Creates the Windsurf provider descriptor.
pub fn windsurf_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Windsurf,
        metadata: windsurf_metadata(),
        capability: Capability::Tokens,
        sources: windsurf_sources,
    }
}

/// Windsurf metadata.
fn windsurf_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "~/.codeium/windsurf/cascade logs",
        dashboard_url: Some("https://windsurf.com/subscription/usage"),
        credential_env: &[],
        aliases: &["codeium"],
    }
}

fn cascade_dir(roots: &PathRoots) -> PathBuf {
    roots.home_path(".codeium/windsurf/cascade")
}

fn is_cascade_log(path: &Path) -> bool {
    files::has_extension(path, &["jsonl", "log"])
}

fn windsurf_sources() -> Vec<Box<dyn UsageSource>> {
    vec![
        Box::new(
            LogSource::new(
                "windsurf.cascade-lines",
                LogTarget::Dir {
                    root: cascade_dir,
                    depth: 1,
                    filter: is_cascade_log,
                },
                LogFormat::Lines(parse_cascade_line),
            )
            .require_files(),
        ),
        Box::new(
            LogSource::new(
                "windsurf.cascade-json",
                LogTarget::Dir {
                    root: cascade_dir,
                    depth: 1,
                    filter: is_json,
                },
                LogFormat::Documents(parse_cascade_document),
            )
            .require_files(),
        ),
        Box::new(EncryptedSource::new(
            "windsurf.cascade-pb",
            cascade_dir,
            &["pb"],
            "cascade conversations are encrypted",
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiusage_core::{PeriodBounds, ReportStatus};
    use aiusage_fetch::FetchContext;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    fn ctx(home: &Path) -> FetchContext {
        FetchContext::builder()
            .home(home)
            .bounds(PeriodBounds::at(&Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap()).unwrap())
            .env(Default::default())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_only_encrypted_files_is_unavailable() {
        let home = TempDir::new().unwrap();
        let dir = home.path().join(".codeium/windsurf/cascade");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("0f3a.pb"), [1u8, 2, 3]).unwrap();

        let desc = windsurf_descriptor();
        let report = desc
            .build_pipeline()
            .report(desc.id, desc.capability, &ctx(home.path()))
            .await;
        assert_eq!(report.status, ReportStatus::Unavailable);
        assert!(report.diagnostic.unwrap().contains("encrypted"));
    }

    #[tokio::test]
    async fn test_lines_win_over_encrypted_files() {
        let home = TempDir::new().unwrap();
        let dir = home.path().join(".codeium/windsurf/cascade");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("0f3a.pb"), [1u8, 2, 3]).unwrap();
        fs::write(
            dir.join("session.jsonl"),
            "{\"timestamp\":\"2025-06-04T09:00:00Z\",\"usage\":{\"input_tokens\":300,\"output_tokens\":150}}\n",
        )
        .unwrap();

        let desc = windsurf_descriptor();
        let report = desc
            .build_pipeline()
            .report(desc.id, desc.capability, &ctx(home.path()))
            .await;
        assert_eq!(report.status, ReportStatus::Active);
        assert_eq!(report.usage.today.total_tokens, Some(450));
    }
}
