//! End-to-end engine tests over a temporary home directory.
//!
//! Every test builds its own home, so providers see only the files a test
//! writes. Window bounds are fixed in UTC.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use aiusage_core::{Capability, PeriodBounds, ProviderId, ReportStatus};
use aiusage_fetch::{
    FetchContext, FetchError, FetchSettings, PathRoots, SourceBatch, SourceKind, SourceLocator,
    UsageSource,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;

use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::engine::UsageEngine;
use crate::registry::ProviderRegistry;

// ============================================================================
// Fixtures
// ============================================================================

fn bounds() -> PeriodBounds {
    PeriodBounds::at(&Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap()).unwrap()
}

fn ctx_with(home: &Path, settings: FetchSettings) -> Arc<FetchContext> {
    Arc::new(
        FetchContext::builder()
            .home(home)
            .bounds(bounds())
            .env(HashMap::new())
            .settings(settings)
            .build()
            .unwrap(),
    )
}

fn ctx(home: &Path) -> Arc<FetchContext> {
    ctx_with(home, FetchSettings::default())
}

fn assistant_line(ts: &str, input: u64, output: u64) -> String {
    json!({
        "type": "assistant",
        "timestamp": ts,
        "message": {"usage": {"input_tokens": input, "output_tokens": output}}
    })
    .to_string()
}

fn write_transcript(home: &Path, name: &str, lines: &[String]) {
    let dir = home.join(".claude/projects/demo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), lines.join("\n")).unwrap();
}

fn three_lines() -> Vec<String> {
    vec![
        assistant_line("2025-06-04T09:00:00Z", 100, 50),
        assistant_line("2025-06-04T10:00:00Z", 120, 60),
        assistant_line("2025-06-04T11:00:00Z", 80, 40),
    ]
}

// ============================================================================
// Report Shape
// ============================================================================

#[tokio::test]
async fn test_empty_home_yields_every_row() {
    let home = TempDir::new().unwrap();
    let report = UsageEngine::new().run(&ctx(home.path())).await;

    assert_eq!(report.providers.len(), 14);
    let order: Vec<ProviderId> = report.providers.iter().map(|r| r.provider).collect();
    assert_eq!(order, ProviderId::all().to_vec());
    assert_eq!(report.count(ReportStatus::Active), 0);

    let replit = report.get(ProviderId::Replit).unwrap();
    assert_eq!(replit.status, ReportStatus::NotApplicable);
    assert!(replit.diagnostic.as_deref().unwrap().contains("replit.com"));
}

#[tokio::test]
async fn test_malformed_line_is_skipped() {
    let home = TempDir::new().unwrap();
    let mut lines = three_lines();
    lines.insert(1, "{\"type\": \"assistant\", \"message\":".to_string());
    write_transcript(home.path(), "session.jsonl", &lines);

    let report = UsageEngine::new().run(&ctx(home.path())).await;
    let claude = report.get(ProviderId::ClaudeCode).unwrap();

    assert_eq!(claude.status, ReportStatus::Active);
    assert_eq!(claude.usage.today.input_tokens, Some(300));
    assert_eq!(claude.usage.today.output_tokens, Some(150));
    assert_eq!(claude.usage.today.total_tokens, Some(450));
    assert_eq!(claude.usage.today.request_count, 3);
    assert_eq!(claude.skipped_records, 1);
    assert!(claude.diagnostic.as_deref().unwrap().contains("skipped 1"));
    assert!(claude.source.as_deref().unwrap().ends_with("projects"));
}

#[tokio::test]
async fn test_missing_database_is_unavailable() {
    let home = TempDir::new().unwrap();
    let report = UsageEngine::new().run(&ctx(home.path())).await;

    let cursor = report.get(ProviderId::Cursor).unwrap();
    assert_eq!(cursor.status, ReportStatus::Unavailable);
    assert!(cursor.diagnostic.as_deref().unwrap().contains("state.vscdb"));
    assert_eq!(cursor.usage.total.total_tokens, None);
}

#[tokio::test]
async fn test_missing_credential_leaves_other_rows_alone() {
    let home = TempDir::new().unwrap();
    write_transcript(home.path(), "session.jsonl", &three_lines());

    let report = UsageEngine::new().run(&ctx(home.path())).await;
    assert_eq!(report.providers.len(), 14);

    let codex = report.get(ProviderId::OpenaiCodex).unwrap();
    assert_eq!(codex.status, ReportStatus::Unavailable);
    let diagnostic = codex.diagnostic.as_deref().unwrap();
    assert!(diagnostic.contains("credential not set"));
    assert!(diagnostic.contains("OPENAI_API_KEY"));

    let claude = report.get(ProviderId::ClaudeCode).unwrap();
    assert_eq!(claude.status, ReportStatus::Active);
    assert_eq!(claude.usage.total.total_tokens, Some(450));
}

#[tokio::test]
async fn test_requests_only_keeps_tokens_null() {
    let home = TempDir::new().unwrap();
    let dir = PathRoots::under(home.path())
        .vscode_global_storage()
        .join("sourcegraph.cody-ai");
    fs::create_dir_all(&dir).unwrap();
    let history = json!({
        "messages": [
            {"role": "user", "timestamp": "2025-06-04T08:00:00Z"},
            {"role": "assistant", "timestamp": "2025-06-04T08:00:05Z"},
            {"role": "user", "timestamp": "2025-06-04T08:01:00Z"},
            {"role": "assistant", "timestamp": "2025-06-04T08:01:07Z"}
        ]
    });
    fs::write(dir.join("chat.json"), history.to_string()).unwrap();

    let report = UsageEngine::new().run(&ctx(home.path())).await;
    let cody = report.get(ProviderId::SourcegraphCody).unwrap();

    assert_eq!(cody.status, ReportStatus::Active);
    assert_eq!(cody.usage.today.request_count, 2);
    assert_eq!(cody.usage.today.input_tokens, None);
    assert_eq!(cody.usage.today.total_tokens, None);

    let json = serde_json::to_value(cody).unwrap();
    assert!(json["usage"]["today"]["total_tokens"].is_null());
}

// ============================================================================
// Determinism
// ============================================================================

#[tokio::test]
async fn test_repeated_runs_are_byte_identical() {
    let home = TempDir::new().unwrap();
    write_transcript(home.path(), "session.jsonl", &three_lines());
    let ctx = ctx(home.path());
    let engine = UsageEngine::new();

    let first = serde_json::to_string(&engine.run(&ctx).await).unwrap();
    let second = serde_json::to_string(&engine.run(&ctx).await).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_event_order_does_not_matter() {
    let forward = TempDir::new().unwrap();
    write_transcript(forward.path(), "session.jsonl", &three_lines());

    let shuffled = TempDir::new().unwrap();
    let mut lines = three_lines();
    lines.reverse();
    write_transcript(shuffled.path(), "b.jsonl", &lines[..1]);
    write_transcript(shuffled.path(), "a.jsonl", &lines[1..]);

    let engine = UsageEngine::new();
    let a = engine.run(&ctx(forward.path())).await;
    let b = engine.run(&ctx(shuffled.path())).await;
    assert_eq!(
        a.get(ProviderId::ClaudeCode).unwrap().usage,
        b.get(ProviderId::ClaudeCode).unwrap().usage
    );
}

// ============================================================================
// Selection
// ============================================================================

#[tokio::test]
async fn test_tool_filter_keeps_registry_order() {
    let home = TempDir::new().unwrap();
    let engine = UsageEngine::with_providers(vec![
        ProviderRegistry::get(ProviderId::SourcegraphCody).unwrap(),
        ProviderRegistry::get(ProviderId::ClaudeCode).unwrap(),
    ]);
    let report = engine.run(&ctx(home.path())).await;

    let order: Vec<ProviderId> = report.providers.iter().map(|r| r.provider).collect();
    assert_eq!(order, vec![ProviderId::ClaudeCode, ProviderId::SourcegraphCody]);
}

#[tokio::test]
async fn test_disabled_provider_is_omitted() {
    let home = TempDir::new().unwrap();
    let mut settings = FetchSettings::default();
    settings.disabled.insert(ProviderId::Cursor);

    let report = UsageEngine::new().run(&ctx_with(home.path(), settings)).await;
    assert_eq!(report.providers.len(), 13);
    assert!(report.get(ProviderId::Cursor).is_none());
}

// ============================================================================
// Isolation
// ============================================================================

struct StalledSource;

#[async_trait]
impl UsageSource for StalledSource {
    fn id(&self) -> &str {
        "stalled"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::LogFiles
    }

    fn locate(&self, _ctx: &FetchContext) -> SourceLocator {
        SourceLocator::File("/stalled".into())
    }

    async fn read(&self, _ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(FetchError::SourceNotFound("/stalled".into()))
    }
}

struct PanickingSource;

#[async_trait]
impl UsageSource for PanickingSource {
    fn id(&self) -> &str {
        "panicking"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::LogFiles
    }

    fn locate(&self, _ctx: &FetchContext) -> SourceLocator {
        SourceLocator::File("/panicking".into())
    }

    async fn read(&self, _ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        panic!("parser bug");
    }
}

fn leaked(id: ProviderId, sources: fn() -> Vec<Box<dyn UsageSource>>) -> &'static ProviderDescriptor {
    Box::leak(Box::new(ProviderDescriptor {
        id,
        metadata: ProviderMetadata::default(),
        capability: Capability::Tokens,
        sources,
    }))
}

#[tokio::test]
async fn test_stalled_provider_times_out_alone() {
    let home = TempDir::new().unwrap();
    write_transcript(home.path(), "session.jsonl", &three_lines());
    let settings =
        FetchSettings::default().with_provider_timeout(ProviderId::Warp, Duration::from_millis(50));

    let engine = UsageEngine::with_providers(vec![
        ProviderRegistry::get(ProviderId::ClaudeCode).unwrap(),
        leaked(ProviderId::Warp, || vec![Box::new(StalledSource) as Box<dyn UsageSource>]),
    ]);
    let report = engine.run(&ctx_with(home.path(), settings)).await;

    let warp = report.get(ProviderId::Warp).unwrap();
    assert_eq!(warp.status, ReportStatus::Error);
    assert!(warp.diagnostic.as_deref().unwrap().contains("timed out"));
    assert_eq!(
        report.get(ProviderId::ClaudeCode).unwrap().status,
        ReportStatus::Active
    );
}

#[tokio::test]
async fn test_panicking_provider_becomes_error_row() {
    let home = TempDir::new().unwrap();
    write_transcript(home.path(), "session.jsonl", &three_lines());

    let engine = UsageEngine::with_providers(vec![
        ProviderRegistry::get(ProviderId::ClaudeCode).unwrap(),
        leaked(ProviderId::Tabnine, || vec![Box::new(PanickingSource) as Box<dyn UsageSource>]),
    ]);
    let report = engine.run(&ctx(home.path())).await;

    assert_eq!(report.providers.len(), 2);
    let tabnine = report.get(ProviderId::Tabnine).unwrap();
    assert_eq!(tabnine.status, ReportStatus::Error);
    assert!(tabnine.diagnostic.as_deref().unwrap().contains("internal fault"));
    assert_eq!(
        report.get(ProviderId::ClaudeCode).unwrap().usage.today.total_tokens,
        Some(450)
    );
}
