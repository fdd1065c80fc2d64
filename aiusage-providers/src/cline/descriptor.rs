//! Cline provider descriptor.

use std::path::{Path, PathBuf};

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{
    FetchContext, FetchError, PathRoots, SourceBatch, SourceKind, SourceLocator, UsageSource,
};
use async_trait::async_trait;

use super::parser::{parse_roo_totals, parse_task_file};
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::{LogFormat, LogSource, LogTarget};
use crate::paths::vscode_extension_dir;

/// Creates the Cline provider descriptor.
pub fn cline_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Cline,
        metadata: cline_metadata(),
        capability: Capability::Tokens,
        sources: cline_sources,
    }
}

/// Cline metadata.
fn cline_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "VS Code globalStorage task history (Cline and Roo Code)",
        dashboard_url: None,
        credential_env: &[],
        aliases: &["roo", "roo-code"],
    }
}

fn cline_tasks(roots: &PathRoots) -> PathBuf {
    vscode_extension_dir(roots, "saoudrizwan.claude-dev").join("tasks")
}

fn roo_tasks(roots: &PathRoots) -> PathBuf {
    vscode_extension_dir(roots, "rooveterinary.roo-cline").join("tasks")
}

fn roo_tracking(roots: &PathRoots) -> PathBuf {
    roots.home_path(".roo/usage-tracking.json")
}

fn is_task_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n == "ui_messages.json" || n == "task.json")
}

fn tasks(root: fn(&PathRoots) -> PathBuf) -> LogTarget {
    LogTarget::Dir {
        root,
        depth: 2,
        filter: is_task_file,
    }
}

fn cline_sources() -> Vec<Box<dyn UsageSource>> {
    vec![
        Box::new(LogSource::new(
            "cline.tasks",
            tasks(cline_tasks),
            LogFormat::Documents(parse_task_file),
        )),
        Box::new(LogSource::new(
            "cline.roo-tasks",
            tasks(roo_tasks),
            LogFormat::Documents(parse_task_file),
        )),
        Box::new(RooTotalsSource(LogSource::new(
            "cline.roo-totals",
            LogTarget::File(roo_tracking),
            LogFormat::Documents(parse_roo_totals),
        ))),
    ]
}

/// Roo Code's lifetime totals, used only when its task history is gone.
///
/// The totals cover the same requests as the task files, so reading both
/// would count them twice.
struct RooTotalsSource(LogSource);

#[async_trait]
impl UsageSource for RooTotalsSource {
    fn id(&self) -> &str {
        self.0.id()
    }

    fn kind(&self) -> SourceKind {
        self.0.kind()
    }

    fn locate(&self, ctx: &FetchContext) -> SourceLocator {
        self.0.locate(ctx)
    }

    async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        let history = roo_tasks(&ctx.roots);
        if history.is_dir() {
            return Err(FetchError::SourceNotFound(format!(
                "{} (superseded by {})",
                roo_tracking(&ctx.roots).display(),
                history.display()
            )));
        }
        self.0.read(ctx).await
    }
}
