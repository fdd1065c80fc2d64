//! Encrypted-blob family.
//!
//! Some tools keep conversations in encrypted or proprietary files. These
//! sources only detect that the data exists so the report can say why it
//! cannot be read; they never produce usage.

use std::path::PathBuf;

use aiusage_fetch::host::files;
use aiusage_fetch::{
    FetchContext, FetchError, PathRoots, SourceBatch, SourceKind, SourceLocator, UsageSource,
};
use async_trait::async_trait;
use tracing::debug;

/// A source whose data is present but unreadable.
pub struct EncryptedSource {
    id: &'static str,
    root: fn(&PathRoots) -> PathBuf,
    extensions: &'static [&'static str],
    message: &'static str,
}

impl EncryptedSource {
    /// Creates a source for files with the given extensions under `root`.
    ///
    /// With no extensions, the existence of `root` alone is enough.
    pub fn new(
        id: &'static str,
        root: fn(&PathRoots) -> PathBuf,
        extensions: &'static [&'static str],
        message: &'static str,
    ) -> Self {
        Self {
            id,
            root,
            extensions,
            message,
        }
    }
}

#[async_trait]
impl UsageSource for EncryptedSource {
    fn id(&self) -> &str {
        self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::EncryptedBlob
    }

    fn locate(&self, ctx: &FetchContext) -> SourceLocator {
        SourceLocator::Directory((self.root)(&ctx.roots))
    }

    async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        let root = (self.root)(&ctx.roots);
        if !root.exists() {
            return Err(FetchError::SourceNotFound(root.display().to_string()));
        }
        if self.extensions.is_empty() {
            return Err(FetchError::SourceUnreadable(self.message.to_string()));
        }

        let found = files::find_files(&root, 3, |p| files::has_extension(p, self.extensions));
        debug!(source = self.id, files = found.len(), "Encrypted files found");
        if found.is_empty() {
            return Err(FetchError::SourceNotFound(format!(
                "{} (no .{} files)",
                root.display(),
                self.extensions.join("/.")
            )));
        }
        Err(FetchError::SourceUnreadable(format!(
            "{} ({} file(s))",
            self.message,
            found.len()
        )))
    }
}
