//! Data-source locators.
//!
//! A locator says where a source's raw data lives. Resolving it only checks
//! existence (file, directory, credential); it never opens or parses
//! content. A locator that resolves to nothing is the normal "tool not
//! installed" state.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::FetchContext;

// ============================================================================
// Source Locator
// ============================================================================

/// Where a source's data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    /// A single file.
    File(PathBuf),
    /// A directory scanned for files.
    Directory(PathBuf),
    /// An embedded database file.
    Database(PathBuf),
    /// A remote endpoint that needs a credential.
    Remote {
        /// Endpoint URL.
        endpoint: String,
        /// Environment variables consulted, in order.
        env_vars: Vec<String>,
        /// A file the credential may also be read from.
        credential_file: Option<PathBuf>,
    },
    /// A web page only; nothing to read.
    Link(String),
}

/// The result of resolving a locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Path, endpoint, or URL.
    pub location: String,
    /// Whether the data (or credential) is present.
    pub found: bool,
    /// Extra detail, such as which credential variable was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SourceLocator {
    /// Display form of the location.
    pub fn location(&self) -> String {
        match self {
            Self::File(p) | Self::Directory(p) | Self::Database(p) => p.display().to_string(),
            Self::Remote { endpoint, .. } => endpoint.clone(),
            Self::Link(url) => url.clone(),
        }
    }

    /// The filesystem path, if this is a local locator.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(p) | Self::Directory(p) | Self::Database(p) => Some(p),
            Self::Remote { .. } | Self::Link(_) => None,
        }
    }

    /// Checks whether the data is reachable without reading it.
    pub fn resolve(&self, ctx: &FetchContext) -> Resolution {
        let location = self.location();
        match self {
            Self::File(p) | Self::Database(p) => Resolution {
                location,
                found: p.is_file(),
                detail: None,
            },
            Self::Directory(p) => Resolution {
                location,
                found: p.is_dir(),
                detail: None,
            },
            Self::Remote {
                env_vars,
                credential_file,
                ..
            } => {
                let env_hit = env_vars.iter().find(|v| ctx.env(v).is_some());
                let file_hit = credential_file.as_ref().filter(|p| p.is_file());
                let detail = match (env_hit, file_hit) {
                    (Some(var), _) => format!("credential from {var}"),
                    (None, Some(path)) => format!("credential from {}", path.display()),
                    (None, None) => format!("credential not set (set {})", env_vars.join(" or ")),
                };
                Resolution {
                    location,
                    found: env_hit.is_some() || file_hit.is_some(),
                    detail: Some(detail),
                }
            }
            Self::Link(_) => Resolution {
                location,
                found: false,
                detail: Some("web dashboard only".to_string()),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
