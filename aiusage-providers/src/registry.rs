//! Provider registry for managing all provider descriptors.
//!
//! The registry provides static access to all provider configurations
//! and is the central point for looking up providers. Its order is the
//! report order.

use aiusage_core::ProviderId;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::amazon_q::amazon_q_descriptor;
use crate::claude::claude_descriptor;
use crate::cline::cline_descriptor;
use crate::codex::codex_descriptor;
use crate::cody::cody_descriptor;
use crate::copilot::copilot_descriptor;
use crate::cursor::cursor_descriptor;
use crate::descriptor::ProviderDescriptor;
use crate::gemini::gemini_descriptor;
use crate::gemini_code_assist::gemini_code_assist_descriptor;
use crate::opencode::opencode_descriptor;
use crate::replit::replit_descriptor;
use crate::tabnine::tabnine_descriptor;
use crate::warp::warp_descriptor;
use crate::windsurf::windsurf_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all provider descriptors.
static DESCRIPTORS: OnceLock<Vec<ProviderDescriptor>> = OnceLock::new();

/// Static storage for CLI name to provider id mapping.
static CLI_NAME_MAP: OnceLock<HashMap<String, ProviderId>> = OnceLock::new();

/// Initializes all provider descriptors, in [`ProviderId::all`] order.
fn init_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        claude_descriptor(),
        cursor_descriptor(),
        copilot_descriptor(),
        cline_descriptor(),
        windsurf_descriptor(),
        warp_descriptor(),
        opencode_descriptor(),
        codex_descriptor(),
        gemini_descriptor(),
        amazon_q_descriptor(),
        tabnine_descriptor(),
        gemini_code_assist_descriptor(),
        cody_descriptor(),
        replit_descriptor(),
    ]
}

/// Builds the CLI name to provider id mapping.
fn build_cli_name_map(descriptors: &[ProviderDescriptor]) -> HashMap<String, ProviderId> {
    let mut map = HashMap::new();

    for desc in descriptors {
        // Primary CLI name
        map.insert(desc.cli_name().to_string(), desc.id);

        // Aliases
        for alias in desc.metadata.aliases {
            map.insert((*alias).to_string(), desc.id);
        }
    }

    map
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Global registry of all provider descriptors.
///
/// The registry is initialized lazily on first access and provides
/// thread-safe access to provider configurations.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all provider descriptors.
    pub fn all() -> &'static [ProviderDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a provider descriptor by id.
    pub fn get(id: ProviderId) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Returns the CLI name to provider id mapping.
    pub fn cli_name_map() -> &'static HashMap<String, ProviderId> {
        CLI_NAME_MAP.get_or_init(|| build_cli_name_map(Self::all()))
    }

    /// Looks up a provider by CLI name or alias, ignoring case.
    pub fn get_by_cli_name(name: &str) -> Option<&'static ProviderDescriptor> {
        let id = Self::cli_name_map().get(&name.trim().to_ascii_lowercase())?;
        Self::get(*id)
    }

    /// Returns the number of registered providers.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all provider ids.
    pub fn ids() -> Vec<ProviderId> {
        Self::all().iter().map(|d| d.id).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_all_14_providers() {
        assert_eq!(ProviderRegistry::count(), 14, "Should have exactly 14 providers");
    }

    #[test]
    fn test_registry_order_is_report_order() {
        assert_eq!(ProviderRegistry::ids(), ProviderId::all().to_vec());
    }

    #[test]
    fn test_registry_get_all_ids() {
        for &id in ProviderId::all() {
            let desc = ProviderRegistry::get(id);
            assert!(desc.is_some(), "Should find provider {id:?}");
            assert_eq!(desc.unwrap().id, id);
        }
    }

    #[test]
    fn test_cli_name_lookup() {
        // Primary names
        for &id in ProviderId::all() {
            assert_eq!(ProviderRegistry::get_by_cli_name(id.cli_name()).unwrap().id, id);
        }

        // Aliases
        let openai = ProviderRegistry::get_by_cli_name("codex");
        assert_eq!(openai.unwrap().id, ProviderId::OpenaiCodex);
        let roo = ProviderRegistry::get_by_cli_name("Roo");
        assert_eq!(roo.unwrap().id, ProviderId::Cline);

        assert!(ProviderRegistry::get_by_cli_name("chatgpt").is_none());
    }

    #[test]
    fn test_aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for desc in ProviderRegistry::all() {
            assert!(seen.insert(desc.cli_name()));
            for alias in desc.metadata.aliases {
                assert!(seen.insert(*alias), "duplicate alias {alias}");
            }
        }
    }

    #[test]
    fn test_remote_providers_declare_credentials() {
        let remote: Vec<_> = ProviderRegistry::all()
            .iter()
            .filter(|d| d.is_remote())
            .map(|d| d.id)
            .collect();
        assert_eq!(remote, vec![ProviderId::GithubCopilot, ProviderId::OpenaiCodex]);
    }
}
