//! Renderer configuration

use crate::rdf::NamespaceManager;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid render configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Spaces per nesting level
    pub indent_width: usize,
    /// Write IRIs under a known namespace as prefixed names
    pub compact_iris: bool,
    /// Seed the common vocabularies (rdf, rdfs, xsd, owl, foaf, dc, dcterms)
    pub default_prefixes: bool,
    /// Extra prefix → namespace IRI mappings
    pub prefixes: IndexMap<String, String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            compact_iris: false,
            default_prefixes: true,
            prefixes: IndexMap::new(),
        }
    }
}

impl RenderConfig {
    /// Load from a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), iri.into());
        self
    }

    pub fn compacting(mut self) -> Self {
        self.compact_iris = true;
        self
    }

    /// Namespace manager for IRI compaction
    pub fn namespace_manager(&self) -> NamespaceManager {
        let mut mgr = if self.default_prefixes {
            NamespaceManager::new()
        } else {
            NamespaceManager::empty()
        };
        for (prefix, iri) in &self.prefixes {
            mgr.add_prefix(prefix.clone(), iri.clone());
        }
        mgr
    }

    pub(crate) fn indent(&self, depth: usize) -> String {
        " ".repeat(self.indent_width * depth)
    }
}
