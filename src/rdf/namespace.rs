//! Prefix table
//!
//! With IRI compaction enabled, renderers write `foaf:name` instead of
//! `<http://xmlns.com/foaf/0.1/name>` and declare every prefix they used.

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    #[error("Not a prefixed name: {0}")]
    NotPrefixed(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// One prefix declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: String,
    pub iri: String,
}

/// Prefix → namespace IRI, in registration order
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    namespaces: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Manager seeded with the common vocabularies
    pub fn new() -> Self {
        let mut mgr = Self::empty();
        for (prefix, iri) in [
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            ("xsd", "http://www.w3.org/2001/XMLSchema#"),
            ("owl", "http://www.w3.org/2002/07/owl#"),
            ("foaf", "http://xmlns.com/foaf/0.1/"),
            ("dc", "http://purl.org/dc/elements/1.1/"),
            ("dcterms", "http://purl.org/dc/terms/"),
        ] {
            mgr.add_prefix(prefix, iri);
        }
        mgr
    }

    pub fn empty() -> Self {
        Self {
            namespaces: IndexMap::new(),
        }
    }

    /// Rebinding a prefix keeps its original position
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.namespaces.insert(prefix.into(), iri.into());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// `foaf:name` → `http://xmlns.com/foaf/0.1/name`
    pub fn expand(&self, prefixed: &str) -> PrefixResult<String> {
        let (prefix, local) = prefixed
            .split_once(':')
            .ok_or_else(|| PrefixError::NotPrefixed(prefixed.to_string()))?;
        let iri = self
            .namespace(prefix)
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))?;
        Ok(format!("{}{}", iri, local))
    }

    /// Prefix and namespace that compact `iri`. The longest namespace wins
    /// (`dcterms` over `dc`). `None` when nothing matches or the remainder
    /// is not a usable local name.
    pub fn namespace_for(&self, iri: &str) -> Option<(&str, &str)> {
        let (prefix, ns) = self
            .namespaces
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())?;
        is_local_name(&iri[ns.len()..]).then_some((prefix.as_str(), ns.as_str()))
    }

    pub fn compact(&self, iri: &str) -> Option<String> {
        let (prefix, ns) = self.namespace_for(iri)?;
        Some(format!("{}:{}", prefix, &iri[ns.len()..]))
    }

    pub fn prefixes(&self) -> Vec<Namespace> {
        self.namespaces
            .iter()
            .map(|(prefix, iri)| Namespace {
                prefix: prefix.clone(),
                iri: iri.clone(),
            })
            .collect()
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Subset of local names valid in both SPARQL and SeRQL
fn is_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_vocabularies() {
        let mgr = NamespaceManager::new();
        assert_eq!(mgr.namespace("xsd"), Some("http://www.w3.org/2001/XMLSchema#"));
        assert_eq!(mgr.namespace("nope"), None);
        assert_eq!(mgr.prefixes().len(), 7);
    }

    #[test]
    fn test_expand() {
        let mgr = NamespaceManager::new();
        assert_eq!(mgr.expand("foaf:name").unwrap(), "http://xmlns.com/foaf/0.1/name");
        assert_eq!(
            mgr.expand("ex:alice"),
            Err(PrefixError::UnknownPrefix("ex".to_string()))
        );
        assert_eq!(
            mgr.expand("alice"),
            Err(PrefixError::NotPrefixed("alice".to_string()))
        );
    }

    #[test]
    fn test_compact() {
        let mgr = NamespaceManager::new();
        assert_eq!(
            mgr.compact("http://www.w3.org/1999/02/22-rdf-syntax-ns#type").as_deref(),
            Some("rdf:type")
        );
        assert_eq!(mgr.compact("http://xmlns.com/foaf/0.1/a/b"), None);
        assert_eq!(mgr.compact("http://xmlns.com/foaf/0.1/"), None);
        assert_eq!(mgr.compact("http://unknown.example/x"), None);
    }

    #[test]
    fn test_longest_namespace_wins() {
        let mut mgr = NamespaceManager::empty();
        mgr.add_prefix("ex", "http://example.org/");
        mgr.add_prefix("exv", "http://example.org/vocab#");

        assert_eq!(mgr.compact("http://example.org/vocab#term").as_deref(), Some("exv:term"));
        assert_eq!(mgr.compact("http://example.org/alice").as_deref(), Some("ex:alice"));
    }

    #[test]
    fn test_prefixes_keep_registration_order() {
        let mut mgr = NamespaceManager::empty();
        mgr.add_prefix("b", "http://b.example/");
        mgr.add_prefix("a", "http://a.example/");
        mgr.add_prefix("b", "http://b.example/v2/");

        let names: Vec<_> = mgr.prefixes().into_iter().map(|ns| ns.prefix).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(mgr.namespace("b"), Some("http://b.example/v2/"));
    }
}
