//! RDF value model
//!
//! The constants a query can mention (IRIs, blank nodes, literals) and the
//! prefix table used when rendering them in compact form. Storage of
//! statements is not part of this crate.
//!
//! # Example
//!
//! ```rust
//! use samyama_querybuilder::rdf::{Literal, NamedNode, NamespaceManager, RdfTerm};
//!
//! let name = NamedNode::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let term: RdfTerm = Literal::new_simple_literal("Alice").into();
//!
//! assert_eq!(name.to_string(), "<http://xmlns.com/foaf/0.1/name>");
//! assert_eq!(term.to_string(), "\"Alice\"");
//! assert_eq!(
//!     NamespaceManager::new().compact(name.as_str()).as_deref(),
//!     Some("foaf:name")
//! );
//! ```

mod namespace;
mod types;

pub use namespace::{Namespace, NamespaceManager, PrefixError, PrefixResult};
pub use types::{BlankNode, Literal, NamedNode, RdfError, RdfResult, RdfTerm};
