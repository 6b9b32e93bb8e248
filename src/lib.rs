//! In-memory hexastore for RDF triples.
//!
//! Constants are dictionary encoded into dense integer codes and every triple is kept in
//! six permutation indices (SPO, SOP, PSO, POS, OSP, OPS), so that any triple pattern is
//! answered by a prefix lookup. Star queries, conjunctions of patterns around one central
//! variable, are answered by joining the per-pattern substitution sets.

pub mod error;
pub mod rdf;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use rdf::{star_query::StarQuery, substitution::Substitution, Position, Term, TripleAtom, Variable};
pub use store::{star::JoinSemantics, AddReport, HexaStore, Substitutions};
