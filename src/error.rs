use crate::{rdf::Variable, store::TermId};
use std::sync::Arc;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no term is associated with code {0}")]
    TermNotFound(TermId),

    #[error("constant {0} was not observed before the codex was created")]
    UnresolvedConstant(Arc<str>),

    #[error("variable {0} cannot be stored as part of a triple")]
    VariableInTriple(Variable),

    #[error("the dictionary is sealed, no further terms can be added")]
    DictionarySealed,

    #[error("the dictionary must be sealed before triples can be added")]
    DictionaryNotSealed,

    #[error("a star query needs at least one atom")]
    EmptyStarQuery,

    #[error("atom {index} of the star query does not mention the central variable {center}")]
    DisconnectedAtom { index: usize, center: Variable },

    #[error("invalid pattern term {0:?}")]
    InvalidPatternTerm(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}
