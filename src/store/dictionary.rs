use super::{BuildHasher, EncodedTriple, TermId};
use crate::{
    error::{Error, Result},
    rdf::{Position, Term, TripleAtom},
};
use std::{cmp::Reverse, collections::HashMap, fmt, sync::Arc};

/// Codes of the constant positions of a pattern. `None` marks a variable position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundPositions([Option<TermId>; 3]);

impl BoundPositions {
    pub fn code(&self, position: Position) -> Option<TermId> {
        self.0[position.index()]
    }

    pub fn codes(&self) -> [Option<TermId>; 3] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, TermId)> + '_ {
        Position::ALL
            .into_iter()
            .filter_map(|position| self.code(position).map(|code| (position, code)))
    }
}

struct Codex {
    values: Vec<Arc<str>>,
    frequencies: Vec<u64>,
    keys: HashMap<Arc<str>, TermId, BuildHasher>,
}

enum Phase {
    Accumulating(HashMap<Arc<str>, u64, BuildHasher>),
    Sealed(Codex),
}

/// Bijection between constants and dense codes.
///
/// Terms are first counted with [`Dictionary::add_term`]; [`Dictionary::create_codex`] then
/// freezes the mapping, giving the most frequent constant code `0`. Lookups only succeed
/// after sealing.
pub struct Dictionary {
    phase: Phase,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self { phase: Phase::Accumulating(HashMap::default()) }
    }
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one observation of `term`. Variables are ignored.
    pub fn add_term(&mut self, term: &Term) -> Result<()> {
        let Phase::Accumulating(frequencies) = &mut self.phase else {
            return Err(Error::DictionarySealed);
        };

        if let Term::Constant(value) = term {
            *frequencies.entry(value.clone()).or_default() += 1;
        }

        Ok(())
    }

    pub fn create_codex(&mut self) -> Result<()> {
        let Phase::Accumulating(frequencies) = &mut self.phase else {
            return Err(Error::DictionarySealed);
        };

        let mut entries: Vec<_> = std::mem::take(frequencies).into_iter().collect();
        entries.sort_unstable_by(|(lhs, lhs_freq), (rhs, rhs_freq)| {
            (Reverse(lhs_freq), lhs).cmp(&(Reverse(rhs_freq), rhs))
        });

        let (values, frequencies): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        let keys = values
            .iter()
            .enumerate()
            .map(|(code, value)| (value.clone(), code as TermId))
            .collect();

        tracing::info!(terms = values.len(), "created codex");

        self.phase = Phase::Sealed(Codex { values, frequencies, keys });
        Ok(())
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self.phase, Phase::Sealed(_))
    }

    /// Number of distinct constants observed so far.
    pub fn len(&self) -> usize {
        match &self.phase {
            Phase::Accumulating(frequencies) => frequencies.len(),
            Phase::Sealed(codex) => codex.values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn frequency(&self, term: &Term) -> u64 {
        let Some(value) = term.as_constant() else {
            return 0;
        };

        match &self.phase {
            Phase::Accumulating(frequencies) => frequencies.get(value).copied().unwrap_or(0),
            Phase::Sealed(codex) => codex
                .keys
                .get(value)
                .map(|&code| codex.frequencies[code as usize])
                .unwrap_or(0),
        }
    }

    /// The code of a constant, or `None` for variables, unseen constants and before sealing.
    pub fn get_key(&self, term: &Term) -> Option<TermId> {
        let Phase::Sealed(codex) = &self.phase else {
            return None;
        };

        codex.keys.get(term.as_constant()?).copied()
    }

    pub fn get_value(&self, code: TermId) -> Result<Term> {
        match &self.phase {
            Phase::Sealed(codex) => codex
                .values
                .get(code as usize)
                .map(|value| Term::Constant(value.clone()))
                .ok_or(Error::TermNotFound(code)),
            Phase::Accumulating(_) => Err(Error::TermNotFound(code)),
        }
    }

    fn encode_constant(&self, term: &Term) -> Result<TermId> {
        match term {
            Term::Variable(var) => Err(Error::VariableInTriple(var.clone())),
            Term::Constant(_) if !self.is_sealed() => Err(Error::DictionaryNotSealed),
            Term::Constant(value) => self
                .get_key(term)
                .ok_or_else(|| Error::UnresolvedConstant(value.clone())),
        }
    }

    /// Encodes a fully constant atom for insertion.
    pub fn encode_constant_triple(&self, atom: &TripleAtom) -> Result<EncodedTriple> {
        let [s, p, o] = atom.terms();
        Ok([self.encode_constant(s)?, self.encode_constant(p)?, self.encode_constant(o)?])
    }

    /// Resolves the constant positions of a pattern, skipping variables.
    /// Fails with [`Error::UnresolvedConstant`] if a constant has no code.
    pub fn resolve_bound_positions(&self, atom: &TripleAtom) -> Result<BoundPositions> {
        let mut codes = [None; 3];

        for (code, term) in codes.iter_mut().zip(atom.terms()) {
            if let Term::Constant(value) = term {
                *code = Some(
                    self.get_key(term)
                        .ok_or_else(|| Error::UnresolvedConstant(value.clone()))?,
                );
            }
        }

        Ok(BoundPositions(codes))
    }

    pub fn decode_triplet(&self, [s, p, o]: EncodedTriple) -> Result<TripleAtom> {
        Ok(TripleAtom::new(self.get_value(s)?, self.get_value(p)?, self.get_value(o)?))
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.phase {
            Phase::Sealed(codex) => {
                for (value, frequency) in codex.values.iter().zip(&codex.frequencies) {
                    writeln!(f, "{value} : {frequency}")?;
                }
            },
            Phase::Accumulating(frequencies) => {
                for (value, frequency) in frequencies {
                    writeln!(f, "{value} : {frequency}")?;
                }
            },
        }

        Ok(())
    }
}
