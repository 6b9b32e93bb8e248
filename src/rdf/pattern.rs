//! Textual triple patterns as accepted on the command line.
//!
//! A pattern is three whitespace separated terms in N-Triples syntax, optionally
//! followed by `.`. Terms starting with `?` are variables.

use crate::{
    error::{Error, Result},
    rdf::{Term, TripleAtom},
};

pub fn parse_term(token: &str) -> Result<Term> {
    let token = token.trim();

    if let Some(name) = token.strip_prefix('?') {
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(Error::InvalidPatternTerm(token.to_owned()));
        }
        return Ok(Term::variable(name));
    }

    let well_formed = match token.as_bytes().first() {
        Some(b'<') => token.len() > 2 && token.ends_with('>'),
        Some(b'"') => token.len() > 1 && token[1..].contains('"'),
        Some(b'_') => token.starts_with("_:") && token.len() > 2,
        _ => false,
    };

    if well_formed {
        Ok(Term::constant(token))
    } else {
        Err(Error::InvalidPatternTerm(token.to_owned()))
    }
}

/// Splits off the next term, honouring quoted literals (which may contain spaces)
/// together with their `@lang` or `^^<datatype>` suffix.
fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }

    let end = if input.starts_with('"') {
        let mut escaped = false;
        let closing = input
            .char_indices()
            .skip(1)
            .find(|&(_, c)| {
                let is_end = c == '"' && !escaped;
                escaped = c == '\\' && !escaped;
                is_end
            })
            .map(|(ix, _)| ix + 1)
            .unwrap_or(input.len());

        closing + input[closing..].find(char::is_whitespace).unwrap_or(input.len() - closing)
    } else {
        input.find(char::is_whitespace).unwrap_or(input.len())
    };

    Some(input.split_at(end))
}

pub fn parse_pattern(line: &str) -> Result<TripleAtom> {
    let line = line.trim();
    let line = line.strip_suffix('.').unwrap_or(line);

    let mut rest = line;
    let mut terms = Vec::with_capacity(3);

    while let Some((token, tail)) = next_token(rest) {
        terms.push(parse_term(token)?);
        rest = tail;
    }

    let terms: [Term; 3] = terms
        .try_into()
        .map_err(|_| Error::InvalidPatternTerm(line.to_owned()))?;

    Ok(TripleAtom::from(terms))
}
