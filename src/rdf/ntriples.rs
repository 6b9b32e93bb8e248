use crate::{
    error::Result,
    rdf::{Term, TripleAtom},
};
use rio_api::{model::Triple, parser::TriplesParser};
use rio_turtle::{NTriplesParser, TurtleError};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

pub const NTRIPLES_FILE_EXTENSION: &str = "nt";

pub fn atom_from_parsed_triple(Triple { subject, predicate, object }: Triple) -> TripleAtom {
    TripleAtom::new(
        Term::constant(&subject.to_string()),
        Term::constant(&predicate.to_string()),
        Term::constant(&object.to_string()),
    )
}

/// Parses every well-formed triple of `reader`. Malformed lines are logged and skipped.
pub fn read_ntriples<R: BufRead>(reader: R) -> Vec<TripleAtom> {
    let mut parser = NTriplesParser::new(reader);
    let mut atoms = Vec::new();

    while !parser.is_end() {
        let res: Result<(), TurtleError> = parser.parse_step(&mut |triple| {
            atoms.push(atom_from_parsed_triple(triple));
            Ok(())
        });

        if let Err(e) = res {
            tracing::warn!(error = %e, "skipping malformed n-triples statement");
        }
    }

    atoms
}

pub fn read_ntriples_file<P: AsRef<Path>>(path: P) -> Result<Vec<TripleAtom>> {
    let atoms = read_ntriples(BufReader::new(File::open(path.as_ref())?));
    tracing::info!(path = ?path.as_ref(), atoms = atoms.len(), "parsed n-triples file");

    Ok(atoms)
}
