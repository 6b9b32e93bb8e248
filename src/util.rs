use crate::{
    error::Result,
    rdf::{
        ntriples::{read_ntriples_file, NTRIPLES_FILE_EXTENSION},
        TripleAtom,
    },
};
use rayon::prelude::*;
use std::path::PathBuf;

pub fn dataset_iter(
    paths: Vec<PathBuf>,
    recursive: bool,
    extension: &str,
) -> impl Iterator<Item = walkdir::Result<PathBuf>> + '_ {
    paths.into_iter().flat_map(move |path| {
        if path.is_dir() {
            if recursive {
                walkdir::WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| match e {
                        Ok(e)
                            if e.file_type().is_file()
                                && matches!(e.path().extension(), Some(ext) if ext == extension) =>
                        {
                            Some(Ok(e.into_path()))
                        },
                        Ok(_) => None,
                        other => Some(other.map(|e| e.into_path())),
                    })
                    .collect()
            } else {
                tracing::warn!(?path, "skipping directory, pass --recursive to descend into it");
                vec![]
            }
        } else {
            vec![Ok(path)]
        }
    })
}

/// Parses all n-triples datasets below `paths`, one file per worker.
pub fn read_datasets(paths: Vec<PathBuf>, recursive: bool) -> Result<Vec<TripleAtom>> {
    let files = dataset_iter(paths, recursive, NTRIPLES_FILE_EXTENSION).collect::<walkdir::Result<Vec<_>>>()?;

    let per_file = files.par_iter().map(read_ntriples_file).collect::<Result<Vec<_>>>()?;

    Ok(per_file.into_iter().flatten().collect())
}
