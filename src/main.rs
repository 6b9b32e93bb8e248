use ahash::AHasher;
use clap::{ArgEnum, Parser};
use hexastore::{
    rdf::pattern::{parse_pattern, parse_term},
    util::read_datasets,
    HexaStore, JoinSemantics, StarQuery, Substitutions, Term, Variable,
};
use std::{
    collections::HashSet,
    hash::BuildHasherDefault,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
enum Opts {
    /// Print stats about n-triples datasets (triple count, dictionary size, number of subjects, predicates, objects)
    Stats {
        /// Operate recursively on directories
        #[clap(short = 'r', long, action)]
        recursive: bool,

        /// Datasets to load
        datasets: Vec<PathBuf>,
    },
    /// Match a single triple pattern against n-triples datasets
    Match {
        /// Operate recursively on directories
        #[clap(short = 'r', long, action)]
        recursive: bool,

        /// Triple pattern, e.g. `?x <http://ex.org/knows> <http://ex.org/bob>`
        #[clap(short = 'p', long)]
        pattern: String,

        /// Only print the number of answers
        #[clap(short = 'n', long, action)]
        count: bool,

        /// Datasets to load
        datasets: Vec<PathBuf>,
    },
    /// Evaluate a star query against n-triples datasets
    Query {
        /// Operate recursively on directories
        #[clap(short = 'r', long, action)]
        recursive: bool,

        /// The variable shared by all atoms, e.g. `?x`
        #[clap(short = 'c', long)]
        center: String,

        /// Atoms of the query, one triple pattern each
        #[clap(short = 'a', long = "atom", required = true)]
        atoms: Vec<String>,

        /// Variables to report. Defaults to the central variable
        #[clap(short = 'P', long = "project")]
        projected: Vec<String>,

        /// How the answers of the atoms are joined
        #[clap(arg_enum, short = 'j', long, default_value_t = JoinOpt::SharedVariables)]
        join: JoinOpt,

        /// Only print the number of answers
        #[clap(short = 'n', long, action)]
        count: bool,

        /// Datasets to load
        datasets: Vec<PathBuf>,
    },
}

#[derive(ArgEnum, Clone, Copy)]
enum JoinOpt {
    /// intersect whole substitutions
    Exact,

    /// join on the variables both sides bind
    SharedVariables,
}

impl From<JoinOpt> for JoinSemantics {
    fn from(opt: JoinOpt) -> Self {
        match opt {
            JoinOpt::Exact => JoinSemantics::Exact,
            JoinOpt::SharedVariables => JoinSemantics::SharedVariables,
        }
    }
}

fn parse_variable(token: &str) -> Result<Variable, hexastore::Error> {
    match parse_term(token)? {
        Term::Variable(var) => Ok(var),
        Term::Constant(_) => Err(hexastore::Error::InvalidPatternTerm(token.to_owned())),
    }
}

fn load_store(datasets: Vec<PathBuf>, recursive: bool, join: JoinSemantics) -> hexastore::Result<HexaStore> {
    tracing::info!("loading datasets...");
    let atoms = read_datasets(datasets, recursive)?;

    tracing::info!(atoms = atoms.len(), "building hexastore...");
    let mut store = HexaStore::with_join_semantics(join);
    let report = store.load(atoms)?;

    tracing::info!(
        triples = store.len(),
        terms = store.dictionary().len(),
        duplicates = report.duplicates,
        skipped = report.skipped,
        "hexastore ready"
    );

    Ok(store)
}

fn print_answers(answers: Substitutions, count: bool) -> std::io::Result<()> {
    let mut out = BufWriter::new(std::io::stdout().lock());

    if count {
        writeln!(out, "{}", answers.count())?;
    } else {
        for answer in answers {
            writeln!(out, "{answer}")?;
        }
    }

    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let opts: Opts = Opts::parse();

    match opts {
        Opts::Stats { recursive, datasets } => {
            let store = load_store(datasets, recursive, JoinSemantics::default())?;

            type BuildHasher = BuildHasherDefault<AHasher>;

            let mut subjects_dedup = HashSet::with_hasher(BuildHasher::default());
            let mut predicates_dedup = HashSet::with_hasher(BuildHasher::default());
            let mut objects_dedup = HashSet::with_hasher(BuildHasher::default());

            for atom in store.atoms() {
                subjects_dedup.insert(atom.subject());
                predicates_dedup.insert(atom.predicate());
                objects_dedup.insert(atom.object());
            }

            let total = store.len();
            let nt = store.dictionary().len();
            let ns = subjects_dedup.len();
            let np = predicates_dedup.len();
            let no = objects_dedup.len();

            println!("number of triples = {total}, number of distinct terms = {nt}, number of distinct subjects = {ns}, number of distinct predicates = {np}, number of distinct objects = {no}");
        },
        Opts::Match { recursive, pattern, count, datasets } => {
            let pattern = parse_pattern(&pattern)?;
            let store = load_store(datasets, recursive, JoinSemantics::default())?;

            tracing::info!(%pattern, "matching pattern...");
            print_answers(store.match_pattern(&pattern), count)?;
        },
        Opts::Query { recursive, center, atoms, projected, join, count, datasets } => {
            let center = parse_variable(&center)?;

            let atoms = atoms
                .iter()
                .map(|atom| parse_pattern(atom))
                .collect::<hexastore::Result<Vec<_>>>()?;

            let projected = if projected.is_empty() {
                vec![center.clone()]
            } else {
                projected
                    .iter()
                    .map(|var| parse_variable(var))
                    .collect::<hexastore::Result<Vec<_>>>()?
            };

            let query = StarQuery::new(center, atoms, projected)?;
            let store = load_store(datasets, recursive, join.into())?;

            tracing::info!(%query, "evaluating star query...");
            print_answers(store.answer(&query), count)?;
        },
    }

    Ok(())
}
