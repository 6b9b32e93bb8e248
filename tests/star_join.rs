use hexastore::{HexaStore, JoinSemantics, StarQuery, Substitution, Term, TripleAtom, Variable};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::{BTreeMap, HashSet};

const NODES: [&str; 6] = ["<n0>", "<n1>", "<n2>", "<n3>", "<n4>", "<n5>"];
const PREDICATES: [&str; 3] = ["<p0>", "<p1>", "<p2>"];

fn random_facts(rng: &mut SmallRng, n: usize) -> Vec<TripleAtom> {
    (0..n)
        .map(|_| {
            TripleAtom::new(
                Term::constant(NODES.choose(rng).unwrap()),
                Term::constant(PREDICATES.choose(rng).unwrap()),
                Term::constant(NODES.choose(rng).unwrap()),
            )
        })
        .collect()
}

/// A star query around `?x`. With `same_variables` every atom binds only `?x`.
fn random_star_query(rng: &mut SmallRng, same_variables: bool) -> StarQuery {
    let n_atoms = rng.gen_range(1..=3);

    let atoms = (0..n_atoms)
        .map(|ix| {
            let other = if !same_variables && rng.gen_bool(0.5) {
                Term::variable(&format!("y{ix}"))
            } else {
                Term::constant(NODES.choose(rng).unwrap())
            };
            let predicate = Term::constant(PREDICATES.choose(rng).unwrap());

            if rng.gen_bool(0.5) {
                TripleAtom::new(Term::variable("x"), predicate, other)
            } else {
                TripleAtom::new(other, predicate, Term::variable("x"))
            }
        })
        .collect();

    StarQuery::new(Variable::new("x"), atoms, vec![Variable::new("x")]).unwrap()
}

fn naive_match(facts: &[TripleAtom], pattern: &TripleAtom) -> HashSet<Substitution> {
    facts
        .iter()
        .filter_map(|fact| {
            let mut bindings = BTreeMap::new();

            for (term, value) in pattern.terms().iter().zip(fact.terms()) {
                match term {
                    Term::Constant(_) if term != value => return None,
                    Term::Constant(_) => {},
                    Term::Variable(var) => {
                        if let Some(previous) = bindings.insert(var.clone(), value.clone()) {
                            if previous != *value {
                                return None;
                            }
                        }
                    },
                }
            }

            Some(bindings.into_iter().collect())
        })
        .collect()
}

fn naive_star(facts: &[TripleAtom], query: &StarQuery) -> HashSet<Substitution> {
    query.atoms().iter().fold(HashSet::from([Substitution::new()]), |acc, atom| {
        let matches = naive_match(facts, atom);
        acc.iter()
            .flat_map(|left| matches.iter().filter_map(move |right| left.merge(right)))
            .collect()
    })
}

fn answers(store: &HexaStore, query: &StarQuery) -> HashSet<Substitution> {
    store.match_star(query).collect()
}

fn stores(facts: &[TripleAtom]) -> (HexaStore, HexaStore) {
    let mut exact = HexaStore::with_join_semantics(JoinSemantics::Exact);
    exact.load(facts.to_vec()).unwrap();

    let mut shared = HexaStore::with_join_semantics(JoinSemantics::SharedVariables);
    shared.load(facts.to_vec()).unwrap();

    (exact, shared)
}

#[test]
fn single_patterns_agree_with_naive_evaluation() {
    let mut rng = SmallRng::seed_from_u64(7);
    let facts = random_facts(&mut rng, 40);
    let (_, store) = stores(&facts);

    let term = |rng: &mut SmallRng, vocabulary: &[&str], var: &str| {
        if rng.gen_bool(0.5) {
            Term::variable(var)
        } else {
            Term::constant(vocabulary.choose(rng).unwrap())
        }
    };

    for _ in 0..200 {
        let s = term(&mut rng, &NODES, "s");
        let p = term(&mut rng, &PREDICATES, "p");
        let object_var = if rng.gen_bool(0.2) { "s" } else { "o" };
        let o = term(&mut rng, &NODES, object_var);
        let pattern = TripleAtom::new(s, p, o);

        let expected = naive_match(&facts, &pattern);
        let actual: HashSet<_> = store.match_pattern(&pattern).collect();

        assert_eq!(actual, expected, "{pattern}");
    }
}

#[test]
fn shared_variable_join_agrees_with_naive_evaluation() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..20 {
        let facts = random_facts(&mut rng, 30);
        let (_, store) = stores(&facts);

        for _ in 0..25 {
            let query = random_star_query(&mut rng, false);
            assert_eq!(answers(&store, &query), naive_star(&facts, &query), "{query}");
        }
    }
}

#[test]
fn join_semantics_agree_when_atoms_bind_the_same_variables() {
    let mut rng = SmallRng::seed_from_u64(1234);

    for _ in 0..20 {
        let facts = random_facts(&mut rng, 30);
        let (exact, shared) = stores(&facts);

        for _ in 0..25 {
            let query = random_star_query(&mut rng, true);
            assert_eq!(answers(&exact, &query), answers(&shared, &query), "{query}");
        }
    }
}

#[test]
fn exact_join_under_returns_when_variable_sets_differ() {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut diverged = 0;

    for _ in 0..20 {
        let facts = random_facts(&mut rng, 30);
        let (exact, shared) = stores(&facts);

        for _ in 0..25 {
            let query = random_star_query(&mut rng, false);
            let exact_answers = answers(&exact, &query);
            let shared_answers = answers(&shared, &query);

            assert!(exact_answers.is_subset(&shared_answers), "{query}");
            if exact_answers != shared_answers {
                diverged += 1;
            }
        }
    }

    assert!(diverged > 0);

    let facts = vec![
        TripleAtom::new(Term::constant("<s>"), Term::constant("<p1>"), Term::constant("<o1>")),
        TripleAtom::new(Term::constant("<s>"), Term::constant("<p2>"), Term::constant("<o2>")),
    ];
    let (exact, shared) = stores(&facts);
    let query = StarQuery::new(
        Variable::new("x"),
        vec![
            TripleAtom::new(Term::variable("x"), Term::constant("<p1>"), Term::constant("<o1>")),
            TripleAtom::new(Term::variable("x"), Term::constant("<p2>"), Term::variable("y")),
        ],
        vec![Variable::new("x")],
    )
    .unwrap();

    assert!(answers(&exact, &query).is_empty());
    assert_eq!(answers(&shared, &query).len(), 1);
    assert_eq!(shared.answer(&query).collect::<Vec<_>>(), [[(Variable::new("x"), Term::constant("<s>"))]
        .into_iter()
        .collect::<Substitution>()]);
}
