use super::enumerate::alternatives;
use super::ident::{GeneId, IdPattern};
use super::parser::parse;
use super::shape::RuleShape;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

/// A multi-subunit protein assembly.
///
/// Members are distinct and kept in the order they were enumerated in;
/// [`Complex::canonical`] gives the order-independent form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Complex {
    members: Vec<GeneId>,
}

impl Complex {
    /// Build a complex from its subunits, dropping repeated identifiers.
    /// Returns `None` when fewer than two distinct subunits remain.
    pub fn new(members: impl IntoIterator<Item = GeneId>) -> Option<Self> {
        let members: Vec<GeneId> = members
            .into_iter()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        (members.len() >= 2).then_some(Self { members })
    }

    pub fn members(&self) -> &[GeneId] {
        &self.members
    }

    /// Members sorted lexicographically.
    pub fn canonical(&self) -> Vec<GeneId> {
        let mut sorted = self.members.clone();
        sorted.sort();
        sorted
    }

    /// Name used for output files: members joined with `-`.
    pub fn name(&self) -> String {
        self.members
            .iter()
            .map(GeneId::as_str)
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Distinct complexes in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexCollection {
    inner: IndexMap<Vec<GeneId>, Complex>,
}

impl ComplexCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a complex unless a permutation of it is already present.
    pub fn insert(&mut self, complex: Complex) -> bool {
        let key = complex.canonical();
        if self.inner.contains_key(&key) {
            return false;
        }
        self.inner.insert(key, complex);
        true
    }

    /// Add an enumerated group. Groups with fewer than two distinct members are discarded.
    pub fn insert_members(&mut self, members: impl IntoIterator<Item = GeneId>) -> bool {
        match Complex::new(members) {
            Some(complex) => self.insert(complex),
            None => false,
        }
    }

    pub fn contains(&self, complex: &Complex) -> bool {
        self.inner.contains_key(&complex.canonical())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Complex> {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<Complex> for ComplexCollection {
    fn from_iter<I: IntoIterator<Item = Complex>>(iter: I) -> Self {
        let mut collection = Self::new();
        for complex in iter {
            collection.insert(complex);
        }
        collection
    }
}

/// Standalone gene products, in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonomerSet {
    inner: IndexSet<GeneId>,
}

impl MonomerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: GeneId) -> bool {
        self.inner.insert(id)
    }

    pub fn contains(&self, id: &GeneId) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneId> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Outcome of processing a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub rule: String,
    pub shape: RuleShape,
    pub n_monomers: usize,
    pub n_complexes: usize,
}

/// Monomers and complexes found across a whole set of rules.
#[derive(Debug, Clone, Default)]
pub struct Assemblies {
    pub monomers: MonomerSet,
    pub complexes: ComplexCollection,
    pub reports: Vec<RuleReport>,
}

impl Assemblies {
    /// Parse `rule`, enumerate its alternatives and merge them into the running sets.
    ///
    /// Alternatives from an `and` node go to the complex collection, which drops
    /// those with fewer than two distinct gene products. The remaining ones are
    /// single identifiers and become monomers.
    pub fn add_rule(&mut self, rule: &str, pattern: &IdPattern) -> &RuleReport {
        let shape = RuleShape::classify(rule);
        let expanded = parse(rule, pattern)
            .map(|expr| alternatives(&expr))
            .unwrap_or_default();
        trace!("Rule {rule:?} ({shape}) expands to {expanded:?}");

        let mut n_monomers = 0;
        let mut n_complexes = 0;
        for alternative in expanded {
            if alternative.conjunctive {
                match Complex::new(alternative.members) {
                    Some(complex) => {
                        n_complexes += 1;
                        self.complexes.insert(complex);
                    }
                    None => trace!("Dropping undersized complex from {rule:?}"),
                }
            } else if let Some(id) = alternative.members.into_iter().next() {
                n_monomers += 1;
                self.monomers.insert(id);
            }
        }

        self.reports.push(RuleReport {
            rule: rule.to_string(),
            shape,
            n_monomers,
            n_complexes,
        });
        &self.reports[self.reports.len() - 1]
    }
}

/// Build the monomer set and complex collection from every rule of a model.
pub fn process_rules<I, S>(rules: I, pattern: &IdPattern) -> Assemblies
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut assemblies = Assemblies::default();
    for rule in rules {
        assemblies.add_rule(rule.as_ref(), pattern);
    }
    debug!(
        "Processed {} rules into {} monomers and {} complexes",
        assemblies.reports.len(),
        assemblies.monomers.len(),
        assemblies.complexes.len()
    );
    assemblies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<GeneId> {
        names.iter().map(|&n| GeneId::from(n)).collect()
    }

    fn complex(names: &[&str]) -> Complex {
        Complex::new(ids(names)).unwrap()
    }

    fn run(rule: &str) -> Assemblies {
        process_rules([rule], &IdPattern::default())
    }

    fn canonical_sets(assemblies: &Assemblies) -> Vec<Vec<GeneId>> {
        assemblies.complexes.iter().map(Complex::canonical).collect()
    }

    #[test]
    fn simple_complex() {
        let res = run("PP_0001 and PP_0002");
        assert!(res.monomers.is_empty());
        assert_eq!(canonical_sets(&res), vec![ids(&["PP_0001", "PP_0002"])]);
    }

    #[test]
    fn variable_subunit_complexes() {
        let res = run("(PP_0001 or PP_0002) and PP_0003");
        assert!(res.monomers.is_empty());
        assert_eq!(
            canonical_sets(&res),
            vec![ids(&["PP_0001", "PP_0003"]), ids(&["PP_0002", "PP_0003"])]
        );
    }

    #[test]
    fn disjunction_of_complexes() {
        let res = run("(PP_0001 and PP_0002) or (PP_0003 and PP_0004)");
        assert!(res.monomers.is_empty());
        assert_eq!(
            canonical_sets(&res),
            vec![ids(&["PP_0001", "PP_0002"]), ids(&["PP_0003", "PP_0004"])]
        );
    }

    #[test]
    fn complex_or_monomer() {
        let res = run("(PP_0001 and PP_0002) or PP_0003");
        assert_eq!(canonical_sets(&res), vec![ids(&["PP_0001", "PP_0002"])]);
        assert_eq!(
            res.monomers.iter().cloned().collect::<Vec<_>>(),
            ids(&["PP_0003"])
        );
    }

    #[test]
    fn rules_without_and_only_yield_monomers() {
        for rule in [
            "PP_0001",
            "PP_0001 or PP_0002",
            "(PP_0001 or pWW0_12) or PP_0003",
        ] {
            let res = run(rule);
            assert!(res.complexes.is_empty(), "{rule}");
            assert!(!res.monomers.is_empty(), "{rule}");
        }
    }

    #[test]
    fn rules_without_or_yield_one_complex_of_every_identifier() {
        let res = run("PP_0001 and (PP_0002 and pWW0_7) and PP_0004");
        assert!(res.monomers.is_empty());
        assert_eq!(res.complexes.len(), 1);
        assert_eq!(
            canonical_sets(&res),
            vec![ids(&["PP_0001", "PP_0002", "PP_0004", "pWW0_7"])]
        );
    }

    #[test]
    fn malformed_identifiers_are_ignored() {
        let res = run("foo123 or PP_0001");
        assert_eq!(
            res.monomers.iter().cloned().collect::<Vec<_>>(),
            ids(&["PP_0001"])
        );

        // The remaining subunit alone is neither a complex nor a monomer
        let res = run("foo123 and PP_0001");
        assert!(res.complexes.is_empty());
        assert!(res.monomers.is_empty());
    }

    #[test]
    fn rules_without_or_never_yield_monomers() {
        for rule in [
            "foo123 and PP_0001",
            "PP_0001 and PP_0001",
            "PP_0001 and",
            "(PP_0001 and bar) and PP_0001",
        ] {
            let res = run(rule);
            assert!(res.monomers.is_empty(), "{rule}");
            assert!(res.complexes.is_empty(), "{rule}");
            assert_eq!(res.reports[0].n_monomers, 0, "{rule}");
        }

        // Only the undersized branch is dropped
        let res = run("(foo123 and PP_0001) or PP_0002");
        assert_eq!(
            res.monomers.iter().cloned().collect::<Vec<_>>(),
            ids(&["PP_0002"])
        );
    }

    #[test]
    fn group_disjunction_with_alternative_monomers() {
        let res = run("(PP_0001 and PP_0002) or (PP_0003 or PP_0004)");
        assert_eq!(canonical_sets(&res), vec![ids(&["PP_0001", "PP_0002"])]);
        assert_eq!(
            res.monomers.iter().cloned().collect::<Vec<_>>(),
            ids(&["PP_0003", "PP_0004"])
        );
        assert_eq!(res.reports[0].shape, RuleShape::GroupDisjunction);
        assert_eq!(res.reports[0].n_complexes, 1);
        assert_eq!(res.reports[0].n_monomers, 2);
    }

    #[test]
    fn dedup_across_permutations() {
        let mut collection = ComplexCollection::new();
        assert!(collection.insert(complex(&["PP_0001", "PP_0002"])));
        assert!(!collection.insert(complex(&["PP_0002", "PP_0001"])));
        assert_eq!(collection.len(), 1);

        // First occurrence wins, enumeration order is kept for naming
        let first = collection.iter().next().unwrap();
        assert_eq!(first.name(), "PP_0001-PP_0002");
    }

    #[test]
    fn dedup_is_idempotent() {
        let collection: ComplexCollection = [
            complex(&["PP_0003", "PP_0001"]),
            complex(&["PP_0001", "PP_0002"]),
            complex(&["PP_0001", "PP_0003"]),
            complex(&["PP_0002", "PP_0001", "PP_0004"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(collection.len(), 3);

        let again: ComplexCollection = collection.iter().cloned().collect();
        assert_eq!(again, collection);
        assert_eq!(
            again.iter().map(Complex::name).collect::<Vec<_>>(),
            collection.iter().map(Complex::name).collect::<Vec<_>>()
        );
    }

    #[test]
    fn undersized_groups_are_discarded() {
        let mut collection = ComplexCollection::new();
        assert!(!collection.insert_members(Vec::new()));
        assert!(!collection.insert_members(ids(&["PP_0001"])));
        assert!(!collection.insert_members(ids(&["PP_0001", "PP_0001"])));
        assert!(collection.is_empty());
    }

    #[test]
    fn monomers_across_rules_are_unique() {
        let res = process_rules(
            [
                "PP_0001 or PP_0002",
                "PP_0002",
                "(PP_0003 and PP_0004) or PP_0001",
                "(PP_0004 and PP_0003) or pWW0_12",
            ],
            &IdPattern::default(),
        );
        assert_eq!(
            res.monomers.iter().cloned().collect::<Vec<_>>(),
            ids(&["PP_0001", "PP_0002", "pWW0_12"])
        );
        assert_eq!(res.complexes.len(), 1);
        assert_eq!(res.reports.len(), 4);
        assert_eq!(res.reports[2].shape, RuleShape::Nested);
        assert_eq!(res.reports[2].n_complexes, 1);
        assert_eq!(res.reports[2].n_monomers, 1);
    }
}
