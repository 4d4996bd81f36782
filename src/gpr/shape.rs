use std::fmt;

/// Structural shape of a gene-reaction rule, judged from its operators and
/// parenthesis boundaries alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleShape {
    /// No `and`: a single identifier or a list of alternative monomers.
    MonomerList,
    /// `and` without `or`: one fixed complex.
    SimpleComplex,
    /// `and` and `or` with no `) or` / `or (` boundary, e.g. `(A or B) and C`.
    FixedPlusVariable,
    /// Parenthesised groups joined by `) or (`, e.g. `(A and B) or (C and D)`.
    GroupDisjunction,
    /// Anything else, e.g. `(A and B) or C`.
    Nested,
}

impl RuleShape {
    pub fn classify(rule: &str) -> Self {
        // Normalise case and spacing so boundaries are matched regardless of layout
        let normalized = rule
            .to_lowercase()
            .replace('(', " ( ")
            .replace(')', " ) ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let words: Vec<&str> = normalized.split(' ').collect();
        let has_and = words.contains(&"and");
        let has_or = words.contains(&"or");

        if !has_and {
            RuleShape::MonomerList
        } else if !has_or {
            RuleShape::SimpleComplex
        } else if normalized.contains(") or (") {
            RuleShape::GroupDisjunction
        } else if !normalized.contains(") or") && !normalized.contains("or (") {
            RuleShape::FixedPlusVariable
        } else {
            RuleShape::Nested
        }
    }
}

impl fmt::Display for RuleShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuleShape::MonomerList => write!(f, "monomer_list"),
            RuleShape::SimpleComplex => write!(f, "simple_complex"),
            RuleShape::FixedPlusVariable => write!(f, "fixed_plus_variable"),
            RuleShape::GroupDisjunction => write!(f, "group_disjunction"),
            RuleShape::Nested => write!(f, "nested"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_shapes() {
        assert_eq!(RuleShape::classify("PP_0001"), RuleShape::MonomerList);
        assert_eq!(
            RuleShape::classify("PP_0001 or PP_0002"),
            RuleShape::MonomerList
        );
        assert_eq!(
            RuleShape::classify("PP_0001 and PP_0002"),
            RuleShape::SimpleComplex
        );
        assert_eq!(
            RuleShape::classify("(PP_0001 or PP_0002) and PP_0003"),
            RuleShape::FixedPlusVariable
        );
        assert_eq!(
            RuleShape::classify("(PP_0001 and PP_0002) or (PP_0003 and PP_0004)"),
            RuleShape::GroupDisjunction
        );
        assert_eq!(
            RuleShape::classify("(PP_0001 and PP_0002) or PP_0003"),
            RuleShape::Nested
        );
        assert_eq!(
            RuleShape::classify("PP_0003 or (PP_0001 and PP_0002)"),
            RuleShape::Nested
        );
    }

    #[test]
    fn classify_ignores_spacing_and_case() {
        assert_eq!(
            RuleShape::classify("(PP_0001 AND PP_0002)OR(PP_0003 AND PP_0004)"),
            RuleShape::GroupDisjunction
        );
        assert_eq!(RuleShape::classify(""), RuleShape::MonomerList);
    }
}
