use super::ident::GeneId;
use super::parser::Expr;

/// Gene products that are jointly present in one enumerated alternative.
pub type Group = Vec<GeneId>;

/// Expand an expression tree into every alternative set of gene products.
///
/// A leaf is one alternative of one identifier, `or` concatenates the
/// alternatives of its children and `and` takes their cartesian product.
pub fn enumerate(expr: &Expr) -> Vec<Group> {
    match expr {
        Expr::Leaf(id) => vec![vec![id.clone()]],
        Expr::Or(children) => children.iter().flat_map(enumerate).collect(),
        Expr::And(children) => {
            let mut fixed: Vec<Group> = Vec::new();
            let mut variable: Vec<Vec<Group>> = Vec::new();
            for child in children {
                let mut alternatives = enumerate(child);
                match alternatives.len() {
                    0 => {}
                    1 => fixed.extend(alternatives.pop()),
                    _ => variable.push(alternatives),
                }
            }

            // The product of zero axes is handled here, not by `expand_complexes`
            if variable.is_empty() {
                vec![fixed.concat()]
            } else {
                expand_complexes(&fixed, &variable)
            }
        }
    }
}

/// One way of satisfying a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub members: Group,
    /// Produced by an `and` node, so it names the subunits of a complex even
    /// when fewer than two of them survived.
    pub conjunctive: bool,
}

/// Enumerate the top-level alternatives of a rule, tagging those that come
/// from an `and` node.
pub fn alternatives(expr: &Expr) -> Vec<Alternative> {
    let branches = match expr {
        Expr::Or(children) => children.as_slice(),
        other => std::slice::from_ref(other),
    };
    branches
        .iter()
        .flat_map(|branch| {
            let conjunctive = matches!(branch, Expr::And(_));
            enumerate(branch)
                .into_iter()
                .map(move |members| Alternative {
                    members,
                    conjunctive,
                })
        })
        .collect()
}

/// Combine the choices of every variable axis with the fixed subunits.
///
/// Each output group is one element of the cartesian product of `variable`
/// (one option per axis, in axis order) followed by the flattened `fixed`
/// groups. With no variable axes nothing is produced.
pub fn expand_complexes(fixed: &[Group], variable: &[Vec<Group>]) -> Vec<Group> {
    if variable.is_empty() {
        return Vec::new();
    }

    let fixed_flat = fixed.concat();
    let mut product: Vec<Group> = vec![Vec::new()];
    for axis in variable {
        product = product
            .iter()
            .flat_map(|partial| {
                axis.iter().map(move |option| {
                    let mut next = partial.clone();
                    next.extend(option.iter().cloned());
                    next
                })
            })
            .collect();
    }

    for group in &mut product {
        group.extend(fixed_flat.iter().cloned());
    }
    product
}
