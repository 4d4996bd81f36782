//! Gene-reaction rule processing.
//!
//! Rules such as `(PP_0001 or PP_0002) and PP_0003` are tokenized, parsed into
//! an expression tree and expanded into every monomer and protein complex they
//! describe. Complexes are deduplicated regardless of subunit order.
pub mod assembly;
pub mod enumerate;
pub mod ident;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod shape;

pub use assembly::{process_rules, Assemblies, Complex, ComplexCollection, MonomerSet, RuleReport};
pub use enumerate::{alternatives, enumerate, expand_complexes, Alternative, Group};
pub use ident::{GeneId, IdPattern, DEFAULT_ID_PATTERN};
pub use model::{
    complexes_to_df, monomers_to_df, read_rules, reports_to_df, rules_from_df, DEFAULT_RULE_COLUMN,
};
pub use parser::{parse, Expr};
pub use shape::RuleShape;
