use regex::Regex;
use std::fmt;

/// Locus tags of the chromosome (`PP_XXXX`) and of the pWW0 plasmid (`pWW0_XXX`).
pub const DEFAULT_ID_PATTERN: &str = r"PP_\d{4}|pWW0_\d+";

/// A single gene product named in a gene-reaction rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneId(String);

impl GeneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier belongs to the pWW0 plasmid rather than the chromosome.
    pub fn is_plasmid(&self) -> bool {
        self.0.starts_with("pWW0")
    }
}

impl From<&str> for GeneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for GeneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lexical shape of a valid identifier. A word is an identifier only when the
/// whole word matches.
///
/// Identifiers are never cut out of longer words: `PP_00011` is rejected, not read as `PP_0001`.
#[derive(Debug, Clone)]
pub struct IdPattern {
    re: Regex,
}

impl IdPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let re = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self { re })
    }

    pub fn is_match(&self, word: &str) -> bool {
        self.re.is_match(word)
    }

    /// Wrap `word` as a [`GeneId`] if it has a valid shape.
    pub fn extract(&self, word: &str) -> Option<GeneId> {
        self.is_match(word).then(|| GeneId::new(word))
    }
}

impl Default for IdPattern {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PATTERN).expect("default identifier pattern is a valid regex")
    }
}
