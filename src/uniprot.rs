//! The subset of a UniProtKB JSON entry used by the structural analyses.

use crate::error::{Error, Result};
use indexmap::IndexSet;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniProtEntry {
    pub primary_accession: Option<String>,
    pub sequence: Option<Sequence>,
    pub features: Option<Vec<Feature>>,
    #[serde(default)]
    pub genes: Vec<Gene>,
    pub protein_description: Option<ProteinDescription>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sequence {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    pub location: Location,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Position {
    pub value: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Value {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    pub gene_name: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinDescription {
    pub recommended_name: Option<Name>,
    #[serde(default)]
    pub submission_names: Vec<Name>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    pub full_name: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub cofactors: Vec<CofactorComment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CofactorComment {
    pub name: Option<String>,
    pub cofactor_cross_reference: Option<CrossReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrossReference {
    pub database: String,
    pub id: String,
}

/// UniProt feature types that mark a functional site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    ActiveSite,
    Site,
    BindingSite,
}

impl SiteKind {
    pub fn from_feature_type(kind: &str) -> Option<Self> {
        match kind {
            "Active site" => Some(SiteKind::ActiveSite),
            "Site" => Some(SiteKind::Site),
            "Binding site" => Some(SiteKind::BindingSite),
            _ => None,
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SiteKind::ActiveSite => write!(f, "Active site"),
            SiteKind::Site => write!(f, "Site"),
            SiteKind::BindingSite => write!(f, "Binding site"),
        }
    }
}

/// A functional site spanning residues `start..=end` (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalSite {
    pub kind: SiteKind,
    pub description: String,
    pub start: usize,
    pub end: usize,
}

impl UniProtEntry {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| Error::json(path, e))
    }

    /// Canonical sequence, empty if the entry has none.
    pub fn sequence(&self) -> &str {
        self.sequence.as_ref().map_or("", |s| s.value.as_str())
    }

    /// Features with a known start and end position.
    fn located_features(&self) -> impl Iterator<Item = (&Feature, usize, usize)> {
        self.features
            .iter()
            .flatten()
            .filter_map(|f| Some((f, f.location.start.value?, f.location.end.value?)))
    }

    /// Active sites, binding sites and other sites. `None` when the entry carries
    /// no feature list at all.
    pub fn functional_sites(&self) -> Option<Vec<FunctionalSite>> {
        self.features.as_ref()?;
        Some(
            self.located_features()
                .filter_map(|(f, start, end)| {
                    Some(FunctionalSite {
                        kind: SiteKind::from_feature_type(&f.kind)?,
                        description: f.description.clone(),
                        start,
                        end,
                    })
                })
                .collect(),
        )
    }

    /// Unique `(start, end)` residue pairs of annotated disulfide bonds.
    pub fn annotated_disulfides(&self) -> Vec<(usize, usize)> {
        self.located_features()
            .filter(|(f, _, _)| f.kind == "Disulfide bond")
            .map(|(_, start, end)| (start, end))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// `(name, ChEBI id)` of every annotated cofactor with a ChEBI cross-reference.
    pub fn chebi_cofactors(&self) -> Vec<(&str, &str)> {
        self.comments
            .iter()
            .flat_map(|c| &c.cofactors)
            .filter_map(|c| {
                let xref = c.cofactor_cross_reference.as_ref()?;
                (xref.database == "ChEBI").then_some((c.name.as_deref()?, xref.id.as_str()))
            })
            .collect()
    }

    pub fn gene_name(&self) -> Option<&str> {
        self.genes
            .first()?
            .gene_name
            .as_ref()
            .map(|v| v.value.as_str())
    }

    /// Recommended protein name, falling back to the first submitted name.
    pub fn protein_name(&self) -> Option<&str> {
        let description = self.protein_description.as_ref()?;
        description
            .recommended_name
            .as_ref()
            .or_else(|| description.submission_names.first())
            .map(|n| n.full_name.value.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const ENTRY: &str = r#"{
        "primaryAccession": "Q88QZ0",
        "sequence": {"value": "MCKTLCAW"},
        "genes": [{"geneName": {"value": "gltA"}}],
        "proteinDescription": {
            "submissionNames": [{"fullName": {"value": "Citrate synthase"}}]
        },
        "features": [
            {"type": "Active site", "description": "Proton acceptor",
             "location": {"start": {"value": 3}, "end": {"value": 3}}},
            {"type": "Binding site", "description": "",
             "location": {"start": {"value": 5}, "end": {"value": 6}}},
            {"type": "Disulfide bond", "description": "",
             "location": {"start": {"value": 2}, "end": {"value": 6}}},
            {"type": "Disulfide bond", "description": "",
             "location": {"start": {"value": 2}, "end": {"value": 6}}},
            {"type": "Domain", "description": "CS",
             "location": {"start": {"value": 1}, "end": {"value": 8}}},
            {"type": "Site", "description": "unknown position",
             "location": {"start": {"value": null}, "end": {"value": 4}}}
        ],
        "comments": [
            {"commentType": "FUNCTION", "texts": [{"value": "Citrate synthesis"}]},
            {"commentType": "COFACTOR", "cofactors": [
                {"name": "Fe(2+)",
                 "cofactorCrossReference": {"database": "ChEBI", "id": "CHEBI:29033"}},
                {"name": "NAD(+)",
                 "cofactorCrossReference": {"database": "ChEBI", "id": "CHEBI:57540"}},
                {"name": "Unknown metal"},
                {"name": "Heme",
                 "cofactorCrossReference": {"database": "PubChem", "id": "26945"}}
            ]}
        ]
    }"#;

    #[test]
    fn parse_entry() {
        let entry: UniProtEntry = serde_json::from_str(ENTRY).unwrap();
        assert_eq!(entry.primary_accession.as_deref(), Some("Q88QZ0"));
        assert_eq!(entry.sequence(), "MCKTLCAW");
        assert_eq!(entry.gene_name(), Some("gltA"));
        assert_eq!(entry.protein_name(), Some("Citrate synthase"));
    }

    #[test]
    fn sites_and_disulfides() {
        let entry: UniProtEntry = serde_json::from_str(ENTRY).unwrap();
        let sites = entry.functional_sites().unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].kind, SiteKind::ActiveSite);
        assert_eq!((sites[0].start, sites[0].end), (3, 3));
        assert_eq!(sites[1].kind, SiteKind::BindingSite);

        assert_eq!(entry.annotated_disulfides(), vec![(2, 6)]);
    }

    #[test]
    fn chebi_cofactors() {
        let entry: UniProtEntry = serde_json::from_str(ENTRY).unwrap();
        assert_eq!(
            entry.chebi_cofactors(),
            vec![("Fe(2+)", "CHEBI:29033"), ("NAD(+)", "CHEBI:57540")]
        );
    }

    #[test]
    fn entry_without_features() {
        let entry: UniProtEntry = serde_json::from_str(r#"{"primaryAccession": "P1"}"#).unwrap();
        assert!(entry.functional_sites().is_none());
        assert!(entry.annotated_disulfides().is_empty());
        assert_eq!(entry.sequence(), "");
        assert_eq!(entry.protein_name(), None);
        assert!(entry.chebi_cofactors().is_empty());
    }
}
