/// Compound document — the nested query result the chart is built from
///
/// Shape: `{ name, targetProteins: [{ protein: {...}, activities: [...] }] }`.
/// The document may also arrive wrapped in a query envelope
/// (`{ "data": { "compound": {...} } }`); both forms are accepted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed compound JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Query result contains no compound")]
    MissingCompound,
}

/// Organism descriptor attached to a protein
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub name: String,
}

/// Protein descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protein {
    pub symbol: String,
    pub primary_accession: String,
    #[serde(default)]
    pub organism: Option<Organism>,
}

/// One bioactivity measurement against a protein
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub conc: f64,
    #[serde(default)]
    pub relation: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A target protein and its measured activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinRecord {
    pub protein: Protein,
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
}

/// Top-level compound object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_proteins: Vec<ProteinRecord>,
}

#[derive(Deserialize)]
struct QueryData {
    compound: Option<CompoundRecord>,
}

#[derive(Deserialize)]
struct QueryEnvelope {
    data: QueryData,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CompoundDocument {
    Envelope(QueryEnvelope),
    Bare(CompoundRecord),
}

impl CompoundRecord {
    /// Parse either a bare compound object or a query envelope
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        match serde_json::from_str::<CompoundDocument>(json)? {
            CompoundDocument::Bare(compound) => Ok(compound),
            CompoundDocument::Envelope(env) => env.data.compound.ok_or(LoadError::MissingCompound),
        }
    }

    /// Total number of activity records across all proteins
    pub fn activity_count(&self) -> usize {
        self.target_proteins.iter().map(|p| p.activities.len()).sum()
    }
}

/// Read and parse a compound file from disk
pub fn load_compound_file(path: &Path) -> Result<CompoundRecord, LoadError> {
    let text = fs::read_to_string(path)?;
    let compound = CompoundRecord::from_json_str(&text)?;
    log::info!(
        "Loaded compound '{}' from {}: {} proteins, {} activities",
        compound.name,
        path.display(),
        compound.target_proteins.len(),
        compound.activity_count()
    );
    Ok(compound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{
        "name": "imatinib",
        "targetProteins": [
            {
                "protein": {
                    "symbol": "ABL1",
                    "primaryAccession": "P00519",
                    "organism": { "name": "Homo sapiens" }
                },
                "activities": [
                    { "type": "IC50", "conc": 25.0, "relation": "=", "unit": "nM" },
                    { "type": "Kd", "conc": 1.1, "relation": "=", "unit": "nM" }
                ]
            },
            {
                "protein": { "symbol": "KIT", "primaryAccession": "P10721" },
                "activities": [ { "type": "IC50", "conc": 100 } ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_bare_compound() {
        let compound = CompoundRecord::from_json_str(BARE).unwrap();
        assert_eq!(compound.name, "imatinib");
        assert_eq!(compound.target_proteins.len(), 2);
        assert_eq!(compound.activity_count(), 3);

        let abl = &compound.target_proteins[0];
        assert_eq!(abl.protein.primary_accession, "P00519");
        assert_eq!(abl.protein.organism.as_ref().unwrap().name, "Homo sapiens");
        assert_eq!(abl.activities[1].activity_type, "Kd");

        let kit = &compound.target_proteins[1];
        assert!(kit.protein.organism.is_none());
        assert!(kit.activities[0].unit.is_none());
        assert!(kit.activities[0].relation.is_none());
    }

    #[test]
    fn test_parse_query_envelope() {
        let json = format!(r#"{{ "data": {{ "compound": {} }} }}"#, BARE);
        let compound = CompoundRecord::from_json_str(&json).unwrap();
        assert_eq!(compound.name, "imatinib");
        assert_eq!(compound.target_proteins.len(), 2);
    }

    #[test]
    fn test_envelope_without_compound() {
        let err = CompoundRecord::from_json_str(r#"{ "data": { "compound": null } }"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingCompound));
    }

    #[test]
    fn test_empty_protein_list_is_not_an_error() {
        let compound =
            CompoundRecord::from_json_str(r#"{ "name": "aspirin", "targetProteins": [] }"#).unwrap();
        assert!(compound.target_proteins.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = CompoundRecord::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
