/// Plotted point model and the loader that flattens a compound into points

use serde::{Deserialize, Serialize};

use super::compound::ProteinRecord;
use crate::engine::classify::ShapeKind;

/// One (protein, activity) pair as it appears on the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub organism: Option<String>,
    pub gene_symbol: String,
    pub primary_accession: String,
    pub concentration_value: f64,
    pub activity_type: String,
    /// Measurement qualifier ("=", "<", ">"); display only
    pub relation: Option<String>,
    pub unit: Option<String>,
    /// Resolved hex color, set by classification
    pub color: Option<String>,
    pub shape: Option<ShapeKind>,
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Every string-valued attribute a classification rule can match against.
    ///
    /// The concentration participates in its lexical form, so a rule keyed
    /// "5" matches a point measured at 5.0.
    pub fn attribute_values(&self) -> Vec<String> {
        let mut values = vec![
            self.gene_symbol.clone(),
            self.primary_accession.clone(),
            self.activity_type.clone(),
            self.concentration_value.to_string(),
        ];
        if let Some(organism) = &self.organism {
            values.push(organism.clone());
        }
        if let Some(unit) = &self.unit {
            values.push(unit.clone());
        }
        values
    }

    /// Concentration with relation and unit, e.g. "< 5 nM"
    pub fn concentration_label(&self) -> String {
        let mut out = String::new();
        if let Some(rel) = self.relation.as_deref().filter(|r| !r.is_empty() && *r != "=") {
            out.push_str(rel);
            out.push(' ');
        }
        out.push_str(&self.concentration_value.to_string());
        if let Some(unit) = &self.unit {
            out.push(' ');
            out.push_str(unit);
        }
        out
    }
}

/// Flatten the protein/activity tree into one point per activity record.
///
/// Source order is preserved: proteins first, then each protein's activities.
/// An empty protein list yields an empty point list, which callers treat as
/// the terminal "no data" state.
pub fn load(target_proteins: &[ProteinRecord]) -> Vec<Point> {
    let points: Vec<Point> = target_proteins
        .iter()
        .flat_map(|record| {
            let protein = &record.protein;
            record.activities.iter().map(move |activity| Point {
                organism: protein.organism.as_ref().map(|o| o.name.clone()),
                gene_symbol: protein.symbol.clone(),
                primary_accession: protein.primary_accession.clone(),
                concentration_value: activity.conc,
                activity_type: activity.activity_type.clone(),
                relation: activity.relation.clone(),
                unit: activity.unit.clone(),
                color: None,
                shape: None,
                x: 0.0,
                y: 0.0,
            })
        })
        .collect();

    log::debug!(
        "Flattened {} proteins into {} points",
        target_proteins.len(),
        points.len()
    );
    points
}
