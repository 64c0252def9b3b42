/// Point table export (CSV)

use std::path::Path;
use thiserror::Error;

use super::point::Point;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Nothing to export")]
    Empty,
}

const HEADER: &str = "gene_symbol,primary_accession,organism,activity_type,relation,concentration,unit,color,shape,x,y";

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One row per point, with resolved visual attributes and layout position
pub fn points_to_csv(points: &[Point]) -> String {
    let mut out = String::with_capacity(64 * (points.len() + 1));
    out.push_str(HEADER);
    out.push('\n');
    for p in points {
        let fields = [
            csv_field(&p.gene_symbol),
            csv_field(&p.primary_accession),
            csv_field(p.organism.as_deref().unwrap_or("")),
            csv_field(&p.activity_type),
            csv_field(p.relation.as_deref().unwrap_or("")),
            p.concentration_value.to_string(),
            csv_field(p.unit.as_deref().unwrap_or("")),
            csv_field(p.color.as_deref().unwrap_or("")),
            p.shape.map(|s| s.label().to_string()).unwrap_or_default(),
            format!("{:.3}", p.x),
            format!("{:.3}", p.y),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn save_points_csv(path: &Path, points: &[Point]) -> Result<(), ExportError> {
    if points.is_empty() {
        return Err(ExportError::Empty);
    }
    std::fs::write(path, points_to_csv(points))?;
    log::info!("Exported {} points to {}", points.len(), path.display());
    Ok(())
}
