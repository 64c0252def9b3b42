/// Per-category histogram buckets used to size the violin overlays

use std::collections::BTreeMap;

use crate::data::point::Point;
use super::scale::LogScale;

pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// One histogram bucket over `[lower, upper)` (the last bucket is closed)
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub values: Vec<f64>,
}

impl Bucket {
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

/// Bucket every activity type's concentrations against the y scale's ticks.
///
/// Values outside the scale domain land in the nearest end bucket, so each
/// category's bucket counts always add up to its point count.
pub fn bin(points: &[Point], y_scale: &LogScale, bucket_count: usize) -> BTreeMap<String, Vec<Bucket>> {
    let bucket_count = bucket_count.max(1);
    let edges = y_scale.ticks(bucket_count + 1);

    let mut bins: BTreeMap<String, Vec<Bucket>> = BTreeMap::new();
    for point in points {
        let buckets = bins.entry(point.activity_type.clone()).or_insert_with(|| {
            edges
                .windows(2)
                .map(|w| Bucket {
                    lower: w[0],
                    upper: w[1],
                    values: Vec::new(),
                })
                .collect()
        });
        let idx = bucket_index(&edges, point.concentration_value);
        buckets[idx].values.push(point.concentration_value);
    }
    bins
}

fn bucket_index(edges: &[f64], value: f64) -> usize {
    let last = edges.len().saturating_sub(2);
    // Number of edges at or below the value; NaN compares false everywhere
    let at_or_below = edges.partition_point(|&e| e <= value);
    at_or_below.saturating_sub(1).min(last)
}

/// Largest bucket count across all categories, used to normalise widths
pub fn max_bucket_count(bins: &BTreeMap<String, Vec<Bucket>>) -> usize {
    bins.values()
        .flat_map(|buckets| buckets.iter().map(Bucket::count))
        .max()
        .unwrap_or(0)
}
