/// Point placement and violin outline geometry
///
/// Positions live in scale space: x in `[0, width]` from the band scale,
/// y in `[height, 0]` from the log scale.

use rand::Rng;

use crate::data::point::Point;
use super::binning::Bucket;
use super::scale::{BandScale, LogScale};

/// Horizontal offset for one point, as a fraction of the bandwidth
fn jitter_fraction<R: Rng + ?Sized>(jitter: bool, violin: bool, rng: &mut R) -> f64 {
    let uniform = |rng: &mut R, lo: f64, hi: f64| lo + (hi - lo) * rng.random::<f64>();
    match (jitter, violin) {
        // Inner half of the band
        (true, false) => uniform(rng, -0.25, 0.25),
        // Left half only; the right half holds the violin
        (true, true) => uniform(rng, -0.45, -0.05),
        (false, true) => -0.25,
        (false, false) => 0.0,
    }
}

/// Assign x/y to every point.
///
/// With both toggles off every point of a category sits on the band center.
pub fn position<R: Rng + ?Sized>(
    points: &mut [Point],
    x_scale: &BandScale,
    y_scale: &LogScale,
    jitter: bool,
    violin: bool,
    rng: &mut R,
) {
    let bandwidth = x_scale.bandwidth();
    for point in points.iter_mut() {
        let center = x_scale.band_center(&point.activity_type).unwrap_or(0.0);
        point.x = center + jitter_fraction(jitter, violin, rng) * bandwidth;
        point.y = y_scale.scale(point.concentration_value);
    }
}

/// Closed outline of the half-violin drawn on the right side of a band.
///
/// Each bucket contributes a vertex at its log-midpoint whose distance from
/// the band center is proportional to `count / max_count`. Returns an empty
/// outline for unknown categories or when there is nothing to draw.
pub fn violin_outline(
    buckets: &[Bucket],
    category: &str,
    max_count: usize,
    x_scale: &BandScale,
    y_scale: &LogScale,
) -> Vec<[f64; 2]> {
    let Some(center) = x_scale.band_center(category) else {
        return Vec::new();
    };
    if buckets.is_empty() || max_count == 0 {
        return Vec::new();
    }

    let half_width = x_scale.bandwidth() / 2.0;
    let first = &buckets[0];
    let last = &buckets[buckets.len() - 1];

    let mut outline = Vec::with_capacity(buckets.len() + 2);
    outline.push([center, y_scale.scale(first.lower)]);
    for bucket in buckets {
        let mid = (bucket.lower * bucket.upper).sqrt();
        let width = half_width * bucket.count() as f64 / max_count as f64;
        outline.push([center + width, y_scale.scale(mid)]);
    }
    outline.push([center, y_scale.scale(last.upper)]);
    outline
}
