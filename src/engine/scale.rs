/// Axis scales: ordinal band scale over activity types (x) and a
/// logarithmic scale over concentration (y)

use crate::data::point::Point;

/// Ordinal scale mapping each category to a contiguous band in `[0, width]`
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    width: f64,
    /// Gap between neighbouring bands as a fraction of the step
    padding: f64,
}

impl BandScale {
    pub fn new(domain: Vec<String>, width: f64, padding: f64) -> Self {
        Self {
            domain,
            width,
            padding: padding.clamp(0.0, 0.95),
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Distance between the starts of consecutive bands
    pub fn step(&self) -> f64 {
        if self.domain.is_empty() {
            return self.width;
        }
        self.width / self.domain.len() as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.domain.iter().position(|c| c == category)
    }

    pub fn band_start(&self, category: &str) -> Option<f64> {
        let step = self.step();
        self.index_of(category)
            .map(|i| i as f64 * step + step * self.padding / 2.0)
    }

    pub fn band_center(&self, category: &str) -> Option<f64> {
        self.band_start(category).map(|start| start + self.bandwidth() / 2.0)
    }
}

/// Build the x scale. Categories are kept in first-seen order.
pub fn build_x_scale(points: &[Point], width: f64, padding: f64) -> BandScale {
    let mut domain: Vec<String> = Vec::new();
    for p in points {
        if !domain.iter().any(|c| c == &p.activity_type) {
            domain.push(p.activity_type.clone());
        }
    }
    BandScale::new(domain, width, padding)
}

/// Base-10 logarithmic scale.
///
/// `range.0` is the output for the lower domain bound; with the default
/// `(height, 0)` range larger values map closer to the top of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Extend the domain outward to the enclosing powers of ten
    pub fn nice(mut self) -> Self {
        let (lo, hi) = self.domain;
        self.domain = (
            10f64.powf(lo.log10().floor()),
            10f64.powf(hi.log10().ceil()),
        );
        self
    }

    fn log_span(&self) -> (f64, f64) {
        (self.domain.0.log10(), self.domain.1.log10())
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (l0, l1) = self.log_span();
        let t = (value.log10() - l0) / (l1 - l0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, position: f64) -> f64 {
        let (l0, l1) = self.log_span();
        let t = (position - self.range.0) / (self.range.1 - self.range.0);
        10f64.powf(l0 + t * (l1 - l0))
    }

    /// `count` values spaced evenly in log space, both domain bounds included
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.domain.0],
            _ => {
                let (l0, l1) = self.log_span();
                let last = (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        if i == count - 1 {
                            self.domain.1
                        } else if i == 0 {
                            self.domain.0
                        } else {
                            10f64.powf(l0 + (l1 - l0) * i as f64 / last)
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Build the y scale over all concentrations, or `None` for an empty set.
///
/// A single distinct value is padded one decade each way before rounding so
/// the scale never collapses to a point.
pub fn build_y_scale(points: &[Point], height: f64) -> Option<LogScale> {
    if points.is_empty() {
        return None;
    }
    let (mut lo, mut hi) = points.iter().map(|p| p.concentration_value).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), v| (lo.min(v), hi.max(v)),
    );
    if lo == hi {
        lo /= 10.0;
        hi *= 10.0;
    }
    Some(LogScale::new((lo, hi), (height, 0.0)).nice())
}

const TICK_SIGNIFICANT_DIGITS: i32 = 3;

/// Compact tick label: 3 significant digits with trailing zeros trimmed,
/// switching to exponent form outside `[1e-4, 1e6)`.
pub fn format_tick(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let mut exp = value.abs().log10().floor() as i32;
    let scaled = value / 10f64.powi(exp);
    let factor = 10f64.powi(TICK_SIGNIFICANT_DIGITS - 1);
    let mut mantissa = (scaled * factor).round() / factor;
    if mantissa.abs() >= 10.0 {
        mantissa /= 10.0;
        exp += 1;
    }

    if (-4..6).contains(&exp) {
        let decimals = (TICK_SIGNIFICANT_DIGITS - 1 - exp).max(0) as usize;
        trim_zeros(format!("{:.*}", decimals, mantissa * 10f64.powi(exp)))
    } else {
        let digits = (TICK_SIGNIFICANT_DIGITS - 1) as usize;
        let sign = if exp < 0 { '-' } else { '+' };
        format!(
            "{}e{}{}",
            trim_zeros(format!("{:.*}", digits, mantissa)),
            sign,
            exp.abs()
        )
    }
}

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::point::load;
    use crate::data::point::tests::protein;

    fn points_with(concs: &[(&str, f64)]) -> Vec<Point> {
        load(&[protein("ABL1", "P00519", concs)])
    }

    #[test]
    fn test_x_domain_first_seen_order() {
        let points = points_with(&[("Kd", 1.0), ("IC50", 2.0), ("Kd", 3.0), ("Ki", 4.0)]);
        let x = build_x_scale(&points, 300.0, 0.05);
        assert_eq!(x.domain(), ["Kd", "IC50", "Ki"]);
        assert_eq!(x.step(), 100.0);
        assert!((x.bandwidth() - 95.0).abs() < 1e-9);
        assert!((x.band_start("IC50").unwrap() - 102.5).abs() < 1e-9);
        assert!((x.band_center("IC50").unwrap() - 150.0).abs() < 1e-9);
        assert!(x.band_center("EC50").is_none());
    }

    #[test]
    fn test_bands_stay_inside_range() {
        let points = points_with(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]);
        let x = build_x_scale(&points, 600.0, 0.05);
        for cat in x.domain() {
            let start = x.band_start(cat).unwrap();
            assert!(start >= 0.0);
            assert!(start + x.bandwidth() <= 600.0 + 1e-9);
        }
    }

    #[test]
    fn test_y_domain_nice_rounding() {
        let points = points_with(&[("IC50", 10.0), ("IC50", 100.0), ("IC50", 1000.0)]);
        let y = build_y_scale(&points, 400.0).unwrap();
        let (lo, hi) = y.domain();
        assert!(lo <= 10.0 && hi >= 1000.0);
        let ticks = y.ticks(10);
        assert!((9..=11).contains(&ticks.len()));
        assert_eq!(ticks[0], lo);
        assert_eq!(*ticks.last().unwrap(), hi);
    }

    #[test]
    fn test_y_domain_rounds_outward() {
        let points = points_with(&[("IC50", 5.0), ("IC50", 50.0)]);
        let y = build_y_scale(&points, 400.0).unwrap();
        let (lo, hi) = y.domain();
        assert!((lo - 1.0).abs() < 1e-9);
        assert!((hi - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_y_range_is_inverted() {
        let points = points_with(&[("IC50", 1.0), ("IC50", 100.0)]);
        let y = build_y_scale(&points, 400.0).unwrap();
        assert_eq!(y.range(), (400.0, 0.0));
        assert!((y.scale(1.0) - 400.0).abs() < 1e-9);
        assert!(y.scale(100.0).abs() < 1e-9);
        assert!((y.scale(10.0) - 200.0).abs() < 1e-9);
        assert!(y.scale(50.0) < y.scale(5.0));
        assert!((y.invert(200.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_domain_is_padded() {
        let points = points_with(&[("IC50", 7.0), ("Kd", 7.0)]);
        let y = build_y_scale(&points, 400.0).unwrap();
        let (lo, hi) = y.domain();
        assert!(lo < 7.0 && hi > 7.0);
        let pos = y.scale(7.0);
        assert!(pos.is_finite() && pos > 0.0 && pos < 400.0);
    }

    #[test]
    fn test_empty_points_have_no_y_scale() {
        assert!(build_y_scale(&[], 400.0).is_none());
    }

    #[test]
    fn test_non_positive_concentration_is_not_finite() {
        let points = points_with(&[("IC50", 0.0), ("IC50", 10.0)]);
        let y = build_y_scale(&points, 400.0).unwrap();
        assert!(!y.scale(10.0).is_finite());
    }

    #[test]
    fn test_tick_edge_counts() {
        let y = LogScale::new((1.0, 100.0), (100.0, 0.0));
        assert!(y.ticks(0).is_empty());
        assert_eq!(y.ticks(1), vec![1.0]);
        let three = y.ticks(3);
        assert_eq!(three.len(), 3);
        assert!((three[1] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(10.0), "10");
        assert_eq!(format_tick(1000.0), "1000");
        assert_eq!(format_tick(16.681), "16.7");
        assert_eq!(format_tick(0.5), "0.5");
        assert_eq!(format_tick(0.001234), "0.00123");
        assert_eq!(format_tick(2.0), "2");
        assert_eq!(format_tick(999.7), "1000");
        assert_eq!(format_tick(1.5e7), "1.5e+7");
        assert_eq!(format_tick(2e-5), "2e-5");
        assert_eq!(format_tick(0.0), "0");
    }
}
