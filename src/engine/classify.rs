/// Classification rule tables — map attribute values to point color and shape
///
/// Each table is an ordered list of (match key → visual value) rules plus a
/// reserved "Default" fallback that can be overwritten but never removed.
/// A point takes the value of the first rule whose key equals any of its
/// attribute values.

use serde::{Deserialize, Serialize};

use crate::data::point::Point;

/// Reserved key of the fallback entry
pub const DEFAULT_KEY: &str = "Default";

/// Marker shapes available to shape rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Cross,
    Diamond,
    Square,
    Star,
    Triangle,
    Wye,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Circle,
        ShapeKind::Cross,
        ShapeKind::Diamond,
        ShapeKind::Square,
        ShapeKind::Star,
        ShapeKind::Triangle,
        ShapeKind::Wye,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Cross => "Cross",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Square => "Square",
            ShapeKind::Star => "Star",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Wye => "Wye",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which of the two rule tables an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Color,
    Shape,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Color => write!(f, "color"),
            TableKind::Shape => write!(f, "shape"),
        }
    }
}

/// A single non-default rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<V> {
    pub match_key: String,
    pub value: V,
}

/// Ordered rule table with a protected Default entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationTable<V> {
    default: V,
    rules: Vec<Rule<V>>,
}

/// Hex color strings, e.g. "#4682b4"
pub type ColorTable = ClassificationTable<String>;
pub type ShapeTable = ClassificationTable<ShapeKind>;

impl<V: Clone> ClassificationTable<V> {
    pub fn new(default: V) -> Self {
        Self {
            default,
            rules: Vec::new(),
        }
    }

    pub fn default_value(&self) -> &V {
        &self.default
    }

    /// Number of entries, Default included
    pub fn len(&self) -> usize {
        self.rules.len() + 1
    }

    /// All entries in display order: Default first, then rules as inserted
    pub fn entries(&self) -> impl Iterator<Item = (&str, &V)> {
        std::iter::once((DEFAULT_KEY, &self.default))
            .chain(self.rules.iter().map(|r| (r.match_key.as_str(), &r.value)))
    }

    /// Insert a rule, or overwrite an existing key in place.
    /// Keying "Default" replaces the fallback value.
    pub fn add_rule(&mut self, match_key: &str, value: V) {
        if match_key == DEFAULT_KEY {
            self.default = value;
            return;
        }
        match self.rules.iter_mut().find(|r| r.match_key == match_key) {
            Some(rule) => rule.value = value,
            None => self.rules.push(Rule {
                match_key: match_key.to_string(),
                value,
            }),
        }
    }

    /// Remove a rule. Removing "Default" or an unknown key does nothing.
    pub fn remove_rule(&mut self, match_key: &str) -> bool {
        if match_key == DEFAULT_KEY {
            return false;
        }
        let before = self.rules.len();
        self.rules.retain(|r| r.match_key != match_key);
        self.rules.len() != before
    }

    /// First rule whose key matches any attribute of the point, else Default
    pub fn resolve(&self, point: &Point) -> &V {
        let attributes = point.attribute_values();
        self.rules
            .iter()
            .find(|r| attributes.iter().any(|a| *a == r.match_key))
            .map(|r| &r.value)
            .unwrap_or(&self.default)
    }
}

/// Resolve color and shape for every point
pub fn classify(points: &mut [Point], colors: &ColorTable, shapes: &ShapeTable) {
    for point in points.iter_mut() {
        point.color = Some(colors.resolve(point).clone());
        point.shape = Some(*shapes.resolve(point));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::point::load;
    use crate::data::point::tests::protein;

    fn sample_points() -> Vec<Point> {
        load(&[
            protein("ABL1", "P00519", &[("IC50", 5.0), ("Kd", 2.0)]),
            protein("KIT", "P10721", &[("IC50", 50.0)]),
        ])
    }

    #[test]
    fn test_every_point_resolved() {
        let mut points = sample_points();
        let colors = ColorTable::new("#000000".to_string());
        let mut shapes = ShapeTable::new(ShapeKind::Circle);
        shapes.add_rule("Kd", ShapeKind::Star);
        classify(&mut points, &colors, &shapes);
        assert!(points.iter().all(|p| p.color.is_some() && p.shape.is_some()));
        assert_eq!(points[1].shape, Some(ShapeKind::Star));
        assert_eq!(points[0].shape, Some(ShapeKind::Circle));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let points = sample_points();
        let mut colors = ColorTable::new("#000000".to_string());
        colors.add_rule("KIT", "#ff0000".to_string());
        let first = colors.resolve(&points[2]).clone();
        for _ in 0..5 {
            assert_eq!(colors.resolve(&points[2]), &first);
        }
        assert_eq!(first, "#ff0000");
    }

    #[test]
    fn test_default_cannot_be_removed() {
        let mut colors = ColorTable::new("#000000".to_string());
        colors.add_rule("IC50", "#ff0000".to_string());
        assert!(!colors.remove_rule(DEFAULT_KEY));
        assert_eq!(colors.len(), 2);
        assert_eq!(colors.default_value(), "#000000");

        let mut shapes = ShapeTable::new(ShapeKind::Square);
        assert!(!shapes.remove_rule(DEFAULT_KEY));
        assert_eq!(shapes.len(), 1);
        assert_eq!(*shapes.default_value(), ShapeKind::Square);
    }

    #[test]
    fn test_first_inserted_rule_wins() {
        let points = sample_points();
        let mut colors = ColorTable::new("#000000".to_string());
        colors.add_rule("IC50", "#ff0000".to_string());
        colors.add_rule("ABL1", "#00ff00".to_string());
        // ABL1/IC50 matches both rules; IC50 was inserted first
        assert_eq!(colors.resolve(&points[0]), "#ff0000");
        // ABL1/Kd only matches the symbol rule
        assert_eq!(colors.resolve(&points[1]), "#00ff00");
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let points = sample_points();
        let mut colors = ColorTable::new("#000000".to_string());
        colors.add_rule("IC50", "#ff0000".to_string());
        colors.add_rule("ABL1", "#00ff00".to_string());
        colors.add_rule("IC50", "#0000ff".to_string());
        assert_eq!(colors.len(), 3);
        assert_eq!(colors.resolve(&points[0]), "#0000ff");
        let keys: Vec<&str> = colors.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![DEFAULT_KEY, "IC50", "ABL1"]);
    }

    #[test]
    fn test_remove_rule_falls_back() {
        let points = sample_points();
        let mut colors = ColorTable::new("#000000".to_string());
        colors.add_rule("P10721", "#ff0000".to_string());
        assert_eq!(colors.resolve(&points[2]), "#ff0000");
        assert!(colors.remove_rule("P10721"));
        assert_eq!(colors.resolve(&points[2]), "#000000");
        assert!(!colors.remove_rule("P10721"));
    }

    #[test]
    fn test_default_key_overwrites_fallback() {
        let points = sample_points();
        let mut shapes = ShapeTable::new(ShapeKind::Circle);
        shapes.add_rule(DEFAULT_KEY, ShapeKind::Diamond);
        assert_eq!(shapes.len(), 1);
        assert_eq!(*shapes.resolve(&points[0]), ShapeKind::Diamond);
    }

    #[test]
    fn test_matches_any_attribute() {
        let points = sample_points();
        let mut colors = ColorTable::new("#000000".to_string());
        colors.add_rule("Homo sapiens", "#123456".to_string());
        assert!(points.iter().all(|p| colors.resolve(p) == "#123456"));

        // Lexical concentration collision
        let mut shapes = ShapeTable::new(ShapeKind::Circle);
        shapes.add_rule("50", ShapeKind::Wye);
        assert_eq!(*shapes.resolve(&points[2]), ShapeKind::Wye);
        assert_eq!(*shapes.resolve(&points[0]), ShapeKind::Circle);
    }
}
