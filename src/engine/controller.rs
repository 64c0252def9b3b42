/// Chart model and interaction controller
///
/// Owns the point set, scales, bins, rule tables and toggles, and drives the
/// add-rule dialog through `Idle → ModalOpen → Idle`. Every mutation leaves
/// the points fully positioned and classified, so the view only has to read.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;

use crate::data::compound::CompoundRecord;
use crate::data::point::{self, Point};
use crate::log::session::{Edit, SessionLog};
use super::binning::{self, Bucket};
use super::classify::{self, ColorTable, ShapeKind, ShapeTable, TableKind, DEFAULT_KEY};
use super::config::{is_hex_color, ChartConfig};
use super::layout;
use super::scale::{self, BandScale, LogScale};

/// Point attribute offered as candidate match keys in the rule dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationAxis {
    Accession,
    GeneSymbol,
    ActivityType,
}

impl ClassificationAxis {
    pub const ALL: [ClassificationAxis; 3] = [
        ClassificationAxis::Accession,
        ClassificationAxis::GeneSymbol,
        ClassificationAxis::ActivityType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClassificationAxis::Accession => "Accession",
            ClassificationAxis::GeneSymbol => "Gene symbol",
            ClassificationAxis::ActivityType => "Activity type",
        }
    }

    pub fn value_of<'a>(&self, point: &'a Point) -> &'a str {
        match self {
            ClassificationAxis::Accession => &point.primary_accession,
            ClassificationAxis::GeneSymbol => &point.gene_symbol,
            ClassificationAxis::ActivityType => &point.activity_type,
        }
    }
}

/// Ephemeral state of an open add-rule dialog
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSession {
    pub kind: TableKind,
    /// Sorted distinct values of the current axis
    pub candidate_keys: Vec<String>,
    pub selected_key: Option<String>,
    pub selected_color: String,
    pub selected_shape: ShapeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState {
    Idle,
    Open(ModalSession),
}

pub struct ChartModel {
    compound_name: String,
    config: ChartConfig,
    points: Vec<Point>,
    x_scale: BandScale,
    y_scale: LogScale,
    bins: BTreeMap<String, Vec<Bucket>>,
    max_bucket_count: usize,
    colors: ColorTable,
    shapes: ShapeTable,
    jitter_enabled: bool,
    violin_enabled: bool,
    axis: ClassificationAxis,
    modal: ModalState,
    rng: StdRng,
    session_log: SessionLog,
}

impl ChartModel {
    /// Build the chart for a compound. Returns `None` when there is nothing
    /// to plot (the "no data" state).
    pub fn new(compound: &CompoundRecord, config: ChartConfig, rng: StdRng) -> Option<Self> {
        let points = point::load(&compound.target_proteins);
        let y_scale = scale::build_y_scale(&points, config.plot_height)?;
        let x_scale = scale::build_x_scale(&points, config.plot_width, config.band_padding);
        let bins = binning::bin(&points, &y_scale, config.bucket_count);
        let max_bucket_count = binning::max_bucket_count(&bins);

        let session_log = SessionLog::new(&compound.name);

        let mut model = Self {
            compound_name: compound.name.clone(),
            colors: ColorTable::new(config.default_color.clone()),
            shapes: ShapeTable::new(config.default_shape),
            config,
            points,
            x_scale,
            y_scale,
            bins,
            max_bucket_count,
            jitter_enabled: false,
            violin_enabled: false,
            axis: ClassificationAxis::ActivityType,
            modal: ModalState::Idle,
            rng,
            session_log,
        };
        model.relayout();
        model.reclassify();

        log::info!(
            "Chart ready for '{}': {} points, {} activity types, y domain {:?}",
            model.compound_name,
            model.points.len(),
            model.x_scale.domain().len(),
            model.y_scale.domain()
        );
        Some(model)
    }

    // ── Accessors ──

    pub fn compound_name(&self) -> &str {
        &self.compound_name
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn x_scale(&self) -> &BandScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &LogScale {
        &self.y_scale
    }

    #[cfg(test)]
    pub fn bins(&self) -> &BTreeMap<String, Vec<Bucket>> {
        &self.bins
    }

    pub fn color_table(&self) -> &ColorTable {
        &self.colors
    }

    pub fn shape_table(&self) -> &ShapeTable {
        &self.shapes
    }

    pub fn jitter_enabled(&self) -> bool {
        self.jitter_enabled
    }

    pub fn violin_enabled(&self) -> bool {
        self.violin_enabled
    }

    pub fn axis(&self) -> ClassificationAxis {
        self.axis
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.modal, ModalState::Open(_))
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.session_log
    }

    /// Half-violin outline for one category, in scale space
    pub fn violin_outline(&self, category: &str) -> Vec<[f64; 2]> {
        self.bins
            .get(category)
            .map(|buckets| {
                layout::violin_outline(buckets, category, self.max_bucket_count, &self.x_scale, &self.y_scale)
            })
            .unwrap_or_default()
    }

    // ── Derivation ──

    fn relayout(&mut self) {
        layout::position(
            &mut self.points,
            &self.x_scale,
            &self.y_scale,
            self.jitter_enabled,
            self.violin_enabled,
            &mut self.rng,
        );
    }

    fn reclassify(&mut self) {
        classify::classify(&mut self.points, &self.colors, &self.shapes);
    }

    fn candidate_keys(&self, axis: ClassificationAxis) -> Vec<String> {
        self.points
            .iter()
            .map(|p| axis.value_of(p).to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // ── Modal dialog ──

    /// Open the add-rule dialog. Reopening replaces any open session.
    pub fn open_modal(&mut self, kind: TableKind) {
        let candidate_keys = self.candidate_keys(self.axis);
        let selected_key = candidate_keys.first().cloned();
        self.modal = ModalState::Open(ModalSession {
            kind,
            candidate_keys,
            selected_key,
            selected_color: self.colors.default_value().clone(),
            selected_shape: *self.shapes.default_value(),
        });
        log::debug!("Opened {} rule dialog on axis {}", kind, self.axis.label());
    }

    /// Switch the classification axis; refreshes the candidates of an open dialog
    pub fn change_axis(&mut self, axis: ClassificationAxis) {
        self.axis = axis;
        let candidates = match &self.modal {
            ModalState::Open(_) => self.candidate_keys(axis),
            ModalState::Idle => return,
        };
        if let ModalState::Open(session) = &mut self.modal {
            let keep = session
                .selected_key
                .as_ref()
                .is_some_and(|k| candidates.contains(k));
            if !keep {
                session.selected_key = candidates.first().cloned();
            }
            session.candidate_keys = candidates;
        }
    }

    pub fn select_key(&mut self, key: &str) {
        if let ModalState::Open(session) = &mut self.modal {
            session.selected_key = Some(key.to_string());
        }
    }

    pub fn select_color(&mut self, hex: &str) {
        if let ModalState::Open(session) = &mut self.modal {
            session.selected_color = hex.to_string();
        }
    }

    pub fn select_shape(&mut self, shape: ShapeKind) {
        if let ModalState::Open(session) = &mut self.modal {
            session.selected_shape = shape;
        }
    }

    /// Apply the dialog's rule and close it. Returns whether a rule was added.
    pub fn confirm(&mut self) -> bool {
        let ModalState::Open(session) = std::mem::replace(&mut self.modal, ModalState::Idle) else {
            return false;
        };
        let Some(key) = session.selected_key else {
            log::warn!("Rule dialog confirmed without a match key; nothing added");
            return false;
        };

        let edit = match session.kind {
            TableKind::Color => Edit::ColorRule {
                key,
                color: session.selected_color,
            },
            TableKind::Shape => Edit::ShapeRule {
                key,
                shape: session.selected_shape,
            },
        };
        self.apply(edit);
        true
    }

    pub fn cancel(&mut self) {
        if self.is_modal_open() {
            self.modal = ModalState::Idle;
            log::debug!("Rule dialog cancelled");
        }
    }

    // ── Rule table and toggles ──

    /// Delete a rule row. The Default row cannot be removed.
    pub fn remove_rule_row(&mut self, kind: TableKind, key: &str) -> bool {
        self.apply(Edit::RemoveRule {
            table: kind,
            key: key.to_string(),
        })
    }

    pub fn toggle_jitter(&mut self) {
        self.apply(Edit::Jitter {
            enabled: !self.jitter_enabled,
        });
    }

    /// Violin visibility only changes the layout; bins are already current.
    pub fn toggle_violin(&mut self) {
        self.apply(Edit::Violin {
            enabled: !self.violin_enabled,
        });
    }

    /// Apply one edit and record it. Returns false, recording nothing, when
    /// the edit changes nothing or carries a color that is not "#rrggbb".
    pub fn apply(&mut self, edit: Edit) -> bool {
        let changed = match &edit {
            Edit::ColorRule { color, .. } if !is_hex_color(color) => {
                log::warn!("Skipping edit with unusable color: {}", edit);
                false
            }
            Edit::ColorRule { key, color } => {
                self.colors.add_rule(key, color.to_ascii_lowercase());
                self.reclassify();
                true
            }
            Edit::ShapeRule { key, shape } => {
                self.shapes.add_rule(key, *shape);
                self.reclassify();
                true
            }
            Edit::RemoveRule { key, .. } if key == DEFAULT_KEY => false,
            Edit::RemoveRule { table, key } => {
                let removed = match table {
                    TableKind::Color => self.colors.remove_rule(key),
                    TableKind::Shape => self.shapes.remove_rule(key),
                };
                if removed {
                    self.reclassify();
                }
                removed
            }
            Edit::Jitter { enabled } => {
                let changed = self.jitter_enabled != *enabled;
                self.jitter_enabled = *enabled;
                if changed {
                    self.relayout();
                }
                changed
            }
            Edit::Violin { enabled } => {
                let changed = self.violin_enabled != *enabled;
                self.violin_enabled = *enabled;
                if changed {
                    self.relayout();
                }
                changed
            }
        };
        if changed {
            self.session_log.record(edit);
        }
        changed
    }

    /// Re-apply a saved session's edits in order. Returns how many took effect.
    pub fn replay(&mut self, saved: &SessionLog) -> usize {
        if saved.compound != self.compound_name {
            log::warn!(
                "Replaying edits recorded on '{}' onto '{}'",
                saved.compound,
                self.compound_name
            );
        }
        let applied = saved
            .edits
            .iter()
            .filter(|record| self.apply(record.edit.clone()))
            .count();
        log::info!("Replayed {} of {} edits", applied, saved.len());
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::compound::{ActivityRecord, Protein, ProteinRecord};
    use crate::data::point::tests::protein;
    use rand::SeedableRng;

    fn compound(proteins: Vec<ProteinRecord>) -> CompoundRecord {
        CompoundRecord {
            name: "test-compound".to_string(),
            target_proteins: proteins,
        }
    }

    fn model_for(proteins: Vec<ProteinRecord>) -> ChartModel {
        ChartModel::new(&compound(proteins), ChartConfig::default(), StdRng::seed_from_u64(1))
            .expect("chart should initialise")
    }

    fn sample_model() -> ChartModel {
        model_for(vec![
            protein("ABL1", "P00519", &[("IC50", 5.0), ("Kd", 2.0)]),
            protein("KIT", "P10721", &[("IC50", 50.0)]),
        ])
    }

    #[test]
    fn test_end_to_end_two_proteins() {
        let record = |symbol: &str, accession: &str, conc: f64| ProteinRecord {
            protein: Protein {
                symbol: symbol.to_string(),
                primary_accession: accession.to_string(),
                organism: None,
            },
            activities: vec![ActivityRecord {
                activity_type: "IC50".to_string(),
                conc,
                relation: None,
                unit: Some("nM".to_string()),
            }],
        };
        let mut model = model_for(vec![record("A", "PA", 5.0), record("B", "PB", 50.0)]);

        assert_eq!(model.points().len(), 2);
        assert_eq!(model.x_scale().domain(), ["IC50"]);
        let (lo, hi) = model.y_scale().domain();
        assert!(lo <= 5.0 && hi >= 50.0);

        let default_color = model.color_table().default_value().clone();
        let default_shape = *model.shape_table().default_value();
        assert!(model
            .points()
            .iter()
            .all(|p| p.color.as_ref() == Some(&default_color) && p.shape == Some(default_shape)));

        model.open_modal(TableKind::Color);
        model.select_key("IC50");
        model.select_color("#e41a1c");
        assert!(model.confirm());
        assert!(model
            .points()
            .iter()
            .all(|p| p.color.as_deref() == Some("#e41a1c")));
    }

    #[test]
    fn test_empty_protein_list_is_no_data() {
        let empty = compound(Vec::new());
        assert!(ChartModel::new(&empty, ChartConfig::default(), StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn test_open_modal_populates_candidates() {
        let mut model = sample_model();
        assert_eq!(model.axis(), ClassificationAxis::ActivityType);
        model.open_modal(TableKind::Shape);
        let ModalState::Open(session) = model.modal() else {
            panic!("modal should be open");
        };
        assert_eq!(session.kind, TableKind::Shape);
        assert_eq!(session.candidate_keys, vec!["IC50", "Kd"]);
        assert_eq!(session.selected_key.as_deref(), Some("IC50"));
        assert_eq!(session.selected_shape, ShapeKind::Circle);
    }

    #[test]
    fn test_change_axis_recomputes_candidates() {
        let mut model = sample_model();
        model.open_modal(TableKind::Color);
        model.change_axis(ClassificationAxis::Accession);
        let ModalState::Open(session) = model.modal() else {
            panic!("modal should be open");
        };
        assert_eq!(session.candidate_keys, vec!["P00519", "P10721"]);
        assert_eq!(session.selected_key.as_deref(), Some("P00519"));
        assert!(model.is_modal_open());
    }

    #[test]
    fn test_change_axis_while_idle_only_stores_axis() {
        let mut model = sample_model();
        model.change_axis(ClassificationAxis::GeneSymbol);
        assert_eq!(model.axis(), ClassificationAxis::GeneSymbol);
        assert_eq!(*model.modal(), ModalState::Idle);
        model.open_modal(TableKind::Color);
        let ModalState::Open(session) = model.modal() else {
            panic!("modal should be open");
        };
        assert_eq!(session.candidate_keys, vec!["ABL1", "KIT"]);
    }

    #[test]
    fn test_cancel_discards_session() {
        let mut model = sample_model();
        let before = model.color_table().clone();
        model.open_modal(TableKind::Color);
        model.select_key("Kd");
        model.select_color("#00ff00");
        model.cancel();
        assert_eq!(*model.modal(), ModalState::Idle);
        assert_eq!(*model.color_table(), before);
        assert!(model.session_log().is_empty());
    }

    #[test]
    fn test_confirm_shape_rule_reclassifies() {
        let mut model = sample_model();
        model.change_axis(ClassificationAxis::GeneSymbol);
        model.open_modal(TableKind::Shape);
        model.select_key("KIT");
        model.select_shape(ShapeKind::Triangle);
        assert!(model.confirm());
        assert!(!model.is_modal_open());
        assert_eq!(model.points()[2].shape, Some(ShapeKind::Triangle));
        assert_eq!(model.points()[0].shape, Some(ShapeKind::Circle));
        assert_eq!(model.session_log().len(), 1);
    }

    #[test]
    fn test_confirm_when_idle_does_nothing() {
        let mut model = sample_model();
        assert!(!model.confirm());
        assert_eq!(model.color_table().len(), 1);
    }

    #[test]
    fn test_remove_rule_row() {
        let mut model = sample_model();
        model.open_modal(TableKind::Color);
        model.select_key("Kd");
        model.select_color("#ff7f00");
        model.confirm();
        assert_eq!(model.points()[1].color.as_deref(), Some("#ff7f00"));

        assert!(!model.remove_rule_row(TableKind::Color, DEFAULT_KEY));
        assert_eq!(model.color_table().len(), 2);

        assert!(model.remove_rule_row(TableKind::Color, "Kd"));
        assert_eq!(model.color_table().len(), 1);
        assert_eq!(model.points()[1].color.as_deref(), Some("#4682b4"));
    }

    #[test]
    fn test_toggles_relayout() {
        let mut model = sample_model();
        let center = model.x_scale().band_center("IC50").unwrap();
        assert!(model.points().iter().filter(|p| p.activity_type == "IC50").all(|p| p.x == center));

        model.toggle_violin();
        assert!(model.violin_enabled());
        assert!(model.points().iter().filter(|p| p.activity_type == "IC50").all(|p| p.x < center));

        model.toggle_violin();
        model.toggle_jitter();
        assert!(model.jitter_enabled());
        let quarter = model.x_scale().bandwidth() / 4.0;
        assert!(model
            .points()
            .iter()
            .filter(|p| p.activity_type == "IC50")
            .all(|p| (p.x - center).abs() <= quarter + 1e-9));
        assert_eq!(model.session_log().len(), 3);
    }

    #[test]
    fn test_violin_toggle_keeps_bins() {
        let mut model = sample_model();
        let bins = model.bins().clone();
        model.toggle_violin();
        assert_eq!(*model.bins(), bins);
        assert!(!model.violin_outline("IC50").is_empty());
        assert!(model.violin_outline("EC50").is_empty());
    }

    #[test]
    fn test_replay_rebuilds_rules_and_toggles() {
        let mut original = sample_model();
        original.change_axis(ClassificationAxis::GeneSymbol);
        original.open_modal(TableKind::Color);
        original.select_key("KIT");
        original.select_color("#E41A1C");
        original.confirm();
        original.open_modal(TableKind::Shape);
        original.select_key("ABL1");
        original.select_shape(ShapeKind::Diamond);
        original.confirm();
        original.toggle_violin();
        original.remove_rule_row(TableKind::Shape, "ABL1");

        let json = serde_json::to_string(original.session_log()).unwrap();
        let saved: SessionLog = serde_json::from_str(&json).unwrap();

        let mut copy = sample_model();
        assert_eq!(copy.replay(&saved), 4);
        assert_eq!(copy.color_table(), original.color_table());
        assert_eq!(copy.shape_table(), original.shape_table());
        assert!(copy.violin_enabled());
        assert_eq!(copy.points()[2].color.as_deref(), Some("#e41a1c"));
        assert_eq!(copy.session_log().len(), 4);
    }

    #[test]
    fn test_apply_skips_no_ops_and_bad_colors() {
        let mut model = sample_model();
        assert!(!model.apply(Edit::Jitter { enabled: false }));
        assert!(!model.apply(Edit::ColorRule {
            key: "KIT".to_string(),
            color: "steelblue".to_string(),
        }));
        assert!(!model.apply(Edit::RemoveRule {
            table: TableKind::Color,
            key: "nothing".to_string(),
        }));
        assert_eq!(model.color_table().len(), 1);
        assert!(model.session_log().is_empty());
    }
}
