/// Control panel — left sidebar with toggles and the two rule tables

use crate::engine::classify::{ShapeKind, TableKind, DEFAULT_KEY};
use crate::engine::controller::{ChartModel, ClassificationAxis};
use super::chart_view::marker_shape;
use super::rule_dialog::axis_combo;
use super::theme::{hex_to_color32, ThemeColors};

/// Actions triggered by the control panel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    None,
    ChangeAxis(ClassificationAxis),
    ToggleJitter,
    ToggleViolin,
    OpenRuleDialog(TableKind),
    RemoveRule(TableKind, String),
}

/// Render the control panel in the left sidebar
pub fn show_control_panel(ui: &mut egui::Ui, model: Option<&ChartModel>, colors: &ThemeColors) -> PanelAction {
    let mut action = PanelAction::None;

    ui.vertical_centered(|ui| {
        ui.heading("⚙️ Chart");
    });
    ui.separator();

    let Some(model) = model else {
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new("Load a compound to begin.")
                .size(12.5)
                .color(colors.text_muted),
        );
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("Drag & drop or File → Open")
                .size(12.0)
                .color(colors.text_muted),
        );
        return action;
    };

    ui.label(egui::RichText::new(model.compound_name()).strong());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.label("Classify by");
        if let Some(axis) = axis_combo(ui, "panel_axis", model.axis()) {
            action = PanelAction::ChangeAxis(axis);
        }
    });

    let mut jitter = model.jitter_enabled();
    if ui.checkbox(&mut jitter, "Jitter points").changed() {
        action = PanelAction::ToggleJitter;
    }
    let mut violin = model.violin_enabled();
    if ui.checkbox(&mut violin, "Show violins").changed() {
        action = PanelAction::ToggleViolin;
    }

    ui.add_space(6.0);
    ui.label(
        egui::RichText::new(format!("{} edits this session", model.session_log().len()))
            .size(11.5)
            .color(colors.text_muted),
    );
    ui.separator();

    // ── Color rules ──
    ui.collapsing(format!("🎨 Color rules ({})", model.color_table().len()), |ui| {
        egui::Grid::new("color_rules")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                for (key, hex) in model.color_table().entries() {
                    let swatch = hex_to_color32(hex).unwrap_or(colors.text_muted);
                    ui.label(egui::RichText::new("⬤").color(swatch));
                    ui.label(format!("{}  {}", key, hex));
                    if key != DEFAULT_KEY && ui.small_button("🗑").on_hover_text("Remove rule").clicked() {
                        action = PanelAction::RemoveRule(TableKind::Color, key.to_string());
                    }
                    ui.end_row();
                }
            });
        if ui.button("➕ Add color rule…").clicked() {
            action = PanelAction::OpenRuleDialog(TableKind::Color);
        }
    });

    // ── Shape rules ──
    ui.collapsing(format!("◆ Shape rules ({})", model.shape_table().len()), |ui| {
        egui::Grid::new("shape_rules")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                for (key, shape) in model.shape_table().entries() {
                    ui.label(shape_glyph(*shape))
                        .on_hover_text(format!("{:?}", marker_shape(*shape)));
                    ui.label(format!("{}  {}", key, shape));
                    if key != DEFAULT_KEY && ui.small_button("🗑").on_hover_text("Remove rule").clicked() {
                        action = PanelAction::RemoveRule(TableKind::Shape, key.to_string());
                    }
                    ui.end_row();
                }
            });
        if ui.button("➕ Add shape rule…").clicked() {
            action = PanelAction::OpenRuleDialog(TableKind::Shape);
        }
    });

    action
}

fn shape_glyph(shape: ShapeKind) -> &'static str {
    match shape {
        ShapeKind::Circle => "●",
        ShapeKind::Cross => "✖",
        ShapeKind::Diamond => "◆",
        ShapeKind::Square => "■",
        ShapeKind::Star => "✱",
        ShapeKind::Triangle => "▲",
        ShapeKind::Wye => "▼",
    }
}
