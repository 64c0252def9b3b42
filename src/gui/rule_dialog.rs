/// Add-rule dialog — pick a match key and a color or shape for it
///
/// The dialog edits the model's modal session only through the actions it
/// returns; the app applies them to the controller.

use egui::color_picker::{color_edit_button_srgba, Alpha};

use crate::engine::classify::{ShapeKind, TableKind};
use crate::engine::controller::{ClassificationAxis, ModalSession};
use super::theme::{color32_to_hex, hex_to_color32};

/// Actions from the rule dialog
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDialogAction {
    None,
    ChangeAxis(ClassificationAxis),
    SelectKey(String),
    SelectColor(String),
    SelectShape(ShapeKind),
    Confirm,
    Cancel,
}

/// Axis selector shared by the dialog and the side panel
pub fn axis_combo(ui: &mut egui::Ui, id: &str, current: ClassificationAxis) -> Option<ClassificationAxis> {
    let mut selected = current;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.label())
        .show_ui(ui, |ui| {
            for axis in ClassificationAxis::ALL {
                ui.selectable_value(&mut selected, axis, axis.label());
            }
        });
    (selected != current).then_some(selected)
}

/// Show the dialog for an open session. Returns the action taken.
pub fn show_rule_dialog(
    ctx: &egui::Context,
    session: &ModalSession,
    axis: ClassificationAxis,
) -> RuleDialogAction {
    let mut action = RuleDialogAction::None;
    let title = match session.kind {
        TableKind::Color => "🎨 Add Color Rule",
        TableKind::Shape => "◆ Add Shape Rule",
    };

    let mut open = true;
    egui::Window::new(title)
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("rule_dialog_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Classify by");
                    if let Some(new_axis) = axis_combo(ui, "rule_dialog_axis", axis) {
                        action = RuleDialogAction::ChangeAxis(new_axis);
                    }
                    ui.end_row();

                    ui.label("Match value");
                    if session.candidate_keys.is_empty() {
                        ui.label("—");
                    } else {
                        let current = session.selected_key.clone().unwrap_or_default();
                        let mut selected = current.clone();
                        egui::ComboBox::from_id_salt("rule_dialog_key")
                            .selected_text(current.as_str())
                            .show_ui(ui, |ui| {
                                for key in &session.candidate_keys {
                                    ui.selectable_value(&mut selected, key.clone(), key.as_str());
                                }
                            });
                        if selected != current {
                            action = RuleDialogAction::SelectKey(selected);
                        }
                    }
                    ui.end_row();

                    match session.kind {
                        TableKind::Color => {
                            ui.label("Color");
                            let mut color = hex_to_color32(&session.selected_color)
                                .unwrap_or(egui::Color32::GRAY);
                            ui.horizontal(|ui| {
                                if color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
                                    action = RuleDialogAction::SelectColor(color32_to_hex(color));
                                }
                                ui.monospace(session.selected_color.as_str());
                            });
                        }
                        TableKind::Shape => {
                            ui.label("Shape");
                            let mut shape = session.selected_shape;
                            egui::ComboBox::from_id_salt("rule_dialog_shape")
                                .selected_text(shape.label())
                                .show_ui(ui, |ui| {
                                    for kind in ShapeKind::ALL {
                                        ui.selectable_value(&mut shape, kind, kind.label());
                                    }
                                });
                            if shape != session.selected_shape {
                                action = RuleDialogAction::SelectShape(shape);
                            }
                        }
                    }
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.separator();
            ui.horizontal(|ui| {
                let can_confirm = session.selected_key.is_some();
                if ui
                    .add_enabled(can_confirm, egui::Button::new("✅ OK"))
                    .clicked()
                {
                    action = RuleDialogAction::Confirm;
                }
                if ui.button("✖ Cancel").clicked() {
                    action = RuleDialogAction::Cancel;
                }
            });
        });

    if !open {
        action = RuleDialogAction::Cancel;
    }
    action
}
