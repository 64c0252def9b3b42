/// Toolbar — top menu bar with file operations and view options

use std::path::PathBuf;

/// Actions that can be triggered from the toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    OpenFile,
    ExportPoints,
    ExportLog,
    ReplayLog,
    ShowLog,
    ThemeToggle,
    ShowAbout,
}

/// Render the toolbar and return any triggered action
pub fn show_toolbar(ctx: &egui::Context, theme_label: &str, has_chart: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("📁 File", |ui| {
                if ui.button("📂 Open Compound…").clicked() {
                    action = ToolbarAction::OpenFile;
                    ui.close_menu();
                }
                ui.separator();
                if ui
                    .add_enabled(has_chart, egui::Button::new("📄 Export Points…"))
                    .clicked()
                {
                    action = ToolbarAction::ExportPoints;
                    ui.close_menu();
                }
                if ui
                    .add_enabled(has_chart, egui::Button::new("📋 Export Session Log…"))
                    .clicked()
                {
                    action = ToolbarAction::ExportLog;
                    ui.close_menu();
                }
                if ui
                    .add_enabled(has_chart, egui::Button::new("⟲ Replay Session Log…"))
                    .clicked()
                {
                    action = ToolbarAction::ReplayLog;
                    ui.close_menu();
                }
            });

            ui.menu_button("🔍 View", |ui| {
                if ui.button("📋 Session Log").clicked() {
                    action = ToolbarAction::ShowLog;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button(format!("🎨 Theme: {}", theme_label)).clicked() {
                    action = ToolbarAction::ThemeToggle;
                    ui.close_menu();
                }
            });

            ui.menu_button("❓ Help", |ui| {
                if ui.button("ℹ About").clicked() {
                    action = ToolbarAction::ShowAbout;
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(egui::Button::new(
                    egui::RichText::new(theme_label).size(12.0)
                ).corner_radius(12.0)).clicked() {
                    action = ToolbarAction::ThemeToggle;
                }
                ui.separator();
                ui.label(
                    egui::RichText::new("Compound Activity Chart")
                        .color(egui::Color32::from_rgb(0x70, 0x75, 0x80))
                        .size(12.0),
                );
            });
        });
    });

    action
}

/// Show file-open dialog for compound documents
pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Compound Activity Data")
        .add_filter("JSON", &["json"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

/// Show save dialog for the point table
pub fn save_points_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Chart Points")
        .set_file_name(default_name)
        .add_filter("CSV (comma-separated)", &["csv"])
        .save_file()
}

/// Show save dialog for log export
pub fn save_log_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Session Log")
        .add_filter("Text File", &["txt"])
        .add_filter("JSON", &["json"])
        .save_file()
}

/// Show file-open dialog for a JSON session log to replay
pub fn open_log_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Replay Session Log")
        .add_filter("JSON", &["json"])
        .pick_file()
}
