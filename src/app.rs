/// Main application state and eframe::App implementation
///
/// Ties together the chart model, the GUI panels and the session log.

use std::path::{Path, PathBuf};

use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::compound;
use crate::data::export;
use crate::engine::config::ChartConfig;
use crate::engine::controller::{ChartModel, ModalState};
use crate::gui::chart_view;
use crate::gui::control_panel::{self, PanelAction};
use crate::gui::rule_dialog::{self, RuleDialogAction};
use crate::gui::theme::{self, AppTheme, ThemeColors};
use crate::gui::toolbar::{self, ToolbarAction};
use crate::log::session::SessionLog;

/// The main application
pub struct ActivityChartApp {
    /// Chart for the loaded compound; `None` before loading or when the
    /// compound had nothing to plot
    model: Option<ChartModel>,
    /// Name of a loaded compound that produced no points
    empty_compound: Option<String>,

    config: ChartConfig,

    /// Status messages
    status_message: String,
    status_is_error: bool,
    show_log_window: bool,
    show_about: bool,

    /// Current theme
    current_theme: AppTheme,
    theme_colors: ThemeColors,

    /// Dropped files buffer
    dropped_files: Vec<PathBuf>,
}

impl ActivityChartApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ChartConfig, initial_path: Option<PathBuf>) -> Self {
        let default_theme = AppTheme::Light;
        theme::apply_theme(&cc.egui_ctx, default_theme);

        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 5.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        cc.egui_ctx.set_style(style);

        let mut app = Self {
            model: None,
            empty_compound: None,
            config,
            status_message: "Ready. Open a compound activity file to begin".to_string(),
            status_is_error: false,
            show_log_window: false,
            show_about: false,
            current_theme: default_theme,
            theme_colors: ThemeColors::from_theme(default_theme),
            dropped_files: Vec::new(),
        };
        if let Some(path) = initial_path {
            app.load_path(&path);
        }
        app
    }

    fn set_status(&mut self, message: String) {
        self.status_message = message;
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: String) {
        self.status_message = message;
        self.status_is_error = true;
    }

    /// Load a compound file and rebuild the chart. Toggles and rules reset.
    fn load_path(&mut self, path: &Path) {
        self.set_status(format!("Loading: {}…", path.display()));
        let compound = match compound::load_compound_file(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                self.set_error(format!("Load failed: {}", e));
                return;
            }
        };

        let rng = StdRng::from_os_rng();
        match ChartModel::new(&compound, self.config.clone(), rng) {
            Some(model) => {
                self.set_status(format!(
                    "Loaded {}: {} measurements",
                    model.compound_name(),
                    model.points().len()
                ));
                self.model = Some(model);
                self.empty_compound = None;
            }
            None => {
                log::warn!("Compound '{}' has no activity data", compound.name);
                self.set_status(format!("No activity data for {}", compound.name));
                self.model = None;
                self.empty_compound = Some(compound.name);
            }
        }
    }

    /// Apply the edits of a saved JSON session log to the current chart
    fn replay_log(&mut self) {
        let Some(path) = toolbar::open_log_dialog() else {
            return;
        };
        let saved = match SessionLog::load_json(&path) {
            Ok(saved) => saved,
            Err(e) => {
                log::error!("Could not read session log {}: {}", path.display(), e);
                self.set_error(format!("Replay failed: {}", e));
                return;
            }
        };
        if let Some(model) = &mut self.model {
            let applied = model.replay(&saved);
            self.set_status(format!("Replayed {} of {} edits", applied, saved.len()));
        }
    }

    fn open_file(&mut self) {
        if let Some(path) = toolbar::open_file_dialog() {
            self.load_path(&path);
        }
    }

    /// Handle toolbar actions
    fn handle_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::OpenFile => self.open_file(),
            ToolbarAction::ExportPoints => {
                let Some(model) = &self.model else {
                    self.set_error("No chart loaded to export".to_string());
                    return;
                };
                let default_name = format!("{}_activities.csv", model.compound_name());
                if let Some(path) = toolbar::save_points_dialog(&default_name) {
                    match export::save_points_csv(&path, model.points()) {
                        Ok(()) => self.set_status(format!("Points exported: {}", path.display())),
                        Err(e) => {
                            log::error!("Point export failed: {}", e);
                            self.set_error(format!("Export failed: {}", e));
                        }
                    }
                }
            }
            ToolbarAction::ExportLog => {
                if let Some(model) = &self.model {
                    if let Some(path) = toolbar::save_log_dialog() {
                        match model.session_log().save(&path) {
                            Ok(()) => self.set_status(format!("Session log exported: {}", path.display())),
                            Err(e) => {
                                log::error!("Log export failed: {}", e);
                                self.set_error(format!("Log export failed: {}", e));
                            }
                        }
                    }
                }
            }
            ToolbarAction::ReplayLog => self.replay_log(),
            ToolbarAction::ShowLog => self.show_log_window = true,
            ToolbarAction::ThemeToggle => {
                self.current_theme = self.current_theme.next();
                self.theme_colors = ThemeColors::from_theme(self.current_theme);
            }
            ToolbarAction::ShowAbout => self.show_about = true,
            ToolbarAction::None => {}
        }
    }

    fn handle_panel_action(&mut self, action: PanelAction) {
        let Some(model) = &mut self.model else {
            return;
        };
        match action {
            PanelAction::ChangeAxis(axis) => model.change_axis(axis),
            PanelAction::ToggleJitter => model.toggle_jitter(),
            PanelAction::ToggleViolin => model.toggle_violin(),
            PanelAction::OpenRuleDialog(kind) => model.open_modal(kind),
            PanelAction::RemoveRule(kind, key) => {
                if model.remove_rule_row(kind, &key) {
                    self.set_status(format!("Removed {} rule for {}", kind, key));
                }
            }
            PanelAction::None => {}
        }
    }

    fn handle_dialog_action(&mut self, action: RuleDialogAction) {
        let Some(model) = &mut self.model else {
            return;
        };
        match action {
            RuleDialogAction::ChangeAxis(axis) => model.change_axis(axis),
            RuleDialogAction::SelectKey(key) => model.select_key(&key),
            RuleDialogAction::SelectColor(hex) => model.select_color(&hex),
            RuleDialogAction::SelectShape(shape) => model.select_shape(shape),
            RuleDialogAction::Confirm => {
                if model.confirm() {
                    self.set_status("Rule added".to_string());
                }
            }
            RuleDialogAction::Cancel => model.cancel(),
            RuleDialogAction::None => {}
        }
    }
}

impl eframe::App for ActivityChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        theme::apply_theme(ctx, self.current_theme);

        // Handle drag-and-drop
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    self.dropped_files.push(path.clone());
                }
            }
        });
        if let Some(path) = self.dropped_files.pop() {
            self.dropped_files.clear();
            self.load_path(&path);
        }

        // ── Toolbar ──
        let toolbar_action =
            toolbar::show_toolbar(ctx, self.current_theme.label(), self.model.is_some());
        self.handle_toolbar_action(toolbar_action);

        // ── Rule dialog ──
        let dialog_action = match self.model.as_ref().map(|m| (m.modal(), m.axis())) {
            Some((ModalState::Open(session), axis)) => {
                rule_dialog::show_rule_dialog(ctx, session, axis)
            }
            _ => RuleDialogAction::None,
        };
        self.handle_dialog_action(dialog_action);

        // ── Status bar ──
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::new()
                .fill(self.theme_colors.status_bar_bg)
                .inner_margin(egui::Margin::symmetric(12, 4)))
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(&self.status_message)
                        .size(12.0)
                        .color(if self.status_is_error {
                            self.theme_colors.error
                        } else {
                            self.theme_colors.status_text
                        }),
                );
            });

        // ── Control panel ──
        let panel_action = egui::SidePanel::left("control_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        control_panel::show_control_panel(ui, self.model.as_ref(), &self.theme_colors)
                    })
                    .inner
            })
            .inner;
        self.handle_panel_action(panel_action);

        // ── Chart ──
        egui::CentralPanel::default().show(ctx, |ui| match (&self.model, &self.empty_compound) {
            (Some(model), _) => chart_view::show_chart(ui, model, &self.theme_colors),
            (None, Some(name)) => {
                ui.centered_and_justified(|ui| {
                    ui.heading(format!("No activity data for {}", name));
                });
            }
            (None, None) => {
                ui.centered_and_justified(|ui| {
                    ui.heading("No compound loaded");
                });
            }
        });

        // ── Log Window ──
        if self.show_log_window {
            let log_text = self
                .model
                .as_ref()
                .map(|m| m.session_log().to_text())
                .unwrap_or_else(|| "No session yet".to_string());
            egui::Window::new("📋 Session Log")
                .open(&mut self.show_log_window)
                .default_size([600.0, 400.0])
                .resizable(true)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.style_mut().override_font_id = Some(egui::FontId::monospace(12.0));
                        ui.label(log_text);
                    });
                });
        }

        // ── About Dialog ──
        if self.show_about {
            egui::Window::new("About")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("🧪 Compound Activity Chart");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(10.0);
                    ui.label("Built with Rust + egui");
                    ui.add_space(10.0);
                    ui.label("• Concentration vs. activity type scatter");
                    ui.label("• Log-scaled concentration axis");
                    ui.label("• Jitter and violin overlays");
                    ui.label("• Color and shape classification rules");
                });
        }

        // Keyboard shortcuts
        let open_requested = ctx.input(|i| {
            (i.modifiers.ctrl || i.modifiers.command) && i.key_pressed(egui::Key::O)
        });
        if open_requested {
            self.open_file();
        }
        let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if escape {
            if let Some(model) = &mut self.model {
                model.cancel();
            }
        }
    }
}
