pub mod chart_view;
pub mod control_panel;
pub mod rule_dialog;
pub mod theme;
pub mod toolbar;
