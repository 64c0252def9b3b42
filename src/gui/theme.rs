/// Light and dark themes
///
/// Both start from egui's stock visuals. The chart accent (violin outline)
/// also tints selections and hovered widgets; the remaining chart colors are
/// read back from the resulting visuals.

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppTheme {
    Light,
    Dark,
}

impl AppTheme {
    pub fn label(&self) -> &'static str {
        match self {
            AppTheme::Light => "☀ Light",
            AppTheme::Dark => "🌙 Dark",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AppTheme::Light => AppTheme::Dark,
            AppTheme::Dark => AppTheme::Light,
        }
    }

    fn accent(&self) -> egui::Color32 {
        match self {
            AppTheme::Light => egui::Color32::from_rgb(0x46, 0x82, 0xB4),
            AppTheme::Dark => egui::Color32::from_rgb(0x7A, 0xAE, 0xD6),
        }
    }

    pub fn visuals(&self) -> egui::Visuals {
        let mut visuals = match self {
            AppTheme::Light => egui::Visuals::light(),
            AppTheme::Dark => egui::Visuals::dark(),
        };
        let accent = self.accent();
        visuals.selection.bg_fill = accent.gamma_multiply(0.35);
        visuals.selection.stroke = egui::Stroke::new(1.5, accent);
        visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, accent);
        visuals.hyperlink_color = accent;
        visuals
    }
}

/// Colors the chart, side panel and status bar draw with
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub text_primary: egui::Color32,
    pub text_muted: egui::Color32,
    pub accent: egui::Color32,
    pub error: egui::Color32,

    pub violin_fill: egui::Color32,
    pub violin_stroke: egui::Color32,
    pub band_separator: egui::Color32,
    pub hover_ring: egui::Color32,

    pub status_bar_bg: egui::Color32,
    pub status_text: egui::Color32,
}

impl ThemeColors {
    pub fn from_theme(theme: AppTheme) -> Self {
        let visuals = theme.visuals();
        let accent = theme.accent();
        Self {
            text_primary: visuals.strong_text_color(),
            text_muted: visuals.weak_text_color(),
            accent,
            error: visuals.error_fg_color,
            violin_fill: accent.gamma_multiply(0.2),
            violin_stroke: accent,
            band_separator: visuals.widgets.noninteractive.bg_stroke.color,
            hover_ring: visuals.strong_text_color(),
            status_bar_bg: visuals.extreme_bg_color,
            status_text: visuals.text_color(),
        }
    }
}

pub fn apply_theme(ctx: &egui::Context, theme: AppTheme) {
    ctx.set_visuals(theme.visuals());
}

/// Parse "#rrggbb" (or "rrggbb") into a color
pub fn hex_to_color32(hex: &str) -> Option<egui::Color32> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(egui::Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Format a color as lowercase "#rrggbb"
pub fn color32_to_hex(color: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse() {
        assert_eq!(hex_to_color32("#4682b4"), Some(egui::Color32::from_rgb(0x46, 0x82, 0xB4)));
        assert_eq!(hex_to_color32("FF0000"), Some(egui::Color32::from_rgb(0xFF, 0, 0)));
        assert_eq!(hex_to_color32("#fff"), None);
        assert_eq!(hex_to_color32("#gg0000"), None);
    }

    #[test]
    fn test_chart_colors_follow_accent() {
        for theme in [AppTheme::Light, AppTheme::Dark] {
            let colors = ThemeColors::from_theme(theme);
            assert_eq!(colors.violin_stroke, theme.accent());
            assert_eq!(theme.visuals().selection.stroke.color, colors.accent);
            assert_ne!(colors.violin_fill, colors.violin_stroke);
        }
        let light = ThemeColors::from_theme(AppTheme::Light);
        let dark = ThemeColors::from_theme(AppTheme::Dark);
        assert_ne!(light.status_bar_bg, dark.status_bar_bg);
        assert!(AppTheme::Dark.visuals().dark_mode);
    }

    #[test]
    fn test_hex_format() {
        assert_eq!(color32_to_hex(egui::Color32::from_rgb(0xE4, 0x1A, 0x1C)), "#e41a1c");
    }
}
