//! # Theme
//!
//! Dark and light palettes. The active one follows
//! [`ThemeService`](lib_core::ThemeService); both egui styles are installed
//! once at startup and switched with [`Context::set_theme`].

use egui::{Color32, Context, Stroke, Theme as EguiTheme, Visuals};
use lib_core::Severity;

/// Colors the screens draw with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub dark: bool,
    /// Normal text color
    pub normal: Color32,
    /// Headings, selected rows, primary buttons
    pub accent: Color32,
    /// Dimmed/secondary text
    pub dim: Color32,
    pub success: Color32,
    pub error: Color32,
    pub info: Color32,
    pub background: Color32,
    pub border: Color32,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            dark: true,
            normal: Color32::from_rgb(230, 230, 230),
            accent: Color32::from_rgb(153, 69, 255),
            dim: Color32::from_rgb(140, 140, 150),
            success: Color32::from_rgb(20, 241, 149),
            error: Color32::from_rgb(255, 85, 85),
            info: Color32::from_rgb(100, 170, 255),
            background: Color32::from_rgb(18, 18, 24),
            border: Color32::from_rgb(60, 60, 70),
        }
    }

    pub fn light() -> Self {
        Theme {
            dark: false,
            normal: Color32::from_rgb(25, 25, 30),
            accent: Color32::from_rgb(110, 40, 200),
            dim: Color32::from_rgb(110, 110, 120),
            success: Color32::from_rgb(0, 140, 80),
            error: Color32::from_rgb(200, 30, 30),
            info: Color32::from_rgb(30, 100, 200),
            background: Color32::from_rgb(248, 248, 250),
            border: Color32::from_rgb(200, 200, 210),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn severity_color(&self, severity: Severity) -> Color32 {
        match severity {
            Severity::Info => self.info,
            Severity::Success => self.success,
            Severity::Error => self.error,
        }
    }

    pub fn visuals(&self) -> Visuals {
        let mut visuals = if self.dark { Visuals::dark() } else { Visuals::light() };

        visuals.override_text_color = Some(self.normal);
        visuals.panel_fill = self.background;
        visuals.window_fill = self.background;
        visuals.window_stroke = Stroke::new(1.0, self.border);

        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.5, self.accent);
        visuals.widgets.active.bg_stroke = Stroke::new(2.0, self.accent);

        visuals.selection.bg_fill = self.accent.gamma_multiply(0.35);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.info;

        visuals
    }

    /// Install both palettes. Call once after the context is created.
    pub fn install(ctx: &Context) {
        for (egui_theme, theme) in [(EguiTheme::Dark, Self::dark()), (EguiTheme::Light, Self::light())] {
            let visuals = theme.visuals();
            ctx.style_mut_of(egui_theme, |style| {
                style.visuals = visuals.clone();
                style.spacing.item_spacing = egui::Vec2::new(8.0, 6.0);
                style.spacing.button_padding = egui::Vec2::new(10.0, 4.0);
            });
        }
        tracing::debug!("Installed dark and light visuals");
    }

    /// Switch egui to the palette matching `dark`.
    pub fn activate(ctx: &Context, dark: bool) {
        ctx.set_theme(if dark { EguiTheme::Dark } else { EguiTheme::Light });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selects_palette() {
        assert!(Theme::for_mode(true).dark);
        assert!(!Theme::for_mode(false).dark);
        assert_ne!(Theme::dark().background, Theme::light().background);
    }

    #[test]
    fn test_visuals_follow_mode() {
        assert!(Theme::dark().visuals().dark_mode);
        assert!(!Theme::light().visuals().dark_mode);
    }

    #[test]
    fn test_error_notifications_use_error_color() {
        let theme = Theme::light();
        assert_eq!(theme.severity_color(Severity::Error), theme.error);
        assert_eq!(theme.severity_color(Severity::Success), theme.success);
    }
}
