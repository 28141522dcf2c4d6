use eframe::egui::{self, TextStyle};

use crate::config::{FontConfig, FontFamily};
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PortraitApp {
    pub state: AppState,
}

impl PortraitApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        apply_font(&cc.egui_ctx, &state.config.font);
        Self { state }
    }
}

impl eframe::App for PortraitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: view settings ----
        egui::SidePanel::left("view_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::portrait_plot(ui, &mut self.state);
        });
    }
}

/// Use one font size and family for all text, like a plotting rc file.
pub fn apply_font(ctx: &egui::Context, font: &FontConfig) {
    let family = match font.family {
        FontFamily::SansSerif => egui::FontFamily::Proportional,
        FontFamily::Monospace => egui::FontFamily::Monospace,
    };
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            let scale = match text_style {
                TextStyle::Heading => 1.25,
                TextStyle::Small => 0.7,
                _ => 1.0,
            };
            font_id.size = font.size * scale;
            if *text_style != TextStyle::Monospace {
                font_id.family = family.clone();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_applies_to_every_text_style() {
        let ctx = egui::Context::default();
        apply_font(&ctx, &FontConfig::default());
        let style = ctx.style();
        for (text_style, font_id) in &style.text_styles {
            let expected = match text_style {
                TextStyle::Heading => 25.0,
                TextStyle::Small => 14.0,
                _ => 20.0,
            };
            assert!((font_id.size - expected).abs() < 1e-4, "{text_style:?}");
            if *text_style != TextStyle::Monospace {
                assert_eq!(font_id.family, egui::FontFamily::Proportional);
            }
        }
    }

    #[test]
    fn monospace_family_switches_proportional_styles() {
        let ctx = egui::Context::default();
        apply_font(
            &ctx,
            &FontConfig {
                size: 12.0,
                family: FontFamily::Monospace,
            },
        );
        let style = ctx.style();
        assert_eq!(
            style.text_styles[&TextStyle::Body],
            egui::FontId::monospace(12.0)
        );
    }
}
