use eframe::egui::{Color32, RichText, Ui, Vec2b};
use egui_plot::{MarkerShape, Plot, PlotBounds, PlotPoints, Points};

use crate::config::PlotConfig;
use crate::data::model::SampleSet;
use crate::label::render_math;
use crate::state::AppState;

/// The one scatter series handed to the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PortraitSeries {
    /// `[z, v]` in file order.
    pub points: Vec<[f64; 2]>,
    pub radius: f32,
    pub color: Color32,
}

/// `marker_size` is a diameter, egui wants a radius.
pub fn portrait_series(samples: &SampleSet, config: &PlotConfig) -> PortraitSeries {
    let [r, g, b] = config.marker_color;
    PortraitSeries {
        points: samples.points(),
        radius: config.marker_size / 2.0,
        color: Color32::from_rgb(r, g, b),
    }
}

// ---------------------------------------------------------------------------
// Portrait plot (central panel)
// ---------------------------------------------------------------------------

/// Render the `(z, v)` scatter plot in the central panel.
pub fn portrait_plot(ui: &mut Ui, state: &mut AppState) {
    let reset = std::mem::take(&mut state.reset_view);
    let bounds = state.view_bounds();

    let samples = match &state.samples {
        Some(s) => s,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a portrait file to view samples  (File → Open…)");
            });
            return;
        }
    };

    let cfg = &state.config;
    let series = portrait_series(samples, cfg);

    let points = Points::new(PlotPoints::from(series.points))
        .shape(MarkerShape::Circle)
        .filled(true)
        .radius(series.radius)
        .color(series.color);

    Plot::new("portrait_plot")
        .x_axis_label(RichText::new(render_math(&cfg.x_label)).italics())
        .y_axis_label(RichText::new(render_math(&cfg.y_label)).italics())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(points);

            if reset {
                match bounds {
                    Some(view) => plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [view.x[0], view.y[0]],
                        [view.x[1], view.y[1]],
                    )),
                    None => plot_ui.set_auto_bounds(Vec2b::new(true, true)),
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::data::loader::parse_samples;

    fn three_samples() -> SampleSet {
        parse_samples(std::io::Cursor::new("# header\n0 0.0 1.0\n1 0.5 0.9\n2 1.0 0.0\n")).unwrap()
    }

    #[test]
    fn series_keeps_file_order() {
        let series = portrait_series(&three_samples(), &Preset::Portrait.config());
        assert_eq!(series.points, vec![[0.0, 1.0], [0.5, 0.9], [1.0, 0.0]]);
        assert_eq!(series.color, Color32::from_rgb(0x1f, 0x77, 0xb4));
    }

    #[test]
    fn radius_is_half_the_marker_size() {
        let samples = three_samples();
        assert_eq!(portrait_series(&samples, &Preset::Portrait.config()).radius, 0.4);
        assert_eq!(portrait_series(&samples, &Preset::Zoomed.config()).radius, 0.2);
    }

    #[test]
    fn empty_set_gives_empty_series() {
        let series = portrait_series(&SampleSet::default(), &PlotConfig::default());
        assert!(series.points.is_empty());
    }
}
