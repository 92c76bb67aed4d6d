use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{vec2, Color32, RichText, Stroke, Ui};
use egui_plot::{Corner, Legend, MarkerShape, Plot, PlotPoint, Points, Polygon, Text};

use crate::data::filter::{PieChart, SiteSelection};
use crate::state::AppState;

/// Outer-arc vertices per full turn of the donut.
const ARC_RESOLUTION: usize = 180;

/// Slices narrower than this get no percentage label.
const MIN_LABEL_FRACTION: f64 = 0.03;

// ---------------------------------------------------------------------------
// Donut geometry
// ---------------------------------------------------------------------------

/// One slice of the donut, split into convex quads so `Polygon` fills them correctly.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub fraction: f64,
    /// Angle of the slice centre, radians.
    pub mid_angle: f64,
    pub quads: Vec<[[f64; 2]; 4]>,
}

impl Wedge {
    /// Whether the slice is wide enough to carry its percentage label.
    pub fn has_label(&self) -> bool {
        self.fraction >= MIN_LABEL_FRACTION
    }
}

/// Lay out the slices clockwise from 12 o'clock on a unit circle with a hole
/// of radius `hole`.
pub fn donut_wedges(chart: &PieChart, hole: f64) -> Vec<Wedge> {
    let total = chart.total();
    if total == 0 {
        return Vec::new();
    }

    let point = |r: f64, a: f64| [r * a.cos(), r * a.sin()];
    let mut start = FRAC_PI_2;

    chart
        .slices
        .iter()
        .map(|slice| {
            let fraction = slice.count as f64 / total as f64;
            let sweep = fraction * TAU;
            let steps = ((fraction * ARC_RESOLUTION as f64).ceil() as usize).max(1);

            let quads = (0..steps)
                .map(|i| {
                    let a0 = start - sweep * i as f64 / steps as f64;
                    let a1 = start - sweep * (i + 1) as f64 / steps as f64;
                    [point(1.0, a0), point(1.0, a1), point(hole, a1), point(hole, a0)]
                })
                .collect();

            let wedge = Wedge {
                label: slice.label.clone(),
                fraction,
                mid_angle: start - sweep / 2.0,
                quads,
            };
            start -= sweep;
            wedge
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Distribution chart
// ---------------------------------------------------------------------------

/// Render the success distribution as a donut chart.
pub fn pie_plot(ui: &mut Ui, state: &AppState, hole: f64, height: f32) {
    ui.label(RichText::new(&state.pie.title).strong().size(16.0));

    if state.pie.slices.is_empty() {
        ui.allocate_ui(vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No launches for this selection.");
            });
        });
        return;
    }

    // Slices are keyed by site for "All Sites", by landing outcome otherwise.
    let colors = match state.site {
        SiteSelection::All => &state.site_colors,
        SiteSelection::Site(_) => &state.outcome_colors,
    };
    let wedges = donut_wedges(&state.pie, hole);
    let label_radius = (1.0 + hole) / 2.0;

    Plot::new("success_pie_chart")
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .legend(Legend::default().position(Corner::RightTop))
        .show(ui, |plot_ui| {
            for wedge in &wedges {
                let color = colors.color_for(&wedge.label);
                for quad in &wedge.quads {
                    plot_ui.polygon(
                        Polygon::new(quad.to_vec())
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, color))
                            .name(&wedge.label),
                    );
                }

                if !wedge.has_label() {
                    continue;
                }
                let pos = PlotPoint::new(
                    label_radius * wedge.mid_angle.cos(),
                    label_radius * wedge.mid_angle.sin(),
                );
                plot_ui.text(Text::new(
                    pos,
                    RichText::new(format!("{:.1}%", wedge.fraction * 100.0))
                        .color(Color32::WHITE)
                        .strong(),
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation chart
// ---------------------------------------------------------------------------

/// Render payload mass against outcome class, one series per booster category.
pub fn scatter_plot(ui: &mut Ui, state: &AppState, height: f32) {
    ui.label(RichText::new(&state.scatter.title).strong().size(16.0));

    Plot::new("success_payload_scatter_chart")
        .height(height)
        .legend(Legend::default().position(Corner::RightTop))
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_x(state.slider.min)
        .include_x(state.slider.max)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &state.scatter.series {
                let color = state.booster_colors.color_for(&series.category);
                plot_ui.points(
                    Points::new(series.points.clone())
                        .name(&series.category)
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0),
                );
            }
        });
}
