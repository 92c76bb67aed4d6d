use eframe::egui::{self, RichText};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
    pub config: DashboardConfig,
}

impl LaunchDashApp {
    pub fn new(config: DashboardConfig, state: AppState) -> Self {
        Self { state, config }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selectors ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: records behind the scatter chart ----
        if self.state.show_records && self.state.table.is_some() {
            egui::TopBottomPanel::bottom("records_panel")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    panels::records_table(ui, &self.state);
                });
        }

        // ---- Central panel: heading and both charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(&self.config.title)
                        .size(28.0)
                        .color(egui::Color32::from_rgb(0x50, 0x3D, 0x36)),
                );
            });
            ui.add_space(8.0);

            if self.state.table.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a launch records file  (File → Open…)");
                });
                return;
            }

            let chart_height = ((ui.available_height() - 60.0) / 2.0).max(200.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::pie_plot(ui, &self.state, self.config.donut_hole, chart_height);
                    ui.add_space(8.0);
                    plot::scatter_plot(ui, &self.state, chart_height);
                });
        });
    }
}
