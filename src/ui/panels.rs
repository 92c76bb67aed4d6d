use eframe::egui::{self, Color32, RichText, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selector widgets
// ---------------------------------------------------------------------------

/// Render the site selector and payload range selector.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Site selector ----
    ui.strong("Launch site");
    let mut site = state.site.clone();
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(site.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in state.site_options() {
                let label = option.to_string();
                ui.selectable_value(&mut site, option, label);
            }
        });
    state.select_site(site);
    ui.separator();

    // ---- Payload range selector ----
    ui.strong("Payload range (Kg):");
    let slider = state.slider;
    let mut low = state.payload.low;
    let mut high = state.payload.high;

    // Each handle is bounded by the other, so low never passes high.
    ui.add(
        Slider::new(&mut low, slider.min..=high)
            .step_by(slider.step)
            .text("min"),
    );
    ui.add(
        Slider::new(&mut high, low..=slider.max)
            .step_by(slider.step)
            .text("max"),
    );
    state.set_payload_range(low, high);

    if ui.small_button("Reset").clicked() {
        if let Some(bounds) = state.table.as_ref().and_then(|t| t.payload_bounds()) {
            state.set_payload_range(bounds.min, bounds.max);
        }
    }
    ui.separator();

    ui.checkbox(&mut state.show_records, "Show records");
}

// ---------------------------------------------------------------------------
// Records table – rows feeding the correlation chart
// ---------------------------------------------------------------------------

pub fn records_table(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        return;
    };
    let records = table.records();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(130.0))
        .column(Column::auto().at_least(130.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in [
                "Flight",
                "Launch Site",
                "Payload (kg)",
                "Landing Outcome",
                "Booster Version",
                "Category",
            ] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let rec = &records[state.visible_indices[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(rec.flight_number.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.launch_site.as_str());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.0}", rec.payload_mass));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(rec.outcome.label())
                            .color(state.outcome_colors.color_for(rec.outcome.label())),
                    );
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.booster_version.as_str());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(&rec.booster_category)
                            .color(state.booster_colors.color_for(&rec.booster_category)),
                    );
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} launches loaded, {} shown",
                table.len(),
                state.visible_indices.len()
            ));
            if let Some(source) = &state.source {
                ui.label(RichText::new(source.display().to_string()).weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => state.set_table(table, Some(path)),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
