use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Ui, vec2};
use egui_extras::{Column, TableBuilder};

use crate::color::token_to_color32;
use crate::data::basemap::BaseLayer;
use crate::data::encode::legend_bands;
use crate::state::{AppState, Dashboard};

// ---------------------------------------------------------------------------
// Left side panel – subject selector and demographic info
// ---------------------------------------------------------------------------

/// Render the subject dropdown and the metadata panel.
pub fn samples_side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Test Subject ID No.");
    ui.separator();

    let names = match &state.samples.dataset {
        Some(ds) => ds.names.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let current = state
        .selected_subject()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let mut picked = None;
    egui::ComboBox::from_id_salt("subject_id")
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for id in &names {
                if ui.selectable_label(current == id.as_str(), id.as_str()).clicked() {
                    picked = Some(id.clone());
                }
            }
        });
    if let Some(id) = picked {
        state.select_subject(&id);
    }

    ui.add_space(8.0);
    ui.strong("Demographic Info");
    ui.separator();

    let Some(view) = &state.samples.view else {
        return;
    };
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for line in &view.metadata_lines {
                ui.label(RichText::new(line.as_str()).strong());
            }
        });
}

// ---------------------------------------------------------------------------
// Left side panel – map layers and legend
// ---------------------------------------------------------------------------

/// Render the base-layer selector, the overlay toggles and the depth legend.
pub fn map_side_panel(ui: &mut Ui, state: &mut AppState) {
    let map = &mut state.map;

    ui.heading("Base layer");
    for layer in BaseLayer::ALL {
        let (min_zoom, max_zoom) = layer.zoom_range();
        ui.radio_value(&mut map.base_layer, layer, layer.name())
            .on_hover_text(format!("{}\nzoom {min_zoom}–{max_zoom}", layer.url_template()));
    }

    ui.separator();
    ui.heading("Overlays");
    ui.checkbox(&mut map.show_plates, "Tectonic Plates");
    ui.checkbox(&mut map.show_quakes, "Earthquake Data");

    ui.separator();
    ui.strong("Depth of Earthquakes (km)");
    TableBuilder::new(ui)
        .column(Column::exact(22.0))
        .column(Column::remainder())
        .body(|mut body| {
            // Deepest band on top, like a colour bar.
            for band in legend_bands().into_iter().rev() {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
                        ui.painter()
                            .rect_filled(rect, 2.0, token_to_color32(band.color));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(band.label());
                    });
                });
            }
        });

    ui.separator();
    if let Some(quakes) = &map.quakes {
        if let Some(title) = &quakes.title {
            ui.label(title.as_str());
        }
        ui.label(format!("{} earthquakes", quakes.len()));
        if let Some(max) = quakes.max_magnitude() {
            ui.label(format!("Largest magnitude: {max}"));
        }
    }
    if let Some(plates) = &map.plates {
        ui.label(format!("{} plate boundary segments", plates.lines.len()));
    }

    ui.add_space(8.0);
    ui.small(map.base_layer.attribution());
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
            if ui.button("Reload").clicked() {
                match state.active {
                    Dashboard::Samples => state.reload_samples(),
                    Dashboard::Earthquakes => state.reload_map(),
                }
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.active, Dashboard::Samples, "Belly Button Biodiversity");
        ui.selectable_value(&mut state.active, Dashboard::Earthquakes, "Earthquakes");

        ui.separator();

        if state.loading() {
            ui.spinner();
        }

        for msg in state.status_messages() {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dashboard data")
        .add_filter("Supported files", &["json", "geojson", "csv"])
        .add_filter("JSON / GeoJSON", &["json", "geojson"])
        .add_filter("USGS CSV feed", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(loaded) => {
                log::info!("Opened {}", path.display());
                state.apply_loaded_file(loaded);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.report_file_error(format!("Error: {e:#}"));
            }
        }
    }
}
