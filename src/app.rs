use std::time::Duration;

use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, Dashboard};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyAtlasApp {
    pub state: AppState,
}

impl RustyAtlasApp {
    /// Build the app and start fetching both dashboards' data.
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config);
        state.reload_all();
        Self { state }
    }
}

impl eframe::App for RustyAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();
        if self.state.loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selector / layers ----
        egui::SidePanel::left("side_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| match self.state.active {
                Dashboard::Samples => panels::samples_side_panel(ui, &mut self.state),
                Dashboard::Earthquakes => panels::map_side_panel(ui, &mut self.state),
            });

        // ---- Central panel: charts / map ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.active {
            Dashboard::Samples => plot::samples_plots(ui, &self.state),
            Dashboard::Earthquakes => plot::quake_map(ui, &self.state.map),
        });
    }
}
