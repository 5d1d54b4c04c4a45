use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ArmObsApp {
    pub state: AppState,
}

impl ArmObsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ArmObsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: total indicator ----
        if self.state.table.is_some() {
            egui::TopBottomPanel::bottom("total_panel").show(ctx, |ui| {
                panels::total_indicator(ui, &self.state);
            });
        }

        // ---- Central panel: charts / table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to view observations  (File → Open…)");
                });
                return;
            }

            panels::tab_bar(ui, &mut self.state);
            ui.separator();

            match self.state.tab {
                Tab::Charts => {
                    let height = ui.available_height();
                    ui.columns(2, |columns| {
                        plot::time_series_plot(&mut columns[0], &self.state, height);
                        plot::breakdown_pie(&mut columns[1], &self.state, height);
                    });
                }
                Tab::Table => table::observation_table(ui, &mut self.state),
            }
        });
    }
}
