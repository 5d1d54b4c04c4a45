use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::projection::{SortColumn, SortDirection};
use crate::state::AppState;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn header_label(column: SortColumn, value_label: &str) -> String {
    match column {
        SortColumn::ObservedAt => "Observation date".to_string(),
        SortColumn::DownloadedAt => "Download date".to_string(),
        SortColumn::ObservationType => "Observation type".to_string(),
        SortColumn::FileType => "File type".to_string(),
        SortColumn::Size => value_label.to_string(),
        SortColumn::TimeLag => "Time lag".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Sortable table of the filtered files
// ---------------------------------------------------------------------------

pub fn observation_table(ui: &mut Ui, state: &mut AppState) {
    if state.table.is_none() {
        return;
    }

    let value_label = state.view.labels().value_label;
    let sort = state.sort;
    let mut clicked: Option<SortColumn> = None;
    let rows = &state.view.rows;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(90.0), SortColumn::ALL.len())
        .header(22.0, |mut header| {
            for column in SortColumn::ALL {
                header.col(|ui: &mut Ui| {
                    let mut label = header_label(column, value_label);
                    if sort.column == column {
                        label.push_str(match sort.direction {
                            SortDirection::Ascending => " ⬆",
                            SortDirection::Descending => " ⬇",
                        });
                    }
                    if ui.button(label).clicked() {
                        clicked = Some(column);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(r.observed_at.format(TIMESTAMP_FORMAT).to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(r.downloaded_at.format(TIMESTAMP_FORMAT).to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&r.observation_type);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&r.file_type);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.4}", r.size));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&r.time_lag_display);
                });
            });
        });

    if let Some(column) = clicked {
        state.sort_by(column);
    }
}
