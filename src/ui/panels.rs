use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::SynopticHours;
use crate::data::units::SizeUnit;
use crate::state::{AppState, Category, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Parameters");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No table loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let observation_types = table.observation_types.clone();
    let file_types = table.file_types.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Period");
            let mut start = state.start_date;
            let mut end = state.end_date;
            ui.horizontal(|ui: &mut Ui| {
                ui.label("From");
                ui.add(DatePickerButton::new(&mut start).id_salt("start_date"));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("To");
                ui.add(DatePickerButton::new(&mut end).id_salt("end_date"));
            });
            if start != state.start_date || end != state.end_date {
                state.set_date_range(start, end);
            }
            ui.separator();

            // ---- Synoptic hour ----
            ui.strong("Synoptic hour");
            let mut hours = state.selection.hours;
            for option in SynopticHours::ALL {
                ui.radio_value(&mut hours, option, option.label());
            }
            if hours != state.selection.hours {
                state.set_hours(hours);
            }
            ui.separator();

            // ---- Unit ----
            ui.strong("Unit");
            let mut unit = state.selection.unit;
            egui::ComboBox::from_id_salt("unit")
                .selected_text(unit.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for option in SizeUnit::ALL {
                        ui.selectable_value(&mut unit, option, option.as_str());
                    }
                });
            if unit != state.selection.unit {
                state.set_unit(unit);
            }
            ui.separator();

            // ---- Categorical filters (collapsible) ----
            category_filter(ui, state, Category::FileType, "File type", &file_types);
            category_filter(
                ui,
                state,
                Category::ObservationType,
                "Observation type",
                &observation_types,
            );
        });
}

fn category_filter(
    ui: &mut Ui,
    state: &mut AppState,
    category: Category,
    title: &str,
    all_values: &std::collections::BTreeSet<String>,
) {
    let selected = match category {
        Category::ObservationType => &state.selection.observation_types,
        Category::FileType => &state.selection.file_types,
    };

    // Show count of selected / total in the header
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(category);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(category);
                }
            });

            for value in all_values {
                let is_selected = match category {
                    Category::ObservationType => state.selection.observation_types.contains(value),
                    Category::FileType => state.selection.file_types.contains(value),
                };

                let mut text = RichText::new(value);
                if category == Category::ObservationType {
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(value));
                    }
                }

                let mut checked = is_selected;
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle(category, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Total indicator
// ---------------------------------------------------------------------------

/// The "Total stored (XB):" number.
pub fn total_indicator(ui: &mut Ui, state: &AppState) {
    let labels = state.view.labels();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(labels.total_label).size(16.0));
        ui.label(
            RichText::new(format!("{:.2}", state.view.total))
                .size(22.0)
                .strong(),
        );
        ui.label(format!("({} files)", state.view.row_count));
    });
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Charts, "Charts");
        ui.selectable_value(&mut state.tab, Tab::Table, "Table");
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
                "{} files loaded, {} visible",
                table.len(),
                state.view.row_count
            ));
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
        .set_title("Open observation table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => state.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
