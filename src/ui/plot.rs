use std::f64::consts::FRAC_PI_4;

use chrono::{DateTime, Utc};
use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, Points, Polygon};

use crate::state::AppState;

const PIE_RADIUS: f64 = 1.0;

// ---------------------------------------------------------------------------
// Time series (line + scatter)
// ---------------------------------------------------------------------------

/// Size of every selected type/file combination over time.
pub fn time_series_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(table) = &state.table else {
        return;
    };

    // The first catalog file type (gdas) is drawn solid, the rest dashed.
    let primary_file_type = table.file_types.iter().next();

    Plot::new("time_series_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(state.view.labels().axis_label)
        .x_axis_formatter(|mark, _range| {
            DateTime::<Utc>::from_timestamp(mark.value as i64, 0)
                .map(|dt| dt.format("%Y-%m-%d %HZ").to_string())
                .unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &state.view.series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&series.observation_type))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let style = if Some(&series.file_type) == primary_file_type {
                    LineStyle::Solid
                } else {
                    LineStyle::dashed_loose()
                };
                let name = series.label();

                let line_points: PlotPoints = series
                    .points
                    .iter()
                    .map(|(t, v)| [t.and_utc().timestamp() as f64, *v])
                    .collect();
                let scatter_points: PlotPoints = series
                    .points
                    .iter()
                    .map(|(t, v)| [t.and_utc().timestamp() as f64, *v])
                    .collect();

                plot_ui.line(
                    Line::new(line_points)
                        .name(&name)
                        .color(color)
                        .style(style)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(scatter_points)
                        .name(&name)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Proportion by observation type (pie)
// ---------------------------------------------------------------------------

/// Points of one wedge, split into convex pieces no wider than 45° so the
/// polygon tessellator fills them correctly.
fn wedge_polygons(start: f64, end: f64) -> Vec<Vec<[f64; 2]>> {
    let span = end - start;
    if span <= 0.0 {
        return Vec::new();
    }
    let count = (span / FRAC_PI_4).ceil().max(1.0) as usize;
    let steps = 16;

    (0..count)
        .map(|k| {
            let from = start + span * k as f64 / count as f64;
            let to = start + span * (k + 1) as f64 / count as f64;
            let mut points = vec![[0.0, 0.0]];
            for i in 0..=steps {
                // Clockwise from 12 o'clock.
                let a = from + (to - from) * i as f64 / steps as f64;
                points.push([PIE_RADIUS * a.sin(), PIE_RADIUS * a.cos()]);
            }
            points
        })
        .collect()
}

/// Relative size of each selected observation type.
pub fn breakdown_pie(ui: &mut Ui, state: &AppState, height: f32) {
    if state.table.is_none() {
        return;
    }
    if state.view.breakdown.is_empty() {
        ui.label("Nothing selected.");
        return;
    }

    Plot::new("breakdown_pie")
        .height(height)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for wedge in &state.view.breakdown {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&wedge.observation_type))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let name = format!("{}: {:.2}%", wedge.observation_type, wedge.percent);

                for piece in wedge_polygons(wedge.start_angle, wedge.end_angle) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(piece))
                            .name(&name)
                            .fill_color(color)
                            .stroke((1.0, Color32::WHITE)),
                    );
                }
            }
        });
}
