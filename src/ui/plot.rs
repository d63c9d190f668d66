use std::collections::HashMap;
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::{BAR_BLUE, ColorScale, LINE_GREEN};
use crate::data::report::PcaReport;
use crate::data::timestep::to_fixed;
use crate::state::AppState;

/// Screen distance (points) within which a click selects a marker.
const CLICK_RADIUS: f32 = 12.0;
const MARKER_RADIUS: f32 = 8.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the results area: projection on top, variance charts below.
pub fn results_view(ui: &mut Ui, state: &mut AppState) {
    let report = match &state.report {
        Some(r) => r,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                if state.loading {
                    ui.spinner();
                } else {
                    ui.heading("Drop .xyz files onto the window, then press Run PCA");
                }
            });
            return;
        }
    };

    let mut clicked = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("PCA projection");
            ui.label(RichText::new("Click on any point to view details").weak());
            color_bar(ui, &state.color_scale, report);
            clicked = pca_plot(ui, report, &state.color_scale);

            ui.add_space(8.0);
            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].heading("Component contribution");
                contribution_plot(&mut cols[0], report);
                cols[1].heading("Cumulative variance");
                cumulative_plot(&mut cols[1], report);
            });
        });

    if clicked.is_some() {
        state.selected_point = clicked;
    }
}

// ---------------------------------------------------------------------------
// PCA scatter
// ---------------------------------------------------------------------------

/// Plot item name of point `i`. The number keeps names unique when labels repeat.
fn marker_name(i: usize, label: &str) -> String {
    format!("#{} {label}", i + 1)
}

/// Hover text for every marker, keyed by its item name.
fn point_tooltips(report: &PcaReport) -> HashMap<String, String> {
    let title = report.color_axis.title();
    report
        .points()
        .iter()
        .zip(&report.labels)
        .zip(&report.color_axis.values)
        .enumerate()
        .map(|(i, ((p, label), t))| {
            let text = format!(
                "{label}\nPC1: {}\nPC2: {}\n{title}: {}\nClick to view details",
                to_fixed(p.x, 3),
                to_fixed(p.y, 3),
                to_fixed(*t, 2)
            );
            (marker_name(i, label), text)
        })
        .collect()
}

/// Scatter of PC1 vs PC2 coloured by simulation time. Returns the clicked point.
pub fn pca_plot(ui: &mut Ui, report: &PcaReport, scale: &ColorScale) -> Option<usize> {
    let (min, max) = report.color_axis.range().unwrap_or((0.0, 1.0));
    let tooltips = point_tooltips(report);

    let response = Plot::new("pca_plot")
        .height(420.0)
        .x_axis_label(report.x_axis_title())
        .y_axis_label(report.y_axis_title())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name: &str, _value: &PlotPoint| {
            tooltips.get(name).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (i, (p, label)) in report.points().iter().zip(&report.labels).enumerate() {
                let t = report.color_axis.values.get(i).copied().unwrap_or(0.0);
                let color = scale.map(t, min, max);

                plot_ui.points(
                    Points::new(vec![[p.x, p.y]])
                        .name(marker_name(i, label))
                        .color(color)
                        .filled(true)
                        .radius(MARKER_RADIUS),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(p.x, p.y),
                        RichText::new(format!("{}", i + 1)).size(10.0).color(Color32::WHITE),
                    )
                    .anchor(Align2::CENTER_CENTER),
                );
            }
        });

    if !response.response.clicked() {
        return None;
    }
    let pointer = response.response.interact_pointer_pos()?;
    report
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let screen = response.transform.position_from_point(&PlotPoint::new(p.x, p.y));
            (i, screen.distance(pointer))
        })
        .filter(|(_, d)| *d <= CLICK_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Horizontal gradient legend with the time axis title and range.
fn color_bar(ui: &mut Ui, scale: &ColorScale, report: &PcaReport) {
    let Some((min, max)) = report.color_axis.range() else {
        return;
    };
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(report.color_axis.title());
        ui.label(to_fixed(min, 2));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(220.0, 14.0), egui::Sense::hover());
        let steps = 64;
        let w = rect.width() / steps as f32;
        for i in 0..steps {
            let t = i as f32 / (steps - 1) as f32;
            let cell = egui::Rect::from_min_size(
                rect.min + egui::vec2(i as f32 * w, 0.0),
                egui::vec2(w + 0.5, rect.height()),
            );
            ui.painter().rect_filled(cell, 0.0, scale.sample(t));
        }
        ui.label(to_fixed(max, 2));
    });
}

// ---------------------------------------------------------------------------
// Variance charts
// ---------------------------------------------------------------------------

/// Axis labels `PC1..PCn` at integer positions `0..n`.
fn component_axis(n: usize) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v >= 0.0 && v.fract() == 0.0 && (v as usize) < n {
            format!("PC{}", v as usize + 1)
        } else {
            String::new()
        }
    }
}

fn percent_label(v: f64) -> String {
    format!("{}%", to_fixed(v * 100.0, 2))
}

/// Bar chart of the explained variance ratio per component.
pub fn contribution_plot(ui: &mut Ui, report: &PcaReport) {
    let ratios = &report.response.explained_variance_ratio_all;
    let bars: Vec<Bar> = ratios
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            Bar::new(i as f64, v)
                .name(format!("PC{}", i + 1))
                .fill(BAR_BLUE)
        })
        .collect();

    Plot::new("contribution_plot")
        .height(280.0)
        .x_axis_label("Principal Component")
        .y_axis_label("Explained Variance Ratio")
        .x_axis_formatter(component_axis(ratios.len()))
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_BLUE).width(0.6));
            for (i, &v) in ratios.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, v), percent_label(v))
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

/// Line of the cumulative variance ratio, y spanning at least `0..=1.1`.
pub fn cumulative_plot(ui: &mut Ui, report: &PcaReport) {
    let ratios = &report.response.cumulative_variance_ratio_all;
    let coords: Vec<[f64; 2]> = ratios
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();

    Plot::new("cumulative_plot")
        .height(280.0)
        .x_axis_label("Principal Component")
        .y_axis_label("Cumulative Variance Ratio")
        .x_axis_formatter(component_axis(ratios.len()))
        .include_y(0.0)
        .include_y(1.1)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name("Cumulative")
                    .color(LINE_GREEN)
                    .width(3.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .name("Cumulative")
                    .color(LINE_GREEN)
                    .filled(true)
                    .radius(4.0),
            );
            for (i, &v) in ratios.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, v), percent_label(v))
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}
