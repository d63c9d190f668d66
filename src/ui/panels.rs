use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::XyzFile;
use crate::data::report::{PcaReport, Summary};
use crate::data::timestep::to_fixed;
use crate::state::AppState;

const CARD_BLUE: Color32 = Color32::from_rgb(0x25, 0x63, 0xeb);

// ---------------------------------------------------------------------------
// Left side panel – files, controls, summary
// ---------------------------------------------------------------------------

/// Render the left panel. Returns `true` when Run PCA was clicked.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) -> bool {
    ui.heading("Trajectory files");
    ui.separator();

    drop_zone(ui, state);
    ui.add_space(4.0);
    file_list(ui, state);
    ui.add_space(4.0);

    let run = ui
        .add_enabled(state.can_process(), egui::Button::new("Run PCA"))
        .clicked();
    if state.loading {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.label("Processing…");
        });
    }

    ui.separator();
    ui.strong("Timestep size");
    let mut fs = state.timestep_size_fs;
    let changed = ui
        .add(
            egui::DragValue::new(&mut fs)
                .speed(0.1)
                .range(0.001..=1.0e6)
                .suffix(" fs"),
        )
        .changed();
    if changed {
        state.set_timestep_size(fs);
    }

    let mut clicked = None;
    if let Some(report) = &state.report {
        ui.separator();
        summary_cards(ui, &report.summary);
        ui.label(
            RichText::new(format!("Labels assume {} fs per step", report.timestep_size_fs))
                .weak(),
        );
        ui.separator();
        ui.strong("Points");
        clicked = point_table(ui, report, state.selected_point);
    }
    if clicked.is_some() {
        state.selected_point = clicked;
    }

    run
}

/// Click-to-browse area that highlights while files hover over the window.
fn drop_zone(ui: &mut Ui, state: &mut AppState) {
    let stroke = if state.drop_hover {
        Stroke::new(2.0, ui.visuals().selection.bg_fill)
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke
    };

    let response = egui::Frame::group(ui.style())
        .stroke(stroke)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_height(64.0);
            ui.vertical_centered(|ui: &mut Ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("Drop .xyz files here").strong());
                ui.label(RichText::new("or click to browse").weak());
            });
        })
        .response
        .interact(egui::Sense::click());

    if response.clicked() {
        open_file_dialog(state);
    }
}

fn file_list(ui: &mut Ui, state: &AppState) {
    if state.files.is_empty() {
        ui.label(RichText::new("No files selected.").weak());
        return;
    }
    ui.label(format!("{} file(s)", state.files.len()));
    ScrollArea::vertical()
        .id_salt("file_list")
        .max_height(160.0)
        .show(ui, |ui: &mut Ui| {
            for file in &state.files {
                ui.add(egui::Label::new(RichText::new(&file.name).monospace()).truncate());
            }
        });
}

fn summary_cards(ui: &mut Ui, summary: &Summary) {
    let cards = [
        ("Data Points", summary.n_points.to_string()),
        ("PC1 Variance", format!("{}%", to_fixed(summary.pc1_variance, 1))),
        ("PC2 Variance", format!("{}%", to_fixed(summary.pc2_variance, 1))),
        ("PC1+PC2 Cum. Var.", format!("{}%", to_fixed(summary.pc1_pc2_cumulative, 1))),
    ];
    egui::Grid::new("summary_cards")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            for (i, (title, value)) in cards.iter().enumerate() {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(value).heading().color(CARD_BLUE));
                    ui.label(*title);
                });
                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });
}

/// Table of projected points. Returns the row whose number was clicked.
fn point_table(ui: &mut Ui, report: &PcaReport, selected: Option<usize>) -> Option<usize> {
    let mut clicked = None;
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::remainder().clip(true))
        .column(Column::auto())
        .column(Column::auto())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Label");
            });
            header.col(|ui| {
                ui.strong("PC1");
            });
            header.col(|ui| {
                ui.strong("PC2");
            });
        })
        .body(|mut body| {
            for (i, (p, label)) in report.points().iter().zip(&report.labels).enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        if ui
                            .selectable_label(selected == Some(i), format!("{}", i + 1))
                            .clicked()
                        {
                            clicked = Some(i);
                        }
                    });
                    row.col(|ui| {
                        ui.label(label);
                    });
                    row.col(|ui| {
                        ui.monospace(to_fixed(p.x, 3));
                    });
                    row.col(|ui| {
                        ui.monospace(to_fixed(p.y, 3));
                    });
                });
            }
        });
    clicked
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
            let can_clear = !state.files.is_empty() && !state.loading;
            if ui.add_enabled(can_clear, egui::Button::new("Clear")).clicked() {
                state.clear_files();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new(&state.config.api_url).weak());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Modal-style error window; dismissed with OK or the close button.
pub fn error_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.error_message.clone() else {
        return;
    };
    let mut open = true;
    let mut dismissed = false;
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui: &mut Ui| {
            ui.label(RichText::new(&message).color(Color32::RED));
            ui.add_space(6.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    if !open || dismissed {
        state.error_message = None;
    }
}

/// Details of the point last clicked in the plot or table.
pub fn point_details_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(idx) = state.selected_point else {
        return;
    };
    let Some(text) = state.report.as_ref().and_then(|r| r.describe_point(idx)) else {
        state.selected_point = None;
        return;
    };
    let mut open = true;
    egui::Window::new("Point details")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui: &mut Ui| {
            ui.monospace(text);
        });
    if !open {
        state.selected_point = None;
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    if state.loading {
        return;
    }
    let picked = rfd::FileDialog::new()
        .set_title("Select .xyz trajectory frames")
        .add_filter("XYZ trajectory", &["xyz"])
        .pick_files();

    if let Some(paths) = picked {
        state.set_files(paths.into_iter().map(XyzFile::from_path));
    }
}
