//! Chart Viewer Widget
//! Central panel: dataset preview above the rendered chart or message.

use crate::charts::ChartPlotter;
use crate::data::Dataset;
use crate::session::{Output, Session, UPLOAD_PROMPT};
use egui::{Color32, RichText, ScrollArea};

const MIN_CHART_HEIGHT: f32 = 320.0;
const PREVIEW_HEIGHT: f32 = 150.0;
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

pub struct ChartViewer {
    preview_rows: usize,
}

impl ChartViewer {
    pub fn new(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    pub fn show(&self, ui: &mut egui::Ui, session: &Session) {
        let Some(dataset) = session.dataset() else {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 3.0);
                if let Output::Error(msg) = session.output() {
                    ui.label(RichText::new(msg).size(14.0).color(ERROR_COLOR));
                    ui.add_space(10.0);
                }
                ui.label(RichText::new(UPLOAD_PROMPT).size(20.0));
            });
            return;
        };

        self.draw_preview(ui, dataset);
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        match session.output() {
            Output::Chart(figure) => {
                let height = ui.available_height().max(MIN_CHART_HEIGHT) - 30.0;
                ChartPlotter::draw_figure(ui, figure, height);
            }
            Output::Error(msg) => {
                ui.label(RichText::new(msg).size(16.0).strong().color(ERROR_COLOR));
            }
            Output::Idle | Output::Prompt => {
                ui.label(
                    RichText::new("Choose a chart type and columns, then press Generate Graph.")
                        .size(14.0)
                        .color(Color32::GRAY),
                );
            }
        }
    }

    /// First rows of the dataset as a striped grid.
    fn draw_preview(&self, ui: &mut egui::Ui, dataset: &Dataset) {
        ui.label(
            RichText::new(format!(
                "Dataset Preview: {} ({} rows, {} columns)",
                dataset.source(),
                dataset.height(),
                dataset.width()
            ))
            .size(14.0)
            .strong(),
        );
        ui.add_space(5.0);

        let rows = dataset.preview(self.preview_rows);
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt("preview")
                    .max_height(PREVIEW_HEIGHT)
                    .show(ui, |ui| {
                        egui::Grid::new("preview_grid")
                            .striped(true)
                            .min_col_width(60.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for name in dataset.column_names() {
                                    ui.label(RichText::new(name).strong().size(11.0));
                                }
                                ui.end_row();
                                for row in &rows {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(11.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
