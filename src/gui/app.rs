//! Dataset Visualizer Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::Config;
use crate::data::DataLoader;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::session::{Output, Session};
use egui::SidePanel;
use std::path::PathBuf;

/// Main application window.
pub struct VisualizerApp {
    config: Config,
    session: Session,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl VisualizerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self {
            session: Session::new(DataLoader::new(config.infer_schema_rows)),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(config.preview_rows),
            config,
        }
    }

    /// Sync the control panel with the session after a load attempt.
    fn after_load(&mut self, result: Result<bool, crate::data::LoaderError>) {
        match result {
            Ok(false) => {}
            Ok(true) => {
                if let Some(dataset) = self.session.dataset() {
                    self.control_panel
                        .update_columns(dataset.source(), dataset.column_names());
                    self.control_panel.set_status(format!(
                        "Loaded {} rows, {} columns",
                        dataset.height(),
                        dataset.width()
                    ));
                }
            }
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file();
        let result = self.session.load_path(picked.as_deref());
        self.after_load(result);
    }

    /// Load the first file dropped onto the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        let Some(file) = dropped else {
            return;
        };
        let result = match (&file.path, &file.bytes) {
            (Some(path), _) => self.session.load_path(Some(path)),
            (None, Some(bytes)) => self.session.load_bytes(&file.name, bytes.to_vec()),
            (None, None) => return,
        };
        self.after_load(result);
    }

    fn handle_generate(&mut self) {
        let status = match self.session.trigger() {
            Output::Chart(fig) => format!("Rendered {}", fig.kind),
            Output::Error(msg) => format!("Error: {}", msg),
            Output::Prompt | Output::Idle => "Upload a dataset first".to_string(),
        };
        self.control_panel.export_enabled = self.session.figure().is_some();
        self.control_panel.set_status(status);
    }

    /// Write the current chart to a user-chosen PNG file.
    fn handle_export_png(&mut self) {
        let Some(figure) = self.session.figure() else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let default_name = format!("{}.png", figure.kind.label().to_lowercase().replace(' ', "_"));
        let output_path: PathBuf = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(default_name)
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let status = match StaticChartRenderer::save_png(
            figure,
            &output_path,
            self.config.export_width,
            self.config.export_height,
        ) {
            Ok(()) => {
                if self.config.open_after_export {
                    if let Err(e) = open::that(&output_path) {
                        log::warn!("Could not open {}: {}", output_path.display(), e);
                    }
                }
                format!("Exported {}", output_path.display())
            }
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                format!("Error: {:#}", e)
            }
        };
        self.control_panel.set_status(status);
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.session.selection_mut());

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Generate => self.handle_generate(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.session);
        });
    }
}
