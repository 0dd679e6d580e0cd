//! Control Panel Widget
//! Left side panel with the data source, chart type and column role selectors.

use crate::charts::{ChartKind, Selection};
use egui::{Color32, ComboBox, RichText};

/// Label of the category entry meaning "no category".
pub const NO_CATEGORY: &str = "None";

/// Selector captions for the column roles of a chart kind: (x, y, category).
pub fn role_labels(kind: ChartKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        ChartKind::Pie | ChartKind::TreeMap => ("Names:", "Values:", "Category:"),
        ChartKind::Sunburst => ("Parent:", "Values:", "Child:"),
        ChartKind::Radar => ("Angle:", "Radius:", "Category:"),
        ChartKind::Funnel => ("Values:", "Stages:", "Category:"),
        ChartKind::Bubble => ("X Axis:", "Size / Y:", "Category:"),
        _ => ("X Axis:", "Y Axis:", "Category:"),
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub columns: Vec<String>,
    pub source: Option<String>,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            source: None,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update available columns after a dataset load
    pub fn update_columns(&mut self, source: &str, columns: Vec<String>) {
        self.source = Some(source.to_string());
        self.columns = columns;
        self.export_enabled = false;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn column_combo(
        ui: &mut egui::Ui,
        id: &str,
        caption: &str,
        columns: &[String],
        value: &mut String,
        enabled: bool,
    ) {
        ui.horizontal(|ui| {
            ui.add_sized([90.0, 20.0], egui::Label::new(caption));
            ui.add_enabled_ui(enabled, |ui| {
                ComboBox::from_id_salt(id)
                    .width(170.0)
                    .selected_text(value.as_str())
                    .show_ui(ui, |ui| {
                        for col in columns {
                            ui.selectable_value(value, col.clone(), col);
                        }
                    });
            });
        });
    }

    /// Draw the control panel. Selector edits go straight into `selection`.
    pub fn show(&mut self, ui: &mut egui::Ui, selection: Option<&mut Selection>) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Dataset Visualizer")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (text, color) = match &self.source {
                        Some(name) => (name.as_str(), ui.visuals().strong_text_color()),
                        None => ("No file selected", Color32::GRAY),
                    };
                    ui.label(RichText::new(text).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
                ui.label(
                    RichText::new("or drop a .csv file onto the window")
                        .size(10.0)
                        .color(Color32::GRAY),
                );
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // No dataset: no chart controls.
        let Some(selection) = selection else {
            self.show_status(ui);
            return action;
        };

        // ===== Chart Section =====
        ui.label(RichText::new("📈 Chart").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_sized([90.0, 20.0], egui::Label::new("Chart Type:"));
            ComboBox::from_id_salt("chart_kind")
                .width(170.0)
                .selected_text(selection.kind.label())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut selection.kind, kind, kind.label());
                    }
                });
        });
        ui.add_space(5.0);

        let kind = selection.kind;
        let (x_caption, y_caption, category_caption) = role_labels(kind);
        Self::column_combo(ui, "x_col", x_caption, &self.columns, &mut selection.x, kind.uses_x());
        ui.add_space(5.0);
        Self::column_combo(ui, "y_col", y_caption, &self.columns, &mut selection.y, kind.uses_y());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([90.0, 20.0], egui::Label::new(category_caption));
            ui.add_enabled_ui(kind.uses_category(), |ui| {
                ComboBox::from_id_salt("category_col")
                    .width(170.0)
                    .selected_text(selection.category.as_deref().unwrap_or(NO_CATEGORY))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut selection.category, None, NO_CATEGORY);
                        for col in &self.columns {
                            ui.selectable_value(&mut selection.category, Some(col.clone()), col);
                        }
                    });
            });
        });

        if kind == ChartKind::Heatmap {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Uses every numeric column")
                    .size(10.0)
                    .color(Color32::GRAY),
            );
        } else if kind == ChartKind::Scatter3d {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Depth axis is the third column of the file")
                    .size(10.0)
                    .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("▶ Generate Graph").size(16.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Generate;
            }

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                let export = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(export).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        self.show_status(ui);
        action
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Generate,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_of_whole_charts_rename_roles() {
        assert_eq!(role_labels(ChartKind::Pie), ("Names:", "Values:", "Category:"));
        assert_eq!(role_labels(ChartKind::Sunburst).2, "Child:");
        assert_eq!(role_labels(ChartKind::Line).0, "X Axis:");
    }

    #[test]
    fn loading_columns_disables_export() {
        let mut panel = ControlPanel::new();
        panel.export_enabled = true;
        panel.update_columns("a.csv", vec!["x".into()]);
        assert!(!panel.export_enabled);
        assert_eq!(panel.source.as_deref(), Some("a.csv"));
    }
}
