//! Chart Plotter Module
//! Draws a `Figure` interactively using egui_plot.

use super::figure::{Figure, Frame, Mark, Orientation, Radius, Rgb, Tick};
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoint,
    PlotPoints, PlotUi, Points, Polygon, Text,
};

/// Margin around the data, as a fraction of each span.
const PADDING: f64 = 0.05;

pub fn color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

/// One grid line per categorical tick.
fn tick_marks(ticks: &[Tick]) -> Vec<GridMark> {
    ticks
        .iter()
        .map(|t| GridMark {
            value: t.position,
            step_size: 1.0,
        })
        .collect()
}

/// Creates interactive charts from figures.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Title above a plot of every mark in `figure`.
    pub fn draw_figure(ui: &mut egui::Ui, figure: &Figure, height: f32) {
        ui.label(RichText::new(&figure.title).strong().size(16.0));

        let mut plot = Plot::new(("figure", &figure.title))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false);

        if let Some(bounds) = figure.bounds().map(|b| b.padded(PADDING)) {
            plot = plot
                .include_x(bounds.x[0])
                .include_x(bounds.x[1])
                .include_y(bounds.y[0])
                .include_y(bounds.y[1]);
        }

        match figure.frame {
            Frame::Canvas => {
                plot = plot
                    .show_axes(false)
                    .show_grid(false)
                    .data_aspect(1.0)
                    .show_x(false)
                    .show_y(false);
            }
            Frame::Axes => {
                plot = plot
                    .x_axis_label(figure.x_label.clone())
                    .y_axis_label(figure.y_label.clone());
                if let Some(ticks) = figure.x_ticks.clone() {
                    let marks = tick_marks(&ticks);
                    plot = plot
                        .x_grid_spacer(move |_input| marks.clone())
                        .x_axis_formatter(move |mark, _range| {
                            Figure::tick_label(&ticks, mark.value)
                                .unwrap_or_default()
                                .to_string()
                        });
                }
                if let Some(ticks) = figure.y_ticks.clone() {
                    let marks = tick_marks(&ticks);
                    plot = plot
                        .y_grid_spacer(move |_input| marks.clone())
                        .y_axis_formatter(move |mark, _range| {
                            Figure::tick_label(&ticks, mark.value)
                                .unwrap_or_default()
                                .to_string()
                        });
                }
            }
        }

        plot.show(ui, |plot_ui| {
            for mark in &figure.marks {
                Self::draw_mark(plot_ui, mark);
            }
        });
    }

    fn draw_mark(plot_ui: &mut PlotUi, mark: &Mark) {
        let name = mark.name().unwrap_or_default().to_string();
        match mark {
            Mark::Line(m) => {
                let points: PlotPoints = m.points.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .color(color32(m.color))
                        .width(m.width)
                        .name(name),
                );
            }
            Mark::Points(m) => {
                let color = color32(m.color);
                let mut uniform = Vec::new();
                for (i, &p) in m.points.iter().enumerate() {
                    match m.radius {
                        Radius::Uniform(_) => uniform.push(p),
                        // Bubbles: one item per marker so each keeps its own size.
                        Radius::PerPoint(_) => plot_ui.points(
                            Points::new(vec![p])
                                .radius(m.radius.at(i))
                                .color(color.gamma_multiply(0.6))
                                .name(&name),
                        ),
                    }
                }
                if !uniform.is_empty() {
                    plot_ui.points(
                        Points::new(uniform)
                            .radius(m.radius.at(0))
                            .color(color)
                            .name(&name),
                    );
                }
            }
            Mark::Bars(m) => {
                let color = color32(m.color);
                let bars = m
                    .bars
                    .iter()
                    .map(|b| {
                        Bar::new(b.position, b.length)
                            .base_offset(b.base)
                            .width(b.width)
                            .fill(color)
                    })
                    .collect();
                let chart = BarChart::new(bars).color(color).name(name);
                let chart = match m.orientation {
                    Orientation::Vertical => chart,
                    Orientation::Horizontal => chart.horizontal(),
                };
                plot_ui.bar_chart(chart);
            }
            Mark::Boxes(m) => {
                let color = color32(m.color);
                let boxes = m
                    .boxes
                    .iter()
                    .map(|b| {
                        BoxElem::new(
                            b.position,
                            BoxSpread::new(b.whisker_low, b.q1, b.median, b.q3, b.whisker_high),
                        )
                        .box_width(b.width)
                        .fill(color.gamma_multiply(0.3))
                        .stroke(Stroke::new(1.5, color))
                    })
                    .collect();
                plot_ui.box_plot(BoxPlot::new(boxes).name(name));
            }
            Mark::Area(m) => {
                let fill = color32(m.fill).gamma_multiply(m.opacity);
                for piece in &m.pieces {
                    let points: PlotPoints = piece.iter().copied().collect();
                    plot_ui.polygon(
                        Polygon::new(points)
                            .fill_color(fill)
                            .stroke(Stroke::new(0.0, fill))
                            .name(&name),
                    );
                }
                if let Some(outline) = &m.outline {
                    let points: PlotPoints = outline.iter().copied().collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(color32(m.outline_color))
                            .width(1.0),
                    );
                }
            }
            Mark::Segments(m) => {
                for segment in &m.segments {
                    plot_ui.line(
                        Line::new(PlotPoints::from(segment.to_vec()))
                            .color(color32(m.color))
                            .width(m.width)
                            .name(&name),
                    );
                }
            }
            Mark::Label(m) => {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(m.position[0], m.position[1]),
                        RichText::new(&m.text).size(12.0),
                    )
                    .color(color32(m.color)),
                );
            }
        }
    }
}
