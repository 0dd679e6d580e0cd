//! Static Chart Renderer
//! Draws a `Figure` off-screen with plotters and encodes it as PNG.
//!
//! Layout:
//! 1. Title centered at the top
//! 2. Plot area with axes and mesh, or a bare equal-aspect canvas
//! 3. Legend box in the upper right when any mark is named

use super::figure::{Bounds, Figure, Frame, Mark, Orientation, Rgb};
use anyhow::{anyhow, Context};
use image::{ImageFormat, RgbImage};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::path::Path;

const MARGIN: u32 = 20;
const CAPTION_SIZE: u32 = 26;
const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 70;
const PADDING: f64 = 0.05;

type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Widen one side of `bounds` so one data unit has the same length on both axes.
fn fit_aspect(bounds: Bounds, ratio: f64) -> Bounds {
    let w = bounds.x[1] - bounds.x[0];
    let h = bounds.y[1] - bounds.y[0];
    if w <= 0.0 || h <= 0.0 || ratio <= 0.0 {
        return bounds;
    }
    if w / h < ratio {
        let grow = (h * ratio - w) / 2.0;
        Bounds {
            x: [bounds.x[0] - grow, bounds.x[1] + grow],
            y: bounds.y,
        }
    } else {
        let grow = (w / ratio - h) / 2.0;
        Bounds {
            x: bounds.x,
            y: [bounds.y[0] - grow, bounds.y[1] + grow],
        }
    }
}

/// Tick text for numeric axes.
fn axis_number(v: f64) -> String {
    if v != 0.0 && (v.abs() >= 1e5 || v.abs() < 1e-3) {
        format!("{:.1e}", v)
    } else {
        let s = format!("{:.3}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    }
}

/// Name to put in the legend, once per distinct series name.
fn legend_entry(seen: &mut Vec<String>, mark: &Mark) -> Option<String> {
    let name = mark.name()?;
    if seen.iter().any(|s| s == name) {
        return None;
    }
    seen.push(name.to_string());
    Some(name.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `figure` to PNG bytes of the given pixel size.
    pub fn render_png(figure: &Figure, width: u32, height: u32) -> anyhow::Result<Vec<u8>> {
        if width == 0 || height == 0 {
            return Err(anyhow!("Export size must be positive, got {}x{}", width, height));
        }
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        Self::draw(figure, &mut buffer, width, height)?;

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| anyhow!("Pixel buffer does not match {}x{}", width, height))?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render and write a PNG file.
    pub fn save_png(figure: &Figure, path: &Path, width: u32, height: u32) -> anyhow::Result<()> {
        let bytes = Self::render_png(figure, width, height)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Exported '{}' to {}", figure.title, path.display());
        Ok(())
    }

    fn draw(figure: &Figure, buffer: &mut [u8], width: u32, height: u32) -> anyhow::Result<()> {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut bounds = figure
            .bounds()
            .map(|b| b.padded(PADDING))
            .unwrap_or(Bounds {
                x: [0.0, 1.0],
                y: [0.0, 1.0],
            });

        let mut builder = ChartBuilder::on(&root);
        builder
            .caption(&figure.title, ("sans-serif", CAPTION_SIZE))
            .margin(MARGIN);
        match figure.frame {
            Frame::Axes => {
                builder
                    .x_label_area_size(X_LABEL_AREA)
                    .y_label_area_size(Y_LABEL_AREA);
            }
            Frame::Canvas => {
                let plot_w = width.saturating_sub(2 * MARGIN).max(1) as f64;
                let plot_h = height.saturating_sub(2 * MARGIN + 2 * CAPTION_SIZE).max(1) as f64;
                bounds = fit_aspect(bounds, plot_w / plot_h);
            }
        }
        let mut chart =
            builder.build_cartesian_2d(bounds.x[0]..bounds.x[1], bounds.y[0]..bounds.y[1])?;

        if figure.frame == Frame::Axes {
            let x_ticks = figure.x_ticks.clone();
            let y_ticks = figure.y_ticks.clone();
            let x_fmt = move |v: &f64| match &x_ticks {
                Some(ticks) => Figure::tick_label(ticks, *v).unwrap_or_default().to_string(),
                None => axis_number(*v),
            };
            let y_fmt = move |v: &f64| match &y_ticks {
                Some(ticks) => Figure::tick_label(ticks, *v).unwrap_or_default().to_string(),
                None => axis_number(*v),
            };

            let mut mesh = chart.configure_mesh();
            mesh.x_desc(figure.x_label.as_str())
                .y_desc(figure.y_label.as_str())
                .x_label_formatter(&x_fmt)
                .y_label_formatter(&y_fmt)
                .light_line_style(rgb(Rgb::GRID).mix(0.3));
            // Categorical axes label every integer slot.
            if let Some(ticks) = &figure.x_ticks {
                mesh.x_labels(ticks.len().max(2) * 2 - 1);
            }
            if let Some(ticks) = &figure.y_ticks {
                mesh.y_labels(ticks.len().max(2) * 2 - 1);
            }
            mesh.draw()?;
        }

        let mut seen = Vec::new();
        for mark in &figure.marks {
            Self::draw_mark(&mut chart, mark, &mut seen)?;
        }

        if !seen.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.85))
                .border_style(rgb(Rgb::GRID))
                .position(SeriesLabelPosition::UpperRight)
                .draw()?;
        }

        root.present()?;
        Ok(())
    }

    fn draw_mark(chart: &mut Chart<'_, '_>, mark: &Mark, seen: &mut Vec<String>) -> anyhow::Result<()> {
        let legend = legend_entry(seen, mark);
        let swatch = rgb(mark.color());

        let anno = match mark {
            Mark::Line(m) => {
                let style = rgb(m.color).stroke_width(m.width.round().max(1.0) as u32);
                chart.draw_series(LineSeries::new(
                    m.points.iter().map(|p| (p[0], p[1])),
                    style,
                ))?
            }
            Mark::Points(m) => {
                let color = rgb(m.color);
                chart.draw_series(m.points.iter().enumerate().map(|(i, p)| {
                    Circle::new(
                        (p[0], p[1]),
                        m.radius.at(i).round().max(1.0) as u32,
                        color.mix(0.75).filled(),
                    )
                }))?
            }
            Mark::Bars(m) => {
                let color = rgb(m.color);
                chart.draw_series(m.bars.iter().map(|b| {
                    let (lo, hi) = (b.position - b.width / 2.0, b.position + b.width / 2.0);
                    let corners = match m.orientation {
                        Orientation::Vertical => [(lo, b.base), (hi, b.base + b.length)],
                        Orientation::Horizontal => [(b.base, lo), (b.base + b.length, hi)],
                    };
                    Rectangle::new(corners, color.filled())
                }))?
            }
            Mark::Boxes(m) => {
                let color = rgb(m.color);
                let stroke = color.stroke_width(2);
                chart.draw_series(m.boxes.iter().map(|b| {
                    let half = b.width / 2.0;
                    Rectangle::new(
                        [(b.position - half, b.q1), (b.position + half, b.q3)],
                        color.mix(0.3).filled(),
                    )
                }))?;
                chart.draw_series(m.boxes.iter().flat_map(|b| {
                    let half = b.width / 2.0;
                    let (lo, hi) = (b.position - half, b.position + half);
                    [
                        PathElement::new(vec![(b.position, b.whisker_low), (b.position, b.q1)], stroke),
                        PathElement::new(vec![(b.position, b.q3), (b.position, b.whisker_high)], stroke),
                        PathElement::new(vec![(lo, b.median), (hi, b.median)], stroke),
                        PathElement::new(
                            vec![(lo, b.q1), (hi, b.q1), (hi, b.q3), (lo, b.q3), (lo, b.q1)],
                            stroke,
                        ),
                    ]
                }))?
            }
            Mark::Area(m) => {
                let fill = rgb(m.fill).mix(m.opacity as f64).filled();
                chart.draw_series(m.pieces.iter().map(|piece| {
                    Polygon::new(piece.iter().map(|p| (p[0], p[1])).collect::<Vec<_>>(), fill)
                }))?;
                // An area without outline still needs a series to carry its legend entry.
                let outline: Vec<(f64, f64)> = m
                    .outline
                    .iter()
                    .flatten()
                    .map(|p| (p[0], p[1]))
                    .collect();
                chart.draw_series(std::iter::once(PathElement::new(
                    outline,
                    rgb(m.outline_color).stroke_width(1),
                )))?
            }
            Mark::Segments(m) => {
                let style = rgb(m.color).stroke_width(m.width.round().max(1.0) as u32);
                chart.draw_series(m.segments.iter().map(|s| {
                    PathElement::new(vec![(s[0][0], s[0][1]), (s[1][0], s[1][1])], style)
                }))?
            }
            Mark::Label(m) => {
                let style = ("sans-serif", 14)
                    .into_font()
                    .color(&rgb(m.color))
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart.draw_series(std::iter::once(Text::new(
                    m.text.clone(),
                    (m.position[0], m.position[1]),
                    style,
                )))?
            }
        };

        if let Some(name) = legend {
            anno.label(name).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 12, y + 5)], swatch.filled())
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::{Bounds, LineMark};
    use crate::charts::{ChartDispatcher, ChartKind};
    use crate::data::Dataset;
    use polars::prelude::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn figure_for(kind: ChartKind) -> Figure {
        let df = df!(
            "region" => ["n", "s", "e", "w", "n", "s"],
            "sales" => [10.0, 20.0, 15.0, 30.0, 25.0, 5.0],
            "profit" => [1.0, 4.0, 2.0, 6.0, 5.0, 0.5],
            "quarter" => ["q1", "q1", "q2", "q2", "q1", "q2"]
        )
        .unwrap();
        let ds = Dataset::new(df, "regions.csv");
        let (x, y) = match kind {
            ChartKind::Pie | ChartKind::TreeMap | ChartKind::Sunburst | ChartKind::Radar => {
                ("region", "sales")
            }
            ChartKind::Funnel => ("sales", "region"),
            _ => ("profit", "sales"),
        };
        ChartDispatcher::render_label(&ds, kind.label(), x, y, Some("quarter")).unwrap()
    }

    #[test]
    fn aspect_fit_widens_the_short_side() {
        let b = Bounds {
            x: [0.0, 1.0],
            y: [0.0, 1.0],
        };
        let wide = fit_aspect(b, 2.0);
        assert_eq!(wide.x, [-0.5, 1.5]);
        assert_eq!(wide.y, [0.0, 1.0]);

        let tall = fit_aspect(b, 0.5);
        assert_eq!(tall.x, [0.0, 1.0]);
        assert_eq!(tall.y, [-0.5, 1.5]);
    }

    #[test]
    fn axis_numbers_are_compact() {
        assert_eq!(axis_number(2.5), "2.5");
        assert_eq!(axis_number(10.0), "10");
        assert_eq!(axis_number(-0.0), "0");
        assert_eq!(axis_number(250000.0), "2.5e5");
    }

    #[test]
    fn legend_lists_each_name_once() {
        let mark = Mark::Line(LineMark {
            name: Some("a".into()),
            points: vec![],
            color: Rgb::TEXT,
            width: 1.0,
        });
        let mut seen = Vec::new();
        assert_eq!(legend_entry(&mut seen, &mark), Some("a".to_string()));
        assert_eq!(legend_entry(&mut seen, &mark), None);
    }

    #[test]
    fn zero_size_export_is_rejected() {
        let fig = Figure::new(ChartKind::Line, "empty");
        assert!(StaticChartRenderer::render_png(&fig, 0, 10).is_err());
    }

    #[test]
    fn every_kind_exports_a_png() {
        for kind in ChartKind::ALL {
            let bytes = StaticChartRenderer::render_png(&figure_for(kind), 600, 400)
                .unwrap_or_else(|e| panic!("{} failed: {:#}", kind, e));
            assert_eq!(bytes[..8], PNG_SIGNATURE, "{}", kind);
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (600, 400), "{}", kind);
        }
    }

    #[test]
    fn save_png_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pie.png");
        StaticChartRenderer::save_png(&figure_for(ChartKind::Pie), &path, 320, 240).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 240));
    }
}
