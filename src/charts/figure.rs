//! Figure Model
//! Backend-neutral chart description produced by the dispatcher.
//! Drawn interactively by `ChartPlotter` and to PNG by `StaticChartRenderer`.

use super::ChartKind;

/// Plain RGB color shared by both drawing backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GRID: Rgb = Rgb(190, 190, 190);
    pub const TEXT: Rgb = Rgb(60, 60, 60);

    /// Linear blend towards `other`, `t` in 0..=1.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Color palette for series
pub const PALETTE: [Rgb; 10] = [
    Rgb(52, 152, 219),  // Blue
    Rgb(231, 76, 60),   // Red
    Rgb(46, 204, 113),  // Green
    Rgb(155, 89, 182),  // Purple
    Rgb(243, 156, 18),  // Orange
    Rgb(26, 188, 156),  // Teal
    Rgb(233, 30, 99),   // Pink
    Rgb(0, 188, 212),   // Cyan
    Rgb(121, 85, 72),   // Brown
    Rgb(96, 125, 139),  // Blue Grey
];

pub fn palette(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// Diverging blue-white-red scale for values in -1..=1.
pub fn coolwarm(value: f64) -> Rgb {
    const COOL: Rgb = Rgb(59, 76, 192);
    const MID: Rgb = Rgb(221, 221, 221);
    const WARM: Rgb = Rgb(180, 4, 38);

    if value.is_nan() {
        return Rgb::WHITE;
    }
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        MID.lerp(COOL, -v)
    } else {
        MID.lerp(WARM, v)
    }
}

/// A labelled position on a categorical axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// How the plotting area is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Regular x/y axes with grid.
    Axes,
    /// No axes, equal aspect ratio. Used by pie, treemap, sunburst, radar and 3-D.
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Radius {
    Uniform(f32),
    PerPoint(Vec<f32>),
}

impl Radius {
    pub fn at(&self, index: usize) -> f32 {
        match self {
            Radius::Uniform(r) => *r,
            Radius::PerPoint(radii) => radii.get(index).copied().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineMark {
    pub name: Option<String>,
    pub points: Vec<[f64; 2]>,
    pub color: Rgb,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointsMark {
    pub name: Option<String>,
    pub points: Vec<[f64; 2]>,
    pub color: Rgb,
    pub radius: Radius,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Center along the category axis.
    pub position: f64,
    /// Extent along the value axis, starting at `base`.
    pub length: f64,
    pub base: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarsMark {
    pub name: Option<String>,
    pub bars: Vec<Bar>,
    pub color: Rgb,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStat {
    pub position: f64,
    pub width: f64,
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxesMark {
    pub name: Option<String>,
    pub boxes: Vec<BoxStat>,
    pub color: Rgb,
}

/// Filled region made of convex pieces, with an optional outline path.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaMark {
    pub name: Option<String>,
    pub pieces: Vec<Vec<[f64; 2]>>,
    pub fill: Rgb,
    pub opacity: f32,
    pub outline: Option<Vec<[f64; 2]>>,
    pub outline_color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentsMark {
    pub name: Option<String>,
    pub segments: Vec<[[f64; 2]; 2]>,
    pub color: Rgb,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelMark {
    pub position: [f64; 2],
    pub text: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Line(LineMark),
    Points(PointsMark),
    Bars(BarsMark),
    Boxes(BoxesMark),
    Area(AreaMark),
    Segments(SegmentsMark),
    Label(LabelMark),
}

impl Mark {
    pub fn name(&self) -> Option<&str> {
        match self {
            Mark::Line(m) => m.name.as_deref(),
            Mark::Points(m) => m.name.as_deref(),
            Mark::Bars(m) => m.name.as_deref(),
            Mark::Boxes(m) => m.name.as_deref(),
            Mark::Area(m) => m.name.as_deref(),
            Mark::Segments(m) => m.name.as_deref(),
            Mark::Label(_) => None,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Mark::Line(m) => m.color,
            Mark::Points(m) => m.color,
            Mark::Bars(m) => m.color,
            Mark::Boxes(m) => m.color,
            Mark::Area(m) => m.fill,
            Mark::Segments(m) => m.color,
            Mark::Label(m) => m.color,
        }
    }

    /// Every coordinate the mark covers, used for axis ranges.
    fn extent_points(&self) -> Vec<[f64; 2]> {
        match self {
            Mark::Line(m) => m.points.clone(),
            Mark::Points(m) => m.points.clone(),
            Mark::Bars(m) => m
                .bars
                .iter()
                .flat_map(|b| {
                    let lo = [b.position - b.width / 2.0, b.base];
                    let hi = [b.position + b.width / 2.0, b.base + b.length];
                    match m.orientation {
                        Orientation::Vertical => [lo, hi],
                        Orientation::Horizontal => [[lo[1], lo[0]], [hi[1], hi[0]]],
                    }
                })
                .collect(),
            Mark::Boxes(m) => m
                .boxes
                .iter()
                .flat_map(|b| {
                    [
                        [b.position - b.width / 2.0, b.whisker_low],
                        [b.position + b.width / 2.0, b.whisker_high],
                    ]
                })
                .collect(),
            Mark::Area(m) => m.pieces.iter().flatten().copied().collect(),
            Mark::Segments(m) => m.segments.iter().flatten().copied().collect(),
            Mark::Label(m) => vec![m.position],
        }
    }
}

/// Axis-aligned data range of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Bounds {
    /// Grow each side by `fraction` of its span; degenerate spans get a unit margin.
    pub fn padded(self, fraction: f64) -> Bounds {
        let pad = |[lo, hi]: [f64; 2]| {
            let span = hi - lo;
            if span <= f64::EPSILON {
                [lo - 0.5, hi + 0.5]
            } else {
                [lo - span * fraction, hi + span * fraction]
            }
        };
        Bounds {
            x: pad(self.x),
            y: pad(self.y),
        }
    }
}

/// Renderable chart result.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Option<Vec<Tick>>,
    pub y_ticks: Option<Vec<Tick>>,
    pub frame: Frame,
    pub marks: Vec<Mark>,
}

impl Figure {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            x_ticks: None,
            y_ticks: None,
            frame: Frame::Axes,
            marks: Vec::new(),
        }
    }

    pub fn with_axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn with_x_ticks(mut self, ticks: Option<Vec<Tick>>) -> Self {
        self.x_ticks = ticks;
        self
    }

    pub fn with_y_ticks(mut self, ticks: Option<Vec<Tick>>) -> Self {
        self.y_ticks = ticks;
        self
    }

    pub fn canvas(mut self) -> Self {
        self.frame = Frame::Canvas;
        self
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Range of all mark coordinates, or `None` for an empty figure.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self
            .marks
            .iter()
            .flat_map(|m| m.extent_points())
            .filter(|p| p[0].is_finite() && p[1].is_finite());

        let first = points.next()?;
        let init = Bounds {
            x: [first[0], first[0]],
            y: [first[1], first[1]],
        };
        Some(points.fold(init, |b, p| Bounds {
            x: [b.x[0].min(p[0]), b.x[1].max(p[0])],
            y: [b.y[0].min(p[1]), b.y[1].max(p[1])],
        }))
    }

    /// Distinct legend entries in first-appearance order.
    pub fn legend(&self) -> Vec<(String, Rgb)> {
        let mut entries: Vec<(String, Rgb)> = Vec::new();
        for mark in &self.marks {
            if let Some(name) = mark.name() {
                if !entries.iter().any(|(n, _)| n == name) {
                    entries.push((name.to_string(), mark.color()));
                }
            }
        }
        entries
    }

    /// Label text for a categorical tick close to `value`.
    pub fn tick_label(ticks: &[Tick], value: f64) -> Option<&str> {
        ticks
            .iter()
            .find(|t| (t.position - value).abs() < 1e-6)
            .map(|t| t.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: Vec<[f64; 2]>, name: Option<&str>, color: Rgb) -> Mark {
        Mark::Line(LineMark {
            name: name.map(str::to_string),
            points,
            color,
            width: 1.0,
        })
    }

    #[test]
    fn bounds_cover_every_mark() {
        let mut fig = Figure::new(ChartKind::Line, "t");
        assert!(fig.bounds().is_none());

        fig.push(line(vec![[0.0, 1.0], [2.0, 5.0]], None, Rgb(0, 0, 0)));
        fig.push(Mark::Bars(BarsMark {
            name: None,
            bars: vec![Bar {
                position: 4.0,
                length: -3.0,
                base: 0.0,
                width: 1.0,
            }],
            color: Rgb(0, 0, 0),
            orientation: Orientation::Vertical,
        }));

        let b = fig.bounds().unwrap();
        assert_eq!(b.x, [0.0, 4.5]);
        assert_eq!(b.y, [-3.0, 5.0]);
    }

    #[test]
    fn horizontal_bars_swap_axes() {
        let mut fig = Figure::new(ChartKind::Funnel, "t");
        fig.push(Mark::Bars(BarsMark {
            name: None,
            bars: vec![Bar {
                position: 1.0,
                length: 10.0,
                base: -5.0,
                width: 0.8,
            }],
            color: Rgb(0, 0, 0),
            orientation: Orientation::Horizontal,
        }));
        let b = fig.bounds().unwrap();
        assert_eq!(b.x, [-5.0, 5.0]);
        assert!((b.y[0] - 0.6).abs() < 1e-9 && (b.y[1] - 1.4).abs() < 1e-9);
    }

    #[test]
    fn legend_deduplicates_names() {
        let mut fig = Figure::new(ChartKind::Line, "t");
        fig.push(line(vec![[0.0, 0.0]], Some("a"), PALETTE[0]));
        fig.push(line(vec![[1.0, 1.0]], Some("a"), PALETTE[0]));
        fig.push(line(vec![[1.0, 1.0]], Some("b"), PALETTE[1]));
        fig.push(line(vec![[1.0, 1.0]], None, PALETTE[2]));
        assert_eq!(
            fig.legend(),
            vec![("a".to_string(), PALETTE[0]), ("b".to_string(), PALETTE[1])]
        );
    }

    #[test]
    fn coolwarm_ends_and_middle() {
        assert_eq!(coolwarm(-1.0), Rgb(59, 76, 192));
        assert_eq!(coolwarm(0.0), Rgb(221, 221, 221));
        assert_eq!(coolwarm(1.0), Rgb(180, 4, 38));
        assert_eq!(coolwarm(f64::NAN), Rgb::WHITE);
    }

    #[test]
    fn padding_handles_flat_ranges() {
        let b = Bounds {
            x: [1.0, 1.0],
            y: [0.0, 10.0],
        }
        .padded(0.1);
        assert_eq!(b.x, [0.5, 1.5]);
        assert_eq!(b.y, [-1.0, 11.0]);
    }
}
