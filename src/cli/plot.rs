//! Spending charts
//!
//! A `Figure` holds the two series to draw: monthly totals as bars and
//! category shares as pie slices. Drawing is left to a `ChartViewer`;
//! the default one renders both charts side by side as an SVG document.

use std::{
    f64::consts::PI,
    fs, io,
    path::{Path, PathBuf},
};
use svg::{
    node::element::{Circle, Line, Path as SvgPath, Rectangle, Text},
    Document,
};

use crate::error::{AppError, Result};
use crate::lib::{period::Period, summary::Totals};

/// One bar of the monthly chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// One slice of the category chart, `share` is in `0.0..=1.0`
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub share: f64,
}

/// Both series, ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub bars: Vec<Bar>,
    pub slices: Vec<Slice>,
}

impl Figure {
    /// Shape the aggregates into chart series
    ///
    /// Bars follow the chronological order of the months. Only categories
    /// with a positive total get a slice, and shares are relative to the sum
    /// of those positive totals.
    pub fn from_totals(monthly: &Totals<Period>, categories: &Totals<String>) -> Self {
        let bars = monthly
            .iter()
            .map(|(month, amount)| Bar {
                label: month.to_string(),
                value: amount.value(),
            })
            .collect::<Vec<_>>();
        let positive = categories
            .iter()
            .filter(|(_, amount)| amount.is_positive())
            .collect::<Vec<_>>();
        let sum = positive.iter().map(|(_, a)| a.value()).sum::<f64>();
        let slices = positive
            .into_iter()
            .map(|(cat, amount)| Slice {
                label: cat.clone(),
                value: amount.value(),
                share: amount.value() / sum,
            })
            .collect::<Vec<_>>();
        Self { bars, slices }
    }

    /// Draw the bar chart on the left and the pie chart on the right
    pub fn render(&self) -> Document {
        let doc = Document::new()
            .set("viewBox", (0.0, 0.0, WIDTH, HEIGHT))
            .set("width", WIDTH)
            .set("height", HEIGHT)
            .add(
                Rectangle::new()
                    .set("width", WIDTH)
                    .set("height", HEIGHT)
                    .set("fill", "white"),
            );
        let doc = self.draw_bars(doc);
        self.draw_pie(doc)
    }

    fn draw_bars(&self, doc: Document) -> Document {
        let (left, top) = (80.0, 60.0);
        let (width, height) = (WIDTH / 2.0 - 110.0, HEIGHT - 170.0);
        let (ymin, ymax) = {
            let mut ymin = 0.0_f64;
            let mut ymax = 0.0_f64;
            for bar in &self.bars {
                ymin = ymin.min(bar.value);
                ymax = ymax.max(bar.value);
            }
            if ymax - ymin < f64::EPSILON {
                ymax = ymin + 1.0;
            }
            (ymin, ymax)
        };
        let resize_y = |y: f64| top + (ymax - y) / (ymax - ymin) * height;
        let slot = width / self.bars.len().max(1) as f64;

        let mut doc = doc.add(title(left + width / 2.0, top - 25.0, "Monthly Expenses"));
        for i in 0..=TICKS {
            let value = ymin + (ymax - ymin) * i as f64 / TICKS as f64;
            let y = resize_y(value);
            doc = doc
                .add(
                    Line::new()
                        .set("x1", left - 5.0)
                        .set("x2", left)
                        .set("y1", y)
                        .set("y2", y)
                        .set("stroke", "black"),
                )
                .add(label(left - 8.0, y + 4.0, format!("{:.0}", value)).set("text-anchor", "end"));
        }
        for (i, bar) in self.bars.iter().enumerate() {
            let x = left + slot * i as f64 + slot * 0.25;
            let (y0, y1) = (resize_y(0.0), resize_y(bar.value));
            let cx = x + slot * 0.25;
            let ly = top + height + 15.0;
            doc = doc
                .add(
                    Rectangle::new()
                        .set("x", x)
                        .set("y", y0.min(y1))
                        .set("width", slot * 0.5)
                        .set("height", (y1 - y0).abs())
                        .set("fill", "skyblue"),
                )
                .add(
                    label(cx, ly, &bar.label)
                        .set("text-anchor", "end")
                        .set("transform", format!("rotate(-45 {} {})", cx, ly)),
                );
        }
        let ylabel_y = top + height / 2.0;
        doc.add(
            Line::new()
                .set("x1", left)
                .set("x2", left)
                .set("y1", top)
                .set("y2", top + height)
                .set("stroke", "black")
                .set("stroke-width", STROKE_WIDTH),
        )
        .add(
            Line::new()
                .set("x1", left)
                .set("x2", left + width)
                .set("y1", resize_y(0.0))
                .set("y2", resize_y(0.0))
                .set("stroke", "black")
                .set("stroke-width", STROKE_WIDTH),
        )
        .add(
            label(20.0, ylabel_y, "Amount ($)")
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 20 {})", ylabel_y)),
        )
    }

    fn draw_pie(&self, doc: Document) -> Document {
        let (cx, cy, r) = (WIDTH * 0.75, HEIGHT / 2.0 + 20.0, 200.0);
        let mut doc = doc.add(title(cx, 35.0, "Spending by Category"));
        if self.slices.is_empty() {
            let empty = label(cx, cy, "No positive spending to chart");
            return doc.add(empty.set("text-anchor", "middle"));
        }
        // angles in degrees, counterclockwise from the positive x axis
        let point = |deg: f64, dist: f64| {
            let rad = deg * PI / 180.0;
            (cx + dist * rad.cos(), cy - dist * rad.sin())
        };
        let mut start = START_ANGLE;
        for (i, slice) in self.slices.iter().enumerate() {
            let color = COLORS[i % COLORS.len()];
            let sweep = slice.share * 360.0;
            let end = start + sweep;
            if slice.share >= 1.0 - 1e-9 {
                doc = doc.add(
                    Circle::new()
                        .set("cx", cx)
                        .set("cy", cy)
                        .set("r", r)
                        .set("fill", color),
                );
            } else {
                let (x0, y0) = point(start, r);
                let (x1, y1) = point(end, r);
                let large = if sweep > 180.0 { 1 } else { 0 };
                doc = doc.add(
                    SvgPath::new().set("fill", color).set(
                        "d",
                        format!(
                            "M {} {} L {} {} A {} {} 0 {} 0 {} {} Z",
                            cx, cy, x0, y0, r, r, large, x1, y1
                        ),
                    ),
                );
            }
            let mid = start + sweep / 2.0;
            let (px, py) = point(mid, r * 0.6);
            let (lx, ly) = point(mid, r * 1.1);
            let anchor = if (mid * PI / 180.0).cos() >= 0.0 { "start" } else { "end" };
            let percent = label(px, py, format!("{:.1}%", slice.share * 100.0));
            doc = doc
                .add(percent.set("text-anchor", "middle"))
                .add(label(lx, ly, &slice.label).set("text-anchor", anchor));
            start = end;
        }
        doc
    }
}

fn label<S: Into<String>>(x: f64, y: f64, content: S) -> Text {
    Text::new()
        .set("x", x)
        .set("y", y)
        .set("font-family", "sans-serif")
        .set("font-size", 12.0)
        .add(svg::node::Text::new(content))
}

fn title(x: f64, y: f64, content: &str) -> Text {
    label(x, y, content)
        .set("text-anchor", "middle")
        .set("font-size", 18.0)
}

const WIDTH: f64 = 1400.0;
const HEIGHT: f64 = 600.0;
const STROKE_WIDTH: f64 = 2.0;
const TICKS: usize = 5;
const START_ANGLE: f64 = 140.0;

const COLORS: &[&str] = &[
    "#1f77b4",
    "#ff7f0e",
    "#2ca02c",
    "#d62728",
    "#9467bd",
    "#8c564b",
    "#e377c2",
    "#7f7f7f",
    "#bcbd22",
    "#17becf",
];

/// Whatever puts a figure in front of the user
///
/// `open` shows the figure, `close` takes it down once the user is done
/// looking at it. Nothing shown is meant to outlive `close`.
pub trait ChartViewer {
    fn open(&mut self, figure: &Figure) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    /// Where the user should look, if anywhere in particular
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Shows a figure as an SVG file that exists only while the chart is open
#[derive(Debug, Clone)]
pub struct SvgFile {
    path: PathBuf,
}

impl SvgFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ChartViewer for SvgFile {
    fn open(&mut self, figure: &Figure) -> Result<()> {
        svg::save(&self.path, &figure.render())
            .map_err(|e| AppError::Chart(format!("{}: {}", self.path.display(), e)))?;
        tracing::info!("chart written to {}", self.path.display());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::lib::{entry::Expense, period::Granularity, summary::Aggregator};
    use chrono::NaiveDate;

    /// Viewer that keeps what it was asked to show
    #[derive(Default)]
    pub struct Recorder {
        pub shown: Vec<Figure>,
        pub open: bool,
    }

    impl ChartViewer for Recorder {
        fn open(&mut self, figure: &Figure) -> Result<()> {
            self.shown.push(figure.clone());
            self.open = true;
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.open = false;
            Ok(())
        }
    }

    fn figure(recs: &[Expense]) -> Figure {
        let agg = Aggregator::new(recs).unwrap();
        Figure::from_totals(&agg.sum_by_period(Granularity::Month), &agg.sum_by_category())
    }

    fn exp(m: u32, cat: &str, val: f64) -> Expense {
        Expense::new(NaiveDate::from_ymd_opt(2024, m, 1).unwrap(), cat, val, "")
    }

    #[test]
    fn shaping() {
        let fig = figure(&[
            exp(3, "Food", 30.0),
            exp(1, "Rent", 60.0),
            exp(3, "Refund", -10.0),
            exp(2, "Food", 10.0),
        ]);
        let bars = fig.bars.iter().map(|b| (b.label.as_str(), b.value)).collect::<Vec<_>>();
        assert_eq!(bars, vec![("2024-01", 60.0), ("2024-02", 10.0), ("2024-03", 20.0)]);
        let slices = fig.slices.iter().map(|s| (s.label.as_str(), s.share)).collect::<Vec<_>>();
        assert_eq!(slices, vec![("Food", 0.4), ("Rent", 0.6)]);
    }

    #[test]
    fn render_draws_every_series() {
        let fig = figure(&[exp(1, "Food", 30.0), exp(2, "Rent", 90.0)]);
        let svg = fig.render().to_string();
        // background plus one rectangle per bar
        assert_eq!(svg.matches("<rect").count(), 3);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("25.0%"));
        assert!(svg.contains("75.0%"));
        assert!(svg.contains("Monthly Expenses"));
        assert!(svg.contains("Spending by Category"));
        assert!(svg.contains("2024-02"));
    }

    #[test]
    fn single_category_is_a_disc() {
        let fig = figure(&[exp(1, "Food", 30.0)]);
        let svg = fig.render().to_string();
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains("100.0%"));
    }

    #[test]
    fn nothing_positive() {
        let fig = figure(&[exp(1, "Refund", -30.0)]);
        assert!(fig.slices.is_empty());
        let svg = fig.render().to_string();
        assert!(svg.contains("No positive spending to chart"));
    }

    #[test]
    fn svg_file_is_removed_on_close() {
        let path = std::env::temp_dir().join(format!("spendlog-chart-{}.svg", std::process::id()));
        let mut viewer = SvgFile::new(&path);
        viewer.open(&figure(&[exp(1, "Food", 30.0)])).unwrap();
        assert!(path.exists());
        assert_eq!(viewer.location(), Some(path.as_path()));
        viewer.close().unwrap();
        assert!(!path.exists());
        viewer.close().unwrap();
    }
}
