//! Shared plotting helpers: the drawing canvas, PDF export, panel labels and
//! the axis-range conventions every figure uses.

use std::error::Error;
use std::fs;
use std::ops::Range;
use std::path::Path;

use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::FigureError;

pub const FONT: &str = "sans-serif";

/// Default categorical colour cycle (matplotlib "tab10").
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub fn cycle_color(i: usize) -> RGBColor {
    TAB10[i % TAB10.len()]
}

/// Vector drawing surface of a fixed physical size, rendered to SVG in memory.
pub struct Canvas {
    svg: String,
    size: (u32, u32),
}

impl Canvas {
    pub fn new(width_in: f64, height_in: f64, units_per_inch: f64) -> Self {
        let w = (width_in * units_per_inch).round().max(1.0) as u32;
        let h = (height_in * units_per_inch).round().max(1.0) as u32;
        Self {
            svg: String::new(),
            size: (w, h),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Fresh drawing area over the whole canvas; previous content is discarded.
    pub fn root(&mut self) -> DrawingArea<SVGBackend<'_>, Shift> {
        self.svg.clear();
        SVGBackend::with_string(&mut self.svg, self.size).into_drawing_area()
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }
}

/// Convert an SVG document to a single-page PDF of the same extent.
pub fn svg_to_pdf(svg: &str, render: &RenderConfig) -> Result<Vec<u8>, FigureError> {
    let mut options = usvg::Options::default();
    if render.load_system_fonts {
        options.fontdb_mut().load_system_fonts();
    }
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| FigureError::Svg(e.to_string()))?;
    svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| FigureError::Pdf(format!("{e:?}")))
}

/// Write `canvas` as a vector PDF at `out_path`, creating parent directories.
/// The canvas is consumed so its memory is released once the file exists.
pub fn save_pdf(canvas: Canvas, out_path: &Path, render: &RenderConfig) -> Result<(), FigureError> {
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let pdf = svg_to_pdf(canvas.svg(), render)?;
    fs::write(out_path, &pdf)?;
    debug!(path = %out_path.display(), bytes = pdf.len(), "wrote pdf");
    Ok(())
}

/// Bold panel tag ("A", "B", ...) in the top-left corner of `area`.
pub fn panel_label<DB: DrawingBackend, CT: CoordTranslate>(
    area: &DrawingArea<DB, CT>,
    label: &str,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    panel_label_at(area, label, 0.02, 0.98)
}

/// Bold panel tag at axis-relative `(x, y)`, measured from the bottom-left.
pub fn panel_label_at<DB: DrawingBackend, CT: CoordTranslate>(
    area: &DrawingArea<DB, CT>,
    label: &str,
    x: f64,
    y: f64,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let screen = area.strip_coord_spec();
    let (w, h) = screen.dim_in_pixel();
    let pos = (
        (w as f64 * x).round() as i32,
        (h as f64 * (1.0 - y)).round() as i32,
    );
    let style = TextStyle::from((FONT, 12).into_font().style(FontStyle::Bold))
        .pos(Pos::new(HPos::Left, VPos::Top));
    screen.draw(&Text::new(label.to_string(), pos, style))?;
    Ok(())
}

/// Sub-area of `area` at axis fractions `[x0, y0, width, height]`
/// (origin bottom-left), used for insets.
pub fn inset_area<DB: DrawingBackend, CT: CoordTranslate>(
    area: &DrawingArea<DB, CT>,
    bounds: [f64; 4],
) -> DrawingArea<DB, Shift> {
    let screen = area.strip_coord_spec();
    let (w, h) = screen.dim_in_pixel();
    let (w, h) = (w as f64, h as f64);
    let [x0, y0, dx, dy] = bounds;
    let left = (x0 * w).round() as i32;
    let top = ((1.0 - y0 - dy) * h).round() as i32;
    screen.shrink(
        (left, top),
        ((dx * w).round() as u32, (dy * h).round() as u32),
    )
}

/// Linear axis range covering `values` with 5% padding.
pub fn linear_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    match finite_bounds(values.into_iter()) {
        None => 0.0..1.0,
        Some((lo, hi)) if (hi - lo).abs() < f64::EPSILON * hi.abs().max(1.0) => {
            (lo - 0.5)..(hi + 0.5)
        }
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        }
    }
}

/// Log axis range over the positive entries of `values`, padded
/// multiplicatively so a constant series still gets a usable axis.
pub fn log_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let positive = values.into_iter().filter(|v| *v > 0.0);
    match finite_bounds(positive) {
        None => 0.1..10.0,
        Some((lo, hi)) => {
            let decades = (hi / lo).log10();
            let pad = 10f64.powf((decades * 0.05).max(0.1));
            (lo / pad)..(hi * pad)
        }
    }
}

fn finite_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Points drawable on a log y axis (and a log x axis when `log_x`).
pub fn log_points(points: &[(f64, f64)], log_x: bool) -> Vec<(f64, f64)> {
    points
        .iter()
        .copied()
        .filter(|&(x, y)| x.is_finite() && y.is_finite() && y > 0.0 && (!log_x || x > 0.0))
        .collect()
}

/// Tick text for log axes: `1e-3`, `1e0`, ...
pub fn sci_label(v: &f64) -> String {
    format!("{v:.0e}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_size_follows_units_per_inch() {
        let canvas = Canvas::new(3.4, 2.4, 72.0);
        assert_eq!(canvas.size(), (245, 173));
        let canvas = Canvas::new(1.0, 1.0, 100.0);
        assert_eq!(canvas.size(), (100, 100));
    }

    #[test]
    fn log_range_ignores_non_positive_and_pads_constant() {
        let r = log_range([0.0, -1.0, 5.0, 5.0]);
        assert!(r.start > 0.0 && r.start < 5.0);
        assert!(r.end > 5.0);
        assert_eq!(log_range([0.0, f64::NAN]), 0.1..10.0);
    }

    #[test]
    fn linear_range_pads_degenerate_span() {
        assert_eq!(linear_range([2.0, 2.0]), 1.5..2.5);
        let r = linear_range([0.0, 10.0]);
        assert_eq!(r, -0.5..10.5);
    }

    #[test]
    fn log_points_drop_zero_values() {
        let pts = [(1.0, 0.0), (2.0, 0.5), (0.0, 1.0), (3.0, f64::NAN)];
        assert_eq!(log_points(&pts, false), vec![(2.0, 0.5), (0.0, 1.0)]);
        assert_eq!(log_points(&pts, true), vec![(2.0, 0.5)]);
    }

    #[test]
    fn panel_label_lands_in_svg() {
        let mut canvas = Canvas::new(2.0, 2.0, 72.0);
        {
            let root = canvas.root();
            root.fill(&WHITE).unwrap();
            panel_label(&root, "B").unwrap();
            root.present().unwrap();
        }
        let svg = canvas.svg();
        assert!(svg.contains(">B<"), "label text missing from {svg}");
        assert!(svg.contains("bold"), "label should be bold");
    }

    #[test]
    fn save_pdf_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/figures/test.pdf");
        let mut canvas = Canvas::new(1.0, 1.0, 72.0);
        {
            let root = canvas.root();
            root.fill(&WHITE).unwrap();
            root.present().unwrap();
        }
        let render = RenderConfig {
            load_system_fonts: false,
            ..RenderConfig::default()
        };
        save_pdf(canvas, &out, &render).unwrap();
        let bytes = fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
