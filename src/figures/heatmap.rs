//! Heatmaps over [`ParamGrid`]s with a viridis colour scale and colorbar.

use std::error::Error;
use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::core::grid::ParamGrid;
use crate::figures::util::{FONT, panel_label};

/// Grids with at most this many distinct values per axis get one tick per value.
pub const MAX_VALUE_TICKS: usize = 10;

const COLORBAR_STEPS: usize = 64;

// Viridis sampled at nine evenly spaced stops.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

/// Viridis colour for `t` in `[0, 1]`; out-of-range input is clamped.
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Linear map from data values onto the colour scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    pub vmin: f64,
    pub vmax: f64,
}

impl ColorScale {
    pub fn from_grid(grid: &ParamGrid) -> Self {
        match grid.finite_range() {
            None => Self { vmin: 0.0, vmax: 1.0 },
            Some((lo, hi)) if lo == hi => Self {
                vmin: lo - 0.5,
                vmax: hi + 0.5,
            },
            Some((vmin, vmax)) => Self { vmin, vmax },
        }
    }

    pub fn normalize(&self, v: f64) -> f64 {
        (v - self.vmin) / (self.vmax - self.vmin)
    }

    pub fn color(&self, v: f64) -> RGBColor {
        viridis(self.normalize(v))
    }
}

/// Everything needed to draw one heatmap panel.
pub struct HeatmapPanel<'a> {
    pub grid: &'a ParamGrid,
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub colorbar_desc: &'a str,
    pub label: Option<&'a str>,
    /// Label every distinct parameter value when there are few of them.
    pub value_ticks: bool,
}

/// The image spans `[min, max]` of the parameter values on each axis.
fn axis_extent(values: &[f64]) -> Range<f64> {
    match (values.first(), values.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => lo..hi,
        (Some(&v), _) => (v - 0.5)..(v + 0.5),
        _ => 0.0..1.0,
    }
}

fn tick_text(v: f64) -> String {
    format!("{v}")
}

/// Heatmap on the left of `area` with its colorbar on the right.
pub fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &HeatmapPanel<'_>,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let grid = panel.grid;
    let scale = ColorScale::from_grid(grid);
    let (w, _) = area.dim_in_pixel();
    let bar_w = (w as f64 * 0.14).max(60.0).min(w as f64 / 3.0) as i32;
    let (plot_area, bar_area) = area.split_horizontally(w as i32 - bar_w);

    let x_extent = axis_extent(&grid.cols);
    let y_extent = axis_extent(&grid.rows);
    let explicit_x = panel.value_ticks && grid.n_cols() <= MAX_VALUE_TICKS;
    let explicit_y = panel.value_ticks && grid.n_rows() <= MAX_VALUE_TICKS;

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(panel.title, (FONT, 11))
        .margin(6)
        .x_label_area_size(32)
        .y_label_area_size(44)
        .build_cartesian_2d(x_extent.clone(), y_extent.clone())?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_desc(panel.x_desc)
        .y_desc(panel.y_desc)
        .label_style((FONT, 8))
        .axis_desc_style((FONT, 9));
    if explicit_x {
        mesh.x_labels(0);
    }
    if explicit_y {
        mesh.y_labels(0);
    }
    mesh.draw()?;

    let dx = (x_extent.end - x_extent.start) / grid.n_cols().max(1) as f64;
    let dy = (y_extent.end - y_extent.start) / grid.n_rows().max(1) as f64;
    let (x0, y0) = (x_extent.start, y_extent.start);
    chart.draw_series(
        (0..grid.n_rows())
            .flat_map(|i| (0..grid.n_cols()).map(move |j| (i, j)))
            .filter(|&(i, j)| grid.get(i, j).is_finite())
            .map(|(i, j)| {
                let left = x0 + j as f64 * dx;
                let bottom = y0 + i as f64 * dy;
                Rectangle::new(
                    [(left, bottom), (left + dx, bottom + dy)],
                    scale.color(grid.get(i, j)).filled(),
                )
            }),
    )?;

    let tick_font = TextStyle::from((FONT, 8).into_font());
    if explicit_x {
        let below = tick_font.pos(Pos::new(HPos::Center, VPos::Top));
        chart.draw_series(grid.cols.iter().map(|&v| {
            EmptyElement::at((v, y0))
                + PathElement::new(vec![(0, 0), (0, 4)], BLACK)
                + Text::new(tick_text(v), (0, 6), below.clone())
        }))?;
    }
    if explicit_y {
        let left_of = tick_font.pos(Pos::new(HPos::Right, VPos::Center));
        chart.draw_series(grid.rows.iter().map(|&v| {
            EmptyElement::at((x0, v))
                + PathElement::new(vec![(0, 0), (-4, 0)], BLACK)
                + Text::new(tick_text(v), (-6, 0), left_of.clone())
        }))?;
    }

    if let Some(label) = panel.label {
        panel_label(chart.plotting_area(), label)?;
    }

    draw_colorbar(&bar_area, &scale, panel.colorbar_desc)
}

/// Vertical colour ramp from `vmin` (bottom) to `vmax` (top) with labels.
pub fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: &ColorScale,
    desc: &str,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let mut bar = ChartBuilder::on(area)
        .margin_top(28)
        .margin_bottom(38)
        .margin_left(2)
        .margin_right(2)
        .right_y_label_area_size(42)
        .build_cartesian_2d(0.0f64..1.0, scale.vmin..scale.vmax)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_desc(desc)
        .label_style((FONT, 8))
        .axis_desc_style((FONT, 9))
        .draw()?;

    let step = (scale.vmax - scale.vmin) / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|k| {
        let lo = scale.vmin + k as f64 * step;
        let t = (k as f64 + 0.5) / COLORBAR_STEPS as f64;
        Rectangle::new([(0.0, lo), (1.0, lo + step)], viridis(t).filled())
    }))?;
    bar.draw_series(std::iter::once(Rectangle::new(
        [(0.0, scale.vmin), (1.0, scale.vmax)],
        BLACK.stroke_width(1),
    )))?;
    Ok(())
}
