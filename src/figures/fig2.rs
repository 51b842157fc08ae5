//! CAS stability: CAS against the insertion bound Lmax, one curve per sample,
//! with an inset showing how much CAS still moves from one Lmax to the next.

use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;

use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use crate::config::{FigureConfig, RenderConfig};
use crate::core::stats::median;
use crate::core::table::{Table, is_missing};
use crate::error::FigureError;
use crate::figures::Figure;
use crate::figures::util::{
    Canvas, FONT, cycle_color, inset_area, linear_range, log_points, log_range, panel_label,
    save_pdf, sci_label,
};

pub const INPUT: &str = "results_cas_stability.csv";
pub const OUTPUT: &str = "Fig2_CAS_vs_Lmax.pdf";

pub const MAX_CURVES: usize = 8;
pub const MAX_LEGEND_ENTRIES: usize = 6;
pub const LEGEND_COLUMNS: usize = 2;

const SIZE_IN: (f64, f64) = (3.4, 2.4);
const INSET: [f64; 4] = [0.58, 0.12, 0.38, 0.38];

#[derive(Clone, Debug, PartialEq)]
pub struct SampleCurve {
    pub sample_id: String,
    /// `(Lmax, CAS)` sorted by Lmax.
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug)]
pub struct StabilityData {
    pub curves: Vec<SampleCurve>,
    pub show_legend: bool,
    /// Median `|CAS(L) - CAS(L-1)|` over samples, keyed by the upper `L`.
    pub median_steps: Vec<(f64, f64)>,
}

/// Distinct sample ids in plotting order: numeric order when every id is a
/// number, lexicographic otherwise. Missing ids are not samples.
pub fn order_sample_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = ids
        .iter()
        .filter(|id| !is_missing(id) && seen.insert(id.as_str()))
        .cloned()
        .collect();
    let numeric: Option<Vec<f64>> = unique.iter().map(|id| id.parse::<f64>().ok()).collect();
    match numeric {
        Some(keys) => {
            let mut keyed: Vec<(f64, String)> = keys.into_iter().zip(unique).collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            keyed.into_iter().map(|(_, id)| id).collect()
        }
        None => {
            unique.sort();
            unique
        }
    }
}

/// The first [`MAX_CURVES`] ids of an ordered id list.
pub fn select_samples(ordered: &[String]) -> &[String] {
    &ordered[..ordered.len().min(MAX_CURVES)]
}

/// `(L_{k+1}, |CAS_{k+1} - CAS_k|)` for consecutive points of one curve.
pub fn step_differences(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points
        .windows(2)
        .map(|w| (w[1].0, (w[1].1 - w[0].1).abs()))
        .collect()
}

/// Median step difference across curves for every distinct upper Lmax.
pub fn median_step_differences(curves: &[SampleCurve]) -> Vec<(f64, f64)> {
    let mut steps: Vec<(f64, f64)> = curves
        .iter()
        .flat_map(|c| step_differences(&c.points))
        .filter(|(l, _)| !l.is_nan())
        .collect();
    steps.sort_by(|a, b| a.0.total_cmp(&b.0));
    steps
        .chunk_by(|a, b| a.0 == b.0)
        .map(|group| {
            let diffs: Vec<f64> = group.iter().map(|p| p.1).collect();
            (group[0].0, median(&diffs))
        })
        .collect()
}

pub fn prepare(table: &Table) -> Result<StabilityData, FigureError> {
    table.require(&["sample_id", "Lmax", "CAS"])?;
    let ids = table.str_column("sample_id")?;
    let lmax = table.f64_column("Lmax")?;
    let cas = table.f64_column("CAS")?;

    let ordered = order_sample_ids(&ids);
    let selected = select_samples(&ordered);
    if selected.len() < ordered.len() {
        debug!(
            total = ordered.len(),
            shown = selected.len(),
            "subsampling stability curves"
        );
    }

    let curves: Vec<SampleCurve> = selected
        .iter()
        .map(|sid| {
            let mut points: Vec<(f64, f64)> = ids
                .iter()
                .zip(lmax.iter().zip(cas.iter()))
                .filter(|(id, _)| *id == sid)
                .map(|(_, (&l, &c))| (l, c))
                .collect();
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            SampleCurve {
                sample_id: sid.clone(),
                points,
            }
        })
        .collect();

    let median_steps = median_step_differences(&curves);
    Ok(StabilityData {
        show_legend: curves.len() <= MAX_LEGEND_ENTRIES,
        curves,
        median_steps,
    })
}

pub fn render(data: &StabilityData, render: &RenderConfig) -> Result<Canvas, Box<dyn Error>> {
    let mut canvas = Canvas::new(SIZE_IN.0, SIZE_IN.1, render.units_per_inch);
    {
        let root = canvas.root();
        root.fill(&WHITE)?;
        draw(&root, data)?;
        root.present()?;
    }
    Ok(canvas)
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &StabilityData,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let all: Vec<(f64, f64)> = data
        .curves
        .iter()
        .flat_map(|c| c.points.iter().copied())
        .collect();
    let mut chart = ChartBuilder::on(root)
        .margin(6)
        .x_label_area_size(26)
        .y_label_area_size(38)
        .build_cartesian_2d(
            linear_range(all.iter().map(|p| p.0)),
            log_range(all.iter().map(|p| p.1)).log_scale(),
        )?;
    chart
        .configure_mesh()
        .x_desc("Insertion bound Lmax")
        .y_desc("Clonal Attractor Score (CAS)")
        .y_label_formatter(&sci_label)
        .label_style((FONT, 7))
        .axis_desc_style((FONT, 7))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()?;

    for (i, curve) in data.curves.iter().enumerate() {
        chart.draw_series(
            LineSeries::new(log_points(&curve.points, false), cycle_color(i).stroke_width(1))
                .point_size(2),
        )?;
    }
    if data.show_legend && !data.curves.is_empty() {
        draw_legend(chart.plotting_area(), &data.curves)?;
    }
    panel_label(chart.plotting_area(), "A")?;

    if data.median_steps.is_empty() {
        return Ok(());
    }
    let inset = inset_area(chart.plotting_area(), INSET);
    inset.fill(&WHITE)?;
    let steps = log_points(&data.median_steps, false);
    let mut inset_chart = ChartBuilder::on(&inset)
        .caption("|CAS(L+1) - CAS(L)|", (FONT, 6))
        .x_label_area_size(10)
        .y_label_area_size(22)
        .build_cartesian_2d(
            linear_range(data.median_steps.iter().map(|p| p.0)),
            log_range(data.median_steps.iter().map(|p| p.1)).log_scale(),
        )?;
    inset_chart
        .configure_mesh()
        .x_labels(0)
        .y_label_formatter(&sci_label)
        .label_style((FONT, 5))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()?;
    let y_bottom = inset_chart.y_range().start;
    let below = TextStyle::from((FONT, 5).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    inset_chart.draw_series(data.median_steps.iter().map(|&(l, _)| {
        EmptyElement::at((l, y_bottom))
            + PathElement::new(vec![(0, 0), (0, 2)], BLACK)
            + Text::new(format!("{l}"), (0, 3), below.clone())
    }))?;
    inset_chart.draw_series(
        LineSeries::new(steps, cycle_color(0).stroke_width(1)).point_size(2),
    )?;
    Ok(())
}

/// `(column, row)` of each legend entry, filled column by column.
pub fn legend_slots(n: usize, ncol: usize) -> Vec<(usize, usize)> {
    let rows = n.div_ceil(ncol.max(1));
    (0..n).map(|i| (i / rows, i % rows)).collect()
}

/// Upper-right legend in [`LEGEND_COLUMNS`] columns, drawn in pixel space.
fn draw_legend<DB: DrawingBackend, CT: CoordTranslate>(
    area: &DrawingArea<DB, CT>,
    curves: &[SampleCurve],
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    const PAD: i32 = 4;
    const COL_W: i32 = 34;
    const ROW_H: i32 = 8;
    const LINE_W: i32 = 10;

    let screen = area.strip_coord_spec();
    let (w, _) = screen.dim_in_pixel();
    let used_cols = LEGEND_COLUMNS.min(curves.len()) as i32;
    let x0 = w as i32 - PAD - used_cols * COL_W;
    let style = TextStyle::from((FONT, 6).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    for ((col, row), (i, curve)) in legend_slots(curves.len(), LEGEND_COLUMNS)
        .into_iter()
        .zip(curves.iter().enumerate())
    {
        let x = x0 + col as i32 * COL_W;
        let y = PAD + row as i32 * ROW_H + ROW_H / 2;
        screen.draw(&PathElement::new(
            vec![(x, y), (x + LINE_W, y)],
            cycle_color(i).stroke_width(1),
        ))?;
        screen.draw(&Text::new(
            curve.sample_id.clone(),
            (x + LINE_W + 3, y),
            style.clone(),
        ))?;
    }
    Ok(())
}

pub fn run(cfg: &FigureConfig) -> Result<PathBuf, Box<dyn Error>> {
    let table = Table::read(&cfg.paths.input(INPUT))?;
    let data = prepare(&table)?;
    info!(
        samples = data.curves.len(),
        legend = data.show_legend,
        steps = data.median_steps.len(),
        "rendering CAS stability"
    );
    let canvas = render(&data, &cfg.render)?;
    let out = Figure::Fig2.output(cfg);
    save_pdf(canvas, &out, &cfg.render)?;
    println!("Saved: {}", out.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numeric_ids_sort_numerically() {
        let ordered = order_sample_ids(&ids(&["10", "2", "1", "2"]));
        assert_eq!(ordered, ids(&["1", "2", "10"]));
    }

    #[test]
    fn text_ids_sort_lexicographically() {
        let ordered = order_sample_ids(&ids(&["s10", "s2", "s1"]));
        assert_eq!(ordered, ids(&["s1", "s10", "s2"]));
    }

    #[test]
    fn legend_fills_two_columns_top_down() {
        assert_eq!(
            legend_slots(5, LEGEND_COLUMNS),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]
        );
        assert_eq!(legend_slots(1, LEGEND_COLUMNS), vec![(0, 0)]);
        assert!(legend_slots(0, LEGEND_COLUMNS).is_empty());
    }

    #[test]
    fn missing_ids_are_skipped() {
        let ordered = order_sample_ids(&ids(&["2", "", "NA", "1", "nan"]));
        assert_eq!(ordered, ids(&["1", "2"]));
    }

    #[test]
    fn step_differences_key_on_upper_bound() {
        let steps = step_differences(&[(1.0, 0.5), (2.0, 0.2), (3.0, 0.25)]);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].0, 2.0);
        assert!((steps[0].1 - 0.3).abs() < 1e-12);
        assert_eq!(steps[1].0, 3.0);
        assert!((steps[1].1 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn single_point_curves_have_no_steps() {
        let curves = vec![SampleCurve {
            sample_id: "a".into(),
            points: vec![(1.0, 0.1)],
        }];
        assert!(median_step_differences(&curves).is_empty());
    }
}
