//! Rare-event comparison: a Monte Carlo estimate that sits at zero for any
//! practical trajectory count next to the linear-solver CAS.

use std::error::Error;
use std::ops::Range;
use std::path::{self, PathBuf};

use plotters::coord::Shift;
use plotters::coord::combinators::LogCoord;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tracing::info;

use crate::config::{FigureConfig, RenderConfig};
use crate::core::stats::{argsort, floor_at, take};
use crate::core::table::Table;
use crate::error::FigureError;
use crate::figures::Figure;
use crate::figures::util::{
    Canvas, FONT, cycle_color, log_points, log_range, panel_label, save_pdf, sci_label,
};

pub const INPUT: &str = "results_rare_event.csv";
pub const OUTPUT: &str = "fig3_rare_event.pdf";

/// Zero estimates are drawn at `cas_solver[0] / FLOOR_DIVISOR`.
pub const FLOOR_DIVISOR: f64 = 50.0;

const SIZE_IN: (f64, f64) = (7.2, 3.6);
const WIDTH_RATIO: f64 = 1.15;

#[derive(Clone, Debug)]
pub struct RareEventData {
    pub m: Vec<f64>,
    pub mc_hat_floored: Vec<f64>,
    pub cas_solver: Vec<f64>,
    /// `cas_solver` of the first row after sorting by `M`.
    pub reference: f64,
    pub floor: f64,
}

impl RareEventData {
    fn estimate_points(&self) -> Vec<(f64, f64)> {
        self.m.iter().copied().zip(self.mc_hat_floored.iter().copied()).collect()
    }

    fn solver_points(&self) -> Vec<(f64, f64)> {
        self.m.iter().copied().zip(self.cas_solver.iter().copied()).collect()
    }
}

pub fn prepare(table: &Table) -> Result<RareEventData, FigureError> {
    table.require(&["M", "mc_hat", "cas_solver"])?;
    if table.is_empty() {
        return Err(FigureError::NoRows {
            file: table.file_name(),
        });
    }
    let m = table.f64_column("M")?;
    let order = argsort(&m);
    let m = take(&m, &order);
    let mc_hat = take(&table.f64_column("mc_hat")?, &order);
    let cas_solver = take(&table.f64_column("cas_solver")?, &order);

    let reference = cas_solver[0];
    let floor = reference / FLOOR_DIVISOR;
    Ok(RareEventData {
        mc_hat_floored: floor_at(&mc_hat, floor),
        m,
        cas_solver,
        reference,
        floor,
    })
}

pub fn render(data: &RareEventData, render: &RenderConfig) -> Result<Canvas, Box<dyn Error>> {
    let mut canvas = Canvas::new(SIZE_IN.0, SIZE_IN.1, render.units_per_inch);
    {
        let root = canvas.root();
        root.fill(&WHITE)?;
        let (w, _) = root.dim_in_pixel();
        let split = (w as f64 * WIDTH_RATIO / (WIDTH_RATIO + 1.0)).round() as i32;
        let (left, right) = root.split_horizontally(split);

        let estimate = data.estimate_points();
        let x_range = log_range(data.m.iter().copied());
        let mut a = loglog_panel(
            &left,
            &LogPanel {
                title: "Monte Carlo vs rare-event floor",
                x_desc: "Trajectories M",
                y_desc: "p_MC (floored for log scale)",
                x_range: x_range.clone(),
                y_range: log_range(
                    data.mc_hat_floored
                        .iter()
                        .copied()
                        .chain(std::iter::once(data.reference)),
                ),
                points: &estimate,
            },
        )?;
        if data.reference > 0.0 {
            a.draw_series(DashedLineSeries::new(
                vec![(x_range.start, data.reference), (x_range.end, data.reference)],
                6,
                4,
                cycle_color(1).stroke_width(1),
            ))?;
        }
        panel_label(a.plotting_area(), "A")?;

        let solver = data.solver_points();
        let b = loglog_panel(
            &right,
            &LogPanel {
                title: "Linear-solver CAS",
                x_desc: "Trajectories M (for reference)",
                y_desc: "CAS",
                x_range,
                y_range: log_range(data.cas_solver.iter().copied()),
                points: &solver,
            },
        )?;
        panel_label(b.plotting_area(), "B")?;
        root.present()?;
    }
    Ok(canvas)
}

struct LogPanel<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    x_range: Range<f64>,
    y_range: Range<f64>,
    points: &'a [(f64, f64)],
}

type LogLogChart<'a, DB> =
    ChartContext<'a, DB, Cartesian2d<LogCoord<f64>, LogCoord<f64>>>;

fn loglog_panel<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    panel: &LogPanel<'_>,
) -> Result<LogLogChart<'a, DB>, Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, (FONT, 11))
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(48)
        .build_cartesian_2d(
            panel.x_range.clone().log_scale(),
            panel.y_range.clone().log_scale(),
        )?;
    chart
        .configure_mesh()
        .x_desc(panel.x_desc)
        .y_desc(panel.y_desc)
        .x_label_formatter(&sci_label)
        .y_label_formatter(&sci_label)
        .label_style((FONT, 8))
        .axis_desc_style((FONT, 9))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()?;
    chart.draw_series(
        LineSeries::new(log_points(panel.points, true), cycle_color(0).stroke_width(1))
            .point_size(3),
    )?;
    Ok(chart)
}

pub fn run(cfg: &FigureConfig) -> Result<PathBuf, Box<dyn Error>> {
    let table = Table::read(&cfg.paths.input(INPUT))?;
    let data = prepare(&table)?;
    info!(
        rows = data.m.len(),
        reference = data.reference,
        floor = data.floor,
        "rendering rare-event comparison"
    );
    let canvas = render(&data, &cfg.render)?;
    let out = Figure::Fig3.output(cfg);
    save_pdf(canvas, &out, &cfg.render)?;
    println!("Saved: {}", path::absolute(&out)?.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_sorted_by_trajectory_count() {
        let csv = "M,mc_hat,cas_solver\n1000,0.0,2.0\n10,0.5,5.0\n100,0.0,5.0\n";
        let t = Table::from_reader(INPUT, csv.as_bytes()).unwrap();
        let data = prepare(&t).unwrap();
        assert_eq!(data.m, vec![10.0, 100.0, 1000.0]);
        assert_eq!(data.reference, 5.0);
        assert_eq!(data.floor, 0.1);
        assert_eq!(data.mc_hat_floored, vec![0.5, 0.1, 0.1]);
    }

    #[test]
    fn empty_table_is_an_error() {
        let t = Table::from_reader(INPUT, "M,mc_hat,cas_solver\n".as_bytes()).unwrap();
        assert!(matches!(prepare(&t), Err(FigureError::NoRows { .. })));
    }
}
