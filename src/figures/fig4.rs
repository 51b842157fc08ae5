//! Cohort distribution of CAS: box plots with jittered points for the two
//! pSS cohorts.

use std::error::Error;
use std::path::{self, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::info;

use crate::config::{FigureConfig, RenderConfig};
use crate::core::stats::BoxStats;
use crate::core::table::Table;
use crate::error::FigureError;
use crate::figures::Figure;
use crate::figures::util::{Canvas, FONT, cycle_color, log_range, panel_label_at, save_pdf, sci_label};

pub const INPUT: &str = "results_cohort_cas.csv";
pub const OUTPUT: &str = "fig4_cohort_cas_distribution.pdf";

/// Cohorts in display order with their axis labels.
pub const GROUPS: [(&str, &str); 2] = [
    ("pSS_no_lymphoma", "pSS (no lymphoma)"),
    ("pSS_MALT", "pSS + MALT"),
];

pub const JITTER_SD: f64 = 0.06;
pub const JITTER_SEED: u64 = 0;
pub const BOX_WIDTH: f64 = 0.55;

const SIZE_IN: (f64, f64) = (6.2, 4.2);

#[derive(Clone, Debug)]
pub struct CohortGroup {
    pub key: &'static str,
    pub label: &'static str,
    /// Category slot on the x axis, starting at 1.
    pub position: f64,
    pub values: Vec<f64>,
    pub jitter_x: Vec<f64>,
    pub stats: Option<BoxStats>,
}

#[derive(Clone, Debug)]
pub struct CohortData {
    pub groups: Vec<CohortGroup>,
}

impl CohortData {
    pub fn n_points(&self) -> usize {
        self.groups.iter().map(|g| g.values.len()).sum()
    }
}

pub fn prepare(table: &Table) -> Result<CohortData, FigureError> {
    table.require(&["group", "CAS"])?;
    let labels = table.str_column("group")?;
    let cas = table.f64_column("CAS")?;

    let kept = labels
        .iter()
        .filter(|g| GROUPS.iter().any(|(key, _)| g.as_str() == *key))
        .count();
    if kept == 0 {
        return Err(FigureError::EmptyCohort {
            file: table.file_name(),
        });
    }

    // One normal draw per point, groups in display order.
    let mut rng = StdRng::seed_from_u64(JITTER_SEED);
    let groups = GROUPS
        .iter()
        .enumerate()
        .map(|(i, &(key, label))| {
            let position = (i + 1) as f64;
            let values: Vec<f64> = labels
                .iter()
                .zip(cas.iter())
                .filter(|(g, _)| g.as_str() == key)
                .map(|(_, &v)| v)
                .collect();
            let jitter_x = values
                .iter()
                .map(|_| position + JITTER_SD * rng.sample::<f64, _>(StandardNormal))
                .collect();
            CohortGroup {
                key,
                label,
                position,
                stats: BoxStats::from_values(&values),
                values,
                jitter_x,
            }
        })
        .collect();
    Ok(CohortData { groups })
}

pub fn render(data: &CohortData, render: &RenderConfig) -> Result<Canvas, Box<dyn Error>> {
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
    data: &CohortData,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let y_range = log_range(data.groups.iter().flat_map(|g| g.values.iter().copied()));
    let (y_lo, y_hi) = (y_range.start, y_range.end);
    let clamp = |v: f64| v.clamp(y_lo, y_hi);
    let x_max = GROUPS.len() as f64 + 0.6;

    let mut chart = ChartBuilder::on(root)
        .caption("Cohort distribution of CAS", (FONT, 13))
        .margin(10)
        .x_label_area_size(28)
        .y_label_area_size(52)
        .build_cartesian_2d(0.4..x_max, y_range.log_scale())?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc("Clonal Attractor Score (CAS)")
        .y_label_formatter(&sci_label)
        .label_style((FONT, 9))
        .axis_desc_style((FONT, 10))
        .light_line_style(BLACK.mix(0.04))
        .bold_line_style(BLACK.mix(0.12))
        .draw()?;

    let below = TextStyle::from((FONT, 9).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(GROUPS.iter().enumerate().map(|(i, &(_, label))| {
        EmptyElement::at(((i + 1) as f64, y_lo))
            + PathElement::new(vec![(0, 0), (0, 4)], BLACK)
            + Text::new(label, (0, 6), below.clone())
    }))?;

    let half = BOX_WIDTH / 2.0;
    let cap = BOX_WIDTH / 4.0;
    for group in &data.groups {
        let Some(stats) = group.stats else {
            continue;
        };
        let c = group.position;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(c - half, clamp(stats.q1)), (c + half, clamp(stats.q3))],
            BLACK.stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(c - half, clamp(stats.median)), (c + half, clamp(stats.median))],
            cycle_color(1).stroke_width(2),
        )))?;
        let whiskers = [
            vec![(c, clamp(stats.q1)), (c, clamp(stats.whisker_lo))],
            vec![(c, clamp(stats.q3)), (c, clamp(stats.whisker_hi))],
            vec![(c - cap, clamp(stats.whisker_lo)), (c + cap, clamp(stats.whisker_lo))],
            vec![(c - cap, clamp(stats.whisker_hi)), (c + cap, clamp(stats.whisker_hi))],
        ];
        chart.draw_series(
            whiskers
                .into_iter()
                .map(|path| PathElement::new(path, BLACK.stroke_width(1))),
        )?;
    }

    for (i, group) in data.groups.iter().enumerate() {
        let fill = cycle_color(i).mix(0.85).filled();
        chart.draw_series(
            group
                .jitter_x
                .iter()
                .zip(group.values.iter())
                .filter(|(_, v)| v.is_finite() && **v > 0.0)
                .map(|(&x, &y)| Circle::new((x, y), 3, fill)),
        )?;
    }

    panel_label_at(chart.plotting_area(), "A", 0.01, 0.98)?;
    Ok(())
}

pub fn run(cfg: &FigureConfig) -> Result<PathBuf, Box<dyn Error>> {
    let table = Table::read(&cfg.paths.input(INPUT))?;
    let data = prepare(&table)?;
    for group in &data.groups {
        info!(group = group.key, n = group.values.len(), "cohort group");
    }
    let canvas = render(&data, &cfg.render)?;
    let out = Figure::Fig4.output(cfg);
    save_pdf(canvas, &out, &cfg.render)?;
    println!("Saved: {}", path::absolute(&out)?.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_groups_are_dropped() {
        let csv = "group,CAS\npSS_MALT,0.2\ncontrol,0.5\npSS_no_lymphoma,0.01\npSS_MALT,0.3\n";
        let t = Table::from_reader(INPUT, csv.as_bytes()).unwrap();
        let data = prepare(&t).unwrap();
        assert_eq!(data.n_points(), 3);
        assert_eq!(data.groups[0].values, vec![0.01]);
        assert_eq!(data.groups[1].values, vec![0.2, 0.3]);
        assert_eq!(data.groups[1].position, 2.0);
    }

    #[test]
    fn jitter_is_reproducible_and_centered_on_slot() {
        let csv = "group,CAS\npSS_MALT,0.2\npSS_MALT,0.3\npSS_no_lymphoma,0.1\n";
        let t = Table::from_reader(INPUT, csv.as_bytes()).unwrap();
        let a = prepare(&t).unwrap();
        let b = prepare(&t).unwrap();
        assert_eq!(a.groups[1].jitter_x, b.groups[1].jitter_x);
        for group in &a.groups {
            for &x in &group.jitter_x {
                assert!((x - group.position).abs() < 0.5);
            }
        }
    }
}
