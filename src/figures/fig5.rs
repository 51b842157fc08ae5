//! ROC comparison of the clonality-only model against the model with CAS.

use std::error::Error;
use std::path::{self, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tracing::info;

use crate::config::{FigureConfig, RenderConfig};
use crate::core::stats::{argsort, auc_trapezoid, take};
use crate::core::table::Table;
use crate::error::FigureError;
use crate::figures::Figure;
use crate::figures::util::{Canvas, FONT, cycle_color, panel_label, save_pdf};

pub const INPUT: &str = "results_roc.csv";
pub const OUTPUT: &str = "fig5_roc_comparison.pdf";

const SIZE_IN: (f64, f64) = (6.2, 4.8);

#[derive(Clone, Debug)]
pub struct RocData {
    pub fpr: Vec<f64>,
    pub tpr_a: Vec<f64>,
    pub tpr_b: Vec<f64>,
    pub auc_a: f64,
    pub auc_b: f64,
}

impl RocData {
    pub fn label_a(&self) -> String {
        format!("Model A (clonality only), AUC={:.3}", self.auc_a)
    }

    pub fn label_b(&self) -> String {
        format!("Model B (+CAS), AUC={:.3}", self.auc_b)
    }
}

pub fn prepare(table: &Table) -> Result<RocData, FigureError> {
    table.require(&["fpr", "tpr_A", "tpr_B"])?;
    let fpr = table.f64_column("fpr")?;
    let order = argsort(&fpr);
    let fpr = take(&fpr, &order);
    let tpr_a = take(&table.f64_column("tpr_A")?, &order);
    let tpr_b = take(&table.f64_column("tpr_B")?, &order);
    Ok(RocData {
        auc_a: auc_trapezoid(&fpr, &tpr_a),
        auc_b: auc_trapezoid(&fpr, &tpr_b),
        fpr,
        tpr_a,
        tpr_b,
    })
}

pub fn render(data: &RocData, render: &RenderConfig) -> Result<Canvas, Box<dyn Error>> {
    let mut canvas = Canvas::new(SIZE_IN.0, SIZE_IN.1, render.units_per_inch);
    {
        let root = canvas.root();
        root.fill(&WHITE)?;
        draw(&root, data)?;
        root.present()?;
    }
    Ok(canvas)
}

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, data: &RocData) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(root)
        .caption("ROC: clonality-only vs +CAS", (FONT, 13))
        .margin(10)
        .x_label_area_size(36)
        .y_label_area_size(44)
        .build_cartesian_2d(0.0f64..1.0, 0.0f64..1.0)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("False Positive Rate")
        .y_desc("True Positive Rate")
        .label_style((FONT, 9))
        .axis_desc_style((FONT, 10))
        .draw()?;

    let curves = [
        (&data.tpr_a, data.label_a(), cycle_color(0)),
        (&data.tpr_b, data.label_b(), cycle_color(1)),
    ];
    for (tpr, label, color) in curves {
        let points: Vec<(f64, f64)> = data.fpr.iter().copied().zip(tpr.iter().copied()).collect();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
    }

    let chance = cycle_color(2);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, 0.0), (1.0, 1.0)],
            6,
            4,
            chance.stroke_width(1),
        ))?
        .label("Chance")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], chance.stroke_width(1)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .label_font((FONT, 9))
        .background_style(TRANSPARENT)
        .border_style(TRANSPARENT)
        .draw()?;
    panel_label(chart.plotting_area(), "A")?;
    Ok(())
}

pub fn run(cfg: &FigureConfig) -> Result<PathBuf, Box<dyn Error>> {
    let table = Table::read(&cfg.paths.input(INPUT))?;
    let data = prepare(&table)?;
    info!(
        points = data.fpr.len(),
        auc_a = data.auc_a,
        auc_b = data.auc_b,
        "rendering ROC comparison"
    );
    let canvas = render(&data, &cfg.render)?;
    let out = Figure::Fig5.output(cfg);
    save_pdf(canvas, &out, &cfg.render)?;
    println!("Saved: {}", path::absolute(&out)?.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rows_are_sorted_before_integration() {
        let csv = "fpr,tpr_A,tpr_B\n1,1,1\n0,0,0\n0.5,0.5,0.9\n";
        let t = Table::from_reader(INPUT, csv.as_bytes()).unwrap();
        let data = prepare(&t).unwrap();
        assert_eq!(data.fpr, vec![0.0, 0.5, 1.0]);
        assert_eq!(data.tpr_b, vec![0.0, 0.9, 1.0]);
        assert_relative_eq!(data.auc_a, 0.5, epsilon = 1e-12);
        assert_relative_eq!(data.auc_b, 0.7, epsilon = 1e-12);
        assert_eq!(data.label_b(), "Model B (+CAS), AUC=0.700");
    }
}
