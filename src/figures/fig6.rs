//! Mechanism sensitivity: CAS over the (alpha, beta) scaling grid next to its
//! non-additivity residual.

use std::error::Error;
use std::path::PathBuf;

use plotters::prelude::*;
use tracing::info;

use crate::config::{FigureConfig, RenderConfig};
use crate::core::grid::{ParamGrid, Samples};
use crate::core::table::Table;
use crate::error::FigureError;
use crate::figures::Figure;
use crate::figures::heatmap::{HeatmapPanel, draw_heatmap};
use crate::figures::util::{Canvas, save_pdf};

pub const INPUT: &str = "results_mechanism_sensitivity.csv";
pub const OUTPUT: &str = "fig6_mechanism_sensitivity.pdf";

/// Unperturbed scaling of both mechanisms.
pub const BASELINE: f64 = 1.0;

const SIZE_IN: (f64, f64) = (11.0, 4.8);

#[derive(Clone, Debug)]
pub struct SensitivityData {
    /// Rows are alphas, columns are betas.
    pub cas: ParamGrid,
    pub residual: ParamGrid,
}

pub fn prepare(table: &Table) -> Result<SensitivityData, FigureError> {
    table.require(&["alpha", "beta", "CAS"])?;
    let alpha = table.f64_column("alpha")?;
    let beta = table.f64_column("beta")?;
    let cas = table.f64_column("CAS")?;
    let file = table.file_name();
    let samples = Samples {
        file: &file,
        alpha: &alpha,
        beta: &beta,
        value: &cas,
    };
    let grid = samples.grid()?;
    let residual = samples.interaction_residual(&grid, BASELINE)?;
    Ok(SensitivityData { cas: grid, residual })
}

pub fn render(data: &SensitivityData, render: &RenderConfig) -> Result<Canvas, Box<dyn Error>> {
    let mut canvas = Canvas::new(SIZE_IN.0, SIZE_IN.1, render.units_per_inch);
    {
        let root = canvas.root();
        root.fill(&WHITE)?;
        let panels = root.split_evenly((1, 2));
        let specs = [
            (&data.cas, "CAS(α, β)", "A"),
            (&data.residual, "Non-additivity residual Δ", "B"),
        ];
        for (area, (grid, title, label)) in panels.iter().zip(specs) {
            draw_heatmap(
                area,
                &HeatmapPanel {
                    grid,
                    title,
                    x_desc: "Checkpoint scaling (β)",
                    y_desc: "Survival scaling (α)",
                    colorbar_desc: "",
                    label: Some(label),
                    value_ticks: false,
                },
            )?;
        }
        root.present()?;
    }
    Ok(canvas)
}

pub fn run(cfg: &FigureConfig) -> Result<PathBuf, Box<dyn Error>> {
    let table = Table::read(&cfg.paths.input(INPUT))?;
    let data = prepare(&table)?;
    info!(
        alphas = data.cas.n_rows(),
        betas = data.cas.n_cols(),
        "rendering mechanism sensitivity"
    );
    let canvas = render(&data, &cfg.render)?;
    let out = Figure::Fig6.output(cfg);
    save_pdf(canvas, &out, &cfg.render)?;
    println!("Saved: {}", out.display());
    Ok(out)
}
