//! Mechanism phase diagram: log10 CAS over survival and checkpoint scalings,
//! with the relevant columns found by name rather than fixed.

use std::collections::HashMap;
use std::error::Error;
use std::path::{self, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{FigureConfig, InferenceConfig, RenderConfig};
use crate::core::grid::ParamGrid;
use crate::core::stats::{log10_offset, take};
use crate::core::table::Table;
use crate::error::FigureError;
use crate::figures::Figure;
use crate::figures::heatmap::{HeatmapPanel, draw_heatmap};
use crate::figures::util::{Canvas, save_pdf};

pub const INPUT: &str = "results_mechanism_sensitivity.csv";
/// Written at the root directory, not under the figures directory.
pub const OUTPUT: &str = "fig6_mechanism_sensitivity.pdf";

pub const LOG_EPS: f64 = 1e-300;

const SIZE_IN: (f64, f64) = (7.2, 5.6);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferredColumns {
    pub survival: String,
    pub checkpoint: String,
    pub cas: String,
    /// The CAS column came from the numeric-column heuristic.
    pub cas_guessed: bool,
}

/// Resolve the survival, checkpoint and CAS columns of `table`.
///
/// Each role takes the first candidate, in list order, that matches a header
/// case-insensitively. Without a CAS candidate the first numeric column whose
/// name contains `cas` is used, else the last numeric column.
pub fn infer_columns(table: &Table, candidates: &InferenceConfig) -> Result<InferredColumns, FigureError> {
    let by_lower: HashMap<String, &String> = table
        .headers()
        .iter()
        .map(|h| (h.to_lowercase(), h))
        .collect();
    let pick = |names: &[String]| {
        names
            .iter()
            .find_map(|name| by_lower.get(&name.to_lowercase()).map(|h| (*h).clone()))
    };

    let survival = pick(candidates.survival.as_slice());
    let checkpoint = pick(candidates.checkpoint.as_slice());
    let mut cas = pick(candidates.cas.as_slice());
    let mut cas_guessed = false;
    if cas.is_none() {
        let numeric = table.numeric_columns();
        cas = numeric
            .iter()
            .find(|c| c.to_lowercase().contains("cas"))
            .or(numeric.last())
            .cloned();
        if let Some(col) = &cas {
            cas_guessed = true;
            warn!(column = %col, "no CAS column by name; guessing from numeric columns");
        }
    }

    match (survival, checkpoint, cas) {
        (Some(survival), Some(checkpoint), Some(cas)) => Ok(InferredColumns {
            survival,
            checkpoint,
            cas,
            cas_guessed,
        }),
        _ => Err(FigureError::ColumnInference {
            found: table.headers().to_vec(),
        }),
    }
}

#[derive(Clone, Debug)]
pub struct PhaseData {
    pub columns: InferredColumns,
    /// Rows are checkpoint values, columns survival values; cells hold
    /// `log10(mean CAS + LOG_EPS)`.
    pub log_grid: ParamGrid,
}

pub fn prepare(table: &Table, candidates: &InferenceConfig) -> Result<PhaseData, FigureError> {
    let columns = infer_columns(table, candidates)?;
    let surv = table.f64_column_lossy(&columns.survival)?;
    let chk = table.f64_column_lossy(&columns.checkpoint)?;
    let cas = table.f64_column_lossy(&columns.cas)?;

    let complete: Vec<usize> = (0..surv.len())
        .filter(|&k| !(surv[k].is_nan() || chk[k].is_nan() || cas[k].is_nan()))
        .collect();
    if complete.is_empty() {
        return Err(FigureError::NoRows {
            file: table.file_name(),
        });
    }
    debug!(
        kept = complete.len(),
        dropped = surv.len() - complete.len(),
        "phase diagram rows"
    );

    let grid = ParamGrid::pivot_mean(
        &take(&chk, &complete),
        &take(&surv, &complete),
        &take(&cas, &complete),
    );
    let log_grid = grid.map(|z| log10_offset(z, LOG_EPS));
    Ok(PhaseData { columns, log_grid })
}

pub fn render(data: &PhaseData, render: &RenderConfig) -> Result<Canvas, Box<dyn Error>> {
    let mut canvas = Canvas::new(SIZE_IN.0, SIZE_IN.1, render.units_per_inch);
    {
        let root = canvas.root();
        root.fill(&WHITE)?;
        draw_heatmap(
            &root,
            &HeatmapPanel {
                grid: &data.log_grid,
                title: "Mechanism perturbation phase diagram (log10 CAS)",
                x_desc: &data.columns.survival,
                y_desc: &data.columns.checkpoint,
                colorbar_desc: "log10(CAS)",
                label: None,
                value_ticks: true,
            },
        )?;
        root.present()?;
    }
    Ok(canvas)
}

pub fn run(cfg: &FigureConfig) -> Result<PathBuf, Box<dyn Error>> {
    let table = Table::read(&cfg.paths.input(INPUT))?;
    let data = prepare(&table, &cfg.inference)?;
    info!(
        survival = %data.columns.survival,
        checkpoint = %data.columns.checkpoint,
        cas = %data.columns.cas,
        rows = data.log_grid.n_rows(),
        cols = data.log_grid.n_cols(),
        "rendering phase diagram"
    );
    let canvas = render(&data, &cfg.render)?;
    let out = Figure::Fig7.output(cfg);
    save_pdf(canvas, &out, &cfg.render)?;
    println!("Wrote: {}", path::absolute(&out)?.display());
    println!(
        "Used columns: {} (x), {} (y), {} (heat)",
        data.columns.survival, data.columns.checkpoint, data.columns.cas
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table {
        Table::from_reader(INPUT, text.as_bytes()).unwrap()
    }

    #[test]
    fn header_case_is_ignored_and_original_name_kept() {
        let t = table("Theta_Survival,CHK,Score\n1,1,0.5\n");
        let cols = infer_columns(&t, &InferenceConfig::default()).unwrap();
        assert_eq!(cols.survival, "Theta_Survival");
        assert_eq!(cols.checkpoint, "CHK");
        assert_eq!(cols.cas, "Score");
        assert!(!cols.cas_guessed);
    }

    #[test]
    fn rows_with_unparsable_cells_are_dropped() {
        let t = table("survival,checkpoint,cas\n1,1,10\n1,2,oops\n2,1,1000\n");
        let data = prepare(&t, &InferenceConfig::default()).unwrap();
        assert_eq!(data.log_grid.rows, vec![1.0]);
        assert_eq!(data.log_grid.cols, vec![1.0, 2.0]);
        assert!((data.log_grid.get(0, 0) - 1.0).abs() < 1e-12);
        assert!((data.log_grid.get(0, 1) - 3.0).abs() < 1e-12);
    }
}
