use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::figures::Figure;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Render CAS result figures to PDF")]
pub struct Args {
    /// Figures to render: 2..7, fig2..fig7 or all (comma lists accepted)
    #[arg(value_name = "FIGURE")]
    pub figures: Vec<String>,

    /// Path to config TOML
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Directory holding data/ and figures/ (overrides config)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

pub fn usage() -> String {
    [
        "Usage: casfig [FIGURE]... [--config PATH] [--root DIR]",
        "Examples:",
        "  casfig 5",
        "  casfig all",
        "  casfig fig2,fig3 fig7",
        "  casfig --root results/run1 6",
        "If no figure is specified, all (Fig2-Fig7) run.",
        "Inputs are read from <root>/data/; PDFs go to <root>/figures/ (Fig7 to <root>/).",
    ]
    .join("\n")
}

/// Resolve figure tokens; an empty selection means every figure.
pub fn parse_figures(values: &[String]) -> Result<Vec<Figure>, String> {
    let mut figures: Vec<Figure> = Vec::new();
    let mut saw_all = false;
    for value in values {
        for token in value.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if token.eq_ignore_ascii_case("all") {
                saw_all = true;
                continue;
            }
            let digits = token
                .strip_prefix("fig")
                .or_else(|| token.strip_prefix("Fig"))
                .or_else(|| token.strip_prefix("FIG"))
                .unwrap_or(token);
            let figure = match digits {
                "2" => Figure::Fig2,
                "3" => Figure::Fig3,
                "4" => Figure::Fig4,
                "5" => Figure::Fig5,
                "6" => Figure::Fig6,
                "7" => Figure::Fig7,
                _ => {
                    return Err(format!("Unknown figure '{token}'.\n{}", usage()));
                }
            };
            if !figures.contains(&figure) {
                figures.push(figure);
            }
        }
    }

    if saw_all || figures.is_empty() {
        return Ok(Figure::all());
    }
    Ok(figures)
}
