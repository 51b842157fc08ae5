pub mod fig2;
pub mod fig3;
pub mod fig4;
pub mod fig5;
pub mod fig6;
pub mod fig7;
pub mod heatmap;
pub mod util;

use std::error::Error;
use std::path::PathBuf;

use crate::config::FigureConfig;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Figure {
    Fig2,
    Fig3,
    Fig4,
    Fig5,
    Fig6,
    Fig7,
}

impl Figure {
    pub fn label(self) -> &'static str {
        match self {
            Figure::Fig2 => "Fig2",
            Figure::Fig3 => "Fig3",
            Figure::Fig4 => "Fig4",
            Figure::Fig5 => "Fig5",
            Figure::Fig6 => "Fig6",
            Figure::Fig7 => "Fig7",
        }
    }

    pub fn all() -> Vec<Figure> {
        vec![
            Figure::Fig2,
            Figure::Fig3,
            Figure::Fig4,
            Figure::Fig5,
            Figure::Fig6,
            Figure::Fig7,
        ]
    }

    /// Input CSV file name under the data directory.
    pub fn input(self) -> &'static str {
        match self {
            Figure::Fig2 => fig2::INPUT,
            Figure::Fig3 => fig3::INPUT,
            Figure::Fig4 => fig4::INPUT,
            Figure::Fig5 => fig5::INPUT,
            Figure::Fig6 => fig6::INPUT,
            Figure::Fig7 => fig7::INPUT,
        }
    }

    /// Where the PDF lands for `cfg`.
    pub fn output(self, cfg: &FigureConfig) -> PathBuf {
        match self {
            Figure::Fig2 => cfg.paths.figure(fig2::OUTPUT),
            Figure::Fig3 => cfg.paths.figure(fig3::OUTPUT),
            Figure::Fig4 => cfg.paths.figure(fig4::OUTPUT),
            Figure::Fig5 => cfg.paths.figure(fig5::OUTPUT),
            Figure::Fig6 => cfg.paths.figure(fig6::OUTPUT),
            Figure::Fig7 => cfg.paths.at_root(fig7::OUTPUT),
        }
    }

    /// Render and save the figure, returning the written path.
    pub fn run(self, cfg: &FigureConfig) -> Result<PathBuf, Box<dyn Error>> {
        match self {
            Figure::Fig2 => fig2::run(cfg),
            Figure::Fig3 => fig3::run(cfg),
            Figure::Fig4 => fig4::run(cfg),
            Figure::Fig5 => fig5::run(cfg),
            Figure::Fig6 => fig6::run(cfg),
            Figure::Fig7 => fig7::run(cfg),
        }
    }
}
