use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::FigureError;

pub const DEFAULT_CONFIG_PATH: &str = "casfig.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "PathsConfig::default_root")]
    pub root: PathBuf,
    #[serde(default = "PathsConfig::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "PathsConfig::default_figures_dir")]
    pub figures_dir: PathBuf,
}

impl PathsConfig {
    fn default_root() -> PathBuf {
        PathBuf::from(".")
    }
    fn default_data_dir() -> PathBuf {
        PathBuf::from("data")
    }
    fn default_figures_dir() -> PathBuf {
        PathBuf::from("figures")
    }

    /// `<root>/<data_dir>/<file>`, or `<data_dir>/<file>` when root is `.`.
    pub fn input(&self, file: &str) -> PathBuf {
        self.under_root(&self.data_dir).join(file)
    }

    pub fn figure(&self, file: &str) -> PathBuf {
        self.under_root(&self.figures_dir).join(file)
    }

    pub fn at_root(&self, file: &str) -> PathBuf {
        self.under_root(Path::new("")).join(file)
    }

    fn under_root(&self, rel: &Path) -> PathBuf {
        if self.root == Path::new(".") {
            rel.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            data_dir: Self::default_data_dir(),
            figures_dir: Self::default_figures_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// SVG user units per inch of figure size; 72 maps one unit to one PDF point.
    #[serde(default = "RenderConfig::default_units_per_inch")]
    pub units_per_inch: f64,
    #[serde(default = "RenderConfig::default_load_system_fonts")]
    pub load_system_fonts: bool,
}

impl RenderConfig {
    fn default_units_per_inch() -> f64 {
        72.0
    }
    fn default_load_system_fonts() -> bool {
        true
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            units_per_inch: Self::default_units_per_inch(),
            load_system_fonts: Self::default_load_system_fonts(),
        }
    }
}

/// Lower-case header names tried, in order, for each role of the phase diagram.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "InferenceConfig::default_cas")]
    pub cas: Vec<String>,
    #[serde(default = "InferenceConfig::default_survival")]
    pub survival: Vec<String>,
    #[serde(default = "InferenceConfig::default_checkpoint")]
    pub checkpoint: Vec<String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl InferenceConfig {
    fn default_cas() -> Vec<String> {
        owned(&["cas", "cas_value", "value", "score"])
    }
    fn default_survival() -> Vec<String> {
        owned(&[
            "survival",
            "survival_scale",
            "p_survive",
            "survival_mult",
            "surv",
            "theta_survival",
            "theta_survive",
        ])
    }
    fn default_checkpoint() -> Vec<String> {
        owned(&[
            "checkpoint",
            "checkpoint_scale",
            "checkpoint_mult",
            "chk",
            "qc",
            "theta_checkpoint",
            "theta_chk",
            "theta_qc",
        ])
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            cas: Self::default_cas(),
            survival: Self::default_survival(),
            checkpoint: Self::default_checkpoint(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FigureConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl FigureConfig {
    pub fn load(path: &Path) -> Result<Self, FigureError> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|source| FigureError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path` when it exists; any problem falls back to the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("no config at {}; using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("{err}. Using defaults.");
                Self::default()
            }
        }
    }
}
