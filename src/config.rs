use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "launch-dash.json";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(version, about = "Interactive launch records dashboard")]
pub struct Args {
    /// Launch table to open (.csv, .json or .parquet). Overrides `data_path` from the config.
    pub data: Option<PathBuf>,

    /// JSON settings file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

/// Bounds and step of the payload range selector, in kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10_000.0,
            step: 1_000.0,
        }
    }
}

/// Dashboard settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Heading and window title.
    pub title: String,
    pub data_path: PathBuf,
    pub window_size: [f32; 2],
    pub slider: SliderConfig,
    /// Radius of the hole in the distribution chart, as a fraction of the outer radius.
    pub donut_hole: f64,
    /// Port of the original web deployment. Not bound by the native window.
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "SpaceX Launch Records Dashboard".to_string(),
            data_path: PathBuf::from("spacex_launch_dash.csv"),
            window_size: [1200.0, 900.0],
            slider: SliderConfig::default(),
            donut_hole: 0.25,
            port: 3000,
        }
    }
}

impl DashboardConfig {
    /// Resolve the effective configuration from the command line.
    ///
    /// An explicit `--config` file must exist; the default file is optional.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using built-in settings");
                    Self::default()
                }
            }
        };

        if let Some(data) = &args.data {
            config.data_path = data.clone();
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("in config {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let s = &self.slider;
        ensure!(
            s.min < s.max,
            "slider.min ({}) must be below slider.max ({})",
            s.min,
            s.max
        );
        ensure!(s.step > 0.0, "slider.step must be positive, got {}", s.step);
        ensure!(
            (0.0..1.0).contains(&self.donut_hole),
            "donut_hole must be in [0, 1), got {}",
            self.donut_hole
        );
        Ok(())
    }
}
