//! Configuration: plot presentation options and the `config.yaml` file.
//!
//! Plot options are resolved in layers: a [`Preset`] gives the base
//! [`PlotConfig`], then the `plot` section of the config file and finally
//! command line flags are applied as [`PlotOverrides`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default sample file name.
pub const DEFAULT_SAMPLE_FILE: &str = "portrait.txt";
/// Default config file name, shared by the viewer and the generator.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Points per inch when converting figure sizes.
pub const POINTS_PER_INCH: f32 = 100.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Plot configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    SansSerif,
    Monospace,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontConfig {
    pub size: f32,
    pub family: FontFamily,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            family: FontFamily::SansSerif,
        }
    }
}

/// Everything the plot needs besides the samples themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Window size in inches; `None` keeps the viewer default.
    pub figure_size: Option<[f32; 2]>,
    /// Marker diameter in points.
    pub marker_size: f32,
    pub marker_color: [u8; 3],
    pub x_limits: Option<[f64; 2]>,
    pub y_limits: Option<[f64; 2]>,
    /// Axis labels, `$...$` marks math.
    pub x_label: String,
    pub y_label: String,
    pub font: FontConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Preset::Portrait.config()
    }
}

/// The two stock looks of the portrait plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Large figure, 0.8pt markers, auto-scaled axes.
    #[default]
    Portrait,
    /// Default figure, 0.4pt markers, axes fixed to the central region.
    Zoomed,
}

impl Preset {
    pub fn config(self) -> PlotConfig {
        let base = PlotConfig {
            figure_size: None,
            marker_size: 0.8,
            // matplotlib C0
            marker_color: [0x1f, 0x77, 0xb4],
            x_limits: None,
            y_limits: None,
            x_label: "$z$".to_string(),
            y_label: "$v$".to_string(),
            font: FontConfig::default(),
        };
        match self {
            Preset::Portrait => PlotConfig {
                figure_size: Some([25.0, 15.0]),
                ..base
            },
            Preset::Zoomed => PlotConfig {
                marker_size: 0.4,
                x_limits: Some([-2.5, 2.5]),
                y_limits: Some([-2.0, 2.0]),
                ..base
            },
        }
    }
}

impl PlotConfig {
    /// Window inner size in points, if a figure size is configured.
    pub fn window_size(&self) -> Option<[f32; 2]> {
        self.figure_size
            .map(|[w, h]| [w * POINTS_PER_INCH, h * POINTS_PER_INCH])
    }

    pub fn has_fixed_limits(&self) -> bool {
        self.x_limits.is_some() || self.y_limits.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.marker_size.is_finite() && self.marker_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "marker size must be positive, got {}",
                self.marker_size
            )));
        }
        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "font size must be positive, got {}",
                self.font.size
            )));
        }
        if let Some([w, h]) = self.figure_size {
            if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "figure size must be positive, got {w}x{h}"
                )));
            }
        }
        check_limits("x", self.x_limits)?;
        check_limits("y", self.y_limits)
    }

    /// Preset from the command line, else the config file, else the default;
    /// then the file's fields, then the command line's.
    pub fn resolve(file: &PlotOverrides, cli: &PlotOverrides) -> Result<Self, ConfigError> {
        let preset = cli.preset.or(file.preset).unwrap_or_default();
        let mut config = preset.config();
        config.apply(file);
        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    /// Apply every set field except `preset`, which only [`resolve`](Self::resolve) reads.
    pub fn apply(&mut self, overrides: &PlotOverrides) {
        if overrides.auto_limits {
            self.x_limits = None;
            self.y_limits = None;
        }
        if let Some(size) = overrides.figure_size {
            self.figure_size = Some(size);
        }
        if let Some(size) = overrides.marker_size {
            self.marker_size = size;
        }
        if let Some(color) = overrides.marker_color {
            self.marker_color = color;
        }
        if let Some(lim) = overrides.x_limits {
            self.x_limits = Some(lim);
        }
        if let Some(lim) = overrides.y_limits {
            self.y_limits = Some(lim);
        }
        if let Some(label) = &overrides.x_label {
            self.x_label = label.clone();
        }
        if let Some(label) = &overrides.y_label {
            self.y_label = label.clone();
        }
        if let Some(size) = overrides.font_size {
            self.font.size = size;
        }
        if let Some(family) = overrides.font_family {
            self.font.family = family;
        }
    }
}

fn check_limits(axis: &str, limits: Option<[f64; 2]>) -> Result<(), ConfigError> {
    match limits {
        Some([lo, hi]) if !(lo.is_finite() && hi.is_finite() && lo < hi) => Err(
            ConfigError::Invalid(format!("{axis} limits must satisfy min < max, got [{lo}, {hi}]")),
        ),
        _ => Ok(()),
    }
}

/// Partial plot settings; unset fields leave the base config untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOverrides {
    /// Base config the other fields are applied to.
    pub preset: Option<Preset>,
    /// Clears both axis limits before the other fields apply.
    pub auto_limits: bool,
    pub figure_size: Option<[f32; 2]>,
    pub marker_size: Option<f32>,
    pub marker_color: Option<[u8; 3]>,
    pub x_limits: Option<[f64; 2]>,
    pub y_limits: Option<[f64; 2]>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<FontFamily>,
}

// ---------------------------------------------------------------------------
// Generator configuration
// ---------------------------------------------------------------------------

/// Grid of initial conditions for the Poincaré portrait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitGrid {
    pub eccentricity: f64,
    /// Number of primary periods to integrate each initial condition.
    pub periods: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub z_step: f64,
    pub z_dot_min: f64,
    pub z_dot_max: f64,
    pub z_dot_step: f64,
}

impl Default for PortraitGrid {
    fn default() -> Self {
        Self {
            eccentricity: 0.2,
            periods: 200.0,
            z_min: 0.0,
            z_max: 2.0,
            z_step: 0.1,
            z_dot_min: 0.0,
            z_dot_max: 0.1,
            z_dot_step: 0.1,
        }
    }
}

impl PortraitGrid {
    /// Initial `(z, z_dot)` pairs, `z_dot` outer and `z` inner, half-open ranges.
    pub fn initial_conditions(&self) -> Result<Vec<(f64, f64)>, ConfigError> {
        let zs = half_open_range("z", self.z_min, self.z_max, self.z_step)?;
        let z_dots = half_open_range("z_dot", self.z_dot_min, self.z_dot_max, self.z_dot_step)?;
        Ok(z_dots
            .iter()
            .flat_map(|&z_dot| zs.iter().map(move |&z| (z, z_dot)))
            .collect())
    }
}

fn half_open_range(name: &str, min: f64, max: f64, step: f64) -> Result<Vec<f64>, ConfigError> {
    if !(step.is_finite() && step > 0.0 && min.is_finite() && max.is_finite()) {
        return Err(ConfigError::Invalid(format!(
            "{name} range needs finite bounds and a positive step"
        )));
    }
    // Index based so the values do not drift with repeated addition.
    Ok((0..)
        .map(|i| min + i as f64 * step)
        .take_while(|&x| x < max - step * 1e-9)
        .collect())
}

/// A single trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialValues {
    pub eccentricity: f64,
    pub z_start: f64,
    pub z_dot_start: f64,
    pub periods: f64,
}

impl Default for InitialValues {
    fn default() -> Self {
        Self {
            eccentricity: 0.2,
            z_start: 1.0,
            z_dot_start: 0.0,
            periods: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    pub time_delta: f64,
    /// Trajectory mode writes every n-th step.
    pub skip_n_outs: u64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            time_delta: 0.01,
            skip_n_outs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// config.yaml
// ---------------------------------------------------------------------------

/// ```yaml
/// plot:
///   preset: zoomed
///   marker_size: 0.6
/// poincare_portrait:
///   eccentricity: 0.3
///   periods: 500
/// solver_params:
///   time_delta: 0.005
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub plot: PlotOverrides,
    pub poincare_portrait: PortraitGrid,
    pub initial_values: InitialValues,
    pub solver_params: SolverParams,
}

impl Config {
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text, path)
    }

    /// Load an explicitly requested file, or `config.yaml` if it exists.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    log::debug!("using {}", path.display());
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
