use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use sitnikov_portrait::app::PortraitApp;
use sitnikov_portrait::config::{
    Config, DEFAULT_SAMPLE_FILE, FontFamily, PlotConfig, PlotOverrides, Preset,
};
use sitnikov_portrait::data::loader::load_file;
use sitnikov_portrait::state::AppState;

const DEFAULT_WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];

#[derive(Parser)]
#[command(name = "sitnikov-portrait")]
#[command(version)]
#[command(about = "Scatter plot of z against v from a portrait sample file")]
struct Cli {
    /// Sample file: `#` comments, z and v in whitespace separated fields 1 and 2
    #[arg(default_value = DEFAULT_SAMPLE_FILE)]
    path: PathBuf,

    /// Config file (defaults to ./config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base look of the plot
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Marker diameter in points
    #[arg(long)]
    marker_size: Option<f32>,

    /// Fixed z axis range
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    xlim: Option<Vec<f64>>,

    /// Fixed v axis range
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    ylim: Option<Vec<f64>>,

    /// Drop preset limits and scale to the data
    #[arg(long)]
    auto_limits: bool,

    /// Window size in inches
    #[arg(long, num_args = 2, value_names = ["W", "H"])]
    figsize: Option<Vec<f32>>,

    #[arg(long)]
    font_size: Option<f32>,

    #[arg(long, value_enum)]
    font_family: Option<FontFamily>,

    /// Load and summarise the samples without opening a window
    #[arg(long)]
    no_show: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> PlotOverrides {
        PlotOverrides {
            preset: self.preset,
            auto_limits: self.auto_limits,
            figure_size: pair(&self.figsize),
            marker_size: self.marker_size,
            x_limits: pair(&self.xlim),
            y_limits: pair(&self.ylim),
            font_size: self.font_size,
            font_family: self.font_family,
            ..Default::default()
        }
    }
}

fn pair<T: Copy>(values: &Option<Vec<T>>) -> Option<[T; 2]> {
    values.as_deref().and_then(|v| <[T; 2]>::try_from(v).ok())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let file_config = Config::resolve(cli.config.as_deref())?;
    let plot = PlotConfig::resolve(&file_config.plot, &cli.overrides())?;
    log::debug!("plot config: {plot:?}");

    let samples = load_file(&cli.path)
        .with_context(|| format!("loading samples from {}", cli.path.display()))?;

    if cli.no_show {
        println!("{} samples", samples.len());
        if let Some(ext) = samples.extent() {
            println!("z: [{}, {}]", ext.z[0], ext.z[1]);
            println!("v: [{}, {}]", ext.v[0], ext.v[1]);
        }
        return Ok(());
    }

    let title = format!("Sitnikov portrait – {}", cli.path.display());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size(plot.window_size().unwrap_or(DEFAULT_WINDOW_SIZE))
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let mut state = AppState::new(plot);
    state.set_samples(samples, cli.path);

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(PortraitApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
